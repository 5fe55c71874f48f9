use axum::extract::Path;
use axum::response::{Html, IntoResponse, Response};
use axum::{Extension, Form};
use sqlx::SqlitePool;

use crate::auth::AuthUser;
use crate::err::Error;
use crate::models::{MarksForm, StudentForm};
use crate::{see_other, store, views};

pub async fn dashboard(
    _user: AuthUser,
    Extension(pool): Extension<SqlitePool>,
) -> Result<Html<String>, Error> {
    let students = store::list_students(&pool).await?;
    Ok(views::dashboard_page(&students))
}

pub async fn add_student_form(_user: AuthUser) -> Html<String> {
    views::add_student_page(None)
}

pub async fn add_student(
    _user: AuthUser,
    Extension(pool): Extension<SqlitePool>,
    Form(form): Form<StudentForm>,
) -> Result<Response, Error> {
    let new = match form.into_new_student() {
        Ok(new) => new,
        Err(Error::Validation { field }) => {
            return Ok(views::add_student_page(Some(&score_error(field))).into_response())
        }
        Err(err) => return Err(err),
    };
    store::create_student(&pool, &new).await?;
    Ok(see_other("/dashboard"))
}

pub async fn add_marks_form(
    _user: AuthUser,
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<Html<String>, Error> {
    let student = store::student_by_id(&pool, id).await?;
    Ok(views::add_marks_page(&student, None))
}

pub async fn add_marks(
    _user: AuthUser,
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<i64>,
    Form(form): Form<MarksForm>,
) -> Result<Response, Error> {
    let student = store::student_by_id(&pool, id).await?;
    let marks = match form.into_marks() {
        Ok(marks) => marks,
        Err(Error::Validation { field }) => {
            return Ok(views::add_marks_page(&student, Some(&score_error(field))).into_response())
        }
        Err(err) => return Err(err),
    };
    store::update_marks(&pool, id, &marks).await?;
    Ok(see_other("/dashboard"))
}

pub async fn edit_student_form(
    _user: AuthUser,
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<Html<String>, Error> {
    let student = store::student_by_id(&pool, id).await?;
    Ok(views::edit_student_page(&student, None))
}

pub async fn edit_student(
    _user: AuthUser,
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<i64>,
    Form(form): Form<StudentForm>,
) -> Result<Response, Error> {
    let student = store::student_by_id(&pool, id).await?;
    let new = match form.into_new_student() {
        Ok(new) => new,
        Err(Error::Validation { field }) => {
            return Ok(
                views::edit_student_page(&student, Some(&score_error(field))).into_response(),
            )
        }
        Err(err) => return Err(err),
    };
    store::update_student(&pool, id, &new).await?;
    Ok(see_other("/dashboard"))
}

pub async fn delete_student(
    _user: AuthUser,
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<Response, Error> {
    store::delete_student(&pool, id).await?;
    Ok(see_other("/dashboard"))
}

pub async fn student_profile(
    _user: AuthUser,
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<Html<String>, Error> {
    let student = store::student_by_id(&pool, id).await?;
    Ok(views::profile_page(&student))
}

pub async fn print_marksheet(
    _user: AuthUser,
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<Html<String>, Error> {
    let student = store::student_by_id(&pool, id).await?;
    Ok(views::marksheet_page(&student))
}

fn score_error(field: &str) -> String {
    format!("Score field \"{}\" must be a whole number", field)
}
