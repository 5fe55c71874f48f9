pub mod auth;
pub mod err;
pub mod models;
pub mod store;
pub mod students;
pub mod views;

use axum::handler::Handler;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Extension, Router};
use sqlx::SqlitePool;

pub use crate::err::Error;

pub type RefStr = &'static str;

/// 303 redirect, the reply to every successful form submission.
pub fn see_other(path: &str) -> Response {
    Redirect::to(path).into_response()
}

pub fn app(pool: SqlitePool) -> Router {
    Router::new()
        .route("/", get(auth::login_form).post(auth::login))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/logout", get(auth::logout))
        .route("/dashboard", get(students::dashboard))
        .route(
            "/add_student",
            get(students::add_student_form).post(students::add_student),
        )
        .route(
            "/add_marks/:id",
            get(students::add_marks_form).post(students::add_marks),
        )
        .route(
            "/edit_student/:id",
            get(students::edit_student_form).post(students::edit_student),
        )
        .route("/delete_student/:id", get(students::delete_student))
        .route("/student_profile/:id", get(students::student_profile))
        .route("/print_marksheet/:id", get(students::print_marksheet))
        .fallback(err::handler404.into_service())
        .layer(Extension(pool))
}
