use std::str::FromStr;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::err::Error;
use crate::models::{Account, Marks, NewStudent, Session, StudentRecord};

pub async fn connect(url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

pub async fn init_db(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS accounts(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS students(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            grade TEXT NOT NULL,
            maths INTEGER NOT NULL,
            science INTEGER NOT NULL,
            english INTEGER NOT NULL,
            hindi INTEGER NOT NULL,
            computer INTEGER NOT NULL,
            email TEXT NOT NULL,
            phone TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS sessions(
            ssid TEXT PRIMARY KEY,
            account_id INTEGER NOT NULL,
            expires_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    log::debug!("database schema ready");
    Ok(())
}

pub async fn create_account(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
) -> Result<Account, Error> {
    let existing = account_by_username(pool, username).await?;
    if existing.is_some() {
        return Err(Error::DuplicateUsername {
            username: username.to_string(),
        });
    }

    let created_at = Utc::now();
    let res = sqlx::query("INSERT INTO accounts (username, password_hash, created_at) VALUES (?, ?, ?)")
        .bind(username)
        .bind(password_hash)
        .bind(created_at)
        .execute(pool)
        .await?;

    Ok(Account {
        id: res.last_insert_rowid(),
        username: username.to_string(),
        password_hash: password_hash.to_string(),
        created_at,
    })
}

pub async fn account_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<Account>, Error> {
    sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE username = ? LIMIT 1")
        .bind(username)
        .fetch_optional(pool)
        .await
        .map_err(Error::from)
}

pub async fn account_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Account>, Error> {
    sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = ? LIMIT 1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(Error::from)
}

pub async fn create_student(pool: &SqlitePool, new: &NewStudent) -> Result<StudentRecord, Error> {
    let res = sqlx::query(
        "INSERT INTO students (name, grade, maths, science, english, hindi, computer, email, phone)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&new.name)
    .bind(&new.grade)
    .bind(new.marks.maths)
    .bind(new.marks.science)
    .bind(new.marks.english)
    .bind(new.marks.hindi)
    .bind(new.marks.computer)
    .bind(&new.email)
    .bind(&new.phone)
    .execute(pool)
    .await?;

    student_by_id(pool, res.last_insert_rowid()).await
}

pub async fn student_by_id(pool: &SqlitePool, id: i64) -> Result<StudentRecord, Error> {
    sqlx::query_as::<_, StudentRecord>("SELECT * FROM students WHERE id = ? LIMIT 1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(Error::NotFound {
            message: format!("No student with id {}", id),
        })
}

pub async fn list_students(pool: &SqlitePool) -> Result<Vec<StudentRecord>, Error> {
    sqlx::query_as::<_, StudentRecord>("SELECT * FROM students ORDER BY id")
        .fetch_all(pool)
        .await
        .map_err(Error::from)
}

/// Overwrites only the five score fields.
pub async fn update_marks(
    pool: &SqlitePool,
    id: i64,
    marks: &Marks,
) -> Result<StudentRecord, Error> {
    let res = sqlx::query(
        "UPDATE students SET maths = ?, science = ?, english = ?, hindi = ?, computer = ?
         WHERE id = ?",
    )
    .bind(marks.maths)
    .bind(marks.science)
    .bind(marks.english)
    .bind(marks.hindi)
    .bind(marks.computer)
    .bind(id)
    .execute(pool)
    .await?;

    if res.rows_affected() < 1 {
        return Err(Error::NotFound {
            message: format!("No student with id {}", id),
        });
    }
    student_by_id(pool, id).await
}

pub async fn update_student(
    pool: &SqlitePool,
    id: i64,
    new: &NewStudent,
) -> Result<StudentRecord, Error> {
    let res = sqlx::query(
        "UPDATE students SET name = ?, grade = ?, maths = ?, science = ?, english = ?,
         hindi = ?, computer = ?, email = ?, phone = ? WHERE id = ?",
    )
    .bind(&new.name)
    .bind(&new.grade)
    .bind(new.marks.maths)
    .bind(new.marks.science)
    .bind(new.marks.english)
    .bind(new.marks.hindi)
    .bind(new.marks.computer)
    .bind(&new.email)
    .bind(&new.phone)
    .bind(id)
    .execute(pool)
    .await?;

    if res.rows_affected() < 1 {
        return Err(Error::NotFound {
            message: format!("No student with id {}", id),
        });
    }
    student_by_id(pool, id).await
}

pub async fn delete_student(pool: &SqlitePool, id: i64) -> Result<(), Error> {
    let res = sqlx::query("DELETE FROM students WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if res.rows_affected() < 1 {
        return Err(Error::NotFound {
            message: format!("No student with id {}", id),
        });
    }
    Ok(())
}

pub async fn create_session(pool: &SqlitePool, session: &Session) -> Result<(), Error> {
    sqlx::query("INSERT INTO sessions VALUES (?, ?, ?)")
        .bind(&session.ssid)
        .bind(session.account_id)
        .bind(session.expires_at)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn session_by_id(pool: &SqlitePool, ssid: &str) -> Result<Option<Session>, Error> {
    sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE ssid = ? LIMIT 1")
        .bind(ssid)
        .fetch_optional(pool)
        .await
        .map_err(Error::from)
}

pub async fn delete_session(pool: &SqlitePool, ssid: &str) -> Result<bool, Error> {
    let res = sqlx::query("DELETE FROM sessions WHERE ssid = ?")
        .bind(ssid)
        .execute(pool)
        .await?;
    Ok(res.rows_affected() >= 1)
}
