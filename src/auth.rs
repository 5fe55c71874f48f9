use std::ops::Add;

use axum::extract::{FromRequest, RequestParts};
use axum::headers::Cookie;
use axum::http::header::{HeaderValue, SET_COOKIE};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{async_trait, Extension, Form, TypedHeader};
use chrono::{Duration, Utc};
use pbkdf2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use pbkdf2::Pbkdf2;
use rand::{thread_rng, Rng};
use rand_core::OsRng;
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;

use crate::err::Error;
use crate::models::{Account, Credentials, Session};
use crate::{see_other, store, views};

pub const SESSION_COOKIE: &str = "ssid";

/// Session lifetime; expired rows are removed the next time they are seen.
const SESSION_TTL_DAYS: i64 = 2;

// Shown for both an unknown username and a wrong password, so the response
// does not reveal which of the two it was.
const BAD_CREDENTIALS: &str = "Invalid username or password";

/// The authenticated principal behind the current request. Present as an
/// argument on every handler that touches student data; extraction fails
/// with a redirect to the login form, never an error page.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub account_id: i64,
    pub username: String,
}

#[async_trait]
impl<B> FromRequest<B> for AuthUser
where
    B: Send,
{
    type Rejection = Redirect;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let Extension(pool) = Extension::<SqlitePool>::from_request(req)
            .await
            .map_err(|_| Redirect::to("/login"))?;
        let ssid = TypedHeader::<Cookie>::from_request(req)
            .await
            .ok()
            .and_then(|TypedHeader(cookie)| cookie.get(SESSION_COOKIE).map(str::to_string));

        match ensure_authenticated(ssid, &pool).await {
            Ok(Some(user)) => Ok(user),
            _ => Err(Redirect::to("/login")),
        }
    }
}

pub fn hash_password(plaintext: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Pbkdf2.hash_password(plaintext.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub async fn verify_credentials(
    pool: &SqlitePool,
    creds: &Credentials,
) -> Result<Account, Error> {
    let account = match store::account_by_username(pool, &creds.username).await? {
        Some(account) => account,
        None => return Err(Error::InvalidCredentials),
    };
    let hash = PasswordHash::new(&account.password_hash)?;
    if Pbkdf2
        .verify_password(creds.password.as_bytes(), &hash)
        .is_ok()
    {
        Ok(account)
    } else {
        Err(Error::InvalidCredentials)
    }
}

fn new_session_token() -> String {
    let ssid_bytes: [u8; 32] = thread_rng().gen();
    let mut hasher: Sha256 = Digest::new();
    hasher.update(ssid_bytes);
    hex::encode(hasher.finalize())
}

pub async fn start_session(pool: &SqlitePool, account_id: i64) -> Result<Session, Error> {
    let session = Session {
        ssid: new_session_token(),
        account_id,
        expires_at: Utc::now().add(Duration::days(SESSION_TTL_DAYS)),
    };
    store::create_session(pool, &session).await?;
    Ok(session)
}

pub async fn end_session(pool: &SqlitePool, ssid: &str) -> Result<(), Error> {
    store::delete_session(pool, ssid).await?;
    Ok(())
}

pub async fn ensure_authenticated(
    session_id: Option<String>,
    pool: &SqlitePool,
) -> Result<Option<AuthUser>, Error> {
    let ssid = match session_id {
        Some(ssid) if !ssid.is_empty() => ssid,
        _ => return Ok(None),
    };
    let session = match store::session_by_id(pool, &ssid).await? {
        Some(session) => session,
        None => return Ok(None),
    };
    if Utc::now().gt(&session.expires_at) {
        store::delete_session(pool, &ssid).await?;
        return Ok(None);
    }
    match store::account_by_id(pool, session.account_id).await? {
        Some(account) => Ok(Some(AuthUser {
            account_id: account.id,
            username: account.username,
        })),
        None => Ok(None),
    }
}

pub async fn register_form() -> Html<String> {
    views::register_page(None)
}

pub async fn register(
    Extension(pool): Extension<SqlitePool>,
    Form(creds): Form<Credentials>,
) -> Result<Response, Error> {
    let username = creds.username.trim();
    if username.is_empty() || creds.password.is_empty() {
        return Ok(
            views::register_page(Some("Both a username and a password are required"))
                .into_response(),
        );
    }

    let password_hash = hash_password(&creds.password)?;
    match store::create_account(&pool, username, &password_hash).await {
        Ok(_) => Ok(see_other("/login")),
        Err(Error::DuplicateUsername { username }) => Ok(views::register_page(Some(&format!(
            "Username \"{}\" is already taken",
            username
        )))
        .into_response()),
        Err(err) => Err(err),
    }
}

pub async fn login_form() -> Html<String> {
    views::login_page(None)
}

pub async fn login(
    Extension(pool): Extension<SqlitePool>,
    Form(creds): Form<Credentials>,
) -> Result<Response, Error> {
    if creds.username.is_empty() || creds.password.is_empty() {
        return Ok(views::login_page(Some(BAD_CREDENTIALS)).into_response());
    }

    let account = match verify_credentials(&pool, &creds).await {
        Ok(account) => account,
        Err(Error::InvalidCredentials) => {
            return Ok(views::login_page(Some(BAD_CREDENTIALS)).into_response())
        }
        Err(err) => return Err(err),
    };

    let session = start_session(&pool, account.id).await?;
    let mut response = see_other("/dashboard");
    response
        .headers_mut()
        .insert(SET_COOKIE, session_cookie(&session.ssid)?);
    Ok(response)
}

pub async fn logout(
    Extension(pool): Extension<SqlitePool>,
    cookie: Option<TypedHeader<Cookie>>,
) -> Result<Response, Error> {
    if let Some(ssid) = cookie
        .as_ref()
        .and_then(|TypedHeader(cookie)| cookie.get(SESSION_COOKIE))
    {
        end_session(&pool, ssid).await?;
    }
    let mut response = see_other("/login");
    response
        .headers_mut()
        .insert(SET_COOKIE, clear_session_cookie()?);
    Ok(response)
}

fn session_cookie(ssid: &str) -> Result<HeaderValue, Error> {
    HeaderValue::from_str(&format!("{}={}; Path=/; HttpOnly", SESSION_COOKIE, ssid)).map_err(
        |err| Error::Internal {
            kind: "CookieError",
            message: err.to_string(),
        },
    )
}

fn clear_session_cookie() -> Result<HeaderValue, Error> {
    HeaderValue::from_str(&format!("{}=; Path=/; HttpOnly; Max-Age=0", SESSION_COOKIE)).map_err(
        |err| Error::Internal {
            kind: "CookieError",
            message: err.to_string(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn mem_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("open in-memory db");
        store::init_db(&pool).await.expect("create schema");
        pool
    }

    fn creds(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn verify_matches_only_the_right_password() {
        let pool = mem_pool().await;
        let hash = hash_password("correct").unwrap();
        store::create_account(&pool, "alice", &hash).await.unwrap();

        let account = verify_credentials(&pool, &creds("alice", "correct"))
            .await
            .unwrap();
        assert_eq!(account.username, "alice");

        // Wrong password and unknown user fail with the same error kind.
        let wrong = verify_credentials(&pool, &creds("alice", "wrong"))
            .await
            .unwrap_err();
        let unknown = verify_credentials(&pool, &creds("nobody", "x"))
            .await
            .unwrap_err();
        assert!(matches!(wrong, Error::InvalidCredentials));
        assert!(matches!(unknown, Error::InvalidCredentials));
    }

    #[tokio::test]
    async fn hashes_are_salted_and_opaque() {
        let one = hash_password("secret").unwrap();
        let two = hash_password("secret").unwrap();
        assert_ne!(one, two);
        assert!(!one.contains("secret"));
    }

    #[tokio::test]
    async fn session_lifecycle() {
        let pool = mem_pool().await;
        let account = store::create_account(&pool, "bob", &hash_password("pw").unwrap())
            .await
            .unwrap();

        let session = start_session(&pool, account.id).await.unwrap();
        let user = ensure_authenticated(Some(session.ssid.clone()), &pool)
            .await
            .unwrap()
            .expect("session should authenticate");
        assert_eq!(user.username, "bob");

        end_session(&pool, &session.ssid).await.unwrap();
        assert!(ensure_authenticated(Some(session.ssid), &pool)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn expired_session_is_rejected_and_removed() {
        let pool = mem_pool().await;
        let account = store::create_account(&pool, "eve", &hash_password("pw").unwrap())
            .await
            .unwrap();
        let stale = Session {
            ssid: "deadbeef".to_string(),
            account_id: account.id,
            expires_at: Utc::now() - Duration::days(1),
        };
        store::create_session(&pool, &stale).await.unwrap();

        assert!(ensure_authenticated(Some("deadbeef".to_string()), &pool)
            .await
            .unwrap()
            .is_none());
        assert!(store::session_by_id(&pool, "deadbeef")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn missing_or_empty_token_is_unauthenticated() {
        let pool = mem_pool().await;
        assert!(ensure_authenticated(None, &pool).await.unwrap().is_none());
        assert!(ensure_authenticated(Some(String::new()), &pool)
            .await
            .unwrap()
            .is_none());
    }
}
