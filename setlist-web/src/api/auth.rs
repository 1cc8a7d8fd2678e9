//! Credential authentication and session middleware
//!
//! Sessions are opaque tokens in an HttpOnly cookie. The middleware
//! resolves the cookie to a user and injects [`CurrentUser`] into request
//! extensions; every protected handler reads the owner from there, never
//! from the request body.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::db::{sessions, users};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Session cookie name
pub const SESSION_COOKIE: &str = "setlist_session";

/// Authenticated caller, injected by [`session_middleware`]
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub guid: Uuid,
    pub session_token: String,
}

/// Extract the session token from the Cookie header
fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

/// Authentication middleware for protected routes.
/// Returns 401 when the session cookie is missing, unknown, or expired.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = session_token(request.headers())
        .ok_or_else(|| ApiError::Unauthorized("Missing session".to_string()))?;

    let user_guid = sessions::lookup_session(&state.db, &token)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid or expired session".to_string()))?;

    request.extensions_mut().insert(CurrentUser {
        guid: user_guid,
        session_token: token,
    });

    Ok(next.run(request).await)
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

fn validate_credentials(name: Option<&str>, email: &str, password: &str) -> ApiResult<()> {
    if let Some(name) = name {
        if name.trim().len() < 2 {
            return Err(ApiError::BadRequest(
                "Name must be at least 2 characters".to_string(),
            ));
        }
    }

    let well_formed = matches!(
        email.split_once('@'),
        Some((local, domain)) if !local.is_empty() && domain.contains('.')
    );
    if email.is_empty() || !well_formed {
        return Err(ApiError::BadRequest("Invalid email format".to_string()));
    }

    if password.len() < 6 {
        return Err(ApiError::BadRequest(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    Ok(())
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    validate_credentials(Some(&req.name), &req.email, &req.password)?;

    if users::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Conflict("Email already exists".to_string()));
    }

    let user = users::create_user(&state.db, req.name.trim(), &req.email, &req.password).await?;
    info!("Registered user {}", user.guid);

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            id: user.guid,
            name: user.name,
            email: user.email,
        }),
    ))
}

/// POST /api/auth/login
///
/// Sets the session cookie on success. Unknown email and wrong password
/// are indistinguishable to the caller.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    validate_credentials(None, &req.email, &req.password)?;

    let user = users::find_by_email(&state.db, &req.email)
        .await?
        .filter(|user| users::verify_password(user, &req.password))
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let timeout =
        setlist_common::db::get_setting_i64(&state.db, "session_timeout_seconds", 31536000)
            .await?;
    let token = sessions::create_session(&state.db, user.guid, timeout).await?;
    info!("User {} logged in", user.guid);

    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, timeout
    );

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(json!({
            "success": true,
            "user": UserResponse {
                id: user.guid,
                name: user.name,
                email: user.email,
            },
        })),
    ))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<impl IntoResponse> {
    sessions::delete_session(&state.db, &user.session_token).await?;

    let cookie = format!("{}=; Path=/; HttpOnly; Max-Age=0", SESSION_COOKIE);
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "success": true })),
    ))
}
