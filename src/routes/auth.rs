use axum::Json;
use axum::extract::State;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::{Deserialize, Serialize};

use crate::auth::extractor::{ACCESS_COOKIE, AuthUser};
use crate::auth::jwt::{Claims, encode_token};
use crate::auth::password::{self, MIN_PASSWORD_LEN};
use crate::config::RegistrationMode;
use crate::db;
use crate::db::users::ProfileUpdate;
use crate::error::{AppError, conflict_on_unique};
use crate::import::sheet::{clean_cedula, is_valid_cedula};
use crate::models::{Role, User};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub cedula: String,
    pub nombre: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub cedula: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: User,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn auth_cookie(access_token: &str, ttl_minutes: i64) -> CookieJar {
    let access = Cookie::build((ACCESS_COOKIE, access_token.to_string()))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(ttl_minutes))
        .build();
    CookieJar::new().add(access)
}

fn clear_auth_cookie() -> CookieJar {
    let access = Cookie::build((ACCESS_COOKIE, ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .build();
    CookieJar::new().add(access)
}

fn issue(state: &SharedState, user: User) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let ttl = state.config.token_ttl_minutes;
    let claims = Claims::new(user.id, user.role, ttl);
    let access_token =
        encode_token(&claims, &state.config.jwt_secret).map_err(AppError::Internal)?;

    Ok((
        auth_cookie(&access_token, ttl),
        Json(AuthResponse { access_token, user }),
    ))
}

pub async fn register(
    State(state): State<SharedState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let cedula = clean_cedula(&req.cedula);
    let nombre = req.nombre.trim();
    if cedula.is_empty() || nombre.is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    }
    if !is_valid_cedula(&cedula) {
        return Err(AppError::BadRequest("Invalid cedula".to_string()));
    }
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let pw_hash = password::hash(&req.password).map_err(AppError::Internal)?;
    let email = state.config.email_for(&cedula);

    // Advisory lock so two concurrent first registrations cannot both become admin
    let mut tx = state.pool.begin().await?;
    sqlx::query("SELECT pg_advisory_xact_lock(1)")
        .execute(&mut *tx)
        .await?;

    let role = if db::users::count_all(&mut *tx).await? == 0 {
        Role::Admin
    } else if state.config.registration == RegistrationMode::Open {
        Role::User
    } else {
        return Err(AppError::Forbidden(
            "Registration is disabled. Contact your HR administrator.".to_string(),
        ));
    };

    let profile = ProfileUpdate {
        name: nombre.to_string(),
        position: None,
        contact_email: None,
        birth_date: None,
        hire_date: None,
        extra: serde_json::json!({}),
    };

    // An HR import resets the password of a self-registered employee
    let self_registered = role == Role::User;
    let user = db::users::create(
        &mut *tx,
        &cedula,
        &email,
        &pw_hash,
        role,
        self_registered,
        &profile,
    )
    .await
        .map_err(|e| conflict_on_unique(e, "An account with this cedula already exists"))?;

    tx.commit().await?;

    tracing::info!("Registered user {} with role {}", user.id, user.role);

    issue(&state, user)
}

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let cedula = clean_cedula(&req.cedula);

    if state.login_limiter.check(&cedula).is_err() {
        return Err(AppError::RateLimited(
            "Too many login attempts. Please try again later.".to_string(),
        ));
    }

    let user = db::users::find_by_cedula(&state.pool, &cedula)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    let valid = password::verify(&req.password, &user.password_hash).map_err(AppError::Internal)?;
    if !valid {
        state.login_limiter.record_failure(&cedula);
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }
    state.login_limiter.clear(&cedula);

    tracing::debug!("User {} logged in", user.id);

    issue(&state, user)
}

pub async fn logout() -> (CookieJar, Json<MessageResponse>) {
    (
        clear_auth_cookie(),
        Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
    )
}

pub async fn me(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<User>, AppError> {
    let user = db::users::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;
    Ok(Json(user))
}

pub async fn change_password(
    State(state): State<SharedState>,
    auth: AuthUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    if req.new_password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let user = db::users::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    let valid = password::verify(&req.current_password, &user.password_hash)
        .map_err(AppError::Internal)?;
    if !valid {
        return Err(AppError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    let pw_hash = password::hash(&req.new_password).map_err(AppError::Internal)?;
    db::users::update_password(&state.pool, user.id, &pw_hash).await?;

    tracing::info!("User {} changed their password", user.id);

    issue(&state, user)
}
