//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Registration, login and session handlers

use axum::extract::{rejection::JsonRejection, Extension, Json, State};
use console_auth::{AuthError, AuthResponse, JwtClaims, User};
use tracing::info;

use super::json_body;
use crate::{
    constants::*,
    error::{unauthorized, validation_error, ApiResult},
    middleware::{sanitize_string, AuthToken},
    rest::AppState,
    types::{ApiResponse, ChangePasswordRequest, LoginRequest, RegisterRequest},
};

const MIN_USERNAME_LEN: usize = 3;
const MAX_USERNAME_LEN: usize = 50;

/// Register a new account
pub async fn register_handler(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<ApiResponse<AuthResponse>> {
    let request = json_body(body, MSG_INVALID_REQUEST_DATA)?;
    let username = sanitize_string(request.username.trim());
    let email = sanitize_string(request.email.trim());

    if username.is_empty() {
        return Err(validation_error(MSG_USERNAME_REQUIRED));
    }
    if request.password.is_empty() {
        return Err(validation_error(MSG_PASSWORD_REQUIRED));
    }
    if email.is_empty() {
        return Err(validation_error(MSG_EMAIL_REQUIRED));
    }

    let username_len = username.chars().count();
    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&username_len) {
        return Err(validation_error(MSG_USERNAME_LENGTH));
    }
    if !is_valid_email(&email) {
        return Err(validation_error(MSG_INVALID_EMAIL));
    }
    if request.password.chars().count() < console_auth::DEFAULT_MIN_PASSWORD_LENGTH {
        return Err(validation_error(MSG_PASSWORD_MIN_LENGTH));
    }

    let response = state.auth.register(&username, &email, &request.password).await?;
    info!("User registered: {}", response.user.username);
    Ok(ApiResponse::success(response, MSG_USER_REGISTERED))
}

/// Log in with username and password
pub async fn login_handler(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<ApiResponse<AuthResponse>> {
    let request = json_body(body, MSG_INVALID_REQUEST_DATA)?;

    if request.username.is_empty() {
        return Err(validation_error(MSG_USERNAME_REQUIRED));
    }
    if request.password.is_empty() {
        return Err(validation_error(MSG_PASSWORD_REQUIRED));
    }

    let response = state.auth.login(&request.username, &request.password).await?;
    Ok(ApiResponse::success(response, MSG_LOGIN_SUCCESSFUL))
}

/// Current user's profile
pub async fn profile_handler(
    State(state): State<AppState>,
    claims: Option<Extension<JwtClaims>>,
) -> ApiResult<ApiResponse<User>> {
    let claims = current_claims(claims)?;
    let user = state.auth.profile(&claims.user_id).await?;
    Ok(ApiResponse::success(user, MSG_PROFILE_FETCHED))
}

/// Change the current user's password
pub async fn change_password_handler(
    State(state): State<AppState>,
    claims: Option<Extension<JwtClaims>>,
    body: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> ApiResult<ApiResponse<User>> {
    let claims = current_claims(claims)?;
    let request = json_body(body, MSG_INVALID_REQUEST_DATA)?;

    if request.current_password.is_empty() {
        return Err(validation_error(MSG_CURRENT_PASSWORD_REQUIRED));
    }
    if request.new_password.is_empty() {
        return Err(validation_error(MSG_NEW_PASSWORD_REQUIRED));
    }
    if request.new_password.chars().count() < console_auth::DEFAULT_MIN_PASSWORD_LENGTH {
        return Err(validation_error(MSG_NEW_PASSWORD_MIN_LENGTH));
    }

    let user = state
        .auth
        .change_password(&claims.user_id, &request.current_password, &request.new_password)
        .await
        .map_err(|e| match e {
            // A wrong current password is a form error, not a session failure
            AuthError::InvalidCredentials(msg) => validation_error(msg),
            other => other.into(),
        })?;

    Ok(ApiResponse::success(user, MSG_PASSWORD_CHANGED))
}

/// Revoke the bearer token used for this request
pub async fn logout_handler(
    State(state): State<AppState>,
    token: Option<Extension<AuthToken>>,
) -> ApiResult<ApiResponse<()>> {
    let Extension(AuthToken(token)) = token.ok_or_else(|| unauthorized(MSG_INVALID_TOKEN))?;
    state.auth.logout(&token).await?;
    Ok(ApiResponse::success((), MSG_LOGGED_OUT))
}

fn current_claims(claims: Option<Extension<JwtClaims>>) -> ApiResult<JwtClaims> {
    claims
        .map(|Extension(claims)| claims)
        .filter(|claims| !claims.user_id.is_empty())
        .ok_or_else(|| unauthorized(MSG_USER_ID_NOT_FOUND_IN_TOKEN))
}

/// `local@domain.tld` with no whitespace
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .map(|(name, tld)| !name.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
                    .unwrap_or(false)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("admin@kafka-ui.com"));
        assert!(is_valid_email("first.last@mail.example.org"));
        assert!(!is_valid_email("admin"));
        assert!(!is_valid_email("@kafka-ui.com"));
        assert!(!is_valid_email("admin@localhost"));
        assert!(!is_valid_email("a@b@c.com"));
        assert!(!is_valid_email("ad min@kafka-ui.com"));
    }
}
