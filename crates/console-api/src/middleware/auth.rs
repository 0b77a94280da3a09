//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Bearer token authentication middleware

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use console_auth::JwtClaims;
use tracing::debug;

use super::utils::RequestContext;
use crate::{
    constants::{
        AUTH_HEADER_PREFIX, MSG_AUTHORIZATION_HEADER_REQUIRED,
        MSG_INVALID_AUTHORIZATION_HEADER_FORMAT, MSG_INVALID_TOKEN,
    },
    error::{unauthorized, ApiError},
    rest::AppState,
};

/// Raw bearer token of an authenticated request
#[derive(Debug, Clone)]
pub struct AuthToken(pub String);

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    match authenticate(&state, request).await {
        Ok(request) => next.run(request).await,
        Err(e) => e.into_response(),
    }
}

async fn authenticate(state: &AppState, mut request: Request) -> Result<Request, ApiError> {
    let token = bearer_token(request.headers())?;

    let claims: JwtClaims = state.auth.validate(&token).await.map_err(|e| {
        debug!("Rejected bearer token: {}", e);
        unauthorized(MSG_INVALID_TOKEN)
    })?;

    if let Some(context) = request.extensions_mut().get_mut::<RequestContext>() {
        context.user_id = Some(claims.user_id.clone());
        context
            .metadata
            .insert("username".to_string(), claims.username.clone());
    }

    request.extensions_mut().insert(claims);
    request.extensions_mut().insert(AuthToken(token));
    Ok(request)
}

/// Extract the token from `Authorization: Bearer <token>`
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .filter(|h| !h.is_empty())
        .ok_or_else(|| unauthorized(MSG_AUTHORIZATION_HEADER_REQUIRED))?;

    match header.strip_prefix(AUTH_HEADER_PREFIX) {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(unauthorized(MSG_INVALID_AUTHORIZATION_HEADER_FORMAT)),
    }
}
