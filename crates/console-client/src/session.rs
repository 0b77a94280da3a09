//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Authenticated session state
//!
//! Holds the current user and bearer token, mirrors them into a
//! [`TokenStore`] and keeps the shared [`ConsoleClient`] authorized.

use console_auth::User;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::{
    client::ConsoleClient,
    constants::*,
    error::{ClientError, ClientResult},
    store::TokenStore,
    types::ActionOutcome,
};

#[derive(Debug, Clone)]
struct SessionState {
    user: Option<User>,
    token: Option<String>,
    loading: bool,
}

/// Session context shared by everything acting on behalf of the user
#[derive(Clone)]
pub struct SessionContext {
    client: ConsoleClient,
    store: Arc<dyn TokenStore>,
    state: Arc<RwLock<SessionState>>,
}

impl SessionContext {
    /// Create a session in the loading state; call [`restore`](Self::restore) next
    pub fn new(client: ConsoleClient, store: Arc<dyn TokenStore>) -> Self {
        Self {
            client,
            store,
            state: Arc::new(RwLock::new(SessionState {
                user: None,
                token: None,
                loading: true,
            })),
        }
    }

    pub fn client(&self) -> &ConsoleClient {
        &self.client
    }

    /// Resume a stored session, keeping it only if the server still accepts the token
    pub async fn restore(&self) -> ClientResult<bool> {
        let token = self.store.get(STORAGE_KEY_TOKEN).await?;
        let user = self.store.get(STORAGE_KEY_USER).await?;

        let (token, user) = match (token, user) {
            (Some(token), Some(user)) => (token, user),
            _ => {
                self.state.write().await.loading = false;
                return Ok(false);
            }
        };

        let user: User = match serde_json::from_str(&user) {
            Ok(user) => user,
            Err(e) => {
                warn!("Discarding stored session with unreadable user: {}", e);
                self.logout().await;
                return Ok(false);
            }
        };

        self.client.set_token(Some(token.clone())).await;
        {
            let mut state = self.state.write().await;
            state.token = Some(token);
            state.user = Some(user);
        }

        match self.client.get_profile().await {
            Ok(user) => {
                self.store_user(&user).await;
                let mut state = self.state.write().await;
                state.user = Some(user);
                state.loading = false;
                info!("Restored session");
                Ok(true)
            }
            Err(e) => {
                warn!("Stored session rejected: {}", e);
                self.logout().await;
                Ok(false)
            }
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> ActionOutcome {
        match self.client.login(username, password).await {
            Ok(response) => {
                self.begin(response.token, response.user).await;
                ActionOutcome::ok()
            }
            Err(e) => ActionOutcome::failed(failure_message(&e, MSG_LOGIN_FAILED)),
        }
    }

    pub async fn signup(&self, username: &str, email: &str, password: &str) -> ActionOutcome {
        match self.client.register(username, email, password).await {
            Ok(response) => {
                self.begin(response.token, response.user).await;
                ActionOutcome::ok()
            }
            Err(e) => ActionOutcome::failed(failure_message(&e, MSG_REGISTRATION_FAILED)),
        }
    }

    /// Revoke the token on the server when possible and forget the session
    pub async fn logout(&self) {
        if self.client.token().await.is_some() {
            if let Err(e) = self.client.logout().await {
                debug!("Server logout failed: {}", e);
            }
        }

        self.client.set_token(None).await;
        {
            let mut state = self.state.write().await;
            state.token = None;
            state.user = None;
            state.loading = false;
        }

        for key in [STORAGE_KEY_TOKEN, STORAGE_KEY_USER] {
            if let Err(e) = self.store.remove(key).await {
                warn!("Failed to clear {} from session store: {}", key, e);
            }
        }
        info!("Logged out");
    }

    /// Refresh the user from the server, ending the session if it was rejected
    pub async fn get_profile(&self) -> Option<User> {
        if self.token().await.is_none() {
            return None;
        }

        match self.client.get_profile().await {
            Ok(user) => {
                self.store_user(&user).await;
                self.state.write().await.user = Some(user.clone());
                Some(user)
            }
            Err(e) => {
                warn!("Error fetching profile: {}", e);
                self.logout().await;
                None
            }
        }
    }

    pub async fn change_password(&self, current_password: &str, new_password: &str) -> ActionOutcome {
        if self.token().await.is_none() {
            return ActionOutcome::failed(MSG_NOT_AUTHENTICATED);
        }

        match self.client.change_password(current_password, new_password).await {
            Ok(user) => {
                self.store_user(&user).await;
                self.state.write().await.user = Some(user);
                ActionOutcome::ok()
            }
            Err(e) => ActionOutcome::failed(failure_message(&e, MSG_CHANGE_PASSWORD_FAILED)),
        }
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.token.is_some()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub async fn user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    pub async fn token(&self) -> Option<String> {
        self.state.read().await.token.clone()
    }

    /// `Authorization` header for the session, empty when logged out
    pub async fn auth_header(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(token) = self.token().await {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, value);
            }
        }
        headers
    }

    async fn begin(&self, token: String, user: User) {
        self.client.set_token(Some(token.clone())).await;

        if let Err(e) = self.store.set(STORAGE_KEY_TOKEN, &token).await {
            warn!("Failed to persist session token: {}", e);
        }
        self.store_user(&user).await;

        info!("Session started for {}", user.username);
        let mut state = self.state.write().await;
        state.token = Some(token);
        state.user = Some(user);
        state.loading = false;
    }

    async fn store_user(&self, user: &User) {
        let result = match serde_json::to_string(user) {
            Ok(json) => self.store.set(STORAGE_KEY_USER, &json).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            warn!("Failed to persist session user: {}", e);
        }
    }
}

fn failure_message(err: &ClientError, fallback: &str) -> String {
    let message = err.message();
    if message.is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
