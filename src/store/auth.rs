use tracing::info;

use super::{Store, StoreError, StoreResult};
use crate::client::{AuthResponse, SignInRequest, SignUpRequest};
use crate::models::User;
use crate::session::Session;

impl Store {
    pub async fn sign_in(&mut self, email: &str, password: &str) -> StoreResult<User> {
        self.begin();
        let request = SignInRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = self.client.sign_in(&request).await.map_err(StoreError::from);
        let result = match result {
            Ok(auth) => self.start_session(auth),
            Err(e) => Err(e),
        };
        self.finish(result)
    }

    pub async fn sign_up(&mut self, name: &str, email: &str, password: &str) -> StoreResult<User> {
        self.begin();
        let request = SignUpRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = self.client.sign_up(&request).await.map_err(StoreError::from);
        let result = match result {
            Ok(auth) => self.start_session(auth),
            Err(e) => Err(e),
        };
        self.finish(result)
    }

    pub async fn load_profile(&mut self) -> StoreResult<User> {
        self.begin();
        let result = self.client.fetch_profile().await.map_err(StoreError::from);
        if let Ok(user) = &result {
            let user = user.clone();
            self.commit(|state| {
                state.auth.user = Some(user);
                state.auth.is_authenticated = true;
            });
        }
        self.finish(result)
    }

    /// Picks up a token saved by an earlier run. Returns whether one was found.
    pub fn restore_session(&mut self) -> StoreResult<bool> {
        let Some(file) = &self.session else {
            return Ok(false);
        };
        let Some(session) = file.load()? else {
            return Ok(false);
        };
        self.client.set_token(Some(session.token));
        self.commit(|state| {
            state.auth.user = session.user;
            state.auth.is_authenticated = true;
            state.ui.sign_in_required = false;
        });
        Ok(true)
    }

    pub fn sign_out(&mut self) {
        info!("Signing out");
        self.end_session();
        self.commit(|state| {
            state.clear_user_data();
            state.ui = Default::default();
        });
    }

    fn start_session(&mut self, auth: AuthResponse) -> StoreResult<User> {
        let AuthResponse { token, user } = auth;
        if let Some(file) = &self.session {
            file.save(&Session {
                token: token.clone(),
                user: Some(user.clone()),
            })?;
        }
        self.client.set_token(Some(token));
        info!("Signed in as {}", user.email);
        let signed_in = user.clone();
        self.commit(|state| {
            state.clear_user_data();
            state.auth.user = Some(signed_in);
            state.auth.is_authenticated = true;
            state.ui.sign_in_required = false;
        });
        Ok(user)
    }
}
