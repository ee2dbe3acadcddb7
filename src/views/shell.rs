use std::sync::Arc;
use tracing::info;

use super::Route;
use crate::client::{ApiResult, CatalogApi, ClientError};
use crate::models::{Credentials, User, UserDetails};
use crate::session::{Session, SessionStore};

/// Top-level frame: welcome dialogs, navigation and logout.
pub struct Shell {
    api: Arc<dyn CatalogApi>,
    session: Arc<dyn SessionStore>,
}

impl Shell {
    pub fn new(api: Arc<dyn CatalogApi>, session: Arc<dyn SessionStore>) -> Self {
        Self { api, session }
    }

    /// Authenticated-only navigation is shown whenever a session exists.
    pub fn navigation_visible(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Username of the current session
    pub fn current_user(&self) -> Option<String> {
        self.session.load().ok().flatten().map(|s| s.username)
    }

    /// Where a fresh start should land
    pub fn start_route(&self) -> Route {
        if self.navigation_visible() {
            Route::Movies
        } else {
            Route::Welcome
        }
    }

    /// Create an account. Registration does not log the user in.
    pub async fn register(&self, details: &UserDetails) -> ApiResult<User> {
        let user = self.api.register(details).await?;
        info!(user = %user.username, "Registered");
        Ok(user)
    }

    /// Log in and store the returned credential.
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<Route> {
        let response = self.api.login(credentials).await?;
        let session = Session::new(response.user.username, response.token);
        self.session
            .save(&session)
            .map_err(|e| ClientError::Session(format!("{:#}", e)))?;
        info!(user = %session.username, "Logged in");
        Ok(Route::Movies)
    }

    /// Forget everything in the session store.
    pub fn logout(&self) -> anyhow::Result<Route> {
        self.session.clear()?;
        info!("Logged out");
        Ok(Route::Welcome)
    }
}
