use std::sync::Arc;
use tracing::{info, warn};

use super::{notice, Route};
use crate::client::{ApiResult, CatalogApi};
use crate::models::{User, UserDetails};
use crate::session::SessionStore;

/// The profile page: the fetched user plus an editable working copy.
pub struct ProfileView {
    api: Arc<dyn CatalogApi>,
    session: Arc<dyn SessionStore>,
    user: Option<User>,
    /// Fields the user is editing; submitted as-is by [`ProfileView::update`]
    pub draft: UserDetails,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileUpdate {
    /// Saved; the session is still valid
    Updated { user: User, notice: &'static str },
    /// Saved under a new username; the stored session was cleared
    ReloginRequired {
        user: User,
        notice: &'static str,
        route: Route,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileDelete {
    /// The user declined the confirmation prompt
    Cancelled,
    Deleted { notice: &'static str, route: Route },
}

impl ProfileView {
    pub fn new(api: Arc<dyn CatalogApi>, session: Arc<dyn SessionStore>) -> Self {
        Self {
            api,
            session,
            user: None,
            draft: UserDetails::default(),
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Fetch the current user and seed the working copy from it. The
    /// password field starts blank.
    pub async fn load(&mut self) -> ApiResult<&User> {
        let user = self.api.current_user().await?;
        self.draft = UserDetails::from_user(&user);
        Ok(&*self.user.insert(user))
    }

    /// Submit the working copy.
    ///
    /// The stored session is keyed by username, so a rename clears it and
    /// sends the user back to log in again.
    pub async fn update(&mut self) -> ApiResult<ProfileUpdate> {
        if self.user.is_none() {
            self.load().await?;
        }
        let previous = self
            .user
            .as_ref()
            .map(|u| u.username.clone())
            .unwrap_or_default();

        let updated = self.api.edit_user(&self.draft).await?;
        self.user = Some(updated.clone());
        self.draft = UserDetails::from_user(&updated);

        if updated.username != previous {
            info!(from = %previous, to = %updated.username, "Username changed, session cleared");
            self.clear_session();
            return Ok(ProfileUpdate::ReloginRequired {
                user: updated,
                notice: notice::RELOGIN_REQUIRED,
                route: Route::Welcome,
            });
        }

        info!(user = %updated.username, "Profile updated");
        Ok(ProfileUpdate::Updated {
            user: updated,
            notice: notice::PROFILE_UPDATED,
        })
    }

    /// Delete the account after the user confirms.
    ///
    /// `confirm` receives the warning text and returns whether to proceed.
    /// Navigation happens only after the server confirms the deletion; on
    /// failure the session is left intact.
    pub async fn delete<F>(&mut self, confirm: F) -> ApiResult<ProfileDelete>
    where
        F: FnOnce(&str) -> bool,
    {
        if !confirm(notice::DELETE_CONFIRMATION) {
            return Ok(ProfileDelete::Cancelled);
        }

        let message = self.api.delete_user().await?;
        info!(response = %message.trim(), "Account deleted");
        self.user = None;
        self.draft = UserDetails::default();
        self.clear_session();

        Ok(ProfileDelete::Deleted {
            notice: notice::ACCOUNT_DELETED,
            route: Route::Welcome,
        })
    }

    /// The server change already happened, so a store failure is only logged.
    fn clear_session(&self) {
        if let Err(e) = self.session.clear() {
            warn!(error = %format!("{:#}", e), "Failed to clear session");
        }
    }
}
