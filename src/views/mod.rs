//! Screen-level state: what each page holds and how it talks to the API.
//!
//! Views never patch server data locally. After a mutation they fetch again.

pub mod movies;
pub mod profile;
pub mod shell;

#[cfg(test)]
pub(crate) mod fake;

pub use movies::{FavoriteChange, MovieListView};
pub use profile::{ProfileDelete, ProfileUpdate, ProfileView};
pub use shell::Shell;

/// Pages the client can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Unauthenticated entry point with login and registration
    Welcome,
    Movies,
    Profile,
}

/// Short user-facing messages shown after an action.
pub mod notice {
    pub const REGISTERED: &str = "User registration successful, please log in";
    pub const LOGGED_IN: &str = "User login successful";
    pub const PROFILE_UPDATED: &str = "User profile successfully updated";
    pub const RELOGIN_REQUIRED: &str =
        "User profile successfully updated. Please login using your new credentials";
    pub const DELETE_CONFIRMATION: &str = "All your data will be lost - this cannot be undone!";
    pub const ACCOUNT_DELETED: &str =
        "You have successfully deleted your account - we are sorry to see you go!";
}
