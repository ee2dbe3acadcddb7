pub mod cli;
pub mod client;
pub mod config;
pub mod models;
pub mod session;
pub mod views;

pub use client::{ApiClient, CatalogApi, ClientError};
pub use config::Config;
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore};

use std::sync::Arc;

/// Session store and API client wired together from configuration.
pub struct AppState {
    pub config: Config,
    pub session: Arc<dyn SessionStore>,
    pub api: Arc<dyn CatalogApi>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let session: Arc<dyn SessionStore> =
            Arc::new(FileSessionStore::new(config.session.path.clone()));
        let api = ApiClient::new(&config.api.url, config.api.timeout(), session.clone())?;
        Ok(Self {
            config,
            session,
            api: Arc::new(api),
        })
    }

    pub fn shell(&self) -> views::Shell {
        views::Shell::new(self.api.clone(), self.session.clone())
    }

    pub fn movie_list(&self) -> views::MovieListView {
        views::MovieListView::new(self.api.clone())
    }

    pub fn profile(&self) -> views::ProfileView {
        views::ProfileView::new(self.api.clone(), self.session.clone())
    }
}
