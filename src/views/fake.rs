use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::StatusCode;
use tokio::sync::Notify;

use crate::client::{ApiResult, CatalogApi, ClientError};
use crate::models::{
    Credentials, Director, Genre, LoginResponse, Movie, User, UserDetails,
};

/// In-memory stand-in for the server that records every call.
#[derive(Default)]
pub struct FakeApi {
    pub state: Mutex<FakeState>,
    pub calls: Mutex<Vec<String>>,
    /// Signalled whenever `favorites` is called
    favorites_called: Notify,
}

#[derive(Default)]
pub struct FakeState {
    pub movies: Vec<Movie>,
    pub user: Option<User>,
    pub token: String,
    /// Operations that answer with 401
    pub failing: Vec<&'static str>,
    /// Username returned by the next edit, if it should differ from the draft
    pub rename_to: Option<String>,
    /// `movies` does not answer until `favorites` has been called
    pub hold_movies: bool,
}

pub fn movie(id: &str, name: &str) -> Movie {
    Movie {
        id: id.to_string(),
        name: name.to_string(),
        description: format!("{} synopsis", name),
        genre: Genre {
            name: "Drama".into(),
            description: "Serious stories".into(),
        },
        director: Director {
            name: "Jane Doe".into(),
            bio: "Director bio".into(),
            birth: Some("1970".into()),
            death: None,
        },
        image_path: None,
        featured: None,
    }
}

pub fn user(username: &str, favorites: &[&str]) -> User {
    User {
        id: Some("u1".into()),
        username: username.to_string(),
        password: Some("hash".into()),
        email: format!("{}@example.com", username),
        birthday: Some("1990-04-02T00:00:00.000Z".into()),
        favorite_movies: favorites.iter().map(|s| s.to_string()).collect(),
    }
}

impl FakeApi {
    pub fn new(movies: Vec<Movie>, user: User) -> Self {
        Self {
            state: Mutex::new(FakeState {
                movies,
                user: Some(user),
                token: "token-1".into(),
                ..Default::default()
            }),
            calls: Mutex::new(Vec::new()),
            favorites_called: Notify::new(),
        }
    }

    pub fn fail(&self, operation: &'static str) {
        self.state.lock().failing.push(operation);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, call: impl Into<String>, operation: &str) -> ApiResult<()> {
        self.calls.lock().push(call.into());
        if self.state.lock().failing.iter().any(|op| *op == operation) {
            return Err(ClientError::Status {
                status: StatusCode::UNAUTHORIZED,
                body: "Unauthorized".into(),
            });
        }
        Ok(())
    }

    fn with_user<T>(&self, f: impl FnOnce(&mut User) -> T) -> ApiResult<T> {
        let mut state = self.state.lock();
        match state.user.as_mut() {
            Some(user) => Ok(f(user)),
            None => Err(ClientError::Status {
                status: StatusCode::NOT_FOUND,
                body: "User not found".into(),
            }),
        }
    }
}

#[async_trait]
impl CatalogApi for FakeApi {
    async fn register(&self, details: &UserDetails) -> ApiResult<User> {
        self.record(format!("register {}", details.username), "register")?;
        Ok(user(&details.username, &[]))
    }

    async fn login(&self, credentials: &Credentials) -> ApiResult<LoginResponse> {
        self.record(format!("login {}", credentials.username), "login")?;
        let state = self.state.lock();
        let account = state
            .user
            .clone()
            .unwrap_or_else(|| user(&credentials.username, &[]));
        Ok(LoginResponse {
            user: account,
            token: state.token.clone(),
        })
    }

    async fn movies(&self) -> ApiResult<Vec<Movie>> {
        self.record("movies", "movies")?;
        let hold = self.state.lock().hold_movies;
        if hold {
            self.favorites_called.notified().await;
        }
        Ok(self.state.lock().movies.clone())
    }

    async fn movie(&self, title: &str) -> ApiResult<Movie> {
        self.record(format!("movie {}", title), "movie")?;
        self.state
            .lock()
            .movies
            .iter()
            .find(|m| m.name == title)
            .cloned()
            .ok_or(ClientError::Status {
                status: StatusCode::NOT_FOUND,
                body: String::new(),
            })
    }

    async fn director(&self, name: &str) -> ApiResult<Director> {
        self.record(format!("director {}", name), "director")?;
        Ok(movie("x", "x").director)
    }

    async fn genre(&self, name: &str) -> ApiResult<Genre> {
        self.record(format!("genre {}", name), "genre")?;
        Ok(movie("x", "x").genre)
    }

    async fn current_user(&self) -> ApiResult<User> {
        self.record("user", "user")?;
        self.with_user(|u| u.clone())
    }

    async fn favorites(&self) -> ApiResult<Vec<String>> {
        self.favorites_called.notify_one();
        self.record("favorites", "favorites")?;
        self.with_user(|u| u.favorite_movies.clone())
    }

    async fn add_favorite(&self, movie_id: &str) -> ApiResult<User> {
        self.record(format!("add {}", movie_id), "add")?;
        self.with_user(|u| {
            if !u.favorite_movies.iter().any(|m| m == movie_id) {
                u.favorite_movies.push(movie_id.to_string());
            }
            u.clone()
        })
    }

    async fn remove_favorite(&self, movie_id: &str) -> ApiResult<User> {
        self.record(format!("remove {}", movie_id), "remove")?;
        self.with_user(|u| {
            u.favorite_movies.retain(|m| m != movie_id);
            u.clone()
        })
    }

    async fn edit_user(&self, details: &UserDetails) -> ApiResult<User> {
        self.record(format!("edit {}", details.username), "edit")?;
        let rename = self.state.lock().rename_to.take();
        self.with_user(|u| {
            u.username = rename.unwrap_or_else(|| details.username.clone());
            u.email = details.email.clone();
            if let Some(birthday) = &details.birthday {
                u.birthday = Some(birthday.clone());
            }
            u.clone()
        })
    }

    async fn delete_user(&self) -> ApiResult<String> {
        self.record("delete", "delete")?;
        let mut state = self.state.lock();
        let name = state
            .user
            .take()
            .map(|u| u.username)
            .unwrap_or_default();
        Ok(format!("{} was deleted.", name))
    }
}
