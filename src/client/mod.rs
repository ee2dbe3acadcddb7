//! HTTP access to the myFlix API.
//!
//! [`CatalogApi`] has one method per server operation. [`ApiClient`] is the
//! `reqwest` implementation; it reads the session from its [`SessionStore`]
//! on every call so a request always carries the latest credential.

mod error;

pub use error::{ClientError, ErrorKind, GENERIC_ERROR_MESSAGE};

use anyhow::{Context, Result as AnyResult};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::models::{Credentials, Director, Genre, LoginResponse, Movie, User, UserDetails};
use crate::session::{Session, SessionStore};

pub type ApiResult<T> = Result<T, ClientError>;

#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// POST /users
    async fn register(&self, details: &UserDetails) -> ApiResult<User>;

    /// POST /login
    async fn login(&self, credentials: &Credentials) -> ApiResult<LoginResponse>;

    /// GET /movies
    async fn movies(&self) -> ApiResult<Vec<Movie>>;

    /// GET /movies/{title}
    async fn movie(&self, title: &str) -> ApiResult<Movie>;

    /// GET /movies/directors/{name}
    async fn director(&self, name: &str) -> ApiResult<Director>;

    /// GET /movies/genre/{name}
    async fn genre(&self, name: &str) -> ApiResult<Genre>;

    /// GET /users/{username} for the session's user
    async fn current_user(&self) -> ApiResult<User>;

    /// Favorite movie ids of the session's user
    async fn favorites(&self) -> ApiResult<Vec<String>> {
        Ok(self.current_user().await?.favorite_movies)
    }

    /// POST /users/{username}/movies/{movie_id}
    async fn add_favorite(&self, movie_id: &str) -> ApiResult<User>;

    /// DELETE /users/{username}/movies/{movie_id}
    async fn remove_favorite(&self, movie_id: &str) -> ApiResult<User>;

    /// PUT /users/{username}
    async fn edit_user(&self, details: &UserDetails) -> ApiResult<User>;

    /// DELETE /users/{username}; returns the server's confirmation text
    async fn delete_user(&self) -> ApiResult<String>;
}

pub struct ApiClient {
    http: Client,
    base_url: Url,
    session: Arc<dyn SessionStore>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        timeout: Option<Duration>,
        session: Arc<dyn SessionStore>,
    ) -> AnyResult<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid API URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Invalid API URL: {}", base_url);
        }

        let mut builder =
            Client::builder().user_agent(concat!("myflix/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL with the given path segments appended, each percent-encoded.
    ///
    /// URL normalization would silently drop `.` and `..` and an empty
    /// segment would address the parent collection, so those are rejected.
    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        if let Some(bad) = segments.iter().find(|s| is_dot_or_empty(s)) {
            return Err(ClientError::InvalidPath(bad.to_string()));
        }
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(method = %method, path = %url.path(), "Sending request");
        self.http.request(method, url)
    }

    fn current_session(&self) -> ApiResult<Session> {
        match self.session.load() {
            Ok(Some(session)) => Ok(session),
            Ok(None) => Err(ClientError::NoSession),
            Err(e) => Err(ClientError::Session(format!("{:#}", e))),
        }
    }

    /// Build a request carrying the session's bearer token.
    fn authed(&self, method: Method, segments: &[&str]) -> ApiResult<RequestBuilder> {
        let session = self.current_session()?;
        self.bearer(method, &session, segments)
    }

    /// Like [`authed`](Self::authed), under `/users/{username}` for the
    /// session's user. `rest` is appended after the username.
    fn authed_user(&self, method: Method, rest: &[&str]) -> ApiResult<RequestBuilder> {
        let session = self.current_session()?;
        let mut segments = vec!["users", session.username.as_str()];
        segments.extend_from_slice(rest);
        self.bearer(method, &session, &segments)
    }

    fn bearer(
        &self,
        method: Method,
        session: &Session,
        segments: &[&str],
    ) -> ApiResult<RequestBuilder> {
        let url = self.endpoint(segments)?;
        Ok(self.request(method, url).bearer_auth(&session.token))
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: ApiResult<RequestBuilder>,
    ) -> ApiResult<T> {
        let result = match request {
            Ok(request) => match send(request).await {
                Ok(body) => decode_body(&body),
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };
        result.map_err(|e| {
            e.log(operation);
            e
        })
    }

    async fn execute_text(
        &self,
        operation: &str,
        request: ApiResult<RequestBuilder>,
    ) -> ApiResult<String> {
        let result = match request {
            Ok(request) => send(request)
                .await
                .map(|body| String::from_utf8_lossy(&body).into_owned()),
            Err(e) => Err(e),
        };
        result.map_err(|e| {
            e.log(operation);
            e
        })
    }
}

/// Tabs and newlines are stripped by the URL parser before it looks for dots.
fn is_dot_or_empty(segment: &str) -> bool {
    let visible: String = segment
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .collect();
    matches!(visible.as_str(), "" | "." | "..")
}

async fn send(request: RequestBuilder) -> ApiResult<Vec<u8>> {
    let response = request.send().await.map_err(ClientError::Transport)?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::Status { status, body });
    }
    let body = response.bytes().await.map_err(ClientError::Transport)?;
    Ok(body.to_vec())
}

/// Decode a response body. An empty or falsy body counts as `{}`.
fn decode_body<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    let value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(body).map_err(ClientError::Decode)?
    };
    let value = if is_falsy(&value) {
        Value::Object(Map::new())
    } else {
        value
    };
    serde_json::from_value(value).map_err(ClientError::Decode)
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

#[async_trait]
impl CatalogApi for ApiClient {
    async fn register(&self, details: &UserDetails) -> ApiResult<User> {
        let request = self
            .endpoint(&["users"])
            .map(|url| self.request(Method::POST, url).json(details));
        self.execute("register", request).await
    }

    async fn login(&self, credentials: &Credentials) -> ApiResult<LoginResponse> {
        let request = self
            .endpoint(&["login"])
            .map(|url| self.request(Method::POST, url).json(credentials));
        self.execute("login", request).await
    }

    async fn movies(&self) -> ApiResult<Vec<Movie>> {
        self.execute("list movies", self.authed(Method::GET, &["movies"]))
            .await
    }

    async fn movie(&self, title: &str) -> ApiResult<Movie> {
        self.execute("get movie", self.authed(Method::GET, &["movies", title]))
            .await
    }

    async fn director(&self, name: &str) -> ApiResult<Director> {
        let request = self.authed(Method::GET, &["movies", "directors", name]);
        self.execute("get director", request).await
    }

    async fn genre(&self, name: &str) -> ApiResult<Genre> {
        let request = self.authed(Method::GET, &["movies", "genre", name]);
        self.execute("get genre", request).await
    }

    async fn current_user(&self) -> ApiResult<User> {
        self.execute("get user", self.authed_user(Method::GET, &[]))
            .await
    }

    async fn add_favorite(&self, movie_id: &str) -> ApiResult<User> {
        let request = self
            .authed_user(Method::POST, &["movies", movie_id])
            .map(|r| r.json(&json!({ "FavoriteMovie": movie_id })));
        self.execute("add favorite", request).await
    }

    async fn remove_favorite(&self, movie_id: &str) -> ApiResult<User> {
        let request = self.authed_user(Method::DELETE, &["movies", movie_id]);
        self.execute("remove favorite", request).await
    }

    async fn edit_user(&self, details: &UserDetails) -> ApiResult<User> {
        let request = self
            .authed_user(Method::PUT, &[])
            .map(|r| r.json(details));
        self.execute("edit user", request).await
    }

    async fn delete_user(&self) -> ApiResult<String> {
        let request = self.authed_user(Method::DELETE, &[]);
        self.execute_text("delete user", request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, None, Arc::new(MemorySessionStore::new())).unwrap()
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let api = client("http://localhost:8080");
        assert_eq!(
            api.endpoint(&["movies", "The Matrix"]).unwrap().as_str(),
            "http://localhost:8080/movies/The%20Matrix"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let api = client("http://localhost:8080/api/");
        assert_eq!(
            api.endpoint(&["movies", "genre", "Sci-Fi"]).unwrap().as_str(),
            "http://localhost:8080/api/movies/genre/Sci-Fi"
        );
    }

    #[test]
    fn test_dot_and_empty_segments_are_rejected() {
        let api = client("http://localhost:8080");
        for segment in ["..", ".", "", "\t..\n"] {
            let err = api.endpoint(&["movies", segment]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidPath, "{segment:?}");
            assert_eq!(err.to_string(), GENERIC_ERROR_MESSAGE);
        }
        // only whole-segment dots are special
        assert_eq!(
            api.endpoint(&["movies", "...", "%2e%2e"]).unwrap().as_str(),
            "http://localhost:8080/movies/.../%252e%252e"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
        assert!(ApiClient::new("not a url", None, store.clone()).is_err());
        assert!(ApiClient::new("mailto:someone@example.com", None, store).is_err());
    }

    #[test]
    fn test_falsy_bodies_become_empty_records() {
        #[derive(serde::Deserialize)]
        struct Anything {}

        for body in ["", "  ", "null", "false", "0", "\"\""] {
            assert!(decode_body::<Anything>(body.as_bytes()).is_ok(), "{body}");
        }
        let value: Value = decode_body(b"null").unwrap();
        assert_eq!(value, json!({}));
    }

    #[test]
    fn test_truthy_body_is_passed_through() {
        let value: Value = decode_body(br#"["m1","m2"]"#).unwrap();
        assert_eq!(value, json!(["m1", "m2"]));
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let err = decode_body::<Vec<Movie>>(b"{not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[tokio::test]
    async fn test_authenticated_call_without_session_fails_locally() {
        // nothing listens on port 9; the call must fail before any I/O
        let api = client("http://127.0.0.1:9");
        let err = api.movies().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoSession);
        assert_eq!(err.to_string(), GENERIC_ERROR_MESSAGE);
    }
}
