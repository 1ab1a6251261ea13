use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};

pub(crate) mod entity;
mod method;
mod middleware;
mod registry;

const DEFAULT_BASE_URL: &str = "https://api.github.com";
const DEFAULT_UPLOAD_URL: &str = "https://uploads.github.com";
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// How requests to GitHub get authenticated.
#[derive(Clone)]
pub enum Credentials {
    Token(String),
    Basic { username: String, password: String },
}

impl Credentials {
    /// Pick the credentials to use, the token taking precedence over a
    /// username and password pair. Empty values are ignored.
    pub fn resolve(
        token: Option<String>,
        username: Option<String>,
        password: Option<String>,
    ) -> Option<Self> {
        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());
        match (non_empty(token), non_empty(username), non_empty(password)) {
            (Some(token), _, _) => Some(Self::Token(token)),
            (None, Some(username), Some(password)) => Some(Self::Basic { username, password }),
            _ => None,
        }
    }

    fn authorize(&self, req: reqwest_middleware::RequestBuilder) -> reqwest_middleware::RequestBuilder {
        match self {
            Self::Token(token) => req.bearer_auth(token),
            Self::Basic { username, password } => req.basic_auth(username, Some(password)),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token(_) => f.write_str("Token(***)"),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .finish_non_exhaustive(),
        }
    }
}

#[derive(Debug)]
pub struct Config {
    base_url: Cow<'static, str>,
    upload_url: Cow<'static, str>,
    connect_timeout: Duration,
    credentials: Credentials,
}

impl Config {
    pub fn from_env() -> crate::error::Result<Self> {
        let credentials = Credentials::resolve(
            crate::maybe_env("GITHUB_TOKEN"),
            crate::maybe_env("GITHUB_USER"),
            crate::maybe_env("GITHUB_PASSWORD"),
        )
        .ok_or(crate::error::Error::Credential)?;
        Ok(Self {
            base_url: crate::with_env_or("GITHUB_BASE_URL", DEFAULT_BASE_URL),
            upload_url: crate::with_env_or("GITHUB_UPLOAD_URL", DEFAULT_UPLOAD_URL),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            credentials,
        })
    }

    pub fn new(credentials: Credentials) -> Self {
        Self {
            base_url: Cow::Borrowed(DEFAULT_BASE_URL),
            upload_url: Cow::Borrowed(DEFAULT_UPLOAD_URL),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            credentials,
        }
    }

    pub fn with_base_url(mut self, value: impl Into<String>) -> Self {
        self.base_url = Cow::Owned(value.into());
        self
    }

    pub fn with_upload_url(mut self, value: impl Into<String>) -> Self {
        self.upload_url = Cow::Owned(value.into());
        self
    }

    /// Only establishing the connection is bounded, a slow upload may take as
    /// long as it needs.
    pub fn with_connect_timeout(mut self, value: Duration) -> Self {
        self.connect_timeout = value;
        self
    }

    pub fn build(self) -> anyhow::Result<Client> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Accept",
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert("User-Agent", HeaderValue::from_static("shipbot"));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(self.connect_timeout)
            .tcp_keepalive(Duration::from_secs(30))
            .build()?;
        // no retry layer, a failed call fails the whole run
        let inner = reqwest_middleware::ClientBuilder::new(client)
            .with(middleware::TracingMiddleware)
            .build();
        Ok(Client {
            base_url: Arc::from(self.base_url.trim_end_matches('/')),
            upload_url: Arc::from(self.upload_url.trim_end_matches('/')),
            credentials: Arc::new(self.credentials),
            inner,
        })
    }
}

/// GitHub Releases API client.
#[derive(Clone, Debug)]
pub struct Client {
    base_url: Arc<str>,
    upload_url: Arc<str>,
    credentials: Arc<Credentials>,
    inner: reqwest_middleware::ClientWithMiddleware,
}

impl Client {
    fn request(&self, method: reqwest::Method, url: &str) -> reqwest_middleware::RequestBuilder {
        self.credentials.authorize(self.inner.request(method, url))
    }
}
