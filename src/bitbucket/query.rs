use crate::config::Credentials;
use reqwest::StatusCode;
use serde_json::Value;
use std::future::Future;
use thiserror::Error;

/// Bitbucket REST API 1.0 root.
pub const API_BASE_URL: &str = "https://bitbucket.org/api/1.0";

const USER_AGENT: &str = "bb-issues";

/// The two queries the report needs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Query {
    /// Repositories owned by the authenticated user.
    Repository,
    /// Issues of a single repository.
    Issues { owner: String, slug: String },
}

impl Query {
    /// Builds the request URL by filling the query's template below `api_base`.
    pub fn url(&self, api_base: &str) -> String {
        let base = api_base.trim_end_matches('/');
        match self {
            Query::Repository => format!("{base}/user/repositories/"),
            Query::Issues { owner, slug } => {
                format!("{base}/repositories/{owner}/{slug}/issues/")
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Not found: {url}")]
    NotFound { url: String },

    #[error("HTTP {status} from {url}")]
    Http { url: String, status: StatusCode },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Something that can answer a [`Query`] with a JSON document.
pub trait QueryRunner {
    fn run_query(&self, query: &Query) -> impl Future<Output = Result<Value, QueryError>>;
}

/// Maps a response status to the query outcome.
///
/// * `Ok(())` for any 2xx status.
/// * `Err(QueryError::NotFound)` for 404.
/// * `Err(QueryError::Http)` for everything else.
pub fn check_status(url: &str, status: StatusCode) -> Result<(), QueryError> {
    if status.is_success() {
        Ok(())
    } else if status == StatusCode::NOT_FOUND {
        Err(QueryError::NotFound {
            url: url.to_string(),
        })
    } else {
        Err(QueryError::Http {
            url: url.to_string(),
            status,
        })
    }
}

/// Runs queries against the Bitbucket API over HTTPS with basic authentication.
pub struct HttpQueryRunner {
    client: reqwest::Client,
    credentials: Credentials,
    api_base: String,
}

impl HttpQueryRunner {
    /// Builds the runner. No request timeout is set, a slow answer is waited for.
    pub fn new(credentials: Credentials) -> Result<Self, QueryError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(HttpQueryRunner {
            client,
            credentials,
            api_base: API_BASE_URL.to_string(),
        })
    }

    /// Points the runner at another API root.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

impl QueryRunner for HttpQueryRunner {
    async fn run_query(&self, query: &Query) -> Result<Value, QueryError> {
        let url = query.url(&self.api_base);
        let response = self
            .client
            .get(&url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(%url, %status, "query answered");
        check_status(&url, status)?;

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
