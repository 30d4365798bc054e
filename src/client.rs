//! HTTP access to a tradition repository service.
//!
//! Every request is a plain `GET` against `{repository}/{tradition}/...`,
//! carrying Basic credentials when they were configured.

use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::section::{LemmaText, Section};

/// Query sent with every graph request: normalised spellings, labels shown.
pub const DOT_QUERY: [(&str, &str); 2] = [("show_normal", "true"), ("normalise", "spelling")];

#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Returns `None` when no username was given; a missing password is
    /// treated as empty.
    pub fn from_options(username: Option<&str>, password: Option<&str>) -> Option<Self> {
        let username = username?.trim().to_string();
        let password = password.map(str::trim).unwrap_or_default().to_string();
        Some(Self { username, password })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Network, DNS, TLS or body decoding failure.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid repository URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The repository answered with a non-2xx status.
    #[error("repository returned {status} for {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },
}

pub struct RepositoryClient {
    client: reqwest::Client,
    tradition_url: String,
    credentials: Option<Credentials>,
}

impl RepositoryClient {
    pub fn new(repository: &str, tradition_id: &str, credentials: Option<Credentials>) -> Self {
        Self::with_client(reqwest::Client::new(), repository, tradition_id, credentials)
    }

    pub fn with_client(
        client: reqwest::Client,
        repository: &str,
        tradition_id: &str,
        credentials: Option<Credentials>,
    ) -> Self {
        let tradition_url = format!(
            "{}/{}",
            repository.trim_end_matches('/'),
            tradition_id.trim()
        );
        Self {
            client,
            tradition_url,
            credentials,
        }
    }

    pub fn tradition_url(&self) -> &str {
        &self.tradition_url
    }

    /// `GET {tradition}/sections`, in the order the repository returns them.
    pub async fn sections(&self) -> Result<Vec<Section>, RepositoryError> {
        let url = self.url(&["sections"])?;
        self.get_json(url).await
    }

    pub async fn lemma_text(&self, section_id: &str) -> Result<LemmaText, RepositoryError> {
        let url = self.section_url(section_id, "lemmatext")?;
        self.get_json(url).await
    }

    /// Fetch the section's graph as DOT text.
    pub async fn dot(&self, section_id: &str) -> Result<String, RepositoryError> {
        let url = self.section_url(section_id, "dot")?;
        let response = self.get(url, &DOT_QUERY).await?;
        Ok(response.text().await?)
    }

    fn section_url(&self, section_id: &str, resource: &str) -> Result<Url, RepositoryError> {
        self.url(&["section", section_id, resource])
    }

    /// Append `segments` to the tradition URL, percent-encoding each one so
    /// an id containing `/`, `?` or `#` stays a single path segment.
    fn url(&self, segments: &[&str]) -> Result<Url, RepositoryError> {
        let invalid = |reason: String| RepositoryError::InvalidUrl {
            url: self.tradition_url.clone(),
            reason,
        };
        let mut url = Url::parse(&self.tradition_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("URL cannot take a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, RepositoryError> {
        let response = self.get(url, &[]).await?;
        Ok(response.json::<T>().await?)
    }

    async fn get(
        &self,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<reqwest::Response, RepositoryError> {
        tracing::debug!(%url, "GET");
        let mut request = self.client.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(creds) = &self.credentials {
            request = request.basic_auth(&creds.username, Some(&creds.password));
        }
        Self::ensure_success(request.send().await?).await
    }

    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, RepositoryError> {
        let status = response.status();
        if !status.is_success() {
            let url = response.url().to_string();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(RepositoryError::Status {
                status: status.as_u16(),
                url,
                body,
            });
        }
        Ok(response)
    }
}
