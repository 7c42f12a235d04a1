use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use silver_halide_records::RecordPage;

pub mod galleries;
pub mod photos;

pub use galleries::GalleryProvider;
pub use photos::PhotoProvider;

/// Failure classes at the record-backend boundary. Provider methods catch
/// every one of these, log it, and hand the page handlers an empty result
/// instead; a broken backend renders as an empty page, never as a 500.
#[derive(Debug, Error)]
pub enum Error {
    #[error("backend transport error: {0}")]
    Transport(surf::Error),
    #[error("backend returned status {0}")]
    Status(surf::StatusCode),
    #[error("malformed backend response: {0}")]
    Malformed(surf::Error),
    #[error("query string encoding error")]
    Query(#[from] serde_qs::Error),
}

impl From<surf::Error> for Error {
    fn from(err: surf::Error) -> Self {
        Error::Transport(err)
    }
}

/// Query parameters understood by the backend's record-list endpoint.
#[derive(Debug, Default, Serialize)]
pub(crate) struct ListQuery<'q> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<&'q str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<&'q str>,
    #[serde(rename = "perPage")]
    pub per_page: u16,
}

/// Read-only client for the headless record backend.
#[derive(Clone)]
pub struct Client {
    base_url: String,
    http: surf::Client,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Client {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Client {
            base_url,
            http: surf::Client::new(),
        }
    }

    /// URL of a file attached to a record, optionally as a named thumbnail.
    pub fn file_url(
        &self,
        collection_id: &str,
        record_id: &str,
        filename: &str,
        thumb: Option<&str>,
    ) -> String {
        let url = format!(
            "{}/api/files/{}/{}/{}",
            self.base_url, collection_id, record_id, filename
        );
        match thumb {
            Some(thumb) => format!("{}?thumb={}", url, thumb),
            None => url,
        }
    }

    pub(crate) async fn list_records<T>(
        &self,
        collection: &str,
        query: &ListQuery<'_>,
    ) -> Result<Vec<T>, Error>
    where
        T: DeserializeOwned,
    {
        let url = format!(
            "{}/api/collections/{}/records?{}",
            self.base_url,
            collection,
            serde_qs::to_string(query)?,
        );
        tracing::debug!(%url, "querying record backend");

        let mut res = self.http.get(&url).await?;
        if !res.status().is_success() {
            return Err(Error::Status(res.status()));
        }

        let page: RecordPage<T> = res.body_json().await.map_err(Error::Malformed)?;
        Ok(page.items)
    }
}
