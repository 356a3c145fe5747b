use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

use crate::images::{strip_architecture, ImageRecord};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Error querying image source {url}: {source}")]
    Request {
        url: String,
        source: reqwest::Error,
    },

    #[error("Image source {url} answered {status}: {body}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Error decoding image source JSON: {0}")]
    DecodeListing(serde_json::Error),

    #[error("Error decoding metadata of tag {tag}: {source}")]
    DecodeTag {
        tag: String,
        source: serde_json::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The body returned by the registry repository endpoint.
///
/// Tag metadata is kept raw until a tag is selected, so that an unrelated
/// malformed entry doesn't fail the whole listing.
#[derive(Debug, Deserialize)]
pub struct TagListing {
    tags: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct TagMetadata {
    image_id: String,
    name: String,
    manifest_digest: String,
    size: serde_json::Number,
    last_modified: String,
}

impl TagListing {
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data).map_err(Error::DecodeListing)
    }

    /// Returns a record for every tag whose key contains `architecture`,
    /// ordered by tag key.
    pub fn images(&self, architecture: &str) -> Result<Vec<ImageRecord>> {
        self.tags
            .iter()
            .filter(|(tag, _)| tag.contains(architecture))
            .map(|(tag, meta)| {
                let meta: TagMetadata =
                    serde_json::from_value(meta.clone()).map_err(|source| Error::DecodeTag {
                        tag: tag.clone(),
                        source,
                    })?;
                Ok(ImageRecord {
                    image_id: meta.image_id,
                    name: strip_architecture(&meta.name, architecture),
                    manifest_digest: meta.manifest_digest,
                    size: meta.size,
                    last_modified: meta.last_modified,
                })
            })
            .collect()
    }
}

/// Fetches the tag listing from `url` and extracts the images built for `architecture`.
pub async fn list_images(
    http: &reqwest::Client,
    url: &str,
    architecture: &str,
) -> Result<Vec<ImageRecord>> {
    let request_error = |source| Error::Request {
        url: url.to_string(),
        source,
    };

    let res = http.get(url).send().await.map_err(request_error)?;
    let status = res.status();
    if !status.is_success() {
        return Err(Error::Status {
            url: url.to_string(),
            status,
            body: res.text().await.unwrap_or_default(),
        });
    }
    let body = res.bytes().await.map_err(request_error)?;
    debug!(bytes = body.len(), "fetched tag listing");

    let images = TagListing::from_slice(&body)?.images(architecture)?;
    debug!(count = images.len(), architecture, "selected images");
    Ok(images)
}
