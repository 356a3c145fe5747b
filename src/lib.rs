#![deny(rustdoc::broken_intra_doc_links, rustdoc::bare_urls, rust_2018_idioms)]

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Unable to list images: {0}")]
    ListImages(#[source] registry::Error),

    #[error("Unable to update Google Sheet: {0}")]
    UpdateSheet(#[source] google::Error),

    #[error("Unable to sort Google Sheet: {0}")]
    SortSheet(#[source] google::Error),

    #[error("Unable to update Google Form: {0}")]
    UpdateForm(#[source] google::Error),

    #[error("Unable to update ClusterImageSets: {0}")]
    SyncClusterImageSets(#[source] cluster::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Repository holding the OpenShift release payloads referenced by ClusterImageSets.
pub const OCP_RELEASE_REPOSITORY: &str = "quay.io/openshift-release-dev/ocp-release";

/// Architecture marker used when none is configured.
pub const DEFAULT_ARCHITECTURE: &str = "x86_64";

/// Command line arguments of the binary.
pub mod config;

/// The end to end sync run.
pub mod pipeline;

/// Resource type definitions.
pub mod resources;

pub mod apps_script;
pub mod auth;
pub mod cluster;
pub mod google;
pub mod images;
pub mod registry;
pub mod sheets;
