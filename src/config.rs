use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{google, DEFAULT_ARCHITECTURE, OCP_RELEASE_REPOSITORY};

#[derive(Clone, Parser)]
#[clap(version)]
pub struct Args {
    /// The tracing filter used for logs
    #[clap(long, env = "IMAGESET_SYNC_LOG", default_value = "imageset_sync=info,warn")]
    pub log_level: kubert::LogFilter,

    /// The logging format
    #[clap(long, default_value = "plain")]
    pub log_format: kubert::LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Subcommand)]
pub enum Commands {
    /// Push the release images to the Google Sheet, refresh the Google Form
    /// and optionally create the missing ClusterImageSets.
    Sync(SyncArgs),

    /// Print the image table that `sync` would write to the sheet.
    Images {
        #[clap(flatten)]
        source: SourceArgs,
    },

    /// Print the ClusterImageSets for the listed images.
    Manifests {
        #[clap(flatten)]
        source: SourceArgs,

        #[clap(flatten)]
        release: ReleaseArgs,
    },
}

#[derive(Clone, Debug, clap::Args)]
pub struct SourceArgs {
    /// Registry endpoint returning the `tags` of the release repository
    #[arg(long, env = "IMAGE_SOURCE")]
    pub image_source: String,

    /// Only tags containing this marker are kept. It is removed from the image names.
    #[arg(long, env = "IMAGE_ARCHITECTURE", default_value = DEFAULT_ARCHITECTURE)]
    pub architecture: String,
}

#[derive(Clone, Debug, clap::Args)]
pub struct ReleaseArgs {
    /// Repository the ClusterImageSet release images are pulled from
    #[arg(long, env = "RELEASE_REPOSITORY", default_value = OCP_RELEASE_REPOSITORY)]
    pub release_repository: String,
}

#[derive(Clone, Debug, clap::Args)]
pub struct SyncArgs {
    #[clap(flatten)]
    pub source: SourceArgs,

    #[clap(flatten)]
    pub sheet: SheetArgs,

    #[clap(flatten)]
    pub form: FormArgs,

    #[clap(flatten)]
    pub cluster: ClusterArgs,
}

#[derive(Clone, Debug, clap::Args)]
pub struct SheetArgs {
    /// Service account key file used to edit the sheet
    #[arg(long, env = "GOOGLE_SERVICE_ACCOUNT")]
    pub service_account: PathBuf,

    /// Id of the spreadsheet holding the image table
    #[arg(long, env = "GOOGLE_SHEET_ID")]
    pub sheet_id: String,

    /// Tab the image table is written to
    #[arg(long, default_value = "imageSets")]
    pub sheet_name: String,

    /// Grid id of that tab, used when sorting
    #[arg(long, default_value_t = 0)]
    pub sheet_grid_id: i64,

    #[arg(long, hide = true, default_value = google::SHEETS_ENDPOINT)]
    pub sheets_endpoint: String,
}

#[derive(Clone, Debug, clap::Args)]
pub struct FormArgs {
    /// OAuth client secret file of the form owner
    #[arg(long, env = "GOOGLE_CREDENTIALS")]
    pub credentials: PathBuf,

    /// Stored OAuth token of the form owner
    #[arg(long, env = "GOOGLE_TOKEN")]
    pub token: PathBuf,

    /// Apps Script project that refreshes the form
    #[arg(long, env = "GOOGLE_FORM_ID")]
    pub form_script_id: String,

    #[arg(long, hide = true, default_value = google::SCRIPT_ENDPOINT)]
    pub script_endpoint: String,
}

#[derive(Clone, Debug, clap::Args)]
pub struct ClusterArgs {
    /// Also create a ClusterImageSet for every image missing one
    #[arg(long = "cluster-image-sets", env = "SYNC_CLUSTER_IMAGE_SETS")]
    pub enabled: bool,

    /// Kubeconfig of the hub cluster. Defaults to the usual kubeconfig lookup.
    #[arg(long, env = "OPENSHIFT_KUBECONFIG")]
    pub kubeconfig: Option<PathBuf>,

    #[clap(flatten)]
    pub release: ReleaseArgs,
}
