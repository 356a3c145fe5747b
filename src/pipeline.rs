use itertools::Itertools;
use kube::ResourceExt;
use tracing::info;

use crate::{
    apps_script::{ScriptClient, FORM_SCRIPT_FUNCTION},
    auth, cluster,
    config::{ClusterArgs, FormArgs, ReleaseArgs, SheetArgs, SourceArgs, SyncArgs},
    google::ApiClient,
    images::{ImageRecord, ImageTable},
    registry,
    resources::ClusterImageSet,
    sheets::SheetsClient,
    Error, Result,
};

/// Runs every step in order and stops at the first failure.
///
/// Nothing is rolled back: a failure after the sheet update leaves the new rows in place.
pub async fn sync(args: &SyncArgs) -> Result<()> {
    let http = reqwest::Client::new();

    let images = list_images(&http, &args.source).await?;
    let table = ImageTable::from_records(&images);

    update_sheet(&http, &args.sheet, &table).await?;
    update_form(&http, &args.form).await?;

    if args.cluster.enabled {
        update_cluster_image_sets(&args.cluster, &images, &args.source.architecture).await?;
    }
    Ok(())
}

pub async fn list_images(http: &reqwest::Client, source: &SourceArgs) -> Result<Vec<ImageRecord>> {
    let images = registry::list_images(http, &source.image_source, &source.architecture)
        .await
        .map_err(Error::ListImages)?;
    info!(count = images.len(), "Listed images");
    Ok(images)
}

async fn update_sheet(http: &reqwest::Client, args: &SheetArgs, table: &ImageTable) -> Result<()> {
    let token = auth::service_account_token(&args.service_account, &[auth::SPREADSHEETS_SCOPE])
        .await
        .map_err(Error::UpdateSheet)?;
    let sheets = SheetsClient::new(ApiClient::new(http.clone(), &args.sheets_endpoint, token));

    sheets
        .update_values(&args.sheet_id, &args.sheet_name, table)
        .await
        .map_err(Error::UpdateSheet)?;
    info!(rows = table.row_count(), "Updated Google Sheet Successfully");

    sheets
        .sort_rows(&args.sheet_id, args.sheet_grid_id)
        .await
        .map_err(Error::SortSheet)?;
    info!("Sorted Google Sheet Successfully");
    Ok(())
}

async fn update_form(http: &reqwest::Client, args: &FormArgs) -> Result<()> {
    let token = auth::user_token(&args.credentials, &args.token, &auth::FORM_SCRIPT_SCOPES)
        .await
        .map_err(Error::UpdateForm)?;
    let script = ScriptClient::new(ApiClient::new(http.clone(), &args.script_endpoint, token));

    script
        .run_function(&args.form_script_id, FORM_SCRIPT_FUNCTION)
        .await
        .map_err(Error::UpdateForm)?;
    info!("Updated Google Form Successfully");
    Ok(())
}

async fn update_cluster_image_sets(
    args: &ClusterArgs,
    images: &[ImageRecord],
    architecture: &str,
) -> Result<()> {
    let client = cluster::client(args.kubeconfig.as_deref())
        .await
        .map_err(Error::SyncClusterImageSets)?;
    let created = cluster::sync_cluster_image_sets(
        client,
        images,
        &args.release.release_repository,
        architecture,
    )
    .await
    .map_err(Error::SyncClusterImageSets)?;
    info!(created = created.len(), "Updated ClusterImageSets Successfully");
    Ok(())
}

/// Renders the ClusterImageSets for `images` as a YAML stream.
pub fn render_manifests(
    images: &[ImageRecord],
    release: &ReleaseArgs,
    architecture: &str,
) -> serde_yaml::Result<String> {
    let docs: Vec<String> = images
        .iter()
        .map(|image| ClusterImageSet::for_image(image, &release.release_repository, architecture))
        .unique_by(|set| set.name_any())
        .map(|set| serde_yaml::to_string(&set))
        .collect::<serde_yaml::Result<_>>()?;
    Ok(docs.iter().map(|doc| format!("---\n{doc}")).join(""))
}
