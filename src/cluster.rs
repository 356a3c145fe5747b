use std::collections::HashSet;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use kube::{
    api::{ListParams, PostParams},
    config::{Config, InferConfigError, KubeConfigOptions, Kubeconfig, KubeconfigError},
    Api, Client, ResourceExt,
};
use tracing::{debug, info};

use crate::{images::ImageRecord, resources::ClusterImageSet};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Error loading kubeconfig {path}: {source}")]
    Kubeconfig {
        path: PathBuf,
        source: KubeconfigError,
    },

    #[error("Error inferring cluster config: {0}")]
    InferConfig(#[from] InferConfigError),

    #[error("Kube Error: {0}")]
    KubeError(#[from] kube::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Connects with the given kubeconfig, or with the usual in-cluster/`KUBECONFIG` lookup.
pub async fn client(kubeconfig: Option<&Path>) -> Result<Client> {
    let config = match kubeconfig {
        Some(path) => {
            let kubeconfig_error = |source| Error::Kubeconfig {
                path: path.to_path_buf(),
                source,
            };
            let kubeconfig = Kubeconfig::read_from(path).map_err(kubeconfig_error)?;
            Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                .await
                .map_err(kubeconfig_error)?
        }
        None => Config::infer().await?,
    };
    Ok(Client::try_from(config)?)
}

/// Image sets to create so that every image has one, given the names already in the cluster.
pub fn missing_image_sets(
    existing: &HashSet<String>,
    images: &[ImageRecord],
    repository: &str,
    architecture: &str,
) -> Vec<ClusterImageSet> {
    images
        .iter()
        .map(|image| ClusterImageSet::for_image(image, repository, architecture))
        .filter(|set| !existing.contains(&set.name_any()))
        .unique_by(|set| set.name_any())
        .collect()
}

/// Creates the ClusterImageSets missing for `images` and returns their names.
pub async fn sync_cluster_image_sets(
    client: Client,
    images: &[ImageRecord],
    repository: &str,
    architecture: &str,
) -> Result<Vec<String>> {
    let api = Api::<ClusterImageSet>::all(client);

    let existing: HashSet<String> = api
        .list(&ListParams::default())
        .await?
        .items
        .iter()
        .map(ResourceExt::name_any)
        .collect();
    debug!(count = existing.len(), "existing cluster image sets");

    let mut created = vec![];
    for set in missing_image_sets(&existing, images, repository, architecture) {
        let name = set.name_any();
        info!(%name, release_image = %set.spec.release_image, "creating cluster image set");
        if handle_resource_exists(api.create(&PostParams::default(), &set).await)? {
            created.push(name);
        }
    }
    Ok(created)
}

/// Returns whether the object was created. A conflict means someone else created it first.
fn handle_resource_exists<R>(res: kube::Result<R>) -> Result<bool>
where
    R: kube::Resource,
{
    match res {
        Err(kube::Error::Api(ae)) => match ae.code {
            409 => {
                info!(
                    "{} resource already exist, doing nothing",
                    tynm::type_name::<R>()
                );
                Ok(false)
            }
            _ => Err(kube::Error::Api(ae).into()),
        },
        Err(e) => Err(e.into()),
        Ok(_) => Ok(true),
    }
}
