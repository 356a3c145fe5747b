use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::images::ImageRecord;

/// Hive's cluster scoped pointer to an OpenShift release payload.
#[derive(CustomResource, Debug, Serialize, Deserialize, Default, Clone, PartialEq, JsonSchema)]
#[kube(
group = "hive.openshift.io",
version = "v1",
kind = "ClusterImageSet",
plural = "clusterimagesets"
)]
#[serde(rename_all = "camelCase")]
pub struct ClusterImageSetSpec {
    /// Pull spec of the release image, e.g. `quay.io/openshift-release-dev/ocp-release:4.12.3-x86_64`.
    pub release_image: String,
}

impl ClusterImageSet {
    /// Builds the image set pointing at the release of `image` in `repository`.
    pub fn for_image(image: &ImageRecord, repository: &str, architecture: &str) -> Self {
        ClusterImageSet::new(
            &image_set_name(&image.name, architecture),
            ClusterImageSetSpec {
                release_image: format!("{repository}:{}-{architecture}", image.name),
            },
        )
    }
}

/// Resource name for a release, e.g. `4.12.3` -> `img4.12.3-x86-64-appsub`.
pub fn image_set_name(release: &str, architecture: &str) -> String {
    let arch = architecture.replace('_', "-");
    format!("img{release}-{arch}-appsub").to_lowercase()
}
