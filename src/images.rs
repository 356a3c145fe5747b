use serde::Serialize;
use serde_json::Number;

/// Column names of the image table, in sheet order.
pub const HEADER: [&str; 5] = ["imageId", "name", "manifestDigest", "size", "lastModified"];

/// One release image extracted from the registry tag listing.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub image_id: String,
    pub name: String,
    pub manifest_digest: String,
    pub size: Number,
    pub last_modified: String,
}

impl ImageRecord {
    /// Size rendered the way it appears in the sheet: an integer, no decimals.
    pub fn size_display(&self) -> String {
        match self.size.as_f64() {
            Some(size) if self.size.is_f64() => format!("{size:.0}"),
            _ => self.size.to_string(),
        }
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.image_id.clone(),
            self.name.clone(),
            self.manifest_digest.clone(),
            self.size_display(),
            self.last_modified.clone(),
        ]
    }
}

/// The values pushed to the spreadsheet. The first row is always [`HEADER`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ImageTable(Vec<Vec<String>>);

impl ImageTable {
    pub fn from_records(records: &[ImageRecord]) -> Self {
        let header = HEADER.iter().map(|s| s.to_string()).collect();
        Self(
            std::iter::once(header)
                .chain(records.iter().map(ImageRecord::to_row))
                .collect(),
        )
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.0
    }

    /// Number of rows, header included.
    pub fn row_count(&self) -> usize {
        self.0.len()
    }
}

/// Removes the architecture marker from a tag name, e.g. `4.12.3-x86_64` -> `4.12.3`.
pub fn strip_architecture(name: &str, architecture: &str) -> String {
    let mut name = name.to_string();
    if architecture.is_empty() {
        return name;
    }
    // Removing one occurrence can join its neighbours into a new one.
    while name.contains(architecture) {
        name = name
            .replace(&format!("-{architecture}"), "")
            .replace(architecture, "");
    }
    name
}
