use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    google::{ApiClient, Result},
    images::{ImageTable, HEADER},
};

/// Index of the column the sheet is sorted on (`name`).
pub const SORT_COLUMN: u32 = 1;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchUpdateValuesRequest<'a> {
    value_input_option: &'static str,
    data: Vec<ValueRange<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange<'a> {
    range: String,
    major_dimension: &'static str,
    values: &'a [Vec<String>],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchUpdateSpreadsheetRequest {
    requests: Vec<Request>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Request {
    sort_range: SortRangeRequest,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SortRangeRequest {
    range: GridRange,
    sort_specs: Vec<SortSpec>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GridRange {
    sheet_id: i64,
    start_row_index: u32,
    start_column_index: u32,
    end_column_index: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SortSpec {
    dimension_index: u32,
    sort_order: &'static str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateValuesResponse {
    #[serde(default)]
    pub total_updated_rows: u64,
    #[serde(default)]
    pub total_updated_cells: u64,
}

/// The spreadsheet API answers with the spreadsheet id and one reply per request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateSpreadsheetResponse {
    #[serde(default)]
    pub spreadsheet_id: String,
}

/// A1 range covering `rows` rows of the image table on `sheet_name`.
pub fn table_range(sheet_name: &str, rows: usize) -> String {
    format!("{sheet_name}!A1:E{rows}")
}

pub struct SheetsClient {
    api: ApiClient,
}

impl SheetsClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Overwrites the top of `sheet_name` with `table`.
    ///
    /// Rows below the table are left untouched, so a shorter table leaves the
    /// previous trailing rows in place.
    pub async fn update_values(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
        table: &ImageTable,
    ) -> Result<BatchUpdateValuesResponse> {
        let body = update_values_request(sheet_name, table);
        let res: BatchUpdateValuesResponse = self
            .api
            .post(
                &format!("v4/spreadsheets/{spreadsheet_id}/values:batchUpdate"),
                &body,
            )
            .await?;
        debug!(
            rows = res.total_updated_rows,
            cells = res.total_updated_cells,
            "updated sheet values"
        );
        Ok(res)
    }

    /// Sorts every row below the header by the name column, descending.
    pub async fn sort_rows(
        &self,
        spreadsheet_id: &str,
        grid_sheet_id: i64,
    ) -> Result<BatchUpdateSpreadsheetResponse> {
        self.api
            .post(
                &format!("v4/spreadsheets/{spreadsheet_id}:batchUpdate"),
                &sort_request(grid_sheet_id),
            )
            .await
    }
}

fn update_values_request<'a>(sheet_name: &str, table: &'a ImageTable) -> BatchUpdateValuesRequest<'a> {
    BatchUpdateValuesRequest {
        value_input_option: "RAW",
        data: vec![ValueRange {
            range: table_range(sheet_name, table.row_count()),
            major_dimension: "ROWS",
            values: table.rows(),
        }],
    }
}

fn sort_request(grid_sheet_id: i64) -> BatchUpdateSpreadsheetRequest {
    BatchUpdateSpreadsheetRequest {
        requests: vec![Request {
            sort_range: SortRangeRequest {
                range: GridRange {
                    sheet_id: grid_sheet_id,
                    start_row_index: 1,
                    start_column_index: 0,
                    end_column_index: HEADER.len() as u32,
                },
                sort_specs: vec![SortSpec {
                    dimension_index: SORT_COLUMN,
                    sort_order: "DESCENDING",
                }],
            },
        }],
    }
}
