use serde::{Deserialize, Serialize};

use crate::google::{ApiClient, Error, Result};

/// Entry point of the script that refreshes the form's version drop down.
pub const FORM_SCRIPT_FUNCTION: &str = "main";

#[derive(Debug, Serialize)]
struct ExecutionRequest<'a> {
    function: &'a str,
}

/// Long running operation returned by `scripts.run`.
#[derive(Debug, Default, Deserialize)]
pub struct Operation {
    #[serde(default)]
    pub done: bool,
    pub error: Option<Status>,
    pub response: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: Vec<serde_json::Value>,
}

impl Status {
    /// Script failures carry the actual exception in the first detail.
    fn describe(&self) -> String {
        let detail = self
            .details
            .first()
            .and_then(|d| d.get("errorMessage"))
            .and_then(|m| m.as_str());
        match detail {
            Some(detail) if !self.message.is_empty() => format!("{}: {detail}", self.message),
            Some(detail) => detail.to_string(),
            None => self.message.clone(),
        }
    }
}

pub struct ScriptClient {
    api: ApiClient,
}

impl ScriptClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Runs `function` in the Apps Script project `script_id`.
    pub async fn run_function(&self, script_id: &str, function: &str) -> Result<Operation> {
        let op: Operation = self
            .api
            .post(
                &format!("v1/scripts/{script_id}:run"),
                &ExecutionRequest { function },
            )
            .await?;

        match &op.error {
            Some(status) => Err(Error::ScriptExecution {
                function: function.to_string(),
                message: status.describe(),
            }),
            None => Ok(op),
        }
    }
}
