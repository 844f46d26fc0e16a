use serde::{Deserialize, Serialize};

/// Structured failure payload the store attaches to non-2xx responses, e.g.
/// `{"error":true,"code":404,"errorNum":1202,"errorMessage":"document not found"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: bool,
    pub code: u16,
    #[serde(rename = "errorNum")]
    pub error_num: i64,
    #[serde(rename = "errorMessage")]
    pub error_message: String,
}

impl ErrorBody {
    pub fn new(code: u16, error_num: i64, message: impl Into<String>) -> Self {
        Self {
            error: true,
            code,
            error_num,
            error_message: message.into(),
        }
    }
}
