use serde::{Deserialize, Serialize};

/// Textual analysis produced by the remote server for one upload session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisResult {
    pub text: String,
}
