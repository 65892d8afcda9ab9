// ============================================================
// DATA ORIGIN
// ============================================================
// Where the CSV text of a snapshot came from

use serde::{Deserialize, Serialize};

/// Source of the CSV text behind a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataOrigin {
    /// Raw file fetched from the remote repository
    Remote,

    /// Local cached copy, used when the remote fetch fails
    Local,

    /// Text uploaded through the API
    Upload,
}

impl DataOrigin {
    pub fn description(&self) -> &'static str {
        match self {
            DataOrigin::Remote => "remote repository file",
            DataOrigin::Local => "local cached copy",
            DataOrigin::Upload => "uploaded file",
        }
    }
}

impl std::fmt::Display for DataOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataOrigin::Remote => write!(f, "remote"),
            DataOrigin::Local => write!(f, "local"),
            DataOrigin::Upload => write!(f, "upload"),
        }
    }
}
