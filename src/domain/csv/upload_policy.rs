// ============================================================
// UPLOAD POLICY
// ============================================================
// Limits applied to CSV text uploaded through the API

use serde::{Deserialize, Serialize};

/// Structural limits for uploaded CSV content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadPolicy {
    /// Maximum upload size in bytes (default: 10 MiB)
    pub max_bytes: usize,

    /// Minimum number of header columns (default: 3)
    pub min_columns: usize,

    /// Minimum number of data rows after the header (default: 1)
    pub min_data_rows: usize,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
            min_columns: 3,
            min_data_rows: 1,
        }
    }
}

impl UploadPolicy {
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Validate policy values
    pub fn validate(&self) -> Result<(), String> {
        if self.max_bytes == 0 {
            return Err("max_bytes must be > 0".to_string());
        }
        if self.min_columns == 0 {
            return Err("min_columns must be > 0".to_string());
        }
        Ok(())
    }

    /// Check uploaded text against the policy.
    pub fn check(&self, content: &str) -> Result<(), String> {
        if content.len() > self.max_bytes {
            return Err(format!(
                "File too large. Maximum size is {:.0}MB, got {:.1}MB",
                self.max_bytes as f64 / 1024.0 / 1024.0,
                content.len() as f64 / 1024.0 / 1024.0
            ));
        }

        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err("CSV file is empty".to_string());
        }

        let lines: Vec<&str> = trimmed.split('\n').collect();
        if lines.len() < 1 + self.min_data_rows {
            return Err("CSV file must have at least a header and one data row".to_string());
        }

        let columns = lines[0].split(',').count();
        if columns < self.min_columns {
            return Err(format!(
                "CSV file must have at least {} columns",
                self.min_columns
            ));
        }

        Ok(())
    }
}
