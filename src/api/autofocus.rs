use crate::errors::DecodeError;
use crate::response::FlatResponse;
use serde::{Deserialize, Serialize};

/// Autofocus run status.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoFocus {
    /// Whether an autofocus run is in progress.
    pub is_running: bool,
    /// Whether the last run found a focus position.
    pub success: bool,
    /// Best focuser position found by the last run.
    pub best_position: f64,
    /// Estimated uncertainty of `best_position`.
    pub tolerance: f64,
}

impl AutoFocus {
    pub(crate) fn decode(flat: &FlatResponse) -> Result<Self, DecodeError> {
        Ok(Self {
            is_running: flat.field("autofocus.is_running")?,
            success: flat.field("autofocus.success")?,
            best_position: flat.field("autofocus.best_position")?,
            tolerance: flat.field("autofocus.tolerance")?,
        })
    }
}
