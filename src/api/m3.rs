use crate::errors::DecodeError;
use crate::response::FlatResponse;
use serde::{Deserialize, Serialize};

/// Tertiary mirror (port selector) status.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct M3 {
    /// Currently selected port.
    pub port: i32,
}

impl M3 {
    pub(crate) fn decode(flat: &FlatResponse) -> Result<Self, DecodeError> {
        Ok(Self {
            port: flat.field("m3.port")?,
        })
    }
}
