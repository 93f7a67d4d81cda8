use crate::errors::DecodeError;
use crate::response::FlatResponse;
use serde::{Deserialize, Serialize};

/// Focuser status.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Focuser {
    /// Whether PWI4 is connected to the focuser.
    pub is_connected: bool,
    /// Whether the focuser motor is energized.
    pub is_enabled: bool,
    /// Current position, in focuser steps.
    pub position: f64,
    /// True if the focuser is currently moving to a new position.
    pub is_moving: bool,
}

impl Focuser {
    pub(crate) fn decode(flat: &FlatResponse) -> Result<Self, DecodeError> {
        Ok(Self {
            is_connected: flat.field("focuser.is_connected")?,
            is_enabled: flat.field("focuser.is_enabled")?,
            position: flat.field("focuser.position")?,
            is_moving: flat.field("focuser.is_moving")?,
        })
    }
}
