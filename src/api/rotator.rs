use crate::errors::DecodeError;
use crate::response::FlatResponse;
use serde::{Deserialize, Serialize};

/// Field rotator status.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rotator {
    /// Whether PWI4 is connected to the rotator.
    pub is_connected: bool,
    /// Whether the rotator motor is energized.
    pub is_enabled: bool,
    /// Raw mechanical position of the rotator in degrees.
    pub mech_position_degs: f64,
    /// Position angle of the field on the sky in degrees.
    pub field_angle_degs: f64,
    /// Whether the rotator is moving.
    pub is_moving: bool,
    /// Whether the rotator is moving to a new target.
    pub is_slewing: bool,
}

impl Rotator {
    pub(crate) fn decode(flat: &FlatResponse) -> Result<Self, DecodeError> {
        Ok(Self {
            is_connected: flat.field("rotator.is_connected")?,
            is_enabled: flat.field("rotator.is_enabled")?,
            mech_position_degs: flat.field("rotator.mech_position_degs")?,
            field_angle_degs: flat.field("rotator.field_angle_degs")?,
            is_moving: flat.field("rotator.is_moving")?,
            is_slewing: flat.field("rotator.is_slewing")?,
        })
    }
}
