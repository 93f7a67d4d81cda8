use crate::errors::DecodeError;
use crate::response::FlatResponse;
use serde::{Deserialize, Serialize};

/// Observatory site.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Geodetic latitude, north positive.
    pub latitude_degs: f64,
    /// Longitude, east positive.
    pub longitude_degs: f64,
    /// Height above sea level.
    pub height_meters: f64,
    /// Local mean sidereal time.
    pub lmst_hours: f64,
}

impl Site {
    pub(crate) fn decode(flat: &FlatResponse) -> Result<Self, DecodeError> {
        Ok(Self {
            latitude_degs: flat.field("site.latitude_degs")?,
            longitude_degs: flat.field("site.longitude_degs")?,
            height_meters: flat.field("site.height_meters")?,
            lmst_hours: flat.field("site.lmst_hours")?,
        })
    }
}
