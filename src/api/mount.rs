use super::coerce::StatusValue;
use crate::errors::DecodeError;
use crate::response::FlatResponse;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::fmt::{self, Display};

/// Kinematic type of the mount, as reported in `mount.geometry`.
#[derive(
    Debug,
    PartialEq,
    Eq,
    Clone,
    Copy,
    Serialize_repr,
    Deserialize_repr,
    TryFromPrimitive,
    IntoPrimitive,
)]
#[repr(u8)]
pub enum Geometry {
    /// Altitude-Azimuth mount.
    AltAz = 0,

    /// Equatorial fork mount.
    EquatorialFork = 1,

    /// German equatorial mount.
    GermanEquatorial = 2,
}

// Not derived: num_enum would treat a `#[default]` variant as a catch-all for unknown codes.
impl Default for Geometry {
    fn default() -> Self {
        Self::AltAz
    }
}

impl Geometry {
    /// Display name of the geometry.
    pub const fn name(self) -> &'static str {
        match self {
            Self::AltAz => "Alt-Az",
            Self::EquatorialFork => "Equatorial Fork",
            Self::GermanEquatorial => "German Equatorial",
        }
    }
}

impl Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl PartialEq<&str> for Geometry {
    fn eq(&self, other: &&str) -> bool {
        self.name() == *other
    }
}

impl StatusValue for Geometry {
    fn decode(_key: &'static str, raw: &str) -> Result<Self, DecodeError> {
        raw.trim()
            .parse::<u8>()
            .ok()
            .and_then(|code| Self::try_from_primitive(code).ok())
            .ok_or_else(|| DecodeError::UnknownGeometry {
                code: raw.to_owned(),
            })
    }
}

/// One of the two mechanical drive axes.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum AxisId {
    /// Axis 0: azimuth on an Alt-Az mount, RA on an equatorial one.
    Primary = 0,
    /// Axis 1: altitude on an Alt-Az mount, Dec on an equatorial one.
    Secondary = 1,
}

impl AxisId {
    /// Both axes, primary first.
    pub const BOTH: [Self; 2] = [Self::Primary, Self::Secondary];

    /// Wire index of the axis.
    pub const fn index(self) -> u8 {
        match self {
            Self::Primary => 0,
            Self::Secondary => 1,
        }
    }
}

impl Display for AxisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "axis{}", self.index())
    }
}

/// Direction of a guide pulse, numbered as in ASCOM's `GuideDirection`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum GuideDirection {
    /// Towards the north celestial pole.
    North = 0,
    /// Away from the north celestial pole.
    South = 1,
    /// Towards increasing right ascension.
    East = 2,
    /// Towards decreasing right ascension.
    West = 3,
}

/// State of a single mechanical axis.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    /// Whether the axis motor is energized.
    pub is_enabled: bool,
    /// RMS tracking error.
    pub rms_error_arcsec: f64,
    /// Remaining distance to the slew target.
    pub dist_to_target_arcsec: f64,
    /// Current servo following error.
    pub servo_error_arcsec: f64,
    /// Axis encoder position.
    pub position_degs: f64,
}

macro_rules! axis_key {
    ($id:expr, $field:literal) => {
        match $id {
            AxisId::Primary => concat!("mount.axis0.", $field),
            AxisId::Secondary => concat!("mount.axis1.", $field),
        }
    };
}

impl Axis {
    pub(crate) fn decode(flat: &FlatResponse, id: AxisId) -> Result<Self, DecodeError> {
        Ok(Self {
            is_enabled: flat.field(axis_key!(id, "is_enabled"))?,
            rms_error_arcsec: flat.field(axis_key!(id, "rms_error_arcsec"))?,
            dist_to_target_arcsec: flat.field(axis_key!(id, "dist_to_target_arcsec"))?,
            servo_error_arcsec: flat.field(axis_key!(id, "servo_error_arcsec"))?,
            position_degs: flat.field(axis_key!(id, "position_degs"))?,
        })
    }
}

/// Pointing model calibration summary.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// Currently loaded model file.
    pub filename: String,
    /// Number of calibration points.
    pub num_points_total: u32,
    /// Number of calibration points used by the fit.
    pub num_points_enabled: u32,
    /// RMS residual of the fit.
    pub rms_error_arcsec: f64,
}

impl Model {
    pub(crate) fn decode(flat: &FlatResponse) -> Result<Self, DecodeError> {
        Ok(Self {
            filename: flat.field("mount.model.filename")?,
            num_points_total: flat.field("mount.model.num_points_total")?,
            num_points_enabled: flat.field("mount.model.num_points_enabled")?,
            rms_error_arcsec: flat.field("mount.model.rms_error_arcsec")?,
        })
    }
}

/// Mount status.
///
/// Coordinates are in hours (RA) and degrees (everything else); rates are
/// per second.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mount {
    /// Whether PWI4 is connected to the mount.
    pub is_connected: bool,
    /// Mount type.
    pub geometry: Geometry,
    /// Current apparent right ascension.
    pub ra_apparent_hours: f64,
    /// Current apparent declination.
    pub dec_apparent_degs: f64,
    /// Current J2000 right ascension.
    pub ra_j2000_hours: f64,
    /// Current J2000 declination.
    pub dec_j2000_degs: f64,
    /// Apparent right ascension of the slew target.
    pub target_ra_apparent_hours: f64,
    /// Apparent declination of the slew target.
    pub target_dec_apparent_degs: f64,
    /// Current altitude above the horizon.
    pub altitude_degs: f64,
    /// Current azimuth, north through east.
    pub azimuth_degs: f64,
    /// Whether the mount is moving to a new target.
    pub is_slewing: bool,
    /// Whether the mount is tracking.
    pub is_tracking: bool,
    /// Field angle at the current position.
    pub field_angle_here_degs: f64,
    /// Field angle at the target.
    pub field_angle_at_target_degs: f64,
    /// Rate of change of the field angle at the target.
    pub field_angle_rate_at_target_degs_per_sec: f64,
    /// Direction of motion of the target on the sky.
    pub path_angle_at_target_degs: f64,
    /// Rate of change of the path angle.
    pub path_angle_rate_at_target_degs_per_sec: f64,
    /// Primary axis.
    pub axis0: Axis,
    /// Secondary axis.
    pub axis1: Axis,
    /// Pointing model summary.
    pub model: Model,
}

impl Mount {
    /// Status of the given axis.
    pub const fn axis(&self, id: AxisId) -> &Axis {
        match id {
            AxisId::Primary => &self.axis0,
            AxisId::Secondary => &self.axis1,
        }
    }

    pub(crate) fn decode(flat: &FlatResponse) -> Result<Self, DecodeError> {
        Ok(Self {
            is_connected: flat.field("mount.is_connected")?,
            geometry: flat.field("mount.geometry")?,
            ra_apparent_hours: flat.field("mount.ra_apparent_hours")?,
            dec_apparent_degs: flat.field("mount.dec_apparent_degs")?,
            ra_j2000_hours: flat.field("mount.ra_j2000_hours")?,
            dec_j2000_degs: flat.field("mount.dec_j2000_degs")?,
            target_ra_apparent_hours: flat.field("mount.target_ra_apparent_hours")?,
            target_dec_apparent_degs: flat.field("mount.target_dec_apparent_degs")?,
            altitude_degs: flat.field("mount.altitude_degs")?,
            azimuth_degs: flat.field("mount.azimuth_degs")?,
            is_slewing: flat.field("mount.is_slewing")?,
            is_tracking: flat.field("mount.is_tracking")?,
            field_angle_here_degs: flat.field("mount.field_angle_here_degs")?,
            field_angle_at_target_degs: flat.field("mount.field_angle_at_target_degs")?,
            field_angle_rate_at_target_degs_per_sec: flat
                .field("mount.field_angle_rate_at_target_degs_per_sec")?,
            path_angle_at_target_degs: flat.field("mount.path_angle_at_target_degs")?,
            path_angle_rate_at_target_degs_per_sec: flat
                .field("mount.path_angle_rate_at_target_degs_per_sec")?,
            axis0: Axis::decode(flat, AxisId::Primary)?,
            axis1: Axis::decode(flat, AxisId::Secondary)?,
            model: Model::decode(flat)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_codes_map_to_names() {
        for (code, name) in [
            ("0", "Alt-Az"),
            ("1", "Equatorial Fork"),
            ("2", "German Equatorial"),
        ] {
            assert_eq!(
                Geometry::decode("mount.geometry", code).unwrap().to_string(),
                name
            );
        }
    }

    #[test]
    fn unknown_geometry_is_an_error() {
        for code in ["3", "-1", "", "altaz", "1.0"] {
            assert_eq!(
                Geometry::decode("mount.geometry", code),
                Err(DecodeError::UnknownGeometry {
                    code: code.to_owned()
                })
            );
        }
    }

    #[test]
    fn axes_read_their_own_keys() {
        let flat = FlatResponse::parse(
            "mount.axis0.is_enabled=true
mount.axis0.rms_error_arcsec=0.1
mount.axis0.dist_to_target_arcsec=0.2
mount.axis0.servo_error_arcsec=0.3
mount.axis0.position_degs=10
mount.axis1.is_enabled=false
mount.axis1.rms_error_arcsec=1.1
mount.axis1.dist_to_target_arcsec=1.2
mount.axis1.servo_error_arcsec=1.3
mount.axis1.position_degs=20",
        );

        let primary = Axis::decode(&flat, AxisId::Primary).unwrap();
        let secondary = Axis::decode(&flat, AxisId::Secondary).unwrap();

        assert!(primary.is_enabled);
        assert_eq!(primary.position_degs, 10.0);
        assert!(!secondary.is_enabled);
        assert_eq!(secondary.servo_error_arcsec, 1.3);
    }

    #[test]
    fn axis_ids_display_as_wire_prefixes() {
        assert_eq!(AxisId::Primary.to_string(), "axis0");
        assert_eq!(AxisId::Secondary.to_string(), "axis1");
        assert_eq!(AxisId::try_from(1_u8).unwrap(), AxisId::Secondary);
    }
}
