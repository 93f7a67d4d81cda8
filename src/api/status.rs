use super::{AutoFocus, Focuser, M3, Mount, Rotator, Site};
use crate::errors::DecodeError;
use crate::response::FlatResponse;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use time::OffsetDateTime;

/// Full status of the PWI4 server at the time of its last status-bearing reply.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Server version, if reported.
    pub version: Option<String>,
    /// Observatory location and sidereal time.
    pub site: Site,
    /// Mount state, including both axes and the pointing model.
    pub mount: Mount,
    /// Focuser state.
    pub focuser: Focuser,
    /// Rotator state.
    pub rotator: Rotator,
    /// Tertiary mirror state.
    pub m3: M3,
    /// Autofocus routine state.
    pub autofocus: AutoFocus,
    /// When the reply this snapshot was decoded from was received.
    ///
    /// `None` until the first successful update.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub received_at: Option<OffsetDateTime>,
}

impl StatusSnapshot {
    /// Decode a complete snapshot, failing on the first missing or malformed key.
    ///
    /// Keys that aren't part of the model are ignored.
    pub fn decode(flat: &FlatResponse) -> Result<Self, DecodeError> {
        Ok(Self {
            version: flat.optional_field("pwi4.version")?,
            site: Site::decode(flat)?,
            mount: Mount::decode(flat)?,
            focuser: Focuser::decode(flat)?,
            rotator: Rotator::decode(flat)?,
            m3: M3::decode(flat)?,
            autofocus: AutoFocus::decode(flat)?,
            received_at: Some(OffsetDateTime::now_utc()),
        })
    }

    /// Replace this snapshot with one decoded from `flat`.
    ///
    /// On error, `self` is left untouched.
    pub fn update(&mut self, flat: &FlatResponse) -> Result<(), DecodeError> {
        *self = Self::decode(flat)?;
        Ok(())
    }

    /// Parse a raw reply body and [`update`](Self::update) from it.
    pub fn update_from_body(&mut self, body: &[u8]) -> Result<(), DecodeError> {
        self.update(&FlatResponse::from_bytes(body)?)
    }

    /// Whether this snapshot has ever been filled from a reply.
    pub const fn is_populated(&self) -> bool {
        self.received_at.is_some()
    }
}

impl Display for StatusSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            version,
            site,
            mount,
            focuser,
            rotator,
            m3,
            autofocus,
            received_at,
        } = self;

        writeln!(f, "Version: {}", version.as_deref().unwrap_or("unknown"))?;
        if let Some(received_at) = received_at {
            writeln!(f, "Received: {received_at}")?;
        }

        writeln!(f, "----- Site -----")?;
        writeln!(f, "\tLatitude = {} degrees", site.latitude_degs)?;
        writeln!(f, "\tLongitude = {} degrees", site.longitude_degs)?;
        writeln!(f, "\tHeight = {} metres", site.height_meters)?;
        writeln!(f, "\tLocal sidereal time = {} hours", site.lmst_hours)?;

        writeln!(f, "----- Mount -----")?;
        writeln!(f, "\tConnected: {}", mount.is_connected)?;
        writeln!(f, "\tGeometry: {}", mount.geometry)?;
        writeln!(
            f,
            "\tApparent RA/Dec = {}h, {} degrees",
            mount.ra_apparent_hours, mount.dec_apparent_degs
        )?;
        writeln!(
            f,
            "\tJ2000 RA/Dec = {}h, {} degrees",
            mount.ra_j2000_hours, mount.dec_j2000_degs
        )?;
        writeln!(
            f,
            "\tTarget RA/Dec = {}h, {} degrees",
            mount.target_ra_apparent_hours, mount.target_dec_apparent_degs
        )?;
        writeln!(
            f,
            "\tAlt/Az = {}, {} degrees",
            mount.altitude_degs, mount.azimuth_degs
        )?;
        writeln!(f, "\tSlewing: {}", mount.is_slewing)?;
        writeln!(f, "\tTracking: {}", mount.is_tracking)?;
        writeln!(
            f,
            "\tField angle here / at target = {} / {} degrees ({} degrees/s)",
            mount.field_angle_here_degs,
            mount.field_angle_at_target_degs,
            mount.field_angle_rate_at_target_degs_per_sec
        )?;
        writeln!(
            f,
            "\tPath angle at target = {} degrees ({} degrees/s)",
            mount.path_angle_at_target_degs, mount.path_angle_rate_at_target_degs_per_sec
        )?;
        for (name, axis) in [("Axis 0", &mount.axis0), ("Axis 1", &mount.axis1)] {
            writeln!(
                f,
                "\t{name}: enabled={}, position={} degrees, rms={}\", to target={}\", servo={}\"",
                axis.is_enabled,
                axis.position_degs,
                axis.rms_error_arcsec,
                axis.dist_to_target_arcsec,
                axis.servo_error_arcsec
            )?;
        }
        writeln!(
            f,
            "\tModel: {} ({}/{} points enabled, rms={}\")",
            mount.model.filename,
            mount.model.num_points_enabled,
            mount.model.num_points_total,
            mount.model.rms_error_arcsec
        )?;

        writeln!(f, "----- Focuser -----")?;
        writeln!(
            f,
            "\tConnected: {}, enabled: {}, moving: {}",
            focuser.is_connected, focuser.is_enabled, focuser.is_moving
        )?;
        writeln!(f, "\tPosition = {}", focuser.position)?;

        writeln!(f, "----- Rotator -----")?;
        writeln!(
            f,
            "\tConnected: {}, enabled: {}, moving: {}, slewing: {}",
            rotator.is_connected, rotator.is_enabled, rotator.is_moving, rotator.is_slewing
        )?;
        writeln!(
            f,
            "\tMechanical position = {} degrees, field angle = {} degrees",
            rotator.mech_position_degs, rotator.field_angle_degs
        )?;

        writeln!(f, "----- M3 -----")?;
        writeln!(f, "\tPort = {}", m3.port)?;

        writeln!(f, "----- Autofocus -----")?;
        writeln!(
            f,
            "\tRunning: {}, success: {}",
            autofocus.is_running, autofocus.success
        )?;
        write!(
            f,
            "\tBest position = {}, tolerance = {}",
            autofocus.best_position, autofocus.tolerance
        )
    }
}
