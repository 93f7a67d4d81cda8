use crate::params::{ParamValue, Params};

/// What an offset applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum OffsetAxis {
    /// Target right ascension.
    #[display("ra")]
    Ra,
    /// Target declination.
    #[display("dec")]
    Dec,
    /// Mount primary axis position (roughly azimuth or RA).
    #[display("axis0")]
    Axis0,
    /// Mount secondary axis position (roughly altitude or Dec).
    #[display("axis1")]
    Axis1,
    /// Along the direction of travel of a moving target.
    #[display("path")]
    Path,
    /// Perpendicular to the direction of travel of a moving target.
    #[display("transverse")]
    Transverse,
}

/// Parameters for `mount/offset`.
///
/// The remote side decides which combinations are legal; nothing here is
/// validated, and the parameters are sent in the order they were added.
///
/// ```
/// use pwi4_client::api::{Offset, OffsetAxis};
///
/// let offset = Offset::new()
///     .add_arcsec(OffsetAxis::Axis0, -30.0)
///     .set_rate_arcsec_per_sec(OffsetAxis::Axis0, 1.0)
///     .reset(OffsetAxis::Transverse);
/// ```
#[derive(Debug, Clone, Default, PartialEq, derive_more::From, derive_more::Into)]
pub struct Offset(Params);

impl Offset {
    /// No offsets yet.
    pub fn new() -> Self {
        Self::default()
    }

    fn with(mut self, axis: OffsetAxis, action: &str, value: impl Into<ParamValue>) -> Self {
        let _ = self.0.insert(format!("{axis}_{action}"), value);
        self
    }

    /// Clear all position and rate offsets for this axis.
    pub fn reset(self, axis: OffsetAxis) -> Self {
        self.with(axis, "reset", 0_i32)
    }

    /// Set any active offset rate to zero.
    pub fn stop_rate(self, axis: OffsetAxis) -> Self {
        self.with(axis, "stop_rate", 0_i32)
    }

    /// Increase the current position offset by the given amount.
    pub fn add_arcsec(self, axis: OffsetAxis, arcsec: f64) -> Self {
        self.with(axis, "add_arcsec", arcsec)
    }

    /// Continually increase the offset at the given rate.
    pub fn set_rate_arcsec_per_sec(self, axis: OffsetAxis, rate: f64) -> Self {
        self.with(axis, "set_rate_arcsec_per_sec", rate)
    }

    /// Any other named parameter, passed through untouched.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        let _ = self.0.insert(name, value);
        self
    }
}
