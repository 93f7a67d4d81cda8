mod http;
pub use http::{HttpConfig, HttpTransport};

mod tcp;
pub use tcp::{TcpConfig, TcpTransport};

mod transport;
pub use transport::{Reply, Transport};

pub mod wire;

use crate::api::{AxisId, GuideDirection, StatusSnapshot, TleInput};
use crate::errors::{Error, Result};
use crate::macros::auto_increment;
use crate::params::{Params, params};
use crate::request::{Command, Request};
use bytes::Bytes;
use futures::TryFutureExt;
use tokio::sync::Mutex;
use tracing::Instrument;

/// What a successful command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The reply carried a full status, now available from [`Telescope::status`].
    StatusUpdated,
    /// A single reply line.
    Line(String),
    /// A body that isn't a status (only for raw commands).
    Body(Bytes),
    /// Success without any content.
    Empty,
}

fn next_request_id() -> u64 {
    auto_increment!()
}

#[derive(Debug)]
struct Session<T> {
    transport: T,
    status: StatusSnapshot,
}

/// Client for a PWI4-controlled telescope.
///
/// Every command goes through a single lock that covers both the transport and
/// the last known [`StatusSnapshot`], so at most one request is in flight and
/// the snapshot always matches the last status-bearing reply.
#[derive(Debug)]
pub struct Telescope<T = HttpTransport> {
    session: Mutex<Session<T>>,
}

impl Telescope<HttpTransport> {
    /// Client talking HTTP to the server described by `config`.
    pub fn http(config: &HttpConfig) -> Result<Self> {
        HttpTransport::new(config).map(Self::new)
    }
}

/// Commands only understood over the TCP protocol.
///
/// These reply with a single `OK` line; an `ERROR` line surfaces as
/// [`TransportError::Rejected`](crate::TransportError::Rejected).
impl Telescope<TcpTransport> {
    /// Client talking to the server described by `config` over a persistent TCP connection.
    pub async fn tcp(config: TcpConfig) -> Result<Self> {
        TcpTransport::connect(config).await.map(Self::new)
    }

    /// Tell the server the session is over and close the connection.
    pub async fn close(self) -> Result {
        self.into_transport().close().await
    }

    async fn tcp_command(&self, name: &str, params: Params) -> Result<Outcome> {
        self.execute(Request::new(Command::raw(name), params)?, false)
            .await
    }

    /// Shift target calculations by the given number of seconds.
    ///
    /// Useful to catch up with a satellite that's ahead of or behind its TLE.
    pub async fn set_time_offset(&self, offset_secs: f64) -> Result<Outcome> {
        self.tcp_command("settimeoffset", params! { offset_secs: offset_secs })
            .await
    }

    /// Offset the current tracking target in RA and Dec, in the server's units.
    pub async fn ra_dec_offset(&self, ra_offset: f64, dec_offset: f64) -> Result<Outcome> {
        self.tcp_command(
            "radecoffset",
            params! { ra_offset: ra_offset, dec_offset: dec_offset },
        )
        .await
    }

    /// Nudge the mount in `direction` for `duration_ms` milliseconds.
    pub async fn pulse_guide(&self, direction: GuideDirection, duration_ms: u32) -> Result<Outcome> {
        self.tcp_command(
            "pulseguide",
            params! { direction: u8::from(direction), duration_ms: duration_ms },
        )
        .await
    }
}

impl<T: Transport> Telescope<T> {
    /// Wrap an existing transport.
    pub fn new(transport: T) -> Self {
        Self {
            session: Mutex::new(Session {
                transport,
                status: StatusSnapshot::default(),
            }),
        }
    }

    /// Give back the transport, e.g. to close it.
    pub fn into_transport(self) -> T {
        self.session.into_inner().transport
    }

    /// Last known status, without contacting the server.
    pub async fn status(&self) -> StatusSnapshot {
        self.session.lock().await.status.clone()
    }

    async fn execute(&self, request: Request, lenient: bool) -> Result<Outcome> {
        let span = tracing::debug_span!(
            "PWI4 request",
            request_id = next_request_id(),
            command = %request.command,
            params = ?request.params,
        );

        async move {
            let mut session = self.session.lock().await;
            let outcome = match session.transport.exchange(&request).await? {
                Reply::Status(body) => match session.status.update_from_body(&body) {
                    Ok(()) => Outcome::StatusUpdated,
                    Err(err) if lenient => {
                        tracing::debug!(%err, "Reply is not a status, returning it as-is");
                        Outcome::Body(body)
                    }
                    Err(err) => return Err(err.into()),
                },
                Reply::Line(line) => Outcome::Line(line),
                Reply::Empty => Outcome::Empty,
            };
            tracing::debug!(?outcome, "Command completed");
            Ok::<_, Error>(outcome)
        }
        .map_err(|err| {
            tracing::error!(%err, "PWI4 request failed");
            err
        })
        .instrument(span)
        .await
    }

    async fn command(&self, path: &[&str], params: Params) -> Result<Outcome> {
        self.execute(Request::with_params(path, params), false)
            .await
    }

    /// Request the full status and return it.
    pub async fn fetch_status(&self) -> Result<StatusSnapshot> {
        let request = Request::simple(&["status"]);
        let span = tracing::debug_span!(
            "PWI4 request",
            request_id = next_request_id(),
            command = %request.command,
        );

        async move {
            let mut session = self.session.lock().await;
            let body = match session.transport.exchange(&request).await? {
                Reply::Status(body) => body,
                Reply::Line(line) => line.into(),
                Reply::Empty => Bytes::new(),
            };
            session.status.update_from_body(&body)?;
            Ok::<_, Error>(session.status.clone())
        }
        .map_err(|err| {
            tracing::error!(%err, "Couldn't fetch status");
            err
        })
        .instrument(span)
        .await
    }

    /// Send a command string as-is, for commands without a dedicated method.
    ///
    /// A reply that decodes as a full status updates the snapshot; any other
    /// body is returned as [`Outcome::Body`].
    pub async fn raw_command(&self, command: &str) -> Result<Outcome> {
        self.execute(Request::raw(command), true).await
    }

    /// Send an arbitrary request built by the caller.
    pub async fn request(&self, request: Request) -> Result<Outcome> {
        self.execute(request, false).await
    }

    /// Connect to the mount hardware.
    pub async fn connect(&self) -> Result<Outcome> {
        self.command(&["mount", "connect"], Params::new()).await
    }

    /// Disconnect from the mount hardware.
    pub async fn disconnect(&self) -> Result<Outcome> {
        self.command(&["mount", "disconnect"], Params::new()).await
    }

    /// Energize the motor of the given axis.
    pub async fn enable(&self, axis: AxisId) -> Result<Outcome> {
        self.command(&["mount", "enable"], params! { axis: axis.index() })
            .await
    }

    /// De-energize the motor of the given axis.
    pub async fn disable(&self, axis: AxisId) -> Result<Outcome> {
        self.command(&["mount", "disable"], params! { axis: axis.index() })
            .await
    }

    /// Run the homing routine.
    pub async fn find_home(&self) -> Result<Outcome> {
        self.command(&["mount", "find_home"], Params::new()).await
    }

    /// Stop all mount motion.
    pub async fn stop(&self) -> Result<Outcome> {
        self.command(&["mount", "stop"], Params::new()).await
    }

    /// Slew to apparent (topocentric) coordinates.
    pub async fn goto_ra_dec_apparent(&self, ra_hours: f64, dec_degs: f64) -> Result<Outcome> {
        self.command(
            &["mount", "goto_ra_dec_apparent"],
            params! { ra_hours: ra_hours, dec_degs: dec_degs },
        )
        .await
    }

    /// Slew to J2000 coordinates.
    pub async fn goto_ra_dec_j2000(&self, ra_hours: f64, dec_degs: f64) -> Result<Outcome> {
        self.command(
            &["mount", "goto_ra_dec_j2000"],
            params! { ra_hours: ra_hours, dec_degs: dec_degs },
        )
        .await
    }

    /// Slew to local horizontal coordinates.
    pub async fn goto_alt_az(&self, alt_degs: f64, az_degs: f64) -> Result<Outcome> {
        self.command(
            &["mount", "goto_alt_az"],
            params! { alt_degs: alt_degs, az_degs: az_degs },
        )
        .await
    }

    /// Apply position and rate offsets.
    ///
    /// Parameters are passed through as given; see [`Offset`](crate::api::Offset) for the names
    /// the server understands.
    pub async fn offset(&self, offset: impl Into<Params>) -> Result<Outcome> {
        self.command(&["mount", "offset"], offset.into()).await
    }

    /// Park the mount.
    pub async fn park(&self) -> Result<Outcome> {
        self.command(&["mount", "park"], Params::new()).await
    }

    /// Make the current position the park position.
    pub async fn set_park_here(&self) -> Result<Outcome> {
        self.command(&["mount", "set_park_here"], Params::new())
            .await
    }

    /// Start sidereal tracking.
    pub async fn tracking_on(&self) -> Result<Outcome> {
        self.command(&["mount", "tracking_on"], Params::new()).await
    }

    /// Stop tracking.
    pub async fn tracking_off(&self) -> Result<Outcome> {
        self.command(&["mount", "tracking_off"], Params::new())
            .await
    }

    /// Follow a satellite described by a TLE.
    ///
    /// Accepts a `\n`-separated string, three lines, a mapping keyed by
    /// `line0`/`line1`/`line2`, or a [`Tle`](crate::api::Tle). Anything that isn't
    /// exactly three lines fails before contacting the server.
    pub async fn follow_tle(&self, tle: impl Into<TleInput>) -> Result<Outcome> {
        let tle = tle.into().normalize()?;
        tracing::debug!(name = %tle.name, "Following TLE");
        self.command(&["mount", "follow_tle"], tle.to_params())
            .await
    }

    /// Add a calibration point at the given J2000 coordinates to the pointing model.
    pub async fn model_add_point(&self, ra_j2000_hours: f64, dec_j2000_degs: f64) -> Result<Outcome> {
        self.command(
            &["mount", "model", "add_point"],
            params! {
                ra_j2000_hours: ra_j2000_hours,
                dec_j2000_degs: dec_j2000_degs,
            },
        )
        .await
    }

    /// Remove all calibration points.
    pub async fn model_clear_points(&self) -> Result<Outcome> {
        self.command(&["mount", "model", "clear_points"], Params::new())
            .await
    }

    /// Make the current model the one loaded at startup.
    pub async fn model_save_as_default(&self) -> Result<Outcome> {
        self.command(&["mount", "model", "save_as_default"], Params::new())
            .await
    }

    /// Save the current model under `filename`.
    pub async fn model_save(&self, filename: &str) -> Result<Outcome> {
        self.command(&["mount", "model", "save"], params! { filename: filename })
            .await
    }

    /// Load a model from `filename`.
    pub async fn model_load(&self, filename: &str) -> Result<Outcome> {
        self.command(&["mount", "model", "load"], params! { filename: filename })
            .await
    }

    /// Energize the focuser motor.
    pub async fn focuser_enable(&self) -> Result<Outcome> {
        self.command(&["focuser", "enable"], Params::new()).await
    }

    /// De-energize the focuser motor.
    pub async fn focuser_disable(&self) -> Result<Outcome> {
        self.command(&["focuser", "disable"], Params::new()).await
    }

    /// Move the focuser to an absolute position.
    pub async fn focuser_goto(&self, target: f64) -> Result<Outcome> {
        self.command(&["focuser", "goto"], params! { target: target })
            .await
    }

    /// Stop focuser motion.
    pub async fn focuser_stop(&self) -> Result<Outcome> {
        self.command(&["focuser", "stop"], Params::new()).await
    }

    /// Energize the rotator motor.
    pub async fn rotator_enable(&self) -> Result<Outcome> {
        self.command(&["rotator", "enable"], Params::new()).await
    }

    /// De-energize the rotator motor.
    pub async fn rotator_disable(&self) -> Result<Outcome> {
        self.command(&["rotator", "disable"], Params::new()).await
    }

    /// Move the rotator to a mechanical position.
    pub async fn rotator_goto_mech(&self, target_degs: f64) -> Result<Outcome> {
        self.command(&["rotator", "goto_mech"], params! { degs: target_degs })
            .await
    }

    /// Move the rotator to a field angle.
    pub async fn rotator_goto_field(&self, target_degs: f64) -> Result<Outcome> {
        self.command(&["rotator", "goto_field"], params! { degs: target_degs })
            .await
    }

    /// Move the rotator relative to its current position.
    pub async fn rotator_offset(&self, offset_degs: f64) -> Result<Outcome> {
        self.command(&["rotator", "offset"], params! { degs: offset_degs })
            .await
    }

    /// Stop rotator motion.
    pub async fn rotator_stop(&self) -> Result<Outcome> {
        self.command(&["rotator", "stop"], Params::new()).await
    }

    /// Switch the tertiary mirror to the given port.
    pub async fn m3_goto(&self, target_port: i32) -> Result<Outcome> {
        self.command(&["m3", "goto"], params! { port: target_port })
            .await
    }

    /// Stop tertiary mirror motion.
    pub async fn m3_stop(&self) -> Result<Outcome> {
        self.command(&["m3", "stop"], Params::new()).await
    }
}
