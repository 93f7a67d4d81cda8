#![warn(
    clippy::pedantic,
    clippy::nursery,
    clippy::as_conversions,
    clippy::clone_on_ref_ptr,
    clippy::default_numeric_fallback,
    clippy::format_push_string,
    clippy::if_then_some_else_none,
    clippy::map_err_ignore,
    clippy::panic_in_result_fn,
    clippy::single_char_lifetime_names,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::unwrap_used,
    elided_lifetimes_in_paths,
    explicit_outlives_requirements,
    meta_variable_misuse,
    missing_copy_implementations,
    missing_debug_implementations,
    // missing_docs,
    // clippy::cargo,
    noop_method_call,
    single_use_lifetimes,
    unreachable_pub,
    // unsafe_code,
    unused_lifetimes,
    unused_macro_rules,
    unused_qualifications,
    unused_results
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::return_self_not_must_use,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::redundant_pub_crate,
    clippy::single_match_else
)]

//! Client for telescope mounts driven by PlaneWave's PWI4 control software.
//!
//! PWI4 exposes its command set over HTTP (`GET /mount/goto_alt_az?alt_degs=..&az_degs=..`)
//! and, on some installations, over a persistent line-oriented TCP socket.
//! The TCP protocol only covers a subset of commands (status, apparent
//! RA/Dec goto, TLE following, tracking, stop, plus a few TCP-only ones);
//! the rest fail with [`UsageError::NotSupportedOverTcp`] there.
//! Most commands reply with the full device status as flat `key=value` lines,
//! which the client decodes into a typed [`api::StatusSnapshot`].
//!
//! ```no_run
//! use pwi4_client::{HttpConfig, Telescope};
//!
//! # async fn example() -> pwi4_client::Result {
//! let telescope = Telescope::http(&HttpConfig::default())?;
//!
//! telescope.connect().await?;
//! telescope.goto_alt_az(45.0, 180.0).await?;
//!
//! let status = telescope.fetch_status().await?;
//! println!("{status}");
//! # Ok(())
//! # }
//! ```
//!
//! Both transports implement [`Transport`], so [`Telescope`] can be used with
//! either of them:
//!
//! ```no_run
//! use pwi4_client::{TcpConfig, Telescope};
//! use std::time::Duration;
//!
//! # async fn example() -> pwi4_client::Result {
//! let telescope = Telescope::tcp(TcpConfig {
//!     host: "192.168.1.20".to_owned(),
//!     total_timeout: Duration::from_secs(20),
//!     ..Default::default()
//! })
//! .await?;
//!
//! telescope.follow_tle(
//!     "ISS (ZARYA)\n\
//!      1 25544U 98067A   20140.34419374 -.00000374  00000-0  13653-5 0  9990\n\
//!      2 25544  51.6433 131.2277 0001338 330.3524 173.1622 15.49372617227549",
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```

mod macros;

pub mod api;

mod catalog;
pub use catalog::TleCatalog;

mod client;
pub use client::{
    HttpConfig, HttpTransport, Outcome, Reply, TcpConfig, TcpTransport, Telescope, Transport, wire,
};

mod errors;
pub use errors::{DecodeError, Error, Result, StatusCode, TransportError, UsageError};

mod params;
pub use params::{ParamValue, Params};

mod request;
pub use request::{Command, Request};

mod response;
pub use response::FlatResponse;

#[cfg(test)]
mod test_utils;
