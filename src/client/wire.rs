//! Encoding of requests into what goes on the wire.

use crate::errors::UsageError;
use crate::request::{Command, Request};
use std::fmt::Write;
use url::{Url, form_urlencoded};

/// Build the GET URL for a request: `{base}/{segment}/...?{key}={value}&...`.
///
/// Values are percent-encoded with spaces as `%20` rather than `+`, which
/// the PWI4 query parser doesn't understand.
pub fn http_url(base: &Url, request: &Request) -> Result<Url, UsageError> {
    let invalid_base = || UsageError::InvalidBaseUrl {
        url: base.to_string(),
    };

    let mut url = match &request.command {
        Command::Path(segments) => {
            let mut url = base.clone();
            let _ = url
                .path_segments_mut()
                .map_err(|()| invalid_base())?
                .pop_if_empty()
                .extend(segments);
            url
        }
        Command::Raw(raw) => {
            if base.cannot_be_a_base() {
                return Err(invalid_base());
            }
            Url::parse(&format!(
                "{}/{}",
                base.as_str().trim_end_matches('/'),
                raw.trim().trim_start_matches('/')
            ))?
        }
    };

    if !request.params.is_empty() {
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(
                request
                    .params
                    .iter()
                    .map(|(name, value)| (name, value.to_string())),
            )
            .finish()
            .replace('+', "%20");

        let query = match url.query() {
            Some(existing) if !existing.is_empty() => format!("{existing}&{encoded}"),
            _ => encoded,
        };
        url.set_query(Some(&query));
    }

    Ok(url)
}

/// Structured commands the TCP protocol understands, with their TCP verbs.
const TCP_VERBS: &[(&[&str], &str)] = &[
    (&["status"], "status"),
    (&["mount", "goto_ra_dec_apparent"], "gotoradecapp"),
    (&["mount", "follow_tle"], "tle"),
    (&["mount", "tracking_on"], "track"),
    (&["mount", "stop"], "stop"),
];

/// TCP verb for a structured command path, if it has one.
pub fn tcp_verb(segments: &[String]) -> Option<&'static str> {
    TCP_VERBS
        .iter()
        .find(|(path, _)| segments.iter().map(String::as_str).eq(path.iter().copied()))
        .map(|&(_, verb)| verb)
}

/// Build the TCP message for a request: `{verb}\n` then one line per parameter value.
///
/// Structured commands are translated to their TCP verb (`mount/tracking_on`
/// becomes `track`); ones without a TCP counterpart are rejected. Raw
/// commands are sent as given, with a terminator appended if missing.
pub fn tcp_message(request: &Request) -> Result<String, UsageError> {
    let mut message = match &request.command {
        Command::Path(segments) => tcp_verb(segments)
            .ok_or_else(|| UsageError::NotSupportedOverTcp {
                command: request.command.to_string(),
            })?
            .to_owned(),
        Command::Raw(raw) => raw.clone(),
    };
    if !message.ends_with('\n') {
        message.push('\n');
    }
    for value in request.params.values() {
        let _ = writeln!(message, "{value}");
    }
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Tle;
    use crate::params::{Params, params};

    fn base() -> Url {
        Url::parse("http://localhost:8220").unwrap()
    }

    fn goto() -> Request {
        Request::with_params(
            &["mount", "goto_ra_dec_apparent"],
            params! {
                ra_hours: 10.5,
                dec_degs: -5.25,
            },
        )
    }

    #[test]
    fn joins_path_and_query() {
        assert_eq!(
            http_url(&base(), &goto()).unwrap().as_str(),
            "http://localhost:8220/mount/goto_ra_dec_apparent?ra_hours=10.5&dec_degs=-5.25"
        );
    }

    #[test]
    fn query_round_trips() {
        let url = http_url(&base(), &goto()).unwrap();

        let decoded = url
            .query_pairs()
            .map(|(name, value)| (name.into_owned(), value.parse::<f64>().unwrap()))
            .collect::<Vec<_>>();

        assert_eq!(
            decoded,
            [("ra_hours".to_owned(), 10.5), ("dec_degs".to_owned(), -5.25)]
        );
    }

    #[test]
    fn spaces_are_percent_encoded() {
        let request = Request::with_params(
            &["mount", "gotoradec2000"],
            params! {
                ra: 10.123,
                dec: "15 30 45",
                name: "a+b",
            },
        );

        assert_eq!(
            http_url(&base(), &request).unwrap().query(),
            Some("ra=10.123&dec=15%2030%2045&name=a%2Bb")
        );
    }

    #[test]
    fn keeps_base_path() {
        let base = Url::parse("http://10.0.0.5:8220/pwi/").unwrap();
        assert_eq!(
            http_url(&base, &Request::simple(&["mount", "stop"]))
                .unwrap()
                .as_str(),
            "http://10.0.0.5:8220/pwi/mount/stop"
        );
    }

    #[test]
    fn no_query_without_params() {
        let url = http_url(&base(), &Request::simple(&["status"])).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8220/status");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn raw_commands_are_sent_verbatim() {
        assert_eq!(
            http_url(&base(), &Request::raw("mount/connect?foo=1"))
                .unwrap()
                .as_str(),
            "http://localhost:8220/mount/connect?foo=1"
        );
        assert_eq!(
            tcp_message(&Request::raw("gotoradecapp\n5\n5\n")).unwrap(),
            "gotoradecapp\n5\n5\n"
        );
        assert_eq!(tcp_message(&Request::raw("track")).unwrap(), "track\n");
    }

    #[test]
    fn rejects_non_base_urls() {
        let base = Url::parse("mailto:someone@example.com").unwrap();
        assert!(matches!(
            http_url(&base, &Request::simple(&["status"])),
            Err(UsageError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn tcp_uses_protocol_verbs() {
        assert_eq!(
            tcp_message(&goto()).unwrap(),
            "gotoradecapp\n10.5\n-5.25\n"
        );
        assert_eq!(tcp_message(&Request::simple(&["status"])).unwrap(), "status\n");
        assert_eq!(
            tcp_message(&Request::simple(&["mount", "tracking_on"])).unwrap(),
            "track\n"
        );
        assert_eq!(
            tcp_message(&Request::simple(&["mount", "stop"])).unwrap(),
            "stop\n"
        );
        assert_eq!(
            tcp_message(&Request::with_params(
                &["mount", "follow_tle"],
                Tle::new("ISS", "1 2", "2 3").to_params()
            ))
            .unwrap(),
            "tle\nISS\n1 2\n2 3\n"
        );
    }

    #[test]
    fn tcp_rejects_commands_without_a_verb() {
        for request in [
            Request::with_params(&["mount", "enable"], Params::new().with("axis", 0_i32)),
            Request::simple(&["mount", "park"]),
            Request::simple(&["mount", "tracking_on", "now"]),
        ] {
            assert_eq!(
                tcp_message(&request),
                Err(UsageError::NotSupportedOverTcp {
                    command: request.command.to_string()
                })
            );
        }
    }
}
