//! HTTP client for the local narration service.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

/// Availability of the narration service.
///
/// Starts `Unknown`, then settles `Available` or `Unavailable` after
/// the probe. The probe is idempotent; the manual retry action simply
/// runs it again.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Availability {
    /// Not probed yet.
    #[default]
    Unknown,
    /// Service responded; narration is enabled.
    Available {
        /// Total record count reported by the service.
        total: usize,
    },
    /// Service did not respond; narration is disabled.
    Unavailable {
        /// Human-readable reason shown in the status bar.
        reason: String,
    },
}

impl Availability {
    /// True when narration is enabled.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }

    /// Record count when available.
    #[must_use]
    pub const fn total_records(&self) -> Option<usize> {
        match self {
            Self::Available { total } => Some(*total),
            _ => None,
        }
    }
}

/// Response shape of `GET /total-records`.
#[derive(Debug, Deserialize)]
struct TotalRecords {
    total: usize,
}

/// Blocking client for the narration service.
#[derive(Debug, Clone)]
pub struct AudioClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl AudioClient {
    /// Creates a client for the given base URL with a bounded request
    /// timeout, so a dead service can never stall the UI for long.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Base URL this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probes the service for its record count.
    ///
    /// Never returns an error: every failure mode maps to
    /// [`Availability::Unavailable`] with a human-readable reason.
    #[must_use]
    pub fn probe(&self) -> Availability {
        let url = format!("{}/total-records", self.base_url);

        let response = match self.http.get(&url).send() {
            Ok(response) => response,
            Err(err) if err.is_timeout() => {
                return Availability::Unavailable {
                    reason: "Audio service timed out. Narration disabled.".to_string(),
                }
            }
            Err(err) if err.is_connect() => {
                return Availability::Unavailable {
                    reason: "Could not connect to the audio service. Start it to enable narration."
                        .to_string(),
                }
            }
            Err(_) => {
                return Availability::Unavailable {
                    reason: "Audio service unavailable. Narration disabled.".to_string(),
                }
            }
        };

        if !response.status().is_success() {
            return Availability::Unavailable {
                reason: format!(
                    "Audio service returned {}. Narration disabled.",
                    response.status().as_u16()
                ),
            };
        }

        match response.json::<TotalRecords>() {
            Ok(body) => Availability::Available { total: body.total },
            Err(_) => Availability::Unavailable {
                reason: "Audio service sent an unexpected response. Narration disabled."
                    .to_string(),
            },
        }
    }

    /// Fetches the audio clip for a record index.
    ///
    /// # Errors
    ///
    /// Returns an error on any network or status failure; the caller
    /// reports it as a playback failure and moves on.
    pub fn fetch_clip(&self, index: usize) -> Result<Vec<u8>> {
        let url = format!("{}/audio/{}", self.base_url, index);

        let response = self
            .http
            .get(&url)
            .send()
            .context(format!("Failed to fetch audio clip {index}"))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Audio service returned {} for clip {index}",
                response.status().as_u16()
            );
        }

        let bytes = response
            .bytes()
            .context(format!("Failed to read audio clip {index}"))?;

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serves one canned HTTP response on an ephemeral port.
    fn one_shot_server(body: &'static str, status: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let response = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        format!("http://{addr}")
    }

    fn client(base_url: &str) -> AudioClient {
        AudioClient::new(base_url, Duration::from_secs(2)).unwrap()
    }

    #[test]
    fn test_probe_available() {
        let url = one_shot_server(r#"{"total": 42}"#, "200 OK");
        let availability = client(&url).probe();
        assert_eq!(availability, Availability::Available { total: 42 });
        assert!(availability.is_available());
        assert_eq!(availability.total_records(), Some(42));
    }

    #[test]
    fn test_probe_connection_refused() {
        // Nothing listens on this port; connecting fails fast.
        let availability = client("http://127.0.0.1:1").probe();
        match availability {
            Availability::Unavailable { reason } => {
                assert!(reason.contains("Narration disabled") || reason.contains("narration"));
            }
            other => panic!("Expected Unavailable, got {other:?}"),
        }
    }

    #[test]
    fn test_probe_non_success_status() {
        let url = one_shot_server("oops", "500 Internal Server Error");
        match client(&url).probe() {
            Availability::Unavailable { reason } => assert!(reason.contains("500")),
            other => panic!("Expected Unavailable, got {other:?}"),
        }
    }

    #[test]
    fn test_probe_malformed_body() {
        let url = one_shot_server("not json", "200 OK");
        assert!(matches!(
            client(&url).probe(),
            Availability::Unavailable { .. }
        ));
    }

    #[test]
    fn test_fetch_clip_success() {
        let url = one_shot_server("clip-bytes", "200 OK");
        let bytes = client(&url).fetch_clip(3).unwrap();
        assert_eq!(bytes, b"clip-bytes");
    }

    #[test]
    fn test_fetch_clip_error_status() {
        let url = one_shot_server("Index out of range", "400 Bad Request");
        let err = client(&url).fetch_clip(99).unwrap_err();
        assert!(err.to_string().contains("400"));
    }

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let client = client("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_availability_default_is_unknown() {
        assert_eq!(Availability::default(), Availability::Unknown);
        assert!(!Availability::Unknown.is_available());
        assert_eq!(Availability::Unknown.total_records(), None);
    }
}
