// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pre-flight TLS Probe
//!
//! Checks that the vCenter answers over HTTPS before any collection starts,
//! so a misconfigured endpoint fails the run with an actionable message
//! instead of a generic provider error halfway through.
//!
//! # Outcomes
//!
//! ```text
//! strict handshake ok                      → Ok(())
//! strict fails, timed out                  → ConnectTimeout
//! strict fails, lenient handshake ok       → CertificateRejected (with config hint)
//! strict fails, lenient fails              → Unreachable / ConnectTimeout
//! ```
//!
//! Any HTTP response counts as success: only the connection and the
//! certificate are being tested. A server that completes the handshake but
//! is slow to answer the request also passes; only a timeout while
//! connecting is reported as `ConnectTimeout`.

use reqwest::Client;
use std::error::Error as StdError;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::ConnectionOptions;
use crate::errors::{InventoryError, InventoryResult};

/// Connect timeout for each probe attempt
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// How long to wait for a response once connected
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(15);

/// Host part of a configured vSphere URI (scheme and trailing path removed)
pub fn probe_host(uri: &str) -> &str {
    let uri = uri.trim();
    let uri = uri
        .strip_prefix("https://")
        .or_else(|| uri.strip_prefix("http://"))
        .unwrap_or(uri);
    uri.split('/').next().unwrap_or(uri)
}

fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn build_client(accept_invalid_certs: bool, response_timeout: Duration) -> InventoryResult<Client> {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(response_timeout)
        .danger_accept_invalid_certs(accept_invalid_certs)
        .build()
        .map_err(|e| InventoryError::Configuration(format!("cannot build HTTPS client: {}", e)))
}

async fn attempt(client: &Client, url: &str) -> Result<(), reqwest::Error> {
    match client.get(url).send().await {
        Ok(response) => {
            debug!("Pre-flight {} answered {}", url, response.status());
            Ok(())
        }
        // Connection established, the server is just slow to answer
        Err(e) if e.is_timeout() && !e.is_connect() => {
            debug!("Pre-flight {} connected but did not answer in time", url);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn unreachable(host: &str, err: &reqwest::Error) -> InventoryError {
    if err.is_timeout() {
        InventoryError::ConnectTimeout {
            host: host.to_string(),
            cause: error_chain(err),
        }
    } else {
        InventoryError::Unreachable {
            host: host.to_string(),
            cause: error_chain(err),
        }
    }
}

/// Probe the vCenter endpoint
///
/// When `options` already tolerate invalid certificates, only the lenient
/// attempt is made.
pub async fn check_tls_connection(uri: &str, options: &ConnectionOptions) -> InventoryResult<()> {
    let host = probe_host(uri);
    if host.is_empty() {
        return Err(InventoryError::Configuration("vsphere.uri is empty".to_string()));
    }
    let url = format!("https://{}/", host);
    let lenient = options.accepts_invalid_certificates();

    let strict_error = match attempt(&build_client(lenient, RESPONSE_TIMEOUT)?, &url).await {
        Ok(()) => {
            info!("Pre-flight connection to https://{} succeeded", host);
            return Ok(());
        }
        Err(e) if lenient || e.is_timeout() => return Err(unreachable(host, &e)),
        Err(e) => e,
    };

    warn!(
        "Strict TLS connection to https://{} failed, retrying without certificate checks",
        host
    );
    match attempt(&build_client(true, RESPONSE_TIMEOUT)?, &url).await {
        Ok(()) => Err(InventoryError::CertificateRejected {
            host: host.to_string(),
            cause: error_chain(&strict_error),
        }),
        Err(e) => Err(unreachable(host, &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("vcenter.example.com", "vcenter.example.com" ; "bare host")]
    #[test_case("https://vcenter.example.com/", "vcenter.example.com" ; "scheme and slash")]
    #[test_case("vcenter.example.com:8443/sdk", "vcenter.example.com:8443" ; "port and path")]
    #[test_case("  ", "" ; "blank")]
    fn test_probe_host(uri: &str, expected: &str) {
        assert_eq!(probe_host(uri), expected);
    }

    #[tokio::test]
    async fn test_empty_uri_is_configuration_error() {
        let err = check_tls_connection("", &ConnectionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, InventoryError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_closed_port_is_unreachable() {
        let err = check_tls_connection("127.0.0.1:1", &ConnectionOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_preflight_failure());
        assert!(!matches!(err, InventoryError::CertificateRejected { .. }));
    }

    #[tokio::test]
    async fn test_connected_but_silent_server_passes() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        });

        let client = build_client(false, Duration::from_millis(200)).unwrap();
        let outcome = attempt(&client, &format!("http://{}/", addr)).await;
        assert!(outcome.is_ok());
        server.abort();
    }

    #[tokio::test]
    async fn test_refused_connection_is_not_swallowed() {
        let client = build_client(false, Duration::from_millis(200)).unwrap();
        let err = attempt(&client, "http://127.0.0.1:1/").await.unwrap_err();
        assert!(err.is_connect());
    }
}
