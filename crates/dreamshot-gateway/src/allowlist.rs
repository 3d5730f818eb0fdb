// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Host allow-list for the image proxy.
//!
//! Only `http`/`https` URLs whose host is on the configured list pass. Literal
//! private, loopback and link-local addresses are refused unless private-IP
//! blocking is turned off (local development and tests).

use std::net::{IpAddr, Ipv4Addr};

use axum::http::StatusCode;
use dreamshot_config::model::ProxyConfig;
use thiserror::Error;
use tracing::warn;
use url::{Host, Url};

/// Why a proxy target was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProxyRejection {
    #[error("Missing url parameter")]
    MissingUrl,

    #[error("Invalid url: {0}")]
    InvalidUrl(String),

    #[error("Unsupported protocol: {0}")]
    UnsupportedScheme(String),

    #[error("Host not allowed: {0}")]
    HostNotAllowed(String),

    #[error("Private address not allowed: {0}")]
    PrivateAddress(IpAddr),
}

impl ProxyRejection {
    /// Malformed requests are 400; well-formed requests for hosts we refuse
    /// to reach are 403.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingUrl | Self::InvalidUrl(_) | Self::UnsupportedScheme(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::HostNotAllowed(_) | Self::PrivateAddress(_) => StatusCode::FORBIDDEN,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HostAllowlist {
    hosts: Vec<String>,
    block_private_ips: bool,
}

impl HostAllowlist {
    pub fn new<I, S>(hosts: I, block_private_ips: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            hosts: hosts
                .into_iter()
                .map(|h| h.as_ref().trim().to_ascii_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
            block_private_ips,
        }
    }

    pub fn from_config(config: &ProxyConfig) -> Self {
        Self::new(&config.allowed_hosts, config.block_private_ips)
    }

    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    /// Parse `raw` and check it against the list.
    pub fn check(&self, raw: &str) -> Result<Url, ProxyRejection> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ProxyRejection::MissingUrl);
        }
        let url = Url::parse(raw).map_err(|e| ProxyRejection::InvalidUrl(e.to_string()))?;
        self.check_url(&url)?;
        Ok(url)
    }

    /// Check an already-parsed URL. Used for redirects as well as the initial
    /// request.
    pub fn check_url(&self, url: &Url) -> Result<(), ProxyRejection> {
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(ProxyRejection::UnsupportedScheme(other.to_string())),
        }

        let host = url
            .host()
            .ok_or_else(|| ProxyRejection::InvalidUrl("missing host".to_string()))?;

        let literal_ip = match host {
            Host::Ipv4(v4) => Some(IpAddr::V4(v4)),
            Host::Ipv6(v6) => Some(IpAddr::V6(v6)),
            Host::Domain(_) => None,
        };
        if self.block_private_ips
            && let Some(ip) = literal_ip
            && is_private_ip(&ip)
        {
            warn!(ip = %ip, "proxy blocked: URL targets private IP");
            return Err(ProxyRejection::PrivateAddress(ip));
        }

        let host_str = match host {
            Host::Ipv6(v6) => v6.to_string(),
            other => other.to_string(),
        };
        if self.hosts.iter().any(|allowed| *allowed == host_str) {
            Ok(())
        } else {
            Err(ProxyRejection::HostNotAllowed(host_str))
        }
    }
}

/// RFC 1918, loopback, link-local, broadcast, unspecified, the cloud metadata
/// address, and the IPv6 loopback, unique-local and link-local ranges.
pub fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_private()
                || v4.is_loopback()
                || v4.is_link_local()
                || v4.is_broadcast()
                || v4.is_unspecified()
                || *v4 == Ipv4Addr::new(169, 254, 169, 254)
        }
        IpAddr::V6(v6) => {
            v6.is_loopback()
                || v6.is_unspecified()
                || (v6.segments()[0] & 0xfe00) == 0xfc00 // fc00::/7
                || (v6.segments()[0] & 0xffc0) == 0xfe80 // fe80::/10
        }
    }
}
