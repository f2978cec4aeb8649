use axum::{
    extract::{ConnectInfo, Request},
    http::HeaderMap,
};
use std::net::{IpAddr, SocketAddr};

use crate::config::SecurityConfig;

/// The header-derived facts the request gate decides on
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestContext {
    client_key: String,
    api_key: Option<String>,
}

impl RequestContext {
    pub fn new(client_key: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client_key: client_key.into(),
            api_key,
        }
    }

    /// Build from headers and the socket peer, preferring the proxy-supplied client IP
    pub fn from_parts(headers: &HeaderMap, peer: Option<IpAddr>, security: &SecurityConfig) -> Self {
        let forwarded = header_str(headers, &security.client_ip_header)
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        let client_key = match (forwarded, peer) {
            (Some(ip), _) => ip.to_string(),
            (None, Some(peer)) => peer.to_string(),
            (None, None) => "unknown".to_string(),
        };

        let api_key = header_str(headers, &security.api_key_header).map(str::to_string);

        Self { client_key, api_key }
    }

    pub fn from_request(request: &Request, security: &SecurityConfig) -> Self {
        let peer = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());
        Self::from_parts(request.headers(), peer, security)
    }

    /// Rate-limit bucket for this caller
    pub fn client_key(&self) -> &str {
        &self.client_key
    }

    /// True only for an exact match against a non-empty configured key
    pub fn presents_key(&self, expected: &str) -> bool {
        !expected.is_empty() && self.api_key.as_deref() == Some(expected)
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
