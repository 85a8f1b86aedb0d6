//! Server configuration

use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
};

use url::Url;

use crate::protocol::error::{A2AError, A2AResult};

/// Default listening port
pub const DEFAULT_PORT: u16 = 3000;

/// Environment variables read by [`ServerConfig::from_env`]
pub mod vars {
    pub const BIND: &str = "A2A_BIND";
    pub const PORT: &str = "PORT";
    pub const A2A_PORT: &str = "A2A_PORT";
    pub const BASE_URL: &str = "A2A_BASE_URL";
    pub const FALLBACK_TO_FIRST_AGENT: &str = "A2A_FALLBACK_TO_FIRST_AGENT";
}

/// Configuration for an A2A server
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Interface to listen on
    pub bind_address: IpAddr,

    /// TCP port, `0` picks a free port
    pub port: u16,

    /// Externally visible base URL used in agent cards
    ///
    /// Defaults to `http://localhost:{port}`.
    pub base_url: Option<Url>,

    /// Route requests that address no agent to the first registered one
    pub fallback_to_first_agent: bool,
}

impl ServerConfig {
    /// Create a configuration listening on all interfaces at `port`
    pub fn new(port: u16) -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port,
            base_url: None,
            fallback_to_first_agent: true,
        }
    }

    /// Build a configuration from the process environment
    ///
    /// Unset variables keep their defaults. `A2A_PORT` is consulted when
    /// `PORT` is unset.
    pub fn from_env() -> A2AResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> A2AResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(bind) = lookup(vars::BIND) {
            config.bind_address = bind.trim().parse().map_err(|_| {
                A2AError::Configuration(format!("{} is not an IP address: {}", vars::BIND, bind))
            })?;
        }

        if let Some((name, port)) = lookup(vars::PORT)
            .map(|p| (vars::PORT, p))
            .or_else(|| lookup(vars::A2A_PORT).map(|p| (vars::A2A_PORT, p)))
        {
            config.port = port.trim().parse().map_err(|_| {
                A2AError::Configuration(format!("{} is not a valid port: {}", name, port))
            })?;
        }

        if let Some(base_url) = lookup(vars::BASE_URL) {
            config.base_url = Some(parse_base_url(&base_url)?);
        }

        if let Some(flag) = lookup(vars::FALLBACK_TO_FIRST_AGENT) {
            config.fallback_to_first_agent = parse_flag(&flag).ok_or_else(|| {
                A2AError::Configuration(format!(
                    "{} must be true or false: {}",
                    vars::FALLBACK_TO_FIRST_AGENT,
                    flag
                ))
            })?;
        }

        Ok(config)
    }

    /// Set the bind address
    pub fn with_bind_address(mut self, bind_address: IpAddr) -> Self {
        self.bind_address = bind_address;
        self
    }

    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the public base URL
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Enable or disable fallback routing to the first agent
    pub fn with_fallback_to_first_agent(mut self, enabled: bool) -> Self {
        self.fallback_to_first_agent = enabled;
        self
    }

    /// Address to bind the listener to
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }

    /// Base URL advertised in agent cards
    pub fn resolved_base_url(&self) -> A2AResult<Url> {
        match &self.base_url {
            Some(url) => Ok(url.clone()),
            None => parse_base_url(&format!("http://localhost:{}", self.port)),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PORT)
    }
}

/// Parse an absolute http(s) URL
pub fn parse_base_url(raw: &str) -> A2AResult<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| A2AError::Configuration(format!("invalid base URL {}: {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(A2AError::Configuration(format!(
            "base URL must use http or https, got {}",
            scheme
        ))),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
