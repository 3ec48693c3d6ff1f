use std::env;

use log::warn;

use crate::blockchain::{DEFAULT_GENESIS_PAYEE, DEFAULT_POW_PREFIX};

/// Runtime settings, read from the environment (after `.env` is loaded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub pow_prefix: String,
    pub genesis_payee: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            pow_prefix: DEFAULT_POW_PREFIX.to_string(),
            genesis_payee: DEFAULT_GENESIS_PAYEE.to_string(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup; missing or unusable
    /// values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("PORT={raw:?} is not a valid port, using {}", defaults.port);
                defaults.port
            }),
            None => defaults.port,
        };

        let pow_prefix = match lookup("POW_PREFIX") {
            Some(raw) if is_hex_prefix(&raw) => raw,
            Some(raw) => {
                warn!("POW_PREFIX={raw:?} is not lowercase hex, using {:?}", defaults.pow_prefix);
                defaults.pow_prefix
            }
            None => defaults.pow_prefix,
        };

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            pow_prefix,
            genesis_payee: lookup("GENESIS_PAYEE").unwrap_or(defaults.genesis_payee),
        }
    }
}

fn is_hex_prefix(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
}
