//! Client settings, optionally read from the environment.

use std::env;

use crate::api::DEFAULT_BASE_URL;

pub const ENV_AUTH_TOKEN: &str = "CLOUDPRINT_AUTH_TOKEN";
pub const ENV_BASE_URL: &str = "CLOUDPRINT_BASE_URL";
pub const ENV_THROW_ON_ERROR: &str = "CLOUDPRINT_THROW_ON_ERROR";

#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub auth_token: String,
    pub base_url: String,
    pub throw_on_error: bool,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("auth_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("throw_on_error", &self.throw_on_error)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            auth_token: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            throw_on_error: false,
        }
    }
}

impl ClientConfig {
    pub fn new(auth_token: impl Into<String>) -> Self {
        Self {
            auth_token: auth_token.into(),
            ..Self::default()
        }
    }

    /// Read `CLOUDPRINT_AUTH_TOKEN`, `CLOUDPRINT_BASE_URL` and
    /// `CLOUDPRINT_THROW_ON_ERROR`. Unset variables keep their defaults; a
    /// missing token is left empty and reported when the client is built.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(token) = lookup(ENV_AUTH_TOKEN) {
            config.auth_token = token;
        }
        if let Some(url) = lookup(ENV_BASE_URL).filter(|u| !u.is_empty()) {
            config.base_url = url;
        }
        if let Some(flag) = lookup(ENV_THROW_ON_ERROR) {
            config.throw_on_error = parse_flag(&flag);
        }
        config
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}
