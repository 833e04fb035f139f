use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ClinicError;
use crate::render::RenderMode;

/// Prefix for environment overrides, e.g. `CLINICDESK_DATABASE_URL`.
pub const ENV_PREFIX: &str = "CLINICDESK_";

pub const DEFAULT_CORS_ORIGIN: &str = "https://tamo-front.vercel.app";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// sqlx connection string for the record store.
    pub database_url: String,
    pub max_connections: u32,
    pub listen_addr: String,
    pub loglevel: String,
    /// How list and create responses are rendered for every entity.
    pub render_mode: RenderMode,
    /// The single frontend origin allowed by CORS.
    pub cors_origin: String,
    /// Directory served for paths no API route matches.
    pub static_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:healthcare.db".to_string(),
            max_connections: 5,
            listen_addr: "0.0.0.0:8080".to_string(),
            loglevel: "info".to_string(),
            render_mode: RenderMode::default(),
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            static_dir: None,
        }
    }
}

impl Config {
    /// Defaults overlaid with `CLINICDESK_*` environment variables.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ClinicError> {
        Ok(figment.extract()?)
    }

    pub fn load() -> Result<Self, ClinicError> {
        Self::from_figment(Self::figment())
    }
}
