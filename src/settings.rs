//! Runtime configuration: an optional `config.{toml,yaml,json}` file overlaid by the
//! environment (`SUPABASE_URL`, `JWT_SECRET`, `PORT`...).

use anyhow::Context;
use config::{Config, Environment, File};
use reqwest::Url;
use secrecy::SecretString;
use serde::Deserialize;
use std::collections::HashMap;

static PRODUCTION_ORIGINS: [&str; 3] = [
    "https://traei3h5kaag.vercel.app",
    "https://acieicard.vercel.app",
    "https://aciei-card.vercel.app",
];
static DEVELOPMENT_ORIGIN: &str = "http://localhost:3000";

#[derive(Deserialize, Debug)]
pub struct Settings {
    /// Project URL of the hosted database, e.g. `https://<project>.supabase.co`.
    pub supabase_url: Url,
    pub supabase_service_key: SecretString,
    pub jwt_secret: SecretString,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub node_env: Option<String>,
    /// Overrides the per-environment list of origins allowed by CORS.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
    #[serde(default = "default_database_max_retries")]
    pub database_max_retries: u32,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3002
}

fn default_token_ttl_hours() -> i64 {
    crate::auth::tokens::DEFAULT_TOKEN_TTL_HOURS
}

fn default_database_max_retries() -> u32 {
    3
}

impl Settings {
    /// Reads the configuration file (if any) and the process environment.
    pub fn read() -> anyhow::Result<Self> {
        Self::read_from(None)
    }

    /// Like [`read`](Self::read), taking environment variables from `env` instead of the process.
    pub fn read_from(env: Option<HashMap<String, String>>) -> anyhow::Result<Self> {
        let settings: Self = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::default()
                    .source(env)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_origins"),
            )
            .build()?
            .try_deserialize()
            .context("Failed to assemble the required configuration")?;

        if !matches!(settings.supabase_url.scheme(), "http" | "https") {
            anyhow::bail!(
                "SUPABASE_URL must be an http(s) URL, got `{}`",
                settings.supabase_url
            );
        }

        Ok(settings)
    }

    pub fn is_production(&self) -> bool {
        self.node_env.as_deref() == Some("production")
    }

    /// Origins the browser frontends are served from.
    pub fn allowed_origins(&self) -> Vec<String> {
        if !self.cors_origins.is_empty() {
            return self.cors_origins.clone();
        }

        if self.is_production() {
            PRODUCTION_ORIGINS.iter().map(|o| o.to_string()).collect()
        } else {
            vec![DEVELOPMENT_ORIGIN.to_string()]
        }
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}
