//! Server configuration
//!
//! Read from flags or environment (after `.env` is loaded).

use crate::auth::models::is_valid_email;
use anyhow::{bail, Result};
use clap::Parser;
use tracing::warn;

pub const DEV_JWT_SECRET: &str = "dev-secret-change-in-production-minimum-32-characters";

// bcrypt's own bounds are private
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

#[derive(Debug, Clone, Parser)]
#[command(name = "airline-api")]
#[command(about = "Airline booking REST API")]
pub struct Config {
    /// Address the HTTP server binds to
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8000")]
    pub bind_addr: String,

    /// SQLite database file
    #[arg(long, env = "DATABASE_PATH", default_value = "airline.db")]
    pub database_path: String,

    /// HMAC secret for access tokens
    #[arg(long, env = "JWT_SECRET", default_value = DEV_JWT_SECRET, hide_env_values = true)]
    pub jwt_secret: String,

    /// Access token lifetime in minutes
    #[arg(long, env = "ACCESS_TOKEN_TTL_MINUTES", default_value = "30")]
    pub access_token_ttl_minutes: i64,

    /// bcrypt work factor
    #[arg(long, env = "BCRYPT_COST", default_value_t = bcrypt::DEFAULT_COST)]
    pub bcrypt_cost: u32,

    /// Email of the admin seeded when the database has none
    #[arg(long, env = "BOOTSTRAP_ADMIN_EMAIL")]
    pub bootstrap_admin_email: Option<String>,

    /// Password of the seeded admin
    #[arg(long, env = "BOOTSTRAP_ADMIN_PASSWORD", hide_env_values = true)]
    pub bootstrap_admin_password: Option<String>,
}

impl Config {
    pub fn access_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.access_token_ttl_minutes)
    }

    /// Seed credentials, only when both halves are set
    pub fn bootstrap_admin(&self) -> Option<(&str, &str)> {
        match (&self.bootstrap_admin_email, &self.bootstrap_admin_password) {
            (Some(email), Some(password)) => Some((email.as_str(), password.as_str())),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.access_token_ttl_minutes <= 0 {
            bail!("ACCESS_TOKEN_TTL_MINUTES must be positive");
        }
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.bcrypt_cost) {
            bail!(
                "BCRYPT_COST must be between {} and {}",
                MIN_BCRYPT_COST,
                MAX_BCRYPT_COST
            );
        }
        if self.jwt_secret.is_empty() {
            bail!("JWT_SECRET must not be empty");
        }
        if self.bootstrap_admin_email.is_some() != self.bootstrap_admin_password.is_some() {
            bail!("BOOTSTRAP_ADMIN_EMAIL and BOOTSTRAP_ADMIN_PASSWORD must be set together");
        }
        if let Some((email, password)) = self.bootstrap_admin() {
            if !is_valid_email(email) {
                bail!("BOOTSTRAP_ADMIN_EMAIL is not a valid email address");
            }
            if password.is_empty() {
                bail!("BOOTSTRAP_ADMIN_PASSWORD must not be empty");
            }
        }

        if self.jwt_secret == DEV_JWT_SECRET {
            warn!("JWT_SECRET not set, using the development secret. CHANGE IT IN PRODUCTION!");
        } else if self.jwt_secret.len() < 32 {
            warn!("JWT_SECRET is shorter than recommended (32 bytes)");
        }
        Ok(())
    }
}
