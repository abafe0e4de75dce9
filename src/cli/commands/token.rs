use anyhow::Context;
use chrono::{TimeZone, Utc};
use clap::Args;
use serde_json::json;

use crate::auth::{generate_jwt, Claims, DEFAULT_ROLE};
use crate::cli::{utils, OutputFormat};
use crate::config::{AppConfig, ConfigError};

#[derive(Args)]
pub struct TokenArgs {
    #[arg(long, help = "Stable user identifier")]
    pub user_id: String,

    #[arg(long, help = "Display name stamped onto submitted reports")]
    pub name: String,

    #[arg(long, help = "Contact phone stamped onto submitted reports")]
    pub phone: String,

    #[arg(long, default_value = DEFAULT_ROLE)]
    pub role: String,

    #[arg(long, help = "Lifetime in hours (defaults to SECURITY_JWT_EXPIRY_HOURS)")]
    pub hours: Option<u64>,
}

pub fn handle(args: TokenArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    println!("{}", render(args, format, &config)?);
    Ok(())
}

pub fn render(args: TokenArgs, format: OutputFormat, config: &AppConfig) -> anyhow::Result<String> {
    if config.security.jwt_secret.trim().is_empty() {
        return Err(ConfigError::Missing("JWT_SECRET").into());
    }

    let hours = args.hours.unwrap_or(config.security.jwt_expiry_hours);
    let claims = Claims::new(args.user_id, args.name, args.phone, args.role, hours);
    let token = generate_jwt(&claims, &config.security.jwt_secret).context("failed to sign token")?;

    match format {
        // Bare token so it can be captured by scripts
        OutputFormat::Text => Ok(token),
        OutputFormat::Json | OutputFormat::Yaml => {
            let expires_at = Utc.timestamp_opt(claims.exp, 0).single();
            let out = json!({
                "token": token,
                "expiresAt": expires_at,
                "claims": claims,
            });
            utils::render_structured(format, &out)
        }
    }
}
