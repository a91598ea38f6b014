use std::env::var;
use std::str::FromStr;
use std::time::Duration;

use chrono::TimeDelta;
use dotenvy::dotenv;
use thiserror::Error;

use crate::{
    application::{
        services::approval::ApprovalPolicy,
        usecases::send_whatsapp_campaign::{DEFAULT_LIST_FOLDER_ID, WhatsAppCampaignConfig},
    },
    domain::errors::SendError,
    infrastructure::brevo::DEFAULT_BASE_URL,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("An error occured while getting {0} env param")]
    Missing(&'static str),
    #[error("An error occured while parsing {name} env param: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// The two Brevo API keys: one for transactional SMS, one for contacts and
/// WhatsApp campaigns.
#[derive(Clone, PartialEq, Eq)]
pub struct BrevoCredentials {
    pub api_key: String,
    pub transactional_key: String,
}

impl std::fmt::Debug for BrevoCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrevoCredentials")
            .field("api_key", &"***")
            .field("transactional_key", &"***")
            .finish()
    }
}

impl BrevoCredentials {
    pub fn validate(&self) -> Result<(), SendError> {
        if self.api_key.trim().is_empty() {
            return Err(SendError::Configuration("BREVO_API_KEY is not set".into()));
        }
        if self.transactional_key.trim().is_empty() {
            return Err(SendError::Configuration(
                "BREVO_TRANSACTIONAL_KEY is not set".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct BrevoConfig {
    pub credentials: BrevoCredentials,
    pub base_url: String,
    /// Serve sends from an in-memory provider instead of Brevo.
    pub dry_run: bool,
    pub campaign: WhatsAppCampaignConfig,
}

pub struct Config {
    pub port: u16,
    pub scheme: String,
    pub host: String,
    /// Expected `X-API-Key` value; the HTTP API is open when unset.
    pub service_api_key: Option<String>,
    pub brevo: BrevoConfig,
}

impl Config {
    pub fn try_parse() -> Result<Config, ConfigError> {
        let _ = dotenv();
        Self::from_lookup(|name| var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let dry_run = parse_or(&get, "BREVO_DRY_RUN", false)?;
        let credentials = if dry_run {
            BrevoCredentials {
                api_key: get("BREVO_API_KEY").unwrap_or_default(),
                transactional_key: get("BREVO_TRANSACTIONAL_KEY").unwrap_or_default(),
            }
        } else {
            BrevoCredentials {
                api_key: required("BREVO_API_KEY")?,
                transactional_key: required("BREVO_TRANSACTIONAL_KEY")?,
            }
        };

        let approval = ApprovalPolicy {
            poll_interval: poll_interval(&get)?,
            lookback: seconds(&get, "WHATSAPP_APPROVAL_LOOKBACK_SECS", 300)?,
            max_attempts: parse_optional(&get, "WHATSAPP_APPROVAL_MAX_ATTEMPTS")?,
            timeout: parse_optional(&get, "WHATSAPP_APPROVAL_TIMEOUT_SECS")?
                .map(Duration::from_secs),
        };

        Ok(Config {
            port: required("PORT")?
                .parse::<u16>()
                .map_err(|_| invalid(&get, "PORT"))?,
            scheme: required("SCHEME")?,
            host: required("HOST")?,
            service_api_key: get("SERVICE_API_KEY"),
            brevo: BrevoConfig {
                credentials,
                base_url: get("BREVO_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                dry_run,
                campaign: WhatsAppCampaignConfig {
                    list_folder_id: parse_or(&get, "BREVO_LIST_FOLDER_ID", DEFAULT_LIST_FOLDER_ID)?,
                    schedule_delay: seconds(&get, "WHATSAPP_CAMPAIGN_DELAY_SECS", 60)?,
                    approval,
                },
            },
        })
    }
}

fn seconds(
    get: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: i64,
) -> Result<TimeDelta, ConfigError> {
    let value = parse_or(get, name, default)?;
    TimeDelta::try_seconds(value)
        .filter(|delta| *delta >= TimeDelta::zero())
        .ok_or_else(|| invalid(get, name))
}

fn poll_interval(get: &impl Fn(&str) -> Option<String>) -> Result<Duration, ConfigError> {
    const NAME: &str = "WHATSAPP_APPROVAL_POLL_INTERVAL_SECS";
    match parse_or(get, NAME, 5u64)? {
        0 => Err(invalid(get, NAME)),
        secs => Ok(Duration::from_secs(secs)),
    }
}

fn invalid(get: &impl Fn(&str) -> Option<String>, name: &'static str) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: get(name).unwrap_or_default(),
    }
}

fn parse_optional<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    get(name)
        .map(|value| value.trim().parse::<T>().map_err(|_| invalid(get, name)))
        .transpose()
}

fn parse_or<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    Ok(parse_optional(get, name)?.unwrap_or(default))
}
