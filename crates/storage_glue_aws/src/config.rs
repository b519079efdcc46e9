//! Explicit client and function configuration.
//!
//! Nothing here reaches for process-wide state on its own: the binaries read
//! the environment once and pass the resulting values into client
//! construction.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use storage_glue_core::contract::Destination;
use thiserror::Error;

pub const ENV_REGION: &str = "AWS_REGION";
pub const ENV_PROFILE: &str = "AWS_PROFILE";
pub const ENV_ENDPOINT_URL: &str = "AWS_ENDPOINT_URL";
pub const ENV_FORCE_PATH_STYLE: &str = "S3_FORCE_PATH_STYLE";
pub const ENV_NOTIFY_PHONE_NUMBER: &str = "NOTIFY_PHONE_NUMBER";
pub const ENV_NOTIFY_TOPIC_ARN: &str = "NOTIFY_TOPIC_ARN";
pub const ENV_ACCESS_KEY_ID: &str = "GLUE_ACCESS_KEY_ID";
pub const ENV_SECRET_ACCESS_KEY: &str = "GLUE_SECRET_ACCESS_KEY";
pub const ENV_SESSION_TOKEN: &str = "GLUE_SESSION_TOKEN";

const CREDENTIALS_PROVIDER_NAME: &str = "storage-glue-static";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("one of NOTIFY_PHONE_NUMBER or NOTIFY_TOPIC_ARN must be configured")]
    MissingDestination,
    #[error("only one of NOTIFY_PHONE_NUMBER or NOTIFY_TOPIC_ARN may be configured")]
    ConflictingDestinations,
    #[error("GLUE_ACCESS_KEY_ID and GLUE_SECRET_ACCESS_KEY must be configured together")]
    IncompleteStaticCredentials,
    #[error("{name} must be 'true' or 'false', got '{value}'")]
    InvalidFlag { name: &'static str, value: String },
}

/// Where SDK credentials come from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CredentialSource {
    /// The SDK's default provider chain (environment, profile, container or
    /// instance role).
    #[default]
    DefaultChain,
    /// A named profile from the shared config files.
    Profile(String),
    /// Explicit keys; they take precedence over a profile.
    Static {
        access_key_id: String,
        secret_access_key: String,
        session_token: Option<String>,
    },
}

impl CredentialSource {
    pub fn resolve(
        access_key_id: Option<String>,
        secret_access_key: Option<String>,
        session_token: Option<String>,
        profile: Option<String>,
    ) -> Result<Self, ConfigError> {
        match (non_empty(access_key_id), non_empty(secret_access_key)) {
            (Some(access_key_id), Some(secret_access_key)) => Ok(Self::Static {
                access_key_id,
                secret_access_key,
                session_token: non_empty(session_token),
            }),
            (Some(_), None) | (None, Some(_)) => Err(ConfigError::IncompleteStaticCredentials),
            (None, None) => Ok(non_empty(profile).map(Self::Profile).unwrap_or_default()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwsSettings {
    pub region: Option<String>,
    pub credentials: CredentialSource,
    /// Overrides the service endpoint, e.g. for a local S3-compatible server.
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
}

impl AwsSettings {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |name: &str| non_empty(lookup(name));

        let force_path_style = match value(ENV_FORCE_PATH_STYLE) {
            None => false,
            Some(raw) => parse_flag(ENV_FORCE_PATH_STYLE, &raw)?,
        };

        Ok(Self {
            region: value(ENV_REGION),
            credentials: CredentialSource::resolve(
                value(ENV_ACCESS_KEY_ID),
                value(ENV_SECRET_ACCESS_KEY),
                value(ENV_SESSION_TOKEN),
                value(ENV_PROFILE),
            )?,
            endpoint_url: value(ENV_ENDPOINT_URL),
            force_path_style,
        })
    }

    pub async fn load(&self) -> SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &self.region {
            loader = loader.region(Region::new(region.clone()));
        }
        match &self.credentials {
            CredentialSource::DefaultChain => {}
            CredentialSource::Profile(name) => {
                loader = loader.profile_name(name);
            }
            CredentialSource::Static {
                access_key_id,
                secret_access_key,
                session_token,
            } => {
                loader = loader.credentials_provider(Credentials::new(
                    access_key_id,
                    secret_access_key,
                    session_token.clone(),
                    None,
                    CREDENTIALS_PROVIDER_NAME,
                ));
            }
        }
        if let Some(endpoint_url) = &self.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }

        loader.load().await
    }
}

/// Configuration of the event notifier function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifierConfig {
    pub destination: Destination,
    pub aws: AwsSettings,
}

impl NotifierConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let phone_number = non_empty(lookup(ENV_NOTIFY_PHONE_NUMBER));
        let topic_arn = non_empty(lookup(ENV_NOTIFY_TOPIC_ARN));

        let destination = match (phone_number, topic_arn) {
            (Some(number), None) => Destination::PhoneNumber(number),
            (None, Some(arn)) => Destination::TopicArn(arn),
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingDestinations),
            (None, None) => return Err(ConfigError::MissingDestination),
        };

        Ok(Self {
            destination,
            aws: AwsSettings::from_lookup(lookup)?,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

fn parse_flag(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name,
            value: raw.to_string(),
        }),
    }
}
