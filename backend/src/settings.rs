//! Service configuration loaded via OrthoConfig.
//!
//! Values come from `HOTEL_*` environment variables, an optional config file
//! and command-line flags. [`HotelSettings::validate`] turns the raw values
//! into [`ValidatedSettings`] once at startup; the service never reads the
//! environment afterwards.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use zeroize::Zeroizing;

const LOCAL_BUCKET_NAME: &str = "hotel-images";
const LOCAL_TOPIC: &str = "hotel-created";

/// Raw configuration values.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HOTEL")]
pub struct HotelSettings {
    /// Socket address the HTTP server binds to.
    #[ortho_config(default = String::from("0.0.0.0:8080"))]
    pub bind_addr: String,
    /// Bucket receiving hotel images.
    pub bucket_name: Option<String>,
    /// Region of the image bucket.
    pub bucket_region: Option<String>,
    /// Table holding hotel records.
    #[ortho_config(default = String::from("Hotels"))]
    pub table_name: String,
    /// Region of the records table.
    pub table_region: Option<String>,
    /// Topic receiving creation events. The topic's region is taken from the
    /// ARN.
    pub topic_arn: Option<String>,
    /// Budget for each outbound call, in milliseconds.
    #[ortho_config(default = 5_000)]
    pub call_timeout_ms: u64,
    /// Largest accepted image, in bytes.
    #[ortho_config(default = 10 * 1024 * 1024)]
    pub max_upload_bytes: usize,
    /// `gateway` when an upstream authoriser has verified tokens, `verify`
    /// to check HS256 signatures here.
    #[ortho_config(default = String::from("gateway"))]
    pub token_trust: String,
    /// Shared secret for `verify` mode.
    pub token_secret: Option<String>,
}

/// How far bearer tokens are trusted on arrival.
pub enum TokenTrust {
    /// An upstream gateway has already verified the signature.
    Gateway,
    /// Signatures are checked in-process with a shared secret.
    Verify { secret: Zeroizing<Vec<u8>> },
}

impl TokenTrust {
    /// Mode name as accepted in configuration.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gateway => "gateway",
            Self::Verify { .. } => "verify",
        }
    }
}

impl fmt::Debug for TokenTrust {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration problems that prevent startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// `bind_addr` does not parse as `host:port`.
    #[error("bind_addr `{value}` is not a socket address")]
    BindAddr { value: String },
    /// A budget or limit was configured as zero.
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
    /// `token_trust` names an unknown mode.
    #[error("token_trust must be `gateway` or `verify`, got `{value}`")]
    TokenTrust { value: String },
    /// `verify` mode was selected without a secret.
    #[error("token_secret is required when token_trust is `verify`")]
    MissingSecret,
    /// A cloud resource or its region was left unset.
    #[error("{field} is required")]
    Missing { field: &'static str },
    /// `topic_arn` does not carry an SNS region.
    #[error("topic_arn `{value}` is not an SNS topic ARN")]
    TopicArn { value: String },
}

/// Settings checked and resolved to their defaults.
#[derive(Debug)]
pub struct ValidatedSettings {
    /// Address the HTTP server listens on.
    pub bind_addr: SocketAddr,
    /// Bucket receiving hotel images.
    pub bucket_name: String,
    /// Region of the image bucket; unset only for in-memory builds.
    pub bucket_region: Option<String>,
    /// Table holding hotel records.
    pub table_name: String,
    /// Region of the records table; unset only for in-memory builds.
    pub table_region: Option<String>,
    /// Topic receiving creation events.
    pub topic: String,
    /// Region parsed from the topic ARN, when it is one.
    pub topic_region: Option<String>,
    /// Budget for each outbound call.
    pub call_timeout: Duration,
    /// Largest accepted image, in bytes.
    pub max_upload_bytes: usize,
    /// Trust boundary for bearer tokens.
    pub token_trust: TokenTrust,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl HotelSettings {
    /// Reject unusable values and combinations.
    pub fn validate(&self) -> Result<ValidatedSettings, SettingsError> {
        let raw_addr = self.bind_addr.trim();
        let bind_addr = raw_addr.parse().map_err(|_| SettingsError::BindAddr {
            value: raw_addr.to_owned(),
        })?;

        if self.call_timeout_ms == 0 {
            return Err(SettingsError::Zero {
                field: "call_timeout_ms",
            });
        }
        if self.max_upload_bytes == 0 {
            return Err(SettingsError::Zero {
                field: "max_upload_bytes",
            });
        }

        let token_trust = match self.token_trust.trim() {
            "gateway" => TokenTrust::Gateway,
            "verify" => {
                let secret = non_blank(self.token_secret.as_deref())
                    .ok_or(SettingsError::MissingSecret)?;
                TokenTrust::Verify {
                    secret: Zeroizing::new(secret.as_bytes().to_vec()),
                }
            }
            other => {
                return Err(SettingsError::TokenTrust {
                    value: other.to_owned(),
                });
            }
        };

        let bucket_name = required("bucket_name", self.bucket_name.as_deref())?
            .unwrap_or_else(|| LOCAL_BUCKET_NAME.to_owned());
        let bucket_region = required("bucket_region", self.bucket_region.as_deref())?;
        let table_region = required("table_region", self.table_region.as_deref())?;
        let topic = required("topic_arn", self.topic_arn.as_deref())?
            .unwrap_or_else(|| LOCAL_TOPIC.to_owned());
        let topic_region = sns_region(&topic).map(str::to_owned);
        if topic_region.is_none() && cfg!(feature = "aws") {
            return Err(SettingsError::TopicArn { value: topic });
        }

        Ok(ValidatedSettings {
            bind_addr,
            bucket_name,
            bucket_region,
            table_name: self.table_name.trim().to_owned(),
            table_region,
            topic,
            topic_region,
            call_timeout: Duration::from_millis(self.call_timeout_ms),
            max_upload_bytes: self.max_upload_bytes,
            token_trust,
        })
    }
}

/// Cloud resources and their regions must be named explicitly; in-memory
/// builds leave them unset.
fn required(field: &'static str, value: Option<&str>) -> Result<Option<String>, SettingsError> {
    match non_blank(value) {
        Some(value) => Ok(Some(value.to_owned())),
        None if cfg!(feature = "aws") => Err(SettingsError::Missing { field }),
        None => Ok(None),
    }
}

/// Region segment of `arn:<partition>:sns:<region>:<account>:<name>`.
fn sns_region(arn: &str) -> Option<&str> {
    let mut parts = arn.split(':');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some("arn"), Some(_), Some("sns"), Some(region)) if !region.is_empty() => Some(region),
        _ => None,
    }
}
