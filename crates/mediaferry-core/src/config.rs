//! Configuration module
//!
//! Object store credentials, bucket/region selection and encoder settings. All
//! inputs are optional; missing credentials are not a configuration error here but
//! prevent activation (see `mediaferry-ingest`).

use std::collections::HashMap;
use std::env;

use crate::constants::{DEFAULT_S3_BUCKET, DEFAULT_S3_REGION, DEFAULT_WEBP_QUALITY};

/// Access key pair for the object store.
#[derive(Clone)]
pub struct S3Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl std::fmt::Debug for S3Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// Offload configuration
#[derive(Clone, Debug)]
pub struct OffloadConfig {
    pub environment: String,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub s3_region: String,
    pub s3_bucket: String,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, DigitalOcean Spaces, etc.)
    pub webp_quality: f32,
}

impl Default for OffloadConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            aws_access_key_id: None,
            aws_secret_access_key: None,
            s3_region: DEFAULT_S3_REGION.to_string(),
            s3_bucket: DEFAULT_S3_BUCKET.to_string(),
            s3_endpoint: None,
            webp_quality: DEFAULT_WEBP_QUALITY,
        }
    }
}

impl OffloadConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from explicit key/value pairs instead of the process environment.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, anyhow::Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    fn from_lookup<F>(get: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let environment = non_blank("ENVIRONMENT")
            .or_else(|| non_blank("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let webp_quality = match non_blank("WEBP_QUALITY") {
            Some(raw) => raw
                .trim()
                .parse::<f32>()
                .map_err(|_| anyhow::anyhow!("WEBP_QUALITY must be a number between 0 and 100"))?,
            None => DEFAULT_WEBP_QUALITY,
        };

        let config = OffloadConfig {
            environment,
            aws_access_key_id: non_blank("AWS_ACCESS_KEY_ID"),
            aws_secret_access_key: non_blank("AWS_SECRET_ACCESS_KEY"),
            s3_region: non_blank("S3_REGION")
                .or_else(|| non_blank("AWS_REGION"))
                .unwrap_or_else(|| DEFAULT_S3_REGION.to_string()),
            s3_bucket: non_blank("S3_BUCKET").unwrap_or_else(|| DEFAULT_S3_BUCKET.to_string()),
            s3_endpoint: non_blank("S3_ENDPOINT"),
            webp_quality,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(0.0..=100.0).contains(&self.webp_quality) {
            return Err(anyhow::anyhow!(
                "WEBP_QUALITY must be between 0 and 100, got {}",
                self.webp_quality
            ));
        }

        if self.s3_bucket.trim().is_empty() {
            return Err(anyhow::anyhow!("S3_BUCKET must not be empty"));
        }

        if let Some(endpoint) = &self.s3_endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(anyhow::anyhow!(
                    "S3_ENDPOINT must start with http:// or https://"
                ));
            }
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Both keys, or nothing.
    pub fn credentials(&self) -> Option<S3Credentials> {
        match (&self.aws_access_key_id, &self.aws_secret_access_key) {
            (Some(access_key_id), Some(secret_access_key)) => Some(S3Credentials {
                access_key_id: access_key_id.clone(),
                secret_access_key: secret_access_key.clone(),
            }),
            _ => None,
        }
    }
}
