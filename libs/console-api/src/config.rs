use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::ApiError;

/// Connection settings for the platform API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL every endpoint path is joined onto, e.g. `https://leasing.example.com/api/`.
    #[serde(default = "default_base_url")]
    pub base_url: Url,

    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Header carrying the active scope id on every authenticated request.
    #[serde(default = "default_scope_header")]
    pub scope_header: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout: default_request_timeout(),
            scope_header: default_scope_header(),
        }
    }
}

impl ApiConfig {
    /// Base URL with a guaranteed trailing slash so relative joins keep the path prefix.
    ///
    /// # Errors
    /// Returns [`ApiError::InvalidConfig`] if the URL cannot be a base (e.g. `mailto:`).
    pub fn normalized_base_url(&self) -> Result<Url, ApiError> {
        if self.base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidConfig(format!(
                "base_url '{}' cannot be used as a base URL",
                self.base_url
            )));
        }
        let mut url = self.base_url.clone();
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }
}

fn default_base_url() -> Url {
    Url::parse("http://localhost:8000/api/").unwrap_or_else(|_| unreachable!("static URL is valid"))
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_scope_header() -> String {
    "X-Scope-Id".to_owned()
}

/// Serde mapping for `Duration` as humantime strings (`"30s"`, `"2m 5s"`).
pub mod humantime_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    /// # Errors
    /// Returns the serializer's error.
    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&humantime::format_duration(*value))
    }

    /// # Errors
    /// Returns an error if the value is not a humantime duration.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }

    /// Same mapping for `Option<Duration>`; absent or `null` is `None`.
    pub mod option {
        use std::time::Duration;

        use serde::{Deserialize, Deserializer, Serializer};

        /// # Errors
        /// Returns the serializer's error.
        #[allow(clippy::ref_option)]
        pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(d) => serializer.collect_str(&humantime::format_duration(*d)),
                None => serializer.serialize_none(),
            }
        }

        /// # Errors
        /// Returns an error if the value is present but not a humantime duration.
        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw = Option::<String>::deserialize(deserializer)?;
            raw.map(|s| humantime::parse_duration(&s).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}
