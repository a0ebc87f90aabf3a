use std::time::Duration;

use console_api::config::humantime_serde;
use console_security::PermissionPolicy;
use serde::{Deserialize, Serialize};

/// Session-core settings (`shell:` section of the console config).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShellConfig {
    /// How an empty permission map is read for non-superusers.
    #[serde(default)]
    pub permission_policy: PermissionPolicy,

    /// Upper bound on the initial session check. Unset means wait for the
    /// API client's own request timeout.
    #[serde(default, with = "humantime_serde::option")]
    pub auth_check_timeout: Option<Duration>,

    #[serde(default = "default_approvals_poll_interval", with = "humantime_serde")]
    pub approvals_poll_interval: Duration,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            permission_policy: PermissionPolicy::default(),
            auth_check_timeout: None,
            approvals_poll_interval: default_approvals_poll_interval(),
        }
    }
}

fn default_approvals_poll_interval() -> Duration {
    Duration::from_secs(60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_section_uses_defaults() {
        let cfg: ShellConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(cfg.permission_policy, PermissionPolicy::FailOpen);
        assert!(cfg.auth_check_timeout.is_none());
        assert_eq!(cfg.approvals_poll_interval, Duration::from_secs(60));
    }

    #[test]
    fn explicit_values_parse() {
        let cfg: ShellConfig = serde_json::from_value(json!({
            "permission_policy": "fail_closed",
            "auth_check_timeout": "5s",
            "approvals_poll_interval": "2m"
        }))
        .unwrap();
        assert_eq!(cfg.permission_policy, PermissionPolicy::FailClosed);
        assert_eq!(cfg.auth_check_timeout, Some(Duration::from_secs(5)));
        assert_eq!(cfg.approvals_poll_interval, Duration::from_secs(120));
    }
}
