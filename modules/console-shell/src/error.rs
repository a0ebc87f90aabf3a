//! Error types for the session core.

use std::time::Duration;

use console_api::ApiError;
use console_security::ScopeId;
use console_session::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("no stored session")]
    NoSession,

    #[error("session check did not finish within {}", humantime::format_duration(*.0))]
    AuthCheckTimedOut(Duration),

    #[error("scope '{0}' is not available to the current identity")]
    UnknownScope(ScopeId),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ShellError {
    /// True when the failure means "not signed in" rather than a fault worth surfacing.
    #[must_use]
    pub fn is_unauthenticated(&self) -> bool {
        match self {
            Self::NoSession => true,
            Self::Api(e) => e.is_auth_failure(),
            _ => false,
        }
    }
}

/// Invalid route declarations, reported when the table is built.
#[derive(Error, Debug)]
pub enum RouteTableError {
    #[error("route '{path}' conflicts with an existing route: {source}")]
    Conflict {
        path: String,
        #[source]
        source: matchit::InsertError,
    },

    #[error("redirect from '{from}' targets '{to}', which is not a declared route")]
    DanglingRedirect { from: String, to: String },
}
