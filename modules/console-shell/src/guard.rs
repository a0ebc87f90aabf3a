//! Auth guard in front of every protected route.

use crate::session::{AuthContext, AuthStatus};

pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session check still running: show a loading indicator, render nothing protected.
    ShowLoading,
    Render,
    /// Navigate to [`LOGIN_PATH`], replacing the current history entry.
    RedirectToLogin,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProtectedRouteGuard;

impl ProtectedRouteGuard {
    #[must_use]
    pub fn decide(status: AuthStatus) -> GuardDecision {
        match status {
            AuthStatus::Loading => GuardDecision::ShowLoading,
            AuthStatus::Authenticated => GuardDecision::Render,
            AuthStatus::Unauthenticated => GuardDecision::RedirectToLogin,
        }
    }

    /// Decision once the session check has finished. Never yields `ShowLoading`.
    pub async fn settle(auth: &AuthContext) -> GuardDecision {
        Self::decide(auth.wait_resolved().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_follows_status() {
        assert_eq!(
            ProtectedRouteGuard::decide(AuthStatus::Loading),
            GuardDecision::ShowLoading
        );
        assert_eq!(
            ProtectedRouteGuard::decide(AuthStatus::Authenticated),
            GuardDecision::Render
        );
        assert_eq!(
            ProtectedRouteGuard::decide(AuthStatus::Unauthenticated),
            GuardDecision::RedirectToLogin
        );
    }
}
