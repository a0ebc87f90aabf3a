//! Leasing console shell
//!
//! Session core of the console: who is signed in, which organizational scope
//! is active, which pages exist, and which navigation destinations the
//! identity may see.
//!
//! - [`AuthContext`]: three-state auth status, identity, memberships, scopes, permissions
//! - [`ScopeContext`]: the active scope id and its switch epoch
//! - [`RouteTable`]: declarative route tree flattened into a matcher, behind the auth guard
//! - [`nav`]: navigation catalog, sidebar state and topbar view model
//! - [`PendingApprovalsBadge`]: cancellable poller for the approvals badge
//! - [`ConsoleSession`]: composition root wiring the above to one API client and store

#![forbid(unsafe_code)]

pub mod badge;
pub mod config;
pub mod error;
pub mod guard;
pub mod nav;
pub mod routes;
pub mod session;

pub use badge::PendingApprovalsBadge;
pub use config::ShellConfig;
pub use error::{RouteTableError, ShellError};
pub use guard::{GuardDecision, LOGIN_PATH, ProtectedRouteGuard};
pub use routes::{Layout, Page, RouteMatch, RouteNode, RouteResolution, RouteTable, Target};
pub use session::{AuthContext, AuthStatus, ConsoleSession, ScopeContext, ScopeSwitch};
