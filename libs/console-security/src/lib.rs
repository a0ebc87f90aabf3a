//! Identity, scope and module-permission model shared by the console crates.
//!
//! - [`Identity`] and [`Membership`] mirror what the API reports for the signed-in user
//! - [`ScopeId`], [`ScopeType`] and [`AvailableScope`] describe the scope hierarchy
//! - [`ModulePermissions`] and [`PermissionEvaluator`] answer per-module capability checks
//! - [`AccessContext`] bundles all of the above into a per-navigation snapshot

#![forbid(unsafe_code)]

pub mod context;
pub mod evaluator;
pub mod identity;
pub mod permission;
pub mod scope;

pub use context::{AccessContext, AccessContextBuilder};
pub use evaluator::{PermissionEvaluator, PermissionPolicy};
pub use identity::{Identity, Membership};
pub use permission::{Capability, Module, ModulePermission, ModulePermissions};
pub use scope::{AvailableScope, ScopeId, ScopeType};
