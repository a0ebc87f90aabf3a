//! Topbar view model: page title, identity, scope picker and approvals badge.

use console_security::{AccessContext, Module, ScopeId, ScopeType};

use crate::nav::NavMode;
use crate::nav::catalog::NavCatalog;
use crate::routes::RouteMatch;

pub const NO_SCOPES_LABEL: &str = "No scopes available";
const DEFAULT_TITLE: &str = "Leasing Console";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeOption {
    pub id: ScopeId,
    pub label: String,
    pub scope_type: ScopeType,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopePicker {
    pub options: Vec<ScopeOption>,
    /// Shown instead of options when there are none.
    pub placeholder: Option<&'static str>,
}

impl ScopePicker {
    #[must_use]
    pub fn selected(&self) -> Option<&ScopeOption> {
        self.options.iter().find(|o| o.selected)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopbarView {
    pub title: &'static str,
    pub user_label: Option<String>,
    pub is_superuser: bool,
    /// Absent for superusers, who are not scoped.
    pub scope_picker: Option<ScopePicker>,
    /// Only set for a positive count the identity may act on.
    pub pending_approvals: Option<u32>,
}

#[must_use]
pub fn render_topbar(
    catalog: &NavCatalog,
    ctx: &AccessContext,
    route: Option<&RouteMatch>,
    path: &str,
    pending_approvals: Option<u32>,
) -> TopbarView {
    let mode = NavMode::for_context(ctx);
    let title = route
        .map(|r| r.page.title())
        .or_else(|| catalog.locate(mode, path).map(|loc| loc.item.label))
        .unwrap_or(DEFAULT_TITLE);

    let scope_picker = (mode == NavMode::Tenant).then(|| scope_picker(ctx));

    let pending_approvals = pending_approvals
        .filter(|n| *n > 0)
        .filter(|_| ctx.evaluator().can_view(Some(&Module::Approvals)));

    TopbarView {
        title,
        user_label: ctx.identity().map(|u| u.display_name().to_owned()),
        is_superuser: ctx.is_superuser(),
        scope_picker,
        pending_approvals,
    }
}

fn scope_picker(ctx: &AccessContext) -> ScopePicker {
    let active = ctx.active_scope_id();
    let options: Vec<ScopeOption> = ctx
        .available_scopes()
        .iter()
        .map(|s| ScopeOption {
            id: s.id.clone(),
            label: s.label(),
            scope_type: s.scope_type,
            selected: active == Some(&s.id),
        })
        .collect();
    let placeholder = options.is_empty().then_some(NO_SCOPES_LABEL);
    ScopePicker {
        options,
        placeholder,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use console_security::{AvailableScope, Identity, ModulePermission, ModulePermissions};

    fn user(superuser: bool) -> Identity {
        Identity {
            id: serde_json::json!(2),
            username: "maria".to_owned(),
            email: "maria@example.com".to_owned(),
            is_superuser: superuser,
        }
    }

    #[test]
    fn empty_scope_set_shows_placeholder() {
        let ctx = AccessContext::builder().identity(user(false)).build();
        let view = render_topbar(&NavCatalog::standard(), &ctx, None, "/", None);

        let picker = view.scope_picker.unwrap();
        assert!(picker.options.is_empty());
        assert_eq!(picker.placeholder, Some(NO_SCOPES_LABEL));
        assert_eq!(view.title, "Dashboard");
        assert_eq!(view.user_label.as_deref(), Some("maria"));
    }

    #[test]
    fn active_scope_is_selected() {
        let ctx = AccessContext::builder()
            .identity(user(false))
            .available_scopes(vec![
                AvailableScope {
                    id: ScopeId::from("3"),
                    name: "Acme".to_owned(),
                    scope_type: ScopeType::Org,
                },
                AvailableScope {
                    id: ScopeId::from("12"),
                    name: "Beta Co".to_owned(),
                    scope_type: ScopeType::Company,
                },
            ])
            .active_scope_id(Some(ScopeId::from("12")))
            .build();
        let view = render_topbar(&NavCatalog::standard(), &ctx, None, "/tenants", Some(3));

        let picker = view.scope_picker.unwrap();
        let selected = picker.selected().unwrap();
        assert_eq!(selected.label, "Beta Co (COMPANY)");
        assert!(picker.placeholder.is_none());
        assert_eq!(view.title, "Tenants");
        assert_eq!(view.pending_approvals, Some(3));
    }

    #[test]
    fn superuser_has_no_scope_picker() {
        let ctx = AccessContext::builder().identity(user(true)).build();
        let view = render_topbar(&NavCatalog::standard(), &ctx, None, "/admin/scopes", None);
        assert!(view.scope_picker.is_none());
        assert!(view.is_superuser);
        assert_eq!(view.title, "Scopes");
    }

    #[test]
    fn badge_hidden_without_approvals_view() {
        let ctx = AccessContext::builder()
            .identity(user(false))
            .permissions(
                ModulePermissions::new().with(Module::Lease, ModulePermission::view_only()),
            )
            .build();
        let view = render_topbar(&NavCatalog::standard(), &ctx, None, "/leases/list", Some(5));
        assert!(view.pending_approvals.is_none());
    }
}
