//! Navigation: catalog of destinations, sidebar and topbar view models.

mod catalog;
mod icons;
mod model;
mod sidebar;
mod topbar;

use console_security::AccessContext;

pub use catalog::{NavCatalog, NavLocation};
pub use icons::{IconKey, IconTheme, LucideIcons};
pub use model::{Matcher, NavEntry, NavGroup, NavItem, NavNode, NavSection, has_segment_prefix};
pub use sidebar::{
    GroupView, NavLink, SectionView, SidebarEntry, SidebarState, SidebarView, render_sidebar,
};
pub use topbar::{NO_SCOPES_LABEL, ScopeOption, ScopePicker, TopbarView, render_topbar};

/// Which navigation tree applies. Superusers get the administration tree only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavMode {
    Superuser,
    Tenant,
}

impl NavMode {
    #[must_use]
    pub fn for_context(ctx: &AccessContext) -> Self {
        if ctx.is_superuser() {
            Self::Superuser
        } else {
            Self::Tenant
        }
    }
}
