//! Route table.
//!
//! Routes are declared as a tree of [`RouteNode`]s (layouts with nested
//! children, section index redirects) and flattened once into a `matchit`
//! router. Resolution normalizes the path, runs the auth guard for protected
//! routes and follows index redirects; anything unmatched goes to `/`.

mod catalog;

use std::collections::BTreeMap;
use std::fmt;

use matchit::Router;

use crate::error::RouteTableError;
use crate::guard::{GuardDecision, LOGIN_PATH, ProtectedRouteGuard};
use crate::session::AuthStatus;

pub use catalog::console_routes;

/// Where unmatched paths are sent.
pub const FALLBACK_PATH: &str = "/";

/// Every page the console can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Page {
    Login,
    Dashboard,
    PropertyList,
    PropertyCreate,
    PropertyDetail,
    PropertyEdit,
    TenantList,
    TenantCreate,
    TenantDetail,
    TenantEdit,
    ClauseLibrary,
    ClauseCreate,
    ClauseDetail,
    ClauseCategories,
    DocumentTemplates,
    LeaseList,
    LeaseCreate,
    LeaseDetail,
    LeaseEdit,
    LeaseAmendments,
    AmendmentCreate,
    InvoiceSchedules,
    InvoiceScheduleDetail,
    Invoices,
    InvoiceDetail,
    BillingRules,
    BillingRuleDetail,
    ArAgeing,
    Collections,
    ApprovalsInbox,
    ApprovalRules,
    RevenueReports,
    ArReports,
    SetupUsers,
    SetupRoles,
    AdminOrganizations,
    AdminCompanies,
    AdminEntities,
    AdminScopes,
    AdminUsers,
    AdminUserDetail,
    AdminRoles,
}

impl Page {
    /// Stable dotted identifier, e.g. `leases.detail`.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Dashboard => "dashboard",
            Self::PropertyList => "properties.list",
            Self::PropertyCreate => "properties.create",
            Self::PropertyDetail => "properties.detail",
            Self::PropertyEdit => "properties.edit",
            Self::TenantList => "tenants.list",
            Self::TenantCreate => "tenants.create",
            Self::TenantDetail => "tenants.detail",
            Self::TenantEdit => "tenants.edit",
            Self::ClauseLibrary => "clauses.library",
            Self::ClauseCreate => "clauses.create",
            Self::ClauseDetail => "clauses.detail",
            Self::ClauseCategories => "clauses.categories",
            Self::DocumentTemplates => "documents.templates",
            Self::LeaseList => "leases.list",
            Self::LeaseCreate => "leases.create",
            Self::LeaseDetail => "leases.detail",
            Self::LeaseEdit => "leases.edit",
            Self::LeaseAmendments => "leases.amendments",
            Self::AmendmentCreate => "leases.amendments.create",
            Self::InvoiceSchedules => "billing.schedules",
            Self::InvoiceScheduleDetail => "billing.schedules.detail",
            Self::Invoices => "billing.invoices",
            Self::InvoiceDetail => "billing.invoices.detail",
            Self::BillingRules => "billing.rules",
            Self::BillingRuleDetail => "billing.rules.detail",
            Self::ArAgeing => "billing.ageing",
            Self::Collections => "billing.collections",
            Self::ApprovalsInbox => "approvals.inbox",
            Self::ApprovalRules => "approvals.rules",
            Self::RevenueReports => "reports.revenue",
            Self::ArReports => "reports.ar",
            Self::SetupUsers => "setup.users",
            Self::SetupRoles => "setup.roles",
            Self::AdminOrganizations => "admin.organizations",
            Self::AdminCompanies => "admin.companies",
            Self::AdminEntities => "admin.entities",
            Self::AdminScopes => "admin.scopes",
            Self::AdminUsers => "admin.users",
            Self::AdminUserDetail => "admin.users.detail",
            Self::AdminRoles => "admin.roles",
        }
    }

    /// Heading for pages without a navigation entry of their own.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Login => "Sign in",
            Self::Dashboard => "Dashboard",
            Self::PropertyList => "Properties",
            Self::PropertyCreate => "New Property",
            Self::PropertyDetail => "Property",
            Self::PropertyEdit => "Edit Property",
            Self::TenantList => "Tenants",
            Self::TenantCreate => "New Tenant",
            Self::TenantDetail => "Tenant",
            Self::TenantEdit => "Edit Tenant",
            Self::ClauseLibrary => "Clause Library",
            Self::ClauseCreate => "New Clause",
            Self::ClauseDetail => "Clause",
            Self::ClauseCategories => "Clause Categories",
            Self::DocumentTemplates => "Document Templates",
            Self::LeaseList => "Leases",
            Self::LeaseCreate => "New Lease",
            Self::LeaseDetail => "Lease",
            Self::LeaseEdit => "Edit Lease",
            Self::LeaseAmendments => "Amendments",
            Self::AmendmentCreate => "New Amendment",
            Self::InvoiceSchedules => "Invoice Schedules",
            Self::InvoiceScheduleDetail => "Invoice Schedule",
            Self::Invoices => "Invoices",
            Self::InvoiceDetail => "Invoice",
            Self::BillingRules => "Billing Rules",
            Self::BillingRuleDetail => "Billing Rule",
            Self::ArAgeing => "AR Ageing",
            Self::Collections => "Collections",
            Self::ApprovalsInbox => "Approvals Inbox",
            Self::ApprovalRules => "Approval Rules",
            Self::RevenueReports => "Revenue Reports",
            Self::ArReports => "AR Reports",
            Self::SetupUsers | Self::AdminUsers => "Users",
            Self::SetupRoles => "Roles & Permissions",
            Self::AdminOrganizations => "Organizations",
            Self::AdminCompanies => "Companies",
            Self::AdminEntities => "Entities",
            Self::AdminScopes => "Scopes",
            Self::AdminUserDetail => "User",
            Self::AdminRoles => "Roles",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Layout a route renders inside. Outer layouts come first in [`RouteMatch::layouts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    /// Sidebar, topbar and content area around every protected page.
    Shell,
    Clauses,
    Leases,
    Billing,
    Admin,
}

impl Layout {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shell => "shell",
            Self::Clauses => "clauses",
            Self::Leases => "leases",
            Self::Billing => "billing",
            Self::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Page(Page),
    /// Replace-history redirect to an absolute path.
    Redirect(&'static str),
}

/// One node of the declarative route tree.
#[derive(Debug, Clone)]
pub struct RouteNode {
    segment: &'static str,
    layout: Option<Layout>,
    target: Option<Target>,
    children: Vec<RouteNode>,
}

impl RouteNode {
    /// Leaf page. `segment` is relative to the parent and may hold `{param}` parts.
    #[must_use]
    pub fn page(segment: &'static str, page: Page) -> Self {
        Self {
            segment,
            layout: None,
            target: Some(Target::Page(page)),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn layout(segment: &'static str, layout: Layout, children: Vec<RouteNode>) -> Self {
        Self {
            segment,
            layout: Some(layout),
            target: None,
            children,
        }
    }

    /// What the layout's own path shows (its index route).
    #[must_use]
    pub fn index(mut self, target: Target) -> Self {
        self.target = Some(target);
        self
    }
}

#[derive(Debug, Clone)]
struct RouteEntry {
    pattern: String,
    target: Target,
    layouts: Vec<Layout>,
    protected: bool,
}

/// A rendered route: page, extracted params, layout chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub path: String,
    pub pattern: String,
    pub page: Page,
    pub params: BTreeMap<String, String>,
    pub layouts: Vec<Layout>,
    pub protected: bool,
}

impl RouteMatch {
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Innermost section layout, if the page lives inside one.
    #[must_use]
    pub fn section(&self) -> Option<Layout> {
        self.layouts.iter().rev().copied().find(|l| *l != Layout::Shell)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteResolution {
    Render(RouteMatch),
    Redirect { to: String, replace: bool },
    /// Protected route while the session check is still running.
    Pending,
}

pub struct RouteTable {
    router: Router<usize>,
    entries: Vec<RouteEntry>,
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("routes", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl RouteTable {
    /// Flatten `public` routes (no guard) and the `protected` tree into one matcher.
    ///
    /// # Errors
    /// Returns [`RouteTableError`] for overlapping patterns or a redirect to an
    /// undeclared path.
    pub fn new(public: Vec<RouteNode>, protected: RouteNode) -> Result<Self, RouteTableError> {
        let mut table = Self {
            router: Router::new(),
            entries: Vec::new(),
        };
        for node in public {
            table.flatten(node, "/", &[], false)?;
        }
        table.flatten(protected, "/", &[], true)?;
        table.check_redirects()?;

        tracing::debug!(routes = table.entries.len(), "route table built");
        Ok(table)
    }

    /// The console's own route tree.
    ///
    /// # Errors
    /// Returns [`RouteTableError`] only if the built-in declarations are inconsistent.
    pub fn standard() -> Result<Self, RouteTableError> {
        let (public, protected) = console_routes();
        Self::new(public, protected)
    }

    fn flatten(
        &mut self,
        node: RouteNode,
        prefix: &str,
        layouts: &[Layout],
        protected: bool,
    ) -> Result<(), RouteTableError> {
        let pattern = join(prefix, node.segment);
        let mut chain = layouts.to_vec();
        chain.extend(node.layout);

        if let Some(target) = node.target {
            self.router
                .insert(pattern.clone(), self.entries.len())
                .map_err(|source| RouteTableError::Conflict {
                    path: pattern.clone(),
                    source,
                })?;
            self.entries.push(RouteEntry {
                pattern: pattern.clone(),
                target,
                layouts: chain.clone(),
                protected,
            });
        }

        for child in node.children {
            self.flatten(child, &pattern, &chain, protected)?;
        }
        Ok(())
    }

    fn check_redirects(&self) -> Result<(), RouteTableError> {
        for entry in &self.entries {
            if let Target::Redirect(to) = entry.target {
                let lands_on_page = self
                    .router
                    .at(to)
                    .is_ok_and(|m| matches!(self.entries[*m.value].target, Target::Page(_)));
                if !lands_on_page {
                    return Err(RouteTableError::DanglingRedirect {
                        from: entry.pattern.clone(),
                        to: to.to_owned(),
                    });
                }
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declared patterns in declaration order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.pattern.as_str())
    }

    /// Resolve `path` for the given auth status.
    #[must_use]
    pub fn resolve(&self, path: &str, status: AuthStatus) -> RouteResolution {
        let path = normalize_path(path);
        let Ok(found) = self.router.at(&path) else {
            tracing::debug!(path = %path, "no route matched, falling back");
            return RouteResolution::Redirect {
                to: FALLBACK_PATH.to_owned(),
                replace: true,
            };
        };
        let entry = &self.entries[*found.value];

        if entry.protected {
            match ProtectedRouteGuard::decide(status) {
                GuardDecision::ShowLoading => return RouteResolution::Pending,
                GuardDecision::RedirectToLogin => {
                    return RouteResolution::Redirect {
                        to: LOGIN_PATH.to_owned(),
                        replace: true,
                    };
                }
                GuardDecision::Render => {}
            }
        }

        match entry.target {
            Target::Redirect(to) => RouteResolution::Redirect {
                to: to.to_owned(),
                replace: true,
            },
            Target::Page(page) => RouteResolution::Render(RouteMatch {
                pattern: entry.pattern.clone(),
                page,
                params: found
                    .params
                    .iter()
                    .map(|(k, v)| (k.to_owned(), v.to_owned()))
                    .collect(),
                layouts: entry.layouts.clone(),
                protected: entry.protected,
                path,
            }),
        }
    }
}

fn join(prefix: &str, segment: &str) -> String {
    let segment = segment.trim_matches('/');
    match (prefix, segment) {
        (p, "") => p.to_owned(),
        ("/", s) => format!("/{s}"),
        (p, s) => format!("{p}/{s}"),
    }
}

/// Drop query and fragment, force a leading slash, strip trailing slashes.
#[must_use]
pub fn normalize_path(raw: &str) -> String {
    let end = raw.find(['?', '#']).unwrap_or(raw.len());
    let trimmed = raw[..end].trim().trim_end_matches('/');
    if trimmed.is_empty() {
        FALLBACK_PATH.to_owned()
    } else if trimmed.starts_with('/') {
        trimmed.to_owned()
    } else {
        format!("/{trimmed}")
    }
}
