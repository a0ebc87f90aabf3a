//! Navigation trees for superuser and tenant mode.

use console_security::Module;

use crate::nav::NavMode;
use crate::nav::icons::IconKey;
use crate::nav::model::{Matcher, NavEntry, NavGroup, NavItem, NavNode, NavSection, has_segment_prefix};

/// Where the active destination sits in a tree.
#[derive(Debug, Clone, Copy)]
pub struct NavLocation<'a> {
    pub section: Option<&'a NavSection>,
    pub group: Option<&'a NavGroup>,
    pub item: &'a NavItem,
}

#[derive(Debug, Clone)]
pub struct NavCatalog {
    superuser: Vec<NavEntry>,
    tenant: Vec<NavNode>,
}

impl NavCatalog {
    #[must_use]
    pub fn new(superuser: Vec<NavEntry>, tenant: Vec<NavNode>) -> Self {
        Self { superuser, tenant }
    }

    /// The console's own navigation.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(superuser_tree(), tenant_tree())
    }

    #[must_use]
    pub fn superuser_entries(&self) -> &[NavEntry] {
        &self.superuser
    }

    #[must_use]
    pub fn tenant_nodes(&self) -> &[NavNode] {
        &self.tenant
    }

    /// First destination, in declaration order, whose matcher accepts `path`.
    #[must_use]
    pub fn locate(&self, mode: NavMode, path: &str) -> Option<NavLocation<'_>> {
        match mode {
            NavMode::Superuser => locate_in_entries(&self.superuser, None, path),
            NavMode::Tenant => self.tenant.iter().find_map(|node| match node {
                NavNode::Item(item) => item.is_active(path).then_some(NavLocation {
                    section: None,
                    group: None,
                    item,
                }),
                NavNode::Section(section) => {
                    locate_in_entries(&section.entries, Some(section), path)
                }
            }),
        }
    }

    /// Every item of one mode's tree, depth first.
    #[must_use]
    pub fn items(&self, mode: NavMode) -> Vec<&NavItem> {
        fn push_entries<'a>(entries: &'a [NavEntry], out: &mut Vec<&'a NavItem>) {
            for entry in entries {
                match entry {
                    NavEntry::Item(item) => out.push(item),
                    NavEntry::Group(group) => out.extend(group.items.iter()),
                }
            }
        }

        let mut out = Vec::new();
        match mode {
            NavMode::Superuser => push_entries(&self.superuser, &mut out),
            NavMode::Tenant => {
                for node in &self.tenant {
                    match node {
                        NavNode::Item(item) => out.push(item),
                        NavNode::Section(section) => push_entries(&section.entries, &mut out),
                    }
                }
            }
        }
        out
    }
}

fn locate_in_entries<'a>(
    entries: &'a [NavEntry],
    section: Option<&'a NavSection>,
    path: &str,
) -> Option<NavLocation<'a>> {
    entries.iter().find_map(|entry| match entry {
        NavEntry::Item(item) => item.is_active(path).then_some(NavLocation {
            section,
            group: None,
            item,
        }),
        NavEntry::Group(group) => group
            .items
            .iter()
            .find(|item| item.is_active(path))
            .map(|item| NavLocation {
                section,
                group: Some(group),
                item,
            }),
    })
}

/// `/leases/list` and any `/leases/{id}` page outside the amendment flow.
fn is_lease_record_path(path: &str) -> bool {
    if path == "/leases/list" {
        return true;
    }
    let Some(rest) = path.strip_prefix("/leases/") else {
        return false;
    };
    let id = rest.split('/').next().unwrap_or_default();
    !matches!(id, "" | "list" | "create" | "amendments") && !is_amendment_path(path)
}

/// `/leases/amendments` and `/leases/{id}/amendments/...`.
fn is_amendment_path(path: &str) -> bool {
    has_segment_prefix(path, "/leases/amendments")
        || (path.starts_with("/leases/") && path.split('/').nth(3) == Some("amendments"))
}

fn superuser_tree() -> Vec<NavEntry> {
    vec![
        NavEntry::Item(
            NavItem::new("organizations", "Organizations", IconKey::Landmark, "/admin/organizations")
                .matching(Matcher::Prefix(&["/admin/organizations"])),
        ),
        NavEntry::Item(
            NavItem::new("companies", "Companies", IconKey::Briefcase, "/admin/companies")
                .matching(Matcher::Prefix(&["/admin/companies"])),
        ),
        NavEntry::Item(
            NavItem::new("entities", "Entities", IconKey::Network, "/admin/entities")
                .matching(Matcher::Prefix(&["/admin/entities"])),
        ),
        NavEntry::Item(
            NavItem::new("scopes", "Scopes", IconKey::Layers, "/admin/scopes")
                .matching(Matcher::Prefix(&["/admin/scopes"])),
        ),
        NavEntry::Group(NavGroup {
            key: "user-management",
            label: "User Management",
            icon: IconKey::UserCog,
            scope_only: false,
            items: vec![
                NavItem::new("admin-users", "Users", IconKey::Users, "/admin/users")
                    .matching(Matcher::Prefix(&["/admin/users"])),
                NavItem::new("admin-roles", "Roles", IconKey::KeyRound, "/admin/roles")
                    .matching(Matcher::Prefix(&["/admin/roles"])),
            ],
        }),
    ]
}

fn tenant_tree() -> Vec<NavNode> {
    vec![
        NavNode::Item(
            NavItem::new("properties", "Properties", IconKey::Building, "/properties")
                .matching(Matcher::Prefix(&["/properties"]))
                .module(Module::Property),
        ),
        NavNode::Section(setup_section()),
        NavNode::Section(master_data_section()),
        NavNode::Section(lease_operations_section()),
        NavNode::Section(billing_section()),
        NavNode::Section(reporting_section()),
    ]
}

fn setup_section() -> NavSection {
    NavSection {
        key: "setup",
        label: "Setup & Configuration",
        icon: IconKey::Settings,
        entries: vec![
            NavEntry::Group(NavGroup {
                key: "access-control",
                label: "Access Control",
                icon: IconKey::ShieldCheck,
                scope_only: true,
                items: vec![
                    NavItem::new("setup-users", "Users", IconKey::Users, "/setup/users")
                        .matching(Matcher::Prefix(&["/setup/users"])),
                    NavItem::new("setup-roles", "Roles & Permissions", IconKey::KeyRound, "/setup/roles")
                        .matching(Matcher::Prefix(&["/setup/roles"])),
                ],
            }),
            NavEntry::Item(
                NavItem::new("approval-rules", "Approval Rules", IconKey::ListChecks, "/approvals/rules")
                    .matching(Matcher::Prefix(&["/approvals/rules"]))
                    .module(Module::Approvals),
            ),
        ],
    }
}

fn master_data_section() -> NavSection {
    NavSection {
        key: "master-data",
        label: "Master Data & Templates",
        icon: IconKey::Database,
        entries: vec![
            NavEntry::Item(
                NavItem::new("tenants", "Tenants", IconKey::UserSquare, "/tenants")
                    .matching(Matcher::Prefix(&["/tenants"]))
                    .module(Module::Tenant),
            ),
            NavEntry::Group(NavGroup {
                key: "clauses",
                label: "Clauses",
                icon: IconKey::BookOpen,
                scope_only: false,
                items: vec![
                    NavItem::new("clause-library", "Clause Library", IconKey::Library, "/clauses/library")
                        .matching(Matcher::Prefix(&["/clauses/library"]))
                        .module(Module::Lease),
                    NavItem::new("clause-categories", "Clause Categories", IconKey::Tags, "/clauses/categories")
                        .matching(Matcher::Prefix(&["/clauses/categories"]))
                        .module(Module::Lease),
                ],
            }),
            NavEntry::Item(
                NavItem::new("document-templates", "Document Templates", IconKey::FileText, "/documents/templates")
                    .matching(Matcher::Prefix(&["/documents/templates"]))
                    .module(Module::Documents),
            ),
        ],
    }
}

fn lease_operations_section() -> NavSection {
    NavSection {
        key: "lease-operations",
        label: "Lease Operations",
        icon: IconKey::FileSignature,
        entries: vec![
            NavEntry::Item(
                NavItem::new("leases", "Leases", IconKey::Files, "/leases/list")
                    .matching(Matcher::Predicate(is_lease_record_path))
                    .module(Module::Lease),
            ),
            NavEntry::Item(
                NavItem::new("lease-create", "New Lease", IconKey::FilePlus, "/leases/create")
                    .module(Module::Lease),
            ),
            NavEntry::Item(
                NavItem::new("amendments", "Amendments", IconKey::FilePen, "/leases/amendments")
                    .matching(Matcher::Predicate(is_amendment_path))
                    .module(Module::Lease),
            ),
            NavEntry::Item(
                NavItem::new("approvals-inbox", "Approvals Inbox", IconKey::Inbox, "/approvals")
                    .module(Module::Approvals),
            ),
        ],
    }
}

fn billing_section() -> NavSection {
    NavSection {
        key: "billing",
        label: "Billing & Collections",
        icon: IconKey::Receipt,
        entries: vec![
            NavEntry::Item(
                NavItem::new("invoice-schedules", "Invoice Schedules", IconKey::CalendarClock, "/billing/schedules")
                    .matching(Matcher::Prefix(&["/billing/schedules"]))
                    .module(Module::Revenue),
            ),
            NavEntry::Item(
                NavItem::new("invoices", "Invoices", IconKey::ReceiptText, "/billing/invoices")
                    .matching(Matcher::Prefix(&["/billing/invoices"]))
                    .module(Module::Revenue),
            ),
            NavEntry::Item(
                NavItem::new("billing-rules", "Billing Rules", IconKey::Scale, "/billing/rules")
                    .matching(Matcher::Prefix(&["/billing/rules"]))
                    .module(Module::Revenue),
            ),
            NavEntry::Item(
                NavItem::new("ar-ageing", "AR Ageing", IconKey::Hourglass, "/billing/ageing")
                    .matching(Matcher::Prefix(&["/billing/ageing"]))
                    .module(Module::Ar),
            ),
            NavEntry::Item(
                NavItem::new("collections", "Collections", IconKey::HandCoins, "/billing/collections")
                    .matching(Matcher::Prefix(&["/billing/collections"]))
                    .module(Module::Collections),
            ),
        ],
    }
}

fn reporting_section() -> NavSection {
    NavSection {
        key: "reporting",
        label: "Reporting & Analytics",
        icon: IconKey::BarChart,
        entries: vec![
            NavEntry::Item(
                NavItem::new("dashboard", "Dashboard", IconKey::LayoutDashboard, "/")
                    .module(Module::Dashboard),
            ),
            NavEntry::Item(
                NavItem::new("revenue-reports", "Revenue Reports", IconKey::TrendingUp, "/reports/revenue")
                    .matching(Matcher::Prefix(&["/reports/revenue"]))
                    .module(Module::Revenue),
            ),
            NavEntry::Item(
                NavItem::new("ar-reports", "AR Reports", IconKey::PieChart, "/reports/ar")
                    .matching(Matcher::Prefix(&["/reports/ar"]))
                    .module(Module::Ar),
            ),
        ],
    }
}
