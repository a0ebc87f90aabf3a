//! The console's route tree.

use super::{Layout, Page, RouteNode, Target};

/// `(public routes, protected tree)` as consumed by [`super::RouteTable::new`].
#[must_use]
pub fn console_routes() -> (Vec<RouteNode>, RouteNode) {
    let public = vec![RouteNode::page("login", Page::Login)];

    let mut children = Vec::new();
    children.extend(portfolio_routes());
    children.push(clause_routes());
    children.push(RouteNode::page("documents/templates", Page::DocumentTemplates));
    children.push(lease_routes());
    children.push(billing_routes());
    children.extend([
        RouteNode::page("approvals", Page::ApprovalsInbox),
        RouteNode::page("approvals/rules", Page::ApprovalRules),
        RouteNode::page("reports/revenue", Page::RevenueReports),
        RouteNode::page("reports/ar", Page::ArReports),
        RouteNode::page("setup/users", Page::SetupUsers),
        RouteNode::page("setup/roles", Page::SetupRoles),
    ]);
    children.push(admin_routes());

    let protected =
        RouteNode::layout("", Layout::Shell, children).index(Target::Page(Page::Dashboard));
    (public, protected)
}

fn portfolio_routes() -> Vec<RouteNode> {
    vec![
        RouteNode::page("properties", Page::PropertyList),
        RouteNode::page("properties/create", Page::PropertyCreate),
        RouteNode::page("properties/{id}", Page::PropertyDetail),
        RouteNode::page("properties/{id}/edit", Page::PropertyEdit),
        RouteNode::page("tenants", Page::TenantList),
        RouteNode::page("tenants/create", Page::TenantCreate),
        RouteNode::page("tenants/{id}", Page::TenantDetail),
        RouteNode::page("tenants/{id}/edit", Page::TenantEdit),
    ]
}

fn clause_routes() -> RouteNode {
    RouteNode::layout(
        "clauses",
        Layout::Clauses,
        vec![
            RouteNode::page("library", Page::ClauseLibrary),
            RouteNode::page("library/create", Page::ClauseCreate),
            RouteNode::page("library/{id}", Page::ClauseDetail),
            RouteNode::page("categories", Page::ClauseCategories),
        ],
    )
    .index(Target::Redirect("/clauses/library"))
}

fn lease_routes() -> RouteNode {
    RouteNode::layout(
        "leases",
        Layout::Leases,
        vec![
            RouteNode::page("list", Page::LeaseList),
            RouteNode::page("create", Page::LeaseCreate),
            RouteNode::page("amendments", Page::LeaseAmendments),
            RouteNode::page("{id}", Page::LeaseDetail),
            RouteNode::page("{id}/edit", Page::LeaseEdit),
            RouteNode::page("{id}/amendments/create", Page::AmendmentCreate),
        ],
    )
    .index(Target::Redirect("/leases/list"))
}

fn billing_routes() -> RouteNode {
    RouteNode::layout(
        "billing",
        Layout::Billing,
        vec![
            RouteNode::page("schedules", Page::InvoiceSchedules),
            RouteNode::page("schedules/{id}", Page::InvoiceScheduleDetail),
            RouteNode::page("invoices", Page::Invoices),
            RouteNode::page("invoices/{id}", Page::InvoiceDetail),
            RouteNode::page("rules", Page::BillingRules),
            RouteNode::page("rules/{id}", Page::BillingRuleDetail),
            RouteNode::page("ageing", Page::ArAgeing),
            RouteNode::page("collections", Page::Collections),
        ],
    )
    .index(Target::Redirect("/billing/schedules"))
}

fn admin_routes() -> RouteNode {
    RouteNode::layout(
        "admin",
        Layout::Admin,
        vec![
            RouteNode::page("organizations", Page::AdminOrganizations),
            RouteNode::page("companies", Page::AdminCompanies),
            RouteNode::page("entities", Page::AdminEntities),
            RouteNode::page("scopes", Page::AdminScopes),
            RouteNode::page("users", Page::AdminUsers),
            RouteNode::page("users/{id}", Page::AdminUserDetail),
            RouteNode::page("roles", Page::AdminRoles),
        ],
    )
    .index(Target::Redirect("/admin/organizations"))
}
