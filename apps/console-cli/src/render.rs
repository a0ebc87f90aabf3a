//! Plain-text views of the console state. Every function returns a `String`
//! so commands decide where it goes.

use colored::Colorize;
use console_security::{AccessContext, ModulePermission, ModulePermissions};
use console_shell::nav::{NavLink, NavMode, SidebarEntry, SidebarView, TopbarView};
use console_shell::{AuthStatus, Layout, RouteResolution};

const INDENT: &str = "  ";

fn marker(active: bool) -> &'static str {
    if active { "*" } else { " " }
}

fn fold(open: bool) -> &'static str {
    if open { "v" } else { ">" }
}

fn link_line(depth: usize, link: &NavLink) -> String {
    let text = format!(
        "{} {} [{}] {}",
        marker(link.active),
        link.label,
        link.icon,
        link.href.dimmed()
    );
    let text = if link.active {
        text.bold().to_string()
    } else {
        text
    };
    format!("{}{text}", INDENT.repeat(depth))
}

fn push_entry(lines: &mut Vec<String>, depth: usize, entry: &SidebarEntry) {
    let pad = INDENT.repeat(depth);
    match entry {
        SidebarEntry::Link(link) => lines.push(link_line(depth, link)),
        SidebarEntry::Group(group) => {
            lines.push(format!(
                "{pad}{} {} {} [{}]",
                marker(group.active),
                fold(group.open),
                group.label,
                group.icon
            ));
            if group.open {
                lines.extend(group.children.iter().map(|c| link_line(depth + 1, c)));
            }
        }
        SidebarEntry::Section(section) => {
            lines.push(format!(
                "{pad}{} {} {} [{}]",
                marker(section.active),
                fold(section.open),
                section.label.to_uppercase().bold(),
                section.icon
            ));
            if section.open {
                for child in &section.entries {
                    push_entry(lines, depth + 1, child);
                }
            }
        }
    }
}

#[must_use]
pub fn sidebar(view: &SidebarView) -> String {
    let mode = match view.mode {
        NavMode::Superuser => "superuser",
        NavMode::Tenant => "tenant",
    };
    let mut lines = vec![format!(
        "Navigation ({mode}{})",
        if view.collapsed { ", collapsed" } else { "" }
    )];
    for entry in &view.entries {
        push_entry(&mut lines, 0, entry);
    }
    lines.join("\n")
}

#[must_use]
pub fn topbar(view: &TopbarView) -> String {
    let mut lines = vec![view.title.bold().to_string()];

    let user = view.user_label.as_deref().unwrap_or("(signed out)");
    if view.is_superuser {
        lines.push(format!("User:   {user} {}", "[superuser]".yellow()));
    } else {
        lines.push(format!("User:   {user}"));
    }

    if let Some(picker) = &view.scope_picker {
        match (picker.placeholder, picker.selected()) {
            (Some(placeholder), _) => lines.push(format!("Scope:  {}", placeholder.dimmed())),
            (None, Some(selected)) => lines.push(format!("Scope:  {}", selected.label)),
            (None, None) => lines.push(format!("Scope:  {}", "(none selected)".dimmed())),
        }
    }

    if let Some(n) = view.pending_approvals {
        lines.push(format!("Approvals pending: {}", n.to_string().red().bold()));
    }
    lines.join("\n")
}

#[must_use]
pub fn scopes(ctx: &AccessContext) -> String {
    if ctx.available_scopes().is_empty() {
        return console_shell::nav::NO_SCOPES_LABEL.dimmed().to_string();
    }
    let active = ctx.active_scope_id();
    ctx.available_scopes()
        .iter()
        .map(|scope| {
            let current = active == Some(&scope.id);
            format!(
                "{} {:>6}  {}",
                marker(current),
                scope.id.as_str(),
                scope.label()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn flags(p: &ModulePermission) -> String {
    [
        (p.can_view, 'v'),
        (p.can_create, 'c'),
        (p.can_edit, 'e'),
        (p.can_delete, 'd'),
        (p.can_approve, 'a'),
    ]
    .iter()
    .map(|&(on, c)| if on { c } else { '-' })
    .collect()
}

#[must_use]
pub fn permissions(perms: &ModulePermissions) -> String {
    if perms.is_empty() {
        return "No module permissions loaded".dimmed().to_string();
    }
    perms
        .iter()
        .map(|(module, p)| format!("{:<12} {}", module.as_str(), flags(p)))
        .collect::<Vec<_>>()
        .join("\n")
}

#[must_use]
pub fn whoami(status: AuthStatus, ctx: &AccessContext) -> String {
    let Some(identity) = ctx.identity() else {
        return match status {
            AuthStatus::Loading => "Session check in progress".to_owned(),
            AuthStatus::Authenticated | AuthStatus::Unauthenticated => {
                "Not signed in".dimmed().to_string()
            }
        };
    };

    let mut lines = vec![format!("Signed in as {}", identity.display_name().bold())];
    if !identity.email.is_empty() {
        lines.push(format!("Email:   {}", identity.email));
    }
    lines.push(format!(
        "Role:    {}",
        if ctx.is_superuser() { "superuser" } else { "member" }
    ));
    for m in ctx.memberships() {
        lines.push(format!("Member:  {} as {}", m.label(), m.role_name));
    }
    if let Some(active) = ctx.active_scope() {
        lines.push(format!("Scope:   {}", active.label()));
    }
    lines.join("\n")
}

#[must_use]
pub fn resolution(path: &str, resolution: &RouteResolution) -> String {
    match resolution {
        RouteResolution::Render(m) => {
            let mut lines = vec![
                format!("{path} -> {} ({})", m.page.title().bold(), m.page),
                format!("pattern: {}", m.pattern),
            ];
            if !m.layouts.is_empty() {
                let layouts = m
                    .layouts
                    .iter()
                    .copied()
                    .map(Layout::as_str)
                    .collect::<Vec<_>>()
                    .join(" > ");
                lines.push(format!("layouts: {layouts}"));
            }
            lines.extend(m.params.iter().map(|(k, v)| format!("param:   {k} = {v}")));
            if m.protected {
                lines.push("protected".dimmed().to_string());
            }
            lines.join("\n")
        }
        RouteResolution::Redirect { to, replace } => format!(
            "{path} -> redirect to {}{}",
            to.yellow(),
            if *replace { " (replace)" } else { "" }
        ),
        RouteResolution::Pending => format!("{path} -> waiting for session check"),
    }
}
