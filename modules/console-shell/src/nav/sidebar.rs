//! Sidebar state and rendering.
//!
//! Rendering is a pure function of the catalog, an [`AccessContext`] snapshot,
//! the current path and the user's [`SidebarState`]. Visibility rules:
//! an item needs `can_view` on its module, a scope-only group needs scope
//! access, and groups or sections with nothing visible are dropped.

use std::collections::BTreeSet;

use console_security::{AccessContext, PermissionEvaluator};

use crate::nav::NavMode;
use crate::nav::catalog::NavCatalog;
use crate::nav::icons::IconTheme;
use crate::nav::model::{NavEntry, NavGroup, NavItem, NavNode, NavSection};
use crate::routes::normalize_path;

/// Per-user sidebar state: collapse mode plus which sections and groups are open.
#[derive(Debug, Clone, Default)]
pub struct SidebarState {
    collapsed: bool,
    open_sections: BTreeSet<String>,
    open_groups: BTreeSet<String>,
    last_path: Option<String>,
}

impl SidebarState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn set_collapsed(&mut self, collapsed: bool) {
        self.collapsed = collapsed;
    }

    pub fn toggle_collapsed(&mut self) {
        self.collapsed = !self.collapsed;
    }

    #[must_use]
    pub fn is_section_open(&self, key: &str) -> bool {
        self.open_sections.contains(key)
    }

    #[must_use]
    pub fn is_group_open(&self, key: &str) -> bool {
        self.open_groups.contains(key)
    }

    pub fn toggle_section(&mut self, key: &str) {
        toggle(&mut self.open_sections, key);
    }

    pub fn toggle_group(&mut self, key: &str) {
        toggle(&mut self.open_groups, key);
    }

    /// Open the section and group holding the active destination.
    ///
    /// Runs once per distinct path: staying on the same path does not undo a
    /// manual collapse. Never closes anything. Returns whether it opened something.
    pub fn on_navigate(&mut self, catalog: &NavCatalog, mode: NavMode, path: &str) -> bool {
        let path = normalize_path(path);
        if self.last_path.as_deref() == Some(path.as_str()) {
            return false;
        }

        let mut opened = false;
        if let Some(location) = catalog.locate(mode, &path) {
            if let Some(section) = location.section {
                opened |= self.open_sections.insert(section.key.to_owned());
            }
            if let Some(group) = location.group {
                opened |= self.open_groups.insert(group.key.to_owned());
            }
        }
        self.last_path = Some(path);
        opened
    }
}

fn toggle(set: &mut BTreeSet<String>, key: &str) {
    if !set.remove(key) {
        set.insert(key.to_owned());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub key: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub href: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupView {
    pub key: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub open: bool,
    pub active: bool,
    pub children: Vec<NavLink>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionView {
    pub key: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub open: bool,
    pub active: bool,
    pub entries: Vec<SidebarEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarEntry {
    Link(NavLink),
    Group(GroupView),
    Section(SectionView),
}

impl SidebarEntry {
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::Link(l) => l.key,
            Self::Group(g) => g.key,
            Self::Section(s) => s.key,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        match self {
            Self::Link(l) => l.active,
            Self::Group(g) => g.active,
            Self::Section(s) => s.active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarView {
    pub mode: NavMode,
    pub collapsed: bool,
    pub entries: Vec<SidebarEntry>,
}

impl SidebarView {
    /// Keys of every visible entry, depth first.
    #[must_use]
    pub fn visible_keys(&self) -> Vec<&'static str> {
        fn walk(entries: &[SidebarEntry], out: &mut Vec<&'static str>) {
            for entry in entries {
                out.push(entry.key());
                match entry {
                    SidebarEntry::Link(_) => {}
                    SidebarEntry::Group(g) => out.extend(g.children.iter().map(|c| c.key)),
                    SidebarEntry::Section(s) => walk(&s.entries, out),
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.entries, &mut out);
        out
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.visible_keys().contains(&key)
    }

    #[must_use]
    pub fn section(&self, key: &str) -> Option<&SectionView> {
        self.entries.iter().find_map(|e| match e {
            SidebarEntry::Section(s) if s.key == key => Some(s),
            _ => None,
        })
    }
}

struct Renderer<'a> {
    evaluator: PermissionEvaluator<'a>,
    has_scope_access: bool,
    state: &'a SidebarState,
    path: &'a str,
    icons: &'a dyn IconTheme,
}

impl Renderer<'_> {
    fn item(&self, item: &NavItem) -> Option<NavLink> {
        self.evaluator.can_view(item.module.as_ref()).then(|| NavLink {
            key: item.key,
            label: item.label,
            icon: self.icons.icon_name(item.icon),
            href: item.to,
            active: item.is_active(self.path),
        })
    }

    fn group(&self, group: &NavGroup) -> Option<SidebarEntry> {
        if group.scope_only && !self.has_scope_access {
            return None;
        }
        let children: Vec<NavLink> = group.items.iter().filter_map(|i| self.item(i)).collect();
        let first_href = children.first()?.href;
        let active = children.iter().any(|c| c.active);

        if self.state.is_collapsed() {
            return Some(SidebarEntry::Link(NavLink {
                key: group.key,
                label: group.label,
                icon: self.icons.icon_name(group.icon),
                href: first_href,
                active,
            }));
        }
        Some(SidebarEntry::Group(GroupView {
            key: group.key,
            label: group.label,
            icon: self.icons.icon_name(group.icon),
            open: self.state.is_group_open(group.key),
            active,
            children,
        }))
    }

    fn entries(&self, entries: &[NavEntry]) -> Vec<SidebarEntry> {
        entries
            .iter()
            .filter_map(|entry| match entry {
                NavEntry::Item(item) => self.item(item).map(SidebarEntry::Link),
                NavEntry::Group(group) => self.group(group),
            })
            .collect()
    }

    fn section(&self, section: &NavSection) -> Option<SidebarEntry> {
        let entries = self.entries(&section.entries);
        if entries.is_empty() {
            return None;
        }
        Some(SidebarEntry::Section(SectionView {
            key: section.key,
            label: section.label,
            icon: self.icons.icon_name(section.icon),
            open: self.state.is_section_open(section.key),
            active: entries.iter().any(SidebarEntry::is_active),
            entries,
        }))
    }
}

/// Render the sidebar for one navigation.
#[must_use]
pub fn render_sidebar(
    catalog: &NavCatalog,
    ctx: &AccessContext,
    state: &SidebarState,
    path: &str,
    icons: &dyn IconTheme,
) -> SidebarView {
    let path = normalize_path(path);
    let mode = NavMode::for_context(ctx);
    let renderer = Renderer {
        evaluator: ctx.evaluator(),
        has_scope_access: ctx.has_scope_access(),
        state,
        path: &path,
        icons,
    };

    let entries = match mode {
        NavMode::Superuser => renderer.entries(catalog.superuser_entries()),
        NavMode::Tenant => catalog
            .tenant_nodes()
            .iter()
            .filter_map(|node| match node {
                NavNode::Item(item) => renderer.item(item).map(SidebarEntry::Link),
                NavNode::Section(section) => renderer.section(section),
            })
            .collect(),
    };

    SidebarView {
        mode,
        collapsed: state.is_collapsed(),
        entries,
    }
}
