use console_security::Module;

use crate::nav::icons::IconKey;
use crate::routes::normalize_path;

/// Decides whether a navigation entry is active for a path.
///
/// Prefix matching is segment-aware: `/tenants` matches `/tenants/9` but not
/// `/tenantsx`.
#[derive(Debug, Clone, Copy)]
pub enum Matcher {
    Exact(&'static str),
    Prefix(&'static [&'static str]),
    Predicate(fn(&str) -> bool),
}

impl Matcher {
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let path = normalize_path(path);
        match self {
            Self::Exact(target) => path == *target,
            Self::Prefix(prefixes) => prefixes.iter().any(|p| has_segment_prefix(&path, p)),
            Self::Predicate(f) => f(&path),
        }
    }
}

/// `path` equals `prefix` or continues it at a segment boundary.
#[must_use]
pub fn has_segment_prefix(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return path.starts_with('/');
    }
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// A single destination. Matches its own path exactly unless told otherwise.
#[derive(Debug, Clone)]
pub struct NavItem {
    pub key: &'static str,
    pub label: &'static str,
    pub icon: IconKey,
    pub to: &'static str,
    pub matcher: Matcher,
    /// Module gating visibility; `None` means always visible.
    pub module: Option<Module>,
}

impl NavItem {
    #[must_use]
    pub fn new(key: &'static str, label: &'static str, icon: IconKey, to: &'static str) -> Self {
        Self {
            key,
            label,
            icon,
            to,
            matcher: Matcher::Exact(to),
            module: None,
        }
    }

    #[must_use]
    pub fn matching(mut self, matcher: Matcher) -> Self {
        self.matcher = matcher;
        self
    }

    #[must_use]
    pub fn module(mut self, module: Module) -> Self {
        self.module = Some(module);
        self
    }

    #[must_use]
    pub fn is_active(&self, path: &str) -> bool {
        self.matcher.matches(path)
    }
}

/// Collapsible cluster of related items.
#[derive(Debug, Clone)]
pub struct NavGroup {
    pub key: &'static str,
    pub label: &'static str,
    pub icon: IconKey,
    /// Hidden unless the identity has scope access.
    pub scope_only: bool,
    pub items: Vec<NavItem>,
}

impl NavGroup {
    #[must_use]
    pub fn is_active(&self, path: &str) -> bool {
        self.items.iter().any(|i| i.is_active(path))
    }
}

#[derive(Debug, Clone)]
pub enum NavEntry {
    Item(NavItem),
    Group(NavGroup),
}

impl NavEntry {
    #[must_use]
    pub fn is_active(&self, path: &str) -> bool {
        match self {
            Self::Item(i) => i.is_active(path),
            Self::Group(g) => g.is_active(path),
        }
    }
}

/// Top-level functional area in tenant mode.
#[derive(Debug, Clone)]
pub struct NavSection {
    pub key: &'static str,
    pub label: &'static str,
    pub icon: IconKey,
    pub entries: Vec<NavEntry>,
}

impl NavSection {
    #[must_use]
    pub fn is_active(&self, path: &str) -> bool {
        self.entries.iter().any(|e| e.is_active(path))
    }
}

/// Top-level node of the tenant tree: a standalone item or a section.
#[derive(Debug, Clone)]
pub enum NavNode {
    Item(NavItem),
    Section(NavSection),
}
