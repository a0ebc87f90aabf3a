//! Icon identities for navigation entries.
//!
//! Entries carry an [`IconKey`]; a presentation layer picks the concrete
//! glyph through an [`IconTheme`].

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IconKey {
    Building,
    Settings,
    ShieldCheck,
    Users,
    KeyRound,
    ListChecks,
    Database,
    UserSquare,
    BookOpen,
    Library,
    Tags,
    FileText,
    FileSignature,
    Files,
    FilePlus,
    FilePen,
    Inbox,
    Receipt,
    CalendarClock,
    ReceiptText,
    Scale,
    Hourglass,
    HandCoins,
    BarChart,
    LayoutDashboard,
    TrendingUp,
    PieChart,
    Landmark,
    Briefcase,
    Network,
    Layers,
    UserCog,
}

impl IconKey {
    pub const ALL: [IconKey; 32] = [
        Self::Building,
        Self::Settings,
        Self::ShieldCheck,
        Self::Users,
        Self::KeyRound,
        Self::ListChecks,
        Self::Database,
        Self::UserSquare,
        Self::BookOpen,
        Self::Library,
        Self::Tags,
        Self::FileText,
        Self::FileSignature,
        Self::Files,
        Self::FilePlus,
        Self::FilePen,
        Self::Inbox,
        Self::Receipt,
        Self::CalendarClock,
        Self::ReceiptText,
        Self::Scale,
        Self::Hourglass,
        Self::HandCoins,
        Self::BarChart,
        Self::LayoutDashboard,
        Self::TrendingUp,
        Self::PieChart,
        Self::Landmark,
        Self::Briefcase,
        Self::Network,
        Self::Layers,
        Self::UserCog,
    ];
}

pub trait IconTheme: Send + Sync {
    fn icon_name(&self, key: IconKey) -> &'static str;
}

/// Lucide icon names.
#[derive(Debug, Clone, Copy, Default)]
pub struct LucideIcons;

impl IconTheme for LucideIcons {
    fn icon_name(&self, key: IconKey) -> &'static str {
        match key {
            IconKey::Building => "building-2",
            IconKey::Settings => "settings",
            IconKey::ShieldCheck => "shield-check",
            IconKey::Users => "users",
            IconKey::KeyRound => "key-round",
            IconKey::ListChecks => "list-checks",
            IconKey::Database => "database",
            IconKey::UserSquare => "user-square",
            IconKey::BookOpen => "book-open",
            IconKey::Library => "library",
            IconKey::Tags => "tags",
            IconKey::FileText => "file-text",
            IconKey::FileSignature => "file-signature",
            IconKey::Files => "files",
            IconKey::FilePlus => "file-plus",
            IconKey::FilePen => "file-pen",
            IconKey::Inbox => "inbox",
            IconKey::Receipt => "receipt",
            IconKey::CalendarClock => "calendar-clock",
            IconKey::ReceiptText => "receipt-text",
            IconKey::Scale => "scale",
            IconKey::Hourglass => "hourglass",
            IconKey::HandCoins => "hand-coins",
            IconKey::BarChart => "bar-chart-3",
            IconKey::LayoutDashboard => "layout-dashboard",
            IconKey::TrendingUp => "trending-up",
            IconKey::PieChart => "pie-chart",
            IconKey::Landmark => "landmark",
            IconKey::Briefcase => "briefcase",
            IconKey::Network => "network",
            IconKey::Layers => "layers",
            IconKey::UserCog => "user-cog",
        }
    }
}
