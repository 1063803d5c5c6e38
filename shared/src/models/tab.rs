use serde::{Deserialize, Serialize};
use std::fmt;

/// Tabs the admin page renders out of the box.
pub const DEFAULT_TABS: &[&str] = &[
    "overview",
    "addgame",
    "gamesctl",
    "addmember",
    "whitelist",
    "certificates",
];

pub const DEFAULT_TAB: &str = "overview";

/// Identifier of the admin panel section currently on screen.
///
/// Only constructed through [`TabSet::resolve`], so it always names a tab
/// the server knows how to render.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ActiveTab(String);

impl ActiveTab {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActiveTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The set of tab tokens the server recognises, plus the one to fall back to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabSet {
    known: Vec<String>,
    default: String,
}

impl Default for TabSet {
    fn default() -> Self {
        Self {
            known: DEFAULT_TABS.iter().map(|t| t.to_string()).collect(),
            default: DEFAULT_TAB.to_string(),
        }
    }
}

impl TabSet {
    pub fn new(known: Vec<String>, default: String) -> Self {
        Self { known, default }
    }

    pub fn is_known(&self, token: &str) -> bool {
        self.known.iter().any(|t| t == token)
    }

    pub fn default_tab(&self) -> ActiveTab {
        ActiveTab(self.default.clone())
    }

    /// First recognised candidate wins; otherwise the default tab.
    pub fn resolve<'a, I>(&self, candidates: I) -> ActiveTab
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        candidates
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|c| self.is_known(c))
            .map(|c| ActiveTab(c.to_string()))
            .unwrap_or_else(|| self.default_tab())
    }
}
