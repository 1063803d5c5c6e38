use serde::{Deserialize, Serialize};

/// A game card rendered on the dashboard. Only the name takes part in filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameCard {
    pub name: String,
}

impl GameCard {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Normalised filter query typed into the game search box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameQuery {
    needle: String,
}

impl GameQuery {
    pub fn new(raw: &str) -> Self {
        Self {
            needle: raw.to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Case-insensitive substring match; an empty query matches every name.
    pub fn matches(&self, name: &str) -> bool {
        self.is_empty() || name.to_lowercase().contains(&self.needle)
    }

    pub fn matches_card(&self, card: &GameCard) -> bool {
        self.matches(&card.name)
    }

    /// Visibility for each card, in order.
    pub fn visibility<'a, I>(&self, names: I) -> Vec<bool>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names.into_iter().map(|name| self.matches(name)).collect()
    }
}
