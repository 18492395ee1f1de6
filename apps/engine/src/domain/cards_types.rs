use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Calendar month of a card, `1..=12`.
pub type Month = u8;

/// Month of the flexible chrysanthemum animal.
pub const CHRYSANTHEMUM_MONTH: Month = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Bright,
    Animal,
    Ribbon,
    Junk,
    DoubleJunk,
    /// Placeholder handed out by a bomb; never touches the table.
    Dummy,
}

/// Role the chrysanthemum animal is counted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FlexRole {
    Animal,
    DoublePi,
}

/// Opaque card identity. Allocated by [`CardIdAllocator`], never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u32);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out fresh [`CardId`]s for the lifetime of a game manager.
#[derive(Debug, Clone, Default)]
pub struct CardIdAllocator {
    next: u32,
}

impl CardIdAllocator {
    pub fn next_id(&mut self) -> CardId {
        let id = CardId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// A single hwatu card.
///
/// Equality and hashing go by `id` only: two month-1 junk cards are distinct
/// entities even though every other field matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub month: Option<Month>,
    #[serde(rename = "type")]
    pub category: Category,
    pub image_index: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_role: Option<FlexRole>,
}

impl Card {
    pub fn new(id: CardId, month: Month, category: Category, image_index: u8) -> Self {
        Self {
            id,
            month: Some(month),
            category,
            image_index,
            selected_role: None,
        }
    }

    pub fn dummy(id: CardId) -> Self {
        Self {
            id,
            month: None,
            category: Category::Dummy,
            image_index: 0,
            selected_role: None,
        }
    }

    pub fn is_dummy(&self) -> bool {
        self.category == Category::Dummy
    }

    pub fn is_chrysanthemum(&self) -> bool {
        self.month == Some(CHRYSANTHEMUM_MONTH) && self.category == Category::Animal
    }

    pub fn is_month(&self, month: Month) -> bool {
        self.month == Some(month)
    }

    /// Category used for scoring once the flexible role is resolved.
    pub fn effective_category(&self, default_role: FlexRole) -> Category {
        if !self.is_chrysanthemum() {
            return self.category;
        }
        match self.selected_role.unwrap_or(default_role) {
            FlexRole::Animal => Category::Animal,
            FlexRole::DoublePi => Category::DoubleJunk,
        }
    }

    /// Sort key for hands: month first, then category.
    pub fn display_key(&self) -> (u8, Category, u8) {
        (self.month.unwrap_or(u8::MAX), self.category, self.image_index)
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Card {}

impl Hash for Card {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.month {
            Some(m) => write!(f, "{m}:{:?}{}", self.category, self.id),
            None => write!(f, "dummy{}", self.id),
        }
    }
}
