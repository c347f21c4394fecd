use serde::{Deserialize, Serialize};

/// A recipe normalized from structured page markup, ready for the user to
/// review before it is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDraft {
    pub title: String,
    /// Plain text, markup stripped
    pub description: Option<String>,
    pub servings: Option<u32>,
    pub prep_time_minutes: Option<u32>,
    pub cook_time_minutes: Option<u32>,
    pub image_url: Option<String>,
    pub source_url: String,
    /// Categories first, then cuisines. Duplicates are kept.
    pub tags: Vec<String>,
    pub ingredients: Vec<DraftIngredient>,
    pub steps: Vec<DraftStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftIngredient {
    pub name: String,
    pub order_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftStep {
    /// Starts at 1
    pub step_number: usize,
    pub instruction: String,
}

/// An entry of the user's shopping list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub name: String,
    #[serde(default)]
    pub is_checked: bool,
}

/// An entry of the user's pantry inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub name: String,
    pub quantity: f64,
}
