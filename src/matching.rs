//! Fuzzy matching of recipe ingredients against shopping list and pantry
//! entries.
//!
//! Names are reduced to their significant words (lowercase letters only,
//! longer than two characters, minus units and preparation words). Two names
//! match when any significant word of one contains a significant word of the
//! other, so `onions` matches `onion` and `breadcrumbs` matches `bread`.

use crate::model::{InventoryItem, ShoppingItem};
use std::collections::HashSet;
use std::sync::LazyLock;

static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // units
        "cup", "cups", "tsp", "tbsp", "tablespoon", "tablespoons", "teaspoon", "teaspoons",
        "pound", "pounds", "ounce", "ounces", "gram", "grams", "kilogram", "liter", "liters",
        "can", "jar", "bag", "bunch", "pinch", "handful", "clove", "cloves", "slice", "slices",
        // sizes and states
        "large", "small", "medium", "fresh", "dried", "frozen", "whole", "half",
        // preparation
        "minced", "diced", "chopped", "sliced", "grated", "ground", "crushed", "peeled",
        "and", "the", "for", "with",
    ]
    .into_iter()
    .collect()
});

/// Something that can be matched against an ingredient by name.
pub trait MatchCandidate {
    fn name(&self) -> &str;
}

impl MatchCandidate for ShoppingItem {
    fn name(&self) -> &str {
        &self.name
    }
}

impl MatchCandidate for InventoryItem {
    fn name(&self) -> &str {
        &self.name
    }
}

impl MatchCandidate for &str {
    fn name(&self) -> &str {
        self
    }
}

impl MatchCandidate for String {
    fn name(&self) -> &str {
        self
    }
}

/// Lowercase words of `text` that carry meaning for matching.
pub fn significant_words(text: &str) -> HashSet<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .filter(|word| word.len() > 2 && !STOP_WORDS.contains(word))
        .map(str::to_string)
        .collect()
}

/// Whether an ingredient and a list entry refer to the same thing.
///
/// Names without significant words never match anything.
pub fn fuzzy_match(ingredient_name: &str, candidate_name: &str) -> bool {
    let ingredient = significant_words(ingredient_name);
    let candidate = significant_words(candidate_name);
    if ingredient.is_empty() || candidate.is_empty() {
        return false;
    }

    ingredient.iter().any(|a| {
        candidate
            .iter()
            .any(|b| a.contains(b.as_str()) || b.contains(a.as_str()))
    })
}

/// Candidates matching `ingredient_name`, in their original order.
pub fn find_matches<'a, C>(ingredient_name: &str, candidates: &'a [C]) -> Vec<&'a C>
where
    C: MatchCandidate,
{
    candidates
        .iter()
        .filter(|candidate| fuzzy_match(ingredient_name, candidate.name()))
        .collect()
}

/// Shopping list and inventory entries matching one ingredient.
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientMatches<'a> {
    pub shopping: Vec<&'a ShoppingItem>,
    pub inventory: Vec<&'a InventoryItem>,
}

impl<'a> IngredientMatches<'a> {
    /// Matches the stored ingredient text (not a rescaled line) against both
    /// lists.
    pub fn collect(
        ingredient_name: &str,
        shopping: &'a [ShoppingItem],
        inventory: &'a [InventoryItem],
    ) -> Self {
        Self {
            shopping: find_matches(ingredient_name, shopping),
            inventory: find_matches(ingredient_name, inventory),
        }
    }

    /// Some matching shopping entry is still to buy.
    pub fn has_unchecked(&self) -> bool {
        self.shopping.iter().any(|item| !item.is_checked)
    }

    /// Every matching shopping entry has been ticked off.
    pub fn has_checked(&self) -> bool {
        !self.has_unchecked() && self.shopping.iter().any(|item| item.is_checked)
    }

    pub fn has_inventory(&self) -> bool {
        !self.inventory.is_empty()
    }

    pub fn has_any(&self) -> bool {
        !self.shopping.is_empty() || self.has_inventory()
    }
}
