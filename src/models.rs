//! Core data models used throughout the recipe backend.
//!
//! [`Recipe`] is the only domain entity. Recipes are built in memory per
//! request, optionally written to the document store, and never read back
//! by request handling.

use serde::{Deserialize, Serialize};

/// Where a recipe came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipeSource {
    /// Guessed from an uploaded dish photo.
    Image,
    /// Entered by hand.
    Manual,
    /// Part of the built-in catalog.
    Seed,
}

/// A recipe: a title, an ingredient list in display order, and ordered steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<RecipeSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_filename: Option<String>,
}

impl Recipe {
    /// Lower-cased, trimmed ingredient names used for matching.
    pub fn normalized_ingredients(&self) -> impl Iterator<Item = String> + '_ {
        self.ingredients.iter().map(|i| i.trim().to_lowercase())
    }
}

/// The public view of a recipe: provenance fields are not exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub title: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
}

impl From<&Recipe> for RecipeSummary {
    fn from(recipe: &Recipe) -> Self {
        Self {
            title: recipe.title.clone(),
            ingredients: recipe.ingredients.clone(),
            steps: recipe.steps.clone(),
        }
    }
}

/// Response for a recipe guessed from an upload. `id` is the stored
/// document id, or `None` when nothing was persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecipeResponse {
    pub id: Option<String>,
    pub title: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
}

/// A logged ingredient query: the normalized input and the titles returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeQuery {
    pub ingredients: Vec<String>,
    pub matches: Vec<String>,
}
