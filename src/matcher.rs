//! Ingredient-overlap recipe matching.
//!
//! Every seed recipe is scored by the size of the intersection between the
//! caller's normalized ingredient set and the recipe's lower-cased ingredient
//! set. A single input ingredient needs one shared ingredient to qualify;
//! two or more inputs need two. When nothing qualifies the best-scoring
//! recipe is returned on its own, so a non-empty catalog never produces an
//! empty answer.

use std::collections::HashSet;

use crate::catalog::Catalog;
use crate::error::RecipeError;
use crate::models::Recipe;

/// A catalog recipe paired with its overlap count.
#[derive(Debug, Clone)]
pub struct ScoredRecipe<'a> {
    pub overlap: usize,
    pub recipe: &'a Recipe,
}

/// Trim and lower-case each ingredient, dropping blanks.
///
/// Fails with [`RecipeError::NoIngredients`] when nothing is left.
pub fn normalize_ingredients<S: AsRef<str>>(raw: &[S]) -> Result<Vec<String>, RecipeError> {
    let normalized: Vec<String> = raw
        .iter()
        .map(|i| i.as_ref().trim())
        .filter(|i| !i.is_empty())
        .map(|i| i.to_lowercase())
        .collect();

    if normalized.is_empty() {
        return Err(RecipeError::NoIngredients);
    }
    Ok(normalized)
}

/// Score every recipe and sort by overlap, highest first. The sort is
/// stable, so equal scores keep catalog order.
pub fn score_recipes<'a>(user: &[String], catalog: &'a [Recipe]) -> Vec<ScoredRecipe<'a>> {
    let user_set: HashSet<&str> = user.iter().map(String::as_str).collect();

    let mut scored: Vec<ScoredRecipe<'a>> = catalog
        .iter()
        .map(|recipe| {
            let recipe_set: HashSet<String> = recipe.normalized_ingredients().collect();
            let overlap = recipe_set
                .iter()
                .filter(|i| user_set.contains(i.as_str()))
                .count();
            ScoredRecipe { overlap, recipe }
        })
        .collect();

    scored.sort_by(|a, b| b.overlap.cmp(&a.overlap));
    scored
}

/// Minimum overlap a recipe needs for the given number of normalized inputs.
pub fn min_overlap(input_count: usize) -> usize {
    if input_count == 1 {
        1
    } else {
        2
    }
}

/// Select the recipes to return for an already-normalized ingredient list.
pub fn select_matches<'a>(user: &[String], catalog: &'a [Recipe]) -> Vec<&'a Recipe> {
    let scored = score_recipes(user, catalog);
    let threshold = min_overlap(user.len());

    let results: Vec<&Recipe> = scored
        .iter()
        .filter(|s| s.overlap >= threshold)
        .map(|s| s.recipe)
        .collect();

    if results.is_empty() {
        return scored.first().map(|s| s.recipe).into_iter().collect();
    }
    results
}

/// Normalize the raw request ingredients and select matching recipes.
///
/// Returns the normalized list alongside the matches so callers can log the
/// query as it was evaluated.
pub fn match_recipes<'a, S: AsRef<str>>(
    raw: &[S],
    catalog: &'a [Recipe],
) -> Result<(Vec<String>, Vec<&'a Recipe>), RecipeError> {
    let user = normalize_ingredients(raw)?;
    let matches = select_matches(&user, catalog);
    Ok((user, matches))
}

/// CLI entry point: match against the built-in catalog and print the results.
pub fn run_match(ingredients: &[String]) -> anyhow::Result<()> {
    let catalog = Catalog::builtin()?;
    let (user, matches) = match_recipes(ingredients, catalog.seeds())?;
    let scores = score_recipes(&user, catalog.seeds());

    println!("ingredients: {}", user.join(", "));
    println!("threshold:   {}", min_overlap(user.len()));
    println!();

    for recipe in matches {
        let overlap = scores
            .iter()
            .find(|s| std::ptr::eq(s.recipe, recipe))
            .map(|s| s.overlap)
            .unwrap_or(0);
        println!("{} (overlap {})", recipe.title, overlap);
        println!("  ingredients: {}", recipe.ingredients.join(", "));
        for (i, step) in recipe.steps.iter().enumerate() {
            println!("  {}. {}", i + 1, step);
        }
        println!();
    }

    Ok(())
}
