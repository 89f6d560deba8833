//! Dish guessing from an uploaded photo.
//!
//! No pixels are examined: the guess is a keyword lookup on the lower-cased
//! filename against the catalog's image templates, first match wins.

use crate::catalog::Catalog;
use crate::error::RecipeError;
use crate::models::{Recipe, RecipeSource};

/// Resolve an upload filename to a recipe template.
///
/// Returns [`RecipeError::NoFileUploaded`] when the filename is absent or
/// empty. The returned recipe is tagged as coming from an image and carries
/// the original filename.
pub fn resolve_from_filename(
    catalog: &Catalog,
    filename: Option<&str>,
) -> Result<Recipe, RecipeError> {
    let filename = match filename {
        Some(name) if !name.is_empty() => name,
        _ => return Err(RecipeError::NoFileUploaded),
    };

    let name_lower = filename.to_lowercase();
    let template = catalog
        .templates()
        .iter()
        .find(|t| t.matches(&name_lower))
        .map(|t| &t.recipe)
        .unwrap_or_else(|| catalog.fallback());

    let mut recipe = template.clone();
    recipe.source = Some(RecipeSource::Image);
    recipe.image_filename = Some(filename.to_string());
    Ok(recipe)
}

/// CLI entry point: resolve a filename against the built-in catalog and print the recipe.
pub fn run_guess(filename: &str) -> anyhow::Result<()> {
    let catalog = Catalog::builtin()?;
    let recipe = resolve_from_filename(&catalog, Some(filename))?;

    println!("--- {} ---", recipe.title);
    println!();
    println!("Ingredients:");
    for ingredient in &recipe.ingredients {
        println!("  - {}", ingredient);
    }
    println!();
    println!("Steps:");
    for (i, step) in recipe.steps.iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::builtin().unwrap()
    }

    #[test]
    fn test_pizza_keywords() {
        let catalog = catalog();
        for name in ["pizza.jpg", "MY_PIZZA.PNG", "margherita-2024.jpeg", "Margherita"] {
            let recipe = resolve_from_filename(&catalog, Some(name)).unwrap();
            assert_eq!(recipe.title, "Domowa pizza margherita", "filename {}", name);
            assert_eq!(recipe.ingredients.len(), 6);
            assert_eq!(recipe.steps.len(), 5);
        }
    }

    #[test]
    fn test_salad_keywords() {
        let catalog = catalog();
        for name in ["salad.jpg", "Salatka.png", "moja_sałatka.jpg", "SAŁATA.webp"] {
            let recipe = resolve_from_filename(&catalog, Some(name)).unwrap();
            assert_eq!(recipe.title, "Kolorowa sałatka warzywna", "filename {}", name);
        }
    }

    #[test]
    fn test_pizza_wins_over_salad() {
        let recipe = resolve_from_filename(&catalog(), Some("pizza_salad.jpg")).unwrap();
        assert_eq!(recipe.title, "Domowa pizza margherita");
    }

    #[test]
    fn test_fallback_for_unknown_names() {
        let catalog = catalog();
        for name in ["IMG_0001.jpg", "dinner", "x"] {
            let recipe = resolve_from_filename(&catalog, Some(name)).unwrap();
            assert_eq!(recipe.title, "Prosty przepis na rozpoznane danie");
            assert_eq!(recipe.ingredients.len(), 5);
            assert_eq!(recipe.steps.len(), 4);
        }
    }

    #[test]
    fn test_tags_source_and_filename() {
        let recipe = resolve_from_filename(&catalog(), Some("Pizza.JPG")).unwrap();
        assert_eq!(recipe.source, Some(RecipeSource::Image));
        assert_eq!(recipe.image_filename.as_deref(), Some("Pizza.JPG"));
    }

    #[test]
    fn test_missing_filename() {
        let catalog = catalog();
        assert_eq!(
            resolve_from_filename(&catalog, None),
            Err(RecipeError::NoFileUploaded)
        );
        assert_eq!(
            resolve_from_filename(&catalog, Some("")),
            Err(RecipeError::NoFileUploaded)
        );
    }
}
