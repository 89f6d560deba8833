//! Fixed recipe data.
//!
//! The image templates and the seed catalog live in `data/catalog.toml`,
//! embedded at compile time and parsed once at startup into an immutable
//! [`Catalog`]. Request handlers only ever scan it.

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::models::{Recipe, RecipeSource};

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.toml");

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    image_templates: Vec<TemplateEntry>,
    image_fallback: RecipeEntry,
    #[serde(default)]
    seeds: Vec<RecipeEntry>,
}

#[derive(Debug, Deserialize)]
struct TemplateEntry {
    keywords: Vec<String>,
    title: String,
    ingredients: Vec<String>,
    steps: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RecipeEntry {
    title: String,
    ingredients: Vec<String>,
    steps: Vec<String>,
}

/// A recipe returned for uploads whose filename contains one of `keywords`.
#[derive(Debug, Clone)]
pub struct ImageTemplate {
    /// Lower-case substrings tested against the lower-cased filename.
    pub keywords: Vec<String>,
    pub recipe: Recipe,
}

impl ImageTemplate {
    pub fn matches(&self, name_lower: &str) -> bool {
        self.keywords.iter().any(|k| name_lower.contains(k.as_str()))
    }
}

/// Immutable table of image templates and seed recipes.
#[derive(Debug, Clone)]
pub struct Catalog {
    templates: Vec<ImageTemplate>,
    fallback: Recipe,
    seeds: Vec<Recipe>,
}

impl Catalog {
    /// Parse the catalog compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_toml(BUILTIN_CATALOG).context("Failed to load built-in recipe catalog")
    }

    /// Parse and validate a catalog document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content).context("Failed to parse catalog")?;

        let mut templates = Vec::with_capacity(file.image_templates.len());
        for entry in file.image_templates {
            if entry.keywords.iter().all(|k| k.trim().is_empty()) {
                bail!("image template '{}' has no keywords", entry.title);
            }
            let recipe = build_recipe(entry.title, entry.ingredients, entry.steps, None)?;
            templates.push(ImageTemplate {
                keywords: entry
                    .keywords
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect(),
                recipe,
            });
        }

        let fallback = build_recipe(
            file.image_fallback.title,
            file.image_fallback.ingredients,
            file.image_fallback.steps,
            None,
        )?;

        let seeds = file
            .seeds
            .into_iter()
            .map(|e| build_recipe(e.title, e.ingredients, e.steps, Some(RecipeSource::Seed)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            templates,
            fallback,
            seeds,
        })
    }

    /// Keyworded image templates in priority order.
    pub fn templates(&self) -> &[ImageTemplate] {
        &self.templates
    }

    /// Template returned when no keyword matches.
    pub fn fallback(&self) -> &Recipe {
        &self.fallback
    }

    /// Seed recipes scored by the ingredient matcher, in catalog order.
    pub fn seeds(&self) -> &[Recipe] {
        &self.seeds
    }
}

fn build_recipe(
    title: String,
    ingredients: Vec<String>,
    steps: Vec<String>,
    source: Option<RecipeSource>,
) -> Result<Recipe> {
    if title.trim().is_empty() {
        bail!("catalog recipe title must not be empty");
    }
    if ingredients.is_empty() {
        bail!("catalog recipe '{}' has no ingredients", title);
    }
    if steps.is_empty() {
        bail!("catalog recipe '{}' has no steps", title);
    }

    Ok(Recipe {
        title,
        ingredients,
        steps,
        source,
        image_filename: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_shape() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.templates().len(), 2);
        assert_eq!(catalog.seeds().len(), 3);

        let pizza = &catalog.templates()[0].recipe;
        assert_eq!(pizza.title, "Domowa pizza margherita");
        assert_eq!(pizza.ingredients.len(), 6);
        assert_eq!(pizza.steps.len(), 5);

        assert_eq!(catalog.fallback().title, "Prosty przepis na rozpoznane danie");
    }

    #[test]
    fn test_seeds_are_tagged() {
        let catalog = Catalog::builtin().unwrap();
        for seed in catalog.seeds() {
            assert_eq!(seed.source, Some(RecipeSource::Seed));
            assert!(seed.image_filename.is_none());
        }
        let titles: Vec<&str> = catalog.seeds().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Spaghetti aglio e olio", "Sałatka grecka", "Kurczak curry"]
        );
    }

    #[test]
    fn test_keywords_lowercased() {
        let catalog = Catalog::from_toml(
            r#"
[[image_templates]]
keywords = ["  Soup ", ""]
title = "Soup"
ingredients = ["water"]
steps = ["boil"]

[image_fallback]
title = "Anything"
ingredients = ["food"]
steps = ["cook"]
"#,
        )
        .unwrap();
        assert_eq!(catalog.templates()[0].keywords, vec!["soup".to_string()]);
        assert!(catalog.seeds().is_empty());
    }

    #[test]
    fn test_rejects_recipe_without_steps() {
        let err = Catalog::from_toml(
            r#"
[image_fallback]
title = "Anything"
ingredients = ["food"]
steps = []
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("no steps"));
    }

    #[test]
    fn test_rejects_template_without_keywords() {
        let result = Catalog::from_toml(
            r#"
[[image_templates]]
keywords = []
title = "Soup"
ingredients = ["water"]
steps = ["boil"]

[image_fallback]
title = "Anything"
ingredients = ["food"]
steps = ["cook"]
"#,
        );
        assert!(result.is_err());
    }
}
