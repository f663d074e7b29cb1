//! Recipe catalog loading and fuzzy search

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::CatalogError;
use crate::models::EndpointDescriptor;

/// Minimum score (0-100) for a search hit
pub const MATCH_THRESHOLD: i64 = 60;

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Wrapped { recipes: Vec<EndpointDescriptor> },
    Bare(Vec<EndpointDescriptor>),
}

impl CatalogFile {
    fn into_recipes(self) -> Vec<EndpointDescriptor> {
        match self {
            CatalogFile::Wrapped { recipes } | CatalogFile::Bare(recipes) => recipes,
        }
    }
}

/// Ordered list of recipes
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    recipes: Vec<EndpointDescriptor>,
}

impl Catalog {
    /// Build a catalog, rejecting schemas with duplicate parameter names
    pub fn new(recipes: Vec<EndpointDescriptor>) -> Result<Self, CatalogError> {
        for recipe in &recipes {
            if let Some(name) = recipe.request_body.as_ref().and_then(|s| s.first_duplicate()) {
                return Err(CatalogError::DuplicateParameter {
                    recipe: recipe.label(),
                    name: name.to_string(),
                });
            }
        }
        Ok(Catalog { recipes })
    }

    /// Load a catalog from a JSON or YAML file
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        // Determine if JSON or YAML
        let file: CatalogFile = if path.extension().map(|e| e == "json").unwrap_or(false) {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };

        let catalog = Catalog::new(file.into_recipes())?;
        tracing::info!(path = %path.display(), recipes = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&EndpointDescriptor> {
        self.recipes.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EndpointDescriptor> {
        self.recipes.iter()
    }

    /// Recipes matching `query`, best first. An empty query returns everything.
    pub fn search(&self, query: &str) -> Vec<&EndpointDescriptor> {
        let query = query.trim();
        if query.is_empty() {
            return self.recipes.iter().collect();
        }

        let mut scored: Vec<_> = self
            .recipes
            .iter()
            .map(|recipe| (score_recipe(query, recipe), recipe))
            .filter(|(score, _)| *score >= MATCH_THRESHOLD)
            .collect();
        // stable: ties keep catalog order
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, recipe)| recipe).collect()
    }
}

fn score_recipe(query: &str, recipe: &EndpointDescriptor) -> i64 {
    let label = recipe.label();
    [recipe.summary.as_deref().unwrap_or(""), recipe.path.as_str(), label.as_str()]
        .into_iter()
        .map(|field| score_field(query, field))
        .max()
        .unwrap_or(0)
}

/// 100 for a substring hit, otherwise the mean of each query word's best
/// similarity against the field's words
fn score_field(query: &str, field: &str) -> i64 {
    let query = query.to_lowercase();
    let field = field.to_lowercase();
    if field.is_empty() {
        return 0;
    }
    if field.contains(&query) {
        return 100;
    }

    let words: Vec<&str> = field
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let terms: Vec<&str> = query.split_whitespace().collect();
    if words.is_empty() || terms.is_empty() {
        return 0;
    }

    let total: i64 = terms
        .iter()
        .map(|term| {
            if words.iter().any(|w| w.contains(term)) {
                100
            } else {
                words.iter().map(|w| similarity(term, w)).max().unwrap_or(0)
            }
        })
        .sum();
    total / terms.len() as i64
}

/// Levenshtein distance normalized to 0-100
fn similarity(a: &str, b: &str) -> i64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 100;
    }
    100 - (levenshtein(a, b) as i64 * 100 / max_len as i64)
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut costs = (0..=b.len()).collect::<Vec<_>>();

    for (i, ca) in a.chars().enumerate() {
        costs[0] = i + 1;
        let mut last_cost = i;
        for (j, cb) in b.iter().enumerate() {
            let new_cost = if ca == *cb {
                last_cost
            } else {
                1 + last_cost.min(costs[j]).min(costs[j + 1])
            };
            last_cost = costs[j + 1];
            costs[j + 1] = new_cost;
        }
    }
    costs[b.len()]
}
