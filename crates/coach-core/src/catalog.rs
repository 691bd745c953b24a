//! Catalog item lookup and on-the-fly creation.
//!
//! Coaches type a name; the catalog is searched once the term is long
//! enough, and a term with no match can be cataloged directly. The same
//! flow serves exercises and foods through the [`Catalog`] trait.

use async_trait::async_trait;
use tracing::{debug, info};

use coach_api::endpoints::catalog as api;
use coach_api::models::{Exercise, Food, Id, NewExercise, NewFood};
use coach_api::{ApiClient, ApiError};

/// Terms shorter than this (after trimming) are not searched.
pub const MIN_SEARCH_LEN: usize = 3;

/// Common view of exercises and foods.
pub trait CatalogItem: Clone + Send + Sync {
    fn id(&self) -> Id;
    fn name(&self) -> &str;
}

impl CatalogItem for Exercise {
    fn id(&self) -> Id {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl CatalogItem for Food {
    fn id(&self) -> Id {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// The term is too short; nothing was requested.
    TooShort,
    Found(Vec<T>),
    /// The search ran and matched nothing; the caller may create the item.
    NotFound,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<T> {
    /// An existing item whose name equals the term (case-insensitive).
    Existing(T),
    /// Nothing matched; the term was cataloged.
    Created(T),
    /// Only partial matches; the caller has to choose.
    Ambiguous(Vec<T>),
}

impl<T> Resolution<T> {
    /// The selected item, if the resolution picked one.
    pub fn selected(&self) -> Option<&T> {
        match self {
            Self::Existing(item) | Self::Created(item) => Some(item),
            Self::Ambiguous(_) => None,
        }
    }
}

fn searchable(term: &str) -> Option<&str> {
    let term = term.trim();
    (term.chars().count() >= MIN_SEARCH_LEN).then_some(term)
}

#[async_trait]
pub trait Catalog: Send + Sync {
    type Item: CatalogItem;
    /// Attributes required to catalog a new item besides its name.
    type Attrs: Send + Sync;

    /// Label used in logs and messages ("exercise", "food").
    fn label(&self) -> &'static str;

    async fn search(&self, term: &str) -> Result<Vec<Self::Item>, ApiError>;

    async fn create(&self, name: &str, attrs: &Self::Attrs) -> Result<Self::Item, ApiError>;

    async fn lookup(&self, term: &str) -> Result<Lookup<Self::Item>, ApiError> {
        let Some(term) = searchable(term) else {
            debug!(catalog = self.label(), "term too short, not searching");
            return Ok(Lookup::TooShort);
        };
        let items = self.search(term).await?;
        if items.is_empty() {
            Ok(Lookup::NotFound)
        } else {
            Ok(Lookup::Found(items))
        }
    }

    /// Select the item named `term`, cataloging it when nothing matches.
    async fn resolve_or_create(
        &self,
        term: &str,
        attrs: &Self::Attrs,
    ) -> Result<Resolution<Self::Item>, ApiError> {
        match self.lookup(term).await? {
            Lookup::TooShort => Err(ApiError::InvalidArgument(format!(
                "{} name {:?} is too short (minimum {MIN_SEARCH_LEN} characters)",
                self.label(),
                term.trim()
            ))),
            Lookup::Found(mut items) => {
                let wanted = term.trim().to_lowercase();
                match items.iter().position(|i| i.name().to_lowercase() == wanted) {
                    Some(idx) => Ok(Resolution::Existing(items.swap_remove(idx))),
                    None => Ok(Resolution::Ambiguous(items)),
                }
            }
            Lookup::NotFound => {
                let item = self.create(term.trim(), attrs).await?;
                info!(catalog = self.label(), id = item.id(), name = item.name(), "cataloged new item");
                Ok(Resolution::Created(item))
            }
        }
    }
}

/// Exercise catalog ("ejercicios base").
#[derive(Debug, Clone)]
pub struct ExerciseCatalog {
    client: ApiClient,
}

impl ExerciseCatalog {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExerciseAttrs {
    pub category: Option<String>,
}

#[async_trait]
impl Catalog for ExerciseCatalog {
    type Item = Exercise;
    type Attrs = ExerciseAttrs;

    fn label(&self) -> &'static str {
        "exercise"
    }

    async fn search(&self, term: &str) -> Result<Vec<Exercise>, ApiError> {
        api::search_exercises(&self.client, term).await
    }

    async fn create(&self, name: &str, attrs: &ExerciseAttrs) -> Result<Exercise, ApiError> {
        let new = NewExercise {
            name: name.to_owned(),
            category: attrs.category.clone(),
        };
        api::create_exercise(&self.client, &new).await
    }
}

/// Food catalog ("alimentos").
#[derive(Debug, Clone)]
pub struct FoodCatalog {
    client: ApiClient,
}

impl FoodCatalog {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

/// Nutrients per 100 g for a food being cataloged. Unknown values stay 0.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FoodAttrs {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[async_trait]
impl Catalog for FoodCatalog {
    type Item = Food;
    type Attrs = FoodAttrs;

    fn label(&self) -> &'static str {
        "food"
    }

    async fn search(&self, term: &str) -> Result<Vec<Food>, ApiError> {
        api::search_foods(&self.client, term).await
    }

    async fn create(&self, name: &str, attrs: &FoodAttrs) -> Result<Food, ApiError> {
        let new = NewFood {
            name: name.to_owned(),
            calories_per_100g: attrs.calories,
            protein_per_100g: attrs.protein,
            carbs_per_100g: attrs.carbs,
            fat_per_100g: attrs.fat,
        };
        api::create_food(&self.client, &new).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// In-memory catalog counting backend calls.
    struct Memory {
        items: Mutex<Vec<Exercise>>,
        searches: Mutex<usize>,
    }

    impl Memory {
        fn with(names: &[&str]) -> Self {
            let items = names
                .iter()
                .enumerate()
                .map(|(i, n)| Exercise {
                    id: i as Id + 1,
                    name: (*n).to_owned(),
                    category: None,
                })
                .collect();
            Self {
                items: Mutex::new(items),
                searches: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl Catalog for Memory {
        type Item = Exercise;
        type Attrs = ();

        fn label(&self) -> &'static str {
            "exercise"
        }

        async fn search(&self, term: &str) -> Result<Vec<Exercise>, ApiError> {
            *self.searches.lock().unwrap() += 1;
            let needle = term.to_lowercase();
            Ok(self
                .items
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.name.to_lowercase().contains(&needle))
                .cloned()
                .collect())
        }

        async fn create(&self, name: &str, _: &()) -> Result<Exercise, ApiError> {
            let mut items = self.items.lock().unwrap();
            let item = Exercise {
                id: items.len() as Id + 1,
                name: name.to_owned(),
                category: None,
            };
            items.push(item.clone());
            Ok(item)
        }
    }

    #[tokio::test]
    async fn short_term_does_not_search() {
        let catalog = Memory::with(&["Press banca"]);
        assert_eq!(catalog.lookup(" pr ").await.unwrap(), Lookup::TooShort);
        assert_eq!(*catalog.searches.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn lookup_reports_matches_and_misses() {
        let catalog = Memory::with(&["Press banca", "Press militar", "Remo"]);
        match catalog.lookup("press").await.unwrap() {
            Lookup::Found(items) => assert_eq!(items.len(), 2),
            other => panic!("expected Found, got {other:?}"),
        }
        assert_eq!(catalog.lookup("zancadas").await.unwrap(), Lookup::NotFound);
    }

    #[tokio::test]
    async fn exact_match_is_selected() {
        let catalog = Memory::with(&["Press banca", "Press banca inclinado"]);
        let res = catalog.resolve_or_create("press BANCA", &()).await.unwrap();
        assert!(matches!(res, Resolution::Existing(ref e) if e.id == 1));
    }

    #[tokio::test]
    async fn partial_matches_are_ambiguous() {
        let catalog = Memory::with(&["Press banca", "Press militar"]);
        let res = catalog.resolve_or_create("press", &()).await.unwrap();
        assert!(matches!(res, Resolution::Ambiguous(ref items) if items.len() == 2));
        assert!(res.selected().is_none());
    }

    #[tokio::test]
    async fn miss_creates_and_selects() {
        let catalog = Memory::with(&["Remo"]);
        let res = catalog.resolve_or_create("  Hip thrust ", &()).await.unwrap();
        match res {
            Resolution::Created(item) => assert_eq!(item.name, "Hip thrust"),
            other => panic!("expected Created, got {other:?}"),
        }
        assert_eq!(catalog.items.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn resolve_rejects_short_term() {
        let catalog = Memory::with(&[]);
        let err = catalog.resolve_or_create("ab", &()).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
    }
}
