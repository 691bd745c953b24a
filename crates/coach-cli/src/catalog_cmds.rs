//! CLI handlers for `coach catalog` subcommands.

use anyhow::{Result, bail};

use coach_api::ApiClient;
use coach_api::endpoints::catalog as api_catalog;
use coach_api::models::{Exercise, Food, NewFood};
use coach_core::CoreError;
use coach_core::catalog::{
    Catalog, CatalogItem, ExerciseAttrs, ExerciseCatalog, FoodAttrs, FoodCatalog, Lookup,
    MIN_SEARCH_LEN, Resolution,
};
use coach_core::validation::{self, validate_name};

use crate::CatalogCommands;
use crate::render;

pub async fn run_catalog_command(command: CatalogCommands, api: &ApiClient) -> Result<()> {
    match command {
        CatalogCommands::Exercises { term } => {
            let items = match term {
                Some(term) => search(&ExerciseCatalog::new(api.clone()), &term).await?,
                None => api_catalog::list_exercises(api).await?,
            };
            print_exercises(&items);
            Ok(())
        }
        CatalogCommands::Foods { term } => {
            let items = match term {
                Some(term) => search(&FoodCatalog::new(api.clone()), &term).await?,
                None => api_catalog::list_foods(api).await?,
            };
            print_foods(&items);
            Ok(())
        }
        CatalogCommands::AddExercise { name, category } => {
            let name = validation::sanitize(&name);
            validate_name("nombre", &name).map_err(CoreError::from)?;
            let attrs = ExerciseAttrs { category };
            let resolution = ExerciseCatalog::new(api.clone()).resolve_or_create(&name, &attrs).await?;
            report("exercise", resolution)
        }
        CatalogCommands::AddFood {
            name,
            calories,
            protein,
            carbs,
            fat,
        } => {
            let mut new = NewFood {
                name,
                calories_per_100g: calories,
                protein_per_100g: protein,
                carbs_per_100g: carbs,
                fat_per_100g: fat,
            };
            validation::validate_new_food(&mut new).map_err(CoreError::Validation)?;
            let attrs = FoodAttrs {
                calories,
                protein,
                carbs,
                fat,
            };
            let resolution = FoodCatalog::new(api.clone()).resolve_or_create(&new.name, &attrs).await?;
            report("food", resolution)
        }
    }
}

async fn search<C: Catalog>(catalog: &C, term: &str) -> Result<Vec<C::Item>> {
    match catalog.lookup(term).await? {
        Lookup::TooShort => bail!("type at least {MIN_SEARCH_LEN} characters to search"),
        Lookup::Found(items) => Ok(items),
        Lookup::NotFound => Ok(Vec::new()),
    }
}

/// Describe what `resolve_or_create` did; an ambiguous name is an error
/// listing the candidates.
pub fn describe<T: CatalogItem>(label: &str, resolution: &Resolution<T>) -> Result<String> {
    match resolution {
        Resolution::Existing(item) => Ok(format!(
            "{label} {:?} already exists (id {})",
            item.name(),
            item.id()
        )),
        Resolution::Created(item) => Ok(format!(
            "Added {label} {:?} (id {})",
            item.name(),
            item.id()
        )),
        Resolution::Ambiguous(items) => {
            let names: Vec<&str> = items.iter().map(CatalogItem::name).collect();
            bail!(
                "similar {label}s exist: {}; use one of them or pick a more specific name",
                names.join(", ")
            )
        }
    }
}

fn report<T: CatalogItem>(label: &str, resolution: Resolution<T>) -> Result<()> {
    println!("{}", describe(label, &resolution)?);
    Ok(())
}

fn print_exercises(items: &[Exercise]) {
    if items.is_empty() {
        println!("No exercises found.");
        return;
    }
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|e| vec![e.id.to_string(), e.name.clone(), e.category.clone().unwrap_or_default()])
        .collect();
    print!("{}", render::table(&["ID", "Name", "Category"], &rows));
}

pub fn food_rows(items: &[Food]) -> Vec<Vec<String>> {
    items
        .iter()
        .map(|f| {
            vec![
                f.id.to_string(),
                f.name.clone(),
                format!("{}", f.calories_per_100g),
                format!("{}", f.protein_per_100g),
                format!("{}", f.carbs_per_100g),
                format!("{}", f.fat_per_100g),
            ]
        })
        .collect()
}

fn print_foods(items: &[Food]) {
    if items.is_empty() {
        println!("No foods found.");
        return;
    }
    println!("Nutrients per 100 g.");
    print!(
        "{}",
        render::table(&["ID", "Name", "kcal", "Protein", "Carbs", "Fat"], &food_rows(items))
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use coach_test_utils::FakeBackend;

    #[tokio::test]
    async fn short_search_is_refused() {
        let backend = FakeBackend::spawn().await;
        backend.clear_requests();
        let err = search(&FoodCatalog::new(backend.client()), "ar").await.unwrap_err();
        assert!(err.to_string().contains("at least 3"));
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn add_food_twice_reuses_existing() {
        let backend = FakeBackend::spawn().await;
        let api = backend.client();
        let add = || CatalogCommands::AddFood {
            name: "Arroz integral".into(),
            calories: 362.0,
            protein: 7.5,
            carbs: 76.0,
            fat: 2.7,
        };
        run_catalog_command(add(), &api).await.unwrap();
        run_catalog_command(add(), &api).await.unwrap();
        assert_eq!(backend.lock().foods.len(), 1);
    }

    #[tokio::test]
    async fn add_food_validates_nutrients() {
        let backend = FakeBackend::spawn().await;
        let api = backend.client();
        let err = run_catalog_command(
            CatalogCommands::AddFood {
                name: "Aceite".into(),
                calories: 1200.0,
                protein: 0.0,
                carbs: 0.0,
                fat: 100.0,
            },
            &api,
        )
        .await
        .unwrap_err();
        assert!(matches!(err.downcast_ref::<CoreError>(), Some(CoreError::Validation(_))));
        assert!(backend.lock().foods.is_empty());
    }

    #[test]
    fn ambiguous_lists_candidates() {
        let items = vec![
            Exercise {
                id: 1,
                name: "Press banca".into(),
                category: None,
            },
            Exercise {
                id: 2,
                name: "Press militar".into(),
                category: None,
            },
        ];
        let err = describe("exercise", &Resolution::Ambiguous(items)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "similar exercises exist: Press banca, Press militar; use one of them or pick a more specific name"
        );
    }
}
