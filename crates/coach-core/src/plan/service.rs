//! Plan service layer.
//!
//! Builds a routine or diet in the backend from a parsed [`PlanFile`]:
//! catalog names are resolved (and cataloged when unknown), the plan is
//! created, then every entry is added in file order. The backend has no
//! batch endpoint, so a failure part-way leaves the steps already committed
//! in place and is reported as [`CoreError::PartialBuild`].

use std::collections::HashMap;

use tracing::{info, warn};

use coach_api::ApiClient;
use coach_api::endpoints::{diets, routines};
use coach_api::models::{Diet, Id, NewDiet, NewMeal, NewMealFood, NewRoutine, NewRoutineEntry, PlanKind, Routine};

use super::toml_format::PlanFile;
use crate::catalog::{Catalog, CatalogItem, ExerciseAttrs, ExerciseCatalog, FoodAttrs, FoodCatalog, Resolution};
use crate::error::CoreError;

/// Result of a complete build.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    pub kind: PlanKind,
    pub plan_id: Id,
    pub client_id: Id,
    /// Entry-creation calls issued (exercises, or meals plus foods).
    pub steps: usize,
    /// Catalog items created because the file named them and the catalog
    /// had no such item.
    pub cataloged: Vec<String>,
}

/// Create the plan described by `plan` for `client_id`.
pub async fn build_plan(
    client: &ApiClient,
    plan: &PlanFile,
    client_id: Id,
) -> Result<BuildReport, CoreError> {
    match plan.plan.kind {
        PlanKind::Routine => build_routine(client, plan, client_id).await,
        PlanKind::Diet => build_diet(client, plan, client_id).await,
    }
}

/// Resolve every distinct name through `catalog`, in first-use order.
async fn resolve_names<C: Catalog>(
    catalog: &C,
    names: impl IntoIterator<Item = (String, C::Attrs)>,
    cataloged: &mut Vec<String>,
) -> Result<HashMap<String, Id>, CoreError> {
    let mut ids = HashMap::new();
    for (name, attrs) in names {
        let key = name.trim().to_lowercase();
        if ids.contains_key(&key) {
            continue;
        }
        let id = match catalog.resolve_or_create(&name, &attrs).await? {
            Resolution::Existing(item) => item.id(),
            Resolution::Created(item) => {
                cataloged.push(item.name().to_owned());
                item.id()
            }
            Resolution::Ambiguous(items) => {
                let candidates: Vec<&str> = items.iter().map(|i| i.name()).collect();
                return Err(CoreError::invalid(format!(
                    "{} {name:?} is not in the catalog; did you mean one of: {}?",
                    catalog.label(),
                    candidates.join(", ")
                )));
            }
        };
        ids.insert(key, id);
    }
    Ok(ids)
}

fn lookup_id(ids: &HashMap<String, Id>, name: &str) -> Result<Id, CoreError> {
    ids.get(&name.trim().to_lowercase())
        .copied()
        .ok_or_else(|| CoreError::Inconsistent(format!("catalog name {name:?} was not resolved")))
}

async fn build_routine(
    client: &ApiClient,
    plan: &PlanFile,
    client_id: Id,
) -> Result<BuildReport, CoreError> {
    let mut cataloged = Vec::new();
    let catalog = ExerciseCatalog::new(client.clone());
    let names = plan.exercises.iter().map(|e| {
        (
            e.exercise.clone(),
            ExerciseAttrs {
                category: e.category.clone(),
            },
        )
    });
    let ids = resolve_names(&catalog, names, &mut cataloged).await?;

    let new = NewRoutine {
        name: plan.plan.name.trim().to_owned(),
        start_date: None,
        expiry_date: None,
        notes: plan.plan.notes.clone(),
        day_count: Some(plan.plan.day_count),
    };
    let routine = routines::create_routine(client, client_id, &new).await?;

    for (i, ex) in plan.exercises.iter().enumerate() {
        let entry = NewRoutineEntry {
            exercise_id: lookup_id(&ids, &ex.exercise)?,
            day: ex.day,
            sets: ex.sets,
            reps: ex.reps,
            weight: ex.weight,
            rest_seconds: ex.rest,
            notes: ex.notes.clone(),
        };
        if let Err(source) = routines::add_entry(client, routine.id, &entry).await {
            warn!(routine_id = routine.id, committed = i, error = %source, "routine build stopped");
            return Err(CoreError::PartialBuild {
                plan_id: routine.id,
                created: i,
                failed_at: format!("exercise {} ({})", i + 1, ex.exercise),
                source,
            });
        }
    }

    info!(routine_id = routine.id, client_id, entries = plan.exercises.len(), "routine built");
    Ok(BuildReport {
        kind: PlanKind::Routine,
        plan_id: routine.id,
        client_id,
        steps: plan.exercises.len(),
        cataloged,
    })
}

async fn build_diet(
    client: &ApiClient,
    plan: &PlanFile,
    client_id: Id,
) -> Result<BuildReport, CoreError> {
    let mut cataloged = Vec::new();
    let catalog = FoodCatalog::new(client.clone());
    let names = plan.meals.iter().flat_map(|m| &m.foods).map(|f| {
        let n = f.per_100g.unwrap_or_default();
        (
            f.food.clone(),
            FoodAttrs {
                calories: n.calories,
                protein: n.protein,
                carbs: n.carbs,
                fat: n.fat,
            },
        )
    });
    let ids = resolve_names(&catalog, names, &mut cataloged).await?;

    let new = NewDiet {
        name: plan.plan.name.trim().to_owned(),
        start_date: None,
        notes: plan.plan.notes.clone(),
    };
    let diet = diets::create_diet(client, client_id, &new).await?;

    let mut steps = 0;
    let mut orders: HashMap<i32, i32> = HashMap::new();
    for (i, meal) in plan.meals.iter().enumerate() {
        let next = orders.entry(meal.day).or_insert(0);
        *next += 1;
        let new_meal = NewMeal {
            name: meal.name.trim().to_owned(),
            order: meal.order.unwrap_or(*next),
            day: meal.day,
        };
        let created = match diets::add_meal(client, diet.id, &new_meal).await {
            Ok(m) => m,
            Err(source) => return Err(partial(diet.id, steps, format!("meal {} ({})", i + 1, meal.name), source)),
        };
        steps += 1;

        for food in &meal.foods {
            let entry = NewMealFood {
                food_id: lookup_id(&ids, &food.food)?,
                grams: food.grams,
            };
            if let Err(source) = diets::add_meal_food(client, created.id, &entry).await {
                return Err(partial(diet.id, steps, format!("{} in {}", food.food, meal.name), source));
            }
            steps += 1;
        }
    }

    info!(diet_id = diet.id, client_id, steps, "diet built");
    Ok(BuildReport {
        kind: PlanKind::Diet,
        plan_id: diet.id,
        client_id,
        steps,
        cataloged,
    })
}

fn partial(plan_id: Id, created: usize, failed_at: String, source: coach_api::ApiError) -> CoreError {
    warn!(plan_id, committed = created, failed_at = %failed_at, error = %source, "diet build stopped");
    CoreError::PartialBuild {
        plan_id,
        created,
        failed_at,
        source,
    }
}

/// A plan of either kind.
#[derive(Debug, Clone)]
pub enum LoadedPlan {
    Routine(Routine),
    Diet(Diet),
}

impl LoadedPlan {
    pub fn id(&self) -> Id {
        match self {
            Self::Routine(r) => r.id,
            Self::Diet(d) => d.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Routine(r) => &r.name,
            Self::Diet(d) => &d.name,
        }
    }
}

pub async fn load_plan(client: &ApiClient, kind: PlanKind, id: Id) -> Result<LoadedPlan, CoreError> {
    Ok(match kind {
        PlanKind::Routine => LoadedPlan::Routine(routines::get_routine(client, id).await?),
        PlanKind::Diet => LoadedPlan::Diet(diets::get_diet(client, id).await?),
    })
}
