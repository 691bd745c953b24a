//! TOML format types for plan definition files.
//!
//! A plan file describes one routine or one diet:
//!
//! ```toml
//! [plan]
//! kind = "routine"
//! name = "Fuerza 3 días"
//! day_count = 3
//!
//! [[exercises]]
//! day = 1
//! exercise = "Sentadilla"
//! sets = 4
//! reps = 8
//! weight = 60.0
//! rest = 90
//! ```
//!
//! Diets use `[[meals]]` with nested `[[meals.foods]]` instead.

use serde::{Deserialize, Serialize};

use coach_api::models::{Id, PlanKind};

/// Top-level structure of a plan file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanFile {
    pub plan: PlanMeta,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exercises: Vec<ExerciseToml>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meals: Vec<MealToml>,
}

/// `[plan]` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanMeta {
    pub kind: PlanKind,
    /// Backend id, written back once the plan has been created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    pub name: String,
    /// Owner; may be overridden on the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<Id>,
    /// Training days per week (routines only).
    #[serde(default = "default_day_count")]
    pub day_count: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One `[[exercises]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExerciseToml {
    pub day: i32,
    /// Catalog name; cataloged on the fly when unknown.
    pub exercise: String,
    /// Muscle group used when the exercise has to be cataloged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub sets: i32,
    pub reps: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Rest between sets, seconds.
    #[serde(default = "default_rest")]
    pub rest: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One `[[meals]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealToml {
    /// Menu number.
    pub day: i32,
    pub name: String,
    /// Position inside the menu; defaults to file order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(default)]
    pub foods: Vec<FoodToml>,
}

/// One `[[meals.foods]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodToml {
    pub food: String,
    pub grams: f64,
    /// Nutrients per 100 g, used only when the food has to be cataloged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_100g: Option<NutrientsToml>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct NutrientsToml {
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
}

fn default_day_count() -> i32 {
    3
}

fn default_rest() -> i32 {
    60
}

impl PlanFile {
    /// Number of backend calls needed to create every entry.
    pub fn step_count(&self) -> usize {
        match self.plan.kind {
            PlanKind::Routine => self.exercises.len(),
            PlanKind::Diet => self.meals.iter().map(|m| 1 + m.foods.len()).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_routine_with_defaults() {
        let toml_str = r#"
[plan]
kind = "routine"
name = "Fuerza"

[[exercises]]
day = 1
exercise = "Sentadilla"
sets = 4
reps = 8
"#;
        let plan: PlanFile = toml::from_str(toml_str).expect("should parse");
        assert_eq!(plan.plan.kind, PlanKind::Routine);
        assert_eq!(plan.plan.day_count, 3);
        assert_eq!(plan.exercises[0].rest, 60);
        assert!(plan.exercises[0].weight.is_none());
        assert!(plan.meals.is_empty());
        assert_eq!(plan.step_count(), 1);
    }

    #[test]
    fn deserialize_diet_with_nested_foods() {
        let toml_str = r#"
[plan]
kind = "diet"
name = "Definición"
client_id = 4

[[meals]]
day = 1
name = "Desayuno"

[[meals.foods]]
food = "Avena"
grams = 80

[[meals.foods]]
food = "Leche desnatada"
grams = 250
per_100g = { calories = 35, protein = 3.4, carbs = 5.0 }

[[meals]]
day = 2
name = "Desayuno"
order = 1
"#;
        let plan: PlanFile = toml::from_str(toml_str).expect("should parse");
        assert_eq!(plan.plan.client_id, Some(4));
        assert_eq!(plan.meals.len(), 2);
        assert_eq!(plan.meals[0].foods.len(), 2);
        assert_eq!(plan.meals[0].foods[1].per_100g.unwrap().fat, 0.0);
        assert_eq!(plan.step_count(), 4);
    }

    #[test]
    fn id_is_omitted_until_created() {
        let plan = PlanFile {
            plan: PlanMeta {
                kind: PlanKind::Diet,
                id: None,
                name: "Base".into(),
                client_id: None,
                day_count: 3,
                notes: None,
            },
            exercises: vec![],
            meals: vec![],
        };
        let text = toml::to_string(&plan).unwrap();
        assert!(!text.contains("id ="));
        assert!(text.contains("kind = \"diet\""));
    }
}
