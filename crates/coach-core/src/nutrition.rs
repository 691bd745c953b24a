//! Macro-nutrient totals for diets.
//!
//! Catalog foods carry nutrients per 100 g. An entry of `grams` contributes
//! `nutrient * grams / 100`. Sums are kept unrounded; round only for display.

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::Serialize;
use tracing::warn;

use coach_api::models::{Diet, Food, Meal, MealFood};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// [`MacroTotals`] rounded to whole units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoundedMacros {
    pub calories: i64,
    pub protein: i64,
    pub carbs: i64,
    pub fat: i64,
}

impl MacroTotals {
    pub fn rounded(&self) -> RoundedMacros {
        RoundedMacros {
            calories: round_half_up(self.calories),
            protein: round_half_up(self.protein),
            carbs: round_half_up(self.carbs),
            fat: round_half_up(self.fat),
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

impl Add for MacroTotals {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            calories: self.calories + rhs.calories,
            protein: self.protein + rhs.protein,
            carbs: self.carbs + rhs.carbs,
            fat: self.fat + rhs.fat,
        }
    }
}

impl AddAssign for MacroTotals {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for MacroTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Contribution of `grams` of `food`.
pub fn food_macros(food: &Food, grams: f64) -> MacroTotals {
    let factor = grams / 100.0;
    MacroTotals {
        calories: food.calories_per_100g * factor,
        protein: food.protein_per_100g * factor,
        carbs: food.carbs_per_100g * factor,
        fat: food.fat_per_100g * factor,
    }
}

/// Contribution of one meal entry. An entry whose food was not inlined by
/// the backend counts as zero.
pub fn entry_macros(entry: &MealFood) -> MacroTotals {
    match &entry.food {
        Some(food) => food_macros(food, entry.grams),
        None => {
            warn!(
                meal_food_id = entry.id,
                food_id = entry.food_id,
                "meal entry without food details, counted as zero"
            );
            MacroTotals::default()
        }
    }
}

pub fn meal_macros(meal: &Meal) -> MacroTotals {
    meal.foods.iter().map(entry_macros).sum()
}

/// Totals of every meal in menu `day`.
pub fn menu_macros(diet: &Diet, day: i32) -> MacroTotals {
    diet.meals
        .iter()
        .filter(|m| m.day == day)
        .map(meal_macros)
        .sum()
}

pub fn diet_macros(diet: &Diet) -> MacroTotals {
    diet.meals.iter().map(meal_macros).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn food(kcal: f64, p: f64, c: f64, f: f64) -> Food {
        Food {
            id: 1,
            name: "f".into(),
            calories_per_100g: kcal,
            protein_per_100g: p,
            carbs_per_100g: c,
            fat_per_100g: f,
        }
    }

    fn entry(id: i64, food: Option<Food>, grams: f64) -> MealFood {
        MealFood {
            id,
            meal_id: Some(1),
            food_id: food.as_ref().map_or(99, |f| f.id),
            grams,
            food,
        }
    }

    fn meal(day: i32, foods: Vec<MealFood>) -> Meal {
        Meal {
            id: 1,
            diet_id: Some(1),
            day,
            name: "Desayuno".into(),
            order: 1,
            foods,
        }
    }

    fn diet(meals: Vec<Meal>) -> Diet {
        Diet {
            id: 1,
            client_id: Some(1),
            name: "Definición".into(),
            start_date: None,
            notes: None,
            active: true,
            is_template: false,
            meals,
        }
    }

    #[test]
    fn scales_per_100g() {
        let totals = food_macros(&food(50.0, 10.0, 4.0, 2.0), 200.0);
        assert_eq!(totals.calories, 100.0);
        assert_eq!(totals.protein, 20.0);
        assert_eq!(totals.carbs, 8.0);
        assert_eq!(totals.fat, 4.0);
    }

    #[test]
    fn empty_inputs_are_zero() {
        assert!(diet_macros(&diet(vec![])).is_zero());
        assert!(meal_macros(&meal(1, vec![])).is_zero());
    }

    #[test]
    fn missing_food_counts_as_zero() {
        let m = meal(1, vec![entry(1, None, 150.0), entry(2, Some(food(100.0, 0.0, 0.0, 0.0)), 50.0)]);
        assert_eq!(meal_macros(&m).calories, 50.0);
    }

    #[test]
    fn sums_unrounded_then_rounds() {
        // 3 x 33.3 g of 100 kcal/100 g: 99.9 kcal, shown as 100.
        let oats = food(100.0, 0.0, 0.0, 0.0);
        let m = meal(
            1,
            (1..=3).map(|i| entry(i, Some(oats.clone()), 33.3)).collect(),
        );
        let totals = meal_macros(&m);
        assert!((totals.calories - 99.9).abs() < 1e-9);
        assert_eq!(totals.rounded().calories, 100);
    }

    #[test]
    fn menu_scope_filters_by_day() {
        let rice = food(130.0, 2.7, 28.0, 0.3);
        let d = diet(vec![
            meal(1, vec![entry(1, Some(rice.clone()), 100.0)]),
            meal(2, vec![entry(2, Some(rice.clone()), 300.0)]),
        ]);
        assert_eq!(menu_macros(&d, 1).rounded().calories, 130);
        assert_eq!(menu_macros(&d, 2).rounded().calories, 390);
        assert_eq!(diet_macros(&d).rounded().calories, 520);
        assert!(menu_macros(&d, 5).is_zero());
    }

    #[test]
    fn half_rounds_up() {
        let t = MacroTotals {
            calories: 2.5,
            protein: 0.49,
            carbs: 10.5,
            fat: 0.0,
        };
        assert_eq!(
            t.rounded(),
            RoundedMacros {
                calories: 3,
                protein: 0,
                carbs: 11,
                fat: 0
            }
        );
    }
}
