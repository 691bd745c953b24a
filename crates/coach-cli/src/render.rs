//! Plain-text rendering shared by the command handlers.
//!
//! Everything here returns a `String` so output can be checked in tests
//! without capturing stdout.

use std::fmt::Write;

use coach_api::models::{Diet, Meal, PlanKind, Routine, RoutineEntry};
use coach_core::nutrition::{MacroTotals, meal_macros, menu_macros};
use coach_core::plan::{diet_buckets, routine_buckets};

/// Left-aligned table with column widths computed from the content.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    push_row(&mut out, headers.iter().copied(), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, rule.iter().map(String::as_str), &widths);
    for row in rows {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let mut line = String::new();
    for (cell, width) in cells.zip(widths) {
        let pad = width.saturating_sub(cell.chars().count());
        line.push_str(cell);
        line.push_str(&" ".repeat(pad + 2));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

pub fn macros_line(totals: &MacroTotals) -> String {
    let r = totals.rounded();
    format!(
        "{} kcal  P {} g  C {} g  F {} g",
        r.calories, r.protein, r.carbs, r.fat
    )
}

/// Dates typed on the command line are stored at midnight.
pub fn at_midnight(date: chrono::NaiveDate) -> chrono::NaiveDateTime {
    date.and_time(chrono::NaiveTime::MIN)
}

pub fn date_or_dash(date: Option<chrono::NaiveDateTime>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_owned())
}

fn entry_line(entry: &RoutineEntry) -> String {
    let name = entry
        .exercise
        .as_ref()
        .map(|e| e.name.clone())
        .unwrap_or_else(|| format!("exercise #{}", entry.exercise_id));
    let mut line = format!("{name}  {}x{}", entry.sets, entry.reps);
    if let Some(w) = entry.weight {
        let _ = write!(line, " @ {w} kg");
    }
    let _ = write!(line, ", rest {}s", entry.rest_seconds);
    if let Some(notes) = entry.notes.as_deref().filter(|n| !n.is_empty()) {
        let _ = write!(line, " ({notes})");
    }
    line
}

/// Header plus one block per training day.
pub fn routine(routine: &Routine) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Routine {}: {}", routine.id, routine.name);
    let _ = writeln!(
        out,
        "  Status:      {}",
        if routine.is_template {
            "template"
        } else if routine.active {
            "active"
        } else {
            "inactive"
        }
    );
    let _ = writeln!(out, "  Days:        {}", routine.day_count);
    let _ = writeln!(out, "  Starts:      {}", date_or_dash(routine.start_date));
    let _ = writeln!(out, "  Expires:     {}", date_or_dash(routine.expiry_date));

    let buckets = routine_buckets(routine);
    for (day, entries) in buckets.iter() {
        out.push('\n');
        let _ = writeln!(out, "{} {day}", PlanKind::Routine.slot_label());
        if entries.is_empty() {
            out.push_str("  (rest)\n");
        }
        for entry in entries {
            let _ = writeln!(out, "  - {}", entry_line(entry));
        }
    }
    if buckets.orphaned() > 0 {
        let _ = writeln!(
            out,
            "\nWarning: {} exercise(s) sit outside days 1-{}.",
            buckets.orphaned(),
            buckets.day_count()
        );
    }
    out
}

fn meal_block(out: &mut String, meal: &Meal) {
    let _ = writeln!(out, "  {}  [{}]", meal.name, macros_line(&meal_macros(meal)));
    for item in &meal.foods {
        let name = item
            .food
            .as_ref()
            .map(|f| f.name.clone())
            .unwrap_or_else(|| format!("food #{}", item.food_id));
        let _ = writeln!(out, "    - {name} {} g", item.grams);
    }
}

/// Header plus the non-empty menus with per-meal and per-menu totals.
pub fn diet(diet: &Diet) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Diet {}: {}", diet.id, diet.name);
    let _ = writeln!(
        out,
        "  Status:      {}",
        if diet.is_template {
            "template"
        } else if diet.active {
            "active"
        } else {
            "inactive"
        }
    );
    let _ = writeln!(out, "  Starts:      {}", date_or_dash(diet.start_date));

    let buckets = diet_buckets(diet);
    let used = buckets.non_empty_days();
    if used.is_empty() {
        out.push_str("\nNo meals yet.\n");
    }
    for (day, meals) in buckets.iter().filter(|(_, meals)| !meals.is_empty()) {
        out.push('\n');
        let _ = writeln!(
            out,
            "{} {day}  ({})",
            PlanKind::Diet.slot_label(),
            macros_line(&menu_macros(diet, day))
        );
        for meal in meals {
            meal_block(&mut out, meal);
        }
    }
    if buckets.orphaned() > 0 {
        let _ = writeln!(
            out,
            "\nWarning: {} meal(s) sit outside menus 1-{}.",
            buckets.orphaned(),
            buckets.day_count()
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use coach_api::models::{Exercise, Food, MealFood};

    fn oatmeal() -> Food {
        Food {
            id: 3,
            name: "Avena".into(),
            calories_per_100g: 389.0,
            protein_per_100g: 16.9,
            carbs_per_100g: 66.3,
            fat_per_100g: 6.9,
        }
    }

    fn meal(id: i64, day: i32, name: &str, grams: f64) -> Meal {
        Meal {
            id,
            diet_id: Some(1),
            day,
            name: name.into(),
            order: 1,
            foods: vec![MealFood {
                id: id * 10,
                meal_id: Some(id),
                food_id: 3,
                grams,
                food: Some(oatmeal()),
            }],
        }
    }

    fn entry(id: i64, day: i32, name: &str) -> RoutineEntry {
        RoutineEntry {
            id,
            routine_id: Some(1),
            exercise_id: id,
            day,
            sets: 4,
            reps: 8,
            weight: Some(60.0),
            rest_seconds: 90,
            notes: None,
            exercise: Some(Exercise {
                id,
                name: name.into(),
                category: None,
            }),
        }
    }

    #[test]
    fn table_pads_columns() {
        let out = table(
            &["ID", "Name"],
            &[
                vec!["1".into(), "Ana López".into()],
                vec!["12".into(), "Bo".into()],
            ],
        );
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "ID  Name");
        assert_eq!(lines[1], "--  ---------");
        assert_eq!(lines[2], "1   Ana López");
        assert_eq!(lines[3], "12  Bo");
    }

    #[test]
    fn macros_are_rounded() {
        let totals = MacroTotals {
            calories: 119.5,
            protein: 5.07,
            carbs: 19.89,
            fat: 2.07,
        };
        assert_eq!(macros_line(&totals), "120 kcal  P 5 g  C 20 g  F 2 g");
    }

    #[test]
    fn routine_lists_every_day() {
        let routine = Routine {
            id: 1,
            client_id: Some(4),
            name: "Fuerza".into(),
            start_date: None,
            expiry_date: None,
            notes: None,
            day_count: 3,
            active: true,
            is_template: false,
            entries: vec![entry(1, 1, "Sentadilla"), entry(2, 3, "Press banca"), entry(3, 5, "Remo")],
        };
        let out = super::routine(&routine);
        assert!(out.contains("Day 1\n  - Sentadilla  4x8 @ 60 kg, rest 90s"), "{out}");
        assert!(out.contains("Day 2\n  (rest)"), "{out}");
        assert!(out.contains("Day 3\n  - Press banca"), "{out}");
        assert!(out.contains("1 exercise(s) sit outside days 1-3"), "{out}");
    }

    #[test]
    fn diet_shows_menu_totals() {
        let diet = Diet {
            id: 1,
            client_id: Some(4),
            name: "Definición".into(),
            start_date: None,
            notes: None,
            active: true,
            is_template: false,
            meals: vec![meal(1, 1, "Desayuno", 30.0), meal(2, 2, "Desayuno", 60.0)],
        };
        let out = super::diet(&diet);
        assert!(out.contains("Menu 1  (117 kcal"), "{out}");
        assert!(out.contains("Menu 2  (233 kcal"), "{out}");
        assert!(out.contains("    - Avena 30 g"), "{out}");
        assert!(!out.contains("Menu 3"), "empty menus are skipped: {out}");
    }

    #[test]
    fn empty_diet_says_so() {
        let diet = Diet {
            id: 2,
            client_id: None,
            name: "Base".into(),
            start_date: None,
            notes: None,
            active: false,
            is_template: true,
            meals: vec![],
        };
        let out = super::diet(&diet);
        assert!(out.contains("Status:      template"));
        assert!(out.contains("No meals yet."));
    }
}
