//! Plans: day-slot grouping, day copies, templates, resizing, and plan
//! definition files.

pub mod bucket;
pub mod copy;
pub mod parser;
pub mod resize;
pub mod service;
pub mod template;
pub mod toml_format;

pub use bucket::{DIET_MENU_SLOTS, DayBucketMap, DaySlotted, diet_buckets, routine_buckets};
pub use copy::{CopyDayOutcome, CopyPreview, DayCopyable, MealDraft, copy_day, preview_day_copy};
pub use parser::{PlanParseError, parse_plan_toml};
pub use resize::{Orphans, ResizeOutcome, ResizePolicy, find_orphans, resize_routine};
pub use service::{BuildReport, LoadedPlan, build_plan, load_plan};
pub use template::{
    InstantiationReport, copy_routine_to_client, instantiate_diet_template,
    instantiate_routine_template, save_diet_as_template, save_routine_as_template,
};
pub use toml_format::{ExerciseToml, FoodToml, MealToml, NutrientsToml, PlanFile, PlanMeta};
