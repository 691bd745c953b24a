//! Wire types for the coaching backend.
//!
//! Field names on the wire follow the backend (Spanish); Rust fields use
//! English names with `serde` renames. Response types tolerate missing
//! optional fields; request types skip unset fields so PATCH bodies only
//! carry what changed.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Backend primary key.
pub type Id = i64;

fn default_true() -> bool {
    true
}

fn default_day() -> i32 {
    1
}

fn default_day_count() -> i32 {
    3
}

// ---------------------------------------------------------------------------
// Plan kind
// ---------------------------------------------------------------------------

/// The two plan families. Both are organized in numbered day-slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanKind {
    Routine,
    Diet,
}

impl PlanKind {
    /// Backend collection path segment for this kind.
    pub fn collection(self) -> &'static str {
        match self {
            Self::Routine => "rutinas",
            Self::Diet => "dietas",
        }
    }

    /// Name of a single day-slot as shown to coaches.
    pub fn slot_label(self) -> &'static str {
        match self {
            Self::Routine => "Day",
            Self::Diet => "Menu",
        }
    }
}

impl fmt::Display for PlanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Routine => "routine",
            Self::Diet => "diet",
        };
        f.write_str(s)
    }
}

impl FromStr for PlanKind {
    type Err = PlanKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "routine" | "rutina" => Ok(Self::Routine),
            "diet" | "dieta" => Ok(Self::Diet),
            other => Err(PlanKindParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`PlanKind`] string.
#[derive(Debug, Clone)]
pub struct PlanKindParseError(pub String);

impl fmt::Display for PlanKindParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid plan kind: {:?} (expected routine or diet)", self.0)
    }
}

impl std::error::Error for PlanKindParseError {}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coach {
    pub id: Id,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coach: Option<Coach>,
}

/// Generic `{"message": ...}` acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

// ---------------------------------------------------------------------------
// Clients
// ---------------------------------------------------------------------------

/// A coached client ("alumno").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: Id,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "fecha_nacimiento", default)]
    pub birth_date: Option<NaiveDateTime>,
    /// Height in metres.
    #[serde(rename = "altura", default)]
    pub height: Option<f64>,
    #[serde(rename = "objetivo", default)]
    pub goal: Option<String>,
    #[serde(rename = "fecha_cobro", default)]
    pub billing_date: Option<NaiveDateTime>,
    #[serde(rename = "notificaciones_activas", default = "default_true")]
    pub notifications_enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewClient {
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "fecha_nacimiento")]
    pub birth_date: NaiveDateTime,
    #[serde(rename = "altura")]
    pub height: f64,
    #[serde(rename = "objetivo")]
    pub goal: String,
    #[serde(rename = "fecha_cobro", default, skip_serializing_if = "Option::is_none")]
    pub billing_date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClientUpdate {
    #[serde(rename = "nombre", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "fecha_nacimiento", default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDateTime>,
    #[serde(rename = "altura", default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(rename = "objetivo", default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(rename = "fecha_cobro", default, skip_serializing_if = "Option::is_none")]
    pub billing_date: Option<NaiveDateTime>,
    #[serde(rename = "notificaciones_activas", default, skip_serializing_if = "Option::is_none")]
    pub notifications_enabled: Option<bool>,
}

impl ClientUpdate {
    /// True when no field is set (the PATCH would be a no-op).
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Client summary embedded in [`ClientDashboard`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientSummary {
    pub id: Id,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "edad", default)]
    pub age: Option<i32>,
    #[serde(rename = "altura", default)]
    pub height: Option<f64>,
    #[serde(rename = "objetivo", default)]
    pub goal: Option<String>,
    #[serde(rename = "peso_actual", default)]
    pub current_weight: Option<f64>,
    #[serde(rename = "fecha_cobro", default)]
    pub billing_date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeightPoint {
    #[serde(rename = "fecha")]
    pub date: NaiveDateTime,
    #[serde(rename = "peso")]
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientDashboard {
    #[serde(rename = "alumno")]
    pub client: ClientSummary,
    #[serde(rename = "historico_pesos", default)]
    pub weight_history: Vec<WeightPoint>,
    #[serde(rename = "rutinas", default)]
    pub routines: Vec<Routine>,
}

/// Client listed under "recent" on the coach dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecentClient {
    pub id: Id,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "creado_en", default)]
    pub created_at: Option<NaiveDateTime>,
}

/// Coach-wide overview: client count, active routines and the newest
/// clients (at most five, newest first).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoachDashboard {
    #[serde(rename = "total_alumnos")]
    pub total_clients: u64,
    #[serde(rename = "total_rutinas")]
    pub active_routines: u64,
    #[serde(rename = "ultimos_alumnos", default)]
    pub recent_clients: Vec<RecentClient>,
}

// ---------------------------------------------------------------------------
// Progress history
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeightEntry {
    pub id: Id,
    #[serde(rename = "alumno_id")]
    pub client_id: Id,
    #[serde(rename = "peso")]
    pub weight: f64,
    #[serde(rename = "fecha")]
    pub date: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewWeightEntry {
    #[serde(rename = "peso")]
    pub weight: f64,
    #[serde(rename = "fecha", default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonalRecord {
    pub id: Id,
    #[serde(rename = "alumno_id")]
    pub client_id: Id,
    #[serde(rename = "ejercicio")]
    pub exercise: String,
    #[serde(rename = "peso")]
    pub weight: f64,
    #[serde(rename = "repeticiones")]
    pub reps: i32,
    #[serde(rename = "fecha")]
    pub date: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPersonalRecord {
    #[serde(rename = "ejercicio")]
    pub exercise: String,
    #[serde(rename = "peso")]
    pub weight: f64,
    #[serde(rename = "repeticiones")]
    pub reps: i32,
    #[serde(rename = "fecha", default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Injury {
    pub id: Id,
    #[serde(rename = "alumno_id")]
    pub client_id: Id,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "es_cronica", default)]
    pub chronic: bool,
    #[serde(rename = "fecha_inicio", default)]
    pub start_date: Option<NaiveDateTime>,
    #[serde(rename = "fecha_fin", default)]
    pub end_date: Option<NaiveDateTime>,
    #[serde(rename = "activa", default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewInjury {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "es_cronica", default)]
    pub chronic: bool,
    #[serde(rename = "fecha_inicio", default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDateTime>,
    #[serde(rename = "fecha_fin", default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InjuryUpdate {
    #[serde(rename = "nombre", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "es_cronica", default, skip_serializing_if = "Option::is_none")]
    pub chronic: Option<bool>,
    #[serde(rename = "fecha_fin", default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDateTime>,
    #[serde(rename = "activa", default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

// ---------------------------------------------------------------------------
// Catalogs
// ---------------------------------------------------------------------------

/// Exercise catalog item ("ejercicio base").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub id: Id,
    #[serde(rename = "nombre")]
    pub name: String,
    /// Muscle group.
    #[serde(rename = "categoria", default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewExercise {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "categoria", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Food catalog item ("alimento"). Nutrients are per 100 g.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Food {
    pub id: Id,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "calorias_100g", default)]
    pub calories_per_100g: f64,
    #[serde(rename = "proteinas_100g", default)]
    pub protein_per_100g: f64,
    #[serde(rename = "carbohidratos_100g", default)]
    pub carbs_per_100g: f64,
    #[serde(rename = "grasas_100g", default)]
    pub fat_per_100g: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewFood {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "calorias_100g")]
    pub calories_per_100g: f64,
    #[serde(rename = "proteinas_100g")]
    pub protein_per_100g: f64,
    #[serde(rename = "carbohidratos_100g")]
    pub carbs_per_100g: f64,
    #[serde(rename = "grasas_100g")]
    pub fat_per_100g: f64,
}

// ---------------------------------------------------------------------------
// Routines
// ---------------------------------------------------------------------------

/// A workout routine, or a routine template when `is_template` is set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Routine {
    pub id: Id,
    #[serde(rename = "alumno_id", default)]
    pub client_id: Option<Id>,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "fecha_inicio", default)]
    pub start_date: Option<NaiveDateTime>,
    #[serde(rename = "fecha_vencimiento", default)]
    pub expiry_date: Option<NaiveDateTime>,
    #[serde(rename = "notas", default)]
    pub notes: Option<String>,
    /// Training days per week; entries use day-slots `1..=day_count`.
    #[serde(rename = "entrenamientos_semana", default = "default_day_count")]
    pub day_count: i32,
    #[serde(rename = "activa", default = "default_true")]
    pub active: bool,
    #[serde(rename = "es_plantilla", default)]
    pub is_template: bool,
    #[serde(rename = "ejercicios", default)]
    pub entries: Vec<RoutineEntry>,
}

/// One exercise assigned to a day-slot of a routine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutineEntry {
    pub id: Id,
    #[serde(rename = "rutina_id", default)]
    pub routine_id: Option<Id>,
    #[serde(rename = "ejercicio_base_id")]
    pub exercise_id: Id,
    #[serde(rename = "dia", default = "default_day")]
    pub day: i32,
    #[serde(rename = "series")]
    pub sets: i32,
    #[serde(rename = "repeticiones")]
    pub reps: i32,
    /// Load in kg; `None` for bodyweight work.
    #[serde(rename = "peso", default)]
    pub weight: Option<f64>,
    #[serde(rename = "descanso")]
    pub rest_seconds: i32,
    #[serde(rename = "notas", default)]
    pub notes: Option<String>,
    #[serde(rename = "ejercicio_base", default, skip_serializing_if = "Option::is_none")]
    pub exercise: Option<Exercise>,
}

impl RoutineEntry {
    /// Display name of the referenced exercise, falling back to its id.
    pub fn exercise_name(&self) -> String {
        match &self.exercise {
            Some(e) => e.name.clone(),
            None => format!("exercise #{}", self.exercise_id),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewRoutine {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "fecha_inicio", default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDateTime>,
    #[serde(rename = "fecha_vencimiento", default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDateTime>,
    #[serde(rename = "notas", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "entrenamientos_semana", default, skip_serializing_if = "Option::is_none")]
    pub day_count: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RoutineUpdate {
    #[serde(rename = "nombre", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "fecha_inicio", default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDateTime>,
    #[serde(rename = "fecha_vencimiento", default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDateTime>,
    #[serde(rename = "notas", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "entrenamientos_semana", default, skip_serializing_if = "Option::is_none")]
    pub day_count: Option<i32>,
    #[serde(rename = "activa", default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewRoutineEntry {
    #[serde(rename = "ejercicio_base_id")]
    pub exercise_id: Id,
    #[serde(rename = "dia")]
    pub day: i32,
    #[serde(rename = "series")]
    pub sets: i32,
    #[serde(rename = "repeticiones")]
    pub reps: i32,
    #[serde(rename = "peso", default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(rename = "descanso")]
    pub rest_seconds: i32,
    #[serde(rename = "notas", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<&RoutineEntry> for NewRoutineEntry {
    fn from(entry: &RoutineEntry) -> Self {
        Self {
            exercise_id: entry.exercise_id,
            day: entry.day,
            sets: entry.sets,
            reps: entry.reps,
            weight: entry.weight,
            rest_seconds: entry.rest_seconds,
            notes: entry.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RoutineEntryUpdate {
    #[serde(rename = "series", default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<i32>,
    #[serde(rename = "repeticiones", default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<i32>,
    #[serde(rename = "peso", default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(rename = "descanso", default, skip_serializing_if = "Option::is_none")]
    pub rest_seconds: Option<i32>,
    #[serde(rename = "notas", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Diets
// ---------------------------------------------------------------------------

/// A diet plan, or a diet template when `is_template` is set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Diet {
    pub id: Id,
    #[serde(rename = "alumno_id", default)]
    pub client_id: Option<Id>,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "fecha_inicio", default)]
    pub start_date: Option<NaiveDateTime>,
    #[serde(rename = "notas", default)]
    pub notes: Option<String>,
    #[serde(rename = "activa", default = "default_true")]
    pub active: bool,
    #[serde(rename = "es_plantilla", default)]
    pub is_template: bool,
    #[serde(rename = "comidas", default)]
    pub meals: Vec<Meal>,
}

/// A named meal inside one menu (day-slot) of a diet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Meal {
    pub id: Id,
    #[serde(rename = "dieta_id", default)]
    pub diet_id: Option<Id>,
    /// Menu number, `1..=7`.
    #[serde(rename = "dia", default = "default_day")]
    pub day: i32,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "orden", default)]
    pub order: i32,
    #[serde(rename = "alimentos", default)]
    pub foods: Vec<MealFood>,
}

/// A quantity of one catalog food inside a meal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealFood {
    pub id: Id,
    #[serde(rename = "comida_id", default)]
    pub meal_id: Option<Id>,
    #[serde(rename = "alimento_id")]
    pub food_id: Id,
    #[serde(rename = "cantidad_gramos")]
    pub grams: f64,
    #[serde(rename = "alimento", default, skip_serializing_if = "Option::is_none")]
    pub food: Option<Food>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewDiet {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "fecha_inicio", default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDateTime>,
    #[serde(rename = "notas", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewMeal {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "orden")]
    pub order: i32,
    #[serde(rename = "dia")]
    pub day: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MealUpdate {
    #[serde(rename = "nombre", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "orden", default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(rename = "dia", default, skip_serializing_if = "Option::is_none")]
    pub day: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewMealFood {
    #[serde(rename = "alimento_id")]
    pub food_id: Id,
    #[serde(rename = "cantidad_gramos")]
    pub grams: f64,
}

// ---------------------------------------------------------------------------
// Plan commands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CopyDayRequest {
    pub source_day: i32,
    pub target_day: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CopyDayResponse {
    pub message: String,
    #[serde(alias = "exercises_copied", alias = "meals_copied", default)]
    pub copied: usize,
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// Kind of a coach notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    #[serde(rename = "rutina_vencida")]
    RoutineExpired,
    #[serde(rename = "dieta_vencida")]
    DietExpired,
    #[serde(rename = "meet_seguimiento")]
    FollowUp,
    #[serde(rename = "recordatorio_pago")]
    PaymentReminder,
    #[serde(other)]
    Other,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::RoutineExpired => "routine_expired",
            Self::DietExpired => "diet_expired",
            Self::FollowUp => "follow_up",
            Self::PaymentReminder => "payment_reminder",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

impl FromStr for NotificationKind {
    type Err = NotificationKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "routine_expired" | "rutina_vencida" => Ok(Self::RoutineExpired),
            "diet_expired" | "dieta_vencida" => Ok(Self::DietExpired),
            "follow_up" | "meet_seguimiento" => Ok(Self::FollowUp),
            "payment_reminder" | "recordatorio_pago" => Ok(Self::PaymentReminder),
            "other" => Ok(Self::Other),
            other => Err(NotificationKindParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`NotificationKind`] string.
#[derive(Debug, Clone)]
pub struct NotificationKindParseError(pub String);

impl fmt::Display for NotificationKindParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid notification kind: {:?}", self.0)
    }
}

impl std::error::Error for NotificationKindParseError {}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: Id,
    #[serde(rename = "alumno_id", default)]
    pub client_id: Option<Id>,
    #[serde(rename = "tipo")]
    pub kind: NotificationKind,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "mensaje")]
    pub message: String,
    #[serde(rename = "leida", default)]
    pub read: bool,
    #[serde(rename = "creada_en")]
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnreadCount {
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn routine_decodes_backend_payload() {
        let payload = json!({
            "id": 7,
            "alumno_id": 3,
            "nombre": "Fuerza",
            "fecha_inicio": "2024-03-01T00:00:00",
            "notas": null,
            "entrenamientos_semana": 4,
            "activa": true,
            "ejercicios": [{
                "id": 11,
                "rutina_id": 7,
                "ejercicio_base_id": 2,
                "dia": 2,
                "series": 4,
                "repeticiones": 8,
                "peso": 60.0,
                "descanso": 90,
                "notas": null,
                "ejercicio_base": {"id": 2, "nombre": "Sentadilla", "categoria": "Piernas"}
            }]
        });
        let routine: Routine = serde_json::from_value(payload).unwrap();
        assert_eq!(routine.day_count, 4);
        assert!(!routine.is_template);
        assert_eq!(routine.entries.len(), 1);
        assert_eq!(routine.entries[0].day, 2);
        assert_eq!(routine.entries[0].exercise_name(), "Sentadilla");
    }

    #[test]
    fn routine_defaults_when_fields_missing() {
        let routine: Routine =
            serde_json::from_value(json!({"id": 1, "nombre": "Base"})).unwrap();
        assert_eq!(routine.day_count, 3);
        assert!(routine.active);
        assert!(routine.client_id.is_none());
        assert!(routine.entries.is_empty());
    }

    #[test]
    fn entry_without_day_defaults_to_first_day() {
        let entry: RoutineEntry = serde_json::from_value(json!({
            "id": 1, "ejercicio_base_id": 5, "series": 3, "repeticiones": 10, "descanso": 60
        }))
        .unwrap();
        assert_eq!(entry.day, 1);
        assert_eq!(entry.exercise_name(), "exercise #5");
    }

    #[test]
    fn update_serializes_only_set_fields() {
        let update = ClientUpdate {
            goal: Some("ganar masa".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value, json!({"objetivo": "ganar masa"}));
        assert!(!update.is_empty());
        assert!(ClientUpdate::default().is_empty());
    }

    #[test]
    fn copy_response_accepts_backend_aliases() {
        let resp: CopyDayResponse = serde_json::from_value(json!({
            "message": "Copied 2 exercises from day 1 to day 3",
            "exercises_copied": 2
        }))
        .unwrap();
        assert_eq!(resp.copied, 2);
    }

    #[test]
    fn plan_kind_parses_both_languages() {
        assert_eq!("routine".parse::<PlanKind>().unwrap(), PlanKind::Routine);
        assert_eq!("dieta".parse::<PlanKind>().unwrap(), PlanKind::Diet);
        assert_eq!(PlanKind::Diet.collection(), "dietas");
        assert!("menu".parse::<PlanKind>().is_err());
    }

    #[test]
    fn notification_kind_unknown_maps_to_other() {
        let n: Notification = serde_json::from_value(json!({
            "id": 1, "tipo": "algo_nuevo", "titulo": "t", "mensaje": "m",
            "leida": false, "creada_en": "2024-05-01T10:00:00"
        }))
        .unwrap();
        assert_eq!(n.kind, NotificationKind::Other);
    }

    #[test]
    fn notification_kind_display_roundtrip() {
        for kind in [
            NotificationKind::RoutineExpired,
            NotificationKind::DietExpired,
            NotificationKind::FollowUp,
            NotificationKind::PaymentReminder,
            NotificationKind::Other,
        ] {
            let parsed: NotificationKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
        assert!("bogus".parse::<NotificationKind>().is_err());
    }
}
