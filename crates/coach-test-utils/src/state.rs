//! In-memory backend state and the domain rules the real backend enforces.

use std::collections::BTreeMap;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{Datelike, NaiveDateTime, Utc};

use coach_api::models::{
    Client, ClientDashboard, ClientSummary, ClientUpdate, Coach, CoachDashboard, CopyDayRequest,
    CopyDayResponse, Diet, Exercise, Food, Id, Injury, InjuryUpdate, Meal, MealFood, MealUpdate,
    NewClient, NewDiet, NewExercise, NewFood, NewInjury, NewMeal, NewMealFood, NewPersonalRecord,
    NewRoutine, NewRoutineEntry, NewWeightEntry, Notification, NotificationKind, PersonalRecord,
    RecentClient, Routine, RoutineEntry, RoutineEntryUpdate, RoutineUpdate, WeightEntry,
    WeightPoint,
};

/// Error answered by the fake backend, rendered as `{"detail": ...}`.
#[derive(Debug)]
pub struct FakeError {
    pub status: StatusCode,
    pub detail: String,
}

impl FakeError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            detail: what.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: msg.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            detail: "Could not validate credentials".to_owned(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: msg.into(),
        }
    }
}

impl IntoResponse for FakeError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "detail": self.detail });
        (self.status, Json(body)).into_response()
    }
}

pub type FakeResult<T> = Result<T, FakeError>;

/// Fails the requests whose path contains `path_contains`, starting with the
/// `fail_from`-th matching request (1-based).
#[derive(Debug, Clone)]
pub struct FailRule {
    pub method: String,
    pub path_contains: String,
    pub fail_from: usize,
    pub seen: usize,
}

/// Everything the fake backend knows.
#[derive(Debug)]
pub struct FakeState {
    next_id: Id,
    pub token: String,
    pub coach: Coach,
    pub password: String,
    pub clients: BTreeMap<Id, Client>,
    /// Creation time of each client, for the coach dashboard.
    pub client_created_at: BTreeMap<Id, NaiveDateTime>,
    pub weights: Vec<WeightEntry>,
    pub records: Vec<PersonalRecord>,
    pub injuries: Vec<Injury>,
    pub exercises: Vec<Exercise>,
    pub foods: Vec<Food>,
    pub routines: BTreeMap<Id, Routine>,
    pub routine_templates: BTreeMap<Id, Routine>,
    pub diets: BTreeMap<Id, Diet>,
    pub diet_templates: BTreeMap<Id, Diet>,
    pub notifications: Vec<Notification>,
    /// `METHOD path` of every request received, in arrival order.
    pub requests: Vec<String>,
    pub fail_rules: Vec<FailRule>,
    /// Answer copy and template mutations with the new row only, without
    /// its entries or meals, the way the production backend does.
    pub bare_copy_rows: bool,
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

impl FakeState {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            next_id: 1,
            token: token.into(),
            coach: Coach {
                id: 1,
                name: "Coach".to_owned(),
                email: "coach@example.com".to_owned(),
            },
            password: "Secret123".to_owned(),
            clients: BTreeMap::new(),
            client_created_at: BTreeMap::new(),
            weights: Vec::new(),
            records: Vec::new(),
            injuries: Vec::new(),
            exercises: Vec::new(),
            foods: Vec::new(),
            routines: BTreeMap::new(),
            routine_templates: BTreeMap::new(),
            diets: BTreeMap::new(),
            diet_templates: BTreeMap::new(),
            notifications: Vec::new(),
            requests: Vec::new(),
            fail_rules: Vec::new(),
            bare_copy_rows: false,
        }
    }

    pub fn next_id(&mut self) -> Id {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Record a request and decide whether an injected failure applies.
    pub fn record_request(&mut self, method: &str, path: &str) -> bool {
        self.requests.push(format!("{method} {path}"));
        let mut fail = false;
        for rule in &mut self.fail_rules {
            if rule.method == method && path.contains(&rule.path_contains) {
                rule.seen += 1;
                if rule.seen >= rule.fail_from {
                    fail = true;
                }
            }
        }
        fail
    }

    // -------------------------------------------------------------------
    // Clients
    // -------------------------------------------------------------------

    pub fn client(&self, id: Id) -> FakeResult<&Client> {
        self.clients
            .get(&id)
            .ok_or_else(|| FakeError::not_found("Alumno not found"))
    }

    pub fn create_client(&mut self, new: NewClient) -> Client {
        let id = self.next_id();
        let client = Client {
            id,
            name: new.name,
            email: new.email,
            birth_date: Some(new.birth_date),
            height: Some(new.height),
            goal: Some(new.goal),
            billing_date: new.billing_date,
            notifications_enabled: true,
        };
        self.clients.insert(id, client.clone());
        self.client_created_at.insert(id, now());
        client
    }

    pub fn update_client(&mut self, id: Id, update: ClientUpdate) -> FakeResult<Client> {
        let client = self
            .clients
            .get_mut(&id)
            .ok_or_else(|| FakeError::not_found("Alumno not found"))?;
        if let Some(v) = update.name {
            client.name = v;
        }
        if let Some(v) = update.email {
            client.email = v;
        }
        if let Some(v) = update.birth_date {
            client.birth_date = Some(v);
        }
        if let Some(v) = update.height {
            client.height = Some(v);
        }
        if let Some(v) = update.goal {
            client.goal = Some(v);
        }
        if let Some(v) = update.billing_date {
            client.billing_date = Some(v);
        }
        if let Some(v) = update.notifications_enabled {
            client.notifications_enabled = v;
        }
        Ok(client.clone())
    }

    /// Delete a client and cascade to everything it owns.
    pub fn delete_client(&mut self, id: Id) -> FakeResult<()> {
        self.clients
            .remove(&id)
            .ok_or_else(|| FakeError::not_found("Alumno not found"))?;
        self.routines.retain(|_, r| r.client_id != Some(id));
        self.diets.retain(|_, d| d.client_id != Some(id));
        self.weights.retain(|w| w.client_id != id);
        self.records.retain(|r| r.client_id != id);
        self.injuries.retain(|i| i.client_id != id);
        self.client_created_at.remove(&id);
        Ok(())
    }

    /// Totals plus the five newest clients. Ids are handed out in creation
    /// order, so they break ties between equal timestamps.
    pub fn coach_dashboard(&self) -> CoachDashboard {
        let mut recent: Vec<&Client> = self.clients.values().collect();
        recent.sort_by_key(|c| std::cmp::Reverse((self.client_created_at.get(&c.id), c.id)));
        CoachDashboard {
            total_clients: self.clients.len() as u64,
            active_routines: self
                .routines
                .values()
                .filter(|r| r.active && r.client_id.is_some_and(|id| self.clients.contains_key(&id)))
                .count() as u64,
            recent_clients: recent
                .into_iter()
                .take(5)
                .map(|c| RecentClient {
                    id: c.id,
                    name: c.name.clone(),
                    email: c.email.clone(),
                    created_at: self.client_created_at.get(&c.id).copied(),
                })
                .collect(),
        }
    }

    pub fn dashboard(&self, id: Id) -> FakeResult<ClientDashboard> {
        let client = self.client(id)?;
        let mut history: Vec<&WeightEntry> =
            self.weights.iter().filter(|w| w.client_id == id).collect();
        history.sort_by_key(|w| w.date);
        let today = now().date();
        let age = client.birth_date.map(|b| {
            let b = b.date();
            let before_birthday = (today.month(), today.day()) < (b.month(), b.day());
            today.year() - b.year() - i32::from(before_birthday)
        });
        Ok(ClientDashboard {
            client: ClientSummary {
                id,
                name: client.name.clone(),
                email: client.email.clone(),
                age,
                height: client.height,
                goal: client.goal.clone(),
                current_weight: history.last().map(|w| w.weight),
                billing_date: client.billing_date,
            },
            weight_history: history
                .iter()
                .map(|w| WeightPoint {
                    date: w.date,
                    weight: w.weight,
                })
                .collect(),
            routines: self
                .routines
                .values()
                .filter(|r| r.client_id == Some(id))
                .map(|r| self.hydrate_routine(r.clone()))
                .collect(),
        })
    }

    // -------------------------------------------------------------------
    // Progress
    // -------------------------------------------------------------------

    pub fn add_weight(&mut self, client_id: Id, new: NewWeightEntry) -> FakeResult<WeightEntry> {
        self.client(client_id)?;
        let entry = WeightEntry {
            id: self.next_id(),
            client_id,
            weight: new.weight,
            date: new.date.unwrap_or_else(now),
        };
        self.weights.push(entry.clone());
        Ok(entry)
    }

    pub fn update_weight(&mut self, id: Id, new: NewWeightEntry) -> FakeResult<WeightEntry> {
        let entry = self
            .weights
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| FakeError::not_found("Peso not found"))?;
        entry.weight = new.weight;
        if let Some(date) = new.date {
            entry.date = date;
        }
        Ok(entry.clone())
    }

    pub fn delete_weight(&mut self, id: Id) -> FakeResult<()> {
        let before = self.weights.len();
        self.weights.retain(|w| w.id != id);
        if self.weights.len() == before {
            return Err(FakeError::not_found("Peso not found"));
        }
        Ok(())
    }

    pub fn add_record(&mut self, client_id: Id, new: NewPersonalRecord) -> FakeResult<PersonalRecord> {
        self.client(client_id)?;
        let record = PersonalRecord {
            id: self.next_id(),
            client_id,
            exercise: new.exercise,
            weight: new.weight,
            reps: new.reps,
            date: new.date.unwrap_or_else(now),
        };
        self.records.push(record.clone());
        Ok(record)
    }

    pub fn delete_record(&mut self, id: Id) -> FakeResult<()> {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        if self.records.len() == before {
            return Err(FakeError::not_found("Personal record not found"));
        }
        Ok(())
    }

    pub fn create_injury(&mut self, client_id: Id, new: NewInjury) -> FakeResult<Injury> {
        self.client(client_id)?;
        let injury = Injury {
            id: self.next_id(),
            client_id,
            name: new.name,
            description: new.description,
            chronic: new.chronic,
            start_date: new.start_date,
            end_date: new.end_date,
            active: true,
        };
        self.injuries.push(injury.clone());
        Ok(injury)
    }

    pub fn update_injury(&mut self, id: Id, update: InjuryUpdate) -> FakeResult<Injury> {
        let injury = self
            .injuries
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| FakeError::not_found("Lesion not found"))?;
        if let Some(v) = update.name {
            injury.name = v;
        }
        if let Some(v) = update.description {
            injury.description = Some(v);
        }
        if let Some(v) = update.chronic {
            injury.chronic = v;
        }
        if let Some(v) = update.end_date {
            injury.end_date = Some(v);
        }
        if let Some(v) = update.active {
            injury.active = v;
        }
        Ok(injury.clone())
    }

    pub fn delete_injury(&mut self, id: Id) -> FakeResult<()> {
        let before = self.injuries.len();
        self.injuries.retain(|i| i.id != id);
        if self.injuries.len() == before {
            return Err(FakeError::not_found("Lesion not found"));
        }
        Ok(())
    }

    // -------------------------------------------------------------------
    // Catalogs
    // -------------------------------------------------------------------

    pub fn search_exercises(&self, term: &str) -> Vec<Exercise> {
        let needle = term.to_lowercase();
        self.exercises
            .iter()
            .filter(|e| e.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    pub fn create_exercise(&mut self, new: NewExercise) -> FakeResult<Exercise> {
        if self
            .exercises
            .iter()
            .any(|e| e.name.eq_ignore_ascii_case(&new.name))
        {
            return Err(FakeError::bad_request("Exercise already exists"));
        }
        let exercise = Exercise {
            id: self.next_id(),
            name: new.name,
            category: new.category,
        };
        self.exercises.push(exercise.clone());
        Ok(exercise)
    }

    pub fn search_foods(&self, term: &str) -> Vec<Food> {
        let needle = term.to_lowercase();
        self.foods
            .iter()
            .filter(|f| f.name.to_lowercase().contains(&needle))
            .take(20)
            .cloned()
            .collect()
    }

    /// Returns the existing food when the name is already cataloged.
    pub fn create_food(&mut self, new: NewFood) -> Food {
        if let Some(existing) = self
            .foods
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(&new.name))
        {
            return existing.clone();
        }
        let food = Food {
            id: self.next_id(),
            name: new.name,
            calories_per_100g: new.calories_per_100g,
            protein_per_100g: new.protein_per_100g,
            carbs_per_100g: new.carbs_per_100g,
            fat_per_100g: new.fat_per_100g,
        };
        self.foods.push(food.clone());
        food
    }

    // -------------------------------------------------------------------
    // Routines
    // -------------------------------------------------------------------

    /// Inline the catalog exercise into every entry.
    pub fn hydrate_routine(&self, mut routine: Routine) -> Routine {
        for entry in &mut routine.entries {
            entry.exercise = self
                .exercises
                .iter()
                .find(|e| e.id == entry.exercise_id)
                .cloned();
        }
        routine
    }

    pub fn routine(&self, id: Id) -> FakeResult<Routine> {
        self.routines
            .get(&id)
            .cloned()
            .map(|r| self.hydrate_routine(r))
            .ok_or_else(|| FakeError::not_found("Rutina not found"))
    }

    pub fn create_routine(&mut self, client_id: Id, new: NewRoutine) -> FakeResult<Routine> {
        self.client(client_id)?;
        let routine = Routine {
            id: self.next_id(),
            client_id: Some(client_id),
            name: new.name,
            start_date: Some(new.start_date.unwrap_or_else(now)),
            expiry_date: new.expiry_date,
            notes: new.notes,
            day_count: new.day_count.unwrap_or(3),
            active: true,
            is_template: false,
            entries: Vec::new(),
        };
        self.routines.insert(routine.id, routine.clone());
        Ok(routine)
    }

    pub fn update_routine(&mut self, id: Id, update: RoutineUpdate) -> FakeResult<Routine> {
        let routine = self
            .routines
            .get_mut(&id)
            .ok_or_else(|| FakeError::not_found("Rutina not found"))?;
        if let Some(v) = update.name {
            routine.name = v;
        }
        if let Some(v) = update.start_date {
            routine.start_date = Some(v);
        }
        if let Some(v) = update.expiry_date {
            routine.expiry_date = Some(v);
        }
        if let Some(v) = update.notes {
            routine.notes = Some(v);
        }
        if let Some(v) = update.day_count {
            routine.day_count = v;
        }
        if let Some(v) = update.active {
            routine.active = v;
        }
        self.routine(id)
    }

    pub fn delete_routine(&mut self, id: Id) -> FakeResult<()> {
        self.routines
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| FakeError::not_found("Rutina not found"))
    }

    fn entry_from(&mut self, routine_id: Option<Id>, new: NewRoutineEntry) -> RoutineEntry {
        RoutineEntry {
            id: self.next_id(),
            routine_id,
            exercise_id: new.exercise_id,
            day: new.day,
            sets: new.sets,
            reps: new.reps,
            weight: new.weight,
            rest_seconds: new.rest_seconds,
            notes: new.notes,
            exercise: None,
        }
    }

    pub fn add_entry(&mut self, routine_id: Id, new: NewRoutineEntry) -> FakeResult<RoutineEntry> {
        if !self.routines.contains_key(&routine_id) {
            return Err(FakeError::not_found("Rutina not found"));
        }
        let exercise = self
            .exercises
            .iter()
            .find(|e| e.id == new.exercise_id)
            .cloned()
            .ok_or_else(|| FakeError::not_found("Ejercicio base not found"))?;
        let entry = self.entry_from(Some(routine_id), new);
        if let Some(routine) = self.routines.get_mut(&routine_id) {
            routine.entries.push(entry.clone());
        }
        Ok(RoutineEntry {
            exercise: Some(exercise),
            ..entry
        })
    }

    pub fn update_entry(&mut self, id: Id, update: RoutineEntryUpdate) -> FakeResult<RoutineEntry> {
        let entry = self
            .routines
            .values_mut()
            .flat_map(|r| r.entries.iter_mut())
            .find(|e| e.id == id)
            .ok_or_else(|| FakeError::not_found("Ejercicio not found"))?;
        if let Some(v) = update.sets {
            entry.sets = v;
        }
        if let Some(v) = update.reps {
            entry.reps = v;
        }
        if let Some(v) = update.weight {
            entry.weight = Some(v);
        }
        if let Some(v) = update.rest_seconds {
            entry.rest_seconds = v;
        }
        if let Some(v) = update.notes {
            entry.notes = Some(v);
        }
        Ok(entry.clone())
    }

    pub fn delete_entry(&mut self, id: Id) -> FakeResult<()> {
        for routine in self.routines.values_mut() {
            let before = routine.entries.len();
            routine.entries.retain(|e| e.id != id);
            if routine.entries.len() != before {
                return Ok(());
            }
        }
        Err(FakeError::not_found("Ejercicio not found"))
    }

    fn check_copy_request(request: &CopyDayRequest) -> FakeResult<()> {
        if !(1..=7).contains(&request.source_day) || !(1..=7).contains(&request.target_day) {
            return Err(FakeError::bad_request("Day must be between 1 and 7"));
        }
        if request.source_day == request.target_day {
            return Err(FakeError::bad_request(
                "Source and target day cannot be the same",
            ));
        }
        Ok(())
    }

    pub fn copy_routine_day(&mut self, id: Id, request: CopyDayRequest) -> FakeResult<CopyDayResponse> {
        Self::check_copy_request(&request)?;
        let source: Vec<RoutineEntry> = self
            .routines
            .get(&id)
            .ok_or_else(|| FakeError::not_found("Rutina not found"))?
            .entries
            .iter()
            .filter(|e| e.day == request.source_day)
            .cloned()
            .collect();
        if source.is_empty() {
            return Err(FakeError::not_found(format!(
                "No exercises found for day {}",
                request.source_day
            )));
        }
        let mut copies = Vec::with_capacity(source.len());
        for entry in &source {
            let mut draft = NewRoutineEntry::from(entry);
            draft.day = request.target_day;
            copies.push(self.entry_from(Some(id), draft));
        }
        let routine = self
            .routines
            .get_mut(&id)
            .ok_or_else(|| FakeError::not_found("Rutina not found"))?;
        routine.entries.retain(|e| e.day != request.target_day);
        routine.entries.extend(copies);
        Ok(CopyDayResponse {
            message: format!(
                "Copied {} exercises from day {} to day {}",
                source.len(),
                request.source_day,
                request.target_day
            ),
            copied: source.len(),
        })
    }

    /// Deep-copy `source` into a fresh routine owned by `client_id`, retiring
    /// the client's currently active routine.
    fn clone_routine_for(&mut self, source: &Routine, client_id: Id, name: String) -> Routine {
        for routine in self.routines.values_mut() {
            if routine.client_id == Some(client_id) && routine.active {
                routine.active = false;
            }
        }
        let id = self.next_id();
        let entries: Vec<RoutineEntry> = source
            .entries
            .iter()
            .map(|e| self.entry_from(Some(id), NewRoutineEntry::from(e)))
            .collect();
        let routine = Routine {
            id,
            client_id: Some(client_id),
            name,
            start_date: Some(now()),
            expiry_date: None,
            notes: source.notes.clone(),
            day_count: source.day_count,
            active: true,
            is_template: false,
            entries,
        };
        self.routines.insert(id, routine.clone());
        self.hydrate_routine(routine)
    }

    pub fn copy_routine_to_client(&mut self, id: Id, client_id: Id) -> FakeResult<Routine> {
        let source = self.routine(id)?;
        self.client(client_id)
            .map_err(|_| FakeError::not_found("Target alumno not found"))?;
        Ok(self.clone_routine_for(&source, client_id, source.name.clone()))
    }

    pub fn save_routine_as_template(&mut self, id: Id) -> FakeResult<Routine> {
        let source = self.routine(id)?;
        let template_id = self.next_id();
        let entries: Vec<RoutineEntry> = source
            .entries
            .iter()
            .map(|e| self.entry_from(None, NewRoutineEntry::from(e)))
            .collect();
        let template = Routine {
            id: template_id,
            client_id: None,
            name: format!("{} (Plantilla)", source.name),
            start_date: None,
            expiry_date: None,
            notes: source.notes.clone(),
            day_count: source.day_count,
            active: true,
            is_template: true,
            entries,
        };
        self.routine_templates.insert(template_id, template.clone());
        Ok(self.hydrate_routine(template))
    }

    pub fn create_routine_template(&mut self, new: NewRoutine) -> Routine {
        let template = Routine {
            id: self.next_id(),
            client_id: None,
            name: new.name,
            start_date: None,
            expiry_date: None,
            notes: new.notes,
            day_count: new.day_count.unwrap_or(3),
            active: true,
            is_template: true,
            entries: Vec::new(),
        };
        self.routine_templates.insert(template.id, template.clone());
        template
    }

    pub fn instantiate_routine_template(&mut self, template_id: Id, client_id: Id) -> FakeResult<Routine> {
        let template = self
            .routine_templates
            .get(&template_id)
            .cloned()
            .ok_or_else(|| FakeError::not_found("Plantilla not found"))?;
        self.client(client_id)?;
        let name = template.name.replace(" (Plantilla)", "");
        Ok(self.clone_routine_for(&template, client_id, name))
    }

    /// Shape a freshly copied routine the way the mutation answers it.
    pub fn copy_row_routine(&self, mut routine: Routine) -> Routine {
        if self.bare_copy_rows {
            routine.entries.clear();
        }
        routine
    }

    pub fn routine_templates(&self) -> Vec<Routine> {
        self.routine_templates
            .values()
            .map(|t| self.hydrate_routine(t.clone()))
            .collect()
    }

    // -------------------------------------------------------------------
    // Diets
    // -------------------------------------------------------------------

    /// Inline the catalog food into every meal entry.
    pub fn hydrate_diet(&self, mut diet: Diet) -> Diet {
        for meal in &mut diet.meals {
            meal.foods.iter_mut().for_each(|mf| {
                mf.food = self.foods.iter().find(|f| f.id == mf.food_id).cloned();
            });
        }
        diet.meals.sort_by_key(|m| (m.day, m.order));
        diet
    }

    pub fn diet(&self, id: Id) -> FakeResult<Diet> {
        self.diets
            .get(&id)
            .cloned()
            .map(|d| self.hydrate_diet(d))
            .ok_or_else(|| FakeError::not_found("Dieta not found"))
    }

    pub fn create_diet(&mut self, client_id: Id, new: NewDiet) -> FakeResult<Diet> {
        self.client(client_id)?;
        let diet = Diet {
            id: self.next_id(),
            client_id: Some(client_id),
            name: new.name,
            start_date: Some(new.start_date.unwrap_or_else(now)),
            notes: new.notes,
            active: true,
            is_template: false,
            meals: Vec::new(),
        };
        self.diets.insert(diet.id, diet.clone());
        Ok(diet)
    }

    pub fn delete_diet(&mut self, id: Id) -> FakeResult<()> {
        self.diets
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| FakeError::not_found("Dieta not found"))
    }

    pub fn add_meal(&mut self, diet_id: Id, new: NewMeal) -> FakeResult<Meal> {
        if !self.diets.contains_key(&diet_id) {
            return Err(FakeError::not_found("Dieta not found"));
        }
        let meal = Meal {
            id: self.next_id(),
            diet_id: Some(diet_id),
            day: new.day,
            name: new.name,
            order: new.order,
            foods: Vec::new(),
        };
        if let Some(diet) = self.diets.get_mut(&diet_id) {
            diet.meals.push(meal.clone());
        }
        Ok(meal)
    }

    fn meal_mut(&mut self, meal_id: Id) -> FakeResult<&mut Meal> {
        self.diets
            .values_mut()
            .flat_map(|d| d.meals.iter_mut())
            .find(|m| m.id == meal_id)
            .ok_or_else(|| FakeError::not_found("Comida not found"))
    }

    pub fn update_meal(&mut self, meal_id: Id, update: MealUpdate) -> FakeResult<Meal> {
        let meal = self.meal_mut(meal_id)?;
        if let Some(v) = update.name {
            meal.name = v;
        }
        if let Some(v) = update.order {
            meal.order = v;
        }
        if let Some(v) = update.day {
            meal.day = v;
        }
        Ok(meal.clone())
    }

    pub fn delete_meal(&mut self, meal_id: Id) -> FakeResult<()> {
        for diet in self.diets.values_mut() {
            let before = diet.meals.len();
            diet.meals.retain(|m| m.id != meal_id);
            if diet.meals.len() != before {
                return Ok(());
            }
        }
        Err(FakeError::not_found("Comida not found"))
    }

    pub fn add_meal_food(&mut self, meal_id: Id, new: NewMealFood) -> FakeResult<MealFood> {
        let food = self
            .foods
            .iter()
            .find(|f| f.id == new.food_id)
            .cloned()
            .ok_or_else(|| FakeError::not_found("Alimento not found"))?;
        let id = self.next_id();
        let meal = self.meal_mut(meal_id)?;
        let entry = MealFood {
            id,
            meal_id: Some(meal_id),
            food_id: new.food_id,
            grams: new.grams,
            food: None,
        };
        meal.foods.push(entry.clone());
        Ok(MealFood {
            food: Some(food),
            ..entry
        })
    }

    pub fn delete_meal_food(&mut self, id: Id) -> FakeResult<()> {
        for meal in self.diets.values_mut().flat_map(|d| d.meals.iter_mut()) {
            let before = meal.foods.len();
            meal.foods.retain(|f| f.id != id);
            if meal.foods.len() != before {
                return Ok(());
            }
        }
        Err(FakeError::not_found("Comida alimento not found"))
    }

    /// Duplicate a meal (and its foods) with fresh ids.
    fn clone_meal(&mut self, meal: &Meal, diet_id: Option<Id>, day: i32) -> Meal {
        let id = self.next_id();
        let foods = meal
            .foods
            .iter()
            .map(|f| MealFood {
                id: self.next_id(),
                meal_id: Some(id),
                food_id: f.food_id,
                grams: f.grams,
                food: None,
            })
            .collect();
        Meal {
            id,
            diet_id,
            day,
            name: meal.name.clone(),
            order: meal.order,
            foods,
        }
    }

    pub fn copy_diet_day(&mut self, id: Id, request: CopyDayRequest) -> FakeResult<CopyDayResponse> {
        Self::check_copy_request(&request)?;
        let source: Vec<Meal> = self
            .diets
            .get(&id)
            .ok_or_else(|| FakeError::not_found("Dieta not found"))?
            .meals
            .iter()
            .filter(|m| m.day == request.source_day)
            .cloned()
            .collect();
        if source.is_empty() {
            return Err(FakeError::not_found(format!(
                "No meals found for menu {}",
                request.source_day
            )));
        }
        let copies: Vec<Meal> = source
            .iter()
            .map(|m| self.clone_meal(m, Some(id), request.target_day))
            .collect();
        let diet = self
            .diets
            .get_mut(&id)
            .ok_or_else(|| FakeError::not_found("Dieta not found"))?;
        diet.meals.retain(|m| m.day != request.target_day);
        diet.meals.extend(copies);
        Ok(CopyDayResponse {
            message: format!(
                "Copied {} meals from menu {} to menu {}",
                source.len(),
                request.source_day,
                request.target_day
            ),
            copied: source.len(),
        })
    }

    pub fn save_diet_as_template(&mut self, id: Id) -> FakeResult<Diet> {
        let source = self.diet(id)?;
        let template_id = self.next_id();
        let meals = source
            .meals
            .iter()
            .map(|m| self.clone_meal(m, None, m.day))
            .collect();
        let template = Diet {
            id: template_id,
            client_id: None,
            name: format!("{} (Plantilla)", source.name),
            start_date: None,
            notes: source.notes.clone(),
            active: true,
            is_template: true,
            meals,
        };
        self.diet_templates.insert(template_id, template.clone());
        Ok(self.hydrate_diet(template))
    }

    pub fn instantiate_diet_template(&mut self, template_id: Id, client_id: Id) -> FakeResult<Diet> {
        let template = self
            .diet_templates
            .get(&template_id)
            .cloned()
            .ok_or_else(|| FakeError::not_found("Plantilla not found"))?;
        self.client(client_id)?;
        for diet in self.diets.values_mut() {
            if diet.client_id == Some(client_id) && diet.active {
                diet.active = false;
            }
        }
        let id = self.next_id();
        let meals = template
            .meals
            .iter()
            .map(|m| self.clone_meal(m, Some(id), m.day))
            .collect();
        let diet = Diet {
            id,
            client_id: Some(client_id),
            name: template.name.replace(" (Plantilla)", ""),
            start_date: Some(now()),
            notes: template.notes.clone(),
            active: true,
            is_template: false,
            meals,
        };
        self.diets.insert(id, diet.clone());
        Ok(self.hydrate_diet(diet))
    }

    pub fn copy_row_diet(&self, mut diet: Diet) -> Diet {
        if self.bare_copy_rows {
            diet.meals.clear();
        }
        diet
    }

    pub fn diet_templates(&self) -> Vec<Diet> {
        self.diet_templates
            .values()
            .map(|t| self.hydrate_diet(t.clone()))
            .collect()
    }

    // -------------------------------------------------------------------
    // Notifications
    // -------------------------------------------------------------------

    pub fn push_notification(
        &mut self,
        kind: NotificationKind,
        title: &str,
        message: &str,
        client_id: Option<Id>,
    ) -> Notification {
        let notification = Notification {
            id: self.next_id(),
            client_id,
            kind,
            title: title.to_owned(),
            message: message.to_owned(),
            read: false,
            created_at: now(),
        };
        self.notifications.push(notification.clone());
        notification
    }

    pub fn notifications_newest_first(&self) -> Vec<Notification> {
        let mut list = self.notifications.clone();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        list
    }
}
