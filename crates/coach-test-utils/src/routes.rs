//! HTTP surface of the fake backend.

use axum::extract::{Path, Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use coach_api::models::{
    ClientUpdate, Coach, CopyDayRequest, Id, InjuryUpdate, MealUpdate, NewClient, NewDiet,
    NewExercise, NewFood, NewInjury, NewMeal, NewMealFood, NewPersonalRecord, NewRoutine,
    NewRoutineEntry, NewWeightEntry, RoutineEntryUpdate, RoutineUpdate, TokenResponse,
    UnreadCount,
};

use crate::Shared;
use crate::state::{FakeError, FakeResult};

pub fn build_router(shared: Shared) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/alumnos", get(list_clients).post(create_client))
        .route(
            "/alumnos/{id}",
            get(get_client).patch(update_client).delete(delete_client),
        )
        .route("/alumnos/{id}/dashboard", get(dashboard))
        .route("/dashboard/", get(coach_dashboard))
        .route("/alumnos/{id}/pesos", get(list_weights).post(add_weight))
        .route("/pesos/{id}", patch(update_weight).delete(delete_weight))
        .route(
            "/alumnos/{id}/personal-records",
            get(list_records).post(add_record),
        )
        .route(
            "/alumnos/personal-records/{id}",
            axum::routing::delete(delete_record),
        )
        .route(
            "/lesiones/alumno/{id}",
            get(list_injuries).post(create_injury),
        )
        .route("/lesiones/{id}", patch(update_injury).delete(delete_injury))
        .route("/ejercicios-base", get(list_exercises).post(create_exercise))
        .route("/ejercicios-base/search/{term}", get(search_exercises))
        .route("/alimentos", get(list_foods).post(create_food))
        .route("/alimentos/search/{term}", get(search_foods))
        .route("/alumnos/{id}/rutinas", get(list_routines).post(create_routine))
        .route(
            "/rutinas/{id}",
            get(get_routine).patch(update_routine).delete(delete_routine),
        )
        .route("/rutinas/{id}/ejercicios", post(add_entry))
        .route("/ejercicios/{id}", patch(update_entry).delete(delete_entry))
        .route("/rutinas/{id}/copy-day", post(copy_routine_day))
        .route("/rutinas/{id}/copy/{client_id}", post(copy_routine_to_client))
        .route("/rutinas/{id}/save-as-template", post(save_routine_template))
        .route("/rutinas/{id}/pdf", get(export_routine_pdf))
        .route("/rutinas/{id}/excel", get(export_routine_excel))
        .route(
            "/plantillas",
            get(list_routine_templates).post(create_routine_template),
        )
        .route(
            "/plantillas/{id}/create-rutina/{client_id}",
            post(instantiate_routine_template),
        )
        .route("/alumnos/{id}/dietas", get(list_diets).post(create_diet))
        .route("/dietas/{id}", get(get_diet).delete(delete_diet))
        .route("/dietas/{id}/comidas", post(add_meal))
        .route("/comidas/{id}", patch(update_meal).delete(delete_meal))
        .route("/comidas/{id}/alimentos", post(add_meal_food))
        .route("/comida-alimentos/{id}", axum::routing::delete(delete_meal_food))
        .route("/dietas/{id}/copy-day", post(copy_diet_day))
        .route("/dietas/{id}/save-as-template", post(save_diet_template))
        .route("/dietas/{id}/pdf", get(export_diet_pdf))
        .route("/dietas/{id}/excel", get(export_diet_excel))
        .route("/dietas-plantillas", get(list_diet_templates))
        .route(
            "/dietas-plantillas/{id}/create-dieta/{client_id}",
            post(instantiate_diet_template),
        )
        .route("/notifications/", get(list_notifications))
        .route("/notifications/unread-count", get(unread_count))
        .route("/notifications/{id}/read", patch(mark_read))
        .route(
            "/notifications/{id}",
            axum::routing::delete(delete_notification),
        )
        .layer(middleware::from_fn_with_state(shared.clone(), gatekeeper))
        .with_state(shared)
}

/// Records every request, applies injected failures and enforces the bearer
/// token everywhere except `/auth/*`.
async fn gatekeeper(State(shared): State<Shared>, req: Request, next: Next) -> Response {
    let method = req.method().as_str().to_owned();
    let path = req.uri().path().to_owned();
    let expected = {
        let mut state = crate::lock(&shared);
        if state.record_request(&method, &path) {
            return FakeError::internal("injected failure").into_response();
        }
        format!("Bearer {}", state.token)
    };

    if !path.starts_with("/auth/") {
        let presented = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        if presented != Some(expected.as_str()) {
            return FakeError::unauthorized().into_response();
        }
    }
    next.run(req).await
}

fn deleted(what: &str) -> Json<serde_json::Value> {
    Json(json!({ "message": format!("{what} deleted successfully") }))
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct Registration {
    nombre: String,
    email: String,
    password: String,
}

async fn login(
    State(shared): State<Shared>,
    Json(creds): Json<Credentials>,
) -> FakeResult<Json<TokenResponse>> {
    let state = crate::lock(&shared);
    if creds.email != state.coach.email || creds.password != state.password {
        return Err(FakeError {
            status: StatusCode::UNAUTHORIZED,
            detail: "Incorrect email or password".to_owned(),
        });
    }
    Ok(Json(TokenResponse {
        access_token: state.token.clone(),
        token_type: "bearer".to_owned(),
        coach: Some(state.coach.clone()),
    }))
}

async fn register(
    State(shared): State<Shared>,
    Json(reg): Json<Registration>,
) -> FakeResult<Json<serde_json::Value>> {
    let mut state = crate::lock(&shared);
    if reg.email == state.coach.email {
        return Err(FakeError::bad_request("Email already registered"));
    }
    let id = state.next_id();
    state.coach = Coach {
        id,
        name: reg.nombre,
        email: reg.email,
    };
    state.password = reg.password;
    Ok(Json(json!({ "message": "Coach registered successfully" })))
}

// ---------------------------------------------------------------------------
// Clients
// ---------------------------------------------------------------------------

async fn list_clients(State(shared): State<Shared>) -> impl IntoResponse {
    let state = crate::lock(&shared);
    Json(state.clients.values().cloned().collect::<Vec<_>>())
}

async fn create_client(
    State(shared): State<Shared>,
    Json(new): Json<NewClient>,
) -> impl IntoResponse {
    Json(crate::lock(&shared).create_client(new))
}

async fn get_client(State(shared): State<Shared>, Path(id): Path<Id>) -> FakeResult<Response> {
    let state = crate::lock(&shared);
    Ok(Json(state.client(id)?.clone()).into_response())
}

async fn update_client(
    State(shared): State<Shared>,
    Path(id): Path<Id>,
    Json(update): Json<ClientUpdate>,
) -> FakeResult<Response> {
    let client = crate::lock(&shared).update_client(id, update)?;
    Ok(Json(client).into_response())
}

async fn delete_client(State(shared): State<Shared>, Path(id): Path<Id>) -> FakeResult<Response> {
    crate::lock(&shared).delete_client(id)?;
    Ok(deleted("Alumno").into_response())
}

async fn dashboard(State(shared): State<Shared>, Path(id): Path<Id>) -> FakeResult<Response> {
    let dashboard = crate::lock(&shared).dashboard(id)?;
    Ok(Json(dashboard).into_response())
}

async fn coach_dashboard(State(shared): State<Shared>) -> impl IntoResponse {
    Json(crate::lock(&shared).coach_dashboard())
}

// ---------------------------------------------------------------------------
// Progress and injuries
// ---------------------------------------------------------------------------

async fn list_weights(State(shared): State<Shared>, Path(id): Path<Id>) -> FakeResult<Response> {
    let state = crate::lock(&shared);
    state.client(id)?;
    let mut list: Vec<_> = state
        .weights
        .iter()
        .filter(|w| w.client_id == id)
        .cloned()
        .collect();
    list.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(Json(list).into_response())
}

async fn add_weight(
    State(shared): State<Shared>,
    Path(id): Path<Id>,
    Json(new): Json<NewWeightEntry>,
) -> FakeResult<Response> {
    let entry = crate::lock(&shared).add_weight(id, new)?;
    Ok(Json(entry).into_response())
}

async fn update_weight(
    State(shared): State<Shared>,
    Path(id): Path<Id>,
    Json(new): Json<NewWeightEntry>,
) -> FakeResult<Response> {
    let entry = crate::lock(&shared).update_weight(id, new)?;
    Ok(Json(entry).into_response())
}

async fn delete_weight(State(shared): State<Shared>, Path(id): Path<Id>) -> FakeResult<Response> {
    crate::lock(&shared).delete_weight(id)?;
    Ok(deleted("Peso").into_response())
}

async fn list_records(State(shared): State<Shared>, Path(id): Path<Id>) -> FakeResult<Response> {
    let state = crate::lock(&shared);
    state.client(id)?;
    let mut list: Vec<_> = state
        .records
        .iter()
        .filter(|r| r.client_id == id)
        .cloned()
        .collect();
    list.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(Json(list).into_response())
}

async fn add_record(
    State(shared): State<Shared>,
    Path(id): Path<Id>,
    Json(new): Json<NewPersonalRecord>,
) -> FakeResult<Response> {
    let record = crate::lock(&shared).add_record(id, new)?;
    Ok(Json(record).into_response())
}

async fn delete_record(State(shared): State<Shared>, Path(id): Path<Id>) -> FakeResult<Response> {
    crate::lock(&shared).delete_record(id)?;
    Ok(deleted("Personal record").into_response())
}

async fn list_injuries(State(shared): State<Shared>, Path(id): Path<Id>) -> FakeResult<Response> {
    let state = crate::lock(&shared);
    state.client(id)?;
    let list: Vec<_> = state
        .injuries
        .iter()
        .filter(|i| i.client_id == id)
        .cloned()
        .collect();
    Ok(Json(list).into_response())
}

async fn create_injury(
    State(shared): State<Shared>,
    Path(id): Path<Id>,
    Json(new): Json<NewInjury>,
) -> FakeResult<Response> {
    let injury = crate::lock(&shared).create_injury(id, new)?;
    Ok(Json(injury).into_response())
}

async fn update_injury(
    State(shared): State<Shared>,
    Path(id): Path<Id>,
    Json(update): Json<InjuryUpdate>,
) -> FakeResult<Response> {
    let injury = crate::lock(&shared).update_injury(id, update)?;
    Ok(Json(injury).into_response())
}

async fn delete_injury(State(shared): State<Shared>, Path(id): Path<Id>) -> FakeResult<Response> {
    crate::lock(&shared).delete_injury(id)?;
    Ok(deleted("Lesion").into_response())
}

// ---------------------------------------------------------------------------
// Catalogs
// ---------------------------------------------------------------------------

async fn list_exercises(State(shared): State<Shared>) -> impl IntoResponse {
    Json(crate::lock(&shared).exercises.clone())
}

async fn search_exercises(
    State(shared): State<Shared>,
    Path(term): Path<String>,
) -> impl IntoResponse {
    Json(crate::lock(&shared).search_exercises(&term))
}

async fn create_exercise(
    State(shared): State<Shared>,
    Json(new): Json<NewExercise>,
) -> FakeResult<Response> {
    let exercise = crate::lock(&shared).create_exercise(new)?;
    Ok(Json(exercise).into_response())
}

async fn list_foods(State(shared): State<Shared>) -> impl IntoResponse {
    Json(crate::lock(&shared).foods.clone())
}

async fn search_foods(State(shared): State<Shared>, Path(term): Path<String>) -> impl IntoResponse {
    Json(crate::lock(&shared).search_foods(&term))
}

async fn create_food(State(shared): State<Shared>, Json(new): Json<NewFood>) -> impl IntoResponse {
    Json(crate::lock(&shared).create_food(new))
}

// ---------------------------------------------------------------------------
// Routines
// ---------------------------------------------------------------------------

async fn list_routines(State(shared): State<Shared>, Path(id): Path<Id>) -> FakeResult<Response> {
    let state = crate::lock(&shared);
    state.client(id)?;
    let list: Vec<_> = state
        .routines
        .values()
        .filter(|r| r.client_id == Some(id))
        .map(|r| state.hydrate_routine(r.clone()))
        .collect();
    Ok(Json(list).into_response())
}

async fn create_routine(
    State(shared): State<Shared>,
    Path(id): Path<Id>,
    Json(new): Json<NewRoutine>,
) -> FakeResult<Response> {
    let routine = crate::lock(&shared).create_routine(id, new)?;
    Ok(Json(routine).into_response())
}

async fn get_routine(State(shared): State<Shared>, Path(id): Path<Id>) -> FakeResult<Response> {
    let routine = crate::lock(&shared).routine(id)?;
    Ok(Json(routine).into_response())
}

async fn update_routine(
    State(shared): State<Shared>,
    Path(id): Path<Id>,
    Json(update): Json<RoutineUpdate>,
) -> FakeResult<Response> {
    let routine = crate::lock(&shared).update_routine(id, update)?;
    Ok(Json(routine).into_response())
}

async fn delete_routine(State(shared): State<Shared>, Path(id): Path<Id>) -> FakeResult<Response> {
    crate::lock(&shared).delete_routine(id)?;
    Ok(deleted("Rutina").into_response())
}

async fn add_entry(
    State(shared): State<Shared>,
    Path(id): Path<Id>,
    Json(new): Json<NewRoutineEntry>,
) -> FakeResult<Response> {
    let entry = crate::lock(&shared).add_entry(id, new)?;
    Ok(Json(entry).into_response())
}

async fn update_entry(
    State(shared): State<Shared>,
    Path(id): Path<Id>,
    Json(update): Json<RoutineEntryUpdate>,
) -> FakeResult<Response> {
    let entry = crate::lock(&shared).update_entry(id, update)?;
    Ok(Json(entry).into_response())
}

async fn delete_entry(State(shared): State<Shared>, Path(id): Path<Id>) -> FakeResult<Response> {
    crate::lock(&shared).delete_entry(id)?;
    Ok(deleted("Ejercicio").into_response())
}

async fn copy_routine_day(
    State(shared): State<Shared>,
    Path(id): Path<Id>,
    Json(request): Json<CopyDayRequest>,
) -> FakeResult<Response> {
    let resp = crate::lock(&shared).copy_routine_day(id, request)?;
    Ok(Json(json!({
        "message": resp.message,
        "exercises_copied": resp.copied,
    }))
    .into_response())
}

async fn copy_routine_to_client(
    State(shared): State<Shared>,
    Path((id, client_id)): Path<(Id, Id)>,
) -> FakeResult<Response> {
    let mut state = crate::lock(&shared);
    let routine = state.copy_routine_to_client(id, client_id)?;
    Ok(Json(state.copy_row_routine(routine)).into_response())
}

async fn save_routine_template(
    State(shared): State<Shared>,
    Path(id): Path<Id>,
) -> FakeResult<Response> {
    let mut state = crate::lock(&shared);
    let template = state.save_routine_as_template(id)?;
    Ok(Json(state.copy_row_routine(template)).into_response())
}

async fn list_routine_templates(State(shared): State<Shared>) -> impl IntoResponse {
    Json(crate::lock(&shared).routine_templates())
}

async fn create_routine_template(
    State(shared): State<Shared>,
    Json(new): Json<NewRoutine>,
) -> impl IntoResponse {
    Json(crate::lock(&shared).create_routine_template(new))
}

async fn instantiate_routine_template(
    State(shared): State<Shared>,
    Path((id, client_id)): Path<(Id, Id)>,
) -> FakeResult<Response> {
    let mut state = crate::lock(&shared);
    let routine = state.instantiate_routine_template(id, client_id)?;
    Ok(Json(state.copy_row_routine(routine)).into_response())
}

// ---------------------------------------------------------------------------
// Diets
// ---------------------------------------------------------------------------

async fn list_diets(State(shared): State<Shared>, Path(id): Path<Id>) -> FakeResult<Response> {
    let state = crate::lock(&shared);
    state.client(id)?;
    let list: Vec<_> = state
        .diets
        .values()
        .filter(|d| d.client_id == Some(id))
        .map(|d| state.hydrate_diet(d.clone()))
        .collect();
    Ok(Json(list).into_response())
}

async fn create_diet(
    State(shared): State<Shared>,
    Path(id): Path<Id>,
    Json(new): Json<NewDiet>,
) -> FakeResult<Response> {
    let diet = crate::lock(&shared).create_diet(id, new)?;
    Ok(Json(diet).into_response())
}

async fn get_diet(State(shared): State<Shared>, Path(id): Path<Id>) -> FakeResult<Response> {
    let diet = crate::lock(&shared).diet(id)?;
    Ok(Json(diet).into_response())
}

async fn delete_diet(State(shared): State<Shared>, Path(id): Path<Id>) -> FakeResult<Response> {
    crate::lock(&shared).delete_diet(id)?;
    Ok(deleted("Dieta").into_response())
}

async fn add_meal(
    State(shared): State<Shared>,
    Path(id): Path<Id>,
    Json(new): Json<NewMeal>,
) -> FakeResult<Response> {
    let meal = crate::lock(&shared).add_meal(id, new)?;
    Ok(Json(meal).into_response())
}

async fn update_meal(
    State(shared): State<Shared>,
    Path(id): Path<Id>,
    Json(update): Json<MealUpdate>,
) -> FakeResult<Response> {
    let meal = crate::lock(&shared).update_meal(id, update)?;
    Ok(Json(meal).into_response())
}

async fn delete_meal(State(shared): State<Shared>, Path(id): Path<Id>) -> FakeResult<Response> {
    crate::lock(&shared).delete_meal(id)?;
    Ok(deleted("Comida").into_response())
}

async fn add_meal_food(
    State(shared): State<Shared>,
    Path(id): Path<Id>,
    Json(new): Json<NewMealFood>,
) -> FakeResult<Response> {
    let entry = crate::lock(&shared).add_meal_food(id, new)?;
    Ok(Json(entry).into_response())
}

async fn delete_meal_food(
    State(shared): State<Shared>,
    Path(id): Path<Id>,
) -> FakeResult<Response> {
    crate::lock(&shared).delete_meal_food(id)?;
    Ok(deleted("Alimento").into_response())
}

async fn copy_diet_day(
    State(shared): State<Shared>,
    Path(id): Path<Id>,
    Json(request): Json<CopyDayRequest>,
) -> FakeResult<Response> {
    let resp = crate::lock(&shared).copy_diet_day(id, request)?;
    Ok(Json(json!({
        "message": resp.message,
        "meals_copied": resp.copied,
    }))
    .into_response())
}

async fn save_diet_template(
    State(shared): State<Shared>,
    Path(id): Path<Id>,
) -> FakeResult<Response> {
    let mut state = crate::lock(&shared);
    let template = state.save_diet_as_template(id)?;
    Ok(Json(state.copy_row_diet(template)).into_response())
}

async fn list_diet_templates(State(shared): State<Shared>) -> impl IntoResponse {
    Json(crate::lock(&shared).diet_templates())
}

async fn instantiate_diet_template(
    State(shared): State<Shared>,
    Path((id, client_id)): Path<(Id, Id)>,
) -> FakeResult<Response> {
    let mut state = crate::lock(&shared);
    let diet = state.instantiate_diet_template(id, client_id)?;
    Ok(Json(state.copy_row_diet(diet)).into_response())
}

// ---------------------------------------------------------------------------
// Exports
// ---------------------------------------------------------------------------

fn export_bytes(format: &str, label: &str, id: Id) -> Response {
    let content_type = match format {
        "pdf" => "application/pdf",
        _ => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    };
    let body = format!("{format}:{label}:{id}").into_bytes();
    ([(header::CONTENT_TYPE, content_type)], body).into_response()
}

async fn export_routine_pdf(State(shared): State<Shared>, Path(id): Path<Id>) -> FakeResult<Response> {
    crate::lock(&shared).routine(id)?;
    Ok(export_bytes("pdf", "rutina", id))
}

async fn export_routine_excel(State(shared): State<Shared>, Path(id): Path<Id>) -> FakeResult<Response> {
    crate::lock(&shared).routine(id)?;
    Ok(export_bytes("excel", "rutina", id))
}

async fn export_diet_pdf(State(shared): State<Shared>, Path(id): Path<Id>) -> FakeResult<Response> {
    crate::lock(&shared).diet(id)?;
    Ok(export_bytes("pdf", "dieta", id))
}

async fn export_diet_excel(State(shared): State<Shared>, Path(id): Path<Id>) -> FakeResult<Response> {
    crate::lock(&shared).diet(id)?;
    Ok(export_bytes("excel", "dieta", id))
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

async fn list_notifications(State(shared): State<Shared>) -> impl IntoResponse {
    Json(crate::lock(&shared).notifications_newest_first())
}

async fn unread_count(State(shared): State<Shared>) -> impl IntoResponse {
    let count = crate::lock(&shared)
        .notifications
        .iter()
        .filter(|n| !n.read)
        .count();
    Json(UnreadCount {
        count: count as u64,
    })
}

async fn mark_read(State(shared): State<Shared>, Path(id): Path<Id>) -> FakeResult<Response> {
    let mut state = crate::lock(&shared);
    let notification = state
        .notifications
        .iter_mut()
        .find(|n| n.id == id)
        .ok_or_else(|| FakeError::not_found("Notification not found"))?;
    notification.read = true;
    Ok(Json(notification.clone()).into_response())
}

async fn delete_notification(
    State(shared): State<Shared>,
    Path(id): Path<Id>,
) -> FakeResult<Response> {
    let mut state = crate::lock(&shared);
    let before = state.notifications.len();
    state.notifications.retain(|n| n.id != id);
    if state.notifications.len() == before {
        return Err(FakeError::not_found("Notification not found"));
    }
    Ok(deleted("Notification").into_response())
}
