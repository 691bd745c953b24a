//! Template instantiation and template capture.
//!
//! Every operation here is a single backend call that deep-copies a plan.
//! The mutation answers with the bare new row, so the copy is read back and
//! checked against the source before it is handed back. A backend that
//! silently drops entries surfaces as [`CoreError::Inconsistent`] instead of
//! a half-empty plan.

use tracing::info;

use coach_api::ApiClient;
use coach_api::endpoints::{clients, diets, routines, templates};
use coach_api::models::{Diet, Id, PlanKind, Routine};

use crate::error::CoreError;

/// What a deep copy produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstantiationReport {
    pub kind: PlanKind,
    pub source_id: Id,
    pub plan_id: Id,
    /// Owner of the new plan; `None` for templates.
    pub client_id: Option<Id>,
    pub name: String,
    /// Routine entries, or meals for diets.
    pub entries: usize,
    /// Foods across all meals; zero for routines.
    pub foods: usize,
}

fn diet_food_count(diet: &Diet) -> usize {
    diet.meals.iter().map(|m| m.foods.len()).sum()
}

fn check_owner(
    kind: PlanKind,
    plan_id: Id,
    expected: Option<Id>,
    actual: Option<Id>,
    is_template: bool,
) -> Result<(), CoreError> {
    if actual != expected {
        return Err(CoreError::Inconsistent(format!(
            "{kind} {plan_id} belongs to {actual:?}, expected {expected:?}"
        )));
    }
    if is_template != expected.is_none() {
        return Err(CoreError::Inconsistent(format!(
            "{kind} {plan_id} has the wrong template flag"
        )));
    }
    Ok(())
}

fn check_count(
    kind: PlanKind,
    plan_id: Id,
    what: &str,
    expected: usize,
    actual: usize,
) -> Result<(), CoreError> {
    if expected != actual {
        return Err(CoreError::Inconsistent(format!(
            "{kind} {plan_id} has {actual} {what}, source had {expected}"
        )));
    }
    Ok(())
}

fn verify_routine(
    source: &Routine,
    copy: &Routine,
    owner: Option<Id>,
) -> Result<InstantiationReport, CoreError> {
    check_owner(PlanKind::Routine, copy.id, owner, copy.client_id, copy.is_template)?;
    check_count(PlanKind::Routine, copy.id, "entries", source.entries.len(), copy.entries.len())?;
    Ok(InstantiationReport {
        kind: PlanKind::Routine,
        source_id: source.id,
        plan_id: copy.id,
        client_id: copy.client_id,
        name: copy.name.clone(),
        entries: copy.entries.len(),
        foods: 0,
    })
}

fn verify_diet(
    source: &Diet,
    copy: &Diet,
    owner: Option<Id>,
) -> Result<InstantiationReport, CoreError> {
    check_owner(PlanKind::Diet, copy.id, owner, copy.client_id, copy.is_template)?;
    check_count(PlanKind::Diet, copy.id, "meals", source.meals.len(), copy.meals.len())?;
    check_count(PlanKind::Diet, copy.id, "foods", diet_food_count(source), diet_food_count(copy))?;
    Ok(InstantiationReport {
        kind: PlanKind::Diet,
        source_id: source.id,
        plan_id: copy.id,
        client_id: copy.client_id,
        name: copy.name.clone(),
        entries: copy.meals.len(),
        foods: diet_food_count(copy),
    })
}

/// Create a routine for `client_id` from a template. The client's
/// previously active routine is retired by the backend.
pub async fn instantiate_routine_template(
    client: &ApiClient,
    template_id: Id,
    client_id: Id,
) -> Result<(Routine, InstantiationReport), CoreError> {
    let template = templates::find_routine_template(client, template_id).await?;
    clients::get_client(client, client_id).await?;
    let created = templates::instantiate_routine_template(client, template_id, client_id).await?;
    let routine = routines::get_routine(client, created.id).await?;
    let report = verify_routine(&template, &routine, Some(client_id))?;
    info!(template_id, client_id, routine_id = routine.id, entries = report.entries, "template instantiated");
    Ok((routine, report))
}

pub async fn instantiate_diet_template(
    client: &ApiClient,
    template_id: Id,
    client_id: Id,
) -> Result<(Diet, InstantiationReport), CoreError> {
    let template = templates::find_diet_template(client, template_id).await?;
    clients::get_client(client, client_id).await?;
    let created = templates::instantiate_diet_template(client, template_id, client_id).await?;
    let diet = diets::get_diet(client, created.id).await?;
    let report = verify_diet(&template, &diet, Some(client_id))?;
    info!(template_id, client_id, diet_id = diet.id, meals = report.entries, "template instantiated");
    Ok((diet, report))
}

/// Duplicate a client's routine into a new template. The routine stays
/// bound to its client.
pub async fn save_routine_as_template(
    client: &ApiClient,
    routine_id: Id,
) -> Result<(Routine, InstantiationReport), CoreError> {
    let source = routines::get_routine(client, routine_id).await?;
    let created = templates::save_routine_as_template(client, routine_id).await?;
    let template = templates::find_routine_template(client, created.id).await?;
    let report = verify_routine(&source, &template, None)?;
    Ok((template, report))
}

pub async fn save_diet_as_template(
    client: &ApiClient,
    diet_id: Id,
) -> Result<(Diet, InstantiationReport), CoreError> {
    let source = diets::get_diet(client, diet_id).await?;
    let created = templates::save_diet_as_template(client, diet_id).await?;
    let template = templates::find_diet_template(client, created.id).await?;
    let report = verify_diet(&source, &template, None)?;
    Ok((template, report))
}

/// Deep-copy a client's routine to another client.
pub async fn copy_routine_to_client(
    client: &ApiClient,
    routine_id: Id,
    target_client_id: Id,
) -> Result<(Routine, InstantiationReport), CoreError> {
    let source = routines::get_routine(client, routine_id).await?;
    if source.client_id == Some(target_client_id) {
        return Err(CoreError::conflict(format!(
            "routine {routine_id} already belongs to client {target_client_id}"
        )));
    }
    let created = routines::copy_to_client(client, routine_id, target_client_id).await?;
    let copy = routines::get_routine(client, created.id).await?;
    let report = verify_routine(&source, &copy, Some(target_client_id))?;
    info!(routine_id, target_client_id, new_routine_id = copy.id, "routine copied to client");
    Ok((copy, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use coach_api::models::RoutineEntry;

    fn routine(id: Id, client_id: Option<Id>, entries: usize) -> Routine {
        Routine {
            id,
            client_id,
            name: "Fuerza".into(),
            start_date: None,
            expiry_date: None,
            notes: None,
            day_count: 3,
            active: true,
            is_template: client_id.is_none(),
            entries: (0..entries)
                .map(|i| RoutineEntry {
                    id: i as Id + 100,
                    routine_id: Some(id),
                    exercise_id: 1,
                    day: 1,
                    sets: 3,
                    reps: 10,
                    weight: None,
                    rest_seconds: 60,
                    notes: None,
                    exercise: None,
                })
                .collect(),
        }
    }

    #[test]
    fn verified_copy_produces_report() {
        let report = verify_routine(&routine(1, None, 3), &routine(2, Some(7), 3), Some(7)).unwrap();
        assert_eq!(report.plan_id, 2);
        assert_eq!(report.source_id, 1);
        assert_eq!(report.client_id, Some(7));
        assert_eq!(report.entries, 3);
    }

    #[test]
    fn wrong_owner_is_inconsistent() {
        let err = verify_routine(&routine(1, None, 1), &routine(2, Some(8), 1), Some(7)).unwrap_err();
        assert!(matches!(err, CoreError::Inconsistent(_)));
    }

    #[test]
    fn dropped_entries_are_inconsistent() {
        let err = verify_routine(&routine(1, None, 4), &routine(2, Some(7), 3), Some(7)).unwrap_err();
        assert!(err.to_string().contains("has 3 entries, source had 4"));
    }

    #[test]
    fn template_must_be_unowned() {
        let mut copy = routine(2, None, 2);
        copy.is_template = false;
        assert!(verify_routine(&routine(1, Some(3), 2), &copy, None).is_err());
    }
}
