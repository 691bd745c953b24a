//! CLI handlers for `coach progress` and `coach injury` subcommands.

use anyhow::Result;
use chrono::Local;

use coach_api::ApiClient;
use coach_api::endpoints::{clients, injuries, progress as api_progress};
use coach_api::models::{Id, Injury, InjuryUpdate, NewInjury, PersonalRecord, WeightEntry};
use coach_core::CoreError;
use coach_core::progress::{best_records, record_personal_best, record_weight, weight_change};
use coach_core::validation::{sanitize, validate_name};

use crate::render::{self, at_midnight, date_or_dash};
use crate::{InjuryCommands, ProgressCommands};

pub async fn run_progress_command(command: ProgressCommands, api: &ApiClient) -> Result<()> {
    match command {
        ProgressCommands::Weights { client_id } => {
            let entries = api_progress::list_weights(api, client_id).await?;
            print!("{}", weights_report(&entries));
            Ok(())
        }
        ProgressCommands::AddWeight {
            client_id,
            weight,
            date,
        } => {
            let entry = record_weight(api, client_id, weight, date.map(at_midnight)).await?;
            println!(
                "Recorded {} kg for client {client_id} on {}.",
                entry.weight,
                entry.date.format("%Y-%m-%d")
            );
            Ok(())
        }
        ProgressCommands::DeleteWeight { weight_id } => {
            api_progress::delete_weight(api, weight_id).await?;
            println!("Weight entry {weight_id} deleted.");
            Ok(())
        }
        ProgressCommands::Records { client_id, best } => {
            let records = api_progress::list_personal_records(api, client_id).await?;
            let shown: Vec<&PersonalRecord> = if best {
                best_records(&records)
            } else {
                records.iter().collect()
            };
            if shown.is_empty() {
                println!("No personal records yet.");
            } else {
                print!("{}", render::table(&["ID", "Exercise", "Weight", "Reps", "Date"], &record_rows(&shown)));
            }
            Ok(())
        }
        ProgressCommands::AddRecord {
            client_id,
            exercise,
            weight,
            reps,
            date,
        } => {
            let record =
                record_personal_best(api, client_id, &exercise, weight, reps, date.map(at_midnight)).await?;
            println!(
                "Recorded {} {} kg x {} (id {}).",
                record.exercise, record.weight, record.reps, record.id
            );
            Ok(())
        }
        ProgressCommands::DeleteRecord { record_id } => {
            api_progress::delete_personal_record(api, record_id).await?;
            println!("Personal record {record_id} deleted.");
            Ok(())
        }
        ProgressCommands::Dashboard { client_id } => cmd_dashboard(api, client_id).await,
    }
}

pub fn record_rows(records: &[&PersonalRecord]) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.exercise.clone(),
                format!("{} kg", r.weight),
                r.reps.to_string(),
                r.date.format("%Y-%m-%d").to_string(),
            ]
        })
        .collect()
}

/// Weight table followed by the change from the first to the last weigh-in.
pub fn weights_report(entries: &[WeightEntry]) -> String {
    if entries.is_empty() {
        return "No weight entries yet.\n".to_owned();
    }
    let mut sorted: Vec<&WeightEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| e.date);
    let rows: Vec<Vec<String>> = sorted
        .iter()
        .map(|e| vec![e.id.to_string(), e.date.format("%Y-%m-%d").to_string(), format!("{} kg", e.weight)])
        .collect();
    let mut out = render::table(&["ID", "Date", "Weight"], &rows);
    if let Some(change) = weight_change(entries) {
        out.push_str(&format!("\nChange: {change:+.1} kg\n"));
    }
    out
}

async fn cmd_dashboard(api: &ApiClient, client_id: Id) -> Result<()> {
    let dashboard = clients::get_dashboard(api, client_id).await?;
    let c = &dashboard.client;
    println!("{} <{}>", c.name, c.email);
    println!(
        "  Age:            {}",
        c.age.map(|a| a.to_string()).unwrap_or_else(|| "-".into())
    );
    println!(
        "  Height:         {}",
        c.height.map(|h| format!("{h:.2} m")).unwrap_or_else(|| "-".into())
    );
    println!(
        "  Current weight: {}",
        c.current_weight
            .map(|w| format!("{w} kg"))
            .unwrap_or_else(|| "-".into())
    );
    println!("  Goal:           {}", c.goal.as_deref().unwrap_or("-"));
    println!("  Billing date:   {}", date_or_dash(c.billing_date));

    if !dashboard.weight_history.is_empty() {
        println!();
        println!("Weight history:");
        for point in &dashboard.weight_history {
            println!("  {}  {} kg", point.date.format("%Y-%m-%d"), point.weight);
        }
    }

    println!();
    if dashboard.routines.is_empty() {
        println!("No routines.");
    } else {
        println!("Routines:");
        for r in &dashboard.routines {
            println!(
                "  {:>5}  {}{}",
                r.id,
                r.name,
                if r.active { "  (active)" } else { "" }
            );
        }
    }
    Ok(())
}

// -----------------------------------------------------------------------
// coach injury
// -----------------------------------------------------------------------

pub async fn run_injury_command(command: InjuryCommands, api: &ApiClient) -> Result<()> {
    match command {
        InjuryCommands::List { client_id } => {
            let list = injuries::list_injuries(api, client_id).await?;
            if list.is_empty() {
                println!("No injuries recorded.");
            } else {
                print!(
                    "{}",
                    render::table(&["ID", "Name", "Status", "Since", "Until"], &injury_rows(&list))
                );
            }
            Ok(())
        }
        InjuryCommands::Add {
            client_id,
            name,
            description,
            chronic,
            since,
        } => {
            let name = sanitize(&name);
            validate_name("nombre", &name).map_err(CoreError::from)?;
            let new = NewInjury {
                name,
                description: description.map(|d| sanitize(&d)).filter(|d| !d.is_empty()),
                chronic,
                start_date: since.map(at_midnight),
                end_date: None,
            };
            let injury = injuries::create_injury(api, client_id, &new).await?;
            println!("Injury {} recorded for client {client_id}.", injury.id);
            Ok(())
        }
        InjuryCommands::Heal { injury_id, date } => {
            let end = date.unwrap_or_else(|| Local::now().date_naive());
            let update = InjuryUpdate {
                active: Some(false),
                end_date: Some(at_midnight(end)),
                ..Default::default()
            };
            let injury = injuries::update_injury(api, injury_id, &update).await?;
            println!("Injury {} ({}) marked as healed.", injury.id, injury.name);
            Ok(())
        }
        InjuryCommands::Delete { injury_id } => {
            injuries::delete_injury(api, injury_id).await?;
            println!("Injury {injury_id} deleted.");
            Ok(())
        }
    }
}

pub fn injury_rows(list: &[Injury]) -> Vec<Vec<String>> {
    list.iter()
        .map(|i| {
            let status = match (i.active, i.chronic) {
                (true, true) => "chronic",
                (true, false) => "active",
                (false, _) => "healed",
            };
            vec![
                i.id.to_string(),
                i.name.clone(),
                status.to_owned(),
                date_or_dash(i.start_date),
                date_or_dash(i.end_date),
            ]
        })
        .collect()
}
