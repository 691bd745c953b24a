//! CLI handlers for `coach routine` and `coach diet` subcommands.
//!
//! Implements:
//! - `coach routine|diet create <file>`        -- build a plan from a plan file
//! - `coach routine|diet show <plan>`          -- day-slot view of a plan
//! - `coach routine|diet copy-day <plan> s t`  -- replace day `t` with a copy of day `s`
//! - `coach routine resize <plan> <days>`      -- change the number of training days
//! - `coach routine copy-to <plan> <client>`   -- deep-copy a routine to another client

use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};

use coach_api::ApiClient;
use coach_api::endpoints::{diets, routines};
use coach_api::models::{Diet, Id, PlanKind, Routine};
use coach_core::CoreError;
use coach_core::nutrition::diet_macros;
use coach_core::plan::{
    BuildReport, ResizePolicy, build_plan, copy_day, copy_routine_to_client, diet_buckets,
    parse_plan_toml, preview_day_copy, resize_routine, routine_buckets,
};

use crate::render::{self, date_or_dash, macros_line};
use crate::resolve::{resolve_plan_id, write_plan_id_to_file};
use crate::{DietCommands, RoutineCommands};

// -----------------------------------------------------------------------
// Public entry points
// -----------------------------------------------------------------------

pub async fn run_routine_command(command: RoutineCommands, api: &ApiClient) -> Result<()> {
    match command {
        RoutineCommands::List { client_id } => cmd_list_routines(api, client_id).await,
        RoutineCommands::Show { plan } => {
            let routine = routines::get_routine(api, resolve_plan_id(&plan)?).await?;
            print!("{}", render::routine(&routine));
            Ok(())
        }
        RoutineCommands::Create { file, client } => {
            cmd_create(api, PlanKind::Routine, &file, client).await
        }
        RoutineCommands::CopyDay {
            plan,
            source,
            target,
            yes,
        } => cmd_copy_day(api, PlanKind::Routine, resolve_plan_id(&plan)?, source, target, yes).await,
        RoutineCommands::Resize {
            plan,
            days,
            delete_orphans,
        } => {
            let policy = if delete_orphans {
                ResizePolicy::DeleteOrphans
            } else {
                ResizePolicy::Refuse
            };
            cmd_resize(api, resolve_plan_id(&plan)?, days, policy).await
        }
        RoutineCommands::CopyTo { plan, client_id } => {
            let (copy, report) = copy_routine_to_client(api, resolve_plan_id(&plan)?, client_id).await?;
            println!("Routine copied.");
            println!();
            println!("  New routine ID:   {}", copy.id);
            println!("  Client:           {client_id}");
            println!("  Exercises:        {}", report.entries);
            Ok(())
        }
        RoutineCommands::Delete { plan } => {
            let id = resolve_plan_id(&plan)?;
            routines::delete_routine(api, id).await?;
            println!("Routine {id} deleted.");
            Ok(())
        }
    }
}

pub async fn run_diet_command(command: DietCommands, api: &ApiClient) -> Result<()> {
    match command {
        DietCommands::List { client_id } => cmd_list_diets(api, client_id).await,
        DietCommands::Show { plan } => {
            let diet = diets::get_diet(api, resolve_plan_id(&plan)?).await?;
            print!("{}", render::diet(&diet));
            Ok(())
        }
        DietCommands::Create { file, client } => cmd_create(api, PlanKind::Diet, &file, client).await,
        DietCommands::CopyDay {
            plan,
            source,
            target,
            yes,
        } => cmd_copy_day(api, PlanKind::Diet, resolve_plan_id(&plan)?, source, target, yes).await,
        DietCommands::Delete { plan } => {
            let id = resolve_plan_id(&plan)?;
            diets::delete_diet(api, id).await?;
            println!("Diet {id} deleted.");
            Ok(())
        }
    }
}

fn status(active: bool, is_template: bool) -> &'static str {
    if is_template {
        "template"
    } else if active {
        "active"
    } else {
        "inactive"
    }
}

pub const ROUTINE_HEADERS: &[&str] = &["ID", "Name", "Days", "Exercises", "Status", "Expires"];
pub const DIET_HEADERS: &[&str] = &["ID", "Name", "Menus", "Status", "Total kcal"];

pub fn routine_rows(list: &[Routine]) -> Vec<Vec<String>> {
    list.iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.name.clone(),
                r.day_count.to_string(),
                r.entries.len().to_string(),
                status(r.active, r.is_template).to_owned(),
                date_or_dash(r.expiry_date),
            ]
        })
        .collect()
}

pub fn diet_rows(list: &[Diet]) -> Vec<Vec<String>> {
    list.iter()
        .map(|d| {
            vec![
                d.id.to_string(),
                d.name.clone(),
                diet_buckets(d).non_empty_days().len().to_string(),
                status(d.active, d.is_template).to_owned(),
                diet_macros(d).rounded().calories.to_string(),
            ]
        })
        .collect()
}

async fn cmd_list_routines(api: &ApiClient, client_id: Id) -> Result<()> {
    let list = routines::list_routines(api, client_id).await?;
    if list.is_empty() {
        println!("Client {client_id} has no routines.");
        return Ok(());
    }
    print!("{}", render::table(ROUTINE_HEADERS, &routine_rows(&list)));
    Ok(())
}

async fn cmd_list_diets(api: &ApiClient, client_id: Id) -> Result<()> {
    let list = diets::list_diets(api, client_id).await?;
    if list.is_empty() {
        println!("Client {client_id} has no diets.");
        return Ok(());
    }
    print!("{}", render::table(DIET_HEADERS, &diet_rows(&list)));
    Ok(())
}

// -----------------------------------------------------------------------
// coach routine|diet create <file>
// -----------------------------------------------------------------------

/// Parse the plan file, build the plan, and write its id back to the file.
/// A partially built plan still gets its id written so the file can be
/// used to inspect or delete it.
pub async fn create_from_file(
    api: &ApiClient,
    kind: PlanKind,
    file_path: &str,
    client_override: Option<Id>,
) -> Result<BuildReport> {
    let content = std::fs::read_to_string(file_path)
        .with_context(|| format!("failed to read plan file: {file_path}"))?;
    let plan = parse_plan_toml(&content)
        .with_context(|| format!("failed to parse plan file: {file_path}"))?;

    if plan.plan.kind != kind {
        bail!("{file_path} describes a {}, not a {kind}", plan.plan.kind);
    }
    if let Some(id) = plan.plan.id {
        bail!("{file_path} was already created as {kind} {id}; remove the id to create a copy");
    }
    let Some(client_id) = client_override.or(plan.plan.client_id) else {
        bail!("no client given; pass --client <id> or set client_id in [plan]");
    };

    match build_plan(api, &plan, client_id).await {
        Ok(report) => {
            write_plan_id_to_file(file_path, report.plan_id)?;
            Ok(report)
        }
        Err(err) => {
            if let CoreError::PartialBuild { plan_id, .. } = &err {
                write_plan_id_to_file(file_path, *plan_id)?;
            }
            Err(err.into())
        }
    }
}

async fn cmd_create(
    api: &ApiClient,
    kind: PlanKind,
    file_path: &str,
    client_override: Option<Id>,
) -> Result<()> {
    let report = create_from_file(api, kind, file_path, client_override).await?;

    println!("{} created successfully.", capitalized(kind));
    println!();
    println!("  Plan ID:          {}", report.plan_id);
    println!("  Client:           {}", report.client_id);
    println!("  Steps:            {}", report.steps);
    if !report.cataloged.is_empty() {
        println!();
        println!("Added to the catalog:");
        for name in &report.cataloged {
            println!("  - {name}");
        }
    }
    if kind == PlanKind::Diet {
        let diet = diets::get_diet(api, report.plan_id).await?;
        println!();
        println!("  Weekly total:     {}", macros_line(&diet_macros(&diet)));
    }
    Ok(())
}

fn capitalized(kind: PlanKind) -> &'static str {
    match kind {
        PlanKind::Routine => "Routine",
        PlanKind::Diet => "Diet",
    }
}

// -----------------------------------------------------------------------
// coach routine|diet copy-day <plan> <source> <target>
// -----------------------------------------------------------------------

fn confirm(prompt: &str) -> Result<bool> {
    eprint!("{prompt} [y/N] ");
    std::io::stderr().flush().ok();
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read confirmation")?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

/// Entries `(in source, in target)` according to a local preview.
async fn preview_counts(
    api: &ApiClient,
    kind: PlanKind,
    plan_id: Id,
    source: i32,
    target: i32,
) -> Result<(usize, usize)> {
    Ok(match kind {
        PlanKind::Routine => {
            let routine = routines::get_routine(api, plan_id).await?;
            let preview = preview_day_copy(&routine.entries, source, target)?;
            (preview.drafts.len(), preview.replaced)
        }
        PlanKind::Diet => {
            let diet = diets::get_diet(api, plan_id).await?;
            let preview = preview_day_copy(&diet.meals, source, target)?;
            (preview.drafts.len(), preview.replaced)
        }
    })
}

async fn cmd_copy_day(
    api: &ApiClient,
    kind: PlanKind,
    plan_id: Id,
    source: i32,
    target: i32,
    yes: bool,
) -> Result<()> {
    let slot = kind.slot_label();
    let (copied, replaced) = preview_counts(api, kind, plan_id, source, target).await?;
    if copied == 0 {
        bail!("{slot} {source} is empty; there is nothing to copy");
    }
    if replaced > 0
        && !yes
        && !confirm(&format!(
            "{slot} {target} has {replaced} entr{} that will be replaced. Continue?",
            if replaced == 1 { "y" } else { "ies" }
        ))?
    {
        println!("Aborted.");
        return Ok(());
    }

    let outcome = copy_day(api, kind, plan_id, source, target).await?;
    println!("{}", outcome.message);
    println!("  {slot} {source} -> {slot} {target}: {} entr{} copied", outcome.copied, if outcome.copied == 1 { "y" } else { "ies" });
    Ok(())
}

// -----------------------------------------------------------------------
// coach routine resize <plan> <days>
// -----------------------------------------------------------------------

async fn cmd_resize(api: &ApiClient, routine_id: Id, days: i32, policy: ResizePolicy) -> Result<()> {
    let outcome = resize_routine(api, routine_id, days, policy).await?;
    println!("Routine {} now has {} day(s).", routine_id, outcome.routine.day_count);
    if outcome.deleted_entries > 0 {
        println!("  Deleted {} exercise(s) from removed days.", outcome.deleted_entries);
    }
    let empty: Vec<String> = routine_buckets(&outcome.routine)
        .iter()
        .filter(|(_, entries)| entries.is_empty())
        .map(|(day, _)| day.to_string())
        .collect();
    if !empty.is_empty() {
        println!("  Empty days: {}", empty.join(", "));
    }
    Ok(())
}
