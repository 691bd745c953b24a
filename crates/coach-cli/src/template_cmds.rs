//! CLI handlers for `coach template` subcommands.

use anyhow::Result;

use coach_api::ApiClient;
use coach_api::endpoints::templates;
use coach_api::models::PlanKind;
use coach_core::plan::{
    InstantiationReport, instantiate_diet_template, instantiate_routine_template,
    save_diet_as_template, save_routine_as_template,
};

use crate::TemplateCommands;
use crate::plan_cmds::{DIET_HEADERS, ROUTINE_HEADERS, diet_rows, routine_rows};
use crate::render;
use crate::resolve::resolve_plan_id;

pub async fn run_template_command(command: TemplateCommands, api: &ApiClient) -> Result<()> {
    match command {
        TemplateCommands::List { kind } => {
            let (headers, rows) = match kind {
                PlanKind::Routine => (
                    ROUTINE_HEADERS,
                    routine_rows(&templates::list_routine_templates(api).await?),
                ),
                PlanKind::Diet => (DIET_HEADERS, diet_rows(&templates::list_diet_templates(api).await?)),
            };
            if rows.is_empty() {
                println!("No {kind} templates yet. Save one with `coach template save {kind} <plan>`.");
            } else {
                print!("{}", render::table(headers, &rows));
            }
            Ok(())
        }
        TemplateCommands::Show { kind, id } => {
            match kind {
                PlanKind::Routine => {
                    print!("{}", render::routine(&templates::find_routine_template(api, id).await?))
                }
                PlanKind::Diet => print!("{}", render::diet(&templates::find_diet_template(api, id).await?)),
            }
            Ok(())
        }
        TemplateCommands::Save { kind, plan } => {
            let plan_id = resolve_plan_id(&plan)?;
            let report = match kind {
                PlanKind::Routine => save_routine_as_template(api, plan_id).await?.1,
                PlanKind::Diet => save_diet_as_template(api, plan_id).await?.1,
            };
            println!("Template saved.");
            print_report(&report);
            Ok(())
        }
        TemplateCommands::Apply {
            kind,
            template_id,
            client_id,
        } => {
            let report = match kind {
                PlanKind::Routine => instantiate_routine_template(api, template_id, client_id).await?.1,
                PlanKind::Diet => instantiate_diet_template(api, template_id, client_id).await?.1,
            };
            println!("Template applied. The client's previous {kind} is no longer active.");
            print_report(&report);
            Ok(())
        }
    }
}

pub fn report_lines(report: &InstantiationReport) -> Vec<String> {
    let mut lines = vec![
        format!("  {:<17} {}", "Source ID:", report.source_id),
        format!("  {:<17} {}", "New ID:", report.plan_id),
        format!("  {:<17} {}", "Name:", report.name),
    ];
    if let Some(client_id) = report.client_id {
        lines.push(format!("  {:<17} {client_id}", "Client:"));
    }
    match report.kind {
        PlanKind::Routine => lines.push(format!("  {:<17} {}", "Exercises:", report.entries)),
        PlanKind::Diet => {
            lines.push(format!("  {:<17} {}", "Meals:", report.entries));
            lines.push(format!("  {:<17} {}", "Foods:", report.foods));
        }
    }
    lines
}

fn print_report(report: &InstantiationReport) {
    println!();
    for line in report_lines(report) {
        println!("{line}");
    }
}
