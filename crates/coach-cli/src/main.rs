mod auth_cmds;
mod catalog_cmds;
mod client_cmds;
mod config;
mod export_cmd;
mod notification_cmds;
mod plan_cmds;
mod progress_cmds;
mod render;
mod resolve;
mod template_cmds;
#[cfg(test)]
mod test_util;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use coach_api::endpoints::export::ExportFormat;
use coach_api::models::{Id, PlanKind};
use coach_api::ApiError;
use coach_core::CoreError;
use coach_core::message::{core_message, user_message};

use crate::config::CoachConfig;

#[derive(Parser)]
#[command(name = "coach", about = "Manage coaching clients, routines and diets")]
struct Cli {
    /// Backend base URL (overrides COACH_API_URL and the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session token
    Login {
        #[arg(long)]
        email: String,
        /// Password; read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Create a coach account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored session token
    Logout,
    /// Client count, active routines and the newest clients
    Dashboard,
    /// Manage clients
    Client {
        #[command(subcommand)]
        command: ClientCommands,
    },
    /// Manage workout routines
    Routine {
        #[command(subcommand)]
        command: RoutineCommands,
    },
    /// Manage diets
    Diet {
        #[command(subcommand)]
        command: DietCommands,
    },
    /// Browse and extend the exercise and food catalogs
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
    /// Weight history, personal records and the client dashboard
    Progress {
        #[command(subcommand)]
        command: ProgressCommands,
    },
    /// Track client injuries
    Injury {
        #[command(subcommand)]
        command: InjuryCommands,
    },
    /// Routine and diet templates
    Template {
        #[command(subcommand)]
        command: TemplateCommands,
    },
    /// Coach notifications
    Notification {
        #[command(subcommand)]
        command: NotificationCommands,
    },
    /// Download a routine or diet as PDF or Excel
    Export {
        /// routine or diet
        kind: PlanKind,
        /// Plan id or plan file
        plan: String,
        #[arg(long, default_value = "pdf")]
        format: ExportFormat,
        /// Output path (defaults to a name derived from the plan)
        #[arg(long, short)]
        output: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ClientCommands {
    /// List all clients
    List,
    /// Show one client
    Show { id: Id },
    /// Register a new client
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// YYYY-MM-DD
        #[arg(long)]
        birth_date: NaiveDate,
        /// Height in meters
        #[arg(long)]
        height: f64,
        #[arg(long)]
        goal: String,
        /// Monthly billing date, YYYY-MM-DD
        #[arg(long)]
        billing_date: Option<NaiveDate>,
    },
    /// Change fields of a client; unset flags are left alone
    Update {
        id: Id,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        height: Option<f64>,
        #[arg(long)]
        goal: Option<String>,
        #[arg(long)]
        billing_date: Option<NaiveDate>,
        /// Turn notifications on or off
        #[arg(long)]
        notifications: Option<bool>,
    },
    /// Delete a client and everything attached to it
    Delete { id: Id },
}

#[derive(Subcommand)]
pub enum RoutineCommands {
    /// List routines of a client
    List { client_id: Id },
    /// Show a routine grouped by day
    Show { plan: String },
    /// Create a routine from a plan file
    Create {
        file: String,
        /// Owner (overrides [plan].client_id)
        #[arg(long)]
        client: Option<Id>,
    },
    /// Replace one day's exercises with a copy of another day
    CopyDay {
        plan: String,
        source: i32,
        target: i32,
        /// Skip the confirmation when the target day is not empty
        #[arg(long)]
        yes: bool,
    },
    /// Change the number of training days
    Resize {
        plan: String,
        days: i32,
        /// Delete exercises in the removed days instead of refusing
        #[arg(long)]
        delete_orphans: bool,
    },
    /// Copy a routine to another client
    CopyTo { plan: String, client_id: Id },
    /// Delete a routine
    Delete { plan: String },
}

#[derive(Subcommand)]
pub enum DietCommands {
    /// List diets of a client
    List { client_id: Id },
    /// Show a diet's menus with macro totals
    Show { plan: String },
    /// Create a diet from a plan file
    Create {
        file: String,
        #[arg(long)]
        client: Option<Id>,
    },
    /// Replace one menu with a copy of another menu
    CopyDay {
        plan: String,
        source: i32,
        target: i32,
        #[arg(long)]
        yes: bool,
    },
    /// Delete a diet
    Delete { plan: String },
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List or search exercises
    Exercises {
        /// Search term (at least 3 characters)
        term: Option<String>,
    },
    /// List or search foods
    Foods { term: Option<String> },
    /// Add an exercise unless one with that name exists
    AddExercise {
        name: String,
        #[arg(long)]
        category: Option<String>,
    },
    /// Add a food unless one with that name exists; nutrients per 100 g
    AddFood {
        name: String,
        #[arg(long, default_value_t = 0.0)]
        calories: f64,
        #[arg(long, default_value_t = 0.0)]
        protein: f64,
        #[arg(long, default_value_t = 0.0)]
        carbs: f64,
        #[arg(long, default_value_t = 0.0)]
        fat: f64,
    },
}

#[derive(Subcommand)]
pub enum ProgressCommands {
    /// Weight history of a client
    Weights { client_id: Id },
    /// Record a weigh-in
    AddWeight {
        client_id: Id,
        weight: f64,
        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Delete a weigh-in
    DeleteWeight { weight_id: Id },
    /// Personal records of a client
    Records {
        client_id: Id,
        /// Only the best record per exercise
        #[arg(long)]
        best: bool,
    },
    /// Record a personal best
    AddRecord {
        client_id: Id,
        exercise: String,
        weight: f64,
        #[arg(long, default_value_t = 1)]
        reps: i32,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Delete a personal record
    DeleteRecord { record_id: Id },
    /// Client summary, weight trend and routines
    Dashboard { client_id: Id },
}

#[derive(Subcommand)]
pub enum InjuryCommands {
    /// Injuries of a client
    List { client_id: Id },
    /// Record an injury
    Add {
        client_id: Id,
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        chronic: bool,
        #[arg(long)]
        since: Option<NaiveDate>,
    },
    /// Mark an injury as healed
    Heal {
        injury_id: Id,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Delete an injury
    Delete { injury_id: Id },
}

#[derive(Subcommand)]
pub enum TemplateCommands {
    /// List templates of one kind
    List { kind: PlanKind },
    /// Show a template
    Show { kind: PlanKind, id: Id },
    /// Save a client's plan as a new template
    Save { kind: PlanKind, plan: String },
    /// Create a plan for a client from a template
    Apply {
        kind: PlanKind,
        template_id: Id,
        client_id: Id,
    },
}

#[derive(Subcommand)]
pub enum NotificationCommands {
    /// List notifications
    List,
    /// Unread count
    Count,
    /// Mark one notification as read
    Read { id: Id },
    /// Mark every notification as read
    ReadAll,
    /// Delete a notification
    Delete { id: Id },
}

/// Map any error to the text a coach should see.
fn error_text(err: &anyhow::Error) -> String {
    if let Some(core) = err.downcast_ref::<CoreError>() {
        return core_message(core);
    }
    if let Some(api) = err.downcast_ref::<ApiError>() {
        return user_message(api);
    }
    format!("{err:#}")
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        tracing::debug!(error = ?err, "command failed");
        eprintln!("Error: {}", error_text(&err));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = CoachConfig::resolve(cli.api_url.as_deref())?;

    match cli.command {
        Commands::Login { email, password } => {
            auth_cmds::cmd_login(&config.anonymous_client()?, &email, password).await
        }
        Commands::Register {
            name,
            email,
            password,
        } => auth_cmds::cmd_register(&config.anonymous_client()?, &name, &email, password).await,
        Commands::Logout => auth_cmds::cmd_logout(),
        Commands::Dashboard => client_cmds::cmd_coach_dashboard(&config.client()?).await,
        Commands::Client { command } => {
            client_cmds::run_client_command(command, &config.client()?).await
        }
        Commands::Routine { command } => {
            plan_cmds::run_routine_command(command, &config.client()?).await
        }
        Commands::Diet { command } => plan_cmds::run_diet_command(command, &config.client()?).await,
        Commands::Catalog { command } => {
            catalog_cmds::run_catalog_command(command, &config.client()?).await
        }
        Commands::Progress { command } => {
            progress_cmds::run_progress_command(command, &config.client()?).await
        }
        Commands::Injury { command } => {
            progress_cmds::run_injury_command(command, &config.client()?).await
        }
        Commands::Template { command } => {
            template_cmds::run_template_command(command, &config.client()?).await
        }
        Commands::Notification { command } => {
            notification_cmds::run_notification_command(command, &config.client()?).await
        }
        Commands::Export {
            kind,
            plan,
            format,
            output,
        } => export_cmd::cmd_export(&config.client()?, kind, &plan, format, output.as_deref()).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_copy_day() {
        let cli = Cli::try_parse_from(["coach", "routine", "copy-day", "12", "1", "3", "--yes"]).unwrap();
        match cli.command {
            Commands::Routine {
                command:
                    RoutineCommands::CopyDay {
                        plan,
                        source,
                        target,
                        yes,
                    },
            } => {
                assert_eq!(plan, "12");
                assert_eq!((source, target), (1, 3));
                assert!(yes);
            }
            _ => panic!("expected routine copy-day"),
        }
    }

    #[test]
    fn parses_kind_and_format() {
        let cli = Cli::try_parse_from(["coach", "export", "dieta", "7", "--format", "xlsx"]).unwrap();
        match cli.command {
            Commands::Export { kind, format, .. } => {
                assert_eq!(kind, PlanKind::Diet);
                assert_eq!(format, ExportFormat::Excel);
            }
            _ => panic!("expected export"),
        }
        assert!(Cli::try_parse_from(["coach", "template", "list", "meal"]).is_err());
    }

    #[test]
    fn rejects_bad_dates() {
        let res = Cli::try_parse_from([
            "coach", "client", "create", "--name", "Ana", "--email", "a@b.co", "--birth-date",
            "31/12/1990", "--height", "1.7", "--goal", "Tonificar",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn core_errors_use_coach_wording() {
        let err = anyhow::Error::new(CoreError::Api(ApiError::Auth("expired".into())));
        assert_eq!(error_text(&err), coach_core::message::SESSION_EXPIRED);
        let err = anyhow::Error::new(ApiError::NotFound("Rutina not found".into()));
        assert_eq!(error_text(&err), "Rutina not found");
        let err = anyhow::anyhow!("plain failure");
        assert_eq!(error_text(&err), "plain failure");
    }
}
