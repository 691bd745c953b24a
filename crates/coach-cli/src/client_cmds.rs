//! CLI handlers for `coach client` subcommands.

use anyhow::Result;
use chrono::Local;

use coach_api::ApiClient;
use coach_api::endpoints::{clients, dashboard};
use coach_api::models::{Client, ClientUpdate, CoachDashboard, Id, NewClient};
use coach_core::CoreError;
use coach_core::validation::{self, ValidationError};

use crate::ClientCommands;
use crate::render::{self, at_midnight, date_or_dash};

pub async fn run_client_command(command: ClientCommands, api: &ApiClient) -> Result<()> {
    match command {
        ClientCommands::List => cmd_list(api).await,
        ClientCommands::Show { id } => cmd_show(api, id).await,
        ClientCommands::Create {
            name,
            email,
            birth_date,
            height,
            goal,
            billing_date,
        } => {
            let new = NewClient {
                name,
                email,
                birth_date: at_midnight(birth_date),
                height,
                goal,
                billing_date: billing_date.map(at_midnight),
            };
            cmd_create(api, new).await
        }
        ClientCommands::Update {
            id,
            name,
            email,
            height,
            goal,
            billing_date,
            notifications,
        } => {
            let update = ClientUpdate {
                name: name.map(|n| validation::sanitize(&n)),
                email: email.map(|e| e.trim().to_owned()),
                height,
                goal: goal.map(|g| validation::sanitize(&g)),
                billing_date: billing_date.map(at_midnight),
                notifications_enabled: notifications,
                ..Default::default()
            };
            cmd_update(api, id, update).await
        }
        ClientCommands::Delete { id } => {
            clients::delete_client(api, id).await?;
            println!("Client {id} deleted.");
            Ok(())
        }
    }
}

pub fn client_rows(list: &[Client]) -> Vec<Vec<String>> {
    list.iter()
        .map(|c| {
            vec![
                c.id.to_string(),
                c.name.clone(),
                c.email.clone(),
                c.goal.clone().unwrap_or_default(),
                date_or_dash(c.billing_date),
            ]
        })
        .collect()
}

async fn cmd_list(api: &ApiClient) -> Result<()> {
    let list = clients::list_clients(api).await?;
    if list.is_empty() {
        println!("No clients yet. Add one with `coach client create`.");
        return Ok(());
    }
    print!(
        "{}",
        render::table(&["ID", "Name", "Email", "Goal", "Billing"], &client_rows(&list))
    );
    Ok(())
}

fn print_client(c: &Client) {
    println!("Client {}: {}", c.id, c.name);
    println!("  Email:         {}", c.email);
    println!("  Born:          {}", date_or_dash(c.birth_date));
    match c.height {
        Some(h) => println!("  Height:        {h:.2} m"),
        None => println!("  Height:        -"),
    }
    println!("  Goal:          {}", c.goal.as_deref().unwrap_or("-"));
    println!("  Billing date:  {}", date_or_dash(c.billing_date));
    println!(
        "  Notifications: {}",
        if c.notifications_enabled { "on" } else { "off" }
    );
}

async fn cmd_show(api: &ApiClient, id: Id) -> Result<()> {
    let client = clients::get_client(api, id).await?;
    print_client(&client);
    Ok(())
}

async fn cmd_create(api: &ApiClient, mut new: NewClient) -> Result<()> {
    let today = Local::now().date_naive();
    validation::validate_new_client(&mut new, today).map_err(CoreError::Validation)?;
    let client = clients::create_client(api, &new).await?;
    println!("Client created.");
    println!();
    print_client(&client);
    Ok(())
}

fn validate_update(update: &ClientUpdate) -> Result<(), CoreError> {
    let mut errors: Vec<ValidationError> = Vec::new();
    if let Some(name) = &update.name {
        errors.extend(validation::validate_name("nombre", name).err());
    }
    if let Some(email) = &update.email {
        errors.extend(validation::validate_email("email", email).err());
    }
    if let Some(height) = update.height {
        errors.extend(validation::validate_height(height).err());
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(errors))
    }
}

async fn cmd_update(api: &ApiClient, id: Id, update: ClientUpdate) -> Result<()> {
    validate_update(&update)?;
    let client = clients::update_client(api, id, &update).await?;
    println!("Client updated.");
    println!();
    print_client(&client);
    Ok(())
}

pub fn dashboard_report(d: &CoachDashboard) -> String {
    let mut out = format!(
        "Clients:         {}\nActive routines: {}\n",
        d.total_clients, d.active_routines
    );
    if d.recent_clients.is_empty() {
        out.push_str("\nNo clients yet. Add one with `coach client create`.\n");
        return out;
    }
    let rows: Vec<Vec<String>> = d
        .recent_clients
        .iter()
        .map(|c| vec![c.id.to_string(), c.name.clone(), c.email.clone(), date_or_dash(c.created_at)])
        .collect();
    out.push_str("\nNewest clients:\n");
    out.push_str(&render::table(&["ID", "Name", "Email", "Added"], &rows));
    out
}

pub async fn cmd_coach_dashboard(api: &ApiClient) -> Result<()> {
    let overview = dashboard::get_coach_dashboard(api).await?;
    print!("{}", dashboard_report(&overview));
    Ok(())
}
