//! CarCare CLI - Command-line interface for the CarCare daemon

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9537";
/// Daemon error code for a reminder refused in Denied/Ephemeral
const PERMISSION_DENIED: i32 = 4002;

#[derive(Parser)]
#[command(name = "carcare")]
#[command(about = "CarCare maintenance tracker CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "CARCARE_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a completed maintenance task
    Add {
        /// Maintenance type tag (see `carcare catalog`)
        maintenance_type: String,

        /// Date performed (YYYY-MM-DD, default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Turn reminders on or off (default: on when notifications are permitted)
        #[arg(short, long)]
        remind: Option<bool>,

        /// Custom frequency in days
        #[arg(short, long)]
        frequency: Option<u32>,
    },

    /// List records, most recent first
    List {
        /// Only records of this type
        #[arg(short = 't', long = "type")]
        maintenance_type: Option<String>,
    },

    /// History and status of one type
    History { maintenance_type: String },

    /// Change a record's reminder flag or frequency
    Update {
        id: String,

        #[arg(short, long)]
        remind: Option<bool>,

        #[arg(short, long, conflicts_with = "clear_frequency")]
        frequency: Option<u32>,

        /// Fall back to the catalog frequency
        #[arg(long)]
        clear_frequency: bool,
    },

    /// Delete one record
    Delete { id: String },

    /// Delete every record
    Wipe {
        /// Skip the confirmation guard
        #[arg(long)]
        yes: bool,
    },

    /// Overall and per-type maintenance status
    Status,

    /// Turn reminders on or off for a record
    Remind { toggle: Toggle, id: String },

    /// Reminder housekeeping
    Reminders {
        #[command(subcommand)]
        command: RemindersCommand,
    },

    /// Notification permission
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },

    /// Maintenance types available for this vehicle
    Catalog,
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

#[derive(Subcommand)]
enum RemindersCommand {
    /// Cancel everything and turn every reminder flag off
    DisableAll,
    /// Show pending notifications
    Pending,
}

#[derive(Subcommand)]
enum AuthCommand {
    /// Show the current permission state
    Status,
    /// Ask for notification permission (only prompts once)
    Request,
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    result: Option<Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Tabled)]
struct RecordRow {
    id: String,
    #[tabled(rename = "type")]
    maintenance_type: String,
    performed: String,
    reminder: String,
    frequency: String,
}

impl RecordRow {
    fn from_json(record: &Value) -> Self {
        Self {
            id: text(&record["id"]),
            maintenance_type: text(&record["maintenance_type"]),
            performed: text(&record["performed_on"]),
            reminder: on_off(&record["reminder_enabled"]),
            frequency: record["custom_frequency_days"]
                .as_u64()
                .map(|d| format!("{}d (custom)", d))
                .unwrap_or_else(|| "catalog".to_string()),
        }
    }
}

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "type")]
    maintenance_type: String,
    status: String,
    last: String,
    #[tabled(rename = "next due")]
    next_due: String,
    #[tabled(rename = "in days")]
    days_until_due: String,
    reminder: String,
}

impl StatusRow {
    fn from_json(status: &Value) -> Self {
        Self {
            maintenance_type: text(&status["maintenance_type"]),
            status: text(&status["status"]),
            last: text(&status["last_performed"]),
            next_due: text(&status["next_due"]),
            days_until_due: text(&status["days_until_due"]),
            reminder: on_off(&status["reminder_enabled"]),
        }
    }
}

#[derive(Tabled)]
struct CatalogRow {
    #[tabled(rename = "type")]
    maintenance_type: String,
    name: String,
    #[tabled(rename = "every (days)")]
    frequency: String,
    #[tabled(rename = "reminders (days before)")]
    tiers: String,
}

#[derive(Tabled)]
struct PendingRow {
    identifier: String,
    #[tabled(rename = "type")]
    maintenance_type: String,
    #[tabled(rename = "days before")]
    tier_days: String,
    #[tabled(rename = "fires at (UTC)")]
    fire_at: String,
}

async fn call_rpc(url: &str, method: &str, params: Value) -> Result<Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        if error.code == PERMISSION_DENIED {
            anyhow::bail!(
                "{}. Reminder left off; enable notifications in system settings.",
                error.message
            );
        }
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

/// JSON value as display text, without quotes around strings
fn text(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn on_off(value: &Value) -> String {
    if value.as_bool().unwrap_or(false) {
        "on".to_string()
    } else {
        "off".to_string()
    }
}

fn colored_status(status: &str) -> ColoredString {
    match status {
        "UP_TO_DATE" => status.green().bold(),
        "DUE_SOON" => status.yellow().bold(),
        "DUE" => status.red().bold(),
        other => other.normal(),
    }
}

/// One-line summary of a reminder outcome
fn outcome_message(outcome: &Value) -> ColoredString {
    match outcome["outcome"].as_str().unwrap_or_default() {
        "scheduled" => format!("🔔 {} reminder(s) scheduled", outcome["count"]).green(),
        "cancelled" => "🔕 Reminders off".normal(),
        "overdue" => "⚠ Already due, no reminder scheduled".yellow(),
        "no_due_date" => "○ This type never comes due".normal(),
        "settings_required" => {
            "✗ Notifications are disabled. Enable them in system settings.".red()
        }
        "authorization_required" => {
            "✗ Notification permission not granted yet. Run `carcare auth request`.".yellow()
        }
        other => other.normal(),
    }
}

fn print_change(title: &str, change: &Value) {
    println!("{}", title.green().bold());
    println!();
    println!("{}", Table::new(vec![RecordRow::from_json(&change["record"])]));
    println!();
    if let Some(status) = change["type_status"].as_str() {
        println!("  {} {}", "Type status:".bold(), colored_status(status));
    }
    println!(
        "  {} {}",
        "Overall:".bold(),
        colored_status(change["overall"].as_str().unwrap_or_default())
    );
    println!("  {}", outcome_message(&change["reminder"]));
}

fn print_records(records: &Value) {
    let rows: Vec<RecordRow> = records
        .as_array()
        .map(|a| a.iter().map(RecordRow::from_json).collect())
        .unwrap_or_default();

    if rows.is_empty() {
        println!("{}", "No maintenance records".yellow());
    } else {
        println!("{}", Table::new(rows));
    }
}

fn print_auth(result: &Value) {
    let state = text(&result["state"]);
    let state = if result["permits_scheduling"].as_bool().unwrap_or(false) {
        state.green().bold()
    } else if result["requires_settings"].as_bool().unwrap_or(false) {
        state.red().bold()
    } else {
        state.yellow().bold()
    };
    println!("  {} {}", "Notifications:".bold(), state);
    if result["requires_settings"].as_bool().unwrap_or(false) {
        println!("  Only system settings can re-enable notifications.");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Add {
            maintenance_type,
            date,
            remind,
            frequency,
        } => {
            let params = json!({
                "maintenance_type": maintenance_type,
                "performed_on": date.unwrap_or_else(|| Local::now().date_naive()),
                "reminder_enabled": remind,
                "custom_frequency_days": frequency,
            });
            let change = call_rpc(&cli.rpc_url, "records.add.v1", params).await?;
            print_change("✓ Maintenance logged", &change);
        }

        Commands::List { maintenance_type } => {
            let params = json!({ "maintenance_type": maintenance_type });
            let result = call_rpc(&cli.rpc_url, "records.list.v1", params).await?;
            print_records(&result["records"]);
        }

        Commands::History { maintenance_type } => {
            let params = json!({ "maintenance_type": maintenance_type });
            let result = call_rpc(&cli.rpc_url, "records.history.v1", params).await?;

            println!("{}", format!("History of {}", maintenance_type).cyan().bold());
            println!();
            if result["status"].is_object() {
                println!("{}", Table::new(vec![StatusRow::from_json(&result["status"])]));
                println!();
            }
            print_records(&result["records"]);
        }

        Commands::Update {
            id,
            remind,
            frequency,
            clear_frequency,
        } => {
            let params = json!({
                "id": id,
                "reminder_enabled": remind,
                "custom_frequency_days": frequency,
                "clear_custom_frequency": clear_frequency,
            });
            let change = call_rpc(&cli.rpc_url, "records.update.v1", params).await?;
            print_change("✓ Record updated", &change);
        }

        Commands::Delete { id } => {
            let params = json!({ "id": id });
            let change = call_rpc(&cli.rpc_url, "records.delete.v1", params).await?;
            print_change(&format!("✓ Record {} deleted", id), &change);
        }

        Commands::Wipe { yes } => {
            if !yes {
                anyhow::bail!("Refusing to delete every record without --yes");
            }
            let result = call_rpc(&cli.rpc_url, "records.delete_all.v1", json!({})).await?;
            println!(
                "{}",
                format!("✓ {} record(s) deleted", result["deleted"]).green().bold()
            );
        }

        Commands::Status => {
            println!("{}", "Maintenance Status".cyan().bold());
            println!();

            match call_rpc(&cli.rpc_url, "status.get.v1", json!({})).await {
                Ok(report) => {
                    println!(
                        "  {} {}",
                        "Overall:".bold(),
                        colored_status(report["overall"].as_str().unwrap_or_default())
                    );
                    println!("  {} {}", "Vehicle:".bold(), text(&report["vehicle"]));
                    println!("  {} {}", "Records:".bold(), report["record_count"]);
                    println!("  {} {}", "Today:".bold(), text(&report["today"]));
                    println!();

                    let rows: Vec<StatusRow> = report["types"]
                        .as_array()
                        .map(|a| a.iter().map(StatusRow::from_json).collect())
                        .unwrap_or_default();
                    if !rows.is_empty() {
                        println!("{}", Table::new(rows));
                    }
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }

        Commands::Remind { toggle, id } => {
            let enabled = matches!(toggle, Toggle::On);
            let params = json!({ "id": id, "enabled": enabled });
            let change = call_rpc(&cli.rpc_url, "reminders.set.v1", params).await?;
            print_change("✓ Reminder updated", &change);
        }

        Commands::Reminders { command } => match command {
            RemindersCommand::DisableAll => {
                let result =
                    call_rpc(&cli.rpc_url, "reminders.disable_all.v1", json!({})).await?;
                println!(
                    "{}",
                    format!("✓ All reminders off ({} record(s) changed)", result["disabled"])
                        .green()
                        .bold()
                );
            }
            RemindersCommand::Pending => {
                let result = call_rpc(&cli.rpc_url, "reminders.pending.v1", json!({})).await?;
                let rows: Vec<PendingRow> = result["reminders"]
                    .as_array()
                    .map(|a| {
                        a.iter()
                            .map(|r| PendingRow {
                                identifier: text(&r["identifier"]),
                                maintenance_type: text(&r["maintenance_type"]),
                                tier_days: text(&r["tier_days"]),
                                fire_at: text(&r["fire_at"]),
                            })
                            .collect()
                    })
                    .unwrap_or_default();

                if rows.is_empty() {
                    println!("{}", "No pending reminders".yellow());
                } else {
                    println!("{}", Table::new(rows));
                }
            }
        },

        Commands::Auth { command } => {
            let method = match command {
                AuthCommand::Status => "auth.status.v1",
                AuthCommand::Request => "auth.request.v1",
            };
            let result = call_rpc(&cli.rpc_url, method, json!({})).await?;
            print_auth(&result);
        }

        Commands::Catalog => {
            let result = call_rpc(&cli.rpc_url, "catalog.list.v1", json!({})).await?;
            let rows: Vec<CatalogRow> = result["entries"]
                .as_array()
                .map(|a| {
                    a.iter()
                        .map(|e| CatalogRow {
                            maintenance_type: text(&e["maintenance_type"]),
                            name: text(&e["display_name"]),
                            frequency: text(&e["base_frequency_days"]),
                            tiers: e["reminder_tiers_days"]
                                .as_array()
                                .map(|t| t.iter().map(text).collect::<Vec<_>>().join(", "))
                                .unwrap_or_default(),
                        })
                        .collect()
                })
                .unwrap_or_default();

            println!(
                "{}",
                format!("Catalog ({})", text(&result["vehicle"])).cyan().bold()
            );
            println!("{}", Table::new(rows));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_remind_toggle() {
        let cli = Cli::try_parse_from(["carcare", "remind", "off", "rec-1"]).unwrap();
        match cli.command {
            Commands::Remind { toggle, id } => {
                assert!(matches!(toggle, Toggle::Off));
                assert_eq!(id, "rec-1");
            }
            _ => panic!("expected remind"),
        }
    }

    #[test]
    fn test_cli_parses_add_date() {
        let cli = Cli::try_parse_from([
            "carcare",
            "add",
            "replace_chain",
            "--date",
            "2025-03-14",
            "--remind",
            "true",
        ])
        .unwrap();
        match cli.command {
            Commands::Add { date, remind, .. } => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 14));
                assert_eq!(remind, Some(true));
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_frequency_conflicts_with_clear() {
        assert!(Cli::try_parse_from([
            "carcare",
            "update",
            "rec-1",
            "--frequency",
            "30",
            "--clear-frequency"
        ])
        .is_err());
    }

    #[test]
    fn test_record_row_from_json() {
        let row = RecordRow::from_json(&json!({
            "id": "rec-1",
            "maintenance_type": "replace_chain",
            "performed_on": "2025-01-01",
            "reminder_enabled": true,
            "custom_frequency_days": null,
        }));
        assert_eq!(row.maintenance_type, "replace_chain");
        assert_eq!(row.reminder, "on");
        assert_eq!(row.frequency, "catalog");
    }

    #[test]
    fn test_text_strips_quotes() {
        assert_eq!(text(&json!("DUE")), "DUE");
        assert_eq!(text(&json!(-3)), "-3");
        assert_eq!(text(&Value::Null), "-");
    }
}
