// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mensajero - courier shipment lifecycle tracker.
//!
//! `mensajero serve` runs the HTTP API; every other subcommand opens the
//! store, performs one operation and exits.

mod commands;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mensajero_config::MensajeroConfig;
use mensajero_core::MensajeroError;
use mensajero_tracking::{Logistics, ReportQuery};
use tracing::{error, warn};

use crate::commands::Printer;

/// Mensajero - courier shipment lifecycle tracker.
#[derive(Parser, Debug)]
#[command(name = "mensajero", version, about, long_about = None)]
struct Cli {
    /// Configuration file to use instead of the standard lookup.
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP API.
    Serve,
    /// Load shipments from a CSV or XLSX sheet.
    Import {
        file: PathBuf,
        /// csv or xlsx; inferred from the extension or contents when omitted.
        #[arg(long)]
        format: Option<String>,
    },
    /// Manage delivery zones.
    Zone {
        #[command(subcommand)]
        action: ZoneCommand,
    },
    /// Manage couriers.
    Courier {
        #[command(subcommand)]
        action: CourierCommand,
    },
    /// Manage pickup customers.
    Customer {
        #[command(subcommand)]
        action: CustomerCommand,
    },
    /// Assign shipments to a courier.
    Dispatch {
        #[arg(long)]
        courier: String,
        /// Tracking numbers, separately or comma-separated.
        #[arg(required = true, num_args = 1..)]
        tracking_numbers: Vec<String>,
    },
    /// Record the outcome of a dispatched shipment.
    Receive {
        tracking_number: String,
        /// delivered or returned.
        #[arg(long)]
        outcome: String,
        #[arg(long, default_value = "")]
        reason: String,
    },
    /// Log a pickup.
    Pickup {
        tracking_number: String,
        /// YYYY-MM-DD or "YYYY-MM-DD HH:MM:SS"; defaults to now.
        #[arg(long)]
        date: Option<String>,
        #[arg(long, default_value = "")]
        notes: String,
        #[arg(long)]
        customer: Option<String>,
    },
    /// Show the status of a tracking number.
    Status {
        tracking_number: String,
        #[arg(long)]
        json: bool,
    },
    /// Compute what a courier is owed for a date range.
    Settle {
        #[arg(long)]
        courier: String,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        json: bool,
    },
    /// Write a report to a spreadsheet file.
    Export {
        /// shipments, dispatches, receptions, pickups or settlement.
        report: String,
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
        /// xlsx or csv; inferred from the output extension when omitted.
        #[arg(long)]
        format: Option<String>,
        #[arg(long)]
        courier: Option<String>,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum ZoneCommand {
    /// Register a zone with its tariff per shipment.
    Add { name: String, tariff: String },
    List,
}

#[derive(Subcommand, Debug)]
enum CourierCommand {
    /// Register a courier in an existing zone.
    Add {
        name: String,
        #[arg(long)]
        zone: String,
    },
    List,
}

#[derive(Subcommand, Debug)]
enum CustomerCommand {
    Add { name: String },
    List,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => mensajero_config::load_and_validate_path(path),
        None => mensajero_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            mensajero_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.service.log_level);

    let result = match cli.command {
        Commands::Serve => serve::run_serve(config).await,
        command => run_once(&config, command, Printer::new(cli.plain)).await,
    };

    if let Err(e) = result {
        if !e.is_user_error() {
            error!(error = %e, "command failed");
        }
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run_once(
    config: &MensajeroConfig,
    command: Commands,
    printer: Printer,
) -> Result<(), MensajeroError> {
    let logistics = Logistics::open(config).await?;
    let result = execute(&logistics, command, &printer).await;
    let output = finish(result, logistics.shutdown().await)?;
    println!("{output}");
    Ok(())
}

/// The command's own outcome wins; a failed shutdown is only logged.
fn finish(
    result: Result<String, MensajeroError>,
    shutdown: Result<(), MensajeroError>,
) -> Result<String, MensajeroError> {
    if let Err(e) = shutdown {
        warn!(error = %e, "store shutdown failed");
    }
    result
}

async fn execute(
    logistics: &Logistics,
    command: Commands,
    printer: &Printer,
) -> Result<String, MensajeroError> {
    match command {
        Commands::Serve => Err(MensajeroError::Internal(
            "serve does not run as a one-shot command".into(),
        )),
        Commands::Import { file, format } => {
            commands::import(logistics, &file, format.as_deref(), printer).await
        }
        Commands::Zone { action } => match action {
            ZoneCommand::Add { name, tariff } => {
                commands::add_zone(logistics, &name, &tariff, printer).await
            }
            ZoneCommand::List => Ok(commands::list_zones(logistics)),
        },
        Commands::Courier { action } => match action {
            CourierCommand::Add { name, zone } => {
                commands::add_courier(logistics, &name, &zone, printer).await
            }
            CourierCommand::List => Ok(commands::list_couriers(logistics)),
        },
        Commands::Customer { action } => match action {
            CustomerCommand::Add { name } => commands::add_customer(logistics, &name, printer).await,
            CustomerCommand::List => commands::list_customers(logistics).await,
        },
        Commands::Dispatch {
            courier,
            tracking_numbers,
        } => commands::dispatch(logistics, &courier, &tracking_numbers, printer).await,
        Commands::Receive {
            tracking_number,
            outcome,
            reason,
        } => commands::receive(logistics, &tracking_number, &outcome, &reason, printer).await,
        Commands::Pickup {
            tracking_number,
            date,
            notes,
            customer,
        } => {
            commands::pickup(
                logistics,
                &tracking_number,
                date.as_deref(),
                &notes,
                customer.as_deref(),
                printer,
            )
            .await
        }
        Commands::Status {
            tracking_number,
            json,
        } => commands::status(logistics, &tracking_number, json, printer).await,
        Commands::Settle {
            courier,
            from,
            to,
            json,
        } => commands::settle(logistics, &courier, &from, &to, json).await,
        Commands::Export {
            report,
            out,
            format,
            courier,
            from,
            to,
        } => {
            let query = ReportQuery {
                courier,
                date_from: from,
                date_to: to,
            };
            commands::export(logistics, &report, &out, format.as_deref(), &query, printer).await
        }
    }
}

/// Logs go to stderr so `--json` output stays clean.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mensajero={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
