// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use fleet_maint_api::{
    AuthenticatedActor, CreatePlanRequest, DuplicatePlanRequest, ListPlansRequest,
    ListWorkOrdersRequest, create_plan, duplicate_plan, list_plans, list_work_orders,
    predict_next_maintenance,
};
use fleet_maint_audit::Cause;
use fleet_maint_domain::{DomainError, UsageCounters, UserRole, Vehicle, WorkOrderStatus};
use fleet_maint_persistence::SqlitePersistence;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// Fleet maintenance planning and work-order engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Tenant to operate in.
    #[arg(short, long, default_value_t = 1)]
    tenant: i64,

    /// User the actions are attributed to.
    #[arg(short, long, default_value_t = 1)]
    user: i64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Predict the next maintenance of a vehicle.
    Predict {
        /// The vehicle to predict for.
        vehicle_id: i64,
    },
    /// Manage maintenance plans.
    #[command(subcommand)]
    Plans(PlanCommands),
    /// Manage vehicles.
    #[command(subcommand)]
    Vehicles(VehicleCommands),
    /// Inspect work orders.
    #[command(subcommand, name = "work-orders")]
    WorkOrders(WorkOrderCommands),
}

#[derive(Subcommand, Debug)]
enum PlanCommands {
    /// List plans.
    List {
        /// Only plans targeting this vehicle type.
        #[arg(long)]
        vehicle_type: Option<String>,
        /// Only active (`true`) or inactive (`false`) plans.
        #[arg(long)]
        active: Option<bool>,
    },
    /// Create a plan from a JSON file of already-parsed plan data.
    Import {
        /// Path to the JSON plan.
        file: PathBuf,
    },
    /// Copy a plan under a new identity, inactive.
    Duplicate {
        /// The plan to copy.
        plan_id: i64,
        /// Name of the copy.
        #[arg(long)]
        name: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum VehicleCommands {
    /// Register a vehicle.
    Register {
        /// License plate.
        plate: String,
        /// Vehicle type used for plan matching.
        #[arg(long = "type")]
        vehicle_type: String,
        /// Current odometer reading in kilometers.
        #[arg(long, default_value_t = 0.0)]
        odometer: f64,
        /// Current hourmeter reading in engine hours.
        #[arg(long, default_value_t = 0.0)]
        hourmeter: f64,
        /// Plan to pin the vehicle to.
        #[arg(long)]
        plan_id: Option<i64>,
    },
    /// List vehicles.
    List,
}

#[derive(Subcommand, Debug)]
enum WorkOrderCommands {
    /// List work orders, newest first.
    List {
        /// Only orders of this vehicle.
        #[arg(long)]
        vehicle_id: Option<i64>,
        /// Only orders in this status (PENDING, IN_PROGRESS, COMPLETED, CANCELLED).
        #[arg(long)]
        status: Option<String>,
    },
}

fn to_json<T: Serialize>(value: &T) -> Result<String, Box<dyn std::error::Error>> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn cli_cause(action: &str) -> Cause {
    Cause::new(format!("cli-{action}"), format!("Command-line {action}"))
}

/// Runs one command and returns its JSON output.
fn run(
    persistence: &mut SqlitePersistence,
    args: &Args,
) -> Result<String, Box<dyn std::error::Error>> {
    let actor: AuthenticatedActor =
        AuthenticatedActor::new(args.tenant, args.user, UserRole::Admin);

    match &args.command {
        Commands::Predict { vehicle_id } => {
            to_json(&predict_next_maintenance(persistence, *vehicle_id, &actor)?)
        }
        Commands::Plans(PlanCommands::List {
            vehicle_type,
            active,
        }) => {
            let request: ListPlansRequest = ListPlansRequest {
                vehicle_type: vehicle_type.clone(),
                is_active: *active,
            };
            to_json(&list_plans(persistence, &request, &actor)?)
        }
        Commands::Plans(PlanCommands::Import { file }) => {
            let contents: String = std::fs::read_to_string(file)?;
            let request: CreatePlanRequest = serde_json::from_str(&contents)?;
            info!(file = %file.display(), name = %request.name, "Importing plan");
            to_json(&create_plan(persistence, &request, &actor, cli_cause("import"))?)
        }
        Commands::Plans(PlanCommands::Duplicate { plan_id, name }) => {
            let request: DuplicatePlanRequest = DuplicatePlanRequest { name: name.clone() };
            to_json(&duplicate_plan(
                persistence,
                *plan_id,
                &request,
                &actor,
                cli_cause("duplicate"),
            )?)
        }
        Commands::Vehicles(VehicleCommands::Register {
            plate,
            vehicle_type,
            odometer,
            hourmeter,
            plan_id,
        }) => {
            let vehicle_id: i64 = persistence.register_vehicle(
                args.tenant,
                plate,
                vehicle_type,
                UsageCounters::new(*odometer, *hourmeter),
                *plan_id,
            )?;
            let vehicle: Option<Vehicle> = persistence.get_vehicle(args.tenant, vehicle_id)?;
            to_json(&vehicle.ok_or(DomainError::VehicleNotFound(vehicle_id))?)
        }
        Commands::Vehicles(VehicleCommands::List) => {
            to_json(&persistence.list_vehicles(args.tenant)?)
        }
        Commands::WorkOrders(WorkOrderCommands::List { vehicle_id, status }) => {
            let status: Option<WorkOrderStatus> =
                status.as_deref().map(str::parse).transpose()?;
            let request: ListWorkOrdersRequest = ListWorkOrdersRequest {
                vehicle_id: *vehicle_id,
                status,
            };
            to_json(&list_work_orders(persistence, &request, &actor)?)
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut persistence: SqlitePersistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path.display());
        SqlitePersistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqlitePersistence::new_in_memory()?
    };

    let output: String = run(&mut persistence, &args)?;
    println!("{output}");
    Ok(())
}
