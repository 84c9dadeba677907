//! `ukg`: command-line front end for the UKG client core.
//!
//! Every command authenticates first, runs one operation, and prints the
//! JSON result to stdout.

mod telemetry;
mod transport;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tracing::debug;
use ukg_core::{
    Approval, Credentials, Entitlement, EntitlementsClient, LeaveRequest, LeaveWorkflow, Record,
    Session, Transport,
};

use crate::transport::UreqTransport;

#[derive(Parser, Debug)]
#[command(name = "ukg", about = "UKG workforce API client", version)]
struct Cli {
    /// Base URL of the UKG API
    #[arg(long, env = "UKG_BASE_URL", default_value = "http://127.0.0.1:8080")]
    base_url: String,
    #[arg(long, env = "UKG_APP_ID", default_value = "test_app")]
    app_id: String,
    #[arg(long, env = "UKG_APP_SECRET", default_value = "test_secret", hide_env_values = true)]
    app_secret: String,
    #[arg(long, env = "UKG_CLIENT_ID", default_value = "test_client")]
    client_id: String,
    /// Base URL of the union entitlements service
    #[arg(long, env = "ENTITLEMENTS_BASE_URL", default_value = "http://127.0.0.1:8081")]
    entitlements_url: String,
    /// Per-request timeout, in seconds
    #[arg(long, env = "UKG_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,
    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the API is up
    Health,
    /// List companies
    Companies,
    /// List or record timesheets
    #[command(subcommand)]
    Timesheets(TimesheetCommand),
    /// List, fetch, approve or reject time-off requests
    #[command(subcommand)]
    TimeOff(TimeOffCommand),
    /// List pay stubs
    PayStubs {
        #[arg(long)]
        employee_id: Option<String>,
    },
    /// Show an employee's union entitlements
    Entitlements { employee_id: String },
    /// Check a time-off request against union rules and approve it if eligible
    Leave(LeaveArgs),
}

#[derive(Subcommand, Debug)]
enum TimesheetCommand {
    List {
        #[arg(long)]
        employee_id: Option<String>,
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        end_date: Option<String>,
    },
    Create {
        #[arg(long)]
        employee_id: String,
        #[arg(long)]
        date: String,
        #[arg(long)]
        start_time: String,
        #[arg(long)]
        end_time: String,
    },
}

#[derive(Subcommand, Debug)]
enum TimeOffCommand {
    List {
        #[arg(long)]
        employee_id: Option<String>,
    },
    Get {
        id: String,
    },
    Approve(DecisionArgs),
    Reject(DecisionArgs),
}

#[derive(Args, Debug)]
struct DecisionArgs {
    id: String,
    #[arg(long)]
    by: Option<String>,
    #[arg(long)]
    notes: Option<String>,
}

impl DecisionArgs {
    fn approval(&self) -> Approval {
        Approval {
            approved_by: self.by.clone(),
            notes: self.notes.clone(),
        }
    }
}

#[derive(Args, Debug)]
struct LeaveArgs {
    /// Time-off request to approve
    #[arg(long)]
    request_id: String,
    #[arg(long)]
    employee_id: String,
    #[arg(long)]
    union_id: String,
    #[arg(long, default_value = "vacation")]
    leave_type: String,
    #[arg(long)]
    start_date: NaiveDate,
    #[arg(long)]
    end_date: NaiveDate,
    #[arg(long)]
    hours: f64,
    /// Date notice is measured from; defaults to today (UTC)
    #[arg(long)]
    today: Option<NaiveDate>,
    #[arg(long, default_value = "leave-workflow")]
    approver: String,
    /// Evaluate only; never approve
    #[arg(long)]
    dry_run: bool,
}

impl LeaveArgs {
    fn request(&self) -> LeaveRequest {
        LeaveRequest {
            request_id: self.request_id.clone(),
            employee_id: self.employee_id.clone(),
            union_id: self.union_id.clone(),
            leave_type: self.leave_type.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            hours: self.hours,
        }
    }
}

fn print(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn timesheet(employee_id: String, date: String, start_time: String, end_time: String) -> Record {
    let mut record = Record::new();
    record.insert("employee_id".to_string(), Value::String(employee_id));
    record.insert("date".to_string(), Value::String(date));
    record.insert("start_time".to_string(), Value::String(start_time));
    record.insert("end_time".to_string(), Value::String(end_time));
    record
}

/// Exit status when the leave workflow finds the request ineligible.
const NOT_ELIGIBLE: u8 = 2;

/// Run one command and return the process exit status.
fn run<T: Transport>(session: &Session<T>, cli: &Cli) -> anyhow::Result<u8> {
    match &cli.command {
        Command::Health => print(&session.health_check()?)?,
        Command::Companies => print(&session.list_companies()?)?,
        Command::Timesheets(TimesheetCommand::List {
            employee_id,
            start_date,
            end_date,
        }) => print(&session.get_timesheets(
            employee_id.as_deref(),
            start_date.as_deref(),
            end_date.as_deref(),
        )?)?,
        Command::Timesheets(TimesheetCommand::Create {
            employee_id,
            date,
            start_time,
            end_time,
        }) => {
            let record = timesheet(employee_id.clone(), date.clone(), start_time.clone(), end_time.clone());
            print(&session.create_timesheet(&record)?)?
        }
        Command::TimeOff(TimeOffCommand::List { employee_id }) => {
            print(&session.get_time_off_requests(employee_id.as_deref())?)?
        }
        Command::TimeOff(TimeOffCommand::Get { id }) => print(&session.get_time_off_request(id)?)?,
        Command::TimeOff(TimeOffCommand::Approve(args)) => {
            print(&session.approve_time_off_request(&args.id, &args.approval())?)?
        }
        Command::TimeOff(TimeOffCommand::Reject(args)) => {
            print(&session.reject_time_off_request(&args.id, &args.approval())?)?
        }
        Command::PayStubs { employee_id } => print(&session.get_pay_stubs(employee_id.as_deref())?)?,
        Command::Entitlements { employee_id } => {
            let service = EntitlementsClient::new(&cli.entitlements_url);
            let response = session.send(service.build_employee_entitlements(employee_id))?;
            let rows: Vec<Entitlement> = service.parse_list(response)?;
            print(&rows)?
        }
        Command::Leave(args) => {
            let request = args.request();
            let today = args.today.unwrap_or_else(|| Utc::now().date_naive());
            let workflow = LeaveWorkflow::new(
                session,
                EntitlementsClient::new(&cli.entitlements_url),
                args.approver.clone(),
            );
            let approved = if args.dry_run {
                let decision = workflow.decide(&request, today)?;
                print(&decision)?;
                decision.is_approved()
            } else {
                let outcome = workflow.run(&request, today)?;
                print(&outcome)?;
                outcome.approved
            };
            if !approved {
                return Ok(NOT_ELIGIBLE);
            }
        }
    }
    Ok(0)
}

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    telemetry::init(&cli.log_level)?;
    debug!(command = ?cli.command, "parsed command");

    let credentials = Credentials {
        app_id: cli.app_id.clone(),
        app_secret: cli.app_secret.clone(),
        client_id: cli.client_id.clone(),
    };
    let transport = UreqTransport::new(Duration::from_secs(cli.timeout_secs));
    let session = Session::connect(transport, &cli.base_url, &credentials)
        .with_context(|| format!("authenticating against {}", cli.base_url))?;

    run(&session, &cli).map(ExitCode::from)
}
