//! CLI argument definitions for the clinic tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use clinic_model::{AppointmentId, Role, UserId};

pub const DEFAULT_DB_PATH: &str = "doctor_appointment.json";

#[derive(Parser)]
#[command(
    name = "clinic",
    version,
    about = "Doctor appointment booking - accounts, bookings and approvals",
    long_about = "Manage doctor appointments from the command line.\n\n\
                  Patients book slots with doctors, doctors approve or reject them,\n\
                  and either side may cancel. Every change notifies the other party."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Prefix pretty and compact log lines with a timestamp.
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Allow email addresses to appear in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Database file.
    #[arg(long = "db", value_name = "PATH", default_value = DEFAULT_DB_PATH, global = true)]
    pub db: PathBuf,

    /// Append every notification to this file as a JSON line.
    #[arg(long = "outbox", value_name = "PATH", global = true)]
    pub outbox: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the database and the sample doctor and patient accounts.
    InitDb,

    /// Register a new account.
    Register(RegisterArgs),

    /// List doctors and their specializations.
    Doctors(DoctorsArgs),

    /// Request an appointment with a doctor.
    Book(BookArgs),

    /// Approve a requested appointment.
    Approve(DecisionArgs),

    /// Reject a requested appointment.
    Reject(DecisionArgs),

    /// Cancel a requested or approved appointment.
    Cancel(DecisionArgs),

    /// Show the appointments visible to an account.
    Appointments(ActorArgs),

    /// Show account and appointment counts (admins only).
    Stats(ActorArgs),

    /// List every doctor or every patient account (admins only).
    Users(UsersArgs),
}

#[derive(Args)]
pub struct RegisterArgs {
    /// Display name.
    #[arg(long = "name")]
    pub name: String,

    /// Contact email (must be unique).
    #[arg(long = "email")]
    pub email: String,

    /// Account role.
    #[arg(long = "role", value_enum, default_value = "patient")]
    pub role: RoleArg,

    /// Medical specialization (doctors only).
    #[arg(long = "specialization")]
    pub specialization: Option<String>,
}

#[derive(Args)]
pub struct DoctorsArgs {
    /// Only list doctors with this specialization.
    #[arg(long = "specialization")]
    pub specialization: Option<String>,
}

#[derive(Args)]
pub struct ActorArgs {
    /// Email of the account performing the command.
    #[arg(long = "as", value_name = "EMAIL")]
    pub actor: String,
}

#[derive(Args)]
pub struct UsersArgs {
    #[command(flatten)]
    pub actor: ActorArgs,

    /// Which accounts to list.
    #[arg(long = "role", value_enum)]
    pub role: ListRoleArg,
}

#[derive(Args)]
pub struct BookArgs {
    #[command(flatten)]
    pub actor: ActorArgs,

    /// Doctor account id.
    #[arg(long = "doctor", value_name = "ID")]
    pub doctor: UserId,

    /// Appointment date (YYYY-MM-DD).
    #[arg(long = "date")]
    pub date: String,

    /// Appointment time (HH:MM).
    #[arg(long = "time")]
    pub time: String,

    /// Reason for the visit.
    #[arg(long = "reason")]
    pub reason: Option<String>,

    /// Book on behalf of this patient (admins only; defaults to the actor).
    #[arg(long = "patient", value_name = "EMAIL")]
    pub patient: Option<String>,
}

#[derive(Args)]
pub struct DecisionArgs {
    #[command(flatten)]
    pub actor: ActorArgs,

    /// Appointment id.
    #[arg(value_name = "APPOINTMENT_ID")]
    pub appointment: AppointmentId,
}

/// CLI role choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Patient,
    Doctor,
    Admin,
}

impl From<RoleArg> for Role {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Patient => Role::Patient,
            RoleArg::Doctor => Role::Doctor,
            RoleArg::Admin => Role::Admin,
        }
    }
}

/// Account kinds that can be listed with `users`.
#[derive(Clone, Copy, ValueEnum)]
pub enum ListRoleArg {
    Doctor,
    Patient,
}

impl From<ListRoleArg> for Role {
    fn from(value: ListRoleArg) -> Self {
        match value {
            ListRoleArg::Doctor => Role::Doctor,
            ListRoleArg::Patient => Role::Patient,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
