//! Clinic appointment CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use clinic_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use clinic_cli::commands::{
    AppContext, run_appointments, run_book, run_decision, run_doctors, run_init_db, run_register,
    run_stats, run_users,
};
use clinic_cli::logging::{LogConfig, LogFormat, init_logging};
use clinic_cli::summary::{
    print_appointment, print_appointments, print_doctors, print_init_report, print_stats,
    print_user, print_users,
};
use clinic_model::Action;
use clinic_persistence::PersistenceError;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(error) => {
            report_error(&error);
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let ctx = AppContext::open(&cli.db, cli.outbox.as_deref(), cli.log_data)?;
    match &cli.command {
        Command::InitDb => print_init_report(&run_init_db(&ctx)?),
        Command::Register(args) => print_user(&run_register(&ctx, args)?),
        Command::Doctors(args) => print_doctors(&run_doctors(&ctx, args)?),
        Command::Book(args) => print_appointment(&run_book(&ctx, args)?),
        Command::Approve(args) => print_appointment(&run_decision(&ctx, Action::Approve, args)?),
        Command::Reject(args) => print_appointment(&run_decision(&ctx, Action::Reject, args)?),
        Command::Cancel(args) => print_appointment(&run_decision(&ctx, Action::Cancel, args)?),
        Command::Appointments(args) => print_appointments(&run_appointments(&ctx, args)?),
        Command::Stats(args) => print_stats(&run_stats(&ctx, args)?),
        Command::Users(args) => print_users(&run_users(&ctx, args)?),
    }
    Ok(())
}

fn report_error(error: &anyhow::Error) {
    eprintln!("error: {error:#}");
    let persistence = error
        .chain()
        .find_map(|cause| cause.downcast_ref::<PersistenceError>());
    if let Some(hint) = persistence.and_then(PersistenceError::suggestion) {
        eprintln!("hint: {hint}");
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level_filter = match cli.log_level {
        Some(LogLevelArg::Error) => LevelFilter::ERROR,
        Some(LogLevelArg::Warn) => LevelFilter::WARN,
        Some(LogLevelArg::Info) => LevelFilter::INFO,
        Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
        Some(LogLevelArg::Trace) => LevelFilter::TRACE,
        None => cli.verbosity.tracing_level_filter(),
    };
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let mut config = LogConfig::default()
        .with_level(level_filter)
        .with_format(format)
        .with_timestamps(cli.log_timestamps)
        .with_log_file(cli.log_file.clone())
        .with_log_data(cli.log_data);
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
