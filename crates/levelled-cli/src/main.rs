use std::io::{self, BufRead};
use std::process;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use levelled::options::{from_env, with_color, with_encoding, ENV_LEVEL};
use levelled::{new_logger_with_name, Encoding, Logger, LoggerError, Severity};

/// Structured logging with a runtime-adjustable threshold.
#[derive(Parser, Debug)]
#[command(name = "levelled")]
#[command(version)]
#[command(about = "Emit structured log events and change the threshold at runtime", long_about = None)]
struct Cli
{
    #[command(flatten)]
    logger: LoggerArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct LoggerArgs
{
    /// Name attached to every event
    #[arg(long, global = true, default_value = "")]
    name: String,
    /// Initial threshold: debug, info, warn, error, fatal or panic
    #[arg(long, global = true, env = ENV_LEVEL, default_value = levelled::LEVEL_INFO)]
    threshold: String,
    /// Event encoding: console or json
    #[arg(long, global = true, value_parser = Encoding::from_str)]
    encoding: Option<Encoding>,
    /// Disable ANSI colour
    #[arg(long, global = true, default_value_t = false)]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Commands
{
    /// Emit a single event
    Emit
    {
        /// Severity of the event
        #[arg(value_parser = Severity::from_str)]
        severity: Severity,
        /// Message text
        #[arg(required = true, trailing_var_arg = true)]
        message: Vec<String>,
    },
    /// Read commands from stdin: `level <name>`, `<severity> <message>`, `quit`
    Repl,
}

fn main()
{
    let cli = Cli::parse();

    let logger = match build_logger(&cli.logger) {
        Ok(logger) => logger,
        Err(LoggerError::InvalidInitialLevel { level, logger }) => {
            eprintln!("Unknown threshold {level:?}, using {}", logger.level());
            *logger
        }
        Err(e) => {
            eprintln!("Failed to build logger: {e}");
            process::exit(1);
        }
    };

    // Bare tracing macros outside the logger's scope (other threads, dependencies) use it too
    if let Err(e) = logger.install() {
        eprintln!("Failed to install logger: {e}");
        process::exit(1);
    }

    if let Err(e) = logger.in_scope(|| run_command(cli.command, &logger)) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn build_logger(args: &LoggerArgs) -> Result<Logger, LoggerError>
{
    let mut options = vec![from_env()];
    if let Some(encoding) = args.encoding {
        options.push(with_encoding(encoding));
    }
    if args.no_color {
        options.push(with_color(false));
    }

    new_logger_with_name(&args.name, &args.threshold, options)
}

fn run_command(command: Commands, logger: &Logger) -> io::Result<()>
{
    match command {
        Commands::Emit { severity, message } => {
            emit(logger, severity, &message.join(" "));
            Ok(())
        }
        Commands::Repl => {
            tracing::debug!(threshold = %logger.level(), "reading commands from stdin");
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                if !handle_line(logger, &line?) {
                    break;
                }
            }
            Ok(())
        }
    }
}

/// Apply one repl command. Returns `false` when the session should end.
fn handle_line(logger: &Logger, line: &str) -> bool
{
    let line = line.trim();
    let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    match command {
        "" => true,
        "quit" | "exit" => false,
        "level" => {
            match logger.change_level(rest) {
                Ok(()) => tracing::info!(threshold = rest, "threshold changed"),
                Err(e) => tracing::error!(error = %e, "threshold unchanged"),
            }
            true
        }
        _ => {
            match Severity::from_str(command) {
                Ok(severity) => emit(logger, severity, rest),
                Err(_) => tracing::warn!(command, "unknown command"),
            }
            true
        }
    }
}

fn emit(logger: &Logger, severity: Severity, message: &str)
{
    match severity {
        Severity::Fatal => logger.fatal(message),
        Severity::Panic => logger.panic(message),
        _ => logger.log(severity, message),
    }
}

#[cfg(test)]
mod tests
{
    use levelled::new_logger;
    use levelled::options::{with_error_output_paths, with_output_paths};

    use super::*;

    fn quiet_logger() -> Logger
    {
        new_logger("info", [with_output_paths(Vec::<String>::new()), with_error_output_paths(Vec::<String>::new())])
            .unwrap()
    }

    #[test]
    fn test_level_command_changes_threshold()
    {
        let logger = quiet_logger();
        assert!(handle_line(&logger, "level error"));
        assert_eq!(logger.level(), Severity::Error);
    }

    #[test]
    fn test_bad_level_command_keeps_threshold()
    {
        let logger = quiet_logger();
        assert!(handle_line(&logger, "level loud"));
        assert_eq!(logger.level(), Severity::Info);
    }

    #[test]
    fn test_quit_ends_session()
    {
        let logger = quiet_logger();
        assert!(!handle_line(&logger, "quit"));
        assert!(!handle_line(&logger, "  exit  "));
        assert!(handle_line(&logger, ""));
        assert!(handle_line(&logger, "info hello there"));
        assert!(handle_line(&logger, "shout hello"));
    }

    #[test]
    fn test_cli_parses_global_logger_flags()
    {
        let cli = Cli::try_parse_from([
            "levelled", "--name", "disk", "--encoding", "json", "emit", "warn", "disk", "almost", "full",
        ])
        .unwrap();
        assert_eq!(cli.logger.name, "disk");
        assert_eq!(cli.logger.encoding, Some(Encoding::Json));
        match cli.command {
            Commands::Emit { severity, message } => {
                assert_eq!(severity, Severity::Warn);
                assert_eq!(message, vec!["disk", "almost", "full"]);
            }
            Commands::Repl => panic!("Expected Emit"),
        }
    }

    #[test]
    fn test_threshold_flag_overrides_default()
    {
        let cli = Cli::try_parse_from(["levelled", "--threshold", "warn", "repl"]).unwrap();
        assert_eq!(cli.logger.threshold, "warn");
    }

    #[test]
    fn test_cli_rejects_unknown_severity()
    {
        assert!(Cli::try_parse_from(["levelled", "emit", "loud", "hi"]).is_err());
    }
}
