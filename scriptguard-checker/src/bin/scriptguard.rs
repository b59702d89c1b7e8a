//! SCRIPTGUARD CLI entry point.
//!
//! Reads one script from a file or stdin, checks it under the default
//! policy or a policy file, and reports the verdict.
//!
//! Exit codes: 0 accepted, 1 rejected, 2 usage or policy error.
//! The check has no timeout of its own; wrap the process in one when the
//! input size is not bounded upstream.

use clap::{Parser, ValueEnum};
use scriptguard_checker::{
    init_tracing, AnonymousFunctionChecker, Checker, ConfigError, LogFormat, ModuleFunctionChecker, PolicyFile,
    SanitizerError, SanitizerOptions, SingleExpressionChecker, StatementChecker, StatementListChecker,
};
use scriptguard_core::ListenerRegistry;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Failed to read {}: {source}", .path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to write verdict: {0}")]
    Output(#[from] serde_json::Error),
}

/// Pre-execution gate for untrusted JavaScript.
#[derive(Debug, Parser)]
#[command(name = "scriptguard", version, about)]
struct Cli {
    /// Policy file (TOML) applied on top of the default policy.
    #[arg(long, short)]
    policy: Option<PathBuf>,

    /// Which shape the script must have.
    #[arg(long, short, value_enum, default_value_t = CheckerKind::Expression)]
    checker: CheckerKind,

    /// Fewest statements allowed by `statement-list`.
    #[arg(long)]
    min_count: Option<usize>,

    /// Most statements allowed by `statement-list`.
    #[arg(long)]
    max_count: Option<usize>,

    /// Exact parameter count required by `anonymous-function`.
    #[arg(long)]
    parameter_count: Option<usize>,

    /// Print the verdict as JSON.
    #[arg(long)]
    json: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Script to check; `-` or nothing reads stdin.
    input: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CheckerKind {
    Expression,
    Statement,
    StatementList,
    AnonymousFunction,
    ModuleFunction,
}

impl Cli {
    fn checker(&self, options: Arc<SanitizerOptions>) -> Box<dyn Checker> {
        match self.checker {
            CheckerKind::Expression => Box::new(SingleExpressionChecker::with_options(options)),
            CheckerKind::Statement => Box::new(StatementChecker::with_options(options)),
            CheckerKind::StatementList => {
                let mut checker = StatementListChecker::with_options(options);
                if let Some(min_count) = self.min_count {
                    checker = checker.min_count(min_count);
                }
                if let Some(max_count) = self.max_count {
                    checker = checker.max_count(max_count);
                }
                Box::new(checker)
            }
            CheckerKind::AnonymousFunction => {
                let mut checker = AnonymousFunctionChecker::with_options(options);
                if let Some(parameter_count) = self.parameter_count {
                    checker = checker.parameter_count(parameter_count);
                }
                Box::new(checker)
            }
            CheckerKind::ModuleFunction => Box::new(ModuleFunctionChecker::with_options(options)),
        }
    }
}

fn load_options(policy: Option<&Path>) -> Result<Arc<SanitizerOptions>, CliError> {
    match policy {
        Some(path) => {
            let options = PolicyFile::from_path(path)?.into_options(&ListenerRegistry::with_defaults())?;
            Ok(Arc::new(options))
        }
        None => Ok(SanitizerOptions::default_options()),
    }
}

fn read_input(input: Option<&Path>) -> Result<String, CliError> {
    let mut source = String::new();
    match input {
        Some(path) if path != Path::new("-") => {
            source = std::fs::read_to_string(path).map_err(|source| CliError::Input {
                path: path.to_path_buf(),
                source,
            })?;
        }
        _ => {
            io::stdin()
                .read_to_string(&mut source)
                .map_err(|source| CliError::Input {
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
        }
    }
    Ok(source)
}

fn report(verdict: &Result<(), SanitizerError>, json: bool) -> Result<(), CliError> {
    match (verdict, json) {
        (Ok(()), false) => println!("accepted"),
        (Ok(()), true) => println!("{}", serde_json::json!({ "accepted": true })),
        (Err(error), false) => {
            println!("rejected: {error}");
            if let Some(context) = error.context() {
                println!("{context}");
            }
        }
        (Err(error), true) => {
            let body = serde_json::json!({ "accepted": false, "error": error.diagnostic() });
            println!("{}", serde_json::to_string(&body)?);
        }
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<bool, CliError> {
    let options = load_options(cli.policy.as_deref())?;
    let source = read_input(cli.input.as_deref())?;
    tracing::debug!(policy = options.name(), checker = ?cli.checker, "checking script");

    let verdict = cli.checker(options).validate_source(Some(&source)).map(|_| ());
    report(&verdict, cli.json)?;
    Ok(verdict.is_ok())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(error) = init_tracing(cli.log_format) {
        eprintln!("warning: logging disabled: {error}");
    }

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(error) => {
            tracing::error!(error = %error, "scriptguard failed");
            eprintln!("error: {error}");
            ExitCode::from(2)
        }
    }
}
