//! `tally_cli` argument handling and command dispatch.

mod commands;
pub mod output;

use std::{path::PathBuf, process::ExitCode};

use tally_config::{ClassifierConfig, Config, ConfigManager};
use tally_core::{ClassifierService, ClassifierSettings};
use tally_storage_json::JsonStore;

use crate::errors::TallyError;

pub const USAGE: &str = "Usage: tally_cli [--config <file>] [--no-color] <command>\n\
Commands:\n  \
check [snapshot.json]\n  \
adjust [snapshot.json]\n  \
classify <amount> <description...> [--chart <file|->] [--customers <file>] [--vendors <file>]\n           \
[--date YYYY-MM-DD] [--suggestion <file>]\n  \
chart <generated.json> [--save]\n  \
customers <generated.json> [--save]\n  \
vendors <generated.json> [--save]\n  \
config <show|backups|backup [note...]|restore <name>>\n  \
depreciate <cost> <purchase-date> <asset-class|years> [--as-of YYYY-MM-DD]\n  \
version\n  \
help";

/// How a successful command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Unbalanced,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::Unbalanced => ExitCode::from(1),
        }
    }
}

/// Global options plus the command and its remaining arguments.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Invocation {
    pub config_path: Option<PathBuf>,
    pub no_color: bool,
    pub command: Option<String>,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn parse<I>(args: I) -> Result<Self, TallyError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut invocation = Invocation::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let path = args
                        .next()
                        .ok_or_else(|| TallyError::Usage("--config needs a file path".into()))?;
                    invocation.config_path = Some(PathBuf::from(path));
                }
                "--no-color" => invocation.no_color = true,
                _ if invocation.command.is_none() => invocation.command = Some(arg),
                _ => invocation.args.push(arg),
            }
        }
        Ok(invocation)
    }
}

/// Loaded configuration shared by every command.
pub struct CliContext {
    pub config: Config,
    pub manager: ConfigManager,
}

impl CliContext {
    /// `amount` followed by the configured currency code.
    pub fn money(&self, amount: impl std::fmt::Display) -> String {
        format!("{amount} {}", self.config.currency)
    }

    pub fn store(&self) -> Result<JsonStore, TallyError> {
        Ok(JsonStore::new(self.config.resolve_data_root())?)
    }

    pub fn classifier(&self) -> ClassifierService {
        ClassifierService::new(classifier_settings(&self.config.classifier))
    }
}

pub fn classifier_settings(config: &ClassifierConfig) -> ClassifierSettings {
    ClassifierSettings {
        cash_label: config.cash_label.clone(),
        revenue_label: config.revenue_label.clone(),
        expense_label: config.expense_label.clone(),
        chart_excerpt_limit: config.chart_excerpt_limit,
        entity_excerpt_limit: config.entity_excerpt_limit,
    }
}

/// Runs the CLI. Exit codes: 0 success, 1 unbalanced `check`, 2 any error.
pub fn run_cli<I>(args: I) -> ExitCode
where
    I: IntoIterator<Item = String>,
{
    match execute(args) {
        Ok(outcome) => outcome.into(),
        Err(err) => {
            if matches!(err, TallyError::Usage(_)) {
                eprintln!("{USAGE}");
            }
            output::error(&err);
            ExitCode::from(2)
        }
    }
}

fn execute<I>(args: I) -> Result<Outcome, TallyError>
where
    I: IntoIterator<Item = String>,
{
    let invocation = Invocation::parse(args)?;
    let manager = match &invocation.config_path {
        Some(path) => ConfigManager::for_file(path),
        None => ConfigManager::default_location(),
    };
    let config = manager.load()?;
    output::set_color_enabled(config.ui_color_enabled && !invocation.no_color);

    let context = CliContext { config, manager };
    let Some(command) = invocation.command.as_deref() else {
        return Err(TallyError::Usage("missing command".into()));
    };
    tracing::debug!(command, "dispatching command");

    let args = invocation.args;
    match command {
        "check" => commands::check(&context, &args),
        "adjust" => commands::adjust(&context, &args),
        "classify" => commands::classify(&context, args),
        "chart" => commands::chart(&context, args),
        "customers" => commands::customers(&context, args),
        "vendors" => commands::vendors(&context, args),
        "config" => commands::config(&context, args),
        "depreciate" => commands::depreciate(&context, args),
        "version" => commands::version(),
        "help" | "--help" | "-h" => {
            println!("{USAGE}");
            Ok(Outcome::Success)
        }
        other => Err(TallyError::Usage(format!("unknown command `{other}`"))),
    }
}
