// gradebook CLI - parse report exports into summaries

mod classify;
mod exit_codes;
mod parse;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use gradebook_config::{ConfigError, IgnoreList, Settings};
use gradebook_report::Layout;

use exit_codes::{EXIT_CONFIG, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "gradebook")]
#[command(about = "Parse school gradebook report exports (xls/xlsx) into summaries")]
#[command(version)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Settings file (default: <config dir>/gradebook/settings.toml)
    #[arg(long, global = true, env = "GRADEBOOK_SETTINGS")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a batch of report files of one layout
    #[command(after_help = "\
Examples:
  gradebook parse semester 5a_I.xls 5a_II.xls
  gradebook parse period reports/*.xlsx --sort
  gradebook parse group math_7a.xlsx --json --anonymize

Files that cannot be used are listed with the reason and skipped.
Exit code 3 means no file produced a usable summary.")]
    Parse {
        /// Report layout of every file in the batch
        layout: LayoutArg,

        /// Report files, processed in the given order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Order accepted summaries chronologically
        #[arg(long)]
        sort: bool,

        /// Replace pupil names with consistent pseudonyms
        #[arg(long)]
        anonymize: bool,

        /// Skip per-subject marks (averages and attendance only)
        #[arg(long)]
        no_subjects: bool,

        /// Subject ignore-list (default: from settings)
        #[arg(long)]
        ignore_list: Option<PathBuf>,
    },

    /// Show whether subject names are counted or ignored
    #[command(after_help = "\
Examples:
  gradebook classify 'Matematika' 'Matematikos modulis' 'Dorinis ugdymas (etika)'
  gradebook classify Informatika --ignore-list ~/ignored.txt --json")]
    Classify {
        /// Subject names as they appear in the reports
        #[arg(required = true)]
        names: Vec<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Subject ignore-list (default: from settings)
        #[arg(long)]
        ignore_list: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    /// "Mokinių pasiekimų ir lankomumo suvestinė" (term reports)
    Semester,
    /// "Mokinių vidurkių suvestinė" (custom date range)
    Period,
    /// "Ataskaita pagal grupę" (one subject group, dated marks)
    Group,
}

impl From<LayoutArg> for Layout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Semester => Layout::Semester,
            LayoutArg::Period => Layout::Period,
            LayoutArg::Group => Layout::Group,
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(if e.use_stderr() { EXIT_USAGE } else { EXIT_SUCCESS });
        }
    };

    let result = load_settings(cli.settings.as_deref()).and_then(|settings| {
        init_logging(cli.verbose, &settings);
        match cli.command {
            Commands::Parse { layout, files, json, sort, anonymize, no_subjects, ignore_list } => {
                let options = parse::ParseArgs { json, sort, anonymize, no_subjects };
                let ignore_list = load_ignore_list(ignore_list.as_deref(), &settings)?;
                parse::cmd_parse(layout.into(), files, options, &settings, ignore_list)
            }
            Commands::Classify { names, json, ignore_list } => {
                let ignore_list = load_ignore_list(ignore_list.as_deref(), &settings)?;
                classify::cmd_classify(names, json, ignore_list)
            }
        }
    });

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

/// `-v` flags win over `RUST_LOG`, which wins over `log_level` in settings.
fn init_logging(verbose: u8, settings: &Settings) {
    let mut builder = match verbose {
        0 => env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(settings.log_level.as_str()),
        ),
        n => {
            let level = match n {
                1 => "info",
                2 => "debug",
                _ => "trace",
            };
            let mut builder = env_logger::Builder::new();
            builder.parse_filters(level);
            builder
        }
    };
    builder.format_timestamp(None).init();
}

fn load_settings(path: Option<&Path>) -> Result<Settings, CliError> {
    match path {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .map_err(CliError::config)
}

fn load_ignore_list(explicit: Option<&Path>, settings: &Settings) -> Result<IgnoreList, CliError> {
    let path = explicit.map(Path::to_path_buf).unwrap_or_else(|| settings.ignore_list_path());
    let list = IgnoreList::load(&path).map_err(CliError::config)?;
    log::debug!("ignore-list {}: {} filters", path.display(), list.len());
    Ok(list)
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(EXIT_ERROR, msg)
    }

    pub fn config(err: ConfigError) -> Self {
        let hint = match &err {
            ConfigError::Parse { .. } => Some("check the file against the documented settings keys".to_string()),
            _ => None,
        };
        Self { code: EXIT_CONFIG, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
