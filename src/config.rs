use crate::deal::DealVariant;
use color_eyre::eyre::{
    Result,
    eyre,
};
use std::path::PathBuf;

pub const DEFAULT_STATE_FILE: &str = "~/.cardgame/session.json";
pub const DEFAULT_LOG_DIR: &str = "~/.cardgame/logs";
pub const DEFAULT_MAX_COUNT: u32 = 30;
pub const DEFAULT_MAX_SEED: u32 = 9999;

/// Upper bounds of the setup sliders.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SetupBounds {
    pub max_count: u32,
    pub max_seed: u32,
}

impl Default for SetupBounds {
    fn default() -> Self {
        Self {
            max_count: DEFAULT_MAX_COUNT,
            max_seed: DEFAULT_MAX_SEED,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RunMode {
    Interactive,
    /// Deal once and print; optionally pick a fresh count and seed first.
    Print {
        select: Option<(u32, u32)>,
        html: Option<PathBuf>,
        /// Card descriptors as JSON instead of the text listing.
        json: bool,
    },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AppConfig {
    pub state_file: PathBuf,
    pub log_dir: PathBuf,
    pub variant: DealVariant,
    pub bounds: SetupBounds,
    pub mode: RunMode,
}

pub enum ParsedArgs {
    Run(AppConfig),
    Help,
}

pub fn usage() -> String {
    format!(
        "Usage: cardgame [--state-file <path>] [--log-dir <path>] [--classic]\n\
         [--max-count <n>] [--max-seed <n>]\n\
         [--print [--count <n> --seed <n>] [--html <path>] [--json]]\n\
         \n\
         Flags:\n\
           --state-file <path> Where count, seed and iteration are kept (default {})\n\
           --log-dir <path>    Directory for the rolling log file (default {})\n\
           --classic           Deal without the hourglass card\n\
           --max-count <n>     Largest card count offered at setup (default {})\n\
           --max-seed <n>      Largest seed offered at setup (default {})\n\
           --print             Deal the next table to stdout instead of opening the UI\n\
           --count <n>         With --print: start a new session with this many cards\n\
           --seed <n>          With --print: seed for the new session\n\
           --html <path>       With --print: also write the table as an HTML page\n\
           --json              With --print: print the cards as JSON",
        DEFAULT_STATE_FILE, DEFAULT_LOG_DIR, DEFAULT_MAX_COUNT, DEFAULT_MAX_SEED,
    )
}

pub fn expand_path(raw: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(raw)
        .map_err(|e| eyre!("Failed to expand path {raw}: {e}"))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

fn parse_number(flag: &str, value: Option<String>) -> Result<u32> {
    let value = value.ok_or_else(|| eyre!("{flag} requires a number argument"))?;
    value
        .parse::<u32>()
        .map_err(|_| eyre!("{flag} expects a non-negative integer, got {value}"))
}

fn set_once<T>(slot: &mut Option<T>, flag: &str, value: T) -> Result<()> {
    if slot.is_some() {
        return Err(eyre!("{flag} may only be specified once"));
    }
    *slot = Some(value);
    Ok(())
}

/// Parses arguments (without the program name).
pub fn parse_args<I>(args: I) -> Result<ParsedArgs>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut state_file: Option<String> = None;
    let mut log_dir: Option<String> = None;
    let mut variant = DealVariant::Hourglass;
    let mut bounds = SetupBounds::default();
    let mut print = false;
    let mut count: Option<u32> = None;
    let mut seed: Option<u32> = None;
    let mut html: Option<String> = None;
    let mut json = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--state-file" => {
                let path = args
                    .next()
                    .ok_or_else(|| eyre!("--state-file requires a path argument"))?;
                set_once(&mut state_file, "--state-file", path)?;
            }
            "--log-dir" => {
                let path = args
                    .next()
                    .ok_or_else(|| eyre!("--log-dir requires a path argument"))?;
                set_once(&mut log_dir, "--log-dir", path)?;
            }
            "--classic" => variant = DealVariant::Classic,
            "--max-count" => {
                bounds.max_count = parse_number("--max-count", args.next())?;
                if bounds.max_count == 0 {
                    return Err(eyre!("--max-count must be at least 1"));
                }
            }
            "--max-seed" => bounds.max_seed = parse_number("--max-seed", args.next())?,
            "--print" => print = true,
            "--count" => {
                let n = parse_number("--count", args.next())?;
                if n == 0 {
                    return Err(eyre!("--count must be at least 1"));
                }
                set_once(&mut count, "--count", n)?;
            }
            "--seed" => {
                let n = parse_number("--seed", args.next())?;
                set_once(&mut seed, "--seed", n)?;
            }
            "--html" => {
                let path = args
                    .next()
                    .ok_or_else(|| eyre!("--html requires a path argument"))?;
                set_once(&mut html, "--html", path)?;
            }
            "--json" => json = true,
            "--help" | "-h" => return Ok(ParsedArgs::Help),
            other => return Err(eyre!("Unknown argument: {other}")),
        }
    }

    let mode = if print {
        let select = match (count, seed) {
            (Some(count), Some(seed)) => Some((count, seed)),
            (None, None) => None,
            _ => return Err(eyre!("--count and --seed must be given together")),
        };
        let html = html.as_deref().map(expand_path).transpose()?;
        RunMode::Print { select, html, json }
    } else {
        if count.is_some() || seed.is_some() || html.is_some() || json {
            return Err(eyre!("--count, --seed, --html and --json only apply with --print"));
        }
        RunMode::Interactive
    };

    Ok(ParsedArgs::Run(AppConfig {
        state_file: expand_path(state_file.as_deref().unwrap_or(DEFAULT_STATE_FILE))?,
        log_dir: expand_path(log_dir.as_deref().unwrap_or(DEFAULT_LOG_DIR))?,
        variant,
        bounds,
        mode,
    }))
}
