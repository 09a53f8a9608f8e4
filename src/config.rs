use std::env;
use std::path::PathBuf;

use clap::Parser;

/// Environment variable naming the API module file.
pub const APIPATH_ENV: &str = "ANIDBSH_APIPATH";

/// Compiled-in fallback when neither flag nor environment names a module.
pub const DEFAULT_API_PATH: &str = "../api/http.lua";

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

#[derive(Parser)]
#[command(author, version, about = "AniDB command interpreter")]
pub struct Cli {
    /// Path to the API module (overrides ANIDBSH_APIPATH)
    #[arg(short, long)]
    pub api_path: Option<String>,

    /// Run a single search against the API module and exit
    #[arg(long, value_name = "TERM")]
    pub search: Option<String>,

    /// Fetch details for an anime id and exit
    #[arg(long, value_name = "AID")]
    pub info: Option<i64>,

    /// Enable debug output
    #[arg(short, long)]
    pub debug: bool,

    /// Enable trace output (extremely verbose)
    #[arg(short, long)]
    pub trace: bool,
}

/// Resolve the module path: explicit flag, then non-empty environment
/// override, then the compiled-in default. Immutable after resolution.
pub fn resolve_api_path(flag: Option<&str>) -> PathBuf {
    resolve_from(flag, env::var(APIPATH_ENV).ok())
}

fn resolve_from(flag: Option<&str>, env_value: Option<String>) -> PathBuf {
    if let Some(path) = flag {
        return PathBuf::from(path);
    }
    match env_value {
        Some(value) if !value.is_empty() => PathBuf::from(value),
        _ => PathBuf::from(DEFAULT_API_PATH),
    }
}
