use clap::Parser;
use std::path::PathBuf;

// Build version with target info
const VERSION_INFO: &str = const_format::concatcp!(
    env!("CARGO_PKG_VERSION"), "\n",
    "Target: ", std::env::consts::ARCH, "-", std::env::consts::OS
);

/// Session debrief player
#[derive(Parser, Debug)]
#[command(author, version = VERSION_INFO, about, long_about = None)]
pub struct Args {
    /// Session document to open (decoded .plm as JSON) - optional, can also drag-and-drop
    #[arg(value_name = "SESSION")]
    pub session: Option<PathBuf>,

    /// Open the built-in demo session
    #[arg(short = 'd', long = "demo")]
    pub demo: bool,

    /// Auto-play on startup
    #[arg(short = 'a', long = "autoplay")]
    pub autoplay: bool,

    /// Start position in seconds
    #[arg(long = "seek", value_name = "SECONDS")]
    pub seek: Option<f64>,

    /// Playback speed multiplier
    #[arg(long = "speed", value_name = "X")]
    pub speed: Option<f64>,

    /// Enable debug logging to file (default: debrief.log)
    #[arg(short = 'l', long = "log", value_name = "LOG_FILE")]
    pub log_file: Option<Option<PathBuf>>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Custom configuration directory (overrides default platform paths)
    #[arg(short = 'c', long = "config-dir", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let args = Args::parse_from(["debrief"]);
        assert!(args.session.is_none());
        assert!(!args.demo);
        assert_eq!(args.verbosity, 0);
    }

    #[test]
    fn test_parse_session_and_flags() {
        let args = Args::parse_from([
            "debrief", "run42.json", "--autoplay", "--seek", "30.5", "--speed", "1.5", "-vv",
        ]);
        assert_eq!(args.session.unwrap(), PathBuf::from("run42.json"));
        assert!(args.autoplay);
        assert_eq!(args.seek, Some(30.5));
        assert_eq!(args.speed, Some(1.5));
        assert_eq!(args.verbosity, 2);
    }
}
