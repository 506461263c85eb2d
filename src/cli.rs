//! CLI argument parsing
//!
//! Uses clap for argument parsing with derive macros.

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

/// Caller lookup from a MicroSIP call log - history stats, customer card, number highlighting
#[derive(Parser, Debug)]
#[command(name = "callercard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Call log INI to read (default: calls_path from config)
    #[arg(long, env = "CALLERCARD_CALLS", global = true)]
    pub calls: Option<PathBuf>,

    /// Config file (default: ~/.config/callercard/config.toml)
    #[arg(short, long, env = "CALLERCARD_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info", global = true)]
    pub log_level: String,

    /// Also log to stderr
    #[arg(short, long, default_value_t = false, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the caller card for a number
    ///
    /// Reads call history, resolves the customer and, for unknown numbers,
    /// runs the offline search and appends the call to the unknown-caller CSV.
    Lookup {
        /// Phone number in any formatting
        phone: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Send a desktop notification with the card summary
        #[arg(short = 'N', long, default_value_t = false)]
        notify: bool,

        /// Do not append unknown callers to the CSV log
        #[arg(long, default_value_t = false)]
        no_csv: bool,
    },

    /// Print call history stats for a number
    Stats {
        /// Phone number in any formatting
        phone: String,

        /// Print JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Highlight a number inside text, printing escaped HTML
    Highlight {
        /// Phone number in any formatting
        phone: String,

        /// Text to search (reads --file when omitted)
        text: Option<String>,

        /// Read the text from a file
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Highlight color (default: highlight_color from config)
        #[arg(long)]
        color: Option<String>,
    },

    /// Print an example configuration file
    ConfigExample {
        /// Write it to the config path instead (never overwrites)
        #[arg(long, default_value_t = false)]
        write: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Html,
    Json,
}

/// Generate shell completions and print to stdout
pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "callercard", &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_lookup() {
        let cli = Cli::parse_from([
            "callercard",
            "--calls",
            "/tmp/microsip.ini",
            "lookup",
            "210 484 8484",
            "--format",
            "json",
            "--no-csv",
        ]);
        assert_eq!(cli.calls, Some(PathBuf::from("/tmp/microsip.ini")));
        match cli.command {
            Commands::Lookup {
                phone,
                format,
                notify,
                no_csv,
            } => {
                assert_eq!(phone, "210 484 8484");
                assert_eq!(format, OutputFormat::Json);
                assert!(!notify);
                assert!(no_csv);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_highlight_text_and_file_conflict() {
        let result = Cli::try_parse_from([
            "callercard",
            "highlight",
            "2104848484",
            "some text",
            "--file",
            "notes.txt",
        ]);
        assert!(result.is_err());
    }
}
