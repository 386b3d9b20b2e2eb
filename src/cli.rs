//! CLI Module
//!
//! Command-line interface for the pomodorino server using Clap v4.

use std::path::PathBuf;

use clap::Parser;

/// Pomodorino - Pomodoro Companion Backend
#[derive(Parser, Debug)]
#[command(name = "pomodorino")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug mode (creates log files in the log directory)
    #[arg(short, long)]
    pub debug: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the listen port from the configuration
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["pomodorino"]);
        assert!(!cli.debug);
        assert!(cli.config.is_none());
        assert!(cli.port.is_none());
    }

    #[test]
    fn test_port_override() {
        let cli = Cli::parse_from(["pomodorino", "--port", "9000", "--debug"]);
        assert_eq!(cli.port, Some(9000));
        assert!(cli.debug);
    }
}
