pub mod config;
pub mod report;
pub mod serve;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "showme",
    version,
    about = "Paginated balance-sheet viewer, API backend and mock upstream."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the balance sheet (interactive on a terminal, plain text otherwise).
    Report(ReportArgs),
    /// Run the balance-sheet API backend.
    Serve {
        /// Port to listen on
        #[arg(long, default_value_t = crate::server::backend::DEFAULT_PORT)]
        port: u16,
        /// Upstream accounting API base URL
        #[arg(long)]
        upstream: Option<String>,
    },
    /// Run the mock upstream accounting API.
    Mock {
        /// Port to listen on
        #[arg(long, env = "PORT", default_value_t = crate::server::mock::DEFAULT_PORT)]
        port: u16,
    },
    /// Show or change saved settings.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Print a shell completion script.
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Page to open at
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    /// Rows per page: 5, 10, 25 or 50 (default: saved setting)
    #[arg(long = "page-size")]
    pub page_size: Option<u32>,
    /// Balance-sheet API base URL
    #[arg(long = "api-url")]
    pub api_url: Option<String>,
    /// Force the interactive view or plain text
    #[arg(long, value_enum)]
    pub mode: Option<OutputMode>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    View,
    Text,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the settings file location and effective values.
    Show,
    /// Save one or more settings.
    Set {
        #[arg(long = "api-url")]
        api_url: Option<String>,
        #[arg(long = "upstream-url")]
        upstream_url: Option<String>,
        /// Default rows per page: 5, 10, 25 or 50
        #[arg(long = "page-size")]
        page_size: Option<u32>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_report_flags() {
        let cli = Cli::parse_from([
            "showme", "report", "--page", "2", "--page-size", "25", "--mode", "text",
        ]);
        match cli.command {
            Commands::Report(args) => {
                assert_eq!(args.page, 2);
                assert_eq!(args.page_size, Some(25));
                assert_eq!(args.mode, Some(OutputMode::Text));
                assert!(args.api_url.is_none());
            }
            _ => panic!("expected report"),
        }
    }

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::parse_from(["showme", "serve"]);
        match cli.command {
            Commands::Serve { port, upstream } => {
                assert_eq!(port, 8000);
                assert!(upstream.is_none());
            }
            _ => panic!("expected serve"),
        }
    }
}
