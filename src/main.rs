use clap::{CommandFactory, Parser};

use showme::cli::{self, Cli, Commands, ConfigCommands};
use showme::logging::{self, LogTarget};
use showme::settings;

fn main() {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Serve { .. } | Commands::Mock { .. } => logging::init("info", LogTarget::Stderr),
        Commands::Report(args) if cli::report::interactive(args.mode) => {
            logging::init("warn", LogTarget::File(settings::log_path()))
        }
        _ => logging::init("warn", LogTarget::Stderr),
    }

    let result = match cli.command {
        Commands::Report(args) => cli::report::dispatch(args),
        Commands::Serve { port, upstream } => cli::serve::api(port, upstream),
        Commands::Mock { port } => cli::serve::mock_upstream(port),
        Commands::Config { command } => match command {
            ConfigCommands::Show => cli::config::show(),
            ConfigCommands::Set {
                api_url,
                upstream_url,
                page_size,
            } => cli::config::set(api_url, upstream_url, page_size),
        },
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "showme", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
