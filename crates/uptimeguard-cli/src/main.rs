use clap::{Parser, Subcommand};
use uptimeguard_core::{Config, Environment};

mod commands;
mod logging;

#[derive(Parser)]
#[command(
    name = "uptimeguard",
    version,
    about = "Prompt for, and eventually force, a restart of long-running machines"
)]
struct Cli {
    /// Simulate the restart and echo verbose trace lines to stderr
    #[arg(short, long, global = true, env = "UPTIMEGUARD_DEBUG")]
    debug: bool,
    /// Print the result as JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check uptime and run the restart workflow (default)
    Run,
    /// Show uptime and deferral state without prompting
    Status,
    /// Clear the deferral counter
    Reset,
}

fn main() {
    let cli = Cli::parse();

    let config = match Config::for_environment(Environment::from_env(), cli.debug) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    logging::init(&config);

    let result = match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => commands::run::run(&config, cli.json),
        Commands::Status => commands::status::run(&config, cli.json),
        Commands::Reset => commands::reset::run(&config),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Aborting");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
