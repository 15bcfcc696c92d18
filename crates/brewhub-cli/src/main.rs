use clap::{Parser, Subcommand};

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "brewhub-cli", version, about = "Brewhub CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Brewing session control
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Recipe management
    Recipe {
        #[command(subcommand)]
        action: commands::recipe::RecipeAction,
    },
    /// Bean inventory
    Bean {
        #[command(subcommand)]
        action: commands::bean::BeanAction,
    },
    /// Brew log history
    Log {
        #[command(subcommand)]
        action: commands::brewlog::LogAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Session { action } => commands::session::run(action),
        Commands::Recipe { action } => commands::recipe::run(action),
        Commands::Bean { action } => commands::bean::run(action),
        Commands::Log { action } => commands::brewlog::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
