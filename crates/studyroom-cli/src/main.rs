use clap::{Parser, Subcommand};
use studyroom_core::storage::LoggingConfig;
use studyroom_core::Config;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "studyroom", version, about = "Studyroom CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run or simulate a focus/break session
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Session templates
    Template {
        #[command(subcommand)]
        action: commands::template::TemplateAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Habit streak levels and activity
    Streak {
        #[command(subcommand)]
        action: commands::streak::StreakAction,
    },
    /// Notification rendering
    Notify {
        #[command(subcommand)]
        action: commands::notify::NotifyAction,
    },
}

fn main() {
    let cli = Cli::parse();
    // Commands load (and create) the config themselves; here it is only read.
    let level = match Config::read() {
        Ok(config) => config.map(|c| c.logging).unwrap_or_default().level,
        Err(e) => {
            eprintln!("warning: {e}; using default log level");
            LoggingConfig::default().level
        }
    };
    logging::init(&level);

    let result = match cli.command {
        Commands::Session { action } => commands::session::run(action),
        Commands::Template { action } => commands::template::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Streak { action } => commands::streak::run(action),
        Commands::Notify { action } => commands::notify::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
