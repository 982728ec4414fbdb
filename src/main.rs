use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use rivaluta::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for rivaluta::AppCommand {
    fn from(cmd: Commands) -> rivaluta::AppCommand {
        match cmd {
            Commands::Revalue {
                amount,
                year,
                month,
                no_save,
            } => rivaluta::AppCommand::Revalue {
                amount,
                year,
                month,
                no_save,
            },
            Commands::Periods { year } => rivaluta::AppCommand::Periods { year },
            Commands::History { command } => {
                rivaluta::AppCommand::History(match command.unwrap_or(HistoryCommands::List) {
                    HistoryCommands::List => rivaluta::HistoryCommand::List,
                    HistoryCommands::Delete { id } => rivaluta::HistoryCommand::Delete { id },
                    HistoryCommands::Clear => rivaluta::HistoryCommand::Clear,
                })
            }
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Revalue a past amount to today's purchasing power
    Revalue {
        /// Amount in euro; dot or comma decimals both work (e.g. 1234,56)
        amount: String,
        /// Start year, e.g. 2016
        year: i32,
        /// Start month (1-12)
        #[arg(value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
        /// Do not record this calculation in the history
        #[arg(long)]
        no_save: bool,
    },
    /// List the available index periods
    Periods {
        /// Only show periods of this year
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Show or edit saved calculations
    History {
        #[command(subcommand)]
        command: Option<HistoryCommands>,
    },
}

#[derive(Subcommand)]
enum HistoryCommands {
    /// List saved calculations, most recent first
    List,
    /// Delete one calculation by id
    Delete { id: String },
    /// Delete all saved calculations
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => rivaluta::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = rivaluta::core::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
# Replace the bundled ISTAT FOI series with an external JSON file.
catalog_path: null

# Directory for the calculation history database.
data_path: null
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
