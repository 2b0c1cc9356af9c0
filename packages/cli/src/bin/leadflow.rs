use clap::{Parser, Subcommand};
use colored::*;
use leadflow_config::Config;
use leadflow_core::Intent;
use std::process;

mod cli;

#[derive(Parser)]
#[command(name = "leadflow")]
#[command(about = "Leadflow CLI - real-estate lead conversations from the terminal")]
#[command(version)]
struct Cli {
    /// Use built-in flows only and never contact the API
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List offers and the intents they support
    Offers,
    /// Show the question flow for an offer and intent
    Questions {
        #[arg(long, default_value = leadflow_offers::REAL_ESTATE_TIMELINE)]
        offer: String,
        #[arg(long)]
        intent: Intent,
    },
    /// Run an interactive lead conversation
    Chat {
        /// Preselect an offer instead of choosing from the greeting
        #[arg(long)]
        offer: Option<String>,
    },
    /// Browse the knowledge brain
    Knowledge {
        /// Only show entries matching this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Show timeline phases and advice coverage for a flow
    Phases {
        #[arg(long)]
        flow: Intent,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Configuration error:".red().bold(), e);
            process::exit(2);
        }
    };
    leadflow_cli::init_logging(&config);

    if let Err(e) = handle_command(cli.command, cli.offline, &config).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(command: Commands, offline: bool, config: &Config) -> anyhow::Result<()> {
    match command {
        Commands::Offers => cli::catalogue::list_offers(config, offline).await,
        Commands::Questions { offer, intent } => {
            cli::catalogue::show_questions(config, offline, &offer, intent).await
        }
        Commands::Chat { offer } => cli::chat::run_chat(config, offline, offer).await,
        Commands::Knowledge { search } => {
            cli::knowledge::show_knowledge(config, search.as_deref()).await
        }
        Commands::Phases { flow } => cli::phases::show_phases(config, offline, flow).await,
    }
}
