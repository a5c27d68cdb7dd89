pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "recipe-api")]
#[command(about = "Recipe API - user accounts, tokens and per-user tags/ingredients")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Wait for the database, apply migrations and serve HTTP (default)")]
    Serve {
        #[arg(long, help = "Listen port (overrides RECIPE_API_PORT/PORT)")]
        port: Option<u16>,
    },

    #[command(about = "Block until the database accepts connections")]
    WaitForDb,

    #[command(about = "Apply database migrations")]
    Migrate,

    #[command(about = "Create an administrative user")]
    CreateSuperuser {
        #[arg(long, env = "SUPERUSER_EMAIL")]
        email: String,
        #[arg(long, env = "SUPERUSER_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => commands::serve::handle(port).await,
        Commands::WaitForDb => commands::db::wait_for_db().await,
        Commands::Migrate => commands::db::migrate().await,
        Commands::CreateSuperuser { email, password } => {
            commands::superuser::handle(&email, &password, output_format).await
        }
    }
}
