use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use studypilot::app::AppContext;
use studypilot::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let ctx = AppContext::new()?;

    match cli.command {
        Commands::Apps => {
            commands::list_apps(&ctx).await?;
        }
        Commands::Assignments { platform } => {
            commands::list_assignments(&ctx, platform).await?;
        }
        Commands::Materials => {
            commands::list_materials(&ctx).await?;
        }
        Commands::Progress => {
            commands::show_progress(&ctx).await?;
        }
        Commands::Guide {
            description,
            context,
        } => {
            commands::guide(&ctx, &description, &context).await?;
        }
        Commands::Question {
            question,
            question_type,
        } => {
            commands::question(&ctx, &question, question_type).await?;
        }
        Commands::Notes { topic, point } => {
            commands::notes(&ctx, &topic, &point).await?;
        }
        Commands::Check => {
            commands::check(&ctx)?;
        }
    }

    Ok(())
}
