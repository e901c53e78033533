//! Forecast AutoML - Main Entry Point

use clap::Parser;
use forecast_automl::cli::{cmd_features, cmd_predict, cmd_serve, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forecast_automl=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, host } => {
            cmd_serve(host, port).await?;
        }
        Commands::Predict {
            columns,
            features,
            model_type,
            output,
        } => {
            cmd_predict(&columns, &features, &model_type, output.as_deref())?;
        }
        Commands::Features { columns } => {
            cmd_features(&columns)?;
        }
    }

    Ok(())
}
