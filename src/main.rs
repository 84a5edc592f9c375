use clap::{Parser, Subcommand};
use legal_ocr_pipeline::config::{Config, PipelineArgs, ServeArgs, ServerConfig};
use legal_ocr_pipeline::{server, Pipeline};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "legal-ocr-pipeline")]
#[command(about = "OCR pipeline for Gujarati + English legal documents")]
#[command(version)]
pub struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server
    Serve {
        #[command(flatten)]
        server: ServeArgs,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Process one scanned image and print the result as JSON
    Process {
        /// Path to the scanned document image
        image: PathBuf,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so `process` output stays machine-readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match args.command {
        Command::Serve { server, pipeline } => {
            let config = Config::from(pipeline);
            let server_config = ServerConfig::from(server);

            tracing::info!(
                "Starting legal-ocr-pipeline v{}",
                env!("CARGO_PKG_VERSION")
            );
            tracing::info!("Binding to {}:{}", server_config.host, server_config.port);

            let pipeline = Pipeline::new(&config)?;
            server::run(pipeline, server_config).await
        }
        Command::Process { image, pipeline } => {
            let config = Config::from(pipeline);
            let pipeline = Pipeline::new(&config)?;

            let result = tokio::task::spawn_blocking(move || pipeline.process(&image)).await??;
            println!("{}", serde_json::to_string_pretty(&result)?);

            Ok(())
        }
    }
}
