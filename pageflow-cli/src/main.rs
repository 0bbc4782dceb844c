//! pageflow command line.
//!
//! Build lifecycle commands that work on the local content cache, preview
//! key generation, and a small preview endpoint.
//!
//! Usage:
//!   pageflow postbuild
//!   pageflow paths --preview
//!   pageflow serve --port 3001

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pageflow_cli::{OfflineApi, PREVIEW_ROUTE, PreviewState, build_router};
use pageflow_resolver::{BuildLifecycle, ContentPipeline, SiteConfig};
use pageflow_store::PrepareOutcome;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "pageflow")]
#[command(about = "pageflow content cache and preview tooling")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mark the content cache as built
    Postbuild,
    /// Remove the build marker and both content mirrors
    Clean,
    /// Copy the durable cache into the scratch root
    Prepare,
    /// Print the preview key for the configured security key
    PreviewKey,
    /// List every routable path from the content cache
    Paths {
        /// Read preview content
        #[arg(long)]
        preview: bool,

        /// Locales to list, defaults to the configured ones
        #[arg(long, value_delimiter = ',')]
        locales: Vec<String>,
    },
    /// Serve the preview endpoint
    Serve {
        /// HTTP port to listen on
        #[arg(short, long, default_value = "3001")]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let config = Arc::new(SiteConfig::from_env());
    info!(
        "Site {} ({} locales, channel {})",
        config.site_id,
        config.locales.len(),
        config.channel_name
    );

    match args.command {
        Command::Postbuild => lifecycle(&config).post_build().await.context("post-build failed")?,
        Command::Clean => lifecycle(&config).clean_sync().await.context("clean failed")?,
        Command::Prepare => {
            let outcome = lifecycle(&config)
                .prepare_scratch()
                .await
                .context("prepare failed")?;
            match outcome {
                Some(PrepareOutcome::Copied { files }) => info!("Copied {files} cached files"),
                Some(PrepareOutcome::AlreadyPrepared) => info!("Scratch cache already prepared"),
                None => {}
            }
        }
        Command::PreviewKey => {
            println!("{}", pipeline(&config).generate_preview_token());
        }
        Command::Paths { preview, locales } => {
            let locales = (!locales.is_empty()).then_some(locales);
            let paths = pipeline(&config)
                .resolve_all_paths(preview, config.debug, locales.as_deref(), None)
                .await
                .context("failed to list paths")?;
            for path in paths {
                println!("{path}");
            }
        }
        Command::Serve { port } => serve(&config, port).await?,
    }

    Ok(())
}

fn lifecycle(config: &Arc<SiteConfig>) -> BuildLifecycle {
    BuildLifecycle::with_remote_sync(Arc::clone(config), Arc::new(OfflineApi))
}

fn pipeline(config: &Arc<SiteConfig>) -> ContentPipeline {
    ContentPipeline::with_remote_sync(Arc::clone(config), Arc::new(OfflineApi))
}

async fn serve(config: &SiteConfig, port: u16) -> Result<()> {
    let state = Arc::new(PreviewState {
        security_key: config.security_key.clone(),
    });
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .with_context(|| format!("failed to bind HTTP port {port}"))?;
    info!("Preview endpoint listening on http://0.0.0.0:{port}{PREVIEW_ROUTE}");
    axum::serve(listener, app).await.context("HTTP server failed")?;
    Ok(())
}
