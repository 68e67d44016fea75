mod cli;
mod cloud;
mod core;
mod http;
mod recon;
mod reporting;

use clap::Parser;
use cli::args::Cli;
use cloud::ProviderCatalog;
use crate::core::context::Context;
use crate::core::engine::Engine;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const BANNER: &str = r#"
 ╔══════════════════════════════════════════════════════════╗
 ║                                                          ║
 ║   ███████╗██╗  ██╗██╗   ██╗██████╗ ██████╗  ██████╗      ║
 ║   ██╔════╝██║ ██╔╝╚██╗ ██╔╝██╔══██╗██╔══██╗██╔═══██╗     ║
 ║   ███████╗█████╔╝  ╚████╔╝ ██████╔╝██████╔╝██║   ██║     ║
 ║   ╚════██║██╔═██╗   ╚██╔╝  ██╔═══╝ ██╔══██╗██║   ██║     ║
 ║   ███████║██║  ██╗   ██║   ██║     ██║  ██║╚██████╔╝     ║
 ║   ╚══════╝╚═╝  ╚═╝   ╚═╝   ╚═╝     ╚═╝  ╚═╝ ╚═════╝      ║
 ║                                                          ║
 ║   In-host cloud metadata service prober                  ║
 ║                                                          ║
 ╚══════════════════════════════════════════════════════════╝
"#;

fn print_banner() {
    // stderr keeps stdout clean for the JSON report
    eprintln!("\x1b[36m{}\x1b[0m", BANNER);
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    if cli.list_providers {
        for profile in ProviderCatalog::builtin().profiles() {
            println!("{:<8}{}", profile.id, profile.name);
        }
        return Ok(ExitCode::SUCCESS);
    }

    if !cli.no_banner && !cli.silent {
        print_banner();
    }

    init_logging(cli.verbose);

    let ctx = Context::from_cli(cli)?;
    let engine = Engine::new(ctx)?;
    let summary = engine.run().await?;

    if let Some(provider) = &summary.report.provider {
        tracing::info!("Confirmed cloud provider: {}", provider);
    }

    if summary.cloud_error.is_some() {
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
