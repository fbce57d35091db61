//! # hip-iam
//!
//! Command-line entry point for IAM group provisioning.

#![forbid(unsafe_code)]

use clap::Parser;
use hip_iam::{
    cli::{Cli, Command},
    commands::{
        run_cleanup, run_group, run_inspect, run_member, run_scenario, run_setup, run_smoke,
        run_user,
    },
    output::error,
    Config, IamResult, Orchestrator,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        error(&e.to_string());
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "hip_iam=debug" } else { "hip_iam=info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> IamResult<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(timeout) = cli.timeout {
        config.set_timeout(timeout)?;
    }
    let orchestrator = Orchestrator::new(config)?;

    match cli.command {
        Command::Setup => run_setup(&orchestrator).await,
        Command::Inspect => run_inspect(&orchestrator, cli.output).await,
        Command::Cleanup => run_cleanup(&orchestrator).await,
        Command::Run => run_scenario(&orchestrator, cli.output).await,
        Command::Smoke(args) => run_smoke(&orchestrator, args, cli.output).await,
        Command::Group(cmd) => {
            let session = orchestrator.connect().await?;
            run_group(cmd, &session.groups, cli.output).await
        }
        Command::Member(cmd) => {
            let session = orchestrator.connect().await?;
            run_member(cmd, &session.members).await
        }
        Command::User(cmd) => {
            let session = orchestrator.connect().await?;
            run_user(cmd, &session.members, cli.output).await
        }
    }
}
