//! Orchestrated scenarios: setup, inspect, cleanup, run and smoke.

use crate::cli::SmokeArgs;
use crate::model::GroupSnapshot;
use crate::orchestrator::{Orchestrator, SmokeOptions};
use crate::output::{info, output, output_single, success, OutputFormat};

/// Runs the setup scenario.
pub async fn run_setup(orchestrator: &Orchestrator) -> crate::IamResult<()> {
    orchestrator.setup().await?;
    let groups = orchestrator.groups();
    success(&format!(
        "Groups '{}', '{}' and '{}' provisioned",
        groups.root, groups.group1, groups.group2
    ));
    Ok(())
}

/// Runs the inspect scenario.
pub async fn run_inspect(orchestrator: &Orchestrator, format: OutputFormat) -> crate::IamResult<()> {
    let snapshots = orchestrator.inspect().await?;
    print_snapshots(&snapshots, format)
}

/// Runs the cleanup scenario.
pub async fn run_cleanup(orchestrator: &Orchestrator) -> crate::IamResult<()> {
    orchestrator.cleanup().await?;
    success("Groups deleted");
    Ok(())
}

/// Runs setup, inspect, user group lookup and cleanup in one session.
pub async fn run_scenario(orchestrator: &Orchestrator, format: OutputFormat) -> crate::IamResult<()> {
    let report = orchestrator.run().await?;
    print_snapshots(&report.snapshots, format)?;
    info("Groups of the first user:");
    output(&report.user_groups, format)?;
    success("Scenario completed, groups deleted");
    Ok(())
}

/// Runs the smoke scenario.
pub async fn run_smoke(
    orchestrator: &Orchestrator,
    args: SmokeArgs,
    format: OutputFormat,
) -> crate::IamResult<()> {
    let user = match args.user {
        Some(user) => user,
        None => orchestrator.users()?.user1.clone(),
    };
    let options = SmokeOptions {
        user,
        parent: args.parent,
        pause: std::time::Duration::from_millis(args.pause_ms),
        keep: args.keep,
    };

    let report = orchestrator.smoke(&options).await?;
    output_single(&report.snapshot, format)?;
    if report.deleted {
        success(&format!("Smoke group '{}' checked and deleted", report.group));
    } else {
        success(&format!("Smoke group '{}' checked and kept", report.group));
    }
    Ok(())
}

fn print_snapshots(snapshots: &[GroupSnapshot], format: OutputFormat) -> crate::IamResult<()> {
    match format {
        OutputFormat::Json => output_single(&snapshots, format),
        OutputFormat::Table => {
            for snapshot in snapshots {
                info(&format!("Group '{}'", snapshot.group.name));
                output_single(snapshot, format)?;
            }
            Ok(())
        }
    }
}
