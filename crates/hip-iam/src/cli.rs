//! CLI argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::model::Role;
use crate::output::OutputFormat;

/// hip-iam - provisioning of IAM test groups and memberships.
#[derive(Debug, Parser)]
#[command(name = "hip-iam")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults to ~/.hip-iam/config.toml).
    #[arg(short, long, env = "HIP_IAM_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Request timeout in seconds (overrides config).
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the group hierarchy and assign memberships.
    Setup,

    /// Print members and administrators of every managed group.
    Inspect,

    /// Delete the managed groups.
    Cleanup,

    /// Setup, inspect, list the first user's groups, then clean up.
    Run,

    /// Create a throwaway group, assign a user and nest it under a parent.
    Smoke(SmokeArgs),

    /// Single group calls.
    #[command(subcommand)]
    Group(GroupCommand),

    /// Single membership calls.
    #[command(subcommand)]
    Member(MemberCommand),

    /// User lookups.
    #[command(subcommand)]
    User(UserCommand),
}

/// Smoke scenario arguments.
#[derive(Debug, clap::Args)]
pub struct SmokeArgs {
    /// User to assign (defaults to USER1).
    #[arg(long)]
    pub user: Option<String>,

    /// Existing parent group.
    #[arg(long, default_value = crate::orchestrator::DEFAULT_SMOKE_PARENT)]
    pub parent: String,

    /// Pause around group creation, in milliseconds.
    #[arg(long, default_value = "500")]
    pub pause_ms: u64,

    /// Do not delete the group afterwards.
    #[arg(long)]
    pub keep: bool,
}

/// Group commands.
#[derive(Debug, Subcommand)]
pub enum GroupCommand {
    /// Get a group.
    Get {
        /// Group name.
        name: String,
    },

    /// Get a group with its members and administrators.
    Snapshot {
        /// Group name.
        name: String,
    },

    /// Create a group. The name is sanitized.
    Create {
        /// Group name.
        name: String,
    },

    /// Delete a group.
    Delete {
        /// Group name.
        name: String,

        /// Skip confirmation.
        #[arg(long)]
        force: bool,
    },

    /// List role holders of a group.
    Members {
        /// Group name.
        name: String,

        /// Role to list.
        #[arg(long, value_enum, default_value = "member")]
        role: Role,
    },
}

/// Membership commands.
#[derive(Debug, Subcommand)]
pub enum MemberCommand {
    /// Grant a role in a group to a user.
    Add {
        /// Group name.
        group: String,
        /// Role.
        #[arg(value_enum)]
        role: Role,
        /// Username.
        user: String,
    },

    /// Revoke a role in a group from a user.
    Remove {
        /// Group name.
        group: String,
        /// Role.
        #[arg(value_enum)]
        role: Role,
        /// Username.
        user: String,
    },

    /// Nest a group under another.
    Nest {
        /// Parent group.
        parent: String,
        /// Role of the child within the parent.
        #[arg(value_enum)]
        role: Role,
        /// Child group.
        child: String,
    },
}

/// User commands.
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Get a user.
    Get {
        /// Username.
        username: String,
    },

    /// List groups in which a user holds a role.
    Groups {
        /// Username.
        username: String,

        /// Role.
        #[arg(long, value_enum, default_value = "member")]
        role: Role,
    },
}
