//! Group management commands.

use crate::cli::GroupCommand;
use crate::groups::{sanitize_group_name, GroupAdminClient};
use crate::model::MemberRow;
use crate::output::{confirm, error, output, output_single, success, OutputFormat};

/// Runs a group command.
pub async fn run_group(
    cmd: GroupCommand,
    client: &GroupAdminClient,
    format: OutputFormat,
) -> crate::IamResult<()> {
    match cmd {
        GroupCommand::Get { name } => {
            let group = client.get_group(&name).await?;
            output_single(&group, format)
        }
        GroupCommand::Snapshot { name } => {
            let snapshot = client.get_everything_in_group(&name).await?;
            output_single(&snapshot, format)
        }
        GroupCommand::Create { name } => {
            let status = client.create_group(&name).await?;
            success(&format!(
                "Group '{}' created ({})",
                sanitize_group_name(&name),
                status.as_u16()
            ));
            Ok(())
        }
        GroupCommand::Delete { name, force } => {
            if !force && !confirm(&format!("Are you sure you want to delete group '{name}'?"))? {
                error("Operation cancelled");
                return Ok(());
            }
            client.delete_group(&name).await?;
            success(&format!("Group '{name}' deleted"));
            Ok(())
        }
        GroupCommand::Members { name, role } => {
            let lists = client.get_group_lists_by_role(&name, role).await?;
            output(&MemberRow::from_lists(&lists, role), format)
        }
    }
}
