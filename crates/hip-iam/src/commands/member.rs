//! Membership commands.

use crate::cli::MemberCommand;
use crate::membership::MembershipClient;
use crate::output::success;

/// Runs a membership command.
pub async fn run_member(cmd: MemberCommand, client: &MembershipClient) -> crate::IamResult<()> {
    match cmd {
        MemberCommand::Add { group, role, user } => {
            client.add_user_to_group(&group, role, &user).await?;
            success(&format!("User '{user}' is now {role} of '{group}'"));
        }
        MemberCommand::Remove { group, role, user } => {
            client.remove_user_from_group(&group, role, &user).await?;
            success(&format!("User '{user}' is no longer {role} of '{group}'"));
        }
        MemberCommand::Nest {
            parent,
            role,
            child,
        } => {
            client.assign_group_to_group(&parent, role, &child).await?;
            success(&format!("Group '{child}' is now {role} of '{parent}'"));
        }
    }
    Ok(())
}
