//! User lookup commands.

use crate::cli::UserCommand;
use crate::membership::MembershipClient;
use crate::output::{output, output_single, OutputFormat};

/// Runs a user command.
pub async fn run_user(
    cmd: UserCommand,
    client: &MembershipClient,
    format: OutputFormat,
) -> crate::IamResult<()> {
    match cmd {
        UserCommand::Get { username } => {
            let user = client.get_user(&username).await?;
            output_single(&user, format)
        }
        UserCommand::Groups { username, role } => {
            let groups = client.get_user_groups(&username, role).await?;
            output(&groups, format)
        }
    }
}
