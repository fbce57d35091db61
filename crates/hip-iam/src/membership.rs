//! Membership calls: users and nested groups holding a role in a group.

use reqwest::StatusCode;
use urlencoding::encode;

use crate::http::{ApiCall, ApiClient};
use crate::model::{Group, Role, User};
use crate::IamResult;

/// Adds and removes role holders of a group, and looks up users.
#[derive(Clone)]
pub struct MembershipClient {
    api: ApiClient,
}

impl MembershipClient {
    /// Creates a client using the given authenticated API client.
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Grants `role` in `group` to a user.
    pub async fn add_user_to_group(
        &self,
        group: &str,
        role: Role,
        user: &str,
    ) -> IamResult<StatusCode> {
        tracing::info!(group, %role, user, "addUserToGroup");
        self.api
            .status(ApiCall::<()>::put(user_path(group, role, user)))
            .await
    }

    /// Revokes `role` in `group` from a user.
    pub async fn remove_user_from_group(
        &self,
        group: &str,
        role: Role,
        user: &str,
    ) -> IamResult<StatusCode> {
        tracing::info!(group, %role, user, "removeUserFromGroup");
        self.api
            .status(ApiCall::<()>::delete(user_path(group, role, user)))
            .await
    }

    /// Nests `child` under `parent` with the given role.
    pub async fn assign_group_to_group(
        &self,
        parent: &str,
        role: Role,
        child: &str,
    ) -> IamResult<StatusCode> {
        tracing::info!(parent, %role, child, "assignGroupToGroup");
        let path = format!(
            "/identity/groups/{}/{}/groups/{}",
            encode(parent),
            role,
            encode(child)
        );
        self.api.status(ApiCall::<()>::put(path)).await
    }

    /// Lists the groups in which a user holds `role`.
    pub async fn get_user_groups(&self, user: &str, role: Role) -> IamResult<Vec<Group>> {
        tracing::info!(user, %role, "getUserGroups");
        let path = format!(
            "/identity/groups?username={}&role={}",
            encode(user),
            role
        );
        self.api.fetch(ApiCall::get(path)).await
    }

    /// Gets a user by username.
    pub async fn get_user(&self, username: &str) -> IamResult<User> {
        tracing::info!(username, "getUser");
        self.api
            .fetch(ApiCall::get(format!("/identity/users/{}", encode(username))))
            .await
    }
}

fn user_path(group: &str, role: Role, user: &str) -> String {
    format!(
        "/identity/groups/{}/{}/users/{}",
        encode(group),
        role,
        encode(user)
    )
}
