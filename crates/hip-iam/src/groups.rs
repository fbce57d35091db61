//! Group administration calls.

use reqwest::StatusCode;
use urlencoding::encode;

use crate::http::{ApiCall, ApiClient};
use crate::model::{CreateGroupRequest, Group, GroupLists, GroupSnapshot, Role};
use crate::{IamError, IamResult};

/// Normalizes a group name: every run of characters outside `[a-zA-Z0-9]`
/// becomes a single `-`, and the result is lower-cased.
pub fn sanitize_group_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_run = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            in_run = false;
        } else if !in_run {
            out.push('-');
            in_run = true;
        }
    }

    out
}

/// Create, read and delete operations on groups.
#[derive(Clone)]
pub struct GroupAdminClient {
    api: ApiClient,
}

impl GroupAdminClient {
    /// Creates a client using the given authenticated API client.
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Creates a group. The name is sanitized first.
    pub async fn create_group(&self, name: &str) -> IamResult<StatusCode> {
        tracing::info!(name, "createGroup");
        let sanitized = sanitize_group_name(name);
        let call: ApiCall<()> =
            ApiCall::post("/identity/groups", &CreateGroupRequest::for_name(&sanitized))?;
        self.api.status(call).await
    }

    /// Gets a group by name.
    pub async fn get_group(&self, name: &str) -> IamResult<Group> {
        tracing::info!(name, "getGroup");
        self.api
            .fetch(ApiCall::get(format!("/identity/groups/{}", encode(name))))
            .await
    }

    /// Deletes a group.
    ///
    /// A `409 Conflict` reply means the service refused because the group
    /// still has members; it is reported as [`IamError::GroupNotEmpty`].
    pub async fn delete_group(&self, name: &str) -> IamResult<StatusCode> {
        tracing::info!(name, "deleteGroup");
        let call: ApiCall<()> = ApiCall::delete(format!("/identity/groups/{}", encode(name)));
        match self.api.status(call).await {
            Err(IamError::Response { status: 409, .. }) => Err(IamError::GroupNotEmpty {
                group: name.to_string(),
            }),
            other => other,
        }
    }

    /// Lists the users, units and groups holding `role` in a group.
    pub async fn get_group_lists_by_role(&self, name: &str, role: Role) -> IamResult<GroupLists> {
        tracing::info!(name, %role, "getGroupListsByRole");
        self.api
            .fetch(ApiCall::get(format!(
                "/identity/groups/{}/{}",
                encode(name),
                role
            )))
            .await
    }

    /// Fetches a group with its members and administrators.
    ///
    /// The three calls run one after another; the first failure fails the
    /// whole snapshot.
    pub async fn get_everything_in_group(&self, name: &str) -> IamResult<GroupSnapshot> {
        let group = self.get_group(name).await?;
        let members = self.get_group_lists_by_role(name, Role::Member).await?;
        let administrators = self
            .get_group_lists_by_role(name, Role::Administrator)
            .await?;

        Ok(GroupSnapshot {
            group,
            members,
            administrators,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_collapses_runs_and_lowercases() {
        assert_eq!(sanitize_group_name("HIP-Projects-testing"), "hip-projects-testing");
        assert_eq!(sanitize_group_name("HIP  Projects__101"), "hip-projects-101");
        assert_eq!(sanitize_group_name("a/./b"), "a-b");
        assert_eq!(sanitize_group_name("Épilepsie"), "-pilepsie");
        assert_eq!(sanitize_group_name(""), "");
    }

    #[test]
    fn sanitize_keeps_edge_separators() {
        assert_eq!(sanitize_group_name(" root "), "-root-");
        assert_eq!(sanitize_group_name("---"), "-");
    }

    #[test]
    fn sanitize_is_idempotent() {
        let inputs = [
            "HIP-Projects-Epilepsy-101-testing",
            "HIP-IAM-API-TEST-GROUP-1700000000000",
            "  spaced   out  ",
            "MiXeD_case.name!",
            "already-clean",
            "ünïcödé",
        ];

        for input in inputs {
            let once = sanitize_group_name(input);
            assert_eq!(sanitize_group_name(&once), once, "input: {input}");
            assert!(once
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            assert!(!once.contains("--"));
        }
    }
}
