//! Sequencing of provisioning calls into top-level operations.
//!
//! Every operation authenticates on its own, then drives the group and
//! membership clients. A failed call aborts the operation; nothing already
//! applied on the service is rolled back.

use std::time::Duration;

use futures::future::try_join_all;
use serde::Serialize;

use crate::config::{Config, GroupNames, UserNames};
use crate::groups::{sanitize_group_name, GroupAdminClient};
use crate::http::{build_http_client, ApiClient};
use crate::membership::MembershipClient;
use crate::model::{Group, GroupSnapshot, Role};
use crate::token::authenticate;
use crate::IamResult;

/// Parent group the smoke scenario nests its group under by default.
pub const DEFAULT_SMOKE_PARENT: &str = "HIP-Projects";

/// Default pause around group creation in the smoke scenario.
pub const DEFAULT_SMOKE_PAUSE: Duration = Duration::from_millis(500);

/// Clients sharing one access token.
#[derive(Clone)]
pub struct Session {
    /// Group administration.
    pub groups: GroupAdminClient,
    /// Membership management.
    pub members: MembershipClient,
}

/// Result of the full scenario.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Snapshots of root, group 1 and group 2.
    pub snapshots: Vec<GroupSnapshot>,
    /// Groups in which the first user is a member.
    pub user_groups: Vec<Group>,
}

/// Options of the smoke scenario.
#[derive(Debug, Clone)]
pub struct SmokeOptions {
    /// User added as member and administrator.
    pub user: String,
    /// Existing group the new group is nested under.
    pub parent: String,
    /// Pause before and after group creation.
    pub pause: Duration,
    /// Leave the group in place instead of deleting it.
    pub keep: bool,
}

/// Result of the smoke scenario.
#[derive(Debug, Clone, Serialize)]
pub struct SmokeReport {
    /// Name of the group that was created.
    pub group: String,
    /// Snapshot taken after all assignments.
    pub snapshot: GroupSnapshot,
    /// Whether the group was deleted afterwards.
    pub deleted: bool,
}

/// Drives setup, inspection and cleanup of the test group hierarchy.
pub struct Orchestrator {
    config: Config,
    http: reqwest::Client,
    groups: GroupNames,
}

impl Orchestrator {
    /// Creates an orchestrator with an HTTP client honouring the configured
    /// timeout.
    pub fn new(config: Config) -> IamResult<Self> {
        let http = build_http_client(Duration::from_secs(config.timeout_secs))?;
        Ok(Self::with_http_client(config, http))
    }

    /// Creates an orchestrator around an existing HTTP client.
    pub fn with_http_client(config: Config, http: reqwest::Client) -> Self {
        let groups = GroupNames {
            root: sanitize_group_name(&config.groups.root),
            group1: sanitize_group_name(&config.groups.group1),
            group2: sanitize_group_name(&config.groups.group2),
        };

        Self {
            config,
            http,
            groups,
        }
    }

    /// Sanitized names of the managed groups.
    pub fn groups(&self) -> &GroupNames {
        &self.groups
    }

    /// Configured scenario users.
    pub fn users(&self) -> IamResult<&UserNames> {
        self.config.users()
    }

    /// Obtains a fresh token and builds clients around it.
    pub async fn connect(&self) -> IamResult<Session> {
        let token = authenticate(&self.http, &self.config.iam).await?;
        let api = ApiClient::new(self.http.clone(), &self.config.api_url, token);

        Ok(Session {
            groups: GroupAdminClient::new(api.clone()),
            members: MembershipClient::new(api),
        })
    }

    /// Creates the three groups and assigns users and nested groups.
    pub async fn setup(&self) -> IamResult<()> {
        self.config.users()?;
        let session = self.connect().await?;
        self.setup_with(&session).await
    }

    /// Fetches a snapshot of each group, root first.
    pub async fn inspect(&self) -> IamResult<Vec<GroupSnapshot>> {
        let session = self.connect().await?;
        self.inspect_with(&session).await
    }

    /// Deletes the three groups, root first.
    pub async fn cleanup(&self) -> IamResult<()> {
        let session = self.connect().await?;
        self.cleanup_with(&session).await
    }

    /// Setup, inspection, lookup of the first user's groups, and cleanup,
    /// under a single token.
    pub async fn run(&self) -> IamResult<RunReport> {
        let users = self.config.users()?;
        let session = self.connect().await?;

        self.setup_with(&session).await?;
        let snapshots = self.inspect_with(&session).await?;
        let user_groups = session
            .members
            .get_user_groups(&users.user1, Role::Member)
            .await?;
        self.cleanup_with(&session).await?;

        Ok(RunReport {
            snapshots,
            user_groups,
        })
    }

    /// Creates a uniquely named group, assigns a user to it in both roles,
    /// nests it under an existing parent and takes a snapshot.
    pub async fn smoke(&self, options: &SmokeOptions) -> IamResult<SmokeReport> {
        let group = sanitize_group_name(&format!(
            "HIP-IAM-API-TEST-GROUP-{}",
            chrono::Utc::now().timestamp_millis()
        ));
        let session = self.connect().await?;

        tokio::time::sleep(options.pause).await;
        let status = session.groups.create_group(&group).await?;
        tracing::info!(%group, status = status.as_u16(), "smoke group created");
        tokio::time::sleep(options.pause).await;

        let members = &session.members;
        members
            .add_user_to_group(&group, Role::Member, &options.user)
            .await?;
        members
            .add_user_to_group(&group, Role::Administrator, &options.user)
            .await?;
        members
            .assign_group_to_group(&options.parent, Role::Member, &group)
            .await?;

        let snapshot = session.groups.get_everything_in_group(&group).await?;

        if !options.keep {
            session.groups.delete_group(&group).await?;
        }

        Ok(SmokeReport {
            group,
            snapshot,
            deleted: !options.keep,
        })
    }

    /// Setup steps using an existing session.
    pub async fn setup_with(&self, session: &Session) -> IamResult<()> {
        let GroupNames {
            root,
            group1,
            group2,
        } = &self.groups;
        let users = self.config.users()?;
        let members = &session.members;

        // Every creation must succeed before any assignment is issued.
        try_join_all(self.groups.all().map(|g| session.groups.create_group(g))).await?;

        try_join_all(
            [&users.user1, &users.user2]
                .map(|u| members.add_user_to_group(root, Role::Member, u)),
        )
        .await?;

        members
            .add_user_to_group(root, Role::Administrator, &users.admin)
            .await?;

        members
            .add_user_to_group(group1, Role::Member, &users.user1)
            .await?;
        members
            .add_user_to_group(group1, Role::Member, &users.user2)
            .await?;
        members
            .add_user_to_group(group1, Role::Administrator, &users.admin)
            .await?;

        members
            .add_user_to_group(group2, Role::Administrator, &users.user1)
            .await?;
        members
            .add_user_to_group(group2, Role::Member, &users.user2)
            .await?;

        members
            .assign_group_to_group(root, Role::Member, group1)
            .await?;
        members
            .assign_group_to_group(root, Role::Member, group2)
            .await?;

        tracing::info!(%root, %group1, %group2, "setup complete");
        Ok(())
    }

    /// Inspection using an existing session.
    pub async fn inspect_with(&self, session: &Session) -> IamResult<Vec<GroupSnapshot>> {
        let mut snapshots = Vec::with_capacity(3);
        for name in self.groups.all() {
            let snapshot = session.groups.get_everything_in_group(name).await?;
            tracing::info!(
                group = name,
                members = snapshot.members.len(),
                administrators = snapshot.administrators.len(),
                "group inspected"
            );
            snapshots.push(snapshot);
        }
        Ok(snapshots)
    }

    /// Cleanup using an existing session.
    pub async fn cleanup_with(&self, session: &Session) -> IamResult<()> {
        for name in self.groups.all() {
            session.groups.delete_group(name).await?;
        }
        tracing::info!("cleanup complete");
        Ok(())
    }
}
