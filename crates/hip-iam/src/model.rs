//! Identity service resource representations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Role qualifying a membership relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Group administrator.
    Administrator,
    /// Regular member.
    #[default]
    Member,
}

impl Role {
    /// Path and query form of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Administrator => "administrator",
            Self::Member => "member",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "administrator" => Ok(Self::Administrator),
            "member" => Ok(Self::Member),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// A group as returned by the identity service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Tabled)]
#[serde(rename_all = "camelCase", default)]
pub struct Group {
    /// Unique name, used as the path segment.
    pub name: String,
    /// Display title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Whether users may request membership.
    #[tabled(rename = "Accepts Requests")]
    pub accept_membership_request: bool,
}

/// Body of a group creation request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    /// Sanitized name.
    pub name: String,
    /// Title, same as the name.
    pub title: String,
    /// Description derived from the name.
    pub description: String,
    /// Always `true` for provisioned groups.
    pub accept_membership_request: bool,
}

impl CreateGroupRequest {
    /// Builds the request for an already sanitized name.
    pub fn for_name(sanitized: &str) -> Self {
        Self {
            name: sanitized.to_string(),
            title: sanitized.to_string(),
            description: format!("description {sanitized}"),
            accept_membership_request: true,
        }
    }
}

/// A user account. Read-only from this client's perspective.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Tabled)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    /// User ID.
    pub id: String,
    /// Legacy OIDC identifier.
    #[tabled(skip)]
    pub mitreid: String,
    /// Username.
    pub username: String,
    /// First name.
    #[tabled(rename = "First Name")]
    pub first_name: String,
    /// Last name.
    #[tabled(rename = "Last Name")]
    pub last_name: String,
    /// Profile text.
    #[tabled(skip)]
    pub biography: String,
    /// Avatar URL.
    #[tabled(skip)]
    pub avatar: String,
    /// Whether the account is active.
    pub active: bool,
}

/// Users, units and groups holding a role within a group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupLists {
    /// Users.
    pub users: Vec<User>,
    /// Units; opaque to this client.
    pub units: Vec<serde_json::Value>,
    /// Nested groups.
    pub groups: Vec<Group>,
}

impl GroupLists {
    /// Total number of entries across users, units and groups.
    pub fn len(&self) -> usize {
        self.users.len() + self.units.len() + self.groups.len()
    }

    /// Whether nothing holds the role.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A group together with its members and administrators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    /// The group itself, flattened into the snapshot.
    #[serde(flatten)]
    pub group: Group,
    /// Entries holding the `member` role.
    pub members: GroupLists,
    /// Entries holding the `administrator` role.
    pub administrators: GroupLists,
}

/// Tabular view of one entry in a [`GroupLists`].
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct MemberRow {
    /// `user`, `group` or `unit`.
    pub kind: &'static str,
    /// Username or group name.
    pub name: String,
    /// Role held in the group.
    pub role: Role,
}

impl MemberRow {
    /// Flattens a role list into table rows.
    pub fn from_lists(lists: &GroupLists, role: Role) -> Vec<Self> {
        let users = lists.users.iter().map(|u| Self {
            kind: "user",
            name: u.username.clone(),
            role,
        });
        let groups = lists.groups.iter().map(|g| Self {
            kind: "group",
            name: g.name.clone(),
            role,
        });
        let units = lists.units.iter().map(|u| Self {
            kind: "unit",
            name: u
                .get("name")
                .and_then(serde_json::Value::as_str)
                .map_or_else(|| u.to_string(), str::to_string),
            role,
        });
        users.chain(groups).chain(units).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_path_form() {
        assert_eq!(Role::Administrator.to_string(), "administrator");
        assert_eq!(Role::Member.as_str(), "member");
        assert_eq!("member".parse::<Role>(), Ok(Role::Member));
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn create_request_uses_camel_case() {
        let json = serde_json::to_value(CreateGroupRequest::for_name("hip-projects")).unwrap();
        assert_eq!(json["name"], "hip-projects");
        assert_eq!(json["title"], "hip-projects");
        assert_eq!(json["description"], "description hip-projects");
        assert_eq!(json["acceptMembershipRequest"], true);
    }

    #[test]
    fn group_lists_tolerate_missing_fields() {
        let lists: GroupLists =
            serde_json::from_str(r#"{"users":[{"username":"bob","firstName":"Bob"}]}"#).unwrap();
        assert_eq!(lists.users[0].username, "bob");
        assert_eq!(lists.users[0].first_name, "Bob");
        assert!(lists.groups.is_empty());
        assert_eq!(lists.len(), 1);
    }

    #[test]
    fn snapshot_flattens_group_fields() {
        let snapshot = GroupSnapshot {
            group: Group {
                name: "root".to_string(),
                title: "root".to_string(),
                description: "description root".to_string(),
                accept_membership_request: true,
            },
            members: GroupLists::default(),
            administrators: GroupLists::default(),
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["name"], "root");
        assert_eq!(json["acceptMembershipRequest"], true);
        assert!(json["members"]["users"].as_array().unwrap().is_empty());
    }

    #[test]
    fn member_rows_cover_users_and_groups() {
        let lists = GroupLists {
            users: vec![User {
                username: "bob".to_string(),
                ..User::default()
            }],
            units: vec![],
            groups: vec![Group {
                name: "child".to_string(),
                ..Group::default()
            }],
        };

        let rows = MemberRow::from_lists(&lists, Role::Administrator);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].kind, "user");
        assert_eq!(rows[1].name, "child");
        assert_eq!(rows[1].role, Role::Administrator);
    }
}
