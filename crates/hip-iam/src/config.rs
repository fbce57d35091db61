//! Provisioning configuration.
//!
//! Values come from an optional TOML file, overridden by environment
//! variables. The result is validated once at start-up and passed down
//! explicitly; nothing reads the environment afterwards.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{IamError, IamResult};

/// Scope list requested with the client-credentials grant.
pub const DEFAULT_SCOPE: &str = "openid email roles team profile group clb.wiki.read clb.wiki.write";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const DEFAULT_ROOT_GROUP: &str = "HIP-Projects-testing";
const DEFAULT_GROUP_1: &str = "HIP-Projects-Epilepsy-101-testing";
const DEFAULT_GROUP_2: &str = "HIP-Projects-Epilepsy-102-testing";

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Token endpoint and client credentials.
    pub iam: IamConfig,
    /// Base URL of the identity service API, without trailing slash.
    pub api_url: String,
    /// Users assigned during setup; absent when not all are configured.
    pub users: Option<UserNames>,
    /// Groups managed by the orchestrator.
    pub groups: GroupNames,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
    missing_users: Vec<&'static str>,
}

/// Token endpoint and client credentials.
#[derive(Clone)]
pub struct IamConfig {
    /// OAuth2 token endpoint.
    pub token_url: String,
    /// Client ID.
    pub client_id: String,
    /// Client secret.
    pub client_secret: String,
    /// Space separated scopes.
    pub scope: String,
}

impl std::fmt::Debug for IamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IamConfig")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("scope", &self.scope)
            .finish()
    }
}

/// Users assigned into the test hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserNames {
    /// Administrator of the root group and group 1.
    pub admin: String,
    /// First regular user.
    pub user1: String,
    /// Second regular user.
    pub user2: String,
}

/// Names of the root group and its two children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupNames {
    /// Root group.
    pub root: String,
    /// First child group.
    pub group1: String,
    /// Second child group.
    pub group2: String,
}

impl Default for GroupNames {
    fn default() -> Self {
        Self {
            root: DEFAULT_ROOT_GROUP.to_string(),
            group1: DEFAULT_GROUP_1.to_string(),
            group2: DEFAULT_GROUP_2.to_string(),
        }
    }
}

impl GroupNames {
    /// Returns the names in declaration order: root, group 1, group 2.
    pub fn all(&self) -> [&str; 3] {
        [&self.root, &self.group1, &self.group2]
    }
}

/// On-disk configuration. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Identity service base URL.
    pub api_url: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Token endpoint settings.
    pub iam: FileIamConfig,
    /// User names.
    pub users: FileUserNames,
    /// Group names.
    pub groups: FileGroupNames,
}

/// `[iam]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileIamConfig {
    /// Token endpoint.
    pub token_url: Option<String>,
    /// Client ID.
    pub client_id: Option<String>,
    /// Client secret.
    pub client_secret: Option<String>,
    /// Scope override.
    pub scope: Option<String>,
}

/// `[users]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileUserNames {
    /// Administrator user.
    pub admin: Option<String>,
    /// First user.
    pub user1: Option<String>,
    /// Second user.
    pub user2: Option<String>,
}

/// `[groups]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGroupNames {
    /// Root group.
    pub root: Option<String>,
    /// First child group.
    pub group1: Option<String>,
    /// Second child group.
    pub group2: Option<String>,
}

impl FileConfig {
    /// Reads a TOML configuration file.
    pub fn read(path: &Path) -> IamResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            IamError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        toml::from_str(&content).map_err(|e| {
            IamError::Config(format!("failed to parse {}: {e}", path.display()))
        })
    }
}

impl Config {
    /// Loads configuration from the given file (or the default location when
    /// it exists) and the process environment.
    pub fn load(path: Option<&Path>) -> IamResult<Self> {
        let file = match path {
            Some(p) => FileConfig::read(p)?,
            None => match Self::default_path() {
                Some(p) if p.exists() => FileConfig::read(&p)?,
                _ => FileConfig::default(),
            },
        };

        Self::from_sources(file, |key| std::env::var(key).ok())
    }

    /// Default configuration file path: `~/.hip-iam/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs_next::home_dir().map(|home| home.join(".hip-iam").join("config.toml"))
    }

    /// Merges a file configuration with environment lookups and validates
    /// the result. Environment values win over file values.
    pub fn from_sources<F>(file: FileConfig, env: F) -> IamResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();

        let mut required = |key: &'static str, fallback: Option<String>| -> String {
            match pick(&env, key, fallback) {
                Some(v) => v,
                None => {
                    missing.push(key);
                    String::new()
                }
            }
        };

        let token_url = required("IAM_CLIENT_URL", file.iam.token_url);
        let client_id = required("IAM_CLIENT_ID", file.iam.client_id);
        let client_secret = required("IAM_CLIENT_SECRET", file.iam.client_secret);
        let api_url = required("EBRAINS_API_URL", file.api_url);

        if !missing.is_empty() {
            return Err(IamError::Config(format!(
                "missing required variables: {}",
                missing.join(", ")
            )));
        }

        check_url("IAM_CLIENT_URL", &token_url)?;
        check_url("EBRAINS_API_URL", &api_url)?;

        let defaults = GroupNames::default();
        let groups = GroupNames {
            root: pick(&env, "ROOT_GROUP", file.groups.root).unwrap_or(defaults.root),
            group1: pick(&env, "GROUP_1", file.groups.group1).unwrap_or(defaults.group1),
            group2: pick(&env, "GROUP_2", file.groups.group2).unwrap_or(defaults.group2),
        };

        let timeout_secs = match env("HIP_IAM_TIMEOUT_SECS") {
            Some(v) => v.trim().parse().map_err(|_| {
                IamError::Config(format!("HIP_IAM_TIMEOUT_SECS is not a number: {v}"))
            })?,
            None => file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
        check_timeout(timeout_secs)?;

        // Only the scenarios need user names; single calls work without them.
        let mut missing_users = Vec::new();
        let mut user = |key: &'static str, fallback: Option<String>| {
            let value = pick(&env, key, fallback);
            if value.is_none() {
                missing_users.push(key);
            }
            value
        };
        let admin = user("ADMIN", file.users.admin);
        let user1 = user("USER1", file.users.user1);
        let user2 = user("USER2", file.users.user2);
        let users = match (admin, user1, user2) {
            (Some(admin), Some(user1), Some(user2)) => Some(UserNames {
                admin,
                user1,
                user2,
            }),
            _ => None,
        };

        Ok(Self {
            iam: IamConfig {
                token_url,
                client_id,
                client_secret,
                scope: pick(&env, "IAM_SCOPE", file.iam.scope)
                    .unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            },
            api_url: api_url.trim_end_matches('/').to_string(),
            users,
            groups,
            timeout_secs,
            missing_users,
        })
    }

    /// User names for the scenarios, or a `Config` error naming the missing
    /// variables.
    pub fn users(&self) -> IamResult<&UserNames> {
        self.users.as_ref().ok_or_else(|| {
            IamError::Config(format!(
                "missing required variables: {}",
                self.missing_users.join(", ")
            ))
        })
    }

    /// Overrides the request timeout.
    pub fn set_timeout(&mut self, secs: u64) -> IamResult<()> {
        check_timeout(secs)?;
        self.timeout_secs = secs;
        Ok(())
    }
}

/// Environment first, then file; empty strings count as absent.
fn pick<F>(env: &F, key: &str, fallback: Option<String>) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    env(key)
        .or(fallback)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_url(key: &str, value: &str) -> IamResult<()> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(IamError::Config(format!(
            "{key} must be an http(s) URL, got '{value}'"
        )))
    }
}

fn check_timeout(secs: u64) -> IamResult<()> {
    if secs == 0 {
        return Err(IamError::Config(
            "timeout must be at least one second".to_string(),
        ));
    }
    Ok(())
}
