//! # hip-iam
//!
//! Provisioning client for identity service groups.
//!
//! This crate sets up and tears down a fixed hierarchy of test groups:
//! - Service-to-service token acquisition (client-credentials grant)
//! - Group creation, lookup and deletion
//! - User and nested-group role assignments
//! - Orchestrated `setup`, `inspect` and `cleanup` scenarios

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod groups;
pub mod http;
pub mod membership;
pub mod model;
pub mod orchestrator;
pub mod output;
pub mod token;

pub use config::Config;
pub use error::{IamError, IamResult};
pub use groups::{sanitize_group_name, GroupAdminClient};
pub use membership::MembershipClient;
pub use model::{Group, GroupLists, GroupSnapshot, Role, User};
pub use orchestrator::Orchestrator;
pub use token::{get_auth_token, AccessToken};
