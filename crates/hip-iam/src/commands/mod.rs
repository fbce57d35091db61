//! Command implementations.

pub mod group;
pub mod member;
pub mod scenario;
pub mod user;

pub use group::run_group;
pub use member::run_member;
pub use scenario::{run_cleanup, run_inspect, run_scenario, run_setup, run_smoke};
pub use user::run_user;
