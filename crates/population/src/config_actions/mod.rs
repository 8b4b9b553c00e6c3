//! Configuration changes requested from outside the engine (UI, tooling,
//! scripted setups). Requests are queued as [`ConfigAction`]s and applied in
//! order by [`apply_config_actions`] before any capacity is recomputed.

pub mod actions;
pub mod executor;
pub mod queue;
pub mod results;

pub use actions::ConfigAction;
pub use executor::{apply_config_action, apply_config_actions, PopConfigChanged};
pub use queue::ConfigQueue;
pub use results::ConfigError;
