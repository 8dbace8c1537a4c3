pub mod commands;
pub mod config;
pub mod errors;
pub mod policy;
pub mod rules;
pub mod stacks;
pub mod synth;
pub mod utils;

pub use crate::errors::{Error, Result};

/// Synthesizes every stack from in-memory documents. See
/// [`commands::helper::synth_and_return_json`].
pub fn run_synth(
    config: &str,
    account: &str,
    region: &str,
    policy_template: &str,
) -> Result<String> {
    crate::commands::helper::synth_and_return_json(config, account, region, policy_template)
}
