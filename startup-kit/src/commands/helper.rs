//! In-memory synthesis entry used by embedders and tests: no filesystem, no
//! process environment, everything passed as strings.

use crate::commands::synth::templates_document;
use crate::config::{AppConfig, Environment};
use crate::errors::Result;
use crate::stacks::{startup_check, vpc};

/// Synthesizes both stacks from in-memory documents and returns the template
/// assembly as pretty-printed JSON, keyed by stack name.
pub fn synth_and_return_json(
    config_contents: &str,
    account: &str,
    region: &str,
    policy_template: &str,
) -> Result<String> {
    let config = AppConfig::from_str(config_contents)?;
    config.validate()?;

    let environment = Environment {
        account: account.to_string(),
        region: region.to_string(),
    };

    let check_stack = startup_check::assemble(&config, &environment, policy_template)?;
    let vpc_stack = vpc::assemble(&config.vpc.clone().unwrap_or_default())?;

    let document = templates_document(&[check_stack, vpc_stack]);
    Ok(serde_json::to_string_pretty(&document)?)
}
