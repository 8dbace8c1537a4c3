//! The VPC stack: one VPC declaration per configured network environment.
//!
//! Composition is gated by `createVpc`; a false flag short-circuits to an
//! empty stack no matter how many environments are configured. A failure in
//! any single environment aborts the whole pass, partial graphs are never
//! emitted. CIDR well-formedness is left to the downstream engine.

use serde::Serialize;

use crate::config::{NetworkEnvironment, VpcConfig};
use crate::errors::{Error, Result};
use crate::synth::Stack;

pub const STACK_NAME: &str = "vpc";
const STACK_DESCRIPTION: &str = "Per-environment VPCs";

pub const VPC_KIND: &str = "AWS::EC2::VPC";

pub const DEFAULT_SUBNET_MASK: u8 = 24;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VpcProperties<'a> {
    cidr: &'a str,
    max_azs: u32,
    subnet_configuration: Vec<SubnetConfiguration<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubnetConfiguration<'a> {
    name: &'a str,
    subnet_type: &'static str,
    cidr_mask: u8,
}

/// Composes one VPC declaration for `environment`, defaulting unset subnet
/// masks to /24 and passing everything else through unchanged.
pub fn compose_vpc(stack: &mut Stack, environment: &NetworkEnvironment) -> Result<()> {
    if environment.environment_name.is_empty() {
        return Err(Error::Composition(
            "a VPC environment has an empty `environmentName`".to_string(),
        ));
    }

    if environment.subnets.is_empty() {
        return Err(Error::Composition(format!(
            "environment `{}` declares no subnets",
            environment.environment_name
        )));
    }

    let mut subnet_configuration = Vec::with_capacity(environment.subnets.len());
    for subnet in &environment.subnets {
        let cidr_mask = subnet.cidr_mask.unwrap_or(DEFAULT_SUBNET_MASK);
        if cidr_mask > 32 {
            return Err(Error::Composition(format!(
                "`cidrMask` for subnet `{}` in environment `{}` must be within [0, 32], got {}",
                subnet.name, environment.environment_name, cidr_mask
            )));
        }

        subnet_configuration.push(SubnetConfiguration {
            name: &subnet.name,
            subnet_type: subnet.subnet_type.as_str(),
            cidr_mask,
        });
    }

    let properties = VpcProperties {
        cidr: &environment.cidr,
        max_azs: environment.max_azs,
        subnet_configuration,
    };

    stack.add_resource(
        &environment.environment_name,
        VPC_KIND,
        serde_json::to_value(&properties)?,
    )
}

/// Iterates the configured environments in order, only when `createVpc` is
/// set.
pub fn assemble(config: &VpcConfig) -> Result<Stack> {
    let mut stack = Stack::with_description(STACK_NAME, STACK_DESCRIPTION);

    if !config.create_vpc {
        return Ok(stack);
    }

    for environment in &config.environments {
        compose_vpc(&mut stack, environment)?;
    }

    Ok(stack)
}

#[cfg(test)]
#[path = "vpc_tests.rs"]
mod vpc_tests;
