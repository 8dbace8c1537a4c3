//! Application configuration document.
//!
//! The document is read once at startup, schema-checked in a single pass that
//! reports every field-level problem at once, and never mutated afterwards.
//! Composition only ever runs over a configuration that passed [`AppConfig::validate`].

use std::collections::HashSet;

use serde::Deserialize;

use crate::errors::{Error, Errors, Result};

/// Top-level shape of `app.config.json` (JSON or YAML).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Both `accountID` and `accountId` spellings are accepted.
    #[serde(default, alias = "accountID")]
    pub account_id: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub email_subscriber: Option<String>,
    #[serde(default)]
    pub required_tags: Vec<String>,
    #[serde(default)]
    pub monthly_budget: Option<f64>,
    #[serde(default)]
    pub vpc: Option<VpcConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VpcConfig {
    #[serde(default)]
    pub create_vpc: bool,
    #[serde(default)]
    pub environments: Vec<NetworkEnvironment>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkEnvironment {
    pub environment_name: String,
    pub cidr: String,
    #[serde(rename = "maxAZs")]
    pub max_azs: u32,
    #[serde(default)]
    pub subnets: Vec<SubnetSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubnetSpec {
    pub name: String,
    pub subnet_type: SubnetType,
    /// Defaulted to /24 at composition time when unset.
    #[serde(default)]
    pub cidr_mask: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum SubnetType {
    #[serde(rename = "public", alias = "Public", alias = "PUBLIC")]
    Public,
    #[serde(rename = "private", alias = "Private", alias = "PRIVATE")]
    Private,
    #[serde(rename = "isolated", alias = "Isolated", alias = "ISOLATED")]
    Isolated,
}

impl SubnetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubnetType::Public => "public",
            SubnetType::Private => "private",
            SubnetType::Isolated => "isolated",
        }
    }
}

impl AppConfig {
    /// Parses a configuration document. Both JSON and YAML are accepted; any
    /// shape mismatch (a string where a number belongs, an unknown subnet
    /// type) is a fatal configuration error.
    pub fn from_str(contents: &str) -> Result<AppConfig> {
        serde_yaml::from_str(contents)
            .map_err(|e| Error::Configuration(format!("malformed configuration document, {}", e)))
    }

    /// Schema check, run once before any composition. Collects every
    /// field-level problem rather than stopping at the first.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<Error> = vec![];

        match &self.email_subscriber {
            None => errors.push(Error::Configuration(
                "`emailSubscriber` is required".to_string(),
            )),
            Some(email) if email.is_empty() => errors.push(Error::Configuration(
                "`emailSubscriber` must not be empty".to_string(),
            )),
            Some(_) => {}
        }

        match self.monthly_budget {
            None => errors.push(Error::Configuration(
                "`monthlyBudget` is required and must be a number".to_string(),
            )),
            Some(amount) if amount <= 0.0 => errors.push(Error::Configuration(format!(
                "`monthlyBudget` must be a positive amount, got {}",
                amount
            ))),
            Some(_) => {}
        }

        for (i, tag) in self.required_tags.iter().enumerate() {
            if tag.is_empty() {
                errors.push(Error::Configuration(format!(
                    "`requiredTags[{}]` must not be an empty tag key",
                    i
                )));
            }
        }

        if let Some(vpc) = &self.vpc {
            validate_vpc(vpc, &mut errors);
        }

        Errors(errors).into_result()
    }
}

fn validate_vpc(vpc: &VpcConfig, errors: &mut Vec<Error>) {
    let mut seen_environments = HashSet::new();

    for environment in &vpc.environments {
        let name = &environment.environment_name;
        if name.is_empty() {
            errors.push(Error::Configuration(
                "`vpc.environments[].environmentName` must not be empty".to_string(),
            ));
            continue;
        }

        if !seen_environments.insert(name.clone()) {
            errors.push(Error::Configuration(format!(
                "duplicate VPC environment name `{}`",
                name
            )));
        }

        if environment.max_azs == 0 {
            errors.push(Error::Configuration(format!(
                "`maxAZs` for environment `{}` must be a positive integer",
                name
            )));
        }

        let mut seen_subnets = HashSet::new();
        for subnet in &environment.subnets {
            if subnet.name.is_empty() {
                errors.push(Error::Configuration(format!(
                    "a subnet in environment `{}` has an empty name",
                    name
                )));
                continue;
            }

            if !seen_subnets.insert(subnet.name.clone()) {
                errors.push(Error::Configuration(format!(
                    "duplicate subnet name `{}` in environment `{}`",
                    subnet.name, name
                )));
            }

            if let Some(mask) = subnet.cidr_mask {
                if mask > 32 {
                    errors.push(Error::Configuration(format!(
                        "`cidrMask` for subnet `{}` in environment `{}` must be within [0, 32], got {}",
                        subnet.name, name, mask
                    )));
                }
            }
        }
    }
}

/// The account and region a synthesized stack is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub account: String,
    pub region: String,
}

impl Environment {
    /// Resolution order for each field: explicit override (CLI flag), process
    /// environment, then the configuration document. Anything still missing
    /// after the fallbacks is a configuration error.
    pub fn resolve(
        account_override: Option<String>,
        region_override: Option<String>,
        config: &AppConfig,
    ) -> Result<Environment> {
        let account = resolve_field(
            account_override,
            config.account_id.clone(),
            "account id",
            "`accountID`",
        )?;
        let region = resolve_field(region_override, config.region.clone(), "region", "`region`")?;

        Ok(Environment { account, region })
    }
}

fn resolve_field(
    override_value: Option<String>,
    config_value: Option<String>,
    what: &str,
    field: &str,
) -> Result<String> {
    override_value
        .or(config_value)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            Error::Configuration(format!(
                "no {} given, pass one or set {} in the configuration document",
                what, field
            ))
        })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
