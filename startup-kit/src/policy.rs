//! Inline policy document loaded from a template file.
//!
//! The template carries literal `REGION` and `ACCOUNTID` tokens. Substitution
//! is a global string replace, not templating: every occurrence anywhere in
//! the file is replaced before the result is parsed as JSON. A document that
//! fails to parse afterwards aborts synthesis.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde_json::Value;

use crate::config::Environment;
use crate::errors::{Error, Result};

pub const REGION_TOKEN: &str = "REGION";
pub const ACCOUNT_ID_TOKEN: &str = "ACCOUNTID";

pub fn substitute_tokens(template: &str, environment: &Environment) -> String {
    template
        .replace(REGION_TOKEN, &environment.region)
        .replace(ACCOUNT_ID_TOKEN, &environment.account)
}

/// Substitutes both tokens and parses the result as a JSON policy document.
pub fn parse_policy_document(template: &str, environment: &Environment) -> Result<Value> {
    let substituted = substitute_tokens(template, environment);
    serde_json::from_str(&substituted)
        .map_err(|e| Error::TemplateSubstitution(format!("{}", e)))
}

pub fn read_policy_template(path: &str) -> Result<String> {
    if !Path::new(path).exists() {
        return Err(Error::FileNotFoundError(path.to_string()));
    }

    let mut contents = String::new();
    let mut reader = BufReader::new(File::open(path)?);
    reader.read_to_string(&mut contents)?;

    Ok(contents)
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod policy_tests;
