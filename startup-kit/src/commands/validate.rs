use std::io::Write;

use clap::Args;
use colored::*;

use crate::commands::files::read_config_contents;
use crate::commands::{Executable, FAILURE_STATUS_CODE, SUCCESS_STATUS_CODE};
use crate::config::AppConfig;
use crate::errors::{Error, Errors, Result};
use crate::utils::reader::Reader;
use crate::utils::writer::Writer;

const ABOUT: &str =
    "Checks an application configuration document and reports every field-level problem";
const CONFIG_HELP: &str =
    "Provide a path to the application configuration document in JSON or YAML, `-` reads it from stdin";

#[derive(Debug, Clone, Eq, PartialEq, Args)]
#[clap(arg_required_else_help = true)]
#[clap(about=ABOUT)]
/// .
/// The Validate command runs the same schema check synthesis starts with,
/// but reports the full list of field-level problems instead of aborting at
/// the first one.
pub struct Validate {
    /// the path to the application configuration document
    #[arg(short, long, help=CONFIG_HELP)]
    pub(crate) config: String,
}

impl Executable for Validate {
    fn execute(&self, writer: &mut Writer, reader: &mut Reader) -> Result<i32> {
        let contents = read_config_contents(&self.config, reader)?;

        let status = match AppConfig::from_str(&contents).and_then(|config| config.validate()) {
            Ok(()) => {
                writeln!(writer, "{} Status = {}", self.config, "PASS".green())?;
                SUCCESS_STATUS_CODE
            }
            Err(Error::Errors(Errors(errors))) => {
                for error in &errors {
                    writeln!(writer, "{}", error.to_string().red())?;
                }
                writeln!(writer, "{} Status = {}", self.config, "FAIL".red())?;
                FAILURE_STATUS_CODE
            }
            Err(error @ Error::Configuration(_)) => {
                writeln!(writer, "{}", error.to_string().red())?;
                writeln!(writer, "{} Status = {}", self.config, "FAIL".red())?;
                FAILURE_STATUS_CODE
            }
            Err(error) => return Err(error),
        };

        Ok(status)
    }
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod validate_tests;
