pub(crate) mod files;
pub mod helper;

pub mod completions;
pub mod synth;
pub mod validate;

use clap::{Parser, Subcommand};

use crate::errors::Result;
use crate::utils::reader::Reader;
use crate::utils::writer::Writer;

//
// Constants
//
// Application metadata
pub const APP_NAME: &str = "startup-kit";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const ABOUT: &str = r#"
  startup-kit translates one application configuration document into the
  baseline stack templates a new AWS account should start with - AWS Config
  managed rules with an SNS alert topic, a scheduled compliance-check
  function, a monthly cost budget, and optional per-environment VPCs. It
  only produces declarations; deploying them is the job of your deployment
  engine."#;

// Commands
pub const SYNTH: &str = "synth";
pub const VALIDATE: &str = "validate";
pub const COMPLETIONS: &str = "completions";

pub const SUCCESS_STATUS_CODE: i32 = 0;
pub const FAILURE_STATUS_CODE: i32 = 19;
pub const ERROR_STATUS_CODE: i32 = 5;

/// Every subcommand runs through the injected writer/reader pair and reports
/// its exit status code.
pub trait Executable {
    fn execute(&self, writer: &mut Writer, reader: &mut Reader) -> Result<i32>;
}

#[derive(Debug, Parser)]
#[command(name = APP_NAME, version = APP_VERSION, about = ABOUT, arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: StartupKitCommand,
}

#[derive(Debug, Subcommand)]
pub enum StartupKitCommand {
    #[command(name = SYNTH)]
    Synth(synth::Synth),
    #[command(name = VALIDATE)]
    Validate(validate::Validate),
    #[command(name = COMPLETIONS)]
    Completions(completions::Completions),
}

impl StartupKitCommand {
    pub fn execute(&self, writer: &mut Writer, reader: &mut Reader) -> Result<i32> {
        match self {
            StartupKitCommand::Synth(cmd) => cmd.execute(writer, reader),
            StartupKitCommand::Validate(cmd) => cmd.execute(writer, reader),
            StartupKitCommand::Completions(cmd) => cmd.execute(writer, reader),
        }
    }
}
