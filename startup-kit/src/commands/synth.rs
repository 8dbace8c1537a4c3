use std::fs;
use std::io::Write;
use std::path::Path;

use clap::{Args, ValueEnum};
use serde_json::{Map, Value};

use crate::commands::files::read_config_contents;
use crate::commands::{Executable, SUCCESS_STATUS_CODE};
use crate::config::{AppConfig, Environment};
use crate::errors::Result;
use crate::policy;
use crate::stacks::{startup_check, vpc};
use crate::synth::Stack;
use crate::utils::reader::Reader;
use crate::utils::writer::Writer;

/// Process-environment override hooks for the deployment account and region.
pub const ACCOUNT_ENV_VAR: &str = "STARTUP_KIT_ACCOUNT";
pub const REGION_ENV_VAR: &str = "STARTUP_KIT_REGION";

pub const DEFAULT_POLICY_TEMPLATE: &str = "resources/check-config-rules-policy.json";

const ABOUT: &str =
    "Translates an application configuration document into deployable stack templates";
const CONFIG_HELP: &str =
    "Provide a path to the application configuration document in JSON or YAML, `-` reads it from stdin";
const OUTPUT_HELP: &str =
    "Write one template file per stack into this directory instead of printing to stdout";
const STACK_HELP: &str = "Restrict synthesis to a single stack";
const ACCOUNT_HELP: &str =
    "Deployment account id, overrides STARTUP_KIT_ACCOUNT and the configuration document";
const REGION_HELP: &str =
    "Deployment region, overrides STARTUP_KIT_REGION and the configuration document";
const POLICY_TEMPLATE_HELP: &str = "Path to the compliance-check policy template";

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StackSelector {
    All,
    StartupCheck,
    Vpc,
}

impl StackSelector {
    fn includes_startup_check(self) -> bool {
        matches!(self, StackSelector::All | StackSelector::StartupCheck)
    }

    fn includes_vpc(self) -> bool {
        matches!(self, StackSelector::All | StackSelector::Vpc)
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
#[clap(arg_required_else_help = true)]
#[clap(about=ABOUT)]
/// .
/// The Synth command reads one configuration document, schema-checks it, and
/// assembles the selected stacks into template documents. Synthesis is
/// all-or-nothing; any configuration or composition error aborts the pass
/// before anything is written.
pub struct Synth {
    /// the path to the application configuration document
    #[arg(short, long, help=CONFIG_HELP)]
    pub(crate) config: String,
    /// directory the templates are written to
    /// default None
    /// if set to None the template assembly is written to stdout
    #[arg(short, long, help=OUTPUT_HELP)]
    pub(crate) output: Option<String>,
    #[arg(short, long, value_enum, default_value_t = StackSelector::All, help=STACK_HELP)]
    pub(crate) stack: StackSelector,
    #[arg(long, help=ACCOUNT_HELP)]
    pub(crate) account: Option<String>,
    #[arg(long, help=REGION_HELP)]
    pub(crate) region: Option<String>,
    #[arg(short, long, default_value = DEFAULT_POLICY_TEMPLATE, help=POLICY_TEMPLATE_HELP)]
    pub(crate) policy_template: String,
}

impl Executable for Synth {
    /// .
    /// synthesize stack templates from the configuration document
    ///
    /// This function will return an error if
    /// - the configuration document or policy template path does not exist
    /// - the configuration document fails the schema check
    /// - no account id or region is resolvable from flags, the process
    ///   environment or the document
    /// - any composition step fails
    fn execute(&self, writer: &mut Writer, reader: &mut Reader) -> Result<i32> {
        let contents = read_config_contents(&self.config, reader)?;
        let config = AppConfig::from_str(&contents)?;
        config.validate()?;

        let environment = Environment::resolve(
            self.account
                .clone()
                .or_else(|| std::env::var(ACCOUNT_ENV_VAR).ok()),
            self.region
                .clone()
                .or_else(|| std::env::var(REGION_ENV_VAR).ok()),
            &config,
        )?;

        let stacks = synthesize(&config, &environment, &self.policy_template, self.stack)?;

        match &self.output {
            Some(directory) => write_to_directory(writer, directory, &stacks)?,
            None => {
                let document = templates_document(&stacks);
                writeln!(writer, "{}", serde_json::to_string_pretty(&document)?)?;
            }
        }

        Ok(SUCCESS_STATUS_CODE)
    }
}

/// Assembles the selected stacks. The policy template is only read when the
/// startup-check stack is part of the selection.
pub(crate) fn synthesize(
    config: &AppConfig,
    environment: &Environment,
    policy_template_path: &str,
    selector: StackSelector,
) -> Result<Vec<Stack>> {
    let mut stacks = vec![];

    if selector.includes_startup_check() {
        let template = policy::read_policy_template(policy_template_path)?;
        stacks.push(startup_check::assemble(config, environment, &template)?);
    }

    if selector.includes_vpc() {
        let vpc_config = config.vpc.clone().unwrap_or_default();
        stacks.push(vpc::assemble(&vpc_config)?);
    }

    Ok(stacks)
}

/// One document keyed by stack name, template per stack, in synthesis order.
pub(crate) fn templates_document(stacks: &[Stack]) -> Value {
    let mut document = Map::new();
    for stack in stacks {
        document.insert(stack.name().to_string(), stack.template());
    }
    Value::Object(document)
}

fn write_to_directory(writer: &mut Writer, directory: &str, stacks: &[Stack]) -> Result<()> {
    fs::create_dir_all(directory)?;

    for stack in stacks {
        let path = Path::new(directory).join(format!("{}.template.json", stack.name()));
        fs::write(&path, stack.template_json()?)?;
        writeln!(writer, "Wrote {}", path.display())?;
    }

    Ok(())
}

#[cfg(test)]
#[path = "synth_tests.rs"]
mod synth_tests;
