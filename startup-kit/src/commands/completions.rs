use std::fs::File;
use std::io::Write;
use std::path::Path;

use clap::{Args, CommandFactory, ValueEnum};

use crate::commands::{Cli, Executable, APP_NAME, SUCCESS_STATUS_CODE};
use crate::errors::{Error, Result};
use crate::utils::reader::Reader;
use crate::utils::writer::Writer;

#[derive(Copy, Clone, ValueEnum, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[derive(Debug, Args)]
pub struct Completions {
    #[arg(
        long,
        short,
        value_name = LOCATION,
        help = "the location where the completions script will be, if no value is present the script will be written to stdout",
    )]
    location: Option<String>,
    #[arg(
        long,
        short,
        value_name = "shell",
        required = true,
        help = "the shell you are currently running"
    )]
    shell: Shell,
}

const LOCATION: &str = "location";

impl Executable for Completions {
    fn execute(&self, _: &mut Writer, _: &mut Reader) -> Result<i32> {
        let mut app = Cli::command();

        let mut writer = match &self.location {
            Some(location) => {
                let path = Path::new(&location);
                if !path.exists() || !path.is_dir() {
                    return Err(Error::IllegalArguments(String::from("incompatible path")));
                }

                Box::new(File::create(path.join("startup-kit.sh"))?) as Box<dyn Write>
            }
            None => Box::new(std::io::stdout()) as Box<dyn Write>,
        };

        match self.shell {
            Shell::Bash => clap_complete::generate(
                clap_complete::shells::Bash,
                &mut app,
                APP_NAME,
                &mut writer,
            ),
            Shell::Zsh => clap_complete::generate(
                clap_complete::shells::Zsh,
                &mut app,
                APP_NAME,
                &mut writer,
            ),
            Shell::Fish => clap_complete::generate(
                clap_complete::shells::Fish,
                &mut app,
                APP_NAME,
                &mut writer,
            ),
            Shell::PowerShell => clap_complete::generate(
                clap_complete::shells::PowerShell,
                &mut app,
                APP_NAME,
                &mut writer,
            ),
        }

        Ok(SUCCESS_STATUS_CODE)
    }
}
