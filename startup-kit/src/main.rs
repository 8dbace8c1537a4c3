use std::process::exit;

use clap::Parser;

use startup_kit::commands::{Cli, ERROR_STATUS_CODE};
use startup_kit::utils::reader::{ReadBuffer, Reader};
use startup_kit::utils::writer::{WriteBuffer, Writer};

fn main() {
    let cli = Cli::parse();

    let mut writer = Writer::new(
        WriteBuffer::Stdout(std::io::stdout()),
        WriteBuffer::Stderr(std::io::stderr()),
    );
    let mut reader = Reader::new(ReadBuffer::Stdin(std::io::stdin()));

    match cli.command.execute(&mut writer, &mut reader) {
        Ok(code) => exit(code),
        Err(e) => {
            writer
                .write_err(format!("Error occurred {}", e))
                .expect("failed to write to stderr");

            exit(ERROR_STATUS_CODE);
        }
    }
}
