use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;

use clap::Parser;

use startup_kit::commands::{Cli, APP_NAME};
use startup_kit::utils::reader::ReadBuffer::File as ReadFile;
use startup_kit::utils::reader::Reader;
use startup_kit::utils::writer::Writer;

#[non_exhaustive]
pub struct StatusCode;

#[allow(dead_code)]
impl StatusCode {
    pub const SUCCESS: i32 = 0;
    pub const INTERNAL_FAILURE: i32 = -1;
    pub const VALIDATION_FAILURE: i32 = 19;
    pub const ERROR: i32 = 5;
}

#[allow(dead_code)]
pub fn read_from_resource_file(path: &str) -> String {
    let mut resource = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    resource.push(path);
    let mut content = String::new();
    let mut reader = BufReader::new(File::open(resource.as_path()).unwrap());
    reader.read_to_string(&mut content).unwrap();

    content
}

#[allow(dead_code)]
pub fn get_full_path_for_resource_file(path: &str) -> String {
    let mut resource = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    resource.push(path);
    resource.display().to_string()
}

#[allow(dead_code)]
pub fn get_reader(path: &str) -> Reader {
    let file = File::open(path).expect("failed to find mocked file");

    Reader::new(ReadFile(file))
}

#[allow(dead_code)]
pub trait CommandTestRunner {
    fn build_args(&self) -> Vec<String>;

    fn run(&self, writer: &mut Writer, reader: &mut Reader) -> i32 {
        let mut args = vec![String::from(APP_NAME)];
        args.extend(self.build_args());

        let cli = Cli::parse_from(args);

        match cli.command.execute(writer, reader) {
            Ok(code) => code,
            Err(e) => {
                writer
                    .write_err(format!("Error occurred {}", e))
                    .expect("failed to write to stderr");

                StatusCode::INTERNAL_FAILURE
            }
        }
    }
}
