use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::errors::{Error, Result};
use crate::utils::reader::Reader;

pub(crate) fn read_file_content(file: File) -> std::result::Result<String, std::io::Error> {
    let mut file_content = String::new();
    let mut buf_reader = BufReader::new(file);
    buf_reader.read_to_string(&mut file_content)?;
    Ok(file_content)
}

/// Reads a configuration document from `path`, or from the injected reader
/// when the path is `-`.
pub(crate) fn read_config_contents(path: &str, reader: &mut Reader) -> Result<String> {
    if path == "-" {
        let mut contents = String::new();
        reader.read_to_string(&mut contents)?;
        return Ok(contents);
    }

    if !Path::new(path).exists() {
        return Err(Error::FileNotFoundError(path.to_string()));
    }

    Ok(read_file_content(File::open(path)?)?)
}
