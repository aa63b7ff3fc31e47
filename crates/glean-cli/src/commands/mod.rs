//! Command implementations.

pub mod config;
pub mod extract;
pub mod parse;
pub mod prompt;

pub use self::config::execute_config;
pub use self::extract::execute_extract;
pub use self::parse::execute_parse;
pub use self::prompt::execute_prompt;

use crate::cli::InputArgs;
use crate::error::{CliError, Result};
use std::fs;
use std::io::{self, Read};

/// Read the input text from `--file` or `--stdin`.
pub(crate) fn read_input(input: &InputArgs) -> Result<String> {
    if input.stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else if let Some(path) = &input.file {
        Ok(fs::read_to_string(path)?)
    } else {
        Err(CliError::InvalidInput(
            "Must specify either --file or --stdin".to_string(),
        ))
    }
}
