//! Legacy `-key=value` invocation
//!
//! Build scripts call `xcsync -srcRoot=.. -projectPath=.. -configurationPath=..`.
//! Those arguments do not fit clap's conventions, so they are detected and
//! parsed here before clap sees them.

use std::collections::HashMap;
use std::path::PathBuf;

use xcsync_core::SyncOptions;

const SRC_ROOT: &str = "-srcRoot";
const PROJECT_PATH: &str = "-projectPath";
const CONFIGURATION_PATH: &str = "-configurationPath";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ArgsError {
    #[error("Not enough arguments: {0}")]
    NotEnoughArguments(String),

    #[error("Incorrect arguments: {0}")]
    IncorrectArguments(String),
}

/// Whether `args` (program name excluded) use the legacy form
///
/// That is the case without any argument, or when the first one looks like
/// `-key=value` with a single dash.
pub fn is_legacy_invocation(args: &[String]) -> bool {
    match args.first() {
        None => true,
        Some(first) => first.starts_with('-') && !first.starts_with("--") && first.contains('='),
    }
}

/// Parse legacy arguments into sync options
///
/// Only arguments starting with `-` count. Values may contain `=`; a key
/// given twice keeps its last value.
pub fn parse_legacy(args: &[String]) -> Result<SyncOptions, ArgsError> {
    let parameters: Vec<&str> = args
        .iter()
        .map(String::as_str)
        .filter(|arg| arg.starts_with('-'))
        .collect();
    if parameters.len() < 3 {
        return Err(ArgsError::NotEnoughArguments(format!("{:?}", parameters)));
    }

    let values: HashMap<&str, &str> = parameters
        .iter()
        .filter_map(|parameter| parameter.split_once('='))
        .collect();

    match (
        values.get(SRC_ROOT),
        values.get(PROJECT_PATH),
        values.get(CONFIGURATION_PATH),
    ) {
        (Some(src_root), Some(project_path), Some(configuration_path)) => Ok(SyncOptions {
            src_root: PathBuf::from(src_root),
            project_path: PathBuf::from(project_path),
            configuration_path: PathBuf::from(configuration_path),
            dry_run: false,
        }),
        _ => Err(ArgsError::IncorrectArguments(format!("{:?}", parameters))),
    }
}
