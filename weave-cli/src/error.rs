use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures the command line can hit before or after the core runs.
///
/// Parsing itself never fails; these cover I/O and merge preconditions.
#[derive(Debug, Error)]
pub enum CliError {
    /// The input file (or stdin) could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// Path as given on the command line.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The input parsed to nothing, or to bare text with no root tag.
    #[error("{} has no root element", path.display())]
    MissingRoot {
        /// Path as given on the command line.
        path: PathBuf,
    },

    /// Merge needs both root elements to carry the same tag.
    #[error("root elements differ: <{template}> cannot take <{logic}>")]
    RootMismatch {
        /// Root tag of the template side.
        template: String,
        /// Root tag of the logic side.
        logic: String,
    },
}
