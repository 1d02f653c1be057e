//! Error type for command operations.

use std::path::{Path, PathBuf};

use fsc_core::ParseError;
use thiserror::Error;

/// Errors that can occur while executing a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Argument access failed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// `help` was asked about a command that is not registered.
    #[error("Cannot help with unknown command \"{0}\".")]
    UnknownCommand(String),

    /// The path is already taken.
    #[error("Path \"{}\" already exists.{}", .path.display(), hint_suffix(.hint))]
    AlreadyExists {
        path: PathBuf,
        hint: Option<&'static str>,
    },

    /// The path does not exist.
    #[error("Path \"{}\" does not exist.", .0.display())]
    NotFound(PathBuf),

    #[error("Directory \"{}\" is not empty, use flag \"-r\".", .0.display())]
    DirectoryNotEmpty(PathBuf),

    #[error("Path \"{}\" is not a file.", .0.display())]
    NotAFile(PathBuf),

    #[error("Path \"{}\" is not a directory.", .0.display())]
    NotADirectory(PathBuf),

    /// Two mutually exclusive flags were given together.
    #[error("Flags \"{0}\" and \"{1}\" cannot be used at the same time.")]
    ConflictingFlags(&'static str, &'static str),

    /// Target and destination resolve to the same path.
    #[error("Target and destination are the same path \"{}\".", .0.display())]
    SamePath(PathBuf),

    /// The target already lives directly inside the destination.
    #[error(
        "Target \"{}\" is already in destination \"{}\".",
        .target.display(),
        .destination.display()
    )]
    AlreadyInDestination { target: PathBuf, destination: PathBuf },

    /// Clone or move would place a directory inside itself.
    #[error(
        "Destination \"{}\" is inside target \"{}\".",
        .destination.display(),
        .target.display()
    )]
    DestinationInsideTarget { target: PathBuf, destination: PathBuf },

    /// A new name that is empty, `.`/`..` or contains a path separator.
    #[error("Invalid name \"{0}\", expected a plain file name.")]
    InvalidName(String),

    /// Reading an answer from the console failed.
    #[error("Failed to read input: {0}")]
    Input(#[source] std::io::Error),

    /// Writing to the console failed.
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    /// Underlying file-system failure.
    #[error("Failed to {context} \"{}\": {source}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CommandError {
    /// Wraps an I/O error with the action and path it concerns.
    pub fn io(context: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            context,
            path: path.to_path_buf(),
            source,
        }
    }
}

fn hint_suffix(hint: &Option<&'static str>) -> String {
    hint.map(|h| format!(" {h}")).unwrap_or_default()
}

/// Convenience alias for results with [`CommandError`].
pub type Result<T> = std::result::Result<T, CommandError>;

/// Extension for attaching path context to `std::io` results.
pub trait IoContext<T> {
    fn with_path(self, context: &'static str, path: &Path) -> Result<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn with_path(self, context: &'static str, path: &Path) -> Result<T> {
        self.map_err(|source| CommandError::io(context, path, source))
    }
}
