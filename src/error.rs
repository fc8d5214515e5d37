use std::io;

use thiserror::Error;

/// Failures a builtin or the launcher reports on the diagnostic stream.
///
/// None of these stop the loop; the caller prints them and continues.
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("expected argument to \"{0}\"")]
    MissingArgument(&'static str),

    #[error("expected arguments to \"{0}\"")]
    MissingArguments(&'static str),

    #[error("unacceptable arguments for \"{0}\"")]
    InvalidArgument(&'static str),

    #[error("\"{0}\" result out of range")]
    OutOfRange(&'static str),

    #[error("{0}")]
    ChangeDir(io::Error),

    #[error("{0}")]
    Spawn(io::Error),

    #[error("{0}")]
    Wait(io::Error),

    #[error("failed to write output: {0}")]
    Output(io::Error),

    #[error("argument contains a nul byte")]
    NulInArgument,
}
