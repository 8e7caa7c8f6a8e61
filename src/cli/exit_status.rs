use std::process::ExitCode;

/// Exit status of the CLI.
///
/// - `Success` (0): documentation was written
/// - `Error` (2): internal error (config error, unreadable root, write failure, ...)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
