use anyhow::Result;

pub mod args;
mod exit_status;
mod report;
mod run;

pub use args::Arguments;
pub use exit_status::ExitStatus;

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let summary = run::run(&args)?;
    report::print(&summary, args.verbose);
    Ok(ExitStatus::Success)
}
