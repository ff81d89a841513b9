//! delete-branch-on-merge binary entry point.

use std::process::ExitCode;

use delete_branch_on_merge::cli;
use delete_branch_on_merge::ui::output::{ConsoleOutput, OutputSink};

fn main() -> ExitCode {
    match cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            ConsoleOutput::default().error(&cli::error_message(&err));
            ExitCode::from(cli::exit_code(&err))
        }
    }
}
