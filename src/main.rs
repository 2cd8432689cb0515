// SPDX-License-Identifier: MPL-2.0
use formcheck::app::{self, Flags};
use formcheck::logging;
use std::process::ExitCode;

fn main() -> ExitCode {
    let flags = match Flags::from_env() {
        Ok(flags) => flags,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("Run 'formcheck --help' for usage.");
            return ExitCode::from(2);
        }
    };

    if let Err(e) = logging::init(flags.log_level.as_deref()) {
        eprintln!("{e}");
        return ExitCode::from(2);
    }

    let mut stdout = std::io::stdout().lock();
    match app::run(flags, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
