use std::process::ExitCode;

mod cli;
mod config;
mod convert;
mod display;
mod io;
mod logging;
mod util;

fn main() -> ExitCode {
    let cli = cli::parse();

    if let Err(e) = logging::setup_logging(cli.verbose, cli.quiet) {
        display::print_error(&e);
        return ExitCode::FAILURE;
    }

    let ctx = display::Context::detect().with_quiet(cli.quiet);
    if ctx.interactive {
        display::print_banner();
    }

    match convert::run(cli, ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            display::print_error(&e);
            ExitCode::FAILURE
        }
    }
}
