//! Patches fonts so that long numbers are shown in digit groups, using
//! nothing but OpenType glyph substitution.

use anyhow::Result;
use numderline::core;

fn run_app(cli_args: core::cli::CliArgs) -> Result<()> {
    core::run_app(cli_args)
}

fn main() {
    let cli_args = core::platform::get_cli_args();
    match run_app(cli_args) {
        Ok(()) => {}
        Err(error) => core::platform::handle_error(error),
    }
}
