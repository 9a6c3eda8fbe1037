//! Process-level error handling.

/// Report a fatal error and exit with code 1
pub fn handle_error(error: anyhow::Error) -> ! {
    eprintln!();
    eprintln!("Error: {error}");
    if let Some(build) = error.downcast_ref::<crate::core::errors::BuildError>() {
        eprintln!("Kind: {}", build.kind());
    }
    eprintln!();
    eprintln!("Try running with --help for usage information.");
    std::process::exit(1);
}

/// Parse the command line
pub fn get_cli_args() -> crate::core::cli::CliArgs {
    use clap::Parser;
    crate::core::cli::CliArgs::parse()
}
