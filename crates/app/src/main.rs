//! Storefront administration CLI

use std::process::ExitCode;

use clap::Parser;

mod cli;

#[tokio::main]
pub async fn main() -> ExitCode {
    let _env = dotenvy::dotenv();

    let cli = cli::Cli::parse();

    let result = match cli.init_logging() {
        Ok(()) => cli.run().await,
        Err(error) => Err(error),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            #[expect(clippy::print_stderr, reason = "errors are reported to the operator")]
            {
                eprintln!("{error}");
            }

            ExitCode::FAILURE
        }
    }
}
