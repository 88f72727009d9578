//! pnc-harness - plan-time validation for the Megaport PNC Terraform module

use std::process::ExitCode;

use clap::Parser;

use pnc_harness::cli::Cli;
use pnc_harness::infra::env::ProcessEnv;
use pnc_harness::logging;
use pnc_harness::output::OutputContext;
use pnc_harness::output::json::{error_code, format_error};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let (json, no_color) = (cli.json, cli.no_color);

    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            let message = format!("{e:#}");
            match json.then(|| format_error(&message, error_code(&e))) {
                Some(Ok(body)) => println!("{body}"),
                _ => OutputContext::new(no_color, false, &ProcessEnv).error(&message),
            }
            ExitCode::FAILURE
        }
    }
}
