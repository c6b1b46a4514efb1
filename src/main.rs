#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! raco-events — list upcoming ra.co events for an area and genres.

mod cli;
mod commands;
mod diag;
mod ra;
mod types;

use clap::Parser;

use cli::{Cli, OutputCtx, RenderStatus, write_error, write_usage_error};
use commands::RunError;
use diag::Diagnostics;
use types::ErrorOutput;

fn main() {
    let cli = Cli::parse();

    let ctx = OutputCtx::new(cli.output, cli.json, cli.layout);
    let diag = Diagnostics::new(cli.verbose);

    match commands::events::run(&cli, &ctx, diag) {
        Ok(RenderStatus::Rendered) => {}
        Ok(RenderStatus::Empty) => std::process::exit(1),
        Err(err) => {
            match &err {
                RunError::Usage(message) => write_usage_error(message, &Cli::usage()),
                RunError::Ra(ra) => write_error(&ErrorOutput::from_ra_error(ra), &ctx),
                RunError::Output(io) => {
                    write_error(&ErrorOutput::new("output_error", io.to_string()), &ctx);
                }
            }
            std::process::exit(err.exit_code());
        }
    }
}
