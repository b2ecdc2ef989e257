mod cmd;

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Result;
use clap::error::ErrorKind as ArgsErrorKind;
use clap::Parser;
use cmd::{App, RunCommand};
use fintrack::client::RequestError;
use fintrack::logs;
use log::debug;

async fn run_cmd() -> Result<ExitCode> {
    let app = match App::try_parse() {
        Ok(app) => app,
        Err(err) => {
            _ = err.print();
            if matches!(
                err.kind(),
                ArgsErrorKind::DisplayHelp
                    | ArgsErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                    | ArgsErrorKind::DisplayVersion
            ) {
                return Ok(ExitCode::SUCCESS);
            }
            return Ok(ExitCode::from(3));
        }
    };

    logs::init(&app.log_level)?;
    app.run().await?;
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    match run_cmd().await {
        Ok(code) => code,
        Err(err) => {
            match err.downcast_ref::<RequestError>() {
                Some(req_err) => {
                    debug!("Request error: {err:#}");
                    for msg in req_err.messages() {
                        _ = writeln!(io::stderr(), "Error: {msg}");
                    }
                }
                None => {
                    _ = writeln!(io::stderr(), "Command error: {err:#}");
                }
            }
            ExitCode::FAILURE
        }
    }
}
