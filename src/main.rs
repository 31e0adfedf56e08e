use std::io::{self, Write};
use std::process::ExitCode;

use basic_authorizer::cmd::App;
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let app = App::parse();
    match app.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            _ = writeln!(io::stderr(), "Fatal: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
