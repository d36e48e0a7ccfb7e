//! Interactive client for problem-server.
//!
//! ```bash
//! problem-client 127.0.0.1 8080 7
//! ```
//!
//! Prompts on stdin for each field the problem needs, sends the request
//! and prints the server's answer.

use clap::Parser;
use problem_server::client::{self, prompt, validate};
use problem_server::problems;
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Command-line arguments for the client
#[derive(Parser, Debug)]
#[command(name = "problem-client")]
#[command(version)]
#[command(about = "Send one problem to a problem-server", long_about = None)]
struct Args {
    /// Server host
    host: String,

    /// Server port
    port: u16,

    /// Problem number (1-10)
    problem: String,

    /// Send input without checking it first
    #[arg(long)]
    no_validate: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Args::parse();

    let descriptor = match problems::lookup(&args.problem) {
        Some(descriptor) => descriptor,
        None => {
            eprintln!("Problem number must be between 1 and 10");
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut fields = Vec::with_capacity(descriptor.field_count());

    for field in descriptor.fields {
        println!("{}", prompt(field.kind, field.label));
        let line = stdin.next_line().await?.unwrap_or_default();

        if !args.no_validate {
            if let Err(reason) = validate(field.kind, &line) {
                eprintln!("Validation error: {}", reason);
                return Ok(ExitCode::FAILURE);
            }
        }
        fields.push(line);
    }

    let addr = (args.host.as_str(), args.port);
    match client::request(addr, descriptor.id, &fields).await {
        Ok(response) => {
            println!("Server response: {}", response);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}
