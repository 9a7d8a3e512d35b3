//! LexiKV CLI Client
//!
//! Command-line interface for interacting with a LexiKV server.

use std::io::{BufReader, BufWriter};
use std::net::TcpStream;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use lexikv::protocol::{read_response, write_command, Command, Status};
use lexikv::{LexiError, Result};

/// LexiKV CLI
#[derive(Parser, Debug)]
#[command(name = "lexikv-cli")]
#[command(about = "CLI for the LexiKV dictionary server")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add or update a word
    Add {
        /// The word to define
        word: String,

        /// The definition
        definition: String,
    },

    /// Get the definition for a word
    Get {
        /// The word to look up
        word: String,
    },

    /// Remove a word
    Remove {
        /// The word to remove
        word: String,
    },

    /// List every word with its definition
    List,

    /// Ping the server
    Ping,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    let stream = TcpStream::connect(&args.server)
        .map_err(|e| LexiError::Network(format!("failed to connect to {}: {}", args.server, e)))?;

    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = BufWriter::new(stream);

    let command = match &args.command {
        Commands::Add { word, definition } => Command::Add {
            word: word.clone(),
            definition: definition.clone(),
        },
        Commands::Get { word } => Command::Get { word: word.clone() },
        Commands::Remove { word } => Command::Remove { word: word.clone() },
        Commands::List => Command::List,
        Commands::Ping => Command::Ping,
    };

    write_command(&mut writer, &command)?;
    let response = read_response(&mut reader)?;

    let message = response
        .payload
        .as_deref()
        .map(|p| String::from_utf8_lossy(p).into_owned());

    match response.status {
        Status::Ok => {
            println!("{}", message.unwrap_or_else(|| "OK".to_string()));
            Ok(ExitCode::SUCCESS)
        }
        Status::NotFound => {
            eprintln!("not found");
            Ok(ExitCode::FAILURE)
        }
        Status::BadRequest => {
            eprintln!("bad request: {}", message.unwrap_or_default());
            Ok(ExitCode::FAILURE)
        }
        Status::Error => {
            eprintln!("server error: {}", message.unwrap_or_default());
            Ok(ExitCode::FAILURE)
        }
    }
}
