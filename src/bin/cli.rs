//! WalKV CLI Client
//!
//! Command-line interface for interacting with WalKV.
//! With a subcommand it sends one request; without one it reads request
//! lines from stdin until EOF.

use std::io::{self, BufRead, Write};
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};
use walkv::network::Client;
use walkv::protocol::Command;
use walkv::{Key, Value};

/// WalKV CLI
#[derive(Parser, Debug)]
#[command(name = "walkv-cli")]
#[command(about = "CLI for the WalKV key-value store")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:3223")]
    server: String,

    /// Connect/read/write timeout in milliseconds (0 = none)
    #[arg(short, long, default_value = "5000")]
    timeout: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },
}

impl Commands {
    fn to_command(&self) -> walkv::Result<Command> {
        Ok(match self {
            Commands::Get { key } => Command::Get { key: Key::new(key)? },
            Commands::Set { key, value } => Command::Set {
                key: Key::new(key)?,
                value: Value::new(value)?,
            },
            Commands::Del { key } => Command::Del { key: Key::new(key)? },
        })
    }
}

fn main() {
    let args = Args::parse();

    let timeout = (args.timeout > 0).then(|| Duration::from_millis(args.timeout));
    let mut client = match Client::connect(&args.server, timeout) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("cannot connect to {}: {}", args.server, e);
            process::exit(1);
        }
    };

    let code = match &args.command {
        Some(command) => run_once(&mut client, command),
        None => run_repl(&mut client),
    };
    process::exit(code);
}

fn run_once(client: &mut Client, command: &Commands) -> i32 {
    let result = command
        .to_command()
        .and_then(|command| client.execute(&command));

    match result {
        Ok(response) => {
            println!("{}", response.to_line());
            if response.is_error() {
                1
            } else {
                0
            }
        }
        Err(e) => {
            eprintln!("{}", e);
            1
        }
    }
}

fn run_repl(client: &mut Client) -> i32 {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        let _ = stdout.flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => return 0,
            Ok(_) => {}
            Err(e) => {
                eprintln!("{}", e);
                return 1;
            }
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match client.send(line) {
            Ok(response) => println!("{}", response.to_line()),
            Err(e) => {
                eprintln!("{}", e);
                return 1;
            }
        }
    }
}
