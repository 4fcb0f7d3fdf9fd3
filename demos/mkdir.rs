//! Demo: create a folder
//!
//! Usage:
//!   cargo run --example mkdir -- <NAME> [PARENT_FOLDER_ID]

mod cli;

use cli::{init_tracing, parse_options, usage_and_exit};
use drivelib::error::Result;

const USAGE: &str =
    "Usage: cargo run --example mkdir -- [--email EMAIL --password PASSWORD] <NAME> [PARENT_FOLDER_ID]";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let opts = parse_options(USAGE, &[]);
    let positionals = opts.args.positionals();
    if positionals.is_empty() || positionals.len() > 2 {
        usage_and_exit(USAGE);
    }
    let name = &positionals[0];
    let parent = positionals.get(1).map(String::as_str);

    let drive = opts.open().await?;
    println!("Creating folder: {}", name);
    match drive.create_folder(name, parent).await {
        Ok(created) => {
            println!("{}", created.message);
            println!("Name: {}", created.name);
            println!("ID: {}", created.folder_id);
        }
        Err(e) => {
            eprintln!("Failed to create folder: {}", e);
        }
    }

    Ok(())
}
