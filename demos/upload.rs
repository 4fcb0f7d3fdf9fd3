//! Demo: upload a local file, optionally into a folder
//!
//! Usage:
//!   cargo run --example upload -- <LOCAL_FILE> [FOLDER_ID]

mod cli;

use cli::{init_tracing, parse_options, usage_and_exit};
use drivelib::error::Result;
use drivelib::format_file_size;

const USAGE: &str =
    "Usage: cargo run --example upload -- [--email EMAIL --password PASSWORD] <LOCAL_FILE> [FOLDER_ID]";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let opts = parse_options(USAGE, &[]);
    let positionals = opts.args.positionals();
    if positionals.is_empty() || positionals.len() > 2 {
        usage_and_exit(USAGE);
    }
    let local = &positionals[0];
    let folder = positionals.get(1).map(String::as_str);

    let drive = opts.open().await?;
    let size = tokio::fs::metadata(local).await?.len();
    println!("Uploading {} ({})...", local, format_file_size(size));

    match drive.upload_path(local, folder).await {
        Ok(receipt) => {
            println!("{}", receipt.message);
            println!("File: {}", receipt.filename);
            println!("ID: {}", receipt.file_id);
        }
        Err(e) => {
            eprintln!("Upload failed: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
