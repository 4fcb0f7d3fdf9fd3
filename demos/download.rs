//! Demo: download a file by id
//!
//! Usage:
//!   cargo run --example download -- <FILE_ID> <LOCAL_PATH>

mod cli;

use cli::{init_tracing, parse_options, usage_and_exit};
use drivelib::error::Result;
use drivelib::format_file_size;

const USAGE: &str =
    "Usage: cargo run --example download -- [--email EMAIL --password PASSWORD] <FILE_ID> <LOCAL_PATH>";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let opts = parse_options(USAGE, &[]);
    let positionals = opts.args.positionals();
    if positionals.len() != 2 {
        usage_and_exit(USAGE);
    }
    let file_id = &positionals[0];
    let dest = &positionals[1];

    let drive = opts.open().await?;
    println!("Downloading {} -> {}", file_id, dest);
    let written = drive.download_file(file_id, dest).await?;
    println!("Done: {}", format_file_size(written));

    Ok(())
}
