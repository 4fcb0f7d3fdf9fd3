//! Demo: list a folder, or search by name
//!
//! Usage:
//!   cargo run --example ls -- [--folder FOLDER_ID] [--search TEXT]

mod cli;

use cli::{init_tracing, parse_options, usage_and_exit};
use drivelib::error::Result;
use drivelib::{FileIcon, Item, format_date, format_file_size};

const USAGE: &str = "Usage: cargo run --example ls -- [--email EMAIL --password PASSWORD] [--folder FOLDER_ID] [--search TEXT]";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let opts = parse_options(USAGE, &[]);
    let folder = opts.args.value(&["--folder", "-f"]);
    let search = opts.args.value(&["--search", "-s"]);
    if !opts.args.positionals().is_empty() {
        usage_and_exit(USAGE);
    }

    let drive = opts.open().await?;
    let listing = match &search {
        Some(text) => {
            if let Some(id) = &folder {
                drive.folders().navigate_to_folder(id.as_str());
            }
            drive.search(text).await?
        }
        None => drive.open_folder(folder.as_deref()).await?,
    };

    let trail: Vec<String> = drive
        .folders()
        .breadcrumb()
        .into_iter()
        .map(|entry| entry.name)
        .collect();
    println!("\n{}\n", trail.join(" / "));

    if listing.items.is_empty() {
        println!("  (empty)");
    }
    for item in &listing.items {
        match item {
            Item::Folder(folder) => {
                println!(
                    "  📁 {:<32} {:>12}  {}  {}",
                    folder.name,
                    "",
                    format_date(folder.created_date),
                    folder.folder_id
                );
            }
            Item::File(file) => {
                let icon = FileIcon::for_content_type(&file.content_type);
                println!(
                    "  {} {:<32} {:>12}  {}  {}",
                    icon.glyph(),
                    file.name,
                    format_file_size(file.size),
                    format_date(file.upload_date),
                    file.file_id
                );
            }
        }
    }

    Ok(())
}
