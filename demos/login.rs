//! Demo: sign in and save the session for the other demos
//!
//! Usage:
//!   cargo run --example login -- --email EMAIL --password PASSWORD [--proxy PROXY]
//!   cargo run --example login -- --logout

mod cli;

use cli::{init_tracing, parse_options, usage_and_exit};
use drivelib::{format_date, token};

const USAGE: &str = "Usage: cargo run --example login -- --email EMAIL --password PASSWORD [--proxy PROXY] | --logout";

#[tokio::main]
async fn main() {
    init_tracing();
    let opts = parse_options(USAGE, &["--logout"]);

    if opts.args.has("--logout") {
        match opts.open().await {
            Ok(drive) => {
                drive.logout();
                println!("Logged out.");
            }
            Err(e) => eprintln!("Failed to open session: {}", e),
        }
        return;
    }
    if !opts.args.positionals().is_empty() || opts.email.is_none() {
        usage_and_exit(USAGE);
    }

    let drive = match opts.open().await {
        Ok(drive) => drive,
        Err(e) => {
            eprintln!("Login failed: {}", e);
            std::process::exit(1);
        }
    };

    let state = drive.session().snapshot();
    if let Some(user) = &state.user {
        println!();
        println!("Name: {}", user.full_name);
        println!("Email: {}", user.email);
        println!("Member since: {}", format_date(user.created_at));
    }
    if let Some(claims) = state.token.as_deref().and_then(|t| token::decode_claims(t).ok()) {
        println!("Token expires at: {} (unix)", claims.exp);
    }
}
