use std::env;
use std::process;
use std::sync::Arc;

use drivelib::error::Result;
use drivelib::{ClientConfig, Credentials, Drive, FileStorage};
use tracing_subscriber::{EnvFilter, fmt};

pub fn usage_and_exit(usage: &str) -> ! {
    eprintln!("{usage}");
    process::exit(1);
}

pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("drivelib=debug"));
    fmt().with_env_filter(filter).with_target(false).init();
}

/// Flags with values, boolean switches, and positionals, split up front.
pub struct Args {
    values: Vec<(String, String)>,
    switches: Vec<String>,
    positionals: Vec<String>,
}

impl Args {
    /// Parse the process arguments. Names in `switches` take no value;
    /// any other `-x` / `--name` must be followed by one.
    pub fn parse(usage: &'static str, switches: &[&str]) -> Self {
        let mut args = Self {
            values: Vec::new(),
            switches: Vec::new(),
            positionals: Vec::new(),
        };
        let mut iter = env::args().skip(1);
        while let Some(arg) = iter.next() {
            if arg == "--help" || arg == "-h" {
                println!("{usage}");
                process::exit(0);
            }
            if switches.contains(&arg.as_str()) {
                args.switches.push(arg);
            } else if arg.starts_with('-') && arg.len() > 1 {
                let value = iter.next().unwrap_or_else(|| usage_and_exit(usage));
                args.values.push((arg, value));
            } else {
                args.positionals.push(arg);
            }
        }
        args
    }

    pub fn value(&self, names: &[&str]) -> Option<String> {
        self.values
            .iter()
            .find(|(flag, _)| names.contains(&flag.as_str()))
            .map(|(_, value)| value.clone())
    }

    #[allow(dead_code)] // Only login takes a switch.
    pub fn has(&self, name: &str) -> bool {
        self.switches.iter().any(|s| s == name)
    }

    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }
}

/// Common options: an optional sign-in and proxy, plus the parsed arguments.
pub struct Options {
    pub email: Option<String>,
    pub password: Option<String>,
    pub proxy: Option<String>,
    pub args: Args,
}

pub fn parse_options(usage: &'static str, switches: &[&str]) -> Options {
    let args = Args::parse(usage, switches);
    let email = args.value(&["--email", "-e"]);
    let password = args.value(&["--password", "-p"]);
    if email.is_some() != password.is_some() {
        usage_and_exit(usage);
    }

    Options {
        email,
        password,
        proxy: args.value(&["--proxy"]),
        args,
    }
}

impl Options {
    /// Open the drive with the saved session, signing in first when
    /// credentials were given.
    pub async fn open(&self) -> Result<Drive> {
        let mut config = ClientConfig::from_env()?;
        if let Some(proxy) = &self.proxy {
            config = config.with_proxy(proxy.clone());
        }
        let storage = Arc::new(FileStorage::default_location()?);
        let drive = Drive::new(config, storage)?;

        if let (Some(email), Some(password)) = (&self.email, &self.password) {
            let user = drive.login(&Credentials::new(email, password)).await?;
            println!("Logged in as: {}", user.email);
        } else if drive.refresh_user().await?.is_none() {
            eprintln!("Not logged in. Run the login demo or pass --email/--password.");
            process::exit(1);
        }

        Ok(drive)
    }
}
