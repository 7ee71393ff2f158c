mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use urlgate::{AddressCheck, Blacklist, Config, Decision, DnsResolver, Validator};

/// Check long URLs the way the shortener does before storing them.
#[derive(Debug, Parser)]
#[command(name = "urlgate")]
#[command(about = "SSRF and malware admission check for shortener URLs", long_about = None)]
struct Cli {
    /// URLs to check.
    #[arg(required = true, value_name = "URL")]
    urls: Vec<String>,

    /// Blacklist file, one domain per line.
    #[arg(long, value_name = "FILE")]
    blacklist: Option<PathBuf>,

    /// TOML file with validator settings.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Only require the first resolved address to be public.
    #[arg(long)]
    first_address_only: bool,

    /// Refuse URLs that carry a username or password.
    #[arg(long)]
    reject_userinfo: bool,

    /// Let blacklist entries cover their subdomains.
    #[arg(long)]
    blacklist_subdomains: bool,

    /// DNS lookup timeout in milliseconds (overrides the config file).
    #[arg(long, value_name = "MS")]
    dns_timeout_ms: Option<u64>,

    /// Only log warnings and errors.
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                Config::from_toml_str(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => Config::default(),
        };

        if self.first_address_only {
            config.resolved_addresses = AddressCheck::First;
        }
        if self.reject_userinfo {
            config.reject_userinfo = true;
        }
        if self.blacklist_subdomains {
            config.blacklist_subdomains = true;
        }
        if let Some(ms) = self.dns_timeout_ms {
            config.dns_timeout_ms = ms;
        }
        Ok(config)
    }

    fn load_blacklist(&self) -> Result<Blacklist> {
        match &self.blacklist {
            Some(path) => Blacklist::load(path)
                .with_context(|| format!("reading blacklist {}", path.display())),
            None => Ok(Blacklist::new()),
        }
    }
}

async fn run(cli: Cli) -> Result<bool> {
    let config = cli.load_config()?;
    let blacklist = cli.load_blacklist()?;
    tracing::info!(entries = blacklist.len(), "blacklist loaded");

    let resolver = DnsResolver::with_timeout(config.dns_timeout())?;
    let validator = Validator::with_config(resolver, config);

    let mut all_accepted = true;
    for url in &cli.urls {
        match validator.validate(url, &blacklist).await? {
            Decision::Accepted(_) => println!("accepted {}", url),
            Decision::Rejected(reason) => {
                all_accepted = false;
                println!("rejected {} {}: {}", reason.code(), url, reason);
            }
        }
    }
    Ok(all_accepted)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.quiet);

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(err) => {
            eprintln!("urlgate error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
