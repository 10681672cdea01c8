/// SBA Pro License Activator - issue `.slic` licenses for `.token` requests
///
/// This binary is run by support staff and performs:
/// 1. Decoding of `.token` activation requests from the desktop application
/// 2. Master password verification (activation API or local hash)
/// 3. License key, license token and `.slic` user token generation
/// 4. Online activation from keyed-in machine details

// Module declarations
mod activation;
mod codec;
mod config;
mod error;
mod product;
mod verification;

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::exit;

use activation::{ActivationOutcome, ActivationRequest, OnlineActivation, Session};
use codec::{LicenseToken, MasterSecret, UploadedTokenRecord, UserToken, triple_sha256};
use config::{Config, VerifyMode, load_config};
use error::{LicenseError, Result};
use product::ProductVersion;
use verification::{HttpVerifier, LocalHashVerifier, Verifier, local_mac_address};

#[derive(Parser, Debug)]
#[command(name = "slic-activator", version, about = "Issue SBA Pro license files")]
struct Cli {
    /// Path to a JSON config file (defaults to <executable>.config)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the contents of a .token file
    Inspect {
        /// Path to the .token file
        file: PathBuf,
    },

    /// Decrypt an issued .slic file and show its license token
    InspectSlic {
        /// Path to the .slic file
        file: PathBuf,
    },

    /// Issue a license for an uploaded .token file
    Offline {
        /// Path to the .token file
        file: PathBuf,
        #[command(flatten)]
        grant: GrantArgs,
    },

    /// Issue a license from keyed-in machine details
    Online {
        /// MAC address of the licensed machine
        #[arg(long)]
        mac: String,
        #[arg(long)]
        username: String,
        /// Product id to embed (defaults to the encoded MAC)
        #[arg(long)]
        product_id: Option<String>,
        #[command(flatten)]
        grant: GrantArgs,
    },

    /// Create a .token activation request as the desktop application does
    Request {
        #[arg(long)]
        username: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        trans_id: String,
        /// MAC address (defaults to this machine's first interface)
        #[arg(long)]
        mac: Option<String>,
        /// Days left on the current license
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        remaining: i64,
        /// Output file (.token)
        #[arg(long)]
        out: PathBuf,
    },

    /// Print the triple SHA-256 hash of a password
    HashPassword { password: String },

    /// List product versions and their ordinals
    Versions,
}

#[derive(clap::Args, Debug)]
struct GrantArgs {
    /// Days to add on top of the remaining days
    #[arg(long)]
    days: i64,

    /// Product version, by name or ordinal (0-6)
    #[arg(long = "version", value_name = "VERSION")]
    product_version: String,

    /// Master password
    #[arg(long, env = "SLIC_MASTER_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Output directory for the .slic file
    #[arg(long)]
    out: Option<PathBuf>,
}

impl GrantArgs {
    fn to_request(&self) -> Result<ActivationRequest> {
        Ok(ActivationRequest {
            password: self.password.clone(),
            requested_days: self.days,
            version: ProductVersion::parse(&self.product_version)?,
        })
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            init_logging(&effective_log_filter(
                cli.log_level.as_deref(),
                env_log_filter().as_deref(),
                "info",
            ));
            eprintln!("❌ Failed to load configuration: {}", e);
            exit(2);
        }
    };

    init_logging(&effective_log_filter(
        cli.log_level.as_deref(),
        env_log_filter().as_deref(),
        &config.log_level,
    ));
    log::debug!(
        "Verify mode {:?}, API {}",
        config.verify_mode,
        config.get_api_base_url()
    );

    let secret = config.master_secret();

    if let Err(e) = run(cli.command, &config, &secret) {
        log::debug!("Command failed: {}", e);
        eprintln!("❌ {}", e.user_message());
        exit(1);
    }
}

fn env_log_filter() -> Option<String> {
    std::env::var("RUST_LOG").ok().filter(|v| !v.trim().is_empty())
}

/// `--log-level`, then `RUST_LOG`, then the configured level
fn effective_log_filter(cli: Option<&str>, env: Option<&str>, configured: &str) -> String {
    cli.or(env).unwrap_or(configured).to_string()
}

fn init_logging(filter: &str) {
    env_logger::Builder::new()
        .parse_filters(filter)
        .format_target(false)
        .init();
}

fn build_verifier(config: &Config) -> Result<Box<dyn Verifier>> {
    match config.verify_mode {
        VerifyMode::Remote => Ok(Box::new(HttpVerifier::new(
            &config.get_api_base_url(),
            config.request_timeout(),
        )?)),
        VerifyMode::Local => {
            let hash = config.password_hash.as_deref().ok_or_else(|| {
                LicenseError::Config("password_hash is required for local verification".to_string())
            })?;
            Ok(Box::new(LocalHashVerifier::new(hash)?))
        }
    }
}

fn run(command: Command, config: &Config, secret: &MasterSecret) -> Result<()> {
    match command {
        Command::Inspect { file } => {
            let mut session = Session::new(secret);
            let record = session.load_token_file(&file)?;
            print_record(record);
        }

        Command::InspectSlic { file } => {
            let (user, license) = read_slic(&file, secret)?;
            println!("   User name:   {}", user.username);
            println!("   License Key: {}", license.license_key);
            println!("   Version:     {}", license.version);
            println!("   Product ID:  {}", license.product_id);
            println!("   Expiry Date: {}", license.expiry_date);
        }

        Command::Offline { file, grant } => {
            let request = grant.to_request()?;
            let verifier = build_verifier(config)?;
            issue_offline(
                secret,
                &file,
                &request,
                verifier.as_ref(),
                output_dir(grant.out.as_deref(), config),
                Utc::now().date_naive(),
            )?;
        }

        Command::Online {
            mac,
            username,
            product_id,
            grant,
        } => {
            let activation = OnlineActivation {
                mac_address: mac,
                username,
                product_id,
                request: grant.to_request()?,
            };
            let verifier = build_verifier(config)?;

            let outcome = activation::activate_online(
                secret,
                verifier.as_ref(),
                &activation,
                Utc::now().date_naive(),
            )?;
            deliver(&outcome, output_dir(grant.out.as_deref(), config))?;
        }

        Command::Request {
            username,
            phone,
            trans_id,
            mac,
            remaining,
            out,
        } => {
            let mac = match mac.or_else(local_mac_address) {
                Some(mac) => mac,
                None => {
                    return Err(LicenseError::Validation(
                        "No MAC address found, pass --mac".to_string(),
                    ));
                }
            };

            let record = UploadedTokenRecord::new(&username, &phone, &trans_id, &mac, remaining);
            fs::write(&out, record.seal(secret)?)?;
            println!("✅ Token request written: {} (MAC {})", out.display(), mac);
        }

        Command::HashPassword { password } => {
            println!("{}", triple_sha256(&password));
        }

        Command::Versions => {
            for version in ProductVersion::ALL {
                println!("{}  {}", version.index(), version);
            }
        }
    }

    Ok(())
}

/// Load, verify, generate and write; the decoded record is discarded either way
fn issue_offline(
    secret: &MasterSecret,
    file: &Path,
    request: &ActivationRequest,
    verifier: &dyn Verifier,
    dir: &Path,
    today: NaiveDate,
) -> Result<PathBuf> {
    let mut session = Session::new(secret);
    session.load_token_file(file)?;
    println!("✅ Token file loaded: {}", file.display());
    if let Some(record) = session.record() {
        print_record(record);
    }

    let result = session
        .generate(request, verifier, today)
        .and_then(|outcome| deliver(&outcome, dir));
    log::debug!("Session finished in {:?}", session.phase());
    session.reset();
    result
}

/// Decrypt a `.slic` file and the license token inside it
fn read_slic(path: &Path, secret: &MasterSecret) -> Result<(UserToken, LicenseToken)> {
    let bytes = fs::read(path)?;
    let user = UserToken::unpack(&bytes, secret)?;
    let license = LicenseToken::unpack(&user.license_token, secret)?;
    Ok((user, license))
}

fn output_dir<'a>(explicit: Option<&'a Path>, config: &'a Config) -> &'a Path {
    explicit
        .or(config.output_dir.as_deref())
        .unwrap_or_else(|| Path::new("."))
}

fn print_record(record: &UploadedTokenRecord) {
    println!("   User name:  {}", record.user_name);
    println!("   Phone:      {}", record.phone);
    println!("   Trans ID:   {}", record.trans_id);
    println!("   Product ID: {}", record.prod_id);
    println!("   Remaining:  {} days", record.remaining);
    println!("   MAC:        {}", record.mac_address);
}

fn deliver(outcome: &ActivationOutcome, dir: &Path) -> Result<PathBuf> {
    let path = outcome.write_to(dir)?;
    println!("✅ License generated successfully!");
    println!("   License Key: {}", outcome.license_key);
    println!("   Version:     {}", outcome.version);
    println!("   Expiry Date: {}", outcome.expiry_display());
    println!("   File:        {}", path.display());
    Ok(path)
}
