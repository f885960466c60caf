use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use medvault::capability::LinkGenerator;
use medvault::model::{MedicalRecord, RemoteConfig, SubjectId};
use medvault::remote::RemoteClient;
use medvault::token::Credential;

#[derive(Parser)]
#[command(name = "medvault")]
#[command(about = "Medvault record service client", long_about = None)]
struct Cli {
    /// API base URL
    #[arg(long, global = true, env = "MEDVAULT_URL", default_value = "http://127.0.0.1:4000")]
    url: String,

    /// Credential to present in the `token` header
    #[arg(long, global = true, env = "MEDVAULT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = 10)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and print a credential
    Login {
        #[arg(long)]
        handle: String,
        #[arg(long, env = "MEDVAULT_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Show the subject the current credential speaks for
    Whoami {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Mint a credential for another subject
    Delegate { subject: String },

    /// List records of the credential's subject
    Records {
        /// Also ask the gate to mint a credential for this subject
        #[arg(long)]
        patient: Option<String>,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Build a patient-records link (what the QR code encodes)
    Link {
        subject: String,
        /// Build it locally against this frontend base instead of asking the server
        #[arg(long)]
        base: Option<String>,
    },

    /// Follow a scanned link: delegate, then read the records
    Resolve {
        link: String,
        /// Frontend base the link must belong to
        #[arg(long, env = "MEDVAULT_LINK_BASE", default_value = "http://127.0.0.1:5173")]
        base: String,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Issue a signed, single-use capability link for a patient you treated
    Capability { subject: String },

    /// Trade a signed capability for a credential
    Redeem { capability: String },

    /// Invalidate all credentials issued to you so far
    RevokeAll,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn print_records(records: &[MedicalRecord], json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(records).context("serialize records json")?
        );
        return Ok(());
    }
    if records.is_empty() {
        println!("No records found.");
    }
    for r in records {
        println!(
            "{} {} {} ({}, {} at {})",
            r.id, r.record_date, r.record_title, r.record_type, r.doctor_name, r.hospital_or_clinic
        );
        if let Some(url) = &r.file_upload {
            println!("  file: {}", url);
        }
    }
    Ok(())
}

fn subject_arg(raw: &str) -> Result<SubjectId> {
    SubjectId::parse(raw).context("subject id must not be empty")
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut remote = RemoteConfig::new(cli.url.clone());
    remote.timeout_secs = cli.timeout_secs;
    let client = RemoteClient::new(remote, cli.token.clone().map(Credential::from_string))?;

    match cli.command {
        Commands::Login { handle, password } => {
            let token = client.login(&handle, &password)?;
            println!("{}", token);
        }
        Commands::Whoami { json } => {
            let who = client.whoami()?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&who).context("serialize whoami json")?
                );
            } else {
                println!("subject: {}", who.subject_id);
            }
        }
        Commands::Delegate { subject } => {
            let token = client.delegate(&subject_arg(&subject)?)?;
            println!("{}", token);
        }
        Commands::Records { patient, json } => {
            let hint = patient.as_deref().map(subject_arg).transpose()?;
            let page = client.records(hint.as_ref())?;
            print_records(&page.records, json)?;
            if let Some(token) = page.new_token
                && !json
            {
                println!("delegated token: {}", token);
            }
        }
        Commands::Link { subject, base } => {
            let subject = subject_arg(&subject)?;
            let link = match base {
                Some(base) => LinkGenerator::new(&base)?.link_for(&subject)?,
                None => client.link_for(&subject)?,
            };
            println!("{}", link);
        }
        Commands::Resolve { link, base, json } => {
            let links = LinkGenerator::new(&base)?;
            let records = client.resolve_link(&links, &link)?;
            print_records(&records, json)?;
        }
        Commands::Capability { subject } => {
            let out = client.issue_capability(&subject_arg(&subject)?)?;
            println!("{}", out.link);
            println!("expires_at: {}", out.expires_at);
        }
        Commands::Redeem { capability } => {
            let token = client.redeem_capability(&capability)?;
            println!("{}", token);
        }
        Commands::RevokeAll => {
            let version = client.revoke_all_tokens()?;
            println!("Revoked; token version is now {}", version);
        }
    }

    Ok(())
}
