use std::net::SocketAddr;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use super::*;

#[derive(Parser)]
#[command(name = "medvault-server")]
#[command(about = "Medical record service with delegated access tokens", long_about = None)]
pub(crate) struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:4000")]
    pub(crate) addr: SocketAddr,

    /// Write bound address to this file (dev/test convenience)
    #[arg(long)]
    pub(crate) addr_file: Option<PathBuf>,

    /// Data directory holding principals.json and records.json
    #[arg(long, default_value = "./medvault-data")]
    pub(crate) data_dir: PathBuf,

    /// Shared HMAC secret for credentials; rotating it invalidates every credential
    #[arg(long, env = "MEDVAULT_JWT_SECRET", hide_env_values = true)]
    pub(crate) secret: String,

    /// Base URL of the web frontend that capability links point at
    #[arg(long, default_value = "http://127.0.0.1:5173")]
    pub(crate) link_base: String,

    /// Report failures with real HTTP status codes instead of 200
    #[arg(long)]
    pub(crate) strict_status: bool,

    /// Give credentials an `exp` claim this many seconds after issuance
    #[arg(long)]
    pub(crate) token_ttl_secs: Option<u64>,

    /// Track a per-subject token version so `POST /tokens/revoke-all` can invalidate credentials
    #[arg(long)]
    pub(crate) token_versions: bool,

    /// Lifetime of signed capability links
    #[arg(long, default_value_t = 600)]
    pub(crate) capability_ttl_secs: u64,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub(crate) async fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    std::fs::create_dir_all(&args.data_dir)
        .with_context(|| format!("create data dir {}", args.data_dir.display()))?;

    let state = Arc::new(build_state(&args)?);
    {
        let principals = state.principals.read().await;
        if principals.is_empty() {
            tracing::warn!(
                path = %principals_path(&args.data_dir).display(),
                "principal directory is empty; nobody can log in"
            );
        }
    }

    let app = app(state);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;

    let local_addr = listener.local_addr().context("read listener local addr")?;
    tracing::info!(addr = %local_addr, "medvault-server listening");

    if let Some(addr_file) = &args.addr_file {
        std::fs::write(addr_file, local_addr.to_string())
            .with_context(|| format!("write addr file {}", addr_file.display()))?;
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

pub(crate) fn build_state(args: &Args) -> Result<AppState> {
    let secret = args.secret.as_bytes();
    let issuer = TokenIssuer::new(secret)
        .context("token issuer")?
        .with_ttl(args.token_ttl_secs);
    let capabilities =
        CapabilityIssuer::new(secret, args.capability_ttl_secs).context("capability issuer")?;
    let links = LinkGenerator::new(&args.link_base).context("link base")?;

    let principals = load_principals_from_disk(&args.data_dir).context("load principals")?;
    let records = load_records_from_disk(&args.data_dir).context("load records")?;
    let token_versions = if args.token_versions {
        let versions =
            load_token_versions_from_disk(&args.data_dir).context("load token versions")?;
        Some(Arc::new(RwLock::new(versions)))
    } else {
        None
    };
    tracing::info!(
        principals = principals.len(),
        records = records.len(),
        strict_status = args.strict_status,
        token_ttl_secs = ?args.token_ttl_secs,
        token_versions = args.token_versions,
        "state loaded"
    );

    Ok(AppState {
        issuer,
        links,
        capabilities,
        status_policy: if args.strict_status {
            StatusPolicy::Strict
        } else {
            StatusPolicy::Compat
        },
        data_dir: args.data_dir.clone(),
        principals: Arc::new(RwLock::new(principals)),
        records: Arc::new(RwLock::new(records)),
        token_versions,
        spent_capabilities: Arc::new(RwLock::new(NonceLedger::default())),
    })
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

#[cfg(test)]
#[path = "../../tests/bin/medvault_server/runtime_tests.rs"]
mod tests;
