use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy_primitives::Address;
use anyhow::{Context, Result};
use bulk_order_encoder::typed_data::domain::{SEAPORT_DOMAIN_NAME, SEAPORT_V1_6_ADDRESS};
use bulk_order_encoder::{BulkOrderEncoder, Eip712Domain, LocalSigner, MAX_TREE_HEIGHT};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

mod report;


/// Encode batches of marketplace orders into a single EIP-712 bulk order.
///
/// The output carries the one digest to sign and, per order, the leaf index and proof that
/// turn that signature into a bulk signature the exchange contract accepts.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode a JSON array of orders, optionally signing the bulk digest.
    Encode(EncodeArgs),
    /// Print the bulk order type hash for every tree height.
    TypeHashes {
        #[arg(long, default_value_t = MAX_TREE_HEIGHT)]
        max_height: u32,
    },
}

#[derive(Args, Debug)]
struct EncodeArgs {
    /// JSON file holding an array of `OrderComponents`.
    #[arg(long)]
    orders: PathBuf,

    /// Leading tree slots left as padding before the first order.
    #[arg(long, default_value_t = 0)]
    start_index: usize,

    /// Explicit tree height. Defaults to the smallest height that fits the batch.
    #[arg(long)]
    height: Option<u32>,

    #[command(flatten)]
    domain: DomainArgs,

    /// Path to a file containing the signer private key.
    #[arg(long, env = "PRIV_KEY_PATH", conflicts_with = "private_key")]
    private_key_path: Option<String>,

    /// Private key (hex string, 0x...).
    #[arg(long, env = "PKEY", conflicts_with = "private_key_path")]
    private_key: Option<String>,

    /// Write the JSON here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct DomainArgs {
    #[arg(long, env = "CHAIN_ID", default_value_t = 1)]
    chain_id: u64,

    /// Exchange contract the orders are signed for.
    #[arg(long, env = "SEAPORT_ADDRESS", default_value_t = SEAPORT_V1_6_ADDRESS)]
    verifying_contract: Address,

    #[arg(long, default_value = SEAPORT_DOMAIN_NAME)]
    domain_name: String,

    #[arg(long, default_value = "1.6")]
    domain_version: String,
}

impl DomainArgs {
    fn domain(&self) -> Eip712Domain {
        Eip712Domain::new(
            &self.domain_name,
            &self.domain_version,
            self.chain_id,
            self.verifying_contract,
        )
    }
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Command::Encode(args) => encode(&args),
        Command::TypeHashes { max_height } => {
            let encoder = BulkOrderEncoder::new(Eip712Domain::seaport(1))?;
            let table = report::type_hash_table(&encoder, max_height)?;
            write_json(None, &table)
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    // stdout carries the JSON output.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn encode(args: &EncodeArgs) -> Result<()> {
    let raw = fs::read_to_string(&args.orders)
        .with_context(|| format!("failed reading {}", args.orders.display()))?;
    let orders = report::parse_orders(&raw)
        .with_context(|| format!("failed parsing {}", args.orders.display()))?;

    let signer = load_signer(args)?;
    let encoder = BulkOrderEncoder::new(args.domain.domain())?;
    let now = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    let report = report::encode_report(
        &encoder,
        &orders,
        args.start_index,
        args.height,
        signer.as_ref(),
        now,
    )?;
    info!(
        orders = orders.len(),
        height = report.height,
        digest = %report.digest,
        signed = signer.is_some(),
        "encoded bulk order"
    );

    write_json(args.out.as_deref(), &report)
}

fn load_signer(args: &EncodeArgs) -> Result<Option<LocalSigner>> {
    let key = if let Some(ref path) = args.private_key_path {
        fs::read_to_string(path).with_context(|| format!("failed reading key file {path}"))?
    } else if let Some(ref key) = args.private_key {
        key.clone()
    } else {
        return Ok(None);
    };
    let signer = LocalSigner::from_hex(&key).context("failed parsing private key")?;
    Ok(Some(signer))
}

fn write_json<T: Serialize>(out: Option<&Path>, value: &T) -> Result<()> {
    let serialised = serde_json::to_string_pretty(value).context("failed serialising JSON")?;
    match out {
        Some(path) => write_atomic(path, &serialised),
        None => {
            println!("{serialised}");
            Ok(())
        }
    }
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !parent.exists() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }

    let tmp_path = tmp_path_for(path);
    fs::write(&tmp_path, contents.as_bytes())
        .with_context(|| format!("failed writing temp file {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("failed replacing {}", path.display()))?;
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}
