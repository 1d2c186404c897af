use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tokio::io::BufReader;
use tracing::info;
use web3sign_core::config::Config;
use web3sign_core::lifecycle::{
    RetrieveRequest, SignAndUploadRequest, UploadRequest, DEFAULT_FILE_NAME,
};
use web3sign_core::logging::{init_logging_with_config, LogConfig, LogLevel};
use web3sign_core::model::{DocKey, DocumentPatch, FileBlob};

mod engine;
mod serve;

#[derive(Parser, Debug)]
#[command(name = "web3sign")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Set the log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable JSON formatted logging
    #[arg(long)]
    json_logs: bool,

    /// Configuration file (defaults to ~/.web3sign/config.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Parser, Debug)]
enum Command {
    /// Serve newline-delimited JSON commands on stdin, responses on stdout
    Serve,

    /// Ask the wallet for its accounts
    Connect,

    /// Print every stored document
    List,

    /// Store a file as a new draft
    Upload {
        /// File to upload
        file: PathBuf,

        /// Document key (generated when omitted)
        #[arg(short, long)]
        key: Option<String>,

        /// Display name
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Sign a stored document
    Sign { key: String },

    /// Encrypt a document under its access policy and upload it
    Publish {
        key: String,

        /// Signer name stamped on the document
        #[arg(long)]
        sign_name: Option<String>,

        /// Owner address granted access besides the active account
        #[arg(long)]
        owner: Option<String>,
    },

    /// Download and decrypt an uploaded document
    Retrieve {
        key: String,

        /// Content id (defaults to the document's upload receipt)
        #[arg(long)]
        cid: Option<String>,

        /// Where to write the plaintext (defaults to the original file name)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Delete a document
    Delete { key: String },

    /// Write the effective configuration to a file
    InitConfig {
        #[arg(default_value = engine::DEFAULT_CONFIG_PATH)]
        path: PathBuf,
    },
}

fn log_config(args: &Args, config: &Config) -> Result<LogConfig> {
    let mut log_config = LogConfig::try_from(&config.logging)?;

    if let Some(level) = &args.log_level {
        log_config.level = LogLevel::from_str(level).unwrap_or_else(|| {
            eprintln!("Invalid log level '{}', using 'info'", level);
            LogLevel::Info
        });
    }
    if args.json_logs {
        log_config.json_format = true;
    }

    Ok(log_config)
}

/// Output path for a retrieved file, confined to the working directory
///
/// The name comes from decrypted metadata, so only its final component is kept.
fn retrieved_file_path(name: &str) -> PathBuf {
    match Path::new(name).file_name() {
        Some(file_name) => PathBuf::from(file_name),
        None => PathBuf::from(DEFAULT_FILE_NAME),
    }
}

fn mime_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()).map(str::to_lowercase).as_deref() {
        Some("pdf") => web3sign_core::model::PDF_MIME_TYPE,
        Some("txt") => "text/plain",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = engine::load_config(args.config.as_deref())?;
    init_logging_with_config(log_config(&args, &config)?)?;

    web3sign_core::metrics::init_metrics();
    info!("web3sign CLI started");

    let Some(command) = args.command else {
        info!("No command specified. Use --help for usage information.");
        return Ok(());
    };

    // Opening the store is deferred until a command needs it
    let controller = || engine::build_controller(&config);

    match command {
        Command::Serve => {
            let port = engine::build_port(&config)?;
            serve::serve(
                port,
                BufReader::new(tokio::io::stdin()),
                tokio::io::stdout(),
                config.engine.sync_on_start,
            )
            .await?;
        }
        Command::InitConfig { path } => {
            let path = engine::expand_path(&path)?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            config.save_to_file(&path)?;
            println!("{}", path.display());
        }
        Command::Connect => {
            let accounts = controller()?.connect().await?;
            println!("{}", serde_json::to_string_pretty(&accounts)?);
        }
        Command::List => {
            let controller = controller()?;
            controller.sync().await?;
            let snapshot = controller.broadcaster().latest();
            println!("{}", serde_json::to_string_pretty(&snapshot.docs)?);
        }
        Command::Upload { file, key, name } => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let file_name = file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("document")
                .to_string();

            let key = controller()?
                .upload(UploadRequest {
                    key: key.map(DocKey::new),
                    name: name.or_else(|| Some(file_name.clone())),
                    file: FileBlob::new(file_name, mime_type_for(&file), bytes),
                })
                .await?;
            println!("{}", key);
        }
        Command::Sign { key } => {
            let doc = controller()?.sign(&DocKey::new(key)).await?;
            println!("{}", doc.signed.unwrap_or_default());
        }
        Command::Publish { key, sign_name, owner } => {
            let mut patch = DocumentPatch::new();
            if let Some(sign_name) = sign_name {
                patch = patch.sign_name(sign_name);
            }
            if let Some(owner) = owner {
                patch = patch.owner_address(owner);
            }

            let doc = controller()?
                .sign_and_upload(
                    config.api_key(),
                    SignAndUploadRequest {
                        key: DocKey::new(key),
                        patch,
                    },
                )
                .await?;
            if let Some(remote) = doc.remote {
                println!("{}", remote.content_id);
            }
        }
        Command::Retrieve { key, cid, out } => {
            let controller = controller()?;
            let key = DocKey::new(key);
            let cid = match cid {
                Some(cid) => cid,
                None => {
                    controller.sync().await?;
                    match controller
                        .broadcaster()
                        .latest()
                        .get(&key)
                        .and_then(|doc| doc.remote.as_ref())
                    {
                        Some(remote) => remote.content_id.clone(),
                        None => bail!("Document {} has not been uploaded; pass --cid", key),
                    }
                }
            };

            let decrypted = controller
                .download_and_decrypt(RetrieveRequest { key, cid })
                .await?;
            let out = match out {
                Some(out) => out,
                None => retrieved_file_path(&decrypted.file.name),
            };
            tokio::fs::write(&out, &decrypted.file.bytes)
                .await
                .with_context(|| format!("Failed to write {}", out.display()))?;
            println!("{}", out.display());
        }
        Command::Delete { key } => {
            controller()?.delete(&DocKey::new(key)).await?;
        }
    }

    info!("web3sign CLI finished");

    Ok(())
}
