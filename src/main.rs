//! Krypt Vault - CLI
//!
//! Command-line interface for vault operations.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use krypt_vault::{
    DecryptOptions, EncryptOptions, FileType, KryptVault, StaticAccount, VaultConfig, VaultKey,
};

#[derive(Parser)]
#[command(name = "krypt")]
#[command(version = krypt_vault::VERSION)]
#[command(about = "Krypt Vault - encrypted media and notes")]
struct Cli {
    /// Vault root directory
    #[arg(short, long, default_value = "./krypt")]
    vault: PathBuf,

    /// Account name
    #[arg(short, long)]
    account: String,

    /// Passphrase the account key is derived from
    #[arg(short, long, conflicts_with = "key_hex")]
    passphrase: Option<String>,

    /// Raw 32-byte account key, hex encoded
    #[arg(long)]
    key_hex: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt files into the vault
    Encrypt {
        paths: Vec<PathBuf>,

        /// photo, video, audio or text
        #[arg(short, long, default_value = "photo")]
        r#type: FileType,

        /// Delete originals after they were encrypted
        #[arg(long)]
        delete_originals: bool,
    },

    /// Decrypt media matching names or paths
    Decrypt {
        selectors: Vec<String>,

        /// Remove decrypted files from the vault
        #[arg(long)]
        delete_after: bool,

        /// Do not notify the media store
        #[arg(long)]
        no_scan: bool,
    },

    /// Store an encrypted text note
    Note { title: String, content: String },

    /// List indexed files
    List {
        #[arg(short, long)]
        r#type: Option<FileType>,
    },

    /// Count files per type
    Counts,

    /// Bytes used by backups and encrypted files
    Size,

    /// Delete files by id
    Delete { ids: Vec<i64> },

    /// Check the integrity of every encrypted file
    Verify,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn account_key(cli: &Cli) -> anyhow::Result<VaultKey> {
    match (&cli.passphrase, &cli.key_hex) {
        (Some(passphrase), _) => Ok(VaultKey::from_passphrase(passphrase, &cli.account)?),
        (None, Some(key_hex)) => {
            let bytes = zeroize::Zeroizing::new(hex::decode(key_hex.trim()).context("invalid --key-hex")?);
            Ok(VaultKey::from_slice(&bytes)?)
        }
        (None, None) => bail!("either --passphrase or --key-hex is required"),
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = VaultConfig::load_or_default(&cli.vault)
        .with_context(|| format!("loading config from {}", cli.vault.display()))?;
    let account = Arc::new(StaticAccount::new(cli.account.clone(), account_key(&cli)?));
    let vault = KryptVault::open(config, account).context("opening vault")?;
    let orchestrator = vault.orchestrator();
    let repo = vault.repository();

    match cli.command {
        Commands::Encrypt {
            paths,
            r#type,
            delete_originals,
        } => {
            println!("🔐 Encrypting {} file(s) as {}...", paths.len(), r#type);
            let report = orchestrator.encrypt(&paths, r#type, EncryptOptions { delete_originals });
            for path in &report.succeeded {
                println!("   ✅ {}", path.display());
            }
            for (input, reason) in &report.failed {
                println!("   ❌ {} ({:?})", input, reason);
            }
            println!("{:?}", report.state);
        }

        Commands::Decrypt {
            selectors,
            delete_after,
            no_scan,
        } => {
            println!("🔓 Decrypting...");
            let report = orchestrator.decrypt(
                &selectors,
                DecryptOptions {
                    delete_after,
                    notify_media_scanner: !no_scan,
                },
            );
            for path in &report.succeeded {
                println!("   ✅ {}", path.display());
            }
            for (input, reason) in &report.failed {
                println!("   ❌ {} ({:?})", input, reason);
            }
            println!("{:?}", report.state);
        }

        Commands::Note { title, content } => {
            let record = orchestrator.encrypt_text(&title, &content)?;
            println!(
                "📝 Note stored with ID: {}",
                record.id.map(|id| id.to_string()).unwrap_or_default()
            );
        }

        Commands::List { r#type } => {
            let records = match r#type {
                Some(FileType::Photo) => repo.get_all_images(),
                Some(FileType::Video) => repo.get_all_videos(),
                Some(FileType::Audio) => repo.get_all_audio_files(),
                Some(FileType::Text) => repo.get_all_text_files(),
                None => repo.get_all_files(),
            };

            if records.is_empty() {
                println!("📭 No files in vault");
            } else {
                println!("📁 Files in vault ({}):", records.len());
                println!("{:-<60}", "");
                for record in records {
                    let thumb = if record.kind.thumbnail().is_some() { "🖼" } else { "  " };
                    println!(
                        "{:>5} {:<6} {} {}",
                        record.id.unwrap_or_default(),
                        record.file_type(),
                        thumb,
                        record.file_path.display()
                    );
                }
            }
        }

        Commands::Counts => {
            println!("📊 Krypt Vault Statistics");
            println!("{:-<40}", "");
            for (file_type, count) in repo.get_all_files_type_counts() {
                println!("{:<8} {}", file_type, count);
            }
            println!("{:<8} {}", "media", repo.get_medias_count());
        }

        Commands::Size => {
            let total = repo.get_all_files_size();
            println!("💾 {} bytes ({} MB)", total, total / 1024 / 1024);
        }

        Commands::Delete { ids } => {
            let deleted = orchestrator.delete_files(&ids);
            println!("🗑️ Deleted {} of {} file(s)", deleted, ids.len());
        }

        Commands::Verify => {
            let mut bad = 0usize;
            for record in repo.get_all_files() {
                let ok = orchestrator
                    .crypt()
                    .verify_integrity(&record.file_path)
                    .unwrap_or(false);
                if !ok {
                    bad += 1;
                    println!("   ⚠️ {}", record.file_path.display());
                }
            }
            if bad == 0 {
                println!("💚 All files intact");
            } else {
                println!("⚠️ {} file(s) failed verification", bad);
            }
        }
    }

    Ok(())
}
