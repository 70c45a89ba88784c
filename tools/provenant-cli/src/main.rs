//! Provenant Command Line Tool
//!
//! Provides commands for working with provenance-protected JSON records:
//! - keygen: Generate an Ed25519 keypair and write both halves to disk
//! - canonicalize: Generate canonical JSON representation
//! - hash: Compute the SHA256 transaction hash of canonical JSON
//! - sign: Mint an integrity or signer token over a record's hash
//! - verify: Run the full dual-token verification

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use provenant_canonical::{hash_deterministic_json, to_canonical_json_value};
use provenant_token::{
    generate_and_save, load_key_set, load_keypair, sign_claims, KeyStoreConfig, TokenClaims,
    TokenRole,
};
use provenant_verify::verify_dual_token;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "provenant")]
#[command(version)]
#[command(about = "Provenant Command Line Tool - Hash, sign, and verify JSON records")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    Integrity,
    Signer,
}

impl From<RoleArg> for TokenRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Integrity => TokenRole::Integrity,
            RoleArg::Signer => TokenRole::Signer,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an Ed25519 keypair
    #[command(about = "Generate a keypair: a publishable JWKS file and a private JWK file")]
    Keygen {
        /// Base filename for the key files
        #[arg(long)]
        name: String,

        /// Directory for the publishable key set
        #[arg(long, value_name = "DIR")]
        public_dir: PathBuf,

        /// Directory for the private key (keep out of version control)
        #[arg(long, value_name = "DIR")]
        private_dir: PathBuf,
    },

    /// Canonicalize a JSON file
    #[command(about = "Output canonical JSON representation")]
    Canonicalize {
        /// Path to the JSON file to canonicalize
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Compute the SHA256 transaction hash of canonical JSON
    #[command(about = "Compute the transaction hash of a JSON record")]
    Hash {
        /// Path to the JSON file to hash
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Mint a token over a record's transaction hash
    #[command(about = "Sign a record's hash into an integrity or signer token")]
    Sign {
        /// Path to the JSON record
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Path to the private JWK file
        #[arg(long, value_name = "FILE")]
        key: PathBuf,

        /// Role the token attests
        #[arg(long)]
        role: RoleArg,

        /// Issuer identifier placed in the token
        #[arg(long)]
        issuer: String,
    },

    /// Verify a record against its two tokens
    #[command(about = "Run dual-token verification against a record")]
    Verify {
        /// Path to the JSON record
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// File containing the integrity token
        #[arg(long, value_name = "FILE")]
        integrity_token: PathBuf,

        /// File containing the signer token
        #[arg(long, value_name = "FILE")]
        signer_token: PathBuf,

        /// JWKS file with the integrity issuer's public keys
        #[arg(long, value_name = "FILE")]
        integrity_keys: PathBuf,

        /// JWKS file with the signer issuer's public keys
        #[arg(long, value_name = "FILE")]
        signer_keys: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Keygen {
            name,
            public_dir,
            private_dir,
        } => handle_keygen(&name, public_dir, private_dir),
        Commands::Canonicalize { file } => handle_canonicalize(&file),
        Commands::Hash { file } => handle_hash(&file),
        Commands::Sign {
            file,
            key,
            role,
            issuer,
        } => handle_sign(&file, &key, role.into(), &issuer),
        Commands::Verify {
            file,
            integrity_token,
            signer_token,
            integrity_keys,
            signer_keys,
        } => {
            handle_verify(
                &file,
                &integrity_token,
                &signer_token,
                &integrity_keys,
                &signer_keys,
            )
            .await
        }
    }
}

fn read_json(file: &PathBuf) -> Result<serde_json::Value> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read file: {}", file.display()))?;

    serde_json::from_str(&json).with_context(|| format!("Failed to parse {} as JSON", file.display()))
}

fn handle_keygen(name: &str, public_dir: PathBuf, private_dir: PathBuf) -> Result<()> {
    let config = KeyStoreConfig::new(public_dir, private_dir);
    let keypair =
        generate_and_save(&config, name).with_context(|| "Failed to generate keypair")?;

    println!("Public key set saved to {}", config.public_path(name).display());
    println!(
        "Private key saved to {} (keep this secret)",
        config.private_path(name).display()
    );
    println!("kid: {}", keypair.kid());

    Ok(())
}

fn handle_canonicalize(file: &PathBuf) -> Result<()> {
    let value = read_json(file)?;
    let canonical = to_canonical_json_value(&value);

    std::io::stdout()
        .write_all(&canonical)
        .with_context(|| "Failed to write output")?;

    Ok(())
}

fn handle_hash(file: &PathBuf) -> Result<()> {
    let value = read_json(file)?;
    println!("{}", hash_deterministic_json(&value));

    Ok(())
}

fn handle_sign(file: &PathBuf, key: &PathBuf, role: TokenRole, issuer: &str) -> Result<()> {
    let value = read_json(file)?;
    let hash = hash_deterministic_json(&value);

    let keypair = load_keypair(key)
        .with_context(|| format!("Failed to load private key: {}", key.display()))?;

    let claims = TokenClaims::new(hash, issuer, role);
    let token = sign_claims(&claims, &keypair).with_context(|| "Failed to sign token")?;

    println!("{}", token);

    Ok(())
}

async fn handle_verify(
    file: &PathBuf,
    integrity_token: &PathBuf,
    signer_token: &PathBuf,
    integrity_keys: &PathBuf,
    signer_keys: &PathBuf,
) -> Result<()> {
    let record = read_json(file)?;

    let integrity_token = read_token(integrity_token)?;
    let signer_token = read_token(signer_token)?;

    let integrity_keys = load_key_set(integrity_keys)
        .with_context(|| format!("Failed to load key set: {}", integrity_keys.display()))?;
    let signer_keys = load_key_set(signer_keys)
        .with_context(|| format!("Failed to load key set: {}", signer_keys.display()))?;

    let verification = verify_dual_token(
        &record,
        &integrity_token,
        &signer_token,
        &integrity_keys,
        &signer_keys,
    )
    .await
    .with_context(|| "Verification failed")?;

    println!("Verification succeeded");
    println!("hash: {}", verification.hash);
    println!(
        "integrity token: iss={} iat={}",
        verification.integrity.iss, verification.integrity.iat
    );
    println!(
        "signer token: iss={} iat={}",
        verification.signer.iss, verification.signer.iat
    );

    Ok(())
}

fn read_token(file: &PathBuf) -> Result<String> {
    let token = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read token file: {}", file.display()))?;
    Ok(token.trim().to_string())
}
