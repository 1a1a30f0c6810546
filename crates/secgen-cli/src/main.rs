//! secgen — Zenoh security configuration generator.
//!
//! Two generators behind one CLI:
//! - `policy`: compile an access-control policy into per-node Zenoh configs
//! - `transport`: emit router/peer transport configs with TLS material

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};

use secgen_cli::compile::{self, CompileOptions};
use secgen_cli::transport::{CertPaths, Protocol, TransportMode, TransportParams};

#[derive(Parser)]
#[command(name = "secgen", about = "Generate Zenoh security configurations", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile an access-control policy into per-node configs
    Policy {
        /// Policy file (XML)
        #[arg(long)]
        policy: PathBuf,
        /// Base Zenoh config merged into every output
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
        /// Domain id used as the leading key-expression segment
        #[arg(long, default_value_t = 0)]
        domain_id: u16,
    },
    /// Generate a router/peer transport config with TLS material
    Transport(TransportArgs),
}

#[derive(Args)]
struct TransportArgs {
    /// Generate a router or a peer config
    #[arg(short, long, value_enum)]
    mode: ModeArg,
    /// Output directory
    #[arg(short, long, default_value = ".")]
    output: PathBuf,
    /// Endpoint to listen on
    #[arg(short, long, default_value = "tls/localhost:7447")]
    listen_endpoint: String,
    /// Endpoint to connect to
    #[arg(short, long, default_value = "tls/localhost:7447")]
    connect_endpoint: String,
    /// Link protocols
    #[arg(short, long, value_enum, num_args = 1.., default_value = "tls")]
    protocols: Vec<ProtocolArg>,
    #[command(subcommand)]
    certs: CertSource,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Router,
    Peer,
}

impl From<ModeArg> for TransportMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Router => TransportMode::Router,
            ModeArg::Peer => TransportMode::Peer,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProtocolArg {
    Tcp,
    Tls,
}

impl From<ProtocolArg> for Protocol {
    fn from(arg: ProtocolArg) -> Self {
        match arg {
            ProtocolArg::Tcp => Protocol::Tcp,
            ProtocolArg::Tls => Protocol::Tls,
        }
    }
}

#[derive(Subcommand)]
enum CertSource {
    /// Explicit certificate material paths
    Paths {
        /// Certificate authority certificate validating both sides
        #[arg(long)]
        root_ca_certificate: PathBuf,
        /// TLS listening-side private key
        #[arg(long)]
        listen_private_key: PathBuf,
        /// TLS listening-side public certificate
        #[arg(long)]
        listen_certificate: PathBuf,
        /// TLS connecting-side private key
        #[arg(long)]
        connect_private_key: PathBuf,
        /// TLS connecting-side certificate
        #[arg(long)]
        connect_certificate: PathBuf,
    },
    /// Derive certificate paths from an enclave directory layout
    Enclave {
        /// Keystore root containing `public/` and `enclaves/`
        #[arg(long)]
        enclave_path: PathBuf,
        /// Enclave name (a leading `/` is dropped)
        #[arg(long)]
        enclave_name: String,
    },
}

impl From<CertSource> for CertPaths {
    fn from(source: CertSource) -> Self {
        match source {
            CertSource::Paths {
                root_ca_certificate,
                listen_private_key,
                listen_certificate,
                connect_private_key,
                connect_certificate,
            } => CertPaths {
                root_ca_certificate,
                listen_private_key,
                listen_certificate,
                connect_private_key,
                connect_certificate,
            },
            CertSource::Enclave {
                enclave_path,
                enclave_name,
            } => CertPaths::for_enclave(&enclave_path, &enclave_name),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let env_filter = if cli.verbose { "secgen=debug" } else { "secgen=info" };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Policy {
            policy,
            config,
            out_dir,
            domain_id,
        } => {
            let opts = CompileOptions {
                policy_path: policy,
                base_config_path: config,
                out_dir,
                domain_id,
            };
            match compile::run(&opts) {
                Ok(report) => {
                    for path in &report.written {
                        println!("Generated Zenoh security configuration at {}", path.display());
                    }
                    for path in &report.unchanged {
                        println!("Up to date: {}", path.display());
                    }
                    if report.is_clean() {
                        ExitCode::SUCCESS
                    } else {
                        eprintln!("{} profile(s) failed", report.failures.len());
                        ExitCode::FAILURE
                    }
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    ExitCode::FAILURE
                }
            }
        }
        Commands::Transport(args) => {
            let params = TransportParams {
                mode: args.mode.into(),
                protocols: args.protocols.into_iter().map(Protocol::from).collect(),
                listen_endpoint: args.listen_endpoint,
                connect_endpoint: args.connect_endpoint,
                certs: args.certs.into(),
            };
            match params.generate(&args.output) {
                Ok((path, _)) => {
                    println!("Generated Zenoh transport configuration at {}", path.display());
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
