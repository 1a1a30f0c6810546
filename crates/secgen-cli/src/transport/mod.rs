//! Transport/TLS configuration generation from static templates.
//!
//! Pure substitution: endpoints, the protocol list, and certificate paths
//! are dropped into an embedded router or peer JSON5 skeleton. No decision
//! logic lives here.

mod templates;

use std::path::{Path, PathBuf};

use secgen_core::error::Result;

use crate::compile::CONFIG_FILE_EXTENSION;
use crate::sink;

/// Which template to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    Router,
    Peer,
}

impl TransportMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TransportMode::Router => "router",
            TransportMode::Peer => "peer",
        }
    }
}

/// Link protocols the endpoints may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Tcp,
    Tls,
}

impl Protocol {
    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
            Protocol::Tls => "tls",
        }
    }
}

/// TLS certificate material locations.
#[derive(Debug, Clone)]
pub struct CertPaths {
    pub root_ca_certificate: PathBuf,
    pub listen_private_key: PathBuf,
    pub listen_certificate: PathBuf,
    pub connect_private_key: PathBuf,
    pub connect_certificate: PathBuf,
}

impl CertPaths {
    /// Derive certificate locations from an enclave directory layout:
    /// `public/ca.cert.pem` plus `enclaves/<name>/{key.pem,cert.pem}`, the
    /// same material serving both the listen and connect sides. A leading
    /// `/` on the enclave name is dropped.
    pub fn for_enclave(root: &Path, enclave_name: &str) -> Self {
        let name = enclave_name.strip_prefix('/').unwrap_or(enclave_name);
        let enclave_dir = root.join("enclaves").join(name);
        let key = enclave_dir.join("key.pem");
        let cert = enclave_dir.join("cert.pem");

        Self {
            root_ca_certificate: root.join("public").join("ca.cert.pem"),
            listen_private_key: key.clone(),
            listen_certificate: cert.clone(),
            connect_private_key: key,
            connect_certificate: cert,
        }
    }
}

/// Everything the templates need.
#[derive(Debug, Clone)]
pub struct TransportParams {
    pub mode: TransportMode,
    pub protocols: Vec<Protocol>,
    pub listen_endpoint: String,
    pub connect_endpoint: String,
    pub certs: CertPaths,
}

impl TransportParams {
    /// Render the embedded template for this mode.
    pub fn render(&self) -> String {
        let template = match self.mode {
            TransportMode::Router => templates::ROUTER,
            TransportMode::Peer => templates::PEER,
        };

        let protocols: Vec<String> = self
            .protocols
            .iter()
            .map(|p| format!("\"{}\"", p.as_str()))
            .collect();

        template
            .replace("@PROTOCOLS@", &format!("[{}]", protocols.join(", ")))
            .replace("@LISTEN_ENDPOINT@", &self.listen_endpoint)
            .replace("@CONNECT_ENDPOINT@", &self.connect_endpoint)
            .replace(
                "@ROOT_CA_CERTIFICATE@",
                &self.certs.root_ca_certificate.display().to_string(),
            )
            .replace(
                "@LISTEN_PRIVATE_KEY@",
                &self.certs.listen_private_key.display().to_string(),
            )
            .replace(
                "@LISTEN_CERTIFICATE@",
                &self.certs.listen_certificate.display().to_string(),
            )
            .replace(
                "@CONNECT_PRIVATE_KEY@",
                &self.certs.connect_private_key.display().to_string(),
            )
            .replace(
                "@CONNECT_CERTIFICATE@",
                &self.certs.connect_certificate.display().to_string(),
            )
    }

    /// Write `<mode>.json5` under `out_dir` through the idempotent sink.
    /// Returns the path and whether the file was actually (re)written.
    pub fn generate(&self, out_dir: &Path) -> Result<(PathBuf, bool)> {
        let path = out_dir.join(format!("{}.{CONFIG_FILE_EXTENSION}", self.mode.as_str()));
        let changed = sink::write_if_changed(&path, &self.render())?;
        Ok((path, changed))
    }
}
