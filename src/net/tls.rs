//! TLS client configuration and trust root loading.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use rustls::{ClientConfig, RootCertStore};

use crate::config::BackendConfig;
use crate::error::TransportError;

/// Resolve the TLS context for the engine.
///
/// An explicit `ssl_context` wins; otherwise roots come from `tls.ca_cert_path`
/// (plus the web PKI roots unless disabled), or the web PKI roots alone.
pub fn client_config(config: &BackendConfig) -> Result<Arc<ClientConfig>, TransportError> {
    if let Some(context) = &config.ssl_context {
        return Ok(context.clone());
    }

    let mut roots = RootCertStore::empty();
    match &config.tls {
        Some(tls) => {
            if tls.include_webpki_roots {
                roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
            }
            let added = load_pem_roots(Path::new(&tls.ca_cert_path), &mut roots)
                .map_err(|e| TransportError::Tls(format!("{}: {}", tls.ca_cert_path, e)))?;
            tracing::debug!(path = %tls.ca_cert_path, certificates = added, "Loaded CA certificates");
        }
        None => roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned()),
    }

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let mut client = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| TransportError::Tls(e.to_string()))?
        .with_root_certificates(roots)
        .with_no_client_auth();
    client.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];

    Ok(Arc::new(client))
}

/// Add every certificate of a PEM bundle to `roots`. Returns how many were added.
pub fn load_pem_roots(path: &Path, roots: &mut RootCertStore) -> Result<usize, std::io::Error> {
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("CA certificate file not found: {:?}", path),
        ));
    }

    let mut reader = BufReader::new(File::open(path)?);
    let mut added = 0;
    for cert in rustls_pemfile::certs(&mut reader) {
        roots
            .add(cert?)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        added += 1;
    }

    if added == 0 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("No certificates in {:?}", path),
        ));
    }
    Ok(added)
}
