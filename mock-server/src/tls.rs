//! HTTPS variant of the mock, backed by a throwaway self-signed certificate.

use std::io;
use std::sync::Arc;

use axum::Router;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use hyper_util::service::TowerToHyperService;
use rcgen::CertifiedKey;
use rustls::pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer};
use rustls::ServerConfig;
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;
use tracing::debug;

use crate::{router, MockConfig, MockServer, MockState};

/// A server config presenting a fresh self-signed certificate for `hosts`.
pub fn self_signed_config(hosts: &[&str]) -> io::Result<Arc<ServerConfig>> {
    let names: Vec<String> = hosts.iter().map(|h| h.to_string()).collect();
    let CertifiedKey { cert, key_pair } =
        rcgen::generate_simple_self_signed(names).map_err(io::Error::other)?;
    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key_pair.serialize_der()));

    let mut config =
        ServerConfig::builder_with_provider(Arc::new(rustls::crypto::ring::default_provider()))
            .with_safe_default_protocol_versions()
            .map_err(io::Error::other)?
            .with_no_client_auth()
            .with_single_cert(vec![cert.der().clone()], key)
            .map_err(io::Error::other)?;
    config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];
    Ok(Arc::new(config))
}

/// Accepts TLS connections on `listener` and hands them to `app`.
pub async fn run_tls(listener: TcpListener, app: Router, tls: Arc<ServerConfig>) -> io::Result<()> {
    let acceptor = TlsAcceptor::from(tls);
    loop {
        let (stream, peer) = listener.accept().await?;
        let acceptor = acceptor.clone();
        let app = app.clone();
        tokio::spawn(async move {
            let stream = match acceptor.accept(stream).await {
                Ok(stream) => stream,
                Err(e) => {
                    debug!(%peer, error = %e, "TLS handshake failed");
                    return;
                }
            };
            let service = TowerToHyperService::new(app);
            if let Err(e) = Builder::new(TokioExecutor::new())
                .serve_connection(TokioIo::new(stream), service)
                .await
            {
                debug!(%peer, error = %e, "connection ended with error");
            }
        });
    }
}

/// Binds `127.0.0.1:0` and serves HTTPS with a certificate for `127.0.0.1`
/// and `localhost` that no trust store knows.
pub async fn spawn_tls(config: MockConfig) -> io::Result<MockServer> {
    spawn_tls_for(config, &["127.0.0.1", "localhost"]).await
}

/// Like `spawn_tls`, with the certificate issued for `hosts` instead.
pub async fn spawn_tls_for(config: MockConfig, hosts: &[&str]) -> io::Result<MockServer> {
    let tls = self_signed_config(hosts)?;
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = MockState::new(config);
    let app = router(state.clone());
    tokio::spawn(async move {
        if let Err(e) = run_tls(listener, app, tls).await {
            debug!(error = %e, "TLS mock server stopped");
        }
    });
    Ok(MockServer { addr, state })
}
