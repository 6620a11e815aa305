use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // http server configuration
    /// address for the HTTP server to listen on
    pub listen_addr: SocketAddr,

    // storage configuration
    /// directory containing every tenant namespace,
    ///  created on startup if absent
    pub storage_root: PathBuf,
    /// upload size ceiling in bytes,
    ///  if not set then uploads are uncapped
    pub max_upload_bytes: Option<u64>,

    // logging
    pub log_level: tracing::Level,
}
