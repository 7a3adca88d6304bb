//! Command line and environment configuration for the server.

use std::{
    fs,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};

use clap::Parser;

use crate::Error;

/// The REST API server for finance_ledger.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "LEDGER_DB_PATH")]
    pub db_path: PathBuf,

    /// The address to serve the API from.
    #[arg(long, env = "LEDGER_HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    /// The port to serve the API from.
    #[arg(short, long, env = "LEDGER_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Directory for storing uploaded CSV files until they are imported.
    ///
    /// Defaults to the system's temporary directory.
    #[arg(long, env = "LEDGER_UPLOAD_DIR")]
    pub upload_dir: Option<PathBuf>,

    /// File path for the debug log.
    #[arg(long, env = "LEDGER_LOG_PATH", default_value = "debug.log")]
    pub log_path: PathBuf,
}

/// The resolved settings the server runs with.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// File path to the application SQLite database.
    pub db_path: PathBuf,
    /// The socket address to listen on.
    pub address: SocketAddr,
    /// Directory for uploaded CSV files, guaranteed to exist.
    pub upload_dir: PathBuf,
    /// File path for the debug log.
    pub log_path: PathBuf,
}

impl ServerConfig {
    /// Resolve defaults in `args` and create the upload directory if needed.
    ///
    /// # Errors
    /// Returns [Error::FileError] if the upload directory cannot be created.
    pub fn from_args(args: Args) -> Result<Self, Error> {
        let upload_dir = args.upload_dir.unwrap_or_else(std::env::temp_dir);
        fs::create_dir_all(&upload_dir)?;

        Ok(Self {
            db_path: args.db_path,
            address: SocketAddr::new(args.host, args.port),
            upload_dir,
            log_path: args.log_path,
        })
    }
}
