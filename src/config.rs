use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Donation ledger service.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Config {
    /// Sqlite file holding the world state.
    #[arg(long, env = "DONATION_LEDGER_DB", default_value = "./donation_ledger.db")]
    pub db_path: PathBuf,

    /// Address the HTTP invocation surface listens on.
    #[arg(long, env = "DONATION_LEDGER_BIND", default_value = "0.0.0.0:42069")]
    pub bind: SocketAddr,
}
