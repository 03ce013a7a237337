//! Command-line flags for the detector binary.

use clap::Parser;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Cross-exchange spot arbitrage detector")]
pub struct Args {
    /// Path to the JSON configuration file
    #[arg(long, env = "CONFIG_PATH", default_value = "config.json")]
    pub config: PathBuf,

    /// Port for the read-only HTTP API
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,
}

impl Args {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "spread-detector",
            "--config",
            "cfg/prod.json",
            "--port",
            "9090",
        ])
        .unwrap();
        assert_eq!(args.config, PathBuf::from("cfg/prod.json"));
        assert_eq!(args.listen_addr().port(), 9090);
    }
}
