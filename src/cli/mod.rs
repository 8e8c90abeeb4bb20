//! CLI argument parsing

use clap::Parser;

/// llm-relay: HTTP relay across interchangeable LLM backends
#[derive(Debug, Parser)]
#[command(name = "llm-relay")]
#[command(about = "Relay normalized chat requests to the first configured LLM backend", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Listen port (overrides the PORT environment variable)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Listen address (overrides the HOST environment variable)
    #[arg(long)]
    pub host: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_flag_overrides() {
        let cli = Cli::parse_from(["llm-relay", "--port", "8080", "--verbose"]);
        assert_eq!(cli.port, Some(8080));
        assert!(cli.verbose);
        assert!(cli.host.is_none());
    }
}
