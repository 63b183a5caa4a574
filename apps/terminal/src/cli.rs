//! Command-line interface definitions

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (defaults to the platform config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Write the effective client configuration to the config file and exit
    #[arg(long)]
    pub init_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from(["storefront", "-v", "--config", "/tmp/client.toml"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/client.toml")));

        let cli = Cli::parse_from(["storefront"]);
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
        assert!(!cli.init_config);
    }

    #[test]
    fn test_init_config_flag() {
        let cli = Cli::parse_from(["storefront", "--init-config", "-c", "/tmp/client.toml"]);
        assert!(cli.init_config);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/client.toml")));
    }
}
