use clap::{Parser, Subcommand};
use infrastructure::config::{LogFormat, LogLevel};
use infrastructure::constants::DEFAULT_CONFIG_PATH;

#[derive(Parser, Debug)]
#[command(
    name = "trailkeeper",
    about = "Audited customer service with a queryable audit trail",
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, env = "TRAILKEEPER_CONFIG")]
    pub config: String,

    /// Log level override (takes precedence over config file)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Log format: json (default, production) or text (development)
    #[arg(long)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP service (default)
    Serve,

    /// Display version information
    Version,
}

/// Parse CLI arguments from `std::env::args`.
pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["trailkeeper"]).unwrap();
        assert_eq!(cli.config, DEFAULT_CONFIG_PATH);
        assert!(cli.log_level.is_none());
        assert!(cli.log_format.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn cli_custom_config_path() {
        let cli = Cli::try_parse_from(["trailkeeper", "--config", "/tmp/test.yaml"]).unwrap();
        assert_eq!(cli.config, "/tmp/test.yaml");
    }

    #[test]
    fn cli_log_overrides() {
        let cli = Cli::try_parse_from([
            "trailkeeper",
            "--log-level",
            "debug",
            "--log-format",
            "text",
        ])
        .unwrap();
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
        assert_eq!(cli.log_format, Some(LogFormat::Text));
    }

    #[test]
    fn cli_rejects_bad_log_level() {
        assert!(Cli::try_parse_from(["trailkeeper", "--log-level", "loud"]).is_err());
    }

    #[test]
    fn cli_subcommands() {
        let cli = Cli::try_parse_from(["trailkeeper", "version"]).unwrap();
        assert_eq!(cli.command, Some(Command::Version));

        let cli = Cli::try_parse_from(["trailkeeper", "-c", "x.yaml", "serve"]).unwrap();
        assert_eq!(cli.command, Some(Command::Serve));
        assert_eq!(cli.config, "x.yaml");
    }
}
