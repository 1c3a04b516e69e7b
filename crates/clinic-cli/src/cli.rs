use clap::Parser;

use crate::config::BackendKind;

#[derive(Parser, Debug)]
#[command(name = "clinic")]
#[command(about = "Clinic console: patients, doctors, appointments, medical records and billing")]
#[command(version)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "CLINIC_CONFIG", default_value = "clinic.toml")]
    pub config: String,

    /// Database URL (overrides [storage.postgres] in the config file)
    #[arg(long, env = "CLINIC_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Storage backend
    #[arg(short, long, value_enum)]
    pub backend: Option<BackendKind>,

    /// Log level when RUST_LOG is not set (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "clinic",
            "--config",
            "custom.toml",
            "--backend",
            "memory",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.config, "custom.toml");
        assert_eq!(cli.backend, Some(BackendKind::Memory));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));

        assert!(Cli::try_parse_from(["clinic", "--backend", "sqlite"]).is_err());
    }
}
