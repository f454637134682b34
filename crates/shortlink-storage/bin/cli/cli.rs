use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::{Display, Formatter};

pub const DATABASE_ENV: &str = "SHORTLINK_DATABASE";
pub const MAX_CONNECTIONS_ENV: &str = "SHORTLINK_MAX_CONNECTIONS";
pub const BUSY_TIMEOUT_MS_ENV: &str = "SHORTLINK_BUSY_TIMEOUT_MS";
pub const BASE_URL_ENV: &str = "SHORTLINK_BASE_URL";
pub const LOG_FORMAT_ENV: &str = "SHORTLINK_LOG_FORMAT";

pub const DEFAULT_DATABASE: &str = "database.db";
pub const DEFAULT_MAX_CONNECTIONS: &str = "5";
pub const DEFAULT_BUSY_TIMEOUT_MS: &str = "5000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "shortlink", about = "Manage the alias → URL mapping database")]
pub struct CLI {
    /// Database file, or `:memory:` for a throwaway database.
    #[arg(long, global = true, env = DATABASE_ENV, default_value = DEFAULT_DATABASE)]
    pub database: String,

    #[arg(
        long,
        global = true,
        env = MAX_CONNECTIONS_ENV,
        default_value = DEFAULT_MAX_CONNECTIONS,
    )]
    pub max_connections: u32,

    #[arg(
        long,
        global = true,
        env = BUSY_TIMEOUT_MS_ENV,
        default_value = DEFAULT_BUSY_TIMEOUT_MS,
    )]
    pub busy_timeout_ms: u64,

    /// Public base URL; when set, `create` also prints the short URL.
    #[arg(long, global = true, env = BASE_URL_ENV)]
    pub base_url: Option<String>,

    #[arg(
        long,
        global = true,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormat::Text
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Create the database file and schema if they do not exist.
    Init,
    /// Store a new alias.
    Create { alias: String, target: String },
    /// Print the target stored under an alias.
    Lookup { alias: String },
    /// Print every stored mapping.
    List {
        /// One JSON object per line instead of tab-separated columns.
        #[arg(long)]
        json: bool,
    },
    /// Remove an alias.
    Delete { alias: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = CLI::try_parse_from(["shortlink", "init"]).unwrap();
        assert_eq!(cli.command, Command::Init);
        assert_eq!(cli.max_connections, 5);
        assert_eq!(cli.busy_timeout_ms, 5000);
        assert_eq!(cli.log_format, LogFormat::Text);
    }

    #[test]
    fn create_takes_alias_and_target() {
        let cli = CLI::try_parse_from([
            "shortlink",
            "--database",
            "links.db",
            "create",
            "abc123",
            "https://example.com",
        ])
        .unwrap();

        assert_eq!(cli.database, "links.db");
        assert_eq!(
            cli.command,
            Command::Create {
                alias: "abc123".to_string(),
                target: "https://example.com".to_string(),
            }
        );
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = CLI::try_parse_from([
            "shortlink",
            "list",
            "--json",
            "--log-format",
            "json",
            "--base-url",
            "http://localhost:5284/url/",
        ])
        .unwrap();

        assert_eq!(cli.command, Command::List { json: true });
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.base_url.as_deref(), Some("http://localhost:5284/url/"));
    }

    #[test]
    fn create_requires_target() {
        assert!(CLI::try_parse_from(["shortlink", "create", "abc123"]).is_err());
    }
}
