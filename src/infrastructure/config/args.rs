//! Command-line arguments.

use super::app_config::LogLevel;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments; each set value overrides the config file.
#[derive(Debug, Parser)]
#[command(
    name = "jino-client",
    version,
    about = "Authenticated API client with transparent token refresh",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// API base URL.
    #[arg(long, env = "JINO_BASE_URL")]
    pub base_url: Option<String>,

    /// Request timeout in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Access token of an existing session.
    #[arg(long)]
    pub access_token: Option<String>,

    /// Refresh token of an existing session.
    #[arg(long)]
    pub refresh_token: Option<String>,

    /// Log in with these credentials before running the command.
    #[arg(long, env = "JINO_USERNAME", requires = "password")]
    pub username: Option<String>,

    /// Password for `--username`.
    #[arg(long, env = "JINO_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Operation to perform.
    #[command(subcommand)]
    pub command: Command,
}

/// Operation to perform.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and print the issued tokens.
    Login {
        /// Account name.
        username: String,
        /// Account password.
        #[arg(env = "JINO_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Renew the access token and print the new pair.
    Refresh,
    /// End the session.
    Logout,
    /// Send an authenticated GET.
    Get {
        /// Request path.
        path: String,
    },
    /// Send an authenticated POST.
    Post {
        /// Request path.
        path: String,
        /// JSON body.
        #[arg(default_value = "{}")]
        body: String,
    },
    /// Send an authenticated PUT.
    Put {
        /// Request path.
        path: String,
        /// JSON body.
        #[arg(default_value = "{}")]
        body: String,
    },
    /// Send an authenticated DELETE.
    Delete {
        /// Request path.
        path: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request_command() {
        let args = CliArgs::parse_from(["jino-client", "post", "/orders", r#"{"id":1}"#]);

        match args.command {
            Command::Post { path, body } => {
                assert_eq!(path, "/orders");
                assert_eq!(body, r#"{"id":1}"#);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_post_body_defaults_to_empty_object() {
        let args = CliArgs::parse_from(["jino-client", "put", "/orders/1"]);
        assert!(matches!(args.command, Command::Put { body, .. } if body == "{}"));
    }

    #[test]
    fn test_username_requires_password() {
        let result = CliArgs::try_parse_from(["jino-client", "--username", "u", "get", "/me"]);
        if std::env::var_os("JINO_PASSWORD").is_none() {
            assert!(result.is_err());
        }
    }
}
