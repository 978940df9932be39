//! Command line and environment configuration

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

use crate::model::Session;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "bookworm-den",
    version,
    about = "Terminal client for the BookwormDen reading clubs"
)]
pub struct Config {
    /// Base URL of the BookwormDen server.
    #[arg(long, env = "BOOKWORM_SERVER_URL", default_value = "http://127.0.0.1:5000")]
    pub server_url: String,

    /// Value of the server's `session` cookie from a logged-in browser.
    #[arg(long, env = "BOOKWORM_SESSION_COOKIE", hide_env_values = true)]
    pub session_cookie: Option<String>,

    /// Username of the logged-in user; enables member-only actions.
    #[arg(long, env = "BOOKWORM_USERNAME")]
    pub username: Option<String>,

    /// Id of the reading club whose forum `c` opens.
    #[arg(long, env = "BOOKWORM_CLUB")]
    pub club: Option<i64>,

    /// Forum messages fetched per page.
    #[arg(long, default_value_t = 20)]
    pub page_size: usize,

    /// Directory for the daily rolling log files.
    #[arg(long, env = "BOOKWORM_LOG_DIR", default_value = ".logs")]
    pub log_dir: PathBuf,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        let url = self.server_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            bail!("server url must start with http:// or https://, got {url:?}");
        }
        if self.page_size == 0 {
            bail!("page size must be at least 1");
        }
        Ok(())
    }

    pub fn session(&self) -> Session {
        Session::new(self.username.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["bookworm-den"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn explicit_arguments() {
        let config = parse(&[
            "--server-url",
            "https://den.example.org",
            "--username",
            "ana",
            "--club",
            "4",
            "--page-size",
            "10",
        ]);
        assert_eq!(config.server_url, "https://den.example.org");
        assert_eq!(config.club, Some(4));
        assert_eq!(config.page_size, 10);
        assert_eq!(config.log_dir, PathBuf::from(".logs"));
        assert!(config.session().is_logged_in());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_non_http_urls() {
        let config = parse(&["--server-url", "ftp://den.example.org"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_page_size() {
        let config = parse(&["--server-url", "http://localhost:5000", "--page-size", "0"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn blank_username_is_anonymous() {
        let config = parse(&["--username", "  "]);
        assert!(!config.session().is_logged_in());
    }
}
