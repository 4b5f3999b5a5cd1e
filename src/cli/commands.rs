//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Postboard blog backend CLI
#[derive(Parser, Debug)]
#[command(name = "postboard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print one page of posts as JSON
    List {
        /// Raw query string, e.g. "take=5&order__createdAt=DESC"
        #[arg(short, long, default_value = "")]
        query: String,
    },

    /// Create placeholder posts
    Seed {
        /// Author id of the generated posts
        #[arg(long, default_value = "1")]
        author: i64,

        /// Number of posts to create
        #[arg(long, default_value = "100")]
        count: usize,
    },

    /// Issue an access token for a user
    Token {
        /// User id placed in the token subject
        #[arg(long)]
        user: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_with_global_flags() {
        let cli = Cli::try_parse_from([
            "postboard",
            "list",
            "--query",
            "take=5",
            "--config",
            "postboard.yaml",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("postboard.yaml")));
        assert!(matches!(cli.command, Commands::List { ref query } if query == "take=5"));
    }

    #[test]
    fn test_parse_seed_defaults() {
        let cli = Cli::try_parse_from(["postboard", "seed"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Seed {
                author: 1,
                count: 100
            }
        ));
    }

    #[test]
    fn test_token_requires_user() {
        assert!(Cli::try_parse_from(["postboard", "token"]).is_err());
    }
}
