//! CLI runner - executes commands

use crate::auth::JwtIdentityProvider;
use crate::cli::commands::{Cli, Commands};
use crate::cli::server::{serve, AppState};
use crate::config::Settings;
use crate::error::{Result, ResultExt};
use crate::types::parse_query_string;

/// CLI runner
pub struct Runner {
    cli: Cli,
    settings: Settings,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli, settings: Settings) -> Self {
        Self { cli, settings }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let settings = &self.settings;
        tracing::debug!(
            backend = ?settings.database.backend,
            host = %settings.server.host,
            "loaded settings"
        );

        match &self.cli.command {
            Commands::Serve { port } => {
                let port = port.unwrap_or(settings.server.port);
                let state = AppState::from_settings(settings)?;
                serve(state, port).await
            }
            Commands::List { query } => self.list(settings, query).await,
            Commands::Seed { author, count } => self.seed(settings, *author, *count).await,
            Commands::Token { user } => self.token(settings, *user),
        }
    }

    /// Print one page of posts
    async fn list(&self, settings: &Settings, query: &str) -> Result<()> {
        let state = AppState::from_settings(settings)?;
        let page = state.posts.paginate_posts(parse_query_string(query)).await?;
        let rendered = serde_json::to_string_pretty(&page).context("Failed to render page")?;
        println!("{rendered}");
        Ok(())
    }

    /// Create placeholder posts
    async fn seed(&self, settings: &Settings, author: i64, count: usize) -> Result<()> {
        let state = AppState::from_settings(settings)?;
        let created = state
            .posts
            .generate_posts(author, count)
            .await
            .with_context(|| format!("Failed to seed posts for author {author}"))?;

        match (created.first(), created.last()) {
            (Some(first), Some(last)) => {
                println!("Created {} posts (ids {}..={})", created.len(), first.id, last.id);
            }
            _ => println!("Created 0 posts"),
        }
        Ok(())
    }

    /// Print an access token
    fn token(&self, settings: &Settings, user: i64) -> Result<()> {
        let provider = JwtIdentityProvider::from_settings(&settings.auth);
        println!("{}", provider.issue_access_token(user)?);
        Ok(())
    }
}
