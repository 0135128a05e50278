//! Administrative command handlers.
//!
//! CLI counterparts of the admin HTTP routes. They talk to the configured
//! store directly, without going through the server.

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::routes::helpers::validate_target_url;
use crate::server::{open_store, Store};
use clap::Subcommand;
use tracing::info;

/// Administrative commands available via CLI.
#[derive(Subcommand, Debug)]
pub enum AdminCommands {
    /// Shorten a URL and print its code
    Shorten { url: String },

    /// Print the URL behind a code
    Get { code: String },

    /// List every code -> URL mapping
    List,

    /// Point an existing code at a new URL
    Update { code: String, url: String },

    /// Delete a code
    Delete { code: String },

    /// Ping the store
    Ping,
}

/// Run an administrative command with the given configuration.
pub async fn run(config: Config, admin_command: AdminCommands) -> AppResult<()> {
    let store = open_store(&config)?;
    let strict = config.url.strict_url_validation;

    match admin_command {
        AdminCommands::Shorten { url } => shorten(&store, &url, strict).await,
        AdminCommands::Get { code } => get(&store, &code).await,
        AdminCommands::List => list(&store).await,
        AdminCommands::Update { code, url } => update(&store, &code, &url, strict).await,
        AdminCommands::Delete { code } => delete(&store, &code).await,
        AdminCommands::Ping => ping(&store).await,
    }
}

/// Same acceptance rules as the HTTP routes.
fn check_url(url: &str, strict: bool) -> AppResult<()> {
    if url.is_empty() {
        return Err(AppError::MissingUrl("URL is required"));
    }
    validate_target_url(url, strict)
}

async fn shorten(store: &Store, url: &str, strict: bool) -> AppResult<()> {
    check_url(url, strict)?;
    let code = store.links.create(url).await?;
    println!("{}", code);
    Ok(())
}

async fn get(store: &Store, code: &str) -> AppResult<()> {
    let url = store.links.read(code).await?;
    println!("{}", url);
    Ok(())
}

async fn list(store: &Store) -> AppResult<()> {
    let urls = store.links.list().await?;

    let mut entries: Vec<_> = urls.into_iter().collect();
    entries.sort();

    println!("\n=== redlink short links ({}) ===", entries.len());
    for (code, url) in entries {
        println!("{}  ->  {}", code, url);
    }
    println!();

    Ok(())
}

async fn update(store: &Store, code: &str, url: &str, strict: bool) -> AppResult<()> {
    check_url(url, strict)?;
    store.links.update(code, url).await?;
    info!(code, "Short link updated");
    Ok(())
}

async fn delete(store: &Store, code: &str) -> AppResult<()> {
    store.links.delete(code).await?;
    info!(code, "Short link deleted");
    Ok(())
}

async fn ping(store: &Store) -> AppResult<()> {
    info!("Pinging store...");
    let response = store.backend.ping().await?;
    info!("Store responded: {}", response);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_store() -> Store {
        let config = Config::from_vars(|key| match key {
            "STORE_BACKEND" => Some("memory".to_string()),
            "BASIC_AUTH_USERNAME" => Some("admin".to_string()),
            "BASIC_AUTH_PASSWORD" => Some("secret".to_string()),
            _ => None,
        })
        .unwrap();
        open_store(&config).unwrap()
    }

    #[tokio::test]
    async fn test_shorten_rejects_non_http_url_in_strict_mode() {
        let store = memory_store();

        let result = shorten(&store, "javascript:alert(1)", true).await;

        assert!(matches!(result, Err(AppError::InvalidUrl(_))));
        assert!(store.links.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_shorten_rejects_empty_url() {
        let store = memory_store();

        assert!(matches!(
            shorten(&store, "", false).await,
            Err(AppError::MissingUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_update_applies_same_rules() {
        let store = memory_store();
        let code = store.links.create("https://example.com").await.unwrap();

        assert!(matches!(
            update(&store, &code, "ftp://example.com", true).await,
            Err(AppError::InvalidUrl(_))
        ));
        assert_eq!(store.links.read(&code).await.unwrap(), "https://example.com");

        update(&store, &code, "ftp://example.com", false).await.unwrap();
        assert_eq!(store.links.read(&code).await.unwrap(), "ftp://example.com");
    }
}
