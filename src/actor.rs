//! Author identity for new items.
//!
//! Resolution order for the default `created_by`:
//! 1) CLI --by (explicit)
//! 2) GROCERIES_AUTHOR environment variable
//! 3) Config default (author.default)
//! 4) None; the form then requires the user to type one

use crate::config::Config;

/// Environment variable consulted when no author is passed explicitly
pub const AUTHOR_ENV: &str = "GROCERIES_AUTHOR";

/// Resolve the author using CLI, environment, and config.
pub fn resolve_author(config: &Config, cli_author: Option<&str>) -> Option<String> {
    let env_author = std::env::var(AUTHOR_ENV).ok();
    resolve_from(config, cli_author, env_author.as_deref())
}

fn resolve_from(
    config: &Config,
    cli_author: Option<&str>,
    env_author: Option<&str>,
) -> Option<String> {
    non_empty(cli_author)
        .or_else(|| non_empty(env_author))
        .or_else(|| non_empty(config.author.default.as_deref()))
        .map(|author| author.to_string())
}

fn non_empty(input: Option<&str>) -> Option<&str> {
    input.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    })
}
