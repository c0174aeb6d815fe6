use mongodb::options::{ClientOptions, Credential, ResolverConfig};
use mongodb::{Client, Database};

use crate::config::mongo_conf::MongoConfig;

/// Builds the shared database handle every repository hangs off.
///
/// Repositories take a `&Database` instead of parsing the URI themselves,
/// so the connection pool is set up exactly once at startup.
pub async fn connect(config: &MongoConfig) -> Result<Database, mongodb::error::Error> {
    let mut client_options =
        ClientOptions::parse_with_resolver_config(&config.uri, ResolverConfig::cloudflare())
            .await?;
    client_options.app_name = Some("CloudKitchenBackend".to_string());
    client_options.max_pool_size = Some(config.pool_size);
    client_options.connect_timeout =
        Some(std::time::Duration::from_secs(config.connection_timeout_secs));

    if let (Some(ref username), Some(ref password)) = (&config.username, &config.password) {
        client_options.credential = Some(
            Credential::builder()
                .username(username.clone())
                .password(password.clone())
                .build(),
        );
    }

    let client = Client::with_options(client_options)?;
    Ok(client.database(&config.database))
}

/// Escapes a user-supplied search string before it lands in a `$regex` filter.
pub fn regex_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if !c.is_alphanumeric() && c != ' ' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_escape_neutralizes_metacharacters() {
        assert_eq!(regex_escape("ali"), "ali");
        assert_eq!(regex_escape("a.b"), "a\\.b");
        assert_eq!(regex_escape("x*"), "x\\*");
        assert_eq!(regex_escape("jo hn"), "jo hn");
    }
}
