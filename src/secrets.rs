//! Server-side secret resolution for provider credentials and webhook secrets.
//!
//! Provider API tokens and webhook shared secrets live outside the database,
//! resolved by well-known name at request time. The default store reads from
//! process environment variables; tests substitute a static store.

use std::collections::BTreeMap;

/// Read-only store of named secrets.
pub trait SecretStore: Send + Sync {
    /// Look up a secret by its well-known name.
    fn get(&self, name: &str) -> Option<String>;
}

/// Secret store backed by process environment variables.
#[derive(Debug, Default)]
pub struct EnvSecretStore;

impl SecretStore for EnvSecretStore {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|v| !v.is_empty())
    }
}

/// In-memory secret store for tests.
#[derive(Debug, Default)]
pub struct StaticSecretStore {
    values: BTreeMap<String, String>,
}

impl StaticSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.values.insert(name.to_string(), value.to_string());
        self
    }
}

impl SecretStore for StaticSecretStore {
    fn get(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

/// Well-known name of the provider API token for a tenant slug.
///
/// The slug is uppercased and non-alphanumeric characters become
/// underscores, e.g. `acme-co` resolves `ACESSORIAS_TOKEN_ACME_CO`.
pub fn provider_token_name(tenant_slug: &str) -> String {
    let normalized: String = tenant_slug
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("ACESSORIAS_TOKEN_{}", normalized)
}

/// Well-known name of the webhook shared secret for a known source.
///
/// Returns `None` for sources the service does not accept.
pub fn webhook_secret_name(source: &str) -> Option<&'static str> {
    match source {
        "contmax" => Some("ONECODE_WEBHOOK_SECRET"),
        "pg" => Some("ONECODE_WEBHOOK_SECRET_PG"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_token_name_normalizes_slug() {
        assert_eq!(provider_token_name("acme"), "ACESSORIAS_TOKEN_ACME");
        assert_eq!(provider_token_name("acme-co"), "ACESSORIAS_TOKEN_ACME_CO");
        assert_eq!(provider_token_name("a.b"), "ACESSORIAS_TOKEN_A_B");
    }

    #[test]
    fn webhook_secret_name_known_sources() {
        assert_eq!(webhook_secret_name("contmax"), Some("ONECODE_WEBHOOK_SECRET"));
        assert_eq!(webhook_secret_name("pg"), Some("ONECODE_WEBHOOK_SECRET_PG"));
        assert_eq!(webhook_secret_name("unknown"), None);
    }

    #[test]
    fn static_store_round_trip() {
        let store = StaticSecretStore::new().with("ONECODE_WEBHOOK_SECRET", "s3cret");
        assert_eq!(
            store.get("ONECODE_WEBHOOK_SECRET"),
            Some("s3cret".to_string())
        );
        assert_eq!(store.get("MISSING"), None);
    }
}
