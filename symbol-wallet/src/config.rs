//! Wallet configuration

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Lowest PBKDF2 round count accepted from the environment
pub const MIN_KDF_ITERATIONS: u32 = 1_000;

/// Tunables for record building and account listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletConfig {
    /// PBKDF2-HMAC-SHA256 rounds used to stretch wallet passwords
    pub kdf_iterations: u32,
    /// Display name given to the wallet built at the default path
    pub seed_wallet_name: String,
    /// Number of accounts listed when the caller does not ask for a count
    pub default_account_count: usize,
    /// Shortest password accepted for private key encryption
    pub min_password_length: usize,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            kdf_iterations: 100_000,
            seed_wallet_name: "Seed Wallet 1".to_string(),
            default_account_count: 10,
            min_password_length: 8,
        }
    }
}

impl WalletConfig {
    /// Load configuration from `SYMBOL_WALLET_*` environment variables,
    /// falling back to defaults for anything unset
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("SYMBOL_WALLET_KDF_ITERATIONS") {
            config.kdf_iterations = parse_var("SYMBOL_WALLET_KDF_ITERATIONS", &raw)?;
        }
        if let Some(name) = lookup("SYMBOL_WALLET_SEED_WALLET_NAME") {
            config.seed_wallet_name = name;
        }
        if let Some(raw) = lookup("SYMBOL_WALLET_DEFAULT_COUNT") {
            config.default_account_count = parse_var("SYMBOL_WALLET_DEFAULT_COUNT", &raw)?;
        }
        if let Some(raw) = lookup("SYMBOL_WALLET_MIN_PASSWORD_LENGTH") {
            config.min_password_length = parse_var("SYMBOL_WALLET_MIN_PASSWORD_LENGTH", &raw)?;
        }

        config.validate()?;
        debug!(
            kdf_iterations = config.kdf_iterations,
            default_account_count = config.default_account_count,
            "Loaded wallet configuration"
        );
        Ok(config)
    }

    /// Check that the configured values are usable
    pub fn validate(&self) -> Result<()> {
        if self.kdf_iterations < MIN_KDF_ITERATIONS {
            return Err(Error::Config(format!(
                "kdf_iterations must be at least {}, got {}",
                MIN_KDF_ITERATIONS, self.kdf_iterations
            )));
        }
        if self.seed_wallet_name.trim().is_empty() {
            return Err(Error::Config("seed_wallet_name must not be empty".to_string()));
        }
        if self.min_password_length == 0 {
            warn!("Password length check disabled by configuration");
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| Error::Config(format!("{} has an invalid value: {}", key, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = WalletConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, WalletConfig::default());
        assert_eq!(config.seed_wallet_name, "Seed Wallet 1");
    }

    #[test]
    fn test_overrides() {
        let config = WalletConfig::from_lookup(lookup_from(&[
            ("SYMBOL_WALLET_KDF_ITERATIONS", "2000"),
            ("SYMBOL_WALLET_SEED_WALLET_NAME", "Main"),
            ("SYMBOL_WALLET_DEFAULT_COUNT", "5"),
        ]))
        .unwrap();

        assert_eq!(config.kdf_iterations, 2000);
        assert_eq!(config.seed_wallet_name, "Main");
        assert_eq!(config.default_account_count, 5);
        assert_eq!(config.min_password_length, 8);
    }

    #[test]
    fn test_rejects_bad_values() {
        let result = WalletConfig::from_lookup(lookup_from(&[("SYMBOL_WALLET_DEFAULT_COUNT", "many")]));
        assert!(matches!(result, Err(Error::Config(_))));

        let result = WalletConfig::from_lookup(lookup_from(&[("SYMBOL_WALLET_KDF_ITERATIONS", "10")]));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
