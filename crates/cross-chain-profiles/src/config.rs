//! # Registry Configuration
//!
//! Deployment parameters consumed once at construction.

use crate::domain::{known, Address, RegistryError};
use serde::{Deserialize, Serialize};
use std::env;

/// Default gas limit for the destination receive callback.
pub const DEFAULT_GAS_LIMIT: u64 = 200_000;

/// Registry configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Owner identity (the deployer).
    pub owner: Address,

    /// The registry's own address, reported to the router as sender.
    pub contract_address: Address,

    /// Initial router address.
    pub router: Address,

    /// Token fees are paid in (`Address::ZERO` for native).
    #[serde(default)]
    pub fee_token: Address,

    /// Gas limit requested for the destination callback.
    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,

    /// Decode inbound payloads as profiles; undecodable payloads are rejected.
    #[serde(default = "default_true")]
    pub expect_profile_payload: bool,
}

fn default_gas_limit() -> u64 {
    DEFAULT_GAS_LIMIT
}

fn default_true() -> bool {
    true
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            owner: Address::ZERO,
            contract_address: Address::ZERO,
            router: known::SEPOLIA_ROUTER,
            fee_token: Address::ZERO,
            gas_limit: DEFAULT_GAS_LIMIT,
            expect_profile_payload: true,
        }
    }
}

impl RegistryConfig {
    /// Create a config for testing with fixed, non-zero identities.
    pub fn for_testing() -> Self {
        Self {
            owner: Address::new([0x0Au8; 20]),
            contract_address: Address::new([0xC0u8; 20]),
            ..Self::default()
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `PROFILES_OWNER`: owner address (required)
    /// - `PROFILES_CONTRACT`: registry address (required)
    /// - `PROFILES_ROUTER`: router address (default: Sepolia router)
    /// - `PROFILES_FEE_TOKEN`: fee token address (default: native)
    /// - `PROFILES_GAS_LIMIT`: destination gas limit (default: 200000)
    /// - `PROFILES_EXPECT_PROFILE`: decode inbound payloads (default: true)
    pub fn from_env() -> Result<Self, RegistryError> {
        let defaults = Self::default();
        Ok(Self {
            owner: required_address("PROFILES_OWNER")?,
            contract_address: required_address("PROFILES_CONTRACT")?,
            router: optional_address("PROFILES_ROUTER")?.unwrap_or(defaults.router),
            fee_token: optional_address("PROFILES_FEE_TOKEN")?.unwrap_or(defaults.fee_token),
            gas_limit: match env::var("PROFILES_GAS_LIMIT") {
                Ok(v) => v.parse().map_err(|e| {
                    RegistryError::Config(format!("PROFILES_GAS_LIMIT={v}: {e}"))
                })?,
                Err(_) => defaults.gas_limit,
            },
            expect_profile_payload: env::var("PROFILES_EXPECT_PROFILE")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(defaults.expect_profile_payload),
        })
    }

    /// Parse configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        serde_json::from_str(json).map_err(|e| RegistryError::Config(e.to_string()))
    }
}

fn optional_address(var: &str) -> Result<Option<Address>, RegistryError> {
    match env::var(var) {
        Ok(v) => v
            .parse()
            .map(Some)
            .map_err(|e| RegistryError::Config(format!("{var}: {e}"))),
        Err(_) => Ok(None),
    }
}

fn required_address(var: &str) -> Result<Address, RegistryError> {
    optional_address(var)?.ok_or_else(|| RegistryError::Config(format!("{var} is not set")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::default();
        assert_eq!(config.router, known::SEPOLIA_ROUTER);
        assert_eq!(config.gas_limit, DEFAULT_GAS_LIMIT);
        assert!(config.expect_profile_payload);
    }

    #[test]
    fn test_testing_config() {
        let config = RegistryConfig::for_testing();
        assert!(!config.owner.is_zero());
        assert!(!config.contract_address.is_zero());
    }

    #[test]
    fn test_from_json_with_defaults() {
        let config = RegistryConfig::from_json(
            r#"{
                "owner": "0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
                "contract_address": "0x5FbDB2315678afecb367f032d93F642f64180aa3",
                "router": "0xcc5a0B910D9E9504A7561934bed294c51285a78D"
            }"#,
        )
        .unwrap();
        assert_eq!(config.router, known::OPTIMISM_GOERLI_ROUTER);
        assert_eq!(config.fee_token, Address::ZERO);
        assert_eq!(config.gas_limit, DEFAULT_GAS_LIMIT);
        assert!(config.expect_profile_payload);
    }

    /// Serializes tests that touch process environment variables.
    static ENV_LOCK: parking_lot::Mutex<()> = parking_lot::Mutex::new(());

    const ENV_VARS: [&str; 6] = [
        "PROFILES_OWNER",
        "PROFILES_CONTRACT",
        "PROFILES_ROUTER",
        "PROFILES_FEE_TOKEN",
        "PROFILES_GAS_LIMIT",
        "PROFILES_EXPECT_PROFILE",
    ];

    fn with_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
        let _guard = ENV_LOCK.lock();
        for var in ENV_VARS {
            env::remove_var(var);
        }
        for (key, value) in vars {
            env::set_var(key, value);
        }
        let result = f();
        for var in ENV_VARS {
            env::remove_var(var);
        }
        result
    }

    const OWNER: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
    const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

    #[test]
    fn test_from_env_defaults() {
        let config = with_env(
            &[("PROFILES_OWNER", OWNER), ("PROFILES_CONTRACT", CONTRACT)],
            RegistryConfig::from_env,
        )
        .unwrap();

        assert_eq!(config.owner, OWNER.parse::<Address>().unwrap());
        assert_eq!(config.contract_address, CONTRACT.parse::<Address>().unwrap());
        assert_eq!(config.router, known::SEPOLIA_ROUTER);
        assert_eq!(config.fee_token, Address::ZERO);
        assert_eq!(config.gas_limit, DEFAULT_GAS_LIMIT);
        assert!(config.expect_profile_payload);
    }

    #[test]
    fn test_from_env_overrides() {
        let config = with_env(
            &[
                ("PROFILES_OWNER", OWNER),
                ("PROFILES_CONTRACT", CONTRACT),
                ("PROFILES_ROUTER", "0xcc5a0B910D9E9504A7561934bed294c51285a78D"),
                ("PROFILES_GAS_LIMIT", "350000"),
                ("PROFILES_EXPECT_PROFILE", "1"),
            ],
            RegistryConfig::from_env,
        )
        .unwrap();

        assert_eq!(config.router, known::OPTIMISM_GOERLI_ROUTER);
        assert_eq!(config.gas_limit, 350_000);
        assert!(config.expect_profile_payload);
    }

    #[test]
    fn test_from_env_expect_profile_disabled() {
        for value in ["false", "FALSE", "0"] {
            let config = with_env(
                &[
                    ("PROFILES_OWNER", OWNER),
                    ("PROFILES_CONTRACT", CONTRACT),
                    ("PROFILES_EXPECT_PROFILE", value),
                ],
                RegistryConfig::from_env,
            )
            .unwrap();
            assert!(!config.expect_profile_payload, "value {value}");
        }
    }

    #[test]
    fn test_from_env_missing_owner() {
        let result = with_env(&[("PROFILES_CONTRACT", CONTRACT)], RegistryConfig::from_env);
        assert_eq!(
            result,
            Err(RegistryError::Config("PROFILES_OWNER is not set".to_string()))
        );
    }

    #[test]
    fn test_from_env_missing_contract() {
        let result = with_env(&[("PROFILES_OWNER", OWNER)], RegistryConfig::from_env);
        assert!(matches!(
            result,
            Err(RegistryError::Config(msg)) if msg.contains("PROFILES_CONTRACT")
        ));
    }

    #[test]
    fn test_from_env_bad_gas_limit() {
        let result = with_env(
            &[
                ("PROFILES_OWNER", OWNER),
                ("PROFILES_CONTRACT", CONTRACT),
                ("PROFILES_GAS_LIMIT", "abc"),
            ],
            RegistryConfig::from_env,
        );
        assert!(matches!(
            result,
            Err(RegistryError::Config(msg)) if msg.starts_with("PROFILES_GAS_LIMIT=abc")
        ));
    }

    #[test]
    fn test_from_env_bad_router() {
        let result = with_env(
            &[
                ("PROFILES_OWNER", OWNER),
                ("PROFILES_CONTRACT", CONTRACT),
                ("PROFILES_ROUTER", "0x1234"),
            ],
            RegistryConfig::from_env,
        );
        assert!(matches!(
            result,
            Err(RegistryError::Config(msg)) if msg.starts_with("PROFILES_ROUTER")
        ));
    }

    #[test]
    fn test_from_json_bad_address() {
        let result = RegistryConfig::from_json(
            r#"{"owner": "0x1234", "contract_address": "0x00", "router": "0x00"}"#,
        );
        assert!(matches!(result, Err(RegistryError::Config(_))));
    }
}
