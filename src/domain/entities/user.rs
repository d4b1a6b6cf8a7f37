//! Farcaster user profile.

use serde::{Deserialize, Serialize};

/// A Farcaster profile as returned by the social API bulk endpoint.
///
/// Only the fields the mini-app uses are modelled; anything else in the
/// upstream payload is ignored. Missing optional fields decode to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarcasterUser {
    pub fid: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pfp_url: Option<String>,
    #[serde(default)]
    pub verified_addresses: VerifiedAddresses,
}

/// Wallet addresses the user has verified on Farcaster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerifiedAddresses {
    #[serde(default)]
    pub eth_addresses: Vec<String>,
}

impl FarcasterUser {
    /// Creates a profile with only the identifying fields set.
    pub fn new(fid: i64, username: impl Into<String>) -> Self {
        Self {
            fid,
            username: username.into(),
            display_name: None,
            pfp_url: None,
            verified_addresses: VerifiedAddresses::default(),
        }
    }

    /// Adds a verified Ethereum address.
    pub fn with_eth_address(mut self, address: impl Into<String>) -> Self {
        self.verified_addresses.eth_addresses.push(address.into());
        self
    }

    pub fn eth_addresses(&self) -> &[String] {
        &self.verified_addresses.eth_addresses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_upstream_profile() {
        let json = r#"{
            "fid": 3,
            "username": "dwr",
            "display_name": "Dan",
            "pfp_url": "https://i.imgur.com/x.png",
            "follower_count": 1000,
            "verified_addresses": { "eth_addresses": ["0xabc"], "sol_addresses": [] }
        }"#;

        let user: FarcasterUser = serde_json::from_str(json).unwrap();

        assert_eq!(user.fid, 3);
        assert_eq!(user.username, "dwr");
        assert_eq!(user.display_name.as_deref(), Some("Dan"));
        assert_eq!(user.eth_addresses(), ["0xabc".to_string()]);
    }

    #[test]
    fn test_decode_minimal_profile() {
        let user: FarcasterUser = serde_json::from_str(r#"{ "fid": 9 }"#).unwrap();

        assert_eq!(user.fid, 9);
        assert!(user.username.is_empty());
        assert!(user.eth_addresses().is_empty());
    }

    #[test]
    fn test_builder() {
        let user = FarcasterUser::new(1, "alice")
            .with_eth_address("0x1")
            .with_eth_address("0x2");

        assert_eq!(user.eth_addresses().len(), 2);
        assert_eq!(user.eth_addresses()[1], "0x2");
    }
}
