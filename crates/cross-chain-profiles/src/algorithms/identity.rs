//! # Profile Identifiers
//!
//! Seed construction and seed-to-identifier derivation.

use crate::domain::{Address, ProfileId, RegistryError, MAX_SEED_LEN};

/// Owner bytes mixed into a registration seed.
const OWNER_PREFIX_LEN: usize = 5;

/// Derive a 32-byte identifier from a seed string.
///
/// The UTF-8 bytes of `seed` are right-padded with zeros. Seeds longer than
/// 32 bytes are rejected rather than truncated, so two seeds can never map
/// to the same identifier.
pub fn derive_id(seed: &str) -> Result<ProfileId, RegistryError> {
    let bytes = seed.as_bytes();
    if bytes.len() > MAX_SEED_LEN {
        return Err(RegistryError::SeedTooLong {
            len: bytes.len(),
            max: MAX_SEED_LEN,
        });
    }
    let mut id = [0u8; 32];
    id[..bytes.len()].copy_from_slice(bytes);
    Ok(ProfileId(id))
}

/// Build the registration seed for `owner` at registration number `nonce`.
///
/// Uniqueness comes from the nonce; the owner prefix only aids debugging.
/// At most 10 hex chars + `:` + 20 digits, always within 32 bytes.
pub fn profile_seed(owner: &Address, nonce: u64) -> String {
    format!("{}:{nonce}", hex::encode(&owner.0[..OWNER_PREFIX_LEN]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_id_pads_with_zeros() {
        let id = derive_id("abc").unwrap();
        assert_eq!(&id.0[..3], b"abc");
        assert!(id.0[3..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_derive_id_exactly_32_bytes() {
        let seed = "a".repeat(32);
        let id = derive_id(&seed).unwrap();
        assert_eq!(id.0, [b'a'; 32]);
    }

    #[test]
    fn test_derive_id_oversized_seed_fails() {
        let seed = "a".repeat(33);
        assert_eq!(
            derive_id(&seed),
            Err(RegistryError::SeedTooLong { len: 33, max: 32 })
        );
    }

    #[test]
    fn test_derive_id_counts_utf8_bytes() {
        // 17 chars, 34 bytes
        let seed = "é".repeat(17);
        assert!(derive_id(&seed).is_err());
    }

    #[test]
    fn test_derive_id_deterministic() {
        assert_eq!(derive_id("seed").unwrap(), derive_id("seed").unwrap());
        assert_ne!(derive_id("seed-1").unwrap(), derive_id("seed-2").unwrap());
    }

    #[test]
    fn test_profile_seed_fits_for_max_nonce() {
        let seed = profile_seed(&Address::new([0xFFu8; 20]), u64::MAX);
        assert!(seed.len() <= MAX_SEED_LEN);
        assert!(derive_id(&seed).is_ok());
    }

    #[test]
    fn test_profile_seed_varies_with_nonce() {
        let owner = Address::new([1u8; 20]);
        assert_ne!(profile_seed(&owner, 1), profile_seed(&owner, 2));
    }
}
