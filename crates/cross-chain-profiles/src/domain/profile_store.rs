//! # Profile Store
//!
//! One profile per owner address. Profiles are immutable once stored.
//!
//! Registration is split into `prepare` (validate, derive id, no writes) and
//! `commit` so callers can run fallible work between the two and keep the
//! store untouched on failure.

use super::entities::{NewProfile, Profile};
use super::errors::RegistryError;
use super::value_objects::{Address, ProfileId};
use crate::algorithms::identity::{derive_id, profile_seed};
use std::collections::HashMap;

/// Per-owner profile records.
#[derive(Clone, Debug, Default)]
pub struct ProfileStore {
    /// Owner -> profile id.
    by_owner: HashMap<Address, ProfileId>,
    /// Profile id -> profile.
    profiles: HashMap<ProfileId, Profile>,
    /// Monotonic registration counter, mixed into id seeds.
    nonce: u64,
}

impl ProfileStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a registration and build the profile it would create.
    pub fn prepare(&self, owner: &Address, fields: NewProfile) -> Result<Profile, RegistryError> {
        if self.by_owner.contains_key(owner) {
            return Err(RegistryError::DuplicateProfile(*owner));
        }
        let id = derive_id(&profile_seed(owner, self.nonce + 1))?;
        if self.profiles.contains_key(&id) {
            return Err(RegistryError::DuplicateProfile(*owner));
        }
        Ok(fields.with_id(id))
    }

    /// Store a profile produced by [`ProfileStore::prepare`].
    pub fn commit(&mut self, owner: Address, profile: Profile) -> ProfileId {
        let id = profile.id;
        self.nonce += 1;
        self.by_owner.insert(owner, id);
        self.profiles.insert(id, profile);
        id
    }

    /// Register a profile for `owner`.
    pub fn add_profile(
        &mut self,
        owner: Address,
        fields: NewProfile,
    ) -> Result<ProfileId, RegistryError> {
        let profile = self.prepare(&owner, fields)?;
        Ok(self.commit(owner, profile))
    }

    /// Profile id registered by `owner`.
    pub fn get_profile_by_owner(&self, owner: &Address) -> Result<ProfileId, RegistryError> {
        self.by_owner
            .get(owner)
            .copied()
            .ok_or_else(|| RegistryError::ProfileNotFound(format!("owner {owner}")))
    }

    /// Profile by id.
    pub fn get_profile(&self, id: &ProfileId) -> Result<&Profile, RegistryError> {
        self.profiles
            .get(id)
            .ok_or_else(|| RegistryError::ProfileNotFound(format!("id {id}")))
    }

    /// Number of registered profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// True when no profile is registered.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
