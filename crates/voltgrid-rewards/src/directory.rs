use std::collections::BTreeSet;

use voltgrid_core::types::Principal;
use voltgrid_stations::StationRegistry;

/// Membership predicate the distributor consults before accepting a
/// session: once for the submitting user against the user registry, once
/// for the station against the station registry.
pub trait MemberDirectory {
    fn is_registered(&self, principal: &Principal) -> bool;
}

/// The station registry doubles as the station-side directory.
impl MemberDirectory for StationRegistry {
    fn is_registered(&self, principal: &Principal) -> bool {
        StationRegistry::is_registered(self, principal)
    }
}

/// A set-backed directory standing in for the external user registry.
#[derive(Debug, Default, Clone)]
pub struct StaticDirectory {
    members: BTreeSet<Principal>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, principal: Principal) {
        self.members.insert(principal);
    }
}

impl FromIterator<Principal> for StaticDirectory {
    fn from_iter<I: IntoIterator<Item = Principal>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}

impl MemberDirectory for StaticDirectory {
    fn is_registered(&self, principal: &Principal) -> bool {
        self.members.contains(principal)
    }
}
