use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use voltgrid_core::constants::{
    DEFAULT_REGISTRATION_FEE, MAX_LOCATION_LEN, MAX_POWER_KW, MAX_STATION_NAME_LEN, MIN_POWER_KW,
};
use voltgrid_core::error::StationError;
use voltgrid_core::types::{Balance, BlockHeight, Principal, StationId};

use crate::settlement::SettlementRail;

// ── Station ───────────────────────────────────────────────────────────────────

/// A registered charging station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub name: String,
    pub owner: Principal,
    pub location: String,
    /// Rated output in kW, 1..=1000.
    pub power_kw: u64,
    /// Posted price per kWh in native settlement units, always positive.
    pub price_per_kwh: Balance,
    /// Active flag; flipped by `toggle_status`.
    pub status: bool,
    /// Block height the registering call ran at.
    pub registered_at: BlockHeight,
}

// ── StationRegistry ───────────────────────────────────────────────────────────

/// The charging station registry.
///
/// Invariant: at any time at most one station id maps to a given owner and
/// at most one to a given location. The two indexes are mutated only
/// together with the station record they point at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationRegistry {
    admin: Principal,
    registration_fee: Balance,
    total_stations: u64,
    stations: BTreeMap<StationId, Station>,
    by_owner: BTreeMap<Principal, StationId>,
    by_location: BTreeMap<String, StationId>,
}

impl StationRegistry {
    pub fn new(admin: Principal) -> Self {
        Self {
            admin,
            registration_fee: DEFAULT_REGISTRATION_FEE,
            total_stations: 0,
            stations: BTreeMap::new(),
            by_owner: BTreeMap::new(),
            by_location: BTreeMap::new(),
        }
    }

    // ── Registration ──────────────────────────────────────────────────────────

    /// Register a station for the caller, collecting the registration fee to
    /// the admin over `rail`. Returns the allocated station id.
    ///
    /// TODO: ids are allocated from the station counter, so deregistering a
    /// station and registering a new one can reissue a live id.
    pub fn register_station(
        &mut self,
        caller: &Principal,
        height: BlockHeight,
        name: &str,
        location: &str,
        power_kw: u64,
        price_per_kwh: Balance,
        rail: &mut dyn SettlementRail,
    ) -> Result<StationId, StationError> {
        if self.by_owner.contains_key(caller) {
            return Err(StationError::AlreadyRegistered);
        }
        if name.is_empty() || name.len() > MAX_STATION_NAME_LEN {
            return Err(StationError::InvalidName {
                max: MAX_STATION_NAME_LEN,
            });
        }
        if location.is_empty() || location.len() > MAX_LOCATION_LEN {
            return Err(StationError::InvalidLocation {
                max: MAX_LOCATION_LEN,
            });
        }
        if !(MIN_POWER_KW..=MAX_POWER_KW).contains(&power_kw) {
            return Err(StationError::InvalidPower {
                min: MIN_POWER_KW,
                max: MAX_POWER_KW,
            });
        }
        if price_per_kwh == 0 {
            return Err(StationError::InvalidPrice);
        }
        if self.by_location.contains_key(location) {
            return Err(StationError::AlreadyRegistered);
        }

        rail.collect(self.registration_fee, caller, &self.admin);

        let id = self.total_stations;
        self.stations.insert(
            id,
            Station {
                name: name.to_string(),
                owner: caller.clone(),
                location: location.to_string(),
                power_kw,
                price_per_kwh,
                status: true,
                registered_at: height,
            },
        );
        self.by_owner.insert(caller.clone(), id);
        self.by_location.insert(location.to_string(), id);
        self.total_stations += 1;
        info!(id, owner = %caller, location, power_kw, "registered station");
        Ok(id)
    }

    /// Owner-only update of a station's posted fields. Name, power, and
    /// price are re-validated; a changed location must not already be taken,
    /// and the location index entry is swapped together with the field.
    pub fn update_station(
        &mut self,
        caller: &Principal,
        id: StationId,
        name: &str,
        location: &str,
        power_kw: u64,
        price_per_kwh: Balance,
    ) -> Result<(), StationError> {
        let old_location = {
            let station = self.stations.get(&id).ok_or(StationError::NotRegistered(id))?;
            if station.owner != *caller {
                return Err(StationError::NotStationOwner);
            }
            station.location.clone()
        };
        if name.is_empty() || name.len() > MAX_STATION_NAME_LEN {
            return Err(StationError::InvalidName {
                max: MAX_STATION_NAME_LEN,
            });
        }
        if !(MIN_POWER_KW..=MAX_POWER_KW).contains(&power_kw) {
            return Err(StationError::InvalidPower {
                min: MIN_POWER_KW,
                max: MAX_POWER_KW,
            });
        }
        if price_per_kwh == 0 {
            return Err(StationError::InvalidPrice);
        }
        if old_location != location {
            if self.by_location.contains_key(location) {
                return Err(StationError::AlreadyRegistered);
            }
            self.by_location.remove(&old_location);
            self.by_location.insert(location.to_string(), id);
        }

        let station = self
            .stations
            .get_mut(&id)
            .ok_or(StationError::NotRegistered(id))?;
        station.name = name.to_string();
        station.location = location.to_string();
        station.power_kw = power_kw;
        station.price_per_kwh = price_per_kwh;
        Ok(())
    }

    /// Owner-only flip of the active flag.
    pub fn toggle_status(&mut self, caller: &Principal, id: StationId) -> Result<(), StationError> {
        let station = self
            .stations
            .get_mut(&id)
            .ok_or(StationError::NotRegistered(id))?;
        if station.owner != *caller {
            return Err(StationError::NotStationOwner);
        }
        station.status = !station.status;
        Ok(())
    }

    /// Hand a station to `new_owner`, moving the owner index entry with it.
    /// The new owner's entry is installed unconditionally: an owner who
    /// already has a station keeps both until one is deregistered.
    pub fn transfer_ownership(
        &mut self,
        caller: &Principal,
        id: StationId,
        new_owner: Principal,
    ) -> Result<(), StationError> {
        let station = self
            .stations
            .get_mut(&id)
            .ok_or(StationError::NotRegistered(id))?;
        if station.owner != *caller {
            return Err(StationError::NotStationOwner);
        }
        self.by_owner.remove(&station.owner);
        self.by_owner.insert(new_owner.clone(), id);
        station.owner = new_owner;
        info!(id, new_owner = %station.owner, "transferred station ownership");
        Ok(())
    }

    /// Remove a station and both index entries as one unit. The caller must
    /// be the station's owner or the registry admin.
    pub fn deregister_station(
        &mut self,
        caller: &Principal,
        id: StationId,
    ) -> Result<(), StationError> {
        let station = self.stations.get(&id).ok_or(StationError::NotRegistered(id))?;
        if station.owner != *caller && *caller != self.admin {
            return Err(StationError::Unauthorized);
        }
        let owner = station.owner.clone();
        let location = station.location.clone();
        self.stations.remove(&id);
        self.by_owner.remove(&owner);
        self.by_location.remove(&location);
        self.total_stations -= 1;
        info!(id, owner = %owner, "deregistered station");
        Ok(())
    }

    // ── Administration ────────────────────────────────────────────────────────

    pub fn set_admin(&mut self, caller: &Principal, new_admin: Principal) -> Result<(), StationError> {
        if *caller != self.admin {
            return Err(StationError::Unauthorized);
        }
        self.admin = new_admin;
        Ok(())
    }

    pub fn set_registration_fee(
        &mut self,
        caller: &Principal,
        fee: Balance,
    ) -> Result<(), StationError> {
        if *caller != self.admin {
            return Err(StationError::Unauthorized);
        }
        if fee == 0 {
            return Err(StationError::InvalidFee);
        }
        self.registration_fee = fee;
        Ok(())
    }

    // ── Reads ─────────────────────────────────────────────────────────────────

    pub fn get_station(&self, id: StationId) -> Option<&Station> {
        self.stations.get(&id)
    }

    /// Whether `principal` currently owns a station.
    pub fn is_registered(&self, principal: &Principal) -> bool {
        self.by_owner.contains_key(principal)
    }

    pub fn total_stations(&self) -> u64 {
        self.total_stations
    }

    pub fn registration_fee(&self) -> Balance {
        self.registration_fee
    }

    pub fn admin(&self) -> &Principal {
        &self.admin
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settlement::FeeLog;

    const HEIGHT: BlockHeight = 1000;

    fn p(id: &str) -> Principal {
        Principal::new(id)
    }

    fn seed_registry() -> (StationRegistry, FeeLog) {
        (StationRegistry::new(p("ST1ADMIN")), FeeLog::default())
    }

    fn register(
        registry: &mut StationRegistry,
        rail: &mut FeeLog,
        owner: &str,
        name: &str,
        location: &str,
    ) -> Result<StationId, StationError> {
        registry.register_station(&p(owner), HEIGHT, name, location, 100, 4_000, rail)
    }

    // ── Registration ──────────────────────────────────────────────────────────

    #[test]
    fn register_allocates_sequential_ids() {
        let (mut registry, mut rail) = seed_registry();
        let a = register(&mut registry, &mut rail, "ST1OWNER", "Fast", "CityCenter").unwrap();
        let b = register(&mut registry, &mut rail, "ST2OWNER", "Slow", "Suburb").unwrap();
        assert_eq!((a, b), (0, 1));
        assert_eq!(registry.total_stations(), 2);

        let station = registry.get_station(0).unwrap();
        assert_eq!(station.owner, p("ST1OWNER"));
        assert_eq!(station.registered_at, HEIGHT);
        assert!(station.status);
    }

    #[test]
    fn register_collects_the_fee_to_admin() {
        let (mut registry, mut rail) = seed_registry();
        register(&mut registry, &mut rail, "ST1OWNER", "Fast", "CityCenter").unwrap();
        assert_eq!(rail.transfers.len(), 1);
        let fee = &rail.transfers[0];
        assert_eq!(fee.amount, DEFAULT_REGISTRATION_FEE);
        assert_eq!(fee.from, p("ST1OWNER"));
        assert_eq!(fee.to, p("ST1ADMIN"));
    }

    #[test]
    fn register_reflects_updated_fee() {
        let (mut registry, mut rail) = seed_registry();
        registry.set_registration_fee(&p("ST1ADMIN"), 42).unwrap();
        register(&mut registry, &mut rail, "ST1OWNER", "Fast", "CityCenter").unwrap();
        assert_eq!(rail.transfers[0].amount, 42);
    }

    #[test]
    fn second_station_per_owner_rejected() {
        let (mut registry, mut rail) = seed_registry();
        register(&mut registry, &mut rail, "ST1OWNER", "A", "Loc1").unwrap();
        let err = register(&mut registry, &mut rail, "ST1OWNER", "B", "Loc2").unwrap_err();
        assert_eq!(err, StationError::AlreadyRegistered);
        // The failed call charged no fee.
        assert_eq!(rail.transfers.len(), 1);
    }

    #[test]
    fn duplicate_location_rejected_across_owners() {
        let (mut registry, mut rail) = seed_registry();
        register(&mut registry, &mut rail, "ST1OWNER", "A", "SameLoc").unwrap();
        let err = register(&mut registry, &mut rail, "ST2OWNER", "B", "SameLoc").unwrap_err();
        assert_eq!(err, StationError::AlreadyRegistered);
        assert_eq!(registry.total_stations(), 1);
    }

    #[test]
    fn register_validates_bounds() {
        let (mut registry, mut rail) = seed_registry();
        let owner = p("ST1OWNER");

        let err = registry
            .register_station(&owner, HEIGHT, "", "Loc", 100, 4_000, &mut rail)
            .unwrap_err();
        assert_eq!(err, StationError::InvalidName { max: 50 });

        let long_name = "n".repeat(51);
        let err = registry
            .register_station(&owner, HEIGHT, &long_name, "Loc", 100, 4_000, &mut rail)
            .unwrap_err();
        assert_eq!(err, StationError::InvalidName { max: 50 });

        let long_location = "l".repeat(101);
        let err = registry
            .register_station(&owner, HEIGHT, "A", &long_location, 100, 4_000, &mut rail)
            .unwrap_err();
        assert_eq!(err, StationError::InvalidLocation { max: 100 });

        let err = registry
            .register_station(&owner, HEIGHT, "A", "Loc", 0, 4_000, &mut rail)
            .unwrap_err();
        assert_eq!(err, StationError::InvalidPower { min: 1, max: 1000 });

        let err = registry
            .register_station(&owner, HEIGHT, "A", "Loc", 1001, 4_000, &mut rail)
            .unwrap_err();
        assert_eq!(err, StationError::InvalidPower { min: 1, max: 1000 });

        let err = registry
            .register_station(&owner, HEIGHT, "A", "Loc", 100, 0, &mut rail)
            .unwrap_err();
        assert_eq!(err, StationError::InvalidPrice);

        // Nothing was registered and no fee moved.
        assert_eq!(registry.total_stations(), 0);
        assert!(rail.transfers.is_empty());
    }

    // ── Update ────────────────────────────────────────────────────────────────

    #[test]
    fn update_rewrites_fields_and_swaps_location_index() {
        let (mut registry, mut rail) = seed_registry();
        register(&mut registry, &mut rail, "ST1OWNER", "OldName", "OldLoc").unwrap();
        registry
            .update_station(&p("ST1OWNER"), 0, "NewName", "NewLoc", 200, 5_500)
            .unwrap();

        let station = registry.get_station(0).unwrap();
        assert_eq!(station.name, "NewName");
        assert_eq!(station.location, "NewLoc");
        assert_eq!(station.power_kw, 200);
        assert_eq!(station.price_per_kwh, 5_500);

        // The old location is free again; the new one is taken.
        register(&mut registry, &mut rail, "ST2OWNER", "B", "OldLoc").unwrap();
        let err = register(&mut registry, &mut rail, "ST3OWNER", "C", "NewLoc").unwrap_err();
        assert_eq!(err, StationError::AlreadyRegistered);
    }

    #[test]
    fn update_by_non_owner_rejected() {
        let (mut registry, mut rail) = seed_registry();
        register(&mut registry, &mut rail, "ST1OWNER", "A", "Loc1").unwrap();
        let err = registry
            .update_station(&p("ST2HACKER"), 0, "Hacked", "Loc1", 100, 4_000)
            .unwrap_err();
        assert_eq!(err, StationError::NotStationOwner);
        assert_eq!(registry.get_station(0).unwrap().name, "A");
    }

    #[test]
    fn update_to_taken_location_rejected() {
        let (mut registry, mut rail) = seed_registry();
        register(&mut registry, &mut rail, "ST1OWNER", "A", "Loc1").unwrap();
        register(&mut registry, &mut rail, "ST2OWNER", "B", "Loc2").unwrap();
        let err = registry
            .update_station(&p("ST1OWNER"), 0, "A", "Loc2", 100, 4_000)
            .unwrap_err();
        assert_eq!(err, StationError::AlreadyRegistered);
        assert_eq!(registry.get_station(0).unwrap().location, "Loc1");
    }

    #[test]
    fn update_missing_station_rejected() {
        let (mut registry, _) = seed_registry();
        let err = registry
            .update_station(&p("ST1OWNER"), 7, "A", "Loc", 100, 4_000)
            .unwrap_err();
        assert_eq!(err, StationError::NotRegistered(7));
    }

    // ── Toggle ────────────────────────────────────────────────────────────────

    #[test]
    fn toggle_flips_status() {
        let (mut registry, mut rail) = seed_registry();
        register(&mut registry, &mut rail, "ST1OWNER", "A", "Loc1").unwrap();
        registry.toggle_status(&p("ST1OWNER"), 0).unwrap();
        assert!(!registry.get_station(0).unwrap().status);
        registry.toggle_status(&p("ST1OWNER"), 0).unwrap();
        assert!(registry.get_station(0).unwrap().status);
    }

    #[test]
    fn toggle_by_non_owner_rejected() {
        let (mut registry, mut rail) = seed_registry();
        register(&mut registry, &mut rail, "ST1OWNER", "A", "Loc1").unwrap();
        let err = registry.toggle_status(&p("ST2HACKER"), 0).unwrap_err();
        assert_eq!(err, StationError::NotStationOwner);
    }

    // ── Ownership transfer ────────────────────────────────────────────────────

    #[test]
    fn transfer_moves_owner_index() {
        let (mut registry, mut rail) = seed_registry();
        register(&mut registry, &mut rail, "ST1OWNER", "A", "Loc1").unwrap();
        registry
            .transfer_ownership(&p("ST1OWNER"), 0, p("ST2OWNER"))
            .unwrap();

        assert_eq!(registry.get_station(0).unwrap().owner, p("ST2OWNER"));
        assert!(!registry.is_registered(&p("ST1OWNER")));
        assert!(registry.is_registered(&p("ST2OWNER")));

        // The old owner may register afresh.
        register(&mut registry, &mut rail, "ST1OWNER", "B", "Loc2").unwrap();
    }

    #[test]
    fn transfer_does_not_check_new_owners_holdings() {
        let (mut registry, mut rail) = seed_registry();
        register(&mut registry, &mut rail, "ST1OWNER", "A", "Loc1").unwrap();
        register(&mut registry, &mut rail, "ST2OWNER", "B", "Loc2").unwrap();
        // ST2OWNER ends up indexed to station 0 while station 1 still names
        // them as owner.
        registry
            .transfer_ownership(&p("ST1OWNER"), 0, p("ST2OWNER"))
            .unwrap();
        assert_eq!(registry.get_station(0).unwrap().owner, p("ST2OWNER"));
        assert_eq!(registry.get_station(1).unwrap().owner, p("ST2OWNER"));
    }

    #[test]
    fn transfer_by_non_owner_rejected() {
        let (mut registry, mut rail) = seed_registry();
        register(&mut registry, &mut rail, "ST1OWNER", "A", "Loc1").unwrap();
        let err = registry
            .transfer_ownership(&p("ST2HACKER"), 0, p("ST2HACKER"))
            .unwrap_err();
        assert_eq!(err, StationError::NotStationOwner);
    }

    // ── Deregistration ────────────────────────────────────────────────────────

    #[test]
    fn deregister_removes_record_and_both_indexes() {
        let (mut registry, mut rail) = seed_registry();
        register(&mut registry, &mut rail, "ST1OWNER", "A", "Loc1").unwrap();
        registry.deregister_station(&p("ST1OWNER"), 0).unwrap();

        assert!(registry.get_station(0).is_none());
        assert!(!registry.is_registered(&p("ST1OWNER")));
        assert_eq!(registry.total_stations(), 0);

        // Owner and location are both free again.
        register(&mut registry, &mut rail, "ST1OWNER", "A", "Loc1").unwrap();
    }

    #[test]
    fn admin_may_deregister_any_station() {
        let (mut registry, mut rail) = seed_registry();
        register(&mut registry, &mut rail, "ST1OWNER", "A", "Loc1").unwrap();
        registry.deregister_station(&p("ST1ADMIN"), 0).unwrap();
        assert_eq!(registry.total_stations(), 0);
    }

    #[test]
    fn deregister_by_third_party_rejected() {
        let (mut registry, mut rail) = seed_registry();
        register(&mut registry, &mut rail, "ST1OWNER", "A", "Loc1").unwrap();
        let err = registry
            .deregister_station(&p("ST2HACKER"), 0)
            .unwrap_err();
        assert_eq!(err, StationError::Unauthorized);
        assert!(registry.get_station(0).is_some());
    }

    // ── Administration ────────────────────────────────────────────────────────

    #[test]
    fn set_admin_hands_over_the_role() {
        let (mut registry, _) = seed_registry();
        registry.set_admin(&p("ST1ADMIN"), p("ST2ADMIN")).unwrap();
        assert_eq!(
            registry.set_registration_fee(&p("ST1ADMIN"), 5).unwrap_err(),
            StationError::Unauthorized
        );
        registry.set_registration_fee(&p("ST2ADMIN"), 5).unwrap();
        assert_eq!(registry.registration_fee(), 5);
    }

    #[test]
    fn zero_fee_rejected() {
        let (mut registry, _) = seed_registry();
        let err = registry
            .set_registration_fee(&p("ST1ADMIN"), 0)
            .unwrap_err();
        assert_eq!(err, StationError::InvalidFee);
        assert_eq!(registry.registration_fee(), DEFAULT_REGISTRATION_FEE);
    }
}
