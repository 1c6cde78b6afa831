use voltgrid_core::types::Principal;

/// Deploy-time wiring of the rewards distributor.
///
/// The three contract principals are host metadata: they name where the
/// collaborating ledgers live so the host can route the distributor's
/// outbound calls. The behavioral collaborators themselves are passed into
/// each operation as trait objects.
#[derive(Debug, Clone)]
pub struct DistributorConfig {
    /// The principal allowed to rewire this config at runtime. Sessions
    /// cannot be submitted until an oracle is set.
    pub oracle: Option<Principal>,
    pub token_contract: Principal,
    pub station_registry: Principal,
    pub user_registry: Principal,
}

impl Default for DistributorConfig {
    fn default() -> Self {
        Self {
            oracle: None,
            token_contract: Principal::new("SP000000000000000000002Q6VF78.energy-token"),
            station_registry: Principal::new("SP000000000000000000002Q6VF78.station-registry"),
            user_registry: Principal::new("SP000000000000000000002Q6VF78.user-registry"),
        }
    }
}
