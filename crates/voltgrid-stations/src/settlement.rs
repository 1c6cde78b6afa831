use serde::{Deserialize, Serialize};

use voltgrid_core::types::{Balance, Principal};

/// The native-currency transfer primitive the registry charges its
/// registration fee over. The host settles the transfer atomically with the
/// registering call, or rolls both back together.
pub trait SettlementRail {
    fn collect(&mut self, amount: Balance, from: &Principal, to: &Principal);
}

/// One settled fee transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeTransfer {
    pub amount: Balance,
    pub from: Principal,
    pub to: Principal,
}

/// A recording rail: appends every collected transfer. Stands in for the
/// host's settlement layer in tests and single-process deployments.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct FeeLog {
    pub transfers: Vec<FeeTransfer>,
}

impl SettlementRail for FeeLog {
    fn collect(&mut self, amount: Balance, from: &Principal, to: &Principal) {
        self.transfers.push(FeeTransfer {
            amount,
            from: from.clone(),
            to: to.clone(),
        });
    }
}
