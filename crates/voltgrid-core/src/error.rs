use thiserror::Error;

use crate::types::{Balance, Principal, SessionId, StationId};

// ── TokenError ───────────────────────────────────────────────────────────────

/// Failure kinds of the fungible token ledger.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("insufficient balance: need {need}, have {have}")]
    InsufficientBalance { need: Balance, have: Balance },

    #[error("insufficient allowance: need {need}, have {have}")]
    InsufficientAllowance { need: Balance, have: Balance },

    #[error("ledger already initialized")]
    AlreadyInitialized,

    #[error("ledger not initialized")]
    NotInitialized,
}

impl TokenError {
    /// Wire code of the deployed token contract.
    pub fn code(&self) -> u32 {
        match self {
            TokenError::Unauthorized => 100,
            TokenError::InsufficientBalance { .. } => 102,
            TokenError::InsufficientAllowance { .. } => 103,
            TokenError::AlreadyInitialized => 106,
            TokenError::NotInitialized => 107,
        }
    }
}

// ── StationError ─────────────────────────────────────────────────────────────

/// Failure kinds of the charging station registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StationError {
    #[error("unauthorized")]
    Unauthorized,

    /// Caller already owns a station, or the location is already taken.
    #[error("already registered")]
    AlreadyRegistered,

    #[error("station not registered: {0}")]
    NotRegistered(StationId),

    #[error("station name must be 1..={max} bytes")]
    InvalidName { max: usize },

    #[error("station location must be 1..={max} bytes")]
    InvalidLocation { max: usize },

    #[error("rated power must be {min}..={max} kW")]
    InvalidPower { min: u64, max: u64 },

    #[error("price per kWh must be greater than zero")]
    InvalidPrice,

    #[error("registration fee must be greater than zero")]
    InvalidFee,

    #[error("caller does not own this station")]
    NotStationOwner,
}

impl StationError {
    /// Wire code of the deployed registry contract. Name and location share
    /// a code, as do price and fee.
    pub fn code(&self) -> u32 {
        match self {
            StationError::Unauthorized => 100,
            StationError::AlreadyRegistered => 101,
            StationError::NotRegistered(_) => 102,
            StationError::InvalidName { .. } => 103,
            StationError::InvalidLocation { .. } => 103,
            StationError::InvalidPower { .. } => 104,
            StationError::InvalidPrice => 106,
            StationError::InvalidFee => 106,
            StationError::NotStationOwner => 108,
        }
    }
}

// ── RewardsError ─────────────────────────────────────────────────────────────

/// Failure kinds of the rewards distributor.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RewardsError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("unknown session: {0}")]
    InvalidSession(SessionId),

    /// Also reported by the pending-reward preview when the session does not
    /// exist at all, matching the deployed contract.
    #[error("session already claimed")]
    AlreadyClaimed,

    #[error("session kwh must be 1..={max}")]
    InvalidAmount { max: u64 },

    #[error("session timestamp outside the trailing submission window")]
    InvalidTimestamp,

    #[error("oracle not configured")]
    OracleNotSet,

    #[error("station not registered: {0}")]
    StationNotRegistered(Principal),

    #[error("user not registered: {0}")]
    UserNotRegistered(Principal),

    #[error("session proof does not match expected digest")]
    InvalidProof,

    #[error("daily reward cap of {cap} exceeded")]
    MaxRewardExceeded { cap: Balance },

    #[error("reward mint failed: {0}")]
    MintFailed(TokenError),
}

impl RewardsError {
    /// Wire code of the deployed distributor contract.
    pub fn code(&self) -> u32 {
        match self {
            RewardsError::Unauthorized => 100,
            RewardsError::InvalidSession(_) => 101,
            RewardsError::AlreadyClaimed => 102,
            RewardsError::InvalidAmount { .. } => 103,
            RewardsError::InvalidTimestamp => 104,
            RewardsError::OracleNotSet => 105,
            RewardsError::StationNotRegistered(_) => 106,
            RewardsError::UserNotRegistered(_) => 107,
            RewardsError::InvalidProof => 111,
            RewardsError::MaxRewardExceeded { .. } => 112,
            RewardsError::MintFailed(_) => 113,
        }
    }
}
