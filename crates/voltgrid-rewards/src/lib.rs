//! voltgrid-rewards
//!
//! Usage-based rewards distributor. Accepts charging session submissions,
//! verifies a digest proof binding each session to its nonce and the block
//! height it was submitted at, computes a time-of-use reward, enforces a
//! rolling per-user daily cap, and credits the reward through the token
//! ledger's mint authority.

pub mod config;
pub mod directory;
pub mod distributor;
pub mod minter;
pub mod proof;

pub use config::DistributorConfig;
pub use directory::{MemberDirectory, StaticDirectory};
pub use distributor::{compute_reward, is_off_peak, ChargeSession, RewardsDistributor};
pub use minter::{MintAuthority, RewardMinter};
pub use proof::session_digest;
