/// ─── VoltGrid Protocol Constants ────────────────────────────────────────────
///
/// "Charge off-peak, earn four times the rate."
///
/// Rewards are denominated in reward units of the platform token.
/// The block clock runs at one block per minute: 1440 blocks per day.

// ── Reward computation ───────────────────────────────────────────────────────

/// Base reward per kWh, before the time-of-use multiplier.
pub const BASE_RATE_PER_KWH: u128 = 100;

/// Time-of-use multiplier for off-peak sessions (percent of base).
/// Off-peak energy rewards 4x the on-peak rate.
pub const OFF_PEAK_MULTIPLIER: u128 = 200;

/// Time-of-use multiplier for on-peak sessions (percent of base).
pub const PEAK_MULTIPLIER: u128 = 50;

/// Divisor applied after the multiplier (multipliers are percentages).
pub const MULTIPLIER_SCALE: u128 = 100;

/// Maximum reward units any single user may be credited per day.
pub const DAILY_REWARD_CAP: u128 = 10_000;

// ── Session bounds ───────────────────────────────────────────────────────────

/// Largest energy delivery accepted in one session submission.
pub const MAX_KWH_PER_SESSION: u64 = 500;

/// A session must reference energy delivered within this many blocks
/// before the submitting call, and never in the future.
pub const SESSION_WINDOW_BLOCKS: u64 = 1440;

// ── Block clock ──────────────────────────────────────────────────────────────

/// One block per minute: 1440 blocks per day.
pub const BLOCKS_PER_DAY: u64 = 1440;

/// Blocks per hour of the in-day clock.
pub const BLOCKS_PER_HOUR: u64 = 60;

/// Off-peak window: hour >= 22 or hour < 6 of the in-day clock.
pub const OFF_PEAK_START_HOUR: u64 = 22;
pub const OFF_PEAK_END_HOUR: u64 = 6;

// ── Station bounds ───────────────────────────────────────────────────────────

/// Station display name length limit (bytes, must be non-empty).
pub const MAX_STATION_NAME_LEN: usize = 50;

/// Station location string length limit (bytes, must be non-empty).
pub const MAX_LOCATION_LEN: usize = 100;

/// Rated output bounds accepted at registration (kW).
pub const MIN_POWER_KW: u64 = 1;
pub const MAX_POWER_KW: u64 = 1000;

/// Registration fee collected to the registry admin, in native settlement
/// units. Adjustable at runtime by the admin.
pub const DEFAULT_REGISTRATION_FEE: u128 = 1_000_000;
