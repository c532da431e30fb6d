/// Distinct bidders per round; keeps the zero-copy `Round` under the 10 KiB CPI allocation limit.
pub const MAX_BIDDERS: usize = 400;
pub const MAX_PERIOD_WINNERS: usize = 64;
pub const MAX_PRIZE_LEN: usize = 64;

/// Upper bound on a single user's committed stake in one round.
pub const MAX_BID: u64 = 32_768;
/// Primary wins allowed per accounting period before a user must sit out.
pub const MAX_WINS_PER_PERIOD: u8 = 3;

/// Weighted draws taken (with replacement) before deduplication.
pub const DRAW_SAMPLES: usize = 6;
/// Primary winner plus two backups.
pub const WINNER_SLOTS: usize = 3;

pub const BPS_DENOMINATOR: u64 = 10_000;

pub const DEFAULT_CYCLE_SEC: u32 = 86_400;
/// Subtracted from the cycle when computing `end_ts`, so a scheduler that fires
/// at the same wall-clock time every day never arrives before the deadline.
pub const SCHEDULE_SLACK_SEC: u32 = 300;

pub const SEED_CFG: &[u8] = b"cfg";
pub const SEED_ROUND: &[u8] = b"round";
pub const SEED_POINTS: &[u8] = b"points";
pub const SEED_BOARD: &[u8] = b"board";
pub const SEED_IDENTITY: &[u8] = b"identity";
