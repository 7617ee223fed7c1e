//! Runtime tuning knobs read once from the environment

use std::sync::OnceLock;

fn parse_env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn parse_env_bool_u8(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(|v| v != 0)
        .unwrap_or(default)
}

static MATRIX_TIME_BUDGET_MS: OnceLock<u64> = OnceLock::new();

/// Wall-clock budget of one matrix backend call
pub(crate) fn matrix_time_budget_ms() -> u64 {
    *MATRIX_TIME_BUDGET_MS.get_or_init(|| parse_env_u64("SCAN_MATRIX_TIME_BUDGET_MS", 2000))
}

static MATRIX_MAX_REGIONS: OnceLock<usize> = OnceLock::new();

/// Upper bound on regions the matrix backend inspects per call
pub(crate) fn matrix_max_regions() -> usize {
    *MATRIX_MAX_REGIONS.get_or_init(|| parse_env_usize("SCAN_MATRIX_MAX_REGIONS", 10).max(1))
}

static PARALLEL_DECODE: OnceLock<bool> = OnceLock::new();

/// Whether (variant x backend) jobs run on the rayon pool
pub(crate) fn parallel_decode() -> bool {
    *PARALLEL_DECODE.get_or_init(|| parse_env_bool_u8("SCAN_PARALLEL", true))
}

static LINEAR_BANDS: OnceLock<usize> = OnceLock::new();

/// Horizontal bands swept by the linear backend in whole-image mode
pub(crate) fn linear_band_count() -> usize {
    *LINEAR_BANDS.get_or_init(|| parse_env_usize("SCAN_LINEAR_BANDS", 4).clamp(1, 16))
}
