//! Fee estimation from virtual size.

/// Estimates the fee in satoshis for a transaction of the given virtual
/// size at a per-kilobyte fee rate, rounding down.
#[must_use]
#[inline]
pub fn estimate(virtual_size: u64, fee_rate_per_kb: u64) -> u64 {
    virtual_size * fee_rate_per_kb / 1024
}
