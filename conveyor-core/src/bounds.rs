//! Validation and normalization of capacity and timeout inputs
//!
//! Raw maxsize requests and wall-clock timeouts are normalized here, before
//! they reach any synchronization logic. Two failure conditions are kept
//! distinct throughout: a magnitude the platform type cannot represent at all
//! ([`Error::Overflow`]) and a representable but semantically illegal value
//! ([`Error::InvalidArgument`]).

use crate::error::{Error, Result};
use std::time::{Duration, Instant};
use tracing::debug;

/// Timeouts beyond this many seconds cannot be represented as a [`Duration`].
const MAX_TIMEOUT_SECS: f64 = u64::MAX as f64;

/// How long an operation may wait for its predicate to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitMode {
    /// Single predicate check, no suspension.
    NoWait,
    /// Suspend until the predicate holds.
    Forever,
    /// Suspend until the predicate holds or the deadline passes.
    Until(Instant),
}

/// Normalize a requested maxsize.
///
/// Negative requests mean *unbounded* and clamp to `0`, a deliberate policy
/// rather than an error. Magnitudes that do not fit the platform's signed size type
/// cannot be represented at all and fail with [`Error::Overflow`], whatever
/// their sign.
pub fn normalize_maxsize(requested: i128) -> Result<usize> {
    let representable = isize::try_from(requested).map_err(|_| {
        Error::Overflow(format!("maxsize {} is too large to represent", requested))
    })?;
    if representable < 0 {
        debug!(requested = %requested, "negative maxsize normalized to unbounded");
        return Ok(0);
    }
    Ok(representable as usize)
}

/// Resolve `block`/`timeout` call arguments into a wait budget.
///
/// `timeout` is a relative duration in seconds. `None` defers entirely to
/// `block`; `0` degrades to a single poll regardless of `block`. The absolute
/// deadline is fixed here, once per call, so re-waits after spurious wakeups
/// never stretch the overall budget.
pub fn wait_mode(block: bool, timeout: Option<f64>) -> Result<WaitMode> {
    let secs = match timeout {
        None => {
            return Ok(if block {
                WaitMode::Forever
            } else {
                WaitMode::NoWait
            });
        }
        Some(secs) => secs,
    };

    // A provided timeout is validated even when `block` is false.
    if secs.is_nan() {
        return Err(Error::InvalidArgument(
            "'timeout' is not a valid float".to_string(),
        ));
    }
    if secs < 0.0 {
        return Err(Error::InvalidArgument(
            "'timeout' must be positive".to_string(),
        ));
    }
    if secs > MAX_TIMEOUT_SECS {
        return Err(Error::Overflow("timeout is too large".to_string()));
    }

    if !block || secs == 0.0 {
        return Ok(WaitMode::NoWait);
    }

    let budget = Duration::try_from_secs_f64(secs)
        .map_err(|_| Error::Overflow("timeout is too large".to_string()))?;
    let deadline = Instant::now()
        .checked_add(budget)
        .ok_or_else(|| Error::Overflow("timeout is too large".to_string()))?;
    Ok(WaitMode::Until(deadline))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_maxsize_passthrough() {
        assert_eq!(normalize_maxsize(0).unwrap(), 0);
        assert_eq!(normalize_maxsize(100).unwrap(), 100);
    }

    #[test]
    fn test_negative_maxsize_clamps_to_unbounded() {
        assert_eq!(normalize_maxsize(-1).unwrap(), 0);
        assert_eq!(normalize_maxsize(-1000).unwrap(), 0);
    }

    #[test]
    fn test_unrepresentable_maxsize_overflows() {
        let too_big = 1i128 << 72;
        assert_eq!(normalize_maxsize(too_big).unwrap_err().kind(), ErrorKind::Overflow);
        // The overflow check precedes the sign clamp.
        assert_eq!(normalize_maxsize(-too_big).unwrap_err().kind(), ErrorKind::Overflow);
    }

    #[test]
    fn test_no_timeout_defers_to_block() {
        assert_eq!(wait_mode(true, None).unwrap(), WaitMode::Forever);
        assert_eq!(wait_mode(false, None).unwrap(), WaitMode::NoWait);
    }

    #[test]
    fn test_zero_timeout_is_a_poll() {
        assert_eq!(wait_mode(true, Some(0.0)).unwrap(), WaitMode::NoWait);
        assert_eq!(wait_mode(false, Some(0.0)).unwrap(), WaitMode::NoWait);
    }

    #[test]
    fn test_positive_timeout_fixes_a_deadline() {
        let before = Instant::now();
        match wait_mode(true, Some(1.5)).unwrap() {
            WaitMode::Until(deadline) => {
                assert!(deadline >= before + Duration::from_secs_f64(1.4));
                assert!(deadline <= Instant::now() + Duration::from_secs_f64(1.5));
            }
            other => panic!("expected deadline, got {:?}", other),
        }
    }

    #[test]
    fn test_nonblocking_wins_over_positive_timeout() {
        assert_eq!(wait_mode(false, Some(5.0)).unwrap(), WaitMode::NoWait);
    }

    #[test]
    fn test_negative_timeout_is_invalid() {
        let err = wait_mode(true, Some(-1.0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        // Validation applies even when the caller is not going to wait.
        let err = wait_mode(false, Some(-1.0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_nan_timeout_is_invalid() {
        let err = wait_mode(true, Some(f64::NAN)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_unrepresentable_timeout_overflows() {
        let err = wait_mode(true, Some(2f64.powi(72))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Overflow);
        let err = wait_mode(true, Some(f64::INFINITY)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Overflow);
        // Non-blocking callers still see the overflow.
        let err = wait_mode(false, Some(2f64.powi(72))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Overflow);
    }
}
