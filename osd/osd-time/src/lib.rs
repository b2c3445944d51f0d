//!
//! osd-time - Monotonic Tick Clock
//!
//! Ticks are whatever unit the platform counter uses. On Linux that happens
//! to be nanoseconds; on Apple silicon it is a 24 MHz counter. Callers must
//! always go through `ticks_per_second()` or the conversion helpers.
//!
//! ## Functions
//!
//! - `TickClock::now() -> Ticks` - Current counter value
//! - `TickClock::ticks_per_second() -> Ticks` - Counter frequency
//! - `TickClock::sleep(ticks)` - Best-effort sleep, 2 ms under the request
//! - `ticks_to_duration(ticks, tps) -> Duration`
//! - `duration_to_ticks(duration, tps) -> Ticks`
//!

pub mod ffi;

use std::time::Duration;

use osd_core::{DEFAULT_SLEEP_MARGIN_MS, Ticks};

const NANOS_PER_SEC: u128 = 1_000_000_000;
const MILLIS_PER_SEC: u128 = 1_000;

/// Ratio between counter ticks and nanoseconds: `ns = ticks * numer / denom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timebase {
    pub numer: u32,
    pub denom: u32,
}

impl Timebase {
    pub const NANOSECONDS: Timebase = Timebase { numer: 1, denom: 1 };

    pub fn host() -> Timebase {
        platform::timebase()
    }

    pub fn ticks_per_second(self) -> Ticks {
        if self.numer == 0 || self.denom == 0 {
            return NANOS_PER_SEC as Ticks;
        }
        let tps = NANOS_PER_SEC * self.denom as u128 / self.numer as u128;
        tps.clamp(1, Ticks::MAX as u128) as Ticks
    }
}

/// Stateless handle over the platform's monotonic counter.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickClock;

impl TickClock {
    pub fn now() -> Ticks {
        platform::now()
    }

    pub fn ticks_per_second() -> Ticks {
        Timebase::host().ticks_per_second()
    }

    pub fn sleep(duration: Ticks) {
        Self::sleep_with_margin(duration, DEFAULT_SLEEP_MARGIN_MS);
    }

    pub fn sleep_with_margin(duration: Ticks, margin_ms: u32) {
        if let Some(interval) = sleep_interval(duration, Self::ticks_per_second(), margin_ms) {
            std::thread::sleep(interval);
        }
    }

    /// Ticks elapsed since `start`, a value previously returned by `now`.
    pub fn elapsed_since(start: Ticks) -> Ticks {
        Self::now().saturating_sub(start)
    }
}

/// Whole milliseconds in `duration`, rounded down.
pub fn ticks_to_millis(duration: Ticks, ticks_per_second: Ticks) -> u64 {
    let ms = duration as u128 * MILLIS_PER_SEC / ticks_per_second.max(1) as u128;
    ms.min(u64::MAX as u128) as u64
}

/// How long `sleep` actually blocks: the request minus `margin_ms`, or
/// nothing when fewer than `margin_ms` whole milliseconds were requested.
pub fn sleep_interval(duration: Ticks, ticks_per_second: Ticks, margin_ms: u32) -> Option<Duration> {
    let ms = ticks_to_millis(duration, ticks_per_second);
    if ms < margin_ms as u64 {
        return None;
    }
    let remaining = ms - margin_ms as u64;
    if remaining == 0 {
        return None;
    }
    Some(Duration::from_millis(remaining))
}

pub fn ticks_to_duration(ticks: Ticks, ticks_per_second: Ticks) -> Duration {
    let tps = ticks_per_second.max(1);
    let secs = ticks / tps;
    let rem = (ticks % tps) as u128;
    // rounds up so a deadline built from it never lands early
    let nanos = (rem * NANOS_PER_SEC).div_ceil(tps as u128) as u32;
    Duration::new(secs, nanos)
}

pub fn duration_to_ticks(duration: Duration, ticks_per_second: Ticks) -> Ticks {
    let ticks = duration.as_nanos().saturating_mul(ticks_per_second as u128) / NANOS_PER_SEC;
    ticks.min(Ticks::MAX as u128) as Ticks
}

#[cfg(target_vendor = "apple")]
#[allow(deprecated)]
mod platform {
    use super::Timebase;
    use osd_core::Ticks;

    pub fn now() -> Ticks {
        unsafe { libc::mach_absolute_time() }
    }

    pub fn timebase() -> Timebase {
        let mut info = libc::mach_timebase_info { numer: 0, denom: 0 };
        let rc = unsafe { libc::mach_timebase_info(&mut info) };
        if rc != 0 {
            tracing::warn!(rc, "mach_timebase_info failed, assuming nanosecond ticks");
            return Timebase::NANOSECONDS;
        }
        Timebase {
            numer: info.numer,
            denom: info.denom,
        }
    }
}

#[cfg(all(unix, not(target_vendor = "apple")))]
mod platform {
    use super::Timebase;
    use osd_core::Ticks;

    pub fn now() -> Ticks {
        let mut ts: libc::timespec = unsafe { std::mem::zeroed() };
        // CLOCK_MONOTONIC cannot fail with a valid pointer
        unsafe { libc::clock_gettime(libc::CLOCK_MONOTONIC, &mut ts) };
        (ts.tv_sec as Ticks)
            .wrapping_mul(1_000_000_000)
            .wrapping_add(ts.tv_nsec as Ticks)
    }

    pub fn timebase() -> Timebase {
        Timebase::NANOSECONDS
    }
}

#[cfg(not(unix))]
mod platform {
    use super::Timebase;
    use osd_core::Ticks;
    use std::sync::OnceLock;
    use std::time::Instant;

    static ANCHOR: OnceLock<Instant> = OnceLock::new();

    pub fn now() -> Ticks {
        let anchor = ANCHOR.get_or_init(Instant::now);
        anchor.elapsed().as_nanos().min(Ticks::MAX as u128) as Ticks
    }

    pub fn timebase() -> Timebase {
        Timebase::NANOSECONDS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_now_is_monotonic() {
        let mut last = TickClock::now();
        for _ in 0..1000 {
            let next = TickClock::now();
            assert!(next >= last);
            last = next;
        }
    }

    #[test]
    fn test_ticks_track_wall_time() {
        let tps = TickClock::ticks_per_second();
        let start = TickClock::now();
        std::thread::sleep(Duration::from_millis(20));
        let elapsed = ticks_to_duration(TickClock::elapsed_since(start), tps);
        assert!(elapsed >= Duration::from_millis(20));
        assert!(elapsed < Duration::from_secs(2));
    }

    #[test]
    fn test_timebase_ratio() {
        assert_eq!(Timebase::NANOSECONDS.ticks_per_second(), 1_000_000_000);
        // Apple silicon reports 125/3 for its 24 MHz counter
        let arm = Timebase { numer: 125, denom: 3 };
        assert_eq!(arm.ticks_per_second(), 24_000_000);
        // Older PowerPC-era hosts used ratios below one
        let slow = Timebase { numer: 1_000_000_000, denom: 33_333_333 };
        assert_eq!(slow.ticks_per_second(), 33_333_333);
    }

    #[test]
    fn test_degenerate_timebase_falls_back() {
        assert_eq!(Timebase { numer: 0, denom: 1 }.ticks_per_second(), 1_000_000_000);
        assert_eq!(Timebase { numer: 1, denom: 0 }.ticks_per_second(), 1_000_000_000);
    }

    #[test]
    fn test_conversions_non_nanosecond_ticks() {
        let tps = 24_000_000;
        assert_eq!(ticks_to_duration(24_000_000, tps), Duration::from_secs(1));
        assert_eq!(ticks_to_duration(12_000, tps), Duration::from_micros(500));
        assert_eq!(duration_to_ticks(Duration::from_millis(250), tps), 6_000_000);
        assert_eq!(ticks_to_millis(35_999, tps), 1);
    }

    #[test]
    fn test_partial_nanosecond_rounds_up() {
        assert_eq!(ticks_to_duration(1, 3_000_000_000), Duration::from_nanos(1));
        assert_eq!(ticks_to_duration(3_000_000_000, 3_000_000_000), Duration::from_secs(1));
    }

    #[test]
    fn test_duration_of_huge_tick_count() {
        let d = ticks_to_duration(Ticks::MAX, 1_000_000_000);
        assert_eq!(d.as_secs(), Ticks::MAX / 1_000_000_000);
        assert_eq!(duration_to_ticks(Duration::MAX, 1_000_000_000), Ticks::MAX);
    }

    #[test]
    fn test_sleep_interval_margin() {
        let tps = 1_000_000_000;
        let ms = |n: u64| n * 1_000_000;
        assert_eq!(sleep_interval(ms(1), tps, 2), None);
        assert_eq!(sleep_interval(ms(2), tps, 2), None);
        assert_eq!(sleep_interval(ms(3), tps, 2), Some(Duration::from_millis(1)));
        assert_eq!(sleep_interval(ms(10) + 999_999, tps, 2), Some(Duration::from_millis(8)));
        assert_eq!(sleep_interval(ms(10), tps, 0), Some(Duration::from_millis(10)));
        assert_eq!(sleep_interval(0, tps, 0), None);
    }

    #[test]
    fn test_sleep_under_sleeps() {
        let tps = TickClock::ticks_per_second();
        let request = duration_to_ticks(Duration::from_millis(30), tps);
        let start = Instant::now();
        TickClock::sleep(request);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(28));
        assert!(elapsed < Duration::from_millis(1000));
    }

    #[test]
    fn test_short_sleep_returns_immediately() {
        let tps = TickClock::ticks_per_second();
        let start = Instant::now();
        TickClock::sleep(duration_to_ticks(Duration::from_millis(1), tps));
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
