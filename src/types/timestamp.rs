//! UTC timestamps and the monotonic ordinal generator
//!
//! A timestamp whose time component is the unset sentinel (0 seconds) is
//! never persisted verbatim; it is resolved against the wall clock at encode
//! time, with a per-second ordinal guaranteeing strictly increasing identity
//! within the same second.

use std::sync::{Arc, Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

/// UTC timestamp: seconds since epoch plus a per-second ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamp {
    /// Seconds since the Unix epoch; 0 means "assign at encode time"
    pub time: u32,

    /// Ordinal disambiguating timestamps generated in the same second
    pub increment: u32,
}

impl Timestamp {
    /// Sentinel time component meaning "assign at encode time".
    pub const UNSET_TIME: u32 = 0;

    /// Construct an explicit timestamp.
    pub fn new(time: u32, increment: u32) -> Self {
        Self { time, increment }
    }

    /// Construct the sentinel timestamp that the generator resolves on encode.
    pub fn unset() -> Self {
        Self {
            time: Self::UNSET_TIME,
            increment: 0,
        }
    }

    /// True when the time component is the unset sentinel.
    pub fn is_unset(&self) -> bool {
        self.time == Self::UNSET_TIME
    }
}

/// Generator state: the last resolved second and its ordinal.
#[derive(Debug)]
struct GeneratorState {
    last_sec: u32,
    ordinal: u32,
}

/// Stateful producer of monotonically ordered (second, ordinal) pairs.
///
/// The only shared mutable resource in the conversion core. All mutation
/// happens inside [`TimestampGenerator::resolve`] behind a mutex, so
/// concurrent callers never interleave a read-modify-write and never receive
/// a duplicate pair.
#[derive(Debug)]
pub struct TimestampGenerator {
    state: Mutex<GeneratorState>,
}

impl TimestampGenerator {
    /// Create an isolated generator (tests, embedders with multiple cores).
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GeneratorState {
                last_sec: 0,
                ordinal: 1,
            }),
        }
    }

    /// Process-wide generator shared by default converter instances.
    pub fn global() -> Arc<Self> {
        static GLOBAL: OnceLock<Arc<TimestampGenerator>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Self::new())))
    }

    /// Resolve a timestamp for the wire.
    ///
    /// An explicit timestamp (non-zero time) is returned unchanged, ordinal
    /// taken as given. The unset sentinel is resolved against the current
    /// wall-clock second.
    pub fn resolve(&self, requested: Timestamp) -> Timestamp {
        if !requested.is_unset() {
            return requested;
        }
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or(1);
        self.resolve_at(now, requested)
    }

    /// Resolution against a caller-supplied clock reading.
    ///
    /// Within an unchanged second the ordinal strictly increases; when the
    /// second advances the ordinal resets to 1. A clock reading of 0 would
    /// collide with the unset sentinel, so it saturates to second 1.
    pub fn resolve_at(&self, now_secs: u32, requested: Timestamp) -> Timestamp {
        if !requested.is_unset() {
            return requested;
        }
        let now_secs = now_secs.max(1);
        let mut state = self.state.lock().expect("timestamp generator poisoned");
        if now_secs != state.last_sec {
            state.last_sec = now_secs;
            state.ordinal = 1;
        } else {
            state.ordinal += 1;
        }
        Timestamp {
            time: state.last_sec,
            increment: state.ordinal,
        }
    }
}

impl Default for TimestampGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_timestamp_unchanged() {
        let generator = TimestampGenerator::new();
        let explicit = Timestamp::new(1_500_000_000, 7);
        assert_eq!(generator.resolve(explicit), explicit);
        assert_eq!(generator.resolve_at(9, explicit), explicit);
    }

    #[test]
    fn test_ordinal_increments_within_second() {
        let generator = TimestampGenerator::new();
        let first = generator.resolve_at(100, Timestamp::unset());
        let second = generator.resolve_at(100, Timestamp::unset());
        assert_eq!(first.time, 100);
        assert_eq!(second.time, 100);
        assert!(second.increment > first.increment);
    }

    #[test]
    fn test_ordinal_resets_when_second_advances() {
        let generator = TimestampGenerator::new();
        generator.resolve_at(100, Timestamp::unset());
        generator.resolve_at(100, Timestamp::unset());
        let next = generator.resolve_at(101, Timestamp::unset());
        assert_eq!(next, Timestamp::new(101, 1));
    }

    #[test]
    fn test_zero_clock_reading_never_yields_sentinel_second() {
        let generator = TimestampGenerator::new();
        let resolved = generator.resolve_at(0, Timestamp::unset());
        assert_ne!(resolved.time, Timestamp::UNSET_TIME);
        assert_eq!(resolved, Timestamp::new(1, 1));
    }

    #[test]
    fn test_concurrent_resolution_never_duplicates() {
        use std::collections::HashSet;
        use std::thread;

        let generator = Arc::new(TimestampGenerator::new());
        let mut handles = Vec::new();
        for _ in 0..4 {
            let generator = Arc::clone(&generator);
            handles.push(thread::spawn(move || {
                (0..50)
                    .map(|_| generator.resolve_at(42, Timestamp::unset()))
                    .collect::<Vec<_>>()
            }));
        }

        let mut seen = HashSet::new();
        for handle in handles {
            for ts in handle.join().unwrap() {
                assert!(seen.insert((ts.time, ts.increment)), "duplicate pair {ts:?}");
            }
        }
    }
}
