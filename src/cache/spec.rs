//! Cache spec strings.
//!
//! A spec is a comma separated list of options, for example
//! `maximumSize=1000,expireAfterAccess=15m,recordStats`.
//!
//! | key                  | value                         | moka setting       |
//! |----------------------|-------------------------------|--------------------|
//! | `initialCapacity`    | non-negative integer          | `initial_capacity` |
//! | `maximumSize`        | non-negative integer          | `max_capacity`     |
//! | `expireAfterWrite`   | duration (`30s`, `15m`, `1d`) | `time_to_live`     |
//! | `expireAfterAccess`  | duration                      | `time_to_idle`     |
//! | `recordStats`        | none                          | hit/miss counters  |

use std::str::FromStr;
use std::time::Duration;

use moka::sync::{Cache, CacheBuilder};
use once_cell::sync::Lazy;

use super::SpecError;

/// Moka refuses expirations longer than 1000 years.
const MAX_DURATION_SECS: u64 = 1000 * 365 * 24 * 3600;

/// Upper bound for `initialCapacity`; moka preallocates this eagerly.
const MAX_INITIAL_CAPACITY: usize = 1 << 24;

/// Keys from the Guava grammar that moka has no equivalent for.
const UNSUPPORTED_KEYS: &[&str] = &[
    "maximumWeight",
    "concurrencyLevel",
    "weakKeys",
    "weakValues",
    "softValues",
    "refreshAfterWrite",
];

/// The process-wide default spec: no options set.
pub static DEFAULT_SPEC: Lazy<CacheSpec> = Lazy::new(CacheSpec::default);

/// Parsed construction parameters for one cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheSpec {
    pub initial_capacity: Option<usize>,
    pub maximum_size: Option<u64>,
    /// Time-to-live, counted from the last write.
    pub expire_after_write: Option<Duration>,
    /// Time-to-idle, counted from the last read or write.
    pub expire_after_access: Option<Duration>,
    pub record_stats: bool,
}

impl CacheSpec {
    /// Parse a spec string.
    ///
    /// A blank string parses to the default spec. Any blank item or any
    /// malformed, unknown or repeated option rejects the whole string.
    pub fn parse(spec: &str) -> Result<Self, SpecError> {
        let mut parsed = Self::default();

        if spec.trim().is_empty() {
            return Ok(parsed);
        }

        for pair in spec.split(',').map(str::trim) {
            if pair.is_empty() {
                return Err(SpecError::BlankPair(spec.to_string()));
            }

            let mut parts = pair.split('=').map(str::trim);
            let key = parts.next().unwrap_or_default();
            let value = parts.next();

            if parts.next().is_some() {
                return Err(SpecError::MultipleEquals(pair.to_string()));
            }
            if key.is_empty() {
                return Err(SpecError::EmptyKey(pair.to_string()));
            }

            match key {
                "initialCapacity" => {
                    let capacity: usize = parse_number(key, value)?;
                    if capacity > MAX_INITIAL_CAPACITY {
                        return Err(SpecError::OutOfRange {
                            key: key.to_string(),
                            value: capacity.to_string(),
                        });
                    }
                    set_once(&mut parsed.initial_capacity, key, capacity)?;
                }
                "maximumSize" => {
                    set_once(&mut parsed.maximum_size, key, parse_number(key, value)?)?;
                }
                "expireAfterWrite" => {
                    set_once(&mut parsed.expire_after_write, key, parse_duration(key, value)?)?;
                }
                "expireAfterAccess" => {
                    set_once(&mut parsed.expire_after_access, key, parse_duration(key, value)?)?;
                }
                "recordStats" => {
                    if value.is_some() {
                        return Err(SpecError::UnexpectedValue(key.to_string()));
                    }
                    if parsed.record_stats {
                        return Err(SpecError::Duplicate(key.to_string()));
                    }
                    parsed.record_stats = true;
                }
                _ if UNSUPPORTED_KEYS.contains(&key) => {
                    return Err(SpecError::Unsupported(key.to_string()));
                }
                _ => return Err(SpecError::UnknownKey(key.to_string())),
            }
        }

        Ok(parsed)
    }

    /// Whether no option is set.
    pub fn is_default(&self) -> bool {
        self == &*DEFAULT_SPEC
    }

    /// Moka builder configured with this spec's options.
    pub fn builder<K, V>(&self) -> CacheBuilder<K, V, Cache<K, V>>
    where
        K: std::hash::Hash + Eq + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        let mut builder = Cache::builder();

        if let Some(capacity) = self.initial_capacity {
            builder = builder.initial_capacity(capacity);
        }

        if let Some(max) = self.maximum_size {
            builder = builder.max_capacity(max);
        }

        if let Some(ttl) = self.expire_after_write {
            builder = builder.time_to_live(ttl);
        }

        if let Some(tti) = self.expire_after_access {
            builder = builder.time_to_idle(tti);
        }

        builder
    }
}

impl FromStr for CacheSpec {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn set_once<T>(slot: &mut Option<T>, key: &str, value: T) -> Result<(), SpecError> {
    if slot.is_some() {
        return Err(SpecError::Duplicate(key.to_string()));
    }
    *slot = Some(value);
    Ok(())
}

fn required<'a>(key: &str, value: Option<&'a str>) -> Result<&'a str, SpecError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| SpecError::MissingValue(key.to_string()))
}

fn parse_number<T: FromStr>(key: &str, value: Option<&str>) -> Result<T, SpecError> {
    let value = required(key, value)?;
    value.parse().map_err(|_| SpecError::InvalidNumber {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Parse `<amount><unit>` where unit is one of d, h, m, s.
fn parse_duration(key: &str, value: Option<&str>) -> Result<Duration, SpecError> {
    let value = required(key, value)?;
    let invalid = || SpecError::InvalidDuration {
        key: key.to_string(),
        value: value.to_string(),
    };

    let unit = value.chars().last().ok_or_else(invalid)?;
    let amount: u64 = value[..value.len() - unit.len_utf8()]
        .parse()
        .map_err(|_| invalid())?;

    let multiplier = match unit.to_ascii_lowercase() {
        'd' => 86400,
        'h' => 3600,
        'm' => 60,
        's' => 1,
        _ => return Err(invalid()),
    };

    match amount.checked_mul(multiplier) {
        Some(seconds) if seconds <= MAX_DURATION_SECS => Ok(Duration::from_secs(seconds)),
        _ => Err(SpecError::OutOfRange {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_spec() {
        let spec = CacheSpec::parse(
            "initialCapacity=16, maximumSize=1000,expireAfterWrite=1h, expireAfterAccess=15m,recordStats",
        )
        .unwrap();

        assert_eq!(spec.initial_capacity, Some(16));
        assert_eq!(spec.maximum_size, Some(1000));
        assert_eq!(spec.expire_after_write, Some(Duration::from_secs(3600)));
        assert_eq!(spec.expire_after_access, Some(Duration::from_secs(900)));
        assert!(spec.record_stats);
    }

    #[test]
    fn test_parse_empty_is_default() {
        assert!(CacheSpec::parse("").unwrap().is_default());
        assert!(CacheSpec::parse("  ").unwrap().is_default());
    }

    #[test]
    fn test_parse_rejects_blank_items() {
        assert_eq!(
            CacheSpec::parse("maximumSize=10,"),
            Err(SpecError::BlankPair("maximumSize=10,".into()))
        );
        assert_eq!(
            CacheSpec::parse("maximumSize=10, ,recordStats"),
            Err(SpecError::BlankPair("maximumSize=10, ,recordStats".into()))
        );
        assert!(matches!(CacheSpec::parse(" , ,"), Err(SpecError::BlankPair(_))));
    }

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("k", Some("30s")), Ok(Duration::from_secs(30)));
        assert_eq!(parse_duration("k", Some("2M")), Ok(Duration::from_secs(120)));
        assert_eq!(parse_duration("k", Some("1d")), Ok(Duration::from_secs(86400)));
        assert!(matches!(
            parse_duration("k", Some("10w")),
            Err(SpecError::InvalidDuration { .. })
        ));
        assert!(matches!(
            parse_duration("k", Some("m")),
            Err(SpecError::InvalidDuration { .. })
        ));
        assert!(matches!(
            parse_duration("k", Some("99999999d")),
            Err(SpecError::OutOfRange { .. })
        ));
        assert_eq!(parse_duration("k", Some("")), Err(SpecError::MissingValue("k".into())));
    }

    #[test]
    fn test_parse_rejects_bad_specs() {
        assert_eq!(
            CacheSpec::parse("not a real spec"),
            Err(SpecError::UnknownKey("not a real spec".into()))
        );
        assert_eq!(
            CacheSpec::parse("broken"),
            Err(SpecError::UnknownKey("broken".into()))
        );
        assert_eq!(
            CacheSpec::parse("maximumSize=1=2"),
            Err(SpecError::MultipleEquals("maximumSize=1=2".into()))
        );
        assert_eq!(
            CacheSpec::parse("=5"),
            Err(SpecError::EmptyKey("=5".into()))
        );
        assert_eq!(
            CacheSpec::parse("maximumSize"),
            Err(SpecError::MissingValue("maximumSize".into()))
        );
        assert_eq!(
            CacheSpec::parse("maximumSize=1,maximumSize=2"),
            Err(SpecError::Duplicate("maximumSize".into()))
        );
        assert_eq!(
            CacheSpec::parse("recordStats=true"),
            Err(SpecError::UnexpectedValue("recordStats".into()))
        );
        assert_eq!(
            CacheSpec::parse("weakKeys"),
            Err(SpecError::Unsupported("weakKeys".into()))
        );
        assert!(matches!(
            CacheSpec::parse("maximumSize=-1"),
            Err(SpecError::InvalidNumber { .. })
        ));
        assert!(matches!(
            CacheSpec::parse("initialCapacity=999999999999"),
            Err(SpecError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_builder_applies_capacity() {
        let spec = CacheSpec::parse("maximumSize=10").unwrap();
        let cache = spec.builder::<u32, u32>().build();

        assert_eq!(cache.policy().max_capacity(), Some(10));
    }
}
