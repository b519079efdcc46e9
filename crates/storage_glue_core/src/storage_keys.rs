use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::Rng;
use thiserror::Error;

pub const SAMPLE_KEY_PREFIX: &str = "SampleFile";
pub const SAMPLE_OBJECT_BODY: &str = "Sample file body...";
pub const SAMPLE_CONTENT_TYPE: &str = "text/plain";

/// Upper bound (exclusive) of the random suffix appended to timestamp keys.
pub const SAMPLE_SUFFIX_MAX: u32 = 1_000;

/// How the bootstrap program names the object it uploads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyStrategy {
    /// `SampleFile<MM-dd-yyyy-HH-mm-ss><n>`, n in [1, 1000). Not collision safe.
    #[default]
    Timestamp,
    /// `SampleFile-<uuid v4>`.
    Uuid,
}

impl KeyStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timestamp => "timestamp",
            Self::Uuid => "uuid",
        }
    }
}

impl fmt::Display for KeyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown key strategy '{0}', expected 'timestamp' or 'uuid'")]
pub struct UnknownKeyStrategy(String);

impl FromStr for KeyStrategy {
    type Err = UnknownKeyStrategy;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "timestamp" => Ok(Self::Timestamp),
            "uuid" => Ok(Self::Uuid),
            _ => Err(UnknownKeyStrategy(value.to_string())),
        }
    }
}

pub fn sample_object_key(strategy: KeyStrategy, now: DateTime<Utc>, rng: &mut impl Rng) -> String {
    match strategy {
        KeyStrategy::Timestamp => {
            let suffix = rng.gen_range(1..SAMPLE_SUFFIX_MAX);
            format!(
                "{SAMPLE_KEY_PREFIX}{}{suffix}",
                now.format("%m-%d-%Y-%H-%M-%S")
            )
        }
        KeyStrategy::Uuid => {
            let id = uuid::Builder::from_random_bytes(rng.gen()).into_uuid();
            format!("{SAMPLE_KEY_PREFIX}-{id}")
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 7, 14, 5, 9)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn timestamp_key_has_prefix_time_and_bounded_suffix() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let key = sample_object_key(KeyStrategy::Timestamp, fixed_now(), &mut rng);
            let suffix = key
                .strip_prefix("SampleFile03-07-2026-14-05-09")
                .expect("key should start with prefix and timestamp");
            let value: u32 = suffix.parse().expect("suffix should be numeric");
            assert!((1..SAMPLE_SUFFIX_MAX).contains(&value));
        }
    }

    #[test]
    fn uuid_keys_are_deterministic_for_a_seeded_rng() {
        let first = sample_object_key(KeyStrategy::Uuid, fixed_now(), &mut StdRng::seed_from_u64(1));
        let second =
            sample_object_key(KeyStrategy::Uuid, fixed_now(), &mut StdRng::seed_from_u64(1));
        let other = sample_object_key(KeyStrategy::Uuid, fixed_now(), &mut StdRng::seed_from_u64(2));

        assert_eq!(first, second);
        assert_ne!(first, other);

        let id = first.strip_prefix("SampleFile-").expect("uuid prefix");
        let parsed = uuid::Uuid::parse_str(id).expect("suffix should be a uuid");
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn parses_strategy_names() {
        assert_eq!("timestamp".parse(), Ok(KeyStrategy::Timestamp));
        assert_eq!(" UUID ".parse(), Ok(KeyStrategy::Uuid));
        assert!("random".parse::<KeyStrategy>().is_err());
        assert_eq!(KeyStrategy::default(), KeyStrategy::Timestamp);
    }

    #[test]
    fn sample_body_is_nineteen_bytes() {
        assert_eq!(SAMPLE_OBJECT_BODY.len(), 19);
    }
}
