//! Offset added to the base score before clamping.
//!
//! The legacy screening tool reseeded a process-wide normal(0, 0.1) generator
//! with 42 right before its single draw, so every assessment received the same
//! offset. [`PerturbationPolicy::Fixed`] with [`LEGACY_SEEDED_OFFSET`] keeps
//! that behavior as a named constant. The other policies disable the offset or
//! draw it from a generator owned by the individual call.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// First normal(0, 0.1) draw of the legacy generator seeded with 42
pub const LEGACY_SEEDED_OFFSET: f64 = 0.04967141530112327;

/// Standard deviation of the sampled offset
pub const NOISE_STD_DEV: f64 = 0.1;

/// Seed used by the legacy tool, and the default for `seeded` without a value.
///
/// `StdRng` is not the legacy generator, so `Seeded(LEGACY_SEED)` does not
/// reproduce [`LEGACY_SEEDED_OFFSET`].
pub const LEGACY_SEED: u64 = 42;

/// How the perturbation for a single assessment is obtained
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum PerturbationPolicy {
    /// Always add the same offset
    Fixed(f64),

    /// Add nothing
    Disabled,

    /// Draw once from a `StdRng` seeded for this call only.
    ///
    /// Reproducible across calls but not across generators: no seed gives the
    /// legacy offset. Use `Fixed(LEGACY_SEEDED_OFFSET)` for legacy parity.
    Seeded(u64),

    /// Draw once from a fresh entropy-seeded generator. Not deterministic.
    Sampled,
}

impl Default for PerturbationPolicy {
    fn default() -> Self {
        PerturbationPolicy::Fixed(LEGACY_SEEDED_OFFSET)
    }
}

impl PerturbationPolicy {
    /// Produce the offset for one assessment
    pub fn draw(&self) -> f64 {
        match self {
            PerturbationPolicy::Fixed(offset) => *offset,
            PerturbationPolicy::Disabled => 0.0,
            PerturbationPolicy::Seeded(seed) => sample_noise(&mut StdRng::seed_from_u64(*seed)),
            PerturbationPolicy::Sampled => sample_noise(&mut StdRng::from_entropy()),
        }
    }
}

fn sample_noise<R: Rng>(rng: &mut R) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    z * NOISE_STD_DEV
}

/// Error returned when a perturbation policy string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyParseError {
    #[error("Unknown perturbation mode '{0}', expected fixed, none, seeded:<n> or sampled")]
    UnknownMode(String),

    #[error("Invalid perturbation value '{0}'")]
    InvalidValue(String),
}

impl FromStr for PerturbationPolicy {
    type Err = PolicyParseError;

    /// Accepts `fixed`, `fixed:<offset>`, `none`, `seeded`, `seeded:<u64>` and `sampled`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        let (mode, value) = match s.split_once(':') {
            Some((mode, value)) => (mode.trim(), Some(value.trim())),
            None => (s.as_str(), None),
        };

        match (mode, value) {
            ("fixed", None) => Ok(PerturbationPolicy::default()),
            ("fixed", Some(value)) => value
                .parse::<f64>()
                .ok()
                .filter(|offset| offset.is_finite())
                .map(PerturbationPolicy::Fixed)
                .ok_or_else(|| PolicyParseError::InvalidValue(value.to_string())),
            ("none" | "disabled", None) => Ok(PerturbationPolicy::Disabled),
            ("seeded", None) => Ok(PerturbationPolicy::Seeded(LEGACY_SEED)),
            ("seeded", Some(value)) => value
                .parse::<u64>()
                .map(PerturbationPolicy::Seeded)
                .map_err(|_| PolicyParseError::InvalidValue(value.to_string())),
            ("sampled", None) => Ok(PerturbationPolicy::Sampled),
            _ => Err(PolicyParseError::UnknownMode(s.clone())),
        }
    }
}

impl fmt::Display for PerturbationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PerturbationPolicy::Fixed(offset) => write!(f, "fixed:{}", offset),
            PerturbationPolicy::Disabled => f.write_str("none"),
            PerturbationPolicy::Seeded(seed) => write!(f, "seeded:{}", seed),
            PerturbationPolicy::Sampled => f.write_str("sampled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_legacy_offset() {
        assert_eq!(PerturbationPolicy::default().draw(), LEGACY_SEEDED_OFFSET);
    }

    #[test]
    fn test_disabled_adds_nothing() {
        assert_eq!(PerturbationPolicy::Disabled.draw(), 0.0);
    }

    #[test]
    fn test_seeded_is_repeatable() {
        let policy = PerturbationPolicy::Seeded(7);
        let first = policy.draw();
        assert_eq!(first, policy.draw());
        assert!(first.is_finite());
        assert_ne!(first, PerturbationPolicy::Seeded(8).draw());
    }

    #[test]
    fn test_legacy_seed_is_not_legacy_offset() {
        let draw = PerturbationPolicy::Seeded(LEGACY_SEED).draw();
        assert_eq!(draw, PerturbationPolicy::Seeded(LEGACY_SEED).draw());
        assert_ne!(draw, LEGACY_SEEDED_OFFSET);
        assert_eq!(PerturbationPolicy::default().draw(), LEGACY_SEEDED_OFFSET);
    }

    #[test]
    fn test_sampled_stays_near_zero() {
        // Ten standard deviations out is not a realistic draw
        for _ in 0..100 {
            assert!(PerturbationPolicy::Sampled.draw().abs() < 1.0);
        }
    }

    #[test]
    fn test_parse_policies() {
        assert_eq!("fixed".parse::<PerturbationPolicy>().unwrap(), PerturbationPolicy::default());
        assert_eq!("FIXED:0.05".parse::<PerturbationPolicy>().unwrap(), PerturbationPolicy::Fixed(0.05));
        assert_eq!(" none ".parse::<PerturbationPolicy>().unwrap(), PerturbationPolicy::Disabled);
        assert_eq!("seeded".parse::<PerturbationPolicy>().unwrap(), PerturbationPolicy::Seeded(42));
        assert_eq!("seeded:1234".parse::<PerturbationPolicy>().unwrap(), PerturbationPolicy::Seeded(1234));
        assert_eq!("sampled".parse::<PerturbationPolicy>().unwrap(), PerturbationPolicy::Sampled);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "random".parse::<PerturbationPolicy>().unwrap_err(),
            PolicyParseError::UnknownMode("random".to_string())
        );
        assert_eq!(
            "seeded:-1".parse::<PerturbationPolicy>().unwrap_err(),
            PolicyParseError::InvalidValue("-1".to_string())
        );
        assert!("fixed:nan".parse::<PerturbationPolicy>().is_err());
        assert!("sampled:3".parse::<PerturbationPolicy>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for policy in [
            PerturbationPolicy::default(),
            PerturbationPolicy::Disabled,
            PerturbationPolicy::Seeded(99),
            PerturbationPolicy::Sampled,
        ] {
            assert_eq!(policy.to_string().parse::<PerturbationPolicy>().unwrap(), policy);
        }
    }
}
