//! Parameter distributions.
//!
//! Every uncertain input is a multiplier on its base value. Multiplicatively
//! uncertain coefficients that cannot go negative are log-normal; volumes
//! and shares are normal and clamped to physical bounds.

use rand::Rng;
use rand_distr::Distribution as _;
use rand_distr::{LogNormal, Normal, Uniform};
use serde::{Deserialize, Serialize};

use crate::MonteCarloError;

/// Distribution family and parameters for one multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum Distribution {
    /// `exp(N(mu, sigma))`.
    LogNormal {
        /// Mean of the underlying normal.
        mu: f64,
        /// Standard deviation of the underlying normal.
        sigma: f64,
    },
    /// `N(mean, sd)`, optionally clamped to `[low, high]`.
    Normal {
        /// Mean.
        mean: f64,
        /// Standard deviation.
        sd: f64,
        /// Clamp bounds.
        #[serde(default)]
        clamp: Option<[f64; 2]>,
    },
    /// `U[low, high)`.
    Uniform {
        /// Lower bound.
        low: f64,
        /// Upper bound.
        high: f64,
    },
    /// Always the same value.
    Fixed {
        /// The value.
        value: f64,
    },
}

impl Distribution {
    /// Prepare a sampler, rejecting unusable parameters.
    pub fn sampler(&self, parameter: &str) -> Result<Sampler, MonteCarloError> {
        let invalid = |reason: String| MonteCarloError::InvalidDistribution {
            parameter: parameter.to_string(),
            reason,
        };
        let spread_ok = |v: f64| v.is_finite() && v >= 0.0;
        match *self {
            Self::LogNormal { mu, sigma } => {
                if !(mu.is_finite() && spread_ok(sigma)) {
                    return Err(invalid(format!("log-normal({mu}, {sigma}) needs finite mu and sigma >= 0")));
                }
                LogNormal::new(mu, sigma)
                    .map(Sampler::LogNormal)
                    .map_err(|e| invalid(e.to_string()))
            }
            Self::Normal { mean, sd, clamp } => {
                if !(mean.is_finite() && spread_ok(sd)) {
                    return Err(invalid(format!("normal({mean}, {sd}) needs finite mean and sd >= 0")));
                }
                if let Some([low, high]) = clamp {
                    if !(low.is_finite() && high.is_finite() && low < high) {
                        return Err(invalid(format!("clamp bounds [{low}, {high}] are inverted")));
                    }
                }
                let normal = Normal::new(mean, sd).map_err(|e| invalid(e.to_string()))?;
                Ok(Sampler::Normal { normal, clamp })
            }
            Self::Uniform { low, high } => {
                if low.is_finite() && high.is_finite() && low < high {
                    Ok(Sampler::Uniform(Uniform::new(low, high)))
                } else {
                    Err(invalid(format!("uniform bounds [{low}, {high}) are empty or not finite")))
                }
            }
            Self::Fixed { value } if value.is_finite() => Ok(Sampler::Fixed(value)),
            Self::Fixed { value } => Err(invalid(format!("fixed value {value} is not finite"))),
        }
    }
}

/// A validated, ready-to-draw distribution.
#[derive(Debug, Clone)]
pub enum Sampler {
    /// Log-normal.
    LogNormal(LogNormal<f64>),
    /// Normal with optional clamp.
    Normal {
        /// Unclamped normal.
        normal: Normal<f64>,
        /// Clamp bounds.
        clamp: Option<[f64; 2]>,
    },
    /// Uniform.
    Uniform(Uniform<f64>),
    /// Constant.
    Fixed(f64),
}

impl Sampler {
    /// Draw one value and whether it was clamped.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> (f64, bool) {
        match self {
            Self::LogNormal(d) => (d.sample(rng), false),
            Self::Normal { normal, clamp } => {
                let raw = normal.sample(rng);
                match clamp {
                    Some([low, high]) => {
                        let v = raw.clamp(*low, *high);
                        (v, v != raw)
                    }
                    None => (raw, false),
                }
            }
            Self::Uniform(d) => (d.sample(rng), false),
            Self::Fixed(v) => (*v, false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn clamped_normal_stays_in_bounds_and_counts() {
        let s = Distribution::Normal {
            mean: 1.0,
            sd: 5.0,
            clamp: Some([0.1, 3.0]),
        }
        .sampler("wide")
        .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let draws: Vec<(f64, bool)> = (0..2000).map(|_| s.draw(&mut rng)).collect();
        assert!(draws.iter().all(|(v, _)| (0.1..=3.0).contains(v)));
        assert!(draws.iter().any(|(_, c)| *c));
    }

    #[test]
    fn lognormal_is_positive() {
        let s = Distribution::LogNormal { mu: 0.0, sigma: 0.3 }.sampler("agr").unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!((0..1000).all(|_| s.draw(&mut rng).0 > 0.0));
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert!(Distribution::Normal { mean: 1.0, sd: -1.0, clamp: None }.sampler("x").is_err());
        assert!(Distribution::Normal { mean: 1.0, sd: 0.1, clamp: Some([2.0, 1.0]) }.sampler("x").is_err());
        assert!(Distribution::Uniform { low: 1.0, high: 1.0 }.sampler("x").is_err());
        assert!(Distribution::LogNormal { mu: 0.0, sigma: f64::NAN }.sampler("x").is_err());
        assert!(Distribution::Fixed { value: f64::INFINITY }.sampler("x").is_err());
    }

    #[test]
    fn fixed_draws_are_constant() {
        let s = Distribution::Fixed { value: 1.5 }.sampler("k").unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(s.draw(&mut rng), (1.5, false));
    }

    #[test]
    fn distribution_serializes_with_family_tag() {
        let json = serde_json::to_value(Distribution::LogNormal { mu: 0.0, sigma: 0.25 }).unwrap();
        assert_eq!(json["family"], "log_normal");
    }
}
