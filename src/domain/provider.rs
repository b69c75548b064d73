use crate::error::PaymentError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// The closed set of payment rails the product can dispatch to.
///
/// Unknown string keys are rejected at the parsing boundary; everything
/// past it works with this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKey {
    Qris,
    Gopay,
    Dana,
}

impl ProviderKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Qris => "qris",
            Self::Gopay => "gopay",
            Self::Dana => "dana",
        }
    }
}

impl fmt::Display for ProviderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKey {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "qris" => Ok(Self::Qris),
            "gopay" => Ok(Self::Gopay),
            "dana" => Ok(Self::Dana),
            other => Err(PaymentError::UnknownProvider(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Active,
    ComingSoon,
}

/// Capability listing entry for one provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    pub key: ProviderKey,
    pub display_name: String,
    pub features: Vec<String>,
    pub availability: Availability,
}

/// Rolling request history used to rank providers for auto-selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProviderHealth {
    requests: u64,
    successes: u64,
    total_latency_ms: u64,
}

impl ProviderHealth {
    pub fn record(&mut self, latency: Duration, success: bool) {
        self.requests += 1;
        if success {
            self.successes += 1;
        }
        self.total_latency_ms += latency.as_millis() as u64;
    }

    /// Untried providers score as if perfect so fresh rails are not
    /// starved before their first request.
    pub fn success_rate(&self) -> f64 {
        if self.requests == 0 {
            1.0
        } else {
            self.successes as f64 / self.requests as f64
        }
    }

    pub fn avg_latency_ms(&self) -> u64 {
        if self.requests == 0 {
            0
        } else {
            self.total_latency_ms / self.requests
        }
    }
}

/// Picks the best provider from `(key, health)` pairs: success rate
/// first, mean latency second, key order last.
///
/// Pure ranking over the given metrics, so identical inputs always pick
/// the same provider.
pub fn rank_providers(candidates: &[(ProviderKey, ProviderHealth)]) -> Option<ProviderKey> {
    candidates
        .iter()
        .min_by(|(key_a, health_a), (key_b, health_b)| {
            health_b
                .success_rate()
                .total_cmp(&health_a.success_rate())
                .then_with(|| health_a.avg_latency_ms().cmp(&health_b.avg_latency_ms()))
                .then_with(|| key_a.cmp(key_b))
        })
        .map(|(key, _)| *key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn health(requests: u64, successes: u64, total_latency_ms: u64) -> ProviderHealth {
        ProviderHealth {
            requests,
            successes,
            total_latency_ms,
        }
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = "nonexistent".parse::<ProviderKey>().unwrap_err();
        assert!(matches!(err, PaymentError::UnknownProvider(_)));
        assert_eq!("qris".parse::<ProviderKey>().unwrap(), ProviderKey::Qris);
    }

    #[test]
    fn test_ranking_prefers_success_rate() {
        let winner = rank_providers(&[
            (ProviderKey::Qris, health(10, 5, 100)),
            (ProviderKey::Gopay, health(10, 9, 5_000)),
        ]);
        assert_eq!(winner, Some(ProviderKey::Gopay));
    }

    #[test]
    fn test_ranking_breaks_success_tie_on_latency() {
        let winner = rank_providers(&[
            (ProviderKey::Qris, health(10, 10, 5_000)),
            (ProviderKey::Gopay, health(10, 10, 1_000)),
        ]);
        assert_eq!(winner, Some(ProviderKey::Gopay));
    }

    #[test]
    fn test_ranking_breaks_full_tie_on_key_order() {
        let winner = rank_providers(&[
            (ProviderKey::Dana, health(10, 10, 1_000)),
            (ProviderKey::Qris, health(10, 10, 1_000)),
        ]);
        assert_eq!(winner, Some(ProviderKey::Qris));
    }

    #[test]
    fn test_ranking_is_deterministic() {
        let candidates = [
            (ProviderKey::Qris, health(100, 80, 20_000)),
            (ProviderKey::Gopay, health(50, 40, 9_000)),
            (ProviderKey::Dana, ProviderHealth::default()),
        ];
        let first = rank_providers(&candidates);
        for _ in 0..10 {
            assert_eq!(rank_providers(&candidates), first);
        }
    }

    #[test]
    fn test_empty_candidates_rank_to_none() {
        assert_eq!(rank_providers(&[]), None);
    }

    #[test]
    fn test_health_accumulates() {
        let mut health = ProviderHealth::default();
        assert_eq!(health.success_rate(), 1.0);
        assert_eq!(health.avg_latency_ms(), 0);

        health.record(Duration::from_millis(100), true);
        health.record(Duration::from_millis(300), false);

        assert_eq!(health.success_rate(), 0.5);
        assert_eq!(health.avg_latency_ms(), 200);
    }
}
