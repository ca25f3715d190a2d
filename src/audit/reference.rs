use super::tier::Tier;
use serde::{Deserialize, Serialize};

/// Market rent reference for one tier, in local currency per m².
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketBenchmark {
    pub average_real_cost_per_area: f64,
    pub average_market_cost_per_area: f64,
    pub deviation_percent: f64,
    pub status: String,
}

/// Tier norms used to normalize efficiency ratios.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierMedians {
    pub cost_per_pax: f64,
    pub cost_per_area: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierReference {
    pub tier: Tier,
    #[serde(default)]
    pub benchmark: Option<MarketBenchmark>,
    #[serde(default)]
    pub medians: Option<TierMedians>,
}

/// Read-only reference data shared by the benchmark and efficiency engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceTables {
    tiers: Vec<TierReference>,
}

impl ReferenceTables {
    pub fn new(tiers: Vec<TierReference>) -> Self {
        Self { tiers }
    }

    /// Reference values from the portfolio audit report.
    ///
    /// Tier 1 venues have no comparable listings, so no market benchmark.
    pub fn builtin() -> Self {
        Self::new(vec![
            TierReference {
                tier: Tier::ONE,
                benchmark: None,
                medians: Some(TierMedians {
                    cost_per_pax: 15_000.0,
                    cost_per_area: 45_000.0,
                }),
            },
            TierReference {
                tier: Tier::TWO,
                benchmark: Some(benchmark(21_137.0, 25_531.0, -17.2, "Eficiente")),
                medians: Some(TierMedians {
                    cost_per_pax: 10_000.0,
                    cost_per_area: 25_531.0,
                }),
            },
            TierReference {
                tier: Tier::THREE,
                benchmark: Some(benchmark(37_415.0, 18_972.0, 97.2, "Analizar")),
                medians: Some(TierMedians {
                    cost_per_pax: 7_500.0,
                    cost_per_area: 18_972.0,
                }),
            },
            TierReference {
                tier: Tier::FOUR,
                benchmark: Some(benchmark(19_329.0, 8_990.0, 115.0, "Analizar")),
                medians: Some(TierMedians {
                    cost_per_pax: 5_000.0,
                    cost_per_area: 8_990.0,
                }),
            },
            TierReference {
                tier: Tier::FIVE,
                benchmark: Some(benchmark(13_224.0, 2_960.0, 346.8, "Analizar")),
                medians: Some(TierMedians {
                    cost_per_pax: 3_000.0,
                    cost_per_area: 2_960.0,
                }),
            },
        ])
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn tier(&self, tier: Tier) -> Option<&TierReference> {
        self.tiers.iter().find(|entry| entry.tier == tier)
    }

    pub fn benchmark(&self, tier: Tier) -> Option<&MarketBenchmark> {
        self.tier(tier).and_then(|entry| entry.benchmark.as_ref())
    }

    pub fn medians(&self, tier: Tier) -> Option<&TierMedians> {
        self.tier(tier).and_then(|entry| entry.medians.as_ref())
    }
}

impl Default for ReferenceTables {
    fn default() -> Self {
        Self::builtin()
    }
}

fn benchmark(real: f64, market: f64, deviation: f64, status: &str) -> MarketBenchmark {
    MarketBenchmark {
        average_real_cost_per_area: real,
        average_market_cost_per_area: market,
        deviation_percent: deviation,
        status: status.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_cover_every_tier_with_medians() {
        let tables = ReferenceTables::builtin();
        for tier in Tier::ordered() {
            assert!(tables.medians(tier).is_some(), "{tier} medians missing");
        }
        assert!(tables.benchmark(Tier::ONE).is_none());
        assert_eq!(
            tables
                .benchmark(Tier::THREE)
                .map(|entry| entry.average_market_cost_per_area),
            Some(18_972.0)
        );
    }

    #[test]
    fn tables_load_from_json() {
        let raw = r#"{"tiers":[{"tier":3,"benchmark":{"average_real_cost_per_area":15000.0,"average_market_cost_per_area":10000.0,"deviation_percent":50.0,"status":"Analizar"}}]}"#;
        let tables = ReferenceTables::from_json(raw).expect("valid tables");
        assert_eq!(
            tables
                .benchmark(Tier::THREE)
                .map(|entry| entry.average_market_cost_per_area),
            Some(10_000.0)
        );
        assert!(tables.medians(Tier::THREE).is_none());
        assert!(tables.benchmark(Tier::TWO).is_none());
    }

    #[test]
    fn json_with_invalid_tier_is_rejected() {
        let raw = r#"{"tiers":[{"tier":7}]}"#;
        assert!(ReferenceTables::from_json(raw).is_err());
    }
}
