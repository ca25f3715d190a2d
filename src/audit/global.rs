use super::performance::{validate_weight, WeightsError};
use super::semaphore::SemaphoreColor;
use serde::{Deserialize, Serialize};

/// Importance of each semaphore in the overall venue verdict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStrategicWeights")]
pub struct StrategicWeights {
    performance: f64,
    benchmarking: f64,
    efficiency: f64,
    audit: f64,
}

#[derive(Deserialize)]
struct RawStrategicWeights {
    performance: f64,
    benchmarking: f64,
    efficiency: f64,
    audit: f64,
}

impl TryFrom<RawStrategicWeights> for StrategicWeights {
    type Error = WeightsError;

    fn try_from(raw: RawStrategicWeights) -> Result<Self, Self::Error> {
        StrategicWeights::new(raw.performance, raw.benchmarking, raw.efficiency, raw.audit)
    }
}

impl StrategicWeights {
    pub fn new(
        performance: f64,
        benchmarking: f64,
        efficiency: f64,
        audit: f64,
    ) -> Result<Self, WeightsError> {
        Ok(Self {
            performance: validate_weight("performance", performance)?,
            benchmarking: validate_weight("benchmarking", benchmarking)?,
            efficiency: validate_weight("efficiency", efficiency)?,
            audit: validate_weight("audit", audit)?,
        })
    }
}

impl Default for StrategicWeights {
    fn default() -> Self {
        Self {
            performance: 40.0,
            benchmarking: 25.0,
            efficiency: 20.0,
            audit: 15.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlobalVerdict {
    Efficient,
    Watch,
    Renegotiate,
    UrgentAction,
    Unweighted,
}

impl GlobalVerdict {
    pub fn from_score(score: f64) -> Self {
        if score >= 8.5 {
            Self::Efficient
        } else if score >= 5.0 {
            Self::Watch
        } else if score >= 2.5 {
            Self::Renegotiate
        } else {
            Self::UrgentAction
        }
    }

    pub const fn color(self) -> SemaphoreColor {
        match self {
            Self::Efficient => SemaphoreColor::Green,
            Self::Watch => SemaphoreColor::Yellow,
            Self::Renegotiate => SemaphoreColor::Red,
            Self::UrgentAction => SemaphoreColor::Critical,
            Self::Unweighted => SemaphoreColor::Gray,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Efficient => "Salón Eficiente",
            Self::Watch => "Atención / Seguimiento",
            Self::Renegotiate => "Analizar Renegociación",
            Self::UrgentAction => "Acción Urgente",
            Self::Unweighted => "Sin Ponderación",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Efficient => {
                "Operación saludable. Cumple con los estándares de rentabilidad y mercado."
            }
            Self::Watch => {
                "Desvíos menores detectados. Monitorear evolución antes de tomar decisiones."
            }
            Self::Renegotiate => {
                "Múltiples indicadores fuera de mercado. El activo es ineficiente respecto a la competencia."
            }
            Self::UrgentAction => {
                "Rentabilidad comprometida. Requiere renegociación inmediata o revisión de costos."
            }
            Self::Unweighted => "Sin indicadores ponderables para calcular el estatus.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalStatus {
    pub verdict: GlobalVerdict,
    pub weighted_score: Option<f64>,
    pub color: SemaphoreColor,
}

/// Points a semaphore contributes to the verdict; gray has none.
pub fn color_points(color: SemaphoreColor) -> Option<f64> {
    match color {
        SemaphoreColor::Green => Some(10.0),
        SemaphoreColor::Yellow => Some(5.0),
        SemaphoreColor::Red => Some(2.0),
        SemaphoreColor::Critical => Some(0.0),
        SemaphoreColor::Gray => None,
    }
}

/// Weighted verdict over the four semaphores, skipping gray dimensions.
pub fn global_status(
    performance: SemaphoreColor,
    benchmarking: SemaphoreColor,
    efficiency: SemaphoreColor,
    audit: SemaphoreColor,
    weights: &StrategicWeights,
) -> GlobalStatus {
    let dimensions = [
        (performance, weights.performance),
        (benchmarking, weights.benchmarking),
        (efficiency, weights.efficiency),
        (audit, weights.audit),
    ];

    let (weighted, total_weight) = dimensions
        .iter()
        .filter_map(|(color, weight)| color_points(*color).map(|points| (points, *weight)))
        .fold((0.0, 0.0), |(sum, total), (points, weight)| {
            (sum + points * weight, total + weight)
        });

    if total_weight <= 0.0 {
        let verdict = GlobalVerdict::Unweighted;
        return GlobalStatus {
            verdict,
            weighted_score: None,
            color: verdict.color(),
        };
    }

    let score = weighted / total_weight;
    let verdict = GlobalVerdict::from_score(score);
    GlobalStatus {
        verdict,
        weighted_score: Some(score),
        color: verdict.color(),
    }
}
