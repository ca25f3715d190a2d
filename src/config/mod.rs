use crate::audit::{
    AuditSettings, ExchangeRate, ReferenceTables, ScoreWeights, StrategicWeights, WeightsError,
};
use std::env;
use std::fmt;
use std::sync::Arc;

const SCORE_WEIGHTS_VAR: &str = "APP_SCORE_WEIGHTS";
const STRATEGIC_WEIGHTS_VAR: &str = "APP_STRATEGIC_WEIGHTS";

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub audit: AuditConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let exchange_rate = match env::var("APP_USD_ARS_RATE") {
            Ok(raw) => parse_exchange_rate(&raw)?,
            Err(_) => ExchangeRate::default(),
        };

        let score_weights = match env::var(SCORE_WEIGHTS_VAR) {
            Ok(raw) => {
                let [margin, incidence, per_event, per_guest] =
                    parse_weights(SCORE_WEIGHTS_VAR, &raw)?;
                ScoreWeights::new(margin, incidence, per_event, per_guest)
                    .map_err(|err| ConfigError::weights(SCORE_WEIGHTS_VAR, err))?
            }
            Err(_) => ScoreWeights::default(),
        };

        let strategic_weights = match env::var(STRATEGIC_WEIGHTS_VAR) {
            Ok(raw) => {
                let [performance, benchmarking, efficiency, audit] =
                    parse_weights(STRATEGIC_WEIGHTS_VAR, &raw)?;
                StrategicWeights::new(performance, benchmarking, efficiency, audit)
                    .map_err(|err| ConfigError::weights(STRATEGIC_WEIGHTS_VAR, err))?
            }
            Err(_) => StrategicWeights::default(),
        };

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            audit: AuditConfig {
                exchange_rate,
                score_weights,
                strategic_weights,
            },
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Scoring knobs shared by every audit run.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    pub exchange_rate: ExchangeRate,
    pub score_weights: ScoreWeights,
    pub strategic_weights: StrategicWeights,
}

impl AuditConfig {
    pub fn settings(&self, tables: Arc<ReferenceTables>) -> AuditSettings {
        AuditSettings {
            score_weights: self.score_weights,
            strategic_weights: self.strategic_weights,
            exchange_rate: Some(self.exchange_rate),
            tables,
        }
    }
}

fn parse_exchange_rate(raw: &str) -> Result<ExchangeRate, ConfigError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .and_then(|rate| ExchangeRate::new(rate).ok())
        .ok_or_else(|| ConfigError::InvalidExchangeRate {
            value: raw.to_string(),
        })
}

fn parse_weights(variable: &'static str, raw: &str) -> Result<[f64; 4], ConfigError> {
    let values = raw
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|_| ConfigError::InvalidWeights {
                    variable,
                    reason: format!("'{}' is not a number", part.trim()),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    <[f64; 4]>::try_from(values).map_err(|values| ConfigError::InvalidWeights {
        variable,
        reason: format!("expected 4 comma-separated weights, got {}", values.len()),
    })
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidExchangeRate { value: String },
    InvalidWeights { variable: &'static str, reason: String },
}

impl ConfigError {
    fn weights(variable: &'static str, err: WeightsError) -> Self {
        Self::InvalidWeights {
            variable,
            reason: err.to_string(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidExchangeRate { value } => write!(
                f,
                "APP_USD_ARS_RATE must be a positive number, got '{}'",
                value
            ),
            ConfigError::InvalidWeights { variable, reason } => {
                write!(f, "{} is invalid: {}", variable, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
