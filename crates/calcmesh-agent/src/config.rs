//! Agent configuration (spec §4.4, §6, Part B §B3): worker count,
//! per-operator simulated latency, and the orchestrator's gRPC endpoint.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_computing_power")]
    pub computing_power: usize,
    #[serde(default = "default_time_addition_ms")]
    pub time_addition_ms: u64,
    #[serde(default = "default_time_subtraction_ms")]
    pub time_subtraction_ms: u64,
    #[serde(default = "default_time_multiplications_ms")]
    pub time_multiplications_ms: u64,
    #[serde(default = "default_time_divisions_ms")]
    pub time_divisions_ms: u64,
    #[serde(default = "default_orchestrator_endpoint")]
    pub orchestrator_endpoint: String,
}

fn default_computing_power() -> usize {
    4
}

fn default_time_addition_ms() -> u64 {
    2000
}

fn default_time_subtraction_ms() -> u64 {
    2000
}

fn default_time_multiplications_ms() -> u64 {
    5000
}

fn default_time_divisions_ms() -> u64 {
    5000
}

fn default_orchestrator_endpoint() -> String {
    "http://127.0.0.1:8081".to_string()
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            computing_power: default_computing_power(),
            time_addition_ms: default_time_addition_ms(),
            time_subtraction_ms: default_time_subtraction_ms(),
            time_multiplications_ms: default_time_multiplications_ms(),
            time_divisions_ms: default_time_divisions_ms(),
            orchestrator_endpoint: default_orchestrator_endpoint(),
        }
    }
}

impl AgentConfig {
    pub fn load() -> anyhow::Result<Self> {
        let _ = dotenvy::dotenv();

        let cfg = config::Config::builder()
            .add_source(config::Config::try_from(&AgentConfig::default())?)
            .add_source(
                config::Environment::default()
                    .try_parsing(true)
                    .list_separator(","),
            )
            .build()?;

        Ok(cfg.try_deserialize()?)
    }

    /// Latency budget for a given operation, per §4.4's configured
    /// per-operator simulated cost.
    pub fn latency_for(&self, operation: calcmesh_shared::domain::Operation) -> std::time::Duration {
        use calcmesh_shared::domain::Operation;
        let ms = match operation {
            Operation::Add => self.time_addition_ms,
            Operation::Sub => self.time_subtraction_ms,
            Operation::Mul => self.time_multiplications_ms,
            Operation::Div => self.time_divisions_ms,
            // Unary negation shares addition/subtraction's cost class; it has
            // no dedicated knob in §6's environment variable list.
            Operation::Neg => self.time_subtraction_ms,
        };
        std::time::Duration::from_millis(ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let cfg = AgentConfig::default();
        assert_eq!(cfg.computing_power, 4);
        assert_eq!(cfg.time_addition_ms, 2000);
        assert_eq!(cfg.time_subtraction_ms, 2000);
        assert_eq!(cfg.time_multiplications_ms, 5000);
        assert_eq!(cfg.time_divisions_ms, 5000);
    }
}
