/*!
 * Kernel Configuration
 *
 * Defaults and environment overrides for a simulated kernel run.
 *
 * Environment variables:
 * - SHAM_MEMORY_SLOTS: size of the kernel-owned memory (default: 0)
 * - SHAM_IDLE_TIMEOUT_MS: how long the scheduler parks while every process
 *   is blocked before giving up, 0 waits forever (default: unset, forever)
 * - SHAM_SCHEDULER: scheduling policy, `none` or `fcfs` (default: none)
 */

use super::errors::ConfigError;
use crate::scheduler::Policy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Name of the process every fresh kernel boots with
pub const NOOP_PROCESS_NAME: &str = "noop";

/// Priority of the boot no-op process
pub const NOOP_PRIORITY: u8 = 0;

pub const ENV_MEMORY_SLOTS: &str = "SHAM_MEMORY_SLOTS";
pub const ENV_IDLE_TIMEOUT_MS: &str = "SHAM_IDLE_TIMEOUT_MS";
pub const ENV_SCHEDULER: &str = "SHAM_SCHEDULER";

/// Kernel configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct KernelConfig {
    /// Slots in the kernel-owned memory
    pub memory_slots: usize,
    /// `None` parks forever; a bound turns a late wake-up into a stall error
    #[serde(with = "optional_duration_millis")]
    pub idle_timeout: Option<Duration>,
    pub policy: Policy,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            memory_slots: 0,
            idle_timeout: None,
            policy: Policy::None,
        }
    }
}

impl KernelConfig {
    /// Build a configuration from defaults overridden by `SHAM_*` variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_MEMORY_SLOTS) {
            config.memory_slots = parse(ENV_MEMORY_SLOTS, &raw)?;
        }

        if let Some(raw) = lookup(ENV_IDLE_TIMEOUT_MS) {
            let millis: u64 = parse(ENV_IDLE_TIMEOUT_MS, &raw)?;
            config.idle_timeout = (millis > 0).then(|| Duration::from_millis(millis));
        }

        if let Some(raw) = lookup(ENV_SCHEDULER) {
            config.policy = raw.parse().map_err(|_| invalid(ENV_SCHEDULER, &raw))?;
        }

        Ok(config)
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn with_memory_slots(mut self, slots: usize) -> Self {
        self.memory_slots = slots;
        self
    }
}

fn parse<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| invalid(key, raw))
}

fn invalid(key: &str, raw: &str) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        value: raw.to_string(),
    }
}

/// Serialize Option<Duration> as Option<milliseconds>
mod optional_duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(d) => serializer.serialize_some(&(d.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt = Option::<u64>::deserialize(deserializer)?;
        Ok(opt.map(Duration::from_millis))
    }
}
