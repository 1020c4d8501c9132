/*!
 * Configuration Tests
 * Environment-driven kernel configuration
 */

use pretty_assertions::assert_eq;
use serial_test::serial;
use sham_kernel::core::config::{ENV_IDLE_TIMEOUT_MS, ENV_MEMORY_SLOTS, ENV_SCHEDULER};
use sham_kernel::{ConfigError, Kernel, KernelConfig, Policy, Status};
use std::time::Duration;

fn clear_env() {
    for key in [ENV_MEMORY_SLOTS, ENV_IDLE_TIMEOUT_MS, ENV_SCHEDULER] {
        std::env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_from_env_builds_fcfs_kernel() {
    clear_env();
    std::env::set_var(ENV_SCHEDULER, "fcfs");
    std::env::set_var(ENV_MEMORY_SLOTS, "4");
    std::env::set_var(ENV_IDLE_TIMEOUT_MS, "1500");

    let config = KernelConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.policy, Policy::Fcfs);
    assert_eq!(config.memory_slots, 4);
    assert_eq!(config.idle_timeout, Some(Duration::from_millis(1500)));

    let kernel = Kernel::with_config(config);
    kernel.create_process("twice", 1, 0, |ctx| {
        if ctx.pc() == 1 {
            Status::Done
        } else {
            Status::Running
        }
    });

    let stats = kernel.run().unwrap();
    assert_eq!(stats.policy, Policy::Fcfs);
    assert_eq!(stats.quanta, 3);
    assert_eq!(kernel.memory().len(), 4);
}

#[test]
#[serial]
fn test_from_env_rejects_unknown_policy() {
    clear_env();
    std::env::set_var(ENV_SCHEDULER, "lottery");

    let err = KernelConfig::from_env().unwrap_err();
    clear_env();

    assert_eq!(
        err,
        ConfigError::Invalid {
            key: ENV_SCHEDULER.to_string(),
            value: "lottery".to_string(),
        }
    );
}

#[test]
#[serial]
fn test_from_env_defaults() {
    clear_env();
    assert_eq!(KernelConfig::from_env().unwrap(), KernelConfig::default());
}
