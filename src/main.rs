/*!
 * Sham Kernel - Demo Boot
 *
 * Boots a kernel, loads a few demo processes and runs the scheduler:
 * - a counter committing one increment per quantum
 * - a spawner creating a child from inside its quantum
 * - a sleeper woken by a timer thread
 */

use std::thread;
use std::time::Duration;
use tracing::info;

use sham_kernel::core::config::ENV_SCHEDULER;
use sham_kernel::{init_tracing, Content, Kernel, KernelConfig, Policy, Status};

fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let mut config = KernelConfig::from_env()?;
    if std::env::var_os(ENV_SCHEDULER).is_none() {
        config.policy = Policy::Fcfs;
    }

    info!("Sham kernel booting...");
    let kernel = Kernel::with_config(config);

    kernel.create_process("counter", 10, 1, |ctx| {
        if ctx.pc() == 3 {
            info!(count = ?ctx.read(0).ok(), "counter done");
            return Status::Done;
        }
        let bumped = ctx.update(0, |c| Content::UInt(c.as_uint().unwrap_or(0) + 1));
        if bumped.is_ok() {
            ctx.commit();
        }
        Status::Running
    });

    kernel.create_process("spawner", 10, 0, |ctx| {
        let parent = ctx.pc();
        ctx.create_process("child", 10, 0, move |child| {
            info!(pid = child.pid(), parent_pc = parent, "child running");
            Status::Done
        });
        if parent == 1 {
            Status::Done
        } else {
            Status::Ready
        }
    });

    kernel.create_process("sleeper", 10, 0, |ctx| {
        if ctx.pc() == 0 {
            ctx.running_to_blocked();
            return Status::Running;
        }
        info!(pc = ctx.pc(), "sleeper woke up");
        Status::Done
    });

    let timer = kernel.clone();
    thread::Builder::new()
        .name("timer".to_string())
        .spawn(move || {
            thread::sleep(Duration::from_millis(200));
            timer.blocked_to_ready("sleeper");
        })?;

    let stats = kernel.run()?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    println!("{}", serde_json::to_string_pretty(&kernel.cpu().stats())?);

    Ok(())
}
