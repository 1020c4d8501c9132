/*!
 * Interrupt Tests
 * CPU cancel on ready and blocked queues, alone and concurrent with a run
 */

use pretty_assertions::assert_eq;
use sham_kernel::{FcfsScheduler, Kernel, Status};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn park_one(kernel: &Kernel) {
    let procs = kernel.processes();
    let process = procs.dispatch().unwrap();
    procs.settle(process, Status::Blocked);
}

#[test]
fn test_cancel_ready_touches_only_ready_queue() {
    let kernel = Kernel::new();
    for i in 0..4 {
        kernel.create_process(format!("p{}", i), 1, 0, |_| Status::Running);
    }
    // noop goes to the blocked set
    park_one(&kernel);
    let procs = kernel.processes();
    assert_eq!(procs.ready_len(), 4);

    assert_eq!(kernel.cpu().cancel(Status::Ready), 4);
    assert_eq!(procs.ready_pids(), vec![2, 3, 4, 5]);
    assert_eq!(procs.blocked_pids(), vec![1]);
    assert_eq!(procs.info(1).unwrap().status, Status::Blocked);
}

#[test]
fn test_cancel_ready_to_blocked_then_forced_wake() {
    let kernel = Kernel::new();
    kernel.create_process("a", 1, 0, |_| Status::Running);
    park_one(&kernel);

    let cpu = kernel.cpu();
    let procs = kernel.processes();

    assert_eq!(cpu.cancel(Status::Blocked), 1);
    assert_eq!(procs.ready_len(), 0);
    assert_eq!(procs.blocked_len(), 2);

    assert_eq!(cpu.cancel_blocked(Status::Ready), 2);
    assert_eq!(procs.ready_pids(), vec![1, 2]);
    assert_eq!(cpu.stats().interrupts, 2);
}

#[test]
fn test_cancel_blocked_done_lets_fcfs_finish() {
    let kernel = Kernel::new().with_scheduler(FcfsScheduler::new());
    kernel.create_process("stuck", 1, 0, |_| Status::Blocked);

    let killer = kernel.clone();
    let handle = thread::spawn(move || {
        while killer.processes().blocked_len() == 0 {
            thread::sleep(Duration::from_millis(5));
        }
        killer.cpu().cancel_blocked(Status::Done)
    });

    kernel.run().unwrap();

    assert_eq!(handle.join().unwrap(), 1);
    assert!(kernel.processes().is_empty());
}

#[test]
fn test_shutdown_interrupt_during_run() {
    let kernel = Kernel::new().with_scheduler(FcfsScheduler::new());
    for name in ["spin1", "spin2"] {
        kernel.create_process(name, 1, 0, |_| {
            thread::sleep(Duration::from_millis(1));
            Status::Running
        });
    }

    let shutdown = kernel.clone();
    let handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(30));
        let mut cancelled = 0;
        while !shutdown.processes().is_empty() {
            cancelled += shutdown.cpu().cancel(Status::Done);
            thread::sleep(Duration::from_millis(2));
        }
        cancelled
    });

    kernel.run().unwrap();

    assert_eq!(handle.join().unwrap(), 2);
    assert!(kernel.processes().is_empty());
}

#[test]
fn test_block_and_wake_storm_does_not_corrupt_queues() {
    let kernel = Kernel::new().with_scheduler(FcfsScheduler::new());
    for i in 0..8 {
        kernel.create_process(format!("worker{}", i), 1, 1, |ctx| {
            if ctx.pc() % 3 == 0 {
                ctx.running_to_blocked();
            }
            if ctx.pc() == 20 {
                Status::Done
            } else {
                Status::Running
            }
        });
    }

    let stop = Arc::new(AtomicBool::new(false));
    let storm = {
        let kernel = kernel.clone();
        let stop = stop.clone();
        thread::spawn(move || {
            while !stop.load(Ordering::SeqCst) {
                kernel.cpu().cancel(Status::Blocked);
                kernel.cpu().cancel_blocked(Status::Ready);
                thread::yield_now();
            }
        })
    };

    let stats = kernel.run().unwrap();
    stop.store(true, Ordering::SeqCst);
    storm.join().unwrap();

    // noop + 8 workers
    assert_eq!(stats.exited, 9);
    assert!(kernel.processes().is_empty());
    assert_eq!(kernel.processes().ready_len(), 0);
    assert_eq!(kernel.processes().blocked_len(), 0);
}
