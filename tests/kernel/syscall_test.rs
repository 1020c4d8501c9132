/*!
 * System Call Tests
 * Commit semantics, process spawning, and block/wake from process code
 */

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use sham_kernel::{Content, FcfsScheduler, Kernel, Status};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn test_committed_counter_survives_quanta() {
    let kernel = Kernel::new().with_scheduler(FcfsScheduler::new());
    let final_value = Arc::new(Mutex::new(None));

    let observed = final_value.clone();
    let pid = kernel.create_process("counter", 10, 1, move |ctx| {
        if ctx.pc() == 3 {
            *observed.lock() = ctx.read(0).ok().cloned();
            return Status::Done;
        }
        ctx.update(0, |c| Content::Int(c.as_int().unwrap_or(0) + 1))
            .unwrap();
        ctx.commit();
        Status::Running
    });

    kernel.run().unwrap();

    assert_eq!(*final_value.lock(), Some(Content::Int(3)));
    assert!(!kernel.processes().contains(pid));
}

#[test]
fn test_uncommitted_writes_never_visible_later() {
    let kernel = Kernel::new().with_scheduler(FcfsScheduler::new());
    let seen = Arc::new(Mutex::new(Vec::new()));

    let log = seen.clone();
    kernel.create_process("forgetful", 10, 1, move |ctx| {
        log.lock().push(ctx.read(0).unwrap().clone());
        match ctx.pc() {
            0 => {
                ctx.write(0, "committed").unwrap();
                ctx.commit();
                Status::Running
            }
            1 => {
                ctx.write(0, "dropped").unwrap();
                Status::Running
            }
            _ => Status::Done,
        }
    });

    kernel.run().unwrap();

    assert_eq!(
        *seen.lock(),
        vec![
            Content::Empty,
            Content::from("committed"),
            Content::from("committed"),
        ]
    );
    assert_eq!(kernel.cpu().stats().discarded_writes, 1);
}

#[test]
fn test_map_content_round_trips_between_quanta() {
    let kernel = Kernel::new().with_scheduler(FcfsScheduler::new());
    let power = Arc::new(AtomicU64::new(0));

    let out = power.clone();
    kernel.create_process("power", 10, 1, move |ctx| {
        if ctx.read(0).unwrap().is_empty() {
            let mut map = BTreeMap::new();
            map.insert("power".to_string(), Content::UInt(1));
            ctx.write(0, map).unwrap();
            ctx.commit();
        }
        if ctx.pc() == 3 {
            let map = ctx.read(0).unwrap().as_map().unwrap();
            out.store(map["power"].as_uint().unwrap(), Ordering::SeqCst);
            return Status::Done;
        }
        ctx.update(0, |c| {
            let mut next = c.clone();
            if let Some(Content::UInt(v)) = next.as_map_mut().and_then(|m| m.get_mut("power")) {
                *v <<= 1;
            }
            next
        })
        .unwrap();
        ctx.commit();
        Status::Running
    });

    kernel.run().unwrap();
    assert_eq!(power.load(Ordering::SeqCst), 8);
}

#[test]
fn test_child_runs_after_parent_quantum() {
    let kernel = Kernel::new().with_scheduler(FcfsScheduler::new());
    let trace = Arc::new(Mutex::new(Vec::new()));

    let parent_trace = trace.clone();
    let parent = kernel.create_process("A", 10, 0, move |ctx| {
        parent_trace.lock().push("A:start");
        let child_trace = parent_trace.clone();
        let child = ctx.create_process("B", 10, 0, move |_| {
            child_trace.lock().push("B");
            Status::Done
        });
        assert!(ctx.os().contains(child));
        parent_trace.lock().push("A:end");
        Status::Done
    });

    let stats = kernel.run().unwrap();

    assert_eq!(*trace.lock(), vec!["A:start", "A:end", "B"]);
    assert!(!kernel.processes().contains(parent));
    // noop, A, B
    assert_eq!(stats.exited, 3);
}

#[test]
fn test_spawning_every_quantum() {
    let kernel = Kernel::new().with_scheduler(FcfsScheduler::new());
    let children = Arc::new(AtomicU64::new(0));

    let counter = children.clone();
    kernel.create_process("forker", 10, 0, move |ctx| {
        if ctx.pc() == 30 {
            return Status::Done;
        }
        let counter = counter.clone();
        ctx.create_process(format!("sub{}", ctx.pc()), 10, 0, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Status::Done
        });
        Status::Running
    });

    kernel.run().unwrap();

    assert_eq!(children.load(Ordering::SeqCst), 30);
    assert!(kernel.processes().is_empty());
}

#[test]
fn test_block_then_external_wake_resumes_at_same_pc() {
    let kernel = Kernel::new().with_scheduler(FcfsScheduler::new());
    let resumed_at = Arc::new(Mutex::new(None));

    let resumed = resumed_at.clone();
    let pid = kernel.create_process("A", 10, 1, move |ctx| {
        if ctx.pc() == 0 {
            ctx.running_to_blocked();
            return Status::Running;
        }
        resumed.lock().get_or_insert(ctx.pc());
        if ctx.pc() == 3 {
            Status::Done
        } else {
            Status::Running
        }
    });

    let waker = kernel.clone();
    let handle = thread::spawn(move || {
        while waker.processes().blocked_len() == 0 {
            thread::sleep(Duration::from_millis(5));
        }
        let blocked_pc = waker.processes().info(pid).unwrap().pc;
        thread::sleep(Duration::from_millis(50));
        assert!(waker.blocked_to_ready("A"));
        blocked_pc
    });

    kernel.run().unwrap();
    let blocked_pc = handle.join().unwrap();

    assert_eq!(blocked_pc, 1);
    assert_eq!(*resumed_at.lock(), Some(blocked_pc));
    assert!(!kernel.processes().contains(pid));
}

#[test]
fn test_block_request_through_kernel_handle() {
    let kernel = Kernel::new().with_scheduler(FcfsScheduler::new());
    let os = kernel.clone();

    kernel.create_process("self-blocking", 10, 0, move |ctx| {
        if ctx.pc() == 0 {
            assert!(os.running_to_blocked());
            // more system calls in the same quantum after asking to block
            ctx.create_process("helper", 10, 0, |ctx| {
                ctx.blocked_to_ready("self-blocking");
                Status::Done
            });
            Status::Ready
        } else {
            Status::Done
        }
    });

    let stats = kernel.run().unwrap();

    assert_eq!(stats.blocked, 1);
    assert!(kernel.processes().is_empty());
}

#[test]
fn test_blocking_while_done_exits() {
    let kernel = Kernel::new().with_scheduler(FcfsScheduler::new());
    kernel.create_process("quitter", 10, 0, |ctx| {
        ctx.running_to_blocked();
        Status::Done
    });

    let stats = kernel.run().unwrap();

    assert_eq!(stats.blocked, 0);
    assert_eq!(stats.exited, 2);
}

#[test]
fn test_zero_slot_process() {
    let kernel = Kernel::new().with_scheduler(FcfsScheduler::new());
    let pid = kernel.create_process("stateless", 10, 0, |ctx| {
        assert!(ctx.memory().is_empty());
        assert!(ctx.write(0, 1i64).is_err());
        Status::Done
    });

    assert_eq!(kernel.processes().info(pid).unwrap().memory_slots, 0);
    kernel.run().unwrap();
}

#[test]
fn test_dispatch_from_process_code_is_refused() {
    let kernel = Kernel::new().with_scheduler(FcfsScheduler::new());
    let trace = Arc::new(Mutex::new(Vec::new()));

    let a_trace = trace.clone();
    let a = kernel.create_process("A", 10, 0, move |ctx| {
        if ctx.pc() == 1 {
            a_trace.lock().push("A:woken".to_string());
            return Status::Done;
        }
        ctx.running_to_blocked();
        let stolen = ctx.os().dispatch().map(|p| p.name().to_string());
        a_trace.lock().push(format!("A:stole {:?}", stolen));
        assert_eq!(ctx.os().running(), Some(ctx.pid()));
        Status::Running
    });

    let b_trace = trace.clone();
    let b = kernel.create_process("B", 10, 0, move |ctx| {
        b_trace.lock().push("B".to_string());
        assert!(ctx.blocked_to_ready("A"));
        Status::Done
    });

    let stats = kernel.run().unwrap();

    assert_eq!(*trace.lock(), vec!["A:stole None", "B", "A:woken"]);
    assert_eq!(stats.blocked, 1);
    // noop, A, B
    assert_eq!(stats.exited, 3);
    assert!(!kernel.processes().contains(a));
    assert!(!kernel.processes().contains(b));
}
