//! # Example: one_shot
//!
//! Minimal synchronous example: a few tasks, one runner, no async runtime.
//!
//! Demonstrates how to:
//! - Build tasks and their completions with [`make_named_task`].
//! - Drive the queue by hand with [`TaskRunner::drive_until_empty`].
//! - Read results with [`Completion::wait`](deferq::Completion::wait).
//!
//! ## Flow
//! ```text
//! enqueue(answer) ──► enqueue(warmup) ──► enqueue(broken)
//! drive_until_empty()
//!     ├─► answer.run()  → Some(42)  → Done
//!     ├─► warmup.run()  → None      → Deferred (back of queue)
//!     ├─► broken.run()  → Err(..)   → Done
//!     └─► warmup.run()  → Some(())  → Done
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example one_shot
//! ```

use deferq::{RunnerConfig, TaskError, TaskRunner, make_named_task};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Runner with default configuration
    let runner = TaskRunner::new(RunnerConfig::default());

    // 2. A value that is ready immediately
    let (answer, answer_rx) = make_named_task("answer", || Some(42));

    // 3. Void work that needs one extra pass
    let mut warm = false;
    let (warmup, warmup_rx) = make_named_task("warmup", move || {
        println!("[warmup] warm = {warm}");
        let ready = warm;
        warm = true;
        ready.then_some(())
    });

    // 4. Work that fails
    let (broken, broken_rx) = make_named_task("broken", || -> Result<Option<u8>, TaskError> {
        Err(TaskError::fail("sensor offline"))
    });

    runner.enqueue(answer)?;
    runner.enqueue(warmup)?;
    runner.enqueue(broken)?;

    // 5. Drive everything on this thread
    let runs = runner.drive_until_empty();
    println!("drained after {runs} runs");

    println!("answer = {:?}", answer_rx.wait());
    println!("warmup = {:?}", warmup_rx.wait());
    println!("broken = {:?}", broken_rx.wait());
    Ok(())
}
