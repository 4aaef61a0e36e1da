//! # Example: polling_with_attempts
//!
//! Demonstrates bounded polling on the async drain loop, with runner events
//! rendered through [`LogWriter`] and `tracing-subscriber`.
//!
//! Two probes share the runner:
//! - `link-up` becomes ready on its fourth poll and resolves.
//! - `firmware` never becomes ready and is abandoned after three attempts.
//!
//! ## Flow
//! ```text
//! TaskRunner::run()
//!   ├─► pass 1: link-up Deferred, firmware Deferred (remaining 2)
//!   ├─► sleep(retry_interval)
//!   ├─► pass 2: link-up Deferred, firmware Deferred (remaining 1)
//!   ├─► pass 3: link-up Deferred, firmware exhausted → Done (Abandoned)
//!   └─► pass 4: link-up Ready → Done
//! shutdown()
//!   └─► publish(RunnerStopped), flush subscribers
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example polling_with_attempts --features logging
//! ```

use std::{sync::Arc, time::Duration};

use deferq::{LogWriter, RunnerConfig, Subscribe, TaskRunner, make_named_task_with_attempts};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    // 1. Poll every 50ms
    let cfg = RunnerConfig {
        retry_interval: Duration::from_millis(50),
        ..RunnerConfig::default()
    };

    // 2. Attach the built-in log subscriber
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let runner = TaskRunner::builder(cfg).with_subscribers(subs).build();

    // 3. Start the drain loop
    let worker = tokio::spawn({
        let runner = Arc::clone(&runner);
        async move { runner.run().await }
    });

    // 4. Enqueue the probes
    let mut polls = 0;
    let (link, link_rx) = make_named_task_with_attempts("link-up", 10, move || {
        polls += 1;
        (polls == 4).then(|| format!("up after {polls} polls"))
    });
    let (firmware, firmware_rx) =
        make_named_task_with_attempts("firmware", 3, || None::<&'static str>);

    runner.enqueue(link)?;
    runner.enqueue(firmware)?;

    // 5. Await both results
    println!("link-up  = {:?}", link_rx.await);
    println!("firmware = {:?}", firmware_rx.await);

    // 6. Stop the loop and flush events
    runner.shutdown().await;
    worker.await?;
    Ok(())
}
