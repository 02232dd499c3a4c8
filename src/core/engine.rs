//! # CycleEngine: the per-bridge scheduling worker.
//!
//! Drives one infinite loop, each iteration representing one cycle of the
//! global control clock, until the bridge is shut down.
//!
//! ## State machine per iteration
//! ```text
//! loop {
//!   ├─► INIT           while init_pending: protocol.initialize()
//!   │                    ├─ Ok  → clear flag, release gate
//!   │                    └─ Err → wait gate (≤ init_retry_wait), retry
//!   ├─► SNAPSHOT       CycleTasks::collect(registry)
//!   ├─► READ WINDOW    sleep until next_cycle_start - margin - Σ(required)
//!   │                  run every mandatory read, strictly in list order
//!   ├─► EARLY WINDOW   opportunistic reads until cycle_start
//!   │                    + required_time + margin
//!   ├─► WRITE WAIT     poll trigger every write_poll; on set run all
//!   │                  writes, then clear the trigger
//!   ├─► LATE WINDOW    opportunistic reads until the next read window
//!   └─► SUCCESS        reset backoff
//! }
//! on task error: abort remaining steps, log, sleep backoff (2s, 3s, ...,
//! capped 60s), restart from INIT — failures may be connection-level.
//! ```
//!
//! ## Rules
//! - Tasks run **strictly sequentially** within one bridge; never parallel.
//! - Mandatory reads always precede writes within a cycle; writes always
//!   precede the late opportunistic window.
//! - The write trigger is consumed at most once per cycle.
//! - Deadlines are advisory: an infeasible read window is logged, not fatal.
//! - Shutdown is observed at the top of the loop only; an in-flight cycle
//!   (including a blocked write-wait) runs to completion first.

use std::sync::{atomic::Ordering, Arc};

use tokio::time::{self, Instant};

use crate::core::bridge::BridgeShared;
use crate::core::catalog::CycleTasks;
use crate::core::timing;
use crate::error::TaskError;
use crate::events::{Event, EventKind};
use crate::policies::RetryBackoff;
use crate::tasks::TaskRef;

/// The scheduling worker of one bridge.
///
/// Owns the engine-local state that survives across cycles: the failure
/// backoff and the opportunistic-read cursor. Everything else lives in
/// [`BridgeShared`] because external callers mutate it concurrently.
pub(crate) struct CycleEngine {
    shared: Arc<BridgeShared>,
    /// Position in the optional-read list; persists across cycles so every
    /// optional task eventually gets a turn even when no single cycle has
    /// idle time for all of them. Never reset except by wraparound.
    cursor: usize,
    backoff: RetryBackoff,
}

impl CycleEngine {
    pub(crate) fn new(shared: Arc<BridgeShared>) -> Self {
        let backoff = RetryBackoff::new(shared.cfg.backoff_base, shared.cfg.backoff_cap);
        Self {
            shared,
            cursor: 0,
            backoff,
        }
    }

    /// Runs the engine until shutdown, then disposes the protocol.
    pub(crate) async fn run(mut self) {
        self.shared.init_pending.store(true, Ordering::SeqCst);
        while !self.shared.cancel.is_cancelled() {
            match self.run_cycle().await {
                Ok(()) => {
                    self.backoff.reset();
                    self.publish(Event::now(EventKind::CycleCompleted));
                }
                Err(err) => {
                    log::error!(
                        "[{}] cycle failed, retrying later: {err}",
                        self.shared.name
                    );
                    self.publish(Event::now(EventKind::CycleFailed).with_reason(err.to_string()));
                    // Failures may be connection-level: force a fresh
                    // initialize() before the next cycle.
                    self.shared.init_pending.store(true, Ordering::SeqCst);
                    let delay = self.backoff.next();
                    self.publish(Event::now(EventKind::BackoffScheduled).with_delay(delay));
                    timing::sleep_until(Instant::now() + delay).await;
                }
            }
        }
        self.shared.protocol.dispose().await;
        log::debug!("[{}] cycle engine stopped", self.shared.name);
        self.publish(Event::now(EventKind::BridgeStopped));
    }

    /// One cycle iteration. Any task error aborts the remaining steps.
    async fn run_cycle(&mut self) -> Result<(), TaskError> {
        self.initialize().await;

        // Point-in-time view; devices attached after this affect only later
        // cycles.
        let tasks = CycleTasks::collect(&self.shared.registry);

        self.mandatory_reads(&tasks).await?;

        // Early opportunistic window, bounded by the write deadline.
        let write_deadline = self.shared.clock.cycle_start()
            + self.shared.clock.required_time()
            + self.shared.cfg.margin;
        if !tasks.optional_reads.is_empty() && Instant::now() < write_deadline {
            self.read_opportunistic(&tasks.optional_reads, write_deadline)
                .await?;
        }

        self.write_pass(&tasks).await?;

        // Late opportunistic window, bounded by the next mandatory-read
        // start (recomputed, the clock has moved on).
        if !tasks.optional_reads.is_empty() {
            if let Some(deadline) = self
                .read_start(&tasks)
                .and_then(|t| t.checked_sub(self.shared.cfg.margin))
            {
                if Instant::now() < deadline {
                    self.read_opportunistic(&tasks.optional_reads, deadline)
                        .await?;
                }
            }
        }

        Ok(())
    }

    /// INIT sub-loop: retries `initialize()` until it succeeds.
    ///
    /// Handles its own failures internally and never gives up on its own; a
    /// failed attempt waits on the gate up to `init_retry_wait`, or less if
    /// an external re-trigger releases it.
    async fn initialize(&self) {
        while self.shared.init_pending.load(Ordering::SeqCst) {
            match self.shared.protocol.initialize().await {
                Ok(()) => {
                    self.shared.init_pending.store(false, Ordering::SeqCst);
                    self.shared.gate.release();
                    self.publish(Event::now(EventKind::InitializeSucceeded));
                }
                Err(err) => {
                    log::warn!("[{}] initialize failed, retrying: {err}", self.shared.name);
                    self.publish(
                        Event::now(EventKind::InitializeRetried).with_reason(err.to_string()),
                    );
                    self.shared
                        .gate
                        .wait_timeout(self.shared.cfg.init_retry_wait)
                        .await;
                }
            }
        }
    }

    /// Start of the mandatory-read window:
    /// `next_cycle_start - margin - Σ(required read durations)`.
    ///
    /// `None` means the budget reaches past the representable origin; the
    /// caller treats it like a start time already in the past.
    fn read_start(&self, tasks: &CycleTasks) -> Option<Instant> {
        let budget = self.shared.cfg.margin + tasks.required_read_time();
        self.shared.clock.next_cycle_start().checked_sub(budget)
    }

    /// Sleeps to the window start, then runs every mandatory read in list
    /// order.
    async fn mandatory_reads(&self, tasks: &CycleTasks) -> Result<(), TaskError> {
        match self.read_start(tasks) {
            Some(start) if start > Instant::now() => timing::sleep_until(start).await,
            _ => {
                // Infeasible budget: the cycle length is smaller than the
                // required read window. Advisory only, keep going.
                log::warn!(
                    "[{}] cycle time smaller than the required read window",
                    self.shared.name
                );
                self.publish(Event::now(EventKind::ReadWindowLate));
            }
        }
        for task in &tasks.required_reads {
            task.run().await?;
        }
        Ok(())
    }

    /// Polls the write trigger, then runs every write task in list order.
    ///
    /// Blocking wait with no timeout: writes must reflect the latest decided
    /// setpoints, so a control stage that never triggers stalls the bridge.
    /// The trigger is cleared only after the pass completes; a failing write
    /// leaves it set for the next cycle.
    async fn write_pass(&self, tasks: &CycleTasks) -> Result<(), TaskError> {
        loop {
            if self.shared.trigger.is_set() {
                for task in &tasks.writes {
                    task.run().await?;
                }
                self.shared.trigger.clear();
                self.publish(Event::now(EventKind::WritePassApplied));
                return Ok(());
            }
            time::sleep(self.shared.cfg.write_poll).await;
        }
    }

    /// Opportunistic fairness routine: starting at the cursor, runs tasks
    /// that still fit before `deadline`, advancing (and wrapping) the
    /// cursor.
    ///
    /// Deliberately stops after `len - 1` tasks, leaving at least one task
    /// unvisited per call so the cursor keeps progressing across cycles
    /// rather than looping the whole list every single call. A side effect
    /// is that a single-element list never runs here; such a task should be
    /// a required read instead.
    async fn read_opportunistic(
        &mut self,
        tasks: &[TaskRef],
        deadline: Instant,
    ) -> Result<(), TaskError> {
        let len = tasks.len();
        if len == 0 {
            return Ok(());
        }
        // The optional list may have shrunk since the cursor last moved.
        self.cursor %= len;

        let mut consumed = 0;
        while consumed + 1 < len {
            let task = &tasks[self.cursor];
            if Instant::now() + task.required_duration() >= deadline {
                break;
            }
            task.run().await?;
            consumed += 1;
            self.cursor = (self.cursor + 1) % len;
        }
        Ok(())
    }

    fn publish(&self, ev: Event) {
        self.shared
            .bus
            .publish(ev.with_bridge(self.shared.name.clone()));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex as StdMutex,
    };
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::broadcast::{error::RecvError, Receiver};

    use super::*;
    use crate::clock::CycleClock;
    use crate::config::BridgeConfig;
    use crate::core::bridge::Bridge;
    use crate::device::StaticDevice;
    use crate::protocol::Protocol;
    use crate::tasks::TaskFn;

    /// Clock deriving cycle boundaries from the (paused) tokio clock.
    struct TestClock {
        epoch: Instant,
        period: Duration,
        required: Duration,
    }

    impl TestClock {
        fn arc(period_ms: u64, required_ms: u64) -> Arc<Self> {
            Arc::new(Self {
                epoch: Instant::now(),
                period: Duration::from_millis(period_ms),
                required: Duration::from_millis(required_ms),
            })
        }
    }

    impl CycleClock for TestClock {
        fn cycle_start(&self) -> Instant {
            let elapsed = Instant::now() - self.epoch;
            let n = (elapsed.as_nanos() / self.period.as_nanos()) as u32;
            self.epoch + self.period * n
        }

        fn required_time(&self) -> Duration {
            self.required
        }

        fn next_cycle_start(&self) -> Instant {
            self.cycle_start() + self.period
        }
    }

    struct OkProtocol;

    #[async_trait]
    impl Protocol for OkProtocol {
        async fn initialize(&self) -> Result<(), TaskError> {
            Ok(())
        }
    }

    /// Fails the first `fail_first` attempts, then succeeds.
    struct FlakyProtocol {
        attempts: AtomicUsize,
        fail_first: usize,
    }

    impl FlakyProtocol {
        fn arc(fail_first: usize) -> Arc<Self> {
            Arc::new(Self {
                attempts: AtomicUsize::new(0),
                fail_first,
            })
        }
    }

    #[async_trait]
    impl Protocol for FlakyProtocol {
        async fn initialize(&self) -> Result<(), TaskError> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
            if attempt <= self.fail_first {
                Err(TaskError::io("connect refused"))
            } else {
                Ok(())
            }
        }
    }

    /// Succeeds only once `ready` is set.
    struct GatedProtocol {
        ready: AtomicBool,
    }

    #[async_trait]
    impl Protocol for GatedProtocol {
        async fn initialize(&self) -> Result<(), TaskError> {
            if self.ready.load(Ordering::SeqCst) {
                Ok(())
            } else {
                Err(TaskError::io("link down"))
            }
        }
    }

    /// A task that records its name and consumes its estimated duration in
    /// (paused) virtual time.
    fn journal_task(
        journal: &Arc<StdMutex<Vec<String>>>,
        name: &'static str,
        hint_ms: u64,
        actual_ms: u64,
    ) -> TaskRef {
        let journal = journal.clone();
        TaskFn::arc(name, Duration::from_millis(hint_ms), move || {
            let journal = journal.clone();
            async move {
                time::sleep(Duration::from_millis(actual_ms)).await;
                journal.lock().unwrap().push(name.to_string());
                Ok::<_, TaskError>(())
            }
        })
    }

    /// Keeps the write trigger set so cycles never stall in the write-wait.
    fn auto_trigger(bridge: &Bridge) -> tokio::task::JoinHandle<()> {
        let bridge = bridge.clone();
        tokio::spawn(async move {
            loop {
                bridge.trigger_write();
                time::sleep(Duration::from_millis(10)).await;
            }
        })
    }

    async fn wait_for(rx: &mut Receiver<Event>, kind: EventKind) -> Event {
        loop {
            match rx.recv().await {
                Ok(ev) if ev.kind == kind => return ev,
                Ok(_) => continue,
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => panic!("event bus closed"),
            }
        }
    }

    /// Collects events up to (and including) the first event of `until`.
    async fn collect_until(rx: &mut Receiver<Event>, until: EventKind) -> Vec<Event> {
        let mut events = Vec::new();
        loop {
            match rx.recv().await {
                Ok(ev) => {
                    let done = ev.kind == until;
                    events.push(ev);
                    if done {
                        return events;
                    }
                }
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => panic!("event bus closed"),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_mandatory_reads_precede_writes_every_cycle() {
        let journal = Arc::new(StdMutex::new(Vec::new()));
        let bridge = Bridge::new("b0", TestClock::arc(1000, 200), Arc::new(OkProtocol));
        bridge.add_device(
            StaticDevice::new("dev0")
                .with_required_read(journal_task(&journal, "req", 10, 10))
                .with_optional_read(journal_task(&journal, "opt-a", 5, 5))
                .with_optional_read(journal_task(&journal, "opt-b", 5, 5))
                .with_write(journal_task(&journal, "write", 20, 20))
                .arc(),
        );

        let mut rx = bridge.subscribe();
        let handle = bridge.spawn().unwrap();
        let trigger = auto_trigger(&bridge);

        for _ in 0..3 {
            wait_for(&mut rx, EventKind::CycleCompleted).await;
        }
        bridge.shutdown();
        handle.await.unwrap();
        trigger.abort();

        let journal = journal.lock().unwrap();
        let mut saw_required = false;
        for entry in journal.iter() {
            match entry.as_str() {
                "req" => saw_required = true,
                "write" => {
                    assert!(saw_required, "write ran before the cycle's mandatory read");
                    saw_required = false;
                }
                _ => {}
            }
        }
        assert!(journal.iter().filter(|e| *e == "write").count() >= 3);
        // Idle time existed, so the opportunistic windows ran reads too.
        assert!(journal.iter().any(|e| e.starts_with("opt")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_overrunning_reads_fall_into_early_window() {
        // The duration hint undersells the actual read time, so the
        // mandatory pass spills past the cycle boundary. The engine then
        // still has the new cycle's full logic budget ahead of it and must
        // use the early window before the write pass.
        let journal = Arc::new(StdMutex::new(Vec::new()));
        let bridge = Bridge::new("b0", TestClock::arc(1000, 200), Arc::new(OkProtocol));
        bridge.add_device(
            StaticDevice::new("dev0")
                .with_required_read(journal_task(&journal, "req", 1, 30))
                .with_optional_read(journal_task(&journal, "opt-a", 5, 5))
                .with_optional_read(journal_task(&journal, "opt-b", 5, 5))
                .with_write(journal_task(&journal, "write", 20, 20))
                .arc(),
        );

        let mut rx = bridge.subscribe();
        let handle = bridge.spawn().unwrap();
        let trigger = auto_trigger(&bridge);

        wait_for(&mut rx, EventKind::CycleCompleted).await;
        bridge.shutdown();
        handle.await.unwrap();
        trigger.abort();

        let journal = journal.lock().unwrap();
        let first_opt = journal.iter().position(|e| e.starts_with("opt"));
        let first_write = journal.iter().position(|e| e == "write").unwrap();
        assert!(
            matches!(first_opt, Some(i) if i < first_write),
            "expected an optional read before the write pass, got {journal:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_trigger_consumed_once_per_cycle() {
        let writes = Arc::new(AtomicUsize::new(0));
        let writes2 = writes.clone();
        let bridge = Bridge::new("b0", TestClock::arc(1000, 200), Arc::new(OkProtocol));
        bridge.add_device(
            StaticDevice::new("dev0")
                .with_write(TaskFn::arc(
                    "write",
                    Duration::from_millis(20),
                    move || {
                        let writes = writes2.clone();
                        async move {
                            writes.fetch_add(1, Ordering::SeqCst);
                            Ok::<_, TaskError>(())
                        }
                    },
                ))
                .arc(),
        );

        // Redundant triggers before the write-wait consumes the slot.
        for _ in 0..5 {
            bridge.trigger_write();
        }

        let mut rx = bridge.subscribe();
        let handle = bridge.spawn().unwrap();
        wait_for(&mut rx, EventKind::CycleCompleted).await;
        assert_eq!(writes.load(Ordering::SeqCst), 1);

        // The next cycle needs its own trigger.
        bridge.shutdown();
        let trigger = auto_trigger(&bridge);
        handle.await.unwrap();
        trigger.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_read_aborts_cycle_and_backs_off() {
        let reads = Arc::new(AtomicUsize::new(0));
        let reads2 = reads.clone();
        let writes = Arc::new(AtomicUsize::new(0));
        let writes2 = writes.clone();

        let bridge = Bridge::new("b0", TestClock::arc(1000, 200), Arc::new(OkProtocol));
        bridge.add_device(
            StaticDevice::new("dev0")
                .with_required_read(TaskFn::arc(
                    "req",
                    Duration::from_millis(10),
                    move || {
                        let reads = reads2.clone();
                        async move {
                            if reads.fetch_add(1, Ordering::SeqCst) == 0 {
                                Err(TaskError::io("bus timeout"))
                            } else {
                                Ok(())
                            }
                        }
                    },
                ))
                .with_write(TaskFn::arc(
                    "write",
                    Duration::from_millis(20),
                    move || {
                        let writes = writes2.clone();
                        async move {
                            writes.fetch_add(1, Ordering::SeqCst);
                            Ok::<_, TaskError>(())
                        }
                    },
                ))
                .arc(),
        );

        let mut rx = bridge.subscribe();
        let handle = bridge.spawn().unwrap();
        let trigger = auto_trigger(&bridge);

        let events = collect_until(&mut rx, EventKind::CycleCompleted).await;

        // Cycle 1 failed before any write ran; the first backoff sleep is
        // 2 seconds (previous = 1s base, next = 2s).
        let failed = events.iter().find(|e| e.kind == EventKind::CycleFailed);
        assert!(failed.is_some());
        let backoff = events
            .iter()
            .find(|e| e.kind == EventKind::BackoffScheduled)
            .unwrap();
        assert_eq!(backoff.delay_ms, Some(2000));
        assert_eq!(writes.load(Ordering::SeqCst), 1, "only cycle 2 wrote");

        // The failure forced a fresh initialize() before cycle 2.
        let init_count = events
            .iter()
            .filter(|e| e.kind == EventKind::InitializeSucceeded)
            .count();
        assert_eq!(init_count, 2);

        bridge.shutdown();
        handle.await.unwrap();
        trigger.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_write_leaves_trigger_set_for_retry() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let attempts2 = attempts.clone();

        let bridge = Bridge::new("b0", TestClock::arc(1000, 200), Arc::new(OkProtocol));
        bridge.add_device(
            StaticDevice::new("dev0")
                .with_write(TaskFn::arc(
                    "write",
                    Duration::from_millis(20),
                    move || {
                        let attempts = attempts2.clone();
                        async move {
                            if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                                Err(TaskError::io("setpoint rejected"))
                            } else {
                                Ok(())
                            }
                        }
                    },
                ))
                .arc(),
        );

        // One trigger, issued before the failure and never repeated: the
        // failing pass must not consume it.
        bridge.trigger_write();

        let mut rx = bridge.subscribe();
        let handle = bridge.spawn().unwrap();
        let events = collect_until(&mut rx, EventKind::CycleCompleted).await;

        // Cycle 1's pass failed before the trigger was cleared, so cycle 2's
        // write-wait fired immediately with the setpoints still pending.
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert_eq!(
            events
                .iter()
                .filter(|e| e.kind == EventKind::CycleFailed)
                .count(),
            1
        );
        assert_eq!(
            events
                .iter()
                .filter(|e| e.kind == EventKind::WritePassApplied)
                .count(),
            1
        );

        bridge.shutdown();
        bridge.trigger_write();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_initialize_retries_until_success() {
        let protocol = FlakyProtocol::arc(2);
        let bridge = Bridge::new("b0", TestClock::arc(1000, 200), protocol.clone());
        bridge.add_device(StaticDevice::new("dev0").arc());

        let mut rx = bridge.subscribe();
        let handle = bridge.spawn().unwrap();
        let trigger = auto_trigger(&bridge);

        let events = collect_until(&mut rx, EventKind::CycleCompleted).await;
        assert_eq!(protocol.attempts.load(Ordering::SeqCst), 3);
        let retries = events
            .iter()
            .filter(|e| e.kind == EventKind::InitializeRetried)
            .count();
        assert_eq!(retries, 2);

        bridge.shutdown();
        handle.await.unwrap();
        trigger.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_initialize_wakes_gate_wait_early() {
        let protocol = Arc::new(GatedProtocol {
            ready: AtomicBool::new(false),
        });
        // An hour-long retry wait: if the success below arrives quickly, it
        // can only be because trigger_initialize() released the gate.
        let cfg = BridgeConfig {
            init_retry_wait: Duration::from_secs(3600),
            ..BridgeConfig::default()
        };
        let bridge = Bridge::with_config(
            "b0",
            TestClock::arc(1000, 200),
            protocol.clone(),
            cfg,
        );

        let mut rx = bridge.subscribe();
        let _handle = bridge.spawn().unwrap();

        wait_for(&mut rx, EventKind::InitializeRetried).await;
        protocol.ready.store(true, Ordering::SeqCst);
        let released_at = Instant::now();
        bridge.trigger_initialize();

        wait_for(&mut rx, EventKind::InitializeSucceeded).await;
        assert!(Instant::now() - released_at < Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_infeasible_read_window_warns_and_proceeds() {
        let journal = Arc::new(StdMutex::new(Vec::new()));
        // 5ms cycles cannot fit a 50ms mandatory read budget.
        let bridge = Bridge::new("b0", TestClock::arc(5, 1), Arc::new(OkProtocol));
        bridge.add_device(
            StaticDevice::new("dev0")
                .with_required_read(journal_task(&journal, "req", 50, 0))
                .arc(),
        );

        let mut rx = bridge.subscribe();
        let handle = bridge.spawn().unwrap();
        let trigger = auto_trigger(&bridge);

        let events = collect_until(&mut rx, EventKind::CycleCompleted).await;
        assert!(events.iter().any(|e| e.kind == EventKind::ReadWindowLate));
        assert!(journal.lock().unwrap().contains(&"req".to_string()));

        bridge.shutdown();
        handle.await.unwrap();
        trigger.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_opportunistic_cursor_is_fair_across_calls() {
        let journal = Arc::new(StdMutex::new(Vec::new()));
        let tasks: Vec<TaskRef> = vec![
            journal_task(&journal, "a", 1, 0),
            journal_task(&journal, "b", 1, 0),
            journal_task(&journal, "c", 1, 0),
        ];

        let bridge = Bridge::new("b0", TestClock::arc(1000, 200), Arc::new(OkProtocol));
        let mut engine = CycleEngine::new(bridge.shared.clone());

        // Ample deadline: each call consumes exactly len - 1 tasks.
        for _ in 0..3 {
            let deadline = Instant::now() + Duration::from_secs(10);
            engine.read_opportunistic(&tasks, deadline).await.unwrap();
        }

        let journal = journal.lock().unwrap();
        assert_eq!(*journal, ["a", "b", "c", "a", "b", "c"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_opportunistic_single_task_list_is_skipped() {
        let journal = Arc::new(StdMutex::new(Vec::new()));
        let tasks: Vec<TaskRef> = vec![journal_task(&journal, "only", 1, 0)];

        let bridge = Bridge::new("b0", TestClock::arc(1000, 200), Arc::new(OkProtocol));
        let mut engine = CycleEngine::new(bridge.shared.clone());

        let deadline = Instant::now() + Duration::from_secs(10);
        engine.read_opportunistic(&tasks, deadline).await.unwrap();
        assert!(journal.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_opportunistic_stops_when_task_does_not_fit() {
        let journal = Arc::new(StdMutex::new(Vec::new()));
        let tasks: Vec<TaskRef> = vec![
            journal_task(&journal, "a", 5, 0),
            journal_task(&journal, "b", 50, 0),
            journal_task(&journal, "c", 5, 0),
        ];

        let bridge = Bridge::new("b0", TestClock::arc(1000, 200), Arc::new(OkProtocol));
        let mut engine = CycleEngine::new(bridge.shared.clone());

        // "a" fits, "b" would overrun the deadline: the call stops there and
        // the cursor stays on "b" for the next window.
        let deadline = Instant::now() + Duration::from_millis(20);
        engine.read_opportunistic(&tasks, deadline).await.unwrap();
        assert_eq!(*journal.lock().unwrap(), ["a"]);

        let deadline = Instant::now() + Duration::from_millis(200);
        engine.read_opportunistic(&tasks, deadline).await.unwrap();
        assert_eq!(*journal.lock().unwrap(), ["a", "b", "c"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cursor_survives_list_shrink() {
        let journal = Arc::new(StdMutex::new(Vec::new()));
        let long: Vec<TaskRef> = vec![
            journal_task(&journal, "a", 1, 0),
            journal_task(&journal, "b", 1, 0),
            journal_task(&journal, "c", 1, 0),
            journal_task(&journal, "d", 1, 0),
        ];
        let short: Vec<TaskRef> = vec![
            journal_task(&journal, "x", 1, 0),
            journal_task(&journal, "y", 1, 0),
        ];

        let bridge = Bridge::new("b0", TestClock::arc(1000, 200), Arc::new(OkProtocol));
        let mut engine = CycleEngine::new(bridge.shared.clone());

        let deadline = Instant::now() + Duration::from_secs(10);
        engine.read_opportunistic(&long, deadline).await.unwrap();
        // Cursor is now at 3; the shrunken list re-clamps instead of
        // indexing out of bounds.
        engine.read_opportunistic(&short, deadline).await.unwrap();

        let journal = journal.lock().unwrap();
        assert_eq!(*journal, ["a", "b", "c", "y"]);
    }
}
