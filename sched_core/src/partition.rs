//! Per-partition thread state machine and directive surface
//!
//! ## Philosophy
//!
//! - **Mechanism, not policy**: this core decides which thread is
//!   eligible; what to do about a deadline overrun, or when to actually
//!   context-switch, belongs to the environment.
//! - **Determinism first**: same directives + same tick advances =>
//!   same eligibility order, same events.
//! - **No hidden context**: every operation runs on an explicit
//!   [`PartitionScheduler`], never on an ambient "current partition".
//!
//! ## Execution model
//!
//! Single-core and cooperative. Directives mutate lists and timer
//! queues atomically with respect to the partition: each one runs
//! inside a local-preemption-disabled window, and nothing here blocks
//! the caller. The dispatcher learns that its scheduling choice may be
//! stale through the invalidation signal, which is raised exactly when
//! the head of the eligibility list changes (or the partition lock is
//! released).

use crate::delayed_event::{DeadlineQueue, TimeoutAction, TimeoutQueue};
use crate::eligibility::EligibilityList;
use crate::error::SchedError;
use crate::thread::{
    ListMembership, ThreadKind, ThreadRegistry, ThreadSpec, ThreadState, ThreadStatus,
};
use core_types::{
    OperatingMode, PartitionId, Priority, StartCondition, ThreadId, TickDuration, TickInstant,
    WaitResult,
};
use hal::{HealthMonitor, StackArena};
use serde::{Deserialize, Serialize};

/// Partition configuration
#[derive(Debug, Clone)]
pub struct PartitionConfig {
    /// Partition name, for status reporting
    pub name: String,
    /// Bytes of stack memory available to thread creation
    pub stack_capacity_bytes: u64,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            name: "partition".to_string(),
            stack_capacity_bytes: 64 * 1024,
        }
    }
}

/// Scheduling event for the audit trail
///
/// Every observable decision the core makes is recorded here with the
/// tick at which it happened, so tests and offline analysis can replay
/// exactly what the scheduler did and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedEvent {
    /// A thread was registered and its stack allocated
    ThreadCreated {
        thread: ThreadId,
        timestamp_ticks: u64,
    },
    /// A thread left Stopped for Runnable
    ThreadStarted {
        thread: ThreadId,
        timestamp_ticks: u64,
    },
    /// A thread was stopped
    ThreadStopped {
        thread: ThreadId,
        timestamp_ticks: u64,
    },
    /// The head of the eligibility list may have changed
    SchedulerInvalidated { timestamp_ticks: u64 },
    /// A timeout entry fired
    TimeoutFired {
        thread: ThreadId,
        action: TimeoutAction,
        timestamp_ticks: u64,
    },
    /// A deadline entry fired: the thread exceeded its time budget
    DeadlineOverrun {
        thread: ThreadId,
        deadline_tick: u64,
        timestamp_ticks: u64,
    },
    /// The partition lock was force-released because its holder stopped
    LockForceReleased {
        thread: ThreadId,
        timestamp_ticks: u64,
    },
    /// The partition's operating mode changed
    ModeChanged {
        mode: OperatingMode,
        timestamp_ticks: u64,
    },
    /// The partition was restarted
    PartitionRestarted {
        condition: StartCondition,
        timestamp_ticks: u64,
    },
}

/// Why a waiting thread is being woken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WakeCause {
    /// Explicit wake-up directive
    Signal,
    /// Timeout entry fired
    Timeout,
}

/// The scheduling core of one partition
///
/// Owns the thread registry, the eligibility list, both delayed-event
/// queues, the partition lock level, and the invalidation signal. All
/// state is directly inspectable, which is what makes the wake/timeout
/// races testable.
pub struct PartitionScheduler {
    id: PartitionId,
    config: PartitionConfig,
    mode: OperatingMode,
    start_condition: StartCondition,
    threads: ThreadRegistry,
    eligible: EligibilityList,
    timeouts: TimeoutQueue,
    deadlines: DeadlineQueue,
    stack_arena: StackArena,
    /// Reentrant advisory lock: while > 0, the dispatcher must not
    /// switch away from the holder
    lock_level: u32,
    lock_holder: Option<ThreadId>,
    /// Nesting depth of the local-preemption-disabled window
    preempt_local_disabled: u32,
    /// Raised when the eligibility head may have changed
    invalidated: bool,
    current_ticks: u64,
    /// Threads currently marked unrecoverable
    unrecoverable_count: u32,
    health_monitor: Option<Box<dyn HealthMonitor>>,
    /// Audit log for scheduling events (test-only)
    audit_log: Vec<SchedEvent>,
}

impl PartitionScheduler {
    /// Creates a scheduler with default configuration
    pub fn new() -> Self {
        Self::with_config(PartitionConfig::default())
    }

    /// Creates a scheduler with custom configuration
    ///
    /// The partition starts in ColdStart mode with no threads.
    pub fn with_config(config: PartitionConfig) -> Self {
        let stack_arena = StackArena::new(config.stack_capacity_bytes);
        Self {
            id: PartitionId::new(),
            config,
            mode: OperatingMode::ColdStart,
            start_condition: StartCondition::NormalStart,
            threads: ThreadRegistry::new(),
            eligible: EligibilityList::new(),
            timeouts: TimeoutQueue::new(),
            deadlines: DeadlineQueue::new(),
            stack_arena,
            lock_level: 0,
            lock_holder: None,
            preempt_local_disabled: 0,
            invalidated: false,
            current_ticks: 0,
            unrecoverable_count: 0,
            health_monitor: None,
            audit_log: Vec::new(),
        }
    }

    /// Sets the health monitor invoked on deadline overruns
    pub fn with_health_monitor(mut self, monitor: Box<dyn HealthMonitor>) -> Self {
        self.health_monitor = Some(monitor);
        self
    }

    // ===== Directives =====

    /// Creates a thread: allocates its stack and registers its TCB
    ///
    /// The new thread is Stopped, not suspended, member of no list,
    /// with no timers armed. Fails when the stack arena cannot satisfy
    /// the requested stack size; the partition loader must then abort
    /// initialization.
    pub fn create(&mut self, spec: &ThreadSpec) -> Result<ThreadId, SchedError> {
        self.critical(|part| {
            let stack = part.stack_arena.allocate(spec.stack_size)?;
            let thread = part.threads.register(spec, stack);
            part.record(SchedEvent::ThreadCreated {
                thread,
                timestamp_ticks: part.current_ticks,
            });
            Ok(thread)
        })
    }

    /// Starts a Stopped thread
    ///
    /// The thread becomes Runnable. Unless suspended, it joins the
    /// eligibility list: immediately in NORMAL mode, or at the next
    /// transition to NORMAL otherwise. Starting a thread that is not
    /// Stopped is a caller contract violation.
    pub fn start(&mut self, thread: ThreadId) -> Result<(), SchedError> {
        self.critical(|part| {
            let tcb = part.threads.get(thread)?;
            if tcb.state != ThreadState::Stopped {
                return Err(SchedError::InvalidState {
                    directive: "start",
                    thread,
                    actual: tcb.state,
                });
            }

            let tcb = part.threads.get_mut(thread)?;
            tcb.state = ThreadState::Runnable;
            let suspended = tcb.suspended;
            if !suspended {
                part.set_eligible(thread)?;
            }
            part.record(SchedEvent::ThreadStarted {
                thread,
                timestamp_ticks: part.current_ticks,
            });
            Ok(())
        })
    }

    /// Stops a thread from any non-Stopped state
    ///
    /// Removes it from the eligibility list, cancels both of its
    /// timers, unlinks it from any wait queue, force-releases the
    /// partition lock when this thread holds it, and clears its
    /// unrecoverable marking.
    pub fn stop(&mut self, thread: ThreadId) -> Result<(), SchedError> {
        self.critical(|part| {
            let tcb = part.threads.get(thread)?;
            if tcb.state == ThreadState::Stopped {
                return Err(SchedError::InvalidState {
                    directive: "stop",
                    thread,
                    actual: tcb.state,
                });
            }

            part.threads.get_mut(thread)?.state = ThreadState::Stopped;
            part.set_uneligible(thread)?;
            part.timeouts.cancel(thread);
            part.deadlines.cancel(thread);

            let tcb = part.threads.get_mut(thread)?;
            tcb.armed_timeout = None;
            tcb.deadline_armed = false;
            if tcb.membership == ListMembership::WaitQueue {
                tcb.membership = ListMembership::None;
            }
            let was_unrecoverable = tcb.unrecoverable;
            tcb.unrecoverable = false;
            if was_unrecoverable {
                part.unrecoverable_count -= 1;
            }

            // The stopped thread may not have been the eligibility
            // head, but with the lock gone a lower-priority thread can
            // now be scheduled.
            if part.lock_level > 0 && part.lock_holder == Some(thread) {
                part.lock_level = 0;
                part.lock_holder = None;
                part.record(SchedEvent::LockForceReleased {
                    thread,
                    timestamp_ticks: part.current_ticks,
                });
                part.invalidate();
            }

            part.record(SchedEvent::ThreadStopped {
                thread,
                timestamp_ticks: part.current_ticks,
            });
            Ok(())
        })
    }

    /// Puts a thread into Waiting
    ///
    /// Valid only in NORMAL mode. Used directly for unconditional waits
    /// mediated by an external wait-queue owner, and as the first step
    /// of [`PartitionScheduler::wait_timed`].
    pub fn wait(&mut self, thread: ThreadId) -> Result<(), SchedError> {
        self.critical(|part| part.wait_locked(thread))
    }

    /// Puts a thread into Waiting with a wake-up armed at `deadline`
    ///
    /// The deadline is an absolute tick and must be finite.
    pub fn wait_timed(&mut self, thread: ThreadId, deadline: TickInstant) -> Result<(), SchedError> {
        self.critical(|part| {
            if deadline.is_infinite() {
                return Err(SchedError::InfiniteTimeout);
            }
            part.wait_locked(thread)?;
            part.timeouts
                .arm(thread, deadline.as_ticks(), TimeoutAction::Wake);
            part.threads.get_mut(thread)?.armed_timeout = Some(TimeoutAction::Wake);
            Ok(())
        })
    }

    /// Wakes a Waiting thread via explicit signal
    ///
    /// Cancels any armed timeout for the thread, unlinks it from its
    /// wait queue, records a Signaled wait result, and makes it
    /// eligible unless suspended. Waking a thread that is not Waiting
    /// is a caller contract violation. Exactly one of {this directive,
    /// the timeout firing} takes effect per waiting episode: whichever
    /// runs first cancels the other.
    pub fn wake_up(&mut self, thread: ThreadId) -> Result<(), SchedError> {
        self.critical(|part| part.wake_locked(thread, WakeCause::Signal))
    }

    /// Suspends a thread
    ///
    /// Sets the orthogonal suspended flag and removes the thread from
    /// the eligibility list. The logical state does not change.
    pub fn suspend(&mut self, thread: ThreadId) -> Result<(), SchedError> {
        self.critical(|part| {
            part.threads.get_mut(thread)?.suspended = true;
            part.set_uneligible(thread)
        })
    }

    /// Suspends a thread for a bounded number of ticks
    ///
    /// The thread is suspended, transitions to Waiting, and a timer is
    /// armed at now + `duration` that ends the suspension: it clears
    /// the suspended flag, records a TimedOut wait result, and makes
    /// the thread eligible again.
    pub fn suspend_timed(
        &mut self,
        thread: ThreadId,
        duration: TickDuration,
    ) -> Result<(), SchedError> {
        self.critical(|part| {
            if part.mode != OperatingMode::Normal {
                return Err(SchedError::NotInNormalMode(part.mode));
            }
            part.threads.get_mut(thread)?.suspended = true;
            part.set_uneligible(thread)?;
            part.wait_locked(thread)?;
            let fire_at = part.current_ticks.saturating_add(duration.as_ticks());
            part.timeouts
                .arm(thread, fire_at, TimeoutAction::EndSuspension);
            part.threads.get_mut(thread)?.armed_timeout = Some(TimeoutAction::EndSuspension);
            Ok(())
        })
    }

    /// Clears a thread's suspended flag
    ///
    /// A resume pre-empts a timed suspension: if the suspension timer
    /// is still armed, it is cancelled and the thread returns to
    /// Runnable with a Signaled (non-timeout) wait result. A thread
    /// that ends up Runnable rejoins the eligibility list.
    pub fn resume(&mut self, thread: ThreadId) -> Result<(), SchedError> {
        self.critical(|part| {
            let tcb = part.threads.get_mut(thread)?;
            tcb.suspended = false;
            if tcb.armed_timeout == Some(TimeoutAction::EndSuspension) {
                tcb.state = ThreadState::Runnable;
                tcb.wait_result = WaitResult::Signaled;
                tcb.armed_timeout = None;
                part.timeouts.cancel(thread);
            }

            let tcb = part.threads.get(thread)?;
            if tcb.state == ThreadState::Runnable && tcb.membership != ListMembership::Eligible {
                part.set_eligible(thread)?;
            }
            Ok(())
        })
    }

    /// Yields a thread's place within its priority tier
    ///
    /// If the thread is eligible it is removed and reinserted through
    /// the standard insertion rule, which moves it behind its
    /// equal-priority peers: round-robin at equal priority. A no-op for
    /// threads that are not eligible.
    pub fn yield_thread(&mut self, thread: ThreadId) -> Result<(), SchedError> {
        self.critical(|part| {
            if part.threads.get(thread)?.membership != ListMembership::Eligible {
                return Ok(());
            }
            part.set_uneligible(thread)?;
            part.set_eligible(thread)
        })
    }

    /// Arms deadline supervision for a thread at an absolute tick
    ///
    /// Independent of any timeout arming: a thread can hold one armed
    /// deadline and one armed timeout at once. Arming replaces a prior
    /// deadline; the infinite sentinel disarms supervision. Firing
    /// reports to the health monitor and does not alter thread state.
    pub fn set_deadline(
        &mut self,
        thread: ThreadId,
        deadline: TickInstant,
    ) -> Result<(), SchedError> {
        self.critical(|part| {
            if deadline.is_infinite() {
                part.deadlines.cancel(thread);
                part.threads.get_mut(thread)?.deadline_armed = false;
                return Ok(());
            }
            part.deadlines.arm(thread, deadline.as_ticks(), ());
            part.threads.get_mut(thread)?.deadline_armed = true;
            Ok(())
        })
    }

    /// Changes a thread's current priority
    ///
    /// An eligible thread is repositioned: removed and reinserted at
    /// the back of its new priority tier.
    pub fn set_priority(&mut self, thread: ThreadId, priority: Priority) -> Result<(), SchedError> {
        self.critical(|part| {
            let eligible = part.threads.get(thread)?.membership == ListMembership::Eligible;
            if eligible {
                part.set_uneligible(thread)?;
            }
            part.threads.get_mut(thread)?.current_priority = priority;
            if eligible {
                part.set_eligible(thread)?;
            }
            Ok(())
        })
    }

    /// Marks a thread as being in an unrecoverable condition
    ///
    /// Stopping the thread clears the marking again.
    pub fn mark_unrecoverable(&mut self, thread: ThreadId) -> Result<(), SchedError> {
        self.critical(|part| {
            let tcb = part.threads.get_mut(thread)?;
            if !tcb.unrecoverable {
                tcb.unrecoverable = true;
                part.unrecoverable_count += 1;
            }
            Ok(())
        })
    }

    // ===== Wait queues (for external messaging objects) =====

    /// Links a Waiting thread into a wait queue owned by a messaging
    /// object
    ///
    /// The core only tracks the membership marker; the queue owner
    /// keeps its own order. The marker is how stop and wake-up know to
    /// unlink the thread.
    pub fn enqueue_wait(&mut self, thread: ThreadId) -> Result<(), SchedError> {
        self.critical(|part| {
            let tcb = part.threads.get_mut(thread)?;
            if tcb.state != ThreadState::Waiting {
                return Err(SchedError::InvalidState {
                    directive: "enqueue_wait",
                    thread,
                    actual: tcb.state,
                });
            }
            if tcb.membership == ListMembership::WaitQueue {
                return Err(SchedError::AlreadyWaitQueued(thread));
            }
            tcb.membership = ListMembership::WaitQueue;
            Ok(())
        })
    }

    /// Unlinks a thread from its wait queue, if linked
    ///
    /// Returns true when the thread was actually linked. A false return
    /// tells the queue owner that a wake or timeout got there first.
    pub fn dequeue_wait(&mut self, thread: ThreadId) -> Result<bool, SchedError> {
        self.critical(|part| {
            let tcb = part.threads.get_mut(thread)?;
            if tcb.membership == ListMembership::WaitQueue {
                tcb.membership = ListMembership::None;
                Ok(true)
            } else {
                Ok(false)
            }
        })
    }

    // ===== Partition lock =====

    /// Raises the partition lock level
    ///
    /// The lock is advisory and reentrant, held by one thread at a
    /// time: while the level is above zero the dispatcher must not
    /// switch away from the holder. Valid only in NORMAL mode.
    pub fn inc_lock_level(&mut self, thread: ThreadId) -> Result<u32, SchedError> {
        self.critical(|part| {
            if part.mode != OperatingMode::Normal {
                return Err(SchedError::NotInNormalMode(part.mode));
            }
            part.threads.get(thread)?;
            if let Some(holder) = part.lock_holder {
                if holder != thread {
                    return Err(SchedError::LockNotHeld(thread));
                }
            }
            part.lock_level += 1;
            part.lock_holder = Some(thread);
            Ok(part.lock_level)
        })
    }

    /// Lowers the partition lock level
    ///
    /// Reaching zero releases the lock and raises the invalidation
    /// signal: a higher-priority thread may have become eligible while
    /// switching was inhibited.
    pub fn dec_lock_level(&mut self, thread: ThreadId) -> Result<u32, SchedError> {
        self.critical(|part| {
            part.threads.get(thread)?;
            if part.lock_level == 0 || part.lock_holder != Some(thread) {
                return Err(SchedError::LockNotHeld(thread));
            }
            part.lock_level -= 1;
            if part.lock_level == 0 {
                part.lock_holder = None;
                part.invalidate();
            }
            Ok(part.lock_level)
        })
    }

    // ===== Mode transitions =====

    /// Changes the partition's operating mode
    ///
    /// Entering NORMAL queues every Runnable, non-suspended standard
    /// thread in priority order. Leaving NORMAL empties the eligibility
    /// list (it is only populated in NORMAL mode) and invalidates the
    /// dispatcher's choice.
    pub fn set_mode(&mut self, mode: OperatingMode) -> Result<(), SchedError> {
        self.critical(|part| {
            if mode == part.mode {
                return Ok(());
            }
            let was_normal = part.mode == OperatingMode::Normal;
            part.mode = mode;

            if mode == OperatingMode::Normal {
                let runnable: Vec<ThreadId> = part
                    .threads
                    .iter()
                    .filter(|tcb| {
                        tcb.state == ThreadState::Runnable
                            && !tcb.suspended
                            && tcb.kind == ThreadKind::Standard
                            && tcb.membership == ListMembership::None
                    })
                    .map(|tcb| tcb.id)
                    .collect();
                for thread in runnable {
                    part.set_eligible(thread)?;
                }
            } else if was_normal {
                let members: Vec<ThreadId> = part.eligible.iter().collect();
                for thread in members {
                    part.threads.get_mut(thread)?.membership = ListMembership::None;
                }
                part.eligible.clear();
                part.invalidate();
            }

            part.record(SchedEvent::ModeChanged {
                mode,
                timestamp_ticks: part.current_ticks,
            });
            Ok(())
        })
    }

    /// Restarts the partition
    ///
    /// Every thread record is reinitialized through the same path
    /// creation uses: back to Stopped, base priority, no memberships,
    /// no timers. Queues, lock, invalidation, and the unrecoverable
    /// count are cleared. Stack regions allocated at first load are
    /// kept. The tick counter is global to the module and survives.
    pub fn restart(&mut self, condition: StartCondition) -> Result<(), SchedError> {
        self.critical(|part| {
            part.start_condition = condition;
            part.mode = match condition {
                StartCondition::NormalStart | StartCondition::HmModuleRestart => {
                    OperatingMode::ColdStart
                }
                StartCondition::PartitionRestart | StartCondition::HmPartitionRestart => {
                    OperatingMode::WarmStart
                }
            };
            part.eligible.clear();
            part.timeouts.clear();
            part.deadlines.clear();
            part.lock_level = 0;
            part.lock_holder = None;
            part.invalidated = false;
            part.unrecoverable_count = 0;
            for tcb in part.threads.iter_mut() {
                tcb.reinit();
            }
            part.record(SchedEvent::PartitionRestarted {
                condition,
                timestamp_ticks: part.current_ticks,
            });
            Ok(())
        })
    }

    // ===== Time =====

    /// Advances the tick counter and fires due delayed events
    ///
    /// Timeout entries fire first (waking threads and ending
    /// suspensions), then deadline entries (reporting overruns to the
    /// health monitor). Each entry fires at most once.
    pub fn on_tick_advanced(&mut self, delta_ticks: u64) -> Result<(), SchedError> {
        self.critical(|part| {
            part.current_ticks = part.current_ticks.saturating_add(delta_ticks);
            let now = part.current_ticks;

            while let Some(event) = part.timeouts.pop_due(now) {
                let tcb = part.threads.get_mut(event.thread)?;
                debug_assert_eq!(tcb.state, ThreadState::Waiting);
                debug_assert_eq!(tcb.armed_timeout, Some(event.payload));
                tcb.armed_timeout = None;
                part.record(SchedEvent::TimeoutFired {
                    thread: event.thread,
                    action: event.payload,
                    timestamp_ticks: now,
                });
                match event.payload {
                    TimeoutAction::Wake => {
                        part.wake_locked(event.thread, WakeCause::Timeout)?;
                    }
                    TimeoutAction::EndSuspension => {
                        let tcb = part.threads.get_mut(event.thread)?;
                        tcb.suspended = false;
                        tcb.state = ThreadState::Runnable;
                        tcb.wait_result = WaitResult::TimedOut;
                        if tcb.membership == ListMembership::WaitQueue {
                            tcb.membership = ListMembership::None;
                        }
                        part.set_eligible(event.thread)?;
                    }
                }
            }

            while let Some(event) = part.deadlines.pop_due(now) {
                part.threads.get_mut(event.thread)?.deadline_armed = false;
                part.record(SchedEvent::DeadlineOverrun {
                    thread: event.thread,
                    deadline_tick: event.fire_at,
                    timestamp_ticks: now,
                });
                if let Some(monitor) = part.health_monitor.as_mut() {
                    monitor.deadline_overrun(event.thread, now);
                }
            }
            Ok(())
        })
    }

    /// Advances the tick counter to an absolute value
    ///
    /// Convenience for dispatchers that poll a
    /// [`hal::TickSource`]: a `now` at or before the current
    /// tick advances by zero.
    pub fn advance_to(&mut self, now_ticks: u64) -> Result<(), SchedError> {
        let delta = now_ticks.saturating_sub(self.current_ticks);
        self.on_tick_advanced(delta)
    }

    // ===== Read accessors =====

    /// Returns the partition identifier
    pub fn id(&self) -> PartitionId {
        self.id
    }

    /// Returns the partition name
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Returns the current operating mode
    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    /// Returns the condition the partition was last (re)started with
    pub fn start_condition(&self) -> StartCondition {
        self.start_condition
    }

    /// Returns the current tick count
    pub fn current_ticks(&self) -> u64 {
        self.current_ticks
    }

    /// Returns the thread that should run next, if any
    pub fn eligible_head(&self) -> Option<ThreadId> {
        self.eligible.head()
    }

    /// Returns the eligibility list in scheduling order
    pub fn eligible_threads(&self) -> Vec<ThreadId> {
        self.eligible.iter().collect()
    }

    /// Consumes the invalidation signal
    ///
    /// Returns true when the head of the eligibility list may have
    /// changed since the last call. The dispatcher must check this
    /// before returning to user code.
    pub fn take_invalidation(&mut self) -> bool {
        std::mem::take(&mut self.invalidated)
    }

    /// Returns the invalidation signal without consuming it
    pub fn invalidation_pending(&self) -> bool {
        self.invalidated
    }

    /// Returns the current lock level
    pub fn lock_level(&self) -> u32 {
        self.lock_level
    }

    /// Returns the thread holding the partition lock, if any
    pub fn lock_holder(&self) -> Option<ThreadId> {
        self.lock_holder
    }

    /// Returns true while a directive's critical window is open
    pub fn local_preemption_disabled(&self) -> bool {
        self.preempt_local_disabled > 0
    }

    /// Returns the number of threads marked unrecoverable
    pub fn unrecoverable_count(&self) -> u32 {
        self.unrecoverable_count
    }

    /// Returns the number of registered threads
    pub fn thread_count(&self) -> usize {
        self.threads.len()
    }

    /// Returns the unallocated bytes left in the stack arena
    pub fn stack_remaining_bytes(&self) -> u64 {
        self.stack_arena.remaining_bytes()
    }

    /// Returns a status snapshot of one thread
    pub fn thread_status(&self, thread: ThreadId) -> Result<ThreadStatus, SchedError> {
        let tcb = self.threads.get(thread)?;
        Ok(ThreadStatus {
            id: tcb.id,
            name: tcb.name.clone(),
            kind: tcb.kind,
            state: tcb.state,
            suspended: tcb.suspended,
            base_priority: tcb.base_priority,
            current_priority: tcb.current_priority,
            wait_result: tcb.wait_result,
        })
    }

    /// Returns a thread's logical state
    pub fn state_of(&self, thread: ThreadId) -> Result<ThreadState, SchedError> {
        Ok(self.threads.get(thread)?.state)
    }

    /// Returns a thread's current priority
    pub fn priority_of(&self, thread: ThreadId) -> Result<Priority, SchedError> {
        Ok(self.threads.get(thread)?.current_priority)
    }

    /// Returns a thread's suspended flag
    pub fn is_suspended(&self, thread: ThreadId) -> Result<bool, SchedError> {
        Ok(self.threads.get(thread)?.suspended)
    }

    /// Returns how a thread's most recent waiting episode ended
    pub fn wait_result(&self, thread: ThreadId) -> Result<WaitResult, SchedError> {
        Ok(self.threads.get(thread)?.wait_result)
    }

    /// Returns a reference to the audit log
    ///
    /// Used in tests to verify scheduling behavior.
    pub fn audit_log(&self) -> &[SchedEvent] {
        &self.audit_log
    }

    /// Clears the audit log
    pub fn clear_audit_log(&mut self) {
        self.audit_log.clear();
    }

    /// Verifies the structural invariants, panicking on violation
    ///
    /// Test aid: call after any sequence of directives. Checks that
    /// eligibility membership matches the runnable/unsuspended/NORMAL
    /// predicate, that the list is sorted by non-increasing priority,
    /// and that the timer markers on each TCB agree with the queues.
    pub fn assert_invariants(&self) {
        for tcb in self.threads.iter() {
            let in_list = self.eligible.contains(tcb.id);
            let marker_eligible = tcb.membership == ListMembership::Eligible;
            assert_eq!(
                in_list, marker_eligible,
                "{}: membership marker disagrees with list",
                tcb.id
            );
            let should_be_eligible = tcb.state == ThreadState::Runnable
                && !tcb.suspended
                && self.mode == OperatingMode::Normal
                && tcb.kind == ThreadKind::Standard;
            assert_eq!(
                in_list, should_be_eligible,
                "{}: eligibility does not match predicate (state={}, suspended={}, mode={})",
                tcb.id, tcb.state, tcb.suspended, self.mode
            );
            assert_eq!(
                tcb.armed_timeout.is_some(),
                self.timeouts.is_armed(tcb.id),
                "{}: timeout marker disagrees with queue",
                tcb.id
            );
            assert_eq!(
                tcb.deadline_armed,
                self.deadlines.is_armed(tcb.id),
                "{}: deadline marker disagrees with queue",
                tcb.id
            );
        }

        let order: Vec<Priority> = self
            .eligible
            .iter()
            .map(|id| self.threads.priority_of(id))
            .collect();
        for pair in order.windows(2) {
            assert!(
                pair[0] >= pair[1],
                "eligibility list not sorted by non-increasing priority"
            );
        }

        if self.mode != OperatingMode::Normal {
            assert!(
                self.eligible.is_empty(),
                "eligibility list populated outside NORMAL mode"
            );
        }
    }

    // ===== Internals =====

    /// Runs `f` inside a local-preemption-disabled window
    ///
    /// Every mutating directive goes through here so a whole sequence
    /// of list/timer mutations is atomic with respect to the partition.
    /// Windows nest when directives call each other.
    fn critical<R>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<R, SchedError>,
    ) -> Result<R, SchedError> {
        self.preempt_local_disabled += 1;
        let result = f(self);
        self.preempt_local_disabled -= 1;
        result
    }

    fn record(&mut self, event: SchedEvent) {
        self.audit_log.push(event);
    }

    fn invalidate(&mut self) {
        self.invalidated = true;
        self.record(SchedEvent::SchedulerInvalidated {
            timestamp_ticks: self.current_ticks,
        });
    }

    /// Inserts `thread` into the eligibility list at its priority
    /// position
    ///
    /// Main and error-handler threads are never inserted. Outside
    /// NORMAL mode the insertion is deferred to the next transition
    /// into NORMAL. Raises the invalidation signal when the thread
    /// becomes the new head.
    fn set_eligible(&mut self, thread: ThreadId) -> Result<(), SchedError> {
        let tcb = self.threads.get(thread)?;
        if tcb.kind != ThreadKind::Standard {
            return Ok(());
        }
        if self.mode != OperatingMode::Normal {
            return Ok(());
        }
        if tcb.membership == ListMembership::Eligible {
            return Err(SchedError::AlreadyEligible(thread));
        }
        debug_assert_eq!(tcb.membership, ListMembership::None);

        let priority = tcb.current_priority;
        let threads = &self.threads;
        let became_head = self
            .eligible
            .insert(thread, priority, |id| threads.priority_of(id));
        self.threads.get_mut(thread)?.membership = ListMembership::Eligible;
        if became_head {
            self.invalidate();
        }
        Ok(())
    }

    /// Removes `thread` from the eligibility list, if present
    ///
    /// Raises the invalidation signal when the removed thread was the
    /// head.
    fn set_uneligible(&mut self, thread: ThreadId) -> Result<(), SchedError> {
        if self.threads.get(thread)?.membership != ListMembership::Eligible {
            return Ok(());
        }
        let was_head = self.eligible.remove(thread);
        self.threads.get_mut(thread)?.membership = ListMembership::None;
        if was_head {
            self.invalidate();
        }
        Ok(())
    }

    fn wait_locked(&mut self, thread: ThreadId) -> Result<(), SchedError> {
        if self.mode != OperatingMode::Normal {
            return Err(SchedError::NotInNormalMode(self.mode));
        }
        let tcb = self.threads.get_mut(thread)?;
        tcb.state = ThreadState::Waiting;
        tcb.wait_result = WaitResult::Pending;
        self.set_uneligible(thread)
    }

    fn wake_locked(&mut self, thread: ThreadId, cause: WakeCause) -> Result<(), SchedError> {
        let tcb = self.threads.get(thread)?;
        if tcb.state != ThreadState::Waiting {
            return Err(SchedError::InvalidState {
                directive: "wake_up",
                thread,
                actual: tcb.state,
            });
        }

        // Mutual exclusion with the timeout path: whichever runs first
        // cancels the other, so the loser finds nothing to do.
        self.timeouts.cancel(thread);

        let tcb = self.threads.get_mut(thread)?;
        tcb.armed_timeout = None;
        tcb.state = ThreadState::Runnable;
        if tcb.membership == ListMembership::WaitQueue {
            tcb.membership = ListMembership::None;
        }
        tcb.wait_result = match cause {
            WakeCause::Signal => WaitResult::Signaled,
            WakeCause::Timeout => WaitResult::TimedOut,
        };

        if !tcb.suspended {
            self.set_eligible(thread)?;
        }
        Ok(())
    }
}

impl Default for PartitionScheduler {
    fn default() -> Self {
        Self::new()
    }
}
