//! Function-pointer finite state machine engine.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  StateTable                                                  │
//! │  ┌──────────────┬───────────┬──────────┬──────────────────┐  │
//! │  │ StateId      │ on_enter  │ on_exit  │ on_update        │  │
//! │  ├──────────────┼───────────┼──────────┼──────────────────┤  │
//! │  │ Standby      │ fn(ctx)   │ -        │ fn(ctx)->Option<>│  │
//! │  │ PoweringOn   │ fn(ctx)   │ -        │ fn(ctx)->Option<>│  │
//! │  │ Unauthorized │ fn(ctx)   │ -        │ fn(ctx)->Option<>│  │
//! │  │ Warning      │ fn(ctx)   │ -        │ fn(ctx)->Option<>│  │
//! │  │ Alarm        │ fn(ctx)   │ -        │ fn(ctx)->Option<>│  │
//! │  │ PoweringDown │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<>│  │
//! │  └──────────────┴───────────┴──────────┴──────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handlers never touch hardware.  `on_enter` writes the state's entry
//! action into [`FsmContext::plan`]; the service executes it (playback,
//! light runs, waits, sensor samples) and then calls [`Fsm::tick`], where
//! `on_update` reads the sampled motion and picks the next state.
//!
//! Every transition is checked against [`StateId::successors`].

pub mod context;
pub mod states;

use core::fmt;

use context::FsmContext;
use log::debug;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all controller states.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    Standby = 0,
    PoweringOn = 1,
    Unauthorized = 2,
    Warning = 3,
    Alarm = 4,
    PoweringDown = 5,
}

impl StateId {
    /// Total number of states — used to size the table array.
    pub const COUNT: usize = 6;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Standby,
        Self::PoweringOn,
        Self::Unauthorized,
        Self::Warning,
        Self::Alarm,
        Self::PoweringDown,
    ];

    /// Convert an index back to `StateId`.  Panics on out-of-range in
    /// debug builds; returns `Standby` in release (the idle state).
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Standby,
            1 => Self::PoweringOn,
            2 => Self::Unauthorized,
            3 => Self::Warning,
            4 => Self::Alarm,
            5 => Self::PoweringDown,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Standby
            }
        }
    }

    /// States reachable in one transition.
    pub fn successors(self) -> &'static [StateId] {
        match self {
            Self::Standby => &[Self::PoweringOn],
            Self::PoweringOn => &[Self::Unauthorized],
            Self::Unauthorized => &[Self::Warning, Self::PoweringDown],
            Self::Warning => &[Self::Alarm, Self::PoweringDown],
            Self::Alarm => &[Self::PoweringDown],
            Self::PoweringDown => &[Self::Standby],
        }
    }

    pub fn can_transition_to(self, next: StateId) -> bool {
        self.successors().contains(&next)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Standby => "Standby",
            Self::PoweringOn => "PoweringOn",
            Self::Unauthorized => "Unauthorized",
            Self::Warning => "Warning",
            Self::Alarm => "Alarm",
            Self::PoweringDown => "PoweringDown",
        }
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a transition fired.  Carried into the state-change log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionReason {
    MotionDetected,
    MotionPersisted,
    MotionCleared,
    SequenceComplete,
}

impl TransitionReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MotionDetected => "motion detected",
            Self::MotionPersisted => "motion still present",
            Self::MotionCleared => "motion cleared",
            Self::SequenceComplete => "sequence complete",
        }
    }
}

impl fmt::Display for TransitionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of an `on_update` handler that wants to leave its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub to: StateId,
    pub reason: TransitionReason,
}

impl Transition {
    pub const fn new(to: StateId, reason: TransitionReason) -> Self {
        Self { to, reason }
    }
}

/// A transition the engine actually performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    pub from: StateId,
    pub to: StateId,
    pub reason: TransitionReason,
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each state transition.
pub type StateActionFn = fn(&mut FsmContext);

/// Signature for the per-tick update handler.
/// Returns `Some(transition)` to leave the state, or `None` to stay.
pub type StateUpdateFn = fn(&mut FsmContext) -> Option<Transition>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
pub struct StateDescriptor {
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
///
/// Owns the state table and the index of the active state.  The
/// [`FsmContext`] is threaded through every handler call by the caller.
pub struct Fsm {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    /// Index of the currently active state.
    current: usize,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut FsmContext) {
        debug!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Evaluate the current state once the caller has executed its plan.
    ///
    /// 1. Call `on_update` for the current state.
    /// 2. If it returns a transition, run `on_exit(current)`, move the
    ///    pointer, then `on_enter(next)`.
    ///
    /// Returns the transition performed, if any.
    pub fn tick(&mut self, ctx: &mut FsmContext) -> Option<StateChange> {
        let transition = (self.table[self.current].on_update)(ctx)?;
        Some(self.transition(transition, ctx))
    }

    /// The current state's identity.
    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, transition: Transition, ctx: &mut FsmContext) -> StateChange {
        let from = self.current_state();
        let next_idx = transition.to as usize;
        debug_assert!(
            from.can_transition_to(transition.to),
            "illegal transition {from} -> {}",
            transition.to
        );

        debug!(
            "FSM transition: {} -> {} ({})",
            self.table[self.current].name, self.table[next_idx].name, transition.reason
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }

        StateChange {
            from,
            to: transition.to,
            reason: transition.reason,
        }
    }
}
