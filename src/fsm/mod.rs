//! Provisioning finite state machine.
//!
//! Classic embedded FSM pattern expressed as data, not control flow:
//!
//! ```text
//!  INIT ──▶ INIT_STORAGE ──▶ START_AP ──▶ START_HTTP ──▶ START_STA ──┐
//!                                             │                      │
//!                                          [failed]                  ▼
//!                                             ▼            WAIT_FOR_CREDENTIALS ─┐
//!                                           ERROR                    ▲           │
//!                                                                    └───────────┘
//! ```
//!
//! Every tick the controller performs the current state's blocking
//! action (storage init, AP bring-up, HTTP start, station bring-up),
//! reduces its result to a [`TickOutcome`], and advances by exactly one
//! row of the transition table in [`table`]. `StopStation`,
//! `ScanNetworks`, `Idle` and `Error` are self-loops with no action.

pub mod table;

use log::info;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all provisioning states.
///
/// Discriminants are part of the diagnostic surface (they appear in
/// logs and dumps), with `Error` pinned at `0xFF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    Init = 0,
    InitStorage = 1,
    StartAccessPoint = 2,
    StopAccessPoint = 3,
    StartHttp = 4,
    WaitForCredentials = 5,
    StartStation = 6,
    StopStation = 7,
    ScanNetworks = 8,
    Idle = 9,
    Error = 0xFF,
}

impl StateId {
    /// Human-readable name for transition logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Init => "Init",
            Self::InitStorage => "InitStorage",
            Self::StartAccessPoint => "StartAccessPoint",
            Self::StopAccessPoint => "StopAccessPoint",
            Self::StartHttp => "StartHttp",
            Self::WaitForCredentials => "WaitForCredentials",
            Self::StartStation => "StartStation",
            Self::StopStation => "StopStation",
            Self::ScanNetworks => "ScanNetworks",
            Self::Idle => "Idle",
            Self::Error => "Error",
        }
    }

    /// States from which no further useful transition exists.
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::StopStation | Self::ScanNetworks | Self::Idle | Self::Error
        )
    }
}

// ---------------------------------------------------------------------------
// Per-tick action and outcome
// ---------------------------------------------------------------------------

/// The blocking action the controller must perform for a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickAction {
    /// Advance (or stay) without touching any collaborator.
    None,
    /// Initialise persistent storage, erasing and retrying on corruption.
    InitStorage,
    /// Bring up the provisioning access point.
    StartAccessPoint,
    /// Scan, publish the listing, and start the HTTP service.
    StartHttp,
    /// Bring up the station interface with the captured credentials.
    StartStation,
}

/// Reduced result of a tick action, fed to the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Completed,
    Failed,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The state machine engine: current state plus tick bookkeeping.
///
/// The engine is deliberately dumb — it owns no collaborator handles.
/// The controller performs the action named by
/// [`table::action_for`] and calls [`Fsm::apply`] with the outcome.
pub struct Fsm {
    current: StateId,
    /// Monotonically increasing tick counter.
    tick_count: u64,
    /// Tick at which the current state was entered.
    state_entry_tick: u64,
}

impl Fsm {
    pub fn new(initial: StateId) -> Self {
        Self {
            current: initial,
            tick_count: 0,
            state_entry_tick: 0,
        }
    }

    /// The current state's identity.
    pub fn current_state(&self) -> StateId {
        self.current
    }

    /// The action the controller must perform this tick.
    pub fn pending_action(&self) -> TickAction {
        table::action_for(self.current)
    }

    /// Total ticks seen since construction.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Ticks spent in the current state.
    pub fn ticks_in_current_state(&self) -> u64 {
        self.tick_count - self.state_entry_tick
    }

    /// Record one tick having elapsed. Call once per controller tick,
    /// before [`apply`](Self::apply).
    pub fn note_tick(&mut self) {
        self.tick_count += 1;
    }

    /// Advance by one row of the transition table.
    pub fn apply(&mut self, outcome: TickOutcome) -> StateId {
        let next = table::next_state(self.current, outcome);
        if next != self.current {
            info!("FSM transition: {} -> {}", self.current.name(), next.name());
            self.current = next;
            self.state_entry_tick = self.tick_count;
        }
        self.current
    }
}
