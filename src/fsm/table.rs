//! The flat provisioning transition table.
//!
//! | State                | Action           | Next                          |
//! |----------------------|------------------|-------------------------------|
//! | Init                 | none             | InitStorage                   |
//! | InitStorage          | storage init     | StartAccessPoint              |
//! | StartAccessPoint     | AP bring-up      | StartHttp                     |
//! | StartHttp            | scan + HTTP start| StartStation / Error (failed) |
//! | WaitForCredentials   | station bring-up | WaitForCredentials            |
//! | StopAccessPoint      | station bring-up | WaitForCredentials            |
//! | StartStation         | station bring-up | WaitForCredentials            |
//! | StopStation          | none             | StopStation                   |
//! | ScanNetworks         | none             | ScanNetworks                  |
//! | Idle                 | none             | Idle                          |
//! | Error                | none             | Error                         |
//!
//! The WaitForCredentials/StopAccessPoint/StartStation triple shares one
//! successor because each models "resume the station bring-up from a
//! different trigger". The rows are kept literal and duplicated so the
//! whole reachable space can be audited in one place.

use super::{StateId, TickAction, TickOutcome};

/// The blocking action the controller performs while in `state`.
pub const fn action_for(state: StateId) -> TickAction {
    match state {
        StateId::Init => TickAction::None,
        StateId::InitStorage => TickAction::InitStorage,
        StateId::StartAccessPoint => TickAction::StartAccessPoint,
        StateId::StartHttp => TickAction::StartHttp,
        StateId::WaitForCredentials => TickAction::StartStation,
        StateId::StopAccessPoint => TickAction::StartStation,
        StateId::StartStation => TickAction::StartStation,
        StateId::StopStation => TickAction::None,
        StateId::ScanNetworks => TickAction::None,
        StateId::Idle => TickAction::None,
        StateId::Error => TickAction::None,
    }
}

/// One row lookup: `state × outcome → next state`.
///
/// Storage and AP bring-up failures halt the process before this table
/// is consulted (the controller propagates them as fatal), so their
/// `Failed` rows keep the machine in place rather than inventing a
/// recovery path the system does not have.
pub const fn next_state(state: StateId, outcome: TickOutcome) -> StateId {
    match (state, outcome) {
        // Boot chain.
        (StateId::Init, TickOutcome::Completed) => StateId::InitStorage,
        (StateId::InitStorage, TickOutcome::Completed) => StateId::StartAccessPoint,
        (StateId::StartAccessPoint, TickOutcome::Completed) => StateId::StartHttp,

        // HTTP start is the only failure routed to the terminal sink.
        (StateId::StartHttp, TickOutcome::Completed) => StateId::StartStation,
        (StateId::StartHttp, TickOutcome::Failed) => StateId::Error,

        // Convergent triple — literal duplicate rows, by design.
        (StateId::WaitForCredentials, _) => StateId::WaitForCredentials,
        (StateId::StopAccessPoint, _) => StateId::WaitForCredentials,
        (StateId::StartStation, _) => StateId::WaitForCredentials,

        // Terminal self-loops.
        (StateId::StopStation, _) => StateId::StopStation,
        (StateId::ScanNetworks, _) => StateId::ScanNetworks,
        (StateId::Idle, _) => StateId::Idle,
        (StateId::Error, _) => StateId::Error,

        // Fatal-path failure rows (unreachable in practice, see above).
        (StateId::Init, TickOutcome::Failed)
        | (StateId::InitStorage, TickOutcome::Failed)
        | (StateId::StartAccessPoint, TickOutcome::Failed) => state,
    }
}
