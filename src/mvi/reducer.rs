use super::intent::Intent;
use super::state::State;

/// Pure transition function: `(State, Intent) -> State`.
///
/// The reducer is the only place a state changes. It performs no I/O.
pub trait Reducer {
    type State: State;
    type Intent: Intent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;
}
