//! Unidirectional state primitives shared by the stores.
//!
//! ```text
//! command ──→ Intent ──→ Reducer ──→ State ──→ observers
//!                            │
//!                            └──→ effects (persistence, network) run by the owner
//! ```
//!
//! Reducers stay pure. Whatever owns the state (the favorites store, the
//! catalog browser) runs the side effects around them.

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::State;
