/// Marker trait for commands and events fed into a reducer.
///
/// An intent is either something a caller asked for (add a favorite, apply a
/// filter) or the outcome of an effect (a page arrived, a snapshot loaded).
pub trait Intent: Send + 'static {}
