/// Marker trait for reducer-owned state.
///
/// `PartialEq` lets owners skip notifications and persistence when an intent
/// produced no change; `Default` is the state before anything was loaded.
pub trait State: Clone + PartialEq + Default + Send + Sync + 'static {}
