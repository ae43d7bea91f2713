use crate::store::tracked_store::Diff;

/// Anything that records which of its properties changed since the last
/// publish, so the change-set can be emitted and then cleared.
pub trait Tracked {
    /// Whether any property, at any nesting depth, changed since the last clear
    fn has_changes(&self) -> bool;
    /// Latest values of every changed property. Dirty nested stores appear as
    /// their own (recursive) diff, clean ones are omitted.
    fn changed_current_values(&self) -> Diff;
    /// Values each changed property held before its first mutation in this
    /// cycle, shaped like `changed_current_values`
    fn changed_old_values(&self) -> Diff;
    /// Forget all recorded changes, recursively
    fn clear_changes(&mut self);
}
