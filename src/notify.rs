//! The audible cue played when a countdown finishes.

/// Fire-and-forget notification capability. The store calls this at most once per
/// finished countdown and ignores whatever happens inside.
pub trait Notifier {
    fn emit_notification(&self);
}
