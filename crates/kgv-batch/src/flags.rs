/// Downstream reactions suppressed while an import streams into the view.
///
/// Raised when an ingestion starts and lowered exactly once when it
/// completes or fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecomputeFlags {
    /// Do not recompute visibility from canonical state.
    pub suspend_recompute: bool,
    /// Do not push canonical state to the view.
    pub skip_view_sync: bool,
}

impl RecomputeFlags {
    pub fn raise(&mut self) {
        self.suspend_recompute = true;
        self.skip_view_sync = true;
    }

    /// Lower both flags. Returns whether anything was raised.
    pub fn lower(&mut self) -> bool {
        let was_raised = self.is_raised();
        *self = Self::default();
        was_raised
    }

    pub fn is_raised(&self) -> bool {
        self.suspend_recompute || self.skip_view_sync
    }
}
