/// A trait for reporting progress of a crawl.
pub trait Progress: Send + Sync {
    /// Start a new phase (e.g., "Fetching stargazer data").
    ///
    /// `expected` is the number of items the phase should process, or `None` when unknown.
    fn set_phase(&self, phase: &str, expected: Option<u64>);

    /// Record that one more item of the current phase has been processed.
    fn advance(&self);

    /// Print a warning line without disrupting the progress indicator.
    fn warn(&self, msg: &str);

    /// Finish and clear the progress indicator.
    fn done(&self);
}

/// Log a user-facing warning, echoing it through the progress reporter when warn logging is off.
pub fn report_warning(progress: &dyn Progress, target: &str, msg: &str) {
    log::warn!(target: target, "{msg}");
    if !log::log_enabled!(target: target, log::Level::Warn) {
        progress.warn(msg);
    }
}
