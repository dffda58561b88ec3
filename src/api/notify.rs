//! Operator notification hook for the API client

/// Receives operator-facing notices raised by the API client
///
/// The admin console installs one so transport failures interrupt the
/// operator; the viewer installs none and only logs.
pub trait Notifier: Send + Sync {
    /// Show `message` to the operator
    fn alert(&self, message: &str);
}
