//! Countdown text formatting and low-time rules

use crate::api::ThemeSettings;

/// Remaining seconds below which a running timer shows the admin warning tone
pub const ADMIN_WARNING_SECS: i64 = 300;

/// Split a clamped second count into hours, minutes, seconds
fn split(total_seconds: i64) -> (i64, i64, i64) {
    let total = total_seconds.max(0);
    (total / 3600, (total % 3600) / 60, total % 60)
}

/// Viewer countdown text
///
/// `HHhMMmSSs` when at least an hour remains, `MMmSSs` otherwise. Negative
/// input formats as zero.
pub fn format_time(total_seconds: i64) -> String {
    let (hours, minutes, seconds) = split(total_seconds);
    if hours > 0 {
        format!("{hours:02}h{minutes:02}m{seconds:02}s")
    } else {
        format!("{minutes:02}m{seconds:02}s")
    }
}

/// Admin countdown text; always carries the hour field
pub fn format_admin_time(total_seconds: i64) -> String {
    let (hours, minutes, seconds) = split(total_seconds);
    format!("{hours:02}h{minutes:02}m{seconds:02}s")
}

/// Whether the hour field is omitted from the viewer text
pub fn is_compact(total_seconds: i64) -> bool {
    split(total_seconds).0 == 0
}

/// Whether the low-time warning style applies
pub fn is_low_time(remaining_seconds: i64, is_running: bool, theme: &ThemeSettings) -> bool {
    theme.warning_enabled()
        && is_running
        && remaining_seconds > 0
        && remaining_seconds < theme.low_time_threshold_secs()
}

/// Whether the admin console shows a running timer in its warning tone
pub fn is_admin_warning(remaining_seconds: i64, is_running: bool) -> bool {
    is_running && remaining_seconds > 0 && remaining_seconds < ADMIN_WARNING_SECS
}
