//! Wire models for the timer service
//!
//! Every type here mirrors a JSON shape the service sends or accepts. Fields
//! the service may omit default on decode so a sparse response still renders.

use crate::error::{Result, StageTimerError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Default viewer background colour
pub const DEFAULT_BACKGROUND: &str = "#000000";
/// Default viewer font colour
pub const DEFAULT_FONT_COLOR: &str = "#FFFFFF";
/// Default low-time threshold in minutes
pub const DEFAULT_LOW_TIME_MINUTES: i64 = 5;

/// Identifier for one of the service's fixed timers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerId {
    /// Timer `"1"`
    One,
    /// Timer `"2"`
    Two,
}

impl TimerId {
    /// All timers in display order
    pub const ALL: [Self; 2] = [Self::One, Self::Two];

    /// Wire representation used in URLs and status maps
    pub fn as_str(self) -> &'static str {
        match self {
            Self::One => "1",
            Self::Two => "2",
        }
    }

    /// Stable index into per-timer render targets
    pub fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }
}

impl FromStr for TimerId {
    type Err = StageTimerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "1" => Ok(Self::One),
            "2" => Ok(Self::Two),
            other => Err(StageTimerError::UnknownTimer(other.to_string())),
        }
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of a single timer as reported by the service
///
/// A timer missing from a response is `TimerState::default()`, i.e. disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerState {
    /// Whether the timer is shown at all
    pub enabled: bool,
    /// Whether the countdown is currently running
    pub is_running: bool,
    /// Whether the countdown has reached zero
    pub times_up: bool,
    /// Remaining seconds; may be transiently negative
    pub time_remaining_seconds: i64,
    /// Assigned logo storage key
    pub logo_filename: Option<String>,
}

impl TimerState {
    /// The assigned logo, if it names a real file
    pub fn logo(&self) -> Option<&str> {
        self.logo_filename.as_deref().filter(|name| is_real_logo(name))
    }

    /// Whether a logo should be shown for this timer
    pub fn has_logo(&self) -> bool {
        self.logo().is_some()
    }

    /// Remaining time clamped to zero
    pub fn remaining_clamped(&self) -> i64 {
        self.time_remaining_seconds.max(0)
    }
}

/// Whether a logo filename refers to an actual asset
///
/// Empty strings and the literal `"None"` mean "no logo".
pub fn is_real_logo(filename: &str) -> bool {
    !filename.is_empty() && filename != "None"
}

/// Viewer theme as delivered by the service; every field may be absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeSettings {
    /// Display background colour
    pub background: Option<String>,
    /// Display font colour
    pub font_color: Option<String>,
    /// Low-time threshold in minutes
    pub low_time_minutes: Option<i64>,
    /// Whether the low-time warning style is used
    pub warning_enabled: Option<bool>,
}

impl ThemeSettings {
    /// Background colour, defaulting to black
    pub fn background(&self) -> &str {
        non_empty_or(self.background.as_deref(), DEFAULT_BACKGROUND)
    }

    /// Font colour, defaulting to white
    pub fn font_color(&self) -> &str {
        non_empty_or(self.font_color.as_deref(), DEFAULT_FONT_COLOR)
    }

    /// Low-time threshold in minutes
    ///
    /// Absent or zero means the default of 5; negative values disable the band.
    pub fn low_time_minutes(&self) -> i64 {
        match self.low_time_minutes {
            None | Some(0) => DEFAULT_LOW_TIME_MINUTES,
            Some(minutes) => minutes.max(0),
        }
    }

    /// Low-time threshold in seconds
    pub fn low_time_threshold_secs(&self) -> i64 {
        self.low_time_minutes().saturating_mul(60)
    }

    /// Whether warnings are on (default on)
    pub fn warning_enabled(&self) -> bool {
        self.warning_enabled.unwrap_or(true)
    }
}

fn non_empty_or<'a>(value: Option<&'a str>, default: &'a str) -> &'a str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => default,
    }
}

/// Fully resolved theme, edited by the operator and posted as a full replacement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeForm {
    /// Display background colour
    pub background: String,
    /// Display font colour
    pub font_color: String,
    /// Low-time threshold in minutes
    pub low_time_minutes: i64,
    /// Whether the low-time warning style is used
    pub warning_enabled: bool,
}

impl ThemeForm {
    /// Resolve a wire theme, filling defaults for absent fields
    pub fn from_settings(settings: &ThemeSettings) -> Self {
        Self {
            background: settings.background().to_string(),
            font_color: settings.font_color().to_string(),
            low_time_minutes: settings.low_time_minutes(),
            warning_enabled: settings.warning_enabled(),
        }
    }
}

impl Default for ThemeForm {
    fn default() -> Self {
        Self::from_settings(&ThemeSettings::default())
    }
}

impl From<&ThemeForm> for ThemeSettings {
    fn from(form: &ThemeForm) -> Self {
        Self {
            background: Some(form.background.clone()),
            font_color: Some(form.font_color.clone()),
            low_time_minutes: Some(form.low_time_minutes),
            warning_enabled: Some(form.warning_enabled),
        }
    }
}

/// An uploaded logo asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logo {
    /// Display label
    pub name: String,
    /// Unique storage key
    pub filename: String,
}

/// One decoded `/api/timer_status` response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Known timers present in the response
    pub timers: BTreeMap<TimerId, TimerState>,
    /// Embedded theme, absent for the bare timer-map shape
    pub theme: Option<ThemeSettings>,
}

#[derive(Deserialize)]
struct EmbeddedStatus {
    timers: BTreeMap<String, TimerState>,
    #[serde(default)]
    theme: Option<ThemeSettings>,
}

impl StatusSnapshot {
    /// Decode either the embedded `{timers, theme}` shape or a bare timer map
    ///
    /// An object with a `timers` key is always the embedded shape, so a
    /// malformed embedded response is an error rather than an empty map.
    pub fn from_value(value: Value) -> std::result::Result<Self, serde_json::Error> {
        let (raw, theme) = if value.get("timers").is_some() {
            let embedded: EmbeddedStatus = serde_json::from_value(value)?;
            (embedded.timers, embedded.theme)
        } else {
            (serde_json::from_value::<BTreeMap<String, TimerState>>(value)?, None)
        };

        let mut timers = BTreeMap::new();
        for (key, state) in raw {
            match key.parse::<TimerId>() {
                Ok(id) => {
                    timers.insert(id, state);
                }
                Err(_) => debug!("Ignoring unknown timer id {key:?} in status response"),
            }
        }

        Ok(Self { timers, theme })
    }

    /// Decode a status response from text
    pub fn from_json_str(json: &str) -> std::result::Result<Self, serde_json::Error> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// State for `id`; a missing timer is disabled
    pub fn timer(&self, id: TimerId) -> TimerState {
        self.timers.get(&id).cloned().unwrap_or_default()
    }
}

/// Body of a `/api/control_timer/<id>` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ControlAction {
    /// Show or hide the timer
    ToggleEnable {
        /// New enabled flag
        enabled: bool,
    },
    /// Set the countdown duration
    SetTime {
        /// Hours field
        hours: u32,
        /// Minutes field
        minutes: u32,
        /// Seconds field
        seconds: u32,
    },
    /// Start counting down
    Start,
    /// Pause the countdown
    Pause,
    /// Resume a paused countdown
    Resume,
    /// Reset to the last set duration
    Reset,
    /// Assign a logo, or clear it with `None`
    SetLogo {
        /// Logo storage key
        logo_filename: Option<String>,
    },
}

impl ControlAction {
    /// The wire discriminator
    pub fn name(&self) -> &'static str {
        match self {
            Self::ToggleEnable { .. } => "toggle_enable",
            Self::SetTime { .. } => "set_time",
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Reset => "reset",
            Self::SetLogo { .. } => "set_logo",
        }
    }
}

/// Successful outcomes of a logo delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteLogoOutcome {
    /// Removed; carries the service message
    Deleted(String),
    /// Removed from the list with a service-side caveat
    Warning(String),
    /// Removed; the service sent no body
    NoContent,
}

impl DeleteLogoOutcome {
    /// Operator-facing notice for this outcome
    pub fn notice(&self) -> &str {
        match self {
            Self::Deleted(message) | Self::Warning(message) => message,
            Self::NoContent => "Logo deleted.",
        }
    }
}

/// Parse an hours/minutes/seconds input from its leading digits
///
/// `"10s"` is 10 and `"1.5"` is 1. No leading digits or a negative sign
/// gives 0; an oversized value saturates.
pub fn parse_time_field(input: &str) -> u32 {
    let trimmed = input.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..end];

    if digits.is_empty() {
        0
    } else {
        digits.parse().unwrap_or(u32::MAX)
    }
}
