//! Viewer view model
//!
//! A `ViewerScene` is everything the display needs to draw one frame. It is
//! built by `ViewerRenderer` and consumed by a `DisplaySurface`.

use crate::api::{DEFAULT_BACKGROUND, DEFAULT_FONT_COLOR, TimerId};

/// Literal shown when a countdown has expired
pub const TIMES_UP_TEXT: &str = "TIMES UP";

/// Text style of a timer panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Emphasis {
    /// Regular countdown
    #[default]
    Normal,
    /// Running and inside the low-time band
    LowTime,
    /// Countdown expired
    TimesUp,
}

/// Layout applied to the visible panels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// One visible timer, centred
    Single,
    /// Two visible timers, side by side
    Dual,
}

/// One timer's region of the display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerPanel {
    /// Timer this panel shows
    pub id: TimerId,
    /// Whether the panel is drawn at all
    pub visible: bool,
    /// Countdown or `TIMES UP` text
    pub text: String,
    /// Text style
    pub emphasis: Emphasis,
    /// Hour field omitted
    pub compact: bool,
    /// Public URL of the assigned logo
    pub logo_url: Option<String>,
}

impl TimerPanel {
    /// A hidden panel for `id`
    pub fn hidden(id: TimerId) -> Self {
        Self {
            id,
            visible: false,
            text: String::new(),
            emphasis: Emphasis::Normal,
            compact: false,
            logo_url: None,
        }
    }
}

/// Complete description of one viewer frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerScene {
    /// Background colour string from the theme
    pub background: String,
    /// Font colour string from the theme
    pub font_color: String,
    /// Panels indexed by `TimerId::index`
    pub panels: [TimerPanel; 2],
    /// Column split used to draw the visible panels; `None` when nothing is visible
    pub layout: Option<LayoutMode>,
}

impl Default for ViewerScene {
    fn default() -> Self {
        Self {
            background: DEFAULT_BACKGROUND.to_string(),
            font_color: DEFAULT_FONT_COLOR.to_string(),
            panels: TimerId::ALL.map(TimerPanel::hidden),
            layout: None,
        }
    }
}

impl ViewerScene {
    /// Panel for `id`
    pub fn panel(&self, id: TimerId) -> &TimerPanel {
        &self.panels[id.index()]
    }

    /// Visible panels in display order
    pub fn visible_panels(&self) -> impl Iterator<Item = &TimerPanel> {
        self.panels.iter().filter(|p| p.visible)
    }

    /// Plain-text rendering, one line per timer plus the layout
    pub fn render_text_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .panels
            .iter()
            .map(|panel| {
                if !panel.visible {
                    return format!("Timer {}: hidden", panel.id);
                }
                let mut line = format!("Timer {}: {}", panel.id, panel.text);
                if panel.emphasis == Emphasis::LowTime {
                    line.push_str(" [low time]");
                }
                if let Some(url) = &panel.logo_url {
                    line.push_str(&format!(" (logo {url})"));
                }
                line
            })
            .collect();

        let layout = match self.layout {
            Some(LayoutMode::Single) => "single",
            Some(LayoutMode::Dual) => "dual",
            None => "none",
        };
        lines.push(format!(
            "Layout: {layout}  Colours: {} on {}",
            self.font_color, self.background
        ));
        lines
    }
}

/// Layout for a given number of visible panels
pub fn layout_for(visible: usize) -> Option<LayoutMode> {
    match visible {
        1 => Some(LayoutMode::Single),
        2 => Some(LayoutMode::Dual),
        _ => None,
    }
}
