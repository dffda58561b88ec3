//! Status-to-scene rendering
//!
//! `ViewerRenderer` is the single owner of the viewer's last accepted theme
//! and scene. It is written only from `apply`.

use crate::api::{StatusSnapshot, ThemeSettings, TimerId, TimerState, UploadsLocation};
use crate::viewer::format::{format_time, is_compact, is_low_time};
use crate::viewer::scene::{Emphasis, TIMES_UP_TEXT, TimerPanel, ViewerScene, layout_for};

/// Builds viewer scenes from status snapshots
pub struct ViewerRenderer {
    theme: ThemeSettings,
    uploads: UploadsLocation,
    scene: ViewerScene,
}

impl ViewerRenderer {
    /// Create a renderer with the default theme and a blank scene
    pub fn new(uploads: UploadsLocation) -> Self {
        Self {
            theme: ThemeSettings::default(),
            uploads,
            scene: ViewerScene::default(),
        }
    }

    /// Last accepted theme
    pub fn theme(&self) -> &ThemeSettings {
        &self.theme
    }

    /// Last rendered scene
    pub fn scene(&self) -> &ViewerScene {
        &self.scene
    }

    /// Accept a snapshot and rebuild the scene
    ///
    /// Timers absent from the snapshot are hidden. A snapshot without a theme
    /// keeps the previous one.
    pub fn apply(&mut self, snapshot: &StatusSnapshot) -> &ViewerScene {
        if let Some(theme) = &snapshot.theme {
            self.theme = theme.clone();
        }

        let panels = TimerId::ALL.map(|id| self.render_panel(id, &snapshot.timer(id)));
        let visible = panels.iter().filter(|p| p.visible).count();

        self.scene = ViewerScene {
            background: self.theme.background().to_string(),
            font_color: self.theme.font_color().to_string(),
            panels,
            layout: layout_for(visible),
        };
        &self.scene
    }

    fn render_panel(&self, id: TimerId, state: &TimerState) -> TimerPanel {
        if !state.enabled {
            return TimerPanel::hidden(id);
        }

        let logo_url = state.logo().map(|filename| self.uploads.logo_url(filename));

        if state.times_up {
            return TimerPanel {
                id,
                visible: true,
                text: TIMES_UP_TEXT.to_string(),
                emphasis: Emphasis::TimesUp,
                compact: false,
                logo_url,
            };
        }

        let remaining = state.remaining_clamped();
        let emphasis = if is_low_time(remaining, state.is_running, &self.theme) {
            Emphasis::LowTime
        } else {
            Emphasis::Normal
        };

        TimerPanel {
            id,
            visible: true,
            text: format_time(remaining),
            emphasis,
            compact: is_compact(remaining),
            logo_url,
        }
    }
}
