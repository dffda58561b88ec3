//! Full-screen terminal surface for the viewer
//!
//! Draws a `ViewerScene` with ratatui: the theme colours fill the screen and
//! each visible timer gets a centred column.

use crate::error::{Result, StageTimerError};
use crate::viewer::scene::{Emphasis, LayoutMode, TimerPanel, ViewerScene};
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, Paragraph};
use ratatui::{DefaultTerminal, Frame};
use std::time::Duration;

/// Warning colour for the low-time band
const LOW_TIME_COLOR: Color = Color::Rgb(255, 165, 0);
/// Colour of the expired label
const TIMES_UP_COLOR: Color = Color::Rgb(255, 64, 64);

/// Input observed while waiting on the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceInput {
    /// Nothing happened
    Idle,
    /// The display changed size and should be redrawn
    Resize,
    /// The audience operator asked to leave
    Quit,
}

/// Something a `ViewerScene` can be shown on
pub trait DisplaySurface {
    /// Draw `scene`, replacing whatever is shown
    fn present(&mut self, scene: &ViewerScene) -> Result<()>;

    /// Wait up to `timeout` for input
    fn poll_input(&mut self, timeout: Duration) -> Result<SurfaceInput>;
}

/// ratatui-backed full-screen display
///
/// Takes over the terminal on creation and restores it on drop.
pub struct TerminalSurface {
    terminal: DefaultTerminal,
}

impl TerminalSurface {
    /// Enter the alternate screen in raw mode
    pub fn new() -> Result<Self> {
        let terminal = ratatui::try_init().map_err(|e| StageTimerError::DisplayError(Box::new(e)))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        ratatui::restore();
    }
}

impl DisplaySurface for TerminalSurface {
    fn present(&mut self, scene: &ViewerScene) -> Result<()> {
        self.terminal
            .draw(|frame| draw_scene(frame, scene))
            .map_err(|e| StageTimerError::DisplayError(Box::new(e)))?;
        Ok(())
    }

    fn poll_input(&mut self, timeout: Duration) -> Result<SurfaceInput> {
        let display_error = |e: std::io::Error| StageTimerError::DisplayError(Box::new(e));

        if !event::poll(timeout).map_err(display_error)? {
            return Ok(SurfaceInput::Idle);
        }

        Ok(match event::read().map_err(display_error)? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => SurfaceInput::Quit,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    SurfaceInput::Quit
                }
                _ => SurfaceInput::Idle,
            },
            Event::Resize(..) => SurfaceInput::Resize,
            _ => SurfaceInput::Idle,
        })
    }
}

/// Parse a theme colour, falling back when the string is not a colour
pub fn parse_color(value: &str, fallback: Color) -> Color {
    value.trim().parse::<Color>().unwrap_or(fallback)
}

/// Draw one frame of `scene` onto `frame`
pub fn draw_scene(frame: &mut Frame, scene: &ViewerScene) {
    let area = frame.area();
    let base = Style::default()
        .bg(parse_color(&scene.background, Color::Black))
        .fg(parse_color(&scene.font_color, Color::White));

    frame.render_widget(Block::default().style(base), area);

    let columns = match scene.layout {
        None => return,
        Some(LayoutMode::Single) => vec![area],
        Some(LayoutMode::Dual) => Layout::horizontal([Constraint::Ratio(1, 2); 2])
            .split(area)
            .to_vec(),
    };

    for (panel, column) in scene.visible_panels().zip(columns) {
        draw_panel(frame, panel, column, base);
    }
}

fn draw_panel(frame: &mut Frame, panel: &TimerPanel, area: Rect, base: Style) {
    let text_style = match panel.emphasis {
        Emphasis::Normal => base.add_modifier(Modifier::BOLD),
        Emphasis::LowTime => base.fg(LOW_TIME_COLOR).add_modifier(Modifier::BOLD),
        Emphasis::TimesUp => base
            .fg(TIMES_UP_COLOR)
            .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK),
    };

    let countdown = if panel.compact {
        spread(&panel.text)
    } else {
        panel.text.clone()
    };

    let mut lines = vec![Line::styled(countdown, text_style)];
    if let Some(url) = &panel.logo_url {
        lines.push(Line::default());
        lines.push(Line::styled(url.clone(), base.add_modifier(Modifier::DIM)));
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "panel text is at most a few lines"
    )]
    let height = lines.len() as u16;
    let rows = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .split(area);

    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .alignment(Alignment::Center)
            .style(base),
        rows[1],
    );
}

/// Widen text without hours so it fills more of the column
fn spread(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    for (i, c) in text.chars().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TimerId;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn screen_text(scene: &ViewerScene) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal.draw(|frame| draw_scene(frame, scene)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn test_parse_color_fallback() {
        assert_eq!(parse_color("#FF0000", Color::Black), Color::Rgb(255, 0, 0));
        assert_eq!(parse_color("not-a-colour", Color::White), Color::White);
    }

    #[test]
    fn test_spread() {
        assert_eq!(spread("04m10s"), "0 4 m 1 0 s");
        assert_eq!(spread(""), "");
    }

    #[test]
    fn test_draws_visible_panel_text() {
        let mut scene = ViewerScene::default();
        scene.panels[TimerId::Two.index()] = TimerPanel {
            id: TimerId::Two,
            visible: true,
            text: "TIMES UP".to_string(),
            emphasis: Emphasis::TimesUp,
            compact: false,
            logo_url: None,
        };
        scene.layout = Some(LayoutMode::Single);

        assert!(screen_text(&scene).contains("TIMES UP"));
    }

    fn panel(id: TimerId, text: &str) -> TimerPanel {
        TimerPanel {
            id,
            visible: true,
            text: text.to_string(),
            emphasis: Emphasis::Normal,
            compact: false,
            logo_url: None,
        }
    }

    /// Column of the first cell where `needle` starts
    fn column_of(screen: &str, needle: &str, width: usize) -> usize {
        screen.find(needle).unwrap() % width
    }

    #[test]
    fn test_dual_layout_splits_columns() {
        let mut scene = ViewerScene::default();
        scene.panels = [panel(TimerId::One, "AAAA"), panel(TimerId::Two, "BBBB")];
        scene.layout = Some(LayoutMode::Dual);

        let screen = screen_text(&scene);
        assert!(column_of(&screen, "AAAA", 60) < 30);
        assert!(column_of(&screen, "BBBB", 60) >= 30);
    }

    #[test]
    fn test_single_layout_centres_across_full_width() {
        let mut scene = ViewerScene::default();
        scene.panels[TimerId::Two.index()] = panel(TimerId::Two, "BBBB");
        scene.layout = Some(LayoutMode::Single);

        // 60 columns, 4 characters centred
        assert_eq!(column_of(&screen_text(&scene), "BBBB", 60), 28);
    }

    #[test]
    fn test_blank_scene_draws_nothing() {
        let text = screen_text(&ViewerScene::default());
        assert!(text.trim().is_empty());
    }
}
