//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`. All
//! catalog text reaches the screen as literal text through `sanitize_text`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Margin, Position, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, InputMode};
use crate::audio::PlaybackResource;
use crate::config::{ControlsSettings, UiSettings};
use crate::player::{NowPlayingView, PlayerController, PlayerState, sanitize_text, track_row};

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("/", "search");
    map.insert("j/k", "up/down");
    map.insert("enter", "play selected");
    map.insert("space/p", "play/pause");
    map.insert("h/l", "prev/next");
    // +/- is filled dynamically from config.
    map.insert("m", "mute");
    map.insert("0-9", "seek");
    map.insert("q", "quit");
    map
});

/// Render the controls help text, incorporating the volume step.
fn controls_text(volume_step: u8) -> String {
    let order = ["/", "j/k", "enter", "space/p", "h/l", "+/-", "m", "0-9", "q"];
    order
        .iter()
        .filter_map(|k| {
            if *k == "+/-" {
                Some(format!("[+/-] volume ±{}%", volume_step))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

fn state_label(state: PlayerState) -> &'static str {
    match state {
        PlayerState::Idle => "Stopped",
        PlayerState::Loading => "Loading…",
        PlayerState::ReadyPaused => "Paused",
        PlayerState::ReadyPlaying => "Playing",
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn left_padded() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

/// Render the entire UI into `frame`. Records the progress gauge area in
/// `app` so mouse clicks can be mapped back to a seek position.
pub fn draw<R: PlaybackResource>(
    frame: &mut Frame,
    app: &mut App,
    player: &PlayerController<R>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let view = NowPlayingView::project(player, &ui_settings.default_cover);

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" crescendo ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Now playing
    let title = if view.title.is_empty() {
        "Nothing playing".to_string()
    } else {
        view.title.clone()
    };
    let now_playing = vec![
        Line::from(Span::styled(title, Style::default().add_modifier(Modifier::BOLD))),
        Line::from(view.artist.clone()),
        Line::from(Span::styled(
            format!("cover: {}", view.cover),
            Style::default().add_modifier(Modifier::DIM),
        )),
        Line::from(format!(
            "{} {}  •  {} {}%",
            view.play_glyph,
            state_label(view.state),
            view.mute_glyph,
            view.volume_percent
        )),
    ];
    let now_playing_par = Paragraph::new(now_playing)
        .block(Block::bordered().padding(left_padded()).title(" now playing "))
        .wrap(Wrap { trim: true });
    frame.render_widget(now_playing_par, chunks[1]);

    // Progress
    let gauge = Gauge::default()
        .block(Block::bordered().title(" progress "))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio((view.progress_percent / 100.0).clamp(0.0, 1.0))
        .label(format!("{} / {}", view.elapsed, view.total));
    frame.render_widget(gauge, chunks[2]);
    app.set_progress_area(chunks[2].inner(Margin {
        horizontal: 1,
        vertical: 1,
    }));

    // Results list
    {
        let tracks = player.tracks();
        let playing = player.session().current_index;
        let items: Vec<ListItem> = tracks
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let row = track_row(&t.title, &t.artist);
                if Some(i) == playing {
                    ListItem::new(format!("♪ {}", row)).bold()
                } else {
                    ListItem::new(format!("  {}", row))
                }
            })
            .collect();

        let list_title = match (&app.last_query, player.is_searching()) {
            (_, true) => " results (searching…) ".to_string(),
            (Some(q), false) => format!(" results for \"{}\" ({}) ", sanitize_text(q), tracks.len()),
            (None, false) => " results ".to_string(),
        };

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(list_title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        if !tracks.is_empty() {
            state.select(Some(app.selected));
        }
        frame.render_stateful_widget(list, chunks[3], &mut state);
    }

    // Search prompt
    {
        let (text, style) = match app.mode {
            InputMode::Search => (format!("/{}", app.search_input), Style::default()),
            InputMode::Normal => (
                "press / to search".to_string(),
                Style::default().add_modifier(Modifier::DIM),
            ),
        };
        let prompt = Paragraph::new(Span::styled(text, style))
            .block(Block::bordered().padding(left_padded()).title(" search "));
        frame.render_widget(prompt, chunks[4]);

        if app.mode == InputMode::Search {
            let typed = app.search_input.chars().count() as u16;
            let x = (chunks[4].x + 3 + typed).min(chunks[4].right().saturating_sub(2));
            frame.set_cursor_position(Position::new(x, chunks[4].y + 1));
        }
    }

    let footer = Paragraph::new(controls_text(controls_settings.volume_step))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(left_padded()),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[5]);

    // Notice popup (any key closes it)
    if let Some(notice) = player.notice() {
        let popup_area = centered_rect_sized(48, 5, frame.area());
        frame.render_widget(Clear, popup_area);
        let popup = Paragraph::new(vec![
            Line::from(sanitize_text(notice).into_owned()),
            Line::from(Span::styled(
                "press any key",
                Style::default().add_modifier(Modifier::DIM),
            )),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::bordered()
                .title(" notice ")
                .border_style(Style::default().fg(Color::Red)),
        )
        .wrap(Wrap { trim: true });
        frame.render_widget(popup, popup_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controls_text_includes_volume_step() {
        let text = controls_text(7);
        assert!(text.contains("[+/-] volume ±7%"));
        assert!(text.starts_with("[/] search"));
        assert!(text.ends_with("[q] quit"));
    }

    #[test]
    fn centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let r = centered_rect_sized(48, 5, area);
        assert_eq!(r, Rect::new(26, 17, 48, 5));

        let small = Rect::new(0, 0, 20, 6);
        let r = centered_rect_sized(48, 5, small);
        assert!(r.width <= 18);
    }
}
