use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, InputMode, digit_seek_fraction};
use crate::audio::{PlaybackResource, ResourceEvent, RodioOutput};
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::player::PlayerController;
use crate::runtime::mpris_sync::{MprisSnapshot, update_mpris};
use crate::ui;

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// What MPRIS was last told.
    pub last_mpris: Option<MprisSnapshot>,
}

/// Main terminal event loop: applies resource events and catalog results,
/// draws, and handles input and MPRIS commands. Returns `Ok(())` when
/// shutdown is requested.
#[allow(clippy::too_many_arguments)]
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    player: &mut PlayerController<RodioOutput>,
    mpris: &MprisHandle,
    control_tx: &mpsc::Sender<ControlCmd>,
    control_rx: &mpsc::Receiver<ControlCmd>,
    resource_rx: &mpsc::Receiver<ResourceEvent>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    let fade_out = Duration::from_millis(settings.audio.quit_fade_out_ms);

    loop {
        while let Ok(ev) = resource_rx.try_recv() {
            player.handle_resource_event(ev);
        }
        player.pump();
        app.sync_tracks(player.tracks_version(), player.tracks().len());

        // Keep MPRIS in sync with changes from any source (keys, media keys, auto-advance).
        let snapshot = MprisSnapshot::of(player);
        if state.last_mpris.as_ref() != Some(&snapshot) {
            state.last_mpris = Some(update_mpris(mpris, player, &settings.ui.default_cover));
        }

        terminal.draw(|f| ui::draw(f, app, player, &settings.ui, &settings.controls))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, player) {
                player.resource().quit_softly(fade_out);
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if handle_key_event(key, settings, app, player, control_tx) {
                        player.resource().quit_softly(fade_out);
                        break;
                    }
                }
                Event::Mouse(mouse) => handle_mouse_event(mouse, app, player),
                _ => {}
            }
        }
    }

    Ok(())
}

/// Apply a command from MPRIS or a forwarded key. Returns `true` on quit.
fn handle_control_cmd<R: PlaybackResource>(cmd: ControlCmd, player: &mut PlayerController<R>) -> bool {
    tracing::debug!(?cmd, "control command");
    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Play => {
            if !player.session().is_playing {
                player.toggle_playback();
            }
        }
        ControlCmd::Pause | ControlCmd::Stop => {
            if player.session().is_playing {
                player.toggle_playback();
            }
        }
        ControlCmd::PlayPause => player.toggle_playback(),
        ControlCmd::Next => player.next_track(),
        ControlCmd::Prev => player.previous_track(),
        ControlCmd::SetVolume(percent) => player.set_volume(percent),
    }
    false
}

/// Returns `true` when the user asked to quit.
fn handle_key_event<R: PlaybackResource>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    player: &mut PlayerController<R>,
    control_tx: &mpsc::Sender<ControlCmd>,
) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    // An open notice swallows the key that closes it.
    if player.notice().is_some() {
        player.dismiss_notice();
        return false;
    }

    if app.mode == InputMode::Search {
        match key.code {
            KeyCode::Esc => app.cancel_search(),
            KeyCode::Backspace => app.pop_search_char(),
            KeyCode::Enter => {
                if let Some(query) = app.submit_search() {
                    player.search(&query);
                }
            }
            KeyCode::Char(c) => {
                if !c.is_control() {
                    app.push_search_char(c);
                }
            }
            _ => {}
        }
        return false;
    }

    let len = player.tracks().len();
    let step = i16::from(settings.controls.volume_step);

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('/') => app.enter_search_mode(),
        KeyCode::Char('j') | KeyCode::Down => app.next(len),
        KeyCode::Char('k') | KeyCode::Up => app.prev(len),
        KeyCode::Enter => {
            if app.selected < len {
                player.play_track(app.selected);
            }
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            // Behave like MPRIS PlayPause.
            let _ = control_tx.send(ControlCmd::PlayPause);
        }
        KeyCode::Char('l') => {
            let _ = control_tx.send(ControlCmd::Next);
        }
        KeyCode::Char('h') => {
            let _ = control_tx.send(ControlCmd::Prev);
        }
        KeyCode::Char('+') | KeyCode::Char('=') => player.adjust_volume(step),
        KeyCode::Char('-') => player.adjust_volume(-step),
        KeyCode::Char('m') => player.toggle_mute(),
        KeyCode::Char(c) => {
            if let Some(fraction) = digit_seek_fraction(c) {
                player.seek(fraction);
            }
        }
        _ => {}
    }

    false
}

fn handle_mouse_event<R: PlaybackResource>(
    mouse: MouseEvent,
    app: &App,
    player: &mut PlayerController<R>,
) {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return;
    }
    if player.notice().is_some() {
        player.dismiss_notice();
        return;
    }
    if let Some(fraction) = app.seek_fraction_at(mouse.column, mouse.row) {
        player.seek(fraction);
    }
}
