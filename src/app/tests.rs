use super::*;
use ratatui::layout::Rect;

#[test]
fn next_and_prev_wrap() {
    let mut app = App::new();
    app.prev(3);
    assert_eq!(app.selected, 2);
    app.next(3);
    assert_eq!(app.selected, 0);
    app.next(3);
    app.next(3);
    assert_eq!(app.selected, 2);
}

#[test]
fn movement_on_empty_list_keeps_cursor_at_top() {
    let mut app = App::new();
    app.next(0);
    app.prev(0);
    assert_eq!(app.selected, 0);
}

#[test]
fn new_track_list_resets_selection() {
    let mut app = App::new();
    app.sync_tracks(1, 10);
    app.selected = 7;

    app.sync_tracks(1, 10);
    assert_eq!(app.selected, 7);

    app.sync_tracks(2, 10);
    assert_eq!(app.selected, 0);
}

#[test]
fn selection_is_clamped_to_list_length() {
    let mut app = App::new();
    app.sync_tracks(1, 10);
    app.selected = 9;
    app.sync_tracks(1, 4);
    assert_eq!(app.selected, 3);
    app.sync_tracks(1, 0);
    assert_eq!(app.selected, 0);
}

#[test]
fn search_prompt_submits_trimmed_query() {
    let mut app = App::new();
    app.enter_search_mode();
    assert_eq!(app.mode, InputMode::Search);
    for c in "  jazz ".chars() {
        app.push_search_char(c);
    }
    assert_eq!(app.submit_search().as_deref(), Some("jazz"));
    assert_eq!(app.mode, InputMode::Normal);
    assert_eq!(app.last_query.as_deref(), Some("jazz"));

    // Reopening starts from the last query.
    app.enter_search_mode();
    assert_eq!(app.search_input, "jazz");
    app.pop_search_char();
    assert_eq!(app.search_input, "jaz");
}

#[test]
fn blank_or_cancelled_search_runs_nothing() {
    let mut app = App::new();
    app.enter_search_mode();
    app.push_search_char(' ');
    assert_eq!(app.submit_search(), None);
    assert_eq!(app.last_query, None);

    app.enter_search_mode();
    app.push_search_char('x');
    app.cancel_search();
    assert_eq!(app.mode, InputMode::Normal);
    assert!(app.search_input.is_empty());
    assert_eq!(app.last_query, None);
}

#[test]
fn click_position_maps_to_seek_fraction() {
    let mut app = App::new();
    assert_eq!(app.seek_fraction_at(5, 5), None);

    app.set_progress_area(Rect::new(10, 4, 11, 1));
    assert_eq!(app.seek_fraction_at(10, 4), Some(0.0));
    assert_eq!(app.seek_fraction_at(15, 4), Some(0.5));
    assert_eq!(app.seek_fraction_at(20, 4), Some(1.0));

    assert_eq!(app.seek_fraction_at(9, 4), None);
    assert_eq!(app.seek_fraction_at(21, 4), None);
    assert_eq!(app.seek_fraction_at(15, 5), None);
}

#[test]
fn digit_keys_seek_in_tenths() {
    assert_eq!(digit_seek_fraction('0'), Some(0.0));
    assert_eq!(digit_seek_fraction('5'), Some(0.5));
    assert_eq!(digit_seek_fraction('9'), Some(0.9));
    assert_eq!(digit_seek_fraction('x'), None);
}
