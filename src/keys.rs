use crate::app::{App, Screen};
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pickleball_core::OutcomeKind;
use std::sync::Arc;
use tokio::sync::Mutex;

pub async fn handle_key_bindings(key_event: KeyEvent, app: &Arc<Mutex<App>>) {
    let mut guard = app.lock().await;
    dispatch(&mut guard, key_event);
}

fn quit() -> ! {
    crate::cleanup_terminal();
    std::process::exit(0);
}

pub fn dispatch(app: &mut App, key_event: KeyEvent) {
    let (code, modifiers) = (key_event.code, key_event.modifiers);

    if app.state.show_intro {
        match (code, modifiers) {
            (KeyCode::Enter, _) => app.dismiss_intro(),
            (Char('q'), _) | (Char('c'), KeyModifiers::CONTROL) => quit(),
            _ => {}
        }
        return;
    }

    // name entry swallows plain characters
    if app.state.active_screen == Screen::Setup {
        handle_setup(app, code, modifiers);
        return;
    }

    match (app.state.active_screen, code, modifiers) {
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => quit(),

        (Screen::Help, KeyCode::Esc | Char('?'), _) => app.exit_help(),
        (_, Char('?'), _) => app.update_screen(Screen::Help),
        (_, Char('"'), _) => app.toggle_show_logs(),
        (_, Char('F'), _) => app.toggle_full_screen(),

        (Screen::Home, ..) => handle_home(app, code),
        (Screen::Game, ..) => handle_game(app, code),
        (Screen::GameOver | Screen::SharedResult, ..) => handle_result(app, code),
        (Screen::History, ..) => handle_history(app, code),
        _ => {}
    }
}

fn handle_home(app: &mut App, code: KeyCode) {
    match code {
        Char('j') | KeyCode::Down => app.state.home.move_down(),
        Char('k') | KeyCode::Up => app.state.home.move_up(),
        Char('h') | Char('l') | KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
            app.home_toggle_doubles()
        }
        KeyCode::Enter => app.home_select(),
        Char('t') => app.toggle_locale(),
        Char('c') => app.toggle_compact_mode(),
        _ => {}
    }
}

fn handle_setup(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    if code == Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        quit();
    }
    match code {
        KeyCode::Esc => app.go_home(),
        KeyCode::Enter => app.start_match(),
        _ => {
            let Some(setup) = app.state.setup.as_mut() else {
                return;
            };
            match code {
                KeyCode::Down => setup.focus_next(),
                KeyCode::Up => setup.focus_prev(),
                KeyCode::Tab => setup.select_server(setup.focus),
                KeyCode::Backspace => setup.backspace(),
                Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => setup.push_char(c),
                _ => {}
            }
        }
    }
}

fn handle_game(app: &mut App, code: KeyCode) {
    let Some(mode) = app.state.game.as_ref().map(|g| g.controller.mode()) else {
        return;
    };

    match code {
        Char(d @ '1'..='5') => app.game_digit(d as usize - '0' as usize),
        KeyCode::Esc => app.cancel_selection(),
        Char('v') => app.set_selected_server(),
        Char('x') => app.toggle_server_lock(),
        Char('u') => app.undo(),
        Char('[') => app.decrease_font(),
        Char(']') => app.increase_font(),
        Char('c') => app.toggle_compact_mode(),
        Char('R') => app.reset_match(),
        _ if mode.is_advanced() => match code {
            Char('w') => app.choose_outcome(OutcomeKind::Winner),
            Char('e') => app.choose_outcome(OutcomeKind::Error),
            _ => {}
        },
        _ if mode.is_simple() => match code {
            Char('p') | Char(' ') => app.score_point(),
            Char('f') => app.fault(),
            _ => {}
        },
        Char('+') | Char('=') | Char(' ') => app.score_point(),
        Char('-') => app.correct_point(),
        _ => {}
    }
}

fn handle_result(app: &mut App, code: KeyCode) {
    match code {
        Char('s') => app.share_result(),
        Char('n') => app.go_home(),
        Char('h') => app.open_history(),
        _ => navigate_result(app, code),
    }
}

fn handle_history(app: &mut App, code: KeyCode) {
    if app.state.history.confirm_clear {
        match code {
            Char('y') => app.history_confirm_clear(),
            _ => app.history_back(),
        }
        return;
    }

    if app.state.history.detail.is_some() {
        match code {
            KeyCode::Esc => app.history_back(),
            Char('s') => app.share_result(),
            _ => navigate_result(app, code),
        }
        return;
    }

    match code {
        Char('j') | KeyCode::Down => app.state.history.move_down(),
        Char('k') | KeyCode::Up => app.state.history.move_up(),
        KeyCode::Enter => app.state.history.open_selected(),
        Char('D') => app.history_request_clear(),
        KeyCode::Esc => app.history_back(),
        _ => {}
    }
}

fn navigate_result(app: &mut App, code: KeyCode) {
    let Some(result) = app.active_result_mut() else {
        return;
    };
    match code {
        Char('j') | KeyCode::Down => result.cursor_down(),
        Char('k') | KeyCode::Up => result.cursor_up(),
        KeyCode::Enter => result.open_detail(),
        KeyCode::Esc => {
            result.close_detail();
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::app_settings::AppSettings;

    fn press(app: &mut App, code: KeyCode) {
        dispatch(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn app_in(dir: &std::path::Path) -> App {
        let mut app = App::new(AppSettings::load_from(dir));
        app.dismiss_intro();
        app
    }

    #[test]
    fn keyboard_walks_from_home_into_a_match() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        press(&mut app, Char('j'));
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state.active_screen, Screen::Setup);

        // 'q' is part of a name here, not quit
        press(&mut app, Char('q'));
        assert!(app.state.setup.as_ref().unwrap().names[0].ends_with('q'));

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state.active_screen, Screen::Game);
        let game = app.state.game.as_ref().unwrap();
        assert!(game.controller.mode().is_doubles());
        assert!(game.controller.mode().is_advanced());
    }

    #[test]
    fn simple_mode_keys_score_and_fault() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.state.home.selected = 2;
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);

        press(&mut app, Char('p'));
        press(&mut app, Char('f'));
        let state = app.state.game.as_ref().unwrap().controller.state();
        assert_eq!(state.score().team1_score, 1);
        assert_eq!(state.serving_team_id, Some(pickleball_core::TEAM_TWO));

        press(&mut app, Char('u'));
        let state = app.state.game.as_ref().unwrap().controller.state();
        assert_eq!(state.serving_team_id, Some(pickleball_core::TEAM_ONE));
    }

    #[test]
    fn help_returns_to_previous_screen() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        press(&mut app, Char('?'));
        assert_eq!(app.state.active_screen, Screen::Help);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state.active_screen, Screen::Home);
    }

    #[test]
    fn history_clear_needs_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.state.home.selected = 0;
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        for _ in 0..11 {
            press(&mut app, Char('+'));
        }
        assert_eq!(app.state.active_screen, Screen::GameOver);

        press(&mut app, Char('h'));
        assert_eq!(app.state.active_screen, Screen::History);
        press(&mut app, Char('D'));
        press(&mut app, Char('n'));
        assert_eq!(app.state.history.log.len(), 1);
        press(&mut app, Char('D'));
        press(&mut app, Char('y'));
        assert!(app.state.history.log.is_empty());
    }
}
