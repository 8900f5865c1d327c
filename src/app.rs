use crate::locale::{Locale, tr, tr_with};
use crate::state::app_settings::AppSettings;
use crate::state::app_state::{
    AppState, GameState, HomeEntry, ResultState, ResultView, SetupState, ShareOutput,
};
use log::{error, info, warn};
use pickleball_core::share::{self, SharedMatch};
use pickleball_core::store::HistoryStore;
use pickleball_core::{MatchController, OutcomeKind, Reason, Transition, stats};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum Screen {
    #[default]
    Home,
    Setup,
    Game,
    GameOver,
    SharedResult,
    History,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        let history = HistoryStore::in_dir(&settings.config_dir);
        let app = Self {
            state: AppState::new(history),
            settings,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    pub fn locale(&self) -> Locale {
        self.settings.locale
    }

    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        tr(self.settings.locale, key)
    }

    // -----------------------------------------------------------------------
    // Screen management
    // -----------------------------------------------------------------------

    pub fn update_screen(&mut self, next: Screen) {
        if self.state.active_screen == next {
            return;
        }
        self.state.previous_screen = self.state.active_screen;
        self.state.active_screen = next;
        self.state.last_error = None;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_screen == Screen::Help {
            self.state.active_screen = self.state.previous_screen;
        }
    }

    pub fn go_home(&mut self) {
        self.state.setup = None;
        self.state.game = None;
        self.state.result = None;
        self.update_screen(Screen::Home);
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    pub fn dismiss_intro(&mut self) {
        self.state.show_intro = false;
    }

    // -----------------------------------------------------------------------
    // Preferences, persisted to settings.json
    // -----------------------------------------------------------------------

    pub fn toggle_locale(&mut self) {
        self.settings.locale = self.settings.locale.toggled();
        self.persist_settings();
    }

    pub fn toggle_compact_mode(&mut self) {
        self.settings.compact_mode = !self.settings.compact_mode;
        self.persist_settings();
    }

    pub fn increase_font(&mut self) {
        if self.settings.increase_font() {
            self.persist_settings();
        }
    }

    pub fn decrease_font(&mut self) {
        if self.settings.decrease_font() {
            self.persist_settings();
        }
    }

    fn persist_settings(&mut self) {
        if let Err(e) = self.settings.save() {
            error!("settings not saved: {e}");
        }
    }

    // -----------------------------------------------------------------------
    // Home
    // -----------------------------------------------------------------------

    pub fn home_select(&mut self) {
        let entry = self.state.home.entry();
        match entry.mode(self.state.home.doubles) {
            Some(mode) => {
                self.state.setup = Some(SetupState::new(mode, self.settings.locale));
                self.update_screen(Screen::Setup);
            }
            None if entry == HomeEntry::History => self.open_history(),
            None => {}
        }
    }

    pub fn home_toggle_doubles(&mut self) {
        self.state.home.doubles = !self.state.home.doubles;
    }

    // -----------------------------------------------------------------------
    // Setup
    // -----------------------------------------------------------------------

    pub fn start_match(&mut self) {
        let Some(setup) = self.state.setup.as_mut() else {
            return;
        };
        let (teams, server) = match setup.build_teams() {
            Ok(built) => built,
            Err(key) => {
                setup.error = Some(tr(self.settings.locale, key).to_string());
                return;
            }
        };
        let mut controller = MatchController::new(setup.mode);
        if controller.start_game(teams, server) == Transition::Ignored {
            warn!("match setup rejected by controller");
            return;
        }
        self.state.game = Some(GameState::new(controller));
        self.update_screen(Screen::Game);
    }

    // -----------------------------------------------------------------------
    // Live match. Every handler funnels through `after_transition`.
    // -----------------------------------------------------------------------

    pub fn score_point(&mut self) {
        let Some(game) = self.state.game.as_mut() else {
            return;
        };
        let Some(serving) = game.controller.state().serving_team_id else {
            return;
        };
        let transition = game.controller.record_score(serving);
        self.after_transition(transition);
    }

    pub fn correct_point(&mut self) {
        let Some(game) = self.state.game.as_mut() else {
            return;
        };
        let Some(serving) = game.controller.state().serving_team_id else {
            return;
        };
        let transition = game.controller.decrement_score(serving);
        self.after_transition(transition);
    }

    pub fn fault(&mut self) {
        let Some(game) = self.state.game.as_mut() else {
            return;
        };
        let transition = game.controller.record_fault();
        self.after_transition(transition);
    }

    pub fn undo(&mut self) {
        let Some(game) = self.state.game.as_mut() else {
            return;
        };
        let transition = game.controller.undo();
        self.after_transition(transition);
    }

    pub fn toggle_server_lock(&mut self) {
        if let Some(game) = self.state.game.as_mut() {
            game.server_locked = !game.server_locked;
        }
    }

    /// Digit key in the game screen: a reason while one is pending, a player
    /// otherwise.
    pub fn game_digit(&mut self, digit: usize) {
        let Some(game) = self.state.game.as_mut() else {
            return;
        };
        if let Some(kind) = game.pending_outcome {
            let Some(reason) = digit
                .checked_sub(1)
                .and_then(|i| Reason::from_index(kind, i))
            else {
                return;
            };
            self.record_outcome(kind, reason);
            return;
        }
        if let Some(slot) = digit.checked_sub(1)
            && let Some(player_id) = game.player_at(slot)
        {
            game.selected_player = Some(player_id);
        }
    }

    pub fn choose_outcome(&mut self, kind: OutcomeKind) {
        if !self.game_is_advanced() {
            return;
        }
        if let Some(game) = self.state.game.as_mut()
            && game.selected_player.is_some()
        {
            game.pending_outcome = Some(kind);
        }
    }

    pub fn cancel_selection(&mut self) {
        if let Some(game) = self.state.game.as_mut() {
            game.clear_selection();
        }
    }

    fn record_outcome(&mut self, kind: OutcomeKind, reason: Reason) {
        let Some(game) = self.state.game.as_mut() else {
            return;
        };
        let Some(player_id) = game.selected_player else {
            return;
        };
        let transition = game.controller.record_rally_outcome(player_id, kind, reason);
        game.clear_selection();
        self.after_transition(transition);
    }

    pub fn set_selected_server(&mut self) {
        let Some(game) = self.state.game.as_mut() else {
            return;
        };
        if game.server_locked {
            self.state.last_error = Some(tr(self.settings.locale, "serverLocked").to_string());
            return;
        }
        let Some(player_id) = game.selected_player.take() else {
            return;
        };
        let transition = game.controller.set_server(player_id);
        self.after_transition(transition);
    }

    pub fn reset_match(&mut self) {
        info!("match reset");
        self.go_home();
    }

    fn game_is_advanced(&self) -> bool {
        self.state
            .game
            .as_ref()
            .is_some_and(|g| g.controller.mode().is_advanced())
    }

    fn after_transition(&mut self, transition: Transition) {
        self.state.last_error = None;
        let Transition::Won(team_id) = transition else {
            return;
        };
        let Some(result) = self
            .state
            .game
            .as_ref()
            .and_then(|g| g.controller.match_result())
        else {
            return;
        };
        info!("team {team_id} won {}", stats::final_score_line(&result.winner, &result.teams));
        self.state.history.record(result.clone());
        self.state.result = Some(ResultState::new(result));
        self.update_screen(Screen::GameOver);
    }

    // -----------------------------------------------------------------------
    // Results and sharing
    // -----------------------------------------------------------------------

    /// Open a shared link from the command line. Failures are logged and the
    /// app stays on the home screen.
    pub fn open_shared(&mut self, input: &str) {
        match share::decode_link(input) {
            Ok(shared) => self.show_shared(shared),
            Err(e) => {
                error!("failed to decode shared match: {e}");
                self.state.last_error = Some(self.t("invalidShareLink").to_string());
            }
        }
    }

    fn show_shared(&mut self, shared: SharedMatch) {
        info!(
            "opened shared {} result ({} rallies)",
            shared.game_mode.label(),
            shared.game_history.len()
        );
        self.state.result = Some(ResultState::new(shared));
        self.state.show_intro = false;
        self.update_screen(Screen::SharedResult);
    }

    pub fn active_result_mut(&mut self) -> Option<&mut ResultState> {
        match self.state.active_screen {
            Screen::GameOver | Screen::SharedResult => self.state.result.as_mut(),
            Screen::History => self.state.history.detail.as_mut(),
            _ => None,
        }
    }

    pub fn active_result(&self) -> Option<&ResultState> {
        match self.state.active_screen {
            Screen::GameOver | Screen::SharedResult => self.state.result.as_ref(),
            Screen::History => self.state.history.detail.as_ref(),
            _ => None,
        }
    }

    /// Build the share link and text for the visible result and write both to
    /// the log pane.
    pub fn share_result(&mut self) {
        let locale = self.settings.locale;
        let base = self.settings.share_base_url.clone();
        let Some(result_state) = self.active_result_mut() else {
            return;
        };
        let Some(result) = result_state.view.result.as_ref() else {
            return;
        };
        let link = if base.is_empty() {
            share::encode(result).map(|payload| format!("picklescore --match {payload}"))
        } else {
            share::share_url(&base, result)
        };
        match link {
            Ok(link) => {
                let text = share_text(locale, &result_state.view);
                info!("{}: {}", tr(locale, "shareTitle"), text.replace('\n', " / "));
                info!("{link}");
                result_state.share = Some(ShareOutput { link, text });
            }
            Err(e) => error!("share failed: {e}"),
        }
    }

    // -----------------------------------------------------------------------
    // History
    // -----------------------------------------------------------------------

    pub fn open_history(&mut self) {
        self.state.history.selected = 0;
        self.state.history.detail = None;
        self.state.history.confirm_clear = false;
        self.update_screen(Screen::History);
    }

    pub fn history_back(&mut self) {
        if self.state.history.confirm_clear {
            self.state.history.confirm_clear = false;
            return;
        }
        if let Some(detail) = self.state.history.detail.as_mut() {
            if !detail.close_detail() {
                self.state.history.detail = None;
            }
            return;
        }
        self.update_screen(Screen::Home);
    }

    pub fn history_request_clear(&mut self) {
        if !self.state.history.log.is_empty() {
            self.state.history.confirm_clear = true;
        }
    }

    pub fn history_confirm_clear(&mut self) {
        if self.state.history.confirm_clear {
            self.state.history.clear();
            info!("match history cleared");
        }
    }

    // -----------------------------------------------------------------------
    // Animation tick, called every 80ms from AnimationTick event
    // -----------------------------------------------------------------------

    pub fn advance_animation(&mut self, frame_count: usize) {
        self.state.animation.advance(frame_count);
    }
}

/// Localized "{winner} def. {loser}" text for a result.
pub fn share_text(locale: Locale, view: &ResultView) -> String {
    let Some(winner) = view.winner.as_ref() else {
        return String::new();
    };
    let loser_names = view
        .teams
        .iter()
        .find(|t| t.id != winner.id)
        .map(|t| t.names())
        .unwrap_or_default();
    tr_with(
        locale,
        "shareTextPattern",
        &[
            ("winnerNames", &winner.names()),
            ("loserNames", &loser_names),
            ("score", &stats::final_score_line(winner, &view.teams)),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::app_settings::AppSettings;
    use pickleball_core::{GameMode, TEAM_ONE};

    fn app_in(dir: &std::path::Path) -> App {
        App::new(AppSettings::load_from(dir))
    }

    fn start(app: &mut App, entry: usize, doubles: bool) {
        app.state.home.selected = entry;
        app.state.home.doubles = doubles;
        app.home_select();
        app.start_match();
    }

    #[test]
    fn home_to_game_uses_selected_mode() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        start(&mut app, 1, true);
        assert_eq!(app.state.active_screen, Screen::Game);
        let game = app.state.game.as_ref().unwrap();
        assert_eq!(game.controller.mode(), GameMode::AdvancedDoubles);
        assert!(game.server_locked);
    }

    #[test]
    fn empty_name_keeps_setup_open_with_message() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.home_select();
        let setup = app.state.setup.as_mut().unwrap();
        setup.names[0].clear();
        app.start_match();
        assert_eq!(app.state.active_screen, Screen::Setup);
        assert_eq!(
            app.state.setup.as_ref().unwrap().error.as_deref(),
            Some("Please enter a name for all players")
        );
    }

    #[test]
    fn winning_records_history_and_opens_game_over() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        start(&mut app, 0, false);
        for _ in 0..11 {
            app.score_point();
        }
        assert_eq!(app.state.active_screen, Screen::GameOver);
        assert_eq!(app.state.history.log.len(), 1);

        app.share_result();
        let share = app.state.result.as_ref().unwrap().share.clone().unwrap();
        assert_eq!(share.text, "Player 1 def. Player 2\nScore: 11 - 0");
        let payload = share.link.trim_start_matches("picklescore --match ");
        let decoded = share::decode(payload).unwrap();
        assert_eq!(decoded.winner.map(|t| t.id), Some(TEAM_ONE));
    }

    #[test]
    fn locked_server_blocks_manual_change() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        start(&mut app, 0, false);
        app.game_digit(2);
        app.set_selected_server();
        assert_eq!(app.state.last_error.as_deref(), Some("Server selection is locked"));
        assert_eq!(
            app.state.game.as_ref().unwrap().controller.state().server_player_id,
            Some(0)
        );

        app.toggle_server_lock();
        app.set_selected_server();
        assert_eq!(
            app.state.game.as_ref().unwrap().controller.state().server_player_id,
            Some(1)
        );
    }

    #[test]
    fn advanced_flow_records_reason() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        start(&mut app, 1, false);
        app.game_digit(1);
        app.choose_outcome(OutcomeKind::Winner);
        app.game_digit(5);
        let game = app.state.game.as_ref().unwrap();
        let log = &game.controller.state().rally_log;
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].reason, Reason::Smash);
        assert_eq!(game.controller.state().score().team1_score, 1);
        assert!(game.selected_player.is_none());
    }

    #[test]
    fn outcome_keys_do_nothing_outside_advanced_mode() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        start(&mut app, 0, false);
        app.game_digit(1);
        app.choose_outcome(OutcomeKind::Error);
        assert!(app.state.game.as_ref().unwrap().pending_outcome.is_none());
    }

    #[test]
    fn bad_share_link_stays_home() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.open_shared("definitely not a link");
        assert_eq!(app.state.active_screen, Screen::Home);
        assert!(app.state.last_error.is_some());
    }

    #[test]
    fn shared_link_opens_result_screen() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        start(&mut app, 2, false);
        for _ in 0..11 {
            app.score_point();
        }
        app.share_result();
        let link = app.state.result.as_ref().unwrap().share.clone().unwrap().link;
        let payload = link.trim_start_matches("picklescore --match ").to_string();

        let mut other = app_in(dir.path());
        other.open_shared(&payload);
        assert_eq!(other.state.active_screen, Screen::SharedResult);
        let view = &other.state.result.as_ref().unwrap().view;
        assert_eq!(view.game_mode, GameMode::SimpleSingles);
        assert!(view.result.is_none());
    }
}
