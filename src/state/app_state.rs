use crate::app::Screen;
use crate::locale::{Locale, tr_with};
use pickleball_core::share::SharedMatch;
use pickleball_core::store::{HistoryStore, MatchLog};
use pickleball_core::{
    GameMode, MatchController, MatchResult, OutcomeKind, Player, PlayerId, ScoreSnapshot,
    StatPoint, TEAM_ONE, TEAM_TWO, Team,
};

// ---------------------------------------------------------------------------
// Banner animation state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AnimationState {
    /// Current frame index into the banner frames array, wraps at FRAME_COUNT.
    pub frame: usize,
    /// Monotonic tick counter, drives the ball bounce.
    pub tick: u64,
}

impl AnimationState {
    pub fn advance(&mut self, frame_count: usize) {
        self.tick = self.tick.wrapping_add(1);
        self.frame = (self.frame + 1) % frame_count;
    }
}

// ---------------------------------------------------------------------------
// Home menu
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeEntry {
    Normal,
    Advanced,
    Simple,
    History,
}

impl HomeEntry {
    pub const ALL: [HomeEntry; 4] = [
        HomeEntry::Normal,
        HomeEntry::Advanced,
        HomeEntry::Simple,
        HomeEntry::History,
    ];

    pub fn key(self) -> &'static str {
        match self {
            HomeEntry::Normal => "normalMode",
            HomeEntry::Advanced => "advancedMode",
            HomeEntry::Simple => "simpleMode",
            HomeEntry::History => "matchHistory",
        }
    }

    pub fn mode(self, doubles: bool) -> Option<GameMode> {
        let mode = match (self, doubles) {
            (HomeEntry::Normal, false) => GameMode::Singles,
            (HomeEntry::Normal, true) => GameMode::Doubles,
            (HomeEntry::Advanced, false) => GameMode::AdvancedSingles,
            (HomeEntry::Advanced, true) => GameMode::AdvancedDoubles,
            (HomeEntry::Simple, false) => GameMode::SimpleSingles,
            (HomeEntry::Simple, true) => GameMode::SimpleDoubles,
            (HomeEntry::History, _) => return None,
        };
        Some(mode)
    }
}

#[derive(Debug, Default)]
pub struct HomeState {
    pub selected: usize,
    pub doubles: bool,
}

impl HomeState {
    pub fn entry(&self) -> HomeEntry {
        HomeEntry::ALL[self.selected % HomeEntry::ALL.len()]
    }

    pub fn move_down(&mut self) {
        self.selected = (self.selected + 1).min(HomeEntry::ALL.len() - 1);
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

// ---------------------------------------------------------------------------
// Match setup
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct SetupState {
    pub mode: GameMode,
    /// Team 1 names first, then team 2.
    pub names: Vec<String>,
    pub focus: usize,
    pub first_server: usize,
    pub error: Option<String>,
}

impl SetupState {
    pub fn new(mode: GameMode, locale: Locale) -> Self {
        let names = if mode.is_doubles() {
            [("1", "A"), ("1", "B"), ("2", "A"), ("2", "B")]
                .iter()
                .map(|(team, letter)| {
                    tr_with(
                        locale,
                        "playerPlaceholderWithTeam",
                        &[("teamNum", team), ("letter", letter)],
                    )
                })
                .collect()
        } else {
            ["1", "2"]
                .iter()
                .map(|num| tr_with(locale, "playerPlaceholder", &[("num", num)]))
                .collect()
        };
        Self {
            mode,
            names,
            focus: 0,
            // team 1's designated server slot
            first_server: if mode.is_doubles() { 1 } else { 0 },
            error: None,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.names.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + self.names.len() - 1) % self.names.len();
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(name) = self.names.get_mut(self.focus) {
            name.push(c);
        }
        self.error = None;
    }

    pub fn backspace(&mut self) {
        if let Some(name) = self.names.get_mut(self.focus) {
            name.pop();
        }
    }

    /// In doubles the chosen server is moved into the designated slot of its
    /// team (index 1 for team 1, index 2 for team 2) by swapping names.
    pub fn select_server(&mut self, index: usize) {
        if index >= self.names.len() {
            return;
        }
        if !self.mode.is_doubles() {
            self.first_server = index;
            return;
        }
        let (pair, target) = if index < 2 { ((0, 1), 1) } else { ((2, 3), 2) };
        if index != target {
            self.names.swap(pair.0, pair.1);
            if self.focus == pair.0 || self.focus == pair.1 {
                self.focus = if self.focus == pair.0 { pair.1 } else { pair.0 };
            }
        }
        self.first_server = target;
    }

    /// Teams and first server id, or the locale key of the validation error.
    pub fn build_teams(&self) -> Result<([Team; 2], PlayerId), &'static str> {
        if self.names.iter().any(|n| n.trim().is_empty()) {
            return Err("errorPlayerName");
        }
        let players: Vec<Player> = self
            .names
            .iter()
            .enumerate()
            .map(|(i, name)| Player::new(i as PlayerId, name.trim()))
            .collect();
        let split = self.mode.players_per_team();
        let teams = [
            Team::new(TEAM_ONE, players[..split].to_vec()),
            Team::new(TEAM_TWO, players[split..].to_vec()),
        ];
        Ok((teams, self.first_server as PlayerId))
    }
}

// ---------------------------------------------------------------------------
// Live match
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct GameState {
    pub controller: MatchController,
    pub server_locked: bool,
    /// Player highlighted by a 1-4 key, in on-screen order.
    pub selected_player: Option<PlayerId>,
    /// Advanced mode: outcome chosen, waiting for the reason.
    pub pending_outcome: Option<OutcomeKind>,
}

impl GameState {
    pub fn new(controller: MatchController) -> Self {
        Self {
            controller,
            server_locked: true,
            selected_player: None,
            pending_outcome: None,
        }
    }

    /// Players in on-screen order: team 1 top to bottom, then team 2.
    pub fn players_on_screen(&self) -> Vec<&Player> {
        self.controller
            .state()
            .teams
            .iter()
            .flat_map(|t| t.players.iter())
            .collect()
    }

    pub fn player_at(&self, slot: usize) -> Option<PlayerId> {
        self.players_on_screen().get(slot).map(|p| p.id)
    }

    pub fn clear_selection(&mut self) {
        self.selected_player = None;
        self.pending_outcome = None;
    }
}

// ---------------------------------------------------------------------------
// Finished match (own result, shared link, or history entry)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub game_mode: GameMode,
    pub winner: Option<Team>,
    pub teams: Vec<Team>,
    pub game_history: Vec<StatPoint>,
    pub score_history: Vec<ScoreSnapshot>,
    pub timestamp: Option<String>,
    /// The record this view was built from, when it is shareable.
    pub result: Option<MatchResult>,
}

impl ResultView {
    pub fn players(&self) -> Vec<&Player> {
        self.teams.iter().flat_map(|t| t.players.iter()).collect()
    }
}

impl From<MatchResult> for ResultView {
    fn from(result: MatchResult) -> Self {
        Self {
            game_mode: result.game_mode,
            winner: Some(result.winner.clone()),
            teams: result.teams.clone(),
            game_history: result.game_history.clone(),
            score_history: result.score_history.clone(),
            timestamp: Some(result.timestamp.clone()),
            result: Some(result),
        }
    }
}

impl From<SharedMatch> for ResultView {
    fn from(shared: SharedMatch) -> Self {
        Self {
            game_mode: shared.game_mode,
            winner: shared.winner,
            teams: shared.teams,
            game_history: shared.game_history,
            score_history: shared.score_history,
            timestamp: None,
            result: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShareOutput {
    pub link: String,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct ResultState {
    pub view: ResultView,
    /// Highlighted row of the analysis table.
    pub cursor: usize,
    /// Player whose reason breakdown is open.
    pub detail_player: Option<PlayerId>,
    pub share: Option<ShareOutput>,
}

impl ResultState {
    pub fn new(view: impl Into<ResultView>) -> Self {
        Self {
            view: view.into(),
            cursor: 0,
            detail_player: None,
            share: None,
        }
    }

    pub fn cursor_down(&mut self) {
        let max = self.view.players().len().saturating_sub(1);
        self.cursor = (self.cursor + 1).min(max);
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn open_detail(&mut self) {
        self.detail_player = self.view.players().get(self.cursor).map(|p| p.id);
    }

    pub fn close_detail(&mut self) -> bool {
        self.detail_player.take().is_some()
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct HistoryState {
    pub store: HistoryStore,
    pub log: MatchLog,
    /// Index in newest-first order.
    pub selected: usize,
    pub detail: Option<ResultState>,
    pub confirm_clear: bool,
}

impl HistoryState {
    pub fn load(store: HistoryStore) -> Self {
        let log = store.load();
        Self {
            store,
            log,
            selected: 0,
            detail: None,
            confirm_clear: false,
        }
    }

    /// Adds a finished match and persists the log. Duplicate ids are skipped.
    pub fn record(&mut self, result: MatchResult) -> bool {
        if !self.log.record(result) {
            return false;
        }
        self.store.save(&self.log)
    }

    pub fn clear(&mut self) {
        self.store.clear(&mut self.log);
        self.selected = 0;
        self.detail = None;
        self.confirm_clear = false;
    }

    pub fn move_down(&mut self) {
        self.selected = (self.selected + 1).min(self.log.len().saturating_sub(1));
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn open_selected(&mut self) {
        self.detail = self
            .log
            .get_newest(self.selected)
            .cloned()
            .map(ResultState::new);
    }
}

// ---------------------------------------------------------------------------

pub struct AppState {
    pub active_screen: Screen,
    pub previous_screen: Screen,
    pub show_intro: bool,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub home: HomeState,
    pub setup: Option<SetupState>,
    pub game: Option<GameState>,
    pub result: Option<ResultState>,
    pub history: HistoryState,
    pub animation: AnimationState,
}

impl AppState {
    pub fn new(history: HistoryStore) -> Self {
        Self {
            active_screen: Screen::default(),
            previous_screen: Screen::default(),
            show_intro: true,
            show_logs: false,
            last_error: None,
            home: HomeState::default(),
            setup: None,
            game: None,
            result: None,
            history: HistoryState::load(history),
            animation: AnimationState::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_entries_map_to_modes() {
        assert_eq!(HomeEntry::Advanced.mode(true), Some(GameMode::AdvancedDoubles));
        assert_eq!(HomeEntry::Simple.mode(false), Some(GameMode::SimpleSingles));
        assert_eq!(HomeEntry::History.mode(true), None);

        let mut home = HomeState::default();
        home.move_up();
        assert_eq!(home.entry(), HomeEntry::Normal);
        for _ in 0..10 {
            home.move_down();
        }
        assert_eq!(home.entry(), HomeEntry::History);
    }

    #[test]
    fn setup_defaults_follow_format() {
        let singles = SetupState::new(GameMode::Singles, Locale::En);
        assert_eq!(singles.names, ["Player 1", "Player 2"]);
        assert_eq!(singles.first_server, 0);

        let doubles = SetupState::new(GameMode::Doubles, Locale::En);
        assert_eq!(doubles.names, ["Player 1A", "Player 1B", "Player 2A", "Player 2B"]);
        assert_eq!(doubles.first_server, 1);
    }

    #[test]
    fn doubles_server_choice_swaps_into_designated_slot() {
        let mut setup = SetupState::new(GameMode::Doubles, Locale::En);
        setup.select_server(0);
        assert_eq!(setup.first_server, 1);
        assert_eq!(setup.names[1], "Player 1A");

        setup.select_server(3);
        assert_eq!(setup.first_server, 2);
        assert_eq!(setup.names[2], "Player 2B");
        assert_eq!(setup.names[3], "Player 2A");

        let (teams, server) = setup.build_teams().unwrap();
        assert_eq!(server, 2);
        assert_eq!(teams[1].players[0].name, "Player 2B");
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut setup = SetupState::new(GameMode::Singles, Locale::En);
        setup.focus_next();
        for _ in 0..20 {
            setup.backspace();
        }
        setup.push_char(' ');
        assert_eq!(setup.build_teams().unwrap_err(), "errorPlayerName");
    }

    #[test]
    fn singles_teams_split_one_each() {
        let setup = SetupState::new(GameMode::AdvancedSingles, Locale::ZhTw);
        let (teams, server) = setup.build_teams().unwrap();
        assert_eq!(server, 0);
        assert_eq!(teams[0].players, vec![Player::new(0, "選手 1")]);
        assert_eq!(teams[1].players, vec![Player::new(1, "選手 2")]);
    }

    #[test]
    fn history_records_once_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = HistoryState::load(HistoryStore::in_dir(dir.path()));
        let mut controller = MatchController::new(GameMode::Singles);
        let (teams, server) = SetupState::new(GameMode::Singles, Locale::En)
            .build_teams()
            .unwrap();
        controller.start_game(teams, server);
        for _ in 0..11 {
            controller.record_score(TEAM_ONE);
        }
        let result = controller.match_result().unwrap();
        assert!(history.record(result.clone()));
        assert!(!history.record(result));

        let reloaded = HistoryState::load(HistoryStore::in_dir(dir.path()));
        assert_eq!(reloaded.log.len(), 1);

        history.open_selected();
        let detail = history.detail.as_ref().expect("detail");
        assert_eq!(detail.view.winner.as_ref().map(|t| t.id), Some(TEAM_ONE));

        history.clear();
        assert!(history.log.is_empty());
        assert!(history.detail.is_none());
    }

    #[test]
    fn result_cursor_opens_player_detail() {
        let shared = SharedMatch {
            schema: pickleball_core::share::ShareSchema::Legacy,
            game_mode: GameMode::AdvancedSingles,
            winner: None,
            teams: vec![
                Team::new(TEAM_ONE, vec![Player::new(0, "Ann")]),
                Team::new(TEAM_TWO, vec![Player::new(2, "Bo")]),
            ],
            game_history: Vec::new(),
            score_history: Vec::new(),
        };
        let mut state = ResultState::new(shared);
        state.cursor_down();
        state.cursor_down();
        state.open_detail();
        assert_eq!(state.detail_player, Some(2));
        assert!(state.close_detail());
        assert!(!state.close_detail());
    }
}
