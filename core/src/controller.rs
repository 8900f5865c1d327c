use crate::{
    GameMode, MatchResult, OutcomeKind, Player, PlayerId, Reason, ScoreSnapshot, StatPoint, TEAM_ONE,
    TEAM_TWO, Team, TeamId, designated_slot,
};
use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, info};

/// Points needed to take a game, subject to [`WIN_MARGIN`].
pub const WINNING_SCORE: u32 = 11;
/// Lead a team must hold over the other once it reaches [`WINNING_SCORE`].
pub const WIN_MARGIN: u32 = 2;

/// Doubles server sequence within one service turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ServerNumber {
    #[default]
    First,
    Second,
}

impl ServerNumber {
    pub fn number(self) -> u8 {
        match self {
            ServerNumber::First => 1,
            ServerNumber::Second => 2,
        }
    }

    fn toggled(self) -> Self {
        match self {
            ServerNumber::First => ServerNumber::Second,
            ServerNumber::Second => ServerNumber::First,
        }
    }
}

/// What an operation did to the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    /// The operation ended the match; carries the winning team.
    Won(TeamId),
    /// Unknown reference, wrong phase, or nothing to change. State untouched.
    Ignored,
}

impl Transition {
    pub fn is_applied(self) -> bool {
        !matches!(self, Transition::Ignored)
    }
}

/// Complete snapshot of a match. Cloned onto the undo log before every
/// applied mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchState {
    /// Always ordered team 1, team 2.
    pub teams: [Team; 2],
    pub serving_team_id: Option<TeamId>,
    pub server_player_id: Option<PlayerId>,
    pub server_number: ServerNumber,
    pub is_first_serve_of_game: bool,
    pub rally_log: Vec<StatPoint>,
    pub score_log: Vec<ScoreSnapshot>,
    pub winner: Option<TeamId>,
}

impl Default for MatchState {
    fn default() -> Self {
        Self {
            teams: [Team::new(TEAM_ONE, Vec::new()), Team::new(TEAM_TWO, Vec::new())],
            serving_team_id: None,
            server_player_id: None,
            server_number: ServerNumber::First,
            is_first_serve_of_game: true,
            rally_log: Vec::new(),
            score_log: vec![ScoreSnapshot::default()],
            winner: None,
        }
    }
}

impl MatchState {
    pub fn team(&self, team_id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == team_id)
    }

    fn team_mut(&mut self, team_id: TeamId) -> Option<&mut Team> {
        self.teams.iter_mut().find(|t| t.id == team_id)
    }

    pub fn team_of(&self, player_id: PlayerId) -> Option<&Team> {
        self.teams.iter().find(|t| t.has_player(player_id))
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.teams.iter().find_map(|t| t.player(player_id))
    }

    pub fn score(&self) -> ScoreSnapshot {
        ScoreSnapshot::new(self.teams[0].score, self.teams[1].score)
    }

    fn opponent_of(team_id: TeamId) -> TeamId {
        if team_id == TEAM_ONE { TEAM_TWO } else { TEAM_ONE }
    }

    fn push_score_snapshot(&mut self) {
        let snapshot = self.score();
        self.score_log.push(snapshot);
    }

    /// Award a point, rotate doubles partners, record the snapshot and check
    /// for a winner.
    fn award_point(&mut self, team_id: TeamId, doubles: bool) -> Transition {
        let Some(team) = self.team_mut(team_id) else {
            return Transition::Ignored;
        };
        team.score += 1;
        if doubles {
            team.swap_players();
        }
        self.push_score_snapshot();
        self.evaluate_win(team_id)
    }

    fn evaluate_win(&mut self, team_id: TeamId) -> Transition {
        let (Some(team), Some(other)) = (self.team(team_id), self.team(Self::opponent_of(team_id)))
        else {
            return Transition::Applied;
        };
        if team.score >= WINNING_SCORE && team.score >= other.score + WIN_MARGIN {
            info!("team {team_id} wins {}-{}", team.score, other.score);
            self.winner = Some(team_id);
            return Transition::Won(team_id);
        }
        Transition::Applied
    }

    fn fault(&mut self, doubles: bool) {
        let Some(serving_id) = self.serving_team_id else {
            return;
        };
        if !doubles || self.is_first_serve_of_game || self.server_number == ServerNumber::Second {
            self.side_out(Self::opponent_of(serving_id), doubles);
            return;
        }

        let partner = self.team(serving_id).and_then(|team| {
            team.players
                .iter()
                .find(|p| Some(p.id) != self.server_player_id)
                .map(|p| p.id)
        });
        match partner {
            Some(partner_id) => {
                debug!("second server up for team {serving_id}: player {partner_id}");
                self.server_player_id = Some(partner_id);
                self.server_number = ServerNumber::Second;
            }
            None => self.side_out(Self::opponent_of(serving_id), doubles),
        }
    }

    fn side_out(&mut self, next_team_id: TeamId, doubles: bool) {
        self.serving_team_id = Some(next_team_id);
        self.is_first_serve_of_game = false;
        self.server_number = ServerNumber::First;

        let slot = if doubles { designated_slot(next_team_id) } else { 0 };
        self.server_player_id = self.team(next_team_id).and_then(|team| {
            team.players
                .get(slot)
                .or_else(|| team.players.first())
                .map(|p| p.id)
        });
        info!(
            "side out: team {next_team_id} serving, server {:?}",
            self.server_player_id
        );
    }
}

/// Owns the authoritative match state and applies scoring, fault and
/// serve-rotation rules.
#[derive(Debug, Clone)]
pub struct MatchController {
    mode: GameMode,
    started_at: Option<DateTime<Utc>>,
    state: MatchState,
    undo_log: Vec<MatchState>,
}

impl MatchController {
    pub fn new(mode: GameMode) -> Self {
        Self {
            mode,
            started_at: None,
            state: MatchState::default(),
            undo_log: Vec::new(),
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn is_started(&self) -> bool {
        self.state.serving_team_id.is_some()
    }

    pub fn winner(&self) -> Option<&Team> {
        self.state.winner.and_then(|id| self.state.team(id))
    }

    pub fn is_over(&self) -> bool {
        self.state.winner.is_some()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_log.is_empty()
    }

    pub fn serving_team(&self) -> Option<&Team> {
        self.state.serving_team_id.and_then(|id| self.state.team(id))
    }

    pub fn receiving_team(&self) -> Option<&Team> {
        self.state
            .serving_team_id
            .and_then(|id| self.state.team(MatchState::opponent_of(id)))
    }

    pub fn server(&self) -> Option<&Player> {
        self.state.server_player_id.and_then(|id| self.state.player(id))
    }

    /// Diagonal rule: the receiver stands opposite the server, in the other slot.
    pub fn expected_receiver(&self) -> Option<&Player> {
        let receiving = self.receiving_team()?;
        if !self.mode.is_doubles() || receiving.players.len() < 2 {
            return receiving.players.first();
        }
        let server_slot = self
            .serving_team()
            .and_then(|t| self.state.server_player_id.and_then(|id| t.slot_of(id)))?;
        receiving.players.get(1 - server_slot.min(1))
    }

    pub fn start_game(&mut self, teams: [Team; 2], first_server_id: PlayerId) -> Transition {
        self.start_game_at(teams, first_server_id, Utc::now())
    }

    /// Begin a match. The serving player must belong to one of the teams and
    /// the teams must be exactly team 1 and team 2; otherwise nothing happens.
    pub fn start_game_at(
        &mut self,
        teams: [Team; 2],
        first_server_id: PlayerId,
        started_at: DateTime<Utc>,
    ) -> Transition {
        let [a, b] = teams;
        let mut teams = if a.id == TEAM_ONE && b.id == TEAM_TWO {
            [a, b]
        } else if a.id == TEAM_TWO && b.id == TEAM_ONE {
            [b, a]
        } else {
            debug!("start ignored: team ids must be 1 and 2");
            return Transition::Ignored;
        };

        let Some(serving) = teams.iter_mut().find(|t| t.has_player(first_server_id)) else {
            debug!("start ignored: server {first_server_id} is on neither team");
            return Transition::Ignored;
        };
        let serving_id = serving.id;
        if self.mode.is_doubles() && serving.players.len() == 2 {
            let required = designated_slot(serving_id);
            if serving.players[required].id != first_server_id {
                serving.swap_players();
            }
        }
        for team in teams.iter_mut() {
            team.score = 0;
        }

        self.started_at = Some(started_at);
        self.undo_log.clear();
        self.state = MatchState {
            teams,
            serving_team_id: Some(serving_id),
            server_player_id: Some(first_server_id),
            server_number: if self.mode.is_doubles() {
                ServerNumber::Second
            } else {
                ServerNumber::First
            },
            ..MatchState::default()
        };
        info!(
            "{} match started, team {serving_id} serving (player {first_server_id})",
            self.mode.label()
        );
        Transition::Applied
    }

    pub fn record_score(&mut self, team_id: TeamId) -> Transition {
        if !self.accepts_play("score") || self.state.team(team_id).is_none() {
            return Transition::Ignored;
        }
        self.checkpoint();
        let doubles = self.mode.is_doubles();
        self.state.award_point(team_id, doubles)
    }

    /// Manual correction. Only the serving team can lose a point this way.
    pub fn decrement_score(&mut self, team_id: TeamId) -> Transition {
        if !self.accepts_play("decrement") || self.state.serving_team_id != Some(team_id) {
            return Transition::Ignored;
        }
        self.checkpoint();
        if let Some(team) = self.state.team_mut(team_id) {
            team.score = team.score.saturating_sub(1);
        }
        self.state.push_score_snapshot();
        Transition::Applied
    }

    pub fn record_fault(&mut self) -> Transition {
        if !self.accepts_play("fault") {
            return Transition::Ignored;
        }
        self.checkpoint();
        let doubles = self.mode.is_doubles();
        self.state.fault(doubles);
        Transition::Applied
    }

    /// Attribute the rally to a player, then score or fault for the serving
    /// side: a serving-side winner or receiving-side error is a point, the
    /// other two combinations are a fault.
    pub fn record_rally_outcome(
        &mut self,
        player_id: PlayerId,
        kind: OutcomeKind,
        reason: Reason,
    ) -> Transition {
        if !self.accepts_play("rally outcome") {
            return Transition::Ignored;
        }
        let (Some(serving_id), Some(team_id)) = (
            self.state.serving_team_id,
            self.state.team_of(player_id).map(|t| t.id),
        ) else {
            debug!("rally outcome ignored: unknown player {player_id}");
            return Transition::Ignored;
        };
        if reason.index_for(kind).is_none() {
            debug!("rally outcome ignored: {reason:?} is not a {kind:?} reason");
            return Transition::Ignored;
        }

        self.checkpoint();
        self.state.rally_log.push(StatPoint {
            player_id,
            team_id,
            kind,
            reason,
        });

        let doubles = self.mode.is_doubles();
        let on_serving_side = team_id == serving_id;
        if (kind == OutcomeKind::Winner) == on_serving_side {
            self.state.award_point(serving_id, doubles)
        } else {
            self.state.fault(doubles);
            Transition::Applied
        }
    }

    /// Manual server override.
    pub fn set_server(&mut self, player_id: PlayerId) -> Transition {
        if !self.accepts_play("set server") {
            return Transition::Ignored;
        }
        let Some(team_id) = self.state.team_of(player_id).map(|t| t.id) else {
            debug!("set server ignored: unknown player {player_id}");
            return Transition::Ignored;
        };
        let doubles = self.mode.is_doubles();

        if self.state.serving_team_id != Some(team_id) {
            self.checkpoint();
            let state = &mut self.state;
            state.serving_team_id = Some(team_id);
            state.is_first_serve_of_game = false;
            state.server_number = ServerNumber::First;
            if doubles
                && let Some(team) = state.team_mut(team_id)
                && team.slot_of(player_id) != Some(designated_slot(team_id))
            {
                team.swap_players();
            }
            state.server_player_id = Some(player_id);
            info!("server set to player {player_id}, side out to team {team_id}");
            return Transition::Applied;
        }

        if self.state.server_player_id == Some(player_id) {
            return Transition::Ignored;
        }
        self.checkpoint();
        self.state.server_player_id = Some(player_id);
        if doubles {
            self.state.server_number = self.state.server_number.toggled();
        }
        Transition::Applied
    }

    pub fn undo(&mut self) -> Transition {
        match self.undo_log.pop() {
            Some(previous) => {
                self.state = previous;
                Transition::Applied
            }
            None => Transition::Ignored,
        }
    }

    /// The persisted record, available once the match has a winner.
    pub fn match_result(&self) -> Option<MatchResult> {
        let winner = self.winner()?.clone();
        let id = self
            .started_at?
            .to_rfc3339_opts(SecondsFormat::Millis, true);
        Some(MatchResult {
            timestamp: id.clone(),
            id,
            winner,
            teams: self.state.teams.to_vec(),
            game_mode: self.mode,
            game_history: self.state.rally_log.clone(),
            score_history: self.state.score_log.clone(),
        })
    }

    fn accepts_play(&self, op: &str) -> bool {
        if self.is_over() {
            debug!("{op} ignored: match is over");
            return false;
        }
        if !self.is_started() {
            debug!("{op} ignored: match not started");
            return false;
        }
        true
    }

    fn checkpoint(&mut self) {
        self.undo_log.push(self.state.clone());
    }
}
