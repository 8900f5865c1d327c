pub mod controller;
pub mod share;
pub mod stats;
pub mod store;

pub use controller::{MatchController, MatchState, ServerNumber, Transition, WINNING_SCORE};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Domain types
// ---------------------------------------------------------------------------

pub type PlayerId = u32;

/// Team identity. Only 1 and 2 name real teams; 0 marks "no team" in rally
/// entries decoded from share links whose player id matched nobody.
pub type TeamId = u8;

pub const TEAM_ONE: TeamId = 1;
pub const TEAM_TWO: TeamId = 2;

/// Player-list index the first server of a new service turn must occupy.
pub fn designated_slot(team_id: TeamId) -> usize {
    if team_id == TEAM_ONE { 1 } else { 0 }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub players: Vec<Player>,
    pub score: u32,
}

impl Team {
    pub fn new(id: TeamId, players: Vec<Player>) -> Self {
        Self { id, players, score: 0 }
    }

    pub fn has_player(&self, player_id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == player_id)
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn slot_of(&self, player_id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == player_id)
    }

    /// Display form, e.g. "Ann & Bob".
    pub fn names(&self) -> String {
        self.players
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(" & ")
    }

    pub(crate) fn swap_players(&mut self) {
        if self.players.len() == 2 {
            self.players.swap(0, 1);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    Winner,
    Error,
}

impl OutcomeKind {
    pub fn reasons(self) -> &'static [Reason] {
        match self {
            OutcomeKind::Winner => WINNER_REASONS,
            OutcomeKind::Error => ERROR_REASONS,
        }
    }

    /// Compact share-link code: 0 = winner, 1 = error.
    pub fn code(self) -> u8 {
        match self {
            OutcomeKind::Winner => 0,
            OutcomeKind::Error => 1,
        }
    }

    pub fn from_code(code: u8) -> Self {
        if code == 0 { OutcomeKind::Winner } else { OutcomeKind::Error }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reason {
    Forehand,
    Backhand,
    Serve,
    Volley,
    Smash,
    Net,
    Out,
}

/// Index order is part of the compact share-link format.
pub const WINNER_REASONS: &[Reason] = &[
    Reason::Forehand,
    Reason::Backhand,
    Reason::Serve,
    Reason::Volley,
    Reason::Smash,
];

/// Index order is part of the compact share-link format.
pub const ERROR_REASONS: &[Reason] = &[
    Reason::Forehand,
    Reason::Backhand,
    Reason::Serve,
    Reason::Net,
    Reason::Out,
];

impl Reason {
    pub fn key(self) -> &'static str {
        match self {
            Reason::Forehand => "forehand",
            Reason::Backhand => "backhand",
            Reason::Serve => "serve",
            Reason::Volley => "volley",
            Reason::Smash => "smash",
            Reason::Net => "net",
            Reason::Out => "out",
        }
    }

    pub fn index_for(self, kind: OutcomeKind) -> Option<usize> {
        kind.reasons().iter().position(|r| *r == self)
    }

    pub fn from_index(kind: OutcomeKind, index: usize) -> Option<Self> {
        kind.reasons().get(index).copied()
    }
}

/// One attributed rally ending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatPoint {
    pub player_id: PlayerId,
    pub team_id: TeamId,
    #[serde(rename = "type")]
    pub kind: OutcomeKind,
    pub reason: Reason,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSnapshot {
    pub team1_score: u32,
    pub team2_score: u32,
}

impl ScoreSnapshot {
    pub fn new(team1_score: u32, team2_score: u32) -> Self {
        Self { team1_score, team2_score }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameMode {
    #[default]
    Singles,
    Doubles,
    AdvancedSingles,
    AdvancedDoubles,
    SimpleSingles,
    SimpleDoubles,
}

impl GameMode {
    /// Index order is part of the compact share-link format.
    pub const ALL: [GameMode; 6] = [
        GameMode::Singles,
        GameMode::Doubles,
        GameMode::AdvancedSingles,
        GameMode::AdvancedDoubles,
        GameMode::SimpleSingles,
        GameMode::SimpleDoubles,
    ];

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|m| *m == self).unwrap_or_default()
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn is_doubles(self) -> bool {
        matches!(
            self,
            GameMode::Doubles | GameMode::AdvancedDoubles | GameMode::SimpleDoubles
        )
    }

    pub fn is_advanced(self) -> bool {
        matches!(self, GameMode::AdvancedSingles | GameMode::AdvancedDoubles)
    }

    pub fn is_simple(self) -> bool {
        matches!(self, GameMode::SimpleSingles | GameMode::SimpleDoubles)
    }

    pub fn players_per_team(self) -> usize {
        if self.is_doubles() { 2 } else { 1 }
    }

    /// Locale table key, matching the serialized name.
    pub fn key(self) -> &'static str {
        match self {
            GameMode::Singles => "SINGLES",
            GameMode::Doubles => "DOUBLES",
            GameMode::AdvancedSingles => "ADVANCED_SINGLES",
            GameMode::AdvancedDoubles => "ADVANCED_DOUBLES",
            GameMode::SimpleSingles => "SIMPLE_SINGLES",
            GameMode::SimpleDoubles => "SIMPLE_DOUBLES",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GameMode::Singles => "Singles",
            GameMode::Doubles => "Doubles",
            GameMode::AdvancedSingles => "Advanced Singles",
            GameMode::AdvancedDoubles => "Advanced Doubles",
            GameMode::SimpleSingles => "Simple Singles",
            GameMode::SimpleDoubles => "Simple Doubles",
        }
    }
}

/// A finished match as persisted in the history store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub id: String,
    pub timestamp: String,
    pub winner: Team,
    pub teams: Vec<Team>,
    pub game_mode: GameMode,
    pub game_history: Vec<StatPoint>,
    pub score_history: Vec<ScoreSnapshot>,
}

impl MatchResult {
    pub fn loser(&self) -> Option<&Team> {
        self.teams.iter().find(|t| t.id != self.winner.id)
    }
}
