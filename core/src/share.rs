//! Shareable match links.
//!
//! A result travels as the `match` query parameter: standard base64 of the
//! URI-component-escaped JSON payload. Two payload shapes exist and both
//! decode to [`SharedMatch`]:
//!
//! * compact (version 2), a positional array
//!   `[version, modeIndex, winnerTeamId, teams, rallies, scores]`
//! * legacy, a verbose object mirroring [`MatchResult`] without id/timestamp

use crate::{
    GameMode, MatchResult, OutcomeKind, Player, PlayerId, Reason, ScoreSnapshot, StatPoint,
    TEAM_ONE, Team, TeamId,
};
use base64::{Engine as _, engine::general_purpose};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use thiserror::Error;
use url::{Url, form_urlencoded};

pub const SHARE_VERSION: u32 = 2;
pub const MATCH_PARAM: &str = "match";

/// Bytes escaped by ECMAScript `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("share payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("share payload is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("share payload escapes are not valid UTF-8")]
    Escape(#[from] std::str::Utf8Error),
    #[error("share payload is not a match: {0}")]
    Json(#[from] serde_json::Error),
    #[error("share payload must be a JSON array or object")]
    Shape,
    #[error("unknown game mode index {0}")]
    UnknownMode(usize),
    #[error("unknown {kind:?} reason index {index}")]
    UnknownReason { kind: OutcomeKind, index: usize },
    #[error("{reason:?} cannot be shared as a {kind:?} reason")]
    InvalidReason { kind: OutcomeKind, reason: Reason },
    #[error("player {0} is on neither team")]
    UnknownPlayer(PlayerId),
    #[error("link has no `match` parameter")]
    MissingParam,
    #[error("invalid share base URL: {0}")]
    BaseUrl(#[from] url::ParseError),
}

/// Which wire shape a link used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareSchema {
    Compact { version: u32 },
    Legacy,
}

/// A decoded shared result, independent of the wire shape it arrived in.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedMatch {
    pub schema: ShareSchema,
    pub game_mode: GameMode,
    /// `None` when the payload names a winner that is not one of its teams.
    pub winner: Option<Team>,
    pub teams: Vec<Team>,
    pub game_history: Vec<StatPoint>,
    pub score_history: Vec<ScoreSnapshot>,
}

type CompactTeam = (TeamId, Vec<String>, u32);
type CompactRally = (PlayerId, u8, usize);
type CompactScore = (u32, u32);

#[derive(Debug, Serialize, Deserialize)]
struct CompactPayload(
    u32,
    usize,
    TeamId,
    Vec<CompactTeam>,
    Vec<CompactRally>,
    Vec<CompactScore>,
);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyPayload {
    winner: Option<Team>,
    teams: Vec<Team>,
    game_mode: GameMode,
    #[serde(default)]
    game_history: Vec<StatPoint>,
    #[serde(default)]
    score_history: Vec<ScoreSnapshot>,
}

#[derive(Debug)]
enum SharePayload {
    Compact(CompactPayload),
    Legacy(LegacyPayload),
}

impl SharePayload {
    fn from_json(json: &str) -> Result<Self, ShareError> {
        let raw: Value = serde_json::from_str(json)?;
        match raw {
            Value::Array(_) => Ok(SharePayload::Compact(serde_json::from_value(raw)?)),
            Value::Object(_) => Ok(SharePayload::Legacy(serde_json::from_value(raw)?)),
            _ => Err(ShareError::Shape),
        }
    }

    fn into_shared(self) -> Result<SharedMatch, ShareError> {
        match self {
            SharePayload::Compact(CompactPayload(version, mode, winner_id, teams, rallies, scores)) => {
                let game_mode = GameMode::from_index(mode).ok_or(ShareError::UnknownMode(mode))?;
                let teams: Vec<Team> = teams
                    .into_iter()
                    .map(|(id, names, score)| Team {
                        id,
                        players: names
                            .into_iter()
                            .enumerate()
                            .map(|(i, name)| Player::new(compact_player_id(id, i), name))
                            .collect(),
                        score,
                    })
                    .collect();

                let game_history = rallies
                    .into_iter()
                    .map(|(player_id, code, index)| {
                        let kind = OutcomeKind::from_code(code);
                        let reason = Reason::from_index(kind, index)
                            .ok_or(ShareError::UnknownReason { kind, index })?;
                        let team_id = teams
                            .iter()
                            .find(|t| t.has_player(player_id))
                            .map(|t| t.id)
                            .unwrap_or(0);
                        Ok(StatPoint {
                            player_id,
                            team_id,
                            kind,
                            reason,
                        })
                    })
                    .collect::<Result<Vec<_>, ShareError>>()?;

                Ok(SharedMatch {
                    schema: ShareSchema::Compact { version },
                    game_mode,
                    winner: teams.iter().find(|t| t.id == winner_id).cloned(),
                    teams,
                    game_history,
                    score_history: scores
                        .into_iter()
                        .map(|(a, b)| ScoreSnapshot::new(a, b))
                        .collect(),
                })
            }
            SharePayload::Legacy(legacy) => Ok(SharedMatch {
                schema: ShareSchema::Legacy,
                game_mode: legacy.game_mode,
                winner: legacy.winner,
                teams: legacy.teams,
                game_history: legacy.game_history,
                score_history: legacy.score_history,
            }),
        }
    }
}

/// Player ids in compact links are positional: team 1 uses 0.., team 2 uses 2..
fn compact_player_id(team_id: TeamId, index: usize) -> PlayerId {
    let base = if team_id == TEAM_ONE { 0 } else { 2 };
    base + index as PlayerId
}

/// Encode a finished match as a compact share payload.
pub fn encode(result: &MatchResult) -> Result<String, ShareError> {
    let mut id_map: HashMap<PlayerId, PlayerId> = HashMap::new();
    for team in &result.teams {
        for (i, player) in team.players.iter().enumerate() {
            id_map.insert(player.id, compact_player_id(team.id, i));
        }
    }

    let teams = result
        .teams
        .iter()
        .map(|t| (t.id, t.players.iter().map(|p| p.name.clone()).collect(), t.score))
        .collect();
    let rallies = result
        .game_history
        .iter()
        .map(|p| {
            let index = p.reason.index_for(p.kind).ok_or(ShareError::InvalidReason {
                kind: p.kind,
                reason: p.reason,
            })?;
            let player_id = id_map
                .get(&p.player_id)
                .copied()
                .ok_or(ShareError::UnknownPlayer(p.player_id))?;
            Ok((player_id, p.kind.code(), index))
        })
        .collect::<Result<Vec<_>, ShareError>>()?;
    let scores = result
        .score_history
        .iter()
        .map(|s| (s.team1_score, s.team2_score))
        .collect();

    let payload = CompactPayload(
        SHARE_VERSION,
        result.game_mode.index(),
        result.winner.id,
        teams,
        rallies,
        scores,
    );
    let json = serde_json::to_string(&payload)?;
    Ok(general_purpose::STANDARD.encode(escape_component(&json)))
}

/// Decode a share payload of either shape.
pub fn decode(payload: &str) -> Result<SharedMatch, ShareError> {
    let bytes = general_purpose::STANDARD.decode(payload.trim())?;
    let escaped = String::from_utf8(bytes)?;
    let json = unescape_component(&escaped)?;
    SharePayload::from_json(&json)?.into_shared()
}

/// Accept either a full link, a query string, or a bare payload.
pub fn decode_link(input: &str) -> Result<SharedMatch, ShareError> {
    let input = input.trim();
    match match_param(input) {
        Some(payload) => decode(&payload),
        None if Url::parse(input).is_ok() || input.contains('?') => {
            Err(ShareError::MissingParam)
        }
        None => decode(input),
    }
}

/// `base` with the encoded result appended as the `match` query parameter.
/// A base without a scheme is read as https.
pub fn share_url(base: &str, result: &MatchResult) -> Result<String, ShareError> {
    let payload = encode(result)?;
    let mut url = Url::parse(base).or_else(|_| Url::parse(&format!("https://{base}")))?;
    url.query_pairs_mut().append_pair(MATCH_PARAM, &payload);
    Ok(url.into())
}

/// The form-decoded `match` parameter of a URL or bare query string.
pub fn match_param(input: &str) -> Option<String> {
    let value = match Url::parse(input) {
        Ok(url) => find_match(url.query_pairs()),
        Err(_) => {
            let query = input.split_once('?').map_or(input, |(_, q)| q);
            find_match(form_urlencoded::parse(query.as_bytes()))
        }
    };
    // base64 has no spaces: a space is an unescaped '+' read as form data
    value.map(|v| v.replace(' ', "+"))
}

fn find_match<'a>(
    mut pairs: impl Iterator<Item = (Cow<'a, str>, Cow<'a, str>)>,
) -> Option<String> {
    pairs
        .find(|(key, _)| *key == MATCH_PARAM)
        .map(|(_, value)| value.into_owned())
}

fn escape_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

fn unescape_component(input: &str) -> Result<String, ShareError> {
    Ok(percent_decode_str(input).decode_utf8()?.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TEAM_TWO;

    fn b64(text: &str) -> String {
        general_purpose::STANDARD.encode(text)
    }

    const COMPACT: &str = r#"[2,0,1,[[1,["A","B"],11],[2,["C","D"],5]],[],[[0,0],[11,5]]]"#;

    #[test]
    fn decodes_compact_payload() {
        let shared = decode(&b64(&escape_component(COMPACT))).expect("compact decode");
        assert_eq!(shared.schema, ShareSchema::Compact { version: 2 });
        assert_eq!(shared.game_mode, GameMode::Singles);

        let winner = shared.winner.expect("winner");
        assert_eq!(winner.id, TEAM_ONE);
        assert_eq!(winner.score, 11);
        assert_eq!(winner.names(), "A & B");

        assert_eq!(shared.teams[1].names(), "C & D");
        assert_eq!(shared.teams[1].score, 5);
        assert_eq!(shared.teams[1].players[0].id, 2);
        assert_eq!(
            shared.score_history,
            vec![ScoreSnapshot::new(0, 0), ScoreSnapshot::new(11, 5)]
        );
    }

    #[test]
    fn decodes_unescaped_json_too() {
        let shared = decode(&b64(COMPACT)).expect("raw json decode");
        assert_eq!(shared.teams.len(), 2);
    }

    #[test]
    fn compact_rallies_resolve_team_from_player() {
        let json = r#"[2,1,2,[[1,["A","B"],4],[2,["C","D"],11]],[[3,0,4],[1,1,3],[9,1,0]],[]]"#;
        let shared = decode(&b64(json)).unwrap();
        assert_eq!(shared.game_mode, GameMode::Doubles);
        let h = &shared.game_history;
        assert_eq!((h[0].team_id, h[0].kind, h[0].reason), (TEAM_TWO, OutcomeKind::Winner, Reason::Smash));
        assert_eq!((h[1].team_id, h[1].kind, h[1].reason), (TEAM_ONE, OutcomeKind::Error, Reason::Net));
        assert_eq!(h[2].team_id, 0);
    }

    #[test]
    fn decodes_legacy_object() {
        let json = r#"{
            "winner": {"id": 2, "players": [{"id": 1, "name": "Bea"}], "score": 11},
            "teams": [
                {"id": 1, "players": [{"id": 0, "name": "Al"}], "score": 6},
                {"id": 2, "players": [{"id": 1, "name": "Bea"}], "score": 11}
            ],
            "gameMode": "ADVANCED_SINGLES",
            "gameHistory": [{"playerId": 0, "teamId": 1, "type": "error", "reason": "out"}],
            "scoreHistory": [{"team1Score": 0, "team2Score": 0}]
        }"#;
        let shared = decode(&b64(&escape_component(json))).expect("legacy decode");
        assert_eq!(shared.schema, ShareSchema::Legacy);
        assert_eq!(shared.game_mode, GameMode::AdvancedSingles);
        assert_eq!(shared.winner.map(|t| t.id), Some(TEAM_TWO));
        assert_eq!(shared.game_history[0].reason, Reason::Out);
        assert_eq!(shared.score_history.len(), 1);
    }

    #[test]
    fn rejects_malformed_payloads() {
        assert!(matches!(decode("%%%"), Err(ShareError::Base64(_))));
        assert!(matches!(decode(&b64("42")), Err(ShareError::Shape)));
        assert!(matches!(decode(&b64("[1,2")), Err(ShareError::Json(_))));
        assert!(matches!(decode(&b64("%E4%B8")), Err(ShareError::Escape(_))));
        assert!(matches!(
            decode(&b64(r#"[2,9,1,[],[],[]]"#)),
            Err(ShareError::UnknownMode(9))
        ));
        assert!(matches!(
            decode(&b64(r#"[2,0,1,[[1,["A"],0]],[[0,0,7]],[]]"#)),
            Err(ShareError::UnknownReason { index: 7, .. })
        ));
    }

    fn finished_singles() -> MatchResult {
        let mut t1 = Team::new(TEAM_ONE, vec![Player::new(0, "林小明")]);
        let mut t2 = Team::new(TEAM_TWO, vec![Player::new(1, "Bo+Jo")]);
        t1.score = 11;
        t2.score = 9;
        MatchResult {
            id: "2025-06-01T09:30:00.000Z".into(),
            timestamp: "2025-06-01T09:30:00.000Z".into(),
            winner: t1.clone(),
            teams: vec![t1, t2],
            game_mode: GameMode::AdvancedSingles,
            game_history: vec![
                StatPoint { player_id: 1, team_id: TEAM_TWO, kind: OutcomeKind::Error, reason: Reason::Net },
                StatPoint { player_id: 0, team_id: TEAM_ONE, kind: OutcomeKind::Winner, reason: Reason::Serve },
            ],
            score_history: vec![ScoreSnapshot::new(0, 0), ScoreSnapshot::new(1, 0)],
        }
    }

    #[test]
    fn encoded_result_decodes_with_canonical_ids() {
        let result = finished_singles();
        let shared = decode(&encode(&result).unwrap()).unwrap();
        assert_eq!(shared.game_mode, GameMode::AdvancedSingles);
        assert_eq!(shared.winner.as_ref().map(Team::names), Some("林小明".to_string()));
        assert_eq!(shared.teams[1].players[0], Player::new(2, "Bo+Jo"));
        assert_eq!(shared.game_history[0].player_id, 2);
        assert_eq!(shared.game_history[0].team_id, TEAM_TWO);
        assert_eq!(shared.game_history[1].reason, Reason::Serve);
        assert_eq!(shared.score_history, result.score_history);
    }

    #[test]
    fn encode_refuses_reason_outside_outcome_list() {
        let mut result = finished_singles();
        result.game_history[0].kind = OutcomeKind::Winner;
        assert!(matches!(
            encode(&result),
            Err(ShareError::InvalidReason { reason: Reason::Net, .. })
        ));
    }

    #[test]
    fn share_url_round_trips_through_match_param() {
        let result = finished_singles();
        let url = share_url("https://score.example/app", &result).unwrap();
        assert!(url.starts_with("https://score.example/app?match="));
        let shared = decode_link(&url).unwrap();
        assert_eq!(shared.teams[0].score, 11);

        let with_query = share_url("https://score.example/?lang=en", &result).unwrap();
        assert!(with_query.contains("?lang=en&match="));
    }

    #[test]
    fn match_param_form_decodes_key_and_value() {
        assert_eq!(
            match_param("https://x.example/?m%61tch=WzIsMF0%3D").as_deref(),
            Some("WzIsMF0=")
        );
        assert_eq!(
            match_param("https://x.example/?lang=en&match=ab%2Bc#top").as_deref(),
            Some("ab+c")
        );
        assert_eq!(match_param("lang=en&match=xyz").as_deref(), Some("xyz"));
        assert_eq!(match_param("https://x.example/?lang=en"), None);
    }

    #[test]
    fn unescaped_plus_in_link_still_decodes() {
        let payload = encode(&finished_singles()).unwrap();
        assert_eq!(match_param("?match=a+b").as_deref(), Some("a+b"));
        let raw_link = format!("https://score.example/?match={payload}");
        let shared = decode_link(&raw_link).unwrap();
        assert_eq!(shared.teams[1].players[0].name, "Bo+Jo");
    }

    #[test]
    fn share_url_escapes_payload_as_form_value() {
        let result = finished_singles();
        let url = share_url("score.example/app", &result).unwrap();
        assert!(url.starts_with("https://score.example/app?match="));
        let query = url.split_once('?').map(|(_, q)| q).unwrap();
        assert!(!query.contains('+'));
        assert!(!query["match=".len()..].contains('='));
        assert_eq!(decode_link(&url).unwrap().teams[0].score, 11);
    }

    #[test]
    fn bare_payload_is_decoded_directly() {
        let payload = encode(&finished_singles()).unwrap();
        assert!(decode_link(&payload).is_ok());
        assert!(decode_link(&format!("match={payload}")).is_ok());
    }

    #[test]
    fn encode_refuses_rally_by_unknown_player() {
        let mut result = finished_singles();
        result.game_history[0].player_id = 2;
        assert!(matches!(encode(&result), Err(ShareError::UnknownPlayer(2))));
    }

    #[test]
    fn decode_link_without_param_fails() {
        assert!(matches!(
            decode_link("https://score.example/?lang=en"),
            Err(ShareError::MissingParam)
        ));
    }

    #[test]
    fn escape_matches_encode_uri_component() {
        assert_eq!(escape_component("a b&c=[1]"), "a%20b%26c%3D%5B1%5D");
        assert_eq!(escape_component("-_.!~*'()"), "-_.!~*'()");
        assert_eq!(escape_component("é"), "%C3%A9");
        assert_eq!(unescape_component("%C3%A9x").unwrap(), "éx");
        assert!(matches!(unescape_component("%FF"), Err(ShareError::Escape(_))));
    }
}
