use chrono::{TimeZone, Utc};
use pickleball_core::share::{self, ShareSchema};
use pickleball_core::stats;
use pickleball_core::store::{HistoryStore, MatchLog};
use pickleball_core::{
    GameMode, MatchController, OutcomeKind, Player, Reason, TEAM_ONE, TEAM_TWO, Team, Transition,
};

fn doubles_teams() -> [Team; 2] {
    [
        Team::new(TEAM_ONE, vec![Player::new(0, "Ann"), Player::new(1, "Bob")]),
        Team::new(TEAM_TWO, vec![Player::new(2, "Cy"), Player::new(3, "Di")]),
    ]
}

/// Plays an advanced doubles match where team 1 wins every rally it serves
/// and team 2 errors whenever it serves.
fn play_advanced_doubles() -> MatchController {
    let mut c = MatchController::new(GameMode::AdvancedDoubles);
    let at = Utc.with_ymd_and_hms(2025, 7, 4, 18, 0, 0).unwrap();
    assert_eq!(c.start_game_at(doubles_teams(), 0, at), Transition::Applied);

    let mut guard = 0;
    while !c.is_over() {
        guard += 1;
        assert!(guard < 200, "match did not finish");
        let server = c.server().map(|p| p.id).expect("server");
        if c.serving_team().map(|t| t.id) == Some(TEAM_ONE) {
            c.record_rally_outcome(server, OutcomeKind::Winner, Reason::Smash);
        } else {
            c.record_rally_outcome(server, OutcomeKind::Error, Reason::Net);
        }
    }
    c
}

#[test]
fn finished_match_flows_into_history_and_share_link() {
    let c = play_advanced_doubles();
    let result = c.match_result().expect("result");
    assert_eq!(result.winner.id, TEAM_ONE);
    assert_eq!(result.winner.score, 11);
    assert_eq!(result.id, "2025-07-04T18:00:00.000Z");

    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::in_dir(dir.path());
    let mut log = store.load();
    assert!(log.record(result.clone()));
    assert!(!log.record(result.clone()));
    assert!(store.save(&log));

    let reloaded = store.load();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.get_newest(0), Some(&result));

    let url = share::share_url("https://score.example/", &result).unwrap();
    let shared = share::decode_link(&url).unwrap();
    assert_eq!(shared.schema, ShareSchema::Compact { version: 2 });
    assert_eq!(shared.game_mode, GameMode::AdvancedDoubles);
    assert_eq!(shared.winner.as_ref().map(|t| t.score), Some(11));
    assert_eq!(shared.score_history, result.score_history);
    assert_eq!(shared.game_history.len(), result.game_history.len());

    // names survive even though slot order changed during play
    let mut names: Vec<String> = shared
        .teams
        .iter()
        .flat_map(|t| t.players.iter().map(|p| p.name.clone()))
        .collect();
    names.sort();
    assert_eq!(names, ["Ann", "Bob", "Cy", "Di"]);

    let text = stats::share_text(&result.winner, &result.teams);
    assert!(text.ends_with("Score: 11 - 0"));
}

#[test]
fn shared_stats_match_local_stats() {
    let c = play_advanced_doubles();
    let result = c.match_result().unwrap();
    let shared = share::decode(&share::encode(&result).unwrap()).unwrap();

    let local: Vec<(String, u32, u32)> = stats::player_summaries(&result.teams, &result.game_history)
        .into_iter()
        .map(|s| (s.name, s.winners, s.errors))
        .collect();
    let remote: Vec<(String, u32, u32)> = stats::player_summaries(&shared.teams, &shared.game_history)
        .into_iter()
        .map(|s| (s.name, s.winners, s.errors))
        .collect();
    assert_eq!(local, remote);

    let smashes: u32 = local.iter().map(|(_, w, _)| w).sum();
    assert_eq!(smashes, 11);
}

#[test]
fn undo_reopens_a_won_match_before_it_is_recorded() {
    let mut c = play_advanced_doubles();
    assert!(c.match_result().is_some());
    assert_eq!(c.undo(), Transition::Applied);
    assert!(!c.is_over());
    assert!(c.match_result().is_none());

    let mut log = MatchLog::default();
    assert!(log.is_empty());
    let server = c.server().map(|p| p.id).unwrap();
    assert!(matches!(
        c.record_rally_outcome(server, OutcomeKind::Winner, Reason::Serve),
        Transition::Won(TEAM_ONE)
    ));
    assert!(log.record(c.match_result().unwrap()));
}
