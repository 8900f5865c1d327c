use crate::{OutcomeKind, PlayerId, Reason, StatPoint, Team};

/// Winners and errors attributed to one player over a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSummary {
    pub player_id: PlayerId,
    pub name: String,
    pub winners: u32,
    pub errors: u32,
}

/// Per-reason counts for one player, each list sorted by count descending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReasonBreakdown {
    pub winners: Vec<(Reason, u32)>,
    pub errors: Vec<(Reason, u32)>,
}

impl ReasonBreakdown {
    pub fn is_empty(&self) -> bool {
        self.winners.is_empty() && self.errors.is_empty()
    }

    /// Largest single count, never below 1 so it can scale a bar.
    pub fn max_count(&self) -> u32 {
        self.winners
            .iter()
            .chain(self.errors.iter())
            .map(|(_, n)| *n)
            .max()
            .unwrap_or(0)
            .max(1)
    }
}

pub fn player_summaries(teams: &[Team], log: &[StatPoint]) -> Vec<PlayerSummary> {
    teams
        .iter()
        .flat_map(|t| t.players.iter())
        .map(|player| {
            let count = |kind: OutcomeKind| {
                log.iter()
                    .filter(|p| p.player_id == player.id && p.kind == kind)
                    .count() as u32
            };
            PlayerSummary {
                player_id: player.id,
                name: player.name.clone(),
                winners: count(OutcomeKind::Winner),
                errors: count(OutcomeKind::Error),
            }
        })
        .collect()
}

pub fn reason_breakdown(player_id: PlayerId, log: &[StatPoint]) -> ReasonBreakdown {
    let mut breakdown = ReasonBreakdown::default();
    for point in log.iter().filter(|p| p.player_id == player_id) {
        let bucket = match point.kind {
            OutcomeKind::Winner => &mut breakdown.winners,
            OutcomeKind::Error => &mut breakdown.errors,
        };
        match bucket.iter_mut().find(|(reason, _)| *reason == point.reason) {
            Some((_, n)) => *n += 1,
            None => bucket.push((point.reason, 1)),
        }
    }
    // stable sort keeps first-seen order between equal counts
    breakdown.winners.sort_by(|a, b| b.1.cmp(&a.1));
    breakdown.errors.sort_by(|a, b| b.1.cmp(&a.1));
    breakdown
}

/// "11 - 7" with the winner first; just the winner's score when the other
/// team is missing.
pub fn final_score_line(winner: &Team, teams: &[Team]) -> String {
    match teams.iter().find(|t| t.id != winner.id) {
        Some(loser) => format!("{} - {}", winner.score, loser.score),
        None => winner.score.to_string(),
    }
}

/// Plain-text result suitable for pasting next to a share link.
pub fn share_text(winner: &Team, teams: &[Team]) -> String {
    let loser_names = teams
        .iter()
        .find(|t| t.id != winner.id)
        .map(Team::names)
        .unwrap_or_default();
    format!(
        "{} def. {}\nScore: {}",
        winner.names(),
        loser_names,
        final_score_line(winner, teams)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Player, TEAM_ONE, TEAM_TWO};

    fn point(player_id: PlayerId, kind: OutcomeKind, reason: Reason) -> StatPoint {
        StatPoint {
            player_id,
            team_id: if player_id < 2 { TEAM_ONE } else { TEAM_TWO },
            kind,
            reason,
        }
    }

    fn teams() -> Vec<Team> {
        let mut t1 = Team::new(TEAM_ONE, vec![Player::new(0, "Ann"), Player::new(1, "Bob")]);
        let mut t2 = Team::new(TEAM_TWO, vec![Player::new(2, "Cy"), Player::new(3, "Di")]);
        t1.score = 11;
        t2.score = 7;
        vec![t1, t2]
    }

    #[test]
    fn summaries_count_per_player_in_team_order() {
        let log = vec![
            point(0, OutcomeKind::Winner, Reason::Smash),
            point(0, OutcomeKind::Error, Reason::Net),
            point(3, OutcomeKind::Winner, Reason::Serve),
            point(0, OutcomeKind::Winner, Reason::Volley),
        ];
        let summaries = player_summaries(&teams(), &log);
        assert_eq!(summaries.len(), 4);
        assert_eq!(summaries[0].name, "Ann");
        assert_eq!((summaries[0].winners, summaries[0].errors), (2, 1));
        assert_eq!((summaries[1].winners, summaries[1].errors), (0, 0));
        assert_eq!((summaries[3].winners, summaries[3].errors), (1, 0));
    }

    #[test]
    fn breakdown_sorts_by_count() {
        let log = vec![
            point(2, OutcomeKind::Error, Reason::Out),
            point(2, OutcomeKind::Error, Reason::Net),
            point(2, OutcomeKind::Error, Reason::Net),
            point(2, OutcomeKind::Winner, Reason::Forehand),
            point(1, OutcomeKind::Winner, Reason::Smash),
        ];
        let b = reason_breakdown(2, &log);
        assert_eq!(b.errors, vec![(Reason::Net, 2), (Reason::Out, 1)]);
        assert_eq!(b.winners, vec![(Reason::Forehand, 1)]);
        assert_eq!(b.max_count(), 2);
        assert!(reason_breakdown(3, &log).is_empty());
        assert_eq!(reason_breakdown(3, &log).max_count(), 1);
    }

    #[test]
    fn share_text_names_both_sides() {
        let teams = teams();
        assert_eq!(final_score_line(&teams[0], &teams), "11 - 7");
        assert_eq!(
            share_text(&teams[0], &teams),
            "Ann & Bob def. Cy & Di\nScore: 11 - 7"
        );
    }
}
