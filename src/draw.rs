use log::error;
use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::symbols;
use tui::text::{Line, Span};
use tui::widgets::{
    Axis, Block, BorderType, Borders, Cell, Chart, Clear, Dataset, GraphType, Paragraph, Row,
    Table, TableState, Tabs, Wrap,
};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, Screen};
use crate::components::banner::AnimatedBanner;
use crate::components::banner_frames::{BannerColor, BannerTheme, resolve};
use crate::components::score_digits::BigScore;
use crate::locale::tr_with;
use crate::state::app_state::{GameState, HomeEntry, ResultState, ResultView};
use crate::ui::layout::LayoutAreas;
use pickleball_core::controller::{MatchState, WINNING_SCORE};
use pickleball_core::{GameMode, OutcomeKind, PlayerId, ScoreSnapshot, TEAM_ONE, TeamId, stats};

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let drawn = terminal.draw(|f| {
        if app.state.show_intro {
            draw_intro(f, f.area(), app);
            return;
        }

        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_screen {
            Screen::Home => draw_home(f, layout.main, app),
            Screen::Setup => draw_setup(f, layout.main, app),
            Screen::Game => draw_game(f, layout.main, app),
            Screen::GameOver | Screen::SharedResult => draw_result_screen(f, layout.main, app),
            Screen::History => draw_history(f, layout.main, app),
            Screen::Help => draw_help(f, layout.main, app),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }
    });
    if drawn.is_err() {
        error!("failed to draw frame");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn team_color(team_id: TeamId) -> Color {
    let role = if team_id == TEAM_ONE {
        BannerColor::Primary
    } else {
        BannerColor::Secondary
    };
    resolve(role, BannerTheme::Dark).fg.unwrap_or(Color::White)
}

fn hint_line(text: &str) -> Line<'_> {
    Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
}

fn error_line(text: &str) -> Line<'_> {
    Line::from(Span::styled(text, Style::default().fg(Color::Red)))
}

fn draw_intro(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::DarkGray).title(format!(" {} ", app.t("appName")));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [_top_pad, banner_area, prompt_area, _bottom_pad] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(8),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);
    f.render_widget(
        AnimatedBanner {
            frame: app.state.animation.frame,
            tick: app.state.animation.tick,
            theme: BannerTheme::Dark,
            subtitle: app.t("appName"),
        },
        banner_area,
    );
    f.render_widget(
        Paragraph::new(app.t("pressEnter"))
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center),
        prompt_area,
    );
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let screen = match app.state.active_screen {
        Screen::Help => app.state.previous_screen,
        other => other,
    };
    let tab_index = match screen {
        Screen::Home | Screen::Help => 0,
        Screen::Setup | Screen::Game => 1,
        Screen::GameOver | Screen::SharedResult => 2,
        Screen::History => 3,
    };

    let titles: Vec<Line> = ["tabHome", "tabMatch", "tabResult", "tabHistory"]
        .iter()
        .map(|key| Line::from(app.t(key)))
        .collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new(format!("{}  {}: ? ", app.locale().label(), app.t("help")))
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

// ---------------------------------------------------------------------------
// Home and setup
// ---------------------------------------------------------------------------

fn draw_home(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(format!(" {} ", app.t("chooseMode")));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let banner_height = if inner.height >= 20 { 8 } else { 0 };
    let [banner_area, menu_area, hint_area] = Layout::vertical([
        Constraint::Length(banner_height),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .areas(inner);

    if banner_height > 0 {
        f.render_widget(
            AnimatedBanner {
                frame: app.state.animation.frame,
                tick: app.state.animation.tick,
                theme: BannerTheme::Dark,
                subtitle: app.t("appName"),
            },
            banner_area,
        );
    }

    let home = &app.state.home;
    let mut lines = Vec::new();
    lines.push(Line::from(""));
    for (idx, entry) in HomeEntry::ALL.iter().enumerate() {
        let selected = idx == home.selected;
        let marker = if selected { "> " } else { "  " };
        let style = if selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!("{marker}{}", app.t(entry.key())),
            style,
        )));
    }

    lines.push(Line::from(""));
    let format_span = |label: &'static str, active: bool| {
        let style = if active {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Span::styled(format!(" {} ", app.t(label)), style)
    };
    lines.push(Line::from(vec![
        Span::raw(format!("{}: ", app.t("chooseGameType"))),
        format_span("singles", !home.doubles),
        Span::raw(" "),
        format_span("doubles", home.doubles),
    ]));
    lines.push(Line::from(format!(
        "{}: {}",
        app.t("language"),
        app.locale().label()
    )));

    if let Some(err) = app.state.last_error.as_deref() {
        lines.push(Line::from(""));
        lines.push(error_line(err));
    }

    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), menu_area);
    f.render_widget(
        Paragraph::new(vec![hint_line(app.t("keysHome")), hint_line(app.t("keysGlobal"))])
            .alignment(Alignment::Center),
        hint_area,
    );
}

fn draw_setup(f: &mut Frame, area: Rect, app: &App) {
    let Some(setup) = app.state.setup.as_ref() else {
        return;
    };
    let block = default_border(Color::White).title(format!(
        " {} - {} ",
        app.t("setup"),
        app.t(setup.mode.key())
    ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let per_team = setup.mode.players_per_team();
    let mut lines = Vec::new();
    for (idx, name) in setup.names.iter().enumerate() {
        if idx % per_team == 0 {
            let team_id = (idx / per_team) as TeamId + 1;
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("{} {team_id}", app.t("team")),
                Style::default()
                    .fg(team_color(team_id))
                    .add_modifier(Modifier::BOLD),
            )));
        }
        let focused = idx == setup.focus;
        let marker = if focused { "> " } else { "  " };
        let cursor = if focused { "_" } else { "" };
        let mut spans = vec![Span::styled(
            format!("{marker}{name}{cursor}"),
            if focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            },
        )];
        if idx == setup.first_server {
            spans.push(Span::styled(
                format!("  ({})", app.t("server")),
                Style::default().fg(Color::Green),
            ));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(format!(
        "{}: Tab    {}: Enter",
        app.t("selectFirstServer"),
        app.t("startMatch")
    )));
    if let Some(err) = setup.error.as_deref() {
        lines.push(error_line(err));
    }

    let [form_area, hint_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(inner);
    f.render_widget(Paragraph::new(lines), form_area);
    f.render_widget(
        Paragraph::new(hint_line(app.t("keysSetup"))).alignment(Alignment::Center),
        hint_area,
    );
}

// ---------------------------------------------------------------------------
// Live match
// ---------------------------------------------------------------------------

/// Spoken score call: serving team first, then the server number in doubles.
pub fn score_call(state: &MatchState, mode: GameMode) -> Option<String> {
    let serving = state.serving_team_id?;
    let serving_score = state.team(serving)?.score;
    let receiving_score = state.teams.iter().find(|t| t.id != serving)?.score;
    if mode.is_doubles() {
        Some(format!(
            "{serving_score}-{receiving_score}-{}",
            state.server_number.number()
        ))
    } else {
        Some(format!("{serving_score}-{receiving_score}"))
    }
}

fn draw_game(f: &mut Frame, area: Rect, app: &App) {
    let Some(game) = app.state.game.as_ref() else {
        return;
    };
    let mode = game.controller.mode();

    let [info_area, teams_area, controls_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(7),
    ])
    .areas(area);

    let lock_hint = if game.server_locked {
        app.t("unlockServer")
    } else {
        app.t("lockServer")
    };
    let call = score_call(game.controller.state(), mode).unwrap_or_default();
    let info = Line::from(vec![
        Span::styled(
            format!(" {} ", app.t(mode.key())),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {call} "), Style::default().fg(Color::Yellow)),
        Span::styled(
            format!(
                " x: {lock_hint}  {}: {}{} ",
                app.t("fontSize"),
                app.settings.effective_font_level(),
                if app.settings.compact_mode {
                    format!(" ({})", app.t("compactMode"))
                } else {
                    String::new()
                }
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(info), info_area);

    let [left, right] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .areas(teams_area);
    draw_team_panel(f, left, app, game, 0);
    draw_team_panel(f, right, app, game, 1);

    draw_game_controls(f, controls_area, app, game);
}

fn draw_team_panel(f: &mut Frame, area: Rect, app: &App, game: &GameState, team_idx: usize) {
    let state = game.controller.state();
    let team = &state.teams[team_idx];
    let color = team_color(team.id);
    let serving = state.serving_team_id == Some(team.id);

    let mut block = default_border(color).title(format!(" {} {} ", app.t("team"), team.id));
    if serving {
        block = block
            .border_type(BorderType::Thick)
            .title_bottom(Line::from(format!(" {} ", app.t("server"))).right_aligned());
    }
    let inner = block.inner(area);
    f.render_widget(block, area);

    let players_height = team.players.len() as u16 + 1;
    let [score_area, players_area] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(players_height),
    ])
    .areas(inner);

    f.render_widget(
        BigScore {
            value: team.score,
            level: app.settings.effective_font_level(),
            style: Style::default().fg(color).add_modifier(Modifier::BOLD),
        },
        score_area,
    );

    // on-screen slot numbers continue across teams, matching the 1-4 keys
    let slot_offset = if team_idx == 0 {
        0
    } else {
        state.teams[0].players.len()
    };
    let server_id = state.server_player_id;
    let receiver_id = game.controller.expected_receiver().map(|p| p.id);

    let mut lines = vec![Line::from("")];
    for (i, player) in team.players.iter().enumerate() {
        let mut spans = vec![Span::raw(format!("{} {}", slot_offset + i + 1, player.name))];
        if server_id == Some(player.id) {
            let label = if game.controller.mode().is_doubles() {
                format!("  {} -{}", app.t("server"), state.server_number.number())
            } else {
                format!("  {}", app.t("server"))
            };
            spans.push(Span::styled(
                label,
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ));
        }
        if receiver_id == Some(player.id) {
            spans.push(Span::styled(
                format!("  {}", app.t("receiver")),
                Style::default().fg(Color::Cyan),
            ));
        }
        let mut line = Line::from(spans);
        if game.selected_player == Some(player.id) {
            line = line.style(Style::default().add_modifier(Modifier::REVERSED));
        }
        lines.push(line);
    }
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), players_area);
}

fn draw_game_controls(f: &mut Frame, area: Rect, app: &App, game: &GameState) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mode = game.controller.mode();
    let mut lines = Vec::new();

    if mode.is_advanced() {
        match (game.selected_player, game.pending_outcome) {
            (None, _) => lines.push(Line::from(app.t("rallyPlayerPrompt"))),
            (Some(_), None) => {
                lines.push(Line::from(app.t("outcomePrompt")));
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("w {}", app.t("winner")),
                        Style::default().fg(Color::Green),
                    ),
                    Span::raw("   "),
                    Span::styled(format!("e {}", app.t("error")), Style::default().fg(Color::Red)),
                ]));
            }
            (Some(_), Some(kind)) => {
                lines.push(Line::from(app.t("reasonPrompt")));
                let reasons: Vec<String> = kind
                    .reasons()
                    .iter()
                    .enumerate()
                    .map(|(i, reason)| format!("{} {}", i + 1, app.t(reason.key())))
                    .collect();
                lines.push(Line::from(reasons.join("   ")));
            }
        }
        lines.push(hint_line(app.t("keysGameAdvanced")));
    } else if mode.is_simple() {
        lines.push(Line::from(format!(
            "p {}   f {}",
            app.t("pointBtn"),
            app.t("faultBtn")
        )));
        lines.push(hint_line(app.t("keysGameSimple")));
    } else {
        lines.push(hint_line(app.t("keysGameNormal")));
    }
    lines.push(hint_line(app.t("keysGameCommon")));

    if let Some(err) = app.state.last_error.as_deref() {
        lines.push(error_line(err));
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

// ---------------------------------------------------------------------------
// Finished match: game over, shared link, history details
// ---------------------------------------------------------------------------

fn draw_result_screen(f: &mut Frame, area: Rect, app: &App) {
    let Some(result) = app.active_result() else {
        return;
    };
    let title = if app.state.active_screen == Screen::SharedResult {
        app.t("sharedResult")
    } else {
        app.t("winnerTitle")
    };
    draw_result(f, area, app, result, title, app.t("keysGameOver"));
}

fn draw_result(f: &mut Frame, area: Rect, app: &App, result: &ResultState, title: &str, keys: &str) {
    let view = &result.view;
    let block = default_border(Color::White).title(format!(" {title} "));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let share_height = if result.share.is_some() { 5 } else { 0 };
    let [header_area, body_area, share_area, hint_area] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(share_height),
        Constraint::Length(1),
    ])
    .areas(inner);

    draw_result_header(f, header_area, app, view);

    let with_analysis = view.game_mode.is_advanced() && !view.teams.is_empty();
    if with_analysis {
        let [chart_area, analysis_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(body_area);
        draw_trend_chart(f, chart_area, app, view);
        match result.detail_player {
            Some(player_id) => draw_player_detail(f, analysis_area, app, view, player_id),
            None => draw_analysis(f, analysis_area, app, result),
        }
    } else {
        draw_trend_chart(f, body_area, app, view);
    }

    if let Some(share) = result.share.as_ref() {
        let mut lines = vec![Line::from(Span::styled(
            app.t("shareResult"),
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        lines.push(Line::from(Span::styled(
            share.link.as_str(),
            Style::default().fg(Color::Cyan),
        )));
        lines.extend(share.text.lines().map(Line::from));
        f.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: false }),
            share_area,
        );
    }

    f.render_widget(
        Paragraph::new(hint_line(keys)).alignment(Alignment::Center),
        hint_area,
    );
}

fn draw_result_header(f: &mut Frame, area: Rect, app: &App, view: &ResultView) {
    let winner_style = resolve(BannerColor::Winner, BannerTheme::Dark);
    let mut lines = Vec::new();

    match view.winner.as_ref() {
        Some(winner) => {
            lines.push(Line::from(Span::styled(
                format!("{}: {}", app.t("winnerLabel"), winner.names()),
                winner_style,
            )));
            lines.push(Line::from(Span::styled(
                stats::final_score_line(winner, &view.teams),
                Style::default()
                    .fg(team_color(winner.id))
                    .add_modifier(Modifier::BOLD),
            )));
            if app.state.active_screen == Screen::GameOver {
                lines.push(Line::from(format!(
                    "{}, {}! {}",
                    app.t("congratulations"),
                    winner.names(),
                    app.t("wonMatch")
                )));
            }
        }
        None => {
            let scores: Vec<String> = view.teams.iter().map(|t| t.score.to_string()).collect();
            lines.push(Line::from(scores.join(" - ")));
        }
    }

    let mut meta = format!("{}: {}", app.t("mode"), app.t(view.game_mode.key()));
    if let Some(ts) = view.timestamp.as_deref() {
        meta.push_str(&format!("   {}: {}", app.t("date"), format_timestamp(ts)));
    }
    lines.push(hint_line_owned(meta));

    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn hint_line_owned(text: String) -> Line<'static> {
    Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
}

/// RFC 3339 timestamp shown in local time; anything unparsable is shown as is.
pub fn format_timestamp(ts: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(ts)
        .map(|t| {
            t.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|_| ts.to_string())
}

/// Chart series for each team plus the y-axis ceiling.
pub fn trend_points(history: &[ScoreSnapshot]) -> (Vec<(f64, f64)>, Vec<(f64, f64)>, f64) {
    let team1 = history
        .iter()
        .enumerate()
        .map(|(i, s)| (i as f64, f64::from(s.team1_score)))
        .collect();
    let team2 = history
        .iter()
        .enumerate()
        .map(|(i, s)| (i as f64, f64::from(s.team2_score)))
        .collect();
    let top = history
        .iter()
        .map(|s| s.team1_score.max(s.team2_score))
        .max()
        .unwrap_or(0)
        .max(WINNING_SCORE);
    (team1, team2, f64::from(top))
}

fn draw_trend_chart(f: &mut Frame, area: Rect, app: &App, view: &ResultView) {
    let block = default_border(Color::DarkGray).title(format!(" {} ", app.t("scoreTrend")));
    let (team1, team2, y_max) = trend_points(&view.score_history);
    let x_max = (view.score_history.len().saturating_sub(1)).max(1) as f64;

    let team_label = |idx: usize| {
        view.teams
            .get(idx)
            .map(|t| t.names())
            .unwrap_or_else(|| format!("{} {}", app.t("team"), idx + 1))
    };
    let datasets = vec![
        Dataset::default()
            .name(team_label(0))
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(team_color(TEAM_ONE)))
            .data(&team1),
        Dataset::default()
            .name(team_label(1))
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(team_color(pickleball_core::TEAM_TWO)))
            .data(&team2),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title(app.t("rallyLabel"))
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, x_max])
                .labels(vec!["0".to_string(), format!("{x_max}")]),
        )
        .y_axis(
            Axis::default()
                .title(app.t("scoreLabel"))
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, y_max])
                .labels(vec!["0".to_string(), format!("{}", y_max / 2.0), format!("{y_max}")]),
        );
    f.render_widget(chart, area);
}

/// Horizontal bar of `count` scaled so `max` fills `width` cells.
pub fn bar(count: u32, max: u32, width: usize) -> String {
    if max == 0 || width == 0 {
        return String::new();
    }
    let cells = (count as usize * width).div_ceil(max as usize).min(width);
    "█".repeat(cells)
}

fn draw_analysis(f: &mut Frame, area: Rect, app: &App, result: &ResultState) {
    let view = &result.view;
    let block = default_border(Color::DarkGray).title(format!(" {} ", app.t("matchAnalysis")));
    let summaries = stats::player_summaries(&view.teams, &view.game_history);
    let max = summaries
        .iter()
        .map(|s| s.winners.max(s.errors))
        .max()
        .unwrap_or(0)
        .max(1);

    let rows: Vec<Row> = summaries
        .iter()
        .map(|s| {
            let color = view
                .teams
                .iter()
                .find(|t| t.has_player(s.player_id))
                .map(|t| team_color(t.id))
                .unwrap_or(Color::White);
            Row::new(vec![
                Cell::from(Span::styled(s.name.clone(), Style::default().fg(color))),
                Cell::from(Line::from(vec![
                    Span::raw(format!("{:>2} ", s.winners)),
                    Span::styled(bar(s.winners, max, 8), Style::default().fg(Color::Green)),
                ])),
                Cell::from(Line::from(vec![
                    Span::raw(format!("{:>2} ", s.errors)),
                    Span::styled(bar(s.errors, max, 8), Style::default().fg(Color::Red)),
                ])),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Fill(1),
            Constraint::Length(12),
            Constraint::Length(12),
        ],
    )
    .header(
        Row::new(vec!["", app.t("winnersLabel"), app.t("errorsLabel")])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .block(block);

    let mut state = TableState::default().with_selected(Some(result.cursor));
    f.render_stateful_widget(table, area, &mut state);
}

fn draw_player_detail(f: &mut Frame, area: Rect, app: &App, view: &ResultView, player_id: PlayerId) {
    let name = view
        .players()
        .into_iter()
        .find(|p| p.id == player_id)
        .map(|p| p.name.clone())
        .unwrap_or_default();
    let title = tr_with(app.locale(), "matchHistoryFor", &[("playerName", &name)]);
    let block = default_border(Color::DarkGray).title(format!(" {title} "));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let breakdown = stats::reason_breakdown(player_id, &view.game_history);
    if breakdown.is_empty() {
        f.render_widget(
            Paragraph::new(app.t("noRecordedActions")).style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    }

    let max = breakdown.max_count();
    let mut lines = Vec::new();
    for (kind, entries) in [
        (OutcomeKind::Winner, &breakdown.winners),
        (OutcomeKind::Error, &breakdown.errors),
    ] {
        if entries.is_empty() {
            continue;
        }
        let (label, color) = match kind {
            OutcomeKind::Winner => (app.t("winnersLabel"), Color::Green),
            OutcomeKind::Error => (app.t("errorsLabel"), Color::Red),
        };
        lines.push(Line::from(Span::styled(
            label,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        for (reason, count) in entries {
            lines.push(Line::from(vec![
                Span::raw(format!("  {:<10} {count:>2} ", app.t(reason.key()))),
                Span::styled(bar(*count, max, 12), Style::default().fg(color)),
            ]));
        }
    }
    lines.push(hint_line_owned(format!("Esc {}", app.t("backToSummary"))));
    f.render_widget(Paragraph::new(lines), inner);
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

fn draw_history(f: &mut Frame, area: Rect, app: &App) {
    let history = &app.state.history;

    if let Some(detail) = history.detail.as_ref() {
        let keys = format!("Esc {}", app.t("backToHistory"));
        draw_result(f, area, app, detail, app.t("matchDetails"), &keys);
        return;
    }

    let block = default_border(Color::White).title(format!(" {} ", app.t("matchHistory")));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [list_area, hint_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(inner);

    if history.log.is_empty() {
        f.render_widget(
            Paragraph::new(app.t("noMatchesPlayed"))
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            list_area,
        );
    } else {
        let rows: Vec<Row> = history
            .log
            .newest_first()
            .map(|record| {
                Row::new(vec![
                    Cell::from(format_timestamp(&record.timestamp)),
                    Cell::from(app.t(record.game_mode.key())),
                    Cell::from(Span::styled(
                        record.winner.names(),
                        Style::default().fg(team_color(record.winner.id)),
                    )),
                    Cell::from(stats::final_score_line(&record.winner, &record.teams)),
                ])
            })
            .collect();
        let table = Table::new(
            rows,
            [
                Constraint::Length(17),
                Constraint::Length(18),
                Constraint::Fill(1),
                Constraint::Length(8),
            ],
        )
        .header(
            Row::new(vec![
                app.t("date"),
                app.t("mode"),
                app.t("winnerLabel"),
                app.t("scoreLabel"),
            ])
            .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        let mut state = TableState::default().with_selected(Some(history.selected));
        f.render_stateful_widget(table, list_area, &mut state);
    }

    f.render_widget(
        Paragraph::new(hint_line(app.t("keysHistory"))).alignment(Alignment::Center),
        hint_area,
    );

    if history.confirm_clear {
        draw_confirm_clear(f, inner, app);
    }
}

fn draw_confirm_clear(f: &mut Frame, area: Rect, app: &App) {
    let width = area.width.min(60);
    let height = 5.min(area.height);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );
    f.render_widget(Clear, popup);
    let block = default_border(Color::Red).title(format!(" {} ", app.t("clearHistory")));
    f.render_widget(
        Paragraph::new(app.t("clearHistoryConfirm"))
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Center)
            .block(block),
        popup,
    );
}

// ---------------------------------------------------------------------------
// Help and logs
// ---------------------------------------------------------------------------

fn draw_help(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(format!(" {} ", app.t("help")));
    let section = |title: &'static str| {
        Line::from(Span::styled(
            app.t(title),
            Style::default().add_modifier(Modifier::BOLD),
        ))
    };
    let lines = vec![
        section("chooseMode"),
        Line::from(app.t("keysHome")),
        Line::from(""),
        section("setup"),
        Line::from(app.t("keysSetup")),
        Line::from(""),
        section("normalMode"),
        Line::from(app.t("keysGameNormal")),
        section("simpleMode"),
        Line::from(app.t("keysGameSimple")),
        section("advancedMode"),
        Line::from(app.t("keysGameAdvanced")),
        Line::from(app.t("keysGameCommon")),
        Line::from(""),
        section("matchAnalysis"),
        Line::from(app.t("keysGameOver")),
        section("matchHistory"),
        Line::from(app.t("keysHistory")),
        Line::from(""),
        Line::from(app.t("keysGlobal")),
        hint_line("Esc / ?"),
    ];
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn draw_logs(f: &mut Frame, area: Rect) {
    f.render_widget(
        TuiLoggerWidget::default()
            .block(default_border(Color::DarkGray).title(" Logs "))
            .style_error(Style::default().fg(Color::Red))
            .style_warn(Style::default().fg(Color::Yellow))
            .style_info(Style::default().fg(Color::Cyan))
            .output_target(false),
        area,
    );
}
