mod app;
mod components;
mod draw;
mod keys;
mod locale;
mod state;
mod ui;

use crate::app::App;
use crate::state::app_settings::{AppSettings, CONFIG_DIR_ENV, LOG_ENV};
use crate::state::messages::UiEvent;
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::{LevelFilter, info};
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tokio::time::Duration;
use tui::{Terminal, backend::CrosstermBackend};

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    /// Share payload or link passed with `--match`.
    shared_match: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Some(args) = handle_cli_args(std::env::args().skip(1)) else {
        return Ok(());
    };

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    tui_logger::init_logger(LevelFilter::Trace)?;
    tui_logger::set_default_level(LevelFilter::Warn);
    log::set_max_level(LevelFilter::Warn);

    // App::new applies a configured log level over the default
    let mut app = App::new(AppSettings::load());
    if let Some(shared) = args.shared_match.as_deref() {
        app.open_shared(shared);
    }
    let app = Arc::new(Mutex::new(app));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Animation tick thread, 80ms is about 12.5 FPS
    let anim_tx = ui_event_tx.clone();
    let animation_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(80));
        loop {
            interval.tick().await;
            if anim_tx.send(UiEvent::AnimationTick).await.is_err() {
                break;
            }
        }
    });

    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx).await;

    input_handler.abort();
    animation_task.abort();

    Ok(())
}

/// Parses command line arguments. `None` means the process should exit
/// without starting the UI.
fn handle_cli_args(mut args: impl Iterator<Item = String>) -> Option<CliArgs> {
    let mut cli = CliArgs::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{}", usage_text());
                return None;
            }
            "-V" | "--version" => {
                println!("picklescore {}", env!("CARGO_PKG_VERSION"));
                return None;
            }
            "-m" | "--match" => match args.next() {
                Some(value) => cli.shared_match = Some(value),
                None => {
                    eprintln!("Missing value for {arg}\n\n{}", usage_text());
                    std::process::exit(2);
                }
            },
            other if other.starts_with("--match=") => {
                cli.shared_match = Some(other.trim_start_matches("--match=").to_string());
            }
            _ => {
                eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
                std::process::exit(2);
            }
        }
    }

    Some(cli)
}

fn usage_text() -> String {
    format!(
        "picklescore - pickleball scorekeeper terminal UI

Usage:
  picklescore
  picklescore --match <payload-or-link>
  picklescore --help
  picklescore --version

Options:
  -m, --match <payload-or-link>   Open a shared match result

Environment:
  {CONFIG_DIR_ENV}   Directory for settings.json and history.json
                           (default $XDG_CONFIG_HOME/picklescore)
  {LOG_ENV}          Log level: error, warn, info, debug, trace"
    )
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
) {
    while let Some(ui_event) = ui_events.recv().await {
        let should_redraw = handle_ui_event(ui_event, &app).await;
        if should_redraw {
            let mut app_guard = app.lock().await;
            draw::draw(&mut terminal, &mut app_guard);
        }
    }
}

async fn handle_ui_event(ui_event: UiEvent, app: &Arc<Mutex<App>>) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let guard = app.lock().await;
            info!(
                "picklescore {} started, config in {}",
                env!("CARGO_PKG_VERSION"),
                guard.settings.config_dir.display()
            );
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app).await;
            true
        }
        UiEvent::Resize => true,
        UiEvent::AnimationTick => {
            let mut guard = app.lock().await;
            // only the banner screens animate
            let animated = guard.state.show_intro
                || guard.state.active_screen == crate::app::Screen::Home;
            guard.advance_animation(crate::components::banner::FRAME_COUNT);
            animated
        }
    }
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Option<CliArgs> {
        handle_cli_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn no_arguments_starts_the_ui() {
        assert_eq!(parse(&[]), Some(CliArgs::default()));
    }

    #[test]
    fn match_argument_is_captured() {
        let cli = parse(&["--match", "WzIsMF0="]).unwrap();
        assert_eq!(cli.shared_match.as_deref(), Some("WzIsMF0="));

        let cli = parse(&["--match=https://example.com/?match=abc"]).unwrap();
        assert_eq!(
            cli.shared_match.as_deref(),
            Some("https://example.com/?match=abc")
        );
    }

    #[test]
    fn usage_names_environment_overrides() {
        let usage = usage_text();
        assert!(usage.contains(CONFIG_DIR_ENV));
        assert!(usage.contains(LOG_ENV));
    }
}
