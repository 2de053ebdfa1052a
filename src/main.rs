use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, KeyCode, KeyEvent, KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use rand::SeedableRng;
use rand::rngs::{SmallRng, StdRng};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing::{info, warn};

use rockbusters::app::App;
use rockbusters::bank::QuestionBank;
use rockbusters::config::Config;
use rockbusters::effects::Effects;
use rockbusters::effects::analytics::{AnalyticsPort, JsonlAnalytics, NullAnalytics};
use rockbusters::effects::audio::{SoundBoard, TerminalBell};
use rockbusters::engine::scoring;
use rockbusters::event::{AppEvent, EventHandler};
use rockbusters::logging;
use rockbusters::session::quiz::{Phase, QuizSession, SessionSettings};
use rockbusters::store::KeyValueStore;
use rockbusters::store::json_store::{JsonStore, default_data_dir};
use rockbusters::store::memory::MemoryStore;
use rockbusters::store::progress::ProgressKeeper;
use rockbusters::ui::components::answer_field::AnswerField;
use rockbusters::ui::components::clue_card::ClueCard;
use rockbusters::ui::components::modal::{Modal, ModalKind};
use rockbusters::ui::components::progress_bar::ProgressBar;
use rockbusters::ui::components::results::Results;
use rockbusters::ui::layout::{AppLayout, LayoutTier, centered_rect, pack_hint_lines};
use rockbusters::ui::theme::Theme;

#[derive(Parser)]
#[command(
    name = "rockbusters",
    version,
    about = "Cryptic band-name quiz for the terminal"
)]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Correct answers needed to win")]
    target: Option<usize>,

    #[arg(short, long, help = "Question bank JSON file")]
    questions: Option<PathBuf>,

    #[arg(long, help = "Start with sound off")]
    mute: bool,

    #[arg(long, help = "Seed for the question order")]
    seed: Option<u64>,

    #[arg(long, help = "Keep progress in memory only; nothing is written to disk")]
    ephemeral: bool,

    #[arg(long, help = "Discard saved progress before starting")]
    fresh: bool,
}

const QUIZ_HINTS: &[&str] = &[
    "[Ctrl+S] Skip",
    "[Ctrl+R] Reveal",
    "[Enter] Next",
    "[Ctrl+T] Sound",
    "[Ctrl+X] Reset",
    "[F1] Info",
    "[Esc] Quit",
];

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(target) = cli.target {
        config.win_target = target;
    }
    if let Some(path) = cli.questions {
        config.question_bank = Some(path);
    }
    if cli.mute {
        config.sound_enabled = false;
    }

    if !cli.ephemeral {
        if let Err(err) = logging::init(&logging::default_log_path(), &config.log_level) {
            eprintln!("Logging disabled: {err:#}");
        }
    }
    if let Some(err) = config_error {
        warn!(?err, "Config file unreadable, using defaults");
    }

    let bank = load_bank(&config)?;
    for (idx, issue) in bank.integrity_report() {
        warn!(index = idx, %issue, "Question initials disagree with answer");
    }
    config.validate(bank.len());
    info!(
        questions = bank.len(),
        win_target = config.win_target,
        "Question bank loaded"
    );

    let store: Box<dyn KeyValueStore> = if cli.ephemeral {
        Box::new(MemoryStore::new())
    } else {
        open_store()
    };
    let mut progress = ProgressKeeper::new(store);
    if cli.fresh {
        progress.clear();
    }

    let analytics: Box<dyn AnalyticsPort> = if config.analytics_enabled && !cli.ephemeral {
        Box::new(JsonlAnalytics::new(default_data_dir().join("events.jsonl")))
    } else {
        Box::new(NullAnalytics)
    };

    let (order_rng, sound_rng) = match cli.seed {
        Some(seed) => (StdRng::seed_from_u64(seed), SmallRng::seed_from_u64(seed)),
        None => (StdRng::from_entropy(), SmallRng::from_entropy()),
    };

    let effects = Effects::new(
        Box::new(TerminalBell::new(SoundBoard::new(sound_rng), io::stdout())),
        analytics,
        progress,
    );
    let settings = SessionSettings {
        win_target: config.win_target,
        modal_delay: Duration::from_millis(config.correct_modal_delay_ms),
        sound_enabled: config.sound_enabled,
    };
    let session = QuizSession::new(bank, settings, effects, Box::new(order_rng));
    let theme = Theme::load_or_default(&config.theme);
    let mut app = App::new(session, theme, config, !cli.ephemeral);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(ref err) = result {
        warn!(?err, "Event loop ended with an error");
    }
    info!("Exiting");
    result
}

/// Disk-backed progress when the data directory is usable, in-memory otherwise.
fn open_store() -> Box<dyn KeyValueStore> {
    store_or_memory(JsonStore::new())
}

fn store_or_memory(opened: Result<JsonStore>) -> Box<dyn KeyValueStore> {
    match opened {
        Ok(store) => Box::new(store),
        Err(err) => {
            warn!(?err, "Data directory unavailable, progress will not be saved");
            Box::new(MemoryStore::new())
        }
    }
}

fn load_bank(config: &Config) -> Result<QuestionBank> {
    match &config.question_bank {
        Some(path) => QuestionBank::from_path(path)
            .with_context(|| format!("loading question bank {}", path.display())),
        None => QuestionBank::embedded().context("loading bundled question bank"),
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Paste(text) => {
                if app.session.phase() == Phase::Playing && !app.show_info {
                    app.paste(&text);
                }
            }
            AppEvent::Tick => app.on_tick(Instant::now()),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if app.show_info {
        if matches!(key.code, KeyCode::F(1) | KeyCode::Esc) {
            app.toggle_info();
        }
        return;
    }

    match app.session.phase() {
        Phase::Welcome => handle_welcome_key(app, key),
        Phase::Playing => handle_quiz_key(app, key),
        Phase::Correct => handle_correct_key(app, key),
        Phase::Results => handle_results_key(app, key),
    }
}

fn handle_welcome_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => app.session.dismiss_welcome(),
        KeyCode::F(1) => app.toggle_info(),
        KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('s') => app.skip(),
            KeyCode::Char('r') => app.reveal(),
            KeyCode::Char('t') => app.toggle_sound(),
            KeyCode::Char('x') => app.reset(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::F(1) => app.toggle_info(),
        KeyCode::Enter => app.next_question(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::ALT) => app.type_char(ch),
        _ => {}
    }
}

fn handle_correct_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => app.session.advance(),
        KeyCode::F(1) => app.toggle_info(),
        KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
}

fn handle_results_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') | KeyCode::Enter => app.reset(),
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.session.phase() {
        Phase::Results => render_results(frame, app),
        Phase::Welcome => {
            render_quiz(frame, app);
            let popup = centered_rect(50, 40, area);
            frame.render_widget(Modal::new(ModalKind::Welcome, &app.theme), popup);
        }
        Phase::Playing => render_quiz(frame, app),
        Phase::Correct => {
            render_quiz(frame, app);
            render_correct(frame, app);
        }
    }

    if app.show_info {
        let popup = centered_rect(60, 50, area);
        frame.render_widget(Modal::new(ModalKind::Info, &app.theme), popup);
    }
}

fn render_quiz(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let session = &app.session;

    let hint_lines = pack_hint_lines(QUIZ_HINTS, area.width as usize);
    let layout = AppLayout::new(area, hint_lines.len() as u16);

    let sound = if session.sound_enabled() { "on" } else { "off" };
    let header_text = match layout.tier {
        LayoutTier::Wide => format!(
            " Rockbusters | Score: {}/{} | Attempts: {} | Sound: {sound}",
            session.score(),
            session.win_target(),
            session.total_attempts()
        ),
        LayoutTier::Narrow => format!(
            " {}/{} | Q{}",
            session.score(),
            session.win_target(),
            session.question_number()
        ),
    };
    let header = Paragraph::new(Line::from(Span::styled(
        header_text,
        Style::default()
            .fg(colors.header_fg())
            .bg(colors.header_bg())
            .add_modifier(Modifier::BOLD),
    )))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    if let Some(progress_area) = layout.progress {
        let progress = ProgressBar::new(
            "Progress",
            scoring::progress_ratio(session.score(), session.win_target()),
            format!("{}/{}", session.score(), session.win_target()),
            &app.theme,
        );
        frame.render_widget(progress, progress_area);
    }

    let Some(question) = session.current_question() else {
        return;
    };

    let solved = session.is_revealed() || session.is_answered_correctly();
    let clue = ClueCard::new(
        question,
        session.question_number(),
        session.total_questions(),
        &app.theme,
    )
    .show_sound(solved);
    frame.render_widget(clue, layout.clue);

    if let Some(view) = session.view() {
        let field = AnswerField::new(&view, &app.theme).revealed(session.is_revealed());
        frame.render_widget(field, layout.answer);
    }

    let status_color = if solved {
        colors.success()
    } else {
        colors.text_pending()
    };
    let status = Paragraph::new(Line::from(Span::styled(
        app.status_line(),
        Style::default().fg(status_color),
    )));
    frame.render_widget(status, layout.status);

    let footer_lines: Vec<Line> = hint_lines
        .into_iter()
        .map(|line| Line::from(Span::styled(line, Style::default().fg(colors.text_pending()))))
        .collect();
    frame.render_widget(Paragraph::new(footer_lines), layout.footer);
}

fn render_correct(frame: &mut ratatui::Frame, app: &App) {
    let Some(question) = app.session.current_question() else {
        return;
    };
    let popup = centered_rect(45, 35, frame.area());
    let modal = Modal::new(
        ModalKind::Correct {
            answer: &question.answer,
            sound: question.sound.as_deref(),
            has_next: app.session.has_next(),
        },
        &app.theme,
    );
    frame.render_widget(modal, popup);
}

fn render_results(frame: &mut ratatui::Frame, app: &App) {
    let summary = app.session.summary();
    let centered = centered_rect(60, 60, frame.area());
    frame.render_widget(Results::new(&summary, &app.theme), centered);
}
