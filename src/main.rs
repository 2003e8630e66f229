use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use wordwheel::app::{App, AppScreen, SCROLL_STEP};
use wordwheel::event::{AppEvent, EventHandler};
use wordwheel::ui::components::history_panel::HistoryPanel;
use wordwheel::ui::components::setup_form::SetupFormView;
use wordwheel::ui::components::wheel_view::WheelView;
use wordwheel::ui::layout::centered_rect;

#[derive(Parser)]
#[command(
    name = "wordwheel",
    version,
    about = "Terminal word wheel with covert forcing"
)]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Word list language (fr, en)")]
    language: Option<String>,

    #[arg(short, long, help = "RNG seed for reproducible candidate picks")]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut app = App::new(cli.seed);

    if let Some(ref name) = cli.theme {
        app.set_theme(name);
    }
    if let Some(ref code) = cli.language {
        app.set_language_code(code);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(50));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        let size = terminal.size()?;
        app.set_viewport_rows(size.height.saturating_sub(1));

        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key, Instant::now()),
            AppEvent::Mouse(mouse) => handle_mouse(app, mouse, Instant::now()),
            AppEvent::Tick => {}
            AppEvent::Resize(_, _) => {}
        }

        // Deadline polling runs every pass, whatever woke the loop
        app.on_tick(Instant::now());

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent, now: Instant) {
    if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Wheel => handle_wheel_key(app, key, now),
        AppScreen::ForceSetup | AppScreen::VrtxSetup => handle_form_key(app, key),
        AppScreen::History => handle_history_key(app, key),
    }
}

fn handle_wheel_key(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.scroll_by(-SCROLL_STEP, now),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_by(SCROLL_STEP, now),
        KeyCode::PageUp => app.scroll_by(-6.0 * SCROLL_STEP, now),
        KeyCode::PageDown => app.scroll_by(6.0 * SCROLL_STEP, now),
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('l') => app.toggle_language(),
        // Covert zones: nothing happens until the third quick press
        KeyCode::Char('f') => {
            if app.trigger_press('f', now) {
                app.open_force_setup();
            }
        }
        KeyCode::Char('v') => {
            if app.trigger_press('v', now) {
                app.open_vrtx_setup();
            }
        }
        KeyCode::Char('h') => {
            if app.trigger_press('h', now) {
                app.open_history();
            }
        }
        _ => {}
    }
}

fn handle_form_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_overlay(),
        KeyCode::Enter => app.submit_form(),
        KeyCode::Left => {
            if let Some(ref mut form) = app.form {
                form.level_prev();
            }
        }
        KeyCode::Right => {
            if let Some(ref mut form) = app.form {
                form.level_next();
            }
        }
        KeyCode::Backspace => {
            if let Some(ref mut form) = app.form {
                form.backspace();
            }
        }
        KeyCode::Char(ch) => {
            if let Some(ref mut form) = app.form {
                form.push_char(ch);
            }
        }
        _ => {}
    }
}

fn handle_history_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_overlay(),
        KeyCode::Char('c') => app.clear_history(),
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent, now: Instant) {
    if app.screen != AppScreen::Wheel {
        return;
    }
    match mouse.kind {
        MouseEventKind::ScrollUp => app.scroll_by(-SCROLL_STEP, now),
        MouseEventKind::ScrollDown => app.scroll_by(SCROLL_STEP, now),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " wordwheel ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} ", app.words.language().code().to_uppercase()),
            Style::default().fg(colors.accent()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()))
    .alignment(Alignment::Left);
    frame.render_widget(header, layout[0]);

    let wheel = WheelView::new(&app.wheel, app.tracker.offset(), app.theme);
    frame.render_widget(wheel, layout[1]);

    match app.screen {
        AppScreen::Wheel => {}
        AppScreen::ForceSetup | AppScreen::VrtxSetup => {
            if let Some(ref form) = app.form {
                let modal = centered_rect(60, 40, area);
                frame.render_widget(SetupFormView::new(form, app.theme), modal);
            }
        }
        AppScreen::History => {
            let modal = centered_rect(50, 60, area);
            let entries = app.engine.history().snapshot();
            frame.render_widget(HistoryPanel::new(entries, app.theme), modal);
        }
    }
}
