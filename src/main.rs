use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::symbols;
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine, Map, MapResolution, Points};
use ratatui::widgets::{Block, Borders, Clear, Gauge, Paragraph};

use squadmap_terminal::dataset::Coord;
use squadmap_terminal::feed::{FeedConfig, spawn_data_provider};
use squadmap_terminal::markers::MarkerGroup;
use squadmap_terminal::state::{AppState, Delta, Screen, apply_delta};
use squadmap_terminal::timeline::active_stint;

struct App {
    state: AppState,
    should_quit: bool,
}

impl App {
    fn new() -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Left | KeyCode::Char('h') => self.state.step_year_prev(),
            KeyCode::Right | KeyCode::Char('l') => self.state.step_year_next(),
            KeyCode::Down | KeyCode::Char('j') => self.state.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.state.select_prev(),
            KeyCode::Enter | KeyCode::Char('d') => {
                if self.state.selected_player().is_some() {
                    self.state.screen = Screen::Trajectory;
                }
            }
            KeyCode::Esc | KeyCode::Char('b') => self.state.screen = Screen::Roster,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    spawn_data_provider(tx, FeedConfig::from_env());

    let mut app = App::new();
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(header, chunks[0]);

    render_year_slider(frame, chunks[1], &app.state);

    match app.state.screen {
        Screen::Roster => render_roster(frame, chunks[2], &app.state),
        Screen::Trajectory => render_trajectory(frame, chunks[2], &app.state),
    }

    let footer = Paragraph::new(footer_text(&app.state))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let screen = match state.screen {
        Screen::Roster => "SQUAD",
        Screen::Trajectory => "CAREER",
    };
    let tournament = state
        .current_tournament()
        .map(|t| t.name.clone())
        .unwrap_or_else(|| "-".to_string());
    format!("SQUADMAP | {screen} | {tournament}")
}

fn footer_text(state: &AppState) -> String {
    let keys = match state.screen {
        Screen::Roster => {
            "←/→ Year | j/k/↑/↓ Player | Enter/d Career | ? Help | q Quit"
        }
        Screen::Trajectory => "←/→ Year | b/Esc Back | ? Help | q Quit",
    };
    let mut status = state.status.clone();
    if let Some(loaded_at) = state.loaded_at {
        let stamp: DateTime<Local> = loaded_at.into();
        status = format!("{status} | loaded {}", stamp.format("%H:%M:%S"));
    }
    if let Some(last) = state.logs.back() {
        status = format!("{status} | {last}");
    }
    format!("{keys}\n{status}")
}

fn render_year_slider(frame: &mut Frame, area: Rect, state: &AppState) {
    let total = state.years.len();
    let (ratio, label) = match state.current_year() {
        Some(year) if total > 1 => (
            state.year_idx as f64 / (total - 1) as f64,
            format!("{year}  ({}/{total})", state.year_idx + 1),
        ),
        Some(year) => (1.0, format!("{year}  (1/1)")),
        None => (0.0, "no years".to_string()),
    };

    let gauge = Gauge::default()
        .block(Block::default().title("Timeline").borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Yellow).bg(Color::DarkGray))
        .ratio(ratio)
        .label(label);
    frame.render_widget(gauge, area);
}

fn render_roster(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(30)])
        .split(area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(8)])
        .split(columns[0]);

    let roster = Paragraph::new(roster_text(state))
        .block(Block::default().title("Roster").borders(Borders::ALL));
    frame.render_widget(roster, rows[0]);

    let detail = Paragraph::new(player_summary_text(state))
        .block(Block::default().title("Player").borders(Borders::ALL));
    frame.render_widget(detail, rows[1]);

    let groups = state.roster_groups();
    render_map(frame, columns[1], &groups, &[], "Squad Map");
}

fn render_trajectory(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(44), Constraint::Min(30)])
        .split(area);

    let career = Paragraph::new(career_text(state))
        .block(Block::default().title("Career").borders(Borders::ALL));
    frame.render_widget(career, columns[0]);

    let trajectory = state.selected_trajectory().unwrap_or_default();
    render_map(frame, columns[1], &trajectory.groups, &trajectory.route, "Career Map");
}

fn roster_text(state: &AppState) -> String {
    let roster = state.current_roster();
    if roster.is_empty() {
        return "No players for this year".to_string();
    }

    let mut lines = Vec::with_capacity(roster.len());
    for (idx, player) in roster.iter().enumerate() {
        let prefix = if idx == state.selected { "> " } else { "  " };
        let club = state
            .active_club(player)
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!("{prefix}{}  [{club}]", player.name));
    }
    lines.join("\n")
}

fn player_summary_text(state: &AppState) -> String {
    let Some(player) = state.selected_player() else {
        return "No player selected".to_string();
    };

    let mut lines = vec![player.name.clone()];
    if let Some(country) = &player.birth_country {
        lines.push(format!("Born: {country}"));
    }
    if let Some(position) = &player.position {
        lines.push(format!("Position: {position}"));
    }
    match state
        .current_year()
        .and_then(|year| active_stint(&player.stints, year))
    {
        Some(stint) => {
            lines.push(format!("Club: {}", stint.club));
            if let Some(ground) = &stint.ground {
                lines.push(format!("Ground: {ground}"));
            }
            lines.push(format!("Badge: {}", badge_line(state, &stint.club)));
        }
        None => lines.push("Club: (none this year)".to_string()),
    }
    lines.join("\n")
}

fn career_text(state: &AppState) -> String {
    let Some(player) = state.selected_player() else {
        return "No player selected".to_string();
    };

    let rows = state.career_rows();
    if rows.is_empty() {
        return format!("{}\n\nNo clubs before this year", player.name);
    }

    let mut lines = vec![player.name.clone(), String::new()];
    for view in &rows {
        let location = if view.stint.coords.is_some() {
            ""
        } else {
            "  (no coordinates)"
        };
        lines.push(format!(
            "{}–{}  {}{location}",
            view.stint.from, view.effective_to, view.stint.club
        ));
        if let Some(ground) = &view.stint.ground {
            lines.push(format!("        {ground}"));
        }
    }
    if let Some(current) = rows.last() {
        lines.push(String::new());
        lines.push(format!(
            "Badge: {}",
            badge_line(state, &current.stint.club)
        ));
    }
    lines.join("\n")
}

fn badge_line(state: &AppState, club: &str) -> String {
    state
        .badge_for(club)
        .map(str::to_string)
        .unwrap_or_else(|| "(none)".to_string())
}

fn render_map(
    frame: &mut Frame,
    area: Rect,
    groups: &[MarkerGroup],
    route: &[Coord],
    title: &str,
) {
    let coords: Vec<Coord> = groups.iter().map(|g| g.coords).collect();
    let (x_bounds, y_bounds) = map_bounds(&coords);
    let points: Vec<(f64, f64)> = coords.iter().map(|c| (c.lon, c.lat)).collect();

    let canvas = Canvas::default()
        .block(Block::default().title(title).borders(Borders::ALL))
        .marker(symbols::Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            ctx.draw(&Map {
                color: Color::DarkGray,
                resolution: MapResolution::High,
            });
            for pair in route.windows(2) {
                ctx.draw(&CanvasLine {
                    x1: pair[0].lon,
                    y1: pair[0].lat,
                    x2: pair[1].lon,
                    y2: pair[1].lat,
                    color: Color::Yellow,
                });
            }
            ctx.draw(&Points {
                coords: &points,
                color: Color::Red,
            });
            for group in groups {
                ctx.print(
                    group.coords.lon,
                    group.coords.lat,
                    ratatui::text::Line::styled(
                        marker_label(group),
                        Style::default().fg(Color::White),
                    ),
                );
            }
        });
    frame.render_widget(canvas, area);
}

fn marker_label(group: &MarkerGroup) -> String {
    let club = group
        .entries
        .first()
        .map(|e| e.club.as_str())
        .unwrap_or("?");
    if group.entries.len() > 1 {
        format!("{club} (+{})", group.entries.len() - 1)
    } else {
        club.to_string()
    }
}

const MIN_LON_SPAN: f64 = 8.0;
const MIN_LAT_SPAN: f64 = 4.0;

fn map_bounds(coords: &[Coord]) -> ([f64; 2], [f64; 2]) {
    if coords.is_empty() {
        return ([-180.0, 180.0], [-90.0, 90.0]);
    }

    let mut min_lon = f64::INFINITY;
    let mut max_lon = f64::NEG_INFINITY;
    let mut min_lat = f64::INFINITY;
    let mut max_lat = f64::NEG_INFINITY;
    for c in coords {
        min_lon = min_lon.min(c.lon);
        max_lon = max_lon.max(c.lon);
        min_lat = min_lat.min(c.lat);
        max_lat = max_lat.max(c.lat);
    }

    let lon_pad = ((MIN_LON_SPAN - (max_lon - min_lon)).max(0.0) / 2.0) + 2.0;
    let lat_pad = ((MIN_LAT_SPAN - (max_lat - min_lat)).max(0.0) / 2.0) + 1.0;
    (
        [(min_lon - lon_pad).max(-180.0), (max_lon + lon_pad).min(180.0)],
        [(min_lat - lat_pad).max(-90.0), (max_lat + lat_pad).min(90.0)],
    )
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Squadmap Terminal - Help",
        "",
        "Global:",
        "  ← / h        Previous year",
        "  → / l        Next year",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Squad:",
        "  j/k or ↑/↓   Select player",
        "  Enter / d    Career view",
        "",
        "Career:",
        "  b / Esc      Back to squad",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
