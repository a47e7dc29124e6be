use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;
use yamaha_ctrl::{
    ClientConfig, ErrorLog, Panel, PanelEvent, PanelReceiver, PanelView, Slider, Toggle,
    YamahaClient,
};

#[derive(Clone, Copy, PartialEq)]
enum Row {
    Volume,
    Bass,
    ToneBass,
    ToneTreble,
    Dialogue,
    Toggle(Toggle),
}

const ROWS: [Row; 9] = [
    Row::Volume,
    Row::Bass,
    Row::ToneBass,
    Row::ToneTreble,
    Row::Dialogue,
    Row::Toggle(Toggle::PureDirect),
    Row::Toggle(Toggle::Enhancer),
    Row::Toggle(Toggle::ExtraBass),
    Row::Toggle(Toggle::AdaptiveDrc),
];

struct App {
    panel: Panel,
    log: Arc<ErrorLog>,
    events: PanelReceiver,
    // Local slider positions, like a menu that keeps its widgets after a drag
    view: Option<PanelView>,
    selected: usize,
    status_message: String,
}

impl App {
    fn new(panel: Panel, log: Arc<ErrorLog>) -> Self {
        let events = panel.subscribe();
        Self {
            panel,
            log,
            events,
            view: None,
            selected: 0,
            status_message: "Fetching status...".to_string(),
        }
    }

    fn select_next(&mut self) {
        self.selected = (self.selected + 1) % ROWS.len();
    }

    fn select_previous(&mut self) {
        self.selected = if self.selected == 0 {
            ROWS.len() - 1
        } else {
            self.selected - 1
        };
    }

    async fn refresh(&mut self) {
        match self.panel.refresh().await {
            Ok(view) => {
                self.view = Some(view);
                self.status_message =
                    "j/k select, +/- adjust, Space toggle, r refresh, q quit".to_string();
            }
            Err(e) => self.status_message = format!("Refresh failed: {}", e),
        }
    }

    fn slider_mut(&mut self, row: Row) -> Option<&mut Slider> {
        let view = self.view.as_mut()?;
        match row {
            Row::Volume => Some(&mut view.volume),
            Row::Bass => Some(&mut view.bass),
            Row::ToneBass => Some(&mut view.tone_bass),
            Row::ToneTreble => Some(&mut view.tone_treble),
            Row::Dialogue => Some(&mut view.dialogue),
            Row::Toggle(_) => None,
        }
    }

    async fn adjust(&mut self, delta: i64) {
        let row = ROWS[self.selected];
        let Some(slider) = self.slider_mut(row) else {
            return;
        };
        slider.value = slider.stepped(delta);
        let value = slider.value;
        let label = slider.label;

        let result = match row {
            Row::Volume => self.panel.set_volume(value as u32).await,
            Row::Bass => self.panel.set_bass(value as i32).await,
            Row::ToneBass | Row::ToneTreble => {
                let Some(view) = &self.view else { return };
                let (bass, treble) = (view.tone_bass.value, view.tone_treble.value);
                self.panel.set_tone_control(bass as i32, treble as i32).await
            }
            Row::Dialogue => self.panel.set_dialogue_level(value as u32).await,
            Row::Toggle(_) => return,
        };

        self.status_message = match result {
            Ok(()) => format!("{} set to {}", label, value),
            Err(e) => format!("Failed to set {}: {}", label, e),
        };
    }

    async fn toggle(&mut self) {
        let Row::Toggle(toggle) = ROWS[self.selected] else {
            return;
        };
        self.status_message = match self.panel.toggle(toggle).await {
            Ok(enabled) => format!(
                "Toggled {} to {}",
                toggle.label(),
                if enabled { "on" } else { "off" }
            ),
            Err(e) => format!("Failed to toggle {}: {}", toggle.label(), e),
        };
    }

    fn handle_events(&mut self) {
        while let Ok(Some(event)) = self.events.try_recv() {
            if let PanelEvent::ToggleChanged { toggle, enabled } = event {
                if let Some(view) = self.view.as_mut() {
                    for item in view.toggles.iter_mut().filter(|item| item.toggle == toggle) {
                        item.enabled = enabled;
                    }
                }
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let outer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.size());

    let inner_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(outer_chunks[0]);

    render_controls(f, app, inner_chunks[0]);
    render_error_log(f, app, inner_chunks[1]);
    render_status(f, app, outer_chunks[1]);
}

fn render_controls(f: &mut Frame, app: &App, area: Rect) {
    let title = match &app.view {
        Some(view) => format!(" {} ", view.volume_label),
        None => " Receiver ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let Some(view) = &app.view else {
        f.render_widget(Paragraph::new("No status yet, press r").block(block), area);
        return;
    };

    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut constraints = vec![Constraint::Length(1); 5];
    constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let sliders = [
        &view.volume,
        &view.bass,
        &view.tone_bass,
        &view.tone_treble,
        &view.dialogue,
    ];
    for (i, slider) in sliders.iter().enumerate() {
        let span = (slider.max - slider.min).max(1) as f64;
        let ratio = ((slider.value - slider.min) as f64 / span).clamp(0.0, 1.0);
        let color = if app.selected == i { Color::Yellow } else { Color::Cyan };
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(color))
            .ratio(ratio)
            .label(format!("{}: {}", slider.label, slider.value));
        f.render_widget(gauge, rows[i]);
    }

    let items: Vec<ListItem> = view
        .toggles
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let selected = app.selected == sliders.len() + i;
            let style = if selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(if item.enabled { "[x] " } else { "[ ] " }, style),
                Span::styled(item.label, style),
            ]))
        })
        .collect();
    f.render_widget(List::new(items), rows[5]);
}

fn render_error_log(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Error Log ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let lines: Vec<Line> = app
        .log
        .entries()
        .iter()
        .rev()
        .flat_map(|entry| {
            vec![
                Line::from(Span::raw(entry.message.clone())),
                Line::from(Span::styled(
                    format!("Context: {}", entry.context),
                    Style::default().fg(Color::Gray),
                )),
            ]
        })
        .collect();

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Status ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let text = Paragraph::new(app.status_message.clone())
        .block(block)
        .wrap(Wrap { trim: true });

    f.render_widget(text, area);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    let log = Arc::new(ErrorLog::new());
    let panel = Panel::new(YamahaClient::with_config(&config)?, log.clone());
    let mut app = App::new(panel, log);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    app.refresh().await;
    let res = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {}", err);
    }

    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.handle_events();
        terminal.draw(|f| ui(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') => return Ok(()),
                        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
                        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
                        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right => {
                            app.adjust(1).await;
                        }
                        KeyCode::Char('-') | KeyCode::Char('_') | KeyCode::Left => {
                            app.adjust(-1).await;
                        }
                        KeyCode::Char(' ') | KeyCode::Enter => app.toggle().await,
                        KeyCode::Char('r') => app.refresh().await,
                        _ => {}
                    }
                }
            }
        }
    }
}
