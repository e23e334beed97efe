use anyhow::Result;
use claim_appeals::claims::{AgeBand, StatusBadge};
use claim_appeals::dashboard::Dashboard;
use claim_appeals::documents::{descriptors_from_path, DocumentCategory, UploadZone};
use claim_appeals::verification::check_passed;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame, Terminal,
};
use std::io;
use std::path::Path;
use std::time::Duration;

const ORANGE: Color = Color::Rgb(255, 165, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing a path for one of the upload zones
    UploadPath(UploadZone),
    /// Typing into the appeal draft
    EditDraft,
}

pub struct App {
    pub dashboard: Dashboard,
    pub state: TableState,
    pub doc_tab: DocumentCategory,
    pub input_mode: InputMode,
    pub input: String,
    pub last_error: Option<String>,
    pub organization: String,
    pub running: bool,
}

impl App {
    pub fn new(dashboard: Dashboard, organization: String) -> Self {
        let mut state = TableState::default();
        if !dashboard.claims().is_empty() {
            state.select(Some(0));
        }

        Self {
            dashboard,
            state,
            doc_tab: DocumentCategory::Contracts,
            input_mode: InputMode::Normal,
            input: String::new(),
            last_error: None,
            organization,
            running: true,
        }
    }

    pub fn next(&mut self) {
        let len = self.dashboard.claims().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.dashboard.claims().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn next_tab(&mut self) {
        self.doc_tab = DocumentCategory::ALL[(self.doc_tab.index() + 1) % 3];
    }

    pub fn previous_tab(&mut self) {
        self.doc_tab = DocumentCategory::ALL[(self.doc_tab.index() + 2) % 3];
    }

    fn generate_samples(&mut self) {
        self.dashboard.generate_sample_denials();
        self.state.select(Some(0));
    }

    fn open_selected(&mut self) {
        let id = self
            .state
            .selected()
            .and_then(|i| self.dashboard.claims().get(i))
            .map(|c| c.id.clone());

        if let Some(id) = id {
            if let Err(err) = self.dashboard.claim_clicked(&id) {
                self.last_error = Some(err.to_string());
            }
        }
    }

    fn submit_upload(&mut self, zone: UploadZone) {
        let raw = std::mem::take(&mut self.input);
        let path = raw.trim();
        if path.is_empty() {
            return;
        }

        match descriptors_from_path(Path::new(path)) {
            Ok(files) => match zone {
                UploadZone::Csv => {
                    self.dashboard.upload_csv(&files);
                }
                UploadZone::Document => {
                    self.dashboard.upload_documents(&files);
                }
            },
            Err(err) => {
                tracing::warn!(%err, "Upload path rejected");
                self.last_error = Some(err.to_string());
            }
        }
    }

    fn record(&mut self, result: claim_appeals::Result<()>) {
        if let Err(err) = result {
            self.last_error = Some(err.to_string());
        }
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    while app.running {
        app.dashboard.tick();
        if app.input_mode == InputMode::EditDraft && !app.dashboard.is_modal_open() {
            app.input_mode = InputMode::Normal;
        }
        terminal.draw(|f| ui(f, app))?;

        // Short poll keeps the progress bar moving without input
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key);
                }
            }
        }
    }
    Ok(())
}

pub fn handle_key(app: &mut App, key: KeyEvent) {
    let mode = app.input_mode;
    match mode {
        InputMode::UploadPath(zone) => match key.code {
            KeyCode::Esc => {
                app.input.clear();
                app.input_mode = InputMode::Normal;
            }
            KeyCode::Enter => {
                app.input_mode = InputMode::Normal;
                app.submit_upload(zone);
            }
            KeyCode::Backspace => {
                app.input.pop();
            }
            KeyCode::Char(c) => app.input.push(c),
            _ => {}
        },
        InputMode::EditDraft => match key.code {
            KeyCode::Esc => app.input_mode = InputMode::Normal,
            KeyCode::Enter => {
                let res = app.dashboard.push_draft('\n');
                app.record(res);
            }
            KeyCode::Backspace => {
                let res = app.dashboard.pop_draft();
                app.record(res);
            }
            KeyCode::Char(c) => {
                let res = app.dashboard.push_draft(c);
                app.record(res);
            }
            _ => {}
        },
        InputMode::Normal if app.dashboard.is_modal_open() => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => app.dashboard.close_modal(),
            KeyCode::Char('e') if app.dashboard.verification().appeal_visible() => {
                app.input_mode = InputMode::EditDraft;
            }
            KeyCode::Char('s') if app.dashboard.verification().appeal_visible() => {
                let res = app.dashboard.send_appeal().map(|_| ());
                app.record(res);
            }
            _ => {}
        },
        InputMode::Normal => {
            app.last_error = None;
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => app.running = false,
                KeyCode::Char('g') => app.generate_samples(),
                KeyCode::Enter => app.open_selected(),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Home => {
                    if !app.dashboard.claims().is_empty() {
                        app.state.select(Some(0));
                    }
                }
                KeyCode::End => {
                    if !app.dashboard.claims().is_empty() {
                        app.state.select(Some(app.dashboard.claims().len() - 1));
                    }
                }
                KeyCode::Tab => app.next_tab(),
                KeyCode::BackTab => app.previous_tab(),
                KeyCode::Char('u') => app.input_mode = InputMode::UploadPath(UploadZone::Document),
                KeyCode::Char('i') => app.input_mode = InputMode::UploadPath(UploadZone::Csv),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Panels
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(chunks[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(4)])
        .split(columns[0]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(4)])
        .split(columns[1]);

    render_claims_table(f, left[0], app);
    render_upload_zone(f, left[1], app, UploadZone::Csv);
    render_document_tabs(f, right[0], app);
    render_upload_zone(f, right[1], app, UploadZone::Document);

    render_status_bar(f, chunks[2], app);

    if app.dashboard.is_modal_open() {
        render_verification_modal(f, centered_rect(80, 85, f.size()), app);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let spans = vec![
        Span::styled(
            format!("{} | Claim-Denial Appeals", app.organization),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Claims: {}", app.dashboard.claims().len()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("  "),
        Span::styled(
            format!("Documents: {}", app.dashboard.documents().total()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("  |  "),
        Span::styled("g", Style::default().fg(Color::Yellow)),
        Span::raw(" Generate Sample Denials"),
    ];

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(header, area);
}

pub fn badge_color(badge: StatusBadge) -> Color {
    match badge {
        StatusBadge::Yellow => Color::Yellow,
        StatusBadge::Blue => Color::Blue,
        StatusBadge::Green => Color::Green,
        StatusBadge::Gray => Color::Gray,
    }
}

pub fn age_style(band: AgeBand) -> Style {
    match band {
        AgeBand::High => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        AgeBand::Medium => Style::default().fg(ORANGE),
        AgeBand::Low => Style::default().fg(Color::Green),
    }
}

fn render_claims_table(f: &mut Frame, area: Rect, app: &mut App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(" Pending Claim Denials ");

    if app.dashboard.claims().is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No claims loaded. Generate sample data or upload a CSV file.",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let header_cells = [
        "Claim ID",
        "Distributor",
        "NDC",
        "Reason",
        "Amount (USD)",
        "Status",
        "Age",
    ]
    .iter()
    .map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.dashboard.claims().iter().map(|claim| {
        let cells = vec![
            Cell::from(claim.id.clone()).style(Style::default().fg(Color::LightBlue)),
            Cell::from(claim.distributor.clone()),
            Cell::from(claim.ndc.clone()),
            Cell::from(truncate(&claim.reason, 32)),
            Cell::from(claim.amount.clone()).style(Style::default().add_modifier(Modifier::BOLD)),
            Cell::from(claim.status.to_string())
                .style(Style::default().fg(badge_color(claim.badge()))),
            Cell::from(claim.age.clone()).style(age_style(claim.age_band())),
        ];
        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(18),
            Constraint::Length(13),
            Constraint::Min(20),
            Constraint::Length(12),
            Constraint::Length(14),
            Constraint::Length(7),
        ],
    )
    .header(header)
    .block(block)
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_upload_zone(f: &mut Frame, area: Rect, app: &App, zone: UploadZone) {
    let (title, key, hint, color) = match zone {
        UploadZone::Csv => (" Upload CSV of Claims ", "i", "Accepts .csv files only", Color::Green),
        UploadZone::Document => (
            " Upload Documents ",
            "u",
            "Contracts, GPO, or Invoice documents - accepts .pdf and .docx files",
            Color::Blue,
        ),
    };

    let active = app.input_mode == InputMode::UploadPath(zone);
    let first = if active {
        Line::from(vec![
            Span::styled("Path: ", Style::default().fg(Color::Yellow)),
            Span::raw(app.input.clone()),
            Span::styled("█", Style::default().fg(Color::Yellow)),
        ])
    } else {
        Line::from(vec![
            Span::raw("Press "),
            Span::styled(key, Style::default().fg(Color::Yellow)),
            Span::raw(" and enter a file or folder path"),
        ])
    };

    let paragraph = Paragraph::new(vec![
        first,
        Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(title),
    );
    f.render_widget(paragraph, area);
}

fn render_document_tabs(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(" Document Repository ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(inner);

    let titles: Vec<String> = DocumentCategory::ALL
        .iter()
        .map(|c| format!("{} ({})", c.tab_label(), app.dashboard.documents().files(*c).len()))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.doc_tab.index())
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        );
    f.render_widget(tabs, parts[0]);

    let files = app.dashboard.documents().files(app.doc_tab);
    let lines: Vec<Line> = if files.is_empty() {
        vec![Line::from(Span::styled(
            app.doc_tab.empty_message(),
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        files
            .iter()
            .flat_map(|file| {
                vec![
                    Line::from(Span::styled(
                        file.name.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        format!("  {} • {}", file.upload_date, file.size_label()),
                        Style::default().fg(Color::DarkGray),
                    )),
                ]
            })
            .collect()
    };
    f.render_widget(Paragraph::new(lines), parts[1]);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::new();

    if let Some(err) = &app.last_error {
        spans.push(Span::styled(format!(" {} ", err), Style::default().fg(Color::Red)));
    } else if let Some(note) = app.dashboard.latest_notification() {
        spans.push(Span::styled(
            format!(" {}: ", note.title),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(note.description.clone()));
    }

    spans.push(Span::raw(" | "));
    let hints: &[(&str, &str)] = match app.input_mode {
        InputMode::UploadPath(_) => &[("Enter", " Upload | "), ("Esc", " Cancel")],
        InputMode::EditDraft => &[("Esc", " Done editing")],
        InputMode::Normal if app.dashboard.is_modal_open() => {
            &[("e", " Edit | "), ("s", " Send | "), ("Esc", " Close")]
        }
        InputMode::Normal => &[
            ("Enter", " Verify | "),
            ("↑/↓", " Nav | "),
            ("Tab", " Docs | "),
            ("q", " Quit"),
        ],
    };
    for (key, label) in hints {
        spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(*label));
    }

    let status_bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );
    f.render_widget(status_bar, area);
}

fn render_verification_modal(f: &mut Frame, area: Rect, app: &App) {
    let verification = app.dashboard.verification();
    let claim_id = app
        .dashboard
        .selected_claim()
        .map(|c| c.id.as_str())
        .unwrap_or_default();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::LightBlue))
        .title(format!(" Verify Claim Legitimacy - {} ", claim_id));
    let inner = block.inner(area);
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Running line
            Constraint::Length(1), // Gauge
            Constraint::Length(1), // Percent
            Constraint::Length(7), // Badge + checks
            Constraint::Min(0),    // Appeal
        ])
        .split(inner);

    let progress = verification.progress();
    let spinner_color = if progress < 100 { Color::LightBlue } else { Color::Green };
    f.render_widget(
        Paragraph::new(Span::styled(
            "Running verification against Contracts, GPO, and Invoice repositories...",
            Style::default().fg(spinner_color).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        parts[0],
    );
    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(Color::LightBlue).bg(Color::Black))
            .percent(progress as u16),
        parts[1],
    );
    f.render_widget(
        Paragraph::new(format!("{}% complete", progress)).alignment(Alignment::Center),
        parts[2],
    );

    if let Some(outcome) = verification.outcome() {
        let badge_style = if outcome.is_valid() {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        };
        let mut lines = vec![
            Line::from(Span::styled(outcome.label(), badge_style)).alignment(Alignment::Center),
            Line::from(Span::styled(
                "Verification Results:",
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ];
        for check in outcome.checks() {
            let color = if check_passed(check) { Color::Green } else { Color::Red };
            lines.push(Line::from(vec![
                Span::styled("● ", Style::default().fg(color)),
                Span::raw(*check),
            ]));
        }
        f.render_widget(Paragraph::new(lines), parts[3]);
    }

    if verification.appeal_visible() {
        let editing = app.input_mode == InputMode::EditDraft;
        let title = if verification.is_sending() {
            " Appeal Email Draft - Sending Email... "
        } else if editing {
            " Appeal Email Draft - editing (Esc to finish) "
        } else {
            " Appeal Email Draft - e edit | s Send Email to Vendor "
        };

        let draft = Paragraph::new(verification.draft().to_string())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(if editing { Color::Yellow } else { ORANGE }))
                    .title(title),
            );
        f.render_widget(draft, parts[4]);
    }
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

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len - 3).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use claim_appeals::config::{AppealConfig, VerificationConfig};
    use claim_appeals::verification::{ManualClock, VerificationSequencer};
    use crossterm::event::KeyModifiers;
    use rand::rngs::mock::StepRng;
    use ratatui::backend::TestBackend;
    use std::sync::Arc;

    fn app(valid: bool) -> (App, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            NaiveDate::from_ymd_opt(2025, 2, 14).unwrap(),
            5_000,
        ));
        let rng = if valid {
            StepRng::new(u64::MAX, 0)
        } else {
            StepRng::new(0, 0)
        };
        let sequencer = VerificationSequencer::with_rng(
            VerificationConfig::default(),
            AppealConfig::default(),
            Box::new(rng),
        );
        let dashboard = Dashboard::new(sequencer, clock.clone());
        (App::new(dashboard, "McKesson".to_string()), clock)
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 45)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_navigation_wraps() {
        let (mut app, _) = app(true);
        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.state.selected(), Some(0));
        press(&mut app, KeyCode::Up);
        assert_eq!(app.state.selected(), Some(4));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.state.selected(), Some(0));
        press(&mut app, KeyCode::End);
        assert_eq!(app.state.selected(), Some(4));
    }

    #[test]
    fn test_enter_opens_modal_for_selected_claim() {
        let (mut app, clock) = app(false);
        press(&mut app, KeyCode::Char('g'));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert!(app.dashboard.is_modal_open());
        assert_eq!(app.dashboard.selected_claim().unwrap().id, "CLM002");

        clock.advance(Duration::from_millis(4000));
        app.dashboard.tick();
        assert!(app.dashboard.verification().appeal_visible());

        // 'q' closes the modal instead of quitting
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.dashboard.is_modal_open());
        assert!(app.running);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn test_edit_and_send_draft() {
        let (mut app, clock) = app(false);
        press(&mut app, KeyCode::Char('g'));
        press(&mut app, KeyCode::Enter);
        clock.advance(Duration::from_millis(4000));
        app.dashboard.tick();

        let original_len = app.dashboard.verification().draft().len();
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.input_mode, InputMode::EditDraft);
        type_str(&mut app, "PS");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.dashboard.verification().draft().ends_with("P"));
        assert_eq!(app.dashboard.verification().draft().len(), original_len + 1);

        press(&mut app, KeyCode::Char('s'));
        assert!(app.dashboard.verification().is_sending());
        clock.advance(Duration::from_millis(2000));
        app.dashboard.tick();
        assert!(!app.dashboard.is_modal_open());
        assert!(app.last_error.is_none());
    }

    #[test]
    fn test_document_upload_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gpo_agreement.pdf");
        std::fs::write(&path, vec![0u8; 2048]).unwrap();

        let (mut app, _) = app(true);
        press(&mut app, KeyCode::Char('u'));
        assert_eq!(app.input_mode, InputMode::UploadPath(UploadZone::Document));
        type_str(&mut app, path.to_str().unwrap());
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.input_mode, InputMode::Normal);
        let gpo = app.dashboard.documents().files(DocumentCategory::Gpo);
        assert_eq!(gpo.len(), 1);
        assert_eq!(gpo[0].size_label(), "2.0 KB");
    }

    #[test]
    fn test_missing_upload_path_reports_error() {
        let (mut app, _) = app(true);
        press(&mut app, KeyCode::Char('i'));
        type_str(&mut app, "/nonexistent/claims.csv");
        press(&mut app, KeyCode::Enter);
        assert!(app.last_error.is_some());
        assert!(app.dashboard.latest_notification().is_none());
    }

    #[test]
    fn test_tabs_cycle() {
        let (mut app, _) = app(true);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.doc_tab, DocumentCategory::Gpo);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.doc_tab, DocumentCategory::Invoices);
    }

    #[test]
    fn test_render_empty_dashboard() {
        let (mut app, _) = app(true);
        let text = screen(&mut app);
        assert!(text.contains("McKesson | Claim-Denial Appeals"));
        assert!(text.contains("No claims loaded. Generate sample data or upload a CSV file."));
        assert!(text.contains("No contracts uploaded yet"));
    }

    #[test]
    fn test_render_modal_with_outcome() {
        let (mut app, clock) = app(false);
        press(&mut app, KeyCode::Char('g'));
        press(&mut app, KeyCode::Enter);
        clock.advance(Duration::from_millis(4000));
        app.dashboard.tick();

        let text = screen(&mut app);
        assert!(text.contains("Verify Claim Legitimacy - CLM001"));
        assert!(text.contains("100% complete"));
        assert!(text.contains("Invalid Rejection"));
        assert!(text.contains("Contract price differs from claimed amount"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Price Variance - Contract Dispute", 12), "Price Var...");
    }
}
