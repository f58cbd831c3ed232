use crate::api::client::{ApiClient, ApiError};
use crate::api::expenses;
use crate::models::expense::{Expense, ExpenseFilter, Summary, CATEGORIES};
use crate::models::session::Session;
use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::{Alignment, Color, Constraint, Direction, Layout, Rect, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
};
use std::cmp::{max, min};
use std::io;
use std::time::{Duration, Instant};

const STATUS_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortOrder {
    DateDesc,
    DateAsc,
}

impl SortOrder {
    fn toggle(self) -> Self {
        match self {
            SortOrder::DateDesc => SortOrder::DateAsc,
            SortOrder::DateAsc => SortOrder::DateDesc,
        }
    }

    fn label(self) -> &'static str {
        match self {
            SortOrder::DateDesc => "date ↓",
            SortOrder::DateAsc => "date ↑",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    List,
    Details,
    Input(InputKind),
    ConfirmDelete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputKind {
    Category,
    DateRange,
}

struct StatusLine {
    text: String,
    is_error: bool,
    set_at: Instant,
}

struct BrowseState {
    mode: Mode,

    expenses: Vec<Expense>,
    summary: Summary,

    table_state: TableState,
    sort_order: SortOrder,

    // Input modal
    input_buffer: String,
    input_error: Option<String>,

    // Details view
    details: Option<Expense>,

    // Delete confirmation
    pending_delete: Option<Expense>,

    // Transient feedback, cleared after STATUS_TTL
    status: Option<StatusLine>,

    // Cached per-draw
    last_page_size: usize,
}

impl BrowseState {
    fn new() -> Self {
        Self {
            mode: Mode::List,
            expenses: Vec::new(),
            summary: Summary::default(),
            table_state: TableState::default(),
            sort_order: SortOrder::DateDesc,
            input_buffer: String::new(),
            input_error: None,
            details: None,
            pending_delete: None,
            status: None,
            last_page_size: 10,
        }
    }

    fn selected_expense(&self) -> Option<&Expense> {
        let selected = self.table_state.selected()?;
        self.expenses.get(selected)
    }

    fn set_status(&mut self, text: String) {
        self.status = Some(StatusLine {
            text,
            is_error: false,
            set_at: Instant::now(),
        });
    }

    fn set_error(&mut self, text: String) {
        self.status = Some(StatusLine {
            text,
            is_error: true,
            set_at: Instant::now(),
        });
    }

    fn tick_status(&mut self) {
        if let Some(ref status) = self.status {
            if status.set_at.elapsed() >= STATUS_TTL {
                self.status = None;
            }
        }
    }

    // Fetch list and summary with the current filter. Failures leave the
    // previously rendered data in place and surface as a status line.
    fn refresh(&mut self, api: &ApiClient, session: &Session, filter: &ExpenseFilter) {
        match expenses::list_expenses(api, session, filter) {
            Ok(list) => {
                self.expenses = list;
                self.sort_expenses();
                self.fix_selection();
            }
            Err(e) => self.set_error(format!("Failed to load expenses: {}", e)),
        }

        match expenses::get_summary(api, session) {
            Ok(summary) => self.summary = summary,
            Err(e) => self.set_error(format!("Failed to load summary: {}", e)),
        }
    }

    fn sort_expenses(&mut self) {
        match self.sort_order {
            SortOrder::DateDesc => {
                self.expenses
                    .sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
            }
            SortOrder::DateAsc => {
                self.expenses
                    .sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
            }
        }
    }

    fn fix_selection(&mut self) {
        if self.expenses.is_empty() {
            self.table_state.select(None);
        } else {
            let new_selected = match self.table_state.selected() {
                Some(sel) => min(sel, self.expenses.len().saturating_sub(1)),
                None => 0,
            };
            self.table_state.select(Some(new_selected));
        }
    }

    fn move_selection(&mut self, delta: i32) {
        if self.expenses.is_empty() {
            self.table_state.select(None);
            return;
        }

        let current = self.table_state.selected().unwrap_or(0) as i32;
        let max_index = self.expenses.len().saturating_sub(1) as i32;
        let next = (current + delta).clamp(0, max_index) as usize;
        self.table_state.select(Some(next));
    }

    fn page_up(&mut self) {
        let page = max(1, self.last_page_size) as i32;
        self.move_selection(-page);
    }

    fn page_down(&mut self) {
        let page = max(1, self.last_page_size) as i32;
        self.move_selection(page);
    }

    fn open_details(&mut self) {
        self.details = self.selected_expense().cloned();
        self.mode = Mode::Details;
    }

    fn close_details(&mut self) {
        self.details = None;
        self.mode = Mode::List;
    }

    fn start_confirm_delete(&mut self) {
        self.pending_delete = self.selected_expense().cloned();
        if self.pending_delete.is_some() {
            self.mode = Mode::ConfirmDelete;
        }
    }

    fn cancel_confirm_delete(&mut self) {
        self.pending_delete = None;
        self.mode = Mode::List;
    }

    fn start_input(&mut self, kind: InputKind, filter: &ExpenseFilter) {
        self.input_buffer.clear();
        self.input_error = None;

        match kind {
            InputKind::Category => {
                if let Some(ref c) = filter.category {
                    self.input_buffer = c.clone();
                }
            }
            InputKind::DateRange => {
                let from = filter
                    .start_date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                let to = filter
                    .end_date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                if !from.is_empty() || !to.is_empty() {
                    self.input_buffer = format!("{}..{}", from, to);
                }
            }
        }

        self.mode = Mode::Input(kind);
    }

    fn cancel_input(&mut self) {
        self.input_error = None;
        self.mode = Mode::List;
    }

    // Applying a filter refetches from the server; filtering is not local.
    fn commit_input(
        &mut self,
        kind: InputKind,
        api: &ApiClient,
        session: &Session,
        filter: &mut ExpenseFilter,
    ) {
        let raw = self.input_buffer.trim().to_string();
        match kind {
            InputKind::Category => {
                if raw.is_empty() {
                    filter.category = None;
                } else {
                    filter.category = Some(raw);
                }
                self.mode = Mode::List;
                self.refresh(api, session, filter);
            }
            InputKind::DateRange => {
                if raw.is_empty() {
                    filter.start_date = None;
                    filter.end_date = None;
                    self.mode = Mode::List;
                    self.refresh(api, session, filter);
                    return;
                }

                match parse_date_range(&raw) {
                    Ok((from, to)) => {
                        filter.start_date = from;
                        filter.end_date = to;
                        self.input_error = None;
                        self.mode = Mode::List;
                        self.refresh(api, session, filter);
                    }
                    Err(e) => {
                        self.input_error = Some(e);
                    }
                }
            }
        }
    }

    fn perform_delete(&mut self, api: &ApiClient, session: &Session, filter: &ExpenseFilter) {
        let Some(expense) = self.pending_delete.take() else {
            self.mode = Mode::List;
            return;
        };
        self.mode = Mode::List;

        match expenses::delete_expense(api, session, expense.id) {
            Ok(()) => self.set_status("Expense deleted.".to_string()),
            Err(e @ ApiError::Transport(_)) => {
                // The request never completed; skip the refresh.
                self.set_error(format!("Failed to delete expense: {}", e));
                return;
            }
            Err(e) => self.set_error(format!("Error: {}", e)),
        }

        self.refresh(api, session, filter);
    }
}

pub fn run_browse(
    api: &ApiClient,
    session: &Session,
    filter: &mut ExpenseFilter,
) -> Result<(), String> {
    enable_raw_mode().map_err(|e| format!("Failed to enable raw mode: {}", e))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| format!("Failed to enter alternate screen: {}", e))?;

    let result = (|| {
        let backend = ratatui::backend::CrosstermBackend::new(stdout);
        let mut terminal = ratatui::Terminal::new(backend)
            .map_err(|e| format!("Failed to initialize terminal: {}", e))?;

        let mut state = BrowseState::new();
        state.refresh(api, session, filter);

        loop {
            state.tick_status();

            terminal
                .draw(|frame| {
                    let size = frame.area();
                    let layout = Layout::default()
                        .direction(Direction::Vertical)
                        .constraints([
                            Constraint::Length(3),
                            Constraint::Min(5),
                            Constraint::Length(1),
                            Constraint::Length(2),
                        ])
                        .split(size);

                    render_header(frame, layout[0], &state, session, filter);
                    render_table(frame, layout[1], &mut state);
                    render_status(frame, layout[2], &state);
                    render_footer(frame, layout[3], &state);

                    if let Mode::Input(kind) = state.mode {
                        render_input_modal(frame, size, &state, kind);
                    }

                    if state.mode == Mode::Details {
                        render_details_modal(frame, size, &state);
                    }

                    if state.mode == Mode::ConfirmDelete {
                        render_confirm_modal(frame, size, &state);
                    }
                })
                .map_err(|e| format!("Failed to draw terminal UI: {}", e))?;

            if event::poll(std::time::Duration::from_millis(200))
                .map_err(|e| format!("Failed to poll input: {}", e))?
            {
                let event = event::read().map_err(|e| format!("Failed to read input: {}", e))?;
                match event {
                    Event::Key(key) => {
                        if handle_key(api, session, filter, &mut state, key) {
                            break;
                        }
                    }
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }

        Ok(())
    })();

    disable_raw_mode().map_err(|e| format!("Failed to disable raw mode: {}", e))?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen)
        .map_err(|e| format!("Failed to leave alternate screen: {}", e))?;

    result
}

fn handle_key(
    api: &ApiClient,
    session: &Session,
    filter: &mut ExpenseFilter,
    state: &mut BrowseState,
    key: KeyEvent,
) -> bool {
    // Many terminals emit both a Press and a Release event. Only act on Press/Repeat.
    if key.kind == KeyEventKind::Release {
        return false;
    }

    // Global quit in list mode
    if state.mode == Mode::List {
        if key.code == KeyCode::Char('q') || key.code == KeyCode::Esc {
            return true;
        }
    }

    match state.mode {
        Mode::List => match key.code {
            KeyCode::Up => state.move_selection(-1),
            KeyCode::Down => state.move_selection(1),
            KeyCode::PageUp => state.page_up(),
            KeyCode::PageDown => state.page_down(),
            KeyCode::Home => state.table_state.select(Some(0)),
            KeyCode::End => {
                if !state.expenses.is_empty() {
                    state
                        .table_state
                        .select(Some(state.expenses.len().saturating_sub(1)));
                }
            }
            KeyCode::Enter => state.open_details(),
            KeyCode::Char('r') => state.refresh(api, session, filter),
            KeyCode::Char('c') => state.start_input(InputKind::Category, filter),
            KeyCode::Char('d') => state.start_input(InputKind::DateRange, filter),
            KeyCode::Char('s') => {
                state.sort_order = state.sort_order.toggle();
                state.sort_expenses();
            }
            KeyCode::Char('x') => {
                *filter = ExpenseFilter::default();
                state.refresh(api, session, filter);
            }
            KeyCode::Delete | KeyCode::Char('D') => state.start_confirm_delete(),
            _ => {}
        },
        Mode::Details => match key.code {
            KeyCode::Esc => state.close_details(),
            KeyCode::Char('q') => state.close_details(),
            KeyCode::Char('b') => state.close_details(),
            _ => {}
        },
        Mode::ConfirmDelete => match key.code {
            KeyCode::Char('y') | KeyCode::Enter => state.perform_delete(api, session, filter),
            KeyCode::Char('n') | KeyCode::Esc => state.cancel_confirm_delete(),
            _ => {}
        },
        Mode::Input(kind) => {
            // Allow Ctrl+C / Ctrl+Q to cancel
            if key.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
            {
                state.cancel_input();
                return false;
            }

            match key.code {
                KeyCode::Esc => state.cancel_input(),
                KeyCode::Enter => state.commit_input(kind, api, session, filter),
                KeyCode::Backspace => {
                    state.input_buffer.pop();
                }
                KeyCode::Char(ch) => {
                    state.input_buffer.push(ch);
                }
                _ => {}
            }
        }
    }

    false
}

fn render_header(
    frame: &mut ratatui::Frame,
    area: Rect,
    state: &BrowseState,
    session: &Session,
    filter: &ExpenseFilter,
) {
    let category = filter.category.as_deref().unwrap_or("(any)").to_string();

    let from = filter
        .start_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "(any)".to_string());
    let to = filter
        .end_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "(any)".to_string());

    let line = Line::from(vec![
        Span::styled(
            format!("Expenses [{}]", session.username),
            Style::default().fg(Color::Cyan).bold(),
        ),
        Span::raw("  "),
        Span::styled(
            format!("Sort: {}", state.sort_order.label()),
            Style::default().fg(Color::White),
        ),
        Span::raw("  |  "),
        Span::raw(format!("Category: {}", category)),
        Span::raw("  |  "),
        Span::raw(format!("Date: {}..{}", from, to)),
        Span::raw("  |  "),
        Span::raw(format!("Rows: {}", state.expenses.len())),
        Span::raw("  |  "),
        Span::styled(
            format!(
                "This month: ${:.2} ({} expenses)",
                state.summary.total(),
                state.summary.count()
            ),
            Style::default().fg(Color::Green),
        ),
    ]);

    let block = Block::default().borders(Borders::ALL);
    let paragraph = Paragraph::new(line).block(block).alignment(Alignment::Left);
    frame.render_widget(paragraph, area);
}

fn render_status(frame: &mut ratatui::Frame, area: Rect, state: &BrowseState) {
    let Some(ref status) = state.status else {
        return;
    };

    let color = if status.is_error {
        Color::Red
    } else {
        Color::Green
    };

    frame.render_widget(
        Paragraph::new(status.text.as_str()).style(Style::default().fg(color)),
        area,
    );
}

fn render_footer(frame: &mut ratatui::Frame, area: Rect, state: &BrowseState) {
    let hint = match state.mode {
        Mode::List => "↑/↓ move  PgUp/PgDn page  Enter details  c category  d dates  s sort  r refresh  x clear  D delete  q/Esc exit",
        Mode::Details => "Esc/q/b back",
        Mode::ConfirmDelete => "y/Enter delete, n/Esc cancel",
        Mode::Input(_) => "Type, Enter apply, Esc cancel",
    };

    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(
        Paragraph::new(hint)
            .block(block)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_table(frame: &mut ratatui::Frame, area: Rect, state: &mut BrowseState) {
    let block = Block::default().title("Expenses").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header = Row::new([
        Cell::from("Date").style(Style::default().bold()),
        Cell::from("Category").style(Style::default().bold()),
        Cell::from("Description").style(Style::default().bold()),
        Cell::from("Amount").style(Style::default().bold()),
        Cell::from("Id").style(Style::default().bold()),
    ])
    .style(Style::default().fg(Color::White));

    let rows = state.expenses.iter().map(|expense| {
        let date = expense.date.format("%Y-%m-%d").to_string();
        let mut desc = if expense.description.is_empty() {
            "-".to_string()
        } else {
            expense.description.clone()
        };
        if desc.len() > 42 {
            desc.truncate(39);
            desc.push_str("...");
        }
        let amount = format!("${:.2}", expense.amount);

        Row::new([
            Cell::from(date),
            Cell::from(expense.category.clone()),
            Cell::from(desc),
            Cell::from(amount),
            Cell::from(expense.id.to_string()),
        ])
    });

    // Estimate a page size based on the table height.
    // Leave room for the header row.
    state.last_page_size = inner.height.saturating_sub(2) as usize;
    if state.last_page_size == 0 {
        state.last_page_size = 1;
    }

    let widths = [
        Constraint::Length(10),
        Constraint::Length(14),
        Constraint::Percentage(40),
        Constraint::Length(12),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White).bold())
        .highlight_symbol("➤ ")
        .column_spacing(1);

    frame.render_stateful_widget(table, inner, &mut state.table_state);

    if state.expenses.is_empty() {
        let empty = Paragraph::new("No expenses found. Add your first expense!")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
    }
}

fn render_input_modal(frame: &mut ratatui::Frame, area: Rect, state: &BrowseState, kind: InputKind) {
    let popup_area = centered_rect(80, 30, area);
    frame.render_widget(Clear, popup_area);

    let title = match kind {
        InputKind::Category => "Filter Category",
        InputKind::DateRange => "Filter Date Range",
    };

    let help = match kind {
        InputKind::Category => format!("Known categories: {} (empty clears)", CATEGORIES.join(", ")),
        InputKind::DateRange => {
            "Enter range like 2025-01-01..2025-01-31 (empty clears)".to_string()
        }
    };

    let mut lines = vec![
        Line::from(vec![Span::styled(title, Style::default().bold())]),
        Line::from(help),
        Line::from(""),
        Line::from(vec![Span::styled(
            format!("> {}", state.input_buffer),
            Style::default().fg(Color::Yellow),
        )]),
    ];

    if let Some(ref err) = state.input_error {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![Span::styled(
            err.as_str(),
            Style::default().fg(Color::Red),
        )]));
    }

    let block = Block::default().borders(Borders::ALL).title("Input");
    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, popup_area);
}

fn render_confirm_modal(frame: &mut ratatui::Frame, area: Rect, state: &BrowseState) {
    let popup_area = centered_rect(60, 25, area);
    frame.render_widget(Clear, popup_area);

    let lines = match state.pending_delete.as_ref() {
        Some(expense) => vec![
            Line::from(vec![Span::styled(
                "Delete this expense?",
                Style::default().fg(Color::Red).bold(),
            )]),
            Line::from(""),
            Line::from(format!(
                "{}  {}  ${:.2}",
                expense.date.format("%Y-%m-%d"),
                expense.category,
                expense.amount
            )),
            Line::from(""),
            Line::from(Span::styled(
                "y/Enter to delete, n/Esc to cancel",
                Style::default().fg(Color::DarkGray),
            )),
        ],
        None => vec![Line::from("No selection")],
    };

    let block = Block::default().borders(Borders::ALL).title("Confirm");
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        popup_area,
    );
}

fn render_details_modal(frame: &mut ratatui::Frame, area: Rect, state: &BrowseState) {
    let popup_area = centered_rect(90, 60, area);
    frame.render_widget(Clear, popup_area);

    let expense = match state.details.as_ref() {
        Some(expense) => expense,
        None => {
            frame.render_widget(
                Paragraph::new("No selection")
                    .block(Block::default().borders(Borders::ALL).title("Details"))
                    .alignment(Alignment::Center),
                popup_area,
            );
            return;
        }
    };

    let created_at = expense
        .created_at
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "-".to_string());

    let lines = vec![
        Line::from(vec![Span::styled(
            "Expense Details",
            Style::default().fg(Color::Cyan).bold(),
        )]),
        Line::from(""),
        Line::from(format!("Id: {}", expense.id)),
        Line::from(format!("User: {}", expense.user.as_deref().unwrap_or("-"))),
        Line::from(format!("Date: {}", expense.date.format("%Y-%m-%d"))),
        Line::from(format!("Category: {}", expense.category)),
        Line::from(format!("Amount: ${:.2}", expense.amount)),
        Line::from(format!("Recorded: {}", created_at)),
        Line::from(""),
        Line::from("Description:"),
        Line::from(expense.description.clone()),
        Line::from(""),
        Line::from(Span::styled(
            "Esc/q/b to go back",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default().borders(Borders::ALL).title("Details");
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: false }),
        popup_area,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

pub fn parse_date_range(input: &str) -> Result<(Option<NaiveDate>, Option<NaiveDate>), String> {
    let s = input.trim();

    // Supported formats:
    //  - YYYY-MM-DD..YYYY-MM-DD
    //  - YYYY-MM-DD,YYYY-MM-DD
    // Either side may be empty for an open-ended range.
    let (left, right) = if let Some((a, b)) = s.split_once("..") {
        (a.trim(), b.trim())
    } else if let Some((a, b)) = s.split_once(',') {
        (a.trim(), b.trim())
    } else {
        return Err("Invalid date range. Use YYYY-MM-DD..YYYY-MM-DD".to_string());
    };

    let from = if left.is_empty() {
        None
    } else {
        Some(parse_iso_date(left)?)
    };

    let to = if right.is_empty() {
        None
    } else {
        Some(parse_iso_date(right)?)
    };

    if let (Some(f), Some(t)) = (from, to) {
        if f > t {
            return Err("Invalid range: start date must be <= end date".to_string());
        }
    }

    Ok((from, to))
}

pub fn parse_iso_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}'. Use YYYY-MM-DD.", s.trim()))
}
