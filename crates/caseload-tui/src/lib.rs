// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};

use caseload_app::{AppCommand, AppEvent, AppMode, AppState, HelpVisibility, PageKind, PageTab};
use caseload_view::{
    ColumnSpec, Layout, ListCommand, ListProjection, ListViewState, Record, SortDirection,
    StoredViewState, ViewportBreakpoints, ViewportClass,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const HALF_PAGE_ROWS: isize = 10;

enum InternalEvent {
    ClearStatus { token: u64 },
}

/// Data access the TUI needs. The binary wires this to real storage; tests
/// substitute fixtures.
pub trait AppRuntime {
    fn load_page_records(&mut self, page: PageKind, tab: PageTab) -> Result<Vec<Record>>;
    fn load_view_state(
        &mut self,
        page: PageKind,
        default_layout: Layout,
        columns: &[ColumnSpec],
    ) -> Result<StoredViewState>;
    fn save_view_state(&mut self, page: PageKind, stored: &StoredViewState) -> Result<()>;
}

struct ViewData {
    list: ListViewState,
    records: Vec<Record>,
    selected_row: usize,
    selected_col: usize,
    search_input: String,
    breakpoints: ViewportBreakpoints,
    viewport: ViewportClass,
    status_token: u64,
}

impl ViewData {
    fn new(state: &AppState, breakpoints: ViewportBreakpoints, viewport: ViewportClass) -> Self {
        let page = state.active_page;
        let default_layout = state.active_tab().default_layout(viewport);
        Self {
            list: ListViewState::new(
                page.columns(),
                default_layout,
                StoredViewState::defaults(default_layout, page.columns()),
            ),
            records: Vec::new(),
            selected_row: 0,
            selected_col: 0,
            search_input: String::new(),
            breakpoints,
            viewport,
            status_token: 0,
        }
    }
}

pub fn run_app<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    breakpoints: ViewportBreakpoints,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let (width, _) = terminal::size().context("query terminal size")?;
    let mut view_data = ViewData::new(state, breakpoints, breakpoints.classify(width));
    let (internal_tx, internal_rx) = mpsc::channel();

    if let Err(error) = refresh_view_data(state, runtime, &mut view_data) {
        emit_status(
            state,
            &mut view_data,
            &internal_tx,
            format!("load failed: {error}"),
        );
    }

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Resize(width, _) => {
                    handle_resize(state, runtime, &mut view_data, &internal_tx, width);
                }
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.status_line = Some(message.into());
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

/// Rebuilds the list controller for the active page and tab. Sort and search
/// are per-visit state, so a fresh controller starts them empty; the stored
/// settings come back from the runtime.
fn refresh_view_data<R: AppRuntime>(
    state: &AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
) -> Result<()> {
    let page = state.active_page;
    let tab = state.active_tab();
    let default_layout = tab.default_layout(view_data.viewport);

    let stored = runtime.load_view_state(page, default_layout, page.columns())?;
    let records = runtime.load_page_records(page, tab)?;

    let mut list = ListViewState::new(page.columns(), default_layout, stored);
    // Settings may have been saved under another tab's default; uncustomized
    // views snap to the default that applies here.
    list.apply(ListCommand::FollowDefault(default_layout));

    view_data.list = list;
    view_data.records = records;
    view_data.selected_row = 0;
    view_data.selected_col = 0;
    view_data.search_input.clear();
    Ok(())
}

fn should_refresh_view(events: &[AppEvent]) -> bool {
    events
        .iter()
        .any(|event| matches!(event, AppEvent::PageChanged(_) | AppEvent::TabChanged(_)))
}

fn dispatch_and_refresh<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    command: AppCommand,
    internal_tx: &Sender<InternalEvent>,
) {
    let events = state.dispatch(command);
    if should_refresh_view(&events)
        && let Err(error) = refresh_view_data(state, runtime, view_data)
    {
        emit_status(
            state,
            view_data,
            internal_tx,
            format!("load failed: {error}"),
        );
    }
    if events
        .iter()
        .any(|event| matches!(event, AppEvent::StatusUpdated(_)))
    {
        view_data.status_token = view_data.status_token.saturating_add(1);
        schedule_status_clear(internal_tx, view_data.status_token);
    }
}

/// Runs one list command, persists the settings when the command touched
/// them, and surfaces the outcome in the status line. A failed save keeps
/// the in-memory change and warns instead.
fn apply_list_command<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: ListCommand,
) {
    let status = view_data.list.apply(command);
    if status.persists_settings()
        && let Err(error) = runtime.save_view_state(state.active_page, view_data.list.stored())
    {
        emit_status(
            state,
            view_data,
            internal_tx,
            format!("save failed: {error}"),
        );
        clamp_cursor(view_data);
        return;
    }
    emit_status(state, view_data, internal_tx, status.message());
    clamp_cursor(view_data);
}

fn handle_resize<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    width: u16,
) {
    let viewport = view_data.breakpoints.classify(width);
    if viewport == view_data.viewport {
        return;
    }
    view_data.viewport = viewport;
    let default_layout = state.active_tab().default_layout(viewport);
    apply_list_command(
        state,
        runtime,
        view_data,
        internal_tx,
        ListCommand::FollowDefault(default_layout),
    );
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if state.help == HelpVisibility::Visible {
        if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
            dispatch_and_refresh(state, runtime, view_data, AppCommand::CloseHelp, internal_tx);
        }
        return false;
    }

    if state.mode == AppMode::Search {
        handle_search_key(state, runtime, view_data, internal_tx, key);
        return false;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('?'), _) => {
            dispatch_and_refresh(state, runtime, view_data, AppCommand::OpenHelp, internal_tx);
        }
        (KeyCode::Char('/'), KeyModifiers::NONE) => {
            view_data.search_input.clear();
            dispatch_and_refresh(state, runtime, view_data, AppCommand::EnterSearch, internal_tx);
        }
        (KeyCode::Char('f'), KeyModifiers::NONE) => {
            dispatch_and_refresh(state, runtime, view_data, AppCommand::NextPage, internal_tx);
        }
        (KeyCode::Char('b'), KeyModifiers::NONE) => {
            dispatch_and_refresh(state, runtime, view_data, AppCommand::PrevPage, internal_tx);
        }
        (KeyCode::Tab, _) => {
            dispatch_and_refresh(state, runtime, view_data, AppCommand::NextTab, internal_tx);
        }
        (KeyCode::BackTab, _) => {
            dispatch_and_refresh(state, runtime, view_data, AppCommand::PrevTab, internal_tx);
        }
        (KeyCode::Char('j') | KeyCode::Down, _) => move_row(view_data, 1),
        (KeyCode::Char('k') | KeyCode::Up, _) => move_row(view_data, -1),
        (KeyCode::Char('g'), KeyModifiers::NONE) => view_data.selected_row = 0,
        (KeyCode::Char('G'), _) => jump_last_row(view_data),
        (KeyCode::Char('d'), KeyModifiers::NONE) => move_row(view_data, HALF_PAGE_ROWS),
        (KeyCode::Char('u'), KeyModifiers::NONE) => move_row(view_data, -HALF_PAGE_ROWS),
        (KeyCode::Char('h') | KeyCode::Left, _) => move_col(view_data, -1),
        (KeyCode::Char('l') | KeyCode::Right, _) => move_col(view_data, 1),
        (KeyCode::Char('s'), KeyModifiers::NONE) => {
            if let Some(key) = selected_column_key(view_data) {
                apply_list_command(
                    state,
                    runtime,
                    view_data,
                    internal_tx,
                    ListCommand::CycleSort(key),
                );
            }
        }
        (KeyCode::Char('S'), _) => {
            apply_list_command(state, runtime, view_data, internal_tx, ListCommand::ClearSort);
        }
        (KeyCode::Char('x'), KeyModifiers::NONE) => {
            if let Some(term) = view_data.list.terms().last().cloned() {
                apply_list_command(
                    state,
                    runtime,
                    view_data,
                    internal_tx,
                    ListCommand::RemoveTerm(term),
                );
            } else {
                emit_status(state, view_data, internal_tx, "no terms active");
            }
        }
        (KeyCode::Char('X'), _) => {
            apply_list_command(
                state,
                runtime,
                view_data,
                internal_tx,
                ListCommand::ClearTerms,
            );
        }
        (KeyCode::Char('v'), KeyModifiers::NONE) => {
            apply_list_command(
                state,
                runtime,
                view_data,
                internal_tx,
                ListCommand::CycleLayout,
            );
        }
        (KeyCode::Char('V'), _) => {
            apply_list_command(state, runtime, view_data, internal_tx, ListCommand::ResetView);
        }
        (KeyCode::Char('t'), KeyModifiers::NONE) => {
            cycle_group_by(state, runtime, view_data, internal_tx);
        }
        (KeyCode::Char('c'), KeyModifiers::NONE) => {
            if let Some(key) = selected_column_key(view_data) {
                apply_list_command(
                    state,
                    runtime,
                    view_data,
                    internal_tx,
                    ListCommand::ToggleColumn(key),
                );
            }
        }
        (KeyCode::Char('C'), _) => {
            apply_list_command(
                state,
                runtime,
                view_data,
                internal_tx,
                ListCommand::ShowAllColumns,
            );
        }
        _ => {}
    }
    false
}

fn handle_search_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc => {
            view_data.search_input.clear();
            dispatch_and_refresh(state, runtime, view_data, AppCommand::ExitToNav, internal_tx);
        }
        KeyCode::Enter => {
            let input = std::mem::take(&mut view_data.search_input);
            state.dispatch(AppCommand::ExitToNav);
            apply_list_command(
                state,
                runtime,
                view_data,
                internal_tx,
                ListCommand::AddTerm(input),
            );
        }
        KeyCode::Backspace => {
            view_data.search_input.pop();
        }
        KeyCode::Char(ch) => view_data.search_input.push(ch),
        _ => {}
    }
}

fn cycle_group_by<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let fields = state.active_page.group_fields();
    if fields.is_empty() {
        emit_status(state, view_data, internal_tx, "grouping unavailable");
        return;
    }
    let next = match view_data.list.settings().group_by {
        None => Some(fields[0]),
        Some(active) => fields
            .iter()
            .position(|field| *field == active)
            .and_then(|index| fields.get(index + 1))
            .copied(),
    };
    apply_list_command(
        state,
        runtime,
        view_data,
        internal_tx,
        ListCommand::SetGroupBy(next),
    );
}

fn current_projection(view_data: &ViewData) -> ListProjection {
    view_data.list.project(&view_data.records)
}

fn selected_column_key(view_data: &ViewData) -> Option<String> {
    view_data
        .list
        .visible_columns()
        .get(view_data.selected_col)
        .map(|column| column.key.to_owned())
}

fn move_row(view_data: &mut ViewData, delta: isize) {
    let row_count = current_projection(view_data).len();
    if row_count == 0 {
        view_data.selected_row = 0;
        return;
    }
    let current = view_data.selected_row;
    let next = if delta.is_negative() {
        current.saturating_sub(delta.unsigned_abs())
    } else {
        current.saturating_add(delta as usize)
    };
    view_data.selected_row = next.min(row_count.saturating_sub(1));
}

fn jump_last_row(view_data: &mut ViewData) {
    view_data.selected_row = current_projection(view_data).len().saturating_sub(1);
}

fn move_col(view_data: &mut ViewData, delta: isize) {
    let visible = view_data.list.visible_columns();
    if visible.is_empty() {
        view_data.selected_col = 0;
        return;
    }
    let current = view_data.selected_col.min(visible.len().saturating_sub(1));
    let next = if delta.is_negative() {
        current.saturating_sub(delta.unsigned_abs())
    } else {
        current.saturating_add(delta as usize)
    };
    view_data.selected_col = next.min(visible.len().saturating_sub(1));
}

fn clamp_cursor(view_data: &mut ViewData) {
    let row_count = current_projection(view_data).len();
    if row_count == 0 {
        view_data.selected_row = 0;
    } else {
        view_data.selected_row = view_data.selected_row.min(row_count.saturating_sub(1));
    }

    let visible = view_data.list.visible_columns().len();
    if visible == 0 {
        view_data.selected_col = 0;
    } else {
        view_data.selected_col = view_data.selected_col.min(visible.saturating_sub(1));
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = ratatui::layout::Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.area());

    let selected = PageKind::ALL
        .iter()
        .position(|page| *page == state.active_page)
        .unwrap_or(0);
    let page_titles = PageKind::ALL
        .iter()
        .map(|page| page.as_str().to_owned())
        .collect::<Vec<String>>();
    let pages = Tabs::new(page_titles)
        .block(Block::default().title("caseload").borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(pages, layout[0]);

    let projection = current_projection(view_data);

    let toolbar = Paragraph::new(toolbar_text(state, view_data));
    frame.render_widget(toolbar, layout[1]);

    match view_data.list.layout() {
        Layout::Table => render_table_layout(frame, layout[2], state, view_data, &projection),
        Layout::Card | Layout::List => {
            render_text_layout(frame, layout[2], state, view_data, &projection)
        }
    }

    let status = status_text(state, view_data);
    let status_widget = Paragraph::new(status)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[3]);

    if state.help == HelpVisibility::Visible {
        let area = centered_rect(80, 72, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn toolbar_text(state: &AppState, view_data: &ViewData) -> String {
    let list = &view_data.list;
    let strip = if view_data.viewport.is_compact_toolbar {
        format!("[{}]", state.active_tab().label())
    } else {
        state
            .active_page
            .tabs()
            .iter()
            .map(|tab| {
                if *tab == state.active_tab() {
                    format!("[{}]", tab.label())
                } else {
                    tab.label().to_owned()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    };

    let mut parts = vec![strip, format!("layout {}", list.layout().as_str())];
    if view_data.viewport.is_mobile {
        return parts.join(" | ");
    }
    if let Some(field) = list.settings().group_by {
        parts.push(format!("group {}", field.as_str()));
    }
    if !list.terms().is_empty() {
        parts.push(format!("terms {}", list.terms().join(", ")));
    }
    parts.join(" | ")
}

fn body_title(state: &AppState, view_data: &ViewData, projection: &ListProjection) -> String {
    let list = &view_data.list;
    let mut parts = vec![format!(
        "{} r:{}/{} c:{}/{}",
        state.active_tab().label(),
        projection.len(),
        view_data.records.len(),
        list.visible_columns().len(),
        list.columns().len(),
    )];
    if !list.sort().is_unsorted() {
        parts.push(format!("sort {}", list.sort().describe(list.columns())));
    }
    if let Some(field) = list.settings().group_by {
        parts.push(format!("group {}", field.label()));
    }
    if !list.terms().is_empty() {
        parts.push(format!("search {}", list.terms().join(", ")));
    }
    if list.stored().layout_customized {
        parts.push("pinned".to_owned());
    }
    parts.join(" | ")
}

/// Display rows with group headers interleaved, in projection order.
enum BodyRow<'a> {
    GroupHeader(&'a str, usize),
    Record(usize, &'a Record),
}

fn body_rows(projection: &ListProjection) -> Vec<BodyRow<'_>> {
    match &projection.groups {
        None => projection
            .rows
            .iter()
            .enumerate()
            .map(|(index, record)| BodyRow::Record(index, record))
            .collect(),
        Some(groups) => {
            let mut rows = Vec::new();
            let mut index = 0;
            for group in groups {
                rows.push(BodyRow::GroupHeader(group.label.as_str(), group.records.len()));
                for record in &group.records {
                    rows.push(BodyRow::Record(index, record));
                    index += 1;
                }
            }
            rows
        }
    }
}

/// First body row to draw so the selected row stays on screen. Scrolls only
/// once the selection would fall past the bottom.
fn scroll_offset(selected_position: Option<usize>, visible_rows: usize) -> usize {
    match selected_position {
        Some(position) if visible_rows > 0 => {
            position.saturating_sub(visible_rows.saturating_sub(1))
        }
        _ => 0,
    }
}

fn selected_body_position(rows: &[BodyRow<'_>], selected_row: usize) -> Option<usize> {
    rows.iter().position(|row| match row {
        BodyRow::Record(index, _) => *index == selected_row,
        BodyRow::GroupHeader(_, _) => false,
    })
}

fn render_table_layout(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    view_data: &ViewData,
    projection: &ListProjection,
) {
    let mut visible = view_data.list.visible_columns();
    if visible.is_empty() {
        visible = view_data.list.columns().to_vec();
    }
    let widths = vec![Constraint::Min(8); visible.len().max(1)];

    let header_cells = visible.iter().map(|column| {
        Cell::from(header_label(&view_data.list, column)).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    });
    let header = Row::new(header_cells);

    let rows = body_rows(projection);
    let visible_rows = area.height.saturating_sub(3) as usize;
    let offset = scroll_offset(
        selected_body_position(&rows, view_data.selected_row),
        visible_rows,
    );

    let table_rows = rows.iter().skip(offset).map(|row| match row {
        BodyRow::GroupHeader(label, count) => {
            let mut cells = vec![Cell::from(format!("== {label} ({count})")).style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )];
            cells.resize(visible.len(), Cell::from(""));
            Row::new(cells)
        }
        BodyRow::Record(index, record) => {
            let selected_row = *index == view_data.selected_row;
            let cells = visible
                .iter()
                .enumerate()
                .map(|(column_index, column)| {
                    let mut style = Style::default();
                    if selected_row {
                        style = style.bg(Color::DarkGray);
                    }
                    if selected_row && column_index == view_data.selected_col {
                        style = Style::default()
                            .fg(Color::Black)
                            .bg(Color::Cyan)
                            .add_modifier(Modifier::BOLD);
                    }
                    Cell::from(record.display(column.key)).style(style)
                })
                .collect::<Vec<_>>();
            Row::new(cells)
        }
    });

    let table = Table::new(table_rows, widths)
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .title(body_title(state, view_data, projection))
                .borders(Borders::ALL),
        );
    frame.render_widget(table, area);
}

fn header_label(list: &ListViewState, column: &ColumnSpec) -> String {
    let mut label = column.label.to_owned();
    if let Some(direction) = list.sort().direction_of(column.key)
        && let Some(position) = list.sort().position_of(column.key)
    {
        if list.sort().secondary().is_none() {
            label.push_str(match direction {
                SortDirection::Ascending => " ↑",
                SortDirection::Descending => " ↓",
            });
        } else {
            label.push_str(match direction {
                SortDirection::Ascending => " ▲",
                SortDirection::Descending => " ▼",
            });
            label.push_str(&position.to_string());
        }
    }
    label
}

fn render_text_layout(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    view_data: &ViewData,
    projection: &ListProjection,
) {
    let (lines, selected_line) = match view_data.list.layout() {
        Layout::Card => card_lines(view_data, projection),
        _ => list_lines(view_data, projection),
    };
    let visible_rows = area.height.saturating_sub(2) as usize;
    let offset = scroll_offset(selected_line, visible_rows);
    let text = lines
        .into_iter()
        .skip(offset)
        .collect::<Vec<_>>()
        .join("\n");

    let body = Paragraph::new(text).block(
        Block::default()
            .title(body_title(state, view_data, projection))
            .borders(Borders::ALL),
    );
    frame.render_widget(body, area);
}

fn card_lines(view_data: &ViewData, projection: &ListProjection) -> (Vec<String>, Option<usize>) {
    let visible = view_data.list.visible_columns();
    let mut lines = Vec::new();
    let mut selected_line = None;
    for row in body_rows(projection) {
        match row {
            BodyRow::GroupHeader(label, count) => {
                lines.push(format!("== {label} ({count})"));
                lines.push(String::new());
            }
            BodyRow::Record(index, record) => {
                let selected = index == view_data.selected_row;
                if selected {
                    selected_line = Some(lines.len());
                }
                let marker = if selected { "> " } else { "  " };
                let title = visible
                    .first()
                    .map(|column| record.display(column.key))
                    .unwrap_or_default();
                lines.push(format!("{marker}{title}"));

                let detail = visible
                    .iter()
                    .skip(1)
                    .filter_map(|column| {
                        let value = record.display(column.key);
                        if value.is_empty() {
                            None
                        } else {
                            Some(format!("{} {value}", column.label))
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" | ");
                if !detail.is_empty() {
                    lines.push(format!("    {detail}"));
                }
                lines.push(String::new());
            }
        }
    }
    (lines, selected_line)
}

fn list_lines(view_data: &ViewData, projection: &ListProjection) -> (Vec<String>, Option<usize>) {
    let visible = view_data.list.visible_columns();
    let mut lines = Vec::new();
    let mut selected_line = None;
    for row in body_rows(projection) {
        match row {
            BodyRow::GroupHeader(label, count) => {
                lines.push(format!("== {label} ({count})"));
            }
            BodyRow::Record(index, record) => {
                let selected = index == view_data.selected_row;
                if selected {
                    selected_line = Some(lines.len());
                }
                let marker = if selected { "> " } else { "  " };
                let values = visible
                    .iter()
                    .map(|column| record.display(column.key))
                    .filter(|value| !value.is_empty())
                    .collect::<Vec<_>>()
                    .join("  ");
                lines.push(format!("{marker}{values}"));
            }
        }
    }
    (lines, selected_line)
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    if state.help == HelpVisibility::Visible {
        return String::new();
    }
    if state.mode == AppMode::Search {
        return format!(
            "SEARCH | /{}_ | enter add term | esc cancel",
            view_data.search_input
        );
    }
    let default = "j/k/h/l g/G d/u | f/b pages tab tabs | s/S sort / x/X search | v/V layout t group c/C cols | ? ctrl+q";
    match &state.status_line {
        Some(status) => format!("NAV | {status} | {default}"),
        None => format!("NAV | {default}"),
    }
}

fn help_overlay_text() -> &'static str {
    "global: ctrl+q quit | ? help\n\
nav: j/k rows | h/l columns | g/G first/last | d/u half page\n\
nav: f/b pages | tab/shift+tab datasets\n\
sort: s cycle on selected column | S clear; two keys max, oldest retires\n\
search: / add term | x drop last term | X clear terms\n\
view: v cycle layout | V reset view | t cycle grouping\n\
columns: c hide/show selected | C show all; the last column stays\n\
search input: type term | enter add | esc cancel\n\
help: esc or ? close"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = ratatui::layout::Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    ratatui::layout::Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::{
        AppRuntime, InternalEvent, ViewData, body_rows, current_projection, handle_key_event,
        handle_resize, header_label, refresh_view_data, scroll_offset, selected_body_position,
        status_text, toolbar_text,
    };
    use anyhow::{Result, bail};
    use caseload_app::{AppCommand, AppMode, AppState, HelpVisibility, PageKind, PageTab};
    use caseload_view::{
        ColumnSpec, Layout, ListCommand, Record, RecordKey, StoredViewState, ViewportBreakpoints,
        ViewportClass,
    };
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::collections::BTreeMap;
    use std::sync::mpsc::{self, Sender};

    #[derive(Debug, Default)]
    struct TestRuntime {
        records: Vec<Record>,
        stored: BTreeMap<&'static str, StoredViewState>,
        saves: Vec<PageKind>,
        fail_records: bool,
    }

    impl AppRuntime for TestRuntime {
        fn load_page_records(&mut self, page: PageKind, _tab: PageTab) -> Result<Vec<Record>> {
            if self.fail_records {
                bail!("records unavailable");
            }
            if page == PageKind::Cases {
                Ok(self.records.clone())
            } else {
                Ok(Vec::new())
            }
        }

        fn load_view_state(
            &mut self,
            page: PageKind,
            default_layout: Layout,
            columns: &[ColumnSpec],
        ) -> Result<StoredViewState> {
            Ok(self
                .stored
                .get(page.as_str())
                .cloned()
                .unwrap_or_else(|| StoredViewState::defaults(default_layout, columns)))
        }

        fn save_view_state(&mut self, page: PageKind, stored: &StoredViewState) -> Result<()> {
            self.stored.insert(page.as_str(), stored.clone());
            self.saves.push(page);
            Ok(())
        }
    }

    fn test_breakpoints() -> ViewportBreakpoints {
        ViewportBreakpoints {
            mobile_below: 80,
            compact_toolbar_below: 110,
        }
    }

    fn case_fixture(key: i64, number: &str, client: &str, status: &str) -> Record {
        Record::new(RecordKey::new(key))
            .with_text("case", number)
            .with_text("client", client)
            .with_text("status", status)
    }

    fn sample_cases() -> Vec<Record> {
        vec![
            case_fixture(1, "IES-2026-00003", "Morgan Reed", "Active"),
            case_fixture(2, "IES-2026-00001", "Jamie Fox", "Pending"),
            case_fixture(3, "IES-2026-00002", "Alex North", "Active"),
        ]
    }

    fn setup() -> (AppState, TestRuntime, ViewData) {
        setup_with(sample_cases())
    }

    fn setup_with(records: Vec<Record>) -> (AppState, TestRuntime, ViewData) {
        let state = AppState::default();
        let mut runtime = TestRuntime {
            records,
            ..TestRuntime::default()
        };
        let mut view_data = ViewData::new(&state, test_breakpoints(), ViewportClass::default());
        refresh_view_data(&state, &mut runtime, &mut view_data).expect("initial refresh");
        (state, runtime, view_data)
    }

    fn press(
        state: &mut AppState,
        runtime: &mut TestRuntime,
        view_data: &mut ViewData,
        tx: &Sender<InternalEvent>,
        code: KeyCode,
    ) {
        handle_key_event(
            state,
            runtime,
            view_data,
            tx,
            KeyEvent::new(code, KeyModifiers::NONE),
        );
    }

    #[test]
    fn sort_key_cycles_the_selected_column() {
        let (mut state, mut runtime, mut view_data) = setup();
        let (tx, _rx) = mpsc::channel();

        press(&mut state, &mut runtime, &mut view_data, &tx, KeyCode::Char('s'));
        assert_eq!(state.status_line.as_deref(), Some("sort case asc"));
        press(&mut state, &mut runtime, &mut view_data, &tx, KeyCode::Char('s'));
        assert_eq!(state.status_line.as_deref(), Some("sort case desc"));
        press(&mut state, &mut runtime, &mut view_data, &tx, KeyCode::Char('s'));
        assert_eq!(state.status_line.as_deref(), Some("sort cleared"));
        assert!(view_data.list.sort().is_unsorted());
    }

    #[test]
    fn sort_is_refused_on_unsortable_columns() {
        let (mut state, mut runtime, mut view_data) = setup();
        let (tx, _rx) = mpsc::channel();

        // The flags column is last on the cases page and not sortable.
        view_data.selected_col = view_data.list.visible_columns().len() - 1;
        press(&mut state, &mut runtime, &mut view_data, &tx, KeyCode::Char('s'));
        assert_eq!(state.status_line.as_deref(), Some("sort unavailable"));
        assert!(view_data.list.sort().is_unsorted());
    }

    #[test]
    fn search_flow_adds_and_removes_terms() {
        let (mut state, mut runtime, mut view_data) = setup();
        let (tx, _rx) = mpsc::channel();

        press(&mut state, &mut runtime, &mut view_data, &tx, KeyCode::Char('/'));
        assert_eq!(state.mode, AppMode::Search);
        for ch in "reed".chars() {
            press(&mut state, &mut runtime, &mut view_data, &tx, KeyCode::Char(ch));
        }
        assert_eq!(view_data.search_input, "reed");
        press(&mut state, &mut runtime, &mut view_data, &tx, KeyCode::Enter);

        assert_eq!(state.mode, AppMode::Nav);
        assert_eq!(view_data.list.terms(), ["reed"]);
        assert_eq!(current_projection(&view_data).len(), 1);

        press(&mut state, &mut runtime, &mut view_data, &tx, KeyCode::Char('x'));
        assert!(view_data.list.terms().is_empty());
        assert_eq!(current_projection(&view_data).len(), 3);

        press(&mut state, &mut runtime, &mut view_data, &tx, KeyCode::Char('x'));
        assert_eq!(state.status_line.as_deref(), Some("no terms active"));
    }

    #[test]
    fn escape_cancels_the_search_input() {
        let (mut state, mut runtime, mut view_data) = setup();
        let (tx, _rx) = mpsc::channel();

        press(&mut state, &mut runtime, &mut view_data, &tx, KeyCode::Char('/'));
        press(&mut state, &mut runtime, &mut view_data, &tx, KeyCode::Char('z'));
        press(&mut state, &mut runtime, &mut view_data, &tx, KeyCode::Esc);

        assert_eq!(state.mode, AppMode::Nav);
        assert!(view_data.list.terms().is_empty());
        assert!(view_data.search_input.is_empty());
    }

    #[test]
    fn only_setting_changes_save_through_the_runtime() {
        let (mut state, mut runtime, mut view_data) = setup();
        let (tx, _rx) = mpsc::channel();

        press(&mut state, &mut runtime, &mut view_data, &tx, KeyCode::Char('s'));
        assert!(runtime.saves.is_empty());

        press(&mut state, &mut runtime, &mut view_data, &tx, KeyCode::Char('v'));
        assert_eq!(runtime.saves, vec![PageKind::Cases]);
        assert_eq!(view_data.list.layout(), Layout::Card);

        press(&mut state, &mut runtime, &mut view_data, &tx, KeyCode::Char('t'));
        assert_eq!(runtime.saves.len(), 2);
        assert_eq!(state.status_line.as_deref(), Some("grouped by status"));
    }

    #[test]
    fn tab_switches_apply_the_new_tabs_default() {
        let (mut state, mut runtime, mut view_data) = setup();
        let (tx, _rx) = mpsc::channel();
        assert_eq!(view_data.list.layout(), Layout::Table);

        press(&mut state, &mut runtime, &mut view_data, &tx, KeyCode::Tab);
        press(&mut state, &mut runtime, &mut view_data, &tx, KeyCode::Tab);
        assert_eq!(state.active_tab(), PageTab::ClosedCases);
        assert_eq!(view_data.list.layout(), Layout::List);
    }

    #[test]
    fn customized_layouts_survive_tab_switches() {
        let (mut state, mut runtime, mut view_data) = setup();
        let (tx, _rx) = mpsc::channel();

        press(&mut state, &mut runtime, &mut view_data, &tx, KeyCode::Char('v'));
        assert_eq!(view_data.list.layout(), Layout::Card);
        assert!(view_data.list.stored().layout_customized);

        press(&mut state, &mut runtime, &mut view_data, &tx, KeyCode::Tab);
        press(&mut state, &mut runtime, &mut view_data, &tx, KeyCode::Tab);
        assert_eq!(state.active_tab(), PageTab::ClosedCases);
        assert_eq!(view_data.list.layout(), Layout::Card);

        // Resetting releases the pin; the tab default takes over again.
        handle_key_event(
            &mut state,
            &mut runtime,
            &mut view_data,
            &tx,
            KeyEvent::new(KeyCode::Char('V'), KeyModifiers::SHIFT),
        );
        assert_eq!(view_data.list.layout(), Layout::List);
        assert!(!view_data.list.stored().layout_customized);
    }

    #[test]
    fn resize_across_the_mobile_breakpoint_swaps_the_default() {
        let (mut state, mut runtime, mut view_data) = setup();
        let (tx, _rx) = mpsc::channel();
        assert_eq!(view_data.list.layout(), Layout::Table);

        handle_resize(&mut state, &mut runtime, &mut view_data, &tx, 60);
        assert!(view_data.viewport.is_mobile);
        assert_eq!(view_data.list.layout(), Layout::Card);

        handle_resize(&mut state, &mut runtime, &mut view_data, &tx, 120);
        assert!(!view_data.viewport.is_mobile);
        assert_eq!(view_data.list.layout(), Layout::Table);
    }

    #[test]
    fn resize_within_the_same_class_changes_nothing() {
        let (mut state, mut runtime, mut view_data) = setup();
        let (tx, _rx) = mpsc::channel();
        state.status_line = None;

        handle_resize(&mut state, &mut runtime, &mut view_data, &tx, 200);
        assert!(state.status_line.is_none());
        assert_eq!(view_data.list.layout(), Layout::Table);
    }

    #[test]
    fn cursor_clamps_when_filters_shrink_the_projection() {
        let (mut state, mut runtime, mut view_data) = setup();
        let (tx, _rx) = mpsc::channel();

        press(&mut state, &mut runtime, &mut view_data, &tx, KeyCode::Char('G'));
        assert_eq!(view_data.selected_row, 2);

        press(&mut state, &mut runtime, &mut view_data, &tx, KeyCode::Char('/'));
        for ch in "fox".chars() {
            press(&mut state, &mut runtime, &mut view_data, &tx, KeyCode::Char(ch));
        }
        press(&mut state, &mut runtime, &mut view_data, &tx, KeyCode::Enter);

        assert_eq!(current_projection(&view_data).len(), 1);
        assert_eq!(view_data.selected_row, 0);
    }

    #[test]
    fn group_cycle_covers_page_fields_and_off() {
        let (mut state, mut runtime, mut view_data) = setup();
        let (tx, _rx) = mpsc::channel();

        let mut statuses = Vec::new();
        for _ in 0..5 {
            press(&mut state, &mut runtime, &mut view_data, &tx, KeyCode::Char('t'));
            statuses.push(state.status_line.clone().unwrap_or_default());
        }
        assert_eq!(
            statuses,
            vec![
                "grouped by status",
                "grouped by priority",
                "grouped by staff",
                "grouped by jurisdiction",
                "grouping off",
            ],
        );
    }

    #[test]
    fn grouping_is_unavailable_on_the_notices_page() {
        let (mut state, mut runtime, mut view_data) = setup();
        let (tx, _rx) = mpsc::channel();

        state.dispatch(AppCommand::SelectPage(PageKind::Notices));
        refresh_view_data(&state, &mut runtime, &mut view_data).expect("refresh");

        press(&mut state, &mut runtime, &mut view_data, &tx, KeyCode::Char('t'));
        assert_eq!(state.status_line.as_deref(), Some("grouping unavailable"));
    }

    #[test]
    fn help_overlay_swallows_list_keys() {
        let (mut state, mut runtime, mut view_data) = setup();
        let (tx, _rx) = mpsc::channel();

        press(&mut state, &mut runtime, &mut view_data, &tx, KeyCode::Char('?'));
        assert_eq!(state.help, HelpVisibility::Visible);

        press(&mut state, &mut runtime, &mut view_data, &tx, KeyCode::Char('j'));
        assert_eq!(view_data.selected_row, 0);

        press(&mut state, &mut runtime, &mut view_data, &tx, KeyCode::Esc);
        assert_eq!(state.help, HelpVisibility::Hidden);
    }

    #[test]
    fn load_failures_surface_in_the_status_line() {
        let (mut state, mut runtime, mut view_data) = setup();
        let (tx, _rx) = mpsc::channel();

        runtime.fail_records = true;
        press(&mut state, &mut runtime, &mut view_data, &tx, KeyCode::Tab);
        let status = state.status_line.clone().unwrap_or_default();
        assert!(status.starts_with("load failed:"), "unexpected: {status}");
    }

    #[test]
    fn header_labels_mark_single_and_dual_sorts() {
        let (_state, _runtime, mut view_data) = setup();

        view_data.list.apply(ListCommand::CycleSort("case".to_owned()));
        let case_column = view_data.list.columns()[0];
        assert_eq!(header_label(&view_data.list, &case_column), "case ↑");

        view_data
            .list
            .apply(ListCommand::CycleSort("status".to_owned()));
        let status_column = view_data.list.columns()[2];
        assert_eq!(header_label(&view_data.list, &case_column), "case ▲1");
        assert_eq!(header_label(&view_data.list, &status_column), "status ▲2");
    }

    #[test]
    fn grouped_projections_interleave_header_rows() {
        let (mut state, mut runtime, mut view_data) = setup();
        let (tx, _rx) = mpsc::channel();

        press(&mut state, &mut runtime, &mut view_data, &tx, KeyCode::Char('t'));
        let projection = current_projection(&view_data);
        let rows = body_rows(&projection);
        // Two status groups over three records.
        assert_eq!(rows.len(), 5);
        assert_eq!(selected_body_position(&rows, 0), Some(1));
        assert_eq!(selected_body_position(&rows, 2), Some(4));
    }

    #[test]
    fn scroll_offset_keeps_the_selection_visible() {
        assert_eq!(scroll_offset(Some(3), 10), 0);
        assert_eq!(scroll_offset(Some(9), 10), 0);
        assert_eq!(scroll_offset(Some(10), 10), 1);
        assert_eq!(scroll_offset(Some(25), 10), 16);
        assert_eq!(scroll_offset(None, 10), 0);
        assert_eq!(scroll_offset(Some(5), 0), 0);
    }

    #[test]
    fn toolbar_collapses_when_the_viewport_is_compact() {
        let (state, _runtime, mut view_data) = setup();

        let full = toolbar_text(&state, &view_data);
        assert!(full.contains("[assigned] unassigned closed"));

        view_data.viewport = ViewportClass {
            is_mobile: false,
            is_compact_toolbar: true,
        };
        let compact = toolbar_text(&state, &view_data);
        assert!(compact.contains("[assigned]"));
        assert!(!compact.contains("unassigned"));
    }

    #[test]
    fn status_text_shows_the_search_input_while_typing() {
        let (mut state, _runtime, mut view_data) = setup();

        state.dispatch(AppCommand::EnterSearch);
        view_data.search_input.push_str("nor");
        let status = status_text(&state, &view_data);
        assert!(status.contains("/nor_"));

        state.dispatch(AppCommand::ExitToNav);
        let status = status_text(&state, &view_data);
        assert!(status.starts_with("NAV | nav |"));
    }
}
