use crate::diagram::{Hitbox, Viewport, hit_test, hitboxes, node_label};
use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use holomap_client::{CatalogService, FetchError, PersonSummary, SwapiClient};
use holomap_core::{
    BuildError, BuildTicket, Explorer, Graph, GraphState, NodeKind, PageRequest, Tooltip,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap,
        canvas::{Canvas, Line as CanvasLine},
    },
};
use std::io;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::debug;

/// Results delivered from background fetches to the UI loop
#[derive(Debug)]
pub enum ExplorerMessage {
    PageLoaded {
        request: PageRequest,
        outcome: Result<Vec<PersonSummary>, FetchError>,
    },
    GraphBuilt {
        ticket: BuildTicket,
        result: Result<Graph, BuildError>,
    },
    Log {
        level: LogLevel,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// UI state around an [`Explorer`]
pub struct ExplorerApp {
    explorer: Explorer<SwapiClient>,
    list_state: ListState,
    logs: Vec<(LogLevel, String)>,
    focus: Option<usize>,
    hitboxes: Vec<Hitbox>,
    should_quit: bool,
    tx: mpsc::UnboundedSender<ExplorerMessage>,
    rx: mpsc::UnboundedReceiver<ExplorerMessage>,
    runtime: Handle,
}

impl ExplorerApp {
    pub fn new(service: Arc<SwapiClient>, page_size: usize, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            explorer: Explorer::new(service, page_size),
            list_state: ListState::default(),
            logs: Vec::new(),
            focus: None,
            hitboxes: Vec::new(),
            should_quit: false,
            tx,
            rx,
            runtime,
        }
    }

    fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.logs.push((level, message.into()));
        // Keep only last 500 log entries
        if self.logs.len() > 500 {
            self.logs.drain(0..self.logs.len() - 500);
        }
    }

    /// Start fetching the next catalog page unless one is in flight
    fn request_page(&mut self) {
        let Some(request) = self.explorer.browser_mut().begin_load() else {
            return;
        };

        debug!("Requesting catalog page {}", request.page);
        self.log(LogLevel::Info, format!("Loading page {}...", request.page));
        let service = self.explorer.builder().service().clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let outcome = service.list_people(request.page, request.page_size).await;
            if let Ok(rows) = &outcome {
                let _ = tx.send(ExplorerMessage::Log {
                    level: LogLevel::Info,
                    message: format!("Fetched page {} ({} rows)", request.page, rows.len()),
                });
            }
            let _ = tx.send(ExplorerMessage::PageLoaded { request, outcome });
        });
    }

    fn select(&mut self, id: Option<u32>) {
        self.focus = None;
        let Some(ticket) = self.explorer.begin_selection(id) else {
            self.log(LogLevel::Info, "Selection cleared");
            return;
        };

        debug!("Building graph for person {}", ticket.root_id());
        let builder = self.explorer.builder().clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = builder.build_graph(ticket.root_id()).await;
            let _ = tx.send(ExplorerMessage::GraphBuilt { ticket, result });
        });
    }

    fn select_highlighted(&mut self) {
        let id = self
            .list_state
            .selected()
            .and_then(|row| self.explorer.browser().state().entries().get(row))
            .map(|entry| entry.id);
        if id.is_some() {
            self.select(id);
        }
    }

    /// Apply everything the background tasks have sent so far
    fn process_messages(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                ExplorerMessage::PageLoaded { request, outcome } => {
                    let failure = outcome.as_ref().err().map(|e| e.to_string());
                    let added = self.explorer.browser_mut().complete_load(request, outcome);
                    if let Some(error) = failure {
                        self.log(LogLevel::Warn, format!("Page {} failed: {}", request.page, error));
                    } else if added > 0 {
                        self.log(
                            LogLevel::Info,
                            format!("Page {}: {} new entries", request.page, added),
                        );
                    }
                    if self.list_state.selected().is_none()
                        && !self.explorer.browser().state().entries().is_empty()
                    {
                        self.list_state.select(Some(0));
                    }
                }
                ExplorerMessage::GraphBuilt { ticket, result } => {
                    let outcome = match &result {
                        Ok(graph) => (
                            LogLevel::Info,
                            format!(
                                "Graph for {} ready: {} nodes, {} edges",
                                graph.root().label(),
                                graph.nodes().len(),
                                graph.edges().len()
                            ),
                        ),
                        Err(e) => (LogLevel::Error, e.to_string()),
                    };
                    if self.explorer.finish_build(ticket, result) {
                        self.focus = None;
                        self.log(outcome.0, outcome.1);
                    }
                }
                ExplorerMessage::Log { level, message } => self.log(level, message),
            }
        }
    }

    fn related_node_ids(&self) -> Vec<String> {
        self.explorer
            .graph()
            .map(|graph| {
                graph
                    .nodes()
                    .iter()
                    .filter(|n| n.kind != NodeKind::Root)
                    .map(|n| n.id.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Move keyboard focus across related nodes and inspect the focused one
    fn cycle_focus(&mut self, forward: bool) {
        let ids = self.related_node_ids();
        if ids.is_empty() {
            return;
        }

        let next = match (self.focus, forward) {
            (None, true) => 0,
            (None, false) => ids.len() - 1,
            (Some(i), true) => (i + 1) % ids.len(),
            (Some(i), false) => (i + ids.len() - 1) % ids.len(),
        };
        self.focus = Some(next);

        let anchor = self
            .hitboxes
            .iter()
            .find(|h| h.node_id == ids[next])
            .map(|h| (h.area.x, h.area.y))
            .unwrap_or((0, 0));
        self.explorer.hover(&ids[next], anchor.0, anchor.1);
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Moved {
            return;
        }
        match hit_test(&self.hitboxes, mouse.column, mouse.row).map(str::to_string) {
            Some(node_id) => {
                if self.explorer.hover(&node_id, mouse.column, mouse.row).is_none() {
                    self.explorer.clear_hover();
                }
            }
            None if self.focus.is_none() => self.explorer.clear_hover(),
            None => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let entries = self.explorer.browser().state().entries().len();
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc => {
                if self.explorer.session().tooltip().is_some() {
                    self.focus = None;
                    self.explorer.clear_hover();
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Up => {
                let row = self.list_state.selected().unwrap_or(0);
                self.list_state.select(Some(row.saturating_sub(1)));
            }
            KeyCode::Down => {
                if entries == 0 {
                    return;
                }
                let row = self.list_state.selected().map(|r| r + 1).unwrap_or(0);
                if row >= entries {
                    // Scrolling past the end loads more
                    self.request_page();
                } else {
                    self.list_state.select(Some(row));
                }
            }
            KeyCode::Char('n') => self.request_page(),
            KeyCode::Enter => self.select_highlighted(),
            KeyCode::Backspace | KeyCode::Char('x') => self.select(None),
            KeyCode::Tab => self.cycle_focus(true),
            KeyCode::BackTab => self.cycle_focus(false),
            _ => {}
        }
    }

    fn render(&mut self, f: &mut Frame) {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(10),   // Main area
                Constraint::Length(6), // Logs
                Constraint::Length(1), // Hints bar
            ])
            .split(f.area());

        let main = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
            .split(vertical[0]);

        self.render_catalog(f, main[0]);
        self.render_graph(f, main[1]);
        self.render_logs(f, vertical[1]);
        self.render_hints(f, vertical[2]);
        self.render_tooltip(f);
    }

    fn render_catalog(&mut self, f: &mut Frame, area: Rect) {
        let state = self.explorer.browser().state();
        let title = format!(" People ({}) ", state.entries().len());

        let selected = state.selected();
        let mut items: Vec<ListItem> = state
            .entries()
            .iter()
            .map(|entry| {
                let style = if Some(entry.id) == selected {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                ListItem::new(Line::from(Span::styled(entry.name.clone(), style)))
            })
            .collect();

        let footer = if state.is_loading() {
            Some("Loading more...")
        } else if state.is_exhausted() {
            Some("No more entries")
        } else {
            None
        };
        if let Some(footer) = footer {
            items.push(ListItem::new(Span::styled(
                footer,
                Style::default().fg(Color::DarkGray),
            )));
        }

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("▶ ");

        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_graph(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Relationships ")
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let graph = match self.explorer.session().state() {
            GraphState::Ready(graph) => graph.clone(),
            other => {
                self.hitboxes.clear();
                let message = match other {
                    GraphState::Idle => "Select a person and press Enter".to_string(),
                    GraphState::Loading { root_id } => format!("Loading person {}...", root_id),
                    GraphState::Failed { message, .. } => format!("✗ {}", message),
                    GraphState::Ready(_) => String::new(),
                };
                let paragraph = Paragraph::new(message)
                    .style(Style::default().fg(Color::DarkGray))
                    .wrap(Wrap { trim: true });
                f.render_widget(paragraph, inner);
                return;
            }
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(5)])
            .split(inner);

        let root = graph.root();
        let card = root
            .entity
            .fields()
            .into_iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join("  ");
        let header = Paragraph::new(vec![
            Line::from(Span::styled(
                root.label().to_string(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(card, Style::default().fg(Color::Gray))),
        ])
        .wrap(Wrap { trim: true });
        f.render_widget(header, chunks[0]);

        let viewport = Viewport::for_graph(&graph);
        self.hitboxes = hitboxes(&graph, &viewport, chunks[1]);
        let hovered = self.explorer.session().tooltip().map(|t| t.node_id.clone());

        let canvas = Canvas::default()
            .x_bounds(viewport.x_bounds)
            .y_bounds(viewport.y_bounds)
            .paint(|ctx| {
                for edge in graph.edges() {
                    if let (Some(source), Some(target)) =
                        (graph.node(&edge.source), graph.node(&edge.target))
                    {
                        let (x1, y1) = viewport.canvas_point(source.position);
                        let (x2, y2) = viewport.canvas_point(target.position);
                        ctx.draw(&CanvasLine {
                            x1,
                            y1,
                            x2,
                            y2,
                            color: Color::DarkGray,
                        });
                    }
                }
                ctx.layer();
                for node in graph.nodes() {
                    let (x, y) = viewport.canvas_point(node.position);
                    let mut style = Style::default().fg(kind_color(node.kind));
                    if hovered.as_deref() == Some(node.id.as_str()) {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    ctx.print(x, y, Span::styled(node_label(&graph, &node.id), style));
                }
            });
        f.render_widget(canvas, chunks[1]);
    }

    fn render_tooltip(&self, f: &mut Frame) {
        let Some(tooltip) = self.explorer.session().tooltip() else {
            return;
        };

        let lines = tooltip_lines(tooltip);
        let width = lines
            .iter()
            .map(|l| l.width() as u16)
            .max()
            .unwrap_or(0)
            .saturating_add(2)
            .min(TOOLTIP_MAX_WIDTH)
            .min(f.area().width);
        // Long values such as the opening crawl wrap inside the popup
        let inner = width.saturating_sub(2).max(1);
        let rows: u16 = lines
            .iter()
            .map(|l| (l.width() as u16).max(1).div_ceil(inner))
            .sum();
        let height = rows.saturating_add(2).min(f.area().height);

        // Keep the popup on screen, just below and right of the pointer
        let x = tooltip
            .x
            .saturating_add(2)
            .min(f.area().width.saturating_sub(width));
        let y = tooltip
            .y
            .saturating_add(1)
            .min(f.area().height.saturating_sub(height));
        let area = Rect { x, y, width, height };

        let popup = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", tooltip.kind))
                .border_style(Style::default().fg(Color::Yellow)),
        );
        f.render_widget(Clear, area);
        f.render_widget(popup, area);
    }

    fn render_logs(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Log ")
            .border_style(Style::default().fg(Color::Blue));
        let height = block.inner(area).height as usize;

        let items: Vec<ListItem> = self
            .logs
            .iter()
            .skip(self.logs.len().saturating_sub(height))
            .map(|(level, message)| {
                let (prefix, color) = match level {
                    LogLevel::Info => ("[INFO]", Color::Cyan),
                    LogLevel::Warn => ("[WARN]", Color::Yellow),
                    LogLevel::Error => ("[ERROR]", Color::Red),
                };
                ListItem::new(Line::from(vec![
                    Span::styled(prefix, Style::default().fg(color).add_modifier(Modifier::BOLD)),
                    Span::raw(" "),
                    Span::raw(message.clone()),
                ]))
            })
            .collect();

        f.render_widget(List::new(items).block(block), area);
    }

    fn render_hints(&self, f: &mut Frame, area: Rect) {
        let key = Style::default().fg(Color::Black).bg(Color::Gray);
        let hints = Line::from(vec![
            Span::styled(" ↑↓ ", key),
            Span::raw(" Browse  "),
            Span::styled(" Enter ", key),
            Span::raw(" Graph  "),
            Span::styled(" n ", key),
            Span::raw(" More  "),
            Span::styled(" Tab ", key),
            Span::raw(" Inspect  "),
            Span::styled(" x ", key),
            Span::raw(" Clear  "),
            Span::styled(" q ", key),
            Span::raw(" Quit"),
        ]);

        let paragraph = Paragraph::new(hints).style(Style::default().bg(Color::Black).fg(Color::Gray));
        f.render_widget(paragraph, area);
    }
}

const TOOLTIP_MAX_WIDTH: u16 = 60;

fn kind_color(kind: NodeKind) -> Color {
    match kind {
        NodeKind::Root => Color::Yellow,
        NodeKind::Film => Color::Cyan,
        NodeKind::Starship => Color::Magenta,
        NodeKind::Vehicle => Color::Green,
    }
}

fn tooltip_lines(tooltip: &Tooltip) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        tooltip.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    for (name, value) in &tooltip.fields {
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", name), Style::default().fg(Color::Gray)),
            Span::raw(value.clone()),
        ]));
    }
    lines
}

/// Run the explorer (blocking, run it off the async worker threads)
pub fn run_explorer(service: Arc<SwapiClient>, page_size: usize, runtime: Handle) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = ExplorerApp::new(service, page_size, runtime);
    app.request_page();

    let result = run_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut ExplorerApp,
) -> Result<()> {
    loop {
        app.process_messages();
        terminal.draw(|f| app.render(f))?;

        if app.should_quit {
            break;
        }

        // Poll for input (non-blocking with timeout)
        if event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
    }

    Ok(())
}
