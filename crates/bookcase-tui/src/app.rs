//! Application core: event loop, screen switching, store writes and the
//! overlays (search bar, help, confirm dialog, toasts).
//!
//! The `App` is the only owner of the [`BookStore`]. Screens never touch
//! it; they emit actions and receive fresh snapshots via
//! [`Action::BooksUpdated`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use bookcase_core::{Book, BookId, BookStore, KeyValueStore, Submission};

use crate::action::{Action, ConfirmAction, Notification, NotificationLevel};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::centered;

const DELETED_MESSAGE: &str = "Book deleted successfully!";
const TOAST_TTL: Duration = Duration::from_secs(3);

pub struct App<S: KeyValueStore> {
    store: BookStore<S>,
    active_screen: ScreenId,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    help_visible: bool,
    search_active: bool,
    search_query: String,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Blocks all other input while set.
    pending_confirm: Option<ConfirmAction>,
    notification: Option<(Notification, Instant)>,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(store: BookStore<S>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        Self {
            store,
            active_screen: ScreenId::Library,
            screens: create_screens().into_iter().collect(),
            running: true,
            help_visible: false,
            search_active: false,
            search_query: String::new(),
            action_tx,
            action_rx,
            pending_confirm: None,
            notification: None,
        }
    }

    /// Focus the library and hand every screen the initial book list.
    fn init_screens(&mut self) -> Result<()> {
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        self.action_tx.send(Action::BooksUpdated(self.snapshot()))?;
        Ok(())
    }

    fn snapshot(&self) -> Arc<Vec<Book>> {
        Arc::new(self.store.list())
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::start()?;
        self.init_screens()?;

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!(books = self.store.len(), "TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize | Event::Render => self.action_tx.send(Action::Render)?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        drop(tui);
        info!("TUI event loop ended");
        Ok(())
    }

    // ── Input ────────────────────────────────────────────────────────

    /// Global keys first, then the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        // The form captures everything else, including q and /
        if self.active_screen == ScreenId::Editor {
            return match self.screens.get_mut(&ScreenId::Editor) {
                Some(screen) => screen.handle_key_event(key),
                None => Ok(None),
            };
        }

        if self.pending_confirm.is_some() {
            return Ok(match key.code {
                KeyCode::Char('y' | 'Y') => Some(Action::ConfirmYes),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::ConfirmNo),
                _ => None,
            });
        }

        if self.search_active {
            return Ok(match key.code {
                KeyCode::Esc => Some(Action::CloseSearch),
                KeyCode::Enter => Some(Action::SearchSubmit),
                KeyCode::Backspace => {
                    self.search_query.pop();
                    Some(Action::SearchInput(self.search_query.clone()))
                }
                KeyCode::Char(c) => {
                    self.search_query.push(c);
                    Some(Action::SearchInput(self.search_query.clone()))
                }
                _ => None,
            });
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
            (KeyModifiers::NONE, KeyCode::Char('/')) => return Ok(Some(Action::OpenSearch)),
            _ => {}
        }

        match self.screens.get_mut(&self.active_screen) {
            Some(screen) => screen.handle_key_event(key),
            None => Ok(None),
        }
    }

    // ── Actions ──────────────────────────────────────────────────────

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::Render => {}

            Action::Tick => {
                if let Some((_, shown)) = &self.notification {
                    if shown.elapsed() > TOAST_TTL {
                        self.notification = None;
                    }
                }
            }

            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
            }

            // ── Search ────────────────────────────────────────────
            Action::OpenSearch => {
                self.search_active = true;
            }

            Action::SearchSubmit => {
                self.search_active = false;
            }

            Action::CloseSearch | Action::ClearFilters => {
                if matches!(action, Action::CloseSearch) {
                    self.search_active = false;
                }
                self.search_query.clear();
                self.forward_to(ScreenId::Library, action)?;
            }

            // ── Catalog ───────────────────────────────────────────
            Action::BooksUpdated(_) => {
                let ids: Vec<ScreenId> = self.screens.keys().copied().collect();
                for id in ids {
                    self.forward_to(id, action)?;
                }
            }

            Action::NewBook | Action::EditBook(_) => {
                self.forward_to(ScreenId::Editor, action)?;
                self.switch_screen(ScreenId::Editor);
            }

            Action::CancelEdit => self.switch_screen(ScreenId::Library),

            Action::SubmitBook(submission) => {
                if self.apply_submission(submission)? {
                    self.switch_screen(ScreenId::Library);
                } else {
                    self.forward_to(
                        ScreenId::Editor,
                        &Action::SubmitRejected(submission.clone()),
                    )?;
                }
            }

            Action::RequestDelete(id) => match self.store.get(id) {
                Some(book) => {
                    self.action_tx
                        .send(Action::ShowConfirm(ConfirmAction::DeleteBook {
                            id: id.clone(),
                            title: book.title.clone(),
                        }))?;
                }
                None => {
                    self.action_tx
                        .send(Action::Notify(Notification::error(format!("Book not found: {id}"))))?;
                }
            },

            // ── Dialogs ───────────────────────────────────────────
            Action::ShowConfirm(confirm) => {
                self.pending_confirm = Some(confirm.clone());
            }

            Action::ConfirmYes => {
                if let Some(ConfirmAction::DeleteBook { id, .. }) = self.pending_confirm.take() {
                    self.delete_book(&id)?;
                }
            }

            Action::ConfirmNo => {
                self.pending_confirm = None;
            }

            Action::Notify(n) => {
                self.notification = Some((n.clone(), Instant::now()));
            }

            other => {
                self.forward_to(self.active_screen, other)?;
            }
        }

        Ok(())
    }

    fn forward_to(&mut self, id: ScreenId, action: &Action) -> Result<()> {
        if let Some(screen) = self.screens.get_mut(&id) {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    fn switch_screen(&mut self, target: ScreenId) {
        if target == self.active_screen {
            return;
        }
        debug!(from = %self.active_screen, to = %target, "switching screen");
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(false);
        }
        self.active_screen = target;
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
            debug!(screen = screen.id(), focused = screen.focused(), "screen focused");
        }
    }

    // ── Store writes ─────────────────────────────────────────────────

    /// Write a submission to the store. Returns whether it was saved.
    fn apply_submission(&mut self, submission: &Submission) -> Result<bool> {
        match submission.clone().apply(&mut self.store) {
            Ok(book) => {
                info!(id = %book.id, title = %book.title, "book saved");
                self.action_tx
                    .send(Action::Notify(Notification::success(submission.message())))?;
                self.action_tx.send(Action::BooksUpdated(self.snapshot()))?;
                Ok(true)
            }
            Err(err) => {
                warn!(error = %err, "failed to save book");
                self.action_tx
                    .send(Action::Notify(Notification::error(err.to_string())))?;
                Ok(false)
            }
        }
    }

    fn delete_book(&mut self, id: &BookId) -> Result<()> {
        let notification = match self.store.delete(id) {
            Ok(true) => {
                info!(%id, "book deleted");
                self.action_tx.send(Action::BooksUpdated(self.snapshot()))?;
                Notification::success(DELETED_MESSAGE)
            }
            Ok(false) => Notification::error(format!("Book not found: {id}")),
            Err(err) => {
                warn!(error = %err, %id, "failed to delete book");
                Notification::error(err.to_string())
            }
        };
        self.action_tx.send(Action::Notify(notification))?;
        Ok(())
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::vertical([
            Constraint::Min(1),    // screen content
            Constraint::Length(1), // status bar
        ])
        .split(area);

        // The editor floats over the library
        if let Some(library) = self.screens.get(&ScreenId::Library) {
            library.render(frame, layout[0]);
        }
        if self.active_screen == ScreenId::Editor {
            if let Some(editor) = self.screens.get(&ScreenId::Editor) {
                editor.render(frame, layout[0]);
            }
        }

        self.render_status_bar(frame, layout[1]);

        if let Some((ref notif, _)) = self.notification {
            Self::render_notification(frame, area, notif);
        }

        if let Some(ref confirm) = self.pending_confirm {
            Self::render_confirm_dialog(frame, area, confirm);
        }

        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        if self.search_active {
            let line = Line::from(vec![
                Span::styled(" / ", Style::default().fg(theme::ELECTRIC_PURPLE)),
                Span::styled(&self.search_query, Style::default().fg(theme::NEON_CYAN)),
                Span::styled("█", Style::default().fg(theme::NEON_CYAN)),
                Span::styled("  Esc clear  Enter keep", theme::key_hint()),
            ]);
            frame.render_widget(Paragraph::new(line), area);
            return;
        }

        let line = Line::from(vec![
            Span::styled(
                format!(" ● {} ", self.active_screen.label()),
                Style::default().fg(theme::SUCCESS_GREEN),
            ),
            Span::styled(
                format!("│ {} books in {}", self.store.len(), self.store.key()),
                theme::key_hint(),
            ),
            Span::styled("  │ ? help  / search  q quit", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let help_area = centered(area, 56, 24);
        frame.render_widget(Clear, help_area);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            help_area,
        );

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let section = |title: &'static str| {
            Line::from(Span::styled(
                format!("  {title}"),
                Style::default().fg(theme::NEON_CYAN),
            ))
        };
        let entry = |keys: &'static str, what: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {keys:<12}"), theme::key_hint_key()),
                Span::styled(what, theme::key_hint()),
            ])
        };

        let help_text = vec![
            Line::from(""),
            section("Library"),
            entry("j/k ↑/↓", "Move up/down"),
            entry("g/G", "Top / bottom"),
            entry("Enter", "Book details"),
            entry("n", "New book"),
            entry("e", "Edit book"),
            entry("d", "Delete book"),
            entry("Tab", "Cycle genre filter"),
            entry("1-7", "Sort by column (↕ ↑ ↓)"),
            entry("c", "Clear filters"),
            entry("/", "Search title, author, ISBN"),
            Line::from(""),
            section("Editor"),
            entry("Tab/S-Tab", "Next / previous field"),
            entry("←/→", "Change genre or type"),
            entry("Enter", "Save"),
            entry("Ctrl-R", "Clear form"),
            entry("Esc", "Cancel"),
            Line::from(""),
            entry("q", "Quit"),
            Line::from(Span::styled(
                "                    Esc or ? to close",
                theme::key_hint(),
            )),
        ];

        frame.render_widget(Paragraph::new(help_text), inner);
    }

    fn render_confirm_dialog(frame: &mut Frame, area: Rect, confirm: &ConfirmAction) {
        let dialog_area = centered(area, 50, 5);
        frame.render_widget(Clear, dialog_area);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            dialog_area,
        );

        let block = Block::default()
            .title(" Confirm ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::ELECTRIC_YELLOW));

        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let text = vec![
            Line::from(Span::styled(
                format!("  {confirm}"),
                Style::default().fg(theme::DIM_WHITE),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("  y ", theme::key_hint_key()),
                Span::styled("confirm    ", theme::key_hint()),
                Span::styled("n ", theme::key_hint_key()),
                Span::styled("cancel", theme::key_hint()),
            ]),
        ];
        frame.render_widget(Paragraph::new(text), inner);
    }

    /// Toast in the bottom-right corner, above the status bar.
    fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification) {
        let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
        let width = msg_len.saturating_add(6).clamp(20, 60).min(area.width);
        let height = 3u16.min(area.height);

        let x = area.width.saturating_sub(width + 1);
        let y = area.height.saturating_sub(height + 1);
        let toast_area = Rect::new(area.x + x, area.y + y, width, height);

        let (border_color, icon) = match notif.level {
            NotificationLevel::Success => (theme::SUCCESS_GREEN, "✓"),
            NotificationLevel::Error => (theme::ERROR_RED, "✗"),
        };

        frame.render_widget(Clear, toast_area);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            toast_area,
        );

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color));

        let inner = block.inner(toast_area);
        frame.render_widget(block, toast_area);

        let line = Line::from(vec![
            Span::styled(format!(" {icon} "), Style::default().fg(border_color)),
            Span::styled(notif.message.as_str(), Style::default().fg(theme::DIM_WHITE)),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }
}
