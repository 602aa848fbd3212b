//! Editor screen: the add/edit form.
//!
//! Captures all keys while open. Enter submits, Esc cancels back to the
//! library, Ctrl-R clears every field.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

use bookcase_core::{BookForm, BookType, Field, Genre};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::centered;

/// Fields in focus order.
const FIELDS: [Field; 9] = [
    Field::Title,
    Field::Author,
    Field::Isbn,
    Field::PublicationDate,
    Field::Genre,
    Field::Price,
    Field::PurchaseLink,
    Field::BookType,
    Field::Description,
];

const LABEL_WIDTH: usize = 18;

pub struct EditorScreen {
    focused: bool,
    form: BookForm,
    focus: usize,
}

impl EditorScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            form: BookForm::new(),
            focus: 0,
        }
    }

    fn load(&mut self, form: BookForm) {
        self.form = form;
        self.focus = 0;
    }

    fn active_field(&self) -> Field {
        FIELDS.get(self.focus).copied().unwrap_or(Field::Title)
    }

    fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % FIELDS.len();
    }

    fn focus_prev(&mut self) {
        self.focus = (self.focus + FIELDS.len() - 1) % FIELDS.len();
    }

    fn focus_field(&mut self, field: Field) {
        if let Some(idx) = FIELDS.iter().position(|f| *f == field) {
            self.focus = idx;
        }
    }

    fn submit(&mut self) -> Option<Action> {
        match self.form.submit() {
            Ok(submission) => {
                self.focus = 0;
                Some(Action::SubmitBook(submission))
            }
            Err(errors) => {
                if let Some((first, _)) = errors.iter().next() {
                    self.focus_field(first);
                }
                None
            }
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn display_value(&self, field: Field) -> String {
        let raw = self.form.value(field);
        match field {
            Field::Genre => raw
                .parse::<Genre>()
                .map_or_else(|_| raw.to_owned(), |g| g.label().to_owned()),
            Field::BookType => raw
                .parse::<BookType>()
                .map_or_else(|_| raw.to_owned(), |t| t.label().to_owned()),
            _ => raw.to_owned(),
        }
    }

    fn field_lines(&self, field: Field, active: bool) -> [Line<'static>; 2] {
        let required = field.is_text() && field != Field::Description;
        let label = if required {
            format!("{} *", field.label())
        } else {
            field.label().to_owned()
        };
        let label_style = if active {
            Style::default().fg(theme::NEON_CYAN).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme::DIM_WHITE)
        };
        let value_style = if active {
            Style::default().fg(theme::NEON_CYAN)
        } else {
            Style::default().fg(theme::DIM_WHITE)
        };

        let mut spans = vec![
            Span::styled(if active { " ▸ " } else { "   " }, theme::border_focused()),
            Span::styled(format!("{label:<LABEL_WIDTH$}"), label_style),
        ];

        let value = self.display_value(field);
        if field.is_text() {
            if value.is_empty() && !active && field == Field::PublicationDate {
                spans.push(Span::styled("YYYY-MM-DD", theme::key_hint()));
            } else {
                spans.push(Span::styled(value, value_style));
            }
            if active {
                spans.push(Span::styled("█", value_style));
            }
        } else {
            let arrow = if active {
                theme::border_focused()
            } else {
                theme::border_default()
            };
            spans.push(Span::styled("◂ ", arrow));
            spans.push(Span::styled(value, value_style));
            spans.push(Span::styled(" ▸", arrow));
        }

        let error = match self.form.error(field) {
            Some(message) => Line::from(Span::styled(
                format!("{:indent$}{message}", "", indent = LABEL_WIDTH + 3),
                theme::field_error(),
            )),
            None => Line::from(""),
        };

        [Line::from(spans), error]
    }
}

impl Default for EditorScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for EditorScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let field = self.active_field();

        let action = match key.code {
            KeyCode::Esc => {
                self.form.cancel();
                self.focus = 0;
                Some(Action::CancelEdit)
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Tab | KeyCode::Down => {
                self.focus_next();
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_prev();
                None
            }
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.form.clear();
                self.focus = 0;
                None
            }
            KeyCode::Left if !field.is_text() => {
                self.form.cycle(field, false);
                None
            }
            KeyCode::Right | KeyCode::Char(' ') if !field.is_text() => {
                self.form.cycle(field, true);
                None
            }
            KeyCode::Backspace => {
                self.form.pop_char(field);
                None
            }
            KeyCode::Char(c) if field.is_text() && !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.form.push_char(field, c);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::NewBook => self.load(BookForm::new()),
            Action::EditBook(book) => self.load(BookForm::edit(book)),
            Action::SubmitRejected(submission) => self.load(BookForm::reopen(submission)),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let height = u16::try_from(FIELDS.len() * 2 + 6).unwrap_or(u16::MAX);
        let panel = centered(area, 76, height);

        frame.render_widget(Clear, panel);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            panel,
        );

        let block = Block::default()
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(self.form.title_text(), theme::title_style()),
                Span::raw(" "),
            ]))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let inner = block.inner(panel);
        frame.render_widget(block, panel);

        let mut lines = vec![Line::from("")];
        for (idx, field) in FIELDS.iter().enumerate() {
            lines.extend(self.field_lines(*field, idx == self.focus));
        }

        let layout = Layout::vertical([
            Constraint::Min(1),    // fields
            Constraint::Length(1), // submit
            Constraint::Length(1), // hints
        ])
        .split(inner);

        frame.render_widget(Paragraph::new(lines), layout[0]);

        let submit = Span::styled(
            format!("[ {} ]", self.form.submit_label()),
            Style::default()
                .fg(theme::SUCCESS_GREEN)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_widget(
            Paragraph::new(submit).alignment(Alignment::Center),
            layout[1],
        );

        let hints = Line::from(vec![
            Span::styled(" Tab ", theme::key_hint_key()),
            Span::styled("next  ", theme::key_hint()),
            Span::styled("←/→ ", theme::key_hint_key()),
            Span::styled("choose  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("save  ", theme::key_hint()),
            Span::styled("Ctrl-R ", theme::key_hint_key()),
            Span::styled("clear  ", theme::key_hint()),
            Span::styled("Esc ", theme::key_hint_key()),
            Span::styled("cancel", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[2]);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "editor"
    }
}
