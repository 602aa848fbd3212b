//! Library screen: the book table with search, genre tabs, column sorting
//! and a read-only details modal.
//!
//! The screen owns the [`ViewState`] and re-derives the visible rows
//! whenever the books or the view change.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap,
};
use strum::IntoEnumIterator;

use bookcase_core::{Book, GenreFilter, SortDirection, SortField, ViewState, derive};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::{centered, sub_tabs};

pub const EMPTY_MESSAGE: &str = "No books found matching your search criteria";

const PAGE: usize = 10;

pub struct LibraryScreen {
    focused: bool,
    books: Arc<Vec<Book>>,
    view: ViewState,
    table_state: TableState,
    derived: Vec<Book>,
}

impl LibraryScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            books: Arc::new(Vec::new()),
            view: ViewState::new(),
            table_state: TableState::default(),
            derived: Vec::new(),
        }
    }

    fn recompute(&mut self) {
        self.derived = derive(self.books.iter(), &self.view)
            .into_iter()
            .cloned()
            .collect();

        let len = self.derived.len();
        match self.table_state.selected() {
            _ if len == 0 => self.table_state.select(None),
            None => self.table_state.select(Some(0)),
            Some(i) if i >= len => self.table_state.select(Some(len - 1)),
            Some(_) => {}
        }

        // A deleted book takes its details modal with it.
        if self.view.selected.is_some() && self.details().is_none() {
            self.view.close_details();
        }
    }

    fn selected_index(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    fn select(&mut self, idx: usize) {
        let len = self.derived.len();
        if len == 0 {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(idx.min(len - 1)));
        }
    }

    fn move_down(&mut self, by: usize) {
        self.select(self.selected_index().saturating_add(by));
    }

    fn move_up(&mut self, by: usize) {
        self.select(self.selected_index().saturating_sub(by));
    }

    fn highlighted(&self) -> Option<&Book> {
        self.table_state.selected().and_then(|i| self.derived.get(i))
    }

    fn details(&self) -> Option<&Book> {
        self.view.selected_book(self.books.iter())
    }

    fn edit_action(book: Option<&Book>) -> Option<Action> {
        book.map(|b| Action::EditBook(b.clone()))
    }

    fn delete_action(book: Option<&Book>) -> Option<Action> {
        book.map(|b| Action::RequestDelete(b.id.clone()))
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn summary_line(&self) -> Line<'_> {
        let mut spans = vec![
            Span::styled(
                format!(" Total Books: {}", self.books.len()),
                Style::default().fg(theme::NEON_CYAN),
            ),
            Span::styled("  ·  ", theme::key_hint()),
            Span::styled(
                format!("Showing {} books", self.derived.len()),
                Style::default().fg(theme::DIM_WHITE),
            ),
        ];
        if !self.view.search_term.is_empty() {
            spans.push(Span::styled("  ·  ", theme::key_hint()));
            spans.push(Span::styled(
                format!("search \"{}\"", self.view.search_term),
                Style::default().fg(theme::ELECTRIC_YELLOW),
            ));
        }
        if self.view.sort_direction != SortDirection::None {
            spans.push(Span::styled("  ·  ", theme::key_hint()));
            spans.push(Span::styled(
                format!(
                    "sorted by {} {}",
                    self.view.sort_field.label(),
                    self.view.sort_direction.indicator()
                ),
                Style::default().fg(theme::DIM_WHITE),
            ));
        }
        Line::from(spans)
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        if self.derived.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(EMPTY_MESSAGE, theme::key_hint()))
                    .alignment(Alignment::Center),
                Rect::new(area.x, area.y + area.height / 2, area.width, area.height.min(1)),
            );
            return;
        }

        let header = Row::new(SortField::iter().map(|field| {
            let sorted = self.view.sort_field == field
                && self.view.sort_direction != SortDirection::None;
            let style = if sorted {
                theme::table_header_sorted()
            } else {
                theme::table_header()
            };
            Cell::from(format!("{} {}", field.label(), self.view.sort_indicator(field)))
                .style(style)
        }));

        let rows = self.derived.iter().map(|book| {
            Row::new(vec![
                Cell::from(book.title.clone()),
                Cell::from(book.author.clone()),
                Cell::from(book.isbn.clone()),
                Cell::from(book.genre.label()),
                Cell::from(book.book_type.label()),
                Cell::from(book.price_display()).style(Style::default().fg(theme::CORAL)),
                Cell::from(book.publication_date.to_string()),
            ])
            .style(theme::table_row())
        });

        let widths = [
            Constraint::Fill(3),
            Constraint::Fill(2),
            Constraint::Length(15),
            Constraint::Length(13),
            Constraint::Length(14),
            Constraint::Length(10),
            Constraint::Length(13),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected())
            .highlight_symbol("▸ ");

        let mut state = self.table_state.clone();
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_details(frame: &mut Frame, area: Rect, book: &Book) {
        let panel = centered(area, 70, 17);

        frame.render_widget(Clear, panel);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            panel,
        );

        let block = Block::default()
            .title(" Book Details ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(panel);
        frame.render_widget(block, panel);

        let row = |label: &'static str, value: String| {
            Line::from(vec![
                Span::styled(format!("  {label:<18}"), Style::default().fg(theme::NEON_CYAN)),
                Span::styled(value, Style::default().fg(theme::DIM_WHITE)),
            ])
        };

        let mut lines = vec![
            Line::from(Span::styled(
                format!("  {}", book.title),
                Style::default()
                    .fg(theme::ELECTRIC_PURPLE)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            row("Author", book.author.clone()),
            row("ISBN", book.isbn.clone()),
            row("Publication Date", book.publication_date.to_string()),
            row("Genre", book.genre.label().to_owned()),
            row("Book Type", book.book_type.label().to_owned()),
            row("Price", book.price_display()),
            row("Purchase Link", book.purchase_link.clone()),
            Line::from(""),
        ];
        match book.description.as_deref().filter(|d| !d.trim().is_empty()) {
            Some(text) => lines.push(Line::from(Span::styled(
                format!("  {text}"),
                Style::default().fg(theme::DIM_WHITE),
            ))),
            None => lines.push(Line::from(Span::styled(
                "  No description",
                theme::key_hint(),
            ))),
        }

        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);
        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: false }),
            layout[0],
        );
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("  e ", theme::key_hint_key()),
                Span::styled("edit  ", theme::key_hint()),
                Span::styled("d ", theme::key_hint_key()),
                Span::styled("delete  ", theme::key_hint()),
                Span::styled("Esc ", theme::key_hint_key()),
                Span::styled("close", theme::key_hint()),
            ])),
            layout[1],
        );
    }
}

impl Default for LibraryScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for LibraryScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.view.selected.is_some() {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Enter => {
                    self.view.close_details();
                    None
                }
                KeyCode::Char('e') => Self::edit_action(self.details()),
                KeyCode::Char('d') => Self::delete_action(self.details()),
                _ => None,
            });
        }

        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_down(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_up(1);
                None
            }
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.move_down(PAGE);
                None
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.move_up(PAGE);
                None
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.select(0);
                None
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.select(self.derived.len().saturating_sub(1));
                None
            }
            KeyCode::Enter => {
                if let Some(id) = self.highlighted().map(|b| b.id.clone()) {
                    self.view.select(id);
                }
                None
            }
            KeyCode::Char('e') => Self::edit_action(self.highlighted()),
            KeyCode::Char('d') => Self::delete_action(self.highlighted()),
            KeyCode::Char('n') => Some(Action::NewBook),
            KeyCode::Tab => Some(Action::FilterGenre(self.view.genre_filter.next())),
            KeyCode::Char('c') => Some(Action::ClearFilters),
            KeyCode::Char(c @ '1'..='9') => {
                let position = c.to_digit(10).and_then(|d| usize::try_from(d).ok());
                if let Some(field) = position.and_then(SortField::from_position) {
                    self.view.toggle_sort(field);
                    self.recompute();
                }
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::BooksUpdated(books) => {
                self.books = Arc::clone(books);
                self.recompute();
            }
            Action::SearchInput(term) => {
                self.view.set_search_term(term.as_str());
                self.select(0);
                self.recompute();
            }
            Action::CloseSearch => {
                self.view.set_search_term("");
                self.recompute();
            }
            Action::FilterGenre(filter) => {
                self.view.set_genre_filter(*filter);
                self.select(0);
                self.recompute();
            }
            Action::ClearFilters => {
                self.view.clear_filters();
                self.recompute();
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Bookcase ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Length(1), // totals
            Constraint::Length(1), // genre tabs
            Constraint::Min(1),    // table
            Constraint::Length(1), // hints
        ])
        .split(inner);

        frame.render_widget(Paragraph::new(self.summary_line()), layout[0]);

        let labels: Vec<&str> = GenreFilter::iter().map(GenreFilter::label).collect();
        let mut tabs = vec![Span::raw(" ")];
        tabs.extend(sub_tabs::render_sub_tabs(&labels, self.view.genre_filter.index()).spans);
        frame.render_widget(Paragraph::new(Line::from(tabs)), layout[1]);

        self.render_table(frame, layout[2]);

        let hints = Line::from(vec![
            Span::styled(" n ", theme::key_hint_key()),
            Span::styled("new  ", theme::key_hint()),
            Span::styled("e ", theme::key_hint_key()),
            Span::styled("edit  ", theme::key_hint()),
            Span::styled("d ", theme::key_hint_key()),
            Span::styled("delete  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("details  ", theme::key_hint()),
            Span::styled("Tab ", theme::key_hint_key()),
            Span::styled("genre  ", theme::key_hint()),
            Span::styled("1-7 ", theme::key_hint_key()),
            Span::styled("sort  ", theme::key_hint()),
            Span::styled("c ", theme::key_hint_key()),
            Span::styled("clear", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[3]);

        if let Some(book) = self.details() {
            Self::render_details(frame, area, book);
        }
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "library"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bookcase_core::{BookId, BookType, Genre};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};

    fn book(id: &str, title: &str, author: &str, genre: Genre, price: f64) -> Book {
        Book {
            id: BookId::from(id),
            title: title.into(),
            author: author.into(),
            isbn: format!("978{id}"),
            publication_date: NaiveDate::from_ymd_opt(2001, 2, 3).unwrap(),
            genre,
            price,
            purchase_link: "https://example.com/book".into(),
            book_type: BookType::Ebook,
            description: None,
        }
    }

    fn loaded() -> LibraryScreen {
        let mut screen = LibraryScreen::new();
        let books = vec![
            book("1", "Dune", "Herbert", Genre::Fiction, 9.99),
            book("2", "Cosmos", "Sagan", Genre::NonFiction, 14.5),
            book("3", "Anathem", "Stephenson", Genre::Fiction, 12.0),
        ];
        screen
            .update(&Action::BooksUpdated(Arc::new(books)))
            .unwrap();
        screen
    }

    fn press(screen: &mut LibraryScreen, code: KeyCode) -> Option<Action> {
        screen
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    fn titles(screen: &LibraryScreen) -> Vec<&str> {
        screen.derived.iter().map(|b| b.title.as_str()).collect()
    }

    fn draw(screen: &LibraryScreen) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal
            .draw(|frame| screen.render(frame, frame.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn number_keys_cycle_the_sort_on_a_column() {
        let mut screen = loaded();
        assert_eq!(titles(&screen), ["Dune", "Cosmos", "Anathem"]);

        press(&mut screen, KeyCode::Char('1'));
        assert_eq!(titles(&screen), ["Anathem", "Cosmos", "Dune"]);

        press(&mut screen, KeyCode::Char('1'));
        assert_eq!(titles(&screen), ["Dune", "Cosmos", "Anathem"]);
        assert_eq!(screen.view.sort_direction, SortDirection::Desc);

        press(&mut screen, KeyCode::Char('1'));
        assert_eq!(screen.view.sort_direction, SortDirection::None);

        // price column, fresh field starts ascending
        press(&mut screen, KeyCode::Char('6'));
        assert_eq!(titles(&screen), ["Dune", "Anathem", "Cosmos"]);
    }

    #[test]
    fn tab_requests_the_next_genre_and_update_applies_it() {
        let mut screen = loaded();
        let action = press(&mut screen, KeyCode::Tab).unwrap();
        assert!(matches!(action, Action::FilterGenre(GenreFilter::Fiction)));

        screen.update(&action).unwrap();
        assert_eq!(titles(&screen), ["Dune", "Anathem"]);
    }

    #[test]
    fn search_input_filters_and_close_search_restores() {
        let mut screen = loaded();
        screen
            .update(&Action::SearchInput("SAGAN".into()))
            .unwrap();
        assert_eq!(titles(&screen), ["Cosmos"]);

        screen.update(&Action::CloseSearch).unwrap();
        assert_eq!(screen.derived.len(), 3);
    }

    #[test]
    fn clear_filters_keeps_the_sort_column() {
        let mut screen = loaded();
        press(&mut screen, KeyCode::Char('2'));
        screen
            .update(&Action::FilterGenre(GenreFilter::NonFiction))
            .unwrap();
        screen.update(&Action::ClearFilters).unwrap();

        assert_eq!(screen.view.genre_filter, GenreFilter::All);
        assert_eq!(screen.view.sort_field, SortField::Author);
        assert_eq!(screen.view.sort_direction, SortDirection::None);
        assert_eq!(screen.derived.len(), 3);
    }

    #[test]
    fn row_actions_target_the_highlighted_book() {
        let mut screen = loaded();
        press(&mut screen, KeyCode::Char('j'));

        match press(&mut screen, KeyCode::Char('d')) {
            Some(Action::RequestDelete(id)) => assert_eq!(id.as_str(), "2"),
            other => panic!("unexpected {other:?}"),
        }
        match press(&mut screen, KeyCode::Char('e')) {
            Some(Action::EditBook(book)) => assert_eq!(book.title, "Cosmos"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            press(&mut screen, KeyCode::Char('n')),
            Some(Action::NewBook)
        ));
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut screen = loaded();
        press(&mut screen, KeyCode::Char('G'));
        press(&mut screen, KeyCode::Char('j'));
        assert_eq!(screen.selected_index(), 2);
        press(&mut screen, KeyCode::Char('g'));
        press(&mut screen, KeyCode::Char('k'));
        assert_eq!(screen.selected_index(), 0);
    }

    #[test]
    fn details_open_and_close_without_touching_books() {
        let mut screen = loaded();
        press(&mut screen, KeyCode::Enter);
        assert_eq!(screen.details().map(|b| b.title.as_str()), Some("Dune"));
        assert!(draw(&screen).contains("Book Details"));

        press(&mut screen, KeyCode::Esc);
        assert!(screen.view.selected.is_none());
        assert_eq!(screen.books.len(), 3);
    }

    #[test]
    fn details_close_when_the_book_disappears() {
        let mut screen = loaded();
        press(&mut screen, KeyCode::Enter);

        let remaining = vec![book("2", "Cosmos", "Sagan", Genre::NonFiction, 14.5)];
        screen
            .update(&Action::BooksUpdated(Arc::new(remaining)))
            .unwrap();
        assert!(screen.view.selected.is_none());
    }

    #[test]
    fn renders_totals_and_sort_indicators() {
        let mut screen = loaded();
        screen
            .update(&Action::FilterGenre(GenreFilter::Fiction))
            .unwrap();
        press(&mut screen, KeyCode::Char('1'));

        let out = draw(&screen);
        assert!(out.contains("Total Books: 3"));
        assert!(out.contains("Showing 2 books"));
        assert!(out.contains("Title ↑"));
        assert!(out.contains("Author ↕"));
        assert!(out.contains("[Fiction]"));
    }

    #[test]
    fn renders_empty_message() {
        let mut screen = loaded();
        screen
            .update(&Action::SearchInput("zzz".into()))
            .unwrap();
        assert!(draw(&screen).contains(EMPTY_MESSAGE));
    }
}
