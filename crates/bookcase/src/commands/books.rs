//! Book command handlers: list, show, add, edit, delete.

use tabled::Tabled;

use bookcase_core::{
    Book, BookForm, BookStore, BookType, Field, FileStorage, Genre, GenreFilter, SortDirection,
    SortField, ViewState, derive,
};

use crate::cli::{
    BookFieldArgs, BookTypeArg, GenreArg, GenreFilterArg, GlobalOpts, ListArgs, OutputFormat,
    SortArg,
};
use crate::error::CliError;
use crate::output;

use super::util;

const EMPTY_MESSAGE: &str = "No books found matching your search criteria";

// ── Arg → domain conversions ────────────────────────────────────────

impl From<GenreArg> for Genre {
    fn from(arg: GenreArg) -> Self {
        match arg {
            GenreArg::Fiction => Genre::Fiction,
            GenreArg::NonFiction => Genre::NonFiction,
        }
    }
}

impl From<GenreFilterArg> for GenreFilter {
    fn from(arg: GenreFilterArg) -> Self {
        match arg {
            GenreFilterArg::All => GenreFilter::All,
            GenreFilterArg::Fiction => GenreFilter::Fiction,
            GenreFilterArg::NonFiction => GenreFilter::NonFiction,
        }
    }
}

impl From<BookTypeArg> for BookType {
    fn from(arg: BookTypeArg) -> Self {
        match arg {
            BookTypeArg::Ebook => BookType::Ebook,
            BookTypeArg::Printed => BookType::Printedbook,
        }
    }
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Title => SortField::Title,
            SortArg::Author => SortField::Author,
            SortArg::Isbn => SortField::Isbn,
            SortArg::Genre => SortField::Genre,
            SortArg::BookType => SortField::BookType,
            SortArg::Price => SortField::Price,
            SortArg::PublicationDate => SortField::PublicationDate,
        }
    }
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct BookRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "ISBN")]
    isbn: String,
    #[tabled(rename = "Genre")]
    genre: &'static str,
    #[tabled(rename = "Type")]
    book_type: &'static str,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Published")]
    published: String,
}

impl From<&Book> for BookRow {
    fn from(b: &Book) -> Self {
        Self {
            id: b.id.to_string(),
            title: b.title.clone(),
            author: b.author.clone(),
            isbn: b.isbn.clone(),
            genre: b.genre.label(),
            book_type: b.book_type.label(),
            price: b.price_display(),
            published: b.publication_date.to_string(),
        }
    }
}

fn detail(b: &Book) -> String {
    let mut lines = vec![
        format!("ID:                {}", b.id),
        format!("Title:             {}", b.title),
        format!("Author:            {}", b.author),
        format!("ISBN:              {}", b.isbn),
        format!("Publication Date:  {}", b.publication_date),
        format!("Genre:             {}", b.genre.label()),
        format!("Book Type:         {}", b.book_type.label()),
        format!("Price:             {}", b.price_display()),
        format!("Purchase Link:     {}", b.purchase_link),
    ];
    if let Some(desc) = &b.description {
        lines.push(format!("Description:       {desc}"));
    }
    lines.join("\n")
}

// ── View construction ───────────────────────────────────────────────

fn view_from_args(args: ListArgs) -> ViewState {
    let mut view = ViewState::new();
    if let Some(term) = args.search {
        view.set_search_term(term);
    }
    view.set_genre_filter(args.genre.into());
    if let Some(sort) = args.sort {
        view.sort_field = sort.into();
        view.sort_direction = if args.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
    }
    view
}

/// Copy every flag that was given into the form. Returns how many were.
fn apply_fields(form: &mut BookForm, fields: BookFieldArgs) -> usize {
    let text = [
        (Field::Title, fields.title),
        (Field::Author, fields.author),
        (Field::Isbn, fields.isbn),
        (Field::PublicationDate, fields.published),
        (Field::Price, fields.price),
        (Field::PurchaseLink, fields.link),
        (Field::Description, fields.description),
    ];
    let choices = [
        (Field::Genre, fields.genre.map(|g| Genre::from(g).to_string())),
        (
            Field::BookType,
            fields.book_type.map(|t| BookType::from(t).to_string()),
        ),
    ];

    let mut applied = 0;
    for (field, value) in text.into_iter().chain(choices) {
        if let Some(value) = value {
            form.set(field, &value);
            applied += 1;
        }
    }
    applied
}

// ── Handlers ────────────────────────────────────────────────────────

pub fn list(
    store: &BookStore<FileStorage>,
    args: ListArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let view = view_from_args(args);
    let shown = derive(store.iter(), &view);
    let format = global.output_format();

    if format == OutputFormat::Table && shown.is_empty() {
        output::print_output(EMPTY_MESSAGE, global.quiet);
    } else {
        let out = output::render_list(
            &format,
            &shown,
            |b| BookRow::from(*b),
            |b| b.id.to_string(),
        )?;
        output::print_output(&out, global.quiet);
    }

    if format == OutputFormat::Table {
        output::print_note(
            &format!(
                "Total Books: {} · Showing {} books",
                store.len(),
                shown.len()
            ),
            &global.color_mode(),
            global.quiet,
        );
    }
    Ok(())
}

pub fn show(store: &BookStore<FileStorage>, id: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let book = util::find_book(store, id)?;
    let out = output::render_single(&global.output_format(), book, detail, |b| b.id.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub fn add(
    store: &mut BookStore<FileStorage>,
    fields: BookFieldArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut form = BookForm::new();
    apply_fields(&mut form, fields);

    let submission = form
        .submit()
        .map_err(|errors| CliError::InvalidBook { errors })?;
    let message = submission.message();
    let book = submission.apply(store)?;

    tracing::info!(id = %book.id, title = %book.title, "book added");
    let out = output::render_single(&global.output_format(), &book, detail, |b| b.id.to_string())?;
    output::print_output(&out, global.quiet);
    output::print_success(message, &global.color_mode(), global.quiet);
    Ok(())
}

pub fn edit(
    store: &mut BookStore<FileStorage>,
    id: &str,
    fields: BookFieldArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut form = BookForm::edit(util::find_book(store, id)?);
    if apply_fields(&mut form, fields) == 0 {
        return Err(CliError::Validation {
            field: "edit".into(),
            reason: "nothing to change; pass at least one field flag (see --help)".into(),
        });
    }

    let submission = form
        .submit()
        .map_err(|errors| CliError::InvalidBook { errors })?;
    let message = submission.message();
    let book = submission.apply(store)?;

    tracing::info!(id = %book.id, "book updated");
    let out = output::render_single(&global.output_format(), &book, detail, |b| b.id.to_string())?;
    output::print_output(&out, global.quiet);
    output::print_success(message, &global.color_mode(), global.quiet);
    Ok(())
}

pub fn delete(
    store: &mut BookStore<FileStorage>,
    id: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let book = util::find_book(store, id)?;
    let prompt = format!("Delete '{}' by {}?", book.title, book.author);
    let id = book.id.clone();

    if !util::confirm(&prompt, "delete", global.yes)? {
        output::print_note("Aborted.", &global.color_mode(), global.quiet);
        return Ok(());
    }

    store.delete(&id)?;
    tracing::info!(id = %id, "book deleted");
    output::print_success("Book deleted successfully!", &global.color_mode(), global.quiet);
    Ok(())
}
