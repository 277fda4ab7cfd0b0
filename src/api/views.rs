//! Server-rendered HTML pages.

use axum::http::StatusCode;
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use rust_decimal::Decimal;
use std::fmt::Write;

use super::types::public_image_url;
use crate::models::book::{Book, BookForm, ValidationErrors, fields};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i32),
}

impl FormMode {
    fn action(self) -> String {
        match self {
            Self::Create => "/Books/Create".to_string(),
            Self::Edit(id) => format!("/Books/Edit/{id}"),
        }
    }

    const fn heading(self) -> &'static str {
        match self {
            Self::Create => "Add a book",
            Self::Edit(_) => "Edit book",
        }
    }
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} - Bookshelf</title>
</head>
<body>
<header>
<nav>
<a href="/">Bookshelf</a>
<a href="/Books">Books</a>
<a href="/Books/Create">Add a book</a>
<a href="/Home/Privacy">Privacy</a>
</nav>
</header>
<main>
{body}
</main>
</body>
</html>
"#,
        title = text(title),
    )
}

fn money(value: Decimal) -> String {
    format!("{:.2}", value)
}

fn final_money(book: &Book) -> String {
    book.final_price().map_or_else(|| "n/a".to_string(), money)
}

fn cover(book: &Book, class: &str) -> String {
    match book.image_url.as_deref().filter(|url| !url.is_empty()) {
        Some(url) => format!(
            r#"<img class="{class}" src="{src}" alt="Cover of {alt}">"#,
            src = attr(&public_image_url(url)),
            alt = attr(&book.title),
        ),
        None => String::new(),
    }
}

pub fn book_list(books: &[Book]) -> String {
    let mut rows = String::new();

    for book in books {
        let _ = write!(
            rows,
            r#"<tr>
<td>{cover}</td>
<td>{title}</td>
<td>{author}</td>
<td>{genre}</td>
<td>{year}</td>
<td>{price}</td>
<td>{discount}%</td>
<td>{final_price}</td>
<td><a href="/Books/Details/{id}">Details</a> | <a href="/Books/Edit/{id}">Edit</a> | <a href="/Books/Delete/{id}">Delete</a></td>
</tr>
"#,
            cover = cover(book, "thumb"),
            title = text(&book.title),
            author = text(&book.author),
            genre = text(&book.genre),
            year = book.published_year,
            price = money(book.price),
            discount = book.discount_percentage,
            final_price = final_money(book),
            id = book.id,
        );
    }

    if books.is_empty() {
        rows.push_str("<tr><td colspan=\"9\">No books found.</td></tr>\n");
    }

    let body = format!(
        r#"<h1>Books</h1>
<p><a href="/Books/Create">Add a book</a></p>
<table>
<thead>
<tr><th></th><th>Title</th><th>Author</th><th>Genre</th><th>Published</th><th>Price</th><th>Discount</th><th>Final price</th><th></th></tr>
</thead>
<tbody>
{rows}</tbody>
</table>"#
    );

    layout("Books", &body)
}

pub fn book_details(book: &Book) -> String {
    let body = format!(
        r#"<h1>{title}</h1>
{cover}
<dl>
<dt>Author</dt><dd>{author}</dd>
<dt>Genre</dt><dd>{genre}</dd>
<dt>Published</dt><dd>{year}</dd>
<dt>Price</dt><dd>{price}</dd>
<dt>Discount</dt><dd>{discount}%</dd>
<dt>Final price</dt><dd>{final_price}</dd>
</dl>
<p><a href="/Books/Edit/{id}">Edit</a> | <a href="/Books">Back to list</a></p>"#,
        title = text(&book.title),
        cover = cover(book, "cover"),
        author = text(&book.author),
        genre = text(&book.genre),
        year = book.published_year,
        price = money(book.price),
        discount = book.discount_percentage,
        final_price = final_money(book),
        id = book.id,
    );

    layout(&book.title, &body)
}

fn input(
    label: &str,
    name: &str,
    kind: &str,
    value: Option<&str>,
    errors: &ValidationErrors,
) -> String {
    let error = errors
        .get(name)
        .map(|msg| format!(r#"<span class="field-error">{}</span>"#, text(msg)))
        .unwrap_or_default();

    format!(
        r#"<div class="field">
<label for="{name}">{label}</label>
<input id="{name}" name="{name}" type="{kind}" value="{value}">
{error}
</div>
"#,
        value = attr(value.unwrap_or_default()),
    )
}

/// Create and edit form. The submitted values are echoed back so a
/// rejected submission loses nothing.
pub fn book_form(
    mode: FormMode,
    form: &BookForm,
    errors: &ValidationErrors,
    current_image: Option<&str>,
) -> String {
    let mut fields_html = String::new();

    if let FormMode::Edit(id) = mode {
        let _ = writeln!(fields_html, r#"<input type="hidden" name="id" value="{id}">"#);
    } else if let Some(id) = form.requested_id() {
        let _ = writeln!(fields_html, r#"<input type="hidden" name="id" value="{id}">"#);
    }

    fields_html.push_str(&input("Title", fields::TITLE, "text", form.title.as_deref(), errors));
    fields_html.push_str(&input("Author", fields::AUTHOR, "text", form.author.as_deref(), errors));
    fields_html.push_str(&input("Genre", fields::GENRE, "text", form.genre.as_deref(), errors));
    fields_html.push_str(&input(
        "Published year",
        fields::PUBLISHED_YEAR,
        "number",
        form.published_year.as_deref(),
        errors,
    ));
    fields_html.push_str(&input("Price", fields::PRICE, "text", form.price.as_deref(), errors));
    fields_html.push_str(&input(
        "Discount (%)",
        fields::DISCOUNT_PERCENTAGE,
        "text",
        form.discount_percentage.as_deref(),
        errors,
    ));

    if let Some(url) = current_image.filter(|url| !url.is_empty()) {
        let _ = writeln!(
            fields_html,
            r#"<p><img class="thumb" src="{}" alt="Current cover"></p>"#,
            attr(&public_image_url(url))
        );
    }

    let image_error = errors
        .get(fields::IMAGE_FILE)
        .map(|msg| format!(r#"<span class="field-error">{}</span>"#, text(msg)))
        .unwrap_or_default();
    let _ = write!(
        fields_html,
        r#"<div class="field">
<label for="image_file">Cover image</label>
<input id="image_file" name="image_file" type="file" accept=".jpg,.jpeg,.png,.gif">
{image_error}
</div>
"#
    );

    let summary = if errors.is_empty() {
        String::new()
    } else {
        let items: String = errors
            .iter()
            .map(|(_, msg)| format!("<li>{}</li>", text(msg)))
            .collect();
        format!(r#"<ul class="validation-summary">{items}</ul>"#)
    };

    let body = format!(
        r#"<h1>{heading}</h1>
{summary}
<form method="post" action="{action}" enctype="multipart/form-data">
{fields_html}<button type="submit">Save</button>
</form>
<p><a href="/Books">Back to list</a></p>"#,
        heading = mode.heading(),
        action = attr(&mode.action()),
    );

    layout(mode.heading(), &body)
}

pub fn delete_confirmation(book: &Book) -> String {
    let body = format!(
        r#"<h1>Delete book</h1>
<p>Are you sure you want to delete <strong>{title}</strong> by {author}?</p>
{cover}
<form method="post" action="/Books/Delete/{id}">
<button type="submit">Delete</button>
<a href="/Books">Cancel</a>
</form>"#,
        title = text(&book.title),
        author = text(&book.author),
        cover = cover(book, "thumb"),
        id = book.id,
    );

    layout("Delete book", &body)
}

pub fn home(books: &[Book]) -> String {
    let mut cards = String::new();
    for book in books {
        let _ = write!(
            cards,
            r#"<article>
{cover}
<h2><a href="/Books/Details/{id}">{title}</a></h2>
<p>{author} &middot; {final_price}</p>
</article>
"#,
            cover = cover(book, "thumb"),
            id = book.id,
            title = text(&book.title),
            author = text(&book.author),
            final_price = final_money(book),
        );
    }

    if books.is_empty() {
        cards.push_str("<p>The catalog is empty. <a href=\"/Books/Create\">Add the first book</a>.</p>\n");
    }

    layout("Home", &format!("<h1>Welcome to Bookshelf</h1>\n{cards}"))
}

pub fn privacy() -> String {
    layout(
        "Privacy",
        "<h1>Privacy</h1>\n<p>Bookshelf stores only the catalog data and cover images you upload.</p>",
    )
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let title = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        "<h1>{code} {title}</h1>\n<p>{message}</p>\n<p><a href=\"/Books\">Back to list</a></p>",
        code = status.as_u16(),
        title = text(title),
        message = text(message),
    );
    layout(title, &body)
}
