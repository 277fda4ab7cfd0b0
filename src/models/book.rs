use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const TITLE_MAX_LEN: usize = 100;
pub const AUTHOR_MAX_LEN: usize = 100;
pub const GENRE_MAX_LEN: usize = 50;
pub const MIN_PUBLISHED_YEAR: i32 = 1000;
pub const MAX_PUBLISHED_YEAR: i32 = 9999;
pub const MAX_PRICE: i64 = 1_000_000_000;

/// A persisted catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub published_year: i32,
    pub price: Decimal,
    pub discount_percentage: f64,
    pub image_url: Option<String>,
}

impl Book {
    #[must_use]
    pub fn final_price(&self) -> Option<Decimal> {
        final_price(self.price, self.discount_percentage)
    }

    /// Replaces every scalar field with the draft's values. `id` and
    /// `image_url` are left alone.
    pub fn apply(&mut self, draft: BookDraft) {
        self.title = draft.title;
        self.author = draft.author;
        self.genre = draft.genre;
        self.published_year = draft.published_year;
        self.price = draft.price;
        self.discount_percentage = draft.discount_percentage;
    }
}

/// `price - price * discount / 100`, computed in decimal arithmetic.
/// `None` when an intermediate value overflows.
#[must_use]
pub fn final_price(price: Decimal, discount_percentage: f64) -> Option<Decimal> {
    let discount = Decimal::from_f64_retain(discount_percentage).unwrap_or_default();
    let reduction = price
        .checked_mul(discount)?
        .checked_div(Decimal::ONE_HUNDRED)?;
    price.checked_sub(reduction)
}

/// A validated book that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub published_year: i32,
    pub price: Decimal,
    pub discount_percentage: f64,
    pub image_url: Option<String>,
}

/// Raw form input, exactly as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookForm {
    pub id: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub published_year: Option<String>,
    pub price: Option<String>,
    pub discount_percentage: Option<String>,
}

impl BookForm {
    #[must_use]
    pub fn from_book(book: &Book) -> Self {
        Self {
            id: Some(book.id.to_string()),
            title: Some(book.title.clone()),
            author: Some(book.author.clone()),
            genre: Some(book.genre.clone()),
            published_year: Some(book.published_year.to_string()),
            price: Some(book.price.to_string()),
            discount_percentage: Some(book.discount_percentage.to_string()),
        }
    }

    /// The id carried by the form, if it names a real row. Blank, zero and
    /// unparsable values all mean "no id".
    #[must_use]
    pub fn requested_id(&self) -> Option<i32> {
        non_blank(self.id.as_deref())
            .and_then(|raw| raw.parse::<i32>().ok())
            .filter(|id| *id > 0)
    }

    /// Checks every field constraint and collects one message per
    /// offending field.
    pub fn validate(&self) -> Result<BookDraft, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if let Some(raw) = non_blank(self.id.as_deref()) {
            if raw.parse::<i32>().is_err() {
                errors.add(fields::ID, invalid_value(raw, "Id"));
            }
        }

        let title = required_text(
            &mut errors,
            fields::TITLE,
            "Title",
            self.title.as_deref(),
            TITLE_MAX_LEN,
        );
        let author = required_text(
            &mut errors,
            fields::AUTHOR,
            "Author",
            self.author.as_deref(),
            AUTHOR_MAX_LEN,
        );
        let genre = required_text(
            &mut errors,
            fields::GENRE,
            "Genre",
            self.genre.as_deref(),
            GENRE_MAX_LEN,
        );

        let published_year = required_number::<i32>(
            &mut errors,
            fields::PUBLISHED_YEAR,
            "Published Year",
            self.published_year.as_deref(),
        )
        .filter(|year| {
            let ok = (MIN_PUBLISHED_YEAR..=MAX_PUBLISHED_YEAR).contains(year);
            if !ok {
                errors.add(fields::PUBLISHED_YEAR, "Please enter a valid year.");
            }
            ok
        });

        let price = required_number::<Decimal>(
            &mut errors,
            fields::PRICE,
            "Price",
            self.price.as_deref(),
        )
        .filter(|price| {
            if *price <= Decimal::ZERO {
                errors.add(fields::PRICE, "Price must be greater than zero.");
                return false;
            }
            if *price > Decimal::from(MAX_PRICE) {
                errors.add(fields::PRICE, format!("Price must be at most {MAX_PRICE}."));
                return false;
            }
            true
        });

        let discount_percentage = match non_blank(self.discount_percentage.as_deref()) {
            None => Some(0.0),
            Some(raw) => match raw.parse::<f64>() {
                Ok(value) if (0.0..=100.0).contains(&value) => Some(value),
                Ok(_) => {
                    errors.add(
                        fields::DISCOUNT_PERCENTAGE,
                        "Discount percentage must be between 0 and 100.",
                    );
                    None
                }
                Err(_) => {
                    errors.add(
                        fields::DISCOUNT_PERCENTAGE,
                        invalid_value(raw, "Discount Percentage"),
                    );
                    None
                }
            },
        };

        match (
            title,
            author,
            genre,
            published_year,
            price,
            discount_percentage,
        ) {
            (
                Some(title),
                Some(author),
                Some(genre),
                Some(published_year),
                Some(price),
                Some(discount_percentage),
            ) if errors.is_empty() => Ok(BookDraft {
                title,
                author,
                genre,
                published_year,
                price,
                discount_percentage,
                image_url: None,
            }),
            _ => Err(errors),
        }
    }
}

/// Form field keys used in validation messages and re-rendered forms.
pub mod fields {
    pub const ID: &str = "id";
    pub const TITLE: &str = "title";
    pub const AUTHOR: &str = "author";
    pub const GENRE: &str = "genre";
    pub const PUBLISHED_YEAR: &str = "published_year";
    pub const PRICE: &str = "price";
    pub const DISCOUNT_PERCENTAGE: &str = "discount_percentage";
    pub const IMAGE_FILE: &str = "image_file";
}

/// Field name to message. Only the first problem per field is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    #[must_use]
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add(field, message);
        errors
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn required_message(label: &str) -> String {
    format!("The {label} field is required.")
}

fn invalid_value(raw: &str, label: &str) -> String {
    format!("The value '{raw}' is not valid for {label}.")
}

fn required_text(
    errors: &mut ValidationErrors,
    field: &str,
    label: &str,
    value: Option<&str>,
    max_len: usize,
) -> Option<String> {
    let Some(value) = non_blank(value) else {
        errors.add(field, required_message(label));
        return None;
    };

    if value.chars().count() > max_len {
        errors.add(
            field,
            format!("{label} must be at most {max_len} characters."),
        );
        return None;
    }

    Some(value.to_string())
}

fn required_number<T: FromStr>(
    errors: &mut ValidationErrors,
    field: &str,
    label: &str,
    value: Option<&str>,
) -> Option<T> {
    let Some(raw) = non_blank(value) else {
        errors.add(field, required_message(label));
        return None;
    };

    match raw.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            errors.add(field, invalid_value(raw, label));
            None
        }
    }
}
