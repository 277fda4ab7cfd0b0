use axum::extract::Multipart;
use tracing::debug;

use super::ApiError;
use crate::models::book::BookForm;
use crate::services::UploadedFile;

/// A decoded create/edit submission: the text fields plus the optional
/// cover image.
#[derive(Debug, Default)]
pub struct BookSubmission {
    pub form: BookForm,
    pub image: Option<UploadedFile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormField {
    Id,
    Title,
    Author,
    Genre,
    PublishedYear,
    Price,
    DiscountPercentage,
    ImageFile,
}

impl FormField {
    /// Accepts `PublishedYear`, `publishedYear` and `published_year` alike.
    fn parse(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match key.as_str() {
            "id" => Some(Self::Id),
            "title" => Some(Self::Title),
            "author" => Some(Self::Author),
            "genre" => Some(Self::Genre),
            "publishedyear" => Some(Self::PublishedYear),
            "price" => Some(Self::Price),
            "discountpercentage" => Some(Self::DiscountPercentage),
            "imagefile" | "image" => Some(Self::ImageFile),
            _ => None,
        }
    }
}

impl BookSubmission {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut submission = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::validation(format!("Invalid form data: {}", e.body_text())))?
        {
            let name = field.name().unwrap_or_default().to_string();

            let Some(kind) = FormField::parse(&name) else {
                debug!(field = %name, "Ignoring unknown form field");
                continue;
            };

            if kind == FormField::ImageFile {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::validation(format!("Invalid image upload: {}", e.body_text()))
                })?;

                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }

                submission.image = Some(UploadedFile::new(file_name, bytes.to_vec()));
                continue;
            }

            let value = field.text().await.map_err(|e| {
                ApiError::validation(format!("Invalid value for {name}: {}", e.body_text()))
            })?;
            submission.set(kind, value);
        }

        Ok(submission)
    }

    fn set(&mut self, kind: FormField, value: String) {
        let form = &mut self.form;
        let slot = match kind {
            FormField::Id => &mut form.id,
            FormField::Title => &mut form.title,
            FormField::Author => &mut form.author,
            FormField::Genre => &mut form.genre,
            FormField::PublishedYear => &mut form.published_year,
            FormField::Price => &mut form.price,
            FormField::DiscountPercentage => &mut form.discount_percentage,
            FormField::ImageFile => return,
        };
        *slot = Some(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_name_aliases() {
        assert_eq!(FormField::parse("PublishedYear"), Some(FormField::PublishedYear));
        assert_eq!(FormField::parse("published_year"), Some(FormField::PublishedYear));
        assert_eq!(FormField::parse("publishedYear"), Some(FormField::PublishedYear));
        assert_eq!(FormField::parse("ImageFile"), Some(FormField::ImageFile));
        assert_eq!(FormField::parse("Id"), Some(FormField::Id));
        assert_eq!(FormField::parse("__RequestVerificationToken"), None);
    }

    #[test]
    fn test_set_fills_matching_slot() {
        let mut submission = BookSubmission::default();
        submission.set(FormField::Genre, "Poetry".to_string());
        submission.set(FormField::DiscountPercentage, "15".to_string());

        assert_eq!(submission.form.genre.as_deref(), Some("Poetry"));
        assert_eq!(submission.form.discount_percentage.as_deref(), Some("15"));
        assert!(submission.form.title.is_none());
    }
}
