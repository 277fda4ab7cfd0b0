use super::ApiError;

pub fn validate_book_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid book ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_book_id() {
        assert!(validate_book_id(1).is_ok());
        assert!(validate_book_id(12345).is_ok());
        assert!(validate_book_id(0).is_err());
        assert!(validate_book_id(-1).is_err());
    }
}
