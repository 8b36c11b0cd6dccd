use thiserror::Error;

use crate::storage::StoreError;

/// Input rejected before the data file is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Description must not be empty")]
    EmptyDescription,

    #[error("Amount must be a number: '{0}'")]
    InvalidAmount(String),

    #[error("Amount must be positive")]
    NonPositiveAmount,

    #[error("Amount must be less than {}", crate::domain::format_amount(crate::domain::max_amount()))]
    AmountTooLarge,

    #[error("{} must not be empty", capitalize(.0))]
    EmptyLabel(&'static str),

    #[error("Invalid date '{0}'. Use YYYY-MM-DD")]
    InvalidDate(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to save transactions: {0}")]
    Persistence(#[source] StoreError),

    #[error("Data file cannot be used: {0}")]
    CorruptData(#[source] StoreError),

    #[error("Invalid date format '{0}'. Use YYYY-MM-DD")]
    DateFormat(String),
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::EmptyLabel("category").to_string(),
            "Category must not be empty"
        );
        assert_eq!(
            ValidationError::NonPositiveAmount.to_string(),
            "Amount must be positive"
        );
        assert_eq!(
            ValidationError::AmountTooLarge.to_string(),
            "Amount must be less than 1,000,000,000,000.00"
        );
        assert_eq!(
            AppError::from(ValidationError::EmptyDescription).to_string(),
            "Description must not be empty"
        );
    }
}
