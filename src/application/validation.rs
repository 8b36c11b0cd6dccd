use chrono::NaiveDate;

use crate::domain::{Amount, TransactionType, max_amount, parse_amount, round_amount};

use super::ValidationError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Input that passed validation, trimmed and parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidInput {
    pub description: String,
    pub amount: Amount,
    pub label: String,
}

/// Check the user-supplied fields of a new transaction.
///
/// Pure: does not read or write the data file. Fields are checked in the
/// order description, amount, label and the first failure is returned.
/// The amount is rounded to cents before the range checks, so the value
/// returned is exactly the value that will be read back from disk.
pub fn validate(
    transaction_type: TransactionType,
    description: &str,
    amount: &str,
    label: &str,
) -> Result<ValidInput, ValidationError> {
    let description = description.trim();
    if description.is_empty() {
        return Err(ValidationError::EmptyDescription);
    }

    let amount = parse_amount(amount)
        .map(round_amount)
        .map_err(|_| ValidationError::InvalidAmount(amount.trim().to_string()))?;
    if amount <= Amount::ZERO {
        return Err(ValidationError::NonPositiveAmount);
    }
    if amount >= max_amount() {
        return Err(ValidationError::AmountTooLarge);
    }

    let label = label.trim();
    if label.is_empty() {
        return Err(ValidationError::EmptyLabel(transaction_type.label_name()));
    }

    Ok(ValidInput {
        description: description.to_string(),
        amount,
        label: label.to_string(),
    })
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_valid_input_is_trimmed() {
        let input = validate(TransactionType::Expense, "  Coffee ", "5.50", " Food ").unwrap();

        assert_eq!(input.description, "Coffee");
        assert_eq!(input.amount, dec!(5.50));
        assert_eq!(input.label, "Food");
    }

    #[test]
    fn test_empty_description() {
        assert_eq!(
            validate(TransactionType::Expense, "   ", "5", "Food"),
            Err(ValidationError::EmptyDescription)
        );
    }

    #[test]
    fn test_non_numeric_amount() {
        assert_eq!(
            validate(TransactionType::Income, "Salary", "lots", "Job"),
            Err(ValidationError::InvalidAmount("lots".into()))
        );
    }

    #[test]
    fn test_non_positive_amount() {
        for amount in ["0", "-5", "0.00"] {
            assert_eq!(
                validate(TransactionType::Expense, "X", amount, "Food"),
                Err(ValidationError::NonPositiveAmount),
                "amount {amount}"
            );
        }
    }

    #[test]
    fn test_amount_is_rounded_to_cents() {
        let input = validate(TransactionType::Expense, "X", "0.12345678901234567891", "Food").unwrap();
        assert_eq!(input.amount, dec!(0.12));

        assert_eq!(
            validate(TransactionType::Expense, "X", "0.004", "Food"),
            Err(ValidationError::NonPositiveAmount)
        );
    }

    #[test]
    fn test_amount_upper_bound() {
        let input = validate(TransactionType::Income, "X", "999999999999.99", "Job").unwrap();
        assert_eq!(input.amount, dec!(999999999999.99));

        for amount in ["1000000000000", "50000000000000000000000000000", "79228162514264337593543950335"] {
            assert_eq!(
                validate(TransactionType::Income, "X", amount, "Job"),
                Err(ValidationError::AmountTooLarge),
                "amount {amount}"
            );
        }
    }

    #[test]
    fn test_empty_label_names_the_field() {
        assert_eq!(
            validate(TransactionType::Expense, "X", "1", " "),
            Err(ValidationError::EmptyLabel("category"))
        );
        assert_eq!(
            validate(TransactionType::Income, "X", "1", ""),
            Err(ValidationError::EmptyLabel("source"))
        );
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-02-29"), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(parse_date("2023-02-29"), None);
        assert_eq!(parse_date("01/02/2024"), None);
        assert_eq!(parse_date("yesterday"), None);
    }
}
