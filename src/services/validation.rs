use regex::Regex;
use std::sync::LazyLock;

use super::error_handling::{LogHelper, StorefrontError};

/// Leading integer the way browsers read `parseInt(value, 10)`: optional
/// whitespace, optional sign, digits, anything after is ignored.
static LEADING_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("static pattern"));

/// Input validation for values typed into cart and inventory controls
pub struct InputValidator;

impl InputValidator {
    /// Parse the integer prefix of a form value. `None` when there is no
    /// integer to read or it does not fit in an `i64`.
    pub fn parse_integer(raw: &str) -> Option<i64> {
        let captures = LEADING_INTEGER.captures(raw)?;
        captures[1].parse::<i64>().ok()
    }

    /// A cart quantity must be an integer in `1..=max_stock`.
    pub fn validate_quantity(raw: &str, max_stock: u32) -> Result<u32, StorefrontError> {
        let Some(quantity) = Self::parse_integer(raw) else {
            LogHelper::log_validation_failure("quantity", raw, "not a number");
            return Err(StorefrontError::validation("quantity", "not a number"));
        };

        if quantity < 1 || quantity > i64::from(max_stock) {
            LogHelper::log_validation_failure("quantity", raw, "out of range");
            return Err(StorefrontError::validation(
                "quantity",
                format!("must be between 1 and {max_stock}"),
            ));
        }

        Ok(quantity as u32)
    }

    /// Stock must be a non-negative integer.
    pub fn validate_stock(raw: &str) -> Result<u32, StorefrontError> {
        let Some(stock) = Self::parse_integer(raw) else {
            LogHelper::log_validation_failure("stock", raw, "not a number");
            return Err(StorefrontError::validation("stock", "not a number"));
        };

        if stock < 0 {
            LogHelper::log_validation_failure("stock", raw, "negative");
            return Err(StorefrontError::validation("stock", "cannot be negative"));
        }

        u32::try_from(stock).map_err(|_| {
            LogHelper::log_validation_failure("stock", raw, "too large");
            StorefrontError::validation("stock", "too large")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("7", Some(7))]
    #[case("  12", Some(12))]
    #[case("12abc", Some(12))]
    #[case("-3", Some(-3))]
    #[case("+4", Some(4))]
    #[case("3.9", Some(3))]
    #[case("", None)]
    #[case("abc", None)]
    #[case("- 3", None)]
    #[case("99999999999999999999", None)]
    fn test_parse_integer(#[case] raw: &str, #[case] expected: Option<i64>) {
        assert_eq!(InputValidator::parse_integer(raw), expected);
    }

    #[test]
    fn test_quantity_bounds() {
        assert_eq!(InputValidator::validate_quantity("1", 5), Ok(1));
        assert_eq!(InputValidator::validate_quantity("5", 5), Ok(5));
        assert!(InputValidator::validate_quantity("0", 5).is_err());
        assert!(InputValidator::validate_quantity("6", 5).is_err());
        assert!(InputValidator::validate_quantity("-1", 5).is_err());
        assert!(InputValidator::validate_quantity("", 5).is_err());

        // A line with nothing in stock accepts no quantity at all
        assert!(InputValidator::validate_quantity("1", 0).is_err());
    }

    #[test]
    fn test_stock_validation() {
        assert_eq!(InputValidator::validate_stock("0"), Ok(0));
        assert_eq!(InputValidator::validate_stock("25"), Ok(25));
        assert!(InputValidator::validate_stock("-1").is_err());
        assert!(InputValidator::validate_stock("lots").is_err());
        assert!(InputValidator::validate_stock("5000000000").is_err());

        let err = InputValidator::validate_stock("-1").unwrap_err();
        assert!(matches!(err, StorefrontError::Validation { .. }));
    }
}
