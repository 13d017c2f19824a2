use serde::{Deserialize, Serialize};

use super::ids::ProductId;

/// Stock at or below this (and above zero) is "low".
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 10;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    pub fn for_stock(stock: u32, low_stock_threshold: u32) -> Self {
        match stock {
            0 => Self::OutOfStock,
            s if s <= low_stock_threshold => Self::LowStock,
            _ => Self::InStock,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::InStock => "In Stock",
            Self::LowStock => "Low Stock",
            Self::OutOfStock => "Out of Stock",
        }
    }

    /// Badge color class on the inventory table.
    pub fn badge_class(self) -> &'static str {
        match self {
            Self::InStock => "bg-success",
            Self::LowStock => "bg-warning",
            Self::OutOfStock => "bg-danger",
        }
    }

    /// Value of the matching `<option>` in the status filter.
    pub fn filter_value(self) -> &'static str {
        match self {
            Self::InStock => "in",
            Self::LowStock => "low",
            Self::OutOfStock => "out",
        }
    }

    /// Read a rendered badge back, case-insensitively.
    pub fn from_label(text: &str) -> Option<Self> {
        let text = text.trim().to_lowercase();
        [Self::OutOfStock, Self::LowStock, Self::InStock]
            .into_iter()
            .find(|status| text.contains(&status.label().to_lowercase()))
    }
}

impl From<u32> for StockStatus {
    fn from(stock: u32) -> Self {
        Self::for_stock(stock, DEFAULT_LOW_STOCK_THRESHOLD)
    }
}

/// Selection in the inventory status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(StockStatus),
    /// A value no status answers to; hides every row.
    Unrecognized,
}

impl StatusFilter {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() {
            return Self::All;
        }
        [StockStatus::InStock, StockStatus::LowStock, StockStatus::OutOfStock]
            .into_iter()
            .find(|status| status.filter_value() == value)
            .map_or(Self::Unrecognized, Self::Only)
    }

    pub fn admits(self, status: StockStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
            Self::Unrecognized => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InventoryRow {
    pub id: ProductId,
    pub name: String,
    pub stock: u32,
    pub status: StockStatus,
}

impl InventoryRow {
    pub fn matches(&self, needle: &str, filter: StatusFilter) -> bool {
        self.name.to_lowercase().contains(needle) && filter.admits(self.status)
    }
}

/// Visibility of each row for a search term and status filter value, in row
/// order. Pure: the same inputs always give the same answer.
pub fn filter_rows(rows: &[InventoryRow], search_term: &str, status_filter: &str) -> Vec<(ProductId, bool)> {
    let needle = search_term.to_lowercase();
    let filter = StatusFilter::parse(status_filter);

    rows.iter()
        .map(|row| (row.id.clone(), row.matches(&needle, filter)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, StockStatus::OutOfStock)]
    #[case(1, StockStatus::LowStock)]
    #[case(10, StockStatus::LowStock)]
    #[case(11, StockStatus::InStock)]
    #[case(500, StockStatus::InStock)]
    fn test_status_from_stock(#[case] stock: u32, #[case] expected: StockStatus) {
        assert_eq!(StockStatus::from(stock), expected);
    }

    #[test]
    fn test_status_is_total_over_small_stocks() {
        for stock in 0..=200u32 {
            let expected = if stock == 0 {
                StockStatus::OutOfStock
            } else if stock <= 10 {
                StockStatus::LowStock
            } else {
                StockStatus::InStock
            };
            assert_eq!(StockStatus::from(stock), expected, "stock {stock}");
        }
    }

    #[test]
    fn test_custom_threshold() {
        assert_eq!(StockStatus::for_stock(15, 20), StockStatus::LowStock);
        assert_eq!(StockStatus::for_stock(21, 20), StockStatus::InStock);
    }

    #[test]
    fn test_label_round_trip_and_case() {
        for status in [StockStatus::InStock, StockStatus::LowStock, StockStatus::OutOfStock] {
            assert_eq!(StockStatus::from_label(status.label()), Some(status));
        }
        assert_eq!(StockStatus::from_label("  OUT OF STOCK "), Some(StockStatus::OutOfStock));
        assert_eq!(StockStatus::from_label("discontinued"), None);
    }

    fn rows() -> Vec<InventoryRow> {
        vec![
            InventoryRow {
                id: "1".into(),
                name: "Spam Musubi".into(),
                stock: 40,
                status: StockStatus::InStock,
            },
            InventoryRow {
                id: "2".into(),
                name: "Teriyaki Chicken Musubi".into(),
                stock: 4,
                status: StockStatus::LowStock,
            },
            InventoryRow {
                id: "3".into(),
                name: "Iced Tea".into(),
                stock: 0,
                status: StockStatus::OutOfStock,
            },
        ]
    }

    fn visible(result: &[(ProductId, bool)]) -> Vec<&str> {
        result
            .iter()
            .filter(|(_, shown)| *shown)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    #[test]
    fn test_filter_by_search_is_case_insensitive() {
        let result = filter_rows(&rows(), "MUSUBI", "");
        assert_eq!(visible(&result), vec!["1", "2"]);
    }

    #[test]
    fn test_filter_by_status() {
        assert_eq!(visible(&filter_rows(&rows(), "", "low")), vec!["2"]);
        assert_eq!(visible(&filter_rows(&rows(), "", "out")), vec!["3"]);
        assert_eq!(visible(&filter_rows(&rows(), "musubi", "in")), vec!["1"]);
        assert!(visible(&filter_rows(&rows(), "", "bogus")).is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let rows = rows();
        let first = filter_rows(&rows, "tea", "out");
        let second = filter_rows(&rows, "tea", "out");
        assert_eq!(first, second);
    }
}
