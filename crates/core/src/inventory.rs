//! Inventory item field rules and dashboard totals.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::CoreError;

/// Prices are kept to cents.
pub const PRICE_DECIMAL_PLACES: u32 = 2;

/// Largest price the `NUMERIC(12, 2)` column can hold.
const MAX_PRICE: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

pub const MISSING_FIELDS_MESSAGE: &str = "All fields are required!";
pub const BAD_NUMBER_MESSAGE: &str = "Invalid quantity or price value!";
pub const NEGATIVE_QUANTITY_MESSAGE: &str = "Quantity cannot be negative!";
pub const NEGATIVE_PRICE_MESSAGE: &str = "Price cannot be negative!";

/// Validated item fields, ready to be written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFields {
    pub name: String,
    pub quantity: i32,
    pub price: Decimal,
    pub category: String,
}

/// Parse and validate the raw text of an item form.
///
/// Checks run in a fixed order: missing fields, unparsable numbers, then
/// negative values. The first failure wins.
pub fn parse_item_fields(
    name: &str,
    quantity: &str,
    price: &str,
    category: &str,
) -> Result<ItemFields, CoreError> {
    let name = name.trim();
    let category = category.trim();
    let quantity = quantity.trim();
    let price = price.trim();

    if name.is_empty() || quantity.is_empty() || price.is_empty() || category.is_empty() {
        return Err(CoreError::Validation(MISSING_FIELDS_MESSAGE.into()));
    }

    let (Ok(quantity), Ok(price)) = (quantity.parse::<i32>(), Decimal::from_str(price)) else {
        return Err(CoreError::Validation(BAD_NUMBER_MESSAGE.into()));
    };
    let price = price.round_dp(PRICE_DECIMAL_PLACES);
    if price > MAX_PRICE {
        return Err(CoreError::Validation(BAD_NUMBER_MESSAGE.into()));
    }

    if quantity < 0 {
        return Err(CoreError::Validation(NEGATIVE_QUANTITY_MESSAGE.into()));
    }
    if price.is_sign_negative() && !price.is_zero() {
        return Err(CoreError::Validation(NEGATIVE_PRICE_MESSAGE.into()));
    }

    Ok(ItemFields {
        name: name.to_string(),
        quantity,
        price,
        category: category.to_string(),
    })
}

/// Aggregate figures shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InventoryTotals {
    /// Number of distinct items.
    pub item_count: usize,
    /// Sum of all quantities.
    pub total_quantity: i64,
    /// Sum of quantity x unit price.
    pub total_value: Decimal,
}

impl InventoryTotals {
    /// Tally `(quantity, unit_price)` pairs.
    pub fn tally<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = (i32, Decimal)>,
    {
        lines
            .into_iter()
            .fold(Self::default(), |acc, (quantity, price)| Self {
                item_count: acc.item_count + 1,
                total_quantity: acc.total_quantity + i64::from(quantity),
                total_value: acc.total_value + Decimal::from(quantity) * price,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn parses_trimmed_fields() {
        let fields = parse_item_fields("  Widget ", " 4 ", "2.50", " Tools ").unwrap();
        assert_eq!(fields.name, "Widget");
        assert_eq!(fields.quantity, 4);
        assert_eq!(fields.price, dec("2.50"));
        assert_eq!(fields.category, "Tools");
    }

    #[test]
    fn zero_quantity_and_price_are_allowed() {
        let fields = parse_item_fields("Freebie", "0", "0", "Misc").unwrap();
        assert_eq!(fields.quantity, 0);
        assert!(fields.price.is_zero());
    }

    #[test]
    fn blank_fields_are_rejected() {
        assert_matches!(
            parse_item_fields("", "1", "1", "Misc"),
            Err(CoreError::Validation(msg)) if msg == MISSING_FIELDS_MESSAGE
        );
        assert_matches!(
            parse_item_fields("Widget", "1", "1", "   "),
            Err(CoreError::Validation(msg)) if msg == MISSING_FIELDS_MESSAGE
        );
    }

    #[test]
    fn non_numeric_values_are_rejected() {
        assert_matches!(
            parse_item_fields("Widget", "1.5", "1", "Misc"),
            Err(CoreError::Validation(msg)) if msg == BAD_NUMBER_MESSAGE
        );
        assert_matches!(
            parse_item_fields("Widget", "1", "cheap", "Misc"),
            Err(CoreError::Validation(msg)) if msg == BAD_NUMBER_MESSAGE
        );
    }

    #[test]
    fn negative_values_are_rejected() {
        assert_matches!(
            parse_item_fields("Widget", "-1", "1", "Misc"),
            Err(CoreError::Validation(msg)) if msg == NEGATIVE_QUANTITY_MESSAGE
        );
        assert_matches!(
            parse_item_fields("Widget", "1", "-0.01", "Misc"),
            Err(CoreError::Validation(msg)) if msg == NEGATIVE_PRICE_MESSAGE
        );
    }

    #[test]
    fn absurd_prices_are_rejected() {
        assert_matches!(
            parse_item_fields("Widget", "1", "10000000000", "Misc"),
            Err(CoreError::Validation(msg)) if msg == BAD_NUMBER_MESSAGE
        );
        assert!(parse_item_fields("Widget", "1", "9999999999.99", "Misc").is_ok());
    }

    #[test]
    fn price_is_rounded_to_cents() {
        let fields = parse_item_fields("Widget", "1", "1.005", "Misc").unwrap();
        assert_eq!(fields.price.scale(), 2);
    }

    #[test]
    fn totals_sum_quantity_and_value() {
        let totals = InventoryTotals::tally([(2, dec("1.50")), (3, dec("10.00")), (0, dec("99"))]);
        assert_eq!(totals.item_count, 3);
        assert_eq!(totals.total_quantity, 5);
        assert_eq!(totals.total_value, dec("33.00"));
    }

    #[test]
    fn totals_of_nothing_are_zero() {
        let totals = InventoryTotals::tally(std::iter::empty());
        assert_eq!(totals, InventoryTotals::default());
    }
}
