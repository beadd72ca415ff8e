//! Shopping list aggregation.
//!
//! Every ingredient row of every recipe in a user's cart is folded into one
//! line per ingredient, keyed by `(name, measurement_unit)`. The catalog
//! enforces that pair as unique, so it is the ingredient identity.

use std::collections::BTreeMap;
use std::fmt::Write as _;

/// File name offered in the `Content-Disposition` header.
pub const FILE_NAME: &str = "shopping_list.txt";

/// First line of every rendered shopping list, present even when the cart is empty.
pub const HEADER: &str = "Shopping list:";

/// One ingredient row of one recipe in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// One aggregated line of the shopping list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingItem {
    pub name: String,
    pub measurement_unit: String,
    pub total: u64,
}

/// Sum amounts per ingredient. Output is ordered by name, then unit.
///
/// Amounts are bounded positive integers; anything non-positive is ignored
/// rather than subtracted.
pub fn aggregate<I>(lines: I) -> Vec<ShoppingItem>
where
    I: IntoIterator<Item = CartLine>,
{
    let mut totals: BTreeMap<(String, String), u64> = BTreeMap::new();
    for line in lines {
        let amount = u64::try_from(line.amount).unwrap_or(0);
        *totals
            .entry((line.name, line.measurement_unit))
            .or_default() += amount;
    }
    totals
        .into_iter()
        .map(|((name, measurement_unit), total)| ShoppingItem {
            name,
            measurement_unit,
            total,
        })
        .collect()
}

/// Render the list as newline-terminated text: the header, then
/// `<name> - <total>, <unit>` per item.
pub fn render(items: &[ShoppingItem]) -> String {
    let mut out = String::with_capacity(HEADER.len() + 1 + items.len() * 32);
    out.push_str(HEADER);
    out.push('\n');
    for item in items {
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "{} - {}, {}",
            item.name, item.total, item.measurement_unit
        );
    }
    out
}
