//! Quantity aggregation over order line items.

use std::collections::HashMap;

use crate::order::ProductId;

/// Collapses a line-item sequence into required units per product.
///
/// A repeated product id means one more unit of that product. Pure and
/// deterministic; an empty input yields an empty map, which callers must
/// treat as an invalid order (an order needs at least one line item).
pub fn required_units(line_items: &[ProductId]) -> HashMap<ProductId, u32> {
    let mut units: HashMap<ProductId, u32> = HashMap::new();
    for product_id in line_items {
        *units.entry(product_id.clone()).or_insert(0) += 1;
    }
    units
}
