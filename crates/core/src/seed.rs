//! Demo data loaded at startup.
//!
//! Everything here is synthetic; a fresh process always starts from the same
//! catalog, listings, and notified flags.

use rust_decimal::Decimal;

use crate::catalog::Product;
use crate::marketplace::Listing;
use crate::types::{ListingId, Price, ProductId};

fn product(
    id: i32,
    name: &str,
    price: i64,
    stock: u32,
    category: &str,
    threshold: u32,
    barcode: Option<&str>,
) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_owned(),
        price: Price::from_amount(price),
        stock,
        category: category.to_owned(),
        threshold,
        barcode: barcode.map(str::to_owned),
        version: 1,
    }
}

/// The store catalog.
#[must_use]
pub fn products() -> Vec<Product> {
    vec![
        product(1, "Rice 1kg", 80, 50, "Groceries", 10, Some("8901030801234")),
        product(2, "Oil 1L", 120, 8, "Groceries", 15, Some("8901030801235")),
        product(3, "Wheat Flour 5kg", 200, 25, "Groceries", 10, Some("8901030801236")),
        product(4, "Sugar 1kg", 50, 5, "Groceries", 15, Some("8901030801237")),
        product(5, "Tea 250g", 60, 35, "Beverages", 20, Some("8901030801238")),
        product(6, "Biscuits Pack", 30, 12, "Snacks", 20, Some("8901030801239")),
        product(7, "Detergent 1kg", 80, 3, "Household", 10, None),
    ]
}

/// Products already flagged to the supplier.
#[must_use]
pub fn notified() -> Vec<ProductId> {
    vec![ProductId::new(4)]
}

#[allow(clippy::too_many_arguments)]
fn listing(
    id: i32,
    name: &str,
    description: &str,
    price: i64,
    original_price: Option<i64>,
    rating: (i64, u32),
    reviews: u32,
    category: &str,
    supplier: &str,
    in_stock: bool,
    min_order: u32,
) -> Listing {
    Listing {
        id: ListingId::new(id),
        name: name.to_owned(),
        description: description.to_owned(),
        price: Price::from_amount(price),
        original_price: original_price.map(Price::from_amount),
        rating: Decimal::new(rating.0, rating.1),
        reviews,
        category: category.to_owned(),
        supplier: supplier.to_owned(),
        in_stock,
        min_order,
    }
}

/// Supplier marketplace listings.
#[must_use]
pub fn listings() -> Vec<Listing> {
    vec![
        listing(
            1,
            "Premium Basmati Rice 25kg",
            "High quality basmati rice, perfect for retail stores",
            1800,
            Some(2000),
            (45, 1),
            128,
            "Groceries",
            "Agro Foods Ltd",
            true,
            2,
        ),
        listing(
            2,
            "Cooking Oil Combo Pack 12x1L",
            "Refined sunflower oil, bulk pack for retailers",
            1440,
            Some(1600),
            (43, 1),
            96,
            "Groceries",
            "Oil Express Co",
            true,
            1,
        ),
        listing(
            3,
            "Assorted Biscuits Box 48 packs",
            "Mixed variety biscuits, ideal for kirana stores",
            960,
            None,
            (47, 1),
            203,
            "Snacks",
            "Snack World",
            true,
            1,
        ),
        listing(
            4,
            "Tea Powder Bulk 5kg",
            "Premium tea blend for retail packaging",
            800,
            Some(900),
            (42, 1),
            67,
            "Beverages",
            "Tea Garden Direct",
            false,
            3,
        ),
        listing(
            5,
            "Sugar Wholesale 50kg",
            "Crystal white sugar, wholesale pack",
            2200,
            None,
            (46, 1),
            145,
            "Groceries",
            "Sweet Supply Co",
            true,
            1,
        ),
        listing(
            6,
            "Detergent Powder 24x1kg",
            "High-quality washing powder, bulk pack",
            1200,
            Some(1350),
            (44, 1),
            89,
            "Household",
            "Clean Home Supplies",
            true,
            2,
        ),
    ]
}
