//! Supplier marketplace: bulk listings the store can reorder from.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartItem};
use crate::types::{ListingId, Price};

/// Category filter value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";

/// A supplier's bulk offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: ListingId,
    pub name: String,
    pub description: String,
    pub price: Price,
    /// Pre-discount price, when the listing is on offer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    pub rating: Decimal,
    pub reviews: u32,
    pub category: String,
    pub supplier: String,
    pub in_stock: bool,
    /// Quantity placed in the cart on the first add.
    pub min_order: u32,
}

impl Listing {
    /// Discount against the original price, when there is one.
    #[must_use]
    pub fn savings(&self) -> Option<Price> {
        self.original_price
            .filter(|original| original.amount > self.price.amount)
            .and_then(|original| {
                let amount = original.amount.checked_sub(self.price.amount)?;
                Some(Price::new(amount, original.currency_code))
            })
    }
}

impl CartItem for Listing {
    type Id = ListingId;

    fn id(&self) -> ListingId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn unit_price(&self) -> Price {
        self.price
    }

    /// Suppliers do not publish quantities: in-stock listings are unbounded,
    /// out-of-stock listings cannot be ordered at all.
    fn available(&self) -> Option<u32> {
        if self.in_stock { None } else { Some(0) }
    }
}

/// Search and category filter for the marketplace grid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingFilter {
    /// Matched case-insensitively against name and description.
    #[serde(default)]
    pub q: Option<String>,
    /// Exact category, or `all` / absent for every category.
    #[serde(default)]
    pub category: Option<String>,
}

impl ListingFilter {
    #[must_use]
    pub fn matches(&self, listing: &Listing) -> bool {
        let needle = self.q.as_deref().unwrap_or("").trim().to_lowercase();
        let matches_search = listing.name.to_lowercase().contains(&needle)
            || listing.description.to_lowercase().contains(&needle);

        let matches_category = match self.category.as_deref() {
            None | Some(ALL_CATEGORIES) => true,
            Some(category) => listing.category == category,
        };

        matches_search && matches_category
    }

    #[must_use]
    pub fn apply<'a>(&self, listings: &'a [Listing]) -> Vec<&'a Listing> {
        listings.iter().filter(|l| self.matches(l)).collect()
    }
}

/// Category choices: `all` followed by each distinct category in the order
/// first seen.
#[must_use]
pub fn categories(listings: &[Listing]) -> Vec<String> {
    let mut out = vec![ALL_CATEGORIES.to_owned()];
    for listing in listings {
        if !out.iter().any(|c| c == &listing.category) {
            out.push(listing.category.clone());
        }
    }
    out
}

/// Units to add when the user clicks "add" on a listing: the minimum order
/// the first time, then one at a time.
#[must_use]
pub fn quantity_to_add(cart: &Cart<Listing>, listing: &Listing) -> u32 {
    if cart.contains(listing.id) {
        1
    } else {
        listing.min_order.max(1)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::CartError;
    use crate::seed;

    fn listing(id: i32) -> Listing {
        seed::listings()
            .into_iter()
            .find(|l| l.id == ListingId::new(id))
            .unwrap()
    }

    #[test]
    fn test_first_add_uses_min_order_then_one() {
        let rice = listing(1);
        assert_eq!(rice.min_order, 2);

        let mut cart = Cart::new();
        let qty = quantity_to_add(&cart, &rice);
        assert_eq!(cart.add_item(&rice, qty).unwrap(), 2);
        let qty = quantity_to_add(&cart, &rice);
        assert_eq!(cart.add_item(&rice, qty).unwrap(), 3);
        assert_eq!(cart.total().unwrap().amount, Decimal::from(1800 * 3));
    }

    #[test]
    fn test_out_of_stock_listing_rejected() {
        let tea = listing(4);
        assert!(!tea.in_stock);
        let mut cart = Cart::new();
        let qty = quantity_to_add(&cart, &tea);
        assert!(matches!(
            cart.add_item(&tea, qty),
            Err(CartError::InsufficientStock { .. })
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_filter_by_search_and_category() {
        let listings = seed::listings();
        let filter = ListingFilter {
            q: Some("BULK".to_string()),
            category: Some("Groceries".to_string()),
        };
        let names: Vec<_> = filter.apply(&listings).iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Cooking Oil Combo Pack 12x1L"]);

        let everything = ListingFilter {
            q: None,
            category: Some(ALL_CATEGORIES.to_string()),
        };
        assert_eq!(everything.apply(&listings).len(), listings.len());
    }

    #[test]
    fn test_description_matches() {
        let listings = seed::listings();
        let filter = ListingFilter {
            q: Some("kirana".to_string()),
            category: None,
        };
        let hits = filter.apply(&listings);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, ListingId::new(3));
    }

    #[test]
    fn test_categories_first_seen_order() {
        assert_eq!(
            categories(&seed::listings()),
            vec!["all", "Groceries", "Snacks", "Beverages", "Household"]
        );
    }

    #[test]
    fn test_savings() {
        assert_eq!(listing(1).savings().unwrap().amount, Decimal::from(200));
        assert!(listing(3).savings().is_none());
    }
}
