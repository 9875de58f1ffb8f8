//! Storefront catalog types and the listing API they come from.
//!
//! ### Listing API
//! - One JSON document per (category, page); pages are numbered from 1.
//! - `items` holds the products on the page; a missing or null list counts
//!   as empty.
//! - `next_page` is read with loose truthiness: `false`, `null`, `0`, `""`,
//!   `[]`, `{}` and an absent field all end the walk.
//!
//! ### Products
//! - Serialized with the report keys `Name`, `Price`, `Discounted Price`
//!   and `Link`; every key is always present.
//! - Field values are passed through as the API sent them, whatever their
//!   JSON type.
//! - A discounted price equal to the price is dropped to `null`.

pub mod collect;

pub use collect::PaginationCollector;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A product grouping on the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Opaque id passed to the listing API.
    pub id: String,
    /// Display name shown on the storefront.
    pub name: String,
}

/// One product as it appears in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "Name")]
    pub name: Option<Value>,
    #[serde(rename = "Price")]
    pub price: Option<Value>,
    #[serde(rename = "Discounted Price")]
    pub discounted_price: Option<Value>,
    #[serde(rename = "Link")]
    pub link: Option<Value>,
}

/// Raw page from the listing API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingPage {
    #[serde(default)]
    pub items: Option<Vec<ListingItem>>,
    #[serde(default)]
    pub next_page: Value,
}

/// Raw item from the listing API. Fields other than these four are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingItem {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub discounted_price: Option<Value>,
    #[serde(default)]
    pub link: Option<Value>,
}

impl ListingPage {
    /// Parse a listing response body.
    pub fn parse(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// Whether the API reports another page after this one.
    pub fn has_next_page(&self) -> bool {
        is_truthy(&self.next_page)
    }

    /// Products on this page, in API order.
    pub fn into_products(self) -> Vec<Product> {
        self.items.unwrap_or_default().into_iter().map(Product::from).collect()
    }
}

impl From<ListingItem> for Product {
    fn from(item: ListingItem) -> Self {
        let discounted_price = match (&item.discounted_price, &item.price) {
            (Some(discounted), Some(price)) if same_price(discounted, price) => None,
            _ => item.discounted_price,
        };

        Product { name: item.name, price: item.price, discounted_price, link: item.link }
    }
}

/// Loose truthiness for JSON values: empty and zero-like values are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

// 100 and 100.0 are the same price; "100" and 100 are not.
fn same_price(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y || x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}
