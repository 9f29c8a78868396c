//! What the storefront pages show, derived from the cart and the catalog.
//!
//! Views only read through [`CartClient`](crate::clients::CartClient) and
//! dispatch its operations; they never change the cart themselves.

pub mod cart_page;
pub mod header;
pub mod home;

pub use cart_page::{CartLine, CartPage, CartSummary};
pub use header::Header;
pub use home::{HomePage, ProductListing};

/// `219.9` → `"$219.90"`
pub fn format_price(value: f64) -> String {
    format!("${value:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prices_have_two_decimals() {
        assert_eq!(format_price(219.9), "$219.90");
        assert_eq!(format_price(48.0), "$48.00");
        assert_eq!(format_price(0.0), "$0.00");
    }
}
