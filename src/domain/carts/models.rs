//! Cart Models

use serde::{Deserialize, Serialize};

use crate::{
    domain::products::{Product, ProductId},
    prices::Price,
    session::OwnerKey,
};

/// One product entry in a cart with an aggregated quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub quantity: u32,
    pub image: String,
}

impl CartLine {
    fn first_of(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            price: product.price,
            quantity: 1,
            image: product.image.clone(),
        }
    }

    /// Line subtotal in minor units, saturating at the representable
    /// maximum. Prices admitted through normalisation can never reach
    /// the saturation point; only hand-crafted records can.
    #[must_use]
    pub fn line_total(&self) -> Price {
        Price::from_minor(
            self.price
                .minor_units()
                .saturating_mul(u64::from(self.quantity)),
        )
    }
}

/// Outcome of adding a product to a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The product was not in the cart; a new line was created.
    Added,

    /// The product was already in the cart; its quantity grew by one.
    QuantityIncreased,
}

/// Outcome of removing one unit of a product from a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The line had more than one unit; its quantity shrank by one.
    QuantityDecreased { title: String },

    /// The line had exactly one unit and was dropped entirely.
    LineRemoved { title: String },

    /// The product was not in the cart.
    NotPresent,
}

/// A single owner's cart with derived totals.
///
/// A cart belongs to exactly one owner for its whole life; an identity
/// change loads a different cart rather than relabelling this one. The
/// totals are recomputed from the lines after every mutation, so a cart
/// read back from storage and a cart built up in memory agree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub owner: OwnerKey,
    pub lines: Vec<CartLine>,
    pub line_count: u32,
    pub total_price: Price,
}

impl Cart {
    /// A cart with no lines, bound to `owner`.
    #[must_use]
    pub fn empty_for(owner: OwnerKey) -> Self {
        Self {
            owner,
            lines: Vec::new(),
            line_count: 0,
            total_price: Price::ZERO,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add one unit of `product`. Quantities aggregate onto an existing
    /// line; there is no multi-quantity add.
    pub(crate) fn add(&mut self, product: &Product) -> AddOutcome {
        let outcome = match self.lines.iter_mut().find(|line| line.id == product.id) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(1);
                AddOutcome::QuantityIncreased
            }
            None => {
                self.lines.push(CartLine::first_of(product));
                AddOutcome::Added
            }
        };

        self.recalculate();

        outcome
    }

    /// Remove one unit of the product with `id`, dropping the line when
    /// its quantity reaches zero.
    pub(crate) fn remove(&mut self, id: &ProductId) -> RemoveOutcome {
        let Some(index) = self.lines.iter().position(|line| &line.id == id) else {
            return RemoveOutcome::NotPresent;
        };

        let outcome = if self.lines[index].quantity > 1 {
            self.lines[index].quantity -= 1;
            RemoveOutcome::QuantityDecreased {
                title: self.lines[index].title.clone(),
            }
        } else {
            let line = self.lines.remove(index);
            RemoveOutcome::LineRemoved { title: line.title }
        };

        self.recalculate();

        outcome
    }

    fn recalculate(&mut self) {
        self.line_count = self
            .lines
            .iter()
            .map(|line| line.quantity)
            .fold(0, u32::saturating_add);
        self.total_price = Price::from_minor(
            self.lines
                .iter()
                .map(|line| line.line_total().minor_units())
                .fold(0, u64::saturating_add),
        );
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn product(id: &str, title: &str, minor: u64) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            price: Price::from_minor(minor),
            image: "/p.jpg".to_string(),
        }
    }

    #[test]
    fn adding_a_new_product_creates_a_line() {
        let mut cart = Cart::empty_for(OwnerKey::Guest);

        let outcome = cart.add(&product("p1", "Chai", 4999));

        assert_eq!(outcome, AddOutcome::Added);
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 1);
        assert_eq!(cart.line_count, 1);
        assert_eq!(cart.total_price, Price::from_minor(4999));
    }

    #[test]
    fn adding_an_existing_product_increments_its_quantity() {
        let mut cart = Cart::empty_for(OwnerKey::Guest);
        let chai = product("p1", "Chai", 4999);

        cart.add(&chai);
        let outcome = cart.add(&chai);

        assert_eq!(outcome, AddOutcome::QuantityIncreased);
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 2);
        assert_eq!(cart.line_count, 2);
        assert_eq!(cart.total_price, Price::from_minor(9998));
    }

    #[test]
    fn removing_decrements_before_dropping_the_line() {
        let mut cart = Cart::empty_for(OwnerKey::Guest);
        let chai = product("p1", "Chai", 4999);
        cart.add(&chai);
        cart.add(&chai);

        let first = cart.remove(&chai.id);

        assert_eq!(
            first,
            RemoveOutcome::QuantityDecreased {
                title: "Chai".to_string()
            }
        );
        assert_eq!(cart.lines[0].quantity, 1);

        let second = cart.remove(&chai.id);

        assert_eq!(
            second,
            RemoveOutcome::LineRemoved {
                title: "Chai".to_string()
            }
        );
        assert!(cart.is_empty());
        assert_eq!(cart.line_count, 0);
        assert_eq!(cart.total_price, Price::ZERO);
    }

    #[test]
    fn removing_an_absent_product_is_a_no_op() {
        let mut cart = Cart::empty_for(OwnerKey::Guest);
        cart.add(&product("p1", "Chai", 4999));

        let outcome = cart.remove(&ProductId::new("p9"));

        assert_eq!(outcome, RemoveOutcome::NotPresent);
        assert_eq!(cart.line_count, 1);
    }

    #[test]
    fn totals_aggregate_across_lines() {
        let mut cart = Cart::empty_for(OwnerKey::Guest);
        cart.add(&product("p1", "Chai", 100));
        cart.add(&product("p1", "Chai", 100));
        cart.add(&product("p2", "Oolong", 250));

        assert_eq!(cart.line_count, 3);
        assert_eq!(cart.total_price, Price::from_minor(450));
    }

    #[test]
    fn totals_saturate_rather_than_overflow() {
        let mut cart = Cart::empty_for(OwnerKey::Guest);
        let ingot = product("p1", "Ingot", u64::MAX);

        cart.add(&ingot);
        cart.add(&ingot);

        assert_eq!(cart.lines[0].quantity, 2);
        assert_eq!(cart.line_count, 2);
        assert_eq!(cart.lines[0].line_total(), Price::from_minor(u64::MAX));
        assert_eq!(cart.total_price, Price::from_minor(u64::MAX));
    }

    #[test]
    fn serialises_with_camel_case_totals() -> TestResult {
        let mut cart = Cart::empty_for(OwnerKey::Guest);
        cart.add(&product("p1", "Chai", 4999));

        let value = serde_json::to_value(&cart)?;

        assert_eq!(value["owner"], "guest");
        assert_eq!(value["lineCount"], 1);
        assert_eq!(value["totalPrice"], 4999);
        assert_eq!(value["lines"][0]["id"], "p1");
        assert_eq!(value["lines"][0]["quantity"], 1);

        Ok(())
    }
}
