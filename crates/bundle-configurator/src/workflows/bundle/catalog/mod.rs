//! Product catalog: immutable, ordered, looked up by id.

mod import;
pub mod reference;

pub use import::{CatalogImportError, CatalogImporter};

use std::collections::HashSet;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Catalog identifier for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Merchandising tag attached to each product.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProductCategory {
    Premium,
    Course,
    Tools,
    Effects,
    Animations,
    Other(String),
}

impl ProductCategory {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "premium" => Self::Premium,
            "course" => Self::Course,
            "tools" => Self::Tools,
            "effects" => Self::Effects,
            "animations" => Self::Animations,
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Premium => "premium",
            Self::Course => "course",
            Self::Tools => "tools",
            Self::Effects => "effects",
            Self::Animations => "animations",
            Self::Other(tag) => tag.as_str(),
        }
    }
}

impl Serialize for ProductCategory {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ProductCategory {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Immutable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category: ProductCategory,
}

/// Ordered product table. Construction guarantees unique ids and price ids and
/// strictly positive prices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut ids = HashSet::new();
        let mut price_ids = HashSet::new();

        for product in &products {
            if !ids.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
            if !price_ids.insert(product.price_id.as_str()) {
                return Err(CatalogError::DuplicatePriceId(product.price_id.clone()));
            }
            if product.price <= Decimal::ZERO {
                return Err(CatalogError::NonPositivePrice(product.id));
            }
            if product.name.trim().is_empty() {
                return Err(CatalogError::MissingName(product.id));
            }
        }

        Ok(Self { products })
    }

    /// The compiled-in storefront catalog.
    pub fn reference() -> Self {
        Self {
            products: reference::products(),
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.products.iter().map(|product| product.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("product id {0} appears more than once")]
    DuplicateId(ProductId),
    #[error("price id '{0}' appears more than once")]
    DuplicatePriceId(String),
    #[error("product {0} must have a positive price")]
    NonPositivePrice(ProductId),
    #[error("product {0} has no name")]
    MissingName(ProductId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product(id: u32, price_id: &str, price: Decimal) -> Product {
        Product {
            id: ProductId(id),
            name: format!("Product {id}"),
            price_id: price_id.to_string(),
            price,
            category: ProductCategory::Effects,
        }
    }

    #[test]
    fn reference_catalog_is_valid_and_ordered() {
        let catalog = Catalog::reference();
        let rebuilt = Catalog::new(catalog.products().to_vec()).expect("reference catalog valid");
        assert_eq!(rebuilt.len(), 36);
        let ids: Vec<u32> = rebuilt.ids().map(|id| id.0).collect();
        assert_eq!(ids, (1..=36).collect::<Vec<_>>());
        assert_eq!(
            rebuilt.get(ProductId(1)).map(|p| p.price),
            Some(dec!(99))
        );
    }

    #[test]
    fn rejects_duplicate_ids_and_price_ids() {
        let err = Catalog::new(vec![
            product(1, "price_a", dec!(5)),
            product(1, "price_b", dec!(5)),
        ])
        .expect_err("duplicate id");
        assert_eq!(err, CatalogError::DuplicateId(ProductId(1)));

        let err = Catalog::new(vec![
            product(1, "price_a", dec!(5)),
            product(2, "price_a", dec!(5)),
        ])
        .expect_err("duplicate price id");
        assert_eq!(err, CatalogError::DuplicatePriceId("price_a".to_string()));
    }

    #[test]
    fn rejects_free_products() {
        let err = Catalog::new(vec![product(3, "price_c", Decimal::ZERO)]).expect_err("zero price");
        assert_eq!(err, CatalogError::NonPositivePrice(ProductId(3)));
    }

    #[test]
    fn unknown_categories_are_preserved() {
        let category = ProductCategory::parse("Bundles");
        assert_eq!(category, ProductCategory::Other("Bundles".to_string()));
        assert_eq!(category.label(), "Bundles");
        assert_eq!(ProductCategory::parse(" Effects "), ProductCategory::Effects);
    }
}
