use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use super::{Catalog, CatalogError, Product, ProductCategory, ProductId};

#[derive(Debug)]
pub enum CatalogImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidPrice { row: usize, value: String },
    Catalog(CatalogError),
    Empty,
}

impl std::fmt::Display for CatalogImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogImportError::Io(err) => write!(f, "failed to read catalog file: {}", err),
            CatalogImportError::Csv(err) => write!(f, "invalid catalog CSV data: {}", err),
            CatalogImportError::InvalidPrice { row, value } => {
                write!(f, "row {}: '{}' is not a valid price", row, value)
            }
            CatalogImportError::Catalog(err) => write!(f, "catalog rejected: {}", err),
            CatalogImportError::Empty => write!(f, "catalog file contains no products"),
        }
    }
}

impl std::error::Error for CatalogImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogImportError::Io(err) => Some(err),
            CatalogImportError::Csv(err) => Some(err),
            CatalogImportError::Catalog(err) => Some(err),
            CatalogImportError::InvalidPrice { .. } | CatalogImportError::Empty => None,
        }
    }
}

impl From<std::io::Error> for CatalogImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CatalogImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<CatalogError> for CatalogImportError {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(err)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: u32,
    name: String,
    price_id: String,
    price: String,
    #[serde(default)]
    category: String,
}

/// Loads a replacement catalog from a CSV export with the header
/// `id,name,price_id,price,category`. Row order becomes catalog order.
pub struct CatalogImporter;

impl CatalogImporter {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Catalog, CatalogImportError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Catalog, CatalogImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut products = Vec::new();
        for (index, row) in csv_reader.deserialize::<CatalogRow>().enumerate() {
            let row = row?;
            // header is line 1
            let line = index + 2;
            let price = Decimal::from_str(&row.price).map_err(|_| {
                CatalogImportError::InvalidPrice {
                    row: line,
                    value: row.price.clone(),
                }
            })?;

            products.push(Product {
                id: ProductId(row.id),
                name: row.name,
                price_id: row.price_id,
                price,
                category: ProductCategory::parse(&row.category),
            });
        }

        if products.is_empty() {
            return Err(CatalogImportError::Empty);
        }

        Ok(Catalog::new(products)?)
    }
}
