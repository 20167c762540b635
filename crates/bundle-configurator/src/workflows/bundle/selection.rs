use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::catalog::{reference, Catalog, Product, ProductId};

/// The primary product hides a fixed set of other products while it is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusivityRule {
    pub primary: ProductId,
    pub excluded: BTreeSet<ProductId>,
}

impl ExclusivityRule {
    pub fn new(primary: ProductId, excluded: impl IntoIterator<Item = ProductId>) -> Self {
        let mut excluded: BTreeSet<ProductId> = excluded.into_iter().collect();
        // the primary can never suppress itself
        excluded.remove(&primary);
        Self { primary, excluded }
    }

    pub fn reference() -> Self {
        Self::new(
            reference::PRIMARY_PRODUCT,
            reference::disabled_when_primary_selected(),
        )
    }

    pub fn is_excluded(&self, id: ProductId) -> bool {
        self.excluded.contains(&id)
    }

    pub fn is_active(&self, selected: &[ProductId]) -> bool {
        selected.contains(&self.primary)
    }

    /// Whether `id` may currently be selected.
    pub fn permits(&self, selected: &[ProductId], id: ProductId) -> bool {
        !(self.is_active(selected) && self.is_excluded(id))
    }
}

/// Rejected selection changes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("product {0} is not in the catalog")]
    UnknownProduct(ProductId),
    #[error("product {id} is unavailable while product {primary} is selected")]
    InvalidSelection { id: ProductId, primary: ProductId },
    #[error("product {0} is selected more than once")]
    Duplicate(ProductId),
}

/// Ordered set of selected product ids; the order is the order the customer
/// picked them in and becomes the line-item sequence on submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelectionState {
    ids: Vec<ProductId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a selection from untrusted input, enforcing catalog membership,
    /// uniqueness and exclusivity.
    pub fn from_ids(
        ids: impl IntoIterator<Item = ProductId>,
        catalog: &Catalog,
        rule: &ExclusivityRule,
    ) -> Result<Self, SelectionError> {
        let ids: Vec<ProductId> = ids.into_iter().collect();
        let mut seen = BTreeSet::new();

        for &id in &ids {
            if !catalog.contains(id) {
                return Err(SelectionError::UnknownProduct(id));
            }
            if !seen.insert(id) {
                return Err(SelectionError::Duplicate(id));
            }
            if !rule.permits(&ids, id) {
                return Err(SelectionError::InvalidSelection {
                    id,
                    primary: rule.primary,
                });
            }
        }

        Ok(Self { ids })
    }

    pub fn ids(&self) -> &[ProductId] {
        &self.ids
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn as_set(&self) -> BTreeSet<ProductId> {
        self.ids.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Returns the selection after toggling `id`.
    ///
    /// Deselecting never has side effects. Selecting the primary product puts
    /// it first and purges every excluded id in the same step.
    pub fn toggled(
        &self,
        id: ProductId,
        catalog: &Catalog,
        rule: &ExclusivityRule,
    ) -> Result<Self, SelectionError> {
        if self.contains(id) {
            return Ok(Self {
                ids: self.ids.iter().copied().filter(|&other| other != id).collect(),
            });
        }

        if !catalog.contains(id) {
            return Err(SelectionError::UnknownProduct(id));
        }

        if !rule.permits(&self.ids, id) {
            return Err(SelectionError::InvalidSelection {
                id,
                primary: rule.primary,
            });
        }

        let ids = if id == rule.primary {
            std::iter::once(id)
                .chain(
                    self.ids
                        .iter()
                        .copied()
                        .filter(|&other| !rule.is_excluded(other)),
                )
                .collect()
        } else {
            let mut ids = self.ids.clone();
            ids.push(id);
            ids
        };

        Ok(Self { ids })
    }

    pub fn toggle(
        &mut self,
        id: ProductId,
        catalog: &Catalog,
        rule: &ExclusivityRule,
    ) -> Result<(), SelectionError> {
        *self = self.toggled(id, catalog, rule)?;
        Ok(())
    }
}

/// Catalog entries the customer may pick given the current selection.
pub fn available_products<'a>(
    catalog: &'a Catalog,
    rule: &ExclusivityRule,
    selected: &[ProductId],
) -> Vec<&'a Product> {
    catalog
        .products()
        .iter()
        .filter(|product| rule.permits(selected, product.id))
        .collect()
}
