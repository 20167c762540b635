use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// What the tier bounds are measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierBasis {
    /// Number of selected products.
    SelectionCount,
    /// Pre-discount subtotal.
    SubtotalAmount,
}

impl TierBasis {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "count" | "selection_count" | "items" => Some(Self::SelectionCount),
            "amount" | "subtotal" | "subtotal_amount" => Some(Self::SubtotalAmount),
            _ => None,
        }
    }
}

/// One discount band. `max` is inclusive; `None` means open-ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountTier {
    pub min: Decimal,
    pub max: Option<Decimal>,
    pub percentage: Decimal,
}

impl DiscountTier {
    pub fn new(min: Decimal, max: Option<Decimal>, percentage: Decimal) -> Self {
        Self {
            min,
            max,
            percentage,
        }
    }

    /// Bounds are whole units, so a fractional measure up to the next tier's
    /// `min` still belongs to this tier.
    pub fn contains(&self, measure: Decimal) -> bool {
        measure >= self.min
            && self
                .max
                .map(|max| measure < max + Decimal::ONE)
                .unwrap_or(true)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TierTableError {
    #[error("discount table needs at least one tier")]
    Empty,
    #[error("first tier must start at 0, starts at {0}")]
    DoesNotStartAtZero(Decimal),
    #[error("tier {index} starts at {min}, expected {expected}")]
    Gap {
        index: usize,
        min: Decimal,
        expected: Decimal,
    },
    #[error("tier {index} has max {max} below min {min}")]
    Inverted {
        index: usize,
        min: Decimal,
        max: Decimal,
    },
    #[error("only the last tier may be open-ended (tier {0} is not last)")]
    OpenEndedBeforeLast(usize),
    #[error("last tier must be open-ended")]
    BoundedTop,
    #[error("tier {index} percentage {percentage} is outside 0..=100")]
    InvalidPercentage { index: usize, percentage: Decimal },
}

/// Ordered, gap-free discount schedule. Exactly one tier matches any
/// non-negative measure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscountTable {
    basis: TierBasis,
    tiers: Vec<DiscountTier>,
}

impl DiscountTable {
    pub fn new(basis: TierBasis, tiers: Vec<DiscountTier>) -> Result<Self, TierTableError> {
        let first = tiers.first().ok_or(TierTableError::Empty)?;
        if first.min != Decimal::ZERO {
            return Err(TierTableError::DoesNotStartAtZero(first.min));
        }

        let last_index = tiers.len() - 1;
        for (index, tier) in tiers.iter().enumerate() {
            if tier.percentage < Decimal::ZERO || tier.percentage > Decimal::ONE_HUNDRED {
                return Err(TierTableError::InvalidPercentage {
                    index,
                    percentage: tier.percentage,
                });
            }

            match tier.max {
                Some(max) if max < tier.min => {
                    return Err(TierTableError::Inverted {
                        index,
                        min: tier.min,
                        max,
                    })
                }
                Some(max) => {
                    if index == last_index {
                        return Err(TierTableError::BoundedTop);
                    }
                    let expected = max + Decimal::ONE;
                    let next_min = tiers[index + 1].min;
                    if next_min != expected {
                        return Err(TierTableError::Gap {
                            index: index + 1,
                            min: next_min,
                            expected,
                        });
                    }
                }
                None if index != last_index => {
                    return Err(TierTableError::OpenEndedBeforeLast(index))
                }
                None => {}
            }
        }

        Ok(Self { basis, tiers })
    }

    /// Storefront schedule: 0/10/15/20/25/30 % in bands of 50.
    pub fn reference(basis: TierBasis) -> Self {
        let tiers = vec![
            DiscountTier::new(dec!(0), Some(dec!(49)), dec!(0)),
            DiscountTier::new(dec!(50), Some(dec!(99)), dec!(10)),
            DiscountTier::new(dec!(100), Some(dec!(149)), dec!(15)),
            DiscountTier::new(dec!(150), Some(dec!(199)), dec!(20)),
            DiscountTier::new(dec!(200), Some(dec!(249)), dec!(25)),
            DiscountTier::new(dec!(250), None, dec!(30)),
        ];
        Self { basis, tiers }
    }

    pub fn basis(&self) -> TierBasis {
        self.basis
    }

    pub fn tiers(&self) -> &[DiscountTier] {
        &self.tiers
    }

    /// First tier, in ascending order, whose range holds `measure`.
    pub fn tier_for(&self, measure: Decimal) -> Option<&DiscountTier> {
        self.tiers.iter().find(|tier| tier.contains(measure))
    }

    /// Discount rate for a selection; negative measures get no discount.
    pub fn percentage_for(&self, selection_count: usize, subtotal: Decimal) -> Decimal {
        let measure = match self.basis {
            TierBasis::SelectionCount => Decimal::from(selection_count as u64),
            TierBasis::SubtotalAmount => subtotal,
        };
        self.tier_for(measure)
            .map(|tier| tier.percentage)
            .unwrap_or(Decimal::ZERO)
    }
}
