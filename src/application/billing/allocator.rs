//! Progressive tier allocation
//!
//! Splits a consumption quantity across ascending price brackets the way
//! income is split across tax brackets. Units are counted by ordinal: with
//! `position` units already billed this year, the next unit is
//! `position + 1`, so a `1-100` (or `0-100`) bracket holds exactly 100 units.
//!
//! Pure function, no I/O.

use rust_decimal::Decimal;

use crate::domain::billing::ConsumptionBreakdownLine;
use crate::domain::tariff::TariffTier;
use crate::shared::money::round_money;

/// Result of splitting consumption over a tier table
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub lines: Vec<ConsumptionBreakdownLine>,
    /// Units past the end of the tier table, billed at the last tier's rate
    pub overflow_units: Decimal,
    /// Units that could not be billed at all (empty tier table)
    pub unbilled_units: Decimal,
}

impl Allocation {
    /// Unrounded sum of line amounts.
    pub fn raw_amount(&self) -> Decimal {
        self.lines.iter().map(|l| l.amount).sum()
    }

    /// Sum of line amounts rounded once.
    pub fn consumption_amount(&self) -> Decimal {
        round_money(self.raw_amount())
    }

    pub fn allocated_units(&self) -> Decimal {
        self.lines.iter().map(|l| l.units_in_tier).sum()
    }
}

/// Distribute `consumption` over `tiers` (ascending by `from_unit`),
/// starting after `cumulative_offset` units already billed.
pub fn allocate(
    consumption: Decimal,
    tiers: &[TariffTier],
    cumulative_offset: Decimal,
) -> Allocation {
    let mut lines = Vec::new();
    let mut remaining = consumption.max(Decimal::ZERO);
    let mut position = cumulative_offset.max(Decimal::ZERO);

    for tier in tiers {
        if remaining <= Decimal::ZERO {
            break;
        }

        let tier_start = tier.from_unit.max(position + Decimal::ONE);
        let units = match tier.to_unit {
            Some(to_unit) => {
                if tier_start > to_unit {
                    // Exhausted by earlier consumption this year
                    continue;
                }
                remaining.min(to_unit - tier_start + Decimal::ONE)
            }
            None => remaining,
        };

        if units > Decimal::ZERO {
            lines.push(ConsumptionBreakdownLine::new(
                tier.label.clone(),
                units,
                tier.price_per_unit,
            ));
        }

        remaining -= units;
        position += units;
    }

    let mut overflow_units = Decimal::ZERO;
    let mut unbilled_units = Decimal::ZERO;

    if remaining > Decimal::ZERO {
        match tiers.last() {
            Some(last) => {
                let mut line = ConsumptionBreakdownLine::new(
                    format!("{} (overflow)", last.label),
                    remaining,
                    last.price_per_unit,
                );
                line.overflow = true;
                lines.push(line);
                overflow_units = remaining;
            }
            None => unbilled_units = remaining,
        }
    }

    Allocation {
        lines,
        overflow_units,
        unbilled_units,
    }
}
