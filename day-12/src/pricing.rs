use std::fmt;

use tracing::{debug, info};

use crate::garden::Garden;
use crate::regions::{extract, RegionId};

/// Measurements of one region and what fencing it costs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionReport {
    pub id: RegionId,
    pub value: char,
    pub size: usize,
    pub perimeter: usize,
    pub sides: usize,
}

impl RegionReport {
    pub fn price(&self) -> usize {
        self.size * self.perimeter
    }

    /// Price with the bulk discount, charging per straight side instead of per fence.
    pub fn bulk_price(&self) -> usize {
        self.size * self.sides
    }
}

impl fmt::Display for RegionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "region {} '{}': size {}, perimeter {}, price {}, sides {}, bulk price {}",
            self.id,
            self.value,
            self.size,
            self.perimeter,
            self.price(),
            self.sides,
            self.bulk_price()
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Appraisal {
    pub regions: Vec<RegionReport>,
    pub total_price: usize,
    pub total_bulk_price: usize,
}

/// Extracts every region of the garden, resolves its sides, and prices it.
#[tracing::instrument(skip_all, fields(plots = garden.len()))]
pub fn appraise(garden: &Garden) -> Appraisal {
    let mut survey = extract(garden);
    let side_counts = survey.resolve_sides();

    let reports = survey
        .regions()
        .iter()
        .zip(side_counts)
        .map(|(region, sides)| RegionReport {
            id: region.id(),
            value: region.value(),
            size: region.size(),
            perimeter: region.perimeter(survey.arena()),
            sides,
        })
        .collect::<Vec<_>>();

    for (region, report) in survey.regions().iter().zip(&reports) {
        debug!("{}", report);
        debug!("region {} plots:\n{}", region.id(), region.dump(survey.arena()));
    }

    let appraisal = price_regions(reports);
    info!(
        total_price = appraisal.total_price,
        total_bulk_price = appraisal.total_bulk_price,
        "appraised {} regions",
        appraisal.regions.len()
    );
    appraisal
}

pub fn price_regions(regions: Vec<RegionReport>) -> Appraisal {
    let (total_price, total_bulk_price) = regions
        .iter()
        .fold((0, 0), |(price, bulk), region| {
            (price + region.price(), bulk + region.bulk_price())
        });

    Appraisal {
        regions,
        total_price,
        total_bulk_price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "AAAA
BBCD
BBCC
EEEC";

    #[test]
    fn test_appraise_example() -> miette::Result<()> {
        let garden = Garden::parse(EXAMPLE)?;
        let appraisal = appraise(&garden);

        assert_eq!(5, appraisal.regions.len());
        assert_eq!(140, appraisal.total_price);
        assert_eq!(80, appraisal.total_bulk_price);

        let c = &appraisal.regions[2];
        assert_eq!('C', c.value);
        assert_eq!(40, c.price());
        assert_eq!(32, c.bulk_price());
        Ok(())
    }

    #[test]
    fn test_appraise_is_repeatable() -> miette::Result<()> {
        let garden = Garden::parse(
            "AAAAAA
AAABBA
AAABBA
ABBAAA
ABBAAA
AAAAAA",
        )?;
        let first = appraise(&garden);
        let second = appraise(&garden);

        assert_eq!(first, second);
        assert_eq!(1184, first.total_price);
        assert_eq!(368, first.total_bulk_price);
        Ok(())
    }

    #[test]
    fn test_price_no_regions() {
        let appraisal = price_regions(Vec::new());
        assert_eq!(Appraisal::default(), appraisal);
    }

    #[test]
    fn test_report_display() -> miette::Result<()> {
        let garden = Garden::parse(EXAMPLE)?;
        let appraisal = appraise(&garden);

        assert_eq!(
            "region 2 'C': size 4, perimeter 10, price 40, sides 8, bulk price 32",
            appraisal.regions[2].to_string()
        );
        Ok(())
    }
}
