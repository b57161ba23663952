use miette::Result;

use crate::{garden::Garden, pricing::appraise};

/// Total fencing price: the sum of area times perimeter over every region.
#[tracing::instrument]
pub fn process(input: &str) -> Result<String> {
    let garden = Garden::parse(input)?;
    let appraisal = appraise(&garden);
    Ok(appraisal.total_price.to_string())
}
