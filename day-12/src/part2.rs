use miette::Result;

use crate::{garden::Garden, pricing::appraise};

/// Total fencing price with the bulk discount: area times number of sides.
#[tracing::instrument]
pub fn process(input: &str) -> Result<String> {
    let garden = Garden::parse(input)?;
    let appraisal = appraise(&garden);
    Ok(appraisal.total_bulk_price.to_string())
}
