pub mod error;
pub mod garden;
pub mod part1;
pub mod part2;
pub mod pricing;
pub mod regions;
pub mod sides;
