use std::fmt;

use itertools::Itertools;
use tracing::trace;

use crate::garden::{Direction, Position};
use crate::regions::{PlotArena, Region, Survey};

/// Identifies one straight fence run. Only the number of distinct ids is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SideId(usize);

impl fmt::Display for SideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Assigns side ids to fenced plot edges, one counter per run.
#[derive(Debug, Default)]
pub struct SideCounter {
    next_id: usize,
}

impl SideCounter {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh(&mut self) -> SideId {
        let id = SideId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Labels every fenced edge of `region` with a side id and returns how many
    /// distinct sides the region has.
    ///
    /// Members are visited in row-major order so a fence only ever continues
    /// the run of a member that was already resolved: the one above it for
    /// west and east fences, the one to its left for north and south fences.
    /// Slots that are already assigned are left untouched.
    pub fn count_sides(&mut self, arena: &mut PlotArena, region: &Region) -> usize {
        let mut members = region.members().to_vec();
        members.sort_unstable();

        for &position in &members {
            for direction in Direction::ALL {
                if !arena[position].fences().contains(direction) {
                    continue;
                }

                let side = match continued_side(arena, region, position, direction) {
                    Some(side) => side,
                    None => self.fresh(),
                };

                if arena[position].set_side(direction, side) {
                    trace!("{:?} fence of {} is side {}", direction, position, side);
                }
            }
        }

        distinct_sides(arena, region)
    }
}

/// The neighbor a straight run along a `direction` fence comes from when
/// scanning row-major.
fn run_predecessor(direction: Direction) -> Direction {
    match direction {
        Direction::North | Direction::South => Direction::West,
        Direction::East | Direction::West => Direction::North,
    }
}

fn continued_side(
    arena: &PlotArena,
    region: &Region,
    position: Position,
    direction: Direction,
) -> Option<SideId> {
    let previous = arena.neighbor(position, run_predecessor(direction))?;
    if !region.contains(arena, previous) {
        return None;
    }
    arena[previous].side(direction)
}

fn distinct_sides(arena: &PlotArena, region: &Region) -> usize {
    region
        .members()
        .iter()
        .flat_map(|&position| Direction::ALL.map(|direction| arena[position].side(direction)))
        .flatten()
        .unique()
        .count()
}

impl Survey {
    /// Resolves the sides of every region with a single counter, returning the
    /// side count of each region in region order.
    pub fn resolve_sides(&mut self) -> Vec<usize> {
        let mut counter = SideCounter::new();
        let mut counts = Vec::with_capacity(self.regions.len());
        for region in &self.regions {
            counts.push(counter.count_sides(&mut self.arena, region));
        }
        counts
    }
}
