use std::fmt;
use std::ops::{Index, IndexMut};

use itertools::Itertools;
use tracing::{debug, info};

use crate::garden::{Direction, Garden, Position};
use crate::sides::SideId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(usize);

impl RegionId {
    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The directions in which a plot borders another region or the map edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fences([bool; 4]);

impl Fences {
    pub fn contains(&self, direction: Direction) -> bool {
        self.0[direction.index()]
    }

    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&fenced| fenced).count()
    }

    fn insert(&mut self, direction: Direction) {
        self.0[direction.index()] = true;
    }
}

/// Per-plot state filled in by region extraction and side resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plot {
    value: char,
    region: Option<RegionId>,
    fences: Fences,
    sides: [Option<SideId>; 4],
}

impl Plot {
    fn new(value: char) -> Self {
        Self {
            value,
            region: None,
            fences: Fences::default(),
            sides: [None; 4],
        }
    }

    pub fn value(&self) -> char {
        self.value
    }

    pub fn region(&self) -> Option<RegionId> {
        self.region
    }

    pub fn is_claimed(&self) -> bool {
        self.region.is_some()
    }

    pub fn fences(&self) -> Fences {
        self.fences
    }

    pub fn side(&self, direction: Direction) -> Option<SideId> {
        self.sides[direction.index()]
    }

    /// Assigns the side for `direction` unless one is already set.
    pub(crate) fn set_side(&mut self, direction: Direction, side: SideId) -> bool {
        let slot = &mut self.sides[direction.index()];
        if slot.is_some() {
            return false;
        }
        *slot = Some(side);
        true
    }
}

/// Row-major storage of every [`Plot`] on one map.
#[derive(Debug, Clone)]
pub struct PlotArena {
    width: usize,
    height: usize,
    plots: Vec<Plot>,
}

impl PlotArena {
    fn new(garden: &Garden) -> Self {
        Self {
            width: garden.width(),
            height: garden.height(),
            plots: garden.plots().iter().copied().map(Plot::new).collect(),
        }
    }

    pub fn get(&self, position: Position) -> Option<&Plot> {
        if position.row < self.height && position.col < self.width {
            Some(&self.plots[position.row * self.width + position.col])
        } else {
            None
        }
    }

    pub fn neighbor(&self, position: Position, direction: Direction) -> Option<Position> {
        position.step(direction, self.width, self.height)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Plot> {
        self.plots.iter()
    }
}

impl Index<Position> for PlotArena {
    type Output = Plot;

    fn index(&self, position: Position) -> &Self::Output {
        &self.plots[position.row * self.width + position.col]
    }
}

impl IndexMut<Position> for PlotArena {
    fn index_mut(&mut self, position: Position) -> &mut Self::Output {
        &mut self.plots[position.row * self.width + position.col]
    }
}

/// A maximal 4-connected group of plots growing the same plant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    id: RegionId,
    value: char,
    members: Vec<Position>,
}

impl Region {
    pub fn id(&self) -> RegionId {
        self.id
    }

    pub fn value(&self) -> char {
        self.value
    }

    /// Member positions in the order the flood fill claimed them.
    pub fn members(&self) -> &[Position] {
        &self.members
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn contains(&self, arena: &PlotArena, position: Position) -> bool {
        arena
            .get(position)
            .is_some_and(|plot| plot.region == Some(self.id))
    }

    pub fn perimeter(&self, arena: &PlotArena) -> usize {
        self.members
            .iter()
            .map(|&position| arena[position].fences.count())
            .sum()
    }

    /// One line per member: position, plant, owning region, fence count, and
    /// the side slots in north, south, east, west order (`-` when unassigned).
    pub fn dump(&self, arena: &PlotArena) -> String {
        let mut members = self.members.clone();
        members.sort_unstable();

        members
            .iter()
            .map(|&position| {
                let plot = &arena[position];
                let region = plot.region.map_or("-".to_string(), |id| id.to_string());
                let sides = Direction::ALL
                    .iter()
                    .map(|&direction| {
                        plot.side(direction)
                            .map_or("-".to_string(), |side| side.to_string())
                    })
                    .join(" ");
                format!(
                    "{} {}: region {}, fences {}, sides [{}]",
                    position,
                    plot.value(),
                    region,
                    plot.fences.count(),
                    sides
                )
            })
            .join("\n")
    }
}

/// The result of one extraction run: the plot arena and the regions partitioning it.
#[derive(Debug, Clone)]
pub struct Survey {
    pub(crate) arena: PlotArena,
    pub(crate) regions: Vec<Region>,
}

impl Survey {
    pub fn arena(&self) -> &PlotArena {
        &self.arena
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region_at(&self, position: Position) -> Option<&Region> {
        let id = self.arena.get(position)?.region?;
        self.regions.get(id.get())
    }
}

/// Partitions the garden into regions, recording the fences of every plot.
///
/// Regions are discovered in row-major order of their first plot and numbered
/// from zero for each call.
#[tracing::instrument(skip_all, fields(width = garden.width(), height = garden.height()))]
pub fn extract(garden: &Garden) -> Survey {
    let mut arena = PlotArena::new(garden);
    let mut regions = Vec::new();

    for start in garden.positions() {
        if arena[start].is_claimed() {
            continue;
        }

        let region = flood_fill(garden, &mut arena, start, RegionId(regions.len()));
        debug!(
            id = %region.id,
            value = %region.value,
            size = region.size(),
            "mapped region starting at {}",
            start
        );
        regions.push(region);
    }

    info!("extracted {} regions", regions.len());
    Survey { arena, regions }
}

fn flood_fill(garden: &Garden, arena: &mut PlotArena, start: Position, id: RegionId) -> Region {
    let value = arena[start].value;
    let mut members = Vec::new();
    let mut frontier = vec![start];

    while let Some(current) = frontier.pop() {
        // the same plot can be queued by two neighbors before it is claimed
        if arena[current].is_claimed() {
            continue;
        }
        arena[current].region = Some(id);
        members.push(current);

        for direction in Direction::ALL {
            match garden.neighbor(current, direction) {
                Some(next) if arena[next].value == value => {
                    if !arena[next].is_claimed() {
                        frontier.push(next);
                    }
                }
                _ => arena[current].fences.insert(direction),
            }
        }
    }

    Region { id, value, members }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const EXAMPLE: &str = "AAAA
BBCD
BBCC
EEEC";

    const RING: &str = "OOOOO
OXOXO
OOOOO
OXOXO
OOOOO";

    #[test]
    fn test_extract_example() -> miette::Result<()> {
        let garden = Garden::parse(EXAMPLE)?;
        let survey = extract(&garden);

        assert_eq!(5, survey.regions().len());

        let sizes = survey
            .regions()
            .iter()
            .map(|region| (region.value(), region.size()))
            .collect::<Vec<_>>();
        assert_eq!(
            vec![('A', 4), ('B', 4), ('C', 4), ('D', 1), ('E', 3)],
            sizes
        );
        Ok(())
    }

    #[test]
    fn test_extract_partitions_grid() -> miette::Result<()> {
        let garden = Garden::parse(RING)?;
        let survey = extract(&garden);

        let total = survey.regions().iter().map(Region::size).sum::<usize>();
        assert_eq!(garden.len(), total);

        let claimed = survey
            .regions()
            .iter()
            .flat_map(|region| region.members().iter().copied())
            .collect::<HashSet<_>>();
        assert_eq!(garden.len(), claimed.len());
        assert!(survey.arena().iter().all(Plot::is_claimed));
        Ok(())
    }

    #[test]
    fn test_extract_ring() -> miette::Result<()> {
        let garden = Garden::parse(RING)?;
        let survey = extract(&garden);

        assert_eq!(5, survey.regions().len());

        let (outer, holes): (Vec<_>, Vec<_>) = survey
            .regions()
            .iter()
            .partition(|region| region.value() == 'O');
        assert_eq!(1, outer.len());
        assert_eq!(21, outer[0].size());
        assert_eq!(4, holes.len());
        assert!(holes.iter().all(|region| region.size() == 1));
        Ok(())
    }

    #[test]
    fn test_region_ids_follow_discovery_order() -> miette::Result<()> {
        let garden = Garden::parse(EXAMPLE)?;
        let survey = extract(&garden);

        for (index, region) in survey.regions().iter().enumerate() {
            assert_eq!(index, region.id().get());
        }

        let region = survey
            .region_at(Position::new(3, 3))
            .ok_or_else(|| miette::miette!("no region at (3, 3)"))?;
        assert_eq!('C', region.value());
        assert!(region.contains(survey.arena(), Position::new(1, 2)));
        assert!(!region.contains(survey.arena(), Position::new(1, 3)));
        Ok(())
    }

    #[test]
    fn test_fences() -> miette::Result<()> {
        let garden = Garden::parse(EXAMPLE)?;
        let survey = extract(&garden);
        let arena = survey.arena();

        let corner = arena[Position::new(0, 0)].fences();
        assert!(corner.contains(Direction::North));
        assert!(corner.contains(Direction::West));
        assert!(corner.contains(Direction::South));
        assert!(!corner.contains(Direction::East));
        assert_eq!(3, corner.count());

        let lone = arena[Position::new(1, 3)].fences();
        assert_eq!(4, lone.count());
        Ok(())
    }

    #[test]
    fn test_single_plot() -> miette::Result<()> {
        let garden = Garden::parse("Z")?;
        let survey = extract(&garden);

        assert_eq!(1, survey.regions().len());
        assert_eq!(4, survey.regions()[0].perimeter(survey.arena()));
        Ok(())
    }

    #[test]
    fn test_perimeter() -> miette::Result<()> {
        let garden = Garden::parse(EXAMPLE)?;
        let survey = extract(&garden);

        let perimeters = survey
            .regions()
            .iter()
            .map(|region| region.perimeter(survey.arena()))
            .collect::<Vec<_>>();
        assert_eq!(vec![10, 8, 10, 4, 8], perimeters);
        Ok(())
    }

    #[test]
    fn test_dump() -> miette::Result<()> {
        let garden = Garden::parse("ZZ\nYZ")?;
        let mut survey = extract(&garden);

        let z = &survey.regions()[0];
        assert_eq!(
            "(0, 0) Z: region 0, fences 3, sides [- - - -]
(0, 1) Z: region 0, fences 2, sides [- - - -]
(1, 1) Z: region 0, fences 3, sides [- - - -]",
            z.dump(survey.arena())
        );

        survey.resolve_sides();
        let y = &survey.regions()[1];
        assert_eq!('Y', survey.arena()[Position::new(1, 0)].value());
        assert_eq!(
            "(1, 0) Y: region 1, fences 4, sides [6 7 8 9]",
            y.dump(survey.arena())
        );
        Ok(())
    }
}
