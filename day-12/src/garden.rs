use std::fmt;

use itertools::Itertools;
use nom::{
    character::complete::{line_ending, satisfy},
    multi::{many1, separated_list1},
    IResult, Parser,
};
use nom_locate::LocatedSpan;

use crate::error::GardenError;

/// A plot coordinate, `row` 0 being the top of the map.
///
/// Ordering is row-major, which is the scan order region discovery and side
/// resolution both depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// One step in `direction`, or `None` when that leaves a `width` x `height` map.
    pub fn step(self, direction: Direction, width: usize, height: usize) -> Option<Self> {
        match direction {
            Direction::North => self.row.checked_sub(1).map(|row| Self::new(row, self.col)),
            Direction::South => (self.row + 1 < height).then(|| Self::new(self.row + 1, self.col)),
            Direction::West => self.col.checked_sub(1).map(|col| Self::new(self.row, col)),
            Direction::East => (self.col + 1 < width).then(|| Self::new(self.row, self.col + 1)),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// The garden map: a rectangular, read-only grid of plant symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Garden {
    width: usize,
    height: usize,
    plots: Vec<char>,
}

impl Garden {
    /// Parses one row per line. Trailing whitespace after the last row is ignored.
    pub fn parse(input: &str) -> Result<Self, GardenError> {
        if input.trim().is_empty() {
            return Err(GardenError::Empty);
        }

        let (rest, rows) = parse_rows(Span::new(input)).map_err(|err| match err {
            nom::Err::Error(e) | nom::Err::Failure(e) => {
                GardenError::parse(input, e.input.location_offset())
            }
            nom::Err::Incomplete(_) => GardenError::parse(input, input.len()),
        })?;

        let width = rows.first().map_or(0, Vec::len);

        let remaining = rest.fragment();
        if !remaining.trim().is_empty() {
            // a blank line between rows is a row of width zero
            let after_row = strip_line_ending(remaining);
            if after_row.len() < remaining.len()
                && strip_line_ending(after_row).len() < after_row.len()
            {
                return Err(GardenError::Ragged {
                    line: rest.location_line() as usize + 1,
                    expected: width,
                    found: 0,
                    src: input.to_owned(),
                    span: (rest.location_offset() + remaining.len() - after_row.len(), 0).into(),
                });
            }

            let skipped = remaining.len() - remaining.trim_start().len();
            return Err(GardenError::parse(input, rest.location_offset() + skipped));
        }

        if let Some(row) = rows.iter().find(|row| row.len() != width) {
            let (line, offset) = row
                .first()
                .map(|plot| {
                    (
                        plot.position.location_line() as usize,
                        plot.position.location_offset(),
                    )
                })
                .unwrap_or_default();
            return Err(GardenError::Ragged {
                line,
                expected: width,
                found: row.len(),
                src: input.to_owned(),
                span: (offset, row.len()).into(),
            });
        }

        let height = rows.len();
        let plots = rows
            .into_iter()
            .flatten()
            .map(|plot| plot.value)
            .collect::<Vec<_>>();

        Ok(Self {
            width,
            height,
            plots,
        })
    }

    /// Builds a garden from rows that were already split, e.g. lines read from a file.
    pub fn from_rows<I, S>(rows: I) -> Result<Self, GardenError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.as_ref().trim_end().to_owned())
            .collect::<Vec<_>>();
        let input = rows.iter().join("\n");

        let width = rows.first().map_or(0, |row| row.chars().count());
        let mut offset = 0;
        for (index, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(GardenError::Ragged {
                    line: index + 1,
                    expected: width,
                    found,
                    src: input,
                    span: (offset, row.len()).into(),
                });
            }
            offset += row.len() + 1;
        }

        Self::parse(&input)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of plots on the map.
    pub fn len(&self) -> usize {
        self.plots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plots.is_empty()
    }

    pub fn get(&self, position: Position) -> Option<char> {
        if position.row < self.height && position.col < self.width {
            Some(self.plots[position.row * self.width + position.col])
        } else {
            None
        }
    }

    pub fn neighbor(&self, position: Position, direction: Direction) -> Option<Position> {
        position.step(direction, self.width, self.height)
    }

    /// Every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |row| (0..self.width).map(move |col| Position::new(row, col)))
    }

    pub(crate) fn plots(&self) -> &[char] {
        &self.plots
    }
}

impl fmt::Display for Garden {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.plots.chunks(self.width.max(1)) {
            for plot in row {
                write!(f, "{}", plot)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// region: Nom parser
type Span<'a> = LocatedSpan<&'a str>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LocatedPlot<'a> {
    value: char,
    position: Span<'a>,
}

fn parse_plot(input: Span) -> IResult<Span, LocatedPlot> {
    satisfy(|c: char| c.is_ascii_graphic())
        .map(|c| LocatedPlot {
            value: c,
            position: input,
        })
        .parse(input)
}

fn parse_rows(input: Span) -> IResult<Span, Vec<Vec<LocatedPlot>>> {
    separated_list1(line_ending, many1(parse_plot))(input)
}

fn strip_line_ending(input: &str) -> &str {
    input
        .strip_prefix("\r\n")
        .or_else(|| input.strip_prefix('\n'))
        .unwrap_or(input)
}
// endregion
