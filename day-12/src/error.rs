use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum GardenError {
    #[error("Garden map is empty")]
    #[diagnostic(code(day_12::empty), help("Provide at least one row of plots"))]
    Empty,

    #[error("Row {line} has {found} plots, expected {expected}")]
    #[diagnostic(
        code(day_12::ragged),
        help("Every row of the garden map must have the same width")
    )]
    Ragged {
        line: usize,
        expected: usize,
        found: usize,
        #[source_code]
        src: String,
        #[label("this row")]
        span: SourceSpan,
    },

    #[error("Failed to parse garden map")]
    #[diagnostic(
        code(day_12::parse),
        help("Plots must be printable ASCII characters, one row per line")
    )]
    Parse {
        #[source_code]
        src: String,
        #[label("unexpected input here")]
        span: SourceSpan,
    },
}

impl GardenError {
    pub(crate) fn parse(src: &str, offset: usize) -> Self {
        let len = src[offset..].chars().next().map_or(0, char::len_utf8);
        GardenError::Parse {
            src: src.to_owned(),
            span: (offset, len).into(),
        }
    }
}
