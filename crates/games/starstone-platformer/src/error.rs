/// Reasons a level schema cannot be turned into a level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    NoLevels,
    EmptyGrid {
        level: String,
    },
    RowCount {
        level: String,
        expected: u32,
        found: usize,
    },
    RaggedRow {
        level: String,
        row: usize,
        expected: u32,
        found: usize,
    },
    UnknownTile {
        level: String,
        row: usize,
        col: usize,
        found: char,
    },
    StartOutOfBounds {
        level: String,
        x: u32,
        y: u32,
    },
    ObjectOutOfBounds {
        level: String,
        index: usize,
        x: u32,
        y: u32,
    },
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoLevels => write!(f, "no levels configured"),
            Self::EmptyGrid { level } => write!(f, "{level}: empty tile grid"),
            Self::RowCount {
                level,
                expected,
                found,
            } => write!(f, "{level}: expected {expected} rows, found {found}"),
            Self::RaggedRow {
                level,
                row,
                expected,
                found,
            } => write!(
                f,
                "{level}: row {row} has {found} tiles, expected {expected}"
            ),
            Self::UnknownTile {
                level,
                row,
                col,
                found,
            } => write!(f, "{level}: unknown tile {found:?} at row {row}, column {col}"),
            Self::StartOutOfBounds { level, x, y } => {
                write!(f, "{level}: start tile ({x}, {y}) is outside the grid")
            },
            Self::ObjectOutOfBounds { level, index, x, y } => write!(
                f,
                "{level}: object {index} at ({x}, {y}) is outside the grid"
            ),
        }
    }
}

impl std::error::Error for SchemaError {}
