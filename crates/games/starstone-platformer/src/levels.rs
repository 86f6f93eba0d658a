use serde::{Deserialize, Serialize};

use crate::entity::Scenery;
use crate::error::SchemaError;

/// Tile tags of a level grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    Background,
    BackgroundBrick,
    Ground,
    Brick,
}

impl Tile {
    /// ASCII authoring alphabet: `.` background, `:` background brick,
    /// `#` ground, `=` brick.
    pub fn from_char(c: char) -> Option<Tile> {
        match c {
            '.' => Some(Tile::Background),
            ':' => Some(Tile::BackgroundBrick),
            '#' => Some(Tile::Ground),
            '=' => Some(Tile::Brick),
            _ => None,
        }
    }

    pub fn scenery(self) -> Scenery {
        match self {
            Tile::Background => Scenery::Background,
            Tile::BackgroundBrick => Scenery::BackgroundBrick,
            Tile::Ground => Scenery::Ground,
            Tile::Brick => Scenery::Brick,
        }
    }
}

/// Objects placed on top of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    PushBox,
    Frog,
    LevelPointer,
    StarBoss,
    StarStone,
    /// Moving platform patrolling `span_tiles` to the right of its spawn tile.
    Platform { span_tiles: u32 },
}

/// An object spawned in tile `(x, y)`, resting on the bottom of that cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSpawn {
    pub kind: ObjectKind,
    pub x: u32,
    pub y: u32,
}

impl ObjectSpawn {
    pub fn new(kind: ObjectKind, x: u32, y: u32) -> Self {
        Self { kind, x, y }
    }
}

/// Static description of a level: tile grid, objects and player start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSchema {
    pub name: String,
    /// Width in tiles.
    pub x_tiles: u32,
    /// Height in tiles.
    pub y_tiles: u32,
    /// Tile rows, top to bottom.
    pub tiles: Vec<Vec<Tile>>,
    pub objects: Vec<ObjectSpawn>,
    /// Player spawn tile.
    pub start: (u32, u32),
}

impl LevelSchema {
    /// Build a schema from ASCII rows (see [`Tile::from_char`]).
    pub fn from_rows(
        name: &str,
        rows: &[&str],
        objects: Vec<ObjectSpawn>,
        start: (u32, u32),
    ) -> Result<Self, SchemaError> {
        let mut tiles = Vec::with_capacity(rows.len());
        for (row, line) in rows.iter().enumerate() {
            let parsed = line
                .chars()
                .enumerate()
                .map(|(col, c)| {
                    Tile::from_char(c).ok_or_else(|| SchemaError::UnknownTile {
                        level: name.to_string(),
                        row,
                        col,
                        found: c,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            tiles.push(parsed);
        }
        let schema = Self {
            name: name.to_string(),
            x_tiles: tiles.first().map_or(0, |r| r.len() as u32),
            y_tiles: tiles.len() as u32,
            tiles,
            objects,
            start,
        };
        schema.validate()?;
        Ok(schema)
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        let level = || self.name.clone();
        if self.x_tiles == 0 || self.y_tiles == 0 {
            return Err(SchemaError::EmptyGrid { level: level() });
        }
        if self.tiles.len() != self.y_tiles as usize {
            return Err(SchemaError::RowCount {
                level: level(),
                expected: self.y_tiles,
                found: self.tiles.len(),
            });
        }
        if let Some((row, r)) = self
            .tiles
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != self.x_tiles as usize)
        {
            return Err(SchemaError::RaggedRow {
                level: level(),
                row,
                expected: self.x_tiles,
                found: r.len(),
            });
        }
        let (sx, sy) = self.start;
        if !self.in_bounds(sx, sy) {
            return Err(SchemaError::StartOutOfBounds {
                level: level(),
                x: sx,
                y: sy,
            });
        }
        if let Some((index, o)) = self
            .objects
            .iter()
            .enumerate()
            .find(|(_, o)| !self.in_bounds(o.x, o.y))
        {
            return Err(SchemaError::ObjectOutOfBounds {
                level: level(),
                index,
                x: o.x,
                y: o.y,
            });
        }
        Ok(())
    }

    pub fn in_bounds(&self, x: u32, y: u32) -> bool {
        x < self.x_tiles && y < self.y_tiles
    }

    pub fn tile(&self, x: u32, y: u32) -> Option<Tile> {
        self.tiles.get(y as usize)?.get(x as usize).copied()
    }

    /// All-background grid with no objects, start in the top-left tile.
    pub fn open(name: &str, x_tiles: u32, y_tiles: u32) -> Self {
        Self {
            name: name.to_string(),
            x_tiles,
            y_tiles,
            tiles: vec![vec![Tile::Background; x_tiles as usize]; y_tiles as usize],
            objects: Vec::new(),
            start: (0, 0),
        }
    }
}

/// Two ledges over a floor, sized to the window grid.
///
/// Bottom to top: full ground row, ground over the right half five tiles up,
/// ground over the left half five tiles above that.
pub fn first_level(x_tiles: u32, y_tiles: u32) -> LevelSchema {
    let x_tiles = x_tiles.max(16);
    let y_tiles = y_tiles.max(12);
    let half = x_tiles / 2;

    let mut schema = LevelSchema::open("Meadow", x_tiles, y_tiles);
    let floor = y_tiles - 1;
    let right_ledge = y_tiles - 6;
    let left_ledge = y_tiles - 11;
    for x in 0..x_tiles {
        schema.tiles[floor as usize][x as usize] = Tile::Ground;
        if x >= half {
            schema.tiles[right_ledge as usize][x as usize] = Tile::Ground;
        } else {
            schema.tiles[left_ledge as usize][x as usize] = Tile::Ground;
        }
    }

    schema.start = (1, y_tiles - 2);
    schema.objects = vec![
        ObjectSpawn::new(ObjectKind::PushBox, x_tiles / 4, floor - 1),
        ObjectSpawn::new(
            ObjectKind::Platform { span_tiles: 4 },
            half.saturating_sub(6),
            floor - 3,
        ),
        ObjectSpawn::new(ObjectKind::Frog, half + x_tiles / 4, right_ledge - 1),
        ObjectSpawn::new(ObjectKind::LevelPointer, 2, left_ledge - 1),
    ];
    schema
}

const STAR_CHAMBER: [&str; 20] = [
    "..............................",
    "..............................",
    "..............................",
    ":............................:",
    ":............................:",
    ":............................:",
    ":............................:",
    ":............................:",
    "..............................",
    "...........========...........",
    "..............................",
    "..............................",
    "..............................",
    "..............................",
    "..=======............=======..",
    "..............................",
    "..............................",
    "..............................",
    ":..:..:..:..:..:..:..:..:..:..",
    "##############################",
];

/// The boss chamber: touch the glowing stone to hurt the star.
pub fn second_level() -> Result<LevelSchema, SchemaError> {
    let objects = vec![
        ObjectSpawn::new(ObjectKind::StarBoss, 13, 2),
        ObjectSpawn::new(ObjectKind::StarStone, 4, 13),
        ObjectSpawn::new(ObjectKind::StarStone, 24, 13),
        ObjectSpawn::new(ObjectKind::StarStone, 14, 8),
        ObjectSpawn::new(ObjectKind::StarStone, 8, 18),
        ObjectSpawn::new(ObjectKind::StarStone, 21, 18),
        ObjectSpawn::new(ObjectKind::PushBox, 11, 18),
        ObjectSpawn::new(ObjectKind::Frog, 17, 18),
        ObjectSpawn::new(ObjectKind::Platform { span_tiles: 10 }, 9, 13),
    ];
    LevelSchema::from_rows("Star Chamber", &STAR_CHAMBER, objects, (1, 18))
}

/// Level rotation shipped with the game.
pub fn default_levels(x_tiles: u32, y_tiles: u32) -> Result<Vec<LevelSchema>, SchemaError> {
    Ok(vec![first_level(x_tiles, y_tiles), second_level()?])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_levels_validate() {
        for schema in default_levels(30, 20).unwrap() {
            schema.validate().unwrap();
        }
    }

    #[test]
    fn first_level_layout() {
        let schema = first_level(30, 20);
        assert_eq!(schema.tile(0, 19), Some(Tile::Ground));
        assert_eq!(schema.tile(29, 19), Some(Tile::Ground));
        assert_eq!(schema.tile(20, 14), Some(Tile::Ground));
        assert_eq!(schema.tile(5, 14), Some(Tile::Background));
        assert_eq!(schema.tile(5, 9), Some(Tile::Ground));
        assert_eq!(schema.tile(20, 9), Some(Tile::Background));
        assert_eq!(schema.start, (1, 18));
    }

    #[test]
    fn tiny_window_still_fits_first_level() {
        let schema = first_level(4, 4);
        schema.validate().unwrap();
        assert!(schema.y_tiles >= 12);
    }

    #[test]
    fn second_level_has_boss_and_stones() {
        let schema = second_level().unwrap();
        assert_eq!((schema.x_tiles, schema.y_tiles), (30, 20));
        let stones = schema
            .objects
            .iter()
            .filter(|o| o.kind == ObjectKind::StarStone)
            .count();
        assert!(stones >= 2);
        assert!(schema.objects.iter().any(|o| o.kind == ObjectKind::StarBoss));
    }

    #[test]
    fn unknown_tile_rejected() {
        let err = LevelSchema::from_rows("bad", &["..", ".x"], Vec::new(), (0, 0)).unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownTile {
                level: "bad".to_string(),
                row: 1,
                col: 1,
                found: 'x',
            }
        );
    }

    #[test]
    fn ragged_rows_rejected() {
        let err = LevelSchema::from_rows("bad", &["...", ".."], Vec::new(), (0, 0)).unwrap_err();
        assert!(matches!(err, SchemaError::RaggedRow { row: 1, .. }));
    }

    #[test]
    fn out_of_bounds_start_and_objects_rejected() {
        let err = LevelSchema::from_rows("bad", &["..", ".."], Vec::new(), (2, 0)).unwrap_err();
        assert!(matches!(err, SchemaError::StartOutOfBounds { x: 2, .. }));

        let objects = vec![ObjectSpawn::new(ObjectKind::Frog, 0, 5)];
        let err = LevelSchema::from_rows("bad", &["..", ".."], objects, (0, 0)).unwrap_err();
        assert!(matches!(err, SchemaError::ObjectOutOfBounds { index: 0, .. }));
    }

    #[test]
    fn empty_grid_rejected() {
        let err = LevelSchema::from_rows("bad", &[], Vec::new(), (0, 0)).unwrap_err();
        assert!(matches!(err, SchemaError::EmptyGrid { .. }));
    }

    #[test]
    fn row_count_mismatch_rejected() {
        let mut schema = LevelSchema::open("short", 3, 3);
        schema.tiles.pop();
        assert!(matches!(
            schema.validate(),
            Err(SchemaError::RowCount { found: 2, .. })
        ));
    }
}
