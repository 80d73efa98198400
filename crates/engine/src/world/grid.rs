use serde::{Deserialize, Serialize};

/// Coordinate conventions:
/// - An area is addressed by `index = row * grid_cols + col`.
/// - Tile (0,0) of area 0 maps to world pixel (0,0); world pixel space grows
///   right and down across the whole area grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    pub grid_cols: usize,
    pub grid_rows: usize,
    pub area_width: u32,
    pub area_height: u32,
    pub tile_size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilePosition {
    pub area_index: usize,
    pub tile_x: u32,
    pub tile_y: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPosition {
    pub x: f32,
    pub y: f32,
}

impl WorldPosition {
    pub fn distance_to(self, other: WorldPosition) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Partial spawn descriptor. Missing fields are filled from a caller fallback
/// and finally from scene-centered defaults, so resolution never fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnPoint {
    pub area_index: Option<usize>,
    pub tile_x: Option<u32>,
    pub tile_y: Option<u32>,
}

impl SpawnPoint {
    pub fn at(area_index: usize, tile_x: u32, tile_y: u32) -> Self {
        Self {
            area_index: Some(area_index),
            tile_x: Some(tile_x),
            tile_y: Some(tile_y),
        }
    }
}

impl GridShape {
    pub fn area_count(&self) -> usize {
        self.grid_cols * self.grid_rows
    }

    pub fn area_index_of(&self, row: usize, col: usize) -> usize {
        row * self.grid_cols + col
    }

    pub fn row_col_of(&self, area_index: usize) -> (usize, usize) {
        (area_index / self.grid_cols, area_index % self.grid_cols)
    }

    pub fn contains_area(&self, area_index: usize) -> bool {
        area_index < self.area_count()
    }

    pub fn world_width_px(&self) -> f32 {
        (self.grid_cols as u32 * self.area_width * self.tile_size) as f32
    }

    pub fn world_height_px(&self) -> f32 {
        (self.grid_rows as u32 * self.area_height * self.tile_size) as f32
    }

    /// Top-left pixel corner of an area.
    pub fn area_origin_px(&self, area_index: usize) -> WorldPosition {
        let (row, col) = self.row_col_of(area_index);
        WorldPosition {
            x: (col as u32 * self.area_width * self.tile_size) as f32,
            y: (row as u32 * self.area_height * self.tile_size) as f32,
        }
    }

    pub fn tile_to_world(&self, tile: TilePosition) -> WorldPosition {
        let (row, col) = self.row_col_of(tile.area_index);
        WorldPosition {
            x: ((col as u32 * self.area_width + tile.tile_x) * self.tile_size) as f32,
            y: ((row as u32 * self.area_height + tile.tile_y) * self.tile_size) as f32,
        }
    }

    /// Resolves a partial descriptor into a world position. Field precedence is
    /// descriptor, then `fallback`, then the centered default; out-of-range
    /// values are clamped so the result always lands inside world bounds.
    pub fn resolve_spawn(&self, spawn: Option<SpawnPoint>, fallback: SpawnPoint) -> WorldPosition {
        let spawn = spawn.unwrap_or_default();
        let mut area_index = spawn
            .area_index
            .or(fallback.area_index)
            .unwrap_or(0);
        if !self.contains_area(area_index) {
            area_index = 0;
        }
        let tile_x = spawn
            .tile_x
            .or(fallback.tile_x)
            .unwrap_or(self.area_width / 2)
            .min(self.area_width.saturating_sub(1));
        let tile_y = spawn
            .tile_y
            .or(fallback.tile_y)
            .unwrap_or(self.area_height / 2)
            .min(self.area_height.saturating_sub(1));

        self.tile_to_world(TilePosition {
            area_index,
            tile_x,
            tile_y,
        })
    }

    /// Centered fallback used when a scene omits a spawn descriptor entirely.
    pub fn centered_spawn(&self) -> SpawnPoint {
        SpawnPoint::at(0, self.area_width / 2, self.area_height / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape() -> GridShape {
        GridShape {
            grid_cols: 4,
            grid_rows: 2,
            area_width: 28,
            area_height: 20,
            tile_size: 24,
        }
    }

    #[test]
    fn area_index_round_trips_for_every_cell() {
        let grid = shape();
        for row in 0..grid.grid_rows {
            for col in 0..grid.grid_cols {
                let index = grid.area_index_of(row, col);
                assert!(grid.contains_area(index));
                assert_eq!(grid.row_col_of(index), (row, col));
            }
        }
    }

    #[test]
    fn tile_to_world_is_deterministic() {
        let grid = shape();
        let tile = TilePosition {
            area_index: 5,
            tile_x: 3,
            tile_y: 7,
        };
        let first = grid.tile_to_world(tile);
        let second = grid.tile_to_world(tile);
        assert_eq!(first, second);
        // Area 5 sits at row 1, col 1.
        assert_eq!(first.x, ((28 + 3) * 24) as f32);
        assert_eq!(first.y, ((20 + 7) * 24) as f32);
    }

    #[test]
    fn resolve_spawn_prefers_descriptor_then_fallback_then_center() {
        let grid = shape();

        let explicit = grid.resolve_spawn(
            Some(SpawnPoint::at(1, 2, 3)),
            SpawnPoint::at(0, 9, 9),
        );
        assert_eq!(explicit, grid.tile_to_world(TilePosition {
            area_index: 1,
            tile_x: 2,
            tile_y: 3,
        }));

        let partial = grid.resolve_spawn(
            Some(SpawnPoint {
                area_index: None,
                tile_x: Some(4),
                tile_y: None,
            }),
            SpawnPoint {
                area_index: Some(2),
                tile_x: None,
                tile_y: Some(6),
            },
        );
        assert_eq!(partial, grid.tile_to_world(TilePosition {
            area_index: 2,
            tile_x: 4,
            tile_y: 6,
        }));

        let centered = grid.resolve_spawn(None, SpawnPoint::default());
        assert_eq!(centered, grid.tile_to_world(TilePosition {
            area_index: 0,
            tile_x: 14,
            tile_y: 10,
        }));
    }

    #[test]
    fn resolve_spawn_clamps_out_of_range_values_into_bounds() {
        let grid = shape();
        let resolved = grid.resolve_spawn(Some(SpawnPoint::at(99, 500, 500)), SpawnPoint::default());
        assert!(resolved.x < grid.world_width_px());
        assert!(resolved.y < grid.world_height_px());
    }

    #[test]
    fn distance_is_euclidean() {
        let a = WorldPosition { x: 0.0, y: 0.0 };
        let b = WorldPosition { x: 3.0, y: 4.0 };
        assert!((a.distance_to(b) - 5.0).abs() < 0.0001);
    }
}
