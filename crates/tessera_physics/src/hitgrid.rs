use glam::Vec2;
use rustc_hash::FxHashSet;
use tessera_graphic::{Camera, Color, Graphics};
use tessera_math::Rect;
use tessera_scene::{Collider, Component, Entity};

/// Sparse grid of solid tiles
///
/// Tiles are addressed by column and row, tile `(0, 0)` starts at the entity
/// position plus `offset`.
#[derive(Debug, Clone)]
pub struct Hitgrid {
    pub tile_width: f32,
    pub tile_height: f32,
    pub offset: Vec2,
    tags: Vec<String>,
    pub active: bool,
    pub debug_color: Color,
    tiles: FxHashSet<(i32, i32)>,
}

impl Hitgrid {
    pub fn new(tile_width: f32, tile_height: f32) -> Self {
        Self {
            tile_width,
            tile_height,
            offset: Vec2::ZERO,
            tags: Vec::new(),
            active: true,
            debug_color: Color::new(1.0, 0.0, 0.0, 0.5),
            tiles: FxHashSet::default(),
        }
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|tag| tag.to_string()).collect();
        self
    }

    pub fn set(&mut self, column: i32, row: i32, solid: bool) {
        if solid {
            self.tiles.insert((column, row));
        } else {
            self.tiles.remove(&(column, row));
        }
    }

    /// Sets every tile of a `columns` x `rows` block
    pub fn set_rect(&mut self, column: i32, row: i32, columns: i32, rows: i32, solid: bool) {
        for x in column..column + columns {
            for y in row..row + rows {
                self.set(x, y, solid);
            }
        }
    }

    pub fn has(&self, column: i32, row: i32) -> bool {
        self.tiles.contains(&(column, row))
    }

    /// Whether any tile of a `columns` x `rows` block is solid
    pub fn has_rect(&self, column: i32, row: i32, columns: i32, rows: i32) -> bool {
        (column..column + columns).any(|x| (row..row + rows).any(|y| self.has(x, y)))
    }

    pub fn solid_count(&self) -> usize {
        self.tiles.len()
    }

    /// Tile range `[first, last)` covered by `rect`, for a grid whose first
    /// tile starts at `origin`
    pub fn tile_range(&self, origin: Vec2, rect: Rect) -> ((i32, i32), (i32, i32)) {
        let left = ((rect.left() - origin.x) / self.tile_width).floor() as i32;
        let top = ((rect.top() - origin.y) / self.tile_height).floor() as i32;
        let right = ((rect.right() - origin.x) / self.tile_width).ceil() as i32;
        let bottom = ((rect.bottom() - origin.y) / self.tile_height).ceil() as i32;
        ((left, top), (right, bottom))
    }

    /// Whether `rect`, in scene space, touches a solid tile of the grid
    /// placed at `origin`
    pub fn overlaps_rect(&self, origin: Vec2, rect: Rect) -> bool {
        let ((left, top), (right, bottom)) = self.tile_range(origin, rect);
        self.has_rect(left, top, right - left, bottom - top)
    }

    pub fn tile_bounds(&self, origin: Vec2, column: i32, row: i32) -> Rect {
        Rect::new(
            origin.x + column as f32 * self.tile_width,
            origin.y + row as f32 * self.tile_height,
            self.tile_width,
            self.tile_height,
        )
    }
}

impl Component for Hitgrid {
    fn active(&self) -> bool {
        self.active
    }

    fn debug_render(&self, entity: &Entity, gfx: &mut Graphics, camera: &Camera) {
        let origin = entity.position + self.offset;
        let ((left, top), (right, bottom)) = self.tile_range(origin, camera.extents());

        for column in left..right {
            for row in top..bottom {
                if self.has(column, row) {
                    gfx.hollow_rect(
                        self.tile_bounds(origin, column, row),
                        1.0,
                        &self.debug_color,
                    );
                }
            }
        }
    }

    fn as_collider(&self) -> Option<&dyn Collider> {
        Some(self)
    }

    fn as_collider_mut(&mut self) -> Option<&mut dyn Collider> {
        Some(self)
    }
}

impl Collider for Hitgrid {
    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn tags_mut(&mut self) -> &mut Vec<String> {
        &mut self.tags
    }

    fn offset(&self) -> Vec2 {
        self.offset
    }

    fn collider_name(&self) -> &'static str {
        "Hitgrid"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_clear_blocks() {
        let mut grid = Hitgrid::new(8.0, 8.0);
        grid.set_rect(0, 0, 3, 2, true);
        assert_eq!(grid.solid_count(), 6);

        grid.set_rect(1, 0, 1, 2, false);
        assert!(grid.has(0, 1));
        assert!(!grid.has(1, 1));
        assert!(grid.has(2, 0));
        assert!(grid.has_rect(1, 0, 2, 1));
        assert!(!grid.has_rect(1, 0, 1, 5));
        assert!(!grid.has_rect(0, 0, 0, 0));
    }

    #[test]
    fn rect_maps_to_covered_tiles() {
        let grid = Hitgrid::new(16.0, 16.0);

        assert_eq!(
            grid.tile_range(Vec2::ZERO, Rect::new(0.0, 0.0, 16.0, 16.0)),
            ((0, 0), (1, 1))
        );
        assert_eq!(
            grid.tile_range(Vec2::ZERO, Rect::new(15.0, -1.0, 2.0, 2.0)),
            ((0, -1), (2, 1))
        );
        assert_eq!(
            grid.tile_range(Vec2::new(8.0, 0.0), Rect::new(8.0, 0.0, 4.0, 4.0)),
            ((0, 0), (1, 1))
        );
    }

    #[test]
    fn touching_a_tile_edge_is_not_an_overlap() {
        let mut grid = Hitgrid::new(16.0, 16.0);
        grid.set(1, 0, true);

        assert!(!grid.overlaps_rect(Vec2::ZERO, Rect::new(0.0, 0.0, 16.0, 16.0)));
        assert!(grid.overlaps_rect(Vec2::ZERO, Rect::new(1.0, 0.0, 16.0, 16.0)));
        assert!(!grid.overlaps_rect(Vec2::new(1.0, 0.0), Rect::new(1.0, 0.0, 16.0, 16.0)));
    }
}
