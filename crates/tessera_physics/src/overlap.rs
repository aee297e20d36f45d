use tessera_math::Rect;
use tessera_scene::{OverlapRegistry, Placed};

use crate::{Hitbox, Hitgrid};

fn bounds(hitbox: &Placed<Hitbox>) -> Rect {
    Rect::new(
        hitbox.origin.x,
        hitbox.origin.y,
        hitbox.collider.width,
        hitbox.collider.height,
    )
}

/// Open interval test, boxes sharing only an edge do not overlap
pub fn hitbox_hitbox(a: Placed<Hitbox>, b: Placed<Hitbox>) -> bool {
    bounds(&a).overlaps(&bounds(&b))
}

pub fn hitbox_hitgrid(a: Placed<Hitbox>, b: Placed<Hitgrid>) -> bool {
    b.collider.overlaps_rect(b.origin, bounds(&a))
}

/// Installs the overlap tests between the colliders of this crate
pub fn register_overlap_tests(registry: &mut OverlapRegistry) {
    registry.register(hitbox_hitbox);
    registry.register(hitbox_hitgrid);
    log::debug!("hitbox and hitgrid overlap tests registered");
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;

    fn placed(hitbox: &Hitbox, x: f32, y: f32) -> Placed<'_, Hitbox> {
        Placed {
            collider: hitbox,
            origin: Vec2::new(x, y),
        }
    }

    #[test]
    fn shared_edge_is_not_an_overlap() {
        let a = Hitbox::new(0.0, 0.0, 10.0, 10.0);
        let b = Hitbox::new(0.0, 0.0, 10.0, 10.0);

        assert!(!hitbox_hitbox(placed(&a, 0.0, 0.0), placed(&b, 10.0, 0.0)));
        assert!(!hitbox_hitbox(placed(&a, 0.0, 0.0), placed(&b, 0.0, 10.0)));
        assert!(hitbox_hitbox(placed(&a, 0.0, 0.0), placed(&b, 9.0, 0.0)));
        assert!(hitbox_hitbox(placed(&b, 9.0, 9.0), placed(&a, 0.0, 0.0)));
    }

    #[test]
    fn hitbox_against_grid() {
        let hitbox = Hitbox::new(0.0, 0.0, 8.0, 8.0);
        let mut grid = Hitgrid::new(8.0, 8.0);
        grid.set(2, 1, true);
        let grid = Placed {
            collider: &grid,
            origin: Vec2::ZERO,
        };

        assert!(!hitbox_hitgrid(placed(&hitbox, 8.0, 8.0), grid));
        assert!(hitbox_hitgrid(placed(&hitbox, 9.0, 8.0), grid));
        assert!(hitbox_hitgrid(placed(&hitbox, 16.0, 8.0), grid));
        assert!(!hitbox_hitgrid(placed(&hitbox, 16.0, 16.0), grid));
    }

    #[test]
    fn registered_both_ways() {
        let mut registry = OverlapRegistry::new();
        register_overlap_tests(&mut registry);

        assert!(registry.contains::<Hitbox, Hitbox>());
        assert!(registry.contains::<Hitbox, Hitgrid>());
        assert!(registry.contains::<Hitgrid, Hitbox>());
        assert!(!registry.contains::<Hitgrid, Hitgrid>());
    }
}
