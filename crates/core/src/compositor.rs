//! Frame compositor: paints registry entities into the working grid.
//!
//! Each tick the working grid starts untouched. Cells vacated since the last
//! tick are blanked first, then every drawable entity is painted cell by cell,
//! clipped to the grid. Painting is literal: a space in a sprite overwrites
//! whatever an earlier entity painted there, so composition order is also
//! occlusion order.

use tui_retro_types::{DrawOrder, BLANK};

use crate::collision::CollisionTracker;
use crate::entity::{Entity, EntityId};
use crate::grid::WorkingGrid;
use crate::registry::Registry;

/// Grid rectangle an entity covered when painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Footprint {
    x: i32,
    y: i32,
    w: usize,
    h: usize,
}

impl Footprint {
    fn of(entity: &Entity) -> Option<Self> {
        if !entity.is_drawable() {
            return None;
        }
        let (x, y) = entity.transform.cell();
        Some(Self {
            x,
            y,
            w: entity.sprite.width(),
            h: entity.sprite.height(),
        })
    }
}

/// Counters for one composite pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompositeStats {
    /// Entities painted.
    pub painted: usize,
    /// Previous-tick footprints blanked because they moved or vanished.
    pub cleared: usize,
}

pub struct Compositor {
    order: DrawOrder,
    // Footprints by slot index, for the last tick and the one being built.
    previous: Vec<Option<Footprint>>,
    current: Vec<Option<Footprint>>,
    queue: Vec<(i32, usize)>,
}

impl Compositor {
    pub fn new(order: DrawOrder) -> Self {
        Self {
            order,
            previous: Vec::new(),
            current: Vec::new(),
            queue: Vec::new(),
        }
    }

    pub fn order(&self) -> DrawOrder {
        self.order
    }

    /// Rebuild `working` from the registry.
    ///
    /// When `collisions` is given, solid masked sprites claim their masked
    /// cells in paint order and the tracker's frame is closed afterwards.
    pub fn compose(
        &mut self,
        registry: &Registry,
        working: &mut WorkingGrid,
        mut collisions: Option<&mut CollisionTracker>,
    ) -> CompositeStats {
        working.fill(None);
        if let Some(tracker) = collisions.as_deref_mut() {
            tracker.begin_frame();
        }

        let stats = registry.with_slots(|slots| {
            let mut stats = CompositeStats::default();

            self.current.clear();
            self.current
                .extend(slots.iter().map(|s| s.as_ref().and_then(Footprint::of)));

            // Blank whatever moved, resized, vanished or went inactive.
            for (i, prev) in self.previous.iter().enumerate() {
                let Some(prev) = prev else {
                    continue;
                };
                if self.current.get(i).copied().flatten() != Some(*prev) {
                    working.fill_rect(prev.x, prev.y, prev.w, prev.h, Some(BLANK));
                    stats.cleared += 1;
                }
            }

            self.queue.clear();
            for (i, fp) in self.current.iter().enumerate() {
                if fp.is_none() {
                    continue;
                }
                if let Some(entity) = &slots[i] {
                    self.queue.push((entity.transform.z_index, i));
                }
            }
            if self.order == DrawOrder::ZIndex {
                // Slot indices are unique, so equal z keeps slot order.
                self.queue.sort_unstable();
            }

            for &(_, i) in &self.queue {
                if let Some(entity) = &slots[i] {
                    paint(
                        EntityId::from_raw(i),
                        entity,
                        working,
                        collisions.as_deref_mut(),
                    );
                    stats.painted += 1;
                }
            }
            stats
        });

        if let Some(tracker) = collisions {
            tracker.end_frame();
        }
        std::mem::swap(&mut self.previous, &mut self.current);
        stats
    }
}

fn paint(
    id: EntityId,
    entity: &Entity,
    working: &mut WorkingGrid,
    mut collisions: Option<&mut CollisionTracker>,
) {
    let sprite = &entity.sprite;
    let (ox, oy) = entity.transform.cell();
    let claims = sprite.is_solid() && sprite.has_mask();

    for row in 0..sprite.height() {
        let y = oy.saturating_add(row as i32);
        for (col, &ch) in sprite.row(row).iter().enumerate() {
            let x = ox.saturating_add(col as i32);
            working.set_clipped(x, y, Some(ch));
            if claims && sprite.collides_at(col, row) {
                if let Some(tracker) = collisions.as_deref_mut() {
                    tracker.claim(id, x, y);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::sprite::Sprite;
    use crate::transform::Transform;
    use tui_retro_types::Vector2;

    fn entity(rows: &[&str], x: f32, y: f32) -> Entity {
        Entity::new(Sprite::from_rows(rows).unwrap()).at(Vector2::new(x, y))
    }

    fn row(g: &WorkingGrid, y: u16) -> String {
        (0..g.width())
            .map(|x| g.get(x, y).flatten().unwrap_or('.'))
            .collect()
    }

    #[test]
    fn paints_sprite_at_truncated_position() {
        let reg = Registry::new();
        reg.instantiate(&entity(&["AB"], 2.7, 1.2));
        let mut working = Grid::new(6, 3, None);
        let stats = Compositor::new(DrawOrder::Registry).compose(&reg, &mut working, None);

        assert_eq!(stats.painted, 1);
        assert_eq!(row(&working, 1), "..AB..");
        assert_eq!(row(&working, 0), "......");
    }

    #[test]
    fn later_entity_wins_even_with_a_space() {
        let reg = Registry::new();
        reg.instantiate(&entity(&["XXX"], 0.0, 0.0));
        reg.instantiate(&entity(&[" "], 1.0, 0.0));
        let mut working = Grid::new(3, 1, None);
        Compositor::new(DrawOrder::Registry).compose(&reg, &mut working, None);
        assert_eq!(row(&working, 0), "X X");
    }

    #[test]
    fn registry_order_ignores_z_index() {
        let reg = Registry::new();
        let front = entity(&["F"], 0.0, 0.0).with_transform(Transform::default().with_z_index(99));
        reg.instantiate(&front);
        reg.instantiate(&entity(&["B"], 0.0, 0.0));

        let mut working = Grid::new(1, 1, None);
        Compositor::new(DrawOrder::Registry).compose(&reg, &mut working, None);
        assert_eq!(working.get(0, 0), Some(Some('B')));

        Compositor::new(DrawOrder::ZIndex).compose(&reg, &mut working, None);
        assert_eq!(working.get(0, 0), Some(Some('F')));
    }

    #[test]
    fn inactive_and_destroyed_entities_are_skipped() {
        let reg = Registry::new();
        let mut hidden = entity(&["H"], 0.0, 0.0);
        hidden.set_active(false);
        reg.instantiate(&hidden);
        let gone = reg.instantiate(&entity(&["G"], 1.0, 0.0));
        reg.destroy(&gone, 0.0).unwrap();

        let mut working = Grid::new(2, 1, None);
        let stats = Compositor::new(DrawOrder::Registry).compose(&reg, &mut working, None);
        assert_eq!(stats.painted, 0);
        assert_eq!(row(&working, 0), "..");
    }

    #[test]
    fn sprites_clip_at_grid_edges() {
        let reg = Registry::new();
        reg.instantiate(&entity(&["abc", "def"], -1.0, 1.0));
        let mut working = Grid::new(3, 2, None);
        Compositor::new(DrawOrder::Registry).compose(&reg, &mut working, None);
        assert_eq!(row(&working, 0), "...");
        assert_eq!(row(&working, 1), "bc.");
    }

    #[test]
    fn vacated_cells_are_blanked_once() {
        let reg = Registry::new();
        let mut mover = reg.instantiate(&entity(&["@@"], 0.0, 0.0));
        let mut compositor = Compositor::new(DrawOrder::Registry);
        let mut working = Grid::new(4, 1, None);
        compositor.compose(&reg, &mut working, None);

        mover.translate(Vector2::RIGHT);
        reg.update(&mover).unwrap();
        let stats = compositor.compose(&reg, &mut working, None);
        assert_eq!(stats.cleared, 1);
        assert_eq!(row(&working, 0), " @@.");

        // Standing still needs no clearing.
        let stats = compositor.compose(&reg, &mut working, None);
        assert_eq!(stats.cleared, 0);
        assert_eq!(row(&working, 0), ".@@.");
    }

    #[test]
    fn destroyed_entity_footprint_is_blanked() {
        let reg = Registry::new();
        let e = reg.instantiate(&entity(&["#"], 1.0, 0.0));
        let mut compositor = Compositor::new(DrawOrder::Registry);
        let mut working = Grid::new(3, 1, None);
        compositor.compose(&reg, &mut working, None);

        reg.destroy(&e, 0.0).unwrap();
        compositor.compose(&reg, &mut working, None);
        assert_eq!(row(&working, 0), ". .");
    }

    #[test]
    fn masked_solid_sprites_report_overlaps() {
        let reg = Registry::new();
        let masked = |x| {
            Entity::new(Sprite::from_rows(&["##"]).unwrap().with_generated_mask(&[' ']))
                .at(Vector2::new(x, 0.0))
        };
        reg.instantiate(&masked(0.0));
        reg.instantiate(&masked(1.0));
        let mut ghost = masked(1.0);
        ghost.sprite.set_solid(false);
        reg.instantiate(&ghost);

        let mut tracker = CollisionTracker::new(4, 1);
        let mut working = Grid::new(4, 1, None);
        Compositor::new(DrawOrder::Registry).compose(&reg, &mut working, Some(&mut tracker));
        assert_eq!(
            tracker.overlaps(),
            &[(EntityId::from_raw(0), EntityId::from_raw(1))]
        );
    }
}
