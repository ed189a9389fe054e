//! FrameRenderer: composite + diff-flush as one step.

use std::io;

use tui_retro_types::DrawOrder;

use crate::collision::CollisionTracker;
use crate::compositor::{CompositeStats, Compositor};
use crate::diff::DiffRenderer;
use crate::grid::{CharGrid, Grid, WorkingGrid};
use crate::overlay::Overlay;
use crate::registry::Registry;
use crate::surface::OutputSurface;

/// Counters for one rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub composite: CompositeStats,
    /// Cells sent to the output surface.
    pub writes: usize,
}

/// Owns both frame buffers: the working grid rebuilt every tick and the
/// flushed baseline inside the diff renderer.
pub struct FrameRenderer {
    working: WorkingGrid,
    compositor: Compositor,
    diff: DiffRenderer,
    collisions: Option<CollisionTracker>,
    overlay: Overlay,
}

impl FrameRenderer {
    pub fn new(width: u16, height: u16, order: DrawOrder) -> Self {
        Self {
            working: Grid::new(width, height, None),
            compositor: Compositor::new(order),
            diff: DiffRenderer::new(width, height),
            collisions: None,
            overlay: Overlay::new(),
        }
    }

    /// Enable overlap bookkeeping.
    pub fn with_collisions(mut self) -> Self {
        self.collisions = Some(CollisionTracker::new(
            self.working.width(),
            self.working.height(),
        ));
        self
    }

    pub fn width(&self) -> u16 {
        self.working.width()
    }

    pub fn height(&self) -> u16 {
        self.working.height()
    }

    /// Composite the registry, apply staged overlay writes, flush the
    /// changes to `out`, then present.
    ///
    /// If presenting fails the surface may not show what was flushed, so the
    /// next render repaints every cell.
    pub fn render(
        &mut self,
        registry: &Registry,
        out: &mut dyn OutputSurface,
    ) -> io::Result<FrameStats> {
        let composite = self
            .compositor
            .compose(registry, &mut self.working, self.collisions.as_mut());
        self.overlay.apply(&mut self.working);
        let writes = self.diff.flush(&self.working, out);
        if let Err(err) = out.present() {
            self.diff.invalidate();
            return Err(err);
        }
        Ok(FrameStats { composite, writes })
    }

    /// Direct cell writes applied on the next render.
    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn working(&self) -> &WorkingGrid {
        &self.working
    }

    pub fn flushed(&self) -> &CharGrid {
        self.diff.flushed()
    }

    pub fn collisions(&self) -> Option<&CollisionTracker> {
        self.collisions.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use crate::sprite::Sprite;

    /// Surface whose next `present` fails once.
    #[derive(Default)]
    struct FlakySurface {
        fail_next: bool,
        writes: usize,
    }

    impl OutputSurface for FlakySurface {
        fn write_cell(&mut self, _ch: char, _x: u16, _y: u16) {
            self.writes += 1;
        }

        fn present(&mut self) -> io::Result<()> {
            if std::mem::take(&mut self.fail_next) {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
            }
            Ok(())
        }
    }

    #[test]
    fn failed_present_forces_a_full_repaint() {
        let reg = Registry::new();
        reg.instantiate(&Entity::new(Sprite::from_rows(&["ok"]).unwrap()));
        let mut renderer = FrameRenderer::new(4, 2, DrawOrder::Registry);
        let mut out = FlakySurface {
            fail_next: true,
            ..FlakySurface::default()
        };

        assert!(renderer.render(&reg, &mut out).is_err());
        out.writes = 0;
        assert_eq!(renderer.render(&reg, &mut out).unwrap().writes, 8);
        assert_eq!(renderer.render(&reg, &mut out).unwrap().writes, 0);
        assert_eq!(renderer.flushed().row_string(0), "ok  ");
    }

    #[test]
    fn overlay_wins_over_entities_and_repeats_for_free() {
        let reg = Registry::new();
        reg.instantiate(&Entity::new(Sprite::from_rows(&["####"]).unwrap()));
        let mut renderer = FrameRenderer::new(4, 1, DrawOrder::Registry);
        let mut out = FlakySurface::default();

        renderer.overlay().put_str(1, 0, "42", true);
        assert_eq!(renderer.render(&reg, &mut out).unwrap().writes, 4);
        assert_eq!(renderer.flushed().row_string(0), "#42#");

        renderer.overlay().put_str(1, 0, "42", true);
        assert_eq!(renderer.render(&reg, &mut out).unwrap().writes, 0);
    }
}
