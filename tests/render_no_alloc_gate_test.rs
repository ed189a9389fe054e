use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tui_retro::core::{Entity, EntityId, FrameRenderer, OutputSurface, Registry, Sprite};
use tui_retro::types::{DrawOrder, Vector2};

struct CountingAlloc;

static COUNT_ENABLED: AtomicBool = AtomicBool::new(false);
static ALLOC_COUNT: AtomicUsize = AtomicUsize::new(0);

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            let _ = layout;
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            let _ = (layout, new_size);
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.realloc(ptr, layout, new_size)
    }
}

fn with_alloc_counting<F: FnOnce()>(f: F) -> usize {
    ALLOC_COUNT.store(0, Ordering::Relaxed);
    COUNT_ENABLED.store(true, Ordering::Relaxed);
    f();
    COUNT_ENABLED.store(false, Ordering::Relaxed);
    ALLOC_COUNT.load(Ordering::Relaxed)
}

/// Counts writes without storing them.
#[derive(Default)]
struct NullSurface {
    writes: usize,
}

impl OutputSurface for NullSurface {
    fn write_cell(&mut self, _ch: char, _x: u16, _y: u16) {
        self.writes += 1;
    }
}

fn populate(reg: &Registry) -> EntityId {
    let rock = Sprite::from_rows(&["/--\\", "\\__/"]).unwrap();
    for i in 0..30 {
        let mut e = Entity::new(rock.clone()).at(Vector2::new((i * 3 % 70) as f32, (i % 20) as f32));
        e.transform.z_index = i % 4;
        reg.instantiate(&e);
    }
    // Two masked blocks overlapping for the whole run.
    let block = Sprite::from_rows(&["##"]).unwrap().with_generated_mask(&[' ']);
    reg.instantiate(&Entity::new(block.clone()).at(Vector2::new(10.0, 22.0)));
    reg.instantiate(&Entity::new(block).at(Vector2::new(11.0, 22.0)));

    let mover = reg.instantiate(&Entity::new(Sprite::from_rows(&[">>"]).unwrap()));
    mover.id().unwrap()
}

#[test]
fn render_is_allocation_free_after_warmup() {
    // One test per binary: the counter is process-global.
    for order in [DrawOrder::Registry, DrawOrder::ZIndex] {
        let reg = Registry::new();
        let mover = populate(&reg);
        let mut renderer = FrameRenderer::new(80, 24, order).with_collisions();
        let mut out = NullSurface::default();

        // Warm-up grows the compositor's, tracker's and overlay's buffers.
        for _ in 0..3 {
            renderer.overlay().put_str(0, 0, "LIVES 3", true);
            renderer.render(&reg, &mut out).unwrap();
        }

        let allocs = with_alloc_counting(|| {
            for t in 0..200 {
                reg.modify(mover, |e| {
                    e.transform.position = Vector2::new((t % 78) as f32, 23.0);
                })
                .unwrap();
                renderer.overlay().put_str(0, 0, "LIVES 3", true);
                renderer.render(&reg, &mut out).unwrap();
            }
        });

        assert!(out.writes > 0);
        assert_eq!(allocs, 0, "{order:?}");
    }
}
