//! Timer worker for delayed destruction.
//!
//! Runs on its own tokio runtime, off the tick loop. A fired timer nulls its
//! slot through the same lock the loop reads under, so a slot may be seen live
//! during one tick and gone on the next.

use std::io;
use std::sync::Weak;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use crate::entity::{Entity, EntityId};

pub(crate) type Slots = Vec<Option<Entity>>;

pub(crate) struct DestroyTimer {
    rt: Option<Runtime>,
}

impl DestroyTimer {
    pub(crate) fn start() -> io::Result<Self> {
        let rt = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("retro-destroy-timer")
            .enable_time()
            .build()?;
        Ok(Self { rt: Some(rt) })
    }

    /// Null slot `id` once `delay` has elapsed. Not cancellable.
    pub(crate) fn schedule(&self, slots: Weak<RwLock<Slots>>, id: EntityId, delay: Duration) {
        let Some(rt) = &self.rt else {
            return;
        };
        rt.spawn(async move {
            tokio::time::sleep(delay).await;
            // Registry already dropped: nothing left to destroy.
            let Some(slots) = slots.upgrade() else {
                return;
            };
            let removed = slots
                .write()
                .get_mut(id.index())
                .and_then(Option::take)
                .is_some();
            debug!(%id, removed, "delayed destroy fired");
        });
    }
}

impl Drop for DestroyTimer {
    fn drop(&mut self) {
        // Pending timers die with the registry.
        if let Some(rt) = self.rt.take() {
            rt.shutdown_background();
        }
    }
}
