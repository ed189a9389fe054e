//! Registry: append-only slot store of live entities.
//!
//! Every instantiated entity gets the next sequential [`EntityId`] (the slot
//! count before the append). Destroying an entity tombstones its slot; slots are
//! never compacted or reused, so an identifier keeps addressing the same
//! logical entity for the whole run.
//!
//! `Registry` is a cheap, cloneable handle. The loop controller, host callbacks
//! and the delayed-destruction worker all share one slot store.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::entity::{CollisionEvents, Entity, EntityId};
use crate::error::RegistryError;
use crate::timer::{DestroyTimer, Slots};

#[derive(Clone, Default)]
pub struct Registry {
    slots: Arc<RwLock<Slots>>,
    // Started on the first delayed destroy.
    timer: Arc<Mutex<Option<DestroyTimer>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots ever allocated, tombstones included.
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }

    /// Number of slots still holding an entity.
    pub fn live_count(&self) -> usize {
        self.slots.read().iter().filter(|s| s.is_some()).count()
    }

    /// Register a copy of `template` and return the live instance.
    ///
    /// The copy shares no mutable state with `template`. Instantiating an
    /// already live entity registers a second, independent copy.
    pub fn instantiate(&self, template: &Entity) -> Entity {
        let mut slots = self.slots.write();
        let id = EntityId::from_raw(slots.len());
        let live = template.registered_as(id);
        slots.push(Some(live.clone()));
        debug!(%id, name = %live.name, "instantiated");
        live
    }

    /// [`instantiate`](Self::instantiate) with the copy renamed to `name`.
    pub fn instantiate_named(&self, template: &Entity, name: &str) -> Entity {
        let mut renamed = template.clone();
        renamed.name = name.to_string();
        self.instantiate(&renamed)
    }

    /// Overwrite the entity's slot with its current field values.
    ///
    /// Returns `Ok(false)` without writing when `entity` is a template or its
    /// slot was already destroyed; destroyed entities stay destroyed.
    pub fn update(&self, entity: &Entity) -> Result<bool, RegistryError> {
        let Some(id) = entity.id() else {
            return Ok(false);
        };
        let mut slots = self.slots.write();
        let len = slots.len();
        let slot = slots
            .get_mut(id.index())
            .ok_or(RegistryError::NotInstantiated { id, len })?;
        match slot {
            Some(current) => {
                *current = entity.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Mutate a live entity in place. Returns `Ok(None)` if it was destroyed.
    pub fn modify<R>(
        &self,
        id: EntityId,
        f: impl FnOnce(&mut Entity) -> R,
    ) -> Result<Option<R>, RegistryError> {
        let mut slots = self.slots.write();
        let len = slots.len();
        let slot = slots
            .get_mut(id.index())
            .ok_or(RegistryError::NotInstantiated { id, len })?;
        Ok(slot.as_mut().map(f))
    }

    /// Destroy `entity`, immediately when `delay_secs <= 0`, otherwise once
    /// the delay has elapsed on the timer worker.
    ///
    /// Destroying a template is reported as [`RegistryError::MissingIdentifier`].
    /// Destroying an already destroyed entity is a no-op.
    pub fn destroy(&self, entity: &Entity, delay_secs: f32) -> Result<(), RegistryError> {
        let id = entity.id().ok_or(RegistryError::MissingIdentifier)?;
        self.destroy_id(id, delay_secs)
    }

    pub fn destroy_id(&self, id: EntityId, delay_secs: f32) -> Result<(), RegistryError> {
        {
            let mut slots = self.slots.write();
            let len = slots.len();
            let slot = slots
                .get_mut(id.index())
                .ok_or(RegistryError::NotInstantiated { id, len })?;

            if delay_secs.is_nan() || delay_secs <= 0.0 {
                if slot.take().is_some() {
                    debug!(%id, "destroyed");
                }
                return Ok(());
            }
        }

        let Ok(delay) = Duration::try_from_secs_f32(delay_secs) else {
            warn!(%id, delay_secs, "destroy delay out of range, ignored");
            return Ok(());
        };
        let mut timer = self.timer.lock();
        if timer.is_none() {
            *timer = Some(DestroyTimer::start()?);
        }
        if let Some(timer) = timer.as_ref() {
            timer.schedule(Arc::downgrade(&self.slots), id, delay);
            debug!(%id, ?delay, "destroy scheduled");
        }
        Ok(())
    }

    /// First live entity, in registry order, named `name`.
    pub fn find(&self, name: &str) -> Option<Entity> {
        self.slots
            .read()
            .iter()
            .flatten()
            .find(|e| e.name == name)
            .cloned()
    }

    /// Resolve `entity` by its stored identifier.
    ///
    /// Templates resolve to `None`, as do destroyed entities. An identifier
    /// past the end of the registry is a caller bug and is reported as
    /// [`RegistryError::NotInstantiated`].
    pub fn get(&self, entity: &Entity) -> Result<Option<Entity>, RegistryError> {
        match entity.id() {
            Some(id) => self.get_id(id),
            None => Ok(None),
        }
    }

    pub fn get_id(&self, id: EntityId) -> Result<Option<Entity>, RegistryError> {
        let slots = self.slots.read();
        match slots.get(id.index()) {
            Some(slot) => Ok(slot.clone()),
            None => {
                warn!(%id, len = slots.len(), "lookup past end of registry");
                Err(RegistryError::NotInstantiated {
                    id,
                    len: slots.len(),
                })
            }
        }
    }

    pub fn is_live(&self, id: EntityId) -> bool {
        matches!(self.slots.read().get(id.index()), Some(Some(_)))
    }

    /// Collision capability of a live entity, if it has one.
    pub fn events_of(&self, id: EntityId) -> Option<Arc<dyn CollisionEvents>> {
        self.slots
            .read()
            .get(id.index())
            .and_then(Option::as_ref)
            .and_then(|e| e.events().cloned())
    }

    /// Run `f` over the raw slot sequence under the read lock.
    ///
    /// `f` must not call back into the registry's mutating operations.
    pub fn with_slots<R>(&self, f: impl FnOnce(&[Option<Entity>]) -> R) -> R {
        f(&self.slots.read())
    }
}
