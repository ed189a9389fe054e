//! Entities: a sprite at a transform, plus a name and activation flag.
//!
//! An entity without an identifier is a *template*. Registering it through
//! [`Registry::instantiate`](crate::Registry::instantiate) produces a *live*
//! copy carrying the identifier of its registry slot.

use std::fmt;
use std::sync::Arc;

use tui_retro_types::{Vector2, DEFAULT_ENTITY_NAME};

use crate::sprite::Sprite;
use crate::transform::Transform;

/// Stable handle of a registry slot.
///
/// Handles are assigned sequentially and never reused within a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(usize);

impl EntityId {
    /// Build a handle from a raw slot index.
    pub const fn from_raw(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Collision-response capability.
///
/// Entities that want overlap notifications attach an implementation with
/// [`Entity::with_events`]; every hook defaults to doing nothing.
pub trait CollisionEvents: Send + Sync {
    /// `this` started overlapping `other` this tick.
    fn on_collision_enter(&self, _this: EntityId, _other: EntityId) {}

    /// `this` was already overlapping `other` last tick and still is.
    fn on_collision_stay(&self, _this: EntityId, _other: EntityId) {}

    /// `this` stopped overlapping `other` this tick.
    fn on_collision_exit(&self, _this: EntityId, _other: EntityId) {}
}

/// A drawable, positioned object.
#[derive(Clone)]
pub struct Entity {
    pub sprite: Sprite,
    pub transform: Transform,
    pub name: String,
    active: bool,
    id: Option<EntityId>,
    events: Option<Arc<dyn CollisionEvents>>,
}

impl Default for Entity {
    fn default() -> Self {
        Self {
            sprite: Sprite::default(),
            transform: Transform::default(),
            name: DEFAULT_ENTITY_NAME.to_string(),
            active: true,
            id: None,
            events: None,
        }
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("active", &self.active)
            .field("transform", &self.transform)
            .field("sprite", &(self.sprite.width(), self.sprite.height()))
            .field("events", &self.events.is_some())
            .finish()
    }
}

impl Entity {
    /// A template with the default transform.
    pub fn new(sprite: Sprite) -> Self {
        Self {
            sprite,
            ..Self::default()
        }
    }

    /// A spriteless template at `transform`.
    pub fn from_transform(transform: Transform) -> Self {
        Self {
            transform,
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn at(mut self, position: Vector2) -> Self {
        self.transform.position = position;
        self
    }

    pub fn with_events(mut self, events: Arc<dyn CollisionEvents>) -> Self {
        self.events = Some(events);
        self
    }

    /// Registry handle, or `None` for a template.
    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    pub fn is_template(&self) -> bool {
        self.id.is_none()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn events(&self) -> Option<&Arc<dyn CollisionEvents>> {
        self.events.as_ref()
    }

    pub fn set_events(&mut self, events: Option<Arc<dyn CollisionEvents>>) {
        self.events = events;
    }

    pub fn translate(&mut self, translation: Vector2) {
        self.transform.translate(translation);
    }

    /// Active and carrying a non-empty sprite.
    pub fn is_drawable(&self) -> bool {
        self.active && !self.sprite.is_empty()
    }

    /// Copy of this entity registered under `id`.
    pub(crate) fn registered_as(&self, id: EntityId) -> Self {
        let mut live = self.clone();
        live.id = Some(id);
        live
    }
}
