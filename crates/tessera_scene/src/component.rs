use std::fmt::Debug;

use downcast_rs::{impl_downcast, Downcast};
use tessera_graphic::{Camera, Graphics};

use crate::{Collider, ColliderQuery, ColliderRef, ComponentId, Entity, EntityId, Scene};

/// Behaviour attached to an [Entity]
///
/// Every hook has an empty default. Hooks that receive a
/// [ComponentContext] run while the component is temporarily detached from
/// its entity, so the context can hand out the entity, its other components
/// and the whole scene without aliasing `self`.
pub trait Component: Downcast + Debug {
    fn active(&self) -> bool {
        true
    }

    fn visible(&self) -> bool {
        true
    }

    fn added_to_entity(&mut self, _entity: EntityId) {}

    fn removed_from_entity(&mut self, _entity: EntityId) {}

    /// The entity joined a scene for the first time
    fn created(&mut self, _ctx: &mut ComponentContext) {}

    fn added_to_scene(&mut self, _ctx: &mut ComponentContext) {}

    /// First update tick of the entity in a scene
    fn started(&mut self, _ctx: &mut ComponentContext) {}

    fn update(&mut self, _ctx: &mut ComponentContext) {}

    fn removed_from_scene(&mut self, _ctx: &mut ComponentContext) {}

    /// The entity went back to a scene pool
    fn recycled(&mut self, _ctx: &mut ComponentContext) {}

    /// The entity left its scene for good
    fn destroyed(&mut self, _ctx: &mut ComponentContext) {}

    fn render(&self, _entity: &Entity, _gfx: &mut Graphics, _camera: &Camera) {}

    /// Drawn with the primitive shader when the scene debug overlay is on
    fn debug_render(&self, _entity: &Entity, _gfx: &mut Graphics, _camera: &Camera) {}

    fn as_collider(&self) -> Option<&dyn Collider> {
        None
    }

    fn as_collider_mut(&mut self) -> Option<&mut dyn Collider> {
        None
    }
}
impl_downcast!(Component);

/// What a component hook can reach while it runs
pub struct ComponentContext<'a> {
    pub scene: &'a mut Scene,
    entity: EntityId,
    component: ComponentId,
}

impl<'a> ComponentContext<'a> {
    pub(crate) fn new(scene: &'a mut Scene, entity: EntityId, component: ComponentId) -> Self {
        Self {
            scene,
            entity,
            component,
        }
    }

    /// Id of the component the hook belongs to
    pub fn id(&self) -> ComponentId {
        self.component
    }

    pub fn entity_id(&self) -> EntityId {
        self.entity
    }

    pub fn delta(&self) -> f32 {
        self.scene.delta()
    }

    pub fn entity(&self) -> &Entity {
        self.scene
            .entity(self.entity)
            .unwrap_or_else(|| panic!("entity {:?} left the scene during a hook", self.entity))
    }

    pub fn entity_mut(&mut self) -> &mut Entity {
        let entity = self.entity;
        self.scene
            .entity_mut(entity)
            .unwrap_or_else(|| panic!("entity {:?} left the scene during a hook", entity))
    }

    /// Another component of the same entity
    pub fn sibling<T: Component>(&self, id: ComponentId) -> Option<&T> {
        self.entity().get_as::<T>(id)
    }

    pub fn sibling_mut<T: Component>(&mut self, id: ComponentId) -> Option<&mut T> {
        self.entity_mut().get_as_mut::<T>(id)
    }

    /// Collision queries for a collider of the same entity
    pub fn collider_query(&self, collider: ComponentId) -> ColliderQuery<'_> {
        self.scene.collider_query(ColliderRef {
            entity: self.entity,
            component: collider,
        })
    }

    /// Tags the collider the hook belongs to, indexing it right away when it
    /// is already part of the scene
    pub fn tag_self(&mut self, collider: &mut dyn Collider, tag: &str) {
        if collider.tags().iter().any(|t| t == tag) {
            return;
        }
        collider.tags_mut().push(tag.to_owned());

        let reference = ColliderRef {
            entity: self.entity,
            component: self.component,
        };
        if self.entity().is_in_scene() && self.entity().contains(self.component) {
            self.scene.track_collider(reference, tag);
        }
    }
}
