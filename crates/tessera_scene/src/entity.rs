use std::{
    ops::Deref,
    sync::atomic::{AtomicUsize, Ordering},
};

use glam::Vec2;
use rustc_hash::FxHashMap;
use tessera_graphic::{Camera, Graphics};

use crate::{Component, ObjectList};

static ENTITY_GENERATOR: IdGenerator = IdGenerator::new();
static COMPONENT_GENERATOR: IdGenerator = IdGenerator::new();

#[derive(Debug)]
struct IdGenerator {
    current: AtomicUsize,
}

impl IdGenerator {
    const fn new() -> Self {
        Self {
            current: AtomicUsize::new(0),
        }
    }

    fn generate(&self) -> usize {
        self.current.fetch_add(1, Ordering::Relaxed)
    }
}

/// Identifier of an [Entity], unique for the whole process
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone, PartialOrd, Ord)]
pub struct EntityId(usize);

impl Deref for EntityId {
    type Target = usize;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Identifier of a component attached to an [Entity]
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone, PartialOrd, Ord)]
pub struct ComponentId(usize);

impl Deref for ComponentId {
    type Target = usize;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Which lifecycle steps an entity went through
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Lifecycle {
    pub created: bool,
    pub started: bool,
    pub in_scene: bool,
    pub recycled: bool,
    pub destroyed: bool,
}

/// A positioned object in a [Scene](crate::Scene), its behaviour comes from
/// the components attached to it
///
/// Components are owned by the entity: adding one moves it in, so the same
/// instance can never be attached twice.
#[derive(Debug)]
pub struct Entity {
    id: EntityId,
    pub position: Vec2,
    pub active: bool,
    pub visible: bool,
    depth: i32,
    depth_dirty: bool,
    groups: Vec<String>,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) components: ObjectList<ComponentId>,
    pub(crate) component_store: FxHashMap<ComponentId, Box<dyn Component>>,
    /// Attached while in a scene, waiting for `added_to_scene`
    pub(crate) attached: Vec<ComponentId>,
    /// Detached while in a scene, waiting for `removed_from_scene`; the box is
    /// missing when the component detached itself from one of its own hooks
    pub(crate) detached: Vec<(ComponentId, Option<Box<dyn Component>>)>,
}

impl Default for Entity {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

impl Entity {
    pub fn new(position: Vec2) -> Self {
        Self {
            id: EntityId(ENTITY_GENERATOR.generate()),
            position,
            active: true,
            visible: true,
            depth: 0,
            depth_dirty: false,
            groups: Vec::new(),
            lifecycle: Lifecycle::default(),
            components: ObjectList::new(),
            component_store: FxHashMap::default(),
            attached: Vec::new(),
            detached: Vec::new(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_in_scene(&self) -> bool {
        self.lifecycle.in_scene
    }

    /// Allows `created` hooks to fire again on the next scene add
    pub fn reset_created(&mut self) {
        self.lifecycle.created = false;
    }

    /// Render order key, lower depths are drawn later and end up on top
    pub fn depth(&self) -> i32 {
        self.depth
    }

    pub fn set_depth(&mut self, depth: i32) {
        if self.depth != depth {
            self.depth = depth;
            self.depth_dirty = true;
        }
    }

    pub(crate) fn take_depth_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.depth_dirty, false)
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn in_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }

    pub fn group(&mut self, group: &str) {
        if !self.in_group(group) {
            self.groups.push(group.to_owned());
        }
    }

    pub fn ungroup(&mut self, group: &str) {
        self.groups.retain(|g| g != group);
    }

    /// Moves `component` into the entity
    pub fn add(&mut self, component: impl Component) -> ComponentId {
        self.add_boxed(Box::new(component))
    }

    pub fn add_boxed(&mut self, mut component: Box<dyn Component>) -> ComponentId {
        let id = ComponentId(COMPONENT_GENERATOR.generate());
        component.added_to_entity(self.id);
        self.components.add(id);
        self.component_store.insert(id, component);
        if self.lifecycle.in_scene {
            self.attached.push(id);
        }
        id
    }

    /// Detaches a component, returns `false` when it is not attached
    pub fn remove(&mut self, id: ComponentId) -> bool {
        if !self.components.remove(&id) {
            return false;
        }

        let component = self.component_store.remove(&id);
        if let Some(index) = self.attached.iter().position(|a| *a == id) {
            self.attached.remove(index);
        } else if self.lifecycle.in_scene {
            self.detached.push((id, component));
            return true;
        }

        if let Some(mut component) = component {
            component.removed_from_entity(self.id);
        }
        true
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.components.contains(&id)
    }

    pub fn component_ids(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.components.iter().copied()
    }

    pub fn component_count(&self) -> usize {
        self.components.count()
    }

    pub fn get(&self, id: ComponentId) -> Option<&dyn Component> {
        self.component_store.get(&id).map(|c| c.as_ref())
    }

    pub fn get_mut(&mut self, id: ComponentId) -> Option<&mut (dyn Component + 'static)> {
        self.component_store.get_mut(&id).map(|c| c.as_mut())
    }

    pub fn get_as<T: Component>(&self, id: ComponentId) -> Option<&T> {
        self.component_store
            .get(&id)
            .and_then(|c| c.downcast_ref::<T>())
    }

    pub fn get_as_mut<T: Component>(&mut self, id: ComponentId) -> Option<&mut T> {
        self.component_store
            .get_mut(&id)
            .and_then(|c| c.downcast_mut::<T>())
    }

    /// First attached component of type `T`, in attachment order
    pub fn first<T: Component>(&self) -> Option<(ComponentId, &T)> {
        self.components.iter().find_map(|id| {
            self.component_store
                .get(id)
                .and_then(|c| c.downcast_ref::<T>())
                .map(|c| (*id, c))
        })
    }

    /// Every attached component in attachment order
    pub fn components(&self) -> impl Iterator<Item = (ComponentId, &dyn Component)> + '_ {
        self.components.iter().filter_map(|id| {
            self.component_store
                .get(id)
                .map(|c| (*id, c.as_ref()))
        })
    }

    /// Renders every visible component in attachment order
    pub fn render(&self, gfx: &mut Graphics, camera: &Camera) {
        for (_, component) in self.components() {
            if component.visible() {
                component.render(self, gfx, camera);
            }
        }
    }

    pub fn debug_render(&self, gfx: &mut Graphics, camera: &Camera) {
        for (_, component) in self.components() {
            component.debug_render(self, gfx, camera);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Counter {
        added: usize,
        removed: usize,
    }

    impl Component for Counter {
        fn added_to_entity(&mut self, _entity: EntityId) {
            self.added += 1;
        }

        fn removed_from_entity(&mut self, _entity: EntityId) {
            self.removed += 1;
        }
    }

    #[test]
    fn generate_ids() {
        let a = Entity::default();
        let b = Entity::default();

        assert!(*b.id() > *a.id());
    }

    #[test]
    fn add_and_remove_components() {
        let mut entity = Entity::default();
        let first = entity.add(Counter::default());
        let second = entity.add(Counter::default());

        assert_ne!(first, second);
        assert_eq!(entity.component_count(), 2);
        assert_eq!(entity.get_as::<Counter>(first).unwrap().added, 1);
        assert_eq!(entity.first::<Counter>().map(|(id, _)| id), Some(first));

        assert!(entity.remove(first));
        assert!(!entity.remove(first));
        assert!(!entity.contains(first));
        assert_eq!(entity.component_ids().collect::<Vec<_>>(), vec![second]);
    }

    #[test]
    fn depth_change_is_tracked() {
        let mut entity = Entity::default();

        entity.set_depth(0);
        assert!(!entity.take_depth_dirty());

        entity.set_depth(-3);
        assert!(entity.take_depth_dirty());
        assert!(!entity.take_depth_dirty());
        assert_eq!(entity.depth(), -3);
    }

    #[test]
    fn groups_are_a_set() {
        let mut entity = Entity::default();
        entity.group("enemy");
        entity.group("enemy");
        entity.group("flying");

        assert_eq!(entity.groups(), ["enemy", "flying"]);
        entity.ungroup("enemy");
        assert!(!entity.in_group("enemy"));
    }
}
