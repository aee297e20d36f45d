use std::rc::Rc;

use rustc_hash::FxHashMap;
use tessera_graphic::{BlendMode, Camera, Graphics};

use crate::{
    ColliderQuery, ColliderRef, Component, ComponentContext, ComponentId, Entity, EntityId,
    EverythingRenderer, ObjectList, OverlapRegistry, Renderer,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Removal {
    Remove,
    Recycle(String),
    Destroy,
}

/// A set of entities updated and rendered together
///
/// The scene owns its entities and the components attached to them. While a
/// component hook runs the component is taken out of its entity and the
/// entity is marked as visited: removing a visited entity is delayed until
/// the hook returns, so hooks can safely remove their own entity.
pub struct Scene {
    entities: ObjectList<EntityId>,
    store: FxHashMap<EntityId, Entity>,
    pool: FxHashMap<String, Vec<Entity>>,
    colliders: FxHashMap<String, Vec<ColliderRef>>,
    /// Tags each collider is indexed under, untracking reads from here
    tracked: FxHashMap<ColliderRef, Vec<String>>,
    overlaps: Rc<OverlapRegistry>,
    renderers: Vec<Box<dyn Renderer>>,
    visiting: Vec<EntityId>,
    deferred: Vec<(EntityId, Removal)>,
    delta: f32,
    running: bool,
    pub camera: Camera,
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("entities", &self.entities.count())
            .field("pooled", &self.pool.values().map(Vec::len).sum::<usize>())
            .field("tags", &self.colliders.len())
            .field("renderers", &self.renderers.len())
            .field("running", &self.running)
            .field("camera", &self.camera)
            .finish()
    }
}

impl Scene {
    pub fn new(overlaps: Rc<OverlapRegistry>, camera: Camera) -> Self {
        Self {
            entities: ObjectList::new(),
            store: FxHashMap::default(),
            pool: FxHashMap::default(),
            colliders: FxHashMap::default(),
            tracked: FxHashMap::default(),
            overlaps,
            renderers: Vec::new(),
            visiting: Vec::new(),
            deferred: Vec::new(),
            delta: 0.0,
            running: false,
            camera,
        }
    }

    /// The scene became the active one
    pub fn begin(&mut self) {
        self.running = true;
        log::debug!("scene begins with {} entities", self.entities.count());
    }

    /// The scene stopped being the active one
    pub fn ended(&mut self) {
        self.running = false;
        log::debug!("scene ended with {} entities", self.entities.count());
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Seconds elapsed during the current update
    pub fn delta(&self) -> f32 {
        self.delta
    }

    pub fn overlaps(&self) -> &OverlapRegistry {
        &self.overlaps
    }

    pub fn entity_count(&self) -> usize {
        self.entities.count()
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.store.get(&id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.store.get_mut(&id)
    }

    /// Entities in render order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.iter().filter_map(|id| self.store.get(id))
    }

    /// Moves `entity` into the scene
    ///
    /// `created` fires only the first time an entity joins a scene,
    /// `added_to_scene` every time.
    pub fn add(&mut self, mut entity: Entity) -> EntityId {
        let id = entity.id();
        let first_time = !entity.lifecycle.created;
        entity.lifecycle.created = true;
        entity.lifecycle.in_scene = true;
        entity.lifecycle.started = false;
        entity.lifecycle.recycled = false;

        let components: Vec<ComponentId> = entity.component_ids().collect();
        self.entities.add(id);
        self.store.insert(id, entity);
        log::trace!("entity {:?} added", id);

        if first_time {
            for component in components.iter() {
                self.with_component(id, *component, |c, ctx| c.created(ctx));
            }
        }
        for component in components {
            if self.store.get(&id).map_or(false, |e| e.contains(component)) {
                self.track_component(id, component);
                self.with_component(id, component, |c, ctx| c.added_to_scene(ctx));
            }
        }

        id
    }

    /// Takes `id` out of the scene
    ///
    /// Returns `None` when the entity is not in the scene, or when it is in
    /// the middle of one of its hooks: the removal then happens as soon as
    /// the hook returns and the entity is dropped.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.remove_entity(id, Removal::Remove)
    }

    /// Removes `id` and keeps it in the pool under `bucket`
    pub fn recycle(&mut self, id: EntityId, bucket: &str) {
        self.remove_entity(id, Removal::Recycle(bucket.to_owned()));
    }

    /// Adds back the last entity recycled under `bucket`
    pub fn recreate(&mut self, bucket: &str) -> Option<EntityId> {
        let entity = self.pool.get_mut(bucket)?.pop()?;
        Some(self.add(entity))
    }

    /// Removes `id` for good
    pub fn destroy(&mut self, id: EntityId) {
        self.remove_entity(id, Removal::Destroy);
    }

    pub fn pooled(&self, bucket: &str) -> usize {
        self.pool.get(bucket).map_or(0, Vec::len)
    }

    /// Attaches a component to an entity of the scene and fires its scene
    /// hooks
    pub fn add_component(
        &mut self,
        id: EntityId,
        component: impl Component,
    ) -> Option<ComponentId> {
        let component = self.store.get_mut(&id)?.add(component);
        self.settle(id);
        Some(component)
    }

    pub fn remove_component(&mut self, id: EntityId, component: ComponentId) -> bool {
        let removed = self
            .store
            .get_mut(&id)
            .map_or(false, |entity| entity.remove(component));
        self.settle(id);
        removed
    }

    pub fn first_in_group(&self, group: &str) -> Option<&Entity> {
        self.entities().find(|entity| entity.in_group(group))
    }

    pub fn all_in_group<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a Entity> + 'a {
        self.entities().filter(move |entity| entity.in_group(group))
    }

    pub fn count_in_group(&self, group: &str) -> usize {
        self.all_in_group(group).count()
    }

    pub fn first_collider_in_tag(&self, tag: &str) -> Option<ColliderRef> {
        self.all_colliders_in_tag(tag).first().copied()
    }

    /// Colliders currently indexed under `tag`, in tagging order
    pub fn all_colliders_in_tag(&self, tag: &str) -> &[ColliderRef] {
        self.colliders.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn collider_query(&self, collider: ColliderRef) -> ColliderQuery<'_> {
        ColliderQuery::new(self, collider)
    }

    /// Adds `tag` to a collider, indexing it when its entity is in the scene
    ///
    /// Returns `false` when `collider` does not address a collider.
    pub fn tag_collider(&mut self, collider: ColliderRef, tag: &str) -> bool {
        let Some(entity) = self.store.get_mut(&collider.entity) else {
            return false;
        };
        let in_scene = entity.is_in_scene();
        let Some(shape) = entity
            .get_mut(collider.component)
            .and_then(|c| c.as_collider_mut())
        else {
            return false;
        };

        if !shape.tags().iter().any(|t| t == tag) {
            shape.tags_mut().push(tag.to_owned());
        }
        if in_scene {
            self.track_collider(collider, tag);
        }
        true
    }

    pub fn untag_collider(&mut self, collider: ColliderRef, tag: &str) -> bool {
        let Some(shape) = self
            .store
            .get_mut(&collider.entity)
            .and_then(|entity| entity.get_mut(collider.component))
            .and_then(|c| c.as_collider_mut())
        else {
            return false;
        };

        shape.tags_mut().retain(|t| t != tag);
        self.untrack_collider(collider, tag);
        true
    }

    pub(crate) fn track_collider(&mut self, collider: ColliderRef, tag: &str) {
        let colliders = self.colliders.entry(tag.to_owned()).or_default();
        if !colliders.contains(&collider) {
            colliders.push(collider);
        }

        let tags = self.tracked.entry(collider).or_default();
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_owned());
        }
    }

    fn untrack_collider(&mut self, collider: ColliderRef, tag: &str) {
        if let Some(colliders) = self.colliders.get_mut(tag) {
            colliders.retain(|c| *c != collider);
            if colliders.is_empty() {
                self.colliders.remove(tag);
            }
        }

        if let Some(tags) = self.tracked.get_mut(&collider) {
            tags.retain(|t| t != tag);
            if tags.is_empty() {
                self.tracked.remove(&collider);
            }
        }
    }

    /// Drops `collider` from every tag it was indexed under, whatever its
    /// tags are now
    fn untrack_all(&mut self, collider: ColliderRef) {
        for tag in self.tracked.remove(&collider).unwrap_or_default() {
            if let Some(colliders) = self.colliders.get_mut(&tag) {
                colliders.retain(|c| *c != collider);
                if colliders.is_empty() {
                    self.colliders.remove(&tag);
                }
            }
        }
    }

    fn collider_tags(&self, id: EntityId, component: ComponentId) -> Vec<String> {
        self.store
            .get(&id)
            .and_then(|entity| entity.get(component))
            .and_then(|c| c.as_collider())
            .map(|c| c.tags().to_vec())
            .unwrap_or_default()
    }

    fn track_component(&mut self, id: EntityId, component: ComponentId) {
        let collider = ColliderRef {
            entity: id,
            component,
        };
        for tag in self.collider_tags(id, component) {
            self.track_collider(collider, &tag);
        }
    }

    fn untrack_component(&mut self, id: EntityId, component: ComponentId) {
        self.untrack_all(ColliderRef {
            entity: id,
            component,
        });
    }

    pub fn add_renderer(&mut self, renderer: impl Renderer + 'static) {
        self.renderers.push(Box::new(renderer));
    }

    pub fn renderers(&self) -> &[Box<dyn Renderer>] {
        &self.renderers
    }

    /// Runs one hook of one component with the component taken out of its
    /// entity
    fn with_component(
        &mut self,
        id: EntityId,
        component: ComponentId,
        hook: impl FnOnce(&mut dyn Component, &mut ComponentContext<'_>),
    ) {
        let Some(mut taken) = self
            .store
            .get_mut(&id)
            .and_then(|entity| entity.component_store.remove(&component))
        else {
            return;
        };

        self.visiting.push(id);
        {
            let mut ctx = ComponentContext::new(self, id, component);
            hook(&mut *taken, &mut ctx);
        }
        self.visiting.pop();

        self.restore_component(id, component, taken);
        self.settle(id);
        if !self.visiting.contains(&id) {
            self.apply_deferred(id);
        }
    }

    fn restore_component(
        &mut self,
        id: EntityId,
        component: ComponentId,
        mut taken: Box<dyn Component>,
    ) {
        let Some(entity) = self.store.get_mut(&id) else {
            return;
        };

        if entity.contains(component) {
            entity.component_store.insert(component, taken);
            return;
        }

        // the component detached itself during its own hook
        entity.detached.retain(|(detached, _)| *detached != component);
        if entity.lifecycle.in_scene {
            self.finish_detach(id, component, taken);
        } else {
            taken.removed_from_entity(id);
        }
    }

    /// Fires the scene hooks of the components attached or detached while
    /// the entity was in the scene
    fn settle(&mut self, id: EntityId) {
        loop {
            let Some(entity) = self.store.get_mut(&id) else {
                return;
            };

            if !entity.attached.is_empty() {
                let component = entity.attached.remove(0);
                self.track_component(id, component);
                self.with_component(id, component, |c, ctx| c.added_to_scene(ctx));
                continue;
            }

            if !entity.detached.is_empty() {
                if let (component, Some(taken)) = entity.detached.remove(0) {
                    self.finish_detach(id, component, taken);
                }
                continue;
            }

            return;
        }
    }

    fn finish_detach(
        &mut self,
        id: EntityId,
        component: ComponentId,
        mut taken: Box<dyn Component>,
    ) {
        self.untrack_component(id, component);

        self.visiting.push(id);
        {
            let mut ctx = ComponentContext::new(self, id, component);
            taken.removed_from_scene(&mut ctx);
        }
        self.visiting.pop();

        taken.removed_from_entity(id);
        log::trace!("component {:?} detached from entity {:?}", component, id);
    }

    fn apply_deferred(&mut self, id: EntityId) {
        while let Some(index) = self.deferred.iter().position(|(e, _)| *e == id) {
            let (_, removal) = self.deferred.remove(index);
            self.remove_entity(id, removal);
        }
    }

    fn remove_entity(&mut self, id: EntityId, removal: Removal) -> Option<Entity> {
        if !self.store.get(&id)?.is_in_scene() {
            return None;
        }

        if self.visiting.contains(&id) {
            log::trace!("entity {:?} is running a hook, removal deferred", id);
            if !self.deferred.iter().any(|(e, _)| *e == id) {
                self.deferred.push((id, removal));
            }
            return None;
        }

        let components: Vec<ComponentId> = self.store.get(&id)?.component_ids().collect();
        for component in components.iter() {
            self.untrack_component(id, *component);
        }
        if let Some(entity) = self.store.get_mut(&id) {
            entity.lifecycle.in_scene = false;
        }

        for component in components.iter() {
            self.with_component(id, *component, |c, ctx| c.removed_from_scene(ctx));
        }
        match removal {
            Removal::Recycle(_) => {
                for component in components.iter() {
                    self.with_component(id, *component, |c, ctx| c.recycled(ctx));
                }
            }
            Removal::Destroy => {
                for component in components.iter() {
                    self.with_component(id, *component, |c, ctx| c.destroyed(ctx));
                }
            }
            Removal::Remove => {}
        }

        self.entities.remove(&id);
        let mut entity = self.store.remove(&id)?;
        log::trace!("entity {:?} removed ({:?})", id, removal);

        match removal {
            Removal::Remove => Some(entity),
            Removal::Recycle(bucket) => {
                entity.lifecycle.recycled = true;
                self.pool.entry(bucket).or_default().push(entity);
                None
            }
            Removal::Destroy => {
                entity.lifecycle.destroyed = true;
                None
            }
        }
    }

    /// Advances every active entity, then the renderers
    pub fn update(&mut self, delta: f32) {
        self.delta = delta;
        self.entities.clean();

        self.entities.begin_traversal();
        let mut index = 0;
        while index < self.entities.slot_count() {
            if let Some(id) = self.entities.slot(index).copied() {
                self.update_entity(id);
            }
            index += 1;
        }
        self.entities.end_traversal();
        self.entities.clean();

        let mut renderers = std::mem::take(&mut self.renderers);
        for renderer in renderers.iter_mut() {
            renderer.update(self, delta);
        }
        renderers.append(&mut self.renderers);
        self.renderers = renderers;
    }

    fn update_entity(&mut self, id: EntityId) {
        let Some(entity) = self.store.get_mut(&id) else {
            return;
        };
        if !entity.active {
            return;
        }

        let components: Vec<ComponentId> = entity.component_ids().collect();
        if !entity.lifecycle.started {
            entity.lifecycle.started = true;
            for component in components.iter() {
                self.with_component(id, *component, |c, ctx| c.started(ctx));
            }
        }

        for component in components {
            if !self.store.get(&id).map_or(false, |e| e.active) {
                return;
            }
            self.with_component(id, component, |c, ctx| {
                if c.active() {
                    c.update(ctx);
                }
            });
        }
    }

    /// Draws the scene through its renderers, then the debug overlay when
    /// `debug` is set
    ///
    /// Entities are drawn from the highest depth to the lowest; entities on
    /// the same depth keep their insertion order.
    pub fn render(&mut self, gfx: &mut Graphics, debug: bool) {
        self.sort_by_depth();

        let mut renderers = std::mem::take(&mut self.renderers);
        if renderers.is_empty() {
            EverythingRenderer::default().render(self, gfx);
        }
        for renderer in renderers.iter_mut() {
            renderer.render(self, gfx);
        }
        renderers.append(&mut self.renderers);
        self.renderers = renderers;

        if debug {
            self.debug_render(gfx);
        }
    }

    fn sort_by_depth(&mut self) {
        let mut changed = false;
        for entity in self.store.values_mut() {
            changed |= entity.take_depth_dirty();
        }
        if changed {
            self.entities.mark_unsorted();
        }

        let store = &self.store;
        let depth = |id: &EntityId| store.get(id).map_or(0, Entity::depth);
        self.entities.sort(|a, b| depth(b).cmp(&depth(a)));
    }

    fn debug_render(&self, gfx: &mut Graphics) {
        let buffer = *gfx.buffer();
        gfx.set_render_target(Some(&buffer));
        let primitive = gfx.primitive_shader();
        gfx.set_shader(primitive);
        gfx.set_blend_mode(BlendMode::Normal);
        let matrix = gfx.orthographic() * self.camera.matrix();
        gfx.set_matrix(&matrix);

        for entity in self.entities().filter(|entity| entity.active) {
            entity.debug_render(gfx, &self.camera);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use glam::Vec2;
    use tessera_graphic::{
        testing::{DeviceLog, RecordingDevice},
        Color, ProgramId,
    };
    use tessera_math::Rect;

    use super::*;
    use crate::{Collider, Rectsprite};

    type Log = Rc<RefCell<Vec<String>>>;

    #[derive(Debug)]
    struct Recorder {
        name: &'static str,
        log: Log,
    }

    impl Recorder {
        fn new(name: &'static str, log: &Log) -> Self {
            Self {
                name,
                log: log.clone(),
            }
        }

        fn record(&self, hook: &str) {
            self.log.borrow_mut().push(format!("{}:{}", self.name, hook));
        }
    }

    impl Component for Recorder {
        fn created(&mut self, _ctx: &mut ComponentContext) {
            self.record("created");
        }

        fn added_to_scene(&mut self, _ctx: &mut ComponentContext) {
            self.record("added");
        }

        fn started(&mut self, _ctx: &mut ComponentContext) {
            self.record("started");
        }

        fn update(&mut self, _ctx: &mut ComponentContext) {
            self.record("update");
        }

        fn removed_from_scene(&mut self, _ctx: &mut ComponentContext) {
            self.record("removed");
        }

        fn recycled(&mut self, _ctx: &mut ComponentContext) {
            self.record("recycled");
        }

        fn destroyed(&mut self, _ctx: &mut ComponentContext) {
            self.record("destroyed");
        }
    }

    #[derive(Debug)]
    struct RemoveSelf {
        log: Log,
    }

    impl Component for RemoveSelf {
        fn update(&mut self, ctx: &mut ComponentContext) {
            let id = ctx.entity_id();
            assert!(ctx.scene.remove(id).is_none());
            // still reachable until the hook returns
            self.log
                .borrow_mut()
                .push(format!("still there: {}", ctx.entity().is_in_scene()));
        }

        fn removed_from_scene(&mut self, _ctx: &mut ComponentContext) {
            self.log.borrow_mut().push("self:removed".to_owned());
        }
    }

    #[derive(Debug)]
    struct RemoveOther(EntityId);

    impl Component for RemoveOther {
        fn update(&mut self, ctx: &mut ComponentContext) {
            ctx.scene.remove(self.0);
        }
    }

    #[derive(Debug, Default)]
    struct Marker {
        tags: Vec<String>,
        tag_on_add: Option<&'static str>,
        debug_color: Option<Color>,
    }

    impl Component for Marker {
        fn added_to_scene(&mut self, ctx: &mut ComponentContext) {
            if let Some(tag) = self.tag_on_add {
                ctx.tag_self(self, tag);
            }
        }

        fn debug_render(&self, entity: &Entity, gfx: &mut Graphics, _camera: &Camera) {
            if let Some(color) = self.debug_color {
                gfx.rect(
                    Rect::new(entity.position.x, entity.position.y, 2.0, 2.0),
                    &color,
                );
            }
        }

        fn as_collider(&self) -> Option<&dyn Collider> {
            Some(self)
        }

        fn as_collider_mut(&mut self) -> Option<&mut dyn Collider> {
            Some(self)
        }
    }

    impl Collider for Marker {
        fn tags(&self) -> &[String] {
            &self.tags
        }

        fn tags_mut(&mut self) -> &mut Vec<String> {
            &mut self.tags
        }

        fn offset(&self) -> Vec2 {
            Vec2::ZERO
        }
    }

    fn scene() -> Scene {
        Scene::new(Rc::new(OverlapRegistry::new()), Camera::new(320.0, 180.0))
    }

    fn graphics() -> (Graphics, DeviceLog) {
        let (device, log) = RecordingDevice::new(320, 180);
        let graphics = Graphics::new(Box::new(device), 320, 180).unwrap();
        log.clear();
        (graphics, log)
    }

    fn entries(log: &Log) -> Vec<String> {
        log.borrow().clone()
    }

    #[test]
    fn lifecycle_hooks_order() {
        let log = Log::default();
        let mut scene = scene();
        let mut entity = Entity::default();
        entity.add(Recorder::new("a", &log));

        let id = scene.add(entity);
        scene.update(0.1);
        scene.update(0.1);
        let entity = scene.remove(id).unwrap();

        assert_eq!(
            entries(&log),
            vec!["a:created", "a:added", "a:started", "a:update", "a:update", "a:removed"]
        );
        assert!(!entity.is_in_scene());
        assert!(entity.lifecycle().created);
        assert_eq!(scene.entity_count(), 0);
    }

    #[test]
    fn created_fires_once() {
        let log = Log::default();
        let mut scene = scene();
        let mut entity = Entity::default();
        entity.add(Recorder::new("a", &log));

        let id = scene.add(entity);
        let entity = scene.remove(id).unwrap();
        scene.add(entity);

        assert_eq!(
            entries(&log),
            vec!["a:created", "a:added", "a:removed", "a:added"]
        );
    }

    #[test]
    fn recycle_then_recreate() {
        let log = Log::default();
        let mut scene = scene();
        let mut entity = Entity::default();
        entity.add(Recorder::new("bullet", &log));

        let id = scene.add(entity);
        scene.recycle(id, "bullets");
        assert_eq!(scene.entity_count(), 0);
        assert_eq!(scene.pooled("bullets"), 1);

        assert_eq!(scene.recreate("bullets"), Some(id));
        assert_eq!(scene.recreate("bullets"), None);
        assert_eq!(scene.pooled("bullets"), 0);
        assert_eq!(
            entries(&log),
            vec![
                "bullet:created",
                "bullet:added",
                "bullet:removed",
                "bullet:recycled",
                "bullet:added"
            ]
        );
    }

    #[test]
    fn destroy_fires_destroyed() {
        let log = Log::default();
        let mut scene = scene();
        let mut entity = Entity::default();
        entity.add(Recorder::new("a", &log));

        let id = scene.add(entity);
        scene.destroy(id);

        assert!(scene.entity(id).is_none());
        assert_eq!(entries(&log), vec!["a:created", "a:added", "a:removed", "a:destroyed"]);
    }

    #[test]
    fn self_removal_waits_for_the_hook() {
        let log = Log::default();
        let mut scene = scene();
        let mut entity = Entity::default();
        entity.add(RemoveSelf { log: log.clone() });
        entity.add(Recorder::new("sibling", &log));

        let id = scene.add(entity);
        scene.update(0.1);

        assert!(scene.entity(id).is_none());
        assert_eq!(scene.entity_count(), 0);
        assert_eq!(
            entries(&log),
            vec![
                "sibling:created",
                "sibling:added",
                "sibling:started",
                "still there: true",
                "self:removed",
                "sibling:removed"
            ]
        );
    }

    #[test]
    fn removing_ahead_skips_its_update() {
        let log = Log::default();
        let mut scene = scene();

        let mut victim = Entity::default();
        victim.add(Recorder::new("victim", &log));
        let victim_id = victim.id();

        let mut killer = Entity::default();
        killer.add(RemoveOther(victim_id));

        let mut survivor = Entity::default();
        survivor.add(Recorder::new("survivor", &log));

        scene.add(killer);
        scene.add(victim);
        scene.add(survivor);
        log.borrow_mut().clear();

        scene.update(0.1);

        assert_eq!(
            entries(&log),
            vec!["victim:removed", "survivor:started", "survivor:update"]
        );
        assert_eq!(scene.entity_count(), 2);
    }

    #[test]
    fn tag_index_follows_membership() {
        let mut scene = scene();
        let mut entity = Entity::default();
        let marker = entity.add(Marker {
            tags: vec!["solid".to_owned()],
            ..Default::default()
        });

        let id = scene.add(entity);
        let collider = ColliderRef {
            entity: id,
            component: marker,
        };
        assert_eq!(scene.all_colliders_in_tag("solid"), [collider]);
        assert_eq!(scene.first_collider_in_tag("solid"), Some(collider));

        assert!(scene.tag_collider(collider, "wall"));
        assert!(scene.tag_collider(collider, "wall"));
        assert_eq!(scene.all_colliders_in_tag("wall").len(), 1);

        scene.remove(id);
        assert!(scene.all_colliders_in_tag("solid").is_empty());
        assert!(scene.colliders.is_empty());
    }

    #[test]
    fn removal_untracks_tags_edited_in_place() {
        let mut scene = scene();
        let mut entity = Entity::default();
        let marker = entity.add(Marker {
            tags: vec!["solid".to_owned()],
            ..Default::default()
        });
        let id = scene.add(entity);

        let shape = scene.entity_mut(id).unwrap();
        shape.get_as_mut::<Marker>(marker).unwrap().tags.clear();
        scene.remove(id);

        assert!(scene.all_colliders_in_tag("solid").is_empty());
        assert!(scene.colliders.is_empty());
        assert!(scene.tracked.is_empty());

        let mut entity = Entity::default();
        let marker = entity.add(Marker {
            tags: vec!["solid".to_owned()],
            ..Default::default()
        });
        let id = scene.add(entity);
        scene
            .entity_mut(id)
            .unwrap()
            .get_as_mut::<Marker>(marker)
            .unwrap()
            .tags
            .push("wall".to_owned());
        assert!(scene.remove_component(id, marker));
        assert!(scene.colliders.is_empty());
    }

    #[test]
    fn untag_drops_empty_tags() {
        let mut scene = scene();
        let mut entity = Entity::default();
        let marker = entity.add(Marker {
            tags: vec!["solid".to_owned()],
            ..Default::default()
        });
        let id = scene.add(entity);
        let collider = ColliderRef {
            entity: id,
            component: marker,
        };

        assert!(scene.untag_collider(collider, "solid"));
        assert!(!scene.colliders.contains_key("solid"));
        let entity = scene.entity(id).unwrap();
        assert!(entity.get_as::<Marker>(marker).unwrap().tags.is_empty());
    }

    #[test]
    fn tag_self_from_a_hook_is_indexed() {
        let mut scene = scene();
        let mut entity = Entity::default();
        let marker = entity.add(Marker {
            tag_on_add: Some("player"),
            ..Default::default()
        });

        let id = scene.add(entity);

        assert_eq!(
            scene.first_collider_in_tag("player"),
            Some(ColliderRef {
                entity: id,
                component: marker
            })
        );
    }

    #[test]
    fn components_attached_in_scene_get_scene_hooks() {
        let log = Log::default();
        let mut scene = scene();
        let id = scene.add(Entity::default());

        let recorder = scene.add_component(id, Recorder::new("late", &log)).unwrap();
        let marker = scene
            .add_component(
                id,
                Marker {
                    tags: vec!["solid".to_owned()],
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(scene.all_colliders_in_tag("solid").len(), 1);

        assert!(scene.remove_component(id, recorder));
        assert!(scene.remove_component(id, marker));
        assert!(!scene.remove_component(id, marker));

        assert_eq!(entries(&log), vec!["late:added", "late:removed"]);
        assert!(scene.all_colliders_in_tag("solid").is_empty());
        assert_eq!(scene.entity(id).unwrap().component_count(), 0);
    }

    #[test]
    fn group_queries_follow_scene_order() {
        let mut scene = scene();
        let mut ids = Vec::new();
        for group in ["enemy", "player", "enemy"] {
            let mut entity = Entity::default();
            entity.group(group);
            ids.push(scene.add(entity));
        }

        assert_eq!(scene.first_in_group("enemy").map(Entity::id), Some(ids[0]));
        assert_eq!(
            scene.all_in_group("enemy").map(Entity::id).collect::<Vec<_>>(),
            vec![ids[0], ids[2]]
        );
        assert_eq!(scene.count_in_group("player"), 1);
        assert_eq!(scene.count_in_group("boss"), 0);
    }

    #[test]
    fn lower_depth_is_drawn_last() {
        let (mut gfx, log) = graphics();
        let mut scene = scene();

        for (x, depth) in [(0.0, 0), (10.0, -5), (20.0, 5), (30.0, 0)] {
            let mut entity = Entity::new(Vec2::new(x, 0.0));
            entity.set_depth(depth);
            entity.add(Rectsprite::new(4.0, 4.0, Color::WHITE));
            scene.add(entity);
        }

        scene.render(&mut gfx, false);
        gfx.flush();

        let draws = log.draws();
        assert_eq!(draws.len(), 1);
        let order: Vec<f32> = draws[0].positions.chunks(12).map(|quad| quad[0]).collect();
        assert_eq!(order, vec![20.0, 0.0, 30.0, 10.0]);
    }

    #[test]
    fn depth_change_resorts() {
        let (mut gfx, log) = graphics();
        let mut scene = scene();

        let mut ids = Vec::new();
        for x in [0.0, 10.0] {
            let mut entity = Entity::new(Vec2::new(x, 0.0));
            entity.add(Rectsprite::new(4.0, 4.0, Color::WHITE));
            ids.push(scene.add(entity));
        }
        scene.render(&mut gfx, false);
        gfx.flush();

        scene.entity_mut(ids[1]).unwrap().set_depth(10);
        log.clear();
        scene.render(&mut gfx, false);
        gfx.flush();

        let order: Vec<f32> = log.draws()[0].positions.chunks(12).map(|quad| quad[0]).collect();
        assert_eq!(order, vec![10.0, 0.0]);
    }

    #[test]
    fn debug_overlay_uses_primitive_shader() {
        let (mut gfx, log) = graphics();
        let mut scene = scene();

        let mut entity = Entity::new(Vec2::new(4.0, 4.0));
        entity.add(Rectsprite::new(4.0, 4.0, Color::WHITE));
        entity.add(Marker {
            debug_color: Some(Color::new(1.0, 0.0, 0.0, 1.0)),
            ..Default::default()
        });
        scene.add(entity);

        scene.render(&mut gfx, false);
        gfx.flush();
        assert_eq!(log.draws().len(), 1);

        log.clear();
        scene.render(&mut gfx, true);
        gfx.flush();

        let draws = log.draws();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].program, Some(ProgramId(0)));
        assert_eq!(draws[1].program, Some(ProgramId(1)));
        assert_eq!(draws[1].target, Some(gfx.buffer().id));
    }

    #[test]
    fn inactive_entities_are_not_updated() {
        let log = Log::default();
        let mut scene = scene();
        let mut entity = Entity::default();
        entity.add(Recorder::new("a", &log));
        entity.active = false;

        scene.add(entity);
        log.borrow_mut().clear();
        scene.update(0.1);

        assert!(entries(&log).is_empty());
    }
}
