use std::{any::TypeId, fmt::Debug, rc::Rc};

use glam::Vec2;
use rustc_hash::FxHashMap;

use crate::{Component, ComponentId, EntityId, Scene};

/// A [Component] with a shape other colliders can be tested against
///
/// Shapes are positioned at the entity position plus [Collider::offset].
/// Overlap between two shapes is never decided by the shapes themselves but
/// by the [OverlapRegistry] of the scene.
pub trait Collider: Component {
    fn tags(&self) -> &[String];

    fn tags_mut(&mut self) -> &mut Vec<String>;

    /// Local position relative to the owning entity
    fn offset(&self) -> Vec2;

    fn collider_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Address of a collider inside a scene
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone)]
pub struct ColliderRef {
    pub entity: EntityId,
    pub component: ComponentId,
}

/// A collider together with its scene position
#[derive(Debug)]
pub struct Placed<'a, C: ?Sized + 'a> {
    pub collider: &'a C,
    pub origin: Vec2,
}

impl<'a, C: ?Sized> Clone for Placed<'a, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, C: ?Sized> Copy for Placed<'a, C> {}

impl<'a> Placed<'a, dyn Collider> {
    fn downcast<C: Collider>(&self) -> Placed<'a, C> {
        let collider = self
            .collider
            .as_any()
            .downcast_ref::<C>()
            .unwrap_or_else(|| {
                panic!(
                    "overlap test for {} received a {}",
                    std::any::type_name::<C>(),
                    self.collider.collider_name()
                )
            });
        Placed {
            collider,
            origin: self.origin,
        }
    }
}

type OverlapTest = Rc<dyn Fn(&Placed<dyn Collider>, &Placed<dyn Collider>) -> bool>;

fn overlap_test(
    test: impl Fn(&Placed<dyn Collider>, &Placed<dyn Collider>) -> bool + 'static,
) -> OverlapTest {
    Rc::new(test)
}

/// Pairwise overlap tests between collider types
///
/// Owned by the engine and shared by every scene it creates. Registering a
/// test for `(A, B)` also answers `(B, A)` by swapping the arguments.
#[derive(Clone, Default)]
pub struct OverlapRegistry {
    tests: FxHashMap<(TypeId, TypeId), OverlapTest>,
}

impl Debug for OverlapRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlapRegistry")
            .field("tests", &self.tests.len())
            .finish()
    }
}

impl OverlapRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<A, B>(&mut self, test: impl Fn(Placed<A>, Placed<B>) -> bool + 'static)
    where
        A: Collider,
        B: Collider,
    {
        let test = Rc::new(test);

        let forward = test.clone();
        self.tests.insert(
            (TypeId::of::<A>(), TypeId::of::<B>()),
            overlap_test(move |a, b| forward(a.downcast::<A>(), b.downcast::<B>())),
        );

        if TypeId::of::<A>() != TypeId::of::<B>() {
            self.tests.insert(
                (TypeId::of::<B>(), TypeId::of::<A>()),
                overlap_test(move |b, a| test(a.downcast::<A>(), b.downcast::<B>())),
            );
        }
    }

    pub fn contains<A: Collider, B: Collider>(&self) -> bool {
        self.tests
            .contains_key(&(TypeId::of::<A>(), TypeId::of::<B>()))
    }

    /// Panics when no test was registered for the pair of types
    pub fn overlaps(&self, a: &Placed<dyn Collider>, b: &Placed<dyn Collider>) -> bool {
        let key = (a.collider.as_any().type_id(), b.collider.as_any().type_id());
        let test = self.tests.get(&key).unwrap_or_else(|| {
            panic!(
                "no overlap test registered between {} and {}",
                a.collider.collider_name(),
                b.collider.collider_name()
            )
        });
        test(a, b)
    }
}

/// Collision queries of one collider against the tag index of its scene
///
/// `dx`/`dy` test the collider as if it had been moved by that amount first;
/// the collider itself is never moved.
pub struct ColliderQuery<'a> {
    scene: &'a Scene,
    collider: ColliderRef,
}

impl<'a> ColliderQuery<'a> {
    pub(crate) fn new(scene: &'a Scene, collider: ColliderRef) -> Self {
        Self { scene, collider }
    }

    pub fn collider(&self) -> ColliderRef {
        self.collider
    }

    fn placed(&self, collider: ColliderRef, offset: Vec2) -> Option<Placed<'a, dyn Collider>> {
        let entity = self.scene.entity(collider.entity)?;
        let shape = entity.get(collider.component)?.as_collider()?;
        Some(Placed {
            collider: shape,
            origin: entity.position + shape.offset() + offset,
        })
    }

    fn candidates(&self, tag: &str, dx: f32, dy: f32) -> impl Iterator<Item = ColliderRef> + '_ {
        let me = self.placed(self.collider, Vec2::new(dx, dy));
        let owner = self.collider.entity;

        self.scene
            .all_colliders_in_tag(tag)
            .iter()
            .copied()
            .filter(move |other| other.entity != owner)
            .filter(move |other| {
                let Some(me) = me.as_ref() else {
                    return false;
                };
                let Some(entity) = self.scene.entity(other.entity) else {
                    return false;
                };
                let Some(component) = entity.get(other.component) else {
                    return false;
                };
                if !entity.active || !component.active() {
                    return false;
                }
                self.placed(*other, Vec2::ZERO)
                    .map(|placed| self.scene.overlaps().overlaps(me, &placed))
                    .unwrap_or(false)
            })
    }

    /// Whether moving by `(dx, dy)` would overlap a collider tagged `tag`
    pub fn check(&self, tag: &str, dx: f32, dy: f32) -> bool {
        self.collide(tag, dx, dy).is_some()
    }

    /// First collider tagged `tag` overlapped after moving by `(dx, dy)`
    pub fn collide(&self, tag: &str, dx: f32, dy: f32) -> Option<ColliderRef> {
        self.candidates(tag, dx, dy).next()
    }

    /// Like [ColliderQuery::collide], trying the tags in order
    pub fn collides(&self, tags: &[String], dx: f32, dy: f32) -> Option<ColliderRef> {
        tags.iter().find_map(|tag| self.collide(tag, dx, dy))
    }

    /// Every collider tagged `tag` overlapped after moving by `(dx, dy)`
    pub fn collide_all(&self, tag: &str, dx: f32, dy: f32) -> Vec<ColliderRef> {
        self.candidates(tag, dx, dy).collect()
    }
}
