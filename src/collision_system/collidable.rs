use crate::error::{Result, SimError};
use crate::geo::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

static NEXT_COLLIDABLE_ID: AtomicU64 = AtomicU64::new(1);

/// Process unique id, never reused.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct CollidableId(u64);

impl CollidableId {
    fn next() -> CollidableId {
        CollidableId(NEXT_COLLIDABLE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CollidableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Passed to collision listeners, `with` is the other party of the collision.
#[derive(Clone, Debug)]
pub struct CollisionData {
    pub with: Arc<Collidable>,
}

/// A bounding shape with an identity and collision/disposal notifications.
pub struct Collidable {
    id: CollidableId,
    bounds: RwLock<Geo>,
    disposed: AtomicBool,
    on_collision: Listeners<CollisionData>,
    on_disposed: Listeners<Collidable>,
}

impl Collidable {
    pub fn new(bounds: impl Into<Geo>) -> Collidable {
        Collidable {
            id: CollidableId::next(),
            bounds: RwLock::new(bounds.into()),
            disposed: AtomicBool::new(false),
            on_collision: Listeners::new(),
            on_disposed: Listeners::new(),
        }
    }

    pub fn id(&self) -> CollidableId {
        self.id
    }

    pub fn bounds(&self) -> Geo {
        *self.bounds.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_bounds(&self, bounds: impl Into<Geo>) {
        *self.bounds.write().unwrap_or_else(PoisonError::into_inner) = bounds.into();
    }

    /// mutate the bounds in place, e.g. to move or rotate them
    pub fn update_bounds<F: FnOnce(&mut Geo)>(&self, f: F) {
        let mut bounds = self.bounds.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut *bounds);
    }

    pub fn is_colliding_with(&self, other: &Collidable) -> bool {
        self.bounds().intersects(&other.bounds())
    }

    /// notifies every collision listener
    pub fn collided(&self, data: &CollisionData) {
        self.on_collision.notify(data);
    }

    pub fn on_collision(&self) -> &Listeners<CollisionData> {
        &self.on_collision
    }

    pub fn on_disposed(&self) -> &Listeners<Collidable> {
        &self.on_disposed
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Notifies the disposal listeners once. Disposing twice is an error.
    pub fn dispose(&self) -> Result<()> {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return Err(SimError::CollidableAlreadyDisposed(self.id));
        }
        self.on_disposed.notify(self);
        Ok(())
    }
}

impl HasGeometry for Collidable {
    fn get_geometry(&self) -> Geo {
        self.bounds()
    }
}

impl fmt::Debug for Collidable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collidable")
            .field("id", &self.id)
            .field("bounds", &self.bounds())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn ids_increase() {
        let a = Collidable::new(Circle::new(P2::origin(), 1.0));
        let b = Collidable::new(Circle::new(P2::origin(), 1.0));
        assert!(b.id() > a.id());
    }

    #[test]
    fn collision_test_delegates_to_bounds() {
        let a = Collidable::new(Circle::new(P2::origin(), 1.0));
        let b = Collidable::new(Rect::new(P2::new(1.5, 0.0), 0.0, 2.0, 2.0));
        assert!(a.is_colliding_with(&b));
        b.update_bounds(|g| g.set_origin(P2::new(10.0, 0.0)));
        assert!(!a.is_colliding_with(&b));
        b.set_bounds(Circle::new(P2::new(0.5, 0.0), 0.1));
        assert!(b.is_colliding_with(&a));
    }

    #[test]
    fn collided_reaches_listeners() {
        let a = Collidable::new(Circle::new(P2::origin(), 1.0));
        let other = Arc::new(Collidable::new(Circle::new(P2::origin(), 1.0)));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        a.on_collision()
            .subscribe(move |data: &CollisionData| sink.lock().unwrap().push(data.with.id()));
        a.collided(&CollisionData { with: other.clone() });
        assert_eq!(*seen.lock().unwrap(), vec![other.id()]);
    }

    #[test]
    fn dispose_once_then_error() {
        let a = Collidable::new(Circle::new(P2::origin(), 1.0));
        let count = Arc::new(AtomicU64::new(0));
        let counter = count.clone();
        a.on_disposed().subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(a.dispose().is_ok());
        assert!(a.is_disposed());
        match a.dispose() {
            Err(SimError::CollidableAlreadyDisposed(id)) => assert_eq!(id, a.id()),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
