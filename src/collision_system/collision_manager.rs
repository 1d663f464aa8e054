use super::collidable::*;
use crate::game::GameTime;
use crate::utils::{Listeners, SubscriptionId};
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace};

/// The two parties of a collision, in scan order.
#[derive(Clone, Debug)]
pub struct CollisionPair {
    pub first: Arc<Collidable>,
    pub second: Arc<Collidable>,
}

struct PendingAddition {
    collidable: Arc<Collidable>,
    disposal: SubscriptionId,
}

struct Monitored {
    collidable: Arc<Collidable>,
    disposal: SubscriptionId,
}

/// State reachable from any thread. The two queues are locked independently
/// so producers never wait on each other or on the scan.
struct ManagerShared {
    additions: Mutex<VecDeque<PendingAddition>>,
    removals: Mutex<VecDeque<CollidableId>>,
    enabled: AtomicBool,
    on_collision: Listeners<CollisionPair>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ManagerShared {
    fn monitor(self: &Arc<Self>, collidable: &Arc<Collidable>) {
        let shared = Arc::downgrade(self);
        let disposal = collidable
            .on_disposed()
            .subscribe(move |disposed: &Collidable| {
                if let Some(shared) = shared.upgrade() {
                    shared.unmonitor(disposed.id());
                }
            });
        let mut additions = lock(&self.additions);
        self.enabled.store(true, Ordering::Release);
        additions.push_back(PendingAddition {
            collidable: collidable.clone(),
            disposal,
        });
    }

    fn unmonitor(&self, id: CollidableId) {
        lock(&self.removals).push_back(id);
    }
}

/// Cloneable, thread safe handle to queue collidables for a manager.
#[derive(Clone)]
pub struct MonitorHandle {
    shared: Arc<ManagerShared>,
}

impl MonitorHandle {
    /// Queues `collidable`; it takes part in collision checks starting with the
    /// next update. Disposing it unmonitors it automatically.
    pub fn monitor(&self, collidable: &Arc<Collidable>) {
        self.shared.monitor(collidable);
    }

    pub fn unmonitor(&self, collidable: &Collidable) {
        self.shared.unmonitor(collidable.id());
    }

    pub fn on_collision(&self) -> &Listeners<CollisionPair> {
        &self.shared.on_collision
    }

    pub fn is_active(&self) -> bool {
        self.shared.enabled.load(Ordering::Acquire)
    }
}

/// Checks every pair of monitored collidables once per update.
///
/// The set of monitored collidables is only touched by [`CollisionManager::update`];
/// `monitor`/`unmonitor` calls made in between are queued and applied at the
/// start of the next update.
pub struct CollisionManager {
    collidables: BTreeMap<CollidableId, Monitored>,
    shared: Arc<ManagerShared>,
    scans: u64,
}

impl CollisionManager {
    pub fn new() -> CollisionManager {
        CollisionManager {
            collidables: BTreeMap::new(),
            shared: Arc::new(ManagerShared {
                additions: Mutex::new(VecDeque::new()),
                removals: Mutex::new(VecDeque::new()),
                enabled: AtomicBool::new(false),
                on_collision: Listeners::new(),
            }),
            scans: 0,
        }
    }

    pub fn handle(&self) -> MonitorHandle {
        MonitorHandle {
            shared: self.shared.clone(),
        }
    }

    pub fn monitor(&self, collidable: &Arc<Collidable>) {
        self.shared.monitor(collidable);
    }

    pub fn unmonitor(&self, collidable: &Collidable) {
        self.shared.unmonitor(collidable.id());
    }

    /// fired once per colliding pair per update, after both collidables were notified
    pub fn on_collision(&self) -> &Listeners<CollisionPair> {
        &self.shared.on_collision
    }

    /// false until the first collidable was ever monitored
    pub fn is_active(&self) -> bool {
        self.shared.enabled.load(Ordering::Acquire)
    }

    /// number of collidables that took part in the last scan
    pub fn len(&self) -> usize {
        self.collidables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collidables.is_empty()
    }

    pub fn contains(&self, id: CollidableId) -> bool {
        self.collidables.contains_key(&id)
    }

    /// number of pairwise scans performed so far
    pub fn scans(&self) -> u64 {
        self.scans
    }

    pub fn update(&mut self, _game_time: &GameTime) {
        if !self.is_active() {
            return;
        }

        // removals are taken first so an unmonitor can never be applied
        // before the monitor call that preceded it
        let removals: Vec<CollidableId> = lock(&self.shared.removals).drain(..).collect();
        let additions: Vec<PendingAddition> = lock(&self.shared.additions).drain(..).collect();
        self.apply_additions(additions);
        self.apply_removals(removals);

        let snapshot: Vec<Arc<Collidable>> = self
            .collidables
            .values()
            .map(|monitored| monitored.collidable.clone())
            .collect();
        self.scans += 1;

        for (i, first) in snapshot.iter().enumerate() {
            for second in snapshot[i + 1..].iter() {
                if first.is_colliding_with(second) {
                    trace!(first = %first.id(), second = %second.id(), "collision");
                    first.collided(&CollisionData {
                        with: second.clone(),
                    });
                    second.collided(&CollisionData {
                        with: first.clone(),
                    });
                    self.shared.on_collision.notify(&CollisionPair {
                        first: first.clone(),
                        second: second.clone(),
                    });
                }
            }
        }
    }

    fn apply_additions(&mut self, pending: Vec<PendingAddition>) {
        for PendingAddition {
            collidable,
            disposal,
        } in pending
        {
            if collidable.is_disposed() {
                collidable.on_disposed().unsubscribe(disposal);
                debug!(id = %collidable.id(), "skipping disposed collidable");
                continue;
            }
            debug!(id = %collidable.id(), "monitoring collidable");
            let id = collidable.id();
            if let Some(replaced) = self.collidables.insert(
                id,
                Monitored {
                    collidable,
                    disposal,
                },
            ) {
                replaced.collidable.on_disposed().unsubscribe(replaced.disposal);
            }
        }
    }

    fn apply_removals(&mut self, pending: Vec<CollidableId>) {
        for id in pending {
            if let Some(removed) = self.collidables.remove(&id) {
                debug!(id = %id, "unmonitoring collidable");
                removed.collidable.on_disposed().unsubscribe(removed.disposal);
            }
        }
    }
}

impl Default for CollisionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CollisionManager {
    fn drop(&mut self) {
        for monitored in self.collidables.values() {
            monitored
                .collidable
                .on_disposed()
                .unsubscribe(monitored.disposal);
        }
        for pending in lock(&self.shared.additions).drain(..) {
            pending.collidable.on_disposed().unsubscribe(pending.disposal);
        }
    }
}
