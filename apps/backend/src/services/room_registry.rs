//! Process-wide room state keyed by room key.
//!
//! Each room sits behind its own mutex, so mutations for one room are
//! serialized while different rooms proceed in parallel. Every mutation runs
//! on a clone of the room and the clone replaces the stored room only when
//! the closure succeeds, so a rejected action leaves no trace.
//!
//! Lock order: a `members` entry may be held while taking a room lock, never
//! the reverse, and no room lock is held while touching the `rooms` map.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use rand::Rng;

use crate::domain::{
    derive_room_transitions, summarize, AddOutcome, CardPool, DeckCatalog, Departure, Room,
    RoomKey, RoomLifecycleView, RoomOptions, RoomStatus, RoomSummary, RoomTransition, UserId,
};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};

/// `None` once the room has been destroyed; late holders of the handle see it
/// as not found.
type RoomSlot = Arc<Mutex<Option<Room>>>;

/// Result of a committed mutation.
#[derive(Debug)]
pub struct Committed<T> {
    pub key: RoomKey,
    pub value: T,
    pub before: RoomLifecycleView,
    pub after: RoomLifecycleView,
    /// The room emptied out and was removed.
    pub destroyed: bool,
}

impl<T> Committed<T> {
    pub fn version(&self) -> u64 {
        self.after.version
    }

    pub fn transitions(&self) -> Vec<RoomTransition> {
        derive_room_transitions(&self.before, &self.after)
    }
}

/// A room that was closed by its host.
#[derive(Debug)]
pub struct Closed {
    pub key: RoomKey,
    pub members: Vec<UserId>,
}

pub struct RoomRegistry {
    rooms: DashMap<RoomKey, RoomSlot>,
    /// Which room each seated user is in.
    members: DashMap<UserId, RoomKey>,
    decks: Arc<DeckCatalog>,
}

impl RoomRegistry {
    pub fn new(decks: Arc<DeckCatalog>) -> Self {
        Self {
            rooms: DashMap::new(),
            members: DashMap::new(),
            decks,
        }
    }

    pub fn decks(&self) -> &DeckCatalog {
        &self.decks
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn room_of(&self, user_id: UserId) -> Option<RoomKey> {
        self.members.get(&user_id).map(|k| *k)
    }

    /// Create a lobby hosted by `host_id` with a random shuffle seed.
    pub fn create(
        &self,
        options: RoomOptions,
        host_id: UserId,
        host_name: &str,
    ) -> Result<RoomKey, DomainError> {
        self.create_seeded(options, host_id, host_name, rand::rng().random())
    }

    pub fn create_seeded(
        &self,
        options: RoomOptions,
        host_id: UserId,
        host_name: &str,
        seed: u64,
    ) -> Result<RoomKey, DomainError> {
        options.validate()?;
        let deck = self.decks.get(&options.deck)?;

        match self.members.entry(host_id) {
            Entry::Occupied(seated) => Err(already_seated(*seated.get())),
            Entry::Vacant(vacant) => {
                let key = RoomKey::generate();
                let room = Room::new(key, options, CardPool::new(deck, seed), host_id, host_name);
                self.rooms.insert(key, Arc::new(Mutex::new(Some(room))));
                vacant.insert(key);
                Ok(key)
            }
        }
    }

    /// Seat a user in `key`. Re-joining the room one is already in is a no-op.
    pub fn join(
        &self,
        key: RoomKey,
        user_id: UserId,
        display_name: &str,
    ) -> Result<Committed<AddOutcome>, DomainError> {
        match self.members.entry(user_id) {
            Entry::Occupied(seated) if *seated.get() != key => Err(already_seated(*seated.get())),
            Entry::Occupied(_) => self.mutate(key, |room| room.join(user_id, display_name)),
            Entry::Vacant(vacant) => {
                let committed = self.mutate(key, |room| room.join(user_id, display_name))?;
                vacant.insert(key);
                Ok(committed)
            }
        }
    }

    /// Unseat a user from whatever room they are in.
    pub fn leave(&self, user_id: UserId) -> Result<Committed<Departure>, DomainError> {
        match self.members.entry(user_id) {
            Entry::Vacant(_) => Err(not_seated()),
            Entry::Occupied(seated) => {
                let key = *seated.get();
                let result = self.mutate(key, |room| room.remove_participant(user_id));
                match result {
                    Ok(committed) => {
                        seated.remove();
                        Ok(committed)
                    }
                    Err(DomainError::NotFound(NotFoundKind::Room, detail)) => {
                        seated.remove();
                        Err(DomainError::not_found(NotFoundKind::Room, detail))
                    }
                    Err(err) => Err(err),
                }
            }
        }
    }

    /// Destroy the actor's room. Host only.
    pub fn close(&self, actor: UserId) -> Result<Closed, DomainError> {
        let Entry::Occupied(seated) = self.members.entry(actor) else {
            return Err(not_seated());
        };
        let key = *seated.get();
        let slot = self.slot(key)?;

        let room = {
            let mut guard = slot.lock();
            let room = guard.as_ref().ok_or_else(|| room_not_found(key))?;
            room.authorize_delete(actor)?;
            guard.take().ok_or_else(|| room_not_found(key))?
        };
        seated.remove();
        self.rooms.remove(&key);

        let members: Vec<UserId> = room.roster.iter().map(|p| p.user_id).collect();
        for &user_id in &members {
            self.members.remove_if(&user_id, |_, k| *k == key);
        }
        Ok(Closed { key, members })
    }

    /// Run an in-game action against the actor's current room.
    pub fn act<T>(
        &self,
        actor: UserId,
        f: impl FnOnce(&mut Room) -> Result<T, DomainError>,
    ) -> Result<Committed<T>, DomainError> {
        let key = self.room_of(actor).ok_or_else(not_seated)?;
        self.mutate(key, f)
    }

    /// Clone, apply, and commit only on success. Bumps the room version.
    pub fn mutate<T>(
        &self,
        key: RoomKey,
        f: impl FnOnce(&mut Room) -> Result<T, DomainError>,
    ) -> Result<Committed<T>, DomainError> {
        let slot = self.slot(key)?;
        let committed = {
            let mut guard = slot.lock();
            let current = guard.as_ref().ok_or_else(|| room_not_found(key))?;
            let before = RoomLifecycleView::of(current);

            let mut working = current.clone();
            let value = f(&mut working)?;
            working.version += 1;
            let after = RoomLifecycleView::of(&working);

            let destroyed = working.roster.is_empty();
            *guard = if destroyed { None } else { Some(working) };
            Committed {
                key,
                value,
                before,
                after,
                destroyed,
            }
        };
        if committed.destroyed {
            self.rooms.remove(&key);
        }
        Ok(committed)
    }

    /// Read a room under its lock.
    pub fn view<T>(&self, key: RoomKey, f: impl FnOnce(&Room) -> T) -> Result<T, DomainError> {
        let slot = self.slot(key)?;
        let guard = slot.lock();
        let room = guard.as_ref().ok_or_else(|| room_not_found(key))?;
        Ok(f(room))
    }

    /// Public rooms still in the lobby, for the room browser.
    pub fn public_lobbies(&self) -> Vec<RoomSummary> {
        let slots: Vec<RoomSlot> = self.rooms.iter().map(|e| e.value().clone()).collect();
        slots
            .iter()
            .filter_map(|slot| {
                let guard = slot.lock();
                let room = guard.as_ref()?;
                (room.status == RoomStatus::Lobby && !room.options.private_lobby)
                    .then(|| summarize(room))
            })
            .collect()
    }

    fn slot(&self, key: RoomKey) -> Result<RoomSlot, DomainError> {
        self.rooms
            .get(&key)
            .map(|slot| slot.value().clone())
            .ok_or_else(|| room_not_found(key))
    }
}

fn room_not_found(key: RoomKey) -> DomainError {
    DomainError::not_found(NotFoundKind::Room, format!("room {key} does not exist"))
}

fn not_seated() -> DomainError {
    DomainError::not_found(NotFoundKind::Room, "you are not in a room")
}

fn already_seated(key: RoomKey) -> DomainError {
    DomainError::conflict(
        ConflictKind::AlreadyInRoom,
        format!("already seated in room {key}"),
    )
}
