//! Persisted current-session snapshot.

use crewgate_auth::Session;

use crate::blob::{BlobStore, StoreError, keys};

/// The single current-session record: written on login, cleared on logout.
#[derive(Debug)]
pub struct SessionSnapshot<S> {
    store: S,
}

impl<S: BlobStore> SessionSnapshot<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn load(&self) -> Result<Option<Session>, StoreError> {
        match self.store.load(keys::CURRENT_SESSION)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(None),
        }
    }

    pub fn save(&self, session: &Session) -> Result<(), StoreError> {
        self.store
            .save(keys::CURRENT_SESSION, &serde_json::to_string(&Some(session))?)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.save(keys::CURRENT_SESSION, "null")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::in_memory::InMemoryBlobStore;
    use crate::seed::seed_users;

    #[test]
    fn snapshot_survives_a_reload_and_clears_to_none() {
        let store = InMemoryBlobStore::new();
        let snapshot = SessionSnapshot::new(&store);
        assert!(snapshot.load().unwrap().is_none());

        let user = seed_users().remove(0);
        let session = Session::new(user, "/staff/clock");
        snapshot.save(&session).unwrap();
        assert_eq!(snapshot.load().unwrap(), Some(session));

        snapshot.clear().unwrap();
        assert!(snapshot.load().unwrap().is_none());
    }
}
