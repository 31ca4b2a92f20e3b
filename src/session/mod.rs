//! Per-session managers for hosts serving several clients.
//!
//! Each session owns its own [`ZoneManager`] behind a mutex, so resolution is
//! serialized per session while different sessions proceed independently.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use crate::config::ManagerConfig;
use crate::dispatch::{DispatchObserver, DispatchOptions, Outcome, ZoneManager};
use crate::error::{Result, SessionError};
use crate::keys::KeyEvent;

pub type SessionId = String;

/// Builds the manager for a newly opened session.
pub type SessionFactory = Arc<dyn Fn() -> Result<ZoneManager> + Send + Sync>;

pub struct Session {
    id: SessionId,
    manager: ZoneManager,
}

impl Session {
    pub fn new(id: impl Into<SessionId>, manager: ZoneManager) -> Self {
        Self {
            id: id.into(),
            manager,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn manager(&self) -> &ZoneManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut ZoneManager {
        &mut self.manager
    }

    pub fn handle_key(&mut self, event: &KeyEvent) -> Outcome {
        self.manager.resolve(event)
    }

    pub fn dispatch(&mut self, event: &KeyEvent, observer: &mut dyn DispatchObserver) -> Outcome {
        self.manager.dispatch(event, observer)
    }
}

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<SessionId, Arc<Mutex<Session>>>>>,
    factory: SessionFactory,
}

impl SessionStore {
    pub fn new(factory: SessionFactory) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            factory,
        }
    }

    /// Store whose sessions all start from `config` with `options`.
    pub fn from_config(config: ManagerConfig, options: DispatchOptions) -> Self {
        Self::new(Arc::new(move || {
            ZoneManager::with_options(config.clone(), options.clone())
        }))
    }

    /// Return the session for `id`, creating it from the factory if needed.
    pub fn open(&self, id: &str) -> Result<Arc<Mutex<Session>>> {
        if let Ok(session) = self.get(id) {
            return Ok(session);
        }
        let mut guard = self.inner.write().map_err(|_| SessionError::Poisoned)?;
        if let Some(session) = guard.get(id) {
            return Ok(Arc::clone(session));
        }
        let session = Arc::new(Mutex::new(Session::new(id, (self.factory)()?)));
        guard.insert(id.to_string(), Arc::clone(&session));
        Ok(session)
    }

    /// Register a session built elsewhere. Fails if `id` is taken.
    pub fn insert(&self, id: &str, manager: ZoneManager) -> Result<Arc<Mutex<Session>>> {
        let mut guard = self.inner.write().map_err(|_| SessionError::Poisoned)?;
        if guard.contains_key(id) {
            return Err(SessionError::AlreadyExists(id.to_string()).into());
        }
        let session = Arc::new(Mutex::new(Session::new(id, manager)));
        guard.insert(id.to_string(), Arc::clone(&session));
        Ok(session)
    }

    pub fn get(&self, id: &str) -> Result<Arc<Mutex<Session>>> {
        let guard = self.inner.read().map_err(|_| SessionError::Poisoned)?;
        guard
            .get(id)
            .map(Arc::clone)
            .ok_or_else(|| SessionError::Missing(id.to_string()).into())
    }

    pub fn remove(&self, id: &str) -> Result<Option<Arc<Mutex<Session>>>> {
        let mut guard = self.inner.write().map_err(|_| SessionError::Poisoned)?;
        Ok(guard.remove(id))
    }

    /// Run `f` with exclusive access to an existing session.
    pub fn with_session<R>(&self, id: &str, f: impl FnOnce(&mut Session) -> R) -> Result<R> {
        let session = self.get(id)?;
        let mut guard = session.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(f(&mut *guard))
    }

    /// Resolve `event` for session `id`, opening the session on first use.
    pub fn handle_key(&self, id: &str, event: &KeyEvent) -> Result<Outcome> {
        let session = self.open(id)?;
        let mut guard = session.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(guard.handle_key(event))
    }

    pub fn ids(&self) -> Result<Vec<SessionId>> {
        let guard = self.inner.read().map_err(|_| SessionError::Poisoned)?;
        let mut ids: Vec<_> = guard.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
