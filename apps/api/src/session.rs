//! Per-session analysis state.
//!
//! Each session holds at most one current analysis and a busy flag. Starting
//! an analysis takes an `AnalysisGuard`; the flag is cleared when the guard is
//! dropped, on every exit path. Results are replaced wholesale, never patched.
//!
//! Slots without a result are removed as soon as they go idle. Idle slots
//! expire after `idle_ttl`, and the store never holds more than
//! `max_sessions` idle slots.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use crate::analysis::models::Analysis;
use crate::errors::AppError;

pub const DEFAULT_MAX_SESSIONS: usize = 1000;
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug)]
struct SessionSlot {
    processing: bool,
    current: Option<Arc<Analysis>>,
    /// Bumped by every `begin` and `clear`; a guard only stores into the
    /// generation it started.
    generation: u64,
    touched: Instant,
}

impl SessionSlot {
    fn new() -> Self {
        SessionSlot {
            processing: false,
            current: None,
            generation: 0,
            touched: Instant::now(),
        }
    }
}

/// In-memory session store. Nothing here outlives the process.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<Uuid, SessionSlot>>>,
    max_sessions: usize,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    pub fn with_limits(max_sessions: usize, idle_ttl: Duration) -> Self {
        SessionStore {
            inner: Arc::new(Mutex::new(HashMap::new())),
            max_sessions: max_sessions.max(1),
            idle_ttl,
        }
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<Uuid, SessionSlot>> {
        // Slot updates are single assignments, so a poisoned map is still consistent.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Marks the session busy and discards its previous result.
    /// Fails with `AppError::Busy` if an analysis is already in flight.
    pub fn begin(&self, session_id: Uuid) -> Result<AnalysisGuard, AppError> {
        let mut slots = self.slots();
        if !slots.contains_key(&session_id) {
            self.evict(&mut slots);
        }

        let slot = slots.entry(session_id).or_insert_with(SessionSlot::new);
        if slot.processing {
            return Err(AppError::Busy);
        }
        slot.processing = true;
        slot.current = None;
        slot.generation += 1;
        slot.touched = Instant::now();
        debug!("Session {session_id} is now processing");

        Ok(AnalysisGuard {
            store: self.clone(),
            session_id,
            generation: slot.generation,
        })
    }

    pub fn current(&self, session_id: Uuid) -> Option<Arc<Analysis>> {
        let mut slots = self.slots();
        let slot = slots.get_mut(&session_id)?;
        if !slot.processing && slot.touched.elapsed() > self.idle_ttl {
            slots.remove(&session_id);
            return None;
        }
        slot.touched = Instant::now();
        slot.current.clone()
    }

    pub fn is_processing(&self, session_id: Uuid) -> bool {
        self.slots()
            .get(&session_id)
            .map(|slot| slot.processing)
            .unwrap_or(false)
    }

    /// Drops the session's result. Returns false if the session was unknown.
    /// An in-flight analysis keeps its busy flag until its guard is dropped,
    /// but its result is discarded instead of stored.
    pub fn clear(&self, session_id: Uuid) -> bool {
        let mut slots = self.slots();
        match slots.get_mut(&session_id) {
            Some(slot) if slot.processing => {
                slot.current = None;
                slot.generation += 1;
                true
            }
            Some(_) => slots.remove(&session_id).is_some(),
            None => false,
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.slots().len()
    }

    /// Drops expired idle slots, then the least recently used idle slots
    /// until there is room for one more. Busy slots are never evicted.
    fn evict(&self, slots: &mut HashMap<Uuid, SessionSlot>) {
        let ttl = self.idle_ttl;
        slots.retain(|_, slot| slot.processing || slot.touched.elapsed() <= ttl);

        while slots.len() >= self.max_sessions {
            let oldest = slots
                .iter()
                .filter(|(_, slot)| !slot.processing)
                .min_by_key(|(_, slot)| slot.touched)
                .map(|(id, _)| *id);
            match oldest {
                Some(id) => {
                    debug!("Evicting idle session {id}");
                    slots.remove(&id);
                }
                None => break,
            }
        }
    }
}

/// Proof that a session is processing. Dropping it clears the busy flag.
pub struct AnalysisGuard {
    store: SessionStore,
    session_id: Uuid,
    generation: u64,
}

impl AnalysisGuard {
    /// Stores the finished analysis as the session's current result, unless
    /// the session was cleared while the analysis ran.
    pub fn complete(self, analysis: Analysis) -> Arc<Analysis> {
        let analysis = Arc::new(analysis);
        let mut slots = self.store.slots();
        match slots.get_mut(&self.session_id) {
            Some(slot) if slot.generation == self.generation => {
                slot.current = Some(Arc::clone(&analysis));
                slot.touched = Instant::now();
            }
            _ => debug!(
                "Session {} was cleared during analysis; result discarded",
                self.session_id
            ),
        }
        analysis
    }
}

impl Drop for AnalysisGuard {
    fn drop(&mut self) {
        let mut slots = self.store.slots();
        let empty = match slots.get_mut(&self.session_id) {
            Some(slot) => {
                slot.processing = false;
                slot.touched = Instant::now();
                slot.current.is_none()
            }
            None => false,
        };
        if empty {
            slots.remove(&self.session_id);
        }
        debug!("Session {} is idle", self.session_id);
    }
}
