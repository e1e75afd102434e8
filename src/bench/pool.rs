use crate::engine::{EngineError, Loader};
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Growable set of engine handles shared by concurrent tasks.
///
/// Each slot is either vacant or holds an idle handle. Taking a handle
/// vacates its slot, so a handle is only ever held by one caller. Handles
/// are recycled, never dropped, until the pool itself goes away; the number
/// created converges to the peak number checked out at once.
pub struct HandlePool<L: Loader> {
    loader: L,
    slots: Mutex<Vec<Option<L::Handle>>>,
    created: AtomicUsize,
}

impl<L: Loader> HandlePool<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            slots: Mutex::new(Vec::new()),
            created: AtomicUsize::new(0),
        }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Take an idle handle, or load a new one if none is idle.
    ///
    /// The load happens under the pool lock. Loader errors are returned
    /// as-is.
    pub fn acquire(&self) -> Result<L::Handle, EngineError> {
        let mut slots = self.lock();
        if let Some(handle) = slots.iter_mut().find_map(Option::take) {
            return Ok(handle);
        }

        let handle = self.loader.load(false)?;
        let created = self.created.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(created, slots = slots.len(), "Grew handle pool");
        Ok(handle)
    }

    /// Put a handle back into the first vacant slot, growing by one slot if
    /// every slot is full.
    pub fn release(&self, handle: L::Handle) {
        let mut slots = self.lock();
        match slots.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => *slot = Some(handle),
            None => slots.push(Some(handle)),
        }
    }

    /// Like [`acquire`](Self::acquire), but the handle goes back to the pool
    /// when the guard is dropped.
    pub fn checkout(&self) -> Result<Pooled<'_, L>, EngineError> {
        let handle = self.acquire()?;
        Ok(Pooled {
            pool: self,
            handle: Some(handle),
        })
    }

    /// Handles ever loaded by this pool
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// Handles currently sitting idle in a slot
    pub fn idle(&self) -> usize {
        self.lock().iter().filter(|slot| slot.is_some()).count()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Option<L::Handle>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A handle checked out of a [`HandlePool`].
pub struct Pooled<'a, L: Loader> {
    pool: &'a HandlePool<L>,
    handle: Option<L::Handle>,
}

impl<L: Loader> Deref for Pooled<'_, L> {
    type Target = L::Handle;

    fn deref(&self) -> &Self::Target {
        self.handle.as_ref().expect("pooled handle is present until drop")
    }
}

impl<L: Loader> DerefMut for Pooled<'_, L> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.handle.as_mut().expect("pooled handle is present until drop")
    }
}

impl<L: Loader> Drop for Pooled<'_, L> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.pool.release(handle);
        }
    }
}
