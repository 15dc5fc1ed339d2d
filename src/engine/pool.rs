use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex};

/// Buffers reused across requests: the target URI and the response body.
#[derive(Debug, Default)]
pub struct Scratch {
    pub uri: Vec<u8>,
    pub body: Vec<u8>,
}

/// Free list of scratch buffers shared by every worker.
#[derive(Debug, Default)]
pub struct ScratchPool {
    free: Mutex<Vec<Scratch>>,
}

impl ScratchPool {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Takes a cleared scratch set from the pool, allocating one if the pool
    /// is empty. The guard returns it on drop.
    #[must_use]
    pub fn acquire(self: &Arc<Self>) -> PooledScratch {
        let scratch = self
            .free
            .lock()
            .ok()
            .and_then(|mut free| free.pop())
            .unwrap_or_default();
        PooledScratch {
            pool: Arc::clone(self),
            scratch,
        }
    }

    /// Scratch sets currently parked in the pool.
    #[must_use]
    pub fn idle(&self) -> usize {
        self.free.lock().map_or(0, |free| free.len())
    }
}

#[derive(Debug)]
pub struct PooledScratch {
    pool: Arc<ScratchPool>,
    scratch: Scratch,
}

impl Deref for PooledScratch {
    type Target = Scratch;

    fn deref(&self) -> &Self::Target {
        &self.scratch
    }
}

impl DerefMut for PooledScratch {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.scratch
    }
}

impl Drop for PooledScratch {
    fn drop(&mut self) {
        let mut scratch = std::mem::take(&mut self.scratch);
        scratch.uri.clear();
        scratch.body.clear();
        if let Ok(mut free) = self.pool.free.lock() {
            free.push(scratch);
        }
    }
}
