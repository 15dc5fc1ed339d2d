use std::time::Duration;

/// Status recorded for a request that never produced a response.
pub const TRANSPORT_FAILURE_STATUS: i32 = -1;

/// Outcome of one issued request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchResult {
    /// Position of the bullet in the store.
    pub bullet_index: usize,
    pub status: i32,
    pub body: Vec<u8>,
    pub duration: Duration,
}

impl BenchResult {
    #[must_use]
    pub const fn is_transport_failure(&self) -> bool {
        self.status == TRANSPORT_FAILURE_STATUS
    }
}
