/// Checked-and-set boolean that can be tripped exactly once.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Latch {
    tripped: bool,
}

impl Latch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trip the latch. Returns `true` only for the call that tripped it.
    pub fn trip(&mut self) -> bool {
        if self.tripped {
            return false;
        }
        self.tripped = true;
        true
    }

    pub fn is_tripped(&self) -> bool {
        self.tripped
    }
}

/// Readiness gate fed by a tile-load progress stream.
///
/// Progress callbacks report the number of pending tiles and may fire many
/// times, including repeated zeros. The gate opens on the first zero and every
/// later report is ignored.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessLatch {
    latch: Latch,
    reports: u64,
}

impl ReadinessLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one progress report. Returns `true` exactly once: on the first
    /// report with zero pending items.
    pub fn observe(&mut self, pending: usize) -> bool {
        self.reports += 1;
        if pending != 0 {
            return false;
        }
        self.latch.trip()
    }

    pub fn is_ready(&self) -> bool {
        self.latch.is_tripped()
    }

    /// Number of progress reports seen so far.
    pub fn reports(&self) -> u64 {
        self.reports
    }
}
