//! Ordering of asynchronous file reads.
//!
//! Picking a file starts a read that completes later. The user can pick again
//! or press submit before it finishes. [`FileReads`] hands out a ticket per
//! read so only the newest one is applied, and remembers a submit that
//! arrived while that read was still pending.

/// Identifies one file read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadTicket(u64);

/// What to do with a finished read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadCompletion {
    /// A newer pick superseded this read; discard it.
    Stale,
    /// Newest read. `submit` is set when a submit is waiting on it.
    Current { submit: bool },
}

#[derive(Debug, Default)]
pub struct FileReads {
    latest: u64,
    pending: Option<u64>,
    submit_when_ready: bool,
}

impl FileReads {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a read, superseding any read still in progress.
    pub fn begin(&mut self) -> ReadTicket {
        self.latest += 1;
        self.pending = Some(self.latest);
        ReadTicket(self.latest)
    }

    pub fn is_reading(&self) -> bool {
        self.pending.is_some()
    }

    /// Queue a submit behind the pending read.
    ///
    /// Returns false when no read is pending and the caller should submit now.
    pub fn defer_submit(&mut self) -> bool {
        if self.pending.is_none() {
            return false;
        }
        self.submit_when_ready = true;
        true
    }

    /// Settle the read identified by `ticket`.
    pub fn finish(&mut self, ticket: ReadTicket) -> ReadCompletion {
        if self.pending != Some(ticket.0) {
            return ReadCompletion::Stale;
        }
        self.pending = None;
        ReadCompletion::Current {
            submit: std::mem::take(&mut self.submit_when_ready),
        }
    }
}
