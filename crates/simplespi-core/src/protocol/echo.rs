//! Patch echo verification for file uploads
//!
//! After the device has stored a patch it shifts out a transformed copy of
//! the patch's first record: every byte XORed with `0x01`, and each 32-bit
//! word byte-swapped. The echo shows up at some point while the *next* patch
//! is being clocked in, so the host compares every exchange of that patch
//! against the oldest outstanding echo and slows down while it waits.
//! If a whole patch goes by without a match, the previous patch was lost.

use std::collections::VecDeque;
use std::time::Duration;

use crate::bridge::SpiBridge;
use crate::error::{Error, Result};
use crate::protocol::record::{to_hex, PATCH_RECORDS, RECORD_SIZE};

/// Mask XORed into the patch header to form the echo
pub const ECHO_XOR: [u8; RECORD_SIZE] = [0x01; RECORD_SIZE];

/// Bytes of the echo the device actually sends back
pub const ECHO_WORD: usize = 4;

/// Pause after an exchange that did not carry the expected echo
///
/// Sending the next patch must take longer than the device needs to write
/// the previous one to memory.
pub const ECHO_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Compute the echo the device returns for a patch starting with `header`
///
/// Only the first [`RECORD_SIZE`] bytes are used; a shorter header is zero
/// filled.
pub fn expected_echo(header: &[u8]) -> [u8; RECORD_SIZE] {
    let mut echo = [0u8; RECORD_SIZE];
    for (i, byte) in echo.iter_mut().enumerate() {
        *byte = header.get(i).copied().unwrap_or(0) ^ ECHO_XOR[i];
    }
    for word in echo.chunks_mut(4) {
        word.reverse();
    }
    echo
}

/// Outcome of checking one exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EchoCheck {
    /// Nothing to compare (first patch, or this patch was already confirmed)
    Idle,
    /// The expected echo of `patch` arrived
    Matched {
        /// Patch that was confirmed
        patch: usize,
    },
    /// No match yet; slow down and keep looking
    Waiting,
    /// The last exchange of a patch went by without the echo
    Mismatch {
        /// Patch that was never confirmed
        patch: usize,
        /// The echo that was expected
        expected: [u8; RECORD_SIZE],
    },
}

/// A patch boundary that was just passed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedEcho {
    /// Index of the new patch
    pub patch: usize,
    /// Echo expected while the following patch is sent
    pub echo: [u8; RECORD_SIZE],
}

/// Tracks outstanding echoes across a stream of record exchanges
#[derive(Debug, Default)]
pub struct EchoTracker {
    pending: VecDeque<QueuedEcho>,
    checked: bool,
    count: usize,
}

impl EchoTracker {
    /// Create a tracker for a new upload
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records observed so far
    pub fn records_seen(&self) -> usize {
        self.count
    }

    /// Feed one exchange: the record that was written and what came back
    ///
    /// Returns the check result and, when `written` starts a new patch, the
    /// echo queued for it. Nothing is queued once a mismatch is reported.
    pub fn observe(&mut self, written: &[u8], read: &[u8]) -> (EchoCheck, Option<QueuedEcho>) {
        let cnt = self.count;
        let slot = cnt % PATCH_RECORDS;
        let mut check = EchoCheck::Idle;

        if !self.checked && cnt / PATCH_RECORDS > 0 {
            let matched = self.pending.front().is_some_and(|expected| {
                read.len() >= ECHO_WORD && read[..ECHO_WORD] == expected.echo[..ECHO_WORD]
            });

            if matched {
                self.checked = true;
                if let Some(done) = self.pending.pop_front() {
                    check = EchoCheck::Matched { patch: done.patch };
                }
            } else if slot == PATCH_RECORDS - 1 {
                let (patch, expected) = self
                    .pending
                    .front()
                    .map_or((cnt / PATCH_RECORDS - 1, [0; RECORD_SIZE]), |e| {
                        (e.patch, e.echo)
                    });
                self.count += 1;
                return (EchoCheck::Mismatch { patch, expected }, None);
            } else {
                check = EchoCheck::Waiting;
            }
        }

        if slot == PATCH_RECORDS - 1 {
            self.checked = false;
        }

        let mut queued = None;
        if slot == 0 {
            let entry = QueuedEcho {
                patch: cnt / PATCH_RECORDS,
                echo: expected_echo(written),
            };
            self.pending.push_back(entry.clone());
            queued = Some(entry);
        }

        self.count += 1;
        (check, queued)
    }
}

/// Progress notifications from [`send_records`]
#[derive(Debug)]
pub enum SendEvent<'a> {
    /// One record was exchanged
    Exchanged {
        /// Record index
        index: usize,
        /// Bytes read back
        read: &'a [u8],
    },
    /// A patch started and its echo was queued
    PatchQueued {
        /// The record that opened the patch
        header: &'a [u8],
        /// The queued echo
        queued: &'a QueuedEcho,
    },
    /// A previous patch was acknowledged
    Acknowledged {
        /// The confirmed patch
        patch: usize,
    },
}

/// Upload records, verifying every patch through its echo
///
/// Returns the number of records sent. An unacknowledged patch aborts the
/// upload with [`Error::EchoMismatch`].
pub fn send_records<B, F>(bridge: &mut B, records: &[Vec<u8>], mut on_event: F) -> Result<usize>
where
    B: SpiBridge + ?Sized,
    F: FnMut(SendEvent<'_>),
{
    let mut tracker = EchoTracker::new();

    for (index, record) in records.iter().enumerate() {
        let read = bridge.exchange(record, 0)?;
        on_event(SendEvent::Exchanged { index, read: &read });

        let (check, queued) = tracker.observe(record, &read);
        match check {
            EchoCheck::Idle => {}
            EchoCheck::Matched { patch } => on_event(SendEvent::Acknowledged { patch }),
            EchoCheck::Waiting => bridge.delay(ECHO_RETRY_DELAY),
            EchoCheck::Mismatch { patch, expected } => {
                return Err(Error::EchoMismatch {
                    patch,
                    expected: to_hex(&expected[..ECHO_WORD]),
                });
            }
        }

        if let Some(queued) = &queued {
            on_event(SendEvent::PatchQueued {
                header: record,
                queued,
            });
        }
    }

    Ok(tracker.records_seen())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(n: u8) -> Vec<u8> {
        vec![n; RECORD_SIZE]
    }

    #[test]
    fn test_expected_echo() {
        let header = [0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        assert_eq!(
            expected_echo(&header),
            [0x02, 0x03, 0x00, 0x01, 0x06, 0x07, 0x04, 0x05]
        );
        assert_eq!(expected_echo(&header), expected_echo(&header));
    }

    #[test]
    fn test_expected_echo_uses_first_record_only() {
        let long = [0xFFu8; 16];
        assert_eq!(expected_echo(&long), [0xFE; RECORD_SIZE]);
        assert_eq!(expected_echo(&[0x10]), [0x01, 0x01, 0x01, 0x11, 0x01, 0x01, 0x01, 0x01]);
    }

    #[test]
    fn test_first_patch_is_never_checked() {
        let mut tracker = EchoTracker::new();
        let (check, queued) = tracker.observe(&record(7), &[0; 8]);
        assert_eq!(check, EchoCheck::Idle);
        assert_eq!(queued.unwrap().patch, 0);

        for _ in 1..PATCH_RECORDS {
            let (check, queued) = tracker.observe(&record(0), &[0; 8]);
            assert_eq!(check, EchoCheck::Idle);
            assert!(queued.is_none());
        }
    }

    #[test]
    fn test_echo_matched_in_next_patch() {
        let mut tracker = EchoTracker::new();
        let echo = expected_echo(&record(7));
        tracker.observe(&record(7), &[0; 8]);
        for _ in 1..PATCH_RECORDS {
            tracker.observe(&record(0), &[0; 8]);
        }

        // Patch 1 opens; the echo is not there yet
        let (check, queued) = tracker.observe(&record(9), &[0; 8]);
        assert_eq!(check, EchoCheck::Waiting);
        assert_eq!(queued.unwrap().patch, 1);

        let (check, _) = tracker.observe(&record(0), &echo);
        assert_eq!(check, EchoCheck::Matched { patch: 0 });

        // Once confirmed, the rest of the patch is not compared
        let (check, _) = tracker.observe(&record(0), &[0; 8]);
        assert_eq!(check, EchoCheck::Idle);
    }

    #[test]
    fn test_echo_mismatch_on_last_record_of_patch() {
        let mut tracker = EchoTracker::new();
        for _ in 0..PATCH_RECORDS {
            tracker.observe(&record(1), &[0; 8]);
        }
        for _ in 0..PATCH_RECORDS - 1 {
            let (check, _) = tracker.observe(&record(1), &[0; 8]);
            assert_eq!(check, EchoCheck::Waiting);
        }
        let (check, queued) = tracker.observe(&record(1), &[0; 8]);
        assert_eq!(
            check,
            EchoCheck::Mismatch {
                patch: 0,
                expected: expected_echo(&record(1)),
            }
        );
        assert!(queued.is_none());
    }

    #[test]
    fn test_only_first_word_is_compared() {
        let mut tracker = EchoTracker::new();
        let echo = expected_echo(&record(3));
        for _ in 0..PATCH_RECORDS {
            tracker.observe(&record(3), &[0; 8]);
        }
        let mut read = [0xAAu8; 8];
        read[..ECHO_WORD].copy_from_slice(&echo[..ECHO_WORD]);
        let (check, _) = tracker.observe(&record(3), &read);
        assert_eq!(check, EchoCheck::Matched { patch: 0 });
    }
}
