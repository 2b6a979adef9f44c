//! Property tests for ordering and bounds of the pending-transfer queue.
//!
//! Run with: cargo test -p transfer --test queue_proptest

#![allow(clippy::unwrap_used)] // Tests use unwrap() for readable assertions

use embassy_sync::channel::Channel;
use platform::mocks::MockI2s;
use platform::{EventMask, I2sChannel, I2sConfig};
use proptest::prelude::*;
use transfer::{CompletionChannel, I2sUnit, Submission, TransferError, TransferStatus, UnitId};

const CAPACITY: usize = 4;

type Unit<'c> = I2sUnit<MockI2s, &'c CompletionChannel<4>, CAPACITY, 2>;

fn tagged(tag: usize) -> &'static [u8] {
    Box::leak(vec![0u8; tag].into_boxed_slice())
}

fn started_tags(unit: &Unit<'_>) -> Vec<usize> {
    unit.with_hardware(|hw| {
        hw.starts()
            .iter()
            .map(|s| s.tx.map_or(0, |tx| tx.len()))
            .collect()
    })
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Submit,
    Complete,
    Abort,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Submit),
        2 => Just(Op::Complete),
        1 => Just(Op::Abort),
    ]
}

proptest! {
    /// Accepted transfers start in submission order, no matter how
    /// submissions, completions and aborts interleave.
    #[test]
    fn accepted_transfers_start_in_submission_order(ops in prop::collection::vec(op(), 1..40)) {
        let channel: CompletionChannel<4> = Channel::new();
        let unit: Unit<'_> = I2sUnit::new(UnitId::new(0), MockI2s::new(), &channel);
        let h = unit.handle(I2sConfig::DEFAULT).unwrap();

        let mut next_tag = 1usize;
        let mut accepted = Vec::new();
        for op in ops {
            match op {
                Op::Submit => {
                    let tag = next_tag;
                    next_tag += 1;
                    if h.begin_transfer().set_tx(tagged(tag)).commit().is_ok() {
                        accepted.push(tag);
                    }
                }
                Op::Complete => {
                    if unit.status() == TransferStatus::Busy {
                        unit.with_hardware(|hw| hw.finish(I2sChannel::Tx, EventMask::TX_COMPLETE));
                        unit.on_interrupt(I2sChannel::Tx);
                    }
                }
                Op::Abort => h.abort_transfer(),
            }
            prop_assert!(unit.pending_transfers() <= CAPACITY);
            // Idle only with nothing left to run.
            if unit.status() == TransferStatus::Idle {
                prop_assert_eq!(unit.pending_transfers(), 0);
            }
        }

        // Drain what is left.
        while unit.status() == TransferStatus::Busy {
            unit.with_hardware(|hw| hw.finish(I2sChannel::Tx, EventMask::TX_COMPLETE));
            unit.on_interrupt(I2sChannel::Tx);
        }
        prop_assert_eq!(started_tags(&unit), accepted);
    }

    /// Beyond capacity every submission fails and the queue length holds.
    #[test]
    fn full_queue_rejects_every_extra_submission(extra in 1usize..10) {
        let channel: CompletionChannel<4> = Channel::new();
        let unit: Unit<'_> = I2sUnit::new(UnitId::new(0), MockI2s::new(), &channel);
        let h = unit.handle(I2sConfig::DEFAULT).unwrap();

        prop_assert_eq!(h.begin_transfer().set_tx(tagged(1)).commit(), Ok(Submission::Started));
        for tag in 0..CAPACITY {
            prop_assert_eq!(
                h.begin_transfer().set_tx(tagged(tag + 2)).commit(),
                Ok(Submission::Queued)
            );
        }
        for _ in 0..extra {
            prop_assert_eq!(
                h.begin_transfer().set_tx(tagged(1)).commit(),
                Err(TransferError::QueueFull)
            );
            prop_assert_eq!(unit.pending_transfers(), CAPACITY);
        }
        prop_assert_eq!(unit.stats().rejected as usize, extra);
        prop_assert_eq!(started_tags(&unit), vec![1]);
    }
}
