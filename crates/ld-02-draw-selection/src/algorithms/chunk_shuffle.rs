//! Chunk Shuffle
//!
//! The ticket sequence `1..=n` is cut into consecutive chunks which are
//! then reordered by a position-scaled swap driven by a single digit.
//!
//! The swap is not a uniform permutation. It is kept bit-for-bit because
//! recorded draws must re-derive to the same winner.
//!
//! The swap target is computed in double precision against the live length
//! of the chunk list and may land past its end. The list then grows with
//! empty slots and the slot vacated by the swap stays empty; flattening
//! skips empty slots, so every ticket number survives exactly once.

use crate::domain::{CHUNK_DIVISOR, MAX_CHUNK_SIZE, MIN_CHUNK_SIZE};

/// `clamp(floor(ticket_count / 5), 5, 20)`.
pub fn chunk_size(ticket_count: u64) -> u64 {
    (ticket_count / CHUNK_DIVISOR).clamp(MIN_CHUNK_SIZE, MAX_CHUNK_SIZE)
}

/// Split `1..=ticket_count` into consecutive chunks of `chunk_size`; the
/// last chunk may be shorter.
pub fn split_into_chunks(ticket_count: u64, chunk_size: u64) -> Vec<Vec<u64>> {
    let numbers: Vec<u64> = (1..=ticket_count).collect();
    numbers
        .chunks(chunk_size.max(1) as usize)
        .map(<[u64]>::to_vec)
        .collect()
}

/// `floor((digit mod 10) * (i / len) * i)`, evaluated in `f64`.
pub fn swap_target(digit: u8, i: usize, len: usize) -> usize {
    let scaled = f64::from(digit % 10) * (i as f64 / len as f64) * i as f64;
    scaled.floor() as usize
}

enum Slot {
    Empty,
    Chunk(Vec<u64>),
}

/// Reorder `chunks` with the positional swap and flatten the result.
pub fn shuffle_chunks(chunks: Vec<Vec<u64>>, digit: u8) -> Vec<u64> {
    let mut slots: Vec<Slot> = chunks.into_iter().map(Slot::Chunk).collect();
    let initial_len = slots.len();

    for i in (1..initial_len).rev() {
        let j = swap_target(digit, i, slots.len());
        if j >= slots.len() {
            slots.resize_with(j + 1, || Slot::Empty);
        }
        slots.swap(i, j);
    }

    slots
        .into_iter()
        .flat_map(|slot| match slot {
            Slot::Chunk(chunk) => chunk,
            Slot::Empty => Vec::new(),
        })
        .collect()
}
