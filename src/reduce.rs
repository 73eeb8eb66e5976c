//! Multi-operand product and sum reductions.
//!
//! Operands sit in a min-heap keyed by the digits they carry, and the two
//! smallest are paired first, Huffman-style, so no single wide
//! multiplication dominates the cost. Pairing order only moves rounding
//! noise; the value agrees with a left-to-right fold. The `parallel_*`
//! variants split the slice across rayon workers, reduce each chunk with
//! the same heap, and merge the partial results.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::number::Float;
use crate::precision::{ensure, Context, Precision};

#[derive(Clone, Copy)]
enum Op {
    Mul,
    Add,
}

impl Op {
    fn apply(self, a: &Float, b: &Float) -> Float {
        match self {
            Op::Mul => a * b,
            Op::Add => a + b,
        }
    }

    fn identity(self, radix: u32) -> Float {
        match self {
            Op::Mul => Float::one(radix),
            Op::Add => Float::zero(radix),
        }
    }
}

/// Digits an operand contributes to a pairing, the heap's cost key.
fn weight(v: &Float) -> u64 {
    match v.precision().finite() {
        Some(d) => d,
        None => v.scale().unsigned_abs().max(1),
    }
}

struct Entry {
    weight: u64,
    seq: u64,
    value: Float,
}

// Reversed so the BinaryHeap pops the lightest entry; `seq` keeps the
// ordering total without comparing values.
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.seq == other.seq
    }
}

impl Eq for Entry {}

fn check_radix(values: &[Float], radix: u32) -> Result<()> {
    for v in values {
        if v.radix() != radix {
            return Err(Error::RadixMismatch(radix, v.radix()));
        }
    }
    Ok(())
}

fn heap_reduce(values: &[Float], radix: u32, wp: Precision, op: Op) -> Float {
    let mut heap: BinaryHeap<Entry> = values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let value = ensure(&v.rounded(wp.min(v.precision())), wp);
            Entry {
                weight: weight(&value),
                seq: i as u64,
                value,
            }
        })
        .collect();
    let mut seq = values.len() as u64;
    loop {
        let a = match heap.pop() {
            Some(a) => a,
            None => return op.identity(radix).with_precision(wp),
        };
        let b = match heap.pop() {
            Some(b) => b,
            None => return a.value,
        };
        let value = op.apply(&a.value, &b.value);
        heap.push(Entry {
            weight: weight(&value),
            seq,
            value,
        });
        seq += 1;
    }
}

fn reduce(values: &[Float], radix: u32, target: Precision, op: Op) -> Result<Float> {
    check_radix(values, radix)?;
    let wp = Context::new(target, radix).working();
    Ok(heap_reduce(values, radix, wp, op).rounded(target))
}

fn reduce_parallel(values: &[Float], radix: u32, target: Precision, op: Op) -> Result<Float> {
    check_radix(values, radix)?;
    let wp = Context::new(target, radix).working();
    let chunk = (values.len() / rayon::current_num_threads()).max(8);
    let partials: Vec<Float> = values
        .par_chunks(chunk)
        .map(|c| heap_reduce(c, radix, wp, op))
        .collect();
    Ok(heap_reduce(&partials, radix, wp, op).rounded(target))
}

/// Product of all operands; the empty product is 1 in the given radix.
///
/// # Errors
///
/// [`Error::RadixMismatch`] when an operand's radix differs from `radix`.
pub fn product(values: &[Float], radix: u32, target: Precision) -> Result<Float> {
    reduce(values, radix, target, Op::Mul)
}

/// Sum of all operands; the empty sum is 0 in the given radix.
///
/// # Errors
///
/// [`Error::RadixMismatch`] when an operand's radix differs from `radix`.
pub fn sum(values: &[Float], radix: u32, target: Precision) -> Result<Float> {
    reduce(values, radix, target, Op::Add)
}

/// [`product`] with the chunk reductions spread across the rayon pool.
pub fn parallel_product(values: &[Float], radix: u32, target: Precision) -> Result<Float> {
    reduce_parallel(values, radix, target, Op::Mul)
}

/// [`sum`] with the chunk reductions spread across the rayon pool.
pub fn parallel_sum(values: &[Float], radix: u32, target: Precision) -> Result<Float> {
    reduce_parallel(values, radix, target, Op::Add)
}
