// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use smallvec::SmallVec;

/// Split `total_length` into one slice per weight, proportionally to
/// `weight / total_weight`.
///
/// Every slice but the last is truncated; the last one takes whatever is left,
/// so the slices always add up to `total_length`. Slices are clamped to the
/// remaining length, which only matters when `total_weight` is smaller than
/// the sum of `weights`.
pub(crate) fn divide_length(
    total_length: i32,
    total_weight: u64,
    weights: &[u64],
) -> SmallVec<[i32; 8]> {
    let mut lengths = SmallVec::with_capacity(weights.len());
    let Some((_, init)) = weights.split_last() else {
        return lengths;
    };
    let divisor = i128::from(total_weight.max(1));
    let mut remaining = total_length;
    for &weight in init {
        let share = i128::from(total_length) * i128::from(weight) / divisor;
        let share = i32::try_from(share)
            .unwrap_or(i32::MAX)
            .min(remaining)
            .max(0);
        lengths.push(share);
        remaining -= share;
    }
    lengths.push(remaining);
    lengths
}
