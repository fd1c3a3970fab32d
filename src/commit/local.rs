//! Optimistic local mutation of coded values

use crate::codec::PackedMask;
use crate::interaction::Operation;

/// Apply a lasso selection to `codes` in place and return how many changed.
///
/// `Add` assigns `code` to every selected point. `Remove` clears selected
/// points that currently carry `code` and leaves other labels alone.
pub fn apply_selection(codes: &mut [u16], mask: &PackedMask, operation: Operation, code: u16) -> usize {
    let mut changed = 0;
    for index in mask.iter_selected() {
        let Some(slot) = codes.get_mut(index) else {
            break;
        };
        let next = match operation {
            Operation::Add => code,
            Operation::Remove if *slot == code => 0,
            Operation::Remove => *slot,
        };
        if next != *slot {
            *slot = next;
            changed += 1;
        }
    }
    changed
}
