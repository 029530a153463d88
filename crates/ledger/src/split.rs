//! Pure share computation: turning item selections into assignment
//! payloads with exact integer arithmetic.

use crate::errors::{LedgerError, LedgerResult};
use crate::types::{AssignmentInput, ItemSelection};

/// Divide `price_minor` evenly among `count` members.
///
/// The per-member share is `price / count` rounded half-to-even to the
/// minor unit; the residual goes to the first member so the shares always
/// sum to the price exactly. Sub-unit splits (price smaller than the
/// member count) push any deficit rightward instead of going negative.
pub fn split_evenly(price_minor: i64, count: usize) -> Vec<i64> {
    if count == 0 {
        return Vec::new();
    }

    let n = count as i64;
    let base = price_minor / n;
    let rem = price_minor % n;
    let doubled = rem * 2;
    let rounded = if doubled > n || (doubled == n && base % 2 != 0) {
        base + 1
    } else {
        base
    };

    let mut shares = vec![rounded; count];
    shares[0] += price_minor - rounded * n;

    // Invariant: every share >= 0 and the sum equals price_minor.
    for i in 0..count - 1 {
        if shares[i] < 0 {
            shares[i + 1] += shares[i];
            shares[i] = 0;
        }
    }

    shares
}

/// Compute the assignment payload for a set of item selections.
///
/// Items with at least one explicitly selected member are divided among
/// exactly those members in selection order; items with an empty
/// selection are divided among the whole group in roster order. An empty
/// selection over a zero-member group is an error, never a silently
/// dropped item.
pub fn compute_shares(
    selections: &[ItemSelection],
    group_member_ids: &[String],
) -> LedgerResult<Vec<AssignmentInput>> {
    let mut assignments = Vec::new();

    for selection in selections {
        if selection.price_minor < 0 {
            return Err(LedgerError::Validation(format!(
                "item {} has a negative price",
                selection.item_id
            )));
        }

        let mut targets: Vec<&String> = Vec::new();
        if selection.member_ids.is_empty() {
            targets.extend(group_member_ids.iter());
        } else {
            for member_id in &selection.member_ids {
                if !targets.contains(&member_id) {
                    targets.push(member_id);
                }
            }
        }

        if targets.is_empty() {
            return Err(LedgerError::Validation(format!(
                "item {} cannot be split across an empty group",
                selection.item_id
            )));
        }

        let shares = split_evenly(selection.price_minor, targets.len());
        for (member_id, share_minor) in targets.into_iter().zip(shares) {
            assignments.push(AssignmentInput {
                item_id: selection.item_id.clone(),
                member_id: member_id.clone(),
                share_minor,
            });
        }
    }

    Ok(assignments)
}
