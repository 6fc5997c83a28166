//! Ticket ID selection
//!
//! Produces the ordered list of tickets an export walks through, either every ID in a
//! range or a random sample of distinct IDs from it. Output is always ascending so that
//! the export is processed in a predictable order regardless of how IDs were drawn.

use crate::error::{Error, Result};
use crate::types::{Selection, TicketId};
use rand::Rng;

/// Number of ticket IDs in `[min, max]`, zero when `min > max`
pub fn range_size(min: TicketId, max: TicketId) -> u64 {
    if min > max {
        0
    } else {
        (max.get() - min.get()).saturating_add(1)
    }
}

/// Number of tickets a [`Selection`] resolves to, without materializing them
///
/// For random mode this is the requested sample size, whether or not the range can
/// satisfy it.
pub fn ticket_count(selection: &Selection) -> u64 {
    match *selection {
        Selection::Sequential { min, max } => range_size(min, max),
        Selection::Random { count, .. } => count,
    }
}

/// Every ticket ID in `[min, max]`, ascending
///
/// An inverted range yields an empty list rather than an error. A range too large to
/// allocate fails with [`Error::Other`] instead of aborting the process.
pub fn sequential(min: TicketId, max: TicketId) -> Result<Vec<TicketId>> {
    let size = range_size(min, max);
    let mut ids = Vec::new();
    usize::try_from(size)
        .ok()
        .and_then(|len| ids.try_reserve_exact(len).ok())
        .ok_or_else(|| Error::Other(format!("ticket range of {size} IDs is too large")))?;
    ids.extend((min.get()..=max.get()).map(TicketId));
    Ok(ids)
}

/// `count` distinct ticket IDs drawn uniformly from `[min, max]`, ascending
///
/// Fails with [`Error::SelectionExhausted`] before drawing anything when the range
/// holds fewer than `count` IDs.
pub fn random_sample<R: Rng + ?Sized>(
    rng: &mut R,
    min: TicketId,
    max: TicketId,
    count: u64,
) -> Result<Vec<TicketId>> {
    let available = range_size(min, max);
    if count > available {
        return Err(Error::SelectionExhausted {
            requested: count,
            available,
        });
    }
    if count == 0 {
        return Ok(Vec::new());
    }

    let length = usize::try_from(available)
        .map_err(|_| Error::Other(format!("ticket range of {available} is too large")))?;
    let amount = usize::try_from(count)
        .map_err(|_| Error::Other(format!("sample size {count} is too large")))?;

    let mut ids: Vec<TicketId> = rand::seq::index::sample(rng, length, amount)
        .into_iter()
        .map(|offset| TicketId(min.get() + offset as u64))
        .collect();
    ids.sort_unstable();
    Ok(ids)
}

/// Resolve a [`Selection`] into the ticket IDs to export
pub fn select<R: Rng + ?Sized>(selection: &Selection, rng: &mut R) -> Result<Vec<TicketId>> {
    match *selection {
        Selection::Sequential { min, max } => sequential(min, max),
        Selection::Random { min, max, count } => random_sample(rng, min, max, count),
    }
}
