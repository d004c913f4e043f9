use crate::error::AuditError;
use crate::harvest::set::AccumulatedSet;
use crate::harvest::source::ListSource;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::HarvestEvent;

// ============================================================================
// Partition-point search
// ============================================================================

/// Find the smallest index in the current window whose row has not been
/// recorded yet: `0` if nothing is seen, `len` if everything is.
///
/// Relies on the seen-prefix assumption: among the rendered rows, the
/// already-recorded ones occupy a single leading prefix, so the membership
/// predicate is true-then-false across the window and a standard
/// partition-point binary search applies. Each probe costs one identity read
/// from the source, so this is O(log w) reads where a linear re-scan would be
/// O(w).
pub fn first_unseen<S: ListSource>(
    source: &mut S,
    len: usize,
    seen: &AccumulatedSet,
) -> Result<usize, AuditError> {
    let mut lo = 0;
    let mut hi = len;
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if seen.contains(&source.identity_at(mid)?) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    Ok(lo)
}

// ============================================================================
// Harvest loop
// ============================================================================

/// Collect every distinct item the source will ever render.
///
/// Each round reads the current window, locates the boundary between
/// already-recorded rows and new rows, appends the new suffix, and asks the
/// view to scroll the last appended item (the frontier) into range. The loop
/// ends the first time a window contributes nothing new: under the
/// seen-prefix assumption a window with no new rows means the list is
/// exhausted, since advancing a non-exhausted list always reveals at least
/// one new trailing row.
///
/// A source with no rows at all yields an empty set — a valid "no relations"
/// outcome, not an error. A row whose handle is already recorded aborts the
/// harvest with [`AuditError::DuplicateIdentity`]; see [`AccumulatedSet`].
pub fn harvest<S: ListSource>(
    source: &mut S,
    tracer: &TraceLogger,
) -> Result<AccumulatedSet, AuditError> {
    let mut seen = AccumulatedSet::new();

    if source.is_empty()? {
        return Ok(seen);
    }

    let mut round: u64 = 0;
    loop {
        let len = source.window_len()?;
        let start = first_unseen(source, len, &seen)?;

        if start == len {
            // Nothing new in this window: the list is exhausted.
            tracer.log(&HarvestEvent::round(round, len, start, 0, seen.len()));
            break;
        }

        // Append phase. The last appended item becomes the frontier.
        let mut frontier = source.read_item(start)?;
        seen.insert(frontier.clone())?;
        for index in start + 1..len {
            let item = source.read_item(index)?;
            seen.insert(item.clone())?;
            frontier = item;
        }

        tracer.log(&HarvestEvent::round(round, len, start, len - start, seen.len()));
        round += 1;

        source.request_more(&frontier)?;
    }

    Ok(seen)
}
