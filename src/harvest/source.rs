use crate::error::AuditError;
use crate::harvest::item::ListItem;

/// A virtualized list as the harvester sees it: a small rendered window of
/// rows addressed by index, plus a way to ask the view for more rows.
///
/// The window is read lazily — `window_len()` plus per-index reads — because
/// every read is a round trip to the rendering surface. That is what makes the
/// harvester's partition-point search worth O(log w) reads instead of O(w).
/// Indices are only valid until the next `request_more` call; the harvester
/// reads everything it needs from one window before advancing.
///
/// `identity_at` is the cheap half of a row read (identity only, used by the
/// search predicate); `read_item` also collects metadata and is only called
/// for rows being appended.
pub trait ListSource {
    /// True when the list has no rows at all. Distinct from a window that
    /// temporarily shows nothing new.
    fn is_empty(&mut self) -> Result<bool, AuditError>;

    /// Number of rows currently rendered.
    fn window_len(&mut self) -> Result<usize, AuditError>;

    /// Identity of the row at `index` in the current window.
    fn identity_at(&mut self, index: usize) -> Result<String, AuditError>;

    /// Full item (identity + metadata) at `index` in the current window.
    fn read_item(&mut self, index: usize) -> Result<ListItem, AuditError>;

    /// Ask the view to bring rows past `frontier` into range (e.g. scroll it
    /// into view). The effect is asynchronous on the rendering side, so
    /// implementations wait their settle period before returning.
    fn request_more(&mut self, frontier: &ListItem) -> Result<(), AuditError>;
}
