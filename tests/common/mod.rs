use follow_audit::error::AuditError;
use follow_audit::harvest::item::ListItem;
use follow_audit::harvest::source::ListSource;

/// A list item the way the timeline source would build it.
pub fn user(name: &str) -> ListItem {
    ListItem::new(format!("@{}", name))
        .with_profile_url(format!("https://twitter.com/{}", name))
}

/// A scripted virtualized list: a fixed sequence of windows, advanced one
/// step per `request_more`. Once the last window is reached, further advances
/// re-serve it — the way a real timeline keeps rendering the same tail once
/// the list is exhausted.
///
/// Counts reads so tests can assert the harvester's access patterns.
pub struct ScriptedSource {
    windows: Vec<Vec<ListItem>>,
    cursor: usize,
    pub window_reads: usize,
    pub identity_reads: usize,
    pub advances: usize,
}

impl ScriptedSource {
    pub fn new(windows: Vec<Vec<ListItem>>) -> Self {
        Self {
            windows,
            cursor: 0,
            window_reads: 0,
            identity_reads: 0,
            advances: 0,
        }
    }

    fn current(&self) -> &[ListItem] {
        self.windows
            .get(self.cursor)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl ListSource for ScriptedSource {
    fn is_empty(&mut self) -> Result<bool, AuditError> {
        Ok(self.windows.first().map_or(true, |w| w.is_empty()))
    }

    fn window_len(&mut self) -> Result<usize, AuditError> {
        self.window_reads += 1;
        Ok(self.current().len())
    }

    fn identity_at(&mut self, index: usize) -> Result<String, AuditError> {
        self.identity_reads += 1;
        Ok(self.current()[index].handle.clone())
    }

    fn read_item(&mut self, index: usize) -> Result<ListItem, AuditError> {
        Ok(self.current()[index].clone())
    }

    fn request_more(&mut self, _frontier: &ListItem) -> Result<(), AuditError> {
        self.advances += 1;
        if self.cursor + 1 < self.windows.len() {
            self.cursor += 1;
        }
        Ok(())
    }
}
