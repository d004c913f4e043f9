use serde::{Deserialize, Serialize};

/// One entry of a relationship list.
///
/// The `handle` is the item's identity: two observations with the same handle
/// are the same logical account, even if the metadata or on-screen position
/// differ between observations. Equality of handles is exact string equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    /// Account handle, e.g. `@somebody`
    pub handle: String,

    /// Absolute profile URL, when the cell exposed one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,

    /// Whether the cell carried the "Follows you" badge
    pub follows_back: bool,
}

impl ListItem {
    pub fn new(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            profile_url: None,
            follows_back: false,
        }
    }

    pub fn with_profile_url(mut self, url: impl Into<String>) -> Self {
        self.profile_url = Some(url.into());
        self
    }

    pub fn with_follows_back(mut self, follows_back: bool) -> Self {
        self.follows_back = follows_back;
        self
    }
}
