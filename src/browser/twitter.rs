use crate::browser::session::BrowserSession;
use crate::error::AuditError;
use crate::harvest::item::ListItem;
use crate::harvest::source::ListSource;

pub const TWITTER_BASE_URL: &str = "https://twitter.com";
pub const TWITTER_LOGIN_URL: &str = "https://twitter.com/login";

// ----------------------------------------------------------------------------
// Login page
// ----------------------------------------------------------------------------
const SEL_USERNAME_INPUT: &str = r#"input[name="session[username_or_email]"]"#;
const SEL_PASSWORD_INPUT: &str = r#"input[name="session[password]"]"#;
const SEL_LOGIN_BUTTON: &str = r#"div[role="button"]"#;
const SEL_INVALID_CREDENTIALS: &str = r#"span:has-text("did not match our records")"#;
const SEL_UNUSUAL_ACTIVITY: &str = r#"span:has-text("unusual login activity")"#;
const SEL_CAPTCHA_CHALLENGE: &str = r#"span:has-text("not a robot")"#;

// ----------------------------------------------------------------------------
// Relationship timelines
// ----------------------------------------------------------------------------
pub const TIMELINE_FOLLOWING: &str = r#"div[aria-label="Timeline: Following"]"#;
pub const TIMELINE_FOLLOWERS: &str = r#"div[aria-label="Timeline: Followers"]"#;
const SEL_USER_CELL: &str = r#"div[data-testid="UserCell"]"#;
const SEL_CELL_LINK: &str = r#"a[role="link"]"#;
const SEL_FOLLOWS_BACK_BADGE: &str = r#"div[data-testid="userFollowIndicator"]"#;
const FOLLOWS_BACK_TEXT: &str = "Follows you";

// ----------------------------------------------------------------------------
// Logout
// ----------------------------------------------------------------------------
const SEL_MORE_OPTIONS_BUTTON: &str = r#"div[data-testid="AppTabBar_More_Menu"]"#;
const SEL_MORE_OPTIONS_MENU: &str = r#"div[role="menu"]"#;
const SEL_LOGOUT_LINK: &str = r#"div[role="menu"] a[href="/logout"]"#;
const SEL_LOGOUT_CONFIRM: &str = r#"div[data-testid="confirmationSheetConfirm"]"#;

/// Settle periods for the client, in milliseconds. Injected from the config
/// so callers can shorten them against fast test fixtures.
#[derive(Debug, Clone)]
pub struct ClientTiming {
    /// Full page navigation (login page, profile, relationship pages)
    pub page_load_ms: u64,
    /// Nearby rows after a scroll advance in a relationship timeline
    pub settle_ms: u64,
    /// Dropdown/menu rendering (the "..." options menu)
    pub menu_ms: u64,
}

impl Default for ClientTiming {
    fn default() -> Self {
        Self {
            page_load_ms: 4000,
            settle_ms: 500,
            menu_ms: 1000,
        }
    }
}

// ============================================================================
// Identity derivation
// ============================================================================

/// Derive the `@` handle from a user-cell anchor href.
///
/// The href is the profile link, e.g. `https://twitter.com/SOME_USER` or
/// `/SOME_USER`; the handle is `@` + the last path segment.
pub fn handle_from_href(href: &str) -> String {
    let trimmed = href.trim_end_matches('/');
    let segment = trimmed.rsplit('/').next().unwrap_or(trimmed);
    format!("@{}", segment)
}

/// Absolute profile URL from a user-cell anchor href.
pub fn profile_url_from_href(href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{}{}", TWITTER_BASE_URL, href)
    }
}

// ============================================================================
// Twitter client — login, navigation, logout
// ============================================================================

/// Selector-driven flows against a signed-in Twitter session.
pub struct TwitterClient {
    session: BrowserSession,
    timing: ClientTiming,
    username: String,
}

impl TwitterClient {
    pub fn new(session: BrowserSession, timing: ClientTiming, username: impl Into<String>) -> Self {
        Self {
            session,
            timing,
            username: username.into(),
        }
    }

    /// Sign in with the given credentials.
    ///
    /// After submitting, probes the failure markers the login page is known to
    /// render: wrong credentials and unusual-activity locks are reported as
    /// `AuthFailed`; a reCAPTCHA challenge as `ChallengeUnsupported` (this
    /// tool does not solve challenges).
    pub fn login(&mut self, username: &str, password: &str) -> Result<(), AuditError> {
        self.session.navigate(TWITTER_LOGIN_URL)?;
        self.session.wait_idle(self.timing.page_load_ms)?;

        self.session.fill(SEL_USERNAME_INPUT, username)?;
        self.session.fill(SEL_PASSWORD_INPUT, password)?;
        self.session.click(SEL_LOGIN_BUTTON)?;

        // The home feed can take a while to fully load after sign-in.
        self.session.wait_idle(self.timing.page_load_ms * 2)?;

        if self.session.query_visible(SEL_INVALID_CREDENTIALS)?
            || self.session.query_visible(SEL_UNUSUAL_ACTIVITY)?
        {
            return Err(AuditError::AuthFailed(
                "invalid username or password, please correct it".into(),
            ));
        }
        if self.session.query_visible(SEL_CAPTCHA_CHALLENGE)? {
            return Err(AuditError::ChallengeUnsupported(
                "the account was asked to solve a reCAPTCHA challenge".into(),
            ));
        }

        Ok(())
    }

    /// Navigate to the signed-in user's profile page.
    fn goto_profile(&mut self) -> Result<(), AuditError> {
        let selector = format!(r#"a[href="/{}"]"#, self.username);
        self.session.click(&selector)?;
        self.session.wait_idle(self.timing.page_load_ms * 2)?;
        Ok(())
    }

    /// Navigate to the user's following list and wait for its timeline.
    pub fn open_following(&mut self) -> Result<(), AuditError> {
        self.goto_profile()?;
        let selector = format!(r#"a[href="/{}/following"]"#, self.username);
        self.session.click(&selector)?;
        self.session.wait_idle(self.timing.page_load_ms * 2)?;
        self.ensure_timeline(TIMELINE_FOLLOWING)
    }

    /// Navigate to the user's followers list and wait for its timeline.
    pub fn open_followers(&mut self) -> Result<(), AuditError> {
        self.goto_profile()?;
        let selector = format!(r#"a[href="/{}/followers"]"#, self.username);
        self.session.click(&selector)?;
        self.session.wait_idle(self.timing.page_load_ms * 2)?;
        self.ensure_timeline(TIMELINE_FOLLOWERS)
    }

    fn ensure_timeline(&mut self, timeline: &str) -> Result<(), AuditError> {
        if self.session.query_visible(timeline)? {
            Ok(())
        } else {
            Err(AuditError::ElementMissing {
                element: timeline.to_string(),
                context: "timeline did not render after navigation".into(),
            })
        }
    }

    /// Harvesting source over the following timeline. Call after
    /// [`open_following`](Self::open_following).
    pub fn following_source(&mut self) -> TimelineSource<'_> {
        TimelineSource::new(&mut self.session, TIMELINE_FOLLOWING, self.timing.settle_ms)
    }

    /// Harvesting source over the followers timeline. Call after
    /// [`open_followers`](Self::open_followers).
    pub fn followers_source(&mut self) -> TimelineSource<'_> {
        TimelineSource::new(&mut self.session, TIMELINE_FOLLOWERS, self.timing.settle_ms)
    }

    /// Log out via the "..." options menu and the confirmation sheet.
    pub fn logout(&mut self) -> Result<(), AuditError> {
        self.session
            .click(SEL_MORE_OPTIONS_BUTTON)
            .map_err(|e| AuditError::LogoutFailed(format!("options button: {}", e)))?;
        self.session.wait_idle(self.timing.menu_ms)?;

        if !self.session.query_visible(SEL_MORE_OPTIONS_MENU)? {
            return Err(AuditError::LogoutFailed(
                "the options menu did not open".into(),
            ));
        }

        self.session
            .click(SEL_LOGOUT_LINK)
            .map_err(|e| AuditError::LogoutFailed(format!("logout link: {}", e)))?;
        self.session.wait_idle(self.timing.menu_ms)?;

        self.session
            .click(SEL_LOGOUT_CONFIRM)
            .map_err(|e| AuditError::LogoutFailed(format!("confirmation sheet: {}", e)))?;

        Ok(())
    }

    /// Quit the underlying browser session.
    pub fn quit(&mut self) -> Result<(), AuditError> {
        self.session.quit()
    }
}

// ============================================================================
// Timeline source — ListSource over a rendered relationship timeline
// ============================================================================

/// The rendered user cells of one relationship timeline, exposed to the
/// harvester as a lazily-read window.
///
/// Rows are addressed by index into the matches of the cell selector; each
/// identity or metadata read is one browser round trip. Advancing scrolls the
/// frontier's profile anchor into view and waits the settle period, after
/// which the window may have shifted (the timeline virtualizes by dropping
/// consumed rows from the top as new rows append at the bottom).
pub struct TimelineSource<'a> {
    session: &'a mut BrowserSession,
    cell_selector: String,
    settle_ms: u64,
}

impl<'a> TimelineSource<'a> {
    pub fn new(session: &'a mut BrowserSession, timeline: &str, settle_ms: u64) -> Self {
        Self {
            session,
            cell_selector: format!("{} {}", timeline, SEL_USER_CELL),
            settle_ms,
        }
    }

    fn href_at(&mut self, index: usize) -> Result<String, AuditError> {
        self.session
            .query_attribute(&self.cell_selector, index, Some(SEL_CELL_LINK), "href")?
            .ok_or_else(|| AuditError::ElementMissing {
                element: format!("{}[{}] {}", self.cell_selector, index, SEL_CELL_LINK),
                context: "user cell has no profile link".into(),
            })
    }
}

impl ListSource for TimelineSource<'_> {
    fn is_empty(&mut self) -> Result<bool, AuditError> {
        Ok(self.session.query_count(&self.cell_selector)? == 0)
    }

    fn window_len(&mut self) -> Result<usize, AuditError> {
        Ok(self.session.query_count(&self.cell_selector)? as usize)
    }

    fn identity_at(&mut self, index: usize) -> Result<String, AuditError> {
        Ok(handle_from_href(&self.href_at(index)?))
    }

    fn read_item(&mut self, index: usize) -> Result<ListItem, AuditError> {
        let href = self.href_at(index)?;
        let badge =
            self.session
                .query_text_at(&self.cell_selector, index, Some(SEL_FOLLOWS_BACK_BADGE))?;
        let follows_back = badge.as_deref().map(str::trim) == Some(FOLLOWS_BACK_TEXT);

        Ok(ListItem::new(handle_from_href(&href))
            .with_profile_url(profile_url_from_href(&href))
            .with_follows_back(follows_back))
    }

    fn request_more(&mut self, frontier: &ListItem) -> Result<(), AuditError> {
        let name = frontier.handle.trim_start_matches('@');
        let target = format!(r#"{} a[href="/{}"]"#, self.cell_selector, name);
        self.session.scroll_into_view(&target)?;
        // Nearby rows load asynchronously after the scroll.
        self.session.wait_idle(self.settle_ms)
    }
}
