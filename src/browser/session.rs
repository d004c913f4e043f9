use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};

use serde::{Deserialize, Serialize};

use crate::error::AuditError;

/// Request sent to browser_server.js over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BrowserRequest {
    Navigate {
        cmd: &'static str,
        url: String,
    },
    Action {
        cmd: &'static str,
        action: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        selector: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        duration_ms: Option<u64>,
    },
    QueryVisible {
        cmd: &'static str,
        selector: String,
    },
    QueryCount {
        cmd: &'static str,
        selector: String,
    },
    QueryText {
        cmd: &'static str,
        selector: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        child: Option<String>,
    },
    QueryAttribute {
        cmd: &'static str,
        selector: String,
        index: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        child: Option<String>,
        attribute: String,
    },
    Quit {
        cmd: &'static str,
    },
}

impl BrowserRequest {
    pub fn navigate(url: &str) -> Self {
        BrowserRequest::Navigate {
            cmd: "navigate",
            url: url.to_string(),
        }
    }

    pub fn fill(selector: &str, value: &str) -> Self {
        BrowserRequest::Action {
            cmd: "action",
            action: "fill".into(),
            selector: Some(selector.to_string()),
            value: Some(value.to_string()),
            duration_ms: None,
        }
    }

    pub fn click(selector: &str) -> Self {
        BrowserRequest::Action {
            cmd: "action",
            action: "click".into(),
            selector: Some(selector.to_string()),
            value: None,
            duration_ms: None,
        }
    }

    pub fn wait(duration_ms: u64) -> Self {
        BrowserRequest::Action {
            cmd: "action",
            action: "wait".into(),
            selector: None,
            value: None,
            duration_ms: Some(duration_ms),
        }
    }

    pub fn scroll_into_view(selector: &str) -> Self {
        BrowserRequest::Action {
            cmd: "action",
            action: "scroll_into_view".into(),
            selector: Some(selector.to_string()),
            value: None,
            duration_ms: None,
        }
    }

    pub fn query_visible(selector: &str) -> Self {
        BrowserRequest::QueryVisible {
            cmd: "query_visible",
            selector: selector.to_string(),
        }
    }

    pub fn query_count(selector: &str) -> Self {
        BrowserRequest::QueryCount {
            cmd: "query_count",
            selector: selector.to_string(),
        }
    }

    pub fn query_text_at(selector: &str, index: usize, child: Option<&str>) -> Self {
        BrowserRequest::QueryText {
            cmd: "query_text",
            selector: selector.to_string(),
            index: Some(index),
            child: child.map(str::to_string),
        }
    }

    pub fn query_attribute(selector: &str, index: usize, child: Option<&str>, attribute: &str) -> Self {
        BrowserRequest::QueryAttribute {
            cmd: "query_attribute",
            selector: selector.to_string(),
            index,
            child: child.map(str::to_string),
            attribute: attribute.to_string(),
        }
    }

    pub fn quit() -> Self {
        BrowserRequest::Quit { cmd: "quit" }
    }
}

/// Response received from browser_server.js over stdout (one JSON line).
#[derive(Debug, Deserialize)]
pub struct BrowserResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub ready: Option<bool>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub value: Option<String>,
}

/// A persistent browser session backed by browser_server.js.
///
/// Launches a long-lived Node.js process that keeps a Chromium browser open.
/// Commands are sent as NDJSON over stdin, responses read from stdout.
pub struct BrowserSession {
    child: Child,
    stdin: std::process::ChildStdin,
    reader: BufReader<std::process::ChildStdout>,
}

impl BrowserSession {
    /// Launch a new browser session by spawning the server script.
    pub fn launch(script: &str) -> Result<Self, AuditError> {
        let mut child = Command::new("node")
            .arg(script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| AuditError::SubprocessSpawn {
                script: script.to_string(),
                source: e,
            })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            AuditError::SessionIO("Failed to capture stdin of browser_server.js".into())
        })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            AuditError::SessionIO("Failed to capture stdout of browser_server.js".into())
        })?;

        let mut reader = BufReader::new(stdout);

        // Wait for the ready signal
        let mut line = String::new();
        reader.read_line(&mut line).map_err(|e| {
            AuditError::SessionIO(format!("Failed to read ready signal: {}", e))
        })?;

        let response: BrowserResponse = serde_json::from_str(line.trim()).map_err(|e| {
            AuditError::JsonParse {
                context: "browser_server.js ready signal".into(),
                source: e,
            }
        })?;

        if !response.ok || response.ready != Some(true) {
            return Err(AuditError::SessionProtocol {
                command: "launch".into(),
                error: "Did not receive ready signal from browser_server.js".into(),
            });
        }

        Ok(BrowserSession {
            child,
            stdin,
            reader,
        })
    }

    /// Send a request and read the response.
    fn send(&mut self, request: &BrowserRequest) -> Result<BrowserResponse, AuditError> {
        let json = serde_json::to_string(request).map_err(|e| AuditError::JsonSerialize {
            context: "BrowserRequest".into(),
            source: e,
        })?;

        writeln!(self.stdin, "{}", json).map_err(|e| {
            AuditError::SessionIO(format!("Failed to write to browser_server.js stdin: {}", e))
        })?;

        self.stdin.flush().map_err(|e| {
            AuditError::SessionIO(format!("Failed to flush browser_server.js stdin: {}", e))
        })?;

        let mut line = String::new();
        self.reader.read_line(&mut line).map_err(|e| {
            AuditError::SessionIO(format!("Failed to read from browser_server.js stdout: {}", e))
        })?;

        if line.trim().is_empty() {
            return Err(AuditError::SessionIO(
                "Empty response from browser_server.js (process may have died)".into(),
            ));
        }

        let response: BrowserResponse =
            serde_json::from_str(line.trim()).map_err(|e| AuditError::JsonParse {
                context: "browser_server.js response".into(),
                source: e,
            })?;

        Ok(response)
    }

    /// Send a request and verify it succeeded.
    fn send_ok(
        &mut self,
        request: &BrowserRequest,
        command_name: &str,
    ) -> Result<BrowserResponse, AuditError> {
        let response = self.send(request)?;
        if !response.ok {
            return Err(AuditError::SessionProtocol {
                command: command_name.into(),
                error: response.error.unwrap_or_else(|| "Unknown error".into()),
            });
        }
        Ok(response)
    }

    /// Navigate to a URL.
    pub fn navigate(&mut self, url: &str) -> Result<(), AuditError> {
        let request = BrowserRequest::navigate(url);
        self.send_ok(&request, "navigate")?;
        Ok(())
    }

    /// Fill an input element located by CSS selector.
    pub fn fill(&mut self, selector: &str, value: &str) -> Result<(), AuditError> {
        let request = BrowserRequest::fill(selector, value);
        self.send_ok(&request, "fill")?;
        Ok(())
    }

    /// Click an element located by CSS selector.
    pub fn click(&mut self, selector: &str) -> Result<(), AuditError> {
        let request = BrowserRequest::click(selector);
        self.send_ok(&request, "click")?;
        Ok(())
    }

    /// Wait for the page to settle.
    pub fn wait_idle(&mut self, ms: u64) -> Result<(), AuditError> {
        let request = BrowserRequest::wait(ms);
        self.send_ok(&request, "wait")?;
        Ok(())
    }

    /// Scroll the first element matching the selector into view.
    pub fn scroll_into_view(&mut self, selector: &str) -> Result<(), AuditError> {
        let request = BrowserRequest::scroll_into_view(selector);
        self.send_ok(&request, "scroll_into_view")?;
        Ok(())
    }

    /// Query whether an element is visible by CSS selector.
    pub fn query_visible(&mut self, selector: &str) -> Result<bool, AuditError> {
        let request = BrowserRequest::query_visible(selector);
        let response = self.send_ok(&request, "query_visible")?;
        Ok(response.visible.unwrap_or(false))
    }

    /// Query the count of elements matching a CSS selector.
    pub fn query_count(&mut self, selector: &str) -> Result<u32, AuditError> {
        let request = BrowserRequest::query_count(selector);
        let response = self.send_ok(&request, "query_count")?;
        Ok(response.count.unwrap_or(0))
    }

    /// Text content of the nth selector match, optionally narrowed to a child
    /// sub-selector. None if the element (or child) is not present.
    pub fn query_text_at(
        &mut self,
        selector: &str,
        index: usize,
        child: Option<&str>,
    ) -> Result<Option<String>, AuditError> {
        let request = BrowserRequest::query_text_at(selector, index, child);
        let response = self.send_ok(&request, "query_text")?;
        Ok(response.text)
    }

    /// Attribute of the nth selector match, optionally narrowed to a child
    /// sub-selector. None if the element or attribute is absent.
    pub fn query_attribute(
        &mut self,
        selector: &str,
        index: usize,
        child: Option<&str>,
        attribute: &str,
    ) -> Result<Option<String>, AuditError> {
        let request = BrowserRequest::query_attribute(selector, index, child, attribute);
        let response = self.send_ok(&request, "query_attribute")?;
        Ok(response.value)
    }

    /// Quit the browser session.
    pub fn quit(&mut self) -> Result<(), AuditError> {
        let request = BrowserRequest::quit();
        // Best-effort quit — don't fail hard if process is already gone
        let _ = self.send(&request);
        let _ = self.child.wait();
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // Best-effort cleanup
        let _ = self.quit();
    }
}
