use std::fmt;

#[derive(Debug)]
pub enum AuditError {
    /// Node.js subprocess failed to spawn (browser_server.js)
    SubprocessSpawn { script: String, source: std::io::Error },

    /// Reading or writing the browser_server.js pipes failed
    SessionIO(String),

    /// browser_server.js answered a command with ok=false
    SessionProtocol { command: String, error: String },

    /// JSON parsing failed (from subprocess output or serde)
    JsonParse { context: String, source: serde_json::Error },

    /// JSON serialization failed (command to browser_server.js)
    JsonSerialize { context: String, source: serde_json::Error },

    /// Credentials missing or unusable in the config file
    ConfigInvalid(String),

    /// Sign-in rejected (wrong credentials or unusual-activity lock)
    AuthFailed(String),

    /// Sign-in blocked by a challenge this tool cannot solve
    ChallengeUnsupported(String),

    /// Logout flow did not complete
    LogoutFailed(String),

    /// Expected page region absent after navigation
    ElementMissing { element: String, context: String },

    /// A handle was appended twice during one harvest. The windowed list
    /// no longer evicts from the top only, so the result cannot be trusted.
    DuplicateIdentity { handle: String },
}

impl fmt::Display for AuditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditError::SubprocessSpawn { script, source } => {
                write!(f, "Failed to spawn {} (is Node.js installed?): {}", script, source)
            }
            AuditError::SessionIO(msg) => {
                write!(f, "Browser session I/O error: {}", msg)
            }
            AuditError::SessionProtocol { command, error } => {
                write!(f, "Browser command '{}' failed: {}", command, error)
            }
            AuditError::JsonParse { context, source } => {
                write!(f, "JSON parse error ({}): {}", context, source)
            }
            AuditError::JsonSerialize { context, source } => {
                write!(f, "JSON serialize error ({}): {}", context, source)
            }
            AuditError::ConfigInvalid(msg) => {
                write!(f, "Invalid configuration: {}", msg)
            }
            AuditError::AuthFailed(msg) => {
                write!(f, "Sign-in failed: {}", msg)
            }
            AuditError::ChallengeUnsupported(msg) => {
                write!(f, "Sign-in challenge not supported: {}", msg)
            }
            AuditError::LogoutFailed(msg) => {
                write!(f, "Failed to log out: {}", msg)
            }
            AuditError::ElementMissing { element, context } => {
                write!(f, "Element '{}' not found: {}", element, context)
            }
            AuditError::DuplicateIdentity { handle } => {
                write!(
                    f,
                    "Attempted to add an existing user ({}) to the harvested set; \
                     the rendered list violated the seen-prefix assumption and the \
                     results cannot be trusted",
                    handle
                )
            }
        }
    }
}

impl std::error::Error for AuditError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuditError::SubprocessSpawn { source, .. } => Some(source),
            AuditError::JsonParse { source, .. } => Some(source),
            AuditError::JsonSerialize { source, .. } => Some(source),
            _ => None,
        }
    }
}
