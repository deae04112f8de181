//! Error types for release-rail with contextual messages and exit codes
//!
//! A single error type categorizes failures and carries an optional hint
//! for the operator. The category decides the process exit code.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for release-rail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, malformed manifests)
  User = 1,
  /// System error (git, network, I/O)
  System = 2,
  /// Validation failure (dependency cycles under strict policy)
  Validation = 3,
  /// A package release failed
  Release = 4,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for release-rail
#[derive(Debug)]
pub enum RailError {
  /// Configuration errors
  Config(ConfigError),

  /// Git operation errors
  Git(GitError),

  /// Package manifest errors
  Manifest(ManifestError),

  /// Release execution errors
  Release(ReleaseError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl RailError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    RailError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    RailError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      RailError::Message { message, context, help } => RailError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      RailError::Io(e) => RailError::Message {
        message: format!("{}: {}", ctx_str, e),
        context: None,
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      RailError::Config(ConfigError::DependencyCycle { .. }) => ExitCode::Validation,
      RailError::Config(_) => ExitCode::User,
      RailError::Git(_) => ExitCode::System,
      RailError::Manifest(_) => ExitCode::User,
      RailError::Release(_) => ExitCode::Release,
      RailError::Io(_) => ExitCode::System,
      RailError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      RailError::Config(e) => e.help_message(),
      RailError::Git(e) => e.help_message(),
      RailError::Manifest(e) => e.help_message(),
      RailError::Release(e) => e.help_message(),
      RailError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for RailError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RailError::Config(e) => write!(f, "{}", e),
      RailError::Git(e) => write!(f, "{}", e),
      RailError::Manifest(e) => write!(f, "{}", e),
      RailError::Release(e) => write!(f, "{}", e),
      RailError::Io(e) => write!(f, "I/O error: {}", e),
      RailError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for RailError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      RailError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for RailError {
  fn from(err: io::Error) -> Self {
    RailError::Io(err)
  }
}

impl From<String> for RailError {
  fn from(msg: String) -> Self {
    RailError::message(msg)
  }
}

impl From<&str> for RailError {
  fn from(msg: &str) -> Self {
    RailError::message(msg)
  }
}

impl From<toml_edit::de::Error> for RailError {
  fn from(err: toml_edit::de::Error) -> Self {
    RailError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for RailError {
  fn from(err: serde_json::Error) -> Self {
    RailError::message(format!("JSON error: {}", err))
  }
}

impl From<reqwest::Error> for RailError {
  fn from(err: reqwest::Error) -> Self {
    RailError::message(format!("Registry request failed: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// A field holds a value that cannot be used
  InvalidField { field: String, reason: String },

  /// The repository root has no usable package.json
  RootManifestMissing { root: PathBuf },

  /// Dependency cycle found while `fail_on_cycle` is set
  DependencyCycle { cycles: Vec<String> },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::InvalidField { field, .. } => Some(format!("Fix `{}` in rail.toml.", field)),
      ConfigError::RootManifestMissing { .. } => {
        Some("The release tag is named after the root package.json; add `name` and `version` to it.".to_string())
      }
      ConfigError::DependencyCycle { .. } => Some(
        "Break the circular dependency between local packages, or set `release.fail_on_cycle = false`.".to_string(),
      ),
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::InvalidField { field, reason } => {
        write!(f, "Invalid config value for '{}': {}", field, reason)
      }
      ConfigError::RootManifestMissing { root } => {
        write!(
          f,
          "Root package.json is missing or has no name/version.\nExpected file: {}/package.json",
          root.display()
        )
      }
      ConfigError::DependencyCycle { cycles } => {
        write!(f, "Circular dependencies between local packages:")?;
        for cycle in cycles {
          write!(f, "\n  {}", cycle)?;
        }
        Ok(())
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },

  /// Push failed
  PushFailed { remote: String, reason: String },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::PushFailed { reason, .. } => {
        if reason.contains("non-fast-forward") || reason.contains("fetch first") {
          Some(
            "The remote has commits you don't have. Pull, then push the local release commit and tag by hand."
              .to_string(),
          )
        } else if reason.contains("permission denied") || reason.contains("403") {
          Some("Check your credentials for the remote.".to_string())
        } else {
          Some("The release commit and tag exist locally; push them once the remote is reachable.".to_string())
        }
      }
      GitError::RepoNotFound { path } => Some(format!(
        "Run release-rail from inside a git repository: {}",
        path.display()
      )),
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
      GitError::PushFailed { remote, reason } => {
        write!(f, "Push to {} failed: {}", remote, reason)
      }
    }
  }
}

/// Package manifest errors
#[derive(Debug)]
pub enum ManifestError {
  /// package.json exists but is not valid JSON of the expected shape
  Parse { path: PathBuf, reason: String },
}

impl ManifestError {
  fn help_message(&self) -> Option<String> {
    match self {
      ManifestError::Parse { .. } => Some("Fix the JSON syntax or remove the package directory.".to_string()),
    }
  }
}

impl fmt::Display for ManifestError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ManifestError::Parse { path, reason } => {
        write!(f, "Failed to parse {}: {}", path.display(), reason)
      }
    }
  }
}

/// Release execution errors
#[derive(Debug)]
pub enum ReleaseError {
  /// The external publish step failed for a package
  PackageFailed { package: String, reason: String },

  /// The publish command could not be started at all
  Spawn { program: String, reason: String },

  /// A run stopped at `package`; `released` were published before it
  RunHalted {
    package: String,
    reason: String,
    released: Vec<String>,
  },
}

impl ReleaseError {
  fn help_message(&self) -> Option<String> {
    match self {
      ReleaseError::PackageFailed { .. } => Some(
        "Packages released before the failure stay released. Fix the cause and re-run; unchanged packages are skipped."
          .to_string(),
      ),
      ReleaseError::Spawn { program, .. } => Some(format!(
        "Check that `{}` is installed and on PATH, or change `release.command` in rail.toml.",
        program
      )),
      ReleaseError::RunHalted { released, .. } if released.is_empty() => {
        Some("Nothing was published. Fix the cause and re-run.".to_string())
      }
      ReleaseError::RunHalted { released, .. } => Some(format!(
        "Already published and left in place: {}. No release tag was created; re-run after fixing the cause.",
        released.join(", ")
      )),
    }
  }
}

impl fmt::Display for ReleaseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseError::PackageFailed { package, reason } => {
        write!(f, "Release of '{}' failed: {}", package, reason)
      }
      ReleaseError::Spawn { program, reason } => {
        write!(f, "Failed to run '{}': {}", program, reason)
      }
      ReleaseError::RunHalted { package, reason, .. } => {
        write!(f, "Release stopped at '{}':\n{}", package, reason)
      }
    }
  }
}

/// Result type alias for release-rail
pub type RailResult<T> = Result<T, RailError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> RailResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> RailResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<RailError>,
{
  fn context(self, ctx: impl Into<String>) -> RailResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> RailResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &RailError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
