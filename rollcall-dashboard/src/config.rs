//! Dashboard configuration types.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rollcall::Scan;
use rollcall_api::{ApiError, RollcallClient};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Who is signed in. Decides the table layout and which endpoints apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Admin,
    Teacher,
    Student,
}

impl Role {
    /// Parse a session role. Anything unrecognized is treated as admin.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "admin" => Self::Admin,
            "teacher" => Self::Teacher,
            "student" => Self::Student,
            other => {
                log::warn!("unknown role {other:?}, using admin layout");
                Self::Admin
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Teacher => "teacher",
            Self::Student => "student",
        }
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Role::from_name).unwrap_or_default())
    }
}

/// Zero-based column positions in the attendance table.
///
/// Columns a role's table does not have are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnIndices {
    #[serde(default)]
    pub class: Option<usize>,
    #[serde(default)]
    pub name: Option<usize>,
    #[serde(default)]
    pub roll_no: Option<usize>,
    pub date: usize,
    pub subject: usize,
    pub day: usize,
    pub status: usize,
}

impl ColumnIndices {
    pub const ADMIN: Self = Self {
        class: Some(0),
        name: Some(1),
        roll_no: Some(2),
        date: 3,
        subject: 4,
        day: 5,
        status: 6,
    };

    pub const TEACHER: Self = Self {
        class: None,
        name: Some(0),
        roll_no: Some(1),
        date: 2,
        subject: 3,
        day: 4,
        status: 5,
    };

    pub const STUDENT: Self = Self {
        class: None,
        name: None,
        roll_no: None,
        date: 0,
        subject: 1,
        day: 2,
        status: 3,
    };

    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Admin => Self::ADMIN,
            Role::Teacher => Self::TEACHER,
            Role::Student => Self::STUDENT,
        }
    }

    /// Rows with fewer cells than this are not attendance rows.
    pub fn min_cells(&self) -> usize {
        self.status + 1
    }
}

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Per-session dashboard configuration.
///
/// Loaded from the session JSON the backend renders into the page, or built
/// in code with the builder methods.
///
/// # Example
///
/// ```ignore
/// let config = DashboardConfig::new(Role::Teacher)
///     .base_url("http://127.0.0.1:5000")
///     .timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub role: Role,
    pub base_url: String,
    /// Request timeout in seconds. No timeout when absent.
    pub timeout_secs: Option<u64>,
    pub session_cookie: Option<String>,
    /// Column layout override. The role's layout is used when absent.
    pub columns: Option<ColumnIndices>,
    /// Containers whose selects keep their native form.
    pub skip_within: Vec<String>,
    /// ID of the attendance table the filters act on.
    pub attendance_table: String,
    /// How long toasts stay visible, in milliseconds.
    pub toast_millis: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            role: Role::Admin,
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: None,
            session_cookie: None,
            columns: None,
            skip_within: vec!["add-class-modal".to_string(), "teacher-panel".to_string()],
            attendance_table: "attendance-table".to_string(),
            toast_millis: 4000,
        }
    }
}

impl DashboardConfig {
    /// Create a config for `role` with default settings.
    pub fn new(role: Role) -> Self {
        Self {
            role,
            ..Default::default()
        }
    }

    /// Parse a session JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a session JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Set the backend URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = Some(timeout.as_secs());
        self
    }

    /// Send this session cookie with every request.
    pub fn session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    /// Override the attendance table layout.
    pub fn columns(mut self, columns: ColumnIndices) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Leave selects inside `id` untransformed.
    pub fn skip_within(mut self, id: impl Into<String>) -> Self {
        self.skip_within.push(id.into());
        self
    }

    /// The attendance table layout in effect.
    pub fn column_indices(&self) -> ColumnIndices {
        self.columns.unwrap_or_else(|| ColumnIndices::for_role(self.role))
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_millis)
    }

    /// Scan options for this session's page.
    pub fn scan(&self) -> Scan {
        self.skip_within
            .iter()
            .fold(Scan::new(), |scan, id| scan.skip_within(id.clone()))
    }

    /// Build the API client for this session.
    pub fn client(&self) -> Result<RollcallClient, ApiError> {
        let mut builder = RollcallClient::builder().url(self.base_url.clone());
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(cookie) = &self.session_cookie {
            builder = builder.session_cookie(cookie.clone());
        }
        builder.build()
    }
}
