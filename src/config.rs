//! Settings types for station-link
//!
//! These mirror what the host application persists: how to reach the server,
//! which credentials to use, which notifications to raise and how bulk
//! actions pick their targets.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// How the client reaches and authenticates against the server
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConnectionType {
    /// Username and password against a direct address
    #[default]
    Basic,
    /// Username and password through the relay address (`<id>.quickconnect.to`)
    QuickConnect,
    /// Username, password and a one-time code or remembered device token
    TwoFactor,
}

/// URL scheme used to reach the server
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Plain HTTP
    Http,
    /// HTTPS
    #[default]
    Https,
}

impl Protocol {
    fn scheme(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }
}

/// Credentials for a single login attempt
///
/// Never persisted by this crate; the store owns persistence of the
/// connection settings they are projected from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account name
    #[serde(default)]
    pub username: Option<String>,
    /// Account password
    #[serde(default)]
    pub password: Option<String>,
    /// Connection type
    #[serde(default, rename = "type")]
    pub connection_type: ConnectionType,
    /// One-time code for two-factor logins
    #[serde(default)]
    pub otp_code: Option<String>,
    /// Ask the server to remember this device
    #[serde(default)]
    pub enable_device_token: bool,
    /// Name under which the device is remembered
    #[serde(default)]
    pub device_name: Option<String>,
    /// Device token returned by a previous enrollment
    #[serde(default)]
    pub device_id: Option<String>,
    /// Auth API version to request (server default when unset)
    #[serde(default)]
    pub auth_version: Option<u32>,
}

/// Connection settings (address, credentials, login behavior)
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionSettings {
    /// Connection type
    #[serde(default, rename = "type")]
    pub connection_type: ConnectionType,
    /// URL scheme (default: https)
    #[serde(default)]
    pub protocol: Protocol,
    /// Host name, address or relay id
    #[serde(default)]
    pub path: Option<String>,
    /// Port (default: 5001)
    #[serde(default = "default_port")]
    pub port: Option<u16>,
    /// Account name
    #[serde(default)]
    pub username: Option<String>,
    /// Account password
    #[serde(default)]
    pub password: Option<String>,
    /// Keep credentials between sessions
    #[serde(default)]
    pub remember_me: bool,
    /// Log in automatically when the service starts
    #[serde(default)]
    pub auto_login: bool,
    /// One-time code for two-factor logins
    #[serde(default, rename = "otp_code")]
    pub otp_code: Option<String>,
    /// Ask the server to remember this device
    #[serde(default, rename = "enable_device_token")]
    pub enable_device_token: bool,
    /// Name under which the device is remembered
    #[serde(default, rename = "device_name")]
    pub device_name: Option<String>,
    /// Device token returned by a previous enrollment
    #[serde(default, rename = "device_id")]
    pub device_id: Option<String>,
    /// Auth API version to request
    #[serde(default)]
    pub auth_version: Option<u32>,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            connection_type: ConnectionType::default(),
            protocol: Protocol::default(),
            path: None,
            port: default_port(),
            username: None,
            password: None,
            remember_me: false,
            auto_login: false,
            otp_code: None,
            enable_device_token: false,
            device_name: None,
            device_id: None,
            auth_version: None,
        }
    }
}

impl ConnectionSettings {
    /// Base URL derived from protocol, path and port
    ///
    /// Empty when any of the three is missing or the result does not parse.
    /// Relay connections ignore the port and resolve through the relay domain.
    pub fn url(&self) -> String {
        let (Some(path), Some(port)) = (self.path.as_deref(), self.port) else {
            return String::new();
        };
        if path.is_empty() {
            return String::new();
        }

        let raw = match self.connection_type {
            ConnectionType::QuickConnect => {
                format!("{}://{}.quickconnect.to", self.protocol.scheme(), path)
            }
            _ => format!("{}://{}:{}", self.protocol.scheme(), path, port),
        };

        match url::Url::parse(&raw) {
            Ok(url) => url.to_string(),
            Err(e) => {
                tracing::debug!(url = %raw, error = %e, "Connection settings do not form a valid url");
                String::new()
            }
        }
    }

    /// Credentials projected from these settings
    pub fn credentials(&self) -> Credentials {
        Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
            connection_type: self.connection_type,
            otp_code: self.otp_code.clone(),
            enable_device_token: self.enable_device_token,
            device_name: self.device_name.clone(),
            device_id: self.device_id.clone(),
            auth_version: self.auth_version,
        }
    }
}

/// Which task status transitions raise a banner notification
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct BannerScope {
    /// Notify when a task finishes (default: true)
    #[serde(default = "default_true")]
    pub finished: bool,
    /// Notify when a task fails (default: true)
    #[serde(default = "default_true")]
    pub failed: bool,
}

impl Default for BannerScope {
    fn default() -> Self {
        Self {
            finished: true,
            failed: true,
        }
    }
}

/// Notification settings
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct NotificationSettings {
    /// Banner notifications for background status transitions
    #[serde(default)]
    pub banner: BannerScope,
}

/// Which tasks a bulk action targets when no explicit id set is given
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionScope {
    /// Every task known to the store
    #[default]
    All,
    /// Only tasks matching the store's current status filter
    Visible,
}

/// Application-wide behavior
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Bulk action scope
    #[serde(default)]
    pub actions: ActionScope,
}

/// A preconfigured destination offered when creating a task from a context action
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickMenu {
    /// Entry ID
    pub id: String,
    /// Label shown to the user
    pub title: String,
    /// Icon name
    #[serde(default)]
    pub icon: Option<String>,
    /// Destination folder on the server
    #[serde(default)]
    pub destination: Option<String>,
    /// Open the task dialog for confirmation instead of creating directly
    #[serde(default)]
    pub modal: bool,
}

/// All settings read by the service
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    /// Connection settings
    #[serde(default)]
    pub connection: ConnectionSettings,
    /// Notification settings
    #[serde(default)]
    pub notifications: NotificationSettings,
    /// Application-wide behavior
    #[serde(default)]
    pub global: GlobalSettings,
    /// Quick menu entries
    #[serde(default, rename = "quick")]
    pub quick_menus: Vec<QuickMenu>,
    /// Maximum number of remembered destinations (default: 10)
    #[serde(default = "default_destination_history_limit")]
    pub destination_history_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            connection: ConnectionSettings::default(),
            notifications: NotificationSettings::default(),
            global: GlobalSettings::default(),
            quick_menus: Vec::new(),
            destination_history_limit: default_destination_history_limit(),
        }
    }
}

impl Settings {
    /// Parse settings from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("failed to read settings file '{}': {}", path.display(), e),
            key: None,
        })?;
        Self::from_json_str(&content)
    }

    /// Write settings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Options for the service itself (not persisted by the host)
#[derive(Clone, Debug)]
pub struct ServiceOptions {
    /// Capacity of the event broadcast channel (default: 256)
    pub event_capacity: usize,
    /// Ask the transport to bypass the relay for login and info calls (default: true)
    pub skip_relay: bool,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            event_capacity: 256,
            skip_relay: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_port() -> Option<u16> {
    Some(5001)
}

fn default_destination_history_limit() -> usize {
    10
}
