//! Runtime configuration for the cart system.

use std::path::PathBuf;

use crate::error::ConfigError;
use crate::notify::NotificationKind;

pub const DEFAULT_API_URL: &str = "http://localhost:3333";
pub const DEFAULT_STORAGE_KEY: &str = "@BinaryShoes:cart";
pub const DEFAULT_MAILBOX_SIZE: usize = 32;

/// User-facing copy for each notification. This is presentation text, so
/// callers are free to swap it out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessages {
    pub out_of_stock: String,
    pub add_failed: String,
    pub remove_failed: String,
    pub update_failed: String,
}

impl Default for NotificationMessages {
    fn default() -> Self {
        Self {
            out_of_stock: "Out of stock".to_string(),
            add_failed: "Error adding product to cart".to_string(),
            remove_failed: "Error removing product from cart".to_string(),
            update_failed: "Error updating product amount".to_string(),
        }
    }
}

impl NotificationMessages {
    pub fn message_for(&self, kind: NotificationKind) -> &str {
        match kind {
            NotificationKind::OutOfStock => &self.out_of_stock,
            NotificationKind::AddFailed => &self.add_failed,
            NotificationKind::RemoveFailed => &self.remove_failed,
            NotificationKind::UpdateFailed => &self.update_failed,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartConfig {
    pub api_base_url: String,
    pub storage_key: String,
    /// Directory for durable cart files. `None` keeps the cart in memory.
    pub storage_dir: Option<PathBuf>,
    pub mailbox_size: usize,
    pub messages: NotificationMessages,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            storage_dir: None,
            mailbox_size: DEFAULT_MAILBOX_SIZE,
            messages: NotificationMessages::default(),
        }
    }
}

impl CartConfig {
    /// Reads `CART_API_URL`, `CART_STORAGE_DIR`, `CART_STORAGE_KEY` and
    /// `CART_MAILBOX_SIZE`, falling back to defaults for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup("CART_API_URL") {
            config.api_base_url = url;
        }
        if let Some(dir) = lookup("CART_STORAGE_DIR").filter(|dir| !dir.is_empty()) {
            config.storage_dir = Some(PathBuf::from(dir));
        }
        if let Some(key) = lookup("CART_STORAGE_KEY").filter(|key| !key.is_empty()) {
            config.storage_key = key;
        }
        if let Some(raw) = lookup("CART_MAILBOX_SIZE") {
            config.mailbox_size = raw
                .parse::<usize>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or(ConfigError::InvalidValue {
                    var: "CART_MAILBOX_SIZE",
                    value: raw,
                })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_messages(mut self, messages: NotificationMessages) -> Self {
        self.messages = messages;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: self.api_base_url.clone(),
            reason,
        };
        let url = reqwest::Url::parse(&self.api_base_url).map_err(|e| invalid(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(invalid(format!("unsupported scheme {other}"))),
        }
    }
}
