//! Channel and category references.
//!
//! These are the handles the resolver hands out and every pipeline stage
//! receives. They carry just enough to name files and mention the channel in
//! notifications.

use serde::{Deserialize, Serialize};

/// Platform snowflake identifying a channel or category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChannelId(pub u64);

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A resolved text channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRef {
    pub id: ChannelId,
    pub name: String,
}

impl ChannelRef {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: ChannelId(id),
            name: name.into(),
        }
    }

    /// Platform mention markup, e.g. `<#1234>`.
    pub fn mention(&self) -> String {
        format!("<#{}>", self.id)
    }
}

impl std::fmt::Display for ChannelRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.name)
    }
}

/// A resolved category with its member text channels, in platform order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: ChannelId,
    pub name: String,
    pub text_channels: Vec<ChannelRef>,
}

impl CategoryRef {
    pub fn mention(&self) -> String {
        format!("<#{}>", self.id)
    }
}

impl std::fmt::Display for CategoryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
