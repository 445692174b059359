//! Spam/ham labels for the training corpus

use crate::tree::MessageTree;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Class label as the downstream classifier expects it
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    #[default]
    Ham,
    Spam,
}

impl Label {
    /// Numeric class: ham is 0, spam is 1
    #[must_use]
    pub const fn as_num(self) -> u8 {
        match self {
            Self::Ham => 0,
            Self::Spam => 1,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ham => "ham",
            Self::Spam => "spam",
        }
    }

    /// Label a message from filter headers added by the receiving server.
    ///
    /// Headers are only consulted when `trust_headers` is set; otherwise
    /// every message gets `default`.
    #[must_use]
    pub fn infer(tree: &MessageTree, default: Self, trust_headers: bool) -> Self {
        if !trust_headers {
            return default;
        }

        let flag = tree
            .headers
            .get("X-Spam-Flag")
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if flag == "yes" || flag == "true" {
            return Self::Spam;
        }

        let status = tree
            .headers
            .get("X-Spam-Status")
            .unwrap_or_default()
            .to_ascii_lowercase();
        if status.starts_with("yes") {
            return Self::Spam;
        }

        default
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ham" => Ok(Self::Ham),
            "spam" => Ok(Self::Spam),
            other => Err(format!("unknown label {other:?}, expected ham or spam")),
        }
    }
}
