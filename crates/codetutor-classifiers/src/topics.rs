//! Topic registry
//!
//! The closed set of subject tags the inference service may assign to a
//! query. The registry is versioned: each version is a fixed, ordered list,
//! selected once at startup and shared read-only afterwards.

use codetutor_core::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Wire value of the escape tag
pub const UNKNOWN_TOPIC: &str = "unknown";

/// Registry version used when none is configured
pub const DEFAULT_REGISTRY_VERSION: u32 = 2;

const V1_TOPICS: &[&str] = &[
    "recursion",
    "dynamic programming",
    "graphs",
    "linked lists",
    "arrays",
    "binary trees",
    "sorting",
    "searching",
    "hashmaps",
    "stacks",
    "queues",
    "greedy algorithms",
    "python syntax",
    "loops",
    "functions",
    "OOP",
];

// v2 widens the tutor to the math side of the product.
const V2_ADDED_TOPICS: &[&str] = &["math", "combinatorics"];

/// A subject tag: a registry member or the `unknown` escape value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TopicTag {
    /// A named topic (membership is checked against a registry, not here)
    Known(String),
    /// The query is on-topic but matches no registry entry
    Unknown,
}

impl TopicTag {
    /// Build a tag from its wire string
    pub fn parse(value: &str) -> Self {
        if value == UNKNOWN_TOPIC {
            Self::Unknown
        } else {
            Self::Known(value.to_string())
        }
    }

    /// Wire string for this tag
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(name) => name,
            Self::Unknown => UNKNOWN_TOPIC,
        }
    }
}

impl fmt::Display for TopicTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TopicTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TopicTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse(&value))
    }
}

/// Versioned, ordered set of recognized topics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicRegistry {
    version: u32,
    topics: Vec<String>,
}

impl TopicRegistry {
    /// Original topic set
    pub fn v1() -> Self {
        Self {
            version: 1,
            topics: V1_TOPICS.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Current topic set: v1 plus math topics
    pub fn v2() -> Self {
        Self {
            version: 2,
            topics: V1_TOPICS
                .iter()
                .chain(V2_ADDED_TOPICS)
                .map(|t| t.to_string())
                .collect(),
        }
    }

    /// Look up a registry by version number
    pub fn for_version(version: u32) -> Result<Self> {
        match version {
            1 => Ok(Self::v1()),
            2 => Ok(Self::v2()),
            other => Err(Error::config(format!(
                "Unknown topic registry version {} (supported: 1, 2)",
                other
            ))),
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Topics in registry order, without the escape value
    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Whether `name` is a registry member (exact match)
    pub fn contains(&self, name: &str) -> bool {
        self.topics.iter().any(|t| t == name)
    }

    /// Whether `tag` is acceptable under this registry
    pub fn accepts(&self, tag: &TopicTag) -> bool {
        match tag {
            TopicTag::Known(name) => self.contains(name),
            TopicTag::Unknown => true,
        }
    }

    /// Carry a tag produced under another registry version into this one.
    ///
    /// Tags that are no longer members map to [`TopicTag::Unknown`].
    pub fn migrate(&self, tag: &TopicTag) -> TopicTag {
        if self.accepts(tag) {
            tag.clone()
        } else {
            TopicTag::Unknown
        }
    }
}

impl Default for TopicRegistry {
    fn default() -> Self {
        Self::v2()
    }
}
