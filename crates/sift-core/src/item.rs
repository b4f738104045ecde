use serde::{Deserialize, Serialize};

/// A piece of content offered to the user for a keep/discard decision.
///
/// The engine only cares about `id`; the remaining fields are carried through
/// to the renderer and the caller's callbacks untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub external: Option<ExternalSource>,
}

/// Marker for items that live outside the platform (e.g. a linked article).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalSource {
    pub url: String,
    /// Hint for how many reward points a decision on this item is worth.
    /// Display-only; the remote side computes the real value.
    #[serde(default)]
    pub reward_weight: Option<f64>,
}

impl ContentItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            excerpt: String::new(),
            category: String::new(),
            cover_url: None,
            external: None,
        }
    }

    pub fn with_external(mut self, url: impl Into<String>, reward_weight: Option<f64>) -> Self {
        self.external = Some(ExternalSource {
            url: url.into(),
            reward_weight,
        });
        self
    }

    pub fn is_external(&self) -> bool {
        self.external.is_some()
    }

    /// Where "open full content" should take the user.
    pub fn open_target(&self) -> OpenTarget {
        match &self.external {
            Some(source) => OpenTarget::External {
                url: source.url.clone(),
            },
            None => OpenTarget::Inline,
        }
    }
}

/// What the caller should do when the user asks to view an item in full.
///
/// The engine never opens anything itself; it only signals intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenTarget {
    /// Show the item inside the host surface.
    Inline,
    /// Hand the URL to the platform's link opener.
    External { url: String },
}
