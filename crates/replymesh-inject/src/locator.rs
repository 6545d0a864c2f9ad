//! Structural locators.
//!
//! A locator names an element by tag, class, and/or attribute. Feed pages
//! change markup frequently, so everything the engine touches is found
//! through a [`LocatorProfile`] that can be swapped out wholesale when the
//! page structure shifts.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Match condition for one element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    /// Required tag name, lowercase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Required entry in the space-separated `class` attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Required attribute; `None` value means presence is enough.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attr: Option<(String, Option<String>)>,
}

impl Locator {
    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            ..Self::default()
        }
    }

    pub fn class(class: impl Into<String>) -> Self {
        Self {
            class: Some(class.into()),
            ..Self::default()
        }
    }

    pub fn attr(name: impl Into<String>) -> Self {
        Self {
            attr: Some((name.into(), None)),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Whether an element with this tag and attribute set matches.
    pub fn matches(&self, tag: &str, attributes: &HashMap<String, String>) -> bool {
        if let Some(required) = &self.tag {
            if required != tag {
                return false;
            }
        }
        if let Some(required) = &self.class {
            let classes = attributes.get("class").map(String::as_str).unwrap_or("");
            if !classes.split_whitespace().any(|c| c == required) {
                return false;
            }
        }
        if let Some((name, value)) = &self.attr {
            match (attributes.get(name), value) {
                (None, _) => return false,
                (Some(_), None) => {}
                (Some(actual), Some(expected)) => {
                    if actual != expected {
                        return false;
                    }
                }
            }
        }
        true
    }
}

/// Every locator the engine needs, bundled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorProfile {
    /// Where an action control belongs: one control per match.
    pub insertion_point: Locator,
    /// Preferred anchor: an action-area child of the insertion point.
    pub toolbar: Locator,
    /// Fallback anchor: the nearest enclosing form.
    pub form: Locator,
    /// The post wrapping an insertion point.
    pub post_container: Locator,
    /// Post body text, relative to the container.
    pub post_text: Locator,
    /// Post author, relative to the container.
    pub post_author: Locator,
    /// Post date, relative to the container.
    pub post_date: Locator,
    /// The input surface replies are typed into.
    pub reply_input: Locator,
}

impl LocatorProfile {
    /// Locators for the feed markup currently in production.
    pub fn feed_default() -> Self {
        Self {
            insertion_point: Locator::class("comment-box"),
            toolbar: Locator::class("comment-box__actions"),
            form: Locator::tag("form"),
            post_container: Locator::class("feed-item"),
            post_text: Locator::class("feed-item__text"),
            post_author: Locator::class("feed-item__author"),
            post_date: Locator::tag("time"),
            reply_input: Locator::class("comment-box__input"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn tag_match() {
        let locator = Locator::tag("form");
        assert!(locator.matches("form", &attrs(&[])));
        assert!(!locator.matches("div", &attrs(&[])));
    }

    #[test]
    fn class_match_is_token_exact() {
        let locator = Locator::class("comment-box");
        assert!(locator.matches("div", &attrs(&[("class", "feed comment-box open")])));
        assert!(!locator.matches("div", &attrs(&[("class", "comment-box__input")])));
        assert!(!locator.matches("div", &attrs(&[])));
    }

    #[test]
    fn attr_presence_and_value() {
        let present = Locator::attr("data-ready");
        assert!(present.matches("div", &attrs(&[("data-ready", "")])));
        assert!(!present.matches("div", &attrs(&[])));

        let valued = Locator {
            attr: Some(("data-state".to_string(), Some("busy".to_string()))),
            ..Locator::default()
        };
        assert!(valued.matches("div", &attrs(&[("data-state", "busy")])));
        assert!(!valued.matches("div", &attrs(&[("data-state", "idle")])));
    }

    #[test]
    fn combined_conditions_all_apply() {
        let locator = Locator::tag("button").with_class("primary");
        assert!(locator.matches("button", &attrs(&[("class", "primary")])));
        assert!(!locator.matches("button", &attrs(&[("class", "secondary")])));
        assert!(!locator.matches("a", &attrs(&[("class", "primary")])));
    }
}
