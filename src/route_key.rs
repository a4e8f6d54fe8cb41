//! Route-relation identity derived from feature tags.
//!
//! Map features carry the tags of every route relation they belong to,
//! flattened into indexed names (`route_hiking_1_ref`, `route_bicycle_2`).
//! This module recovers one [`RouteKey`] per (type, index) pair so that
//! overlapping relations on a single physical way stay distinguishable.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Separator between a normalized tag name and its value inside a key set.
pub const ROUTE_KEY_VALUE_SEPARATOR: &str = "__";

/// Kinds of route relations understood by the stitcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RouteType {
    Hiking,
    Bicycle,
    Mtb,
    Horse,
}

impl RouteType {
    /// All route types, in tag-scan order.
    pub const ALL: [RouteType; 4] = [
        RouteType::Hiking,
        RouteType::Bicycle,
        RouteType::Mtb,
        RouteType::Horse,
    ];

    /// Tag-name prefix carried by flattened relation tags of this type.
    pub fn tag_prefix(&self) -> &'static str {
        match self {
            RouteType::Hiking => "route_hiking_",
            RouteType::Bicycle => "route_bicycle_",
            RouteType::Mtb => "route_mtb_",
            RouteType::Horse => "route_horse_",
        }
    }
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RouteType::Hiking => "hiking",
            RouteType::Bicycle => "bicycle",
            RouteType::Mtb => "mtb",
            RouteType::Horse => "horse",
        };
        f.write_str(name)
    }
}

/// Identity of one concrete route-relation instance.
///
/// Equality and hashing cover the full (type, tag set) pair. The set holds
/// sorted, deduplicated normalized tag tokens, so two equivalent tag
/// encodings collapse to the same key. The set never mutates after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteKey {
    route_type: RouteType,
    tags: BTreeSet<String>,
}

impl RouteKey {
    /// Build a key from a route type and normalized tag tokens.
    pub fn new(route_type: RouteType, tags: impl IntoIterator<Item = String>) -> Self {
        Self {
            route_type,
            tags: tags.into_iter().collect(),
        }
    }

    /// The relation type of this key.
    pub fn route_type(&self) -> RouteType {
        self.route_type
    }

    /// The normalized tag tokens identifying this relation.
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Derive every route key encoded on one feature's merged tag map.
    ///
    /// For each route type, the route *quantity* is the maximum integer `N`
    /// over tag names equal to exactly `<prefix>N`. One key is emitted per
    /// index `1..=quantity`, collecting every tag whose name starts with
    /// `<prefix><index>`, rewritten back to the bare type prefix. Tags with
    /// a value contribute `name__value`, empty-valued tags just `name`.
    /// Indices without tags of their own still emit an (empty) key.
    ///
    /// # Example
    /// ```
    /// use std::collections::BTreeMap;
    /// use routestitch::{RouteKey, RouteType};
    ///
    /// let mut tags = BTreeMap::new();
    /// tags.insert("route_hiking_1".to_string(), String::new());
    /// tags.insert("route_hiking_1_ref".to_string(), "A1".to_string());
    ///
    /// let keys = RouteKey::from_tags(&tags);
    /// assert_eq!(keys.len(), 1);
    /// assert_eq!(keys[0].route_type(), RouteType::Hiking);
    /// assert!(keys[0].tags().contains("route_hiking_ref__A1"));
    /// ```
    pub fn from_tags(tags: &BTreeMap<String, String>) -> Vec<RouteKey> {
        let mut keys = Vec::new();
        for route_type in RouteType::ALL {
            let quantity = route_quantity(tags, route_type);
            for index in 1..=quantity {
                let indexed_prefix = format!("{}{}", route_type.tag_prefix(), index);
                let mut set = BTreeSet::new();
                for (name, value) in tags {
                    if let Some(rest) = name.strip_prefix(&indexed_prefix) {
                        let rest = rest.strip_prefix('_').unwrap_or(rest);
                        let normalized = format!("{}{}", route_type.tag_prefix(), rest);
                        if value.is_empty() {
                            set.insert(normalized);
                        } else {
                            set.insert(format!(
                                "{normalized}{ROUTE_KEY_VALUE_SEPARATOR}{value}"
                            ));
                        }
                    }
                }
                keys.push(RouteKey {
                    route_type,
                    tags: set,
                });
            }
        }
        keys
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "route[{}", self.route_type)?;
        for tag in &self.tags {
            write!(f, " {tag}")?;
        }
        f.write_str("]")
    }
}

/// Highest relation index seen across all tags of `route_type`.
///
/// A tag contributes its leading integer after the type prefix when that
/// integer is followed by `_` or nothing (`route_hiking_2`,
/// `route_hiking_2_ref`); the quantity is the maximum such index, so keys
/// exist even for indices without tags of their own.
fn route_quantity(tags: &BTreeMap<String, String>, route_type: RouteType) -> u32 {
    let mut quantity = 0;
    for name in tags.keys() {
        if let Some(rest) = name.strip_prefix(route_type.tag_prefix()) {
            let digits: &str = &rest[..rest.bytes().take_while(u8::is_ascii_digit).count()];
            if digits.is_empty() {
                continue;
            }
            let after = &rest[digits.len()..];
            if !after.is_empty() && !after.starts_with('_') {
                continue;
            }
            if let Ok(num) = digits.parse::<u32>() {
                quantity = quantity.max(num);
            }
        }
    }
    quantity
}
