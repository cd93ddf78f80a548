//! Student records and their tag sets.

use alloc::string::String;
#[cfg(feature = "serde")]
use alloc::vec::Vec;
use core::fmt;

use smallvec::SmallVec;

/// A student record: identifier (NIM), display name, ranking (GPA) and tags.
///
/// Records are created and owned by a [`Directory`](crate::Directory). The identifier and
/// ranking never change while the record is stored; to change a ranking, delete the record and
/// insert it again.
///
/// # Examples
///
/// ```
/// use student_directory::Directory;
///
/// let mut directory = Directory::new();
/// directory.insert("20231001", "Alice", 3.75);
///
/// let alice = directory.find_by_id("20231001").unwrap();
/// assert_eq!(alice.name(), "Alice");
/// assert_eq!(alice.to_string(), "NIM:20231001 | Name:Alice | IPK:3.75");
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Record {
    id: String,
    name: String,
    ranking: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    tags: Tags,
}

impl Record {
    pub(crate) fn new(id: String, name: String, ranking: f64, tags: Tags) -> Self {
        Self { id, name, ranking, tags }
    }

    /// Returns the unique identifier (NIM).
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the ranking attribute (GPA).
    #[must_use]
    pub fn ranking(&self) -> f64 {
        self.ranking
    }

    /// Returns the record's tags in the order they were added.
    #[must_use]
    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub(crate) fn tags_mut(&mut self) -> &mut Tags {
        &mut self.tags
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NIM:{} | Name:{} | IPK:{:.2}", self.id, self.name, self.ranking)
    }
}

/// An ordered, append-only set of strings.
///
/// Tags keep their insertion order; adding a tag that is already present does nothing.
///
/// # Examples
///
/// ```
/// use student_directory::Tags;
///
/// let mut tags: Tags = ["math", "chess", "math"].into_iter().collect();
/// assert_eq!(tags.as_slice(), ["math", "chess"]);
///
/// assert!(tags.insert("robotics"));
/// assert!(!tags.insert("chess"));
/// assert_eq!(tags.len(), 3);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "Vec<String>", into = "Vec<String>")
)]
pub struct Tags(SmallVec<[String; 2]>);

impl Tags {
    /// Creates an empty tag set.
    #[must_use]
    pub const fn new() -> Self {
        Self(SmallVec::new_const())
    }

    /// Appends `tag` unless it is already present. Returns whether it was added.
    pub fn insert(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        if self.contains(&tag) {
            return false;
        }
        self.0.push(tag);
        true
    }

    /// Returns true if `tag` is present.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    /// Returns the number of tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the tags as a slice, in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Iterates over the tags in insertion order.
    pub fn iter(&self) -> core::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl<S: Into<String>> Extend<S> for Tags {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for tag in iter {
            self.insert(tag);
        }
    }
}

impl<S: Into<String>> FromIterator<S> for Tags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tags = Tags::new();
        tags.extend(iter);
        tags
    }
}

// Deserialized input goes through `insert`, so repeated tags collapse.
#[cfg(feature = "serde")]
impl From<Vec<String>> for Tags {
    fn from(tags: Vec<String>) -> Self {
        tags.into_iter().collect()
    }
}

#[cfg(feature = "serde")]
impl From<Tags> for Vec<String> {
    fn from(tags: Tags) -> Self {
        tags.0.into_vec()
    }
}

impl<'a> IntoIterator for &'a Tags {
    type Item = &'a String;
    type IntoIter = core::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_rounds_ranking() {
        let record = Record::new("1001".to_string(), "A".to_string(), 3.456, Tags::new());
        assert_eq!(record.to_string(), "NIM:1001 | Name:A | IPK:3.46");
    }

    #[test]
    fn tags_suppress_duplicates() {
        let mut tags = Tags::new();
        assert!(tags.is_empty());
        assert!(tags.insert("x"));
        assert!(tags.insert("y"));
        assert!(!tags.insert("x"));
        tags.extend(["z", "y"]);

        let collected: alloc::vec::Vec<&str> = tags.iter().map(String::as_str).collect();
        assert_eq!(collected, ["x", "y", "z"]);
        assert!(tags.contains("z"));
        assert!(!tags.contains("w"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_shape() {
        let record = Record::new("1001".to_string(), "A".to_string(), 3.5, ["x"].into_iter().collect());
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"id":"1001","name":"A","ranking":3.5,"tags":["x"]}"#);

        let back: Record = serde_json::from_str(r#"{"id":"1001","name":"A","ranking":3.5}"#).unwrap();
        assert!(back.tags().is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialized_tags_stay_deduplicated() {
        let tags: Tags = serde_json::from_str(r#"["x","y","x"]"#).unwrap();
        assert_eq!(tags.as_slice(), ["x", "y"]);

        let record: Record =
            serde_json::from_str(r#"{"id":"1001","name":"A","ranking":3.5,"tags":["x","x"]}"#).unwrap();
        assert_eq!(record.tags().as_slice(), ["x"]);
    }
}
