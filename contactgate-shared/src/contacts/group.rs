/// Grouping of contact rows by one field
///
/// Buckets appear in the order their key is first seen in the input and keep
/// their rows in input order. Keys are compared verbatim: `"Google"` and
/// `"google"` are different buckets, and rows with an empty key share the
/// `""` bucket. Nothing is sorted, filtered or deduplicated.
///
/// # Example
///
/// ```
/// use contactgate_shared::contacts::group::{group, ContactField};
/// use contactgate_shared::contacts::ingest::ContactRow;
///
/// let row = |source: &str, email: &str| ContactRow {
///     source: source.to_string(),
///     email: email.to_string(),
///     ..Default::default()
/// };
///
/// let grouped = group(
///     vec![row("A", "a@x.com"), row("B", "b@x.com"), row("A", "a2@x.com")],
///     ContactField::Source,
/// );
///
/// let keys: Vec<&str> = grouped.iter().map(|g| g.key.as_str()).collect();
/// assert_eq!(keys, vec!["A", "B"]);
/// assert_eq!(grouped.get("A").unwrap().len(), 2);
/// ```

use serde::{Serialize, Serializer};
use std::collections::HashMap;

use super::ingest::ContactRow;

/// Field of a [`ContactRow`] that can serve as grouping key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ContactField {
    /// `Fonte`
    #[default]
    Source,

    /// `Nome Sito`
    SiteName,

    /// `Email`
    Email,

    /// `Telefono`
    Phone,
}

impl ContactRow {
    /// Value of `field` in this row
    pub fn field(&self, field: ContactField) -> &str {
        match field {
            ContactField::Source => &self.source,
            ContactField::SiteName => &self.site_name,
            ContactField::Email => &self.email,
            ContactField::Phone => &self.phone,
        }
    }
}

/// One bucket: every row sharing `key`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactGroup {
    /// Shared field value
    pub key: String,

    /// Rows in input order
    pub rows: Vec<ContactRow>,
}

/// Rows partitioned by a key field, in first-seen key order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedContacts {
    groups: Vec<ContactGroup>,
    index: HashMap<String, usize>,
}

impl GroupedContacts {
    /// Number of buckets
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True when there are no rows at all
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Sum of all bucket sizes
    pub fn total_rows(&self) -> usize {
        self.groups.iter().map(|g| g.rows.len()).sum()
    }

    /// Rows of the bucket for `key`, if any row had that value
    pub fn get(&self, key: &str) -> Option<&[ContactRow]> {
        self.index.get(key).map(|&i| self.groups[i].rows.as_slice())
    }

    /// Buckets in first-seen order
    pub fn iter(&self) -> std::slice::Iter<'_, ContactGroup> {
        self.groups.iter()
    }

    fn push(&mut self, key: &str, row: ContactRow) {
        match self.index.get(key) {
            Some(&i) => self.groups[i].rows.push(row),
            None => {
                self.index.insert(key.to_string(), self.groups.len());
                self.groups.push(ContactGroup {
                    key: key.to_string(),
                    rows: vec![row],
                });
            }
        }
    }
}

impl<'a> IntoIterator for &'a GroupedContacts {
    type Item = &'a ContactGroup;
    type IntoIter = std::slice::Iter<'a, ContactGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Serialized as an ordered list of buckets so templates keep the order
impl Serialize for GroupedContacts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.groups.iter())
    }
}

/// Partitions `rows` by the value of `key` in a single pass
pub fn group(rows: impl IntoIterator<Item = ContactRow>, key: ContactField) -> GroupedContacts {
    let mut grouped = GroupedContacts::default();

    for row in rows {
        let value = row.field(key).to_string();
        grouped.push(&value, row);
    }

    grouped
}
