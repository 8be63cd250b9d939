//! In-memory roster of student records.
//!
//! The roster is an ordered collection: insertion order is the default display
//! order and the starting point for the two stable sorts. Lookups are linear
//! scans with exact, byte-wise matching.
//!
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use tracing::{debug, info, warn};

use crate::error::RosterError;

/// Maximum byte length of a student ID.
pub const MAX_ID_LEN: usize = 29;
/// Maximum byte length of a student name.
pub const MAX_NAME_LEN: usize = 99;
/// Maximum byte length of a student account.
pub const MAX_ACCOUNT_LEN: usize = 29;

const SEPARATOR: &str = "---------------------------------------";

/// A single student entry.
#[derive(Clone, Debug, PartialEq)]
pub struct StudentRecord {
    pub id: String,
    pub name: String,
    pub account: String,
    pub average_score: f32,
}

impl StudentRecord {
    /// Build a record, rejecting empty or over-long text fields.
    ///
    /// The score range is not checked here; see [`crate::input::parse_score`].
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        account: impl Into<String>,
        average_score: f32,
    ) -> Result<Self, RosterError> {
        let id = checked_field("ID", id.into(), MAX_ID_LEN)?;
        let name = checked_field("Name", name.into(), MAX_NAME_LEN)?;
        let account = checked_field("Account", account.into(), MAX_ACCOUNT_LEN)?;
        Ok(Self {
            id,
            name,
            account,
            average_score,
        })
    }
}

fn checked_field(field: &'static str, value: String, max: usize) -> Result<String, RosterError> {
    check_text(field, &value, max)?;
    Ok(value)
}

/// Check a text field is non-empty and at most `max` bytes long.
pub fn check_text(field: &'static str, value: &str, max: usize) -> Result<(), RosterError> {
    if value.is_empty() {
        return Err(RosterError::EmptyField { field });
    }
    if value.len() > max {
        return Err(RosterError::FieldTooLong {
            field,
            max,
            len: value.len(),
        });
    }
    Ok(())
}

impl Display for StudentRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{SEPARATOR}")?;
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Account: {}", self.account)?;
        writeln!(f, "Average score: {:.2}", self.average_score)?;
        write!(f, "{SEPARATOR}")
    }
}

/// Orderings offered by the sort menu.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SortKey {
    /// Average score, highest first.
    Score,
    /// Name, byte-wise ascending.
    Name,
}

/// Record fields that can be searched.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SearchField {
    Id,
    Name,
    Account,
}

impl SearchField {
    pub fn label(self) -> &'static str {
        match self {
            SearchField::Id => "ID",
            SearchField::Name => "name",
            SearchField::Account => "account",
        }
    }

    fn value_of(self, record: &StudentRecord) -> &str {
        match self {
            SearchField::Id => &record.id,
            SearchField::Name => &record.name,
            SearchField::Account => &record.account,
        }
    }
}

/// Ordered collection of student records, unique by `id` and by `account`.
#[derive(Clone, Debug, Default)]
pub struct Roster {
    students: Vec<StudentRecord>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every record. Returns how many were discarded.
    pub fn reset(&mut self) -> usize {
        let dropped = self.students.len();
        self.students.clear();
        info!(dropped, "roster reset");
        dropped
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StudentRecord> {
        self.students.get(index)
    }

    /// Records in current order.
    pub fn iter(&self) -> std::slice::Iter<'_, StudentRecord> {
        self.students.iter()
    }

    pub fn exists_id(&self, id: &str) -> bool {
        self.exists(SearchField::Id, id)
    }

    pub fn exists_name(&self, name: &str) -> bool {
        self.exists(SearchField::Name, name)
    }

    pub fn exists_account(&self, account: &str) -> bool {
        self.exists(SearchField::Account, account)
    }

    pub fn exists(&self, field: SearchField, query: &str) -> bool {
        self.students.iter().any(|s| field.value_of(s) == query)
    }

    /// Append a record at the end.
    ///
    /// Duplicate IDs or accounts are rejected and leave the roster untouched.
    pub fn insert(&mut self, record: StudentRecord) -> Result<(), RosterError> {
        if self.exists_id(&record.id) {
            warn!(id = %record.id, "rejected insert: duplicate id");
            return Err(RosterError::DuplicateId(record.id));
        }
        if self.exists_account(&record.account) {
            warn!(account = %record.account, "rejected insert: duplicate account");
            return Err(RosterError::DuplicateAccount(record.account));
        }
        info!(id = %record.id, account = %record.account, "student added");
        self.students.push(record);
        Ok(())
    }

    /// Remove the first record with this `id`. `None` when absent; nothing changes then.
    pub fn delete(&mut self, id: &str) -> Option<StudentRecord> {
        let Some(pos) = self.students.iter().position(|s| s.id == id) else {
            debug!(id, "delete: id not found");
            return None;
        };
        let removed = self.students.remove(pos);
        info!(id, remaining = self.students.len(), "student deleted");
        Some(removed)
    }

    /// Stable sort, highest average score first. `-0.0` and `0.0` tie.
    pub fn sort_by_score_desc(&mut self) {
        self.students.sort_by(|a, b| {
            b.average_score
                .partial_cmp(&a.average_score)
                .unwrap_or(Ordering::Equal)
        });
        info!(len = self.students.len(), "sorted by score (descending)");
    }

    /// Stable sort, names in byte-wise ascending order.
    pub fn sort_by_name_asc(&mut self) {
        self.students
            .sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
        info!(len = self.students.len(), "sorted by name (ascending)");
    }

    pub fn sort_by(&mut self, key: SortKey) {
        match key {
            SortKey::Score => self.sort_by_score_desc(),
            SortKey::Name => self.sort_by_name_asc(),
        }
    }

    pub fn find_by_id(&self, id: &str) -> Vec<&StudentRecord> {
        self.find(SearchField::Id, id)
    }

    pub fn find_by_name(&self, name: &str) -> Vec<&StudentRecord> {
        self.find(SearchField::Name, name)
    }

    pub fn find_by_account(&self, account: &str) -> Vec<&StudentRecord> {
        self.find(SearchField::Account, account)
    }

    /// Every record whose `field` equals `query`, in current order.
    pub fn find(&self, field: SearchField, query: &str) -> Vec<&StudentRecord> {
        let hits: Vec<&StudentRecord> = self
            .students
            .iter()
            .filter(|s| field.value_of(s) == query)
            .collect();
        debug!(field = field.label(), query, hits = hits.len(), "roster lookup");
        hits
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a StudentRecord;
    type IntoIter = std::slice::Iter<'a, StudentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, name: &str, account: &str, score: f32) -> StudentRecord {
        StudentRecord::new(id, name, account, score).unwrap()
    }

    fn ids(r: &Roster) -> Vec<&str> {
        r.iter().map(|s| s.id.as_str()).collect()
    }

    fn seeded() -> Roster {
        let mut r = Roster::new();
        r.insert(rec("A1", "Zoe", "acc1", 7.5)).unwrap();
        r.insert(rec("A2", "Amy", "acc2", 9.0)).unwrap();
        r
    }

    #[test]
    fn concrete_scenario() {
        let mut r = seeded();
        r.sort_by_score_desc();
        assert_eq!(ids(&r), ["A2", "A1"]);

        let mut r = seeded();
        r.sort_by_name_asc();
        let names: Vec<&str> = r.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Amy", "Zoe"]);
        assert_eq!(ids(&r), ["A2", "A1"]);

        let mut r = seeded();
        assert!(r.delete("A1").is_some());
        assert!(!r.exists_id("A1"));
        assert!(!r.is_empty());
        assert!(r.exists_id("A2"));
    }

    #[test]
    fn exists_checks_each_key() {
        let r = seeded();
        assert!(r.exists_id("A1"));
        assert!(r.exists_name("Amy"));
        assert!(r.exists_account("acc2"));
        assert!(!r.exists_id("a1"));
        assert!(!r.exists_name("amy"));
        assert!(!r.exists_account("acc3"));
    }

    #[test]
    fn insert_rejects_duplicate_keys_without_mutation() {
        let mut r = seeded();
        let err = r.insert(rec("A1", "Other", "acc9", 1.0)).unwrap_err();
        assert_eq!(err, RosterError::DuplicateId("A1".into()));
        let err = r.insert(rec("A9", "Other", "acc2", 1.0)).unwrap_err();
        assert_eq!(err, RosterError::DuplicateAccount("acc2".into()));
        assert_eq!(r.len(), 2);
        assert!(!r.exists_name("Other"));
    }

    #[test]
    fn delete_missing_id_is_a_no_op() {
        let mut r = seeded();
        assert!(r.delete("nope").is_none());
        assert_eq!(ids(&r), ["A1", "A2"]);

        let mut empty = Roster::new();
        assert!(empty.delete("A1").is_none());
    }

    #[test]
    fn delete_removes_only_the_target() {
        let mut r = seeded();
        r.insert(rec("A3", "Bob", "acc3", 5.0)).unwrap();
        let before: Vec<StudentRecord> = r.iter().cloned().collect();
        let removed = r.delete("A2").unwrap();
        assert_eq!(removed, before[1]);
        assert_eq!(r.len(), 2);
        assert_eq!(r.get(0), Some(&before[0]));
        assert_eq!(r.get(1), Some(&before[2]));
    }

    #[test]
    fn reset_clears_everything() {
        let mut r = seeded();
        assert_eq!(r.reset(), 2);
        assert!(r.is_empty());
        assert!(!r.exists_id("A1"));
        assert!(!r.exists_name("Zoe"));
        assert!(!r.exists_name("Amy"));
        assert!(!r.exists_account("acc2"));
        assert_eq!(r.reset(), 0);
    }

    #[test]
    fn score_sort_is_stable_and_idempotent() {
        let mut r = Roster::new();
        r.insert(rec("1", "a", "x1", 5.0)).unwrap();
        r.insert(rec("2", "b", "x2", 8.0)).unwrap();
        r.insert(rec("3", "c", "x3", 5.0)).unwrap();
        r.insert(rec("4", "d", "x4", 8.0)).unwrap();
        r.insert(rec("5", "e", "x5", 0.0)).unwrap();
        r.sort_by(SortKey::Score);
        assert_eq!(ids(&r), ["2", "4", "1", "3", "5"]);
        r.sort_by(SortKey::Score);
        assert_eq!(ids(&r), ["2", "4", "1", "3", "5"]);
    }

    #[test]
    fn signed_zero_scores_tie_in_score_sort() {
        let mut r = Roster::new();
        r.insert(rec("A", "a", "x1", -0.0)).unwrap();
        r.insert(rec("B", "b", "x2", 0.0)).unwrap();
        r.sort_by_score_desc();
        assert_eq!(ids(&r), ["A", "B"]);
    }

    #[test]
    fn name_sort_is_bytewise_and_stable() {
        let mut r = Roster::new();
        r.insert(rec("1", "bob", "x1", 1.0)).unwrap();
        r.insert(rec("2", "Bob", "x2", 2.0)).unwrap();
        r.insert(rec("3", "bob", "x3", 3.0)).unwrap();
        r.insert(rec("4", "Al", "x4", 4.0)).unwrap();
        r.sort_by(SortKey::Name);
        // uppercase sorts before lowercase under byte ordering
        assert_eq!(ids(&r), ["4", "2", "1", "3"]);
        r.sort_by(SortKey::Name);
        assert_eq!(ids(&r), ["4", "2", "1", "3"]);
    }

    #[test]
    fn find_by_name_returns_all_in_order() {
        let mut r = seeded();
        r.insert(rec("A3", "Zoe", "acc3", 3.0)).unwrap();
        let hits: Vec<&str> = r.find_by_name("Zoe").iter().map(|s| s.id.as_str()).collect();
        assert_eq!(hits, ["A1", "A3"]);
        assert_eq!(r.find_by_id("A2").len(), 1);
        assert_eq!(r.find_by_account("acc3")[0].id, "A3");
        assert!(r.find(SearchField::Account, "none").is_empty());
    }

    #[test]
    fn record_rejects_bad_fields() {
        let long_id = "x".repeat(MAX_ID_LEN + 1);
        assert_eq!(
            StudentRecord::new(long_id, "n", "a", 1.0).unwrap_err(),
            RosterError::FieldTooLong { field: "ID", max: MAX_ID_LEN, len: MAX_ID_LEN + 1 }
        );
        assert!(StudentRecord::new("i", "n".repeat(MAX_NAME_LEN), "a", 1.0).is_ok());
        assert!(StudentRecord::new("i", "n", "a".repeat(MAX_ACCOUNT_LEN + 1), 1.0).is_err());
        assert_eq!(
            StudentRecord::new("i", "", "a", 1.0).unwrap_err(),
            RosterError::EmptyField { field: "Name" }
        );
    }

    #[test]
    fn record_card_layout() {
        let card = rec("A1", "Zoe", "acc1", 7.5).to_string();
        let lines: Vec<&str> = card.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], SEPARATOR);
        assert_eq!(lines[1], "ID: A1");
        assert_eq!(lines[2], "Name: Zoe");
        assert_eq!(lines[3], "Account: acc1");
        assert_eq!(lines[4], "Average score: 7.50");
        assert_eq!(lines[5], SEPARATOR);
    }
}
