//! In-memory record store
//!
//! The store owns every record. Lookup is by student id; iteration yields
//! records in insertion order, which is all the ordering the display layer
//! needs.

use std::collections::HashMap;

use crate::error::{RosterError, RosterResult};

/// One student's record. The id doubles as the store key and never changes
/// after insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRecord {
    pub id: String,
    pub name: String,
    pub age: i32,
    pub grades: Vec<i32>,
}

impl StudentRecord {
    /// Create a new record
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        age: i32,
        grades: Vec<i32>,
    ) -> Self {
        StudentRecord {
            id: id.into(),
            name: name.into(),
            age,
            grades,
        }
    }

    /// Arithmetic mean of the grades, 0.0 when there are none.
    pub fn average_grade(&self) -> f64 {
        if self.grades.is_empty() {
            return 0.0;
        }
        self.grades.iter().sum::<i32>() as f64 / self.grades.len() as f64
    }
}

/// In-memory mapping of student id to record.
///
/// Invariant: `order` holds exactly the keys of `records`, each once, in
/// insertion order, and every key equals the `id` of its record.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: HashMap<String, StudentRecord>,
    order: Vec<String>,
}

impl RecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in the store
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the store has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Check if a record with the given id exists
    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Look up a record by id
    pub fn get(&self, id: &str) -> Option<&StudentRecord> {
        self.records.get(id)
    }

    /// Insert a new record. Fails with `DuplicateId` if the id is already
    /// present; the store is left unchanged in that case.
    pub fn add(&mut self, record: StudentRecord) -> RosterResult<()> {
        if self.records.contains_key(&record.id) {
            return Err(RosterError::DuplicateId { id: record.id });
        }
        self.order.push(record.id.clone());
        self.records.insert(record.id.clone(), record);
        Ok(())
    }

    /// Insert or replace a record. On replace the original insertion slot
    /// is kept. This is the permissive path used by load, which tolerates
    /// duplicate ids in hand-edited files (the later row wins).
    pub fn put(&mut self, record: StudentRecord) {
        let id = record.id.clone();
        if self.records.insert(id.clone(), record).is_none() {
            self.order.push(id);
        }
    }

    /// Overwrite the supplied fields of an existing record. `None` leaves
    /// the existing value in place; an all-`None` call is a no-op on a
    /// present id. Fails with `NotFound` if the id is absent.
    pub fn update(
        &mut self,
        id: &str,
        name: Option<String>,
        age: Option<i32>,
        grades: Option<Vec<i32>>,
    ) -> RosterResult<()> {
        let record = self
            .records
            .get_mut(id)
            .ok_or_else(|| RosterError::NotFound { id: id.to_string() })?;

        if let Some(name) = name {
            record.name = name;
        }
        if let Some(age) = age {
            record.age = age;
        }
        if let Some(grades) = grades {
            record.grades = grades;
        }

        Ok(())
    }

    /// Remove a record by id. Fails with `NotFound` if absent; the store is
    /// never altered by a failed delete.
    pub fn delete(&mut self, id: &str) -> RosterResult<()> {
        if self.records.remove(id).is_none() {
            return Err(RosterError::NotFound { id: id.to_string() });
        }
        self.order.retain(|key| key != id);
        Ok(())
    }

    /// Discard all current entries and install the given records as the new
    /// contents. Runs to completion before returning; no caller can observe
    /// a half-replaced store.
    pub fn replace_all(&mut self, records: impl IntoIterator<Item = StudentRecord>) {
        self.records.clear();
        self.order.clear();
        for record in records {
            self.put(record);
        }
    }

    /// Iterate records in insertion order. This is a live view of the
    /// store, not a snapshot: re-iterating reflects the current contents.
    pub fn iter(&self) -> impl Iterator<Item = &StudentRecord> {
        self.order.iter().filter_map(|id| self.records.get(id))
    }
}

impl IntoIterator for RecordStore {
    type Item = StudentRecord;
    type IntoIter = std::vec::IntoIter<StudentRecord>;

    /// Consume the store, yielding records in insertion order.
    fn into_iter(mut self) -> Self::IntoIter {
        let mut records = Vec::with_capacity(self.order.len());
        for id in self.order.drain(..) {
            if let Some(record) = self.records.remove(&id) {
                records.push(record);
            }
        }
        records.into_iter()
    }
}
