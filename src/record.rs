//! Raw, codec-agnostic records and the sources that generate them.
//!
//! A [`RawRecord`] is an ordered list of named primitive values. Records are
//! produced in batches by a [`RecordSource`] and handed to every strategy as an
//! independent copy, so nothing a strategy does to its batch can be seen by another.
//!
//! # Generated shape
//!
//! ```text
//! id:        integer  (1..=count, position in the batch)
//! name:      string   (drawn from NAMES)
//! email:     string   "<lowercase name><id>@<domain>"
//! age:       integer  (18..=70)
//! is_active: boolean
//! ```

use crate::error::BenchError;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const NAMES: &[&str] = &[
    "Alice", "Bob", "Charlie", "David", "Eve", "Frank", "Anne", "George", "Hannah", "James",
    "Claire", "Roger",
];

const EMAIL_DOMAINS: &[&str] = &["yahoo.com", "gmail.com", "email.com", "mail.com"];

/// Inclusive age range of generated users.
pub const AGE_RANGE: (i64, i64) = (18, 70);

/// Field names every generated record carries, in generation order.
pub const USER_FIELDS: [&str; 5] = ["id", "name", "email", "age", "is_active"];

/// A primitive (or nested) record value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Field {
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<Field>),
    Map(BTreeMap<String, Field>),
}

impl Field {
    /// Short name of the value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Field::Bool(_) => "boolean",
            Field::Int(_) => "integer",
            Field::Str(_) => "string",
            Field::List(_) => "sequence",
            Field::Map(_) => "mapping",
        }
    }
}

impl From<bool> for Field {
    fn from(v: bool) -> Self {
        Field::Bool(v)
    }
}

impl From<i64> for Field {
    fn from(v: i64) -> Self {
        Field::Int(v)
    }
}

impl From<&str> for Field {
    fn from(v: &str) -> Self {
        Field::Str(v.to_string())
    }
}

impl From<String> for Field {
    fn from(v: String) -> Self {
        Field::Str(v)
    }
}

/// An ordered mapping of field name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    fields: Vec<(String, Field)>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. Replaces an existing field of the same name in place.
    pub fn with(mut self, name: &str, value: impl Into<Field>) -> Self {
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name.to_string(), value)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// A fixed-size, ordered set of records processed together in one iteration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordBatch {
    records: Vec<RawRecord>,
}

impl RecordBatch {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }

    /// Deep copy for exclusive use by one strategy.
    ///
    /// Records own all of their data, so the copy shares no allocation with `self`.
    pub fn isolated_copy(&self) -> Self {
        self.clone()
    }

    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Supplies batches of raw records.
pub trait RecordSource {
    /// Produce `count` records with an identical field set.
    ///
    /// Fails with [`BenchError::InvalidArgument`] when `count` is zero.
    fn generate(&mut self, count: usize) -> Result<RecordBatch, BenchError>;
}

/// Generates synthetic user records from a ChaCha8 stream.
///
/// Every batch gets its own seed derived from the master seed and the batch
/// index, and every record its own seed derived from the batch seed and its
/// position. Generation is parallel but the output is fully determined by the
/// master seed and the number of batches issued so far.
#[derive(Debug, Clone)]
pub struct UserRecordSource {
    seed: u64,
    batches_issued: u64,
}

impl UserRecordSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            batches_issued: 0,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

fn derive_seed(master_seed: u64, index: u64) -> u64 {
    master_seed
        .wrapping_add(index)
        .wrapping_mul(0x517cc1b727220a95)
}

fn generate_user(rng: &mut ChaCha8Rng, id: i64) -> RawRecord {
    let name = NAMES.choose(rng).copied().unwrap_or("Alice");
    let local = NAMES.choose(rng).copied().unwrap_or("Alice").to_lowercase();
    let domain = EMAIL_DOMAINS.choose(rng).copied().unwrap_or("mail.com");

    RawRecord::new()
        .with("id", id)
        .with("name", name)
        .with("email", format!("{local}{id}@{domain}"))
        .with("age", rng.gen_range(AGE_RANGE.0..=AGE_RANGE.1))
        .with("is_active", rng.gen_bool(0.5))
}

impl RecordSource for UserRecordSource {
    fn generate(&mut self, count: usize) -> Result<RecordBatch, BenchError> {
        if count == 0 {
            return Err(BenchError::InvalidArgument(
                "record count must be positive".into(),
            ));
        }

        let batch_seed = derive_seed(self.seed, self.batches_issued);
        self.batches_issued += 1;

        // Range is an IndexedParallelIterator; collect preserves order.
        let records: Vec<RawRecord> = (0..count)
            .into_par_iter()
            .map(|i| {
                let mut rng = ChaCha8Rng::seed_from_u64(derive_seed(batch_seed, i as u64));
                generate_user(&mut rng, i as i64 + 1)
            })
            .collect();

        Ok(RecordBatch::new(records))
    }
}
