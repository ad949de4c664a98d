use crate::error::{Result, ValSplitError};
use serde_json::Value;
use std::fmt;
use std::path::Path;

/// One valuation entry: an arbitrary JSON object.
pub type Record = Value;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Identifier of a record, compared by JSON value rather than display text.
///
/// The key is the compact JSON encoding of the value, so `"1"` and `1` never
/// collide while equal values always hash alike.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId {
    key: String,
}

impl RecordId {
    pub fn from_value(value: &Value) -> Self {
        Self {
            key: value.to_string(),
        }
    }

    /// The identifier in its JSON encoding.
    pub fn as_json(&self) -> &str {
        &self.key
    }
}

impl From<&Value> for RecordId {
    fn from(value: &Value) -> Self {
        Self::from_value(value)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Strings print without their quotes
        match serde_json::from_str::<Value>(&self.key) {
            Ok(Value::String(s)) => write!(f, "{}", s),
            _ => write!(f, "{}", self.key),
        }
    }
}

/// Ordered records loaded from one export file.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordCollection {
    records: Vec<Record>,
    id_field: String,
}

impl RecordCollection {
    pub fn new<S: Into<String>>(records: Vec<Record>, id_field: S) -> Self {
        Self {
            records,
            id_field: id_field.into(),
        }
    }

    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Identifier of `record`, or `None` when the field is absent.
    pub fn record_id(&self, record: &Record) -> Option<RecordId> {
        record.get(&self.id_field).map(RecordId::from_value)
    }

    /// Identifier of the record at `index`.
    pub fn id_at(&self, index: usize) -> Option<RecordId> {
        self.get(index).and_then(|record| self.record_id(record))
    }

    pub fn ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.records.iter().filter_map(|record| self.record_id(record))
    }

    /// Number of records that carry no identifier.
    pub fn missing_id_count(&self) -> usize {
        self.records
            .iter()
            .filter(|record| record.get(&self.id_field).is_none())
            .count()
    }
}

impl<'a> IntoIterator for &'a RecordCollection {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Loads and minimally validates record collections.
pub struct RecordStore {
    id_field: String,
}

impl RecordStore {
    pub fn new<S: Into<String>>(id_field: S) -> Self {
        Self {
            id_field: id_field.into(),
        }
    }

    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<RecordCollection> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(ValSplitError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let bytes = std::fs::read(path)?;
        log::debug!(
            "event=input_read path={} bytes={}",
            path.display(),
            bytes.len()
        );

        let collection = self.parse(&bytes, path)?;

        let missing = collection.missing_id_count();
        if missing > 0 {
            log::debug!(
                "event=records_without_id count={} field={}",
                missing,
                self.id_field
            );
        }

        log::info!(
            "event=input_loaded path={} records={}",
            path.display(),
            collection.len()
        );
        Ok(collection)
    }

    /// Parses raw bytes; `path` is only used for error reporting.
    pub fn parse(&self, bytes: &[u8], path: &Path) -> Result<RecordCollection> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

        let value: Value = serde_json::from_slice(bytes).map_err(|source| ValSplitError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        self.from_value(value, path)
    }

    pub fn from_value(&self, value: Value, path: &Path) -> Result<RecordCollection> {
        let records = match value {
            Value::Array(records) => records,
            object @ Value::Object(_) => vec![object],
            other => {
                return Err(ValSplitError::structure(
                    path,
                    format!(
                        "expected an object or an array of objects, found {}",
                        json_kind(&other)
                    ),
                ))
            }
        };

        // Only the first record is checked
        match records.first() {
            None => {
                return Err(ValSplitError::structure(
                    path,
                    "file contains no records",
                ))
            }
            Some(Value::Object(first)) if first.contains_key(&self.id_field) => {}
            Some(_) => {
                return Err(ValSplitError::structure(
                    path,
                    format!(
                        "missing required identifier field `{}`",
                        self.id_field
                    ),
                ))
            }
        }

        Ok(RecordCollection::new(records, self.id_field.clone()))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
