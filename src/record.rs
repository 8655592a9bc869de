use std::fmt;

use crate::error::{Error, Result};
use crate::separator::FieldSeparator;

/// Selector for the forgiving accessor family on [`Record`].
///
/// `Field` is 1-based, like `$1` in awk; `Field(0)` is accepted as a spelling
/// of the whole record, mirroring `$0`. `Last` addresses the final field,
/// like `$NF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldId {
    /// The whole record (`$0`).
    Whole,
    /// A 1-based field (`$n`); `Field(0)` behaves as `Whole`.
    Field(usize),
    /// The last field (`$NF`).
    Last,
}

/// One input line split into fields, with its position counters.
///
/// A record is built by the engine for each line, handed to every matching
/// handler, and discarded afterwards. Field reads through [`Record::get`]
/// never fail: a 1-based index past the last field reads as the empty
/// string. The strict 0-based accessor [`Record::field_at`] reports an
/// error instead, signaling a programmer mistake at the call site.
pub struct Record<'a> {
    raw: String,
    fields: Vec<String>,
    global_index: usize,
    source_index: usize,
    source_name: Option<&'a str>,
    separator: &'a FieldSeparator,
    output_separator: &'a str,
}

impl<'a> Record<'a> {
    pub(crate) fn new(
        raw: &str,
        separator: &'a FieldSeparator,
        output_separator: &'a str,
        global_index: usize,
        source_index: usize,
        source_name: Option<&'a str>,
    ) -> Self {
        let fields = separator.split(raw);
        Self {
            raw: raw.to_string(),
            fields,
            global_index,
            source_index,
            source_name,
            separator,
            output_separator,
        }
    }

    /// The original line text, line terminator stripped. Rebuilt from the
    /// fields after any field mutation.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Number of fields (NF). Always equals `self.fields().len()`.
    pub fn count(&self) -> usize {
        self.fields.len()
    }

    /// 1-based position of this record across all sources of the current
    /// invocation (NR).
    pub fn global_index(&self) -> usize {
        self.global_index
    }

    /// 1-based position of this record within its own source (FNR).
    pub fn source_index(&self) -> usize {
        self.source_index
    }

    /// Name of the current source, when the invocation was given file paths
    /// (FILENAME).
    pub fn source_name(&self) -> Option<&str> {
        self.source_name
    }

    /// All fields, 0-based. Slicing follows normal Rust rules.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Forgiving field read. Out-of-bounds 1-based indexes read as `""`,
    /// never an error.
    pub fn get(&self, id: FieldId) -> &str {
        match self.resolve(id) {
            None => &self.raw,
            Some(i) => self.fields.get(i).map(String::as_str).unwrap_or(""),
        }
    }

    /// Strict 0-based field read. Fails when `index >= count`.
    pub fn field_at(&self, index: usize) -> Result<&str> {
        self.fields
            .get(index)
            .map(String::as_str)
            .ok_or(Error::FieldIndex {
                index,
                count: self.fields.len(),
            })
    }

    /// Set a field or replace the whole record.
    ///
    /// Setting a field past the end pads the gap with empty fields and grows
    /// the count; the raw text is then rejoined with the output field
    /// separator. Setting [`FieldId::Whole`] replaces the raw text and
    /// resplits it. The field count never shrinks as a result of a set.
    pub fn set(&mut self, id: FieldId, value: &str) {
        match self.resolve(id) {
            None => {
                self.raw = value.to_string();
                self.fields = self.separator.split(&self.raw);
            }
            Some(i) => {
                while self.fields.len() <= i {
                    self.fields.push(String::new());
                }
                self.fields[i] = value.to_string();
                self.raw = self.fields.join(self.output_separator);
            }
        }
    }

    /// Strict-form set: same effect as `set(FieldId::Field(index + 1), ..)`.
    pub fn set_at(&mut self, index: usize, value: &str) {
        self.set(FieldId::Field(index + 1), value);
    }

    /// Map a selector to a 0-based field slot; `None` means the whole record.
    fn resolve(&self, id: FieldId) -> Option<usize> {
        match id {
            FieldId::Whole | FieldId::Field(0) => None,
            FieldId::Field(n) => Some(n - 1),
            // On a record with no fields, Last addresses field 1.
            FieldId::Last => Some(self.fields.len().saturating_sub(1)),
        }
    }
}

impl fmt::Display for Record<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
