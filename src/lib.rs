//! awkline - an embeddable awk-style record and pattern dispatch engine
//!
//! This crate provides the core of an awk-like text processor as a library:
//! lines are read from one or more sources, split into fields, and routed to
//! registered handlers by line number, line range, or regular expression.
//! There is no awk language here; handlers are plain Rust closures.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::io::{BufReader, Cursor};
//! use std::rc::Rc;
//!
//! use awkline::{Engine, FieldId, PatternSpec};
//!
//! let mut engine = Engine::new();
//! engine.clear_mid(); // silence the default echo handler
//!
//! let codes = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&codes);
//! engine.on(PatternSpec::Whole("error".into()), move |record, _out| {
//!     sink.borrow_mut().push(record.get(FieldId::Field(2)).to_string());
//!     Ok(())
//! }).unwrap();
//!
//! let input = BufReader::new(Cursor::new("ok 200\nerror 500\nerror 502\n"));
//! engine.run(vec![input]).unwrap();
//!
//! assert_eq!(*codes.borrow(), vec!["500", "502"]);
//! ```
//!
//! # Line-number patterns
//!
//! Positive line numbers count across all sources of an invocation (NR);
//! negative ones count within each source (FNR). Ranges are half-open with
//! a stride, and the step's sign picks the scope the same way.
//!
//! ```
//! use std::cell::RefCell;
//! use std::io::{BufReader, Cursor};
//! use std::rc::Rc;
//!
//! use awkline::{Engine, PatternSpec};
//!
//! let mut engine = Engine::new();
//! engine.clear_mid();
//!
//! let firsts = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&firsts);
//! // first line of every source
//! engine.on(PatternSpec::Line(-1), move |record, _out| {
//!     sink.borrow_mut().push(record.raw().to_string());
//!     Ok(())
//! }).unwrap();
//!
//! let a = BufReader::new(Cursor::new("alpha\nbeta\n"));
//! let b = BufReader::new(Cursor::new("gamma\ndelta\n"));
//! engine.run(vec![a, b]).unwrap();
//!
//! assert_eq!(*firsts.borrow(), vec!["alpha", "gamma"]);
//! ```
//!
//! # Field separators
//!
//! Records are split with a [`FieldSeparator`]: whitespace runs by default,
//! or a regex or literal string. Rejoining after a field mutation always
//! uses the output field separator (a single space unless changed).
//!
//! ```
//! use std::cell::RefCell;
//! use std::io::{BufReader, Cursor};
//! use std::rc::Rc;
//!
//! use awkline::{Engine, FieldId, FieldSeparator};
//!
//! let mut engine = Engine::new();
//! engine.set_separator(FieldSeparator::literal(":").unwrap());
//!
//! let users = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&users);
//! engine.set_mid(move |record, _out| {
//!     sink.borrow_mut().push(record.get(FieldId::Field(1)).to_string());
//!     Ok(())
//! });
//!
//! let input = BufReader::new(Cursor::new("root:x:0:0\ndaemon:x:1:1\n"));
//! engine.run(vec![input]).unwrap();
//!
//! assert_eq!(*users.borrow(), vec!["root", "daemon"]);
//! ```

pub mod engine;
pub mod error;
pub mod pattern;
pub mod record;
pub mod separator;

pub use engine::{Engine, RecordHandler, SlotHandler, index_of, substr};
pub use error::{Error, Result};
pub use pattern::{PatternSpec, Scope};
pub use record::{FieldId, Record};
pub use separator::FieldSeparator;
