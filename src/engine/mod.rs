mod strings;

pub use strings::{index_of, substr};

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Stdout, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::pattern::{CaseRegex, CompiledPattern, PatternSpec};
use crate::record::Record;
use crate::separator::FieldSeparator;

/// Handler invoked with each matching record and the engine's output sink.
pub type RecordHandler =
    Box<dyn FnMut(&mut Record<'_>, &mut dyn Write) -> Result<()> + 'static>;

/// Handler for the begin/end slots; runs without a record.
pub type SlotHandler = Box<dyn FnMut(&mut dyn Write) -> Result<()> + 'static>;

/// Output destination shared by all handlers.
///
/// Not scoped per invocation: once redirected it stays in effect until
/// explicitly reset.
enum OutputTarget {
    Stdout(Stdout),
    File(File),
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputTarget::Stdout(s) => s.write(buf),
            OutputTarget::File(f) => f.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => s.flush(),
            OutputTarget::File(f) => f.flush(),
        }
    }
}

struct Entry {
    pattern: CompiledPattern,
    handler: RecordHandler,
}

/// The three lifecycle slots plus the pattern entries, in registration
/// order. That order is an implementation detail: callers must not rely on
/// the order in which overlapping entries fire for the same record.
struct HandlerRegistry {
    begin: Option<SlotHandler>,
    mid: Option<RecordHandler>,
    end: Option<SlotHandler>,
    entries: Vec<Entry>,
}

/// The dispatch engine.
///
/// An engine carries the field-splitting configuration, the handler
/// registry, the ignore-case flag and the output sink. Each call to
/// [`Engine::run`] or [`Engine::run_files`] is an independent invocation:
/// the global record counter starts at zero, `begin` fires once, every line
/// of every source is dispatched in order, and `end` fires once.
///
/// By default the `mid` slot echoes each record to the output sink; use
/// [`Engine::clear_mid`] to silence it or [`Engine::set_mid`] to replace it.
pub struct Engine {
    separator: FieldSeparator,
    output_separator: String,
    ignore_case: bool,
    registry: HandlerRegistry,
    output: OutputTarget,
    global_index: usize,
    source_index: usize,
    /// Compiled regexes for the dynamic string functions.
    regex_cache: HashMap<String, CaseRegex>,
    /// RSTART/RLENGTH state maintained by [`Engine::match_in`].
    rstart: usize,
    rlength: i64,
}

impl Engine {
    pub fn new() -> Self {
        let echo: RecordHandler =
            Box::new(|record, out| writeln!(out, "{}", record.raw()).map_err(Error::Io));
        Self {
            separator: FieldSeparator::default(),
            output_separator: " ".to_string(),
            ignore_case: false,
            registry: HandlerRegistry {
                begin: None,
                mid: Some(echo),
                end: None,
                entries: Vec::new(),
            },
            output: OutputTarget::Stdout(io::stdout()),
            global_index: 0,
            source_index: 0,
            regex_cache: HashMap::new(),
            rstart: 0,
            rlength: -1,
        }
    }

    /// Set the field-splitting rule used for every subsequent record.
    pub fn set_separator(&mut self, separator: FieldSeparator) {
        self.separator = separator;
    }

    /// Set the string used to rejoin fields after a field mutation (OFS).
    /// Independent of the split rule; defaults to a single space.
    pub fn set_output_separator(&mut self, separator: impl Into<String>) {
        self.output_separator = separator.into();
    }

    /// Toggle case-insensitive regex matching. Read at match time, so a
    /// change is visible to the next record, not frozen at registration.
    pub fn set_ignore_case(&mut self, ignore_case: bool) {
        self.ignore_case = ignore_case;
    }

    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    /// 1-based start of the last [`Engine::match_in`] hit, 0 when it missed.
    pub fn rstart(&self) -> usize {
        self.rstart
    }

    /// Length of the last [`Engine::match_in`] hit, -1 when it missed.
    pub fn rlength(&self) -> i64 {
        self.rlength
    }

    /// Register a handler for a pattern. The spec is validated and its
    /// regexes compiled here, so bad patterns fail before any source is
    /// read. Overlapping patterns are legal; every matching handler fires.
    pub fn on<F>(&mut self, spec: PatternSpec, handler: F) -> Result<()>
    where
        F: FnMut(&mut Record<'_>, &mut dyn Write) -> Result<()> + 'static,
    {
        let pattern = CompiledPattern::compile(spec)?;
        self.registry.entries.push(Entry {
            pattern,
            handler: Box::new(handler),
        });
        Ok(())
    }

    /// Set the handler that runs once at the start of every invocation.
    pub fn on_begin<F>(&mut self, handler: F)
    where
        F: FnMut(&mut dyn Write) -> Result<()> + 'static,
    {
        self.registry.begin = Some(Box::new(handler));
    }

    /// Set the handler that runs once at the end of every invocation.
    pub fn on_end<F>(&mut self, handler: F)
    where
        F: FnMut(&mut dyn Write) -> Result<()> + 'static,
    {
        self.registry.end = Some(Box::new(handler));
    }

    /// Replace the default per-record handler. The mid handler fires for
    /// every record, whether or not any pattern handler also fired.
    pub fn set_mid<F>(&mut self, handler: F)
    where
        F: FnMut(&mut Record<'_>, &mut dyn Write) -> Result<()> + 'static,
    {
        self.registry.mid = Some(Box::new(handler));
    }

    pub fn clear_begin(&mut self) {
        self.registry.begin = None;
    }

    pub fn clear_mid(&mut self) {
        self.registry.mid = None;
    }

    pub fn clear_end(&mut self) {
        self.registry.end = None;
    }

    /// Redirect all handler output to a file, truncating or appending.
    /// Stays in effect across invocations until [`Engine::reset_output`].
    pub fn redirect_output(&mut self, path: impl AsRef<Path>, append: bool) -> Result<()> {
        let file = if append {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(Error::Io)?
        } else {
            File::create(path).map_err(Error::Io)?
        };
        self.output = OutputTarget::File(file);
        Ok(())
    }

    /// Restore the default output sink (standard output).
    pub fn reset_output(&mut self) {
        self.output = OutputTarget::Stdout(io::stdout());
    }

    /// Run one invocation over in-memory or already-open sources.
    pub fn run<R: BufRead>(&mut self, sources: Vec<R>) -> Result<()> {
        self.begin_run()?;
        for source in sources {
            self.process_source(source, None)?;
        }
        self.end_run()
    }

    /// Run one invocation over named files, opened in argument order. A
    /// missing or unreadable file fails the invocation immediately; no
    /// partial-source skipping.
    pub fn run_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<()> {
        self.begin_run()?;
        for path in paths {
            let path = path.as_ref();
            let name = path.display().to_string();
            let file = File::open(path).map_err(Error::Io)?;
            self.process_source(BufReader::new(file), Some(&name))?;
        }
        self.end_run()
    }

    fn begin_run(&mut self) -> Result<()> {
        self.global_index = 0;
        if let Some(begin) = self.registry.begin.as_mut() {
            begin(&mut self.output)?;
        }
        Ok(())
    }

    fn end_run(&mut self) -> Result<()> {
        if let Some(end) = self.registry.end.as_mut() {
            end(&mut self.output)?;
        }
        self.output.flush().map_err(Error::Io)
    }

    fn process_source<R: BufRead>(&mut self, mut input: R, source_name: Option<&str>) -> Result<()> {
        self.source_index = 0;
        let mut line = String::new();

        loop {
            line.clear();
            let bytes_read = input.read_line(&mut line).map_err(Error::Io)?;
            if bytes_read == 0 {
                break; // EOF
            }

            // Strip the line terminator
            if line.ends_with('\n') {
                line.pop();
                if line.ends_with('\r') {
                    line.pop();
                }
            }

            self.global_index += 1;
            self.source_index += 1;
            self.dispatch(&line, source_name)?;
        }

        Ok(())
    }

    /// Build the record for one line and run it through the registry. A
    /// handler error aborts the rest of the invocation; `end` never runs.
    fn dispatch(&mut self, raw: &str, source_name: Option<&str>) -> Result<()> {
        let mut record = Record::new(
            raw,
            &self.separator,
            &self.output_separator,
            self.global_index,
            self.source_index,
            source_name,
        );
        let ignore_case = self.ignore_case;

        if let Some(mid) = self.registry.mid.as_mut() {
            mid(&mut record, &mut self.output)?;
        }

        for entry in self.registry.entries.iter_mut() {
            if entry.pattern.matches(&record, ignore_case) {
                (entry.handler)(&mut record, &mut self.output)?;
            }
        }

        Ok(())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
