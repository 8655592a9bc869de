use regex::{Regex, RegexBuilder};

use crate::error::{Error, Result};
use crate::record::{FieldId, Record};

/// Which position counter a line-number pattern compares against.
///
/// Derived from the sign of the supplied number or step at registration
/// time: positive values compare against the global index (NR), negative
/// values against the per-source index (FNR). The magnitude is always what
/// is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Compare against the record's position across all sources (NR).
    Global,
    /// Compare against the record's position within its source (FNR).
    PerSource,
}

impl Scope {
    fn index(self, record: &Record<'_>) -> usize {
        match self {
            Scope::Global => record.global_index(),
            Scope::PerSource => record.source_index(),
        }
    }
}

/// What a registered handler matches against.
///
/// The numeric variants use sign to pick the [`Scope`]: `Line(-3)` fires on
/// the third line of every source, `Line(3)` on the third line overall.
/// `Range` bounds are always given as positive numbers; only the step's
/// sign selects the scope. Regex variants search, rather than anchor, and
/// honor the engine's ignore-case flag at match time.
#[derive(Debug, Clone)]
pub enum PatternSpec {
    /// Exact line number; negative means per-source.
    Line(i64),
    /// Half-open `[start, stop)` with a stride; `stop: None` is unbounded.
    /// A negative step means per-source.
    Range {
        start: usize,
        stop: Option<usize>,
        step: i64,
    },
    /// Regex searched against the whole record.
    Whole(String),
    /// Regex searched against one field; an out-of-bounds selector
    /// participates with the empty string.
    Field(FieldId, String),
}

impl PatternSpec {
    /// The scope a numeric spec derives from its sign. Regex kinds have no
    /// positional component and return `None`.
    pub fn scope(&self) -> Option<Scope> {
        match self {
            PatternSpec::Line(n) => Some(if *n < 0 { Scope::PerSource } else { Scope::Global }),
            PatternSpec::Range { step, .. } => {
                Some(if *step < 0 { Scope::PerSource } else { Scope::Global })
            }
            PatternSpec::Whole(_) | PatternSpec::Field(..) => None,
        }
    }
}

/// A regex compiled in both case variants, so the ignore-case flag can be
/// consulted per record without recompiling.
#[derive(Debug)]
pub(crate) struct CaseRegex {
    sensitive: Regex,
    insensitive: Regex,
}

impl CaseRegex {
    pub(crate) fn new(pattern: &str) -> Result<Self> {
        let sensitive = Regex::new(pattern).map_err(Error::Regex)?;
        let insensitive = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(Error::Regex)?;
        Ok(Self {
            sensitive,
            insensitive,
        })
    }

    pub(crate) fn get(&self, ignore_case: bool) -> &Regex {
        if ignore_case {
            &self.insensitive
        } else {
            &self.sensitive
        }
    }
}

/// Registration-time compiled form of a [`PatternSpec`].
#[derive(Debug)]
pub(crate) enum CompiledPattern {
    Line {
        number: usize,
        scope: Scope,
    },
    Range {
        start: usize,
        stop: Option<usize>,
        step: usize,
        scope: Scope,
    },
    Whole(CaseRegex),
    Field(FieldId, CaseRegex),
}

impl CompiledPattern {
    /// Validate and compile a spec. Invalid numbers and unparseable regexes
    /// fail here, before any source is processed.
    pub(crate) fn compile(spec: PatternSpec) -> Result<Self> {
        match spec {
            PatternSpec::Line(0) => Err(Error::pattern("line number must be non-zero")),
            PatternSpec::Line(n) => Ok(CompiledPattern::Line {
                number: n.unsigned_abs() as usize,
                scope: if n < 0 { Scope::PerSource } else { Scope::Global },
            }),
            PatternSpec::Range { start, stop, step } => {
                if step == 0 {
                    return Err(Error::pattern("range step must be non-zero"));
                }
                if start == 0 {
                    return Err(Error::pattern("range start must be positive"));
                }
                if stop == Some(0) {
                    return Err(Error::pattern("range stop must be positive"));
                }
                Ok(CompiledPattern::Range {
                    start,
                    stop,
                    step: step.unsigned_abs() as usize,
                    scope: if step < 0 { Scope::PerSource } else { Scope::Global },
                })
            }
            PatternSpec::Whole(pattern) => Ok(CompiledPattern::Whole(CaseRegex::new(&pattern)?)),
            PatternSpec::Field(id, pattern) => {
                Ok(CompiledPattern::Field(id, CaseRegex::new(&pattern)?))
            }
        }
    }

    /// Evaluate this pattern against one record.
    pub(crate) fn matches(&self, record: &Record<'_>, ignore_case: bool) -> bool {
        match self {
            CompiledPattern::Line { number, scope } => scope.index(record) == *number,
            CompiledPattern::Range {
                start,
                stop,
                step,
                scope,
            } => {
                let i = scope.index(record);
                i >= *start
                    && stop.map_or(true, |stop| i < stop)
                    && (i - start) % step == 0
            }
            CompiledPattern::Whole(re) => re.get(ignore_case).is_match(record.raw()),
            CompiledPattern::Field(id, re) => re.get(ignore_case).is_match(record.get(*id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::separator::FieldSeparator;

    fn record<'a>(raw: &str, sep: &'a FieldSeparator, nr: usize, fnr: usize) -> Record<'a> {
        Record::new(raw, sep, " ", nr, fnr, None)
    }

    fn compile(spec: PatternSpec) -> CompiledPattern {
        CompiledPattern::compile(spec).unwrap()
    }

    #[test]
    fn test_line_global() {
        let sep = FieldSeparator::default();
        let pat = compile(PatternSpec::Line(3));
        assert!(pat.matches(&record("x", &sep, 3, 1), false));
        assert!(!pat.matches(&record("x", &sep, 1, 3), false));
    }

    #[test]
    fn test_line_per_source() {
        let sep = FieldSeparator::default();
        let pat = compile(PatternSpec::Line(-3));
        assert!(pat.matches(&record("x", &sep, 10, 3), false));
        assert!(!pat.matches(&record("x", &sep, 3, 10), false));
    }

    #[test]
    fn test_line_zero_rejected() {
        assert!(matches!(
            CompiledPattern::compile(PatternSpec::Line(0)),
            Err(Error::Pattern { .. })
        ));
    }

    #[test]
    fn test_range_half_open_with_step() {
        let sep = FieldSeparator::default();
        let pat = compile(PatternSpec::Range {
            start: 2,
            stop: Some(8),
            step: 3,
        });
        let hits: Vec<usize> = (1..=10)
            .filter(|&nr| pat.matches(&record("x", &sep, nr, nr), false))
            .collect();
        assert_eq!(hits, vec![2, 5]);
    }

    #[test]
    fn test_range_unbounded() {
        let sep = FieldSeparator::default();
        let pat = compile(PatternSpec::Range {
            start: 4,
            stop: None,
            step: 1,
        });
        assert!(!pat.matches(&record("x", &sep, 3, 3), false));
        assert!(pat.matches(&record("x", &sep, 4, 4), false));
        assert!(pat.matches(&record("x", &sep, 400, 1), false));
    }

    #[test]
    fn test_range_negative_step_uses_source_index() {
        let sep = FieldSeparator::default();
        let pat = compile(PatternSpec::Range {
            start: 1,
            stop: Some(3),
            step: -2,
        });
        // fnr 1 matches, fnr 2 misses the stride, nr is irrelevant
        assert!(pat.matches(&record("x", &sep, 50, 1), false));
        assert!(!pat.matches(&record("x", &sep, 1, 2), false));
    }

    #[test]
    fn test_range_invalid_values_rejected() {
        for spec in [
            PatternSpec::Range { start: 1, stop: Some(5), step: 0 },
            PatternSpec::Range { start: 0, stop: Some(5), step: 1 },
            PatternSpec::Range { start: 1, stop: Some(0), step: 1 },
        ] {
            assert!(matches!(
                CompiledPattern::compile(spec),
                Err(Error::Pattern { .. })
            ));
        }
    }

    #[test]
    fn test_whole_regex() {
        let sep = FieldSeparator::default();
        let pat = compile(PatternSpec::Whole("er+or".into()));
        assert!(pat.matches(&record("an error here", &sep, 1, 1), false));
        assert!(!pat.matches(&record("all fine", &sep, 1, 1), false));
    }

    #[test]
    fn test_whole_regex_case_flag_read_at_match_time() {
        let sep = FieldSeparator::default();
        let pat = compile(PatternSpec::Whole("APPLE".into()));
        let rec = record("apple pie", &sep, 1, 1);
        assert!(!pat.matches(&rec, false));
        assert!(pat.matches(&rec, true));
    }

    #[test]
    fn test_field_regex() {
        let sep = FieldSeparator::default();
        let pat = compile(PatternSpec::Field(FieldId::Field(2), "^b$".into()));
        assert!(pat.matches(&record("a b c", &sep, 1, 1), false));
        assert!(!pat.matches(&record("b a c", &sep, 1, 1), false));
    }

    #[test]
    fn test_field_regex_out_of_bounds_sees_empty() {
        let sep = FieldSeparator::default();
        let oob = compile(PatternSpec::Field(FieldId::Field(9), "x".into()));
        assert!(!oob.matches(&record("a b", &sep, 1, 1), false));
        let empty_ok = compile(PatternSpec::Field(FieldId::Field(9), "^$".into()));
        assert!(empty_ok.matches(&record("a b", &sep, 1, 1), false));
    }

    #[test]
    fn test_spec_scope_from_sign() {
        assert_eq!(PatternSpec::Line(5).scope(), Some(Scope::Global));
        assert_eq!(PatternSpec::Line(-5).scope(), Some(Scope::PerSource));
        let per_source = PatternSpec::Range {
            start: 1,
            stop: None,
            step: -2,
        };
        assert_eq!(per_source.scope(), Some(Scope::PerSource));
        assert_eq!(PatternSpec::Whole("x".into()).scope(), None);
    }

    #[test]
    fn test_invalid_regex_rejected_at_compile() {
        assert!(matches!(
            CompiledPattern::compile(PatternSpec::Whole("[oops".into())),
            Err(Error::Regex(_))
        ));
    }
}
