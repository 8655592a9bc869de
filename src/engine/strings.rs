//! awk-style string functions carried on the engine.
//!
//! These observe the engine's ignore-case flag and, for [`Engine::match_in`],
//! maintain the RSTART/RLENGTH match state. Patterns are compiled on first
//! use and cached on the engine.

use crate::error::Result;
use crate::pattern::CaseRegex;
use crate::separator::FieldSeparator;

use super::Engine;

impl Engine {
    /// Replace the first match of `pattern` in `text`. `&` in the
    /// replacement stands for the matched text. Returns the rewritten
    /// string and the number of replacements (0 or 1).
    pub fn sub(&mut self, pattern: &str, replacement: &str, text: &str) -> Result<(String, usize)> {
        self.replace(pattern, replacement, text, false)
    }

    /// Replace every match of `pattern` in `text`. `&` in the replacement
    /// stands for the matched text.
    pub fn gsub(&mut self, pattern: &str, replacement: &str, text: &str) -> Result<(String, usize)> {
        self.replace(pattern, replacement, text, true)
    }

    fn replace(
        &mut self,
        pattern: &str,
        replacement: &str,
        text: &str,
        global: bool,
    ) -> Result<(String, usize)> {
        let ignore_case = self.ignore_case;
        let re = self.cached_regex(pattern)?.get(ignore_case);

        let mut count = 0;
        let rewrite = |caps: &regex::Captures| {
            count += 1;
            replacement.replace('&', caps.get(0).map(|m| m.as_str()).unwrap_or(""))
        };

        let result = if global {
            re.replace_all(text, rewrite)
        } else {
            re.replace(text, rewrite)
        };
        let result = result.into_owned();

        Ok((result, count))
    }

    /// 1-based index of the first match of `pattern` in `text`, 0 when it
    /// does not match. Sets `rstart`/`rlength` as a side effect (`0`/`-1`
    /// on a miss).
    pub fn match_in(&mut self, text: &str, pattern: &str) -> Result<usize> {
        let ignore_case = self.ignore_case;
        let found = {
            let re = self.cached_regex(pattern)?.get(ignore_case);
            re.find(text).map(|m| (m.start() + 1, m.len() as i64))
        };

        match found {
            Some((start, len)) => {
                self.rstart = start;
                self.rlength = len;
            }
            None => {
                self.rstart = 0;
                self.rlength = -1;
            }
        }
        Ok(self.rstart)
    }

    /// Split arbitrary text with an explicit separator, or with the
    /// engine's active one when `separator` is `None`.
    pub fn split_with(&self, text: &str, separator: Option<&FieldSeparator>) -> Vec<String> {
        separator.unwrap_or(&self.separator).split(text)
    }

    fn cached_regex(&mut self, pattern: &str) -> Result<&CaseRegex> {
        if !self.regex_cache.contains_key(pattern) {
            let compiled = CaseRegex::new(pattern)?;
            self.regex_cache.insert(pattern.to_string(), compiled);
        }
        Ok(self.regex_cache.get(pattern).unwrap())
    }
}

/// 1-based position of `needle` in `s`, 0 when absent.
pub fn index_of(s: &str, needle: &str) -> usize {
    s.find(needle).map(|i| i + 1).unwrap_or(0)
}

/// awk `substr`: 1-based character offset, optional length. Out-of-range
/// values clamp rather than fail.
pub fn substr(s: &str, start: usize, len: Option<usize>) -> String {
    let skip = start.saturating_sub(1);
    match len {
        Some(len) => s.chars().skip(skip).take(len).collect(),
        None => s.chars().skip(skip).collect(),
    }
}
