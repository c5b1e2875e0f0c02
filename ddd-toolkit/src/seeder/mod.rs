//! Seeder aggregator document
//!
//! The aggregator is the single seeder that imports and invokes every module
//! seeder. It is parsed once into a small structured model (a `use` list and
//! a call list surrounded by untouched text), mutated, and serialized back.
//! Duplicate detection works on the model, never on raw substrings.
//!
//! Recognised shape:
//!
//! ```text
//! <?php
//!
//! namespace Database\Seeders;      <- anchor 1
//!
//! use ...;                          <- use block
//!
//! class DatabaseSeeder extends Seeder
//! {
//!     public function run(): void
//!     {
//!         $this->call([             <- anchor 2
//!             ...                   <- call entries
//!         ]);
//!     }
//! }
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{Result, ToolkitError};

const CALL_OPEN: &str = "$this->call([";

/// Aggregator written when the host project has none yet
pub const DEFAULT_AGGREGATOR: &str = r"<?php

namespace Database\Seeders;

use Illuminate\Database\Seeder;

class DatabaseSeeder extends Seeder
{
    public function run(): void
    {
        $this->call([
        ]);
    }
}
";

/// What a splice changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpliceOutcome {
    /// A `use` entry was inserted
    pub use_added: bool,
    /// A call entry was inserted
    pub call_added: bool,
}

impl SpliceOutcome {
    /// Whether the document changed at all
    #[must_use]
    pub const fn changed(self) -> bool {
        self.use_added || self.call_added
    }
}

/// Structured model of the aggregator file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeederAggregator {
    head: Vec<String>,
    uses: Vec<String>,
    between: Vec<String>,
    call_indent: String,
    calls: Vec<String>,
    tail: Vec<String>,
    trailing_newline: bool,
}

impl SeederAggregator {
    /// Parse aggregator source text
    ///
    /// # Errors
    ///
    /// Returns [`ToolkitError::Aggregator`] when the namespace declaration or
    /// the `$this->call([` list cannot be found, or the list is never closed.
    pub fn parse(source: &str) -> Result<Self> {
        let lines: Vec<&str> = source.lines().collect();

        let namespace_idx = lines
            .iter()
            .position(|line| {
                let line = line.trim();
                line.starts_with("namespace ") && line.ends_with(';')
            })
            .ok_or_else(|| ToolkitError::Aggregator("namespace declaration not found".into()))?;

        let mut idx = namespace_idx + 1;
        while idx < lines.len() && lines[idx].trim().is_empty() {
            idx += 1;
        }
        let head = Self::owned(&lines[..idx]);

        let mut uses = Vec::new();
        while let Some(class) = lines.get(idx).and_then(|line| Self::use_target(line)) {
            uses.push(class.to_string());
            idx += 1;
        }

        let open_idx = (idx..lines.len())
            .find(|&i| lines[i].contains(CALL_OPEN))
            .ok_or_else(|| {
                ToolkitError::Aggregator(format!("'{CALL_OPEN}' call list not found"))
            })?;

        let open_line = lines[open_idx];
        let open_indent = Self::indent_of(open_line);
        let split_at = open_line.find(CALL_OPEN).unwrap_or(0) + CALL_OPEN.len();
        let (close_idx, close_col) = Self::find_close(&lines, open_idx, split_at)
            .ok_or_else(|| ToolkitError::Aggregator("call list is never closed".into()))?;

        let mut between = Self::owned(&lines[idx..open_idx]);
        between.push(open_line[..split_at].to_string());

        let mut calls = Vec::new();
        let mut tail = Vec::new();
        let mut call_indent = None;

        if close_idx == open_idx {
            // single-line list: `$this->call([A::class, B::class]);`
            calls.extend(Self::split_entries(&open_line[split_at..close_col]));
            tail.push(format!("{open_indent}{}", &open_line[close_col..]));
        } else {
            calls.extend(Self::split_entries(&open_line[split_at..]));
            for line in &lines[open_idx + 1..close_idx] {
                if !line.trim().is_empty() {
                    call_indent.get_or_insert_with(|| Self::indent_of(line).to_string());
                }
                calls.extend(Self::split_entries(line));
            }

            let close_line = lines[close_idx];
            let before_close = &close_line[..close_col];
            if before_close.trim().is_empty() {
                tail.push(close_line.to_string());
            } else {
                calls.extend(Self::split_entries(before_close));
                tail.push(format!("{open_indent}{}", &close_line[close_col..]));
            }
        }
        tail.extend(Self::owned(&lines[close_idx + 1..]));

        let call_indent = call_indent
            .filter(|_| !calls.is_empty())
            .unwrap_or_else(|| format!("{open_indent}    "));

        Ok(Self {
            head,
            uses,
            between,
            call_indent,
            calls,
            tail,
            trailing_newline: source.ends_with('\n'),
        })
    }

    /// Line and byte offset of the `]` closing a list whose body starts at
    /// `lines[line][col..]`
    ///
    /// Brackets inside quoted strings and after `//` are ignored.
    fn find_close(lines: &[&str], line: usize, col: usize) -> Option<(usize, usize)> {
        let mut depth = 1_usize;
        for (idx, text) in lines.iter().enumerate().skip(line) {
            let start = if idx == line { col } else { 0 };
            let mut quote: Option<char> = None;
            let mut escaped = false;
            let mut prev = ' ';
            for (offset, ch) in text[start..].char_indices() {
                if let Some(open) = quote {
                    if escaped {
                        escaped = false;
                    } else if ch == '\\' {
                        escaped = true;
                    } else if ch == open {
                        quote = None;
                    }
                } else {
                    match ch {
                        '\'' | '"' => quote = Some(ch),
                        '/' if prev == '/' => break,
                        '[' => depth += 1,
                        ']' => {
                            depth -= 1;
                            if depth == 0 {
                                return Some((idx, start + offset));
                            }
                        }
                        _ => {}
                    }
                }
                prev = ch;
            }
        }
        None
    }

    /// Split list text into entries at top-level commas
    ///
    /// Every entry followed by a comma keeps it. Comment lines are kept whole.
    fn split_entries(text: &str) -> Vec<String> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }
        if Self::is_comment(text) || text.contains("//") || text.contains("/*") {
            return vec![text.to_string()];
        }

        let mut entries = Vec::new();
        let mut depth = 0_usize;
        let mut quote: Option<char> = None;
        let mut start = 0;
        for (offset, ch) in text.char_indices() {
            if let Some(open) = quote {
                if ch == open {
                    quote = None;
                }
                continue;
            }
            match ch {
                '\'' | '"' => quote = Some(ch),
                '(' | '[' => depth += 1,
                ')' | ']' => depth = depth.saturating_sub(1),
                ',' if depth == 0 => {
                    let entry = text[start..offset].trim();
                    if !entry.is_empty() {
                        entries.push(format!("{entry},"));
                    }
                    start = offset + 1;
                }
                _ => {}
            }
        }

        let last = text[start..].trim();
        if !last.is_empty() {
            entries.push(last.to_string());
        }
        entries
    }

    fn is_comment(entry: &str) -> bool {
        ["//", "#", "/*", "*"]
            .iter()
            .any(|prefix| entry.starts_with(prefix))
    }

    fn owned(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|line| (*line).to_string()).collect()
    }

    fn indent_of(line: &str) -> &str {
        &line[..line.len() - line.trim_start().len()]
    }

    fn use_target(line: &str) -> Option<&str> {
        line.trim()
            .strip_prefix("use ")
            .and_then(|rest| rest.strip_suffix(';'))
            .map(str::trim)
    }

    /// Class referenced by a call entry, without leading separator
    fn call_target(entry: &str) -> Option<&str> {
        entry
            .trim_end_matches(',')
            .trim()
            .strip_suffix("::class")
            .map(|class| class.trim_start_matches('\\'))
    }

    /// Imported classes, in file order
    #[must_use]
    pub fn uses(&self) -> &[String] {
        &self.uses
    }

    /// Raw call entries, in file order
    #[must_use]
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    /// Whether `class` is already invoked, either fully qualified or through its import
    #[must_use]
    pub fn is_registered(&self, class: &str) -> bool {
        let class = class.trim_start_matches('\\');
        let short = class.rsplit('\\').next().unwrap_or(class);
        let imported = self.uses.iter().any(|u| u == class);

        self.calls
            .iter()
            .filter_map(|entry| Self::call_target(entry))
            .any(|target| target == class || (imported && target == short))
    }

    /// Import and register a seeder class
    ///
    /// Each insertion only happens when the model does not already contain it,
    /// so repeated calls are no-ops.
    pub fn add_seeder(&mut self, class: &str) -> SpliceOutcome {
        let class = class.trim_start_matches('\\');
        let mut outcome = SpliceOutcome::default();

        if !self.uses.iter().any(|u| u == class) {
            self.uses.push(class.to_string());
            outcome.use_added = true;
        }

        if !self.is_registered(class) {
            if let Some(last) = self
                .calls
                .iter_mut()
                .rev()
                .find(|entry| !Self::is_comment(entry))
            {
                if !last.ends_with(',') {
                    last.push(',');
                }
            }
            self.calls.push(format!("\\{class}::class,"));
            outcome.call_added = true;
        }

        outcome
    }
}

impl fmt::Display for SeederAggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines: Vec<String> = self.head.clone();
        lines.extend(self.uses.iter().map(|class| format!("use {class};")));
        if !self.uses.is_empty()
            && self.between.first().is_some_and(|line| !line.trim().is_empty())
        {
            lines.push(String::new());
        }
        lines.extend(self.between.iter().cloned());
        lines.extend(
            self.calls
                .iter()
                .map(|entry| format!("{}{entry}", self.call_indent)),
        );
        lines.extend(self.tail.iter().cloned());

        f.write_str(&lines.join("\n"))?;
        if self.trailing_newline {
            f.write_str("\n")?;
        }
        Ok(())
    }
}

/// Register `class` in the aggregator file at `path`
///
/// A missing aggregator is created from [`DEFAULT_AGGREGATOR`]. The file is
/// only rewritten when the document changed.
///
/// # Errors
///
/// Returns an error if the file cannot be read or written, or does not have
/// the recognised aggregator shape.
pub fn register_seeder(path: &Path, class: &str) -> Result<SpliceOutcome> {
    let source = if path.exists() {
        fs::read_to_string(path).map_err(|e| ToolkitError::filesystem(path, e))?
    } else {
        tracing::info!(path = %path.display(), "creating seeder aggregator");
        DEFAULT_AGGREGATOR.to_string()
    };

    let mut document = SeederAggregator::parse(&source)?;
    let outcome = document.add_seeder(class);

    if outcome.changed() || !path.exists() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ToolkitError::filesystem(parent, e))?;
        }
        fs::write(path, document.to_string()).map_err(|e| ToolkitError::filesystem(path, e))?;
    }

    tracing::debug!(
        class,
        use_added = outcome.use_added,
        call_added = outcome.call_added,
        "seeder aggregator updated"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEEDER: &str = "App\\Modules\\Billing\\Infrastructure\\Database\\Seeders\\InvoiceSeeder";

    const LARAVEL_AGGREGATOR: &str = r"<?php

namespace Database\Seeders;

use App\Models\User;
use Illuminate\Database\Seeder;

class DatabaseSeeder extends Seeder
{
    public function run(): void
    {
        $this->call([
            UserSeeder::class,
        ]);
    }
}
";

    #[test]
    fn test_parse_recognises_blocks() {
        let doc = SeederAggregator::parse(LARAVEL_AGGREGATOR).unwrap();
        assert_eq!(doc.uses(), ["App\\Models\\User", "Illuminate\\Database\\Seeder"]);
        assert_eq!(doc.calls(), ["UserSeeder::class,"]);
    }

    #[test]
    fn test_unchanged_document_serializes_identically() {
        let doc = SeederAggregator::parse(LARAVEL_AGGREGATOR).unwrap();
        assert_eq!(doc.to_string(), LARAVEL_AGGREGATOR);

        let doc = SeederAggregator::parse(DEFAULT_AGGREGATOR).unwrap();
        assert_eq!(doc.to_string(), DEFAULT_AGGREGATOR);
    }

    #[test]
    fn test_add_seeder_inserts_use_and_call() {
        let mut doc = SeederAggregator::parse(LARAVEL_AGGREGATOR).unwrap();
        let outcome = doc.add_seeder(SEEDER);

        assert!(outcome.use_added);
        assert!(outcome.call_added);

        let text = doc.to_string();
        assert!(text.contains(&format!("use Illuminate\\Database\\Seeder;\nuse {SEEDER};\n\nclass DatabaseSeeder")));
        assert!(text.contains(&format!("            UserSeeder::class,\n            \\{SEEDER}::class,\n        ]);")));
    }

    #[test]
    fn test_add_seeder_is_idempotent() {
        let mut doc = SeederAggregator::parse(LARAVEL_AGGREGATOR).unwrap();
        doc.add_seeder(SEEDER);
        let once = doc.to_string();

        let mut reparsed = SeederAggregator::parse(&once).unwrap();
        let outcome = reparsed.add_seeder(SEEDER);

        assert!(!outcome.changed());
        assert_eq!(reparsed.to_string(), once);
        assert_eq!(once.matches(&format!("use {SEEDER};")).count(), 1);
        assert_eq!(once.matches("InvoiceSeeder::class").count(), 1);
    }

    #[test]
    fn test_short_name_call_counts_as_registered() {
        let source = LARAVEL_AGGREGATOR.replace(
            "use Illuminate\\Database\\Seeder;",
            &format!("use Illuminate\\Database\\Seeder;\nuse {SEEDER};"),
        )
        .replace("UserSeeder::class,", "UserSeeder::class,\n            InvoiceSeeder::class,");

        let mut doc = SeederAggregator::parse(&source).unwrap();
        assert!(doc.is_registered(SEEDER));
        assert!(!doc.add_seeder(SEEDER).changed());
    }

    #[test]
    fn test_missing_trailing_comma_is_fixed() {
        let source = LARAVEL_AGGREGATOR.replace("UserSeeder::class,", "UserSeeder::class");
        let mut doc = SeederAggregator::parse(&source).unwrap();
        doc.add_seeder(SEEDER);

        assert_eq!(doc.calls()[0], "UserSeeder::class,");
    }

    #[test]
    fn test_inline_empty_call_list() {
        let source = DEFAULT_AGGREGATOR.replace("$this->call([\n        ]);", "$this->call([]);");
        let mut doc = SeederAggregator::parse(&source).unwrap();
        doc.add_seeder(SEEDER);

        let text = doc.to_string();
        assert!(text.contains(&format!("        $this->call([\n            \\{SEEDER}::class,\n        ]);")));
    }

    #[test]
    fn test_single_line_list_followed_by_array() {
        let source = LARAVEL_AGGREGATOR.replace(
            "        $this->call([\n            UserSeeder::class,\n        ]);\n",
            "        $this->call([UserSeeder::class]);\n        $x = [\n            1,\n        ];\n",
        );
        let mut doc = SeederAggregator::parse(&source).unwrap();
        assert_eq!(doc.calls(), ["UserSeeder::class"]);

        doc.add_seeder(SEEDER);
        let text = doc.to_string();

        assert!(text.contains(&format!(
            "        $this->call([\n            UserSeeder::class,\n            \\{SEEDER}::class,\n        ]);\n        $x = [\n            1,\n        ];\n"
        )));
        assert_eq!(text.matches("InvoiceSeeder::class").count(), 1);
    }

    #[test]
    fn test_single_line_list_with_several_entries() {
        let source = LARAVEL_AGGREGATOR.replace(
            "        $this->call([\n            UserSeeder::class,\n        ]);",
            &format!("        $this->call([UserSeeder::class, \\{SEEDER}::class]);"),
        );
        let mut doc = SeederAggregator::parse(&source).unwrap();

        assert_eq!(doc.calls(), ["UserSeeder::class,".to_string(), format!("\\{SEEDER}::class")]);
        assert!(doc.is_registered(SEEDER));
        assert!(!doc.add_seeder(SEEDER).call_added);
    }

    #[test]
    fn test_brackets_in_comments_do_not_close_list() {
        let source = LARAVEL_AGGREGATOR.replace(
            "            UserSeeder::class,\n",
            "            // ]\n            UserSeeder::class,\n",
        );
        let mut doc = SeederAggregator::parse(&source).unwrap();
        assert_eq!(doc.calls(), ["// ]", "UserSeeder::class,"]);

        doc.add_seeder(SEEDER);
        assert!(doc
            .to_string()
            .contains(&format!("            UserSeeder::class,\n            \\{SEEDER}::class,\n        ]);")));
    }

    #[test]
    fn test_aggregator_without_use_block() {
        let source = DEFAULT_AGGREGATOR.replace("use Illuminate\\Database\\Seeder;\n\n", "");
        let mut doc = SeederAggregator::parse(&source).unwrap();
        doc.add_seeder(SEEDER);

        let text = doc.to_string();
        assert!(text.contains(&format!("namespace Database\\Seeders;\n\nuse {SEEDER};\n\nclass DatabaseSeeder")));
    }

    #[test]
    fn test_unrecognised_shape_is_error() {
        assert!(SeederAggregator::parse("<?php\nclass Foo {}\n").is_err());
        assert!(SeederAggregator::parse("<?php\nnamespace A;\nclass Foo {}\n").is_err());
        assert!(SeederAggregator::parse("<?php\nnamespace A;\n$this->call([\n  A::class,\n").is_err());
    }

    #[test]
    fn test_register_seeder_creates_missing_aggregator() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database/seeders/DatabaseSeeder.php");

        let first = register_seeder(&path, SEEDER).unwrap();
        assert!(first.changed());

        let second = register_seeder(&path, SEEDER).unwrap();
        assert!(!second.changed());

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.matches(&format!("use {SEEDER};")).count(), 1);
        assert_eq!(text.matches(&format!("\\{SEEDER}::class,")).count(), 1);
    }
}
