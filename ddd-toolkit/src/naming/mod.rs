//! Module specifier parsing
//!
//! A module specifier has the grammar `Module[:[subdir/...]Name]`:
//!
//! | specifier | module | sub-directories | file name |
//! |---|---|---|---|
//! | `billing` | `Billing` | (none) | `Billing` |
//! | `Billing:Invoice` | `Billing` | (none) | `Invoice` |
//! | `Billing:invoices/line_item` | `Billing` | `Invoices` | `LineItem` |
//!
//! Every segment is normalized to studly case. Sub-directories are kept as
//! one ordered sequence and rendered both as a filesystem path and as a
//! namespace suffix, so the two never diverge.

mod inflect;

pub use inflect::Inflect;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Result, ToolkitError};

/// Separator between path segments of a namespace
pub const NAMESPACE_SEPARATOR: char = '\\';

/// Parsed module specifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleSpec {
    module_name: String,
    sub_dir: Vec<String>,
    file_name: String,
}

impl ModuleSpec {
    /// Parse a module specifier
    ///
    /// # Errors
    ///
    /// Returns [`ToolkitError::Usage`] when the module name, the file name or
    /// any sub-directory segment is empty (e.g. `"Billing:"`).
    ///
    /// # Examples
    ///
    /// ```
    /// use ddd_toolkit::naming::ModuleSpec;
    ///
    /// let spec = ModuleSpec::parse("Billing:Invoices/LineItem").unwrap();
    /// assert_eq!(spec.module_name(), "Billing");
    /// assert_eq!(spec.sub_dir(), ["Invoices"]);
    /// assert_eq!(spec.file_name(), "LineItem");
    /// ```
    pub fn parse(spec: &str) -> Result<Self> {
        let spec = spec.trim();

        let Some((module, file_part)) = spec.split_once(':') else {
            let module_name = Self::segment(spec, "module name", spec)?;
            return Ok(Self {
                file_name: module_name.clone(),
                module_name,
                sub_dir: Vec::new(),
            });
        };

        let module_name = Self::segment(module, "module name", spec)?;

        let mut parts: Vec<&str> = file_part.split('/').collect();
        let file = parts.pop().unwrap_or_default();
        let file_name = Self::segment(file, "file name", spec)?;
        let sub_dir = parts
            .into_iter()
            .map(|part| Self::segment(part, "sub-directory", spec))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            module_name,
            sub_dir,
            file_name,
        })
    }

    /// Build a spec from already-separated parts
    ///
    /// # Errors
    ///
    /// Returns [`ToolkitError::Usage`] when any segment is empty.
    pub fn from_parts<S: AsRef<str>>(module: &str, sub_dir: &[S], file: &str) -> Result<Self> {
        let whole = format!("{module}:{file}");
        Ok(Self {
            module_name: Self::segment(module, "module name", &whole)?,
            sub_dir: sub_dir
                .iter()
                .map(|part| Self::segment(part.as_ref(), "sub-directory", &whole))
                .collect::<Result<Vec<_>>>()?,
            file_name: Self::segment(file, "file name", &whole)?,
        })
    }

    fn segment(raw: &str, what: &str, spec: &str) -> Result<String> {
        let normalized = Inflect::studly(raw.trim());
        if normalized.is_empty() {
            return Err(ToolkitError::usage(format!(
                "Empty {what} in module specifier '{spec}' (expected Module[:[subdir/...]Name])"
            )));
        }
        Ok(normalized)
    }

    /// Module name (studly case)
    #[must_use]
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// Sub-directory segments (studly case), possibly empty
    #[must_use]
    pub fn sub_dir(&self) -> &[String] {
        &self.sub_dir
    }

    /// File base name (studly case)
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Sub-directories joined as a relative filesystem path
    #[must_use]
    pub fn sub_dir_path(&self) -> PathBuf {
        self.sub_dir.iter().collect()
    }

    /// Sub-directories joined as a namespace suffix (no leading separator)
    #[must_use]
    pub fn sub_namespace(&self) -> String {
        self.sub_dir.join(&NAMESPACE_SEPARATOR.to_string())
    }
}

impl FromStr for ModuleSpec {
    type Err = ToolkitError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ModuleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.module_name)?;
        for dir in &self.sub_dir {
            write!(f, "{dir}/")?;
        }
        write!(f, "{}", self.file_name)
    }
}
