//! Column-modification migrations
//!
//! Builds the `up`/`down` statement pairs of a migration that alters an
//! existing table. Each supplied operation contributes one line to `up` and
//! its inverse to `down`:
//!
//! | operation | up | down |
//! |---|---|---|
//! | add `c` | nullable string column `c` | drop `c` |
//! | rename `o:n` | rename `o` to `n` | rename `n` to `o` |
//! | drop `c` | drop `c` | nullable string column `c` |
//! | modify `c` | change `c` to text | change `c` to string |
//!
//! The inverse of a drop cannot know the original column type, so it always
//! re-adds a nullable string column. Nothing here inspects a live schema.

use crate::error::{Result, ToolkitError};
use crate::naming::Inflect;

/// Column operations requested for one migration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnOperations {
    /// Column to add
    pub add: Option<String>,
    /// Column to rename, as `OLD:NEW`
    pub rename: Option<String>,
    /// Column to drop
    pub drop: Option<String>,
    /// Column to widen from string to text
    pub modify: Option<String>,
}

impl ColumnOperations {
    /// Whether no operation was supplied
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.add.is_none() && self.rename.is_none() && self.drop.is_none() && self.modify.is_none()
    }
}

/// A table-modifying migration ready to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationEdit {
    /// Table being altered
    pub table_name: String,
    /// Statements of the `up` step, in add/rename/drop/modify order
    pub up_statements: Vec<String>,
    /// Statements of the `down` step, in the same order as `up`
    pub down_statements: Vec<String>,
    /// Migration name, e.g. `add_phone_number_to_users_table`
    pub class_name: String,
}

impl MigrationEdit {
    /// Build a migration from column operations
    ///
    /// # Errors
    ///
    /// Returns [`ToolkitError::Usage`] when no operation is supplied, the
    /// table name is empty, or `rename` is not of the form `OLD:NEW`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ddd_toolkit::migration::{ColumnOperations, MigrationEdit};
    ///
    /// let edit = MigrationEdit::build("users", &ColumnOperations {
    ///     add: Some("phone_number".into()),
    ///     ..Default::default()
    /// }).unwrap();
    ///
    /// assert_eq!(edit.class_name, "add_phone_number_to_users_table");
    /// assert_eq!(edit.up_statements, ["$table->string('phone_number')->nullable();"]);
    /// assert_eq!(edit.down_statements, ["$table->dropColumn('phone_number');"]);
    /// ```
    pub fn build(table: &str, ops: &ColumnOperations) -> Result<Self> {
        if ops.is_empty() {
            return Err(ToolkitError::usage(
                "At least one option is required: --add-column, --rename-column, --drop-column or --modify-column",
            ));
        }

        let table_name = table.trim().to_string();
        if table_name.is_empty() {
            return Err(ToolkitError::usage("Table name must not be empty"));
        }

        let mut actions = Vec::new();
        let mut up_statements = Vec::new();
        let mut down_statements = Vec::new();

        if let Some(column) = ops.add.as_deref() {
            let column = Self::column(column, "--add-column")?;
            actions.push(format!("add_{column}_to"));
            up_statements.push(format!("$table->string('{column}')->nullable();"));
            down_statements.push(format!("$table->dropColumn('{column}');"));
        }

        if let Some(rename) = ops.rename.as_deref() {
            let (old, new) = Self::rename_pair(rename)?;
            actions.push("rename_column_in".to_string());
            up_statements.push(format!("$table->renameColumn('{old}', '{new}');"));
            down_statements.push(format!("$table->renameColumn('{new}', '{old}');"));
        }

        if let Some(column) = ops.drop.as_deref() {
            let column = Self::column(column, "--drop-column")?;
            actions.push(format!("drop_{column}_from"));
            up_statements.push(format!("$table->dropColumn('{column}');"));
            down_statements.push(format!("$table->string('{column}')->nullable();"));
        }

        if let Some(column) = ops.modify.as_deref() {
            let column = Self::column(column, "--modify-column")?;
            actions.push(format!("modify_{column}_in"));
            up_statements.push(format!("$table->text('{column}')->change();"));
            down_statements.push(format!("$table->string('{column}')->change();"));
        }

        let class_name = format!("{}_{table_name}_table", actions.join("_and_"));

        Ok(Self {
            table_name,
            up_statements,
            down_statements,
            class_name,
        })
    }

    fn column(raw: &str, option: &str) -> Result<String> {
        let column = Inflect::snake(raw.trim());
        if column.is_empty() {
            return Err(ToolkitError::usage(format!("{option} needs a column name")));
        }
        Ok(column)
    }

    fn rename_pair(raw: &str) -> Result<(String, String)> {
        let parts: Vec<&str> = raw.split(':').collect();
        match parts.as_slice() {
            [old, new] if !old.trim().is_empty() && !new.trim().is_empty() => Ok((
                Inflect::snake(old.trim()),
                Inflect::snake(new.trim()),
            )),
            _ => Err(ToolkitError::usage(format!(
                "Invalid --rename-column value '{raw}'. Expected 'old_name:new_name'"
            ))),
        }
    }

    /// File stem for a given migration timestamp (`Y_m_d_His`)
    #[must_use]
    pub fn file_stem(&self, timestamp: &str) -> String {
        format!("{timestamp}_{}", self.class_name)
    }
}
