//! TOML-file-backed stylus database provider.
//!
//! The file is a flat list of tablet and stylus records:
//!
//! ```toml
//! [[tablet]]
//! vendor = 1386        # 0x056a
//! product = 222        # 0x00de
//! name = "Wacom Intuos5 touch M"
//! reversible = true
//!
//! [[stylus]]
//! id = 2050            # 0x802
//! name = "Grip Pen"
//! buttons = 2
//! kind = "general"
//! ```
//!
//! The whole file is parsed once at startup; lookups afterwards are in-memory
//! map hits and cannot fail.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::{DatabaseError, StylusDatabase, StylusEntry, TabletEntry};

/// On-disk schema: the raw records before indexing.
#[derive(Debug, Deserialize)]
struct DatabaseFile {
    #[serde(default, rename = "tablet")]
    tablets: Vec<TabletRecord>,
    #[serde(default, rename = "stylus")]
    styli: Vec<StylusRecord>,
}

#[derive(Debug, Deserialize)]
struct TabletRecord {
    vendor: u16,
    product: u16,
    #[serde(flatten)]
    entry: TabletEntry,
}

#[derive(Debug, Deserialize)]
struct StylusRecord {
    id: u32,
    #[serde(flatten)]
    entry: StylusEntry,
}

/// A [`StylusDatabase`] loaded from a TOML description file.
#[derive(Debug, Default)]
pub struct TomlStylusDatabase {
    tablets: HashMap<(u16, u16), TabletEntry>,
    styli: HashMap<u32, StylusEntry>,
}

impl TomlStylusDatabase {
    /// Loads and indexes a database file.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::Io`] if the file cannot be read and
    /// [`DatabaseError::Parse`] if it is not valid database TOML.
    pub fn load(path: &Path) -> Result<TomlStylusDatabase, DatabaseError> {
        let text = std::fs::read_to_string(path).map_err(|source| DatabaseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parses database TOML from a string. Used by `load` and by tests.
    pub fn parse(text: &str) -> Result<TomlStylusDatabase, DatabaseError> {
        let file: DatabaseFile = toml::from_str(text)?;

        let tablets = file
            .tablets
            .into_iter()
            .map(|record| ((record.vendor, record.product), record.entry))
            .collect();
        let styli = file
            .styli
            .into_iter()
            .map(|record| (record.id, record.entry))
            .collect();

        Ok(TomlStylusDatabase { tablets, styli })
    }

    /// Number of stylus records in the database.
    pub fn stylus_count(&self) -> usize {
        self.styli.len()
    }
}

impl StylusDatabase for TomlStylusDatabase {
    fn lookup_tablet(
        &self,
        vendor: u16,
        product: u16,
    ) -> Result<Option<TabletEntry>, DatabaseError> {
        Ok(self.tablets.get(&(vendor, product)).cloned())
    }

    fn lookup_stylus(&self, tool_id: u32) -> Result<Option<StylusEntry>, DatabaseError> {
        Ok(self.styli.get(&tool_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::StylusKind;

    const SAMPLE: &str = r#"
        [[tablet]]
        vendor = 1386
        product = 222
        name = "Wacom Intuos5 touch M"
        reversible = true

        [[tablet]]
        vendor = 1386
        product = 48
        name = "Wacom Graphire"
        reversible = false

        [[stylus]]
        id = 2050
        name = "Grip Pen"
        buttons = 2
        kind = "general"

        [[stylus]]
        id = 2181
        name = "Lens Cursor"
        buttons = 4
        kind = "puck"
    "#;

    #[test]
    fn test_parse_indexes_tablets_and_styli() {
        let db = TomlStylusDatabase::parse(SAMPLE).expect("sample must parse");

        let tablet = db.lookup_tablet(1386, 222).unwrap().expect("known tablet");
        assert_eq!(tablet.name, "Wacom Intuos5 touch M");
        assert!(tablet.reversible);

        let stylus = db.lookup_stylus(2050).unwrap().expect("known stylus");
        assert_eq!(stylus.buttons, 2);
        assert_eq!(stylus.kind, StylusKind::General);
        assert_eq!(db.stylus_count(), 2);
    }

    #[test]
    fn test_unknown_models_are_misses_not_errors() {
        let db = TomlStylusDatabase::parse(SAMPLE).unwrap();

        assert!(db.lookup_tablet(0xdead, 0xbeef).unwrap().is_none());
        assert!(db.lookup_stylus(0xffff).unwrap().is_none());
    }

    #[test]
    fn test_empty_file_is_a_valid_empty_database() {
        let db = TomlStylusDatabase::parse("").unwrap();
        assert_eq!(db.stylus_count(), 0);
        assert!(db.lookup_stylus(1).unwrap().is_none());
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let result = TomlStylusDatabase::parse("[[stylus]]\nid = \"not a number\"");
        assert!(matches!(result, Err(DatabaseError::Parse(_))));
    }
}
