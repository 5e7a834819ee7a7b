//! Redb table naming.
//!
//! Every logical table is stored in its own redb table. Physical names carry
//! a fixed prefix so they cannot collide with tables other code keeps in the
//! same database file.

use redb::TableDefinition;

/// Prefix of every physical table name.
pub const TABLE_PREFIX: &str = "sessionkv:";

/// Definition of a table holding expiry-tagged entries.
pub type EntryTable<'a> = TableDefinition<'a, &'static [u8], &'static [u8]>;

/// The physical redb table name for a logical table.
pub fn physical_name(table: &str) -> String {
    format!("{TABLE_PREFIX}{table}")
}

/// The table definition for a physical name produced by [`physical_name`].
pub const fn definition(name: &str) -> EntryTable<'_> {
    TableDefinition::new(name)
}
