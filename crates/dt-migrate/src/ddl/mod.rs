//! Embedded DDL for the installer's own metadata tables.
//!
//! Each step is a numbered `.sql` file embedded via `include_str!` and
//! applied by [`crate::migration::run_meta_migrations`].

/// A single metadata DDL step.
pub struct MetaMigration {
    /// Sequential version number (1-based).
    pub version: i32,
    /// Raw SQL to execute.
    pub sql: &'static str,
}

/// All known metadata steps, in order.
pub static META_MIGRATIONS: &[MetaMigration] = &[MetaMigration {
    version: 1,
    sql: include_str!("v001_setup_module.sql"),
}];
