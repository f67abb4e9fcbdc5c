//! Per-build SQL alias allocation.

/// Mints table aliases that are unique within one compiled statement.
///
/// Aliases are `<table>_<n>` with one counter shared by every table, so a
/// type that appears several times in a chain (`category.subcategories`)
/// never collides with itself.
#[derive(Debug, Default)]
pub struct AliasArena {
    counter: usize,
}

impl AliasArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh alias for `table`.
    pub fn fresh(&mut self, table: &str) -> String {
        self.counter += 1;
        format!("{}_{}", table, self.counter)
    }

    /// Number of aliases minted so far.
    pub fn minted(&self) -> usize {
        self.counter
    }
}
