//! Test case names
//!
//! Test runners want one unique identifier per test case, but a plan may run
//! the same command line more than once.

use std::collections::HashSet;

use crate::driver::CommandSpec;

/// Hands out unique test case names for one run
#[derive(Debug, Default)]
pub struct TestNameRegistry {
    taken: HashSet<String>,
}

impl TestNameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `test_<command line>` with spaces as underscores, `_again` appended
    /// until the name is unused
    pub fn register(&mut self, spec: &CommandSpec) -> String {
        let mut name = format!("test_{}", spec.command_line()).replace(' ', "_");
        while self.taken.contains(&name) {
            name.push_str("_again");
        }
        self.taken.insert(name.clone());
        name
    }

    pub fn len(&self) -> usize {
        self.taken.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }
}
