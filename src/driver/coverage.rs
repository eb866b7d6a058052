//! Coverage reconciliation
//!
//! Compares the device's command listing with what a run exercised.

use super::command::is_getter;
use super::discovery::CommandListing;

/// Commands the device offers that were neither exercised nor whitelisted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Coverage {
    pub untested_regular: Vec<String>,
    pub untested_get_set: Vec<String>,
}

impl Coverage {
    /// Strike exercised and whitelisted commands off `listing`
    ///
    /// Names starting with `GET` are looked up in the GET/SET list first,
    /// everything else in the regular list first. Exercising a command twice,
    /// or whitelisting one the device does not list, is fine.
    pub fn reconcile<'a, E, W>(listing: CommandListing, exercised: E, whitelist: W) -> Self
    where
        E: IntoIterator<Item = &'a str>,
        W: IntoIterator<Item = &'a str>,
    {
        let mut coverage = Coverage {
            untested_regular: listing.regular,
            untested_get_set: listing.get_set,
        };

        for command in exercised.into_iter().chain(whitelist) {
            coverage.strike(command);
        }

        coverage
    }

    pub fn is_complete(&self) -> bool {
        self.untested_regular.is_empty() && self.untested_get_set.is_empty()
    }

    /// Warn about every untested command
    pub fn log_warnings(&self) {
        if !self.untested_regular.is_empty() {
            tracing::warn!("{} untested regular commands:", self.untested_regular.len());
            tracing::warn!("{:?}", self.untested_regular);
        }
        if !self.untested_get_set.is_empty() {
            tracing::warn!("{} untested GET/SET commands:", self.untested_get_set.len());
            tracing::warn!("{:?}", self.untested_get_set);
        }
    }

    fn strike(&mut self, command: &str) -> bool {
        let (first, second) = if is_getter(command) {
            (&mut self.untested_get_set, &mut self.untested_regular)
        } else {
            (&mut self.untested_regular, &mut self.untested_get_set)
        };
        remove_name(first, command) || remove_name(second, command)
    }
}

fn remove_name(list: &mut Vec<String>, name: &str) -> bool {
    let before = list.len();
    list.retain(|c| c != name);
    list.len() != before
}
