//! Manually fixed counts for individual buildings, keyed by prefab name.
//! An override always wins over any pack calculation.

use std::collections::HashMap;

use crate::config::MAX_COMPUTED;

/// Building name -> fixed count. Zero means "no override".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideTable {
    values: HashMap<String, u32>,
}

impl OverrideTable {
    /// The override for `name`, or 0 if none.
    pub fn get(&self, name: &str) -> u32 {
        self.values.get(name).copied().unwrap_or(0)
    }

    pub fn lookup(&self, name: &str) -> Option<u32> {
        self.values.get(name).copied()
    }

    /// Set an override; 0 clears it. Values are capped below the host
    /// sentinel.
    pub fn set(&mut self, name: &str, value: u32) {
        if value == 0 {
            self.values.remove(name);
        } else {
            self.values.insert(name.to_string(), value.min(MAX_COMPUTED));
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entries sorted by name.
    pub fn entries(&self) -> Vec<(String, u32)> {
        let mut entries: Vec<_> = self
            .values
            .iter()
            .map(|(name, &value)| (name.clone(), value))
            .collect();
        entries.sort();
        entries
    }

    pub fn from_entries(entries: &[(String, u32)]) -> Self {
        let mut table = Self::default();
        for (name, value) in entries {
            table.set(name, *value);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HOST_NATIVE;

    #[test]
    fn test_unset_is_zero() {
        let table = OverrideTable::default();
        assert_eq!(table.get("H1 2x2 Sweden01"), 0);
        assert_eq!(table.lookup("H1 2x2 Sweden01"), None);
    }

    #[test]
    fn test_set_get_clear() {
        let mut table = OverrideTable::default();
        table.set("tower", 250);
        assert_eq!(table.get("tower"), 250);
        assert_eq!(table.len(), 1);
        table.set("tower", 0);
        assert!(table.is_empty());
    }

    #[test]
    fn test_override_never_equals_sentinel() {
        let mut table = OverrideTable::default();
        table.set("huge", HOST_NATIVE);
        assert_eq!(table.get("huge"), MAX_COMPUTED);
    }

    #[test]
    fn test_entries_sorted_and_roundtrip() {
        let mut table = OverrideTable::default();
        table.set("b", 2);
        table.set("a", 1);
        let entries = table.entries();
        assert_eq!(entries, vec![("a".to_string(), 1), ("b".to_string(), 2)]);
        assert_eq!(OverrideTable::from_entries(&entries), table);
    }
}
