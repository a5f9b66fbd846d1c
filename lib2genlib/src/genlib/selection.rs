// SPDX-License-Identifier: Apache-2.0

//! Allow-list of cell-name patterns that override a library's `dont_use`.

use regex::Regex;

#[derive(Debug, Clone, Default)]
pub struct SelectionPolicy {
    patterns: Vec<Regex>,
}

impl SelectionPolicy {
    /// Compiles the given patterns. Each pattern must match at the start of a
    /// cell name but need not consume all of it.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(&format!("^(?:{})", p.as_ref())))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Builds a policy from comma-separated pattern lists, as given by
    /// repeated `--always-use` flags. Empty entries are skipped.
    pub fn from_pattern_lists<S: AsRef<str>>(lists: &[S]) -> Result<Self, regex::Error> {
        let patterns: Vec<&str> = flatten_pattern_lists(lists);
        Self::new(&patterns)
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_allowed(&self, cell_name: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(cell_name))
    }
}

pub fn flatten_pattern_lists<S: AsRef<str>>(lists: &[S]) -> Vec<&str> {
    lists
        .iter()
        .flat_map(|list| list.as_ref().split(','))
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_policy_allows_nothing() {
        let policy = SelectionPolicy::default();
        assert!(policy.is_empty());
        assert!(!policy.is_allowed("INV_X1"));
        assert!(!policy.is_allowed(""));
    }

    #[test]
    fn test_match_is_anchored_at_start_only() {
        let policy = SelectionPolicy::new(&["INV"]).unwrap();
        assert!(policy.is_allowed("INV"));
        assert!(policy.is_allowed("INV_X4"));
        assert!(!policy.is_allowed("XINV"));
    }

    #[test]
    fn test_alternation_stays_anchored() {
        let policy = SelectionPolicy::new(&["BUF|INV"]).unwrap();
        assert!(policy.is_allowed("BUF_X1"));
        assert!(policy.is_allowed("INV_X1"));
        assert!(!policy.is_allowed("CLKINV_X1"));
    }

    #[test]
    fn test_pattern_lists_are_flattened() {
        let lists = vec!["BUF.*,TIE(HI|LO)".to_string(), " NAND2_X1 ,".to_string()];
        assert_eq!(
            flatten_pattern_lists(&lists),
            vec!["BUF.*", "TIE(HI|LO)", "NAND2_X1"]
        );
        let policy = SelectionPolicy::from_pattern_lists(&lists).unwrap();
        assert_eq!(policy.len(), 3);
        assert!(policy.is_allowed("TIEHI"));
        assert!(policy.is_allowed("NAND2_X1"));
        assert!(!policy.is_allowed("NAND3_X1"));
    }

    #[test]
    fn test_invalid_pattern_is_error() {
        assert!(SelectionPolicy::new(&["(unclosed"]).is_err());
    }
}
