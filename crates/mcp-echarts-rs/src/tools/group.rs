use std::collections::{BTreeSet, HashMap};

pub(crate) const DEFAULT_GROUP: &str = "Default";

/// True when at least one record carries a non-empty group name.
pub(crate) fn has_groups<'a>(groups: impl IntoIterator<Item = Option<&'a str>>) -> bool {
    groups.into_iter().any(|g| g.is_some_and(|g| !g.is_empty()))
}

pub(crate) fn group_name(group: Option<&str>) -> &str {
    match group {
        Some(g) if !g.is_empty() => g,
        _ => DEFAULT_GROUP,
    }
}

/// Flat `(group, category, value)` records split into one value table per group.
pub(crate) struct Grouped {
    /// Sorted union of every category seen in any group.
    pub categories: Vec<String>,
    /// Groups in first-seen order; a repeated category keeps its last value.
    pub groups: Vec<(String, HashMap<String, f64>)>,
}

impl Grouped {
    pub fn split<'a>(records: impl IntoIterator<Item = (Option<&'a str>, &'a str, f64)>) -> Self {
        let mut categories = BTreeSet::new();
        let mut groups: Vec<(String, HashMap<String, f64>)> = Vec::new();

        for (group, category, value) in records {
            let name = group_name(group);
            let idx = match groups.iter().position(|(g, _)| g == name) {
                Some(idx) => idx,
                None => {
                    groups.push((name.to_string(), HashMap::new()));
                    groups.len() - 1
                }
            };
            groups[idx].1.insert(category.to_string(), value);
            categories.insert(category.to_string());
        }

        Self {
            categories: categories.into_iter().collect(),
            groups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_in_first_seen_order_with_sorted_categories() {
        let grouped = Grouped::split([
            (Some("B"), "Y", 1.0),
            (Some("A"), "X", 2.0),
            (None, "Z", 3.0),
            (Some("B"), "Y", 4.0),
        ]);

        assert_eq!(grouped.categories, vec!["X", "Y", "Z"]);
        let names: Vec<_> = grouped.groups.iter().map(|(g, _)| g.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "Default"]);
        assert_eq!(grouped.groups[0].1["Y"], 4.0);
    }

    #[test]
    fn empty_group_names_do_not_count() {
        assert!(!has_groups([None, Some("")]));
        assert!(has_groups([None, Some("g")]));
    }
}
