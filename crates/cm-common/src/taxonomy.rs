use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Issue -> category lookup together with its inverse.
///
/// Built once from the (static) taxonomy and shared read-only between
/// scoring calls, typically behind an `Arc`. Category fallback only ever
/// walks the issues of one category, never the whole taxonomy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryIndex {
    issue_to_category: HashMap<String, String>,
    category_to_issues: BTreeMap<String, BTreeSet<String>>,
}

impl CategoryIndex {
    /// Later assignments for the same issue replace earlier ones.
    pub fn from_taxonomy<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut index = Self::default();
        for (issue, category) in pairs {
            index.assign(issue.into(), category.into());
        }
        index
    }

    fn assign(&mut self, issue: String, category: String) {
        if let Some(previous) = self.issue_to_category.insert(issue.clone(), category.clone()) {
            if previous == category {
                return;
            }
            if let Some(members) = self.category_to_issues.get_mut(&previous) {
                members.remove(&issue);
                if members.is_empty() {
                    self.category_to_issues.remove(&previous);
                }
            }
        }

        self.category_to_issues
            .entry(category)
            .or_default()
            .insert(issue);
    }

    pub fn category_of(&self, issue: &str) -> Option<&str> {
        self.issue_to_category.get(issue).map(String::as_str)
    }

    /// Issues filed under `category`, in stable (sorted) order.
    pub fn issues_in<'a>(&'a self, category: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.category_to_issues
            .get(category)
            .into_iter()
            .flat_map(|members| members.iter().map(String::as_str))
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.category_to_issues.keys().map(String::as_str)
    }

    pub fn issue_count(&self) -> usize {
        self.issue_to_category.len()
    }

    pub fn category_count(&self) -> usize {
        self.category_to_issues.len()
    }
}

impl<K, V> FromIterator<(K, V)> for CategoryIndex
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_taxonomy(iter)
    }
}
