//! In-memory page: the standard [`Page`] implementation.
//!
//! Regions live in insertion (document) order so group queries are
//! deterministic. Used by the terminal front end, the scenario runner and
//! every test.

#![allow(missing_docs)]

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::Page;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Region {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub styles: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryPage {
    regions: Vec<Region>,
    index: HashMap<String, usize>,
}

impl MemoryPage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a region. Returns `false` when the id is taken or the named
    /// parent does not exist.
    pub fn insert(&mut self, parent: Option<&str>, id: &str, groups: &[&str]) -> bool {
        if self.index.contains_key(id) {
            return false;
        }
        if let Some(p) = parent
            && !self.index.contains_key(p)
        {
            return false;
        }
        self.index.insert(id.to_string(), self.regions.len());
        self.regions.push(Region {
            id: id.to_string(),
            parent: parent.map(str::to_string),
            groups: groups.iter().map(|g| (*g).to_string()).collect(),
            ..Region::default()
        });
        true
    }

    /// Builder-style [`insert`](Self::insert) for layout code.
    #[must_use]
    pub fn with(mut self, parent: Option<&str>, id: &str, groups: &[&str]) -> Self {
        self.insert(parent, id, groups);
        self
    }

    /// Remove a region and all its descendants.
    pub fn remove(&mut self, id: &str) {
        if !self.index.contains_key(id) {
            return;
        }
        let mut doomed = vec![id.to_string()];
        let mut i = 0;
        while i < doomed.len() {
            let current = doomed[i].clone();
            doomed.extend(
                self.regions
                    .iter()
                    .filter(|r| r.parent.as_deref() == Some(current.as_str()))
                    .map(|r| r.id.clone()),
            );
            i += 1;
        }
        self.regions.retain(|r| !doomed.contains(&r.id));
        self.reindex();
    }

    #[must_use]
    pub fn region(&self, id: &str) -> Option<&Region> {
        self.index.get(id).map(|&i| &self.regions[i])
    }

    /// Direct children of `id`, in document order.
    #[must_use]
    pub fn children(&self, id: &str) -> Vec<String> {
        self.regions
            .iter()
            .filter(|r| r.parent.as_deref() == Some(id))
            .map(|r| r.id.clone())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    fn region_mut(&mut self, id: &str) -> Option<&mut Region> {
        self.index.get(id).map(|&i| &mut self.regions[i])
    }

    fn reindex(&mut self) {
        self.index = self
            .regions
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();
    }
}

impl Page for MemoryPage {
    fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    fn members(&self, group: &str) -> Vec<String> {
        self.regions
            .iter()
            .filter(|r| r.groups.iter().any(|g| g == group))
            .map(|r| r.id.clone())
            .collect()
    }

    fn parent(&self, id: &str) -> Option<String> {
        self.region(id).and_then(|r| r.parent.clone())
    }

    fn add_class(&mut self, id: &str, class: &str) {
        if let Some(r) = self.region_mut(id)
            && !r.classes.iter().any(|c| c == class)
        {
            r.classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, id: &str, class: &str) {
        if let Some(r) = self.region_mut(id) {
            r.classes.retain(|c| c != class);
        }
    }

    fn has_class(&self, id: &str, class: &str) -> bool {
        self.region(id)
            .is_some_and(|r| r.classes.iter().any(|c| c == class))
    }

    fn set_class_list(&mut self, id: &str, classes: &[&str]) {
        if let Some(r) = self.region_mut(id) {
            r.classes.clear();
            for class in classes {
                if !r.classes.iter().any(|c| c == class) {
                    r.classes.push((*class).to_string());
                }
            }
        }
    }

    fn set_text(&mut self, id: &str, text: &str) {
        if let Some(r) = self.region_mut(id) {
            r.text = text.to_string();
        }
    }

    fn text(&self, id: &str) -> Option<String> {
        self.region(id).map(|r| r.text.clone())
    }

    fn set_style(&mut self, id: &str, property: &str, value: &str) {
        if let Some(r) = self.region_mut(id) {
            r.styles.insert(property.to_string(), value.to_string());
        }
    }

    fn style(&self, id: &str, property: &str) -> Option<String> {
        self.region(id).and_then(|r| r.styles.get(property).cloned())
    }

    fn set_disabled(&mut self, id: &str, disabled: bool) {
        if let Some(r) = self.region_mut(id) {
            r.disabled = disabled;
        }
    }

    fn is_disabled(&self, id: &str) -> bool {
        self.region(id).is_some_and(|r| r.disabled)
    }

    fn append(&mut self, parent: &str, id: &str, groups: &[&str]) {
        self.insert(Some(parent), id, groups);
    }
}
