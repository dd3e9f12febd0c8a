//! The page boundary: named visual regions the interactive layer writes to.
//!
//! Everything that renders goes through [`Page`]. Regions are addressed by a
//! stable string id and may belong to any number of groups (the class-selector
//! equivalent, e.g. every SOS screen is in the `sos-screen` group).
//!
//! **Contract:** every operation on a missing region is a silent no-op. Callers
//! never need to check for presence before writing.

pub mod layout;
pub mod memory;

pub use memory::MemoryPage;

/// Mutable view of the rendered page.
pub trait Page {
    /// Whether a region with this id exists.
    fn contains(&self, id: &str) -> bool;

    /// Ids of every region in `group`, in document order.
    fn members(&self, group: &str) -> Vec<String>;

    /// Id of the enclosing region, if any.
    fn parent(&self, id: &str) -> Option<String>;

    fn add_class(&mut self, id: &str, class: &str);

    fn remove_class(&mut self, id: &str, class: &str);

    fn has_class(&self, id: &str, class: &str) -> bool;

    /// Replace the whole class list of a region.
    fn set_class_list(&mut self, id: &str, classes: &[&str]);

    fn set_text(&mut self, id: &str, text: &str);

    fn text(&self, id: &str) -> Option<String>;

    fn set_style(&mut self, id: &str, property: &str, value: &str);

    fn style(&self, id: &str, property: &str) -> Option<String>;

    fn set_disabled(&mut self, id: &str, disabled: bool);

    fn is_disabled(&self, id: &str) -> bool;

    /// Append a new region under `parent`. No-op when the parent is missing
    /// or the id is already taken.
    fn append(&mut self, parent: &str, id: &str, groups: &[&str]);

    /// Toggle a class; returns whether it is now present.
    fn toggle_class(&mut self, id: &str, class: &str) -> bool {
        if self.has_class(id, class) {
            self.remove_class(id, class);
            false
        } else {
            self.add_class(id, class);
            self.has_class(id, class)
        }
    }

    /// Add `class` to every member of `group`.
    fn add_class_all(&mut self, group: &str, class: &str) {
        for id in self.members(group) {
            self.add_class(&id, class);
        }
    }

    /// Remove each of `classes` from every member of `group`.
    fn remove_class_all(&mut self, group: &str, classes: &[&str]) {
        for id in self.members(group) {
            for class in classes {
                self.remove_class(&id, class);
            }
        }
    }

    /// Members of `group` currently carrying `class`.
    fn members_with_class(&self, group: &str, class: &str) -> Vec<String> {
        self.members(group)
            .into_iter()
            .filter(|id| self.has_class(id, class))
            .collect()
    }
}
