//! Ordered list capability and XML output for lists

use std::cmp::Ordering;

use crate::error::Result;
use crate::value::{List, Value};
use crate::xml::TreeBuilder;

/// The operations an ordered container exposes to the rest of the crate
pub trait OrderedList<T> {
    /// Append an item at the end
    fn append(&mut self, item: T);

    /// Remove and return the item at `index`, shifting later items down
    fn remove_at(&mut self, index: usize) -> Option<T>;

    /// Build a new list by applying `f` to every item
    fn map_items<F>(&self, f: F) -> Self
    where
        F: FnMut(&T) -> T,
        Self: Sized;

    /// Build a new list with only the items matching `predicate`
    fn filter_items<P>(&self, predicate: P) -> Self
    where
        P: FnMut(&T) -> bool,
        Self: Sized;

    /// Stable sort in place
    fn sort_items_by<F>(&mut self, compare: F)
    where
        F: FnMut(&T, &T) -> Ordering;

    fn length(&self) -> usize;

    fn at(&self, index: usize) -> Option<&T>;
}

impl<T: Clone> OrderedList<T> for Vec<T> {
    fn append(&mut self, item: T) {
        self.push(item);
    }

    fn remove_at(&mut self, index: usize) -> Option<T> {
        (index < self.len()).then(|| self.remove(index))
    }

    fn map_items<F>(&self, f: F) -> Self
    where
        F: FnMut(&T) -> T,
    {
        self.iter().map(f).collect()
    }

    fn filter_items<P>(&self, mut predicate: P) -> Self
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().filter(|item| predicate(item)).cloned().collect()
    }

    fn sort_items_by<F>(&mut self, compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.sort_by(compare);
    }

    fn length(&self) -> usize {
        self.len()
    }

    fn at(&self, index: usize) -> Option<&T> {
        self.get(index)
    }
}

impl OrderedList<Value> for List {
    fn append(&mut self, item: Value) {
        self.0.push(item);
    }

    fn remove_at(&mut self, index: usize) -> Option<Value> {
        self.0.remove_at(index)
    }

    fn map_items<F>(&self, f: F) -> Self
    where
        F: FnMut(&Value) -> Value,
    {
        Self(self.0.map_items(f))
    }

    fn filter_items<P>(&self, predicate: P) -> Self
    where
        P: FnMut(&Value) -> bool,
    {
        Self(self.0.filter_items(predicate))
    }

    fn sort_items_by<F>(&mut self, compare: F)
    where
        F: FnMut(&Value, &Value) -> Ordering,
    {
        self.0.sort_items_by(compare);
    }

    fn length(&self) -> usize {
        self.0.len()
    }

    fn at(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }
}

/// Ordered lists that can render themselves as XML
pub trait ToXml {
    /// Serialize as a `root` element holding one `item` element per entry
    fn to_xml(&self, root: &str, item: &str) -> Result<String>;
}

impl ToXml for List {
    fn to_xml(&self, root: &str, item: &str) -> Result<String> {
        Ok(TreeBuilder::new().from_vector(root, item, self)?.serialize())
    }
}

impl ToXml for Vec<Value> {
    fn to_xml(&self, root: &str, item: &str) -> Result<String> {
        List::from(self.clone()).to_xml(root, item)
    }
}
