//! Indexed, insertion-ordered collections handed to the network widget.

use std::collections::HashMap;

use thiserror::Error;

use super::types::NodeId;

/// Returned when a key is added twice.
#[derive(Debug, Error, PartialEq)]
#[error("key {0} is already present")]
pub struct DuplicateKey(pub NodeId);

/// Collection keyed by id with O(1) lookup that iterates in insertion order.
#[derive(Clone, Debug)]
pub struct DataSet<T> {
	entries: Vec<(NodeId, T)>,
	index: HashMap<NodeId, usize>,
}

impl<T> Default for DataSet<T> {
	fn default() -> Self {
		Self {
			entries: Vec::new(),
			index: HashMap::new(),
		}
	}
}

impl<T> DataSet<T> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a set from `(key, item)` pairs, failing on the first repeated key.
	pub fn from_items<I>(items: I) -> Result<Self, DuplicateKey>
	where
		I: IntoIterator<Item = (NodeId, T)>,
	{
		let mut set = Self::new();
		for (key, item) in items {
			set.add(key, item)?;
		}
		Ok(set)
	}

	pub fn add(&mut self, key: NodeId, item: T) -> Result<(), DuplicateKey> {
		if self.index.contains_key(&key) {
			return Err(DuplicateKey(key));
		}
		self.index.insert(key.clone(), self.entries.len());
		self.entries.push((key, item));
		Ok(())
	}

	pub fn get(&self, key: &NodeId) -> Option<&T> {
		self.index.get(key).map(|&i| &self.entries[i].1)
	}

	/// Replaces the entry under `key`, returning the previous item.
	/// Unknown keys are left untouched and yield `None`.
	pub fn update(&mut self, key: &NodeId, item: T) -> Option<T> {
		let &i = self.index.get(key)?;
		Some(std::mem::replace(&mut self.entries[i].1, item))
	}

	pub fn remove(&mut self, key: &NodeId) -> Option<T> {
		let i = self.index.remove(key)?;
		let (_, item) = self.entries.remove(i);
		for slot in self.index.values_mut() {
			if *slot > i {
				*slot -= 1;
			}
		}
		Some(item)
	}

	pub fn contains(&self, key: &NodeId) -> bool {
		self.index.contains_key(key)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn ids(&self) -> impl Iterator<Item = &NodeId> {
		self.entries.iter().map(|(key, _)| key)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &T)> {
		self.entries.iter().map(|(key, item)| (key, item))
	}
}
