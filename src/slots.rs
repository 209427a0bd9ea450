//! Reconciliation-by-token collections.
//!
//! A [`SlotList`] is an ordered sequence where every entry is owned by one
//! node instance. Inserting for an instance that already owns an entry
//! retracts the old entry first and appends the new one at the tail, so a
//! list never holds two entries for the same instance and its order always
//! follows the latest evaluation order.
//!
//! Handlers mutate shared collections only through [`SlotList::upsert`].

use crate::tree::NodeId;

/// Identity of the node instance contributing an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceToken(NodeId);

impl InstanceToken {
    pub fn of(node: NodeId) -> Self {
        Self(node)
    }

    pub fn node(self) -> NodeId {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlotList<T> {
    tokens: Vec<InstanceToken>,
    values: Vec<T>,
}

impl<T> SlotList<T> {
    pub fn new() -> Self {
        Self {
            tokens: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Retracts any entry owned by `token`, then appends `value` at the tail.
    /// Returns true if an existing entry was replaced.
    pub fn upsert(&mut self, token: InstanceToken, value: T) -> bool {
        let replaced = self.retract(token).is_some();
        self.tokens.push(token);
        self.values.push(value);
        replaced
    }

    /// Removes the entry owned by `token`, if any.
    pub fn retract(&mut self, token: InstanceToken) -> Option<T> {
        let index = self.tokens.iter().position(|t| *t == token)?;
        self.tokens.remove(index);
        Some(self.values.remove(index))
    }

    pub fn get(&self, token: InstanceToken) -> Option<&T> {
        let index = self.tokens.iter().position(|t| *t == token)?;
        self.values.get(index)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.values.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.values.iter_mut()
    }

    pub fn tokens(&self) -> &[InstanceToken] {
        &self.tokens
    }

    pub fn as_slice(&self) -> &[T] {
        &self.values
    }
}

impl<T> Default for SlotList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a SlotList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(i: u32) -> InstanceToken {
        InstanceToken::of(NodeId::from_index(i))
    }

    #[test]
    fn single_pass_keeps_declaration_order() {
        let mut list = SlotList::new();
        for (i, name) in ["a", "b", "c"].into_iter().enumerate() {
            assert!(!list.upsert(token(i as u32), name));
        }
        assert_eq!(list.as_slice(), &["a", "b", "c"]);
    }

    #[test]
    fn reinsertion_replaces_and_moves_to_tail() {
        let mut list = SlotList::new();
        list.upsert(token(0), "a");
        list.upsert(token(1), "b");
        list.upsert(token(2), "c");

        assert!(list.upsert(token(0), "a2"));
        assert_eq!(list.as_slice(), &["b", "c", "a2"]);
        assert_eq!(list.tokens(), &[token(1), token(2), token(0)]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn retract_removes_only_the_owner() {
        let mut list = SlotList::new();
        list.upsert(token(0), 1);
        list.upsert(token(1), 2);
        assert_eq!(list.retract(token(0)), Some(1));
        assert_eq!(list.retract(token(0)), None);
        assert_eq!(list.get(token(1)), Some(&2));
        assert_eq!(list.as_slice(), &[2]);
    }
}
