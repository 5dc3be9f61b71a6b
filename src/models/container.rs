//! Transaction container with nested grouping
//!
//! A container holds the canonical records for one transaction kind as a
//! recursive tree of leaves and groups. Flattening is a depth-first,
//! order-preserving traversal; every identity-based operation routes through
//! one traversal utility so the "at most one match" invariant lives in a
//! single place.

use serde::{Deserialize, Serialize};

use super::ids::TransactionId;
use super::money::Money;
use super::transaction::Transaction;

/// One element of a container: a record or a nested group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionNode {
    Leaf(Transaction),
    Group(TransactionContainer),
}

/// An ordered collection of transactions for one kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionContainer {
    nodes: Vec<TransactionNode>,
}

impl TransactionContainer {
    /// Create an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record at this level
    pub fn add(&mut self, transaction: Transaction) {
        self.nodes.push(TransactionNode::Leaf(transaction));
    }

    /// Append a nested group at this level
    pub fn add_group(&mut self, group: TransactionContainer) {
        self.nodes.push(TransactionNode::Group(group));
    }

    /// Remove the record with the given identity, searching nested groups
    ///
    /// The relative order of the remaining elements is not disturbed.
    pub fn remove(&mut self, id: TransactionId) -> Option<Transaction> {
        let position = self.nodes.iter().position(
            |node| matches!(node, TransactionNode::Leaf(txn) if txn.id == id),
        );

        if let Some(index) = position {
            if let TransactionNode::Leaf(txn) = self.nodes.remove(index) {
                return Some(txn);
            }
        }

        for node in &mut self.nodes {
            if let TransactionNode::Group(group) = node {
                if let Some(txn) = group.remove(id) {
                    return Some(txn);
                }
            }
        }

        None
    }

    /// Find the record with the given identity
    pub fn find(&self, id: TransactionId) -> Option<&Transaction> {
        self.flatten().find(|txn| txn.id == id)
    }

    /// Find the record with the given identity, mutably
    ///
    /// The single traversal utility behind all identity-based mutation.
    /// Identities are globally unique, so the first match is the only one.
    pub fn find_mut(&mut self, id: TransactionId) -> Option<&mut Transaction> {
        for node in &mut self.nodes {
            match node {
                TransactionNode::Leaf(txn) if txn.id == id => return Some(txn),
                TransactionNode::Group(group) => {
                    if let Some(txn) = group.find_mut(id) {
                        return Some(txn);
                    }
                }
                TransactionNode::Leaf(_) => {}
            }
        }
        None
    }

    /// Apply a transform to the record with the given identity
    ///
    /// Returns true if a matching leaf was found.
    pub fn mutate<F>(&mut self, id: TransactionId, transform: F) -> bool
    where
        F: FnOnce(&mut Transaction),
    {
        match self.find_mut(id) {
            Some(txn) => {
                transform(txn);
                true
            }
            None => false,
        }
    }

    /// Check whether a record with the given identity exists
    pub fn contains(&self, id: TransactionId) -> bool {
        self.find(id).is_some()
    }

    /// Iterate over all leaf records, depth-first and order-preserving
    ///
    /// The iterator is finite and restartable; call `flatten` again for a
    /// fresh pass.
    pub fn flatten(&self) -> Flatten<'_> {
        Flatten {
            stack: vec![self.nodes.iter()],
        }
    }

    /// Records whose category matches the given text (case-insensitive)
    pub fn filter_by_category(&self, category: &str) -> Vec<&Transaction> {
        let needle = category.to_lowercase();
        self.flatten()
            .filter(|txn| txn.category.to_lowercase() == needle)
            .collect()
    }

    /// Records with an amount of at least the given minimum
    pub fn filter_by_min_amount(&self, minimum: Money) -> Vec<&Transaction> {
        self.flatten().filter(|txn| txn.amount >= minimum).collect()
    }

    /// Records whose reason contains the given text (case-insensitive)
    pub fn filter_by_reason_contains(&self, text: &str) -> Vec<&Transaction> {
        let needle = text.to_lowercase();
        self.flatten()
            .filter(|txn| txn.reason.to_lowercase().contains(&needle))
            .collect()
    }

    /// Gross sum of amounts over the flattened view
    ///
    /// Amounts are always positive, so this is a total, not a net balance.
    pub fn total(&self) -> Money {
        self.flatten().map(|txn| txn.amount).sum()
    }

    /// Number of leaf records, across any nesting
    pub fn len(&self) -> usize {
        self.flatten().count()
    }

    /// Check if the container holds no records
    pub fn is_empty(&self) -> bool {
        self.flatten().next().is_none()
    }
}

/// Depth-first iterator over the leaf records of a container
pub struct Flatten<'a> {
    stack: Vec<std::slice::Iter<'a, TransactionNode>>,
}

impl<'a> Iterator for Flatten<'a> {
    type Item = &'a Transaction;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(top) = self.stack.last_mut() {
            match top.next() {
                Some(TransactionNode::Leaf(txn)) => return Some(txn),
                Some(TransactionNode::Group(group)) => self.stack.push(group.nodes.iter()),
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}
