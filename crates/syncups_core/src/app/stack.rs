//! Ordered stack of pushed screens.
//!
//! # Invariants
//! - Element ids increase monotonically and are never reused by one stack,
//!   so actions addressed to a popped element can never reach a newer one.
//! - Pushes only happen at the tail; pops remove an element and everything
//!   above it.

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StackElementId(pub u64);

impl Display for StackElementId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StackState<T> {
    elements: Vec<(StackElementId, T)>,
    next_id: u64,
}

impl<T> Default for StackState<T> {
    fn default() -> Self {
        Self {
            elements: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T> StackState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: T) -> StackElementId {
        let id = StackElementId(self.next_id);
        self.next_id += 1;
        self.elements.push((id, element));
        id
    }

    /// Removes the tail element.
    pub fn pop(&mut self) -> Option<(StackElementId, T)> {
        self.elements.pop()
    }

    /// Removes `id` and every element above it, returning them bottom-up.
    /// Returns nothing when `id` is not on the stack.
    pub fn pop_from(&mut self, id: StackElementId) -> Vec<(StackElementId, T)> {
        match self.index_of(id) {
            Some(index) => self.elements.split_off(index),
            None => Vec::new(),
        }
    }

    pub fn pop_all(&mut self) -> Vec<(StackElementId, T)> {
        std::mem::take(&mut self.elements)
    }

    pub fn get(&self, id: StackElementId) -> Option<&T> {
        self.elements
            .iter()
            .find(|(element_id, _)| *element_id == id)
            .map(|(_, element)| element)
    }

    pub fn get_mut(&mut self, id: StackElementId) -> Option<&mut T> {
        self.elements
            .iter_mut()
            .find(|(element_id, _)| *element_id == id)
            .map(|(_, element)| element)
    }

    pub fn contains(&self, id: StackElementId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn ids(&self) -> Vec<StackElementId> {
        self.elements.iter().map(|(id, _)| *id).collect()
    }

    pub fn last(&self) -> Option<(StackElementId, &T)> {
        self.elements.last().map(|(id, element)| (*id, element))
    }

    pub fn iter(&self) -> impl Iterator<Item = (StackElementId, &T)> {
        self.elements.iter().map(|(id, element)| (*id, element))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn index_of(&self, id: StackElementId) -> Option<usize> {
        self.elements.iter().position(|(element_id, _)| *element_id == id)
    }
}
