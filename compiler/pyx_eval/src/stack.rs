//! Growable LIFO stack backing both Control and Stash.

/// A stack over a `Vec`, top at the end.
///
/// `pop` and `peek` return `None` when empty; the machine checks emptiness
/// before it pops, so this is a signal rather than an error. `Clone`
/// produces an independent copy.
#[derive(Clone, Debug, PartialEq)]
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Stack<T> {
    pub const fn new() -> Self {
        Stack { items: Vec::new() }
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    pub fn peek(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items from bottom to top.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Remove the top `n` items, returned bottom first.
    ///
    /// Returns `None`, leaving the stack unchanged, when fewer than `n`
    /// items are present.
    pub fn pop_n(&mut self, n: usize) -> Option<Vec<T>> {
        let start = self.items.len().checked_sub(n)?;
        Some(self.items.split_off(start))
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
