// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The ordered, duplicate-free list of open dialogs.
//!
//! Index 0 is the bottom dialog and owns the backdrop; the last entry is the
//! active dialog that receives pointer input and the close action.

use dreamshot_core::DialogId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogStack {
    entries: Vec<DialogId>,
}

impl DialogStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `id` on top, first dropping any earlier occurrence of it and every
    /// id in `exclusions`.
    ///
    /// Returns `true` if the stack changed.
    pub fn add(&mut self, id: DialogId, exclusions: &[DialogId]) -> bool {
        let before = self.entries.clone();
        self.entries
            .retain(|entry| *entry != id && !exclusions.contains(entry));
        self.entries.push(id);
        self.entries != before
    }

    /// Drop `id` and every id in `exclusions`, keeping the others in order.
    ///
    /// Returns `true` if the stack changed.
    pub fn remove(&mut self, id: DialogId, exclusions: &[DialogId]) -> bool {
        let len = self.entries.len();
        self.entries
            .retain(|entry| *entry != id && !exclusions.contains(entry));
        self.entries.len() != len
    }

    /// Topmost dialog.
    pub fn active(&self) -> Option<DialogId> {
        self.entries.last().copied()
    }

    /// Bottom dialog, the only one that renders a backdrop.
    pub fn backdrop_owner(&self) -> Option<DialogId> {
        self.entries.first().copied()
    }

    pub fn contains(&self, id: DialogId) -> bool {
        self.entries.contains(&id)
    }

    pub fn is_active(&self, id: DialogId) -> bool {
        self.active() == Some(id)
    }

    pub fn owns_backdrop(&self, id: DialogId) -> bool {
        self.backdrop_owner() == Some(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[DialogId] {
        &self.entries
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.entries.is_empty();
        self.entries.clear();
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use DialogId::*;

    #[test]
    fn add_pushes_on_top() {
        let mut stack = DialogStack::new();
        stack.add(Login, &[]);
        stack.add(ForgotPassword, &[]);
        assert_eq!(stack.as_slice(), &[Login, ForgotPassword]);
        assert_eq!(stack.active(), Some(ForgotPassword));
        assert_eq!(stack.backdrop_owner(), Some(Login));
    }

    #[test]
    fn re_adding_moves_to_top_without_duplicating() {
        let mut stack = DialogStack::new();
        stack.add(Login, &[]);
        stack.add(Feedback, &[]);
        stack.add(Login, &[]);
        assert_eq!(stack.as_slice(), &[Feedback, Login]);
    }

    #[test]
    fn re_adding_top_is_a_no_op() {
        let mut stack = DialogStack::new();
        stack.add(Login, &[]);
        assert!(!stack.add(Login, &[]));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn add_drops_exclusions() {
        let mut stack = DialogStack::new();
        stack.add(Login, &[]);
        stack.add(ForgotPassword, &[]);
        stack.add(Register, &[Login, ForgotPassword]);
        assert_eq!(stack.as_slice(), &[Register]);
    }

    #[test]
    fn remove_preserves_order() {
        let mut stack = DialogStack::new();
        for id in [Login, Feedback, Share, AddCredit] {
            stack.add(id, &[]);
        }
        assert!(stack.remove(Feedback, &[]));
        assert_eq!(stack.as_slice(), &[Login, Share, AddCredit]);
    }

    #[test]
    fn remove_with_exclusions() {
        let mut stack = DialogStack::new();
        for id in [Login, VerifyEmail, Share] {
            stack.add(id, &[]);
        }
        stack.remove(VerifyEmail, &[Login]);
        assert_eq!(stack.as_slice(), &[Share]);
        assert!(stack.owns_backdrop(Share));
        assert!(stack.is_active(Share));
    }

    #[test]
    fn remove_absent_reports_unchanged() {
        let mut stack = DialogStack::new();
        stack.add(Login, &[]);
        assert!(!stack.remove(Logout, &[]));
    }
}
