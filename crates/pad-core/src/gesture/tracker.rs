//! Active contact bookkeeping.
//!
//! The tracker owns one [`Contact`] record per live contact id from press to
//! release.  Positions are updated in place, never recreated, and a move for
//! an id that is not tracked is a no-op — touch hardware is expected to
//! deliver stray trailing events after a cancellation.

use std::collections::HashMap;

/// Identifier assigned by the input source to one continuous contact.
pub type ContactId = u64;

/// How a contact participates in gesture recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactRole {
    /// Counts toward single-/two-contact gesture classification.
    Normal,
    /// Started inside the trailing-edge scrollbar strip; drives the scroll
    /// quantizer directly and is excluded from gesture-count logic.
    ScrollbarDrag,
}

/// One live contact point.
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub id: ContactId,
    pub x: f64,
    pub y: f64,
    pub role: ContactRole,
}

/// Mapping of contact id to live contact record.
#[derive(Debug, Default)]
pub struct ContactTracker {
    contacts: HashMap<ContactId, Contact>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new contact.  Re-pressing a live id replaces its record,
    /// keeping the at-most-one-record-per-id invariant.
    pub fn insert(&mut self, id: ContactId, x: f64, y: f64, role: ContactRole) {
        self.contacts.insert(id, Contact { id, x, y, role });
    }

    /// Updates a contact's position in place.  Returns the contact's role,
    /// or `None` when the id is not tracked (stray event).
    pub fn update_position(&mut self, id: ContactId, x: f64, y: f64) -> Option<ContactRole> {
        let contact = self.contacts.get_mut(&id)?;
        contact.x = x;
        contact.y = y;
        Some(contact.role)
    }

    /// Removes a contact, returning its final record if it was tracked.
    pub fn remove(&mut self, id: ContactId) -> Option<Contact> {
        self.contacts.remove(&id)
    }

    pub fn get(&self, id: ContactId) -> Option<&Contact> {
        self.contacts.get(&id)
    }

    /// Number of live contacts with [`ContactRole::Normal`].
    pub fn ordinary_count(&self) -> usize {
        self.contacts
            .values()
            .filter(|c| c.role == ContactRole::Normal)
            .count()
    }

    /// Whether a scrollbar-drag contact is currently held.
    pub fn scrollbar_active(&self) -> bool {
        self.contacts
            .values()
            .any(|c| c.role == ContactRole::ScrollbarDrag)
    }

    /// The live ordinary contacts, in unspecified order.
    pub fn ordinary_contacts(&self) -> impl Iterator<Item = &Contact> {
        self.contacts
            .values()
            .filter(|c| c.role == ContactRole::Normal)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get_round_trip() {
        let mut tracker = ContactTracker::new();
        tracker.insert(7, 10.0, 20.0, ContactRole::Normal);

        let c = tracker.get(7).expect("contact tracked");
        assert_eq!(c.x, 10.0);
        assert_eq!(c.y, 20.0);
        assert_eq!(c.role, ContactRole::Normal);
    }

    #[test]
    fn test_update_position_mutates_in_place() {
        let mut tracker = ContactTracker::new();
        tracker.insert(1, 0.0, 0.0, ContactRole::Normal);

        let role = tracker.update_position(1, 5.0, -3.0);

        assert_eq!(role, Some(ContactRole::Normal));
        assert_eq!(tracker.get(1).unwrap().x, 5.0);
        assert_eq!(tracker.get(1).unwrap().y, -3.0);
    }

    #[test]
    fn test_update_position_for_unknown_id_is_noop() {
        let mut tracker = ContactTracker::new();
        assert_eq!(tracker.update_position(99, 1.0, 1.0), None);
    }

    #[test]
    fn test_scrollbar_contacts_excluded_from_ordinary_count() {
        let mut tracker = ContactTracker::new();
        tracker.insert(1, 10.0, 10.0, ContactRole::Normal);
        tracker.insert(2, 470.0, 50.0, ContactRole::ScrollbarDrag);

        assert_eq!(tracker.ordinary_count(), 1);
        assert!(tracker.scrollbar_active());
    }

    #[test]
    fn test_remove_returns_final_record() {
        let mut tracker = ContactTracker::new();
        tracker.insert(3, 1.0, 2.0, ContactRole::Normal);
        tracker.update_position(3, 8.0, 9.0);

        let removed = tracker.remove(3).expect("was tracked");
        assert_eq!((removed.x, removed.y), (8.0, 9.0));
        assert_eq!(tracker.ordinary_count(), 0);
        assert!(tracker.remove(3).is_none());
    }
}
