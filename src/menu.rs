//! Context menu state machine.
//!
//! `Closed` until a secondary gesture lands on a live shape; `Open` captures
//! the shape's positional index at that moment and the client position for
//! placement. Any action, outside click, or Escape closes it.

#[cfg(test)]
#[path = "menu_test.rs"]
mod menu_test;

use crate::selection::Selection;
use crate::surface::ScreenPoint;

/// Whether the context menu is showing, and for which shape.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MenuState {
    #[default]
    Closed,
    Open {
        /// Positional index of the target shape among the live shapes.
        target: usize,
        /// Client position where the menu is placed.
        position: ScreenPoint,
    },
}

/// Entries offered by an open menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    CopyAsText,
    Subtract,
    StartEdit,
    StopEdit,
    Delete,
}

/// The contextual action menu.
#[derive(Debug, Clone, Default)]
pub struct ContextMenu {
    state: MenuState,
}

impl ContextMenu {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open for `target`, replacing any menu already open.
    pub fn open(&mut self, target: usize, position: ScreenPoint) {
        self.state = MenuState::Open { target, position };
    }

    pub fn close(&mut self) {
        self.state = MenuState::Closed;
    }

    #[must_use]
    pub fn state(&self) -> MenuState {
        self.state
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.state, MenuState::Open { .. })
    }

    /// Target index of the open menu.
    #[must_use]
    pub fn target(&self) -> Option<usize> {
        match self.state {
            MenuState::Open { target, .. } => Some(target),
            MenuState::Closed => None,
        }
    }

    /// Entries to show, in display order. `Subtract` appears only when the
    /// target is one of exactly two selected shapes; the edit entry flips
    /// to `StopEdit` while the target is the shape being edited.
    #[must_use]
    pub fn items(&self, selection: &Selection, editing: Option<usize>) -> Vec<MenuItem> {
        let Some(target) = self.target() else {
            return Vec::new();
        };
        let mut items = vec![MenuItem::CopyAsText];
        if selection.partner_of(target).is_some() {
            items.push(MenuItem::Subtract);
        }
        items.push(if editing == Some(target) { MenuItem::StopEdit } else { MenuItem::StartEdit });
        items.push(MenuItem::Delete);
        items
    }
}
