use std::collections::VecDeque;

use uuid::Uuid;

use super::Command;
use crate::config::DEFAULT_UNDO_LIMIT;
use crate::surface::{Snapshot, Surface};

/// Manages the history of committed edits for undo/redo
#[derive(Debug)]
pub struct CommandHistory {
    /// Oldest command at the front; evicted first once `limit` is reached
    undo_stack: VecDeque<Command>,
    /// Commands that can be redone, most recently undone last
    redo_stack: Vec<Command>,
    limit: usize,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_LIMIT)
    }
}

impl CommandHistory {
    /// Creates an empty history holding at most `limit` undoable commands
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Record a completed edit. Any redoable commands are dropped, and the
    /// oldest command is evicted when the history is full.
    pub fn push(&mut self, label: &'static str, before: Snapshot, after: Snapshot) -> Uuid {
        let command = Command::new(label, before, after);
        let id = command.id();
        self.redo_stack.clear();
        self.undo_stack.push_back(command);
        while self.undo_stack.len() > self.limit {
            if let Some(evicted) = self.undo_stack.pop_front() {
                log::debug!("History full, dropping {} ({})", evicted.label(), evicted.id());
            }
        }
        id
    }

    /// Undo the last command; `None` when there is nothing to undo
    pub fn undo(&mut self, surface: &mut Surface) -> Option<Uuid> {
        let command = self.undo_stack.pop_back()?;
        command.undo(surface);
        let id = command.id();
        self.redo_stack.push(command);
        Some(id)
    }

    /// Redo the last undone command; `None` when there is nothing to redo
    pub fn redo(&mut self, surface: &mut Surface) -> Option<Uuid> {
        let command = self.redo_stack.pop()?;
        command.redo(surface);
        let id = command.id();
        self.undo_stack.push_back(command);
        Some(id)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undoable commands
    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    /// Label of the command `undo` would revert
    pub fn undo_label(&self) -> Option<&'static str> {
        self.undo_stack.back().map(Command::label)
    }

    pub fn redo_label(&self) -> Option<&'static str> {
        self.redo_stack.last().map(Command::label)
    }

    /// Clear the command history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
