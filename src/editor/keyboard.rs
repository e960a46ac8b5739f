// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Storemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Storemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Keyboard chords understood by the editor surface.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Delete,
    Backspace,
    /// A printable key, compared case-insensitively.
    Char(char),
    Other(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    /// Cmd on macOS.
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChord {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyChord {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
        }
    }

    pub fn ctrl(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers {
                ctrl: true,
                ..Modifiers::default()
            },
        }
    }

    pub fn meta(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers {
                meta: true,
                ..Modifiers::default()
            },
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    DeleteSelected,
    Undo,
    Redo,
}

/// Maps a chord to a command.
///
/// Deletion keys are ignored while a text input has focus so typing in a property panel never
/// deletes nodes. Undo/redo chords are always resolved.
pub fn resolve_shortcut(chord: &KeyChord, text_focus: bool) -> Option<EditorCommand> {
    let mods = chord.modifiers;
    match &chord.key {
        Key::Delete | Key::Backspace if !mods.command() && !mods.alt => {
            (!text_focus).then_some(EditorCommand::DeleteSelected)
        }
        Key::Char(c) if mods.command() && !mods.alt => match c.to_ascii_lowercase() {
            'z' if mods.shift => Some(EditorCommand::Redo),
            'z' => Some(EditorCommand::Undo),
            'y' if !mods.shift => Some(EditorCommand::Redo),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{resolve_shortcut, EditorCommand, Key, KeyChord};

    #[rstest]
    #[case(KeyChord::plain(Key::Delete), Some(EditorCommand::DeleteSelected))]
    #[case(KeyChord::plain(Key::Backspace), Some(EditorCommand::DeleteSelected))]
    #[case(KeyChord::ctrl(Key::Char('z')), Some(EditorCommand::Undo))]
    #[case(KeyChord::meta(Key::Char('Z')), Some(EditorCommand::Undo))]
    #[case(KeyChord::ctrl(Key::Char('z')).with_shift(), Some(EditorCommand::Redo))]
    #[case(KeyChord::meta(Key::Char('z')).with_shift(), Some(EditorCommand::Redo))]
    #[case(KeyChord::ctrl(Key::Char('y')), Some(EditorCommand::Redo))]
    #[case(KeyChord::plain(Key::Char('z')), None)]
    #[case(KeyChord::ctrl(Key::Delete), None)]
    #[case(KeyChord::plain(Key::Other("Escape".to_owned())), None)]
    fn chords_resolve(#[case] chord: KeyChord, #[case] expected: Option<EditorCommand>) {
        assert_eq!(resolve_shortcut(&chord, false), expected);
    }

    #[rstest]
    #[case(Key::Delete)]
    #[case(Key::Backspace)]
    fn delete_is_suppressed_while_typing(#[case] key: Key) {
        assert_eq!(resolve_shortcut(&KeyChord::plain(key), true), None);
    }

    #[test]
    fn undo_still_works_while_typing() {
        assert_eq!(
            resolve_shortcut(&KeyChord::ctrl(Key::Char('z')), true),
            Some(EditorCommand::Undo)
        );
    }
}
