//! Discrete commands and their keyboard shortcuts.

use serde::{Deserialize, Serialize};

/// A no-argument command the drawing pad responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    SelectPen,
    SelectEraser,
    Undo,
    Redo,
    Clear,
    ZoomIn,
    ZoomOut,
    ResetTransform,
}

impl Command {
    /// Every command, in menu order.
    pub const ALL: [Command; 8] = [
        Command::SelectPen,
        Command::SelectEraser,
        Command::Undo,
        Command::Redo,
        Command::Clear,
        Command::ZoomIn,
        Command::ZoomOut,
        Command::ResetTransform,
    ];

    /// Stable kebab-case name.
    pub fn name(&self) -> &'static str {
        match self {
            Command::SelectPen => "select-pen",
            Command::SelectEraser => "select-eraser",
            Command::Undo => "undo",
            Command::Redo => "redo",
            Command::Clear => "clear",
            Command::ZoomIn => "zoom-in",
            Command::ZoomOut => "zoom-out",
            Command::ResetTransform => "reset-transform",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Command::SelectPen => "Select the pen",
            Command::SelectEraser => "Select the eraser",
            Command::Undo => "Undo",
            Command::Redo => "Redo",
            Command::Clear => "Clear the canvas",
            Command::ZoomIn => "Zoom in",
            Command::ZoomOut => "Zoom out",
            Command::ResetTransform => "Reset zoom, rotation and pan",
        }
    }
}

/// A pressed key together with its modifiers.
///
/// `key` is a character (compared case-insensitively) or a named key such
/// as `"Backspace"`. `primary` is Ctrl, or Cmd on macOS.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub key: String,
    pub primary: bool,
    pub shift: bool,
}

impl KeyChord {
    pub fn new(key: impl Into<String>, primary: bool, shift: bool) -> Self {
        Self {
            key: key.into(),
            primary,
            shift,
        }
    }

    /// A key pressed without modifiers.
    pub fn plain(key: impl Into<String>) -> Self {
        Self::new(key, false, false)
    }

    /// A key pressed with the primary modifier.
    pub fn primary(key: impl Into<String>) -> Self {
        Self::new(key, true, false)
    }
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub primary: bool,
    pub shift: bool,
    pub command: Command,
}

impl Shortcut {
    pub const fn new(key: &'static str, primary: bool, shift: bool, command: Command) -> Self {
        Self {
            key,
            primary,
            shift,
            command,
        }
    }

    /// Check whether `chord` triggers this shortcut.
    ///
    /// Shift is ignored for symbol keys like `+`, which already need it on most layouts.
    pub fn matches(&self, chord: &KeyChord) -> bool {
        let symbol = !self.key.chars().any(char::is_alphanumeric);
        self.key.eq_ignore_ascii_case(&chord.key)
            && self.primary == chord.primary
            && (symbol || self.shift == chord.shift)
    }

    /// Format the shortcut for display (e.g., "Ctrl+Shift+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.primary {
            parts.push(if cfg!(target_os = "macos") { "Cmd" } else { "Ctrl" });
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("P", false, false, Command::SelectPen),
            Shortcut::new("E", false, false, Command::SelectEraser),
            Shortcut::new("Z", true, false, Command::Undo),
            Shortcut::new("Z", true, true, Command::Redo),
            Shortcut::new("Y", true, false, Command::Redo),
            Shortcut::new("Backspace", true, false, Command::Clear),
            Shortcut::new("=", true, false, Command::ZoomIn),
            Shortcut::new("+", true, false, Command::ZoomIn),
            Shortcut::new("-", true, false, Command::ZoomOut),
            Shortcut::new("0", true, false, Command::ResetTransform),
        ]
    }

    /// Find the command bound to `chord`.
    pub fn lookup(chord: &KeyChord) -> Option<Command> {
        Self::all()
            .into_iter()
            .find(|shortcut| shortcut.matches(chord))
            .map(|shortcut| shortcut.command)
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:20} {}", shortcut.format(), shortcut.command.description());
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_command_has_a_shortcut() {
        let shortcuts = ShortcutRegistry::all();
        for command in Command::ALL {
            assert!(
                shortcuts.iter().any(|s| s.command == command),
                "no shortcut for {}",
                command.name()
            );
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(ShortcutRegistry::lookup(&KeyChord::plain("p")), Some(Command::SelectPen));
        assert_eq!(ShortcutRegistry::lookup(&KeyChord::plain("E")), Some(Command::SelectEraser));
        assert_eq!(ShortcutRegistry::lookup(&KeyChord::primary("z")), Some(Command::Undo));
        assert_eq!(
            ShortcutRegistry::lookup(&KeyChord::new("Z", true, true)),
            Some(Command::Redo)
        );
        assert_eq!(ShortcutRegistry::lookup(&KeyChord::primary("y")), Some(Command::Redo));
        assert_eq!(
            ShortcutRegistry::lookup(&KeyChord::primary("Backspace")),
            Some(Command::Clear)
        );
        assert_eq!(ShortcutRegistry::lookup(&KeyChord::primary("0")), Some(Command::ResetTransform));
        assert_eq!(ShortcutRegistry::lookup(&KeyChord::primary("-")), Some(Command::ZoomOut));
    }

    #[test]
    fn test_symbol_keys_ignore_shift() {
        assert_eq!(
            ShortcutRegistry::lookup(&KeyChord::new("+", true, true)),
            Some(Command::ZoomIn)
        );
    }

    #[test]
    fn test_unbound_chords() {
        assert_eq!(ShortcutRegistry::lookup(&KeyChord::plain("z")), None);
        assert_eq!(ShortcutRegistry::lookup(&KeyChord::primary("p")), None);
        assert_eq!(ShortcutRegistry::lookup(&KeyChord::plain("Backspace")), None);
    }

    #[test]
    fn test_format() {
        let shortcut = Shortcut::new("Z", true, true, Command::Redo);
        let formatted = shortcut.format();
        assert!(formatted.ends_with("+Shift+Z"));
        assert_eq!(Shortcut::new("P", false, false, Command::SelectPen).format(), "P");
    }
}
