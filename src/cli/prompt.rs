//! Interactive conflict prompting.
//!
//! Implements the merge pipeline's prompt callback against the terminal:
//! each file conflict prints both sides and waits for a single keypress
//! choosing which side(s) to keep.

use std::io::Write;
use std::path::{Path, PathBuf};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal;

use crate::merge::{ConflictPrompt, PathUnit, Side, disambiguated_target, target_path};

/// Terminal-backed conflict prompt.
///
/// Keys: `l` keeps the left side, `r` the right, `b` both under
/// disambiguated names, `n` neither.
pub struct ConsolePrompt;

impl ConsolePrompt {
    fn read_choice(&self) -> char {
        // Raw mode so a single keypress answers without Enter. Terminal or
        // event errors fall back to keeping neither side.
        if terminal::enable_raw_mode().is_err() {
            return 'n';
        }
        let choice = loop {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char(c @ ('l' | 'r' | 'b' | 'n')) => break c,
                    KeyCode::Char(c @ ('L' | 'R' | 'B' | 'N')) => {
                        break c.to_ascii_lowercase();
                    }
                    _ => continue,
                },
                Ok(_) => continue,
                Err(_) => break 'n',
            }
        };
        let _ = terminal::disable_raw_mode();
        choice
    }
}

impl ConflictPrompt for ConsolePrompt {
    fn resolve(
        &self,
        left: &PathUnit,
        right: &PathUnit,
        target_base: &Path,
    ) -> (Option<PathBuf>, Option<PathBuf>) {
        let mut stderr = std::io::stderr();
        let _ = writeln!(stderr, "conflict: {}", left.virtual_path());
        let _ = writeln!(stderr, "  left:  {}", left.original_path().display());
        let _ = writeln!(stderr, "  right: {}", right.original_path().display());
        let _ = write!(stderr, "keep [l]eft, [r]ight, [b]oth, [n]either? ");
        let _ = stderr.flush();

        let choice = self.read_choice();
        let _ = writeln!(stderr, "{choice}");

        match choice {
            'l' => (Some(target_path(target_base, left.virtual_path())), None),
            'r' => (None, Some(target_path(target_base, right.virtual_path()))),
            'b' => (
                Some(disambiguated_target(
                    target_base,
                    left.virtual_path(),
                    Side::Left,
                )),
                Some(disambiguated_target(
                    target_base,
                    right.virtual_path(),
                    Side::Right,
                )),
            ),
            _ => (None, None),
        }
    }
}
