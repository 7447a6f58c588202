//! Presence logic filtering of aligned pairs.
//!
//! Each side of an aligned pair is reduced to a "counts as present" boolean
//! according to a configured presence depth, then a 16-way boolean operator
//! decides whether the pair passes on to conflict resolution.

use crate::merge::align::AlignedPair;
use crate::merge::path_unit::PathUnit;

// =============================================================================
// TruthTable / Operator
// =============================================================================

/// A 2-input boolean function encoded as a 4-bit table.
///
/// Bit `1 << (left | right << 1)` holds the output for the input combination
/// `(left, right)`. This is the single canonical encoding used throughout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruthTable(u8);

impl TruthTable {
    /// Passes only when both sides count.
    pub const AND: TruthTable = TruthTable(0b1000);
    /// Passes when either side counts.
    pub const OR: TruthTable = TruthTable(0b1110);
    /// Passes when exactly one side counts.
    pub const XOR: TruthTable = TruthTable(0b0110);

    /// Build a table from its 4-bit encoding; higher bits are ignored.
    pub fn new(bits: u8) -> Self {
        Self(bits & 0x0f)
    }

    /// Evaluate the table for one input combination.
    pub fn evaluate(self, left: bool, right: bool) -> bool {
        let index = (left as u8) | ((right as u8) << 1);
        self.0 & (1 << index) != 0
    }
}

/// The boolean operator applied to the two presence bits of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    And,
    Or,
    Xor,
    /// An arbitrary 16-way operator given as an explicit table.
    Custom(TruthTable),
}

impl Operator {
    /// The truth table this operator evaluates.
    pub fn truth_table(self) -> TruthTable {
        match self {
            Operator::And => TruthTable::AND,
            Operator::Or => TruthTable::OR,
            Operator::Xor => TruthTable::XOR,
            Operator::Custom(table) => table,
        }
    }
}

// =============================================================================
// PresenceDepth
// =============================================================================

/// How strictly a side must be present for it to count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceDepth {
    /// Counts only as an actual file match. A side at this depth that is
    /// present but not a file rejects the pair outright.
    FileOnly,
    /// Counts as a file match, or as the ancestor that is the exact immediate
    /// parent directory of the opposite unit.
    ImmediateParentOrFile,
    /// Counts as a file match, or as an ancestor at any depth.
    ParentOrFile,
}

// =============================================================================
// PresenceFilter
// =============================================================================

/// Decides, per aligned pair, whether the pair passes.
///
/// File-ness of a unit comes from the injected `file_valid` predicate; the
/// default consults the real filesystem at the unit's original path.
pub struct PresenceFilter {
    operator: Operator,
    left_depth: PresenceDepth,
    right_depth: PresenceDepth,
    file_valid: Box<dyn Fn(&PathUnit) -> bool + Send + Sync>,
}

impl PresenceFilter {
    /// Create a filter that checks file-ness against the real filesystem.
    pub fn new(operator: Operator, left_depth: PresenceDepth, right_depth: PresenceDepth) -> Self {
        Self::with_file_valid(operator, left_depth, right_depth, |unit| {
            unit.original_path().is_file()
        })
    }

    /// Create a filter with a custom file-ness predicate.
    pub fn with_file_valid(
        operator: Operator,
        left_depth: PresenceDepth,
        right_depth: PresenceDepth,
        file_valid: impl Fn(&PathUnit) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            operator,
            left_depth,
            right_depth,
            file_valid: Box::new(file_valid),
        }
    }

    /// Whether the pair passes the configured presence logic.
    pub fn admits(&self, pair: &AlignedPair) -> bool {
        debug_assert!(pair.left.is_some() || pair.right.is_some());

        let left_is_file = pair.left.as_ref().map(&self.file_valid).unwrap_or(false);
        let right_is_file = pair.right.as_ref().map(&self.file_valid).unwrap_or(false);

        // Hard gate: a file-only side that is present but not a file rejects
        // the pair before the truth table is consulted.
        if self.left_depth == PresenceDepth::FileOnly && pair.left.is_some() && !left_is_file {
            return false;
        }
        if self.right_depth == PresenceDepth::FileOnly && pair.right.is_some() && !right_is_file {
            return false;
        }

        let (left_counts, right_counts) = if left_is_file && right_is_file {
            debug_assert_eq!(
                pair.left.as_ref().map(|u| u.virtual_path()),
                pair.right.as_ref().map(|u| u.virtual_path()),
                "two file matches must share a virtual path"
            );
            (true, true)
        } else {
            match (&pair.left, &pair.right) {
                (Some(_), None) => (true, false),
                (None, Some(_)) => (false, true),
                (Some(left), Some(right)) => {
                    if left.virtual_path().starts_with(right.virtual_path()) {
                        // Left is the real occupant, right the ancestor slot.
                        let right_counts =
                            ancestor_counts(self.right_depth, right, left, right_is_file);
                        (true, right_counts)
                    } else {
                        let left_counts =
                            ancestor_counts(self.left_depth, left, right, left_is_file);
                        (left_counts, true)
                    }
                }
                (None, None) => return false,
            }
        };

        self.operator
            .truth_table()
            .evaluate(left_counts, right_counts)
    }
}

/// Whether an ancestor-slot unit counts as present at the given depth.
fn ancestor_counts(
    depth: PresenceDepth,
    ancestor: &PathUnit,
    occupant: &PathUnit,
    ancestor_is_file: bool,
) -> bool {
    if ancestor_is_file {
        return true;
    }
    match depth {
        PresenceDepth::FileOnly => false,
        PresenceDepth::ImmediateParentOrFile => {
            ancestor.virtual_path() == occupant.parent_virtual_path()
        }
        PresenceDepth::ParentOrFile => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::align::align;
    use crate::merge::align::tests::archive_fixture;

    /// Mirrors the original tooling's convention of treating extension-less
    /// entries as directories, so fixtures need no filesystem.
    fn has_extension(unit: &PathUnit) -> bool {
        unit.virtual_path()
            .rsplit('/')
            .next()
            .map(|name| name.contains('.'))
            .unwrap_or(false)
    }

    fn filter(op: Operator, left: PresenceDepth, right: PresenceDepth) -> PresenceFilter {
        PresenceFilter::with_file_valid(op, left, right, has_extension)
    }

    fn unit(virtual_path: &str) -> PathUnit {
        PathUnit::new(format!("x:/{virtual_path}"), virtual_path)
    }

    fn pair(left: Option<&str>, right: Option<&str>) -> AlignedPair {
        AlignedPair {
            left: left.map(unit),
            right: right.map(unit),
        }
    }

    #[test]
    fn test_truth_table_presets() {
        for (l, r) in [(false, false), (false, true), (true, false), (true, true)] {
            assert_eq!(TruthTable::AND.evaluate(l, r), l && r);
            assert_eq!(TruthTable::OR.evaluate(l, r), l || r);
            assert_eq!(TruthTable::XOR.evaluate(l, r), l ^ r);
        }
    }

    #[test]
    fn test_truth_table_custom() {
        // Pass only when the left side alone counts.
        let only_left = TruthTable::new(0b0010);
        assert!(only_left.evaluate(true, false));
        assert!(!only_left.evaluate(false, false));
        assert!(!only_left.evaluate(false, true));
        assert!(!only_left.evaluate(true, true));
    }

    #[test]
    fn test_file_only_gate_rejects_ancestor_side() {
        // Even an always-true operator cannot pass the gate.
        let f = filter(
            Operator::Custom(TruthTable::new(0b1111)),
            PresenceDepth::FileOnly,
            PresenceDepth::ParentOrFile,
        );
        assert!(!f.admits(&pair(Some("hugo"), Some("hugo/lesmis.pdf"))));
    }

    #[test]
    fn test_file_only_passes_file_matches() {
        let f = filter(
            Operator::And,
            PresenceDepth::FileOnly,
            PresenceDepth::FileOnly,
        );
        assert!(f.admits(&pair(Some("a/b.pdf"), Some("a/b.pdf"))));
        assert!(!f.admits(&pair(Some("a/b.pdf"), None)));
    }

    #[test]
    fn test_absent_side_counts_false() {
        let f = filter(
            Operator::Or,
            PresenceDepth::ParentOrFile,
            PresenceDepth::ParentOrFile,
        );
        assert!(f.admits(&pair(Some("a/b.pdf"), None)));

        let f = filter(
            Operator::And,
            PresenceDepth::ParentOrFile,
            PresenceDepth::ParentOrFile,
        );
        assert!(!f.admits(&pair(Some("a/b.pdf"), None)));
    }

    #[test]
    fn test_immediate_parent_boundary() {
        let immediate = filter(
            Operator::And,
            PresenceDepth::ImmediateParentOrFile,
            PresenceDepth::ParentOrFile,
        );
        // Left is the exact immediate parent of the right occupant.
        assert!(immediate.admits(&pair(
            Some("books/literature/hugo"),
            Some("books/literature/hugo/lesmis.pdf"),
        )));
        // Left is an ancestor two levels up.
        assert!(!immediate.admits(&pair(
            Some("music/classical"),
            Some("music/classical/bach/massinbminor.mp3"),
        )));

        let any_depth = filter(
            Operator::And,
            PresenceDepth::ParentOrFile,
            PresenceDepth::ParentOrFile,
        );
        assert!(any_depth.admits(&pair(
            Some("music/classical"),
            Some("music/classical/bach/massinbminor.mp3"),
        )));
    }

    #[test]
    fn test_archive_or_parent_passes_everything() {
        let (left, right) = archive_fixture();
        let f = filter(
            Operator::Or,
            PresenceDepth::ParentOrFile,
            PresenceDepth::ParentOrFile,
        );
        let pairs: Vec<_> = align(left, right).collect();
        assert_eq!(pairs.len(), 24);
        assert!(pairs.iter().all(|p| f.admits(p)));
    }

    #[test]
    fn test_archive_and_file_only_keeps_exact_matches() {
        let (left, right) = archive_fixture();
        let f = filter(
            Operator::And,
            PresenceDepth::FileOnly,
            PresenceDepth::FileOnly,
        );
        let passing: Vec<_> = align(left, right).filter(|p| f.admits(p)).collect();
        let vps: Vec<&str> = passing
            .iter()
            .map(|p| p.left.as_ref().unwrap().virtual_path())
            .collect();
        assert_eq!(
            vps,
            vec![
                "music/classical/beethoven/symphonies/symphony9.mp3",
                "music/classical/mozart/pianoconcerti/pc20.mp3",
            ]
        );
    }

    #[test]
    fn test_archive_xor_parent_keeps_one_sided_pairs() {
        let (left, right) = archive_fixture();
        let f = filter(
            Operator::Xor,
            PresenceDepth::ParentOrFile,
            PresenceDepth::ParentOrFile,
        );
        let passing: Vec<_> = align(left, right).filter(|p| f.admits(p)).collect();
        assert_eq!(passing.len(), 10);
        assert!(passing
            .iter()
            .all(|p| p.left.is_none() || p.right.is_none()));
    }
}
