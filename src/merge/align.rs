//! Ordered tree alignment.
//!
//! Consumes two virtual-path-sorted sequences of path units and produces a
//! lazy sequence of aligned pairs, pairing nested entries with their most
//! specific counterpart ancestor on the opposite side.
//!
//! The walk is a merge-join over the two cursors with one ancestor stack per
//! side. Each stack holds currently "open" units from the *opposite* side
//! that are still potential ancestors for upcoming units on its own side; an
//! entry is pushed when it is discovered to be a strict ancestor of the
//! current head and retired once the walk leaves its subtree.
//!
//! Precondition: each input sequence is strictly sorted ascending by virtual
//! path. This is asserted in debug builds only; an unsorted input gives an
//! undefined result.

use crate::merge::path_unit::{PathRelation, PathUnit};

// =============================================================================
// AlignedPair
// =============================================================================

/// A (possibly partial) correspondence between a left and a right unit.
///
/// At least one side is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedPair {
    pub left: Option<PathUnit>,
    pub right: Option<PathUnit>,
}

impl AlignedPair {
    fn new(left: Option<PathUnit>, right: Option<PathUnit>) -> Self {
        debug_assert!(
            left.is_some() || right.is_some(),
            "aligned pair with both slots absent"
        );
        Self { left, right }
    }
}

// =============================================================================
// align
// =============================================================================

/// Align two virtual-path-sorted sequences of path units.
///
/// Every input unit appears in the output, pairs are emitted in
/// non-decreasing virtual-path order, and a unit that is a strict ancestor of
/// opposite-side units is paired with each of them individually. The returned
/// iterator is finite and consumes its inputs.
pub fn align<L, R>(left: L, right: R) -> TreeAlign<L::IntoIter, R::IntoIter>
where
    L: IntoIterator<Item = PathUnit>,
    R: IntoIterator<Item = PathUnit>,
{
    let mut left = left.into_iter();
    let mut right = right.into_iter();
    let head_left = left.next();
    let head_right = right.next();
    TreeAlign {
        left,
        right,
        head_left,
        head_right,
        left_ancestors: Vec::new(),
        right_ancestors: Vec::new(),
    }
}

/// Iterator over the aligned pairs of two sorted unit sequences.
pub struct TreeAlign<L, R> {
    left: L,
    right: R,
    head_left: Option<PathUnit>,
    head_right: Option<PathUnit>,
    /// Right-side units that are open ancestors for upcoming left heads.
    left_ancestors: Vec<PathUnit>,
    /// Left-side units that are open ancestors for upcoming right heads.
    right_ancestors: Vec<PathUnit>,
}

impl<L, R> TreeAlign<L, R>
where
    L: Iterator<Item = PathUnit>,
    R: Iterator<Item = PathUnit>,
{
    fn take_left(&mut self) -> PathUnit {
        let unit = self.head_left.take().expect("left head present");
        self.head_left = self.left.next();
        if let Some(next) = &self.head_left {
            debug_assert!(
                unit.virtual_path() < next.virtual_path(),
                "left sequence not strictly sorted at {}",
                next.virtual_path()
            );
        }
        unit
    }

    fn take_right(&mut self) -> PathUnit {
        let unit = self.head_right.take().expect("right head present");
        self.head_right = self.right.next();
        if let Some(next) = &self.head_right {
            debug_assert!(
                unit.virtual_path() < next.virtual_path(),
                "right sequence not strictly sorted at {}",
                next.virtual_path()
            );
        }
        unit
    }

    /// Pop stack entries that are no longer ancestors of the given head.
    ///
    /// With the head exhausted the stack can never match again, so it is
    /// drained entirely.
    fn retire_stale(stack: &mut Vec<PathUnit>, head: Option<&PathUnit>) {
        let Some(head) = head else {
            stack.clear();
            return;
        };
        while let Some(top) = stack.last() {
            if head.virtual_path().starts_with(top.virtual_path()) {
                break;
            }
            stack.pop();
        }
    }

    /// The most recently opened stack entry that is a strict ancestor of the
    /// unit, popping entries that are not.
    fn innermost_ancestor(stack: &mut Vec<PathUnit>, unit: &PathUnit) -> Option<PathUnit> {
        while let Some(top) = stack.last() {
            if unit.relation_to(top) == PathRelation::DescendantOf {
                return Some(top.clone());
            }
            stack.pop();
        }
        None
    }
}

impl<L, R> Iterator for TreeAlign<L, R>
where
    L: Iterator<Item = PathUnit>,
    R: Iterator<Item = PathUnit>,
{
    type Item = AlignedPair;

    fn next(&mut self) -> Option<AlignedPair> {
        loop {
            let relation = match (&self.head_left, &self.head_right) {
                (None, None) => return None,
                (Some(_), None) => PathRelation::Less,
                (None, Some(_)) => PathRelation::Greater,
                (Some(l), Some(r)) => l.relation_to(r),
            };
            match relation {
                PathRelation::Less => {
                    Self::retire_stale(&mut self.right_ancestors, self.head_right.as_ref());
                    let left = self.take_left();
                    let ancestor = Self::innermost_ancestor(&mut self.left_ancestors, &left);
                    return Some(AlignedPair::new(Some(left), ancestor));
                }
                PathRelation::Greater => {
                    Self::retire_stale(&mut self.left_ancestors, self.head_left.as_ref());
                    let right = self.take_right();
                    let ancestor = Self::innermost_ancestor(&mut self.right_ancestors, &right);
                    return Some(AlignedPair::new(ancestor, Some(right)));
                }
                PathRelation::Equal => {
                    let left = self.take_left();
                    let right = self.take_right();
                    return Some(AlignedPair::new(Some(left), Some(right)));
                }
                PathRelation::DescendantOf => {
                    // The right head is a strict ancestor of the left head:
                    // keep it open for every unit in the subtree, surfacing an
                    // ancestor-of-ancestor pairing if one is already open.
                    let right = self.take_right();
                    let emitted = self.right_ancestors.last().map(|anc| {
                        AlignedPair::new(Some(anc.clone()), Some(right.clone()))
                    });
                    self.left_ancestors.push(right);
                    if let Some(pair) = emitted {
                        return Some(pair);
                    }
                }
                PathRelation::AncestorOf => {
                    let left = self.take_left();
                    let emitted = self.left_ancestors.last().map(|anc| {
                        AlignedPair::new(Some(left.clone()), Some(anc.clone()))
                    });
                    self.right_ancestors.push(left);
                    if let Some(pair) = emitted {
                        return Some(pair);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    fn units(base: &str, virtual_paths: &[&str]) -> Vec<PathUnit> {
        let mut sorted: Vec<&str> = virtual_paths.to_vec();
        sorted.sort_unstable();
        sorted
            .into_iter()
            .map(|vp| PathUnit::new(format!("{base}/{vp}"), vp))
            .collect()
    }

    fn vp_pairs(pairs: Vec<AlignedPair>) -> Vec<(Option<String>, Option<String>)> {
        pairs
            .into_iter()
            .map(|p| {
                (
                    p.left.map(|u| u.virtual_path().to_string()),
                    p.right.map(|u| u.virtual_path().to_string()),
                )
            })
            .collect()
    }

    pub(crate) const LEFT_PATHS: &[&str] = &[
        "books/literature/dickens/ataleoftwocities.pdf",
        "books/literature/dickens/olivertwist.pdf",
        "books/literature/hugo",
        "books/literature/shakespear/hamlet.pdf",
        "books/literature/tolstoy/anna.pdf",
        "music/classical",
        "music/classical/bach/concerti/brandenburg.mp3",
        "music/classical/beethoven/sonatas/moonlight.mp3",
        "music/classical/beethoven/symphonies/symphony5.mp3",
        "music/classical/beethoven/symphonies/symphony9.mp3",
        "music/classical/mozart/symphonies/sym40.ogg",
        "music/classical/mozart/pianoconcerti/pc20.mp3",
        "music/classical/mozart/intro.txt",
        "music/pop/mj/blackorwhite.mp3",
    ];

    pub(crate) const RIGHT_PATHS: &[&str] = &[
        "books/literature/shakespear/othello.pdf",
        "books/literature/tolstoy/warandpeace.pdf",
        "books/literature/hugo/lesmis.pdf",
        "books/literature/hugo/notredame.pdf",
        "music/classical/bach/concerti",
        "music/classical/bach/masses/massinbminor.mp3",
        "music/classical/beethoven",
        "music/classical/beethoven/symphonies",
        "music/classical/beethoven/symphonies/symphony9.mp3",
        "music/classical/mozart",
        "music/classical/mozart/pianoconcerti/pc20.mp3",
        "music/pop/mj/bad.mp3",
        "movies/drama/titanic.mp4",
        "movies/scifi/starwars.mp4",
    ];

    pub(crate) fn archive_fixture() -> (Vec<PathUnit>, Vec<PathUnit>) {
        (units("a:/left", LEFT_PATHS), units("b:/right", RIGHT_PATHS))
    }

    #[test]
    fn test_archive_alignment() {
        let (left, right) = archive_fixture();
        let expected: Vec<(Option<&str>, Option<&str>)> = vec![
            (Some("books/literature/dickens/ataleoftwocities.pdf"), None),
            (Some("books/literature/dickens/olivertwist.pdf"), None),
            (
                Some("books/literature/hugo"),
                Some("books/literature/hugo/lesmis.pdf"),
            ),
            (
                Some("books/literature/hugo"),
                Some("books/literature/hugo/notredame.pdf"),
            ),
            (Some("books/literature/shakespear/hamlet.pdf"), None),
            (None, Some("books/literature/shakespear/othello.pdf")),
            (Some("books/literature/tolstoy/anna.pdf"), None),
            (None, Some("books/literature/tolstoy/warandpeace.pdf")),
            (None, Some("movies/drama/titanic.mp4")),
            (None, Some("movies/scifi/starwars.mp4")),
            (
                Some("music/classical"),
                Some("music/classical/bach/concerti"),
            ),
            (
                Some("music/classical/bach/concerti/brandenburg.mp3"),
                Some("music/classical/bach/concerti"),
            ),
            (
                Some("music/classical"),
                Some("music/classical/bach/masses/massinbminor.mp3"),
            ),
            (
                Some("music/classical"),
                Some("music/classical/beethoven"),
            ),
            (
                Some("music/classical/beethoven/sonatas/moonlight.mp3"),
                Some("music/classical/beethoven"),
            ),
            (
                Some("music/classical"),
                Some("music/classical/beethoven/symphonies"),
            ),
            (
                Some("music/classical/beethoven/symphonies/symphony5.mp3"),
                Some("music/classical/beethoven/symphonies"),
            ),
            (
                Some("music/classical/beethoven/symphonies/symphony9.mp3"),
                Some("music/classical/beethoven/symphonies/symphony9.mp3"),
            ),
            (Some("music/classical"), Some("music/classical/mozart")),
            (
                Some("music/classical/mozart/intro.txt"),
                Some("music/classical/mozart"),
            ),
            (
                Some("music/classical/mozart/pianoconcerti/pc20.mp3"),
                Some("music/classical/mozart/pianoconcerti/pc20.mp3"),
            ),
            (
                Some("music/classical/mozart/symphonies/sym40.ogg"),
                Some("music/classical/mozart"),
            ),
            (None, Some("music/pop/mj/bad.mp3")),
            (Some("music/pop/mj/blackorwhite.mp3"), None),
        ];

        let actual = vp_pairs(align(left, right).collect());
        assert_eq!(actual.len(), expected.len());
        for (i, (actual, expected)) in actual.iter().zip(&expected).enumerate() {
            assert_eq!(
                actual.0.as_deref(),
                expected.0,
                "left slot mismatch at pair {i}"
            );
            assert_eq!(
                actual.1.as_deref(),
                expected.1,
                "right slot mismatch at pair {i}"
            );
        }
    }

    #[test]
    fn test_every_unit_appears() {
        let (left, right) = archive_fixture();
        let pairs: Vec<AlignedPair> = align(left.clone(), right.clone()).collect();
        for unit in &left {
            assert!(
                pairs.iter().any(|p| p.left.as_ref() == Some(unit)),
                "left unit {} missing from alignment",
                unit.virtual_path()
            );
        }
        for unit in &right {
            assert!(
                pairs.iter().any(|p| p.right.as_ref() == Some(unit)),
                "right unit {} missing from alignment",
                unit.virtual_path()
            );
        }
    }

    #[test]
    fn test_self_alignment_is_all_equal() {
        let (left, _) = archive_fixture();
        let pairs: Vec<AlignedPair> = align(left.clone(), left.clone()).collect();
        assert_eq!(pairs.len(), left.len());
        for (pair, unit) in pairs.iter().zip(&left) {
            assert_eq!(pair.left.as_ref(), Some(unit));
            assert_eq!(pair.right.as_ref(), Some(unit));
        }
    }

    #[test]
    fn test_directory_containment_pairing() {
        let left = units("a:/left", &["hugo"]);
        let right = units("b:/right", &["hugo/lesmis.pdf", "hugo/notredame.pdf"]);
        let actual = vp_pairs(align(left, right).collect());
        assert_eq!(
            actual,
            vec![
                (Some("hugo".into()), Some("hugo/lesmis.pdf".into())),
                (Some("hugo".into()), Some("hugo/notredame.pdf".into())),
            ]
        );
    }

    #[test]
    fn test_pure_sides() {
        let left = units("a:/left", &["only/on/left.pdf"]);
        let right = units("b:/right", &["only/on/right.pdf"]);
        let actual = vp_pairs(align(left, right).collect());
        assert_eq!(
            actual,
            vec![
                (Some("only/on/left.pdf".into()), None),
                (None, Some("only/on/right.pdf".into())),
            ]
        );
    }

    #[test]
    fn test_open_ancestor_survives_exhausted_side() {
        // The right side runs out while a left-side directory is still open
        // as an ancestor; remaining left units must still drain cleanly.
        let left = units("a:/left", &["a", "a/x.txt", "z.txt"]);
        let right = units("b:/right", &["a/b.txt"]);
        let actual = vp_pairs(align(left, right).collect());
        assert_eq!(
            actual,
            vec![
                (Some("a".into()), Some("a/b.txt".into())),
                (Some("a/x.txt".into()), None),
                (Some("z.txt".into()), None),
            ]
        );
    }

    #[test]
    fn test_empty_inputs() {
        let none: Vec<PathUnit> = Vec::new();
        assert_eq!(align(none.clone(), none.clone()).count(), 0);

        let left = units("a:/left", &["x.txt"]);
        let actual = vp_pairs(align(left, none).collect());
        assert_eq!(actual, vec![(Some("x.txt".into()), None)]);
    }
}
