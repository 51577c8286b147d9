//! Character-level diffs between two body versions, recorded in the
//! edit history so clients can render what changed.

use rantr_api::DiffSegment;

/// Diff `before` and `after` at character granularity.
///
/// Minimal-edit alignment via the classic LCS dynamic program, with
/// contiguous runs of the same kind coalesced into one segment. Where
/// an alignment position admits either a deletion or an insertion, the
/// deletion is emitted first, so identical inputs always produce
/// identical output.
pub fn chars(before: &str, after: &str) -> Vec<DiffSegment> {
    let old: Vec<char> = before.chars().collect();
    let new: Vec<char> = after.chars().collect();
    let n = old.len();
    let m = new.len();

    // lcs[i][j] = longest common subsequence of old[i..] and new[j..]
    let mut lcs = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i][j] = if old[i] == new[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut runs = Runs::default();
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i] == new[j] {
            runs.push(Kind::Unchanged, old[i]);
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            // ties resolve to the deletion branch
            runs.push(Kind::Removed, old[i]);
            i += 1;
        } else {
            runs.push(Kind::Added, new[j]);
            j += 1;
        }
    }
    while i < n {
        runs.push(Kind::Removed, old[i]);
        i += 1;
    }
    while j < m {
        runs.push(Kind::Added, new[j]);
        j += 1;
    }
    runs.finish()
}

/// Concatenation of all non-removed segments: the post-edit body.
pub fn rebuild_after(diff: &[DiffSegment]) -> String {
    diff.iter()
        .filter(|s| !s.removed)
        .map(|s| s.value.as_str())
        .collect()
}

/// Concatenation of all non-added segments: the pre-edit body.
pub fn rebuild_before(diff: &[DiffSegment]) -> String {
    diff.iter()
        .filter(|s| !s.added)
        .map(|s| s.value.as_str())
        .collect()
}

#[derive(Clone, Copy, Eq, PartialEq)]
enum Kind {
    Unchanged,
    Added,
    Removed,
}

#[derive(Default)]
struct Runs {
    segments: Vec<DiffSegment>,
    current: Option<(Kind, String)>,
}

impl Runs {
    fn push(&mut self, kind: Kind, c: char) {
        match &mut self.current {
            Some((k, run)) if *k == kind => run.push(c),
            _ => {
                self.flush();
                self.current = Some((kind, String::from(c)));
            }
        }
    }

    fn flush(&mut self) {
        if let Some((kind, run)) = self.current.take() {
            self.segments.push(match kind {
                Kind::Unchanged => DiffSegment::unchanged(run),
                Kind::Added => DiffSegment::added(run),
                Kind::Removed => DiffSegment::removed(run),
            });
        }
    }

    fn finish(mut self) -> Vec<DiffSegment> {
        self.flush();
        self.segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_round_trip(before: &str, after: &str) {
        let diff = chars(before, after);
        assert_eq!(rebuild_before(&diff), before);
        assert_eq!(rebuild_after(&diff), after);
        for s in &diff {
            assert!(!(s.added && s.removed), "segment both added and removed");
            assert!(!s.value.is_empty(), "empty segment");
        }
    }

    #[test]
    fn identical_inputs_are_one_unchanged_segment() {
        assert_eq!(chars("same", "same"), vec![DiffSegment::unchanged("same")]);
        assert_eq!(chars("", ""), Vec::new());
    }

    #[test]
    fn full_insert_and_full_delete() {
        assert_eq!(chars("", "abc"), vec![DiffSegment::added("abc")]);
        assert_eq!(chars("abc", ""), vec![DiffSegment::removed("abc")]);
    }

    #[test]
    fn replacement_emits_deletion_before_insertion() {
        assert_eq!(
            chars("abc", "axc"),
            vec![
                DiffSegment::unchanged("a"),
                DiffSegment::removed("b"),
                DiffSegment::added("x"),
                DiffSegment::unchanged("c"),
            ],
        );
        // no common characters at all: one removal run, one addition run
        assert_eq!(
            chars("ac", "bd"),
            vec![DiffSegment::removed("ac"), DiffSegment::added("bd")],
        );
    }

    #[test]
    fn hellow_world_to_hello_earthlings() {
        assert_eq!(
            chars("hellow world", "hello earthlings"),
            vec![
                DiffSegment::unchanged("hello"),
                DiffSegment::removed("w"),
                DiffSegment::unchanged(" "),
                DiffSegment::removed("wo"),
                DiffSegment::added("ea"),
                DiffSegment::unchanged("r"),
                DiffSegment::added("th"),
                DiffSegment::unchanged("l"),
                DiffSegment::removed("d"),
                DiffSegment::added("ings"),
            ],
        );
    }

    #[test]
    fn deterministic_on_identical_inputs() {
        let a = "the quick brown fox";
        let b = "the slow brown cat";
        assert_eq!(chars(a, b), chars(a, b));
    }

    #[test]
    fn round_trips() {
        assert_round_trip("", "");
        assert_round_trip("", "something");
        assert_round_trip("something", "");
        assert_round_trip("hellow world", "hello earthlings");
        assert_round_trip("aaaa", "aa");
        assert_round_trip("abab", "baba");
        assert_round_trip("no change at all", "no change at all");
        assert_round_trip("tabs\tand\nnewlines", "tabs and newlines");
        assert_round_trip("crème brûlée", "creme brulee");
        assert_round_trip("🦀 rust", "rust 🦀");
    }
}
