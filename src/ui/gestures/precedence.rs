// SPDX-License-Identifier: MPL-2.0
//! Declarative precedence between gesture recognizers.
//!
//! Relationships are written as a small tree instead of ad hoc flags, then
//! flattened into a [`PrecedenceTable`] the arbiter queries per event:
//!
//! ```text
//! Exclusive ─ winner: LongPress
//!           └ over:   Parallel ─ Deferred ─ preferred: DoubleTap
//!                              │          └ fallback:  Tap
//!                              └ Parallel ─ Pinch
//!                                         └ Pan
//! ```

/// The five recognizers known to the arbiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKind {
    Tap,
    DoubleTap,
    LongPress,
    Pinch,
    Pan,
}

impl GestureKind {
    pub const ALL: [GestureKind; 5] = [
        GestureKind::Tap,
        GestureKind::DoubleTap,
        GestureKind::LongPress,
        GestureKind::Pinch,
        GestureKind::Pan,
    ];

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            GestureKind::Tap => 0,
            GestureKind::DoubleTap => 1,
            GestureKind::LongPress => 2,
            GestureKind::Pinch => 3,
            GestureKind::Pan => 4,
        }
    }
}

/// Precedence tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precedence {
    Recognizer(GestureKind),
    /// When anything in `winner` fires, everything in `over` is cancelled.
    /// Nothing in `over` ever cancels the winner.
    Exclusive {
        winner: Box<Precedence>,
        over: Vec<Precedence>,
    },
    /// Members run side by side and may all fire.
    Parallel(Vec<Precedence>),
    /// `fallback` output is held back until `preferred` can no longer fire;
    /// if `preferred` fires, held output is discarded and `fallback` cancelled.
    Deferred {
        preferred: Box<Precedence>,
        fallback: Box<Precedence>,
    },
}

impl Precedence {
    /// The viewer's arrangement (see module docs).
    #[must_use]
    pub fn viewer_default() -> Self {
        Precedence::Exclusive {
            winner: Box::new(Precedence::Recognizer(GestureKind::LongPress)),
            over: vec![Precedence::Parallel(vec![
                Precedence::Deferred {
                    preferred: Box::new(Precedence::Recognizer(GestureKind::DoubleTap)),
                    fallback: Box::new(Precedence::Recognizer(GestureKind::Tap)),
                },
                Precedence::Parallel(vec![
                    Precedence::Recognizer(GestureKind::Pinch),
                    Precedence::Recognizer(GestureKind::Pan),
                ]),
            ])],
        }
    }

    /// Leaves in evaluation order: winners and preferred branches first.
    #[must_use]
    pub fn leaves(&self) -> Vec<GestureKind> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves(&self, out: &mut Vec<GestureKind>) {
        match self {
            Precedence::Recognizer(kind) => {
                if !out.contains(kind) {
                    out.push(*kind);
                }
            }
            Precedence::Exclusive { winner, over } => {
                winner.collect_leaves(out);
                for node in over {
                    node.collect_leaves(out);
                }
            }
            Precedence::Parallel(nodes) => {
                for node in nodes {
                    node.collect_leaves(out);
                }
            }
            Precedence::Deferred {
                preferred,
                fallback,
            } => {
                preferred.collect_leaves(out);
                fallback.collect_leaves(out);
            }
        }
    }

    /// Flattens the tree into lookup tables.
    #[must_use]
    pub fn table(&self) -> PrecedenceTable {
        let mut table = PrecedenceTable {
            order: self.leaves(),
            cancels: [[false; 5]; 5],
            waits_on: [[false; 5]; 5],
        };
        self.fill(&mut table);
        table
    }

    fn fill(&self, table: &mut PrecedenceTable) {
        match self {
            Precedence::Recognizer(_) => {}
            Precedence::Exclusive { winner, over } => {
                for a in winner.leaves() {
                    for node in over {
                        for b in node.leaves() {
                            table.cancels[a.index()][b.index()] = true;
                        }
                    }
                }
                winner.fill(table);
                for node in over {
                    node.fill(table);
                }
            }
            Precedence::Parallel(nodes) => {
                for node in nodes {
                    node.fill(table);
                }
            }
            Precedence::Deferred {
                preferred,
                fallback,
            } => {
                for a in preferred.leaves() {
                    for b in fallback.leaves() {
                        table.cancels[a.index()][b.index()] = true;
                        table.waits_on[b.index()][a.index()] = true;
                    }
                }
                preferred.fill(table);
                fallback.fill(table);
            }
        }
    }
}

/// Flattened precedence relations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecedenceTable {
    order: Vec<GestureKind>,
    cancels: [[bool; 5]; 5],
    waits_on: [[bool; 5]; 5],
}

impl PrecedenceTable {
    /// Recognizers in the order they see each input event. Two recognizers
    /// firing on the same event resolve in this order.
    #[must_use]
    pub fn order(&self) -> &[GestureKind] {
        &self.order
    }

    /// Whether `winner` firing cancels `loser`.
    #[must_use]
    pub fn cancels(&self, winner: GestureKind, loser: GestureKind) -> bool {
        self.cancels[winner.index()][loser.index()]
    }

    /// Recognizers cancelled when `winner` fires.
    pub fn cancelled_by(&self, winner: GestureKind) -> impl Iterator<Item = GestureKind> + '_ {
        GestureKind::ALL
            .into_iter()
            .filter(move |loser| self.cancels(winner, *loser))
    }

    /// Recognizers whose failure `kind` must wait for before its output is
    /// delivered.
    pub fn waits_on(&self, kind: GestureKind) -> impl Iterator<Item = GestureKind> + '_ {
        GestureKind::ALL
            .into_iter()
            .filter(move |other| self.waits_on[kind.index()][other.index()])
    }
}

impl Default for PrecedenceTable {
    fn default() -> Self {
        Precedence::viewer_default().table()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use GestureKind::*;

    #[test]
    fn long_press_is_evaluated_first() {
        let table = PrecedenceTable::default();
        assert_eq!(table.order(), &[LongPress, DoubleTap, Tap, Pinch, Pan]);
    }

    #[test]
    fn long_press_cancels_every_sibling() {
        let table = PrecedenceTable::default();
        let cancelled: Vec<_> = table.cancelled_by(LongPress).collect();
        assert_eq!(cancelled, vec![Tap, DoubleTap, Pinch, Pan]);
    }

    #[test]
    fn siblings_never_cancel_long_press() {
        let table = PrecedenceTable::default();
        for kind in [Tap, DoubleTap, Pinch, Pan] {
            assert!(!table.cancels(kind, LongPress));
        }
    }

    #[test]
    fn pinch_and_pan_run_simultaneously() {
        let table = PrecedenceTable::default();
        assert!(!table.cancels(Pinch, Pan));
        assert!(!table.cancels(Pan, Pinch));
        assert_eq!(table.waits_on(Pan).count(), 0);
    }

    #[test]
    fn tap_family_runs_alongside_pinch_and_pan() {
        let table = PrecedenceTable::default();
        for a in [Tap, DoubleTap] {
            for b in [Pinch, Pan] {
                assert!(!table.cancels(a, b));
                assert!(!table.cancels(b, a));
            }
        }
    }

    #[test]
    fn single_tap_waits_for_double_tap() {
        let table = PrecedenceTable::default();
        assert_eq!(table.waits_on(Tap).collect::<Vec<_>>(), vec![DoubleTap]);
        assert!(table.cancels(DoubleTap, Tap));
        assert!(!table.cancels(Tap, DoubleTap));
    }

    #[test]
    fn custom_tree_flattens_consistently() {
        let tree = Precedence::Exclusive {
            winner: Box::new(Precedence::Recognizer(Pinch)),
            over: vec![Precedence::Recognizer(Pan)],
        };
        let table = tree.table();
        assert_eq!(table.order(), &[Pinch, Pan]);
        assert!(table.cancels(Pinch, Pan));
        assert!(!table.cancels(Pan, Pinch));
    }
}
