use std::collections::HashSet;

use log::debug;
use serde::{Deserialize, Serialize};

use super::{grammar::Symbol, Grammar};

/// How `first_of` treats epsilon while scanning a symbol sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EpsilonMode {
    /// A non-terminal's FIRST set is merged whole, epsilon included, and an epsilon
    /// marker on a right-hand side ends the scan. Nothing is added for a sequence
    /// that runs out.
    #[default]
    Propagate,
    /// Epsilon is only added when every symbol of the sequence can vanish, the empty
    /// sequence included.
    Exact,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstSets {
    mode: EpsilonMode,
    sets: Vec<HashSet<usize>>,
    passes: usize,
}

impl FirstSets {
    pub fn new(g: &Grammar, mode: EpsilonMode) -> Self {
        Self {
            mode,
            sets: vec![HashSet::new(); g.symbols.len()],
            passes: 0,
        }
    }

    pub fn compute(g: &Grammar, mode: EpsilonMode) -> Self {
        let mut first = Self::new(g, mode);
        while first.step(g) {}
        debug!("FIRST sets stable after {} passes", first.passes);
        first
    }

    /// One pass over every production. Returns whether any FIRST set grew.
    pub fn step(&mut self, g: &Grammar) -> bool {
        self.passes += 1;
        let mut changed = false;
        for production in &g.productions {
            let first = self.first_of(g, &production.right);
            let mut grown = self.sets[production.left].clone();
            let before = grown.len();
            grown.extend(first);
            if grown.len() > before {
                changed = true;
                self.sets[production.left] = grown;
            }
        }
        changed
    }

    pub fn first_of(&self, g: &Grammar, production: &[usize]) -> HashSet<usize> {
        let epsilon = g.epsilon_index();
        let mut first: HashSet<usize> = HashSet::new();
        for &idx in production {
            match &g.symbols[idx] {
                Symbol::Epsilon => match self.mode {
                    EpsilonMode::Propagate => {
                        first.insert(idx);
                        return first;
                    }
                    EpsilonMode::Exact => continue,
                },
                Symbol::Terminal(_) => {
                    first.insert(idx);
                    return first;
                }
                Symbol::NonTerminal(_) => {
                    let nt_first = &self.sets[idx];
                    match self.mode {
                        EpsilonMode::Propagate => first.extend(nt_first.iter().cloned()),
                        EpsilonMode::Exact => {
                            first.extend(nt_first.iter().filter(|&&s| s != epsilon).cloned())
                        }
                    }
                    if !nt_first.contains(&epsilon) {
                        return first;
                    }
                }
            }
        }
        if self.mode == EpsilonMode::Exact {
            first.insert(epsilon);
        }
        first
    }

    pub fn get(&self, non_terminal: usize) -> &HashSet<usize> {
        &self.sets[non_terminal]
    }

    pub fn nullable(&self, g: &Grammar, non_terminal: usize) -> bool {
        self.sets[non_terminal].contains(&g.epsilon_index())
    }

    pub fn mode(&self) -> EpsilonMode {
        self.mode
    }

    pub fn passes(&self) -> usize {
        self.passes
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowSets {
    sets: Vec<HashSet<usize>>,
    passes: usize,
}

impl FollowSets {
    pub fn new(g: &Grammar) -> Self {
        let mut sets = vec![HashSet::new(); g.symbols.len()];
        if let Some(start) = g.start_symbol {
            sets[start].insert(g.end_mark_index());
        }
        Self { sets, passes: 0 }
    }

    pub fn compute(g: &Grammar, first: &FirstSets) -> Self {
        let mut follow = Self::new(g);
        while follow.step(g, first) {}
        debug!("FOLLOW sets stable after {} passes", follow.passes);
        follow
    }

    /// One pass over every non-terminal used on a right-hand side. Returns whether
    /// any FOLLOW set grew.
    pub fn step(&mut self, g: &Grammar, first: &FirstSets) -> bool {
        self.passes += 1;
        let mut changed = false;
        for nt in g.rhs_non_terminals() {
            let follow = self.follow_of(g, first, nt);
            let mut grown = self.sets[nt].clone();
            let before = grown.len();
            grown.extend(follow);
            if grown.len() > before {
                changed = true;
                self.sets[nt] = grown;
            }
        }
        changed
    }

    pub fn follow_of(&self, g: &Grammar, first: &FirstSets, non_terminal: usize) -> HashSet<usize> {
        let epsilon = g.epsilon_index();
        let mut follow: HashSet<usize> = HashSet::new();
        if g.start_symbol == Some(non_terminal) {
            follow.insert(g.end_mark_index());
        }

        for production in &g.productions {
            for (i, &idx) in production.right.iter().enumerate() {
                if idx != non_terminal {
                    continue;
                }
                let rest = &production.right[i + 1..];
                if rest.is_empty() {
                    follow.extend(self.sets[production.left].iter().cloned());
                    continue;
                }
                let first_of_rest = first.first_of(g, rest);
                if first_of_rest.contains(&epsilon) {
                    follow.extend(self.sets[production.left].iter().cloned());
                }
                follow.extend(first_of_rest.into_iter().filter(|&s| s != epsilon));
            }
        }
        follow
    }

    pub fn get(&self, non_terminal: usize) -> &HashSet<usize> {
        &self.sets[non_terminal]
    }

    pub fn passes(&self) -> usize {
        self.passes
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use pretty_assertions::assert_eq;

    fn names<'a>(g: &'a Grammar, set: &HashSet<usize>) -> Vec<&'a str> {
        let mut v: Vec<&str> = set.iter().map(|idx| g.get_symbol_name(*idx)).collect();
        v.sort();
        v
    }

    fn expression() -> Grammar {
        Grammar::parse(
            r#"
            E -> T Ep
            Ep -> plus T Ep
            Ep -> epsilon
            T -> F Tp
            Tp -> times F Tp
            Tp -> epsilon
            F -> lparen E rparen
            F -> id
            "#,
        )
    }

    #[test]
    fn expression_first() {
        let g = expression();
        let first = FirstSets::compute(&g, EpsilonMode::Propagate);
        let idx = |s: &str| g.get_symbol_index(s).unwrap();

        assert_eq!(names(&g, first.get(idx("E"))), vec!["id", "lparen"]);
        assert_eq!(names(&g, first.get(idx("T"))), vec!["id", "lparen"]);
        assert_eq!(names(&g, first.get(idx("Ep"))), vec!["epsilon", "plus"]);
        assert_eq!(names(&g, first.get(idx("Tp"))), vec!["epsilon", "times"]);
        assert!(first.nullable(&g, idx("Ep")));
        assert!(!first.nullable(&g, idx("E")));
    }

    #[test]
    fn expression_follow() {
        let g = expression();
        let first = FirstSets::compute(&g, EpsilonMode::Propagate);
        let follow = FollowSets::compute(&g, &first);
        let idx = |s: &str| g.get_symbol_index(s).unwrap();

        assert_eq!(names(&g, follow.get(idx("E"))), vec!["$", "rparen"]);
        assert_eq!(names(&g, follow.get(idx("Ep"))), vec!["$", "rparen"]);
        assert_eq!(names(&g, follow.get(idx("T"))), vec!["$", "plus", "rparen"]);
        assert_eq!(names(&g, follow.get(idx("Tp"))), vec!["$", "plus", "rparen"]);
        assert_eq!(
            names(&g, follow.get(idx("F"))),
            vec!["$", "plus", "rparen", "times"]
        );
    }

    #[test]
    fn further_passes_change_nothing() {
        let g = expression();
        let mut first = FirstSets::compute(&g, EpsilonMode::Propagate);
        let stable = first.clone();
        assert!(!first.step(&g));
        assert_eq!(first.get(g.get_symbol_index("E").unwrap()), stable.get(g.get_symbol_index("E").unwrap()));

        let mut follow = FollowSets::compute(&g, &first);
        let stable = follow.clone();
        assert!(!follow.step(&g, &first));
        for nt in g.non_terminal_iter() {
            assert_eq!(follow.get(nt.index), stable.get(nt.index));
        }
    }

    #[test]
    fn passes_are_bounded() {
        let g = expression();
        let non_terminals = g.non_terminal_iter().count();
        let alphabet = g.terminal_iter().count() + 1;

        let first = FirstSets::compute(&g, EpsilonMode::Propagate);
        assert!(first.passes() <= non_terminals * alphabet + 1);
        let follow = FollowSets::compute(&g, &first);
        assert!(follow.passes() <= non_terminals * alphabet + 1);
    }

    #[test]
    fn epsilon_propagates_from_inner_non_terminal() {
        // A -> B c can never vanish, yet B's epsilon is merged in.
        let g = Grammar::parse("A -> B c\nB -> b\nB -> epsilon");
        let idx = |s: &str| g.get_symbol_index(s).unwrap();

        let propagate = FirstSets::compute(&g, EpsilonMode::Propagate);
        assert_eq!(names(&g, propagate.get(idx("A"))), vec!["b", "c", "epsilon"]);

        let exact = FirstSets::compute(&g, EpsilonMode::Exact);
        assert_eq!(names(&g, exact.get(idx("A"))), vec!["b", "c"]);
        assert_eq!(names(&g, exact.get(idx("B"))), vec!["b", "epsilon"]);
    }

    #[test]
    fn exhausted_sequence() {
        let g = Grammar::parse("A -> B C\nB -> epsilon\nC -> epsilon\nC -> c");
        let idx = |s: &str| g.get_symbol_index(s).unwrap();

        let propagate = FirstSets::compute(&g, EpsilonMode::Propagate);
        assert!(propagate.first_of(&g, &[]).is_empty());
        assert_eq!(names(&g, propagate.get(idx("A"))), vec!["c", "epsilon"]);

        let exact = FirstSets::compute(&g, EpsilonMode::Exact);
        assert_eq!(names(&g, &exact.first_of(&g, &[])), vec!["epsilon"]);
        assert_eq!(names(&g, exact.get(idx("A"))), vec!["c", "epsilon"]);
    }

    #[test]
    fn undefined_non_terminal_blocks_scan() {
        let g = Grammar::parse("S -> X a");
        let first = FirstSets::compute(&g, EpsilonMode::Propagate);

        assert!(first.get(g.get_symbol_index("S").unwrap()).is_empty());
    }

    #[test]
    fn start_symbol_follow_without_rhs_occurrence() {
        let g = Grammar::parse("S -> A\nA -> epsilon");
        let first = FirstSets::compute(&g, EpsilonMode::Propagate);
        let follow = FollowSets::compute(&g, &first);

        assert_eq!(names(&g, follow.get(g.get_symbol_index("S").unwrap())), vec!["$"]);
        assert_eq!(names(&g, follow.get(g.get_symbol_index("A").unwrap())), vec!["$"]);
    }

    #[test]
    fn follow_never_contains_epsilon() {
        let g = Grammar::parse("S -> A B\nA -> a\nB -> epsilon\nB -> b");
        let first = FirstSets::compute(&g, EpsilonMode::Propagate);
        let follow = FollowSets::compute(&g, &first);

        assert_eq!(names(&g, follow.get(g.get_symbol_index("A").unwrap())), vec!["$", "b"]);
    }
}
