use log::{debug, warn};

use crate::Grammar;

impl Grammar {
    /// Reads one production per line, `LHS -> RHS_1 ... RHS_n`.
    pub fn parse(grammar: &str) -> Self {
        Self::from_declarations(
            grammar
                .lines()
                .map(|line| line.split_whitespace().collect::<Vec<_>>()),
        )
    }

    /// Builds a grammar from already tokenized declarations.
    ///
    /// A declaration is `[lhs, "->", rhs...]`. Anything shorter, anything without the
    /// arrow in second position, and anything declaring a reserved marker is skipped.
    /// Every left-hand side is collected before a single right-hand side symbol is
    /// classified, so declaration order never changes the terminal/non-terminal split.
    pub fn from_declarations<I, D, S>(declarations: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: AsRef<[S]>,
        S: AsRef<str>,
    {
        let mut g = Self::new();

        let mut raw_productions: Vec<(String, Vec<String>)> = Vec::new();
        for (i, declaration) in declarations.into_iter().enumerate() {
            let parts = declaration.as_ref();
            if parts.is_empty() {
                continue;
            }
            if parts.len() < 3 || parts[1].as_ref() != "->" {
                debug!("Line {}: not a production, skipped", i + 1);
                continue;
            }
            let left = parts[0].as_ref();
            if g.get_symbol_index(left).is_some() {
                debug!("Line {}: reserved symbol \"{}\" on left side, skipped", i + 1, left);
                continue;
            }
            raw_productions.push((
                left.to_string(),
                parts[2..].iter().map(|s| s.as_ref().to_string()).collect(),
            ));
        }

        for (left, _) in &raw_productions {
            if g.get_symbol_index(left).is_none() {
                g.add_non_terminal(left);
            }
        }

        for (left, rights) in raw_productions {
            let left = g.symbol_table[&left];
            let symbols = rights
                .iter()
                .map(|s| {
                    if let Some(idx) = g.get_symbol_index(s) {
                        idx
                    } else if s.chars().next().map_or(false, char::is_uppercase) {
                        warn!("Non-terminal \"{}\" has no productions", s);
                        g.add_non_terminal(s)
                    } else {
                        g.add_terminal(s.to_string())
                    }
                })
                .collect();
            g.add_production(left, symbols);
        }

        g.start_symbol = g.productions.first().map(|p| p.left);

        g
    }
}

#[cfg(test)]
mod tests {
    use crate::grammar::{Symbol, END_MARK, EPSILON};
    use crate::Grammar;
    use pretty_assertions::assert_eq;

    #[test]
    fn lowercase_left_side_declared_later_is_non_terminal() {
        let g = Grammar::parse("S -> x y\nx -> a");

        let x = g.get_symbol_index("x").unwrap();
        let y = g.get_symbol_index("y").unwrap();
        assert!(g.is_non_terminal(x));
        assert!(g.is_terminal(y));
        assert_eq!(g.non_terminal_iter().count(), 2);
    }

    #[test]
    fn uppercase_without_productions_is_undefined_non_terminal() {
        let g = Grammar::parse("S -> A b");

        let a = g.get_symbol_index("A").unwrap();
        assert!(g.symbols[a].non_terminal().unwrap().is_undefined());
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let g = Grammar::parse("S a b\nS ->\n\n   \nS -> a\nT => b\nS -> epsilon");

        assert_eq!(g.productions.len(), 2);
        assert_eq!(g.production_to_string(0), "S -> a");
        assert_eq!(g.production_to_string(1), "S -> epsilon");
    }

    #[test]
    fn reserved_left_side_is_skipped() {
        let g = Grammar::parse("epsilon -> a\n$ -> b\nS -> c");

        assert_eq!(g.productions.len(), 1);
        assert_eq!(g.start_symbol, g.get_symbol_index("S"));
        assert_eq!(g.symbols[g.epsilon_index()], Symbol::Epsilon);
        assert_eq!(g.get_symbol_name(g.end_mark_index()), END_MARK);
    }

    #[test]
    fn start_symbol_is_first_declared_left_side() {
        let g = Grammar::parse("E -> T Ep\nT -> id\nEp -> plus T Ep\nEp -> epsilon");

        assert_eq!(g.start_symbol, g.get_symbol_index("E"));
        let ep = g.get_symbol_index("Ep").unwrap();
        assert_eq!(g.symbols[ep].non_terminal().unwrap().productions, vec![2, 3]);
        assert_eq!(
            g.productions[3].right,
            vec![g.get_symbol_index(EPSILON).unwrap()]
        );
    }

    #[test]
    fn declarations_from_tokens() {
        let g = Grammar::from_declarations(vec![
            vec!["S", "->", "a", "S", "b"],
            vec!["S", "->"],
            vec!["S", "->", "epsilon"],
        ]);

        assert_eq!(g.productions.len(), 2);
        assert_eq!(g.production_to_string(0), "S -> a S b");
    }

    #[test]
    fn empty_input() {
        let g = Grammar::parse("  \n  ");

        assert!(g.productions.is_empty());
        assert_eq!(g.start_symbol, None);
    }
}
