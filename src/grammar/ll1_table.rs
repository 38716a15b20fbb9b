use std::collections::{hash_map::Entry, HashMap, HashSet};

use crowbook_text_processing::escape::tex as escape_tex;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::{Error, Grammar};

use super::{pretty_print::ProductionOutput, FirstSets, FollowSets};

/// What to do when two productions land in the same table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Keep the production written last, say nothing.
    #[default]
    Overwrite,
    /// Keep the production written last, log every conflicting cell.
    Warn,
    /// Refuse the grammar.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableCell {
    Unique(usize),
    /// Every production written to the cell, in write order. Never shorter than two.
    Conflict(Vec<usize>),
}

impl TableCell {
    /// The production the parser expands: the one written last.
    pub fn production(&self) -> usize {
        match self {
            TableCell::Unique(p) => *p,
            TableCell::Conflict(ps) => ps[ps.len() - 1],
        }
    }

    pub fn productions(&self) -> &[usize] {
        match self {
            TableCell::Unique(p) => std::slice::from_ref(p),
            TableCell::Conflict(ps) => ps,
        }
    }

    fn assign(&mut self, production: usize) {
        if self.production() == production {
            return;
        }
        match self {
            TableCell::Unique(p) => {
                let p = *p;
                *self = TableCell::Conflict(vec![p, production]);
            }
            TableCell::Conflict(ps) => ps.push(production),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub non_terminal: usize,
    pub lookahead: usize,
    pub productions: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseTable {
    cells: HashMap<(usize, usize), TableCell>,
}

impl ParseTable {
    pub fn build(g: &Grammar, first: &FirstSets, follow: &FollowSets) -> Self {
        let epsilon = g.epsilon_index();
        let mut table = Self::default();

        for (idx, production) in g.productions.iter().enumerate() {
            let first_of_right = first.first_of(g, &production.right);
            for &t in first_of_right.iter().filter(|&&t| t != epsilon) {
                table.assign(production.left, t, idx);
            }
            if first_of_right.contains(&epsilon) {
                for &t in follow.get(production.left) {
                    table.assign(production.left, t, idx);
                }
            }
        }

        table
    }

    fn assign(&mut self, non_terminal: usize, lookahead: usize, production: usize) {
        match self.cells.entry((non_terminal, lookahead)) {
            Entry::Vacant(e) => {
                e.insert(TableCell::Unique(production));
            }
            Entry::Occupied(mut e) => e.get_mut().assign(production),
        }
    }

    pub fn get(&self, non_terminal: usize, lookahead: usize) -> Option<&TableCell> {
        self.cells.get(&(non_terminal, lookahead))
    }

    pub fn lookup(&self, non_terminal: usize, lookahead: usize) -> Option<usize> {
        self.get(non_terminal, lookahead).map(TableCell::production)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn conflicts(&self) -> Vec<Conflict> {
        let mut conflicts: Vec<Conflict> = self
            .cells
            .iter()
            .filter_map(|(&(non_terminal, lookahead), cell)| match cell {
                TableCell::Unique(_) => None,
                TableCell::Conflict(ps) => Some(Conflict {
                    non_terminal,
                    lookahead,
                    productions: ps.clone(),
                }),
            })
            .collect();
        conflicts.sort_by_key(|c| (c.non_terminal, c.lookahead));
        conflicts
    }

    pub fn is_ll1(&self) -> bool {
        self.cells
            .values()
            .all(|cell| matches!(cell, TableCell::Unique(_)))
    }

    pub fn apply_policy(self, g: &Grammar, policy: ConflictPolicy) -> Result<Self, Error> {
        if policy == ConflictPolicy::Overwrite {
            return Ok(self);
        }

        let described: Vec<String> = self
            .conflicts()
            .iter()
            .map(|c| {
                format!(
                    "M[{}, {}] = {}",
                    g.get_symbol_name(c.non_terminal),
                    g.get_symbol_name(c.lookahead),
                    c.productions
                        .iter()
                        .map(|p| g.production_to_string(*p))
                        .collect::<Vec<_>>()
                        .join(" | ")
                )
            })
            .collect();

        match policy {
            ConflictPolicy::Reject if !described.is_empty() => Err(Error::NotLl1 {
                conflicts: described,
            }),
            _ => {
                for c in &described {
                    warn!("LL(1) conflict, last production wins: {}", c);
                }
                Ok(self)
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LL1ParsingTable<'a> {
    terminals: Vec<&'a str>,
    rows: Vec<(&'a str, Vec<ProductionOutput<'a>>)>,
}

impl LL1ParsingTable<'_> {
    pub fn to_plaintext(&self) -> String {
        let mut header: Vec<String> = vec![String::new()];
        header.extend(self.terminals.iter().map(|&t| t.to_string()));
        let mut output: Vec<Vec<String>> = vec![header];
        for (left, row) in &self.rows {
            let mut line: Vec<String> = vec![left.to_string()];
            line.extend(
                row.iter()
                    .map(|productions| productions.to_plaintext(left.len(), false)),
            );
            output.push(line);
        }

        let width: Vec<usize> = (0..output[0].len())
            .map(|j| output.iter().map(|line| line[j].len()).max().unwrap_or(0))
            .collect();
        output
            .iter()
            .map(|line| {
                line.iter()
                    .enumerate()
                    .map(|(i, s)| format!("{:>width$}", s, width = width[i]))
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        let mut header: Vec<String> = vec![format!(
            "\\[\\begin{{array}}{{c{}}}\n",
            "|l".repeat(self.terminals.len()),
        )];
        header.extend(
            self.terminals
                .iter()
                .map(|&t| format!("\\text{{{}}}", escape_tex(t))),
        );
        let header = header.join(" & ");

        let terminal_set: HashSet<&str> = self.terminals.iter().cloned().collect();
        let output = self
            .rows
            .iter()
            .map(|(left, row)| {
                std::iter::once(escape_tex(*left).to_string())
                    .chain(row.iter().map(|productions| {
                        let cell = productions.to_latex(false, &terminal_set);
                        if productions.rights.len() > 1 {
                            format!("{{\\color{{red}}{}}}", cell)
                        } else {
                            cell
                        }
                    }))
                    .collect::<Vec<_>>()
                    .join(" & ")
            })
            .collect::<Vec<_>>()
            .join("\\\\\n");

        header + "\\\\\\hline\n" + &output + "\n\\end{array}\\]"
    }
}

impl ParseTable {
    pub fn to_output<'a>(&self, g: &'a Grammar) -> LL1ParsingTable<'a> {
        let terminals: Vec<(usize, &str)> =
            g.terminal_iter().map(|(i, t)| (i, t.as_str())).collect();

        let rows = g
            .non_terminal_iter()
            .map(|nt| {
                let left = nt.name.as_str();
                let row = terminals
                    .iter()
                    .map(|&(t, _)| ProductionOutput {
                        left,
                        rights: self
                            .get(nt.index, t)
                            .map(|cell| {
                                cell.productions()
                                    .iter()
                                    .map(|p| g.production_to_vec_str(&g.productions[*p].right))
                                    .collect()
                            })
                            .unwrap_or_default(),
                    })
                    .collect();
                (left, row)
            })
            .collect();

        LL1ParsingTable {
            terminals: terminals.into_iter().map(|(_, t)| t).collect(),
            rows,
        }
    }
}
