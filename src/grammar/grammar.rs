use std::collections::HashMap;

pub const EPSILON_INDEX: usize = 0;
pub const END_MARK_INDEX: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonTerminal {
    pub index: usize,
    pub name: String,
    /// Indices into `Grammar::productions`, in declaration order.
    pub productions: Vec<usize>,
}

impl NonTerminal {
    pub fn new(index: usize, name: String) -> Self {
        Self {
            index,
            name,
            productions: Vec::new(),
        }
    }

    /// Named on some right-hand side but never declared on a left-hand side.
    pub fn is_undefined(&self) -> bool {
        self.productions.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    Epsilon,
    NonTerminal(NonTerminal),
    Terminal(String),
}

impl Symbol {
    pub fn non_terminal(&self) -> Option<&NonTerminal> {
        match self {
            Symbol::NonTerminal(e) => Some(e),
            _ => None,
        }
    }

    pub fn mut_non_terminal(&mut self) -> Option<&mut NonTerminal> {
        match self {
            Symbol::NonTerminal(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub left: usize,
    pub right: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct Grammar {
    pub symbols: Vec<Symbol>,
    pub symbol_table: HashMap<String, usize>,
    pub productions: Vec<Production>,
    pub start_symbol: Option<usize>,
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

impl Grammar {
    pub fn new() -> Self {
        let mut g = Self {
            symbols: Vec::new(),
            symbol_table: HashMap::new(),
            productions: Vec::new(),
            start_symbol: None,
        };

        g.symbols.push(Symbol::Epsilon);
        g.symbol_table.insert(super::EPSILON.to_string(), EPSILON_INDEX);
        g.symbol_table.insert("ε".to_string(), EPSILON_INDEX);

        g.add_terminal(super::END_MARK.to_string());

        g
    }

    pub fn epsilon_index(&self) -> usize {
        EPSILON_INDEX
    }

    pub fn end_mark_index(&self) -> usize {
        END_MARK_INDEX
    }

    pub fn terminal_iter(&self) -> impl Iterator<Item = (usize, &String)> {
        self.symbols.iter().enumerate().filter_map(|(i, s)| {
            if let Symbol::Terminal(name) = s {
                Some((i, name))
            } else {
                None
            }
        })
    }

    pub fn non_terminal_iter(&self) -> impl Iterator<Item = &NonTerminal> {
        self.symbols.iter().filter_map(|s| s.non_terminal())
    }

    /// Non-terminals occurring on any right-hand side, in order of first occurrence.
    pub fn rhs_non_terminals(&self) -> Vec<usize> {
        let mut out: Vec<usize> = Vec::new();
        for &idx in self.productions.iter().flat_map(|p| p.right.iter()) {
            if self.is_non_terminal(idx) && !out.contains(&idx) {
                out.push(idx);
            }
        }
        out
    }

    pub fn is_terminal(&self, index: usize) -> bool {
        matches!(self.symbols[index], Symbol::Terminal(_))
    }

    pub fn is_non_terminal(&self, index: usize) -> bool {
        matches!(self.symbols[index], Symbol::NonTerminal(_))
    }

    pub fn get_symbol_index(&self, name: &str) -> Option<usize> {
        self.symbol_table.get(name).cloned()
    }

    pub fn add_non_terminal(&mut self, name: &str) -> usize {
        let idx = self.symbols.len();
        self.symbols
            .push(Symbol::NonTerminal(NonTerminal::new(idx, name.to_string())));
        self.symbol_table.insert(name.to_string(), idx);
        idx
    }

    pub fn add_terminal(&mut self, name: String) -> usize {
        let idx = self.symbols.len();
        self.symbols.push(Symbol::Terminal(name.clone()));
        self.symbol_table.insert(name, idx);
        idx
    }

    /// Appends a production and returns its position. `left` must be a non-terminal.
    pub fn add_production(&mut self, left: usize, right: Vec<usize>) -> usize {
        let idx = self.productions.len();
        if let Some(nt) = self.symbols[left].mut_non_terminal() {
            nt.productions.push(idx);
        }
        self.productions.push(Production { left, right });
        idx
    }

    pub fn get_symbol_name(&self, index: usize) -> &str {
        match &self.symbols[index] {
            Symbol::Epsilon => super::EPSILON,
            Symbol::NonTerminal(e) => e.name.as_str(),
            Symbol::Terminal(e) => e.as_str(),
        }
    }

    pub fn production_to_vec_str(&self, production: &[usize]) -> Vec<&str> {
        production
            .iter()
            .map(|idx| self.get_symbol_name(*idx))
            .collect()
    }

    pub fn production_to_string(&self, index: usize) -> String {
        let production = &self.productions[index];
        format!(
            "{} -> {}",
            self.get_symbol_name(production.left),
            self.production_to_vec_str(&production.right).join(" ")
        )
    }
}
