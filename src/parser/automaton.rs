use serde::Serialize;

use crate::grammar::{ParseTable, END_MARK};
use crate::Grammar;

use super::{SyntaxError, Token};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    Running,
    Accept,
    Reject(SyntaxError),
}

/// What the automaton does next from a given stack and input position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Accept,
    /// Top of stack equals the lookahead: pop it and consume one token.
    Match,
    /// Replace the non-terminal on top with the right-hand side of this production.
    Expand(usize),
    Reject(SyntaxError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceStep {
    pub stack: String,
    pub input: String,
    pub action: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Trace {
    pub steps: Vec<TraceStep>,
}

impl Trace {
    pub fn to_plaintext(&self) -> String {
        let mut output: Vec<[&str; 3]> = vec![["Stack", "Input", "Action"]];
        output.extend(
            self.steps
                .iter()
                .map(|s| [s.stack.as_str(), s.input.as_str(), s.action.as_str()]),
        );

        let width: Vec<usize> = (0..3)
            .map(|j| output.iter().map(|line| line[j].len()).max().unwrap_or(0))
            .collect();
        output
            .iter()
            .map(|line| {
                format!(
                    "{:<w0$} | {:>w1$} | {}",
                    line[0],
                    line[1],
                    line[2],
                    w0 = width[0],
                    w1 = width[1]
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub struct Automaton<'a> {
    grammar: &'a Grammar,
    table: &'a ParseTable,
    tokens: &'a [Token],
    stack: Vec<usize>,
    index: usize,
    state: State,
    trace: Option<Trace>,
}

impl<'a> Automaton<'a> {
    pub fn new(grammar: &'a Grammar, table: &'a ParseTable, tokens: &'a [Token]) -> Self {
        let mut stack = vec![grammar.end_mark_index()];
        stack.extend(grammar.start_symbol);
        Self {
            grammar,
            table,
            tokens,
            stack,
            index: 0,
            state: State::Running,
            trace: None,
        }
    }

    pub fn with_trace(mut self) -> Self {
        self.trace = Some(Trace::default());
        self
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn stack(&self) -> &[usize] {
        &self.stack
    }

    pub fn index(&self) -> usize {
        self.index
    }

    fn lookahead(&self) -> &str {
        self.tokens
            .get(self.index)
            .map_or(END_MARK, |t| t.kind.as_str())
    }

    /// The last real token once the input is exhausted, so diagnostics never point
    /// at the end marker's made-up position.
    fn reported_token(&self) -> Option<&Token> {
        self.tokens
            .get(self.index)
            .or_else(|| self.tokens.last())
    }

    fn mismatch(&self, expected: usize) -> SyntaxError {
        let found = self
            .tokens
            .get(self.index)
            .map_or(END_MARK, |t| t.value.as_str());
        SyntaxError::Mismatch {
            line: self.reported_token().map_or(0, |t| t.line),
            expected: self.grammar.get_symbol_name(expected).to_string(),
            found: found.to_string(),
        }
    }

    fn unexpected(&self) -> SyntaxError {
        match self.reported_token() {
            Some(t) => SyntaxError::UnexpectedToken {
                line: t.line,
                found: t.value.clone(),
            },
            None => SyntaxError::UnexpectedToken {
                line: 0,
                found: END_MARK.to_string(),
            },
        }
    }

    /// Computes the next transition without touching the stack or the input position.
    pub fn transition(&self) -> Transition {
        let top = match self.stack.last() {
            Some(&top) => top,
            None => return Transition::Reject(self.unexpected()),
        };
        let top_name = self.grammar.get_symbol_name(top);
        let current = self.lookahead();

        if top_name == END_MARK && current == END_MARK {
            Transition::Accept
        } else if top_name == current {
            Transition::Match
        } else if self.grammar.is_terminal(top) && top != self.grammar.end_mark_index() {
            Transition::Reject(self.mismatch(top))
        } else {
            match self
                .grammar
                .get_symbol_index(current)
                .and_then(|t| self.table.lookup(top, t))
            {
                Some(production) => Transition::Expand(production),
                None => Transition::Reject(self.unexpected()),
            }
        }
    }

    fn record(&self, transition: &Transition) -> TraceStep {
        let stack = self
            .stack
            .iter()
            .map(|s| self.grammar.get_symbol_name(*s))
            .collect::<Vec<_>>()
            .join(" ");
        let input = self.tokens[self.index.min(self.tokens.len())..]
            .iter()
            .map(|t| t.kind.as_str())
            .chain(std::iter::once(END_MARK))
            .collect::<Vec<_>>()
            .join(" ");
        let action = match transition {
            Transition::Accept => "accept".to_string(),
            Transition::Match => format!("match {}", self.lookahead()),
            Transition::Expand(p) => self.grammar.production_to_string(*p),
            Transition::Reject(e) => e.to_string(),
        };
        TraceStep {
            stack,
            input,
            action,
        }
    }

    /// Applies one transition. Once the automaton has accepted or rejected this is a no-op.
    pub fn step(&mut self) -> &State {
        if self.state != State::Running {
            return &self.state;
        }

        let transition = self.transition();
        if self.trace.is_some() {
            let step = self.record(&transition);
            if let Some(trace) = &mut self.trace {
                trace.steps.push(step);
            }
        }

        match transition {
            Transition::Accept => self.state = State::Accept,
            Transition::Match => {
                self.stack.pop();
                self.index += 1;
            }
            Transition::Expand(production) => {
                self.stack.pop();
                let epsilon = self.grammar.epsilon_index();
                self.stack.extend(
                    self.grammar.productions[production]
                        .right
                        .iter()
                        .rev()
                        .filter(|&&s| s != epsilon),
                );
            }
            Transition::Reject(e) => self.state = State::Reject(e),
        }
        &self.state
    }

    pub fn run(&mut self) -> Result<(), SyntaxError> {
        loop {
            match self.step() {
                State::Running => continue,
                State::Accept => return Ok(()),
                State::Reject(e) => return Err(e.clone()),
            }
        }
    }

    pub fn into_trace(self) -> Trace {
        self.trace.unwrap_or_default()
    }
}
