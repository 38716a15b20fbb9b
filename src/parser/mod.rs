pub mod automaton;
pub mod error;
pub mod token;
pub use automaton::{Automaton, State, Trace, Transition};
pub use error::SyntaxError;
pub use token::Token;

use log::info;

use crate::grammar::{FirstSets, FollowSets, ParseTable};
use crate::{Error, Grammar, Options, Result};

/// A grammar together with everything derived from it for predictive parsing.
#[derive(Debug, Clone)]
pub struct Ll1Parser {
    grammar: Grammar,
    options: Options,
    first: FirstSets,
    follow: FollowSets,
    table: ParseTable,
}

impl Ll1Parser {
    pub fn new(grammar: Grammar, options: Options) -> Result<Self> {
        if grammar.start_symbol.is_none() {
            return Err(Error::EmptyGrammar);
        }

        let first = FirstSets::compute(&grammar, options.epsilon);
        let follow = FollowSets::compute(&grammar, &first);
        let table =
            ParseTable::build(&grammar, &first, &follow).apply_policy(&grammar, options.conflicts)?;

        Ok(Self {
            grammar,
            options,
            first,
            follow,
            table,
        })
    }

    pub fn from_grammar_text(grammar: &str, options: Options) -> Result<Self> {
        Self::new(Grammar::parse(grammar), options)
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn options(&self) -> Options {
        self.options
    }

    pub fn first(&self) -> &FirstSets {
        &self.first
    }

    pub fn follow(&self) -> &FollowSets {
        &self.follow
    }

    pub fn table(&self) -> &ParseTable {
        &self.table
    }

    pub fn automaton<'a>(&'a self, tokens: &'a [Token]) -> Automaton<'a> {
        Automaton::new(&self.grammar, &self.table, tokens)
    }

    /// Decides whether `tokens` derive from the start symbol. Stops at the first error.
    pub fn parse(&self, tokens: &[Token]) -> std::result::Result<(), SyntaxError> {
        let result = self.automaton(tokens).run();
        match &result {
            Ok(()) => info!("accepted {} tokens", tokens.len()),
            Err(e) => info!("rejected: {}", e),
        }
        result
    }

    pub fn parse_traced(&self, tokens: &[Token]) -> (std::result::Result<(), SyntaxError>, Trace) {
        let mut automaton = self.automaton(tokens).with_trace();
        let result = automaton.run();
        (result, automaton.into_trace())
    }
}
