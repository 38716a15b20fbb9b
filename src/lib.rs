extern crate wasm_bindgen;

use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod error;
pub mod grammar;
pub mod options;
pub mod parser;
pub use error::{Error, Result};
pub use grammar::Grammar;
pub use options::Options;
pub use parser::{Ll1Parser, SyntaxError, Token};

fn error_json(e: impl std::fmt::Display) -> String {
    serde_json::json!({ "error": e.to_string() }).to_string()
}

#[wasm_bindgen]
pub fn first_follow_to_json(grammar: &str, options: &str) -> String {
    let parser =
        Options::from_json(options).and_then(|o| Ll1Parser::from_grammar_text(grammar, o));
    match parser {
        Ok(p) => p
            .grammar()
            .to_non_terminal_output_vec(p.first(), p.follow())
            .to_json(),
        Err(e) => error_json(e),
    }
}

#[wasm_bindgen]
pub fn parse_table_to_json(grammar: &str, options: &str) -> String {
    let parser =
        Options::from_json(options).and_then(|o| Ll1Parser::from_grammar_text(grammar, o));
    match parser {
        Ok(p) => serde_json::to_string(&p.table().to_output(p.grammar()))
            .unwrap_or_else(error_json),
        Err(e) => error_json(e),
    }
}

#[derive(Serialize)]
struct CheckOutput {
    accepted: bool,
    error: Option<SyntaxError>,
    diagnostic: Option<String>,
}

#[wasm_bindgen]
pub fn check_tokens_to_json(grammar: &str, tokens: &str, options: &str) -> String {
    let checked = Options::from_json(options)
        .and_then(|o| Ll1Parser::from_grammar_text(grammar, o))
        .and_then(|p| Token::parse_stream(tokens).map(|tokens| (p, tokens)));
    match checked {
        Ok((p, tokens)) => {
            let error = p.parse(&tokens).err();
            let output = CheckOutput {
                accepted: error.is_none(),
                diagnostic: error.as_ref().map(|e| e.to_string()),
                error,
            };
            serde_json::to_string(&output).unwrap_or_else(error_json)
        }
        Err(e) => error_json(e),
    }
}

#[cfg(test)]
mod parse_tests {
    use crate::grammar::EPSILON;
    use crate::{Ll1Parser, Options, SyntaxError, Token};
    use pretty_assertions::assert_eq;

    fn tokens(stream: &str) -> Vec<Token> {
        Token::parse_stream(stream).unwrap()
    }

    fn balanced() -> Ll1Parser {
        Ll1Parser::from_grammar_text("S -> a S b\nS -> epsilon", Options::default()).unwrap()
    }

    #[test]
    fn accepts_balanced_pairs() {
        let p = balanced();

        assert_eq!(p.parse(&tokens("1 a a\n2 a a\n3 b b\n4 b b")), Ok(()));
        assert_eq!(p.parse(&[]), Ok(()));
    }

    #[test]
    fn missing_closing_token() {
        let p = balanced();
        let e = p.parse(&tokens("1 a a\n2 a a\n3 b b")).unwrap_err();

        assert_eq!(
            e,
            SyntaxError::Mismatch {
                line: 3,
                expected: "b".to_string(),
                found: "$".to_string(),
            }
        );
        assert_eq!(e.to_string(), "Syntax error at line 3: expected 'b' but found '$'");
    }

    #[test]
    fn mismatch_reports_current_token() {
        let p = Ll1Parser::from_grammar_text("S -> a b c", Options::default()).unwrap();
        let e = p.parse(&tokens("1 a x\n2 c y\n3 c z")).unwrap_err();

        assert_eq!(e.to_string(), "Syntax error at line 2: expected 'b' but found 'y'");
    }

    #[test]
    fn unknown_token_type() {
        let p = balanced();
        let e = p.parse(&tokens("1 a a\n5 num 42\n6 b b")).unwrap_err();

        assert_eq!(e.to_string(), "Syntax error at line 5: unexpected token '42'");
    }

    #[test]
    fn unexpected_end_falls_back_to_previous_token() {
        let p = Ll1Parser::from_grammar_text("S -> a T\nT -> b\nT -> c", Options::default())
            .unwrap();
        let e = p.parse(&tokens("7 a first")).unwrap_err();

        assert_eq!(
            e,
            SyntaxError::UnexpectedToken {
                line: 7,
                found: "first".to_string(),
            }
        );
    }

    #[test]
    fn unexpected_end_of_empty_input() {
        let p = Ll1Parser::from_grammar_text("S -> a", Options::default()).unwrap();

        assert_eq!(
            p.parse(&[]).unwrap_err().to_string(),
            "Syntax error at line 0: unexpected token '$'"
        );
    }

    #[test]
    fn expression_grammar() {
        let p = Ll1Parser::from_grammar_text(
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
            Options::default(),
        )
        .unwrap();

        assert!(p.table().is_ll1());
        assert_eq!(
            p.parse(&tokens(
                "1 id a\n1 plus +\n1 id b\n1 times *\n2 lparen (\n2 id c\n2 plus +\n2 id d\n2 rparen )"
            )),
            Ok(())
        );
        assert_eq!(
            p.parse(&tokens("1 id a\n1 plus +\n2 times *")).unwrap_err().to_string(),
            "Syntax error at line 2: unexpected token '*'"
        );
        assert_eq!(
            p.parse(&tokens("1 lparen (\n1 id a")).unwrap_err().to_string(),
            "Syntax error at line 1: expected 'rparen' but found '$'"
        );
    }

    #[test]
    fn empty_grammar_is_an_error() {
        assert!(matches!(
            Ll1Parser::from_grammar_text("\n\nnot a rule\n", Options::default()),
            Err(crate::Error::EmptyGrammar)
        ));
    }

    #[test]
    fn epsilon_alias() {
        let p = Ll1Parser::from_grammar_text("S -> a S\nS -> ε", Options::default()).unwrap();
        let g = p.grammar();

        assert_eq!(g.get_symbol_index("ε"), g.get_symbol_index(EPSILON));
        assert_eq!(p.parse(&tokens("1 a a\n1 a a")), Ok(()));
    }
}
