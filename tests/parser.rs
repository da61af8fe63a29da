#[cfg(test)]
mod parser_tests {
    use uscheme::error::SchemeError;
    use uscheme::expr::Expression;
    use uscheme::parser::Parser;
    use uscheme::scanner::Scanner;
    use uscheme::token::TokenType;

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let scanner = Scanner::new(source.as_bytes());
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens.len(), expected.len());

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
        }
    }

    fn parse(source: &str) -> Expression {
        let scanner = Scanner::new(source.as_bytes());
        let mut parser = Parser::new(scanner);

        parser.parse().expect("test source should parse")
    }

    fn sym(name: &str) -> Expression {
        Expression::Symbol(name.to_string())
    }

    #[test]
    fn test_scanner_01_punctuation_and_symbols() {
        assert_token_sequence(
            "(+ x y)",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::SYMBOL, "+"),
                (TokenType::SYMBOL, "x"),
                (TokenType::SYMBOL, "y"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_02_numbers_and_operators() {
        assert_token_sequence(
            "(<= -12 3.5)",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::SYMBOL, "<="),
                (TokenType::NUMBER(-12.0), "-12"),
                (TokenType::NUMBER(3.5), "3.5"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_03_predicate_symbols() {
        assert_token_sequence(
            "(null? x!)",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::SYMBOL, "null?"),
                (TokenType::SYMBOL, "x!"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_skips_comments() {
        assert_token_sequence(
            "; leading comment\n42 ; trailing comment",
            &[(TokenType::NUMBER(42.0), "42"), (TokenType::EOF, "")],
        );
    }

    #[test]
    fn test_scanner_number_literal_values() {
        let scanner = Scanner::new(b"7 -7 2.25");
        let numbers: Vec<f64> = scanner
            .filter_map(Result::ok)
            .filter_map(|t| match t.token_type {
                TokenType::NUMBER(n) => Some(n),
                _ => None,
            })
            .collect();

        assert_eq!(numbers, vec![7.0, -7.0, 2.25]);
    }

    #[test]
    fn test_scanner_reports_line_numbers() {
        let scanner = Scanner::new(b"1\n2\n@");
        let results: Vec<_> = scanner.collect();

        let err = results
            .iter()
            .find_map(|r| r.as_ref().err())
            .expect("expected a lex error for '@'");

        assert!(
            matches!(err, SchemeError::Lex { line: 3, .. }),
            "expected a line-3 lex error, got: {}",
            err
        );
    }

    #[test]
    fn test_parse_atoms() {
        assert_eq!(parse("42"), Expression::Number(42.0));
        assert_eq!(parse("x"), sym("x"));
    }

    #[test]
    fn test_parse_nested_lists() {
        let expected = Expression::List(vec![
            sym("let"),
            Expression::List(vec![Expression::List(vec![
                sym("x"),
                Expression::Number(1.0),
            ])]),
            Expression::List(vec![sym("+"), sym("x"), sym("x")]),
        ]);

        assert_eq!(parse("(let ((x 1)) (+ x x))"), expected);
    }

    #[test]
    fn test_parse_empty_list() {
        assert_eq!(parse("()"), Expression::List(vec![]));
    }

    #[test]
    fn test_parser_iterates_top_level_forms() {
        let scanner = Scanner::new(b"(define x 1) (define y 2) (+ x y)");
        let parser = Parser::new(scanner);

        let forms: Vec<_> = parser.collect::<Result<_, _>>().expect("should parse");

        assert_eq!(forms.len(), 3);
        assert_eq!(forms[2], Expression::List(vec![sym("+"), sym("x"), sym("y")]));
    }

    #[test]
    fn test_unterminated_list_is_parse_error() {
        let scanner = Scanner::new(b"(+ 1 2");
        let mut parser = Parser::new(scanner);

        let err = parser.parse().unwrap_err();
        assert!(
            matches!(err, SchemeError::Parse { .. }),
            "expected a Parse error, got: {}",
            err
        );
    }

    #[test]
    fn test_stray_close_paren_is_parse_error() {
        let scanner = Scanner::new(b")");
        let mut parser = Parser::new(scanner);

        let err = parser.parse().unwrap_err();
        assert!(matches!(err, SchemeError::Parse { .. }));
    }

    #[test]
    fn test_expression_display_round_trips() {
        let source = "(letrec ((f (lambda (n) (if (< n 1) 1 (* n (f (- n 1))))))) (f 5))";

        assert_eq!(parse(source).to_string(), source);
    }
}
