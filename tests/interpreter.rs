#[cfg(test)]
mod interpreter_tests {
    use uscheme::environment::Env;
    use uscheme::error::{Result, SchemeError};
    use uscheme::expr::Expression;
    use uscheme::interpreter::{classify, evaluate, ExprKind, SpecialForm};
    use uscheme::parser::Parser;
    use uscheme::primitives::global_env;
    use uscheme::scanner::Scanner;
    use uscheme::value::Value;

    fn read(source: &str) -> Expression {
        let scanner = Scanner::new(source.as_bytes());
        let mut parser = Parser::new(scanner);

        parser.parse().expect("test source should parse")
    }

    fn eval_in(source: &str, env: &Env) -> Result<Value> {
        evaluate(&read(source), env)
    }

    /// Evaluate a single expression against a fresh global environment.
    fn eval(source: &str) -> Value {
        eval_in(source, &global_env()).expect("test source should evaluate")
    }

    /// Evaluate a sequence of expressions against one shared environment,
    /// returning the last result.
    fn eval_program(sources: &[&str], env: &Env) -> Result<Value> {
        let mut last = Value::Unit;

        for source in sources {
            last = eval_in(source, env)?;
        }

        Ok(last)
    }

    // ── classification ──────────────────────────────────────────────────────

    #[test]
    fn test_classify_categories() {
        assert_eq!(classify(&read("42")), ExprKind::SelfEvaluating);
        assert_eq!(classify(&read("x")), ExprKind::Variable);
        assert_eq!(
            classify(&read("(lambda (x) x)")),
            ExprKind::Special(SpecialForm::Lambda)
        );
        assert_eq!(
            classify(&read("(letrec ((f f)) f)")),
            ExprKind::Special(SpecialForm::Letrec)
        );
        assert_eq!(classify(&read("(+ 1 2)")), ExprKind::Application);
        // A special-form keyword in non-head position has no special meaning.
        assert_eq!(classify(&read("(f if quote)")), ExprKind::Application);
    }

    // ── self-evaluating and variables ───────────────────────────────────────

    #[test]
    fn test_numbers_self_evaluate() {
        assert_eq!(eval("42"), Value::Number(42.0));
        assert_eq!(eval("-7"), Value::Number(-7.0));
        assert_eq!(eval("3.5"), Value::Number(3.5));
    }

    #[test]
    fn test_bound_variable_lookup() {
        assert_eq!(eval("true"), Value::Bool(true));
        assert_eq!(eval("nil"), Value::Nil);
    }

    #[test]
    fn test_unbound_variable_errors() {
        let err = eval_in("missing", &global_env()).unwrap_err();

        assert!(
            matches!(err, SchemeError::UnboundVariable { ref name } if name == "missing"),
            "expected UnboundVariable, got: {}",
            err
        );
    }

    #[test]
    fn test_innermost_frame_shadows() {
        assert_eq!(eval("(let ((x 1)) (let ((x 2)) x))"), Value::Number(2.0));
    }

    // ── lambda and application ──────────────────────────────────────────────

    #[test]
    fn test_lambda_application() {
        assert_eq!(eval("((lambda (x) (+ x x)) 3)"), Value::Number(6.0));
    }

    #[test]
    fn test_closure_captures_environment_by_reference() {
        let env = global_env();

        // The closure is created while x = 1 but must observe the later
        // in-place redefinition of the frame it captured.
        let result = eval_program(
            &["(define x 1)", "(define get (lambda () x))", "(define x 2)", "(get)"],
            &env,
        )
        .unwrap();

        assert_eq!(result, Value::Number(2.0));
    }

    #[test]
    fn test_arguments_evaluate_left_to_right() {
        let env = global_env();

        // Both defines run (left to right) before the closure body does, so
        // the body sees the second binding through the shared global chain.
        let result = eval_in("((lambda (a b) x) (define x 1) (define x 2))", &env).unwrap();

        assert_eq!(result, Value::Number(2.0));
    }

    #[test]
    fn test_closure_arity_mismatch() {
        let err = eval_in("((lambda (x y) x) 1)", &global_env()).unwrap_err();

        assert!(
            matches!(err, SchemeError::Arity { expected: 2, got: 1, .. }),
            "expected Arity error, got: {}",
            err
        );
    }

    #[test]
    fn test_primitive_arity_mismatch() {
        let err = eval_in("(+ 1)", &global_env()).unwrap_err();

        assert!(
            matches!(err, SchemeError::Arity { expected: 2, got: 1, .. }),
            "expected Arity error, got: {}",
            err
        );
    }

    #[test]
    fn test_not_a_function() {
        let err = eval_in("(1 2 3)", &global_env()).unwrap_err();

        assert!(
            matches!(err, SchemeError::NotAFunction(_)),
            "expected NotAFunction, got: {}",
            err
        );
    }

    #[test]
    fn test_empty_application_is_malformed() {
        let err = eval_in("()", &global_env()).unwrap_err();

        assert!(
            matches!(err, SchemeError::MalformedSpecialForm { .. }),
            "expected MalformedSpecialForm, got: {}",
            err
        );
    }

    // ── let ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_let_binds_in_parallel() {
        assert_eq!(eval("(let ((x 1) (y 2)) (+ x y))"), Value::Number(3.0));
    }

    #[test]
    fn test_let_initializers_use_outer_environment() {
        // The inner y refers to the outer x = 10, not the sibling binding.
        assert_eq!(
            eval("(let ((x 10)) (let ((x 2) (y x)) (+ x y)))"),
            Value::Number(12.0)
        );
    }

    #[test]
    fn test_let_initializer_cannot_see_sibling() {
        let err = eval_in("(let ((x 1) (y x)) y)", &global_env()).unwrap_err();

        assert!(
            matches!(err, SchemeError::UnboundVariable { ref name } if name == "x"),
            "expected UnboundVariable for sibling reference, got: {}",
            err
        );
    }

    #[test]
    fn test_let_frame_does_not_leak() {
        let env = global_env();

        eval_in("(let ((x 1)) (define y 2))", &env).unwrap();

        // y was bound in the let frame, which died with the let.
        let err = eval_in("y", &env).unwrap_err();
        assert!(matches!(err, SchemeError::UnboundVariable { .. }));
    }

    // ── letrec ──────────────────────────────────────────────────────────────

    #[test]
    fn test_letrec_self_recursion() {
        let source = "(letrec ((fact (lambda (n) (if (< n 1) 1 (* n (fact (- n 1)))))))
                        (fact 5))";

        assert_eq!(eval(source), Value::Number(120.0));
    }

    #[test]
    fn test_letrec_mutual_recursion() {
        let source = "(letrec ((even? (lambda (n) (if (== n 0) true (odd? (- n 1)))))
                              (odd?  (lambda (n) (if (== n 0) false (even? (- n 1))))))
                        (even? 10))";

        assert_eq!(eval(source), Value::Bool(true));
    }

    #[test]
    fn test_letrec_placeholder_read_is_hard_error() {
        // The initializer reads its own still-uninitialized binding.
        let err = eval_in("(letrec ((x x)) x)", &global_env()).unwrap_err();

        assert!(
            matches!(err, SchemeError::UninitializedBinding { ref name } if name == "x"),
            "expected UninitializedBinding, got: {}",
            err
        );
    }

    // ── if and cond ─────────────────────────────────────────────────────────

    #[test]
    fn test_if_takes_exactly_one_branch() {
        let env = global_env();

        // The untaken branch contains a define whose side effect must not
        // occur.
        eval_in("(if true (define taken 1) (define untaken 2))", &env).unwrap();

        assert_eq!(eval_in("taken", &env).unwrap(), Value::Number(1.0));
        assert!(matches!(
            eval_in("untaken", &env).unwrap_err(),
            SchemeError::UnboundVariable { .. }
        ));
    }

    #[test]
    fn test_only_false_is_falsy() {
        assert_eq!(eval("(if false 1 2)"), Value::Number(2.0));
        assert_eq!(eval("(if true 1 2)"), Value::Number(1.0));
        // nil and 0 are truthy.
        assert_eq!(eval("(if nil 1 2)"), Value::Number(1.0));
        assert_eq!(eval("(if 0 1 2)"), Value::Number(1.0));
    }

    #[test]
    fn test_if_requires_both_branches() {
        let err = eval_in("(if true 1)", &global_env()).unwrap_err();

        assert!(matches!(err, SchemeError::MalformedSpecialForm { .. }));
    }

    #[test]
    fn test_cond_else_clause() {
        assert_eq!(eval("(cond (false 1) (else 2))"), Value::Number(2.0));
    }

    #[test]
    fn test_cond_picks_first_truthy_clause() {
        assert_eq!(
            eval("(cond (false 1) ((> 2 1) 2) (else 3))"),
            Value::Number(2.0)
        );
    }

    #[test]
    fn test_cond_without_match_errors() {
        let err = eval_in("(cond (false 1) (false 2))", &global_env()).unwrap_err();

        assert!(
            matches!(err, SchemeError::NoMatchingClause),
            "expected NoMatchingClause, got: {}",
            err
        );
    }

    // ── define ──────────────────────────────────────────────────────────────

    #[test]
    fn test_define_returns_unit_not_nil() {
        let result = eval_in("(define x 1)", &global_env()).unwrap();

        assert_eq!(result, Value::Unit);
        assert_ne!(result, Value::Nil);
    }

    #[test]
    fn test_define_overwrites_in_place() {
        let env = global_env();

        let result = eval_program(&["(define x 1)", "(define x 2)", "x"], &env).unwrap();

        assert_eq!(result, Value::Number(2.0));
    }

    #[test]
    fn test_define_function_sugar_and_top_level_recursion() {
        let env = global_env();

        let result = eval_program(
            &[
                "(define (fact n) (if (< n 1) 1 (* n (fact (- n 1)))))",
                "(fact 5)",
            ],
            &env,
        )
        .unwrap();

        assert_eq!(result, Value::Number(120.0));
    }

    #[test]
    fn test_define_based_mutual_recursion() {
        let env = global_env();

        // odd? is referenced by even? before it is defined; that is fine as
        // long as even? is not invoked until both bindings are installed.
        let result = eval_program(
            &[
                "(define (even? n) (if (== n 0) true (odd? (- n 1))))",
                "(define (odd? n) (if (== n 0) false (even? (- n 1))))",
                "(even? 9)",
            ],
            &env,
        )
        .unwrap();

        assert_eq!(result, Value::Bool(false));
    }

    // ── quote ───────────────────────────────────────────────────────────────

    #[test]
    fn test_quote_returns_symbols_unevaluated() {
        let result = eval("(quote (a b c))");

        assert_eq!(
            result,
            Value::List(vec![
                Value::Symbol("a".to_string()),
                Value::Symbol("b".to_string()),
                Value::Symbol("c".to_string()),
            ])
        );
    }

    #[test]
    fn test_quote_suppresses_application() {
        // (+ 1 2) inside a quote is data, not a call.
        let result = eval("(quote (+ 1 2))");

        assert_eq!(
            result,
            Value::List(vec![
                Value::Symbol("+".to_string()),
                Value::Number(1.0),
                Value::Number(2.0),
            ])
        );
    }

    #[test]
    fn test_quote_of_empty_list_is_nil() {
        assert_eq!(eval("(quote ())"), Value::Nil);
    }

    // ── primitives ──────────────────────────────────────────────────────────

    #[test]
    fn test_arithmetic_primitives() {
        assert_eq!(eval("(+ 1 2)"), Value::Number(3.0));
        assert_eq!(eval("(- 5 2)"), Value::Number(3.0));
        assert_eq!(eval("(* 4 3)"), Value::Number(12.0));
        assert_eq!(eval("(> 2 1)"), Value::Bool(true));
        assert_eq!(eval("(>= 2 2)"), Value::Bool(true));
        assert_eq!(eval("(< 2 1)"), Value::Bool(false));
        assert_eq!(eval("(<= 1 2)"), Value::Bool(true));
        assert_eq!(eval("(== 2 2)"), Value::Bool(true));
    }

    #[test]
    fn test_list_primitives() {
        assert_eq!(eval("(null? nil)"), Value::Bool(true));
        assert_eq!(eval("(null? (list 1))"), Value::Bool(false));
        assert_eq!(eval("(car (cons 1 nil))"), Value::Number(1.0));
        assert_eq!(eval("(cdr (list 1))"), Value::Nil);
        assert_eq!(
            eval("(cdr (list 1 2 3))"),
            Value::List(vec![Value::Number(2.0), Value::Number(3.0)])
        );
        assert_eq!(eval("(list)"), Value::Nil);
    }

    #[test]
    fn test_structural_equality_on_lists() {
        assert_eq!(eval("(== (list 1 2) (list 1 2))"), Value::Bool(true));
        assert_eq!(eval("(== (list 1 2) (list 2 1))"), Value::Bool(false));
    }

    #[test]
    fn test_primitive_type_error_is_runtime() {
        let err = eval_in("(+ 1 nil)", &global_env()).unwrap_err();

        assert!(
            matches!(err, SchemeError::Runtime(_)),
            "expected Runtime error, got: {}",
            err
        );
    }

    #[test]
    fn test_car_of_empty_list_is_runtime_error() {
        let err = eval_in("(car nil)", &global_env()).unwrap_err();

        assert!(matches!(err, SchemeError::Runtime(_)));
    }

    // ── general properties ──────────────────────────────────────────────────

    #[test]
    fn test_pure_evaluation_is_idempotent() {
        let env = global_env();
        let exp = read("(+ (* 2 3) (car (list 4 5)))");

        let first = evaluate(&exp, &env).unwrap();
        let second = evaluate(&exp, &env).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, Value::Number(10.0));
    }

    #[test]
    fn test_value_rendering() {
        assert_eq!(eval("(+ 3 3)").to_string(), "6");
        assert_eq!(eval("3.5").to_string(), "3.5");
        assert_eq!(eval("(list 1 2 3)").to_string(), "(1 2 3)");
        assert_eq!(eval("nil").to_string(), "nil");
        assert_eq!(eval("(lambda (x) (+ x x))").to_string(), "(closure (x) (+ x x))");
        assert_eq!(eval("car").to_string(), "<native fn car>");
    }
}
