use density_expr::{
    BinaryOp, DensityError, DensityValue, Expr, LowerError, LowerOpts, UnaryOp, compile_str,
    lower, parse_expr,
};
use serde_json::json;

fn compile(src: &str) -> Result<DensityValue, DensityError> {
    compile_str(src, &LowerOpts::default())
}

fn compile_json(src: &str) -> String {
    compile(src).unwrap().to_json_string(false).unwrap()
}

fn lower_error(src: &str) -> LowerError {
    match compile(src) {
        Err(DensityError::Lower(e)) => e,
        other => panic!("expected lowering error for {src:?}, got {other:?}"),
    }
}

#[test]
fn literals_become_floats() {
    for (src, want) in [("0", 0.0), ("42", 42.0), ("2.5", 2.5), ("1e3", 1000.0)] {
        assert_eq!(compile(src).unwrap(), DensityValue::Number(want), "{src}");
        assert_eq!(
            lower(&parse_expr(src).unwrap()).unwrap().as_number(),
            Some(want)
        );
    }
    assert_eq!(compile_json("7"), "7.0");
}

#[test]
fn negated_literal_is_folded() {
    assert_eq!(
        lower(&Expr::unary(UnaryOp::Minus, Expr::int(5))).unwrap(),
        DensityValue::Number(-5.0)
    );
    assert_eq!(compile_json("-5"), "-5.0");
}

#[test]
fn reciprocal_and_general_division() {
    assert_eq!(
        compile_json("1 / abs('n')"),
        r#"{"type":"minecraft:invert","argument":{"type":"minecraft:abs","argument":"n"}}"#
    );
    assert_eq!(
        compile_json("2 / abs('n')"),
        r#"{"type":"minecraft:mul","argument1":2.0,"argument2":{"type":"minecraft:invert","argument":{"type":"minecraft:abs","argument":"n"}}}"#
    );
}

#[test]
fn power_laws() {
    let base = || Expr::call("blend_alpha", vec![], vec![]);
    let pow = |n: i64| lower(&Expr::binary(base(), BinaryOp::Pow, Expr::int(n))).unwrap();
    let b = json!({"type": "minecraft:blend_alpha"});

    assert_eq!(pow(0), DensityValue::Number(1.0));
    assert_eq!(pow(1), lower(&base()).unwrap());
    assert_eq!(
        serde_json::to_value(pow(2)).unwrap(),
        json!({"type": "minecraft:square", "argument": b})
    );
    assert_eq!(
        serde_json::to_value(pow(3)).unwrap(),
        json!({"type": "minecraft:cube", "argument": b})
    );

    let four = pow(4);
    assert_eq!(four.node_count() - 4, 3, "three multiplications");
    assert_eq!(four.as_node().map(|n| n.function()), Some("mul"));
}

#[test]
fn integral_float_exponents_match_integer_forms() {
    assert_eq!(compile_json("abs('x') ** 2.0"), compile_json("abs('x') ** 2"));
    assert_eq!(compile_json("abs('x') ** 3.0"), compile_json("abs('x') ** 3"));
    assert_eq!(compile_json("abs('x') ** 1.0"), compile_json("abs('x')"));
    assert_eq!(compile_json("abs('x') ** 0.0"), "1.0");
    assert!(matches!(
        lower_error("abs('x') ** 4.0"),
        LowerError::UnsupportedPower { .. }
    ));
}

#[test]
fn nested_powers_hit_the_node_limit() {
    let err = lower_error("((((abs('x')**64)**64)**64)**64)**64");
    assert_eq!(err, LowerError::OutputTooLarge { limit: 1_000_000 });

    let opts = LowerOpts {
        max_nodes: 10_000,
        ..LowerOpts::default()
    };
    assert_eq!(
        compile_str("(abs('x')**64)**64", &opts).unwrap().node_count(),
        8191
    );
    assert!(matches!(
        compile_str("((abs('x')**64)**64)**64", &opts),
        Err(DensityError::Lower(LowerError::OutputTooLarge { limit: 10_000 }))
    ));
}

#[test]
fn long_operator_chains_are_rejected_by_the_parser() {
    let src = format!("1{}", "+1".repeat(500_000));
    assert!(matches!(compile(&src), Err(DensityError::Parse(_))));
}

#[test]
fn clamp_positional_and_keyword_are_identical() {
    let expected = r#"{"type":"minecraft:clamp","input":1.0,"min":2.0,"max":3.0}"#;
    assert_eq!(compile_json("clamp(1, 2, 3)"), expected);
    assert_eq!(compile_json("clamp(input=1, min=2, max=3)"), expected);
    assert_eq!(compile_json("clamp(max=3, min=2, input=1)"), expected);
}

#[test]
fn single_argument_arity_is_enforced() {
    assert_eq!(
        lower_error("abs(1, 2)"),
        LowerError::WrongArgumentCount {
            function: "abs",
            expected: 1,
            found: 2
        }
    );
}

#[test]
fn duplicate_binding_is_rejected() {
    assert_eq!(
        lower_error("min(1, argument1=5)"),
        LowerError::DuplicateArgument {
            function: "min",
            param: "argument1"
        }
    );
}

#[test]
fn unknown_function_is_rejected() {
    let err = lower_error("foo(1)");
    assert_eq!(
        err,
        LowerError::UnknownFunction {
            name: "foo".to_owned()
        }
    );
    assert_eq!(err.to_string(), "Unknown function 'foo'");
}

#[test]
fn string_reference_arguments() {
    assert_eq!(
        compile_json(r#"shift_a("some_noise")"#),
        r#"{"type":"minecraft:shift_a","argument":"some_noise"}"#
    );
    assert!(matches!(
        lower_error("shift_a(1)"),
        LowerError::ExpectedString { function: "shift_a", .. }
    ));
}

#[test]
fn every_zero_and_single_function_lowers() {
    for def in density_expr::registry::functions() {
        let src = match def.arity {
            density_expr::registry::Arity::Zero => format!("{}()", def.name),
            density_expr::registry::Arity::Single => format!("{}('x')", def.name),
            density_expr::registry::Arity::Multi(_) => continue,
        };
        let value = compile(&src).unwrap();
        let node = value.as_node().unwrap();
        assert_eq!(node.type_name(), format!("minecraft:{}", def.name));
    }
}

#[test]
fn front_end_rejections_surface_as_lowering_errors() {
    assert!(matches!(
        lower_error("5 % 2"),
        LowerError::UnsupportedOperator { op: "%", .. }
    ));
    assert!(matches!(
        lower_error("abs('x') ** 0.5"),
        LowerError::UnsupportedPower { .. }
    ));
    assert!(matches!(
        lower_error("abs('x') ** -2"),
        LowerError::UnsupportedPower { .. }
    ));
    assert!(matches!(
        lower_error("a.b(1)"),
        LowerError::InvalidCallTarget { .. }
    ));
    assert!(matches!(
        lower_error("x + 1"),
        LowerError::InvalidExpression { .. }
    ));
    assert!(matches!(
        lower_error("true"),
        LowerError::InvalidConstant { .. }
    ));
}

#[test]
fn lowering_leaves_the_input_untouched() {
    let expr = parse_expr("clamp(abs('n') - 1, -1, 1) ** 5").unwrap();
    let before = expr.clone();
    let first = lower(&expr).unwrap();
    let second = lower(&expr).unwrap();
    assert_eq!(expr, before);
    assert_eq!(first, second);
}
