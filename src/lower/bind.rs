use crate::density::{DensityNode, DensityValue};
use crate::expression::ast::{Expr, Keyword};
use crate::lower::Lowerer;
use crate::lower::error::{ArgRef, LowerError};
use crate::registry::{Param, ValueKind};

impl Lowerer {
    /// Binds a multi-argument call: positionals left to right, then keywords by
    /// name. Parameters left unbound are omitted from the node.
    pub(super) fn bind_call(
        &self,
        function: &'static str,
        params: &'static [Param],
        args: &[Expr],
        keywords: &[Keyword],
        depth: usize,
    ) -> Result<DensityNode, LowerError> {
        if args.len() > params.len() {
            return Err(LowerError::TooManyArguments {
                function,
                max: params.len(),
                found: args.len(),
            });
        }

        let mut slots: Vec<Option<DensityValue>> = vec![None; params.len()];

        for (i, (arg, param)) in args.iter().zip(params).enumerate() {
            let value = self.lower_at(arg, depth)?;
            slots[i] = Some(check_kind(function, param.kind, ArgRef::Position(i), value)?);
        }

        for kw in keywords {
            let Some(i) = params.iter().position(|p| p.name == kw.name) else {
                return Err(LowerError::UnknownKeyword {
                    function,
                    keyword: kw.name.clone(),
                });
            };
            let param = &params[i];
            if slots[i].is_some() {
                return Err(LowerError::DuplicateArgument {
                    function,
                    param: param.name,
                });
            }
            let value = self.lower_at(&kw.value, depth)?;
            slots[i] = Some(check_kind(
                function,
                param.kind,
                ArgRef::Keyword(kw.name.clone()),
                value,
            )?);
        }

        let mut node = DensityNode::new(function);
        for (param, slot) in params.iter().zip(slots) {
            if let Some(value) = slot {
                node = node.with(param.name, value);
            }
        }
        Ok(node)
    }
}

/// Checks a lowered argument against its declared kind.
fn check_kind(
    function: &'static str,
    kind: ValueKind,
    arg: ArgRef,
    value: DensityValue,
) -> Result<DensityValue, LowerError> {
    match (kind, &value) {
        (ValueKind::Const, DensityValue::Number(_))
        | (ValueKind::Str, DensityValue::Str(_))
        | (ValueKind::Expr, _) => Ok(value),
        (ValueKind::Const, _) => Err(LowerError::ExpectedConstant { function, arg }),
        (ValueKind::Str, _) => Err(LowerError::ExpectedString { function, arg }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::ast::{BinaryOp, UnaryOp};
    use crate::lower::lower;
    use serde_json::json;

    fn lower_json(e: &Expr) -> serde_json::Value {
        serde_json::to_value(lower(e).unwrap()).unwrap()
    }

    fn kw(name: &str, value: Expr) -> Keyword {
        Keyword::new(name, value)
    }

    #[test]
    fn positional_and_keyword_spellings_agree() {
        let positional = Expr::call(
            "clamp",
            vec![Expr::int(1), Expr::int(2), Expr::int(3)],
            vec![],
        );
        let keywords = Expr::call(
            "clamp",
            vec![],
            vec![
                kw("max", Expr::int(3)),
                kw("input", Expr::int(1)),
                kw("min", Expr::int(2)),
            ],
        );
        let expected = json!({"type": "minecraft:clamp", "input": 1.0, "min": 2.0, "max": 3.0});
        assert_eq!(lower_json(&positional), expected);
        assert_eq!(lower_json(&keywords), expected);
        assert_eq!(
            lower(&positional).unwrap().to_json_string(false).unwrap(),
            lower(&keywords).unwrap().to_json_string(false).unwrap()
        );
    }

    #[test]
    fn mixes_positional_and_keyword_arguments() {
        let e = Expr::call(
            "noise",
            vec![Expr::string("minecraft:ridge")],
            vec![kw("y_scale", Expr::float(0.5))],
        );
        assert_eq!(
            lower_json(&e),
            json!({"type": "minecraft:noise", "noise": "minecraft:ridge", "y_scale": 0.5})
        );
    }

    #[test]
    fn unbound_parameters_are_omitted() {
        let e = Expr::call("clamp", vec![Expr::string("x")], vec![]);
        assert_eq!(lower_json(&e), json!({"type": "minecraft:clamp", "input": "x"}));
    }

    #[test]
    fn constants_accept_folded_negation() {
        let e = Expr::call(
            "clamp",
            vec![
                Expr::string("x"),
                Expr::unary(UnaryOp::Minus, Expr::int(1)),
                Expr::int(1),
            ],
            vec![],
        );
        assert_eq!(
            lower_json(&e),
            json!({"type": "minecraft:clamp", "input": "x", "min": -1.0, "max": 1.0})
        );
    }

    #[test]
    fn rejects_too_many_positionals() {
        let e = Expr::call("min", vec![Expr::int(1), Expr::int(2), Expr::int(3)], vec![]);
        assert_eq!(
            lower(&e).unwrap_err(),
            LowerError::TooManyArguments {
                function: "min",
                max: 2,
                found: 3
            }
        );
    }

    #[test]
    fn rejects_argument_bound_twice() {
        let e = Expr::call("min", vec![Expr::int(1)], vec![kw("argument1", Expr::int(5))]);
        assert_eq!(
            lower(&e).unwrap_err(),
            LowerError::DuplicateArgument {
                function: "min",
                param: "argument1"
            }
        );

        let e = Expr::call(
            "min",
            vec![],
            vec![kw("argument2", Expr::int(1)), kw("argument2", Expr::int(2))],
        );
        assert!(matches!(
            lower(&e).unwrap_err(),
            LowerError::DuplicateArgument {
                param: "argument2",
                ..
            }
        ));
    }

    #[test]
    fn rejects_unknown_keyword() {
        let e = Expr::call("clamp", vec![], vec![kw("maximum", Expr::int(1))]);
        assert_eq!(
            lower(&e).unwrap_err(),
            LowerError::UnknownKeyword {
                function: "clamp",
                keyword: "maximum".to_owned()
            }
        );
    }

    #[test]
    fn const_parameters_reject_expressions() {
        let e = Expr::call(
            "clamp",
            vec![
                Expr::string("x"),
                Expr::binary(Expr::int(1), BinaryOp::Add, Expr::int(1)),
            ],
            vec![],
        );
        assert_eq!(
            lower(&e).unwrap_err(),
            LowerError::ExpectedConstant {
                function: "clamp",
                arg: ArgRef::Position(1)
            }
        );

        let e = Expr::call("clamp", vec![], vec![kw("max", Expr::string("a"))]);
        assert_eq!(
            lower(&e).unwrap_err(),
            LowerError::ExpectedConstant {
                function: "clamp",
                arg: ArgRef::Keyword("max".to_owned())
            }
        );
    }

    #[test]
    fn string_parameters_require_string_literals() {
        let ok = Expr::call("shift_a", vec![Expr::string("some_noise")], vec![]);
        assert_eq!(
            lower_json(&ok),
            json!({"type": "minecraft:shift_a", "argument": "some_noise"})
        );

        let bad = Expr::call("shift_a", vec![Expr::int(1)], vec![]);
        assert_eq!(
            lower(&bad).unwrap_err(),
            LowerError::ExpectedString {
                function: "shift_a",
                arg: ArgRef::Position(0)
            }
        );
    }

    #[test]
    fn check_kind_accepts_anything_for_expressions() {
        for value in [
            DensityValue::Number(1.0),
            DensityValue::Str("a".to_owned()),
            DensityNode::new("beardifier").into(),
        ] {
            assert_eq!(
                check_kind("min", ValueKind::Expr, ArgRef::Position(0), value.clone()),
                Ok(value)
            );
        }
    }
}
