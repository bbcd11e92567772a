//! Analyzer behavior over whole programs.

use slc_ir::{NodeArena, NodeKind, OpKind};
use slc_types::TypeInfo;

use super::*;
use crate::{DefinitionKind, SemaProblem};

#[test]
fn square_function_types_end_to_end() {
    // (define (sq x:int) (* x x)) (print_int (sq 7))
    let mut nodes = NodeArena::new();
    let x1 = var(&mut nodes, "x");
    let x2 = var(&mut nodes, "x");
    let operands = list_of(&mut nodes, &[x1, x2]);
    let product = list_op(&mut nodes, OpKind::Times, operands);
    let sq = define_function(&mut nodes, "sq", &[("x", TypeInfo::Int)], product);

    let seven = nodes.lit_int(7);
    let sq_call = call(&mut nodes, "sq", &[seven]);
    let print_call = call(&mut nodes, "print_int", &[sq_call]);
    wrap_main(&mut nodes, &[], print_call);

    run(&mut nodes).expect("analysis succeeds");

    assert_eq!(nodes.ty(sq), Some(&TypeInfo::Int));
    assert_eq!(nodes.ty(sq_call), Some(&TypeInfo::Int));
    assert_eq!(nodes.ty(print_call), Some(&TypeInfo::Int));
    assert_eq!(nodes.ty(product), Some(&TypeInfo::Int));
}

#[test]
fn duplicate_variable_definitions_conflict() {
    // (define x 1) (define x 2)
    let mut nodes = NodeArena::new();
    let one = nodes.lit_int(1);
    let first = define_variable(&mut nodes, NodeArena::ROOT, "x", one);
    nodes.set_location(first, 1, 1, "(define x 1)");
    let two = nodes.lit_int(2);
    let second = define_variable(&mut nodes, NodeArena::ROOT, "x", two);
    nodes.set_location(second, 2, 1, "(define x 2)");

    let problem = run(&mut nodes).unwrap_err();
    match problem {
        SemaProblem::ConflictingDefinition {
            kind,
            name,
            location,
            original,
            ..
        } => {
            assert_eq!(kind, DefinitionKind::Variable);
            assert_eq!(name, "x");
            assert_eq!(location.unwrap().line, 2);
            assert_eq!(original.unwrap().line, 1);
        }
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[test]
fn conflict_diagnostic_cites_both_locations() {
    let mut nodes = NodeArena::new();
    let one = nodes.lit_int(1);
    let first = define_variable(&mut nodes, NodeArena::ROOT, "x", one);
    nodes.set_location(first, 1, 1, "(define x 1)");
    let two = nodes.lit_int(2);
    let second = define_variable(&mut nodes, NodeArena::ROOT, "x", two);
    nodes.set_location(second, 2, 1, "(define x 2)");

    let rendered = run(&mut nodes).unwrap_err().into_diagnostic().to_string();
    assert!(rendered.contains("conflicting definition for variable 'x'"));
    assert!(rendered.contains("line 2 column 1"));
    assert!(rendered.contains("line 1 column 1"));
}

#[test]
fn function_name_conflicts_with_variable() {
    let mut nodes = NodeArena::new();
    let one = nodes.lit_int(1);
    define_variable(&mut nodes, NodeArena::ROOT, "thing", one);
    let ret = nodes.lit_int(2);
    define_function(&mut nodes, "thing", &[], ret);

    let rendered = run(&mut nodes).unwrap_err().into_diagnostic().to_string();
    assert!(rendered.contains("conflicting definition for function 'thing'"));
    assert!(rendered.contains("defined as variable"));
}

#[test]
fn car_on_non_list_is_rejected() {
    // (car 5)
    let mut nodes = NodeArena::new();
    let five = nodes.lit_int(5);
    let car = unary(&mut nodes, OpKind::Car, five);
    nodes.set_location(car, 1, 1, "(car 5)");
    wrap_main(&mut nodes, &[], car);

    let problem = run(&mut nodes).unwrap_err();
    let rendered = problem.into_diagnostic().to_string();
    assert!(rendered.contains("attempted car operation on non-list type 'int'"));
}

#[test]
fn if_branches_must_unify() {
    // (if (< 1 2) 3 "four")
    let mut nodes = NodeArena::new();
    let one = nodes.lit_int(1);
    let two = nodes.lit_int(2);
    let cond = binary(&mut nodes, OpKind::Less, one, two);
    let three = nodes.lit_int(3);
    let four = nodes.lit_str("four");
    let branch = if_expr(&mut nodes, cond, three, four);
    wrap_main(&mut nodes, &[], branch);

    let rendered = run(&mut nodes).unwrap_err().into_diagnostic().to_string();
    assert!(
        rendered.contains("type of else expression ('string') does not convert to expected type 'int'")
    );
}

#[test]
fn if_takes_the_affirmative_type() {
    // (if (< 1 2) 3 4.0) — float converts to int, result is int
    let mut nodes = NodeArena::new();
    let one = nodes.lit_int(1);
    let two = nodes.lit_int(2);
    let cond = binary(&mut nodes, OpKind::Less, one, two);
    let three = nodes.lit_int(3);
    let four = nodes.lit_float(4.0);
    let branch = if_expr(&mut nodes, cond, three, four);
    wrap_main(&mut nodes, &[], branch);

    run(&mut nodes).expect("analysis succeeds");
    assert_eq!(nodes.ty(branch), Some(&TypeInfo::Int));
    assert_eq!(nodes.ty(cond), Some(&TypeInfo::Bool));
}

#[test]
fn undefined_variable_is_reported() {
    let mut nodes = NodeArena::new();
    let x = var(&mut nodes, "x");
    nodes.set_location(x, 4, 2, "x");
    wrap_main(&mut nodes, &[], x);

    let problem = run(&mut nodes).unwrap_err();
    assert!(matches!(
        problem,
        SemaProblem::UndefinedVariable { ref name, .. } if name == "x"
    ));
}

#[test]
fn undefined_function_is_reported() {
    let mut nodes = NodeArena::new();
    let seven = nodes.lit_int(7);
    let missing = call(&mut nodes, "nope", &[seven]);
    wrap_main(&mut nodes, &[], missing);

    let problem = run(&mut nodes).unwrap_err();
    assert!(matches!(
        problem,
        SemaProblem::UndefinedFunction { ref name, .. } if name == "nope"
    ));
}

#[test]
fn arity_is_checked_both_ways() {
    let mut nodes = NodeArena::new();
    let x = var(&mut nodes, "x");
    define_function(&mut nodes, "id", &[("x", TypeInfo::Int)], x);
    let empty = call(&mut nodes, "id", &[]);
    wrap_main(&mut nodes, &[], empty);

    let problem = run(&mut nodes).unwrap_err();
    assert!(matches!(
        problem,
        SemaProblem::TooFewArguments { got: 0, expected: 1, .. }
    ));

    let mut nodes = NodeArena::new();
    let x = var(&mut nodes, "x");
    define_function(&mut nodes, "id", &[("x", TypeInfo::Int)], x);
    let a = nodes.lit_int(1);
    let b = nodes.lit_int(2);
    let overfull = call(&mut nodes, "id", &[a, b]);
    wrap_main(&mut nodes, &[], overfull);

    let problem = run(&mut nodes).unwrap_err();
    assert!(matches!(
        problem,
        SemaProblem::TooManyArguments { got: 2, expected: 1, .. }
    ));
}

#[test]
fn argument_types_must_convert() {
    let mut nodes = NodeArena::new();
    let x = var(&mut nodes, "x");
    define_function(&mut nodes, "id", &[("x", TypeInfo::Int)], x);
    let text = nodes.lit_str("oops");
    let bad = call(&mut nodes, "id", &[text]);
    wrap_main(&mut nodes, &[], bad);

    let problem = run(&mut nodes).unwrap_err();
    assert!(matches!(
        problem,
        SemaProblem::InvalidArgument { ref got, ref expected, .. }
            if *got == TypeInfo::Str && *expected == TypeInfo::Int
    ));
}

#[test]
fn int_list_sum_types_as_int() {
    // (print_int (+ (list 1 2 3 4)))
    let mut nodes = NodeArena::new();
    let elems: Vec<_> = [1, 2, 3, 4].iter().map(|&v| nodes.lit_int(v)).collect();
    let list = list_of(&mut nodes, &elems);
    let sum = list_op(&mut nodes, OpKind::Plus, list);
    let print = call(&mut nodes, "print_int", &[sum]);
    wrap_main(&mut nodes, &[], print);

    run(&mut nodes).expect("analysis succeeds");
    assert_eq!(nodes.ty(sum), Some(&TypeInfo::Int));
    assert_eq!(nodes.ty(list), Some(&TypeInfo::list_of(TypeInfo::Int)));
}

#[test]
fn float_list_sum_types_as_float() {
    // (print_double (+ (list 1.0 2.5 3.5)))
    let mut nodes = NodeArena::new();
    let elems: Vec<_> = [1.0, 2.5, 3.5].iter().map(|&v| nodes.lit_float(v)).collect();
    let list = list_of(&mut nodes, &elems);
    let sum = list_op(&mut nodes, OpKind::Plus, list);
    let print = call(&mut nodes, "print_double", &[sum]);
    wrap_main(&mut nodes, &[], print);

    run(&mut nodes).expect("analysis succeeds");
    assert_eq!(nodes.ty(sum), Some(&TypeInfo::Float));
}

#[test]
fn list_subtype_rejects_incompatible_elements() {
    // (list 1 "two") — string does not convert to int
    let mut nodes = NodeArena::new();
    let one = nodes.lit_int(1);
    let two = nodes.lit_str("two");
    let list = list_of(&mut nodes, &[one, two]);
    let sum = list_op(&mut nodes, OpKind::Plus, list);
    wrap_main(&mut nodes, &[], sum);

    let problem = run(&mut nodes).unwrap_err();
    assert!(matches!(
        problem,
        SemaProblem::IncompatibleListElement { ref got, .. } if *got == TypeInfo::Str
    ));
}

#[test]
fn subtraction_requires_numeric_elements() {
    let mut nodes = NodeArena::new();
    let a = nodes.lit_str("a");
    let b = nodes.lit_str("b");
    let list = list_of(&mut nodes, &[a, b]);
    let diff = list_op(&mut nodes, OpKind::Minus, list);
    wrap_main(&mut nodes, &[], diff);

    let problem = run(&mut nodes).unwrap_err();
    assert!(matches!(problem, SemaProblem::InvalidListOperands { .. }));
}

#[test]
fn logical_list_ops_yield_bool() {
    let mut nodes = NodeArena::new();
    let a = nodes.lit_int(1);
    let b = nodes.lit_int(0);
    let list = list_of(&mut nodes, &[a, b]);
    let any = list_op(&mut nodes, OpKind::Or, list);
    wrap_main(&mut nodes, &[], any);

    run(&mut nodes).expect("analysis succeeds");
    assert_eq!(nodes.ty(any), Some(&TypeInfo::Bool));
}

#[test]
fn cons_types_as_the_list() {
    // (cons 0 (list 1 2))
    let mut nodes = NodeArena::new();
    let one = nodes.lit_int(1);
    let two = nodes.lit_int(2);
    let list = list_of(&mut nodes, &[one, two]);
    let zero = nodes.lit_int(0);
    let cons = binary(&mut nodes, OpKind::Cons, zero, list);
    wrap_main(&mut nodes, &[], cons);

    run(&mut nodes).expect("analysis succeeds");
    assert_eq!(nodes.ty(cons), Some(&TypeInfo::list_of(TypeInfo::Int)));
}

#[test]
fn cons_element_must_convert() {
    // (cons "x" (list 1 2))
    let mut nodes = NodeArena::new();
    let one = nodes.lit_int(1);
    let two = nodes.lit_int(2);
    let list = list_of(&mut nodes, &[one, two]);
    let text = nodes.lit_str("x");
    let cons = binary(&mut nodes, OpKind::Cons, text, list);
    wrap_main(&mut nodes, &[], cons);

    let rendered = run(&mut nodes).unwrap_err().into_diagnostic().to_string();
    assert!(rendered.contains("cannot convert type 'string' to 'int' in 'cons'"));
}

#[test]
fn lambda_bound_variable_is_callable() {
    // (define dbl (lambda (x:int) (+ (list x x)))) (dbl 4)
    let mut nodes = NodeArena::new();
    let lambda = nodes.alloc(NodeKind::Lambda, "");
    let formal = nodes.alloc(NodeKind::Formal, "x");
    nodes.set_type(formal, TypeInfo::Int);
    nodes.add_child(lambda, formal);
    let x1 = var(&mut nodes, "x");
    let x2 = var(&mut nodes, "x");
    let operands = list_of(&mut nodes, &[x1, x2]);
    let sum = list_op(&mut nodes, OpKind::Plus, operands);
    let b = body(&mut nodes, &[], sum);
    nodes.add_child(lambda, b);
    let def = define_variable(&mut nodes, NodeArena::ROOT, "dbl", lambda);

    let four = nodes.lit_int(4);
    let dbl_call = call(&mut nodes, "dbl", &[four]);
    wrap_main(&mut nodes, &[], dbl_call);

    run(&mut nodes).expect("analysis succeeds");
    assert_eq!(nodes.ty(dbl_call), Some(&TypeInfo::Int));
    assert_eq!(nodes.ty(def), Some(&TypeInfo::Int));
    // the lambda received a synthesized name
    assert!(nodes.get(lambda).name.starts_with("__lambda_"));
    match nodes.get(dbl_call).kind {
        NodeKind::FunctionCall { resolution } => assert_eq!(resolution, Some(lambda)),
        _ => unreachable!(),
    }
}

#[test]
fn calling_a_plain_variable_fails() {
    let mut nodes = NodeArena::new();
    let one = nodes.lit_int(1);
    define_variable(&mut nodes, NodeArena::ROOT, "x", one);
    let bad = call(&mut nodes, "x", &[]);
    wrap_main(&mut nodes, &[], bad);

    let problem = run(&mut nodes).unwrap_err();
    assert!(matches!(problem, SemaProblem::CallToNonCallable { .. }));
}

#[test]
fn analysis_is_idempotent() {
    let mut nodes = NodeArena::new();
    let x1 = var(&mut nodes, "x");
    let x2 = var(&mut nodes, "x");
    let operands = list_of(&mut nodes, &[x1, x2]);
    let product = list_op(&mut nodes, OpKind::Times, operands);
    define_function(&mut nodes, "sq", &[("x", TypeInfo::Int)], product);

    let mut scopes = crate::tests::run(&mut nodes).expect("first run");
    let types_before: Vec<_> = nodes.ids().map(|id| nodes.ty(id).cloned()).collect();
    let scope_count = scopes.len();
    let node_count = nodes.len();

    crate::analyze(&mut nodes, &mut scopes).expect("second run");
    let types_after: Vec<_> = nodes.ids().map(|id| nodes.ty(id).cloned()).collect();

    assert_eq!(types_before, types_after);
    assert_eq!(scopes.len(), scope_count);
    assert_eq!(nodes.len(), node_count);
}

#[test]
fn print_intrinsics_are_seeded() {
    let mut nodes = NodeArena::new();
    let one = nodes.lit_int(1);
    let print = call(&mut nodes, "print_int", &[one]);
    wrap_main(&mut nodes, &[], print);

    let scopes = run(&mut nodes).expect("analysis succeeds");
    let global = nodes.scope(NodeArena::ROOT).unwrap();
    assert!(scopes.find_function_in(global, "print_int", &nodes).is_some());
    assert!(scopes.find_function_in(global, "print_double", &nodes).is_some());
}

#[test]
fn iterator_over_non_list_is_rejected() {
    let mut nodes = NodeArena::new();
    let five = nodes.lit_int(5);
    let iter = nodes.alloc(NodeKind::IteratorDefinition { list: None }, "i");
    nodes.add_child(iter, five);
    let body_ret = var(&mut nodes, "i");
    let b = body(&mut nodes, &[], body_ret);
    let the_loop = nodes.alloc(NodeKind::DoLoop, "");
    nodes.add_child(the_loop, iter);
    nodes.add_child(the_loop, b);
    wrap_main(&mut nodes, &[], the_loop);

    let rendered = run(&mut nodes).unwrap_err().into_diagnostic().to_string();
    assert!(rendered.contains("cannot iterate over type 'int'"));
}

#[test]
fn do_loop_yields_body_type_and_collect_wraps_it() {
    // (do ((i in (list 1 2 3))) (print_int i))
    let mut nodes = NodeArena::new();
    let elems: Vec<_> = [1, 2, 3].iter().map(|&v| nodes.lit_int(v)).collect();
    let list = list_of(&mut nodes, &elems);
    let iter = nodes.alloc(NodeKind::IteratorDefinition { list: None }, "i");
    nodes.add_child(iter, list);
    let i_ref = var(&mut nodes, "i");
    let print = call(&mut nodes, "print_int", &[i_ref]);
    let b = body(&mut nodes, &[], print);
    let the_loop = nodes.alloc(NodeKind::DoLoop, "");
    nodes.add_child(the_loop, iter);
    nodes.add_child(the_loop, b);
    wrap_main(&mut nodes, &[], the_loop);

    run(&mut nodes).expect("analysis succeeds");
    assert_eq!(nodes.ty(the_loop), Some(&TypeInfo::Int));
    assert_eq!(nodes.ty(iter), Some(&TypeInfo::Int));

    // collect variant wraps the body type in a list
    let mut nodes = NodeArena::new();
    let elems: Vec<_> = [1, 2, 3].iter().map(|&v| nodes.lit_int(v)).collect();
    let list = list_of(&mut nodes, &elems);
    let iter = nodes.alloc(NodeKind::IteratorDefinition { list: None }, "i");
    nodes.add_child(iter, list);
    let i_ref = var(&mut nodes, "i");
    let b = body(&mut nodes, &[], i_ref);
    let the_loop = nodes.alloc(NodeKind::CollectLoop, "");
    nodes.add_child(the_loop, iter);
    nodes.add_child(the_loop, b);
    wrap_main(&mut nodes, &[], the_loop);

    run(&mut nodes).expect("analysis succeeds");
    assert_eq!(nodes.ty(the_loop), Some(&TypeInfo::list_of(TypeInfo::Int)));
}

#[test]
fn set_expression_resolves_and_types() {
    let mut nodes = NodeArena::new();
    let one = nodes.lit_int(1);
    let def = define_variable(&mut nodes, NodeArena::ROOT, "x", one);
    let two = nodes.lit_int(2);
    let set = nodes.alloc(NodeKind::SetExpression { resolution: None }, "x");
    nodes.add_child(set, two);
    wrap_main(&mut nodes, &[], set);

    run(&mut nodes).expect("analysis succeeds");
    assert_eq!(nodes.ty(set), Some(&TypeInfo::Int));
    match nodes.get(set).kind {
        NodeKind::SetExpression { resolution } => assert_eq!(resolution, Some(def)),
        _ => unreachable!(),
    }
}

#[test]
fn variable_definition_rejects_extra_initializers() {
    let mut nodes = NodeArena::new();
    let def = nodes.alloc(NodeKind::VariableDefinition, "x");
    let one = nodes.lit_int(1);
    let two = nodes.lit_int(2);
    nodes.add_child(def, one);
    nodes.add_child(def, two);
    nodes.add_child(NodeArena::ROOT, def);

    let problem = run(&mut nodes).unwrap_err();
    assert!(matches!(problem, SemaProblem::TooManyInitializers { .. }));
}
