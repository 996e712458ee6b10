//! Integration tests for classes: fields, methods, constructors,
//! inheritance and member access.

use tlox_ast::{BinOp, ClassDecl, CtorDecl, Expr, ExprKind, FieldDecl, FnDecl, Param, Stmt};
use tlox_typeck::collect::ctor_symbol;
use tlox_typeck::error::TypeError;
use tlox_typeck::ty::Ty;
use tlox_typeck::{check, check_with_config, CtorResolution, InferConfig, TypeckResult};

// ── Helpers ────────────────────────────────────────────────────────────

fn assert_ok(result: &TypeckResult) {
    assert!(
        result.errors.is_empty(),
        "expected no errors, got: {:?}",
        result.errors
    );
}

fn assert_has_error<F: Fn(&TypeError) -> bool>(result: &TypeckResult, pred: F, desc: &str) {
    assert!(
        result.errors.iter().any(|e| pred(e)),
        "expected error matching `{}`, got errors: {:?}",
        desc,
        result.errors
    );
}

fn stmt_ty(program: &[Stmt], idx: usize) -> Ty {
    program[idx]
        .ty()
        .cloned()
        .unwrap_or_else(|| panic!("statement {} has no type", idx))
}

fn typed_field(name: &str, ty: Ty) -> FieldDecl {
    FieldDecl::new(name, Some(ty), None)
}

/// class Point { x: int; y: int; Point(x: int, y: int) {} }
fn point_class() -> Stmt {
    ClassDecl::new("Point")
        .field(typed_field("x", Ty::int()))
        .field(typed_field("y", Ty::int()))
        .constructor(CtorDecl::new(
            "Point",
            vec![Param::typed("x", Ty::int()), Param::typed("y", Ty::int())],
            vec![],
        ))
        .into()
}

/// class A {}  class B extends A {}  class C extends B {}
fn chain() -> Vec<Stmt> {
    vec![
        ClassDecl::new("A").into(),
        ClassDecl::new("B").extends("A").into(),
        ClassDecl::new("C").extends("B").into(),
    ]
}

// ── Construction and Fields ────────────────────────────────────────────

#[test]
fn test_construct_and_read_field() {
    // var p = new Point(1, 2); var px = p.x;
    let mut program = vec![
        point_class(),
        Stmt::var(
            "p",
            None,
            Some(Expr::new_instance("Point", vec![Expr::int(1), Expr::int(2)])),
        ),
        Stmt::var("px", None, Some(Expr::member(Expr::ident("p"), "x"))),
    ];
    let result = check(&mut program);
    assert_ok(&result);
    assert_eq!(stmt_ty(&program, 0), Ty::class("Point"));
    assert_eq!(stmt_ty(&program, 1), Ty::class("Point"));
    assert_eq!(stmt_ty(&program, 2), Ty::int());

    match &program[0] {
        Stmt::Class(decl) => assert_eq!(
            decl.ctors[0].ty,
            Some(Ty::fun(vec![Ty::int(), Ty::int()], Ty::class("Point")))
        ),
        other => panic!("expected class, got {:?}", other),
    }

    let info = result.classes.get("Point").expect("Point should be collected");
    assert_eq!(info.field_names().collect::<Vec<_>>(), vec!["x", "y"]);
    assert_eq!(info.field_ty("x"), Some(&Ty::int()));
    assert!(info.superclass.is_none());
}

#[test]
fn test_constructor_argument_mismatch() {
    let mut program = vec![
        point_class(),
        Stmt::var(
            "p",
            None,
            Some(Expr::new_instance("Point", vec![Expr::int(1), Expr::string("two")])),
        ),
    ];
    let result = check(&mut program);
    // Scoring rejects the only candidate, so the arity fallback picks it and
    // the argument check reports the mismatch.
    assert_has_error(
        &result,
        |e| matches!(e, TypeError::NotAssignable { from, to, .. } if *from == Ty::string() && *to == Ty::int()),
        "NotAssignable(string, int)",
    );
}

#[test]
fn test_constructor_resolution_modes() {
    // class P { P(a: string) {} P(a: int) {} }  var p = new P(1);
    let program = || {
        vec![
            ClassDecl::new("P")
                .constructor(CtorDecl::new("P", vec![Param::typed("a", Ty::string())], vec![]))
                .constructor(CtorDecl::new("P", vec![Param::typed("a", Ty::int())], vec![]))
                .into(),
            Stmt::var("p", None, Some(Expr::new_instance("P", vec![Expr::int(1)]))),
        ]
    };

    let mut scored = program();
    assert_ok(&check(&mut scored));

    let config = InferConfig {
        constructor_resolution: CtorResolution::Arity,
        ..InferConfig::default()
    };
    let mut by_arity = program();
    let result = check_with_config(&mut by_arity, &config);
    assert_has_error(
        &result,
        |e| matches!(e, TypeError::NotAssignable { .. }),
        "NotAssignable",
    );
}

#[test]
fn test_class_without_constructor() {
    let mut program = vec![
        ClassDecl::new("Empty").into(),
        Stmt::var("e", None, Some(Expr::new_instance("Empty", vec![Expr::int(1)]))),
    ];
    assert_ok(&check(&mut program));
    assert_eq!(stmt_ty(&program, 1), Ty::class("Empty"));
}

#[test]
fn test_constructor_body_assigns_through_this() {
    // class Point { x: int; Point(x: int) { this.x = x; } }
    let mut program = vec![ClassDecl::new("Point")
        .field(typed_field("x", Ty::int()))
        .constructor(CtorDecl::new(
            "Point",
            vec![Param::typed("x", Ty::int())],
            vec![Stmt::expr(Expr::assign(
                Expr::member(Expr::ident("this"), "x"),
                Expr::ident("x"),
            ))],
        ))
        .into()];
    assert_ok(&check(&mut program));
}

#[test]
fn test_untyped_field_takes_initializer_type() {
    // class Counter { count = 0; }  var n = new Counter().count;
    let mut program = vec![
        ClassDecl::new("Counter")
            .field(FieldDecl::new("count", None, Some(Expr::int(0))))
            .into(),
        Stmt::var(
            "n",
            None,
            Some(Expr::member(Expr::new_instance("Counter", vec![]), "count")),
        ),
    ];
    assert_ok(&check(&mut program));
    assert_eq!(stmt_ty(&program, 1), Ty::int());
}

#[test]
fn test_untyped_field_without_initializer_reuses_collected_type() {
    // class Box { slot; }
    let config = InferConfig {
        deny_unresolved: false,
        ..InferConfig::default()
    };
    let mut program = vec![ClassDecl::new("Box")
        .field(FieldDecl::new("slot", None, None))
        .into()];
    let result = check_with_config(&mut program, &config);
    assert_ok(&result);
    assert_eq!(result.constraint_count, 0);
    assert_eq!(result.warnings.len(), 1);

    let collected = result.classes.get("Box").unwrap().field_ty("slot").cloned();
    match &program[0] {
        Stmt::Class(decl) => assert_eq!(decl.fields[0].ty, collected),
        other => panic!("expected class, got {:?}", other),
    }
}

#[test]
fn test_constructor_before_class_is_untyped() {
    // P(a: int) {}  class P {}
    let mut program = vec![
        Stmt::Constructor(CtorDecl::new("P", vec![Param::typed("a", Ty::int())], vec![])),
        ClassDecl::new("P").into(),
    ];
    let result = check(&mut program);
    match stmt_ty(&program, 0) {
        Ty::Fun(params, ret) => {
            assert_eq!(params, vec![Ty::int()]);
            assert!(ret.is_var(), "expected an untyped return, got {}", ret);
        }
        other => panic!("expected a function type, got {}", other),
    }
    assert_eq!(result.errors.len(), 1, "errors: {:?}", result.errors);
    assert!(matches!(result.errors[0], TypeError::UnresolvedType { .. }));
}

#[test]
fn test_constructor_symbol_in_class_scope() {
    // class P { P(a: int) {} fun make() -> P { return P.<init>(1); } }
    let mut program = vec![ClassDecl::new("P")
        .constructor(CtorDecl::new("P", vec![Param::typed("a", Ty::int())], vec![]))
        .method(FnDecl::new(
            "make",
            vec![],
            Some(Ty::class("P")),
            vec![Stmt::ret(Some(Expr::call(
                Expr::ident(ctor_symbol("P")),
                vec![Expr::int(1)],
            )))],
        ))
        .into()];
    assert_ok(&check(&mut program));

    let Stmt::Class(decl) = &program[0] else {
        panic!("expected class");
    };
    let Stmt::Return(ret) = &decl.methods[0].body[0] else {
        panic!("expected return");
    };
    match &ret.value.as_ref().unwrap().kind {
        ExprKind::Call { callee, .. } => assert_eq!(
            callee.ty,
            Some(Ty::fun(vec![Ty::int()], Ty::class("P")))
        ),
        other => panic!("expected call, got {:?}", other),
    }
}

#[test]
fn test_new_undefined_class() {
    let mut program = vec![Stmt::var("q", None, Some(Expr::new_instance("Nope", vec![])))];
    let result = check(&mut program);
    assert_eq!(result.errors.len(), 1);
    insta::assert_snapshot!(result.errors[0], @"undefined class `Nope`");
}

#[test]
fn test_new_on_primitive() {
    let mut program = vec![Stmt::var("q", None, Some(Expr::new_instance("int", vec![])))];
    let result = check(&mut program);
    insta::assert_snapshot!(result.errors[0], @"`int` is not a class (it names `int`)");
}

// ── Methods ────────────────────────────────────────────────────────────

#[test]
fn test_method_call_through_member() {
    // class Point { y: int; fun getY() -> int { return this.y; } }
    // var p = new Point(); var v = p.getY();
    let mut program = vec![
        ClassDecl::new("Point")
            .field(typed_field("y", Ty::int()))
            .method(FnDecl::new(
                "getY",
                vec![],
                Some(Ty::int()),
                vec![Stmt::ret(Some(Expr::member(Expr::ident("this"), "y")))],
            ))
            .into(),
        Stmt::var("p", None, Some(Expr::new_instance("Point", vec![]))),
        Stmt::var(
            "v",
            None,
            Some(Expr::call(Expr::member(Expr::ident("p"), "getY"), vec![])),
        ),
    ];
    let result = check(&mut program);
    assert_ok(&result);
    assert_eq!(stmt_ty(&program, 2), Ty::int());
    assert_eq!(result.classes.get("Point").unwrap().methods, vec!["getY".to_string()]);
}

#[test]
fn test_method_return_checked_against_declaration() {
    let mut program = vec![ClassDecl::new("P")
        .method(FnDecl::new(
            "name",
            vec![],
            Some(Ty::string()),
            vec![Stmt::ret(Some(Expr::int(3)))],
        ))
        .into()];
    let result = check(&mut program);
    assert_has_error(
        &result,
        |e| matches!(e, TypeError::CannotUnify { .. }),
        "CannotUnify",
    );
}

// ── Member Access ──────────────────────────────────────────────────────

#[test]
fn test_missing_member() {
    let mut program = vec![
        point_class(),
        Stmt::var(
            "p",
            None,
            Some(Expr::new_instance("Point", vec![Expr::int(1), Expr::int(2)])),
        ),
        Stmt::var("z", None, Some(Expr::member(Expr::ident("p"), "z"))),
    ];
    let result = check(&mut program);
    assert_eq!(result.errors.len(), 1);
    insta::assert_snapshot!(result.errors[0], @"type `Point` has no member `z`");
}

#[test]
fn test_member_of_unknown_type_does_not_fail() {
    // var o; var m = o.foo;
    let config = InferConfig {
        deny_unresolved: false,
        ..InferConfig::default()
    };
    let mut program = vec![
        Stmt::var("o", None, None),
        Stmt::var("m", None, Some(Expr::member(Expr::ident("o"), "foo"))),
    ];
    let result = check_with_config(&mut program, &config);
    assert_ok(&result);
    assert!(stmt_ty(&program, 1).is_var());
    // var o, var m, the member node and the `o` reference.
    assert_eq!(result.warnings.len(), 4);
}

#[test]
fn test_member_of_primitive() {
    let mut program = vec![
        Stmt::var("n", None, Some(Expr::int(5))),
        Stmt::var("k", None, Some(Expr::member(Expr::ident("n"), "foo"))),
    ];
    let result = check(&mut program);
    insta::assert_snapshot!(result.errors[0], @"cannot access member `foo` on type `int`");
}

#[test]
fn test_field_and_method_share_a_name() {
    // fun read(a: A) -> int { return a.x; }
    // class A { x: int = 1; fun x() -> int { return 2; } }
    // var a = new A(); var v = a.x;
    let mut program = vec![
        FnDecl::new(
            "read",
            vec![Param::typed("a", Ty::class("A"))],
            Some(Ty::int()),
            vec![Stmt::ret(Some(Expr::member(Expr::ident("a"), "x")))],
        )
        .into(),
        ClassDecl::new("A")
            .field(FieldDecl::new("x", Some(Ty::int()), Some(Expr::int(1))))
            .method(FnDecl::new(
                "x",
                vec![],
                Some(Ty::int()),
                vec![Stmt::ret(Some(Expr::int(2)))],
            ))
            .into(),
        Stmt::var("a", None, Some(Expr::new_instance("A", vec![]))),
        Stmt::var("v", None, Some(Expr::member(Expr::ident("a"), "x"))),
    ];
    let result = check(&mut program);
    assert_ok(&result);
    assert_eq!(stmt_ty(&program, 0), Ty::fun(vec![Ty::class("A")], Ty::int()));
    assert_eq!(stmt_ty(&program, 3), Ty::int());
    match &program[1] {
        Stmt::Class(decl) => {
            assert_eq!(decl.fields[0].ty, Some(Ty::int()));
            assert_eq!(decl.methods[0].ty, Some(Ty::fun(vec![], Ty::int())));
        }
        other => panic!("expected class, got {:?}", other),
    }
}

// ── Inheritance ────────────────────────────────────────────────────────

#[test]
fn test_subclass_assignable_to_ancestors() {
    let mut program = chain();
    program.push(Stmt::var("b", Some(Ty::class("B")), Some(Expr::new_instance("C", vec![]))));
    program.push(Stmt::var("a", Some(Ty::class("A")), Some(Expr::new_instance("C", vec![]))));
    let result = check(&mut program);
    assert_ok(&result);
    assert_eq!(result.classes.get("C").unwrap().superclass, Some(Ty::class("B")));
    assert_eq!(
        result.classes.ancestors("C"),
        vec![Ty::class("B"), Ty::class("A")]
    );
}

#[test]
fn test_superclass_not_assignable_to_subclass() {
    let mut program = chain();
    program.push(Stmt::var("c", Some(Ty::class("C")), Some(Expr::new_instance("A", vec![]))));
    let result = check(&mut program);
    insta::assert_snapshot!(result.errors[0], @"type `A` is not assignable to `C`");
}

#[test]
fn test_inherited_member_lookup() {
    // class Animal { name: string; }  class Dog extends Animal {}
    // var d = new Dog(); var n = d.name;
    let program = || {
        vec![
            ClassDecl::new("Animal")
                .field(typed_field("name", Ty::string()))
                .into(),
            ClassDecl::new("Dog").extends("Animal").into(),
            Stmt::var("d", None, Some(Expr::new_instance("Dog", vec![]))),
            Stmt::var("n", None, Some(Expr::member(Expr::ident("d"), "name"))),
        ]
    };

    let mut inherited = program();
    assert_ok(&check(&mut inherited));
    assert_eq!(stmt_ty(&inherited, 3), Ty::string());

    let config = InferConfig {
        inherited_members: false,
        ..InferConfig::default()
    };
    let mut own_only = program();
    let result = check_with_config(&mut own_only, &config);
    assert_has_error(
        &result,
        |e| matches!(e, TypeError::MemberNotFound { .. }),
        "MemberNotFound",
    );
}

#[test]
fn test_unknown_superclass_becomes_root() {
    let mut program = vec![
        ClassDecl::new("Dog").extends("Ghost").into(),
        Stmt::var("d", None, Some(Expr::new_instance("Dog", vec![]))),
    ];
    let result = check(&mut program);
    assert_ok(&result);
    assert!(result.classes.get("Dog").unwrap().superclass.is_none());
}

#[test]
fn test_comparing_unrelated_classes() {
    let mut program = vec![
        ClassDecl::new("Cat").into(),
        ClassDecl::new("Car").into(),
        Stmt::var(
            "same",
            None,
            Some(Expr::binary(
                Expr::new_instance("Cat", vec![]),
                BinOp::Eq,
                Expr::new_instance("Car", vec![]),
            )),
        ),
    ];
    let result = check(&mut program);
    insta::assert_snapshot!(result.errors[0], @"class mismatch: expected `Cat`, found `Car`");
}
