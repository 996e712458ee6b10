//! Integration tests for function overload resolution.

use tlox_ast::{ClassDecl, Expr, ExprKind, FnDecl, Param, Stmt};
use tlox_typeck::error::TypeError;
use tlox_typeck::ty::Ty;
use tlox_typeck::check;

fn func(name: &str, params: Vec<Param>, ret: Ty, body: Vec<Stmt>) -> Stmt {
    FnDecl::new(name, params, Some(ret), body).into()
}

fn callee_ty(stmt: &Stmt) -> Option<Ty> {
    match stmt {
        Stmt::Var(decl) => match &decl.init.as_ref()?.kind {
            ExprKind::Call { callee, .. } => callee.ty.clone(),
            _ => None,
        },
        _ => None,
    }
}

/// fun f(x: int) -> int { return x; }
/// fun f(x: int) -> string { return "a"; }
/// var r = f(5);
fn duplicate_signatures() -> Vec<Stmt> {
    vec![
        func(
            "f",
            vec![Param::typed("x", Ty::int())],
            Ty::int(),
            vec![Stmt::ret(Some(Expr::ident("x")))],
        ),
        func(
            "f",
            vec![Param::typed("x", Ty::int())],
            Ty::string(),
            vec![Stmt::ret(Some(Expr::string("a")))],
        ),
        Stmt::var("r", None, Some(Expr::call(Expr::ident("f"), vec![Expr::int(5)]))),
    ]
}

#[test]
fn test_first_declared_wins_ties() {
    for _ in 0..5 {
        let mut program = duplicate_signatures();
        let result = check(&mut program);
        assert!(result.is_ok(), "errors: {:?}", result.errors);
        assert_eq!(program[2].ty(), Some(&Ty::int()));
        assert_eq!(callee_ty(&program[2]), Some(Ty::fun(vec![Ty::int()], Ty::int())));
    }
}

#[test]
fn test_each_overload_checks_its_own_body() {
    let mut program = duplicate_signatures();
    let result = check(&mut program);
    assert!(result.is_ok(), "errors: {:?}", result.errors);
    assert_eq!(program[0].ty(), Some(&Ty::fun(vec![Ty::int()], Ty::int())));
    assert_eq!(program[1].ty(), Some(&Ty::fun(vec![Ty::int()], Ty::string())));
}

#[test]
fn test_print_overloads() {
    // fun print(v: int) -> void {}  fun print(v: string) -> void {}
    // var a = print(42); var b = print("hi");
    let mut program = vec![
        func("print", vec![Param::typed("v", Ty::int())], Ty::Void, vec![]),
        func("print", vec![Param::typed("v", Ty::string())], Ty::Void, vec![]),
        Stmt::var("a", None, Some(Expr::call(Expr::ident("print"), vec![Expr::int(42)]))),
        Stmt::var("b", None, Some(Expr::call(Expr::ident("print"), vec![Expr::string("hi")]))),
    ];
    let result = check(&mut program);
    assert!(result.is_ok(), "errors: {:?}", result.errors);
    assert_eq!(program[2].ty(), Some(&Ty::Void));
    assert_eq!(callee_ty(&program[2]), Some(Ty::fun(vec![Ty::int()], Ty::Void)));
    assert_eq!(callee_ty(&program[3]), Some(Ty::fun(vec![Ty::string()], Ty::Void)));
}

#[test]
fn test_overload_selected_by_argument_type() {
    let mut program = vec![
        func("show", vec![Param::typed("v", Ty::int())], Ty::string(), vec![Stmt::ret(Some(Expr::string("i")))]),
        func("show", vec![Param::typed("v", Ty::bool())], Ty::int(), vec![Stmt::ret(Some(Expr::int(0)))]),
        Stmt::var("a", None, Some(Expr::call(Expr::ident("show"), vec![Expr::int(1)]))),
        Stmt::var("b", None, Some(Expr::call(Expr::ident("show"), vec![Expr::bool(false)]))),
    ];
    let result = check(&mut program);
    assert!(result.is_ok(), "errors: {:?}", result.errors);
    assert_eq!(program[2].ty(), Some(&Ty::string()));
    assert_eq!(program[3].ty(), Some(&Ty::int()));
}

#[test]
fn test_exact_match_beats_subclass_match() {
    // feed(Animal) -> int, feed(Dog) -> string; feed(new Dog()) picks the Dog version.
    let mut program = vec![
        ClassDecl::new("Animal").into(),
        ClassDecl::new("Dog").extends("Animal").into(),
        func("feed", vec![Param::typed("a", Ty::class("Animal"))], Ty::int(), vec![Stmt::ret(Some(Expr::int(1)))]),
        func("feed", vec![Param::typed("d", Ty::class("Dog"))], Ty::string(), vec![Stmt::ret(Some(Expr::string("woof")))]),
        Stmt::var("r", None, Some(Expr::call(Expr::ident("feed"), vec![Expr::new_instance("Dog", vec![])]))),
        Stmt::var("s", None, Some(Expr::call(Expr::ident("feed"), vec![Expr::new_instance("Animal", vec![])]))),
    ];
    let result = check(&mut program);
    assert!(result.is_ok(), "errors: {:?}", result.errors);
    assert_eq!(program[4].ty(), Some(&Ty::string()));
    assert_eq!(program[5].ty(), Some(&Ty::int()));
}

#[test]
fn test_no_viable_overload_falls_back_to_latest_binding() {
    // With no candidate accepting `string`, the call goes through the name's
    // binding, which is the last declared signature.
    let mut program = vec![
        func("g", vec![Param::typed("v", Ty::int())], Ty::int(), vec![Stmt::ret(Some(Expr::int(1)))]),
        func("g", vec![Param::typed("v", Ty::bool())], Ty::int(), vec![Stmt::ret(Some(Expr::int(2)))]),
        Stmt::var("x", None, Some(Expr::call(Expr::ident("g"), vec![Expr::string("s")]))),
    ];
    let result = check(&mut program);
    assert_eq!(result.errors.len(), 1);
    match &result.errors[0] {
        TypeError::NotAssignable { from, to, .. } => {
            assert_eq!(*from, Ty::string());
            assert_eq!(*to, Ty::bool());
        }
        other => panic!("expected NotAssignable, got {:?}", other),
    }
}

#[test]
fn test_methods_do_not_join_free_function_overloads() {
    // class A { fun get(v: int) -> string { return "s"; } }
    // fun get(v: int) -> int { return 1; }
    // var g = get(1);
    let mut program = vec![
        ClassDecl::new("A")
            .method(FnDecl::new(
                "get",
                vec![Param::typed("v", Ty::int())],
                Some(Ty::string()),
                vec![Stmt::ret(Some(Expr::string("s")))],
            ))
            .into(),
        func("get", vec![Param::typed("v", Ty::int())], Ty::int(), vec![Stmt::ret(Some(Expr::int(1)))]),
        Stmt::var("g", None, Some(Expr::call(Expr::ident("get"), vec![Expr::int(1)]))),
    ];
    let result = check(&mut program);
    assert!(result.is_ok(), "errors: {:?}", result.errors);
    assert_eq!(program[2].ty(), Some(&Ty::int()));
    assert_eq!(callee_ty(&program[2]), Some(Ty::fun(vec![Ty::int()], Ty::int())));
}
