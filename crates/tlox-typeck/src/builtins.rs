//! Built-in type names.

use crate::env::TypeEnv;
use crate::ty::Ty;

/// The primitive type names every program can refer to.
pub fn builtin_types() -> [(&'static str, Ty); 4] {
    [
        ("int", Ty::int()),
        ("string", Ty::string()),
        ("bool", Ty::bool()),
        ("void", Ty::Void),
    ]
}

/// Register the built-in type names in the current (global) scope.
pub fn register_builtins(env: &mut TypeEnv) {
    for (name, ty) in builtin_types() {
        env.define_type(name, ty);
    }
}
