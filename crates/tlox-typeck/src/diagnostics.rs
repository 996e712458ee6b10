//! Ariadne-based diagnostic rendering for type errors.
//!
//! Renders `TypeError` values into labeled, colorless reports, and into
//! JSON objects for tools. Each diagnostic carries a stable code and, when
//! a plausible fix exists, a help line.

use std::ops::Range;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};

use crate::classes::ClassTable;
use crate::error::TypeError;
use crate::ty::Ty;

/// Code used for leftover type variables reported as warnings.
pub const UNRESOLVED_WARNING_CODE: &str = "W0001";

// ── Error Codes ────────────────────────────────────────────────────────

/// Assign a unique error code to each TypeError variant.
pub fn error_code(err: &TypeError) -> &'static str {
    match err {
        TypeError::UndefinedClass { .. } => "E0001",
        TypeError::NotAClass { .. } => "E0002",
        TypeError::MemberNotFound { .. } => "E0003",
        TypeError::UnsupportedMemberTarget { .. } => "E0004",
        TypeError::ArityMismatch { .. } => "E0005",
        TypeError::ClassMismatch { .. } => "E0006",
        TypeError::CannotUnify { .. } => "E0007",
        TypeError::InfiniteType { .. } => "E0008",
        TypeError::NotAssignable { .. } => "E0009",
        TypeError::UndefinedIdentifier { .. } => "E0010",
        TypeError::UnresolvedType { .. } => "E0011",
        TypeError::TypeParamConflict { .. } => "E0012",
    }
}

// ── Span Helpers ───────────────────────────────────────────────────────

/// Convert a rowan TextRange to a Rust Range<usize> for ariadne.
fn text_range_to_range(range: rowan::TextRange) -> Range<usize> {
    let start: usize = range.start().into();
    let end: usize = range.end().into();
    start..end
}

// ── Fix Suggestions ────────────────────────────────────────────────────

/// Generate a fix suggestion based on expected and found types.
pub fn fix_suggestion(expected: &Ty, found: &Ty, classes: &ClassTable) -> Option<String> {
    if *expected == Ty::int() && *found == Ty::string() {
        return Some("use parseInt() to convert the string".to_string());
    }
    if *expected == Ty::string() && *found == Ty::int() {
        return Some("use toString() to convert the int".to_string());
    }
    if *expected == Ty::bool() && *found != Ty::bool() {
        return Some("expected a boolean expression".to_string());
    }
    if let (Some(_), Some(_)) = (expected.class_name(), found.class_name()) {
        if classes.is_assignable(found, expected) {
            return Some(format!("consider upcasting `{}` to `{}`", found, expected));
        }
    }
    None
}

/// The label and optional help line for an error.
fn describe(error: &TypeError, classes: &ClassTable) -> (String, Option<String>) {
    match error {
        TypeError::UndefinedClass { name, .. } => (format!("no class named `{}` in scope", name), None),
        TypeError::NotAClass { name, found, .. } => (
            format!("`{}` names `{}`", name, found),
            Some("only classes can be instantiated with `new`".to_string()),
        ),
        TypeError::MemberNotFound { ty, member, .. } => {
            let help = ty.class_name().and_then(|n| classes.get(n)).and_then(|info| {
                let members: Vec<&str> = info
                    .field_names()
                    .chain(info.methods.iter().map(String::as_str))
                    .collect();
                (!members.is_empty()).then(|| format!("available members: {}", members.join(", ")))
            });
            (format!("`{}` has no member `{}`", ty, member), help)
        }
        TypeError::UnsupportedMemberTarget { ty, .. } => (
            format!("`{}` has no members", ty),
            Some("member access requires a class instance".to_string()),
        ),
        TypeError::ArityMismatch {
            expected, found, ..
        } => {
            let help = if found < expected {
                format!("missing {} argument(s)", expected - found)
            } else {
                format!("{} extra argument(s)", found - expected)
            };
            (format!("expected {}, found {}", expected, found), Some(help))
        }
        TypeError::ClassMismatch {
            expected, found, ..
        }
        | TypeError::CannotUnify {
            expected, found, ..
        } => (
            format!("expected {}, found {}", expected, found),
            fix_suggestion(expected, found, classes),
        ),
        TypeError::NotAssignable { from, to, .. } => (
            format!("`{}` cannot be used as `{}`", from, to),
            fix_suggestion(to, from, classes),
        ),
        TypeError::InfiniteType { var, ty, .. } => (
            format!("`{}` would contain itself in `{}`", var, ty),
            Some("a value cannot have a type that refers to itself".to_string()),
        ),
        TypeError::UndefinedIdentifier { .. } => ("not found in this scope".to_string(), None),
        TypeError::UnresolvedType { ty, .. } => (
            format!("inferred as `{}`", ty),
            Some("add a type annotation".to_string()),
        ),
        TypeError::TypeParamConflict { first, second, .. } => (
            format!("bound to `{}`, then to `{}`", first, second),
            None,
        ),
    }
}

// ── Main Rendering Functions ───────────────────────────────────────────

/// Render a type error into a formatted diagnostic string using ariadne.
///
/// The output is colorless for consistent test snapshots. An error without
/// a source range is labeled at the start of the file.
pub fn render_diagnostic(error: &TypeError, classes: &ClassTable, source: &str, filename: &str) -> String {
    render(ReportKind::Error, error_code(error), error, classes, source, filename)
}

/// Render a leftover-type-variable warning.
pub fn render_warning(error: &TypeError, classes: &ClassTable, source: &str, filename: &str) -> String {
    render(ReportKind::Warning, UNRESOLVED_WARNING_CODE, error, classes, source, filename)
}

fn render(
    kind: ReportKind<'_>,
    code: &str,
    error: &TypeError,
    classes: &ClassTable,
    source: &str,
    _filename: &str,
) -> String {
    let config = Config::default().with_color(false);
    let source_len = source.len();

    // Clamp a range to be valid within source bounds.
    let clamp = |r: Range<usize>| -> Range<usize> {
        let s = r.start.min(source_len);
        let e = r.end.min(source_len).max(s);
        // Ensure non-empty span for ariadne (it needs at least 1-char span).
        if s == e {
            s..e.saturating_add(1).min(source_len)
        } else {
            s..e
        }
    };

    let span = clamp(error.span().map(text_range_to_range).unwrap_or(0..0));
    let (label, help) = describe(error, classes);

    let mut builder = Report::build(kind, span.clone())
        .with_code(code)
        .with_message(error.to_string())
        .with_config(config)
        .with_label(Label::new(span).with_message(label).with_color(Color::Red));
    if let Some(help) = help {
        builder.set_help(help);
    }
    let report = builder.finish();

    let mut buf = Vec::new();
    let cache = Source::from(source);
    report.write(cache, &mut buf).expect("failed to write diagnostic");
    String::from_utf8(buf).expect("diagnostic output should be valid UTF-8")
}

/// A machine-readable form of a diagnostic.
pub fn diagnostic_json(error: &TypeError, classes: &ClassTable, filename: &str) -> serde_json::Value {
    to_json("error", error_code(error), error, classes, filename)
}

/// A machine-readable form of a leftover-type-variable warning.
pub fn warning_json(error: &TypeError, classes: &ClassTable, filename: &str) -> serde_json::Value {
    to_json("warning", UNRESOLVED_WARNING_CODE, error, classes, filename)
}

fn to_json(
    severity: &str,
    code: &str,
    error: &TypeError,
    classes: &ClassTable,
    filename: &str,
) -> serde_json::Value {
    let (label, help) = describe(error, classes);
    let spans: Vec<serde_json::Value> = error
        .span()
        .map(text_range_to_range)
        .map(|r| {
            serde_json::json!({
                "start": r.start,
                "end": r.end.max(r.start + 1),
                "label": label
            })
        })
        .into_iter()
        .collect();
    serde_json::json!({
        "code": code,
        "severity": severity,
        "message": error.to_string(),
        "file": filename,
        "spans": spans,
        "fix": help
    })
}
