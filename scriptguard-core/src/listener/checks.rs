//! Stateless policy checks shared by listeners and checkers.
//!
//! Each check returns the [`Violation`] to raise, positioned on the
//! offending token.

use crate::error::{SanitizerError, Violation};
use crate::matcher;
use crate::options::{PolicyKeyword, SanitizerOptions};
use scriptguard_syntax::parser::ast::*;
use scriptguard_syntax::Span;

pub type CheckResult = Result<(), Violation>;

pub(crate) fn reject(error: SanitizerError, span: Span) -> Violation {
    tracing::debug!(
        code = error.code(),
        kind = %error.kind(),
        line = span.line,
        column = span.column,
        "policy violation: {}",
        error
    );
    Violation::at(error, span)
}

/// A keyword construct at `span`, allowed only when its toggle is on.
pub fn keyword(options: &SanitizerOptions, keyword: PolicyKeyword, span: Span) -> CheckResult {
    if options.is_keyword_enabled(keyword) {
        Ok(())
    } else {
        Err(reject(SanitizerError::keyword_not_allowed(keyword.as_str()), span))
    }
}

/// A name read from the global scope or a local binding.
pub fn reference(options: &SanitizerOptions, identifier: &Identifier) -> CheckResult {
    if matcher::matches(options, &identifier.name) {
        Ok(())
    } else {
        Err(reject(
            SanitizerError::identifier_not_allowed(identifier.name.as_str()),
            identifier.span,
        ))
    }
}

/// A property name (`a.b`, `a['b']`, `{ b: 1 }`). Only the disallowed set
/// applies.
pub fn property_name(options: &SanitizerOptions, name: &str, span: Span) -> CheckResult {
    if options.is_disallowed(name) {
        Err(reject(SanitizerError::identifier_not_allowed(name), span))
    } else {
        Ok(())
    }
}

/// Static name of a member access, if it has one.
pub fn member_property_name(property: &MemberProperty) -> Option<(&str, Span)> {
    match property {
        MemberProperty::Static(id) => Some((&id.name, id.span)),
        MemberProperty::Computed(expression) => literal_name(expression),
        MemberProperty::Private(_) => None,
    }
}

/// Static name of an object, class or pattern key, if it has one.
pub fn property_key_name(key: &PropertyKey) -> Option<(&str, Span)> {
    match key {
        PropertyKey::Computed(expression) => literal_name(expression),
        other => other.static_name().map(|name| (name, other.span())),
    }
}

/// The string a computed key converts to when the source fixes it: a
/// string literal or a template without substitutions.
///
/// Parentheses and all but the last operand of a comma sequence are looked
/// through, and so is a one-element array, which converts to its element.
pub fn literal_name(expression: &Expression) -> Option<(&str, Span)> {
    let mut expression = expression;
    loop {
        expression = match expression {
            Expression::Parenthesized(inner) => &inner.expression,
            Expression::Sequence(sequence) => sequence.expressions.last()?,
            Expression::Array(array) => match array.elements.as_slice() {
                [Some(element)] if !matches!(element, Expression::Spread(_)) => element,
                _ => return None,
            },
            Expression::Literal(Literal::String(literal)) => return Some((&literal.value, literal.span)),
            Expression::Template(template) if template.expressions.is_empty() => {
                return template.quasis.first().map(|quasi| (quasi.as_str(), template.span));
            }
            _ => return None,
        };
    }
}

/// The target of an assignment, update, `delete` or for-in/of head.
///
/// Plain names that are built-ins or reserved may not be rebound unless
/// they are reserved mutable. Member writes may not reach into a built-in
/// object.
pub fn mutation_target(options: &SanitizerOptions, target: &Expression) -> CheckResult {
    match target {
        Expression::Identifier(id) => {
            let protected = options.is_built_in_object(&id.name) || options.is_reserved(&id.name);
            if protected && !options.is_reserved_mutable(&id.name) {
                Err(reject(SanitizerError::identifier_not_allowed(id.name.as_str()), id.span))
            } else {
                Ok(())
            }
        }
        Expression::Member(member) => match member_root(&member.object) {
            Some(root)
                if options.is_built_in_object(&root.name)
                    && !options.is_reserved_mutable(&root.name) =>
            {
                Err(reject(
                    SanitizerError::identifier_not_allowed(root.name.as_str()),
                    root.span,
                ))
            }
            _ => Ok(()),
        },
        Expression::Parenthesized(inner) => mutation_target(options, &inner.expression),
        Expression::Array(array) => array
            .elements
            .iter()
            .flatten()
            .try_for_each(|element| mutation_target(options, element)),
        Expression::Object(object) => object.properties.iter().try_for_each(|member| match member {
            ObjectMember::Property(property) => mutation_target(options, &property.value),
            ObjectMember::Spread(spread) => mutation_target(options, &spread.argument),
        }),
        Expression::Assignment(assignment) => mutation_target(options, &assignment.target),
        Expression::Spread(spread) => mutation_target(options, &spread.argument),
        _ => Ok(()),
    }
}

/// Leftmost identifier of a member or call chain.
fn member_root(expression: &Expression) -> Option<&Identifier> {
    let mut expression = expression;
    loop {
        expression = match expression {
            Expression::Identifier(id) => return Some(id),
            Expression::Member(member) => &member.object,
            Expression::Call(call) => &call.callee,
            Expression::Parenthesized(inner) => &inner.expression,
            _ => return None,
        };
    }
}

/// The function a top-level statement declares, looking through `export`.
pub fn declared_function(statement: &Statement) -> Option<&Function> {
    match statement {
        Statement::Function(function) => Some(function),
        Statement::Export(export) => match &export.kind {
            ExportKind::Declaration(Statement::Function(function)) => Some(function),
            ExportKind::DefaultFunction(function) => Some(function),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::SanitizerOptionsBuilder;
    use scriptguard_syntax::{parse_program, parse_single_expression};

    #[test]
    fn test_literal_name() {
        let expression = parse_single_expression("('constructor')").unwrap();
        assert_eq!(literal_name(&expression).map(|(n, _)| n), Some("constructor"));

        let expression = parse_single_expression("`__proto__`").unwrap();
        assert_eq!(literal_name(&expression).map(|(n, _)| n), Some("__proto__"));

        let expression = parse_single_expression("`a${b}`").unwrap();
        assert!(literal_name(&expression).is_none());
    }

    #[test]
    fn test_literal_name_folds_arrays_and_sequences() {
        for source in [
            "['constructor']",
            "[['constructor']]",
            "('constr', 'constructor')",
            "[(0, ['constructor'])]",
            "`constr\\u0075ctor`",
        ] {
            let expression = parse_single_expression(source).unwrap();
            assert_eq!(literal_name(&expression).map(|(n, _)| n), Some("constructor"), "{source}");
        }
        for source in ["['a', 'constructor']", "[...['constructor']]", "('constructor', b)", "[]"] {
            let expression = parse_single_expression(source).unwrap();
            assert!(literal_name(&expression).is_none(), "{source}");
        }
    }

    #[test]
    fn test_mutation_target_rules() {
        let options = SanitizerOptionsBuilder::new("m")
            .add_reserved_identifiers(["input"])
            .add_reserved_mutable_identifiers(["state"])
            .build();

        for source in ["Math", "input", "main", "console.log", "JSON.parse.x", "[a, Math]", "({ a: Date })"] {
            let target = parse_single_expression(source).unwrap();
            assert!(mutation_target(&options, &target).is_err(), "{source}");
        }
        for source in ["state", "x", "input.value", "this.x", "[a, { b }]"] {
            let target = parse_single_expression(source).unwrap();
            assert!(mutation_target(&options, &target).is_ok(), "{source}");
        }
    }

    #[test]
    fn test_declared_function_looks_through_export() {
        let program =
            parse_program("function a() {} export function b() {} export default function () {} const c = 1;")
                .unwrap();
        let declared: Vec<_> = program
            .body
            .iter()
            .map(|s| declared_function(s).map(|f| f.id.as_ref().map(|id| id.name.as_str())))
            .collect();
        assert_eq!(declared, vec![Some(Some("a")), Some(Some("b")), Some(None), None]);
    }
}
