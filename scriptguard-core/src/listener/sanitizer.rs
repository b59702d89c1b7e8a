use super::checks::{self, reject, CheckResult};
use crate::error::{SanitizerError, Violation};
use crate::options::{PolicyKeyword, SanitizerOptions};
use scriptguard_syntax::parser::ast::*;
use scriptguard_syntax::{BindingKind, Listener, Node, Span};
use std::collections::BTreeSet;

const ASYNC: usize = "async".len();
const AWAIT: usize = "await".len();
const DEBUGGER: usize = "debugger".len();
const EXPORT: usize = "export".len();
const IMPORT: usize = "import".len();
const VAR: usize = "var".len();
const WITH: usize = "with".len();
const YIELD: usize = "yield".len();

/// The default policy listener.
///
/// Gates keyword constructs, identifier references, property names,
/// declarations and mutation targets against one [`SanitizerOptions`].
pub struct SanitizerListener<'a> {
    options: &'a SanitizerOptions,
    statement_depth: usize,
    /// Span of the function declared by the current top-level statement.
    top_level_function: Option<Span>,
    /// Span of the function whose name is about to be bound.
    entered_function: Option<Span>,
    declared_functions: BTreeSet<String>,
    constructor_key: Option<Span>,
}

impl<'a> SanitizerListener<'a> {
    pub fn new(options: &'a SanitizerOptions) -> Self {
        Self {
            options,
            statement_depth: 0,
            top_level_function: None,
            entered_function: None,
            declared_functions: BTreeSet::new(),
            constructor_key: None,
        }
    }

    /// Reserved function names declared so far.
    pub fn declared_functions(&self) -> &BTreeSet<String> {
        &self.declared_functions
    }

    fn enter_statement(&mut self, statement: &Statement) -> CheckResult {
        if self.statement_depth == 0 {
            self.top_level_function = checks::declared_function(statement).map(|function| function.span);
        }
        self.statement_depth += 1;

        let options = self.options;
        match statement {
            Statement::Debugger(span) => {
                checks::keyword(options, PolicyKeyword::Debugger, span.leading(DEBUGGER))
            }
            Statement::With(with) => checks::keyword(options, PolicyKeyword::With, with.span.leading(WITH)),
            Statement::Export(export) => {
                checks::keyword(options, PolicyKeyword::Export, export.span.leading(EXPORT))
            }
            Statement::Import(import) => {
                checks::keyword(options, PolicyKeyword::Import, import.span.leading(IMPORT))
            }
            Statement::ForOf(for_of) => {
                if let Some(span) = for_of.await_span {
                    checks::keyword(options, PolicyKeyword::Await, span)?;
                }
                self.for_head(&for_of.left)
            }
            Statement::ForIn(for_in) => self.for_head(&for_in.left),
            _ => Ok(()),
        }
    }

    fn for_head(&self, head: &ForHead) -> CheckResult {
        match head {
            ForHead::Target(target) => checks::mutation_target(self.options, target),
            ForHead::Variable(_) => Ok(()),
        }
    }

    fn enter_expression(&self, expression: &Expression) -> CheckResult {
        let options = self.options;
        match expression {
            Expression::Identifier(id) => checks::reference(options, id),
            Expression::Member(member) => match checks::member_property_name(&member.property) {
                Some((name, span)) => checks::property_name(options, name, span),
                None => Ok(()),
            },
            Expression::Assignment(assignment) => checks::mutation_target(options, &assignment.target),
            Expression::Update(update) => checks::mutation_target(options, &update.argument),
            Expression::Unary(unary) if unary.operator == UnaryOperator::Delete => {
                checks::mutation_target(options, &unary.argument)
            }
            Expression::Await(await_expression) => {
                checks::keyword(options, PolicyKeyword::Await, await_expression.span.leading(AWAIT))
            }
            Expression::Yield(yield_expression) => {
                checks::keyword(options, PolicyKeyword::Yield, yield_expression.span.leading(YIELD))
            }
            Expression::ImportCall(import) => {
                checks::keyword(options, PolicyKeyword::Import, import.span.leading(IMPORT))
            }
            Expression::MetaProperty(meta) if meta.meta.name == "import" => {
                checks::keyword(options, PolicyKeyword::Import, meta.meta.span)
            }
            _ => Ok(()),
        }
    }

    fn enter_binding(&mut self, id: &Identifier, kind: BindingKind) -> CheckResult {
        let options = self.options;
        let name = id.name.as_str();
        let not_allowed = || reject(SanitizerError::identifier_not_allowed(name), id.span);

        if options.is_disallowed(name) {
            return Err(not_allowed());
        }

        if options.is_reserved_function(name) {
            let top_level = kind == BindingKind::Function
                && self.entered_function.is_some()
                && self.entered_function == self.top_level_function;
            if top_level && self.declared_functions.insert(name.to_string()) {
                return Ok(());
            }
            return Err(not_allowed());
        }

        // Declarations may not shadow names the host provides.
        if options.is_built_in_object(name) || options.is_reserved(name) {
            return Err(not_allowed());
        }

        checks::reference(options, id)
    }

    fn enter_property_key(&mut self, key: &PropertyKey) -> CheckResult {
        if self.constructor_key.is_some() && self.constructor_key == Some(key.span()) {
            self.constructor_key = None;
            return Ok(());
        }
        match checks::property_key_name(key) {
            Some((name, span)) => checks::property_name(self.options, name, span),
            None => Ok(()),
        }
    }
}

impl Listener for SanitizerListener<'_> {
    type Error = Violation;

    fn enter(&mut self, node: Node<'_>) -> Result<(), Violation> {
        match node {
            Node::Statement(statement) => self.enter_statement(statement),
            Node::VariableDeclaration(declaration) if declaration.kind == VariableKind::Var => {
                checks::keyword(self.options, PolicyKeyword::Var, declaration.span.leading(VAR))
            }
            Node::Expression(expression) => self.enter_expression(expression),
            Node::Binding(id, kind) => self.enter_binding(id, kind),
            Node::Function(function) => {
                self.entered_function = Some(function.span);
                match function.async_span {
                    Some(span) => checks::keyword(self.options, PolicyKeyword::Async, span.leading(ASYNC)),
                    None => Ok(()),
                }
            }
            Node::ArrowFunction(arrow) => match arrow.async_span {
                Some(span) => checks::keyword(self.options, PolicyKeyword::Async, span.leading(ASYNC)),
                None => Ok(()),
            },
            Node::ClassMember(ClassMember::Method(method)) if method.kind == MethodKind::Constructor => {
                self.constructor_key = Some(method.key.span());
                Ok(())
            }
            Node::PropertyKey(key) => self.enter_property_key(key),
            Node::ExportSpecifier(specifier) => checks::reference(self.options, &specifier.local),
            _ => Ok(()),
        }
    }

    fn exit(&mut self, node: Node<'_>) -> Result<(), Violation> {
        match node {
            Node::Statement(_) => {
                self.statement_depth = self.statement_depth.saturating_sub(1);
            }
            Node::Function(_) => self.entered_function = None,
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::options::SanitizerOptionsBuilder;
    use scriptguard_syntax::{parse_program, walk_program};

    fn run(options: &SanitizerOptions, source: &str) -> Result<(), SanitizerError> {
        let program = parse_program(source).unwrap();
        let mut listener = SanitizerListener::new(options);
        walk_program(&mut listener, &program).map_err(|violation| violation.into_error(source))
    }

    fn rejected_identifier(options: &SanitizerOptions, source: &str) -> String {
        let error = run(options, source).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::IdentifierNotAllowed, "{source}");
        error.context().unwrap().source_code.clone()
    }

    #[test]
    fn test_keywords_denied_by_default() {
        let options = SanitizerOptions::default_options();
        let cases = [
            ("async function f() {}", "async"),
            ("const f = async () => 1;", "async"),
            ("const o = { async m() {} };", "async"),
            ("async function f() { await g(); }", "async"),
            ("debugger;", "debugger"),
            ("export const x = 1;", "export"),
            ("import x from 'm';", "import"),
            ("import('m');", "import"),
            ("var x = 1;", "var"),
            ("with (o) {}", "with"),
            ("function* g() { yield 1; }", "yield"),
        ];
        for (source, keyword) in cases {
            let error = run(&options, source).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::KeywordNotAllowed, "{source}");
            assert_eq!(error.parameter("keyword").and_then(|v| v.as_str()), Some(keyword));
            assert_eq!(error.context().unwrap().source_code, keyword, "{source}");
        }
    }

    #[test]
    fn test_keywords_allowed_when_enabled() {
        let options = SanitizerOptionsBuilder::new("open")
            .keyword_async_enabled(true)
            .keyword_await_enabled(true)
            .keyword_var_enabled(true)
            .keyword_yield_enabled(true)
            .keyword_with_enabled(true)
            .keyword_debugger_enabled(true)
            .build();
        let source = "var o = {}; async function f() { await g(); for await (const x of y) {} } \
                      function* h() { yield 1; } with (o) { debugger; }";
        run(&options, source).unwrap();
    }

    #[test]
    fn test_await_in_for_of_points_at_await() {
        let options = SanitizerOptionsBuilder::new("async-only").keyword_async_enabled(true).build();
        let source = "async function f() { for await (const x of y) {} }";
        let error = run(&options, source).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::KeywordNotAllowed);
        assert_eq!(error.context().unwrap().source_code, "await");
    }

    #[test]
    fn test_disallowed_references_and_properties() {
        let options = SanitizerOptions::default_options();
        assert_eq!(rejected_identifier(&options, "eval('1');"), "eval");
        assert_eq!(rejected_identifier(&options, "const f = x.constructor;"), "constructor");
        assert_eq!(rejected_identifier(&options, "x['__proto__'] = 1;"), "'__proto__'");
        assert_eq!(rejected_identifier(&options, "const o = { prototype: 1 };"), "prototype");
        assert_eq!(rejected_identifier(&options, "const { apply } = f;"), "apply");
        assert_eq!(rejected_identifier(&options, "f.call(null);"), "call");
    }

    #[test]
    fn test_class_constructor_method_is_allowed() {
        let options = SanitizerOptions::default_options();
        run(&options, "class A { constructor(x) { this.x = x; } }").unwrap();
        assert_eq!(
            rejected_identifier(&options, "class A { constructor() {} m() { return this.constructor; } }"),
            "constructor"
        );
    }

    #[test]
    fn test_reserved_function_declared_once_at_top_level() {
        let options = SanitizerOptions::default_options();
        run(&options, "function main() { return 1; }").unwrap();
        assert_eq!(
            rejected_identifier(&options, "function main() {} function main() {}"),
            "main"
        );
        assert_eq!(rejected_identifier(&options, "function f() { function main() {} }"), "main");
        assert_eq!(rejected_identifier(&options, "const main = () => 1;"), "main");
        assert_eq!(rejected_identifier(&options, "const f = function main() {};"), "main");
        assert_eq!(rejected_identifier(&options, "function f(main) {}"), "main");
    }

    #[test]
    fn test_declarations_may_not_shadow_host_names() {
        let options = SanitizerOptionsBuilder::new("host")
            .add_reserved_identifiers(["input"])
            .add_reserved_mutable_identifiers(["state"])
            .build();
        assert_eq!(rejected_identifier(&options, "let Math = 1;"), "Math");
        assert_eq!(rejected_identifier(&options, "const input = 1;"), "input");
        assert_eq!(rejected_identifier(&options, "let state;"), "state");
        assert_eq!(rejected_identifier(&options, "try {} catch (JSON) {}"), "JSON");
        assert_eq!(rejected_identifier(&options, "class Date {}"), "Date");
    }

    #[test]
    fn test_mutation_of_host_names() {
        let options = SanitizerOptionsBuilder::new("host")
            .add_reserved_identifiers(["input"])
            .add_reserved_mutable_identifiers(["state"])
            .build();
        run(&options, "state = 1; state++; input.value = 2;").unwrap();
        assert_eq!(rejected_identifier(&options, "input = 1;"), "input");
        assert_eq!(rejected_identifier(&options, "Math.max = null;"), "Math");
        assert_eq!(rejected_identifier(&options, "[a, Date] = b;"), "Date");
        assert_eq!(rejected_identifier(&options, "for (JSON of list) {}"), "JSON");
        assert_eq!(rejected_identifier(&options, "delete console.log;"), "console");
    }

    #[test]
    fn test_matcher_gates_unknown_names() {
        let options = SanitizerOptionsBuilder::new("dollar")
            .reserved_identifier_matcher(|id| id.starts_with('$'))
            .build();
        run(&options, "const $a = Math.max($b, 1);").unwrap();
        assert_eq!(rejected_identifier(&options, "const $a = b;"), "b");
        assert_eq!(rejected_identifier(&options, "let c;"), "c");
    }

    #[test]
    fn test_first_violation_in_source_order() {
        let options = SanitizerOptions::default_options();
        let source = "const a = eval; var b = Function;";
        let error = run(&options, source).unwrap_err();
        assert_eq!(error.to_string(), "Identifier eval is not allowed.");
        assert_eq!(error.context().unwrap().positions, (10, 14));
    }
}
