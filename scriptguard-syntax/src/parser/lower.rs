//! Lowering from the oxc tree into the owned tree
//!
//! oxc's tree borrows its arena and cannot leave the parse call, so each
//! accepted parse is copied once into [`super::ast`]. The copy counts
//! nesting as it goes and stops at [`MAX_NESTING_DEPTH`], which bounds
//! every later recursive pass over the owned tree, drop included.

use super::ast::*;
use super::parser::{Expected, ParseError, MAX_NESTING_DEPTH};
use crate::span::{LineIndex, Span};
use oxc_ast::ast as js;
use oxc_span::GetSpan;

const ASYNC: &str = "async";

/// Modifiers that may come before `async` in a method header.
const METHOD_MODIFIERS: &[&str] = &["static", "accessor"];

pub(crate) struct Lowering<'l, 's> {
    lines: &'l LineIndex<'s>,
    depth: usize,
}

impl<'l, 's> Lowering<'l, 's> {
    pub(crate) fn new(lines: &'l LineIndex<'s>) -> Self {
        Self { lines, depth: 0 }
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    fn span(&self, span: oxc_span::Span) -> Span {
        self.lines.span(span.start as usize, span.end as usize)
    }

    fn text(&self, span: oxc_span::Span) -> &'s str {
        self.lines.text(self.span(span))
    }

    fn identifier(&self, name: &str, span: oxc_span::Span) -> Identifier {
        Identifier {
            name: name.to_string(),
            span: self.span(span),
        }
    }

    fn string(&self, literal: &js::StringLiteral<'_>) -> StringLiteral {
        StringLiteral {
            value: literal.value.to_string(),
            span: self.span(literal.span),
        }
    }

    fn number(&self, span: oxc_span::Span) -> NumberLiteral {
        NumberLiteral {
            raw: self.text(span).to_string(),
            span: self.span(span),
        }
    }

    fn regexp(&self, span: oxc_span::Span) -> RegExpLiteral {
        let raw = self.text(span);
        let (pattern, flags) = raw.rsplit_once('/').unwrap_or((raw, ""));
        RegExpLiteral {
            pattern: pattern.strip_prefix('/').unwrap_or(pattern).to_string(),
            flags: flags.to_string(),
            span: self.span(span),
        }
    }

    fn unsupported(&self, span: oxc_span::Span, without: &'static str) -> ParseError {
        ParseError::at(self.lines, span.start as usize, Expected::PlainJavaScript(without))
    }

    fn reject_decorators(&self, decorators: &[js::Decorator<'_>]) -> Result<(), ParseError> {
        match decorators.first() {
            Some(decorator) => Err(self.unsupported(decorator.span, "decorators")),
            None => Ok(()),
        }
    }

    /// Location of `async` in a function header starting at `start`.
    fn async_span(&self, start: u32) -> Span {
        let mut offset = start as usize;
        loop {
            let token = self.lines.token_span(offset);
            let word = self.lines.text(token);
            if word == ASYNC || token.is_empty() || !METHOD_MODIFIERS.contains(&word) {
                return token;
            }
            offset = token.end;
        }
    }

    /// Run `f` one nesting level deeper.
    fn nested<T>(
        &mut self,
        at: oxc_span::Span,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::at(self.lines, at.start as usize, Expected::ShallowerNesting));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    // ------------------------------------------------------------------------
    // Programs & statements
    // ------------------------------------------------------------------------

    pub(crate) fn program(&mut self, program: &js::Program<'_>) -> Result<Program, ParseError> {
        let mut body = self.directives(&program.directives);
        body.extend(self.statements(&program.body)?);
        Ok(Program {
            body,
            span: self.span(program.span),
        })
    }

    /// Directive prologues (`'use strict'`) as plain expression statements.
    fn directives(&self, directives: &[js::Directive<'_>]) -> Vec<Statement> {
        directives
            .iter()
            .map(|directive| {
                Statement::Expression(ExpressionStatement {
                    expression: Expression::Literal(Literal::String(self.string(&directive.expression))),
                    span: self.span(directive.span),
                })
            })
            .collect()
    }

    fn statements(&mut self, statements: &[js::Statement<'_>]) -> Result<Vec<Statement>, ParseError> {
        statements.iter().map(|statement| self.statement(statement)).collect()
    }

    fn statement(&mut self, statement: &js::Statement<'_>) -> Result<Statement, ParseError> {
        self.nested(statement.span(), |this| this.statement_kind(statement))
    }

    fn statement_kind(&mut self, statement: &js::Statement<'_>) -> Result<Statement, ParseError> {
        use js::Statement as S;

        match statement {
            S::BlockStatement(block) => self.block(block).map(Statement::Block),
            S::EmptyStatement(empty) => Ok(Statement::Empty(self.span(empty.span))),
            S::DebuggerStatement(debugger) => Ok(Statement::Debugger(self.span(debugger.span))),
            S::ExpressionStatement(statement) => Ok(Statement::Expression(ExpressionStatement {
                expression: self.expression(&statement.expression)?,
                span: self.span(statement.span),
            })),
            S::IfStatement(statement) => self.if_statement(statement),
            S::ForStatement(statement) => self.for_statement(statement),
            S::ForInStatement(statement) => self.for_in_statement(statement),
            S::ForOfStatement(statement) => self.for_of_statement(statement),
            S::WhileStatement(statement) => self.while_statement(statement),
            S::DoWhileStatement(statement) => self.do_while_statement(statement),
            S::ContinueStatement(statement) => Ok(Statement::Continue(JumpStatement {
                label: statement
                    .label
                    .as_ref()
                    .map(|label| self.identifier(&label.name, label.span)),
                span: self.span(statement.span),
            })),
            S::BreakStatement(statement) => Ok(Statement::Break(JumpStatement {
                label: statement
                    .label
                    .as_ref()
                    .map(|label| self.identifier(&label.name, label.span)),
                span: self.span(statement.span),
            })),
            S::ReturnStatement(statement) => Ok(Statement::Return(ReturnStatement {
                argument: self.optional_expression(statement.argument.as_ref())?,
                span: self.span(statement.span),
            })),
            S::WithStatement(statement) => self.with_statement(statement),
            S::SwitchStatement(statement) => self.switch_statement(statement),
            S::LabeledStatement(statement) => self.labeled_statement(statement),
            S::ThrowStatement(statement) => Ok(Statement::Throw(ThrowStatement {
                argument: self.expression(&statement.argument)?,
                span: self.span(statement.span),
            })),
            S::TryStatement(statement) => self.try_statement(statement),
            S::VariableDeclaration(declaration) => self.variable_declaration(declaration).map(Statement::Variable),
            S::FunctionDeclaration(function) => self
                .function(function, function.span.start)
                .map(|function| Statement::Function(Box::new(function))),
            S::ClassDeclaration(class) => self.class(class).map(|class| Statement::Class(Box::new(class))),
            S::ImportDeclaration(declaration) => self.import_declaration(declaration).map(Statement::Import),
            S::ExportNamedDeclaration(export) => self.export_named(export),
            S::ExportDefaultDeclaration(export) => self.export_default(export),
            S::ExportAllDeclaration(export) => Ok(Statement::Export(Box::new(ExportDeclaration {
                kind: ExportKind::All {
                    exported: export.exported.as_ref().map(|name| self.export_name(name)),
                    source: self.string(&export.source),
                },
                span: self.span(export.span),
            }))),
            other => Err(self.unsupported(other.span(), "TypeScript syntax")),
        }
    }

    fn if_statement(&mut self, statement: &js::IfStatement<'_>) -> Result<Statement, ParseError> {
        Ok(Statement::If(Box::new(IfStatement {
            test: self.expression(&statement.test)?,
            consequent: self.statement(&statement.consequent)?,
            alternate: statement
                .alternate
                .as_ref()
                .map(|alternate| self.statement(alternate))
                .transpose()?,
            span: self.span(statement.span),
        })))
    }

    fn for_statement(&mut self, statement: &js::ForStatement<'_>) -> Result<Statement, ParseError> {
        let init = match &statement.init {
            Some(js::ForStatementInit::VariableDeclaration(declaration)) => {
                Some(ForInit::Variable(self.variable_declaration(declaration)?))
            }
            Some(other) => match other.as_expression() {
                Some(expression) => Some(ForInit::Expression(self.expression(expression)?)),
                None => return Err(self.unsupported(other.span(), "`using` declarations")),
            },
            None => None,
        };
        Ok(Statement::For(Box::new(ForStatement {
            init,
            test: self.optional_expression(statement.test.as_ref())?,
            update: self.optional_expression(statement.update.as_ref())?,
            body: self.statement(&statement.body)?,
            span: self.span(statement.span),
        })))
    }

    fn for_in_statement(&mut self, statement: &js::ForInStatement<'_>) -> Result<Statement, ParseError> {
        Ok(Statement::ForIn(Box::new(ForInStatement {
            left: self.for_head(&statement.left)?,
            right: self.expression(&statement.right)?,
            body: self.statement(&statement.body)?,
            span: self.span(statement.span),
        })))
    }

    fn for_of_statement(&mut self, statement: &js::ForOfStatement<'_>) -> Result<Statement, ParseError> {
        let await_span = if statement.r#await {
            self.lines
                .word_after(statement.span.start as usize + "for".len(), "await")
        } else {
            None
        };
        Ok(Statement::ForOf(Box::new(ForOfStatement {
            left: self.for_head(&statement.left)?,
            right: self.expression(&statement.right)?,
            body: self.statement(&statement.body)?,
            await_span,
            span: self.span(statement.span),
        })))
    }

    fn while_statement(&mut self, statement: &js::WhileStatement<'_>) -> Result<Statement, ParseError> {
        Ok(Statement::While(Box::new(WhileStatement {
            test: self.expression(&statement.test)?,
            body: self.statement(&statement.body)?,
            span: self.span(statement.span),
        })))
    }

    fn do_while_statement(&mut self, statement: &js::DoWhileStatement<'_>) -> Result<Statement, ParseError> {
        Ok(Statement::DoWhile(Box::new(DoWhileStatement {
            body: self.statement(&statement.body)?,
            test: self.expression(&statement.test)?,
            span: self.span(statement.span),
        })))
    }

    fn with_statement(&mut self, statement: &js::WithStatement<'_>) -> Result<Statement, ParseError> {
        Ok(Statement::With(Box::new(WithStatement {
            object: self.expression(&statement.object)?,
            body: self.statement(&statement.body)?,
            span: self.span(statement.span),
        })))
    }

    fn switch_statement(&mut self, statement: &js::SwitchStatement<'_>) -> Result<Statement, ParseError> {
        let discriminant = self.expression(&statement.discriminant)?;
        let mut cases = Vec::with_capacity(statement.cases.len());
        for case in &statement.cases {
            cases.push(SwitchCase {
                test: self.optional_expression(case.test.as_ref())?,
                consequent: self.statements(&case.consequent)?,
                span: self.span(case.span),
            });
        }
        Ok(Statement::Switch(SwitchStatement {
            discriminant,
            cases,
            span: self.span(statement.span),
        }))
    }

    fn labeled_statement(&mut self, statement: &js::LabeledStatement<'_>) -> Result<Statement, ParseError> {
        Ok(Statement::Labeled(Box::new(LabeledStatement {
            label: self.identifier(&statement.label.name, statement.label.span),
            body: self.statement(&statement.body)?,
            span: self.span(statement.span),
        })))
    }

    fn try_statement(&mut self, statement: &js::TryStatement<'_>) -> Result<Statement, ParseError> {
        Ok(Statement::Try(Box::new(TryStatement {
            block: self.block(&statement.block)?,
            handler: statement
                .handler
                .as_ref()
                .map(|handler| self.catch_clause(handler))
                .transpose()?,
            finalizer: statement
                .finalizer
                .as_ref()
                .map(|finalizer| self.block(finalizer))
                .transpose()?,
            span: self.span(statement.span),
        })))
    }

    fn export_named(&mut self, export: &js::ExportNamedDeclaration<'_>) -> Result<Statement, ParseError> {
        let kind = match &export.declaration {
            Some(declaration) => ExportKind::Declaration(self.declaration(declaration)?),
            None => ExportKind::Named {
                specifiers: export
                    .specifiers
                    .iter()
                    .map(|specifier| ExportSpecifier {
                        local: self.export_name(&specifier.local),
                        exported: self.export_name(&specifier.exported),
                        span: self.span(specifier.span),
                    })
                    .collect(),
                source: export.source.as_ref().map(|source| self.string(source)),
            },
        };
        Ok(Statement::Export(Box::new(ExportDeclaration {
            kind,
            span: self.span(export.span),
        })))
    }

    fn export_default(&mut self, export: &js::ExportDefaultDeclaration<'_>) -> Result<Statement, ParseError> {
        let kind = match &export.declaration {
            js::ExportDefaultDeclarationKind::FunctionDeclaration(function) => {
                ExportKind::DefaultFunction(self.function(function, function.span.start)?)
            }
            js::ExportDefaultDeclarationKind::ClassDeclaration(class) => ExportKind::DefaultClass(self.class(class)?),
            other => match other.as_expression() {
                Some(expression) => ExportKind::DefaultExpression(self.expression(expression)?),
                None => return Err(self.unsupported(other.span(), "TypeScript syntax")),
            },
        };
        Ok(Statement::Export(Box::new(ExportDeclaration {
            kind,
            span: self.span(export.span),
        })))
    }

    fn block(&mut self, block: &js::BlockStatement<'_>) -> Result<BlockStatement, ParseError> {
        Ok(BlockStatement {
            body: self.statements(&block.body)?,
            span: self.span(block.span),
        })
    }

    fn catch_clause(&mut self, clause: &js::CatchClause<'_>) -> Result<CatchClause, ParseError> {
        Ok(CatchClause {
            param: clause
                .param
                .as_ref()
                .map(|param| self.pattern(&param.pattern))
                .transpose()?,
            body: self.block(&clause.body)?,
            span: self.span(clause.span),
        })
    }

    fn declaration(&mut self, declaration: &js::Declaration<'_>) -> Result<Statement, ParseError> {
        match declaration {
            js::Declaration::VariableDeclaration(declaration) => {
                Ok(Statement::Variable(self.variable_declaration(declaration)?))
            }
            js::Declaration::FunctionDeclaration(function) => Ok(Statement::Function(Box::new(
                self.function(function, function.span.start)?,
            ))),
            js::Declaration::ClassDeclaration(class) => Ok(Statement::Class(Box::new(self.class(class)?))),
            other => Err(self.unsupported(other.span(), "TypeScript syntax")),
        }
    }

    fn variable_declaration(
        &mut self,
        declaration: &js::VariableDeclaration<'_>,
    ) -> Result<VariableDeclaration, ParseError> {
        let kind = match declaration.kind {
            js::VariableDeclarationKind::Var => VariableKind::Var,
            js::VariableDeclarationKind::Let => VariableKind::Let,
            js::VariableDeclarationKind::Const => VariableKind::Const,
            _ => return Err(self.unsupported(declaration.span, "`using` declarations")),
        };
        let mut declarations = Vec::with_capacity(declaration.declarations.len());
        for declarator in &declaration.declarations {
            declarations.push(VariableDeclarator {
                id: self.pattern(&declarator.id)?,
                init: self.optional_expression(declarator.init.as_ref())?,
                span: self.span(declarator.span),
            });
        }
        Ok(VariableDeclaration {
            kind,
            declarations,
            span: self.span(declaration.span),
        })
    }

    fn for_head(&mut self, left: &js::ForStatementLeft<'_>) -> Result<ForHead, ParseError> {
        match left {
            js::ForStatementLeft::VariableDeclaration(declaration) => {
                Ok(ForHead::Variable(self.variable_declaration(declaration)?))
            }
            other => match other.as_assignment_target() {
                Some(target) => Ok(ForHead::Target(self.assignment_target(target)?)),
                None => Err(self.unsupported(other.span(), "`using` declarations")),
            },
        }
    }

    // ------------------------------------------------------------------------
    // Modules
    // ------------------------------------------------------------------------

    fn import_declaration(
        &mut self,
        declaration: &js::ImportDeclaration<'_>,
    ) -> Result<ImportDeclaration, ParseError> {
        let mut specifiers = Vec::new();
        for specifier in declaration.specifiers.iter().flatten() {
            specifiers.push(match specifier {
                js::ImportDeclarationSpecifier::ImportSpecifier(specifier) => ImportSpecifier::Named {
                    imported: self.export_name(&specifier.imported),
                    local: self.identifier(&specifier.local.name, specifier.local.span),
                },
                js::ImportDeclarationSpecifier::ImportDefaultSpecifier(specifier) => {
                    ImportSpecifier::Default(self.identifier(&specifier.local.name, specifier.local.span))
                }
                js::ImportDeclarationSpecifier::ImportNamespaceSpecifier(specifier) => {
                    ImportSpecifier::Namespace(self.identifier(&specifier.local.name, specifier.local.span))
                }
            });
        }
        Ok(ImportDeclaration {
            specifiers,
            source: self.string(&declaration.source),
            span: self.span(declaration.span),
        })
    }

    fn export_name(&self, name: &js::ModuleExportName<'_>) -> Identifier {
        match name {
            js::ModuleExportName::IdentifierName(id) => self.identifier(&id.name, id.span),
            js::ModuleExportName::IdentifierReference(id) => self.identifier(&id.name, id.span),
            js::ModuleExportName::StringLiteral(literal) => self.identifier(&literal.value, literal.span),
        }
    }

    // ------------------------------------------------------------------------
    // Functions & classes
    // ------------------------------------------------------------------------

    /// A function whose header (modifiers included) starts at `header`.
    fn function(&mut self, function: &js::Function<'_>, header: u32) -> Result<Function, ParseError> {
        Ok(Function {
            id: function.id.as_ref().map(|id| self.identifier(&id.name, id.span)),
            params: self.params(&function.params)?,
            body: self.function_body(function.body.as_deref(), function.span)?,
            is_generator: function.generator,
            async_span: function.r#async.then(|| self.async_span(header)),
            span: self.span(function.span),
        })
    }

    fn function_body(
        &mut self,
        body: Option<&js::FunctionBody<'_>>,
        function: oxc_span::Span,
    ) -> Result<BlockStatement, ParseError> {
        let Some(body) = body else {
            return Ok(BlockStatement {
                body: Vec::new(),
                span: self.span(function).end_point(),
            });
        };
        let mut statements = self.directives(&body.directives);
        statements.extend(self.statements(&body.statements)?);
        Ok(BlockStatement {
            body: statements,
            span: self.span(body.span),
        })
    }

    fn params(&mut self, params: &js::FormalParameters<'_>) -> Result<Vec<Pattern>, ParseError> {
        let mut patterns = Vec::with_capacity(params.items.len() + 1);
        for param in &params.items {
            self.reject_decorators(&param.decorators)?;
            patterns.push(self.pattern(&param.pattern)?);
        }
        if let Some(rest) = &params.rest {
            patterns.push(Pattern::Rest(Box::new(self.rest_element(rest)?)));
        }
        Ok(patterns)
    }

    fn arrow(&mut self, arrow: &js::ArrowFunctionExpression<'_>) -> Result<ArrowFunction, ParseError> {
        let params = self.params(&arrow.params)?;
        let body = if arrow.expression {
            match arrow.body.statements.first() {
                Some(js::Statement::ExpressionStatement(statement)) => {
                    ArrowBody::Expression(self.expression(&statement.expression)?)
                }
                _ => return Err(self.unsupported(arrow.body.span, "empty arrow bodies")),
            }
        } else {
            ArrowBody::Block(self.function_body(Some(&*arrow.body), arrow.span)?)
        };
        Ok(ArrowFunction {
            params,
            body,
            async_span: arrow
                .r#async
                .then(|| self.span(arrow.span).leading(ASYNC.len())),
            span: self.span(arrow.span),
        })
    }

    fn class(&mut self, class: &js::Class<'_>) -> Result<Class, ParseError> {
        self.reject_decorators(&class.decorators)?;
        let super_class = self.optional_expression(class.super_class.as_ref())?;
        let mut body = Vec::with_capacity(class.body.body.len());
        for element in &class.body.body {
            body.push(self.class_member(element)?);
        }
        Ok(Class {
            id: class.id.as_ref().map(|id| self.identifier(&id.name, id.span)),
            super_class,
            body,
            span: self.span(class.span),
        })
    }

    fn class_member(&mut self, element: &js::ClassElement<'_>) -> Result<ClassMember, ParseError> {
        match element {
            js::ClassElement::StaticBlock(block) => Ok(ClassMember::StaticBlock(BlockStatement {
                body: self.statements(&block.body)?,
                span: self.span(block.span),
            })),
            js::ClassElement::MethodDefinition(method) => {
                self.reject_decorators(&method.decorators)?;
                let kind = match method.kind {
                    js::MethodDefinitionKind::Constructor => MethodKind::Constructor,
                    js::MethodDefinitionKind::Method => MethodKind::Method,
                    js::MethodDefinitionKind::Get => MethodKind::Get,
                    js::MethodDefinitionKind::Set => MethodKind::Set,
                };
                Ok(ClassMember::Method(MethodDefinition {
                    key: self.property_key(&method.key, method.computed)?,
                    value: self.function(&method.value, method.span.start)?,
                    kind,
                    is_static: method.r#static,
                    span: self.span(method.span),
                }))
            }
            js::ClassElement::PropertyDefinition(property) => {
                self.reject_decorators(&property.decorators)?;
                Ok(ClassMember::Property(PropertyDefinition {
                    key: self.property_key(&property.key, property.computed)?,
                    value: self.optional_expression(property.value.as_ref())?,
                    is_static: property.r#static,
                    span: self.span(property.span),
                }))
            }
            js::ClassElement::AccessorProperty(property) => {
                self.reject_decorators(&property.decorators)?;
                Ok(ClassMember::Property(PropertyDefinition {
                    key: self.property_key(&property.key, property.computed)?,
                    value: self.optional_expression(property.value.as_ref())?,
                    is_static: property.r#static,
                    span: self.span(property.span),
                }))
            }
            other => Err(self.unsupported(other.span(), "TypeScript syntax")),
        }
    }

    fn property_key(&mut self, key: &js::PropertyKey<'_>, computed: bool) -> Result<PropertyKey, ParseError> {
        match key {
            js::PropertyKey::StaticIdentifier(id) => Ok(PropertyKey::Identifier(self.identifier(&id.name, id.span))),
            js::PropertyKey::PrivateIdentifier(id) => Ok(PropertyKey::Private(self.identifier(&id.name, id.span))),
            js::PropertyKey::StringLiteral(literal) if !computed => Ok(PropertyKey::String(self.string(literal))),
            js::PropertyKey::NumericLiteral(literal) if !computed => Ok(PropertyKey::Number(self.number(literal.span))),
            js::PropertyKey::BigIntLiteral(literal) if !computed => Ok(PropertyKey::Number(self.number(literal.span))),
            other => match other.as_expression() {
                Some(expression) => Ok(PropertyKey::Computed(Box::new(self.expression(expression)?))),
                None => Err(self.unsupported(other.span(), "TypeScript syntax")),
            },
        }
    }

    // ------------------------------------------------------------------------
    // Patterns
    // ------------------------------------------------------------------------

    fn pattern(&mut self, pattern: &js::BindingPattern<'_>) -> Result<Pattern, ParseError> {
        self.nested(pattern.span(), |this| this.pattern_kind(&pattern.kind))
    }

    fn pattern_kind(&mut self, kind: &js::BindingPatternKind<'_>) -> Result<Pattern, ParseError> {
        match kind {
            js::BindingPatternKind::BindingIdentifier(id) => Ok(Pattern::Identifier(self.identifier(&id.name, id.span))),
            js::BindingPatternKind::ObjectPattern(object) => {
                let mut properties = Vec::with_capacity(object.properties.len());
                for property in &object.properties {
                    properties.push(ObjectPatternProperty {
                        key: self.property_key(&property.key, property.computed)?,
                        value: self.pattern(&property.value)?,
                        shorthand: property.shorthand,
                        span: self.span(property.span),
                    });
                }
                let rest = match &object.rest {
                    Some(rest) => Some(Box::new(self.rest_element(rest)?)),
                    None => None,
                };
                Ok(Pattern::Object(ObjectPattern {
                    properties,
                    rest,
                    span: self.span(object.span),
                }))
            }
            js::BindingPatternKind::ArrayPattern(array) => {
                let mut elements = Vec::with_capacity(array.elements.len() + 1);
                for element in &array.elements {
                    elements.push(match element {
                        Some(element) => Some(self.pattern(element)?),
                        None => None,
                    });
                }
                if let Some(rest) = &array.rest {
                    elements.push(Some(Pattern::Rest(Box::new(self.rest_element(rest)?))));
                }
                Ok(Pattern::Array(ArrayPattern {
                    elements,
                    span: self.span(array.span),
                }))
            }
            js::BindingPatternKind::AssignmentPattern(assignment) => {
                Ok(Pattern::Assignment(Box::new(AssignmentPattern {
                    target: self.pattern(&assignment.left)?,
                    default: self.expression(&assignment.right)?,
                    span: self.span(assignment.span),
                })))
            }
        }
    }

    fn rest_element(&mut self, rest: &js::BindingRestElement<'_>) -> Result<RestElement, ParseError> {
        Ok(RestElement {
            argument: self.pattern(&rest.argument)?,
            span: self.span(rest.span),
        })
    }

    // ------------------------------------------------------------------------
    // Assignment targets
    // ------------------------------------------------------------------------

    /// Destructuring targets become array and object expressions, the way
    /// they read in source.
    fn assignment_target(&mut self, target: &js::AssignmentTarget<'_>) -> Result<Expression, ParseError> {
        self.nested(target.span(), |this| match target {
            js::AssignmentTarget::ArrayAssignmentTarget(array) => this.array_target(array),
            js::AssignmentTarget::ObjectAssignmentTarget(object) => this.object_target(object),
            other => match other.as_simple_assignment_target() {
                Some(simple) => this.simple_target(simple),
                None => Err(this.unsupported(other.span(), "TypeScript syntax")),
            },
        })
    }

    fn simple_target(&mut self, target: &js::SimpleAssignmentTarget<'_>) -> Result<Expression, ParseError> {
        match target {
            js::SimpleAssignmentTarget::AssignmentTargetIdentifier(id) => {
                Ok(Expression::Identifier(self.identifier(&id.name, id.span)))
            }
            other => match other.as_member_expression() {
                Some(member) => self.member(member),
                None => Err(self.unsupported(other.span(), "TypeScript syntax")),
            },
        }
    }

    fn array_target(&mut self, array: &js::ArrayAssignmentTarget<'_>) -> Result<Expression, ParseError> {
        let mut elements = Vec::with_capacity(array.elements.len() + 1);
        for element in &array.elements {
            elements.push(match element {
                Some(element) => Some(self.target_maybe_default(element)?),
                None => None,
            });
        }
        if let Some(rest) = &array.rest {
            elements.push(Some(Expression::Spread(Box::new(SpreadElement {
                argument: self.assignment_target(&rest.target)?,
                span: self.span(rest.span),
            }))));
        }
        Ok(Expression::Array(ArrayExpression {
            elements,
            span: self.span(array.span),
        }))
    }

    fn object_target(&mut self, object: &js::ObjectAssignmentTarget<'_>) -> Result<Expression, ParseError> {
        let mut properties = Vec::with_capacity(object.properties.len() + 1);
        for property in &object.properties {
            properties.push(ObjectMember::Property(match property {
                js::AssignmentTargetProperty::AssignmentTargetPropertyIdentifier(property) => {
                    let key = self.identifier(&property.binding.name, property.binding.span);
                    let target = Expression::Identifier(key.clone());
                    let value = match &property.init {
                        Some(init) => Expression::Assignment(Box::new(AssignmentExpression {
                            operator: AssignmentOperator::Assign,
                            target,
                            value: self.expression(init)?,
                            span: self.span(property.span),
                        })),
                        None => target,
                    };
                    ObjectProperty {
                        key: PropertyKey::Identifier(key),
                        value,
                        kind: PropertyKind::Init,
                        shorthand: true,
                        span: self.span(property.span),
                    }
                }
                js::AssignmentTargetProperty::AssignmentTargetPropertyProperty(property) => ObjectProperty {
                    key: self.property_key(&property.name, property.computed)?,
                    value: self.target_maybe_default(&property.binding)?,
                    kind: PropertyKind::Init,
                    shorthand: false,
                    span: self.span(property.span),
                },
            }));
        }
        if let Some(rest) = &object.rest {
            properties.push(ObjectMember::Spread(SpreadElement {
                argument: self.assignment_target(&rest.target)?,
                span: self.span(rest.span),
            }));
        }
        Ok(Expression::Object(ObjectExpression {
            properties,
            span: self.span(object.span),
        }))
    }

    fn target_maybe_default(
        &mut self,
        target: &js::AssignmentTargetMaybeDefault<'_>,
    ) -> Result<Expression, ParseError> {
        match target {
            js::AssignmentTargetMaybeDefault::AssignmentTargetWithDefault(target) => {
                Ok(Expression::Assignment(Box::new(AssignmentExpression {
                    operator: AssignmentOperator::Assign,
                    target: self.assignment_target(&target.binding)?,
                    value: self.expression(&target.init)?,
                    span: self.span(target.span),
                })))
            }
            other => match other.as_assignment_target() {
                Some(target) => self.assignment_target(target),
                None => Err(self.unsupported(other.span(), "TypeScript syntax")),
            },
        }
    }

    // ------------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------------

    pub(crate) fn expression(&mut self, expression: &js::Expression<'_>) -> Result<Expression, ParseError> {
        self.nested(expression.span(), |this| this.expression_kind(expression))
    }

    fn optional_expression(
        &mut self,
        expression: Option<&js::Expression<'_>>,
    ) -> Result<Option<Expression>, ParseError> {
        expression.map(|expression| self.expression(expression)).transpose()
    }

    fn expressions(&mut self, expressions: &[js::Expression<'_>]) -> Result<Vec<Expression>, ParseError> {
        expressions.iter().map(|expression| self.expression(expression)).collect()
    }

    fn expression_kind(&mut self, expression: &js::Expression<'_>) -> Result<Expression, ParseError> {
        use js::Expression as E;

        // One call per arm keeps this frame small at the nesting limit.
        match expression {
            E::Identifier(id) => Ok(Expression::Identifier(self.identifier(&id.name, id.span))),
            E::NullLiteral(literal) => Ok(Expression::Literal(Literal::Null(self.span(literal.span)))),
            E::BooleanLiteral(literal) => Ok(Expression::Literal(Literal::Boolean(BooleanLiteral {
                value: literal.value,
                span: self.span(literal.span),
            }))),
            E::NumericLiteral(literal) => Ok(Expression::Literal(Literal::Number(self.number(literal.span)))),
            E::BigIntLiteral(literal) => Ok(Expression::Literal(Literal::BigInt(self.number(literal.span)))),
            E::StringLiteral(literal) => Ok(Expression::Literal(Literal::String(self.string(literal)))),
            E::RegExpLiteral(literal) => Ok(Expression::Literal(Literal::RegExp(self.regexp(literal.span)))),
            E::TemplateLiteral(template) => self.template(template).map(Expression::Template),
            E::TaggedTemplateExpression(tagged) => self.tagged_template(tagged),
            E::ThisExpression(this) => Ok(Expression::This(self.span(this.span))),
            E::Super(keyword) => Ok(Expression::Super(self.span(keyword.span))),
            E::ArrayExpression(array) => self.array(array),
            E::ObjectExpression(object) => self.object(object),
            E::FunctionExpression(function) => self
                .function(function, function.span.start)
                .map(|function| Expression::Function(Box::new(function))),
            E::ArrowFunctionExpression(arrow) => self.arrow(arrow).map(|arrow| Expression::Arrow(Box::new(arrow))),
            E::ClassExpression(class) => self.class(class).map(|class| Expression::Class(Box::new(class))),
            E::UnaryExpression(unary) => self.unary(unary),
            E::UpdateExpression(update) => self.update(update),
            E::BinaryExpression(binary) => {
                self.binary(binary.operator.as_str(), &binary.left, &binary.right, binary.span)
            }
            E::LogicalExpression(logical) => {
                self.binary(logical.operator.as_str(), &logical.left, &logical.right, logical.span)
            }
            E::AssignmentExpression(assignment) => self.assignment(assignment),
            E::ConditionalExpression(conditional) => self.conditional(conditional),
            E::CallExpression(call) => self.call(call).map(|call| Expression::Call(Box::new(call))),
            E::NewExpression(new) => self.new_expression(new),
            E::StaticMemberExpression(member) => self.static_member(member),
            E::ComputedMemberExpression(member) => self.computed_member(member),
            E::PrivateFieldExpression(member) => self.private_member(member),
            E::ChainExpression(chain) => self.chain(chain),
            E::SequenceExpression(sequence) => self.sequence(sequence),
            E::AwaitExpression(expression) => self.await_expression(expression),
            E::YieldExpression(expression) => self.yield_expression(expression),
            E::ParenthesizedExpression(parenthesized) => self.parenthesized(parenthesized),
            E::ImportExpression(import) => self.import_call(import),
            E::MetaProperty(meta) => Ok(Expression::MetaProperty(MetaProperty {
                meta: self.identifier(&meta.meta.name, meta.meta.span),
                property: self.identifier(&meta.property.name, meta.property.span),
                span: self.span(meta.span),
            })),
            E::PrivateInExpression(private_in) => Err(self.unsupported(private_in.span, "`#field in` checks")),
            other => Err(self.unsupported(other.span(), "TypeScript or JSX syntax")),
        }
    }

    fn tagged_template(&mut self, tagged: &js::TaggedTemplateExpression<'_>) -> Result<Expression, ParseError> {
        Ok(Expression::TaggedTemplate(Box::new(TaggedTemplateExpression {
            tag: self.expression(&tagged.tag)?,
            quasi: self.template(&tagged.quasi)?,
            span: self.span(tagged.span),
        })))
    }

    fn array(&mut self, array: &js::ArrayExpression<'_>) -> Result<Expression, ParseError> {
        let mut elements = Vec::with_capacity(array.elements.len());
        for element in &array.elements {
            elements.push(match element {
                js::ArrayExpressionElement::Elision(_) => None,
                js::ArrayExpressionElement::SpreadElement(spread) => {
                    Some(Expression::Spread(Box::new(self.spread(spread)?)))
                }
                other => match other.as_expression() {
                    Some(expression) => Some(self.expression(expression)?),
                    None => return Err(self.unsupported(other.span(), "TypeScript syntax")),
                },
            });
        }
        Ok(Expression::Array(ArrayExpression {
            elements,
            span: self.span(array.span),
        }))
    }

    fn object(&mut self, object: &js::ObjectExpression<'_>) -> Result<Expression, ParseError> {
        let mut properties = Vec::with_capacity(object.properties.len());
        for property in &object.properties {
            properties.push(match property {
                js::ObjectPropertyKind::ObjectProperty(property) => {
                    ObjectMember::Property(self.object_property(property)?)
                }
                js::ObjectPropertyKind::SpreadProperty(spread) => ObjectMember::Spread(self.spread(spread)?),
            });
        }
        Ok(Expression::Object(ObjectExpression {
            properties,
            span: self.span(object.span),
        }))
    }

    fn unary(&mut self, unary: &js::UnaryExpression<'_>) -> Result<Expression, ParseError> {
        let operator = match unary.operator.as_str() {
            "-" => UnaryOperator::Minus,
            "+" => UnaryOperator::Plus,
            "!" => UnaryOperator::Not,
            "~" => UnaryOperator::BitNot,
            "typeof" => UnaryOperator::Typeof,
            "void" => UnaryOperator::Void,
            "delete" => UnaryOperator::Delete,
            _ => return Err(self.unsupported(unary.span, "unknown operators")),
        };
        Ok(Expression::Unary(Box::new(UnaryExpression {
            operator,
            argument: self.expression(&unary.argument)?,
            span: self.span(unary.span),
        })))
    }

    fn update(&mut self, update: &js::UpdateExpression<'_>) -> Result<Expression, ParseError> {
        let operator = if update.operator.as_str() == "++" {
            UpdateOperator::Increment
        } else {
            UpdateOperator::Decrement
        };
        Ok(Expression::Update(Box::new(UpdateExpression {
            operator,
            prefix: update.prefix,
            argument: self.simple_target(&update.argument)?,
            span: self.span(update.span),
        })))
    }

    /// Binary and logical expressions share one owned shape.
    fn binary(
        &mut self,
        operator: &str,
        left: &js::Expression<'_>,
        right: &js::Expression<'_>,
        span: oxc_span::Span,
    ) -> Result<Expression, ParseError> {
        let Some(operator) = binary_operator(operator) else {
            return Err(self.unsupported(span, "unknown operators"));
        };
        Ok(Expression::Binary(Box::new(BinaryExpression {
            operator,
            left: self.expression(left)?,
            right: self.expression(right)?,
            span: self.span(span),
        })))
    }

    fn assignment(&mut self, assignment: &js::AssignmentExpression<'_>) -> Result<Expression, ParseError> {
        let Some(operator) = assignment_operator(assignment.operator.as_str()) else {
            return Err(self.unsupported(assignment.span, "unknown operators"));
        };
        Ok(Expression::Assignment(Box::new(AssignmentExpression {
            operator,
            target: self.assignment_target(&assignment.left)?,
            value: self.expression(&assignment.right)?,
            span: self.span(assignment.span),
        })))
    }

    fn conditional(&mut self, conditional: &js::ConditionalExpression<'_>) -> Result<Expression, ParseError> {
        Ok(Expression::Conditional(Box::new(ConditionalExpression {
            test: self.expression(&conditional.test)?,
            consequent: self.expression(&conditional.consequent)?,
            alternate: self.expression(&conditional.alternate)?,
            span: self.span(conditional.span),
        })))
    }

    fn new_expression(&mut self, new: &js::NewExpression<'_>) -> Result<Expression, ParseError> {
        Ok(Expression::New(Box::new(NewExpression {
            callee: self.expression(&new.callee)?,
            arguments: self.arguments(&new.arguments)?,
            span: self.span(new.span),
        })))
    }

    /// Optional chains (`a?.b()`) lower to their calls and members with the
    /// `optional` flags set.
    fn chain(&mut self, chain: &js::ChainExpression<'_>) -> Result<Expression, ParseError> {
        match &chain.expression {
            js::ChainElement::CallExpression(call) => self.call(call).map(|call| Expression::Call(Box::new(call))),
            other => match other.as_member_expression() {
                Some(member) => self.member(member),
                None => Err(self.unsupported(other.span(), "TypeScript syntax")),
            },
        }
    }

    fn sequence(&mut self, sequence: &js::SequenceExpression<'_>) -> Result<Expression, ParseError> {
        Ok(Expression::Sequence(SequenceExpression {
            expressions: self.expressions(&sequence.expressions)?,
            span: self.span(sequence.span),
        }))
    }

    fn await_expression(&mut self, expression: &js::AwaitExpression<'_>) -> Result<Expression, ParseError> {
        Ok(Expression::Await(Box::new(AwaitExpression {
            argument: self.expression(&expression.argument)?,
            span: self.span(expression.span),
        })))
    }

    fn yield_expression(&mut self, expression: &js::YieldExpression<'_>) -> Result<Expression, ParseError> {
        Ok(Expression::Yield(Box::new(YieldExpression {
            argument: self.optional_expression(expression.argument.as_ref())?,
            delegate: expression.delegate,
            span: self.span(expression.span),
        })))
    }

    fn parenthesized(&mut self, parenthesized: &js::ParenthesizedExpression<'_>) -> Result<Expression, ParseError> {
        Ok(Expression::Parenthesized(Box::new(ParenthesizedExpression {
            expression: self.expression(&parenthesized.expression)?,
            span: self.span(parenthesized.span),
        })))
    }

    fn import_call(&mut self, import: &js::ImportExpression<'_>) -> Result<Expression, ParseError> {
        Ok(Expression::ImportCall(Box::new(ImportCall {
            source: self.expression(&import.source)?,
            options: self.optional_expression(import.options.as_ref())?,
            span: self.span(import.span),
        })))
    }

    fn template(&mut self, template: &js::TemplateLiteral<'_>) -> Result<TemplateLiteral, ParseError> {
        Ok(TemplateLiteral {
            quasis: template
                .quasis
                .iter()
                .map(|quasi| quasi.value.cooked.as_ref().unwrap_or(&quasi.value.raw).to_string())
                .collect(),
            expressions: self.expressions(&template.expressions)?,
            span: self.span(template.span),
        })
    }

    fn spread(&mut self, spread: &js::SpreadElement<'_>) -> Result<SpreadElement, ParseError> {
        Ok(SpreadElement {
            argument: self.expression(&spread.argument)?,
            span: self.span(spread.span),
        })
    }

    fn object_property(&mut self, property: &js::ObjectProperty<'_>) -> Result<ObjectProperty, ParseError> {
        let kind = match property.kind {
            js::PropertyKind::Init if property.method => PropertyKind::Method,
            js::PropertyKind::Init => PropertyKind::Init,
            js::PropertyKind::Get => PropertyKind::Get,
            js::PropertyKind::Set => PropertyKind::Set,
        };
        let key = self.property_key(&property.key, property.computed)?;
        let value = match &property.value {
            js::Expression::FunctionExpression(function) if kind != PropertyKind::Init => {
                Expression::Function(Box::new(self.function(function, property.span.start)?))
            }
            other => self.expression(other)?,
        };
        Ok(ObjectProperty {
            key,
            value,
            kind,
            shorthand: property.shorthand,
            span: self.span(property.span),
        })
    }

    fn arguments(&mut self, arguments: &[js::Argument<'_>]) -> Result<Vec<Expression>, ParseError> {
        let mut lowered = Vec::with_capacity(arguments.len());
        for argument in arguments {
            lowered.push(match argument {
                js::Argument::SpreadElement(spread) => Expression::Spread(Box::new(self.spread(spread)?)),
                other => match other.as_expression() {
                    Some(expression) => self.expression(expression)?,
                    None => return Err(self.unsupported(other.span(), "TypeScript syntax")),
                },
            });
        }
        Ok(lowered)
    }

    fn call(&mut self, call: &js::CallExpression<'_>) -> Result<CallExpression, ParseError> {
        Ok(CallExpression {
            callee: self.expression(&call.callee)?,
            arguments: self.arguments(&call.arguments)?,
            optional: call.optional,
            span: self.span(call.span),
        })
    }

    fn member(&mut self, member: &js::MemberExpression<'_>) -> Result<Expression, ParseError> {
        match member {
            js::MemberExpression::StaticMemberExpression(member) => self.static_member(member),
            js::MemberExpression::ComputedMemberExpression(member) => self.computed_member(member),
            js::MemberExpression::PrivateFieldExpression(member) => self.private_member(member),
        }
    }

    fn static_member(&mut self, member: &js::StaticMemberExpression<'_>) -> Result<Expression, ParseError> {
        Ok(Expression::Member(Box::new(MemberExpression {
            object: self.expression(&member.object)?,
            property: MemberProperty::Static(self.identifier(&member.property.name, member.property.span)),
            optional: member.optional,
            span: self.span(member.span),
        })))
    }

    fn computed_member(&mut self, member: &js::ComputedMemberExpression<'_>) -> Result<Expression, ParseError> {
        Ok(Expression::Member(Box::new(MemberExpression {
            object: self.expression(&member.object)?,
            property: MemberProperty::Computed(self.expression(&member.expression)?),
            optional: member.optional,
            span: self.span(member.span),
        })))
    }

    fn private_member(&mut self, member: &js::PrivateFieldExpression<'_>) -> Result<Expression, ParseError> {
        Ok(Expression::Member(Box::new(MemberExpression {
            object: self.expression(&member.object)?,
            property: MemberProperty::Private(self.identifier(&member.field.name, member.field.span)),
            optional: member.optional,
            span: self.span(member.span),
        })))
    }
}

fn binary_operator(operator: &str) -> Option<BinaryOperator> {
    Some(match operator {
        "==" => BinaryOperator::Eq,
        "!=" => BinaryOperator::NotEq,
        "===" => BinaryOperator::StrictEq,
        "!==" => BinaryOperator::StrictNotEq,
        "<" => BinaryOperator::Lt,
        "<=" => BinaryOperator::LtEq,
        ">" => BinaryOperator::Gt,
        ">=" => BinaryOperator::GtEq,
        "<<" => BinaryOperator::Shl,
        ">>" => BinaryOperator::Shr,
        ">>>" => BinaryOperator::UShr,
        "+" => BinaryOperator::Add,
        "-" => BinaryOperator::Sub,
        "*" => BinaryOperator::Mul,
        "/" => BinaryOperator::Div,
        "%" => BinaryOperator::Rem,
        "**" => BinaryOperator::Exp,
        "|" => BinaryOperator::BitOr,
        "^" => BinaryOperator::BitXor,
        "&" => BinaryOperator::BitAnd,
        "in" => BinaryOperator::In,
        "instanceof" => BinaryOperator::Instanceof,
        "&&" => BinaryOperator::And,
        "||" => BinaryOperator::Or,
        "??" => BinaryOperator::Coalesce,
        _ => return None,
    })
}

fn assignment_operator(operator: &str) -> Option<AssignmentOperator> {
    Some(match operator {
        "=" => AssignmentOperator::Assign,
        "+=" => AssignmentOperator::Add,
        "-=" => AssignmentOperator::Sub,
        "*=" => AssignmentOperator::Mul,
        "/=" => AssignmentOperator::Div,
        "%=" => AssignmentOperator::Rem,
        "**=" => AssignmentOperator::Exp,
        "<<=" => AssignmentOperator::Shl,
        ">>=" => AssignmentOperator::Shr,
        ">>>=" => AssignmentOperator::UShr,
        "|=" => AssignmentOperator::BitOr,
        "^=" => AssignmentOperator::BitXor,
        "&=" => AssignmentOperator::BitAnd,
        "&&=" => AssignmentOperator::And,
        "||=" => AssignmentOperator::Or,
        "??=" => AssignmentOperator::Coalesce,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use crate::parser::{parse_program, parse_single_expression, Expected};
    use crate::parser::ast::*;

    #[test]
    fn test_method_async_spans() {
        let program = parse_program("class A { static async m() {} } ({ async n() {} });").unwrap();
        let Statement::Class(class) = &program.body[0] else {
            panic!("expected class");
        };
        let ClassMember::Method(method) = &class.body[0] else {
            panic!("expected method");
        };
        let span = method.value.async_span.expect("async span");
        assert_eq!((span.start, span.end), (17, 22));

        let Statement::Expression(statement) = &program.body[1] else {
            panic!("expected expression statement");
        };
        let Expression::Object(object) = statement.expression.unparenthesized() else {
            panic!("expected object");
        };
        let ObjectMember::Property(property) = &object.properties[0] else {
            panic!("expected property");
        };
        assert_eq!(property.kind, PropertyKind::Method);
        let Expression::Function(function) = &property.value else {
            panic!("expected method function");
        };
        let span = function.async_span.expect("async span");
        assert_eq!((span.start, span.end), (35, 40));
    }

    #[test]
    fn test_for_await_span() {
        let program = parse_program("async function f() { for /* x */ await (const a of b) {} }").unwrap();
        let Statement::Function(function) = &program.body[0] else {
            panic!("expected function");
        };
        let Statement::ForOf(for_of) = &function.body.body[0] else {
            panic!("expected for-of");
        };
        let span = for_of.await_span.expect("await span");
        assert_eq!((span.start, span.end), (33, 38));
    }

    #[test]
    fn test_destructuring_assignment_targets() {
        let expression = parse_single_expression("[a, , { b, c: d = 1 }, ...e] = f").unwrap();
        let Expression::Assignment(assignment) = expression else {
            panic!("expected assignment");
        };
        let Expression::Array(array) = &assignment.target else {
            panic!("expected array target");
        };
        assert_eq!(array.elements.len(), 4);
        assert!(array.elements[1].is_none());
        assert!(matches!(&array.elements[3], Some(Expression::Spread(_))));
    }

    #[test]
    fn test_cooked_template_text() {
        let expression = parse_single_expression(r"`abc${x}`").unwrap();
        let Expression::Template(template) = expression else {
            panic!("expected template");
        };
        assert_eq!(template.quasis[0], "abc");
        assert_eq!(template.expressions.len(), 1);
    }

    #[test]
    fn test_literals_keep_source_text() {
        let expression = parse_single_expression("[0x1F, 10n, /a\\/b/gi]").unwrap();
        let Expression::Array(array) = expression else {
            panic!("expected array");
        };
        let raws: Vec<_> = array
            .elements
            .iter()
            .flatten()
            .map(|element| match element {
                Expression::Literal(Literal::Number(n) | Literal::BigInt(n)) => n.raw.clone(),
                Expression::Literal(Literal::RegExp(r)) => format!("{}|{}", r.pattern, r.flags),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(raws, vec!["0x1F", "10n", "a\\/b|gi"]);
    }

    #[test]
    fn test_deep_trees_rejected_not_overflowed() {
        let deep = format!("{}x{}", "(".repeat(200), ")".repeat(200));
        assert!(parse_single_expression(&deep).is_ok());

        let error = parse_single_expression(&format!("a{}", "[0]".repeat(60_000))).unwrap_err();
        assert_eq!(error.expected, Expected::ShallowerNesting);
    }
}
