//! Pre-order tree walking with enter/exit callbacks.
//!
//! The walker visits nodes in source order and calls [`Listener::enter`]
//! before a node's children and [`Listener::exit`] after them. The first
//! error returned by a callback stops the walk and is propagated.

use crate::parser::ast::*;

/// Why an identifier is being introduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Var,
    Let,
    Const,
    Parameter,
    /// Name of a function declaration.
    Function,
    /// Name of a named function expression.
    FunctionExpression,
    Class,
    CatchParameter,
    Import,
}

impl From<VariableKind> for BindingKind {
    fn from(kind: VariableKind) -> Self {
        match kind {
            VariableKind::Var => BindingKind::Var,
            VariableKind::Let => BindingKind::Let,
            VariableKind::Const => BindingKind::Const,
        }
    }
}

/// A borrowed view of one tree node.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Program(&'a Program),
    Statement(&'a Statement),
    VariableDeclaration(&'a VariableDeclaration),
    Expression(&'a Expression),
    Pattern(&'a Pattern),
    /// An identifier being declared.
    Binding(&'a Identifier, BindingKind),
    Function(&'a Function),
    ArrowFunction(&'a ArrowFunction),
    Class(&'a Class),
    ClassMember(&'a ClassMember),
    ObjectMember(&'a ObjectMember),
    /// Key of an object property, class member or destructuring property.
    PropertyKey(&'a PropertyKey),
    SwitchCase(&'a SwitchCase),
    CatchClause(&'a CatchClause),
    ImportSpecifier(&'a ImportSpecifier),
    ExportSpecifier(&'a ExportSpecifier),
}

pub trait Listener {
    type Error;

    fn enter(&mut self, node: Node<'_>) -> Result<(), Self::Error>;

    fn exit(&mut self, _node: Node<'_>) -> Result<(), Self::Error> {
        Ok(())
    }
}

pub fn walk_program<L: Listener + ?Sized>(listener: &mut L, program: &Program) -> Result<(), L::Error> {
    Walker { listener }.program(program)
}

pub fn walk_statement<L: Listener + ?Sized>(
    listener: &mut L,
    statement: &Statement,
) -> Result<(), L::Error> {
    Walker { listener }.statement(statement)
}

pub fn walk_expression<L: Listener + ?Sized>(
    listener: &mut L,
    expression: &Expression,
) -> Result<(), L::Error> {
    Walker { listener }.expression(expression)
}

struct Walker<'l, L: ?Sized> {
    listener: &'l mut L,
}

impl<'l, L: Listener + ?Sized> Walker<'l, L> {
    fn program(&mut self, program: &Program) -> Result<(), L::Error> {
        self.listener.enter(Node::Program(program))?;
        self.statements(&program.body)?;
        self.listener.exit(Node::Program(program))
    }

    fn statements(&mut self, statements: &[Statement]) -> Result<(), L::Error> {
        for statement in statements {
            self.statement(statement)?;
        }
        Ok(())
    }

    fn statement(&mut self, statement: &Statement) -> Result<(), L::Error> {
        self.listener.enter(Node::Statement(statement))?;
        match statement {
            Statement::Block(block) => self.statements(&block.body)?,
            Statement::Empty(_) | Statement::Debugger(_) => {}
            Statement::Expression(s) => self.expression(&s.expression)?,
            Statement::If(s) => {
                self.expression(&s.test)?;
                self.statement(&s.consequent)?;
                if let Some(alternate) = &s.alternate {
                    self.statement(alternate)?;
                }
            }
            Statement::For(s) => {
                match &s.init {
                    Some(ForInit::Variable(declaration)) => self.variable_declaration(declaration)?,
                    Some(ForInit::Expression(expression)) => self.expression(expression)?,
                    None => {}
                }
                self.optional_expression(s.test.as_ref())?;
                self.optional_expression(s.update.as_ref())?;
                self.statement(&s.body)?;
            }
            Statement::ForIn(s) => {
                self.for_head(&s.left)?;
                self.expression(&s.right)?;
                self.statement(&s.body)?;
            }
            Statement::ForOf(s) => {
                self.for_head(&s.left)?;
                self.expression(&s.right)?;
                self.statement(&s.body)?;
            }
            Statement::While(s) => {
                self.expression(&s.test)?;
                self.statement(&s.body)?;
            }
            Statement::DoWhile(s) => {
                self.statement(&s.body)?;
                self.expression(&s.test)?;
            }
            Statement::Continue(_) | Statement::Break(_) => {}
            Statement::Return(s) => self.optional_expression(s.argument.as_ref())?,
            Statement::With(s) => {
                self.expression(&s.object)?;
                self.statement(&s.body)?;
            }
            Statement::Switch(s) => {
                self.expression(&s.discriminant)?;
                for case in &s.cases {
                    self.listener.enter(Node::SwitchCase(case))?;
                    self.optional_expression(case.test.as_ref())?;
                    self.statements(&case.consequent)?;
                    self.listener.exit(Node::SwitchCase(case))?;
                }
            }
            Statement::Labeled(s) => self.statement(&s.body)?,
            Statement::Throw(s) => self.expression(&s.argument)?,
            Statement::Try(s) => {
                self.statements(&s.block.body)?;
                if let Some(handler) = &s.handler {
                    self.listener.enter(Node::CatchClause(handler))?;
                    if let Some(param) = &handler.param {
                        self.pattern(param, BindingKind::CatchParameter)?;
                    }
                    self.statements(&handler.body.body)?;
                    self.listener.exit(Node::CatchClause(handler))?;
                }
                if let Some(finalizer) = &s.finalizer {
                    self.statements(&finalizer.body)?;
                }
            }
            Statement::Variable(declaration) => self.variable_declaration(declaration)?,
            Statement::Function(function) => self.function(function, BindingKind::Function)?,
            Statement::Class(class) => self.class(class)?,
            Statement::Import(declaration) => {
                for specifier in &declaration.specifiers {
                    self.listener.enter(Node::ImportSpecifier(specifier))?;
                    self.binding(specifier.local(), BindingKind::Import)?;
                    self.listener.exit(Node::ImportSpecifier(specifier))?;
                }
            }
            Statement::Export(declaration) => match &declaration.kind {
                ExportKind::Declaration(inner) => self.statement(inner)?,
                ExportKind::DefaultExpression(expression) => self.expression(expression)?,
                ExportKind::DefaultFunction(function) => {
                    self.function(function, BindingKind::Function)?
                }
                ExportKind::DefaultClass(class) => self.class(class)?,
                ExportKind::Named { specifiers, .. } => {
                    for specifier in specifiers {
                        self.listener.enter(Node::ExportSpecifier(specifier))?;
                        self.listener.exit(Node::ExportSpecifier(specifier))?;
                    }
                }
                ExportKind::All { .. } => {}
            },
        }
        self.listener.exit(Node::Statement(statement))
    }

    fn for_head(&mut self, head: &ForHead) -> Result<(), L::Error> {
        match head {
            ForHead::Variable(declaration) => self.variable_declaration(declaration),
            ForHead::Target(expression) => self.expression(expression),
        }
    }

    fn variable_declaration(&mut self, declaration: &VariableDeclaration) -> Result<(), L::Error> {
        self.listener.enter(Node::VariableDeclaration(declaration))?;
        for declarator in &declaration.declarations {
            self.pattern(&declarator.id, declaration.kind.into())?;
            self.optional_expression(declarator.init.as_ref())?;
        }
        self.listener.exit(Node::VariableDeclaration(declaration))
    }

    fn binding(&mut self, id: &Identifier, kind: BindingKind) -> Result<(), L::Error> {
        self.listener.enter(Node::Binding(id, kind))?;
        self.listener.exit(Node::Binding(id, kind))
    }

    fn function(&mut self, function: &Function, kind: BindingKind) -> Result<(), L::Error> {
        self.listener.enter(Node::Function(function))?;
        if let Some(id) = &function.id {
            self.binding(id, kind)?;
        }
        for param in &function.params {
            self.pattern(param, BindingKind::Parameter)?;
        }
        self.statements(&function.body.body)?;
        self.listener.exit(Node::Function(function))
    }

    fn arrow(&mut self, arrow: &ArrowFunction) -> Result<(), L::Error> {
        self.listener.enter(Node::ArrowFunction(arrow))?;
        for param in &arrow.params {
            self.pattern(param, BindingKind::Parameter)?;
        }
        match &arrow.body {
            ArrowBody::Expression(expression) => self.expression(expression)?,
            ArrowBody::Block(block) => self.statements(&block.body)?,
        }
        self.listener.exit(Node::ArrowFunction(arrow))
    }

    fn class(&mut self, class: &Class) -> Result<(), L::Error> {
        self.listener.enter(Node::Class(class))?;
        if let Some(id) = &class.id {
            self.binding(id, BindingKind::Class)?;
        }
        self.optional_expression(class.super_class.as_ref())?;
        for member in &class.body {
            self.listener.enter(Node::ClassMember(member))?;
            match member {
                ClassMember::Method(method) => {
                    self.property_key(&method.key)?;
                    self.function(&method.value, BindingKind::FunctionExpression)?;
                }
                ClassMember::Property(property) => {
                    self.property_key(&property.key)?;
                    self.optional_expression(property.value.as_ref())?;
                }
                ClassMember::StaticBlock(block) => self.statements(&block.body)?,
            }
            self.listener.exit(Node::ClassMember(member))?;
        }
        self.listener.exit(Node::Class(class))
    }

    fn property_key(&mut self, key: &PropertyKey) -> Result<(), L::Error> {
        self.listener.enter(Node::PropertyKey(key))?;
        if let PropertyKey::Computed(expression) = key {
            self.expression(expression)?;
        }
        self.listener.exit(Node::PropertyKey(key))
    }

    fn pattern(&mut self, pattern: &Pattern, kind: BindingKind) -> Result<(), L::Error> {
        self.listener.enter(Node::Pattern(pattern))?;
        match pattern {
            Pattern::Identifier(id) => self.binding(id, kind)?,
            Pattern::Object(object) => {
                for property in &object.properties {
                    self.property_key(&property.key)?;
                    self.pattern(&property.value, kind)?;
                }
                if let Some(rest) = &object.rest {
                    self.pattern(&rest.argument, kind)?;
                }
            }
            Pattern::Array(array) => {
                for element in array.elements.iter().flatten() {
                    self.pattern(element, kind)?;
                }
            }
            Pattern::Assignment(assignment) => {
                self.pattern(&assignment.target, kind)?;
                self.expression(&assignment.default)?;
            }
            Pattern::Rest(rest) => self.pattern(&rest.argument, kind)?,
        }
        self.listener.exit(Node::Pattern(pattern))
    }

    fn optional_expression(&mut self, expression: Option<&Expression>) -> Result<(), L::Error> {
        match expression {
            Some(expression) => self.expression(expression),
            None => Ok(()),
        }
    }

    fn expressions(&mut self, expressions: &[Expression]) -> Result<(), L::Error> {
        for expression in expressions {
            self.expression(expression)?;
        }
        Ok(())
    }

    fn expression(&mut self, expression: &Expression) -> Result<(), L::Error> {
        self.listener.enter(Node::Expression(expression))?;
        match expression {
            Expression::Identifier(_)
            | Expression::Literal(_)
            | Expression::This(_)
            | Expression::Super(_)
            | Expression::MetaProperty(_) => {}
            Expression::Template(template) => self.expressions(&template.expressions)?,
            Expression::TaggedTemplate(tagged) => {
                self.expression(&tagged.tag)?;
                self.expressions(&tagged.quasi.expressions)?;
            }
            Expression::Array(array) => {
                for element in array.elements.iter().flatten() {
                    self.expression(element)?;
                }
            }
            Expression::Object(object) => {
                for member in &object.properties {
                    self.listener.enter(Node::ObjectMember(member))?;
                    match member {
                        ObjectMember::Property(property) => {
                            self.property_key(&property.key)?;
                            self.expression(&property.value)?;
                        }
                        ObjectMember::Spread(spread) => self.expression(&spread.argument)?,
                    }
                    self.listener.exit(Node::ObjectMember(member))?;
                }
            }
            Expression::Function(function) => {
                self.function(function, BindingKind::FunctionExpression)?
            }
            Expression::Arrow(arrow) => self.arrow(arrow)?,
            Expression::Class(class) => self.class(class)?,
            Expression::Unary(unary) => self.expression(&unary.argument)?,
            Expression::Update(update) => self.expression(&update.argument)?,
            Expression::Binary(binary) => {
                self.expression(&binary.left)?;
                self.expression(&binary.right)?;
            }
            Expression::Assignment(assignment) => {
                self.expression(&assignment.target)?;
                self.expression(&assignment.value)?;
            }
            Expression::Conditional(conditional) => {
                self.expression(&conditional.test)?;
                self.expression(&conditional.consequent)?;
                self.expression(&conditional.alternate)?;
            }
            Expression::Call(call) => {
                self.expression(&call.callee)?;
                self.expressions(&call.arguments)?;
            }
            Expression::New(new) => {
                self.expression(&new.callee)?;
                self.expressions(&new.arguments)?;
            }
            Expression::Member(member) => {
                self.expression(&member.object)?;
                if let MemberProperty::Computed(property) = &member.property {
                    self.expression(property)?;
                }
            }
            Expression::Sequence(sequence) => self.expressions(&sequence.expressions)?,
            Expression::Spread(spread) => self.expression(&spread.argument)?,
            Expression::Await(await_expression) => self.expression(&await_expression.argument)?,
            Expression::Yield(yield_expression) => {
                self.optional_expression(yield_expression.argument.as_ref())?
            }
            Expression::Parenthesized(parenthesized) => self.expression(&parenthesized.expression)?,
            Expression::ImportCall(import) => {
                self.expression(&import.source)?;
                self.optional_expression(import.options.as_ref())?
            }
        }
        self.listener.exit(Node::Expression(expression))
    }
}
