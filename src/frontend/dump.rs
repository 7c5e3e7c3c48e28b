//! Indented debug rendering of the syntax tree, one node per line.

use crate::common::ast::{
    CodeBlock, Declaration, Expression, FunctionParameter, Instruction, Statement,
    TranslationUnit, Type, Variable,
};
use std::fmt::Display;
use std::fmt::Write;

struct Dumper {
    out: String,
}

fn handle<T: Display>(id: Option<T>) -> String {
    id.map_or_else(String::new, |id| format!(" [{}]", id))
}

fn type_name(ty: &Type<'_>) -> String {
    format!("{}{}", ty.full_name(), handle(ty.description))
}

fn variable_name(variable: &Variable<'_>) -> String {
    format!("{}{}", variable.name, handle(variable.description))
}

impl Dumper {
    fn line(&mut self, depth: usize, text: impl Display) {
        let _ = writeln!(self.out, "{}{}", "  ".repeat(depth), text);
    }

    fn parameters(&mut self, depth: usize, parameters: &[FunctionParameter<'_>]) {
        for parameter in parameters {
            match &parameter.variable {
                Some(variable) => self.line(
                    depth,
                    format!("Parameter {} {}", type_name(&parameter.ty), variable_name(variable)),
                ),
                None => self.line(depth, format!("Parameter {}", type_name(&parameter.ty))),
            }
        }
    }

    fn block(&mut self, depth: usize, block: &CodeBlock<'_>) {
        let scope = block
            .scope
            .map_or_else(String::new, |s| format!(" scope {} ({} bytes)", s, block.local_bytes));
        self.line(depth, format!("CodeBlock{}", scope));
        for statement in &block.statements {
            self.statement(depth + 1, statement);
        }
    }

    fn declaration(&mut self, depth: usize, declaration: &Declaration<'_>) {
        self.line(
            depth,
            format!(
                "Declaration {} {}",
                type_name(&declaration.ty),
                variable_name(&declaration.variable)
            ),
        );
        if let Some(initializer) = &declaration.initializer {
            self.expression(depth + 1, initializer);
        }
    }

    fn statement(&mut self, depth: usize, statement: &Statement<'_>) {
        match statement {
            Statement::Instruction(instruction) => self.instruction(depth, instruction),
            Statement::Conditional(conditional) => {
                self.line(depth, "If");
                self.expression(depth + 1, &conditional.condition);
                self.block(depth + 1, &conditional.if_body);
                if let Some(else_body) = &conditional.else_body {
                    self.line(depth, "Else");
                    self.block(depth + 1, else_body);
                }
            }
            Statement::CodeBlock(block) => self.block(depth, block),
            Statement::While(while_statement) => {
                self.line(depth, "While");
                self.expression(depth + 1, &while_statement.condition);
                self.block(depth + 1, &while_statement.body);
            }
            Statement::Do(do_statement) => {
                self.line(depth, "Do");
                self.block(depth + 1, &do_statement.body);
                self.expression(depth + 1, &do_statement.condition);
            }
            Statement::For(for_statement) => {
                self.line(depth, format!("For{}", handle(for_statement.scope.map(|s| format!("scope {}", s)))));
                self.declaration(depth + 1, &for_statement.init);
                if let Some(condition) = &for_statement.condition {
                    self.expression(depth + 1, condition);
                }
                if let Some(increment) = &for_statement.increment {
                    self.expression(depth + 1, increment);
                }
                self.block(depth + 1, &for_statement.body);
            }
        }
    }

    fn instruction(&mut self, depth: usize, instruction: &Instruction<'_>) {
        match instruction {
            Instruction::Return(ret) => {
                self.line(depth, "Return");
                if let Some(expression) = &ret.expression {
                    self.expression(depth + 1, expression);
                }
            }
            Instruction::InlineAsm(asm) => {
                self.line(depth, format!("InlineAsm {:?}", asm.asm_block));
                for request in &asm.requests {
                    self.line(
                        depth + 1,
                        format!("Binding {} <- {}", request.register, variable_name(&request.variable)),
                    );
                }
            }
            Instruction::Declaration(declaration) => self.declaration(depth, declaration),
            Instruction::Expression(expression) => self.expression(depth, expression),
        }
    }

    fn expression(&mut self, depth: usize, expression: &Expression<'_>) {
        match expression {
            Expression::NumberLiteral(literal) => {
                self.line(depth, format!("NumberLiteral {}", literal.value))
            }
            Expression::Variable(variable) => {
                self.line(depth, format!("Variable {}", variable_name(variable)))
            }
            Expression::FunctionCall(call) => {
                self.line(depth, format!("FunctionCall {}{}", call.name, handle(call.description)));
                for argument in &call.arguments {
                    self.expression(depth + 1, argument);
                }
            }
            Expression::BinaryOperation(operation) => {
                self.line(depth, format!("BinaryOperation {}", operation.op));
                self.expression(depth + 1, &operation.lhs);
                self.expression(depth + 1, &operation.rhs);
            }
            Expression::Assign(assign) => {
                self.line(depth, format!("Assign {}", variable_name(&assign.lhs)));
                self.expression(depth + 1, &assign.rhs);
            }
        }
    }
}

pub fn dump_translation_unit(unit: &TranslationUnit<'_>) -> String {
    let mut dumper = Dumper { out: String::new() };
    dumper.line(0, "TranslationUnit");
    for declaration in &unit.function_declarations {
        let kind = if declaration.is_extern {
            "ExternDeclaration"
        } else {
            "FunctionDeclaration"
        };
        dumper.line(
            1,
            format!(
                "{} {} -> {}{}",
                kind,
                declaration.name,
                type_name(&declaration.return_type),
                handle(declaration.description)
            ),
        );
        dumper.parameters(2, &declaration.parameters);
    }
    for function in &unit.functions {
        dumper.line(
            1,
            format!(
                "Function {} -> {}{}",
                function.name,
                type_name(&function.return_type),
                handle(function.description)
            ),
        );
        dumper.parameters(2, &function.parameters);
        dumper.block(2, &function.body);
    }
    for class in &unit.classes {
        dumper.line(1, format!("Class {}", class.name));
        for (attribute, visibility) in &class.attributes {
            dumper.line(
                2,
                format!("{} Attribute {} {}", visibility, type_name(&attribute.ty), attribute.name),
            );
        }
        for (method, visibility) in &class.methods {
            dumper.line(
                2,
                format!(
                    "{} Method {} -> {}",
                    visibility,
                    method.name,
                    type_name(&method.return_type)
                ),
            );
            dumper.parameters(3, &method.parameters);
            dumper.block(3, &method.body);
        }
    }
    dumper.out
}
