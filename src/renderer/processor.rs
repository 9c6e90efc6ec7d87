//! Processes the AST and renders the output

use serde_json::{Map, Value};

use crate::context::Context;
use crate::errors::{Error, Result};
use crate::parser::ast::{Block, Forloop, If, Node};
use crate::parser::expression::{Expression, Operator};
use crate::parser::symbol::Symbol;
use crate::renderer::template_stack::TemplateStack;
use crate::shell::{Shell, SymbolShell};

/// Walks the oldest ancestor's tree and renders every node, consulting the
/// template stack for block overrides and the context for values
pub(crate) struct Processor<'a> {
    stack: TemplateStack<'a>,
}

impl<'a> Processor<'a> {
    pub fn new(stack: TemplateStack<'a>) -> Processor<'a> {
        Processor { stack }
    }

    /// Entry point for one render call
    pub fn render(&mut self, context: &mut Context) -> Result<String> {
        // Top-level macros of every template in the chain are callable
        // anywhere in the chain: derived templates never have their root
        // walked, so their definitions are registered up front.
        for template in self.stack.chain() {
            for node in &template.nodes {
                if let Node::MacroDefinition(definition) = node {
                    context.register_macro(definition.clone());
                }
            }
        }

        let root = self.stack.current();
        let mut output = String::with_capacity(10_000);
        self.render_body(&root.nodes, context, &mut output)?;
        Ok(output)
    }

    fn render_body(
        &mut self,
        body: &[Node],
        context: &mut Context,
        output: &mut String,
    ) -> Result<()> {
        for node in body {
            self.render_node(node, context, output)?;
        }
        Ok(())
    }

    fn render_node(
        &mut self,
        node: &Node,
        context: &mut Context,
        output: &mut String,
    ) -> Result<()> {
        match node {
            Node::Text(s) => output.push_str(s),
            Node::Value(expression) => self.render_value(expression, context, output)?,
            Node::If(chain) => self.render_if(chain, context, output)?,
            Node::Forloop(forloop) => self.render_for(forloop, context, output)?,
            Node::Block(block) => self.render_block(block, context, output)?,
            Node::MacroDefinition(definition) => context.register_macro(definition.clone()),
            Node::Include(name) => self.render_include(name, context, output)?,
        }
        Ok(())
    }

    /// Renders a `{{ }}` tag: a symbol or a macro call, through the filter
    /// chain
    fn render_value(
        &mut self,
        expression: &Expression,
        context: &mut Context,
        output: &mut String,
    ) -> Result<()> {
        let left = expression.left.as_ref().expect("value tags always have a symbol");

        let mut rendered = match left {
            Symbol::Call { name, args } => self.call_macro(name, args, context)?,
            _ => {
                let template = &self.stack.current().name;
                let shell = SymbolShell::new(left, &*context, template);
                if expression.negated {
                    (!shell.is_true()).to_string()
                } else {
                    shell.render()?
                }
            }
        };

        for name in &expression.filters {
            let filter = self.stack.engine().get_filter(name)?;
            rendered = filter(rendered)?;
        }

        output.push_str(&rendered);
        Ok(())
    }

    /// Invokes a macro registered earlier in this render
    fn call_macro(
        &mut self,
        name: &str,
        args: &[Symbol],
        context: &mut Context,
    ) -> Result<String> {
        let definition = match context.get_macro(name) {
            Some(definition) => definition.clone(),
            None => return Err(Error::macro_not_found(name)),
        };

        if definition.params.len() != args.len() {
            return Err(Error::msg(format!(
                "Macro `{}` expected {} argument(s), got {}",
                name,
                definition.params.len(),
                args.len()
            )));
        }

        // arguments are evaluated in the caller's scope, before the macro
        // scope opens
        let mut bound = Vec::with_capacity(args.len());
        for (param, arg) in definition.params.iter().zip(args) {
            let template = &self.stack.current().name;
            let value = SymbolShell::new(arg, &*context, template).resolve()?.into_owned();
            bound.push((param.clone(), value));
        }

        context.enter_scope();
        for (param, value) in bound {
            context.insert_value(&param, value);
        }
        let mut rendered = String::new();
        self.render_body(&definition.body, context, &mut rendered)?;
        context.exit_scope();

        Ok(rendered)
    }

    /// Renders the first branch whose condition holds, or the else branch
    fn render_if(&mut self, chain: &If, context: &mut Context, output: &mut String) -> Result<()> {
        for (condition, body) in &chain.conditions {
            if self.eval_condition(condition, context)? {
                context.enter_scope();
                self.render_body(body, context, output)?;
                context.exit_scope();
                return Ok(());
            }
        }

        if let Some(body) = &chain.otherwise {
            context.enter_scope();
            self.render_body(body, context, output)?;
            context.exit_scope();
        }

        Ok(())
    }

    fn eval_condition(&self, expression: &Expression, context: &Context) -> Result<bool> {
        let template = &self.stack.current().name;
        let left = expression.left.as_ref().expect("conditions always have a left symbol");
        let left_shell = SymbolShell::new(left, context, template);

        let result = match expression.operator {
            Operator::None => left_shell.is_true(),
            Operator::IsDefined => left_shell.is_defined(),
            Operator::In => {
                let right = expression.right.as_ref().expect("`in` always has a right symbol");
                let right_shell = SymbolShell::new(right, context, template);
                eval_in(&left_shell, &right_shell)?
            }
            operator => {
                let right =
                    expression.right.as_ref().expect("comparisons always have a right symbol");
                let right_shell = SymbolShell::new(right, context, template);
                let left_value = left_shell.resolve()?;
                let right_value = right_shell.resolve()?;
                left_value.as_ref().compare(operator, right_value.as_ref())?
            }
        };

        Ok(if expression.negated { !result } else { result })
    }

    /// Renders a for loop over an array literal or a context collection
    fn render_for(
        &mut self,
        forloop: &Forloop,
        context: &mut Context,
        output: &mut String,
    ) -> Result<()> {
        let template = &self.stack.current().name;

        let values: Vec<Value> = match &forloop.container {
            Symbol::Array(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(SymbolShell::new(item, &*context, template).resolve()?.into_owned());
                }
                values
            }
            Symbol::Variable(_) => {
                let shell = SymbolShell::new(&forloop.container, &*context, template);
                let resolved = shell.resolve()?;
                match resolved.as_ref() {
                    Value::Array(items) => items.clone(),
                    _ => {
                        return Err(Error::value_error(format!(
                            "Tried to iterate on `{}`, which is not an array",
                            forloop.container
                        )));
                    }
                }
            }
            _ => unreachable!("validated at parse time"),
        };

        let size = values.len();
        context.enter_scope();
        for (index, value) in values.into_iter().enumerate() {
            context.insert_value(&forloop.value, value);
            context.insert_value("loop", loop_record(index, size));
            self.render_body(&forloop.body, context, output)?;
        }
        context.exit_scope();

        Ok(())
    }

    /// Renders a block, dispatching to the nearest more-derived override.
    ///
    /// When an override exists, the current definition's children render
    /// into a side buffer first and are bound as `super` in the scope
    /// covering the override, so `{{ super }}` is a plain variable lookup.
    fn render_block(
        &mut self,
        block: &Block,
        context: &mut Context,
        output: &mut String,
    ) -> Result<()> {
        let level = self.stack.position();
        context.enter_scope();
        self.render_block_at(level, block, context, output)?;
        context.exit_scope();
        Ok(())
    }

    fn render_block_at(
        &mut self,
        level: usize,
        block: &Block,
        context: &mut Context,
        output: &mut String,
    ) -> Result<()> {
        match self.stack.next_override(level, &block.name) {
            Some(override_level) => {
                let mut parent_output = String::new();
                self.render_body(&block.body, context, &mut parent_output)?;
                context.insert_value("super", Value::String(parent_output));

                let overriding = self
                    .stack
                    .block_at(override_level, &block.name)
                    .expect("override levels always hold the block");
                let previous = self.stack.position();
                self.stack.set_position(override_level);
                let result = self.render_block_at(override_level, overriding, context, output);
                self.stack.set_position(previous);
                result
            }
            None => self.render_body(&block.body, context, output),
        }
    }

    /// Renders another registered template inline, through the engine
    /// reference carried by the template stack
    fn render_include(
        &mut self,
        name: &str,
        context: &mut Context,
        output: &mut String,
    ) -> Result<()> {
        let engine = self.stack.engine();
        let chain = engine.inheritance_chain(name)?;

        context.enter_scope();
        let rendered = Processor::new(TemplateStack::new(engine, &chain)).render(context)?;
        context.exit_scope();

        output.push_str(&rendered);
        Ok(())
    }
}

/// Membership test: array containment, or substring search when the
/// haystack is a string
fn eval_in(left: &SymbolShell, right: &SymbolShell) -> Result<bool> {
    let needle = left.resolve()?;
    let haystack = right.resolve()?;

    match haystack.as_ref() {
        Value::Array(items) => {
            for item in items {
                if item.compare(Operator::Equal, needle.as_ref())? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        Value::String(s) => {
            let needle = needle.as_ref().render()?;
            Ok(s.contains(&needle))
        }
        _ => Err(Error::value_error("`in` needs an array or a string to search")),
    }
}

/// The synthetic `loop` record bound on every iteration
fn loop_record(index: usize, size: usize) -> Value {
    let mut record = Map::new();
    record.insert("index".to_string(), Value::from(index as u64));
    record.insert("index1".to_string(), Value::from(index as u64 + 1));
    record.insert("size".to_string(), Value::from(size as u64));
    record.insert("first".to_string(), Value::Bool(index == 0));
    record.insert("last".to_string(), Value::Bool(index + 1 == size));
    record.insert("odd".to_string(), Value::Bool(index % 2 == 1));
    record.insert("even".to_string(), Value::Bool(index % 2 == 0));
    Value::Object(record)
}
