//! Template renderer module.
//!
//! Renders parsed template nodes with the given context.

use std::collections::HashMap;

use super::parser::Node;
use super::{escape_html, Result, TemplateContext, TemplateError, Value};

/// Partials may include other partials up to this depth.
const MAX_PARTIAL_DEPTH: usize = 16;

/// Template renderer.
pub struct Renderer<'a> {
    context: &'a TemplateContext,
    partials: Option<&'a HashMap<String, Vec<Node>>>,
    depth: usize,
}

impl<'a> Renderer<'a> {
    /// Create a new renderer with the given context.
    pub fn new(context: &'a TemplateContext) -> Self {
        Self {
            context,
            partials: None,
            depth: 0,
        }
    }

    /// Resolve `{{> name}}` against these templates.
    pub fn with_partials(mut self, partials: &'a HashMap<String, Vec<Node>>) -> Self {
        self.partials = Some(partials);
        self
    }

    /// Renderer for a nested scope, sharing partials and depth.
    fn scoped<'b>(&self, context: &'b TemplateContext) -> Renderer<'b>
    where
        'a: 'b,
    {
        Renderer {
            context,
            partials: self.partials,
            depth: self.depth,
        }
    }

    /// Render a list of nodes to a string.
    pub fn render(&self, nodes: &[Node]) -> Result<String> {
        let mut output = String::new();

        for node in nodes {
            self.render_node(node, &mut output)?;
        }

        Ok(output)
    }

    /// Render a single node.
    fn render_node(&self, node: &Node, output: &mut String) -> Result<()> {
        match node {
            Node::Text(text) => output.push_str(text),
            Node::Variable(name) => output.push_str(&escape_html(&self.lookup(name))),
            Node::Raw(name) => output.push_str(&self.lookup(name)),
            Node::Partial(name) => output.push_str(&self.render_partial(name)?),
            Node::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let branch = if self.is_truthy(condition) {
                    then_branch
                } else {
                    else_branch
                };
                output.push_str(&self.render(branch)?);
            }
            Node::Each {
                variable,
                item_name,
                body,
            } => output.push_str(&self.render_each(variable, item_name.as_deref(), body)?),
            Node::Unless { condition, body } => {
                if !self.is_truthy(condition) {
                    output.push_str(&self.render(body)?);
                }
            }
            Node::With { variable, body } => output.push_str(&self.render_with(variable, body)?),
        }
        Ok(())
    }

    /// Display string of a variable; missing variables render as nothing.
    fn lookup(&self, name: &str) -> String {
        self.context
            .get(name)
            .map(|value| value.to_display_string())
            .unwrap_or_default()
    }

    fn is_truthy(&self, condition: &str) -> bool {
        self.context
            .get(condition)
            .map(|v| v.is_truthy())
            .unwrap_or(false)
    }

    /// Render a partial in the current scope.
    fn render_partial(&self, name: &str) -> Result<String> {
        if self.depth >= MAX_PARTIAL_DEPTH {
            return Err(TemplateError::Render(format!(
                "Partial '{name}' nested too deeply"
            )));
        }

        let nodes = self
            .partials
            .and_then(|partials| partials.get(name))
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?;

        let mut nested = self.scoped(self.context);
        nested.depth += 1;
        nested.render(nodes)
    }

    /// Render an each block.
    fn render_each(&self, variable: &str, item_name: Option<&str>, body: &[Node]) -> Result<String> {
        let list = match self.context.get(variable) {
            Some(Value::List(items)) => items,
            Some(Value::Null) | None => return Ok(String::new()),
            Some(_) => {
                return Err(TemplateError::Render(format!("'{variable}' is not a list")));
            }
        };

        let mut output = String::new();
        let item_var_name = item_name.unwrap_or("this");

        for (index, item) in list.iter().enumerate() {
            let mut child_context = self.context.child();
            child_context.set(item_var_name, item.clone());
            child_context.set("@index", Value::Number(index as i64));
            child_context.set("@first", Value::Bool(index == 0));
            child_context.set("@last", Value::Bool(index == list.len() - 1));

            // Without an alias, object fields are also exposed directly
            if item_name.is_none() {
                if let Value::Object(obj) = item {
                    for (key, value) in obj {
                        child_context.set(key.clone(), value.clone());
                    }
                }
            }

            output.push_str(&self.scoped(&child_context).render(body)?);
        }

        Ok(output)
    }

    /// Render a with block.
    fn render_with(&self, variable: &str, body: &[Node]) -> Result<String> {
        let value = match self.context.get(variable) {
            Some(Value::Null) | None => return Ok(String::new()),
            Some(v) => v.clone(),
        };

        let mut child_context = self.context.child();

        if let Value::Object(obj) = &value {
            for (key, val) in obj {
                child_context.set(key.clone(), val.clone());
            }
        }

        child_context.set("this", value);

        self.scoped(&child_context).render(body)
    }
}
