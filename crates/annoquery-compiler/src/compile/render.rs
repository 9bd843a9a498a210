//! Statement text rendering.

use std::fmt::{self, Write as _};

use annoquery_core::utils::escape_identifier;
use annoquery_core::Property;

use super::ir::{
    Constraint, ContainsPattern, Edge, Expr, NodePattern, OptionalMatch, Predicate, Relation,
    ReturnExpr, Statement, Tail, TypeNode,
};

impl Statement {
    /// Full statement text, one clause per line.
    pub fn text(&self) -> String {
        let mut lines = self.match_lines();
        lines.extend(self.optional.iter().flat_map(OptionalMatch::lines));
        lines.extend(self.tail_lines());
        lines.join("\n")
    }

    /// Pattern, edge, relationship and filter sections. Reads and writes of
    /// the same criteria share this text byte for byte.
    pub fn match_section(&self) -> String {
        self.match_lines().join("\n")
    }

    fn match_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for node in &self.nodes {
            let mut line = format!("MATCH {node}");
            if let Some(type_node) = &node.type_node {
                line.push_str(&type_link(type_node));
            }
            lines.push(line);
            if !node.inline.is_empty() {
                lines.push(format!("WHERE {}", conjunction(&node.inline)));
            }
        }
        for edge in &self.edges {
            lines.push(format!("MATCH {}", edge.render(&format!("({})", edge.child))));
        }
        if !self.constraints.is_empty() {
            lines.push("WITH *".to_string());
            lines.push(format!("WHERE {}", conjunction(&self.constraints)));
        }
        if !self.filters.is_empty() {
            lines.push("WITH *".to_string());
            lines.push(format!("WHERE {}", conjunction(&self.filters)));
        }
        lines
    }

    fn tail_lines(&self) -> Vec<String> {
        match &self.tail {
            Tail::Return { items, order } => {
                let items: Vec<String> = items
                    .iter()
                    .map(|item| format!("{} AS {}", item.expr, escape_identifier(&item.alias)))
                    .collect();
                let mut lines = vec![format!("RETURN {}", items.join(", "))];
                if !order.is_empty() {
                    let order: Vec<String> = order
                        .iter()
                        .map(|o| {
                            let alias = escape_identifier(&o.alias);
                            if o.descending {
                                format!("{alias} DESC")
                            } else {
                                alias
                            }
                        })
                        .collect();
                    lines.push(format!("ORDER BY {}", order.join(", ")));
                }
                lines
            }
            Tail::Set {
                type_link: link,
                assignments,
            } => {
                let mut lines = Vec::new();
                if let Some((var, type_node)) = link {
                    lines.push(format!("MATCH ({var}){}", type_link(type_node)));
                }
                let assignments: Vec<String> = assignments
                    .iter()
                    .map(|a| format!("{}.{} = ${}", a.var, escape_identifier(&a.key), a.param))
                    .collect();
                lines.push(format!("SET {}", assignments.join(", ")));
                lines
            }
            Tail::Delete { var } => vec![format!("DETACH DELETE {var}")],
        }
    }
}

impl OptionalMatch {
    fn lines(&self) -> Vec<String> {
        let node = &self.node;
        let mut line = format!("OPTIONAL MATCH {}", self.edge.render(&node.to_string()));
        if let Some(type_node) = &node.type_node {
            let _ = write!(line, ", ({}){}", node.var, type_link(type_node));
        }
        let mut lines = vec![line];
        if !node.inline.is_empty() {
            lines.push(format!("WHERE {}", conjunction(&node.inline)));
        }
        lines
    }
}

impl Edge {
    /// Edge pattern with `child` spliced in for the child node.
    pub(crate) fn render(&self, child: &str) -> String {
        let parent = format!("({})", self.parent);
        match self.relation {
            Relation::Following => format!("{parent}-[:precedes]->{child}"),
            Relation::Previous => format!("{child}-[:precedes]->{parent}"),
            Relation::ContainedBy(1) => format!("{parent}-[:contained_by]->{child}"),
            Relation::ContainedBy(n) => format!("{parent}-[:contained_by*{n}]->{child}"),
            Relation::SpokenBy => format!("{parent}-[:spoken_by]->{child}"),
        }
    }
}

impl fmt::Display for NodePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}{}", self.var, labels(&self.labels))?;
        if let Some(param) = &self.identity {
            write!(f, " {{id: ${param}}}")?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Property {
                var,
                property: Property::Duration,
            } => write!(f, "{var}.end - {var}.begin"),
            Expr::Property { var, property } => {
                write!(f, "{var}.{}", escape_identifier(property.name()))
            }
            Expr::Param(name) => write!(f, "${name}"),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.op, self.right)
    }
}

impl fmt::Display for ContainsPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hops = if self.depth > 1 {
            format!("*{}", self.depth)
        } else {
            String::new()
        };
        write!(
            f,
            "({})<-[:contained_by{hops}]-({} {{{}: ${}}})",
            self.container,
            labels(&self.labels),
            escape_identifier(self.property.name()),
            self.param
        )?;
        if !self.type_labels.is_empty() {
            write!(f, "-[:is_a]->({})", labels(&self.type_labels))?;
        }
        Ok(())
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Compare(predicate) => fmt::Display::fmt(predicate, f),
            Constraint::Contains(pattern) => fmt::Display::fmt(pattern, f),
        }
    }
}

impl fmt::Display for ReturnExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnExpr::Value(expr) => fmt::Display::fmt(expr, f),
            ReturnExpr::Aggregate { function, arg } => match arg {
                Some(arg) => write!(f, "{}({arg})", function.cypher_name()),
                None => write!(f, "{}(*)", function.cypher_name()),
            },
        }
    }
}

fn type_link(type_node: &TypeNode) -> String {
    format!("-[:is_a]->({}{})", type_node.var, labels(&type_node.labels))
}

fn labels(labels: &[String]) -> String {
    labels.iter().fold(String::new(), |mut out, label| {
        out.push(':');
        out.push_str(&escape_identifier(label));
        out
    })
}

fn conjunction<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" AND ")
}

