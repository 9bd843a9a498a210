//! Lowering of builder state into a [`Statement`].

use annoquery_core::{
    AnnotationType, AttributePath, ClauseElement, CompareOp, Hop, Operand, Property, Value,
};

use super::ir::{
    Assignment, Constraint, ContainsPattern, Edge, Expr, NodePattern, OptionalMatch, OrderItem,
    Predicate, Relation, ReturnExpr, ReturnItem, Statement, Tail, TypeNode,
};
use super::{CompileError, Intent, Params};
use crate::Result;
use crate::analyze::{
    Context, LevelId, Levels, Partition, References, Route, discourse_literal,
};
use crate::query::{AggregateFunction, GraphQuery, find_returned, validate};

/// Compiler state for one statement.
pub struct Compiler<'a> {
    query: &'a GraphQuery,
    ctx: Context<'a>,
    levels: Levels,
    partition: Partition,
    params: Params,
}

impl<'a> Compiler<'a> {
    /// Validate, analyze and lower `query` for `intent`.
    pub fn compile(query: &'a GraphQuery, intent: Intent) -> Result<Statement> {
        validate(query, intent)?;

        let criteria = query.criteria();
        let ctx = Context::new(query.hierarchy(), query.to_find(), criteria)?;
        let levels = Levels::resolve(&ctx, &references(query, intent))?;
        let partition = Partition::new(&ctx, &levels, criteria)?;
        tracing::debug!(
            ?intent,
            levels = levels.len(),
            required = levels.required().len(),
            relationships = partition.relationships().count(),
            filters = partition.filters().count(),
            "resolved query levels"
        );

        let compiler = Compiler {
            query,
            ctx,
            levels,
            partition,
            params: Params::new(),
        };
        Ok(compiler.lower(intent)?)
    }

    fn lower(mut self, intent: Intent) -> std::result::Result<Statement, CompileError> {
        let query = self.query;
        let required = self.levels.required();
        let mut nodes = Vec::with_capacity(required.len());
        for &id in &required {
            nodes.push(self.node(id, true)?);
        }
        let edges = required.iter().filter_map(|&id| self.edge(id)).collect();

        let mut constraints = Vec::new();
        for i in self.partition.relationships().collect::<Vec<_>>() {
            constraints.push(self.relationship(i)?);
        }

        let mut filters = Vec::new();
        for (i, level) in self.partition.filters().collect::<Vec<_>>() {
            if let ClauseElement::Comparison { path, op, operand } = &query.criteria()[i] {
                let var = self.levels.get(level).var().to_string();
                filters.push(self.predicate(&var, path, *op, operand)?);
            }
        }

        let mut optional = Vec::new();
        for id in self.levels.optional() {
            let node = self.node(id, false)?;
            if let Some(edge) = self.edge(id) {
                optional.push(OptionalMatch { edge, node });
            }
        }

        let tail = self.tail(intent)?;
        Ok(Statement {
            nodes,
            edges,
            constraints,
            filters,
            optional,
            tail,
            params: self.params,
        })
    }

    /// Pattern node for `id`, with its inline criteria when `bind_criteria`.
    fn node(
        &mut self,
        id: LevelId,
        bind_criteria: bool,
    ) -> std::result::Result<NodePattern, CompileError> {
        let query = self.query;
        let level = self.levels.get(id);
        let annotation = level.annotation().clone();
        let var = level.var().to_string();
        let type_node = (!annotation.type_subsets().is_empty()).then(|| TypeNode {
            var: level.type_var().to_string(),
            labels: self.type_labels(&annotation),
        });

        let mut identity = None;
        let mut inline = Vec::new();
        if bind_criteria {
            let bound: Vec<(usize, Route)> = self.partition.inline(id).collect();
            // the first `id = literal` goes into the property map
            let pinned = bound.iter().find_map(|&(i, route)| match &query.criteria()[i] {
                ClauseElement::Comparison {
                    op: CompareOp::Eq,
                    operand: Operand::Value(value),
                    ..
                } if matches!(route, Route::Identity(_)) => Some((i, value)),
                _ => None,
            });
            if let Some((_, value)) = pinned {
                identity = Some(self.params.push("id", value.clone()));
            }
            for (i, _) in bound {
                if pinned.is_some_and(|(p, _)| p == i) {
                    continue;
                }
                if let ClauseElement::Comparison { path, op, operand } = &query.criteria()[i] {
                    inline.push(self.predicate(&var, path, *op, operand)?);
                }
            }
        }

        let bound = bind_criteria && self.discourse_bound(id, annotation.discourse_label())?;
        // speakers span discourses and carry no discourse property
        if let Some(discourse) = annotation.discourse_label()
            && !annotation.is_speaker()
            && !bound
        {
            let param = self.params.push("discourse", Value::from(discourse));
            inline.push(Predicate {
                left: Expr::property(var.as_str(), Property::Discourse),
                op: CompareOp::Eq,
                right: Expr::Param(param),
            });
        }

        Ok(NodePattern {
            level: id,
            labels: self.token_labels(&annotation),
            var,
            identity,
            type_node,
            inline,
        })
    }

    /// Whether a criterion on `id` already pins it to the scoped `discourse`.
    ///
    /// A criterion pinning a different discourse can never match.
    fn discourse_bound(
        &self,
        id: LevelId,
        discourse: Option<&str>,
    ) -> std::result::Result<bool, CompileError> {
        let Some(discourse) = discourse else {
            return Ok(false);
        };
        let mut bound = false;
        for (i, _) in self.partition.inline(id) {
            let Some(label) = discourse_literal(&self.query.criteria()[i]) else {
                continue;
            };
            if label != discourse {
                return Err(CompileError::ConflictingDiscourse {
                    first: discourse.to_string(),
                    second: label.to_string(),
                });
            }
            bound = true;
        }
        Ok(bound)
    }

    fn edge(&self, id: LevelId) -> Option<Edge> {
        let level = self.levels.get(id);
        let parent = self.levels.get(level.parent()?);
        let relation = match level.annotation().hops().last()? {
            Hop::Following => Relation::Following,
            Hop::Previous => Relation::Previous,
            Hop::Speaker => Relation::SpokenBy,
            Hop::Up { level: higher } => Relation::ContainedBy(
                self.ctx
                    .hierarchy()
                    .distance(parent.annotation().name(), higher)
                    .unwrap_or(1),
            ),
        };
        Some(Edge {
            parent: parent.var().to_string(),
            child: level.var().to_string(),
            relation,
        })
    }

    fn relationship(&mut self, criterion: usize) -> std::result::Result<Constraint, CompileError> {
        let query = self.query;
        match &query.criteria()[criterion] {
            ClauseElement::Comparison { path, op, operand } => {
                let var = self.var_of(path.annotation())?;
                Ok(Constraint::Compare(self.predicate(&var, path, *op, operand)?))
            }
            ClauseElement::Alignment {
                alignment,
                first,
                second,
            } => {
                let op = if alignment.is_negated() {
                    CompareOp::Ne
                } else {
                    CompareOp::Eq
                };
                Ok(Constraint::Compare(Predicate {
                    left: Expr::property(self.var_of(first)?, alignment.anchor()),
                    op,
                    right: Expr::property(self.var_of(second)?, alignment.anchor()),
                }))
            }
            ClauseElement::Contains {
                container,
                path,
                value,
            } => {
                let id = self.level_of(container)?;
                let container_level = self.levels.get(id);
                let container_var = container_level.var().to_string();
                let contained = path.annotation();
                let depth = self
                    .ctx
                    .hierarchy()
                    .distance(contained.origin(), container_level.annotation().name())
                    .unwrap_or(1);
                let type_labels = if contained.type_subsets().is_empty() {
                    Vec::new()
                } else {
                    self.type_labels(contained)
                };
                let labels = self.token_labels(contained);
                let param = self.params.push(path.property().name(), value.clone());
                Ok(Constraint::Contains(ContainsPattern {
                    container: container_var,
                    depth,
                    labels,
                    type_labels,
                    property: path.property().clone(),
                    param,
                }))
            }
        }
    }

    /// `var.property op operand`, registering a literal operand as a
    /// parameter.
    fn predicate(
        &mut self,
        var: &str,
        path: &AttributePath,
        op: CompareOp,
        operand: &Operand,
    ) -> std::result::Result<Predicate, CompileError> {
        let right = match operand {
            Operand::Value(value) => {
                Expr::Param(self.params.push(path.property().name(), value.clone()))
            }
            Operand::Path(other) => {
                Expr::property(self.var_of(other.annotation())?, other.property().clone())
            }
        };
        Ok(Predicate {
            left: Expr::property(var, path.property().clone()),
            op,
            right,
        })
    }

    fn tail(&mut self, intent: Intent) -> std::result::Result<Tail, CompileError> {
        let query = self.query;
        match intent {
            Intent::Rows if query.aggregates().is_empty() => {
                let columns: Vec<&AttributePath> = query.projected().collect();
                let mut items = Vec::with_capacity(columns.len());
                for column in &columns {
                    items.push(ReturnItem {
                        expr: ReturnExpr::Value(self.path_expr(column)?),
                        alias: column.output_name(),
                    });
                }
                Ok(Tail::Return {
                    items,
                    order: order_items(query, &columns),
                })
            }
            Intent::Rows => {
                let groups: Vec<&AttributePath> = query.grouping().iter().collect();
                let mut items = Vec::new();
                for group in &groups {
                    items.push(ReturnItem {
                        expr: ReturnExpr::Value(self.path_expr(group)?),
                        alias: group.output_name(),
                    });
                }
                for aggregate in query.aggregates() {
                    let arg = match aggregate.path() {
                        Some(path) => Some(self.path_expr(path)?),
                        None => None,
                    };
                    items.push(ReturnItem {
                        expr: ReturnExpr::Aggregate {
                            function: aggregate.function(),
                            arg,
                        },
                        alias: aggregate.output_name(),
                    });
                }
                Ok(Tail::Return {
                    items,
                    order: order_items(query, &groups),
                })
            }
            Intent::Count => Ok(Tail::Return {
                items: vec![ReturnItem {
                    expr: ReturnExpr::Aggregate {
                        function: AggregateFunction::Count,
                        arg: None,
                    },
                    alias: "count_all".to_string(),
                }],
                order: Vec::new(),
            }),
            Intent::Mutation => Ok(self.mutation_tail()),
        }
    }

    fn mutation_tail(&mut self) -> Tail {
        let query = self.query;
        let mutation = query.mutation();
        let root = self.levels.root();
        let root_var = root.var().to_string();
        if mutation.delete {
            return Tail::Delete { var: root_var };
        }

        let type_var = root.type_var().to_string();
        let type_bound = !root.annotation().type_subsets().is_empty();
        let type_link = (!mutation.type_properties.is_empty() && !type_bound).then(|| {
            let annotation = root.annotation().clone();
            (
                root_var.clone(),
                TypeNode {
                    var: type_var.clone(),
                    labels: self.type_labels(&annotation),
                },
            )
        });

        let mut assignments = Vec::new();
        let targets = [
            (&type_var, &mutation.type_properties),
            (&root_var, &mutation.token_properties),
        ];
        for (var, properties) in targets {
            for (key, value) in properties {
                assignments.push(Assignment {
                    var: var.clone(),
                    key: key.clone(),
                    param: self.params.push(&format!("set_{key}"), value.clone()),
                });
            }
        }
        Tail::Set {
            type_link,
            assignments,
        }
    }

    fn path_expr(&self, path: &AttributePath) -> std::result::Result<Expr, CompileError> {
        Ok(Expr::property(
            self.var_of(path.annotation())?,
            path.property().clone(),
        ))
    }

    fn level_of(&self, annotation: &AnnotationType) -> std::result::Result<LevelId, CompileError> {
        self.levels
            .find(annotation)
            .ok_or_else(|| self.ctx.unreachable(annotation))
    }

    fn var_of(&self, annotation: &AnnotationType) -> std::result::Result<String, CompileError> {
        let id = self.level_of(annotation)?;
        Ok(self.levels.get(id).var().to_string())
    }

    /// Level name, corpus, token subsets.
    fn token_labels(&self, annotation: &AnnotationType) -> Vec<String> {
        let name = if annotation.is_speaker() {
            "Speaker"
        } else {
            annotation.name()
        };
        let mut labels = vec![name.to_string()];
        labels.extend(self.query.corpus_label().map(str::to_string));
        labels.extend(annotation.token_subsets().iter().cloned());
        labels
    }

    /// `<level>_type`, corpus, type subsets.
    fn type_labels(&self, annotation: &AnnotationType) -> Vec<String> {
        let mut labels = vec![format!("{}_type", annotation.name())];
        labels.extend(self.query.corpus_label().map(str::to_string));
        labels.extend(annotation.type_subsets().iter().cloned());
        labels
    }
}

/// Paths that contribute levels for `intent`.
fn references(query: &GraphQuery, intent: Intent) -> References<'_> {
    let mut refs = References {
        criteria: query.criteria(),
        ..Default::default()
    };
    if intent != Intent::Rows {
        return refs;
    }
    if query.aggregates().is_empty() {
        refs.columns = query.projected().collect();
    } else {
        refs.group_by = query.grouping().iter().collect();
        refs.aggregates = query.aggregates().iter().filter_map(|a| a.path()).collect();
    }
    refs.order_by = query.ordering().iter().map(|(field, _)| field).collect();
    refs
}

fn order_items(query: &GraphQuery, returned: &[&AttributePath]) -> Vec<OrderItem> {
    query
        .ordering()
        .iter()
        .map(|(field, descending)| OrderItem {
            alias: find_returned(returned, field)
                .map(AttributePath::output_name)
                .unwrap_or_else(|| field.output_name()),
            descending: *descending,
        })
        .collect()
}
