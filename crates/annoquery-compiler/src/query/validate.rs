//! Builder state checks run before compilation.

use std::collections::HashSet;

use annoquery_core::{AttributePath, Property, PropertyMap};

use super::{BuildError, GraphQuery};
use crate::compile::Intent;

pub(crate) fn validate(query: &GraphQuery, intent: Intent) -> Result<(), BuildError> {
    match intent {
        Intent::Rows if query.aggregates().is_empty() => validate_rows(query),
        Intent::Rows => validate_aggregates(query),
        Intent::Count if !query.grouping().is_empty() => Err(BuildError::GroupedCount),
        Intent::Count => Ok(()),
        Intent::Mutation => validate_mutation(query),
    }
}

fn validate_rows(query: &GraphQuery) -> Result<(), BuildError> {
    if !query.grouping().is_empty() {
        return Err(BuildError::GroupByWithoutAggregate);
    }
    unique_names(query.projected().map(AttributePath::output_name))?;
    let columns: Vec<&AttributePath> = query.projected().collect();
    check_order(query, &columns)
}

fn validate_aggregates(query: &GraphQuery) -> Result<(), BuildError> {
    let names = query
        .grouping()
        .iter()
        .map(AttributePath::output_name)
        .chain(query.aggregates().iter().map(|a| a.output_name()));
    unique_names(names)?;
    let groups: Vec<&AttributePath> = query.grouping().iter().collect();
    check_order(query, &groups)
}

/// Every order field must name one of `returned`.
fn check_order(query: &GraphQuery, returned: &[&AttributePath]) -> Result<(), BuildError> {
    for (field, _) in query.ordering() {
        if find_returned(returned, field).is_none() {
            return Err(BuildError::OrderByUnknownColumn {
                column: field.output_name(),
            });
        }
    }
    Ok(())
}

/// Column an order field refers to: same target, or same output name.
pub(crate) fn find_returned<'a>(
    returned: &[&'a AttributePath],
    field: &AttributePath,
) -> Option<&'a AttributePath> {
    returned
        .iter()
        .copied()
        .find(|c| c.same_target(field))
        .or_else(|| {
            let name = field.output_name();
            returned.iter().copied().find(|c| c.output_name() == name)
        })
}

fn unique_names(names: impl Iterator<Item = String>) -> Result<(), BuildError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.clone()) {
            return Err(BuildError::DuplicateColumn { column: name });
        }
    }
    Ok(())
}

fn validate_mutation(query: &GraphQuery) -> Result<(), BuildError> {
    let mutation = query.mutation();
    if mutation.is_empty() {
        return Err(BuildError::EmptyMutation);
    }
    let updates = !mutation.type_properties.is_empty() || !mutation.token_properties.is_empty();
    if mutation.delete && updates {
        return Err(BuildError::ConflictingMutation);
    }
    check_keys(&mutation.type_properties)?;
    check_keys(&mutation.token_properties)
}

fn check_keys(properties: &PropertyMap) -> Result<(), BuildError> {
    for key in properties.keys() {
        if key.is_empty() {
            return Err(BuildError::EmptyPropertyName);
        }
        if matches!(Property::from(key.as_str()), Property::Id | Property::Duration) {
            return Err(BuildError::ReadOnlyProperty {
                property: key.clone(),
            });
        }
    }
    Ok(())
}
