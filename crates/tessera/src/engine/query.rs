use super::{materialize::attribute_record, Session};
use crate::{stmt::QueryPlan, Model, Result};

use tessera_core::{driver::operation::Query, stmt::Record};

use std::sync::Arc;

impl Session {
    /// Runs `plan` and materializes every row.
    pub(crate) async fn load<T: Model>(self: &Arc<Self>, plan: &QueryPlan) -> Result<Vec<Arc<T>>> {
        let rows = self.exec(lower(plan)).await?.rows.into_values()?;

        rows.into_iter()
            .map(|row| self.materialize::<T>(&plan.descriptor, row))
            .collect()
    }

    pub(crate) async fn count(&self, plan: &QueryPlan) -> Result<u64> {
        let mut query = lower(plan);
        query.projection = Some(vec![plan.descriptor.primary_key.column.clone()]);

        let rows = self.exec(query).await?.rows.into_values()?;
        Ok(rows.len() as u64)
    }

    pub(crate) async fn records(&self, plan: &QueryPlan) -> Result<Vec<Record>> {
        let rows = self.exec(lower(plan)).await?.rows.into_values()?;

        let records = rows
            .into_iter()
            .map(|mut row| match &plan.projection {
                Some(selections) => selections
                    .iter()
                    .map(|selection| (selection.path.clone(), row.take(&selection.column)))
                    .collect(),
                None => attribute_record(&plan.descriptor, row),
            })
            .collect();

        Ok(records)
    }
}

/// The storage collaborator's form of a plan.
fn lower(plan: &QueryPlan) -> Query {
    Query {
        table: plan.descriptor.table_name.clone(),
        filter: plan.filter.clone(),
        order_by: plan.order_by.clone(),
        projection: plan.projection.as_ref().map(|selections| {
            selections
                .iter()
                .map(|selection| selection.column.clone())
                .collect()
        }),
        limit: plan.limit,
    }
}
