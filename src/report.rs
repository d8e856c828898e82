use std::path::Path;

use anyhow::Result;

use crate::config::LoadedInputs;
use crate::model::policies::GroupPolicies;
use crate::output;
use crate::parsers::export_xml::ExportDoc;
use crate::resolve;
use crate::schema::GroupSchema;
use crate::summary::{GroupReport, RunSummary};

/// Runs every selected group through extract -> resolve -> pad -> write.
///
/// Each group gets its own table and length accumulator; a failure in one
/// group surfaces immediately and cannot leak state into the next.
pub fn run_all(
    inputs: &LoadedInputs,
    groups: &[&'static GroupSchema],
    output_dir: &Path,
) -> Result<RunSummary> {
    let mut reports = Vec::with_capacity(groups.len());
    for schema in groups {
        reports.push(run_group(inputs, schema, output_dir)?);
    }
    Ok(RunSummary {
        export: inputs.export_path.clone(),
        reports,
    })
}

fn run_group(
    inputs: &LoadedInputs,
    schema: &GroupSchema,
    output_dir: &Path,
) -> Result<GroupReport> {
    let present = inputs.doc.has_subtree(schema.root);
    let policies = if present {
        collect_group(&inputs.doc, schema)?
    } else {
        GroupPolicies::empty(schema)
    };

    let (table, observed) = resolve::resolve(&policies, schema, &inputs.idle_roles);
    let table = resolve::pad(table, &observed);

    let output = output_dir.join(schema.file_name);
    let rows_written = output::csv::write_report(&output, schema, &table)?;

    Ok(GroupReport {
        group: schema.name,
        present,
        policies: policies.policy_count(),
        roles: inputs.idle_roles.len(),
        rows_per_role: table.width(),
        rows_written,
        output,
    })
}

fn collect_group(doc: &ExportDoc, schema: &GroupSchema) -> Result<GroupPolicies> {
    let mut group = GroupPolicies::default();
    for category in schema.categories {
        group.insert(category.path, doc.extract_policies(category)?);
    }
    Ok(group)
}
