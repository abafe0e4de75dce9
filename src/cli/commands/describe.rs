use anyhow::anyhow;
use clap::Args;
use serde::Serialize;

use crate::cli::{utils, OutputFormat};
use crate::database::models;
use crate::report::schema::{mapping_for, FieldDef, RecordSchema};

#[derive(Args)]
pub struct DescribeArgs {
    #[arg(help = "Report kind (slug, kind name, or table); omit to list all kinds")]
    pub kind: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct KindSummary {
    kind: &'static str,
    slug: &'static str,
    table: &'static str,
    route: String,
    fields: usize,
    soft_delete: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct KindDetail {
    #[serde(flatten)]
    summary: KindSummary,
    submitter: [&'static str; 2],
    mapping: Vec<FieldDef>,
    internal_columns: Vec<&'static str>,
}

pub fn handle(args: DescribeArgs, format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", render(args.kind.as_deref(), format)?);
    Ok(())
}

pub fn render(kind: Option<&str>, format: OutputFormat) -> anyhow::Result<String> {
    match kind {
        None => {
            let kinds = models::ALL.iter().copied().map(summary).collect::<anyhow::Result<Vec<_>>>()?;
            match format {
                OutputFormat::Text => Ok(list_text(&kinds)),
                _ => utils::render_structured(format, &kinds),
            }
        }
        Some(name) => {
            let schema = models::find(name).ok_or_else(|| anyhow!("Unknown report kind: {}", name))?;
            let detail = detail(schema)?;
            match format {
                OutputFormat::Text => Ok(detail_text(&detail)),
                _ => utils::render_structured(format, &detail),
            }
        }
    }
}

fn summary(schema: &'static RecordSchema) -> anyhow::Result<KindSummary> {
    let mapping = mapping_for(schema)?;
    Ok(KindSummary {
        kind: schema.kind,
        slug: schema.slug,
        table: schema.table,
        route: format!("/api/v1/{}", schema.slug),
        fields: mapping.len(),
        soft_delete: schema.soft_delete(),
    })
}

fn detail(schema: &'static RecordSchema) -> anyhow::Result<KindDetail> {
    let mapping = mapping_for(schema)?;
    Ok(KindDetail {
        summary: summary(schema)?,
        submitter: [schema.submitter.name, schema.submitter.phone],
        mapping: mapping.fields().copied().collect(),
        internal_columns: schema.fields.iter().filter(|f| f.is_internal()).map(|f| f.column).collect(),
    })
}

fn list_text(kinds: &[KindSummary]) -> String {
    let rows: Vec<Vec<String>> = kinds
        .iter()
        .map(|k| vec![k.kind.to_string(), k.route.clone(), k.table.to_string(), k.fields.to_string()])
        .collect();
    utils::table(&["KIND", "ROUTE", "TABLE", "FIELDS"], &rows)
}

fn detail_text(detail: &KindDetail) -> String {
    let s = &detail.summary;
    let mut out = format!(
        "{} ({})\ntable: {}\nsubmitter: {}, {}\n\n",
        s.kind, s.route, s.table, detail.submitter[0], detail.submitter[1]
    );

    let rows: Vec<Vec<String>> = detail
        .mapping
        .iter()
        .map(|f| {
            vec![
                f.external.to_string(),
                f.column.to_string(),
                f.ty.as_str().to_string(),
                if f.required { "yes".to_string() } else { String::new() },
            ]
        })
        .collect();
    out.push_str(&utils::table(&["FIELD", "COLUMN", "TYPE", "REQUIRED"], &rows));

    if !detail.internal_columns.is_empty() {
        out.push_str(&format!("\n\ninternal: {}", detail.internal_columns.join(", ")));
    }
    out
}
