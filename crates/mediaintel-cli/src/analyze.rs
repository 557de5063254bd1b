//! `analyze` command: filter, chart, synthesize, assemble, export.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use mediaintel_analytics::{aggregate, apply};
use mediaintel_core::{ChartKind, ChartSet, DateRange, FilterError, FilterSpec};
use mediaintel_report::{assemble, ChartImageRef, Report, ReportInputs};

use crate::session::Session;
use crate::AnalyzeArgs;

/// Build the query from the filter flags.
pub(crate) fn filter_spec(args: &AnalyzeArgs) -> Result<FilterSpec, FilterError> {
    Ok(FilterSpec::new()
        .with_date_range(DateRange::new(args.from, args.to)?)
        .with_platforms(args.platforms.iter().copied())
        .with_sentiments(args.sentiments.iter().copied())
        .with_media_types(args.media_types.iter().copied())
        .with_locations(&args.locations))
}

/// `None` when no `--image` flags were given. A repeated kind keeps the last handle.
pub(crate) fn image_map(args: &AnalyzeArgs) -> Option<BTreeMap<ChartKind, ChartImageRef>> {
    if args.images.is_empty() {
        return None;
    }
    let mut map = BTreeMap::new();
    for (kind, handle) in &args.images {
        if map.insert(*kind, ChartImageRef::new(handle.as_str())).is_some() {
            tracing::warn!(chart = %kind, "image given more than once, using the last");
        }
    }
    Some(map)
}

/// Run the pipeline for one query and assemble the report.
pub(crate) async fn build_report(session: &Session, args: &AnalyzeArgs) -> anyhow::Result<Report> {
    let spec = filter_spec(args)?;
    let filtered = apply(&session.records, &spec);
    let charts = aggregate(filtered.iter().copied(), &session.aggregate);

    let prior_spec = if args.compare_prior {
        let prior = spec.prior_period();
        if prior.is_none() {
            tracing::warn!("--compare-prior needs both --from and --to; skipping baseline");
        }
        prior
    } else {
        None
    };
    let baseline: Option<ChartSet> = prior_spec.as_ref().map(|prior| {
        let rows = apply(&session.records, prior);
        tracing::info!(filter = %prior, records = rows.len(), "baseline computed");
        aggregate(rows.iter().copied(), &session.aggregate)
    });

    let synth = &session.synthesizer;
    let insights = synth.synthesize_all(&charts, baseline.as_ref()).await;
    let narrative = synth.narrate(&charts, &insights).await;

    let mut inputs = ReportInputs::new(filtered.iter().copied(), &spec, charts, insights, narrative);
    if let Some(prior) = &prior_spec {
        inputs = inputs.with_baseline(prior);
    }
    if let Some(images) = image_map(args) {
        inputs = inputs.with_images(images);
    }

    let report = assemble(inputs)?;
    tracing::info!(
        filter = %spec,
        records = report.record_count(),
        narrative = ?report.narrative().source,
        "report assembled"
    );
    Ok(report)
}

pub(crate) async fn run_analyze(session: &Session, args: &AnalyzeArgs) -> anyhow::Result<()> {
    let report = build_report(session, args).await?;
    let body = report.render_markdown();

    if let Some(path) = &args.json {
        let json = serde_json::to_string_pretty(&report)?;
        write_file(path, &json)?;
        tracing::info!(path = %path.display(), "chart data written");
    }

    match &args.output {
        Some(path) => {
            write_file(path, &body)?;
            println!(
                "report written to {} (sha256 {})",
                path.display(),
                report.fingerprint()
            );
        }
        None => print!("{body}"),
    }
    Ok(())
}

fn write_file(path: &Path, content: &str) -> anyhow::Result<()> {
    std::fs::write(path, content).with_context(|| format!("could not write {}", path.display()))
}
