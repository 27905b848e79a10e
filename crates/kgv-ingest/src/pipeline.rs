//! Text → canonical graph, independent of threading.

use kgv_common::{CancelToken, KgvResult, ViewConfig};
use kgv_types::Graph;

use crate::format::SourceFormat;

/// Advisory progress markers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IngestStage {
    Parsing,
    Compiling,
    Finished,
}

/// Format-specific counters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IngestReport {
    Json(ext_json::IngestReport),
    Rdf(ext_rdf::CompileReport),
}

#[derive(Clone, Debug)]
pub struct IngestOutput {
    pub graph: Graph,
    pub format: SourceFormat,
    pub report: IngestReport,
}

/// Run the whole pipeline on the calling thread.
pub fn ingest(
    text: &str,
    format: SourceFormat,
    config: &ViewConfig,
    cancel: &CancelToken,
) -> KgvResult<IngestOutput> {
    ingest_with_progress(text, format, config, cancel, &mut |_| {})
}

/// Like [`ingest`], reporting each stage and polling `cancel` between them.
pub fn ingest_with_progress(
    text: &str,
    format: SourceFormat,
    config: &ViewConfig,
    cancel: &CancelToken,
    progress: &mut dyn FnMut(IngestStage),
) -> KgvResult<IngestOutput> {
    cancel.check()?;
    progress(IngestStage::Parsing);
    let output = match format {
        SourceFormat::Json => {
            let import = ext_json::ingest_json(text)?;
            IngestOutput {
                graph: import.graph,
                format,
                report: IngestReport::Json(import.report),
            }
        }
        SourceFormat::Rdf(rdf) => {
            let triples = ext_rdf::parse_text(text, rdf)?;
            cancel.check()?;
            progress(IngestStage::Compiling);
            let compiled = ext_rdf::compile_with_cancel(&triples, config, cancel)?;
            IngestOutput {
                graph: compiled.graph,
                format,
                report: IngestReport::Rdf(compiled.report),
            }
        }
    };
    cancel.check()?;
    progress(IngestStage::Finished);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kgv_common::KgvError;

    #[test]
    fn json_stages() {
        let mut stages = Vec::new();
        let out = ingest_with_progress(
            r#"{"nodes":[{"id":1}],"edges":[]}"#,
            SourceFormat::Json,
            &ViewConfig::default(),
            &CancelToken::new(),
            &mut |s| stages.push(s),
        )
        .unwrap();
        assert_eq!(out.graph.node_count(), 1);
        assert_eq!(stages, vec![IngestStage::Parsing, IngestStage::Finished]);
    }

    #[test]
    fn rdf_stages() {
        let mut stages = Vec::new();
        let out = ingest_with_progress(
            "<http://ex.org/a> <http://ex.org/p> <http://ex.org/b> .",
            SourceFormat::NTRIPLES,
            &ViewConfig::default(),
            &CancelToken::new(),
            &mut |s| stages.push(s),
        )
        .unwrap();
        assert_eq!(out.graph.edge_count(), 1);
        assert!(matches!(out.report, IngestReport::Rdf(ref r) if r.triples == 1));
        assert_eq!(
            stages,
            vec![
                IngestStage::Parsing,
                IngestStage::Compiling,
                IngestStage::Finished
            ]
        );
    }

    #[test]
    fn parse_errors_propagate() {
        let err = ingest(
            "{not json",
            SourceFormat::Json,
            &ViewConfig::default(),
            &CancelToken::new(),
        )
        .unwrap_err();
        assert!(matches!(err, KgvError::Parse(_)));
    }

    #[test]
    fn cancelled_before_start() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = ingest("{}", SourceFormat::Json, &ViewConfig::default(), &cancel).unwrap_err();
        assert!(matches!(err, KgvError::Cancelled));
    }
}
