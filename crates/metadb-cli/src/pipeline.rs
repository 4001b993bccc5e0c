//! The run orchestrator: one accumulation pass per source file, in a fixed
//! data-dependency order, followed by a partitioned bulk write per namespace.
//!
//! Ordering is load-bearing. Protein passes seed reference scores that the
//! gene passes read (structural propagation); the prot2bp/cc/mf tallies must
//! land before the gene ontology pass annotates terms; the gene2phen tally
//! must land before the disease pass. The score table is threaded by value
//! through every step, so a reordering that breaks a dependency does not
//! compile away silently — the table simply is not there to pass.

use anyhow::{Context, Result};
use metadb_ingest::{
    seed_entity_scores, tally_relation_objects, Entity, EntityAccumulator, RefScoreTable,
    ScoreStrategy, StatementAccumulator,
};
use metadb_rdf::{TermReader, TripleReader};
use metadb_store::{BulkWriter, DocumentStore};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const PROT_PREFIX: &str = "http://rdf.biogateway.eu/prot";
const GENE_PREFIX: &str = "http://rdf.biogateway.eu/gene";
const PROT_ONTO_PREFIX: &str = "http://rdf.biogateway.eu/prot-onto/";
const PROT_PROT_PREFIX: &str = "http://rdf.biogateway.eu/prot-prot/uniprot!";
const GENE_PHEN_PREFIX: &str = "http://rdf.biogateway.eu/gene-phen/";
const OBO_PREFIX: &str = "http://purl.obolibrary.org/obo";
const DISEASE_PREFIX: &str = "http://purl.bioontology.org/ontology/";

/// Human taxon; the only one with gene-phenotype and disease sources.
const HUMAN_TAXON: &str = "9606";

/// Everything the pipeline needs, handed in by the CLI layer as plain values.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Root directory of the input dump (`<root>/<graph>/<taxon>.nt`).
    pub input_root: PathBuf,
    /// Bulk-writer worker count per namespace.
    pub workers: usize,
    /// Taxon identifiers to ingest.
    pub taxa: Vec<String>,
}

impl RunConfig {
    fn taxon_source(&self, graph: &str, taxon: &str) -> PathBuf {
        self.input_root.join(graph).join(format!("{taxon}.nt"))
    }
}

/// Run the whole generation pipeline against one datastore.
pub async fn run(config: &RunConfig, store: Arc<dyn DocumentStore>) -> Result<()> {
    let writer = BulkWriter::new(store, config.workers);
    let mut scores = RefScoreTable::new();

    for taxon in &config.taxa {
        tracing::info!(taxon = %taxon, "ingesting taxon sources");
        scores = ingest_taxon(config, &writer, taxon, scores).await?;
    }

    // Gene-phenotype relations and diseases exist only for humans.
    scores = tally_source(config, "gene2phen", HUMAN_TAXON, GENE_PHEN_PREFIX, scores)?;
    ingest_diseases(config, &writer, &scores).await?;

    // Depends on the prot2bp/cc/mf tallies above for accurate term scores.
    ingest_gene_ontology(config, &writer, &scores).await?;

    Ok(())
}

/// prot → gene → relation tallies → prot2prot, for one taxon.
async fn ingest_taxon(
    config: &RunConfig,
    writer: &BulkWriter,
    taxon: &str,
    mut scores: RefScoreTable,
) -> Result<RefScoreTable> {
    scores = ingest_entities(
        config,
        writer,
        taxon,
        "prot",
        PROT_PREFIX,
        ScoreStrategy::DirectRefs,
        false,
        scores,
    )
    .await?;

    // Gene scores propagate from the protein scores seeded above.
    scores = ingest_entities(
        config,
        writer,
        taxon,
        "gene",
        GENE_PREFIX,
        ScoreStrategy::StructuralPropagation,
        true,
        scores,
    )
    .await?;

    for graph in ["prot2bp", "prot2cc", "prot2mf"] {
        scores = tally_source(config, graph, taxon, PROT_ONTO_PREFIX, scores)?;
    }

    ingest_statements(config, writer, taxon, "prot2prot", PROT_PROT_PREFIX).await?;

    Ok(scores)
}

/// One entity pass: accumulate, seed scores for the namespace, bulk-write.
#[allow(clippy::too_many_arguments)]
async fn ingest_entities(
    config: &RunConfig,
    writer: &BulkWriter,
    taxon: &str,
    graph: &str,
    prefix: &str,
    strategy: ScoreStrategy,
    include_encodes: bool,
    scores: RefScoreTable,
) -> Result<RefScoreTable> {
    let path = config.taxon_source(graph, taxon);
    let reader = TripleReader::open(&path)
        .with_context(|| format!("entity pass for graph {graph}, taxon {taxon}"))?;

    let mut accumulator = EntityAccumulator::new(prefix);
    accumulator.consume(reader);
    tracing::info!(graph, taxon = %taxon, entities = accumulator.len(), "entity pass complete");

    let entities = accumulator.into_entities();
    let scores = seed_entity_scores(&entities, strategy, scores);

    writer
        .write_entities(graph, entities, &scores, taxon, include_encodes)
        .await?;
    Ok(scores)
}

/// One statement pass over a reified-relation graph, then bulk-write.
async fn ingest_statements(
    config: &RunConfig,
    writer: &BulkWriter,
    taxon: &str,
    graph: &str,
    prefix: &str,
) -> Result<()> {
    let path = config.taxon_source(graph, taxon);
    let reader = TripleReader::open(&path)
        .with_context(|| format!("statement pass for graph {graph}, taxon {taxon}"))?;

    let mut accumulator = StatementAccumulator::new(prefix);
    accumulator.consume(reader);
    tracing::info!(graph, taxon = %taxon, statements = accumulator.len(), "statement pass complete");

    writer
        .write_statements(graph, accumulator.into_statements(), taxon)
        .await?;
    Ok(())
}

/// One relation-tally pass: bump the score of every relation object.
fn tally_source(
    config: &RunConfig,
    graph: &str,
    taxon: &str,
    prefix: &str,
    scores: RefScoreTable,
) -> Result<RefScoreTable> {
    let path = config.taxon_source(graph, taxon);
    let reader = TripleReader::open(&path)
        .with_context(|| format!("relation tally for graph {graph}, taxon {taxon}"))?;
    Ok(tally_relation_objects(reader, prefix, scores))
}

/// Ontology terms: the stanza file is preferred when present, otherwise the
/// triple dump. Scores come from the prot2* tallies.
async fn ingest_gene_ontology(
    config: &RunConfig,
    writer: &BulkWriter,
    scores: &RefScoreTable,
) -> Result<()> {
    let obo_path = config.input_root.join("go").join("go-basic.obo");
    let entities = if obo_path.exists() {
        terms_from_obo(&obo_path)?
    } else {
        let path = config.input_root.join("go").join("go-basic.nt");
        let reader = TripleReader::open(&path).context("gene ontology pass")?;
        let mut accumulator = EntityAccumulator::new(OBO_PREFIX);
        accumulator.consume(reader);
        accumulator.into_entities()
    };
    tracing::info!(terms = entities.len(), "gene ontology pass complete");

    writer.write_simple_entities("goall", entities, scores).await?;
    Ok(())
}

/// Diseases: human-only OMIM dump, annotated with the gene2phen tallies.
async fn ingest_diseases(
    config: &RunConfig,
    writer: &BulkWriter,
    scores: &RefScoreTable,
) -> Result<()> {
    // TODO: derive the dump year instead of hardcoding the -22 suffix.
    let path = config.input_root.join("omim").join("omim-22.nt");
    let reader = TripleReader::open(&path).context("disease pass")?;

    let mut accumulator = EntityAccumulator::new(DISEASE_PREFIX);
    accumulator.consume(reader);
    tracing::info!(diseases = accumulator.len(), "disease pass complete");

    writer
        .write_simple_entities("omim", accumulator.into_entities(), scores)
        .await?;
    Ok(())
}

/// Convert OBO term stanzas into entity records keyed by term URI.
fn terms_from_obo(path: &Path) -> Result<BTreeMap<String, Entity>> {
    let reader = TermReader::open(path).context("gene ontology pass")?;
    let mut entities = BTreeMap::new();
    for stanza in reader {
        let uri = format!("{OBO_PREFIX}/{}", stanza.id.replace(':', "_"));
        let entity = Entity {
            uri: uri.clone(),
            pref_label: stanza.name.unwrap_or_default(),
            definition: stanza.definition.unwrap_or_default(),
            synonyms: stanza.synonyms,
            ..Entity::default()
        };
        entities.insert(uri, entity);
    }
    Ok(entities)
}
