//! Taxonomic annotation of admitted candidates.
//!
//! Every candidate is annotated before it reaches selection: contaminant
//! status participates in the tie-break, so classification cannot be
//! deferred.

use tethys_bio::taxonomy::{extract_species, lineage_contains, lineage_ranks};
use tethys_bio::AlignmentHit;
use tethys_core::config::TaxonomyConfig;
use tethys_core::TethysResult;
use tethys_storage::AnnotationStore;
use tracing::{debug, warn};

/// Score bonus for an informative hit description
const INFORMATIVE_BONUS: i32 = 4;

pub struct TaxonomyClassifier<'a> {
    store: &'a AnnotationStore,
    /// Configured contaminant taxa, lower-cased, in configured order
    contaminants: Vec<String>,
    /// Uninformative vocabulary, lower-cased
    uninformative: Vec<String>,
    /// The query organism's own lineage, lower-cased; empty when the
    /// organism is unconfigured or unknown to the store
    query_lineage: String,
}

impl<'a> TaxonomyClassifier<'a> {
    /// Build a classifier, resolving the query organism's lineage once
    /// per run rather than per hit.
    pub fn new(store: &'a AnnotationStore, config: &TaxonomyConfig) -> TethysResult<Self> {
        let query_lineage = match &config.query_organism {
            Some(name) => match store.tax_entry(name)? {
                Some(entry) => entry.lineage.to_lowercase(),
                None => {
                    warn!(
                        "Query organism '{}' not found in the taxonomy table; \
                         relevance scores will not reflect shared lineage",
                        name
                    );
                    String::new()
                }
            },
            None => String::new(),
        };

        Ok(Self {
            store,
            contaminants: config
                .contaminants
                .iter()
                .map(|c| c.trim().to_lowercase())
                .filter(|c| !c.is_empty())
                .collect(),
            uninformative: config
                .uninformative_terms
                .iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
            query_lineage,
        })
    }

    /// Annotate one candidate in place: species, lineage, contaminant
    /// flag, informativeness, relevance score.
    pub fn annotate(&self, hit: &mut AlignmentHit) -> TethysResult<()> {
        hit.informative = self.is_informative(&hit.subject_title);
        hit.species = extract_species(&hit.subject_title).unwrap_or_default();

        if !hit.species.is_empty() {
            if let Some(entry) = self.store.tax_entry(&hit.species)? {
                hit.lineage = entry.lineage;
            } else {
                debug!("Species '{}' not in the taxonomy table", hit.species);
            }
        }

        if let Some(matched) = self.match_contaminant(&hit.lineage) {
            hit.contaminant = true;
            hit.contaminant_type = matched.to_string();
        } else {
            hit.contaminant = false;
            hit.contaminant_type.clear();
        }

        hit.tax_score = self.relevance_score(hit);
        Ok(())
    }

    /// A title is informative unless it carries any term of the
    /// uninformative vocabulary
    fn is_informative(&self, title: &str) -> bool {
        let title = title.to_lowercase();
        !self
            .uninformative
            .iter()
            .any(|term| title.contains(term.as_str()))
    }

    /// First configured taxon contained in the lineage, in configured
    /// order. An empty lineage or an empty list never matches.
    fn match_contaminant(&self, lineage: &str) -> Option<&str> {
        if lineage.is_empty() {
            return None;
        }
        self.contaminants
            .iter()
            .find(|taxon| lineage_contains(lineage, taxon))
            .map(|taxon| taxon.as_str())
    }

    /// Relevance against the query organism's own lineage: informative
    /// hits start ahead, and every rank of the hit's lineage found in
    /// the query lineage adds one.
    fn relevance_score(&self, hit: &AlignmentHit) -> i32 {
        let mut score = 0;
        if hit.informative {
            score += INFORMATIVE_BONUS;
        }
        for rank in lineage_ranks(&hit.lineage) {
            if self.query_lineage.contains(&rank.to_lowercase()) {
                score += 1;
            }
        }
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use tethys_core::config::TaxonomyConfig;
    use tethys_storage::backend::BackendKind;
    use tethys_storage::build::SerialStoreBuilder;
    use tethys_storage::TaxEntry;

    fn store_with_taxa(dir: &TempDir) -> AnnotationStore {
        let mut builder = SerialStoreBuilder::new();
        builder.add_taxon(TaxEntry {
            tax_id: "562".to_string(),
            tax_name: "Escherichia coli".to_string(),
            lineage: "cellular organisms;Bacteria;Proteobacteria;Escherichia;Escherichia coli"
                .to_string(),
        });
        builder.add_taxon(TaxEntry {
            tax_id: "3352".to_string(),
            tax_name: "Pinus taeda".to_string(),
            lineage: "cellular organisms;Eukaryota;Viridiplantae;Pinopsida;Pinus;Pinus taeda"
                .to_string(),
        });
        builder.add_taxon(TaxEntry {
            tax_id: "3337".to_string(),
            tax_name: "Picea glauca".to_string(),
            lineage: "cellular organisms;Eukaryota;Viridiplantae;Pinopsida;Picea;Picea glauca"
                .to_string(),
        });

        let path = dir.path().join("store.bin");
        builder.finish(&path, &"2.0".parse().unwrap()).unwrap();
        AnnotationStore::open(BackendKind::Serialized, &path).unwrap()
    }

    fn config() -> TaxonomyConfig {
        TaxonomyConfig {
            query_organism: Some("Pinus taeda".to_string()),
            contaminants: vec!["escherichia".to_string()],
            ..Default::default()
        }
    }

    fn hit(title: &str) -> AlignmentHit {
        AlignmentHit {
            query_id: "q1".to_string(),
            subject_id: "s1".to_string(),
            subject_title: title.to_string(),
            percent_identity: 90.0,
            align_length: 100,
            mismatches: 0,
            gap_opens: 0,
            query_start: 1,
            query_end: 100,
            subject_start: 1,
            subject_end: 100,
            evalue: 1e-30,
            bit_score: 200.0,
            coverage: 90.0,
            species: String::new(),
            lineage: String::new(),
            contaminant: false,
            contaminant_type: String::new(),
            informative: false,
            tax_score: 0,
            database: PathBuf::from("nr.tsv"),
            frame: None,
        }
    }

    #[test]
    fn test_strain_title_is_contaminant_via_fallback_lookup() {
        let dir = TempDir::new().unwrap();
        let store = store_with_taxa(&dir);
        let classifier = TaxonomyClassifier::new(&store, &config()).unwrap();

        let mut candidate = hit("DNA polymerase [Escherichia coli str. K-12]");
        classifier.annotate(&mut candidate).unwrap();

        assert_eq!(candidate.species, "Escherichia coli str. K-12");
        assert!(candidate.lineage.contains("Escherichia"));
        assert!(candidate.contaminant);
        assert_eq!(candidate.contaminant_type, "escherichia");
    }

    #[test]
    fn test_unknown_species_is_never_contaminant() {
        let dir = TempDir::new().unwrap();
        let store = store_with_taxa(&dir);
        let classifier = TaxonomyClassifier::new(&store, &config()).unwrap();

        let mut candidate = hit("capsid protein [Xanthomonadaceae bacterium]");
        classifier.annotate(&mut candidate).unwrap();

        assert!(candidate.lineage.is_empty());
        assert!(!candidate.contaminant);
        assert!(candidate.contaminant_type.is_empty());
    }

    #[test]
    fn test_titleless_species_short_circuits() {
        let dir = TempDir::new().unwrap();
        let store = store_with_taxa(&dir);
        let classifier = TaxonomyClassifier::new(&store, &config()).unwrap();

        let mut candidate = hit("uncharacterized protein LOC101");
        classifier.annotate(&mut candidate).unwrap();

        assert!(candidate.species.is_empty());
        assert!(!candidate.contaminant);
        assert!(!candidate.informative); // "uncharacterized" is in the vocabulary
    }

    #[test]
    fn test_relevance_score_counts_shared_ranks() {
        let dir = TempDir::new().unwrap();
        let store = store_with_taxa(&dir);
        let classifier = TaxonomyClassifier::new(&store, &config()).unwrap();

        // Picea glauca shares "cellular organisms", "Eukaryota",
        // "Viridiplantae", "Pinopsida" with Pinus taeda: 4 ranks, plus the
        // informative bonus
        let mut candidate = hit("cellulose synthase [Picea glauca]");
        classifier.annotate(&mut candidate).unwrap();
        assert!(candidate.informative);
        assert_eq!(candidate.tax_score, 4 + 4);

        // An uninformative title forfeits the bonus but keeps rank credit
        let mut vague = hit("putative protein [Picea glauca]");
        classifier.annotate(&mut vague).unwrap();
        assert!(!vague.informative);
        assert_eq!(vague.tax_score, 4);
    }

    #[test]
    fn test_empty_contaminant_list_flags_nothing() {
        let dir = TempDir::new().unwrap();
        let store = store_with_taxa(&dir);
        let mut cfg = config();
        cfg.contaminants.clear();
        let classifier = TaxonomyClassifier::new(&store, &cfg).unwrap();

        let mut candidate = hit("DNA polymerase [Escherichia coli]");
        classifier.annotate(&mut candidate).unwrap();
        assert!(!candidate.contaminant);
    }

    #[test]
    fn test_first_configured_contaminant_wins() {
        let dir = TempDir::new().unwrap();
        let store = store_with_taxa(&dir);
        let mut cfg = config();
        cfg.contaminants = vec!["bacteria".to_string(), "escherichia".to_string()];
        let classifier = TaxonomyClassifier::new(&store, &cfg).unwrap();

        let mut candidate = hit("DNA polymerase [Escherichia coli]");
        classifier.annotate(&mut candidate).unwrap();
        assert!(candidate.contaminant);
        assert_eq!(candidate.contaminant_type, "bacteria");
    }
}
