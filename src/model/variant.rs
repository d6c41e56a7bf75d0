use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatasetType {
    #[default]
    #[serde(rename = "SNV_INDEL")]
    SnvIndel,
    #[serde(rename = "SV")]
    Sv,
    #[serde(rename = "MITO")]
    Mito,
}

impl std::str::FromStr for DatasetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SNV_INDEL" => Ok(DatasetType::SnvIndel),
            "SV" => Ok(DatasetType::Sv),
            "MITO" => Ok(DatasetType::Mito),
            other => Err(format!("unknown dataset type '{}'", other)),
        }
    }
}

/// A backend-produced variant record.
///
/// The orchestrator only counts and identifies these; the location and annotation fields are
/// what the reference backend filters and sorts on. Anything else round-trips in `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    #[serde(rename = "variantId")]
    pub variant_id: String,
    pub chrom: String,
    pub pos: u64,
    #[serde(rename = "ref")]
    pub ref_allele: String,
    #[serde(rename = "alt")]
    pub alt_allele: String,
    #[serde(default)]
    pub xpos: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsid: Option<String>,
    #[serde(rename = "geneIds", default)]
    pub gene_ids: Vec<String>,
    /// Families with a non-reference genotype call for this variant.
    #[serde(rename = "familyGuids", default)]
    pub family_guids: Vec<String>,
    #[serde(rename = "datasetType", default)]
    pub dataset_type: DatasetType,
    #[serde(rename = "consequenceTerms", default)]
    pub consequence_terms: Vec<String>,
    #[serde(rename = "populationAfs", default)]
    pub population_afs: BTreeMap<String, f64>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Variant {
    pub fn new(chrom: &str, pos: u64, ref_allele: &str, alt_allele: &str) -> Self {
        let chrom = crate::locus::strip_chr_prefix(chrom).to_string();
        Self {
            variant_id: format!("{}-{}-{}-{}", chrom, pos, ref_allele, alt_allele),
            xpos: crate::locus::get_xpos(&chrom, pos).unwrap_or_default(),
            chrom,
            pos,
            ref_allele: ref_allele.to_string(),
            alt_allele: alt_allele.to_string(),
            rsid: None,
            gene_ids: Vec::new(),
            family_guids: Vec::new(),
            dataset_type: DatasetType::default(),
            consequence_terms: Vec::new(),
            population_afs: BTreeMap::new(),
            fields: Map::new(),
        }
    }

    pub fn rsid(mut self, rsid: &str) -> Self {
        self.rsid = Some(rsid.to_string());
        self
    }

    pub fn gene(mut self, gene_id: &str) -> Self {
        self.gene_ids.push(gene_id.to_string());
        self
    }

    pub fn family(mut self, family_guid: &str) -> Self {
        self.family_guids.push(family_guid.to_string());
        self
    }

    pub fn consequence(mut self, term: &str) -> Self {
        self.consequence_terms.push(term.to_string());
        self
    }

    pub fn population_af(mut self, population: &str, af: f64) -> Self {
        self.population_afs.insert(population.to_string(), af);
        self
    }

    pub fn dataset_type(mut self, dataset_type: DatasetType) -> Self {
        self.dataset_type = dataset_type;
        self
    }

    pub fn field(mut self, name: &str, value: Value) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    pub fn numeric_field(&self, name: &str) -> Option<f64> {
        self.fields.get(name).and_then(Value::as_f64)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneCount {
    pub total: u64,
    pub families: BTreeMap<String, u64>,
}

/// Per-gene variant counts, with a per-family breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneCounts(pub BTreeMap<String, GeneCount>);

impl GeneCounts {
    /// Counts variants per gene. With `families`, only those families enter the breakdown.
    pub fn tally<'a>(
        variants: impl IntoIterator<Item = &'a Variant>,
        families: Option<&BTreeSet<String>>,
    ) -> Self {
        let mut counts: BTreeMap<String, GeneCount> = BTreeMap::new();
        for variant in variants {
            for gene_id in &variant.gene_ids {
                let count = counts.entry(gene_id.clone()).or_default();
                count.total += 1;
                for family in &variant.family_guids {
                    if families.is_none_or(|allowed| allowed.contains(family)) {
                        *count.families.entry(family.clone()).or_default() += 1;
                    }
                }
            }
        }
        Self(counts)
    }

    pub fn get(&self, gene_id: &str) -> Option<&GeneCount> {
        self.0.get(gene_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
