//! Weighted fuzzy search over blog posts.
//!
//! This module provides the in-memory index the search hook queries:
//! - Bitap matching per field value with a score threshold
//! - Relative field weights (title counts more than tags)
//! - Field-length normalisation so short fields are not drowned out
//! - Results sorted by ascending score (best first)

use std::sync::Arc;

use crate::matching::bitap::{lowercase_chars, BitapOptions, BitapSearcher};
use crate::models::Document;

/// A document field the matcher looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    /// Post title
    Title,
    /// Post description
    Description,
    /// Cleaned post body
    Content,
    /// Each tag
    Tags,
    /// Each category
    Categories,
}

impl SearchField {
    /// Get display name for the field.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Content => "content",
            Self::Tags => "tags",
            Self::Categories => "categories",
        }
    }

    /// The values of this field on a document; list fields yield one value per entry.
    fn values<'a>(&self, doc: &'a Document) -> Vec<&'a str> {
        match self {
            Self::Title => vec![doc.title.as_str()],
            Self::Description => doc.description.as_deref().into_iter().collect(),
            Self::Content => vec![doc.content.as_str()],
            Self::Tags => doc.tags.iter().map(String::as_str).collect(),
            Self::Categories => doc.categories.iter().map(String::as_str).collect(),
        }
    }
}

/// A field and its relative importance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedKey {
    /// The field to match
    pub field: SearchField,
    /// Relative weight; higher means more influence on the score
    pub weight: f64,
}

impl WeightedKey {
    pub fn new(field: SearchField, weight: f64) -> Self {
        Self { field, weight }
    }
}

/// Matcher configuration, passed explicitly to every index.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyOptions {
    /// Fields to search and their weights
    pub keys: Vec<WeightedKey>,
    /// Highest accepted per-field score (0.0 exact only, 1.0 anything)
    pub threshold: f64,
    /// Shortest matched run that counts as a hit
    pub min_match_char_length: usize,
    /// Expected match position within each field
    pub location: usize,
    /// How far from `location` a match may drift
    pub distance: usize,
    /// Score by errors only
    pub ignore_location: bool,
    /// Scan whole fields instead of stopping near `location`
    pub find_all_matches: bool,
    /// Skip field-length normalisation
    pub ignore_field_norm: bool,
    /// Exponent applied to the field-length norm
    pub field_norm_weight: f64,
    /// Compare without lowercasing
    pub is_case_sensitive: bool,
}

impl FuzzyOptions {
    /// Matcher configuration used by the blog search.
    ///
    /// Title 0.8, description 0.6, content 0.4, tags 0.3, categories 0.3;
    /// threshold 0.3; matches shorter than 2 characters are ignored.
    pub fn blog_defaults() -> Self {
        Self {
            keys: vec![
                WeightedKey::new(SearchField::Title, 0.8),
                WeightedKey::new(SearchField::Description, 0.6),
                WeightedKey::new(SearchField::Content, 0.4),
                WeightedKey::new(SearchField::Tags, 0.3),
                WeightedKey::new(SearchField::Categories, 0.3),
            ],
            threshold: 0.3,
            min_match_char_length: 2,
            ..Default::default()
        }
    }

    fn bitap_options(&self) -> BitapOptions {
        BitapOptions {
            location: self.location,
            distance: self.distance,
            threshold: self.threshold,
            find_all_matches: self.find_all_matches,
            min_match_char_length: self.min_match_char_length,
            ignore_location: self.ignore_location,
            is_case_sensitive: self.is_case_sensitive,
        }
    }
}

impl Default for FuzzyOptions {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            threshold: 0.6,
            min_match_char_length: 1,
            location: 0,
            distance: 100,
            ignore_location: false,
            find_all_matches: false,
            ignore_field_norm: false,
            field_norm_weight: 1.0,
            is_case_sensitive: false,
        }
    }
}

/// One matched field value.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMatch {
    /// Field the value belongs to
    pub field: SearchField,
    /// The matched value as stored on the document
    pub value: String,
    /// Bitap score for this value (lower is better)
    pub score: f64,
    /// Matched character ranges
    pub indices: Vec<(usize, usize)>,
}

/// A document with its overall score and per-field match details.
#[derive(Debug, Clone)]
pub struct ScoredMatch {
    /// Position of the document in the indexed collection
    pub index: usize,
    /// The matched document
    pub document: Document,
    /// Overall score, 0.0 best
    pub score: f64,
    /// Field values that matched
    pub matches: Vec<FieldMatch>,
}

#[derive(Debug, Clone)]
struct IndexedValue {
    text: Vec<char>,
    norm: f64,
}

#[derive(Debug, Clone)]
struct IndexedRecord {
    /// Values per key, in key order
    fields: Vec<Vec<IndexedValue>>,
}

/// In-memory fuzzy index over a document collection.
///
/// The index keeps the `Arc` it was built from so callers can tell whether a
/// collection has already been indexed.
#[derive(Debug, Clone)]
pub struct FuzzyIndex {
    documents: Arc<Vec<Document>>,
    options: FuzzyOptions,
    weights: Vec<f64>,
    records: Vec<IndexedRecord>,
}

impl FuzzyIndex {
    /// Build an index over a collection.
    pub fn new(documents: Arc<Vec<Document>>, options: FuzzyOptions) -> Self {
        let weights = normalized_weights(&options.keys);

        let records = documents
            .iter()
            .map(|doc| IndexedRecord {
                fields: options
                    .keys
                    .iter()
                    .map(|key| {
                        key.field
                            .values(doc)
                            .into_iter()
                            .filter(|v| !v.trim().is_empty())
                            .map(|v| IndexedValue {
                                text: if options.is_case_sensitive {
                                    v.chars().collect()
                                } else {
                                    lowercase_chars(v)
                                },
                                norm: field_norm(v, options.field_norm_weight),
                            })
                            .collect()
                    })
                    .collect(),
            })
            .collect();

        Self {
            documents,
            options,
            weights,
            records,
        }
    }

    /// The collection this index was built from.
    pub fn source(&self) -> &Arc<Vec<Document>> {
        &self.documents
    }

    /// Whether this index was built from exactly this collection (pointer identity).
    pub fn is_built_from(&self, documents: &Arc<Vec<Document>>) -> bool {
        Arc::ptr_eq(&self.documents, documents)
    }

    /// Get the number of indexed documents.
    pub fn document_count(&self) -> usize {
        self.records.len()
    }

    /// The options the index was built with.
    pub fn options(&self) -> &FuzzyOptions {
        &self.options
    }

    /// Search and return matched documents, best first.
    pub fn search(&self, query: &str) -> Vec<Document> {
        self.search_scored(query)
            .into_iter()
            .map(|m| m.document)
            .collect()
    }

    /// Search and return scores and match details, best first.
    pub fn search_scored(&self, query: &str) -> Vec<ScoredMatch> {
        let searcher = BitapSearcher::new(query, self.options.bitap_options());
        if searcher.is_empty() {
            return Vec::new();
        }

        let mut results: Vec<ScoredMatch> = Vec::new();

        for (index, record) in self.records.iter().enumerate() {
            let mut matches = Vec::new();
            let mut total_score = 1.0;

            for (key_index, values) in record.fields.iter().enumerate() {
                let key = &self.options.keys[key_index];
                let weight = self.weights[key_index];
                let raw_values = key.field.values(&self.documents[index]);
                let raw_values: Vec<&str> = raw_values
                    .into_iter()
                    .filter(|v| !v.trim().is_empty())
                    .collect();

                for (value_index, value) in values.iter().enumerate() {
                    let result = searcher.search_in_chars(&value.text);
                    if !result.is_match {
                        continue;
                    }

                    let norm = if self.options.ignore_field_norm {
                        1.0
                    } else {
                        value.norm
                    };
                    let base = if result.score == 0.0 && weight > 0.0 {
                        f64::EPSILON
                    } else {
                        result.score
                    };
                    let exponent = if weight > 0.0 { weight } else { 1.0 };
                    total_score *= base.powf(exponent * norm);

                    matches.push(FieldMatch {
                        field: key.field,
                        value: raw_values
                            .get(value_index)
                            .map(|v| v.to_string())
                            .unwrap_or_default(),
                        score: result.score,
                        indices: result.indices,
                    });
                }
            }

            if !matches.is_empty() {
                results.push(ScoredMatch {
                    index,
                    document: self.documents[index].clone(),
                    score: total_score,
                    matches,
                });
            }
        }

        results.sort_by(|a, b| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.index.cmp(&b.index))
        });

        results
    }
}

/// Scale key weights so they sum to one; non-positive weights count as zero.
fn normalized_weights(keys: &[WeightedKey]) -> Vec<f64> {
    let total: f64 = keys.iter().map(|k| k.weight.max(0.0)).sum();
    if total <= 0.0 {
        return vec![1.0; keys.len()];
    }
    keys.iter().map(|k| k.weight.max(0.0) / total).collect()
}

/// Field-length norm: `1 / tokens^(weight / 2)`, rounded to three decimals.
///
/// Tokens are runs of non-space characters.
fn field_norm(value: &str, weight: f64) -> f64 {
    let tokens = value.split(' ').filter(|t| !t.is_empty()).count().max(1);
    let norm = 1.0 / (tokens as f64).powf(0.5 * weight);
    (norm * 1000.0).round() / 1000.0
}
