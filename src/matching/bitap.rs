//! Bitap approximate string matching.
//!
//! Scores a pattern against a text allowing errors, penalising matches that sit far
//! from an expected location. Patterns longer than [`MAX_BITS`] are split into chunks
//! whose scores are averaged.

use std::collections::HashMap;

/// Longest pattern chunk matched in one pass.
pub const MAX_BITS: usize = 32;

/// Floor applied to fuzzy (non-identical) match scores.
const MIN_SCORE: f64 = 0.001;

/// Tuning for a single Bitap search.
#[derive(Debug, Clone, Copy)]
pub struct BitapOptions {
    /// Where in the text the pattern is expected to be found
    pub location: usize,
    /// How far from `location` a match may sit before it scores as a miss
    pub distance: usize,
    /// Highest accepted score (0.0 exact only, 1.0 anything)
    pub threshold: f64,
    /// Keep scanning the whole text instead of stopping near `location`
    pub find_all_matches: bool,
    /// Shortest run of matched characters that counts as a hit
    pub min_match_char_length: usize,
    /// Score by errors only, ignoring match position
    pub ignore_location: bool,
    /// Compare without lowercasing
    pub is_case_sensitive: bool,
}

impl Default for BitapOptions {
    fn default() -> Self {
        Self {
            location: 0,
            distance: 100,
            threshold: 0.6,
            find_all_matches: false,
            min_match_char_length: 1,
            ignore_location: false,
            is_case_sensitive: false,
        }
    }
}

/// Outcome of matching one pattern against one text.
#[derive(Debug, Clone, PartialEq)]
pub struct BitapResult {
    /// Whether the pattern was found within the threshold
    pub is_match: bool,
    /// Match score, 0.0 for an identical text; lower is better
    pub score: f64,
    /// Inclusive character ranges of matched runs
    pub indices: Vec<(usize, usize)>,
}

#[derive(Debug, Clone)]
struct Chunk {
    pattern: Vec<char>,
    alphabet: HashMap<char, u64>,
    start_index: usize,
}

/// A compiled pattern that can be matched against many texts.
#[derive(Debug, Clone)]
pub struct BitapSearcher {
    pattern: Vec<char>,
    chunks: Vec<Chunk>,
    options: BitapOptions,
}

impl BitapSearcher {
    /// Compile a pattern.
    pub fn new(pattern: &str, options: BitapOptions) -> Self {
        let pattern: Vec<char> = if options.is_case_sensitive {
            pattern.chars().collect()
        } else {
            lowercase_chars(pattern)
        };

        let mut chunks = Vec::new();
        let mut add_chunk = |slice: &[char], start_index: usize| {
            chunks.push(Chunk {
                pattern: slice.to_vec(),
                alphabet: pattern_alphabet(slice),
                start_index,
            });
        };

        let len = pattern.len();
        if len > MAX_BITS {
            let remainder = len % MAX_BITS;
            let end = len - remainder;
            let mut i = 0;
            while i < end {
                add_chunk(&pattern[i..i + MAX_BITS], i);
                i += MAX_BITS;
            }
            if remainder > 0 {
                let start_index = len - MAX_BITS;
                add_chunk(&pattern[start_index..], start_index);
            }
        } else if len > 0 {
            add_chunk(&pattern, 0);
        }

        Self {
            pattern,
            chunks,
            options,
        }
    }

    /// Whether the compiled pattern is empty.
    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    /// Match the pattern against a text.
    pub fn search_in(&self, text: &str) -> BitapResult {
        let text: Vec<char> = if self.options.is_case_sensitive {
            text.chars().collect()
        } else {
            lowercase_chars(text)
        };
        self.search_in_chars(&text)
    }

    /// Match against text that has already been case-folded the way the pattern was.
    pub fn search_in_chars(&self, text: &[char]) -> BitapResult {
        if self.chunks.is_empty() {
            return BitapResult {
                is_match: false,
                score: 1.0,
                indices: Vec::new(),
            };
        }

        if self.pattern.as_slice() == text {
            return BitapResult {
                is_match: true,
                score: 0.0,
                indices: vec![(0, text.len().saturating_sub(1))],
            };
        }

        let mut all_indices = Vec::new();
        let mut total_score = 0.0;
        let mut has_matches = false;

        for chunk in &self.chunks {
            let options = BitapOptions {
                location: self.options.location + chunk.start_index,
                ..self.options
            };
            let result = search(text, &chunk.pattern, &chunk.alphabet, &options);

            if result.is_match {
                has_matches = true;
                all_indices.extend(result.indices);
            }
            total_score += result.score;
        }

        BitapResult {
            is_match: has_matches,
            score: if has_matches {
                total_score / self.chunks.len() as f64
            } else {
                1.0
            },
            indices: all_indices,
        }
    }
}

/// Lowercase a string one character at a time, keeping one char per input char.
pub fn lowercase_chars(s: &str) -> Vec<char> {
    s.chars()
        .map(|c| c.to_lowercase().next().unwrap_or(c))
        .collect()
}

/// Bit mask per pattern character; the first character owns the highest bit.
fn pattern_alphabet(pattern: &[char]) -> HashMap<char, u64> {
    let len = pattern.len();
    let mut mask: HashMap<char, u64> = HashMap::new();
    for (i, c) in pattern.iter().enumerate() {
        *mask.entry(*c).or_insert(0) |= 1u64 << (len - i - 1);
    }
    mask
}

/// Score a candidate: error ratio plus distance from the expected location.
fn compute_score(
    pattern_len: usize,
    errors: usize,
    current_location: i64,
    expected_location: i64,
    options: &BitapOptions,
) -> f64 {
    let accuracy = errors as f64 / pattern_len as f64;
    if options.ignore_location {
        return accuracy;
    }

    let proximity = (expected_location - current_location).abs();
    if options.distance == 0 {
        return if proximity > 0 { 1.0 } else { accuracy };
    }

    accuracy + proximity as f64 / options.distance as f64
}

/// First occurrence of `pattern` in `text` at or after `from`.
fn find_from(text: &[char], pattern: &[char], from: usize) -> Option<usize> {
    if pattern.is_empty() || from >= text.len() || pattern.len() > text.len() - from {
        return None;
    }
    text[from..]
        .windows(pattern.len())
        .position(|w| w == pattern)
        .map(|p| p + from)
}

/// Turn a per-character hit mask into runs at least `min_len` long.
fn mask_to_indices(mask: &[bool], min_len: usize) -> Vec<(usize, usize)> {
    let mut indices = Vec::new();
    let mut start: Option<usize> = None;

    for (i, &hit) in mask.iter().enumerate() {
        match (hit, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                if i - s >= min_len {
                    indices.push((s, i - 1));
                }
                start = None;
            }
            _ => {}
        }
    }

    if let Some(s) = start {
        if mask.len() - s >= min_len {
            indices.push((s, mask.len() - 1));
        }
    }

    indices
}

/// Bitap search of one chunk (at most [`MAX_BITS`] characters).
fn search(
    text: &[char],
    pattern: &[char],
    alphabet: &HashMap<char, u64>,
    options: &BitapOptions,
) -> BitapResult {
    let pattern_len = pattern.len();
    let text_len = text.len();
    let expected = options.location.min(text_len) as i64;

    let mut current_threshold = options.threshold;
    let compute_matches = options.min_match_char_length > 1;
    let mut match_mask = vec![false; if compute_matches { text_len } else { 0 }];

    // Exact occurrences tighten the threshold up front
    let mut from = expected as usize;
    while let Some(index) = find_from(text, pattern, from) {
        let score = compute_score(pattern_len, 0, index as i64, expected, options);
        current_threshold = current_threshold.min(score);
        from = index + pattern_len;

        if compute_matches {
            for slot in &mut match_mask[index..index + pattern_len] {
                *slot = true;
            }
        }
    }

    let mut best_location: i64 = -1;
    let mut last_bits: Vec<u64> = Vec::new();
    let mut final_score = 1.0;
    let mut bin_max = (pattern_len + text_len) as i64;
    let mask: u64 = 1 << (pattern_len - 1);

    for errors in 0..pattern_len {
        // Binary search for how far from the expected location this error level can reach
        let mut bin_min = 0i64;
        let mut bin_mid = bin_max;
        while bin_min < bin_mid {
            let score = compute_score(pattern_len, errors, expected + bin_mid, expected, options);
            if score <= current_threshold {
                bin_min = bin_mid;
            } else {
                bin_max = bin_mid;
            }
            bin_mid = (bin_max - bin_min) / 2 + bin_min;
        }
        bin_max = bin_mid;

        let mut start = (expected - bin_mid + 1).max(1);
        let finish = if options.find_all_matches {
            text_len as i64
        } else {
            (expected + bin_mid).min(text_len as i64) + pattern_len as i64
        };

        let mut bits = vec![0u64; (finish + 2) as usize];
        bits[(finish + 1) as usize] = (1u64 << errors) - 1;

        let mut j = finish;
        while j >= start {
            let current_location = j - 1;
            let ju = j as usize;
            let char_match = text
                .get(current_location as usize)
                .and_then(|c| alphabet.get(c))
                .copied()
                .unwrap_or(0);

            if compute_matches {
                if let Some(slot) = match_mask.get_mut(current_location as usize) {
                    *slot = char_match != 0;
                }
            }

            bits[ju] = ((bits[ju + 1] << 1) | 1) & char_match;

            if errors > 0 {
                let prev_next = last_bits.get(ju + 1).copied().unwrap_or(0);
                let prev = last_bits.get(ju).copied().unwrap_or(0);
                bits[ju] |= ((prev_next | prev) << 1) | 1 | prev_next;
            }

            if bits[ju] & mask != 0 {
                final_score =
                    compute_score(pattern_len, errors, current_location, expected, options);

                if final_score <= current_threshold {
                    current_threshold = final_score;
                    best_location = current_location;

                    if best_location <= expected {
                        break;
                    }

                    start = (2 * expected - best_location).max(1);
                }
            }

            j -= 1;
        }

        // No better match is possible with one more error
        let score = compute_score(pattern_len, errors + 1, expected, expected, options);
        if score > current_threshold {
            break;
        }

        last_bits = bits;
    }

    let mut result = BitapResult {
        is_match: best_location >= 0,
        score: final_score.max(MIN_SCORE),
        indices: Vec::new(),
    };

    if compute_matches {
        let indices = mask_to_indices(&match_mask, options.min_match_char_length);
        if indices.is_empty() {
            result.is_match = false;
        }
        result.indices = indices;
    }

    result
}
