use super::scoring::similarity;
use super::{Candidate, Correction, Corrector, Dictionary, EngineError, Loader, NeuronInfo};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use tracing::debug;

const WORD_START: char = '^';
const WORD_END: char = '$';
const NEURON_SAMPLE: usize = 8;
const SCORE_EPSILON: f64 = 1e-9;

type NeuronKey = (char, char);

struct Entry {
    word: String,
    chars: Vec<char>,
}

/// Correction engine indexing every word under each of its letter pairs.
///
/// A lookup visits the words sharing at least one letter pair with the query,
/// scores them by edit-distance similarity, and keeps those within
/// `accuracy` of the best score. The visit marks are reused between lookups,
/// which is why a handle must not be shared.
pub struct NeuronEngine {
    dictionary: Dictionary,
    entries: Vec<Entry>,
    neurons: HashMap<NeuronKey, Vec<u32>>,
    accuracy: f64,
    marks: Vec<u32>,
    epoch: u32,
    touched: Vec<u32>,
}

fn neuron_keys(chars: &[char]) -> Vec<NeuronKey> {
    let mut padded = Vec::with_capacity(chars.len() + 2);
    padded.push(WORD_START);
    padded.extend_from_slice(chars);
    padded.push(WORD_END);

    let mut keys: Vec<NeuronKey> = padded.windows(2).map(|w| (w[0], w[1])).collect();
    let mut seen = Vec::with_capacity(keys.len());
    keys.retain(|k| {
        if seen.contains(k) {
            false
        } else {
            seen.push(*k);
            true
        }
    });
    keys
}

impl NeuronEngine {
    pub fn new(dictionary: Dictionary) -> Self {
        let entries: Vec<Entry> = dictionary
            .all_words()
            .into_iter()
            .map(|word| Entry {
                chars: word.chars().collect(),
                word,
            })
            .collect();

        let mut neurons: HashMap<NeuronKey, Vec<u32>> = HashMap::new();
        for (id, entry) in entries.iter().enumerate() {
            for key in neuron_keys(&entry.chars) {
                neurons.entry(key).or_default().push(id as u32);
            }
        }

        debug!(words = entries.len(), neurons = neurons.len(), "Built neuron index");

        Self {
            dictionary,
            marks: vec![0; entries.len()],
            entries,
            neurons,
            accuracy: 1.0,
            epoch: 0,
            touched: Vec::new(),
        }
    }

    fn next_epoch(&mut self) -> u32 {
        self.epoch = self.epoch.wrapping_add(1);
        if self.epoch == 0 {
            self.marks.iter_mut().for_each(|m| *m = 0);
            self.epoch = 1;
        }
        self.epoch
    }
}

impl Corrector for NeuronEngine {
    fn correct(&mut self, word: &str, strict_len: bool) -> Correction {
        let query: Vec<char> = word.chars().collect();
        let epoch = self.next_epoch();

        self.touched.clear();
        for key in neuron_keys(&query) {
            if let Some(ids) = self.neurons.get(&key) {
                for &id in ids {
                    let mark = &mut self.marks[id as usize];
                    if *mark != epoch {
                        *mark = epoch;
                        self.touched.push(id);
                    }
                }
            }
        }

        let mut scored: Vec<(f64, i32, &Entry)> = self
            .touched
            .iter()
            .filter_map(|&id| {
                let entry = &self.entries[id as usize];
                let len_diff = entry.chars.len() as i32 - query.len() as i32;
                if strict_len && len_diff.abs() > 1 {
                    return None;
                }
                Some((similarity(&query, &entry.chars), len_diff, entry))
            })
            .collect();

        let best = scored.iter().map(|(score, _, _)| *score).fold(0.0, f64::max);
        let candidates = if best > 0.0 {
            let threshold = best * self.accuracy - SCORE_EPSILON;
            scored.retain(|(score, _, _)| *score >= threshold);
            scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.2.word.cmp(&b.2.word)));
            scored
                .into_iter()
                .map(|(score, len_diff, entry)| Candidate {
                    word: entry.word.clone(),
                    score,
                    len_diff,
                })
                .collect()
        } else {
            Vec::new()
        };

        Correction {
            candidates,
            words_touched: self.touched.len(),
        }
    }

    fn words(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.word.clone()).collect()
    }

    fn word_count(&self) -> usize {
        self.dictionary.len()
    }

    fn max_index_size(&self) -> usize {
        self.neurons.values().map(Vec::len).max().unwrap_or(0)
    }

    fn index_sizes(&self) -> Vec<(usize, usize)> {
        let mut histogram: BTreeMap<usize, usize> = BTreeMap::new();
        for ids in self.neurons.values() {
            *histogram.entry(ids.len()).or_default() += 1;
        }
        histogram.into_iter().collect()
    }

    fn neuron(&self, word: &str) -> Vec<NeuronInfo> {
        let chars: Vec<char> = word.chars().collect();
        neuron_keys(&chars)
            .into_iter()
            .map(|key| {
                let ids = self.neurons.get(&key).map(Vec::as_slice).unwrap_or_default();
                NeuronInfo {
                    key: format!("{}{}", key.0, key.1),
                    size: ids.len(),
                    sample: ids
                        .iter()
                        .take(NEURON_SAMPLE)
                        .map(|&id| self.entries[id as usize].word.clone())
                        .collect(),
                }
            })
            .collect()
    }

    fn apply_accuracy(&mut self, accuracy: f64) {
        self.accuracy = accuracy;
    }

    fn accuracy(&self) -> f64 {
        self.accuracy
    }
}

/// Loads a [`NeuronEngine`] from a word-list file.
#[derive(Debug, Clone)]
pub struct WordListLoader {
    path: PathBuf,
    accuracy: f64,
}

impl WordListLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            accuracy: 1.0,
        }
    }

    /// Accuracy applied to every handle this loader creates
    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = accuracy;
        self
    }
}

impl Loader for WordListLoader {
    type Handle = NeuronEngine;

    fn load(&self, strict: bool) -> Result<NeuronEngine, EngineError> {
        let dictionary = Dictionary::load_word_list(&self.path, strict)?;
        let mut engine = NeuronEngine::new(dictionary);
        engine.apply_accuracy(self.accuracy);
        Ok(engine)
    }
}
