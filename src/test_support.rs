use crate::engine::{Candidate, Correction, Corrector, EngineError, Loader, NeuronInfo};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn exact(word: &str) -> Candidate {
    Candidate {
        word: word.to_string(),
        score: 1.0,
        len_diff: 0,
    }
}

/// Handle that only remembers which load produced it.
#[derive(Debug)]
pub struct TokenEngine {
    pub id: usize,
    pub uses: usize,
}

impl Corrector for TokenEngine {
    fn correct(&mut self, word: &str, _strict_len: bool) -> Correction {
        self.uses += 1;
        Correction {
            candidates: vec![exact(word)],
            words_touched: 1,
        }
    }

    fn words(&self) -> Vec<String> {
        Vec::new()
    }

    fn word_count(&self) -> usize {
        0
    }

    fn max_index_size(&self) -> usize {
        0
    }

    fn index_sizes(&self) -> Vec<(usize, usize)> {
        Vec::new()
    }

    fn neuron(&self, _word: &str) -> Vec<NeuronInfo> {
        Vec::new()
    }

    fn apply_accuracy(&mut self, _accuracy: f64) {}

    fn accuracy(&self) -> f64 {
        1.0
    }
}

#[derive(Debug, Default)]
pub struct CountingLoader {
    next: AtomicUsize,
    fail: bool,
}

impl CountingLoader {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

impl Loader for CountingLoader {
    type Handle = TokenEngine;

    fn load(&self, _strict: bool) -> Result<TokenEngine, EngineError> {
        if self.fail {
            return Err(EngineError::EmptyDictionary {
                path: PathBuf::from("<test>"),
            });
        }
        Ok(TokenEngine {
            id: self.next.fetch_add(1, Ordering::SeqCst),
            uses: 0,
        })
    }
}

/// Engine answering from a fixed table; unknown words correct to themselves.
#[derive(Debug, Clone)]
pub struct ScriptedEngine {
    words: Vec<String>,
    answers: Arc<HashMap<String, Vec<String>>>,
    accuracy: f64,
}

impl ScriptedEngine {
    pub fn new(words: &[&str], answers: &[(&str, &[&str])]) -> Self {
        Self {
            words: words.iter().map(|w| w.to_string()).collect(),
            answers: Arc::new(
                answers
                    .iter()
                    .map(|(word, candidates)| {
                        (
                            word.to_string(),
                            candidates.iter().map(|c| c.to_string()).collect(),
                        )
                    })
                    .collect(),
            ),
            accuracy: 1.0,
        }
    }
}

impl Corrector for ScriptedEngine {
    fn correct(&mut self, word: &str, _strict_len: bool) -> Correction {
        let candidates = match self.answers.get(word) {
            Some(answer) => answer
                .iter()
                .map(|c| Candidate {
                    word: c.clone(),
                    score: 0.8734,
                    len_diff: c.chars().count() as i32 - word.chars().count() as i32,
                })
                .collect(),
            None => vec![exact(word)],
        };
        Correction {
            candidates,
            words_touched: self.words.len() / 2,
        }
    }

    fn words(&self) -> Vec<String> {
        self.words.clone()
    }

    fn word_count(&self) -> usize {
        self.words.len()
    }

    fn max_index_size(&self) -> usize {
        self.words.len()
    }

    fn index_sizes(&self) -> Vec<(usize, usize)> {
        vec![(1, 2), (self.words.len(), 1)]
    }

    fn neuron(&self, word: &str) -> Vec<NeuronInfo> {
        vec![NeuronInfo {
            key: word.chars().take(2).collect(),
            size: self.words.len(),
            sample: self.words.iter().take(2).cloned().collect(),
        }]
    }

    fn apply_accuracy(&mut self, accuracy: f64) {
        self.accuracy = accuracy;
    }

    fn accuracy(&self) -> f64 {
        self.accuracy
    }
}

/// Hands out clones of one [`ScriptedEngine`], counting loads.
#[derive(Debug)]
pub struct ScriptedLoader {
    engine: ScriptedEngine,
    pub loads: AtomicUsize,
}

impl ScriptedLoader {
    pub fn new(engine: ScriptedEngine) -> Self {
        Self {
            engine,
            loads: AtomicUsize::new(0),
        }
    }
}

impl Loader for ScriptedLoader {
    type Handle = ScriptedEngine;

    fn load(&self, _strict: bool) -> Result<ScriptedEngine, EngineError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.engine.clone())
    }
}
