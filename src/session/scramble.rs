use rand::Rng;
use rand::seq::SliceRandom;

use crate::engine::evaluate::Response;

/// Word bank for a scramble problem: each word can be picked once, and the
/// picks in order form the answer.
#[derive(Clone, Debug)]
pub struct ScrambleInput {
    pub bank: Vec<String>,
    picked: Vec<usize>,
}

impl ScrambleInput {
    pub fn new<R: Rng + ?Sized>(words: &[String], rng: &mut R) -> Self {
        let mut bank = words.to_vec();
        bank.shuffle(rng);
        Self {
            bank,
            picked: Vec::new(),
        }
    }

    pub fn is_used(&self, slot: usize) -> bool {
        self.picked.contains(&slot)
    }

    /// Pick the word at `slot` in the bank. Returns false if the slot is out
    /// of range or already used.
    pub fn pick(&mut self, slot: usize) -> bool {
        if slot >= self.bank.len() || self.is_used(slot) {
            return false;
        }
        self.picked.push(slot);
        true
    }

    /// Pick the first unused occurrence of `word`.
    pub fn pick_word(&mut self, word: &str) -> bool {
        let slot = (0..self.bank.len()).find(|&i| self.bank[i] == word && !self.is_used(i));
        match slot {
            Some(slot) => self.pick(slot),
            None => false,
        }
    }

    /// Return the most recent pick to the bank.
    pub fn undo(&mut self) -> Option<&str> {
        let slot = self.picked.pop()?;
        Some(&self.bank[slot])
    }

    pub fn clear(&mut self) {
        self.picked.clear();
    }

    pub fn picked_words(&self) -> Vec<&str> {
        self.picked.iter().map(|&i| self.bank[i].as_str()).collect()
    }

    pub fn is_complete(&self) -> bool {
        self.picked.len() == self.bank.len()
    }

    /// The constructed sentence, words separated by single spaces.
    pub fn answer(&self) -> String {
        self.picked_words().join(" ")
    }

    pub fn to_response(&self) -> Response {
        Response::Text(self.answer())
    }
}
