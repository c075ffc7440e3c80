//! Keyspace enumeration
//!
//! A keyspace is every string of one fixed length over an ordered alphabet.
//! Each candidate is identified by its ordinal index: the index written in
//! base `|alphabet|`, most significant digit first, left-filled with the first
//! alphabet character. For alphabet `"ab"` and length 2 the order is
//! `aa, ab, ba, bb`.
//!
//! ```rust
//! use zipsweep::keyspace::Keyspace;
//!
//! let keyspace = Keyspace::new("ab", 2).unwrap();
//! assert_eq!(keyspace.size(), 4);
//! assert_eq!(keyspace.encode(2).as_deref(), Some("ba"));
//! assert_eq!(keyspace.decode("bb"), Some(3));
//! ```

use anyhow::{Result, anyhow, bail};
use std::collections::HashSet;

pub mod generator;

pub use generator::{Batch, Batches, CandidateGenerator, GeneratorExit};

/// Fixed-length strings over an ordered alphabet, indexed `[0, size)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyspace {
    alphabet: Vec<char>,
    length: usize,
    size: u64,
}

impl Keyspace {
    /// Build a keyspace, rejecting empty or duplicate alphabets, zero length
    /// and sizes that do not fit in a `u64` index.
    pub fn new(alphabet: &str, length: usize) -> Result<Self> {
        let alphabet: Vec<char> = alphabet.chars().collect();

        if alphabet.is_empty() {
            bail!("Alphabet cannot be empty");
        }
        if length == 0 {
            bail!("Candidate length must be at least 1");
        }

        let mut seen = HashSet::with_capacity(alphabet.len());
        for ch in &alphabet {
            if !seen.insert(*ch) {
                bail!("Alphabet contains duplicate character '{ch}'");
            }
        }

        let size = u32::try_from(length)
            .ok()
            .and_then(|exp| (alphabet.len() as u64).checked_pow(exp))
            .ok_or_else(|| {
                anyhow!(
                    "Keyspace of {}^{} candidates does not fit in a 64-bit index",
                    alphabet.len(),
                    length
                )
            })?;

        Ok(Self {
            alphabet,
            length,
            size,
        })
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Number of candidates, `|alphabet|^length`
    pub fn size(&self) -> u64 {
        self.size
    }

    fn base(&self) -> u64 {
        self.alphabet.len() as u64
    }

    /// Candidate at `index`, or `None` past the end of the keyspace
    pub fn encode(&self, index: u64) -> Option<String> {
        if index >= self.size {
            return None;
        }
        let digits = self.digits_of(index);
        Some(digits.iter().map(|&d| self.alphabet[d]).collect())
    }

    /// Index of `candidate`, or `None` if it has the wrong length or uses
    /// characters outside the alphabet
    pub fn decode(&self, candidate: &str) -> Option<u64> {
        let mut index: u64 = 0;
        let mut count = 0;

        for ch in candidate.chars() {
            count += 1;
            if count > self.length {
                return None;
            }
            let digit = self.alphabet.iter().position(|&a| a == ch)? as u64;
            index = index * self.base() + digit;
        }

        (count == self.length).then_some(index)
    }

    /// Iterate candidates in index order starting at `start`
    ///
    /// Successive candidates are produced by incrementing digits in place
    /// rather than re-encoding every index.
    pub fn candidates_from(&self, start: u64) -> Candidates<'_> {
        let remaining = self.size.saturating_sub(start);
        let digits = if remaining > 0 {
            self.digits_of(start)
        } else {
            vec![0; self.length]
        };
        Candidates {
            keyspace: self,
            digits,
            remaining,
        }
    }

    fn digits_of(&self, index: u64) -> Vec<usize> {
        let mut digits = vec![0usize; self.length];
        let mut rest = index;
        for slot in digits.iter_mut().rev() {
            *slot = (rest % self.base()) as usize;
            rest /= self.base();
        }
        digits
    }
}

/// Odometer-style iterator over a contiguous run of candidates
#[derive(Debug)]
pub struct Candidates<'a> {
    keyspace: &'a Keyspace,
    digits: Vec<usize>,
    remaining: u64,
}

impl Iterator for Candidates<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.remaining == 0 {
            return None;
        }

        let candidate = self
            .digits
            .iter()
            .map(|&d| self.keyspace.alphabet[d])
            .collect();

        self.remaining -= 1;
        if self.remaining > 0 {
            let base = self.keyspace.alphabet.len();
            for digit in self.digits.iter_mut().rev() {
                *digit += 1;
                if *digit < base {
                    break;
                }
                *digit = 0;
            }
        }

        Some(candidate)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}
