//! Random subtree generation for filling a backend with test data.
//!
//! Each generated tree is a single root whose descendants reach at most
//! `max_depth` levels below it; every non-leaf level picks its fan-out
//! uniformly from `min_children..=max_children`.

use crate::error::ValidationError;
use crate::types::NodeIn;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const ADJECTIVES: &[&str] = &[
    "brave", "calm", "eager", "fancy", "gentle", "jolly", "lively", "proud", "quiet", "witty",
];
const COLORS: &[&str] = &[
    "amber", "azure", "coral", "crimson", "indigo", "ivory", "jade", "olive", "scarlet", "teal",
];
const ANIMALS: &[&str] = &[
    "badger", "falcon", "heron", "lynx", "marmot", "otter", "panda", "raven", "walrus", "yak",
];

/// Shape of one generated subtree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopulateParams {
    pub max_depth: usize,
    pub min_children: usize,
    pub max_children: usize,
}

impl PopulateParams {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.min_children > self.max_children {
            return Err(ValidationError::single(
                "min_children",
                format!(
                    "must not exceed max_children ({} > {})",
                    self.min_children, self.max_children
                ),
            ));
        }
        Ok(())
    }
}

/// Generates random subtrees from a seedable RNG
pub struct TreeGenerator {
    params: PopulateParams,
    rng: StdRng,
}

impl TreeGenerator {
    pub fn new(params: PopulateParams, seed: Option<u64>) -> Result<Self, ValidationError> {
        params.validate()?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { params, rng })
    }

    pub fn generate(&mut self) -> NodeIn {
        self.subtree(0)
    }

    fn subtree(&mut self, depth: usize) -> NodeIn {
        let mut node = NodeIn::leaf(self.random_title());
        if depth < self.params.max_depth {
            let count = self
                .rng
                .gen_range(self.params.min_children..=self.params.max_children);
            node.children = (0..count).map(|_| self.subtree(depth + 1)).collect();
        }
        node
    }

    fn random_title(&mut self) -> String {
        let pick = |rng: &mut StdRng, words: &[&'static str]| -> &'static str {
            words.choose(rng).copied().unwrap_or("node")
        };
        format!(
            "{}-{}-{}",
            pick(&mut self.rng, ADJECTIVES),
            pick(&mut self.rng, COLORS),
            pick(&mut self.rng, ANIMALS)
        )
    }
}
