use include_dir::{include_dir, Dir};
use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use serde_json::from_str;

static POOL_DIR: Dir = include_dir!("src/pools");

/// Number of words per round in word mode.
pub const WORD_MODE_LENGTH: usize = 14;

/// Which kind of target text a round uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Mode {
    #[strum(serialize = "Sentences")]
    Sentence,
    #[strum(serialize = "Random words")]
    Words,
}

/// A fixed pool of target-text entries, embedded at compile time.
#[derive(Deserialize, Clone, Debug)]
pub struct Pool {
    pub name: String,
    pub size: u32,
    pub entries: Vec<String>,
}

impl Pool {
    pub fn load(file_name: &str) -> Self {
        let file = POOL_DIR
            .get_file(format!("{file_name}.json"))
            .expect("pool file not found");

        let contents = file
            .contents_utf8()
            .expect("unable to interpret pool file as a string");

        from_str(contents).expect("unable to deserialize pool json")
    }
}

/// Produce the target text for one attempt.
///
/// Sentence mode draws one entry from the sentence pool; word mode draws
/// `WORD_MODE_LENGTH` entries from the word pool with replacement and joins
/// them with single spaces. The caller supplies the rng so selection can be
/// seeded in tests.
pub fn target_text<R: Rng>(mode: Mode, rng: &mut R) -> String {
    match mode {
        Mode::Sentence => {
            let pool = Pool::load("sentences");
            pool.entries
                .choose(rng)
                .expect("sentence pool is empty")
                .clone()
        }
        Mode::Words => {
            let pool = Pool::load("words");
            (0..WORD_MODE_LENGTH)
                .map(|_| {
                    pool.entries
                        .choose(rng)
                        .expect("word pool is empty")
                        .as_str()
                })
                .join(" ")
        }
    }
}
