//! This module turns the open constraints of a layout into the layouts that could follow it.

use smallvec::SmallVec;

use crate::crossword::{Crossword, Placement};
use crate::sequences::Sequence;
use crate::types::offset_position;
use crate::util::match_offsets;
use crate::MAX_WORD_LENGTH;

/// The result of trying to extend a layout by one word.
#[derive(Debug)]
pub enum Expansion {
    /// Every layout reachable by placing a single additional word (possibly none at all).
    Children(Vec<Crossword>),

    /// Some hard sequence can't be covered by any remaining word, so nothing below this layout can
    /// ever be valid.
    DeadEnd,
}

/// Propose every placement of the given words that would line up with `sequence`, treating gaps as
/// wildcards. A word that contains the pattern more than once produces one placement per
/// occurrence. No legality checks are done here.
pub fn propose_words<'a, I>(sequence: &Sequence, words: I) -> Vec<Placement>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut placements = vec![];

    for word in words {
        let letters: SmallVec<[char; MAX_WORD_LENGTH]> = word.chars().collect();
        for offset in match_offsets(&sequence.pattern, &letters) {
            placements.push(Placement::new(
                offset_position(sequence.start, -(offset as isize), sequence.direction),
                sequence.direction,
                word,
            ));
        }
    }

    placements
}

/// Collect the placements that fit `sequence`, using only words the crossword hasn't used yet.
#[must_use]
pub fn fitting_placements<S: AsRef<str>>(
    words: &[S],
    crossword: &Crossword,
    sequence: &Sequence,
) -> Vec<Placement> {
    let unused_words = words
        .iter()
        .map(|word| word.as_ref())
        .filter(|word| !crossword.is_used(word));

    propose_words(sequence, unused_words)
        .into_iter()
        .filter(|placement| crossword.fits(placement))
        .collect()
}

/// Build every child of `crossword`: one per fitting placement for each of its sequences. Each
/// child differs from its parent by exactly one word. If any hard sequence has no fitting
/// placement at all, the crossword is a dead end and we stop looking.
#[must_use]
pub fn generate_candidates<S: AsRef<str>>(
    words: &[S],
    crossword: &Crossword,
    sequences: &[Sequence],
) -> Expansion {
    let mut placements: Vec<Placement> = vec![];

    for sequence in sequences {
        let fits = fitting_placements(words, crossword, sequence);
        if fits.is_empty() && sequence.is_hard() {
            return Expansion::DeadEnd;
        }
        placements.extend(fits);
    }

    Expansion::Children(
        placements
            .iter()
            .map(|placement| {
                let mut child = crossword.clone();
                child
                    .embed_placement(placement)
                    .expect("Placement passed is_fit but couldn't be embedded");
                child
            })
            .collect(),
    )
}
