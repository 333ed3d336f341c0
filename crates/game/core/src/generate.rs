//! Challenge generators, one per challenge kind.
//!
//! Generators are pure functions of the content table, the caller-owned pool
//! history and the random source. They never touch presentation state.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::challenge::{Challenge, ChallengeId, ChallengeKind, Choice, Direction, Prompt};
use crate::content::{ContentEntry, ContentError};
use crate::pool::NonRepeatingPool;

/// Word shown as text, correct emoji shuffled in among its distractors.
pub fn word_emoji<R>(
    pool: &mut NonRepeatingPool,
    entries: &[ContentEntry],
    rng: &mut R,
) -> Result<Challenge, ContentError>
where
    R: Rng + ?Sized,
{
    let entry = pool.draw(ChallengeKind::WordEmoji, entries, rng)?;

    let mut options: Vec<Choice> = std::iter::once(entry.correct.as_str())
        .chain(entry.distractors.iter().map(String::as_str))
        .map(Choice::new)
        .collect();
    options.shuffle(rng);

    let challenge = Challenge::new(
        entry.id,
        ChallengeKind::WordEmoji,
        Prompt::Word {
            text: entry.prompt.clone(),
        },
        Choice::new(entry.correct.as_str()),
        options,
    )?;
    Ok(challenge)
}

/// Spoken letter with `choices - 1` distractors drawn from the other letters.
pub fn letter<R>(
    pool: &mut NonRepeatingPool,
    letters: &[ContentEntry],
    choices: usize,
    rng: &mut R,
) -> Result<Challenge, ContentError>
where
    R: Rng + ?Sized,
{
    if !letters.is_empty() && letters.len() < 2 {
        return Err(ContentError::TooFewRows {
            kind: ChallengeKind::Letter,
            required: 2,
            found: letters.len(),
        });
    }

    let entry = pool.draw(ChallengeKind::Letter, letters, rng)?;

    let mut others: Vec<&str> = letters
        .iter()
        .map(|l| l.correct.as_str())
        .filter(|l| *l != entry.correct)
        .collect();
    others.shuffle(rng);

    let distractor_count = choices.saturating_sub(1).max(1);
    let mut options: Vec<Choice> = std::iter::once(entry.correct.as_str())
        .chain(others.into_iter().take(distractor_count))
        .map(Choice::new)
        .collect();
    options.shuffle(rng);

    let challenge = Challenge::new(
        entry.id,
        ChallengeKind::Letter,
        Prompt::SpokenLetter {
            audio_key: letter_audio_key(&entry.correct),
        },
        Choice::new(entry.correct.as_str()),
        options,
    )?;
    Ok(challenge)
}

/// Spoken direction, uniformly chosen between exactly left and right.
///
/// Options keep screen order (left region first) so the presentation never
/// depends on the draw.
pub fn direction<R>(rng: &mut R) -> Challenge
where
    R: Rng + ?Sized,
{
    let direction = if rng.gen_bool(0.5) {
        Direction::Right
    } else {
        Direction::Left
    };

    Challenge::from_parts(
        ChallengeId(direction as u32),
        ChallengeKind::Direction,
        Prompt::SpokenDirection { direction },
        Choice::from(direction),
        Direction::ALL.iter().copied().map(Choice::from).collect(),
    )
}

pub fn letter_audio_key(letter: &str) -> String {
    format!("letter_audio_{}", letter.to_lowercase())
}
