//! Trait-to-sentence composer
//!
//! Turns a recipient's name, age and an ordered list of traits into the body
//! text of a card. Each trait is paired with one sentence template drawn from
//! a shuffled pool; once the pool runs out the remaining traits share a
//! generic template. A blank line and a randomly chosen closing follow.
//!
//! Randomness is supplied by the caller so that a seeded generator yields a
//! reproducible message.

use log::debug;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

/// A sentence template that mentions exactly one trait.
pub type TraitTemplate = fn(&str) -> String;

fn admired(t: &str) -> String {
    format!("I've always admired how {t} you are.")
}

fn nature(t: &str) -> String {
    format!("Your {t} nature makes everyone around you feel better.")
}

fn most(t: &str) -> String {
    format!("You're one of the most {t} people I know.")
}

fn thank_you(t: &str) -> String {
    format!("Thank you for being so {t} — it really matters.")
}

fn the_way(t: &str) -> String {
    format!("The way you're {t} has always meant a lot to me.")
}

fn another_year(t: &str) -> String {
    format!("Here's to another year of you being your {t} self.")
}

fn bring(t: &str) -> String {
    format!("You bring so much {t} into the world.")
}

fn lucky(t: &str) -> String {
    format!("I'm lucky to have someone as {t} as you in my life.")
}

/// Sentence templates paired with traits, one template per trait.
pub const TRAIT_TEMPLATES: [TraitTemplate; 8] = [
    admired,
    nature,
    most,
    thank_you,
    the_way,
    another_year,
    bring,
    lucky,
];

/// Closing lines appended after the trait sentences.
pub const CLOSINGS: [&str; 4] = [
    "Wishing you a year full of joy and everything you love.",
    "Hope your day is as amazing as you are.",
    "Cheers to you — today and every day.",
    "Sending you so much love on your special day.",
];

/// Sentence used for traits beyond the size of the template pool.
pub fn fallback_sentence(trait_: &str) -> String {
    format!("You're so {trait_} — and that's something to celebrate.")
}

/// Message used when no traits were given.
pub fn no_traits_message(name: &str, age: &str) -> String {
    format!(
        "Happy {age}th birthday, {name}! Wishing you a year filled with joy, laughter, and everything that makes you smile."
    )
}

/// Compose a card message from traits.
///
/// `traits` must already be trimmed, lowercased and non-empty (see
/// [`crate::characteristics::parse_characteristics`]). Never fails.
pub fn compose_message<R: Rng + ?Sized>(name: &str, age: &str, traits: &[String], rng: &mut R) -> String {
    if traits.is_empty() {
        return no_traits_message(name, age);
    }

    let mut templates = TRAIT_TEMPLATES;
    templates.shuffle(rng);

    let mut lines: Vec<String> = traits
        .iter()
        .enumerate()
        .map(|(i, t)| match templates.get(i) {
            Some(template) => template(t),
            None => fallback_sentence(t),
        })
        .collect();

    lines.push(String::new());
    // CLOSINGS is a non-empty const array
    let closing = CLOSINGS.choose(rng).copied().unwrap_or(CLOSINGS[0]);
    lines.push(closing.to_string());

    debug!("composed {} trait sentences for {}", traits.len(), name);
    lines.join("\n")
}

/// Resolve the final card text.
///
/// A non-blank personal message wins and is returned trimmed, without touching
/// the composer or the random source. Otherwise the message is composed from
/// the traits.
pub fn resolve_message<R: Rng + ?Sized>(
    name: &str,
    age: &str,
    traits: &[String],
    personal_message: Option<&str>,
    rng: &mut R,
) -> String {
    match personal_message.map(str::trim) {
        Some(msg) if !msg.is_empty() => msg.to_string(),
        _ => compose_message(name, age, traits, rng),
    }
}
