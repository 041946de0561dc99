use rand::{seq::SliceRandom, Rng};

pub const QUOTES: [&str; 4] = [
    "Growth takes time. Be patient with yourself.",
    "Every moment of focus plants a seed of success.",
    "Your garden of accomplishments grows one tree at a time.",
    "Nurture your mind like a beautiful garden.",
];

/// A motivational line shown while a session runs.
pub fn pick_quote<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    QUOTES.choose(rng).copied().unwrap_or(QUOTES[0])
}
