//! Parsing of the free-text stat strings found in bestiary entries
//!
//! Bestiary stats arrive as display strings such as `"45 (6d10+12)"` or
//! `"14 (+2)"`. Every parser here degrades to a safe value instead of failing.

use rand::Rng;

/// Upper bound on dice in a single formula; larger formulas use the flat value
const MAX_DICE: u32 = 1000;

/// A parsed `<N>d<die>+<bonus>` hit dice formula
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceFormula {
    pub count: u32,
    pub sides: u32,
    pub bonus: i32,
}

impl DiceFormula {
    /// Parse a bare formula such as `6d10+12`, `2d6 - 1` or `3d8`
    pub fn parse(formula: &str) -> Option<Self> {
        let compact: String = formula.chars().filter(|c| !c.is_whitespace()).collect();
        let (count, rest) = compact.split_once(['d', 'D'])?;

        let (sides, bonus) = match rest.find(['+', '-']) {
            Some(position) => {
                let (sides, bonus) = rest.split_at(position);
                (sides, bonus.trim_start_matches('+').parse::<i32>().ok()?)
            }
            None => (rest, 0),
        };

        let count = count.parse::<u32>().ok()?;
        let sides = sides.parse::<u32>().ok()?;
        if count == 0 || count > MAX_DICE || sides == 0 {
            return None;
        }

        Some(Self {
            count,
            sides,
            bonus,
        })
    }

    /// Extract the formula from the first parenthesized group of a stat string
    pub fn from_notation(notation: &str) -> Option<Self> {
        Self::parse(parenthesized(notation)?)
    }

    /// Smallest and largest total this formula can produce
    pub fn bounds(&self) -> (i32, i32) {
        let min = self.count as i64 + self.bonus as i64;
        let max = self.count as i64 * self.sides as i64 + self.bonus as i64;
        (clamp_to_hp(min), clamp_to_hp(max))
    }

    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> i32 {
        let total: i64 = (0..self.count)
            .map(|_| i64::from(rng.gen_range(1..=self.sides)))
            .sum::<i64>()
            + i64::from(self.bonus);
        clamp_to_hp(total)
    }
}

/// Resolve a hit point notation into a concrete value, rolling dice when present.
///
/// Each call rolls afresh. The result is never negative.
pub fn resolve<R: Rng + ?Sized>(notation: &str, rng: &mut R) -> i32 {
    match DiceFormula::from_notation(notation) {
        Some(formula) => formula.roll(rng),
        None => leading_integer(notation).max(0),
    }
}

/// The optionally signed integer at the start of `text`, or 0
pub fn leading_integer(text: &str) -> i32 {
    let text = text.trim_start();
    let (sign, digits) = match text.as_bytes().first() {
        Some(b'-') => (-1, &text[1..]),
        Some(b'+') => (1, &text[1..]),
        _ => (1, text),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    digits[..end]
        .parse::<i32>()
        .map(|value| sign * value)
        .unwrap_or(0)
}

/// The signed modifier inside the first parenthesized group: `"14 (+2)"` is 2
pub fn dexterity_modifier(notation: &str) -> i32 {
    parenthesized(notation)
        .map(str::trim)
        .and_then(|inner| inner.trim_start_matches('+').parse::<i32>().ok())
        .unwrap_or(0)
}

fn parenthesized(text: &str) -> Option<&str> {
    let open = text.find('(')?;
    let rest = &text[open + 1..];
    let close = rest.find(')')?;
    Some(&rest[..close])
}

fn clamp_to_hp(value: i64) -> i32 {
    value.clamp(0, i64::from(i32::MAX)) as i32
}
