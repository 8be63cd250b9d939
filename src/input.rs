//! Validation of numeric text typed into the menu prompts.

/// Lowest accepted average score.
pub const SCORE_MIN: f32 = 0.0;
/// Highest accepted average score.
pub const SCORE_MAX: f32 = 10.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("Your input is not valid. Please re-enter a whole number!")]
    NotWholeNumber,
    #[error("Your input is not valid. Please re-enter a floating-point number!")]
    NotFloatingNumber,
    #[error("Number of students must not be negative")]
    NegativeCount,
    #[error("Score must not be less than 0")]
    ScoreBelowMin,
    #[error("Score must not be more than 10")]
    ScoreAboveMax,
}

fn strip_sign(input: &str) -> &str {
    input.strip_prefix(['+', '-']).unwrap_or(input)
}

/// Optional sign followed by one or more ASCII digits.
pub fn is_whole_number(input: &str) -> bool {
    let digits = strip_sign(input);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Optional sign, digits, at most one `.`; must not start with `.`.
///
/// The leading-`.` rule applies to the raw text only, so a signed form such
/// as `-.5` is accepted.
pub fn is_floating_number(input: &str) -> bool {
    if input.starts_with('.') {
        return false;
    }
    let body = strip_sign(input);
    let mut points = 0usize;
    let mut digits = 0usize;
    for b in body.bytes() {
        match b {
            b'.' => points += 1,
            b'0'..=b'9' => digits += 1,
            _ => return false,
        }
    }
    digits > 0 && points <= 1
}

/// Parse the number of students for the initialize prompt.
pub fn parse_count(input: &str) -> Result<usize, InputError> {
    let t = input.trim();
    if !is_whole_number(t) {
        return Err(InputError::NotWholeNumber);
    }
    if t.starts_with('-') && t[1..].bytes().any(|b| b != b'0') {
        return Err(InputError::NegativeCount);
    }
    strip_sign(t)
        .parse::<usize>()
        .map_err(|_| InputError::NotWholeNumber)
}

/// Parse an average score and check it lies in `[SCORE_MIN, SCORE_MAX]`.
pub fn parse_score(input: &str) -> Result<f32, InputError> {
    let t = input.trim();
    if !is_floating_number(t) {
        return Err(InputError::NotFloatingNumber);
    }
    let score: f32 = t.parse().map_err(|_| InputError::NotFloatingNumber)?;
    if score < SCORE_MIN {
        Err(InputError::ScoreBelowMin)
    } else if score > SCORE_MAX {
        Err(InputError::ScoreAboveMax)
    } else if score == 0.0 {
        // "-0" parses to -0.0
        Ok(0.0)
    } else {
        Ok(score)
    }
}
