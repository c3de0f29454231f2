use crate::core::enum_map::{COLOR_MAP, EnumMap};
use crate::core::status::ConfigError;

/// Capacity of the fixed-size string settings, including the terminator slot.
pub const SIZEOF_STR: usize = 1024;

/// A coerced value together with the diagnostic produced while coercing it.
///
/// Lenient coercers always yield a value (possibly a fallback or a clamped
/// one) and report a problem on the side, so the caller can both store the
/// value and surface the message.
#[derive(Debug)]
pub struct Coerced<T> {
    pub value: T,
    pub error: Option<ConfigError>,
}

impl<T> Coerced<T> {
    fn ok(value: T) -> Self {
        Self { value, error: None }
    }

    fn lenient(value: T, error: ConfigError) -> Self {
        Self {
            value,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Writes the value into `slot` and returns the diagnostic, if any.
    pub fn store(self, slot: &mut T) -> Result<(), ConfigError> {
        *slot = self.value;
        match self.error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Parses a leading decimal integer the way C's `atoi` does: optional sign,
/// then digits, stopping at the first non-digit. Returns 0 when there are none.
pub fn atoi(arg: &str) -> i64 {
    let arg = arg.trim_start();
    let (sign, digits) = match arg.as_bytes().first() {
        Some(b'-') => (-1, &arg[1..]),
        Some(b'+') => (1, &arg[1..]),
        _ => (1, arg),
    };

    let mut value: i64 = 0;
    for c in digits.bytes().take_while(u8::is_ascii_digit) {
        value = value.saturating_mul(10).saturating_add(i64::from(c - b'0'));
    }
    sign * value
}

/// Coerces a token to a boolean.
///
/// `1`, `true` and `yes` are true; `0`, `false` and `no` are false, in any
/// letter case. Anything else is false, with a diagnostic.
pub fn parse_bool(arg: &str) -> Coerced<bool> {
    let is = |words: &[&str]| words.iter().any(|word| word.eq_ignore_ascii_case(arg));

    if is(&["1", "true", "yes"]) {
        Coerced::ok(true)
    } else if is(&["0", "false", "no"]) {
        Coerced::ok(false)
    } else {
        Coerced::lenient(false, ConfigError::NonBoolean(arg.to_string()))
    }
}

/// Parses an integer and checks that `min <= value <= max`.
pub fn parse_bounded_int(arg: &str, min: i32, max: i32) -> Result<i32, ConfigError> {
    match arg.trim().parse::<i64>() {
        Ok(value) if i64::from(min) <= value && value <= i64::from(max) => Ok(value as i32),
        _ => Err(ConfigError::OutOfRange { min, max }),
    }
}

/// Parses a step value: a plain count, or a percentage when the token
/// contains `%`.
///
/// Percentages are shifted down by one before scaling, so that `100%` and a
/// count of `1` never collide: `50%` becomes `0.49`. Percentages of 100 or
/// more are clamped to `0.99` and negative ones to `1`, both with an error.
pub fn parse_step(arg: &str) -> Coerced<f64> {
    let count = atoi(arg);
    if !arg.contains('%') {
        return Coerced::ok(count as f64);
    }

    if count >= 100 {
        return Coerced::lenient(0.99, ConfigError::PercentageTooLarge);
    }
    if count < 0 {
        return Coerced::lenient(1.0, ConfigError::PercentageTooSmall);
    }
    Coerced::ok(((count - 1) as f64 / 100.0).max(0.0))
}

/// Looks `arg` up in `map`; on a miss the token is read as a boolean and
/// selects the map's first (false) or second (true) entry.
pub fn parse_enum(arg: &str, map: &EnumMap) -> i32 {
    if let Some(value) = map.lookup(arg) {
        return value;
    }

    let index = usize::from(parse_bool(arg).value);
    map.entries.get(index).map_or(0, |entry| entry.value)
}

/// Copies a possibly quoted string into a value of at most `capacity - 1` bytes.
pub fn parse_string(arg: &str, capacity: usize) -> Result<String, ConfigError> {
    let body = match arg.chars().next() {
        Some(quote @ ('"' | '\'')) => {
            if arg.len() < 2 || !arg.ends_with(quote) {
                return Err(ConfigError::UnmatchedQuotation);
            }
            &arg[1..arg.len() - 1]
        }
        _ => arg,
    };

    let mut end = body.len().min(capacity.saturating_sub(1));
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    Ok(body[..end].to_string())
}

/// Copies an argument list verbatim.
pub fn parse_string_vector(argv: &[String]) -> Vec<String> {
    argv.to_vec()
}

/// Resolves a color given by name, as `colorN`, or as a plain number 0-255.
pub fn parse_color(name: &str) -> Option<i32> {
    if let Some(value) = COLOR_MAP.lookup(name) {
        return Some(value);
    }
    let number = name.strip_prefix("color").unwrap_or(name);
    parse_bounded_int(number, 0, 255).ok()
}
