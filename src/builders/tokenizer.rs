/// Maximum number of arguments on one configuration line.
pub const SIZEOF_ARG: usize = 32;

const SEPARATORS: [char; 2] = [' ', '\t'];

fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

/// Splits a trimmed line into its command name and the remaining value at
/// the first run of spaces or tabs.
pub fn split_option_line(line: &str) -> (&str, &str) {
    let line = line.trim();
    match line.split_once(SEPARATORS) {
        Some((name, value)) => (name, value.trim()),
        None => (line, ""),
    }
}

/// Cuts `value` at the first `#` that is not inside quotes.
///
/// Quotes only count where [`argv_from_string`] would start a token with
/// them, so an apostrophe inside a word does not hide a comment.
pub fn strip_comment(value: &str) -> &str {
    let mut quote = None;
    let mut token_start = true;

    for (pos, c) in value.char_indices() {
        match quote {
            Some(open) if c == open => {
                quote = None;
                token_start = true;
                continue;
            }
            Some(_) => continue,
            None if token_start && is_quote(c) => quote = Some(c),
            None if c == '#' => return value[..pos].trim_end(),
            None => {}
        }
        token_start = SEPARATORS.contains(&c);
    }
    value
}

/// Tokenizes a value into arguments separated by spaces or tabs.
///
/// A token starting with a quote runs to the matching quote, and keeps both
/// quotes so that later stages can tell quoted text from symbolic names. An
/// unterminated quote runs to the end of the input.
///
/// # Returns
/// `None` when the value has more than [`SIZEOF_ARG`] arguments.
pub fn argv_from_string(value: &str) -> Option<Vec<String>> {
    let mut argv = Vec::new();
    let mut rest = value.trim_start_matches(SEPARATORS);

    while let Some(first) = rest.chars().next() {
        if argv.len() == SIZEOF_ARG {
            return None;
        }

        let len = if is_quote(first) {
            rest[1..].find(first).map_or(rest.len(), |end| end + 2)
        } else {
            rest.find(SEPARATORS).unwrap_or(rest.len())
        };

        argv.push(rest[..len].to_string());
        rest = rest[len..].trim_start_matches(SEPARATORS);
    }

    Some(argv)
}
