use crate::utils::allocation_failure;

/// Characters that separate tokens: space, tab, carriage return, newline, bell.
pub const DELIMITERS: [char; 5] = [' ', '\t', '\r', '\n', '\x07'];

const INITIAL_TOKENS: usize = 64;

/// Splits a line into its non-empty whitespace-delimited fields.
///
/// The tokens borrow from `line`, so they cannot outlive it. Runs of delimiters
/// collapse; a line made only of delimiters yields no tokens.
pub fn split_line (line: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = Vec::new();

    for token in line.split(DELIMITERS).filter(|token| !token.is_empty()) {
        if tokens.len() == tokens.capacity() {
            let additional = tokens.capacity().max(INITIAL_TOKENS);
            if tokens.try_reserve_exact(additional).is_err() {
                allocation_failure();
            }
        }

        tokens.push(token);
    }

    tokens
}
