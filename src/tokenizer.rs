//! Search string conversion for the `/search?q=` endpoint

/// Convert free-text search input into the query form the search server expects.
///
/// Each space outside a double-quoted span becomes `+`, one per space. Quote
/// characters are copied through and toggle the quoted state; an unmatched
/// quote keeps the rest of the input quoted.
pub fn convert_search_string(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut in_quotes = false;

    for c in input.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                output.push(c);
            }
            ' ' if !in_quotes => output.push('+'),
            _ => output.push(c),
        }
    }

    output
}
