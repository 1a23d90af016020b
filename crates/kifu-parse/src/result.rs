use kifu_tree::GameResult;

/// Splits `RE` into its outcome and the bracketed comment after it.
pub(crate) fn split_result(text: &str) -> (String, String) {
    let open = [text.find('('), text.find('{')].into_iter().flatten().filter(|&at| at > 0).min();
    let (value, comment) = match open {
        Some(at) => (text[..at].trim_end(), &text[at..]),
        None => (text, ""),
    };
    if value != "Left unfinished" {
        return (value.to_owned(), comment.to_owned());
    }
    let comment = match comment.chars().next() {
        None => "(Left unfinished)".to_owned(),
        Some(bracket @ ('(' | '{')) => format!("{bracket}Left unfinished. {}", &comment[1..]),
        Some(_) => format!("(Left unfinished) {comment}"),
    };
    ("Void".to_owned(), comment)
}

/// Takes the first number out of a result comment, leaving `%` in its place.
/// Returns the remaining text, the number, the opening bracket and whether
/// the comment was closed by the matching bracket.
pub(crate) fn take_out_number(comment: &str) -> (String, Option<u32>, Option<char>, bool) {
    let (separator, inner, both) = match comment.chars().next() {
        Some(open @ ('(' | '{')) => {
            let close = if open == '(' { ')' } else { '}' };
            match comment[1..].strip_suffix(close) {
                Some(inner) => (Some(open), inner, true),
                None => (Some(open), &comment[1..], false),
            }
        }
        _ => (None, comment, false),
    };

    let Some(start) = inner.find(|c: char| c.is_ascii_digit()) else {
        return (inner.to_owned(), None, separator, both);
    };
    let len = inner[start..].find(|c: char| !c.is_ascii_digit()).unwrap_or(inner.len() - start);
    let number = inner[start..start + len].parse().ok();
    let base = format!("{}%{}", &inner[..start], &inner[start + len..]);
    (base, number, separator, both)
}

pub(crate) fn game_result(text: &str) -> GameResult {
    let (value, comment) = split_result(text);
    let (comment, number, separator, both_brackets) = take_out_number(&comment);
    GameResult { value, comment, number, separator, both_brackets }
}
