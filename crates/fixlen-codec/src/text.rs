//! Character-counted string helpers.

/// Split `text` after its first `count` characters.
///
/// Returns the whole string and an empty remainder when `text` has fewer
/// than `count` characters.
pub(crate) fn split_at_chars(text: &str, count: usize) -> (&str, &str) {
    let at = text
        .char_indices()
        .nth(count)
        .map_or(text.len(), |(index, _)| index);
    text.split_at(at)
}

/// Write `token` into `out` as exactly `width` characters.
///
/// Longer tokens keep their first `width` characters; shorter ones are
/// followed by `pad`.
pub(crate) fn push_fixed(out: &mut String, token: &str, width: usize, pad: char) {
    let (head, _) = split_at_chars(token, width);
    out.push_str(head);
    let used = head.chars().count();
    out.extend(std::iter::repeat_n(pad, width - used));
}
