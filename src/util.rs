use std::borrow::Cow;

/// Shortens `label` to at most `max_chars` characters, ending in `…`.
pub fn truncate_label(label: &str, max_chars: usize) -> Cow<'_, str> {
    if label.chars().count() <= max_chars {
        return Cow::Borrowed(label);
    }

    let kept = label
        .chars()
        .take(max_chars.saturating_sub(1))
        .collect::<String>();
    Cow::Owned(format!("{kept}…"))
}

/// Joins a root-to-node path, eliding the middle of long paths.
pub fn elide_path<'a>(steps: impl IntoIterator<Item = &'a str>, head: usize, tail: usize) -> String {
    let steps = steps.into_iter().collect::<Vec<_>>();
    if steps.len() <= head + tail {
        return steps.join(" -> ");
    }

    let head_text = steps[..head].join(" -> ");
    let tail_text = steps[steps.len() - tail..].join(" -> ");
    format!("{head_text} -> ... -> {tail_text}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_labels_are_borrowed() {
        assert!(matches!(truncate_label("Alpha", 8), Cow::Borrowed("Alpha")));
        assert_eq!(truncate_label("Grandchild 1", 6), "Grand…");
    }

    #[test]
    fn long_paths_keep_both_ends() {
        let steps = ["a", "b", "c", "d", "e", "f"];
        assert_eq!(elide_path(steps, 2, 2), "a -> b -> ... -> e -> f");
        assert_eq!(elide_path(steps[..3].iter().copied(), 2, 2), "a -> b -> c");
    }
}
