use std::path::Path;

/// Turns one line of a class list into the short label the classifier reports.
///
/// Accepts plain names (`tiger`), WordNet-prefixed synsets
/// (`n02129604 tiger, Panthera tigris`) and multi-word names, which are
/// joined with underscores (`snow leopard` -> `snow_leopard`).
fn normalize_label(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let line = match line.split_once(char::is_whitespace) {
        Some((head, rest)) if is_wordnet_id(head) => rest.trim(),
        _ => line,
    };

    let name = line.split(',').next().unwrap_or(line).trim();

    Some(name.split_whitespace().collect::<Vec<_>>().join("_"))
}

fn is_wordnet_id(token: &str) -> bool {
    token.len() == 9
        && token.starts_with('n')
        && token[1..].chars().all(|c| c.is_ascii_digit())
}

pub fn parse_labels(text: &str) -> Vec<String> {
    text.lines().filter_map(normalize_label).collect()
}

pub fn load_labels(path: &Path) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read labels {}: {}", path.display(), e))?;

    let labels = parse_labels(&text);
    if labels.is_empty() {
        return Err(format!("labels file {} is empty", path.display()).into());
    }

    Ok(labels)
}
