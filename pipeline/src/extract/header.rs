use hashbrown::{HashMap, HashSet};

/// Normalizes raw header cells into unique column names.
///
/// Embedded newlines become spaces and the result is trimmed. Missing or blank
/// cells are named `Unnamed: {index}`. Repeats of a name get `_1`, `_2`, ...
/// suffixes in order of appearance, skipping any suffixed name already taken.
pub fn normalize_header(cells: &[Option<String>]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::with_capacity(cells.len());
    let mut repeats: HashMap<String, usize> = HashMap::new();

    cells
        .iter()
        .enumerate()
        .map(|(index, cell)| {
            let base = match cell.as_deref().map(clean_header_cell) {
                Some(name) if !name.is_empty() => name,
                _ => format!("Unnamed: {index}"),
            };

            let mut name = base.clone();
            if used.contains(&name) {
                let count = repeats.entry_ref(base.as_str()).or_insert(0);
                loop {
                    *count += 1;
                    name = format!("{base}_{count}");
                    if !used.contains(&name) {
                        break;
                    }
                }
            }

            used.insert(name.clone());
            name
        })
        .collect()
}

fn clean_header_cell(cell: &str) -> String {
    cell.replace(['\r', '\n'], " ").trim().to_string()
}
