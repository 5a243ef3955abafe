use std::collections::BTreeMap;

use crate::tree::ObjectSet;

/// Format an object set as one line per resource, grouped by location.
///
/// Lines look like `/tenant/app ltm/virtual/web_vs`; the canonical folder
/// renders as `/tenant`.
pub fn format_text(set: &ObjectSet) -> String {
    let mut out = Vec::new();
    for located in set.iter() {
        out.push(format!(
            "{} {}",
            location(located.partition, located.folder),
            located.path
        ));
    }
    out.join("\n")
}

/// Format per-namespace counts, e.g. `total=5 ltm/pool=1 ltm/virtual=2 ...`.
pub fn format_summary(set: &ObjectSet) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut total = 0usize;
    for located in set.iter() {
        *counts.entry(located.path.namespace()).or_default() += 1;
        total += 1;
    }

    let mut parts = vec![
        format!("total={total}"),
        format!("partitions={}", set.partitions.len()),
    ];
    parts.extend(counts.iter().map(|(ns, n)| format!("{ns}={n}")));
    parts.join(" ")
}

fn location(partition: &str, folder: &str) -> String {
    if folder.is_empty() {
        format!("/{partition}")
    } else {
        format!("/{partition}/{folder}")
    }
}
