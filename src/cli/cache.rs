use std::{fs, io};

use tabled::Table;

use crate::{info, management, success, types::CacheTableRow, warning};

/// Prints a table of every cache entry on disk, per namespace and user,
/// with the time since it was last written.
pub async fn cache_stats() {
    let root = management::data_root();
    let mut rows: Vec<CacheTableRow> = Vec::new();

    for namespace in management::CACHE_NAMESPACES {
        let entries = match fs::read_dir(root.join(namespace)) {
            Ok(entries) => entries,
            Err(_) => continue,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let user = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("?")
                .to_string();
            let age = entry
                .metadata()
                .ok()
                .and_then(|meta| meta.modified().ok())
                .and_then(|modified| modified.elapsed().ok())
                .map(|elapsed| format!("{}m", elapsed.as_secs() / 60))
                .unwrap_or_else(|| "?".to_string());

            rows.push(CacheTableRow {
                namespace: namespace.to_string(),
                user,
                age,
            });
        }
    }

    if rows.is_empty() {
        info!("No cache entries found.");
        return;
    }

    let table = Table::new(rows);
    println!("{}", table);
}

/// Removes cache entries, either for a single user or wholesale.
pub async fn cache_clear(user: Option<String>) {
    let root = management::data_root();

    match user {
        Some(user) => {
            for namespace in management::CACHE_NAMESPACES {
                let path = root.join(namespace).join(format!("{user}.json"));
                match fs::remove_file(&path) {
                    Ok(()) => success!("Removed {}/{}.", namespace, user),
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => warning!("Cannot remove {}/{}: {}", namespace, user, e),
                }
            }
        }
        None => {
            for namespace in management::CACHE_NAMESPACES {
                let dir = root.join(namespace);
                if !dir.is_dir() {
                    continue;
                }
                match fs::remove_dir_all(&dir) {
                    Ok(()) => success!("Cleared {}.", namespace),
                    Err(e) => warning!("Cannot clear {}: {}", namespace, e),
                }
            }
        }
    }
}
