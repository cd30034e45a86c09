use std::fs;
use std::path::{Path, PathBuf};

fn collect_rs_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        if let Ok(read_dir) = fs::read_dir(&dir) {
            for entry in read_dir.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    stack.push(path);
                } else if path.extension().map(|e| e == "rs").unwrap_or(false) {
                    files.push(path);
                }
            }
        }
    }
    files
}

fn file_contains(path: &Path, needle: &str) -> bool {
    fs::read_to_string(path)
        .map(|c| c.contains(needle))
        .unwrap_or(false)
}

#[test]
fn follow_edges_are_addressed_only_by_graph_service() {
    // workspace root = backend
    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let backend_root = manifest
        .parent()
        .expect("graph-service has a parent dir")
        .to_path_buf();

    let allowed = ["backend/graph-service/src/domain/edge.rs"];

    let mut offenders = Vec::new();
    for file in collect_rs_files(&backend_root) {
        let path_str = file.to_string_lossy();
        if allowed.iter().any(|a| path_str.ends_with(a)) || path_str.ends_with("follow_boundary.rs")
        {
            continue;
        }
        if path_str.contains("/target/") {
            continue; // ignore generated code
        }
        if file_contains(&file, "users/{}/followers") || file_contains(&file, "users/{}/following")
        {
            offenders.push(path_str.to_string());
        }
    }

    if !offenders.is_empty() {
        panic!(
            "Follow edge paths must only be built by graph-service. Offenders: {:?}",
            offenders
        );
    }
}
