// ABOUTME: Checks that every Rust source file in the workspace carries the project header
// ABOUTME: Walks src, crates, tests and benches and inspects the leading comment block
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::fs;
use std::path::{Path, PathBuf};

const LICENSE_LINE: &str = "// SPDX-License-Identifier: MIT OR Apache-2.0";
const COPYRIGHT_LINE: &str = "// Copyright (c) 2025 CardioKinetic Contributors";

fn rust_files(dir: &Path, found: &mut Vec<PathBuf>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            rust_files(&path, found);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            found.push(path);
        }
    }
}

#[test]
fn test_every_source_file_names_the_project_copyright() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut files = Vec::new();
    for dir in ["src", "crates", "tests", "benches"] {
        rust_files(&root.join(dir), &mut files);
    }
    assert!(files.len() > 30, "expected the whole workspace, found {}", files.len());

    for file in files {
        let source = fs::read_to_string(&file).unwrap();
        let header: Vec<&str> = source.lines().take(6).collect();
        assert!(header[0].starts_with("// ABOUTME:"), "{} lacks ABOUTME", file.display());
        assert!(header.contains(&LICENSE_LINE), "{} lacks the license", file.display());
        assert!(
            header.contains(&COPYRIGHT_LINE),
            "{} lacks the project copyright",
            file.display()
        );
    }
}
