//! Common utilities for benchmarks

use std::fs;

use camino::Utf8Path;
use criterion::Criterion;

use clyde_config::{Manifest, Package};
use clyde_core::types::Version;
use clyde_resolver::DependencyResolver;

/// Configure criterion for the suite
pub fn criterion_config() -> Criterion {
    Criterion::default()
        .warm_up_time(std::time::Duration::from_secs(3))
        .measurement_time(std::time::Duration::from_secs(10))
        .sample_size(100)
}

/// `count` release versions spread over a few majors, plus some prereleases
pub fn candidate_versions(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let (major, minor, patch) = (i / 100, (i / 10) % 10, i % 10);
            if i % 7 == 0 {
                format!("{}.{}.{}-rc.{}", major, minor, patch, i % 3)
            } else {
                format!("{}.{}.{}", major, minor, patch)
            }
        })
        .collect()
}

fn virtual_package(name: &str) -> Package {
    Package::new(format!("/virtual/{}", name), Manifest::new(name, Version::new(1, 0, 0))).unwrap()
}

/// In-memory graph of `layers` layers with `width` packages each; every
/// package depends on every package of the next layer.
pub fn layered_resolver(layers: usize, width: usize) -> DependencyResolver {
    let name = |layer: usize, i: usize| format!("pkg-{}-{}", layer, i);
    let mut resolver = DependencyResolver::new();

    for layer in 0..layers {
        for i in 0..width {
            resolver.insert(name(layer, i), virtual_package(&name(layer, i)));
        }
    }

    for layer in 1..layers {
        for from in 0..width {
            for to in 0..width {
                resolver.link(&name(layer - 1, from), &name(layer, to)).unwrap();
            }
        }
    }

    resolver
}

/// On-disk project whose root requires a chain of `depth` packages in deps/
pub fn write_chain_project(root: &Utf8Path, depth: usize) -> std::io::Result<()> {
    let manifest = |name: &str, next: Option<String>| {
        let mut body = format!("[package]\nname = \"{}\"\nversion = \"1.0.0\"\n\n[requires]\n", name);
        if let Some(next) = next {
            body.push_str(&format!("\"{}\" = \"^1.0.0\"\n", next));
        }
        body
    };
    let dep = |i: usize| format!("@bench/lib{}", i);

    fs::create_dir_all(root)?;
    fs::write(root.join("clyde.toml"), manifest("app", (depth > 0).then(|| dep(0))))?;

    for i in 0..depth {
        let dir = root.join("deps").join("@bench").join(format!("lib{}", i));
        fs::create_dir_all(&dir)?;
        let next = (i + 1 < depth).then(|| dep(i + 1));
        fs::write(dir.join("clyde.toml"), manifest(&dep(i), next))?;
    }

    Ok(())
}
