// SPDX-FileCopyrightText: © 2024 Hugues Bruant <hugues.bruant@gmail.com>

//! Detects whether a resolved path lives under a `site-packages` directory,
//! i.e. a third-party dependency installed into a virtualenv or the host
//! interpreter, rather than project-local code. There is no live
//! interpreter to ask (per the purely-syntactic, no-execution contract),
//! so this walks the path's own ancestry instead — grounded in the
//! `lib/pythonX.Y/site-packages` and `Lib/site-packages` layouts scanned by
//! `tinovyatkin-serpen`/cribo's `resolver.rs`.

use std::path::{Component, Path};

pub fn is_under_site_packages(path: &Path) -> bool {
    let mut components: Vec<&str> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect();
    components.reverse();

    for (i, part) in components.iter().enumerate() {
        if *part != "site-packages" {
            continue;
        }
        // Unix-style: .../lib/pythonX.Y/site-packages/pkg/...
        // Windows-style: .../Lib/site-packages/pkg/...
        let under_versioned_lib = components
            .get(i + 1)
            .map(|p| p.starts_with("python"))
            .unwrap_or(false)
            && components
                .get(i + 2)
                .map(|p| p.eq_ignore_ascii_case("lib"))
                .unwrap_or(false);
        let under_plain_lib = components
            .get(i + 1)
            .map(|p| p.eq_ignore_ascii_case("lib"))
            .unwrap_or(false);
        if under_versioned_lib || under_plain_lib {
            return true;
        }
    }
    false
}
