//! License fingerprinting over the leading comment block.
//!
//! The block is flattened to one lowercase, single-spaced string and tested
//! against a fixed catalog of license-body patterns. The caller decides what
//! zero, one, or many matches mean; this module only collects candidates.

use regex::Regex;
use std::sync::LazyLock;

use crate::classify;

pub struct License {
    pub name: &'static str,
    /// Markdown badge linking to the canonical license text.
    pub badge: &'static str,
    pattern: Regex,
}

/// Catalog of recognizable license bodies. Patterns run against normalized
/// text and carry wildcards where holder and program names vary.
static CATALOG: LazyLock<Vec<License>> = LazyLock::new(|| {
    let entry = |name, badge, pattern: &str| License {
        name,
        badge,
        pattern: Regex::new(pattern).unwrap(),
    };
    vec![
        entry(
            "MIT",
            "[![License MIT](https://img.shields.io/badge/license-MIT-green.svg)](https://opensource.org/licenses/MIT)",
            r#"permission is hereby granted, free of charge, to any person obtaining a copy of this software and associated documentation files"#,
        ),
        entry(
            "GPL-2.0",
            "[![License GPL 2](https://img.shields.io/badge/license-GPL_2-green.svg)](https://www.gnu.org/licenses/old-licenses/gpl-2.0.txt)",
            r"is free software[:;,]? you can redistribute it and/or modify it under the terms of the gnu general public license as published by the free software foundation[,;]? (?:either )?version 2",
        ),
        entry(
            "GPL-3.0",
            "[![License GPL 3](https://img.shields.io/badge/license-GPL_3-green.svg)](https://www.gnu.org/licenses/gpl-3.0.txt)",
            r"is free software[:;,]? you can redistribute it and/or modify it under the terms of the gnu general public license as published by the free software foundation[,;]? (?:either )?version 3",
        ),
        entry(
            "BSD-3-Clause",
            "[![License BSD 3](https://img.shields.io/badge/license-BSD_3-green.svg)](https://opensource.org/licenses/BSD-3-Clause)",
            r"redistribution and use in source and binary forms, with or without modification, are permitted provided that the following conditions are met.{1,2000}?neither the name of .{1,200}? nor the names of",
        ),
        entry(
            "Apache-2.0",
            "[![License Apache 2](https://img.shields.io/badge/license-Apache_2-green.svg)](https://www.apache.org/licenses/LICENSE-2.0)",
            r"licensed under the apache license, version 2\.0",
        ),
    ]
});

/// Flatten a comment block: comment markers stripped per line, whitespace
/// runs (including newlines) collapsed to single spaces, lowercased.
pub fn normalize(block: &str) -> String {
    let stripped: Vec<String> = block
        .lines()
        .map(classify::strip_comment_prefix)
        .collect();
    stripped
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// All catalog entries whose pattern matches the block.
pub fn detect(block: &str) -> Vec<&'static License> {
    let text = normalize(block);
    CATALOG.iter().filter(|l| l.pattern.is_match(&text)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(block: &str) -> Vec<&'static str> {
        detect(block).into_iter().map(|l| l.name).collect()
    }

    const MIT_BLOCK: &str = "\
;; Copyright (C) 2025 Jane Developer
;;
;; Permission is hereby granted, free of charge, to any person obtaining
;; a copy of this software and associated documentation files (the
;; \"Software\"), to deal in the Software without restriction.
";

    const GPL3_BLOCK: &str = "\
;; This program is free software: you can redistribute it and/or modify
;; it under the terms of the GNU General Public License as published by
;; the Free Software Foundation, either version 3 of the License, or
;; (at your option) any later version.
";

    const GPL2_BLOCK: &str = "\
;; This file is free software; you can redistribute it and/or modify
;; it under the terms of the GNU General Public License as published by
;; the Free Software Foundation; either version 2, or (at your option)
;; any later version.
";

    #[test]
    fn normalize_strips_markers_and_collapses() {
        let block = ";; Hello   World\n;;\n;;;   AGAIN\n";
        assert_eq!(normalize(block), "hello world again");
    }

    #[test]
    fn mit_matches_uniquely() {
        assert_eq!(names(MIT_BLOCK), vec!["MIT"]);
    }

    #[test]
    fn gpl3_matches_uniquely() {
        assert_eq!(names(GPL3_BLOCK), vec!["GPL-3.0"]);
    }

    #[test]
    fn gpl2_matches_uniquely() {
        assert_eq!(names(GPL2_BLOCK), vec!["GPL-2.0"]);
    }

    #[test]
    fn apache_matches() {
        let block = ";; Licensed under the Apache License, Version 2.0 (the \"License\");\n";
        assert_eq!(names(block), vec!["Apache-2.0"]);
    }

    #[test]
    fn bsd_three_clause_matches() {
        let block = "\
;; Redistribution and use in source and binary forms, with or without
;; modification, are permitted provided that the following conditions
;; are met:
;; 1. Redistributions of source code must retain the above copyright notice.
;; 2. Redistributions in binary form must reproduce the above copyright notice.
;; 3. Neither the name of the copyright holder nor the names of its
;;    contributors may be used to endorse or promote products derived
;;    from this software without specific prior written permission.
";
        assert_eq!(names(block), vec!["BSD-3-Clause"]);
    }

    #[test]
    fn unknown_text_matches_nothing() {
        assert!(names(";; All rights reserved, ask before copying.\n").is_empty());
    }

    #[test]
    fn combined_texts_match_both() {
        let block = format!(
            "{MIT_BLOCK};; Licensed under the Apache License, Version 2.0 (the \"License\");\n"
        );
        assert_eq!(names(&block), vec!["MIT", "Apache-2.0"]);
    }

    #[test]
    fn badge_templates_are_markdown_links() {
        for lic in CATALOG.iter() {
            assert!(lic.badge.starts_with("[!["), "{}", lic.name);
            assert!(lic.badge.contains("img.shields.io"), "{}", lic.name);
        }
    }
}
