//! Rendering of resolutions for the terminal.

use std::collections::BTreeMap;

use mdu_schema::Resolution;

/// The URL alone, or the whole resolution as JSON.
pub fn single(resolution: &Resolution, json: bool) -> serde_json::Result<String> {
    if json {
        serde_json::to_string_pretty(resolution)
    } else {
        Ok(resolution.url.clone())
    }
}

/// One `version<TAB>url` line per query, in key order, or a JSON object.
pub fn batch(results: &BTreeMap<String, Resolution>, json: bool) -> serde_json::Result<String> {
    if json {
        return serde_json::to_string_pretty(results);
    }
    Ok(results
        .iter()
        .map(|(version, resolution)| format!("{version}\t{}", resolution.url))
        .collect::<Vec<_>>()
        .join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdu_schema::{Arch, Bits, Extension, Platform, ResolvedOptions, VersionQuery};

    fn resolution(version: &str) -> Resolution {
        Resolution {
            name: "mongodb".to_string(),
            version: version.to_string(),
            artifact: format!("mongodb-osx-x86_64-{version}.tgz"),
            url: format!("http://fastdl.mongodb.org/osx/mongodb-osx-x86_64-{version}.tgz"),
            options: ResolvedOptions {
                version: VersionQuery::from(version),
                platform: Platform::Osx,
                arch: Arch::X86_64,
                bits: Bits::B64,
                distro: String::new(),
                branch: "master".to_string(),
                debug: false,
                enterprise: false,
                ext: Extension::Tgz,
            },
        }
    }

    #[test]
    fn test_single_prints_url() {
        let r = resolution("3.1.6");
        assert_eq!(
            single(&r, false).unwrap(),
            "http://fastdl.mongodb.org/osx/mongodb-osx-x86_64-3.1.6.tgz"
        );
        let json: serde_json::Value = serde_json::from_str(&single(&r, true).unwrap()).unwrap();
        assert_eq!(json["artifact"], "mongodb-osx-x86_64-3.1.6.tgz");
        assert_eq!(json["options"]["platform"], "osx");
    }

    #[test]
    fn test_batch_lines_in_key_order() {
        let mut results = BTreeMap::new();
        results.insert("stable".to_string(), resolution("3.2.1"));
        results.insert("latest".to_string(), resolution("3.3.1"));
        let text = batch(&results, false).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("latest\t"));
        assert!(lines[1].starts_with("stable\thttp://"));
        assert!(!text.ends_with('\n'));
        assert_eq!(batch(&BTreeMap::new(), false).unwrap(), "");
    }
}
