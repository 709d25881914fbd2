use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;
use tracing::debug;

use crate::models::Volume;

/// Highest `volNNN.html` in `site_dir` plus one, or
/// [`Volume::FIRST_GENERATED`] when none exist.
pub fn next_volume(site_dir: &Path) -> Result<Volume> {
    let re = Regex::new(r"^vol(\d+)\.html$").context("volume file pattern")?;
    let entries = match std::fs::read_dir(site_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Volume::FIRST_GENERATED),
        Err(e) => return Err(e).with_context(|| format!("listing {}", site_dir.display())),
    };

    let mut highest: Option<u32> = None;
    for entry in entries {
        let name = entry?.file_name();
        let Some(name) = name.to_str() else { continue };
        if let Some(n) = re
            .captures(name)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
        {
            highest = Some(highest.map_or(n, |h| h.max(n)));
        }
    }

    let next = match highest {
        Some(h) => h
            .checked_add(1)
            .map(Volume)
            .with_context(|| format!("volume numbers exhausted in {} (highest vol{h})", site_dir.display()))?,
        None => Volume::FIRST_GENERATED,
    };
    debug!("Volume assigned - highest_existing={:?}, next={}", highest, next);
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[], 2)]
    #[case(&["vol001.html"], 2)]
    #[case(&["vol001.html", "vol002.html", "vol005.html"], 6)]
    #[case(&["vol009.html", "vol010.html"], 11)]
    #[case(&["vol1000.html", "vol999.html"], 1001)]
    #[case(&["index.html", "vol002.html.bak", "volume.html", "vol3.htm"], 2)]
    fn assigns_next_number(#[case] files: &[&str], #[case] expected: u32) {
        let tmp = tempfile::tempdir().expect("tmp dir");
        for f in files {
            std::fs::write(tmp.path().join(f), "").unwrap();
        }
        assert_eq!(next_volume(tmp.path()).unwrap(), Volume(expected));
    }

    #[test]
    fn exhausted_volume_numbers_are_an_error() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        std::fs::write(tmp.path().join(format!("vol{}.html", u32::MAX)), "").unwrap();
        let err = next_volume(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("volume numbers exhausted"));
    }

    #[test]
    fn missing_site_dir_starts_at_two() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        assert_eq!(next_volume(&tmp.path().join("nope")).unwrap(), Volume(2));
    }
}
