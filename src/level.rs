//! Level catalog and level metadata.
//!
//! A level source is a Rhai script whose first line is a `//` comment holding
//! a JSON object, e.g. `// {"editable": [[3, 5]]}`. Editable ranges are
//! inclusive and count 1-based lines of the body that follows the header.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::error::{GameError, GameResult};

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct LevelMetadata {
    #[serde(default)]
    pub editable: Vec<[usize; 2]>,
    #[serde(default)]
    pub name: Option<String>,
}

impl LevelMetadata {
    /// 0-based body line indices the player may change.
    pub fn editable_lines(&self) -> GameResult<BTreeSet<usize>> {
        let mut out = BTreeSet::new();
        for &[first, last] in &self.editable {
            if first == 0 || first > last {
                return Err(GameError::InvalidRange { first, last });
            }
            out.extend((first..=last).map(|line| line - 1));
        }
        Ok(out)
    }
}

/// Split a level source into its parsed header and the remaining body.
pub fn split_header(source: &str) -> GameResult<(LevelMetadata, &str)> {
    let (header, body) = source.split_once('\n').unwrap_or((source, ""));
    let json = header.trim_end_matches('\r').strip_prefix("//").ok_or(GameError::MissingHeader)?;
    let metadata: LevelMetadata = serde_json::from_str(json.trim())?;
    Ok((metadata, body))
}

pub struct LevelFile {
    pub file_name: &'static str,
    pub source: &'static str,
}

static LEVELS: [LevelFile; 4] = [
    LevelFile { file_name: "blocks.rhai", source: include_str!("../levels/blocks.rhai") },
    LevelFile { file_name: "level_two.rhai", source: include_str!("../levels/level_two.rhai") },
    LevelFile { file_name: "multiplicity.rhai", source: include_str!("../levels/multiplicity.rhai") },
    LevelFile { file_name: "traps.rhai", source: include_str!("../levels/traps.rhai") },
];

/// Served for every level number past the end of the catalog.
static DUMMY_LEVEL: LevelFile =
    LevelFile { file_name: "dummy_level.rhai", source: include_str!("../levels/dummy_level.rhai") };

pub fn levels() -> &'static [LevelFile] {
    &LEVELS
}

/// Level `number` (0-based), or the dummy level once the catalog runs out.
pub fn level(number: usize) -> &'static LevelFile {
    LEVELS.get(number).unwrap_or(&DUMMY_LEVEL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_parses_ranges_and_name() {
        let (meta, body) = split_header("// {\"editable\": [[1, 2], [5, 5]], \"name\": \"x\"}\nbody").unwrap();
        assert_eq!(body, "body");
        assert_eq!(meta.name.as_deref(), Some("x"));
        let lines: Vec<usize> = meta.editable_lines().unwrap().into_iter().collect();
        assert_eq!(lines, vec![0, 1, 4]);
    }

    #[test]
    fn header_must_be_a_comment() {
        assert!(matches!(split_header("{\"editable\": []}\n"), Err(GameError::MissingHeader)));
        assert!(matches!(split_header("// not json\n"), Err(GameError::Metadata(_))));
    }

    #[test]
    fn inverted_or_zero_ranges_are_rejected() {
        let meta = LevelMetadata { editable: vec![[4, 2]], name: None };
        assert!(matches!(meta.editable_lines(), Err(GameError::InvalidRange { first: 4, last: 2 })));
        let meta = LevelMetadata { editable: vec![[0, 2]], name: None };
        assert!(meta.editable_lines().is_err());
    }

    #[test]
    fn levels_past_the_catalog_fall_back_to_dummy() {
        assert_eq!(level(0).file_name, "blocks.rhai");
        assert_eq!(level(3).file_name, "traps.rhai");
        assert_eq!(level(4).file_name, "dummy_level.rhai");
        assert_eq!(level(99).file_name, "dummy_level.rhai");
    }
}
