//! Line-level parsing of VTF structure + trajectory files.
//!
//! A file starts with a structure block of `atom` declarations and is followed by
//! frames, each introduced by a `timestep` line and holding one `<id> <x> <y> <z>`
//! record per line.

use crate::error::{AnalysisError, Result};
use crate::structure::{Coordinate, FramePositions, ParticleRole, RoleMap};

/// Prefix of the line that opens every frame
pub const FRAME_MARKER: &str = "timestep";

/// Prefix of a particle declaration in the structure block
pub const ATOM_KEYWORD: &str = "atom";

/// Half-open range of line indices holding one frame's records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRange {
    pub start: usize,
    pub end: usize,
}

impl FrameRange {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build the identifier -> role mapping from the declarations preceding the first frame.
pub fn parse_role_map<'a, I>(lines: I) -> Result<RoleMap>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut roles = Vec::new();

    for (idx, line) in lines.into_iter().enumerate() {
        if line.starts_with(FRAME_MARKER) {
            break;
        }
        if !line.starts_with(ATOM_KEYWORD) {
            continue;
        }

        let line_number = idx + 1;
        let malformed = |reason: String| AnalysisError::MalformedHeader {
            line: line_number,
            reason,
        };

        let parts: Vec<&str> = line.split_whitespace().collect();
        let id_token = parts
            .get(1)
            .ok_or_else(|| malformed("missing particle identifier".to_string()))?;
        let id = id_token
            .parse::<usize>()
            .map_err(|e| malformed(format!("invalid identifier '{}': {}", id_token, e)))?;

        let name_idx = parts
            .iter()
            .position(|p| *p == "name")
            .ok_or_else(|| malformed("missing 'name' attribute".to_string()))?;
        let code_token = parts
            .get(name_idx + 1)
            .ok_or_else(|| malformed("missing value for 'name'".to_string()))?;
        let code = code_token
            .parse::<i64>()
            .map_err(|e| malformed(format!("invalid role code '{}': {}", code_token, e)))?;

        roles.push((id, ParticleRole::from_code(code)));
    }

    Ok(roles.into_iter().collect())
}

/// Locate every frame marker and return the line range of each frame, in file order.
///
/// The last frame extends to the end of the file.
pub fn index_frames(lines: &[&str]) -> Vec<FrameRange> {
    let markers: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.starts_with(FRAME_MARKER))
        .map(|(idx, _)| idx)
        .collect();

    markers
        .iter()
        .enumerate()
        .map(|(k, &marker)| FrameRange {
            start: marker + 1,
            end: markers.get(k + 1).copied().unwrap_or(lines.len()),
        })
        .collect()
}

/// Collect the positions of one frame.
///
/// Lines with fewer than four tokens are metadata and skipped; records whose identifier
/// is not accepted by `roles` are ignored.
pub fn frame_positions(lines: &[&str], range: FrameRange, roles: &RoleMap) -> Result<FramePositions> {
    let mut positions = FramePositions::new();
    let end = range.end.min(lines.len());
    if range.start >= end {
        return Ok(positions);
    }

    for (offset, line) in lines[range.start..end].iter().enumerate() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 4 {
            continue;
        }

        let line_number = range.start + offset + 1;
        let parse_err = |reason: String| AnalysisError::Parse {
            line: line_number,
            reason,
        };

        let id = parts[0]
            .parse::<usize>()
            .map_err(|e| parse_err(format!("invalid identifier '{}': {}", parts[0], e)))?;
        if !roles.accepts(id) {
            continue;
        }

        let mut xyz = [0.0f64; 3];
        for (axis, token) in xyz.iter_mut().zip(&parts[1..4]) {
            *axis = token
                .parse::<f64>()
                .map_err(|e| parse_err(format!("invalid coordinate '{}': {}", token, e)))?;
        }

        positions.insert(id, Coordinate::new(xyz[0], xyz[1], xyz[2]));
    }

    Ok(positions)
}
