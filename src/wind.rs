//! Winding Direction (NAVIN)
//!
//! Each 90° rotation of the master label moves to the next code in
//! [`NAVIN_ROTATION`].

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wind {
    A1,
    A2,
    A3,
    A4,
}

/// Codes in the order a clockwise rotation walks through them
pub const NAVIN_ROTATION: [Wind; 4] = [Wind::A2, Wind::A4, Wind::A1, Wind::A3];

/// Codes in icon order
pub const ALL: [Wind; 4] = [Wind::A1, Wind::A2, Wind::A3, Wind::A4];

impl Wind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Wind::A1 => "A1",
            Wind::A2 => "A2",
            Wind::A3 => "A3",
            Wind::A4 => "A4",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "A1" => Some(Wind::A1),
            "A2" => Some(Wind::A2),
            "A3" => Some(Wind::A3),
            "A4" => Some(Wind::A4),
            _ => None,
        }
    }

    pub fn icon(&self) -> String {
        format!("/images/{}.png", self.as_str())
    }

    /// Position in [`NAVIN_ROTATION`]
    pub fn rotation_index(&self) -> usize {
        NAVIN_ROTATION.iter().position(|w| w == self).unwrap_or(0)
    }
}

impl fmt::Display for Wind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn wind_at(index: usize) -> Wind {
    NAVIN_ROTATION[index % NAVIN_ROTATION.len()]
}

/// Index after one more 90° rotation
pub fn next_index(index: usize) -> usize {
    (index + 1) % NAVIN_ROTATION.len()
}

/// Index for a stored code; unknown codes restart the sequence
pub fn index_for_code(code: Option<&str>) -> usize {
    code.and_then(Wind::parse).map(|w| w.rotation_index()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_cycle() {
        let mut idx = 0;
        let mut seen = Vec::new();
        for _ in 0..5 {
            seen.push(wind_at(idx).as_str());
            idx = next_index(idx);
        }
        assert_eq!(seen, vec!["A2", "A4", "A1", "A3", "A2"]);
    }

    #[test]
    fn test_index_for_code() {
        assert_eq!(index_for_code(Some("A1")), 2);
        assert_eq!(index_for_code(Some("a3")), 3);
        assert_eq!(index_for_code(Some("B9")), 0);
        assert_eq!(index_for_code(None), 0);
    }

    #[test]
    fn test_icon_path() {
        assert_eq!(Wind::A4.icon(), "/images/A4.png");
    }
}
