// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Record-shaped specification I/O
//!
//! Opening specifications travel between the embedding application and
//! the solver as plain records; unspecified optional fields take their
//! documented defaults on the way in.

use fenestra_core::opening::OpeningSpec;

/// Parse a list of opening specifications from a JSON array of records.
pub fn specs_from_json(json: &str) -> serde_json::Result<Vec<OpeningSpec>> {
    serde_json::from_str(json)
}

/// Serialize opening specifications (resolved or not) back to JSON.
pub fn specs_to_json(specs: &[OpeningSpec]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(specs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fenestra_core::opening::OpeningKind;

    #[test]
    fn test_parse_minimal_record() {
        let json = r#"[{"name": "w1", "kind": "window", "ratio": 0.3}]"#;
        let specs = specs_from_json(json).unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].kind, OpeningKind::Window);
        assert_eq!(specs[0].count, 1);
        assert_eq!(specs[0].multiplier, 1);
        assert_eq!(specs[0].ratio, Some(0.3));
        assert_eq!(specs[0].head, None);
    }

    #[test]
    fn test_parse_array_record() {
        let json = r#"[{
            "name": "band",
            "kind": "window",
            "count": 3,
            "width": 0.9,
            "offset": 0.4,
            "sill": 1.0,
            "height": 1.2,
            "frame_width": 0.05
        }]"#;
        let specs = specs_from_json(json).unwrap();
        assert_eq!(specs[0].count, 3);
        assert_eq!(specs[0].offset, Some(0.4));
    }

    #[test]
    fn test_round_trip() {
        let spec = OpeningSpec::new("door-a", OpeningKind::Door)
            .with_width(0.9)
            .with_height(2.0)
            .with_left_buffer(0.5);
        let json = specs_to_json(std::slice::from_ref(&spec)).unwrap();
        let back = specs_from_json(&json).unwrap();
        assert_eq!(back[0], spec);
    }
}
