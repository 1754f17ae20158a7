// src/selector.rs
//
// Picks the single detection worth announcing on a frame. Larger
// projected area approximates "closest / most salient" — a reasonable
// prioritization for a serial audio channel that can only say one
// thing at a time.

use crate::distance::Distance;
use crate::geometry::Rect;

/// An announcement-eligible detection with its per-frame derived data.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub label: String,
    pub confidence: f32,
    pub bbox: Rect,
    pub area: f32,
    pub distance: Distance,
}

/// Return the candidate with the largest area, or `None` for an empty
/// slice. Ties break to the first maximal element in input order, so
/// repeated runs over the same frame pick the same winner.
pub fn select_best(candidates: &[Candidate]) -> Option<&Candidate> {
    let mut best: Option<&Candidate> = None;
    for candidate in candidates {
        match best {
            Some(current) if candidate.area <= current.area => {}
            _ => best = Some(candidate),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(label: &str, area: f32) -> Candidate {
        let side = area.sqrt();
        Candidate {
            label: label.to_string(),
            confidence: 0.9,
            bbox: Rect::new(0.0, 0.0, side, side),
            area,
            distance: Distance {
                feet: 3,
                from_depth: false,
            },
        }
    }

    #[test]
    fn test_empty_input_selects_nothing() {
        assert!(select_best(&[]).is_none());
    }

    #[test]
    fn test_largest_area_wins() {
        let candidates = vec![
            candidate("chair", 100.0),
            candidate("person", 400.0),
            candidate("cup", 50.0),
        ];
        assert_eq!(select_best(&candidates).unwrap().label, "person");
    }

    #[test]
    fn test_ties_break_to_first_in_input_order() {
        let candidates = vec![
            candidate("chair", 200.0),
            candidate("table", 200.0),
            candidate("sofa", 200.0),
        ];
        for _ in 0..10 {
            assert_eq!(
                select_best(&candidates).unwrap().label,
                "chair",
                "tie-break must be deterministic across runs"
            );
        }
    }
}
