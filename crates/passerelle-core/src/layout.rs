//! Article reassembly.
//!
//! Re-interleaves the segments of the source document with the accepted
//! connectives, each connective standing alone as a paragraph.

use thiserror::Error;

use crate::text::split_segments;

/// Reassembly precondition failure.
///
/// Only raised when the marker count and connective count disagree, which
/// means an upstream stage broke its contract. It is never caused by the
/// content of the document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error(
        "Mismatch between number of TRANSITION markers and generated transitions \
         ({segments} segments for {connectives} transitions)"
    )]
    Mismatch { segments: usize, connectives: usize },
}

/// Rebuild `source` with each `marker` replaced by the matching connective.
///
/// Segments are trimmed once; each connective is separated from its
/// neighbours by a blank line.
///
/// ```rust
/// use passerelle_core::layout::rebuild;
///
/// let out = rebuild("Un. TRANSITION Deux.", "TRANSITION", &["Passons maintenant au point suivant".to_string()]).unwrap();
/// assert_eq!(out, "Un.\n\nPassons maintenant au point suivant\n\nDeux.");
/// ```
pub fn rebuild(source: &str, marker: &str, connectives: &[String]) -> Result<String, LayoutError> {
    let segments = split_segments(source, marker);
    if segments.len() != connectives.len() + 1 {
        return Err(LayoutError::Mismatch {
            segments: segments.len(),
            connectives: connectives.len(),
        });
    }

    let mut rebuilt = segments[0].trim().to_string();
    for (connective, segment) in connectives.iter().zip(&segments[1..]) {
        rebuilt.push_str("\n\n");
        rebuilt.push_str(connective);
        rebuilt.push_str("\n\n");
        rebuilt.push_str(segment.trim());
    }
    Ok(rebuilt)
}
