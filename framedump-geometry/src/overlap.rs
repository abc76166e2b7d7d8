use framedump_common::{Frame, FrameId};
use geo_types::{coord, Rect};

/// Unrotated bounding box of a frame in canvas space
pub fn frame_bounds(frame: &Frame) -> Rect<f64> {
    Rect::new(
        coord!(x: frame.position.x, y: frame.position.y),
        coord!(
            x: frame.position.x + frame.size.width,
            y: frame.position.y + frame.size.height
        ),
    )
}

/// Strict intersection test; rectangles that only share an edge do not intersect
pub fn rects_intersect(a: &Rect<f64>, b: &Rect<f64>) -> bool {
    a.min().x < b.max().x && a.max().x > b.min().x && a.min().y < b.max().y && a.max().y > b.min().y
}

/// Whether the unrotated bounding boxes of two frames intersect
pub fn frames_intersect(a: &Frame, b: &Frame) -> bool {
    rects_intersect(&frame_bounds(a), &frame_bounds(b))
}

/// Returns the frames that lie beneath `query` and overlap it.
///
/// Rotation is ignored: the test runs on unrotated bounding boxes, which is
/// enough to offer plausible drop targets. Only candidates with a strictly
/// lower `z_order` are returned, in candidate order. A candidate with the
/// query's own id is skipped.
pub fn detect_overlaps<'a>(
    query_id: &FrameId,
    query: &Frame,
    candidates: impl IntoIterator<Item = (&'a FrameId, &'a Frame)>,
) -> Vec<FrameId> {
    let query_bounds = frame_bounds(query);
    candidates
        .into_iter()
        .filter(|(id, candidate)| {
            *id != query_id
                && candidate.z_order < query.z_order
                && rects_intersect(&query_bounds, &frame_bounds(candidate))
        })
        .map(|(id, _)| id.clone())
        .collect()
}
