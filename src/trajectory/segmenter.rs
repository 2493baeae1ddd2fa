//! Splits an ordered point table into contiguous trajectories and their segments.

use crate::table::Point;

/// A pair of consecutive points sharing one trajectory id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment<'a> {
    pub trajectory_id: &'a str,
    pub from: &'a Point,
    pub to: &'a Point,
    /// 1-based position within the trajectory.
    pub position: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentEvent<'a> {
    /// A new contiguous run of `trajectory_id` begins at table index `first_index`.
    Started {
        trajectory_id: &'a str,
        first_index: usize,
    },
    Segment(Segment<'a>),
}

/// Lazy scan over consecutive row pairs `(i, i + 1)`.
///
/// Every run of equal ids is announced with [`SegmentEvent::Started`] before any of
/// its segments, so single-row runs still show up. No segment crosses an id change.
#[derive(Debug)]
pub struct Segmenter<'a> {
    points: &'a [Point],
    index: usize,
    announced: bool,
    position: usize,
}

impl<'a> Segmenter<'a> {
    pub fn new(points: &'a [Point]) -> Self {
        Self {
            points,
            index: 0,
            announced: false,
            position: 0,
        }
    }

    /// Only the segments, without run boundaries.
    pub fn segments(self) -> impl Iterator<Item = Segment<'a>> {
        self.filter_map(|event| match event {
            SegmentEvent::Segment(segment) => Some(segment),
            SegmentEvent::Started { .. } => None,
        })
    }
}

impl<'a> Iterator for Segmenter<'a> {
    type Item = SegmentEvent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let points = self.points;
            let current = points.get(self.index)?;

            if !self.announced {
                self.announced = true;
                let starts_run = self.index == 0
                    || points[self.index - 1].trajectory_id != current.trajectory_id;
                if starts_run {
                    self.position = 0;
                    return Some(SegmentEvent::Started {
                        trajectory_id: &current.trajectory_id,
                        first_index: self.index,
                    });
                }
            }

            self.index += 1;
            self.announced = false;
            match points.get(self.index) {
                Some(next) if next.trajectory_id == current.trajectory_id => {
                    self.position += 1;
                    return Some(SegmentEvent::Segment(Segment {
                        trajectory_id: &current.trajectory_id,
                        from: current,
                        to: next,
                        position: self.position,
                    }));
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(trajectory_id: &str, node_id: &str) -> Point {
        Point {
            trajectory_id: trajectory_id.to_string(),
            node_id: node_id.to_string(),
            timestamp: "10:00:00".to_string(),
            x: 0.0,
            y: 0.0,
            speed_limit: "60".to_string(),
        }
    }

    fn table(ids: &[&str]) -> Vec<Point> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| point(id, &format!("n{i}")))
            .collect()
    }

    #[test]
    fn k_rows_produce_k_minus_one_segments() {
        let points = table(&["A", "A", "A", "A", "A"]);

        let positions: Vec<usize> = Segmenter::new(&points)
            .segments()
            .map(|segment| segment.position)
            .collect();

        assert_eq!(positions, vec![1, 2, 3, 4]);
    }

    #[test]
    fn segments_never_cross_an_id_change() {
        let points = table(&["T1", "T1", "T2"]);

        let events: Vec<SegmentEvent<'_>> = Segmenter::new(&points).collect();

        assert_eq!(events.len(), 3);
        assert!(matches!(
            events[0],
            SegmentEvent::Started {
                trajectory_id: "T1",
                first_index: 0
            }
        ));
        match events[1] {
            SegmentEvent::Segment(segment) => {
                assert_eq!(segment.trajectory_id, "T1");
                assert_eq!(segment.from.node_id, "n0");
                assert_eq!(segment.to.node_id, "n1");
                assert_eq!(segment.position, 1);
            }
            other => panic!("expected segment, got {other:?}"),
        }
        assert!(matches!(
            events[2],
            SegmentEvent::Started {
                trajectory_id: "T2",
                first_index: 2
            }
        ));
    }

    #[test]
    fn position_resets_for_each_run() {
        let points = table(&["A", "A", "A", "B", "B", "C"]);

        let segments: Vec<(&str, usize)> = Segmenter::new(&points)
            .segments()
            .map(|segment| (segment.trajectory_id, segment.position))
            .collect();

        assert_eq!(segments, vec![("A", 1), ("A", 2), ("B", 1)]);
    }

    #[test]
    fn repeated_id_after_gap_starts_a_new_run() {
        let points = table(&["A", "A", "B", "A", "A"]);

        let starts: Vec<usize> = Segmenter::new(&points)
            .filter_map(|event| match event {
                SegmentEvent::Started { first_index, .. } => Some(first_index),
                SegmentEvent::Segment(_) => None,
            })
            .collect();
        let positions: Vec<usize> = Segmenter::new(&points)
            .segments()
            .map(|segment| segment.position)
            .collect();

        assert_eq!(starts, vec![0, 2, 3]);
        assert_eq!(positions, vec![1, 1]);
    }

    #[test]
    fn empty_and_single_row_tables() {
        assert_eq!(Segmenter::new(&[]).count(), 0);

        let single = table(&["A"]);
        let events: Vec<SegmentEvent<'_>> = Segmenter::new(&single).collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], SegmentEvent::Started { .. }));
    }

    #[test]
    fn exhausted_segmenter_stays_exhausted() {
        let points = table(&["A", "A"]);
        let mut segmenter = Segmenter::new(&points);
        assert_eq!(segmenter.by_ref().count(), 2);
        assert!(segmenter.next().is_none());
    }
}
