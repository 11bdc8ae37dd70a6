// Unit tests for timeline segmentation rules

#[cfg(test)]
mod tests {
    use crate::domain::errors::TimelineError;
    use crate::domain::model::Interval;
    use crate::domain::rules::{
        compute_speed_map, normalize_intervals, resolve_freeze_point, total_output_duration,
        FreezePosition, WindowPlan,
    };

    fn seconds(intervals: &[Interval]) -> Vec<(f64, f64)> {
        intervals
            .iter()
            .map(|i| (i.start.as_seconds(), i.end.as_seconds()))
            .collect()
    }

    #[test]
    fn test_normalize_preserves_input_order() {
        // Processing is positional, not sorted
        let raw = [("01:00", "01:30"), ("00:10", "00:20")];
        let intervals = normalize_intervals(&raw, 120.0).unwrap();
        assert_eq!(seconds(&intervals), vec![(60.0, 90.0), (10.0, 20.0)]);
    }

    #[test]
    fn test_normalize_allows_overlap_across_entries() {
        let raw = [("00:10", "00:40"), ("00:20", "00:50")];
        let intervals = normalize_intervals(&raw, 120.0).unwrap();
        assert_eq!(intervals.len(), 2);
    }

    #[test]
    fn test_normalize_empty_input() {
        let raw: [(&str, &str); 0] = [];
        assert_eq!(
            normalize_intervals(&raw, 120.0).unwrap_err(),
            TimelineError::EmptyInput
        );
    }

    #[test]
    fn test_normalize_rejects_inverted_interval() {
        let raw = [("01:00", "00:30")];
        assert!(matches!(
            normalize_intervals(&raw, 120.0).unwrap_err(),
            TimelineError::InvalidRange { .. }
        ));
    }

    #[test]
    fn test_normalize_rejects_out_of_range_end() {
        let raw = [("00:10", "03:00")];
        assert!(matches!(
            normalize_intervals(&raw, 120.0).unwrap_err(),
            TimelineError::InvalidRange { .. }
        ));
    }

    #[test]
    fn test_normalize_resolves_end_sentinel() {
        let raw = [("01:00", "end")];
        let intervals = normalize_intervals(&raw, 120.0).unwrap();
        assert_eq!(seconds(&intervals), vec![(60.0, 120.0)]);
    }

    #[test]
    fn test_normalize_surfaces_parse_errors() {
        let raw = [("bogus", "00:30")];
        assert!(matches!(
            normalize_intervals(&raw, 120.0).unwrap_err(),
            TimelineError::InvalidFormat { .. }
        ));
    }

    #[test]
    fn test_window_plan_overlapping_windows() {
        let plan = WindowPlan::new(10.0, 3.0, 2.0, None, None).unwrap();
        let windows: Vec<_> = plan.iter().collect();
        // [8,11] would exceed the duration and is dropped, not truncated
        assert_eq!(
            seconds(&windows),
            vec![(0.0, 3.0), (2.0, 5.0), (4.0, 7.0), (6.0, 9.0)]
        );
    }

    #[test]
    fn test_window_plan_back_to_back() {
        let plan = WindowPlan::new(9.0, 3.0, 3.0, None, None).unwrap();
        let windows: Vec<_> = plan.iter().collect();
        assert_eq!(seconds(&windows), vec![(0.0, 3.0), (3.0, 6.0), (6.0, 9.0)]);
    }

    #[test]
    fn test_window_plan_is_restartable() {
        let plan = WindowPlan::new(10.0, 3.0, 2.0, None, None).unwrap();
        let first: Vec<_> = plan.iter().collect();
        let second: Vec<_> = (&plan).into_iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_window_plan_sub_range() {
        let plan = WindowPlan::new(120.0, 10.0, 10.0, Some("00:30"), Some("01:00")).unwrap();
        let windows: Vec<_> = plan.iter().collect();
        assert_eq!(
            seconds(&windows),
            vec![(30.0, 40.0), (40.0, 50.0), (50.0, 60.0)]
        );
    }

    #[test]
    fn test_window_plan_end_sentinel() {
        let plan = WindowPlan::new(10.0, 5.0, 5.0, Some("00:00"), Some("end")).unwrap();
        assert_eq!(plan.iter().count(), 2);
    }

    #[test]
    fn test_window_plan_window_shorter_than_range_yields_nothing() {
        let plan = WindowPlan::new(10.0, 3.0, 2.0, Some("00:08"), None).unwrap();
        assert_eq!(plan.iter().count(), 0);
    }

    #[test]
    fn test_window_plan_rejects_non_positive_parameters() {
        assert!(matches!(
            WindowPlan::new(10.0, 0.0, 2.0, None, None).unwrap_err(),
            TimelineError::InvalidParameter {
                name: "window_length",
                ..
            }
        ));
        assert!(matches!(
            WindowPlan::new(10.0, 3.0, -1.0, None, None).unwrap_err(),
            TimelineError::InvalidParameter {
                name: "slide_step",
                ..
            }
        ));
    }

    #[test]
    fn test_window_plan_rejects_window_shorter_than_stride() {
        // A window narrower than the stride would leave gaps
        assert!(matches!(
            WindowPlan::new(10.0, 2.0, 3.0, None, None).unwrap_err(),
            TimelineError::InvalidParameter { .. }
        ));
    }

    #[test]
    fn test_window_plan_rejects_out_of_range_bounds() {
        assert!(matches!(
            WindowPlan::new(10.0, 3.0, 2.0, Some("00:00"), Some("00:20")).unwrap_err(),
            TimelineError::InvalidRange { .. }
        ));
        assert!(matches!(
            WindowPlan::new(10.0, 3.0, 2.0, Some("00:08"), Some("00:05")).unwrap_err(),
            TimelineError::InvalidRange { .. }
        ));
    }

    #[test]
    fn test_speed_map_whole_timeline() {
        let map = compute_speed_map(10.0, 2.0, None).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map[0].interval.start.as_seconds(), 0.0);
        assert_eq!(map[0].interval.end.as_seconds(), 10.0);
        assert_eq!(map[0].factor, 2.0);
        assert_eq!(total_output_duration(&map), 5.0);
    }

    #[test]
    fn test_speed_map_single_interval() {
        let intervals = [Interval::from_seconds(2.0, 4.0).unwrap()];
        let map = compute_speed_map(10.0, 2.0, Some(&intervals)).unwrap();

        let shape: Vec<_> = map
            .iter()
            .map(|e| (e.interval.start.as_seconds(), e.interval.end.as_seconds(), e.factor))
            .collect();
        assert_eq!(
            shape,
            vec![(0.0, 2.0, 1.0), (2.0, 4.0, 2.0), (4.0, 10.0, 1.0)]
        );

        let source_total: f64 = map.iter().map(|e| e.interval.duration()).sum();
        assert_eq!(source_total, 10.0);
        // 2s normal + 1s doubled + 6s normal
        assert_eq!(total_output_duration(&map), 9.0);
    }

    #[test]
    fn test_speed_map_tiles_timeline_exactly() {
        let cases: Vec<Vec<(f64, f64)>> = vec![
            vec![(0.0, 10.0)],
            vec![(2.0, 4.0)],
            vec![(0.0, 3.0), (3.0, 6.0)],
            vec![(1.0, 2.0), (5.0, 7.5), (9.0, 10.0)],
            vec![(0.5, 9.5)],
        ];

        for case in cases {
            let intervals: Vec<Interval> = case
                .iter()
                .map(|&(s, e)| Interval::from_seconds(s, e).unwrap())
                .collect();
            let map = compute_speed_map(10.0, 3.0, Some(&intervals)).unwrap();

            // No gaps, no overlaps, full coverage of [0, 10]
            assert_eq!(map.first().unwrap().interval.start.as_seconds(), 0.0);
            assert_eq!(map.last().unwrap().interval.end.as_seconds(), 10.0);
            for pair in map.windows(2) {
                assert_eq!(
                    pair[0].interval.end.as_seconds(),
                    pair[1].interval.start.as_seconds()
                );
            }
            let source_total: f64 = map.iter().map(|e| e.interval.duration()).sum();
            assert!((source_total - 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_speed_map_adjacent_intervals_emit_no_gap_entries() {
        let intervals = [
            Interval::from_seconds(0.0, 5.0).unwrap(),
            Interval::from_seconds(5.0, 10.0).unwrap(),
        ];
        let map = compute_speed_map(10.0, 2.0, Some(&intervals)).unwrap();
        assert_eq!(map.len(), 2);
        assert!(map.iter().all(|e| e.factor == 2.0));
    }

    #[test]
    fn test_speed_map_rejects_out_of_order_intervals() {
        let intervals = [
            Interval::from_seconds(5.0, 7.0).unwrap(),
            Interval::from_seconds(2.0, 4.0).unwrap(),
        ];
        assert!(matches!(
            compute_speed_map(10.0, 2.0, Some(&intervals)).unwrap_err(),
            TimelineError::InvalidRange { .. }
        ));
    }

    #[test]
    fn test_speed_map_rejects_overlapping_intervals() {
        let intervals = [
            Interval::from_seconds(2.0, 6.0).unwrap(),
            Interval::from_seconds(5.0, 8.0).unwrap(),
        ];
        assert!(compute_speed_map(10.0, 2.0, Some(&intervals)).is_err());
    }

    #[test]
    fn test_speed_map_rejects_interval_past_duration() {
        let intervals = [Interval::from_seconds(8.0, 12.0).unwrap()];
        assert!(matches!(
            compute_speed_map(10.0, 2.0, Some(&intervals)).unwrap_err(),
            TimelineError::InvalidRange { .. }
        ));
    }

    #[test]
    fn test_speed_map_rejects_non_positive_factor() {
        assert!(matches!(
            compute_speed_map(10.0, 0.0, None).unwrap_err(),
            TimelineError::InvalidParameter { name: "factor", .. }
        ));
        assert!(compute_speed_map(10.0, -2.0, None).is_err());
        assert!(compute_speed_map(10.0, f64::NAN, None).is_err());
    }

    #[test]
    fn test_speed_map_rejects_empty_interval_list() {
        let intervals: [Interval; 0] = [];
        assert_eq!(
            compute_speed_map(10.0, 2.0, Some(&intervals)).unwrap_err(),
            TimelineError::EmptyInput
        );
    }

    #[test]
    fn test_resolve_freeze_point_positions() {
        assert_eq!(
            resolve_freeze_point(100.0, FreezePosition::Beginning, None).unwrap(),
            0.01
        );
        assert_eq!(
            resolve_freeze_point(100.0, FreezePosition::End, None).unwrap(),
            99.99
        );
        assert_eq!(
            resolve_freeze_point(100.0, FreezePosition::Middle, Some(42.0)).unwrap(),
            42.0
        );
    }

    #[test]
    fn test_resolve_freeze_point_middle_requires_time() {
        assert!(matches!(
            resolve_freeze_point(100.0, FreezePosition::Middle, None).unwrap_err(),
            TimelineError::InvalidParameter {
                name: "freeze_time",
                ..
            }
        ));
        assert!(resolve_freeze_point(100.0, FreezePosition::Middle, Some(200.0)).is_err());
        assert!(resolve_freeze_point(100.0, FreezePosition::Middle, Some(-1.0)).is_err());
    }
}
