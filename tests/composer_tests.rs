use swarm_choreo::common::DomainError;
use swarm_choreo::domains::choreography::*;
use swarm_choreo::domains::fleet::AgentId;
use tokio_test::{assert_err, assert_ok};

const EPS: f64 = 1e-9;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < EPS
}

fn compose(name: &str, start: f64, duration: f64) -> (Schedule, f64) {
    let library = PrimitiveLibrary::builtin();
    let primitive = library.get(name).unwrap();
    let mut builder = ScheduleBuilder::new();
    let end = assert_ok!(apply_primitive(&mut builder, primitive, &AgentMap::identity(9), start, duration));
    (builder.build(), end)
}

#[cfg(test)]
mod composer {
    use super::*;

    #[test]
    fn kickline_at_half_speed_from_ten_seconds() {
        let (schedule, end) = compose("kickline", 10.0, 3.5);

        assert_eq!(schedule.len(), 72);
        assert_eq!(schedule.entries().first().unwrap().time, 10.0);
        assert_eq!(schedule.entries().last().unwrap().time, 13.5);
        // Last move at offset 7 runs for one intrinsic second, i.e. half a second here.
        assert!(approx(end, 14.0));
        for entry in schedule.entries() {
            assert_eq!(entry.command.duration(), Some(0.5));
        }
    }

    #[test]
    fn doubling_the_target_doubles_offsets_and_durations() {
        let start = 0.0;
        let (single, single_end) = compose("rotating_tower", start, 3.0);
        let (double, double_end) = compose("rotating_tower", start, 6.0);

        assert_eq!(single.len(), double.len());
        for (a, b) in single.entries().iter().zip(double.entries()) {
            assert_eq!(a.agent, b.agent);
            assert_eq!(b.time, 2.0 * a.time);
            assert_eq!(b.command.duration().unwrap(), 2.0 * a.command.duration().unwrap());
        }
        assert_eq!(double_end, 2.0 * single_end);
    }

    #[test]
    fn arbitrary_factors_scale_linearly() {
        let start = 1.25;
        let k = 2.6;
        let (base, _) = compose("wave", start, 3.0);
        let (scaled, _) = compose("wave", start, 3.0 * k);

        for (a, b) in base.entries().iter().zip(scaled.entries()) {
            assert!(approx(b.time - start, k * (a.time - start)));
            assert!(approx(b.command.duration().unwrap(), k * a.command.duration().unwrap()));
            match (&a.command, &b.command) {
                (Command::Goto { x: ax, z: az, .. }, Command::Goto { x: bx, z: bz, .. }) => {
                    assert_eq!(ax, bx);
                    assert_eq!(az, bz);
                }
                other => panic!("expected gotos, got {:?}", other),
            }
        }
    }

    #[test]
    fn degenerate_primitive_is_rejected_without_side_effects() {
        let flat = Primitive::new(
            "flat",
            vec![
                PrimitiveMove::new(0.0, 0, Command::goto(0.0, 0.0, 1.0, 1.0)),
                PrimitiveMove::new(0.0, 1, Command::goto(1.0, 0.0, 1.0, 1.0)),
            ],
        )
        .unwrap();
        let mut builder = ScheduleBuilder::new();

        let err = assert_err!(apply_primitive(&mut builder, &flat, &AgentMap::identity(2), 0.0, 2.0));
        assert!(matches!(err, DomainError::InvalidPrimitive { .. }));
        assert!(builder.is_empty());
    }

    #[test]
    fn non_positive_targets_are_rejected() {
        let library = PrimitiveLibrary::builtin();
        let kickline = library.get("kickline").unwrap();
        let mut builder = ScheduleBuilder::new();

        for target in [0.0, -1.0, f64::NAN] {
            let err = assert_err!(apply_primitive(&mut builder, kickline, &AgentMap::identity(9), 0.0, target));
            assert!(matches!(err, DomainError::InvalidPrimitive { .. }));
        }
        assert!(builder.is_empty());
    }

    #[test]
    fn unmapped_agents_abort_the_whole_primitive() {
        let library = PrimitiveLibrary::builtin();
        let kickline = library.get("kickline").unwrap();
        let mut builder = ScheduleBuilder::new();

        let err = assert_err!(apply_primitive(&mut builder, kickline, &AgentMap::identity(3), 0.0, 7.0));
        assert!(matches!(err, DomainError::InvalidPrimitive { .. }));
        assert!(builder.is_empty());
    }

    #[test]
    fn agent_map_redirects_local_indices() {
        let primitive = Primitive::new(
            "pair",
            vec![
                PrimitiveMove::new(0.0, 0, Command::goto(0.0, 0.0, 1.0, 1.0)),
                PrimitiveMove::new(1.0, 1, Command::Land { duration: 1.0 }),
            ],
        )
        .unwrap();
        let map = AgentMap::new(vec![AgentId(7), AgentId(3)]);
        let mut builder = ScheduleBuilder::new();
        assert_ok!(apply_primitive(&mut builder, &primitive, &map, 0.0, 2.0));

        let agents: Vec<AgentId> = builder.build().entries().iter().map(|e| e.agent).collect();
        assert_eq!(agents, vec![AgentId(7), AgentId(3)]);
    }

    #[test]
    fn chained_primitives_start_after_the_previous_motion_completes() {
        let library = PrimitiveLibrary::builtin();
        let (schedule, end) = assert_ok!(chain_primitives(
            &library,
            &[("kickline", 3.5), ("wave", 7.0)],
            &AgentMap::identity(9),
            10.0,
        ));

        assert_eq!(schedule.len(), 144);
        let wave_start = 14.0;
        let first_wave = schedule.entries().iter().position(|e| approx(e.time, wave_start)).unwrap();
        assert!(schedule.entries()[..first_wave].iter().all(|e| e.time <= 13.5));
        assert!(approx(end, wave_start + 8.0));
    }

    #[test]
    fn primitives_reject_quit_and_empty_tables() {
        let quit = Primitive::new("q", vec![PrimitiveMove::new(1.0, 0, Command::Quit)]);
        assert!(matches!(quit, Err(DomainError::InvalidPrimitive { .. })));
        let empty = Primitive::new("e", Vec::new());
        assert!(matches!(empty, Err(DomainError::InvalidPrimitive { .. })));
    }
}

#[cfg(test)]
mod generator {
    use super::*;

    fn sections(spans: &[(f64, f64)]) -> Vec<Section> {
        spans.iter().map(|(s, d)| Section::new(*s, *d)).collect()
    }

    #[test]
    fn each_section_anchors_at_its_own_start() {
        let library = PrimitiveLibrary::builtin();
        let mut selector = FixedSelector::new("kickline");
        let schedule = assert_ok!(generate_schedule(
            &library,
            &sections(&[(0.0, 3.5), (2.0, 7.0)]),
            &mut selector,
            &AgentMap::identity(9),
        ));

        assert_eq!(schedule.len(), 144);
        // The second section starts at 2.0 even though the first one's motion runs to 4.0.
        let at_two = schedule.entries().iter().filter(|e| e.time == 2.0).count();
        assert_eq!(at_two, 9 + 9);
    }

    #[test]
    fn per_agent_times_never_go_backwards() {
        let library = PrimitiveLibrary::builtin();
        let mut selector = CycleSelector::new(vec![
            "kickline".to_string(),
            "rotating_tower".to_string(),
            "wave".to_string(),
        ])
        .unwrap();
        let schedule = assert_ok!(generate_schedule(
            &library,
            &sections(&[(0.0, 5.0), (5.0, 2.5), (7.5, 9.0), (16.5, 4.0)]),
            &mut selector,
            &AgentMap::identity(9),
        ));

        let times: Vec<f64> = schedule.entries().iter().map(|e| e.time).collect();
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
        for agent in schedule.agents() {
            let own: Vec<f64> = schedule.entries_for(agent).map(|e| e.time).collect();
            assert!(own.windows(2).all(|w| w[0] <= w[1]), "agent {} out of order", agent);
        }
    }

    #[test]
    fn empty_analysis_yields_empty_schedule() {
        let library = PrimitiveLibrary::builtin();
        let mut selector = FixedSelector::new("kickline");
        let schedule = assert_ok!(generate_schedule(&library, &[], &mut selector, &AgentMap::identity(9)));
        assert!(schedule.is_empty());
        assert_eq!(schedule.end_time(), 0.0);
    }

    #[test]
    fn a_bad_section_fails_the_whole_build() {
        let library = PrimitiveLibrary::builtin();
        let mut selector = FixedSelector::new("kickline");
        let result = generate_schedule(
            &library,
            &sections(&[(0.0, 3.5), (3.5, 0.0)]),
            &mut selector,
            &AgentMap::identity(9),
        );
        assert!(matches!(result, Err(DomainError::InvalidPrimitive { .. })));
    }

    #[test]
    fn unknown_selection_is_reported() {
        let library = PrimitiveLibrary::builtin();
        let mut selector = FixedSelector::new("moonwalk");
        let result = generate_schedule(&library, &sections(&[(0.0, 1.0)]), &mut selector, &AgentMap::identity(9));
        assert!(matches!(result, Err(DomainError::UnknownPrimitive { .. })));
    }
}

#[cfg(test)]
mod bounce {
    use super::*;

    fn beats() -> Vec<Beat> {
        vec![Beat::new(0.0, 0.5), Beat::new(0.5, 0.5)]
    }

    #[test]
    fn append_policy_rises_and_descends_on_every_beat() {
        let schedule = assert_ok!(generate_bounce_schedule(
            &beats(),
            &AgentMap::identity(3),
            &BounceParams::default(),
            DescendPolicy::Append,
        ));

        assert_eq!(schedule.len(), 12);
        let own: Vec<(f64, f64)> = schedule
            .entries_for(AgentId(1))
            .map(|e| match e.command {
                Command::Goto { z, .. } => (e.time, z),
                _ => panic!("bounce only emits gotos"),
            })
            .collect();
        assert_eq!(own, vec![(0.0, 0.5), (0.25, 0.3), (0.5, 0.5), (0.75, 0.3)]);
    }

    // The drop policy keeps the rise-only behaviour where agents never come back down.
    #[test]
    fn drop_policy_schedules_rise_only() {
        let schedule = assert_ok!(generate_bounce_schedule(
            &beats(),
            &AgentMap::identity(3),
            &BounceParams::default(),
            DescendPolicy::Drop,
        ));

        assert_eq!(schedule.len(), 6);
        assert!(schedule
            .entries()
            .iter()
            .all(|e| matches!(e.command, Command::Goto { z, .. } if z == 0.5)));
    }

    #[test]
    fn zero_length_beats_are_invalid() {
        let result = generate_bounce_schedule(
            &[Beat::new(0.0, 0.0)],
            &AgentMap::identity(1),
            &BounceParams::default(),
            DescendPolicy::Append,
        );
        assert!(matches!(result, Err(DomainError::InvalidPrimitive { .. })));
    }
}
