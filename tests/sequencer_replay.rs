use swapmotion::{ApproxMeasurer, RecordingRenderer, RenderEvent, Sequencer, swap_demo};

fn record() -> Vec<RenderEvent> {
    let choreography = swap_demo(&mut ApproxMeasurer).unwrap();
    let mut recorder = RecordingRenderer::new();
    Sequencer::run(&choreography, &mut recorder).unwrap();
    recorder.events
}

#[test]
fn replay_emits_the_full_call_sequence_in_order() {
    let events = record();

    let expected: Vec<RenderEvent> = vec![
        RenderEvent::Spawn("a_label".to_string()),
        RenderEvent::Spawn("a_value".to_string()),
        RenderEvent::Spawn("b_label".to_string()),
        RenderEvent::Spawn("b_value".to_string()),
        RenderEvent::Play {
            objects: vec![
                "a_label".to_string(),
                "a_value".to_string(),
                "b_label".to_string(),
                "b_value".to_string(),
            ],
            duration_units: 0.0,
        },
        RenderEvent::Wait(1.0),
        RenderEvent::Spawn("swap_code".to_string()),
        RenderEvent::Play {
            objects: vec!["swap_code".to_string()],
            duration_units: 0.0,
        },
        RenderEvent::Wait(1.5),
        RenderEvent::Spawn("a_value_copy".to_string()),
        RenderEvent::Spawn("b_value_copy".to_string()),
        RenderEvent::Play {
            objects: vec!["a_value".to_string(), "b_value".to_string()],
            duration_units: 0.8,
        },
        RenderEvent::Wait(0.5),
        RenderEvent::Play {
            objects: vec!["a_value_copy".to_string(), "b_value_copy".to_string()],
            duration_units: 1.8,
        },
        RenderEvent::Wait(0.8),
        RenderEvent::Spawn("a_value_final".to_string()),
        RenderEvent::Spawn("b_value_final".to_string()),
        RenderEvent::Play {
            objects: vec![
                "a_value_copy".to_string(),
                "b_value_copy".to_string(),
                "a_value_final".to_string(),
                "b_value_final".to_string(),
            ],
            duration_units: 1.0,
        },
        RenderEvent::Wait(2.0),
    ];

    assert_eq!(events, expected);
}

#[test]
fn every_played_object_was_spawned_earlier() {
    let events = record();
    let mut spawned = std::collections::BTreeSet::new();

    for event in &events {
        match event {
            RenderEvent::Spawn(id) => {
                assert!(spawned.insert(id.clone()), "double spawn of '{id}'");
            }
            RenderEvent::Play { objects, .. } => {
                for id in objects {
                    assert!(spawned.contains(id), "'{id}' played before spawn");
                }
            }
            RenderEvent::Wait(_) => {}
        }
    }
}

#[test]
fn declared_durations_and_waits_sum_to_the_contract_total() {
    let total: f64 = record()
        .iter()
        .map(|e| match e {
            RenderEvent::Play { duration_units, .. } => *duration_units,
            RenderEvent::Wait(units) => *units,
            RenderEvent::Spawn(_) => 0.0,
        })
        .sum();
    assert!((total - 9.4).abs() < 1e-12, "total was {total}");
}
