use swapmotion::{
    ApproxMeasurer, Evaluator, Fps, FrameIndex, Sequencer, Stage, StageRenderer, swap_demo,
};

fn build() -> Stage {
    let choreography = swap_demo(&mut ApproxMeasurer).unwrap();
    let mut renderer = StageRenderer::new(
        choreography.canvas,
        choreography.background,
        Fps::new(30, 1).unwrap(),
    );
    Sequencer::run(&choreography, &mut renderer).unwrap();
    renderer.finish().unwrap()
}

fn eval_dump(stage: &Stage) -> String {
    let mut out = String::new();
    for f in 0..stage.duration.0 {
        let eval = Evaluator::eval_frame(stage, FrameIndex(f)).unwrap();
        out.push_str(&serde_json::to_string(&eval).unwrap());
        out.push('\n');
    }
    out
}

#[test]
fn identical_scripts_evaluate_byte_identically() {
    let a = eval_dump(&build());
    let b = eval_dump(&build());
    assert_eq!(a, b);
}

#[test]
fn stage_survives_a_serde_roundtrip() {
    let stage = build();
    let json = serde_json::to_string(&stage).unwrap();
    let back: Stage = serde_json::from_str(&json).unwrap();

    assert_eq!(back.duration, stage.duration);
    assert_eq!(back.glyphs.len(), stage.glyphs.len());

    let f = FrameIndex(stage.duration.0 / 2);
    let before = serde_json::to_string(&Evaluator::eval_frame(&stage, f).unwrap()).unwrap();
    let after = serde_json::to_string(&Evaluator::eval_frame(&back, f).unwrap()).unwrap();
    assert_eq!(before, after);
}
