use chrono::NaiveDate;
use repro_engine::{
    AnchorMode, BreedingPlanInput, Confidence, CycleObservation, OvulationMethod, Phase,
    ReproEngine, ReproError,
};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn plan_from_json(json: &str) -> BreedingPlanInput {
    serde_json::from_str(json).unwrap()
}

#[test]
fn all_empty_plan_produces_nothing() {
    let engine = ReproEngine::default();
    let plan = plan_from_json("{}");
    assert_eq!(engine.plan_windows(&plan, ymd(2024, 1, 1), &[]).unwrap(), None);

    let plan = plan_from_json(r#"{"species": "DOG", "reproAnchorMode": "CYCLE_START"}"#);
    assert_eq!(engine.plan_windows(&plan, ymd(2024, 1, 1), &[]).unwrap(), None);
}

#[test]
fn dog_cycle_start_scenario_on_the_wire() {
    let engine = ReproEngine::default();
    let plan = plan_from_json(
        r#"{"species": "DOG", "reproAnchorMode": "CYCLE_START", "lockedCycleStart": "2024-01-01"}"#,
    );
    let windows = engine
        .plan_windows(&plan, ymd(2023, 12, 20), &[])
        .unwrap()
        .unwrap();

    let out = serde_json::to_value(windows).unwrap();
    assert_eq!(out["cycle_start"], "2024-01-01");
    assert_eq!(out["ovulation"], "2024-01-13");
    assert_eq!(out["birth_expected"], "2024-03-16");
    assert_eq!(out["ovulation_confirmed"], serde_json::Value::Null);
    assert_eq!(out["anchor_mode"], "CYCLE_START");
    assert_eq!(out["confidence"], "LOW");
    assert!(out["hormone_testing_full"]["start"].as_str().unwrap() < "2024-01-13");
    assert!(out["hormone_testing_likely"]["start"].as_str().unwrap() < "2024-01-13");

    for phase in Phase::ALL {
        let full = &out[format!("{}_full", phase.as_str())];
        let likely = &out[format!("{}_likely", phase.as_str())];
        assert!(full["start"].as_str().unwrap() <= likely["start"].as_str().unwrap());
        assert!(likely["end"].as_str().unwrap() <= full["end"].as_str().unwrap());
    }
}

#[test]
fn hormone_history_raises_cycle_start_confidence() {
    let engine = ReproEngine::default();
    let history = vec![engine.record_cycle(
        "DOG",
        CycleObservation {
            cycle_start: ymd(2023, 6, 1),
            ovulation: Some(ymd(2023, 6, 13)),
            ovulation_method: Some(OvulationMethod::ProgesteroneTest),
            birth_date: None,
            breeding_plan_id: None,
            notes: String::new(),
        },
    )];
    let plan = plan_from_json(r#"{"species": "DOG", "cycleStartDateActual": "2024-01-01"}"#);
    let windows = engine
        .plan_windows(&plan, ymd(2024, 1, 1), &history)
        .unwrap()
        .unwrap();
    assert_eq!(windows.confidence, Some(Confidence::Medium));
}

#[test]
fn individual_pattern_shifts_plan() {
    let engine = ReproEngine::default();
    let history: Vec<_> = [ymd(2022, 6, 1), ymd(2022, 12, 1), ymd(2023, 6, 1)]
        .into_iter()
        .map(|start| {
            engine.record_cycle(
                "DOG",
                CycleObservation {
                    cycle_start: start,
                    ovulation: Some(start + chrono::Duration::days(9)),
                    ovulation_method: Some(OvulationMethod::LhTest),
                    birth_date: None,
                    breeding_plan_id: None,
                    notes: String::new(),
                },
            )
        })
        .collect();
    let plan = plan_from_json(r#"{"species": "dog", "lockedCycleStart": "2024-01-01"}"#);
    let windows = engine
        .plan_windows(&plan, ymd(2024, 1, 1), &history)
        .unwrap()
        .unwrap();
    assert_eq!(windows.ovulation, ymd(2024, 1, 10));

    let pattern = engine.analyze_pattern("DOG", &history);
    assert_eq!(pattern.confidence, Confidence::High);
    assert!(pattern.guidance.contains("3 days earlier"));
}

#[test]
fn actual_birth_overrides_everything() {
    let engine = ReproEngine::default();
    let plan = plan_from_json(
        r#"{
            "species": "DOG",
            "reproAnchorMode": "OVULATION",
            "ovulationConfirmed": "2024-01-10",
            "ovulationConfirmedMethod": "LH_TEST",
            "birthDateActual": "2024-03-16",
            "lockedCycleStart": "2024-01-01"
        }"#,
    );
    let windows = engine
        .plan_windows(&plan, ymd(2024, 4, 1), &[])
        .unwrap()
        .unwrap();
    assert_eq!(windows.anchor_mode, Some(AnchorMode::BirthDate));
    assert_eq!(windows.birth_expected, Some(ymd(2024, 3, 16)));
    assert_eq!(windows.ovulation, ymd(2024, 1, 13));
    assert_eq!(windows.placement_start_expected, ymd(2024, 5, 11));
}

#[test]
fn range_planning_envelope() {
    let engine = ReproEngine::default();
    let plan = plan_from_json(
        r#"{"species": "HORSE", "earliestCycleStart": "2024-04-01", "latestCycleStart": "2024-05-15"}"#,
    );
    let windows = engine
        .plan_windows(&plan, ymd(2024, 3, 1), &[])
        .unwrap()
        .unwrap();
    assert_eq!(windows.cycle_start, ymd(2024, 4, 1));
    assert!(windows.breeding_likely.start < ymd(2024, 4, 7));
    assert!(windows.breeding_likely.end > ymd(2024, 5, 20));
    assert_eq!(windows.anchor_mode, None);
}

#[test]
fn malformed_wire_date_is_an_error() {
    let engine = ReproEngine::default();
    let plan = plan_from_json(r#"{"species": "DOG", "birthDateActual": "March 16"}"#);
    assert_eq!(
        engine.plan_windows(&plan, ymd(2024, 4, 1), &[]),
        Err(ReproError::InvalidDate {
            input: "March 16".to_string()
        })
    );
}
