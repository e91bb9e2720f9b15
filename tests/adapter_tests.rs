use std::fs;
use swarm_choreo::adapters::inbound::FilesystemAnalysisSource;
use swarm_choreo::adapters::outbound::{LogActuator, RecordingActuator};
use swarm_choreo::common::DomainError;
use swarm_choreo::domains::choreography::{
    AnalysisSource, Command, CommandKind, PrimitiveLibrary, PrimitiveSource, RingColor,
};
use swarm_choreo::domains::fleet::{Actuator, AgentConfig};
use tempfile::tempdir;

#[test]
fn test_filesystem_analysis_source_reads_relative_to_base() {
    let dir = tempdir().unwrap();
    let source = FilesystemAnalysisSource::new(Some(dir.path().to_path_buf()));

    fs::write(
        dir.path().join("song.json"),
        r#"{
    "track": {"tempo": 120.0},
    "sections": [
        {"start": 0.0, "duration": 12.5, "loudness": -9.1, "tempo": 120.0},
        {"start": 12.5, "duration": 20.0}
    ],
    "beats": [
        {"start": 0.0, "duration": 0.5, "confidence": 0.8}
    ]
}"#,
    )
    .unwrap();

    let analysis = source.load_analysis("song.json").unwrap();
    assert_eq!(analysis.sections.len(), 2);
    assert_eq!(analysis.sections[0].loudness, Some(-9.1));
    assert_eq!(analysis.sections[1].tempo, None);
    assert_eq!(analysis.beats[0].confidence, Some(0.8));

    // absolute names ignore the base directory
    let other = tempdir().unwrap();
    let absolute = FilesystemAnalysisSource::new(Some(other.path().to_path_buf()));
    let path = dir.path().join("song.json");
    assert!(absolute.load_analysis(path.to_str().unwrap()).is_ok());
}

#[test]
fn test_filesystem_analysis_source_errors() {
    let dir = tempdir().unwrap();
    let source = FilesystemAnalysisSource::new(Some(dir.path().to_path_buf()));

    let missing = source.load_analysis("nope.json").unwrap_err();
    assert!(matches!(missing, DomainError::InfrastructureError(ref m) if m.contains("nope.json")));

    fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
    let broken = source.load_analysis("broken.json").unwrap_err();
    assert!(matches!(broken, DomainError::SerializationError(_)));
}

#[test]
fn test_primitive_file_round_trip_into_library() {
    let dir = tempdir().unwrap();
    let source = FilesystemAnalysisSource::new(Some(dir.path().to_path_buf()));
    fs::write(
        dir.path().join("extra.json"),
        r#"[
  {"name": "blink", "moves": [
    {"offset": 0.0, "agent": 0, "command": {"type": "ring", "color": {"r": 255, "g": 128, "b": 0, "intensity": 1.0}, "duration": 0.5}},
    {"offset": 0.5, "agent": 0, "command": {"type": "goto", "x": 0.0, "y": 0.0, "z": 1.0, "duration": 0.5}}
  ]}
]"#,
    )
    .unwrap();

    let json = source.load_primitives("extra.json").unwrap();
    let mut library = PrimitiveLibrary::builtin();
    let before = library.len();
    assert_eq!(library.extend_from_json(&json).unwrap(), 1);
    assert_eq!(library.len(), before + 1);

    let blink = library.get("blink").unwrap();
    assert_eq!(blink.basic_duration(), 0.5);
    assert_eq!(blink.moves()[0].command.kind(), CommandKind::Ring);
}

#[tokio::test]
async fn test_recording_actuator_keeps_call_order() {
    let actuator = RecordingActuator::new();
    let shared = actuator.clone();

    actuator.takeoff(1.0, 2.0).await;
    actuator.goto_point(0.5, 0.0, 1.0, 1.0).await;
    actuator.land(2.0).await;

    assert_eq!(
        shared.calls(),
        vec![
            Command::Takeoff { height: 1.0, duration: 2.0 },
            Command::goto(0.5, 0.0, 1.0, 1.0),
            Command::Land { duration: 2.0 },
        ]
    );
    assert!(!actuator.supports(CommandKind::Ring));
    assert!(actuator.clone().with_ring().supports(CommandKind::Ring));
}

#[tokio::test]
async fn test_log_actuator_accepts_every_motion() {
    let agent = AgentConfig::new(3, "cf3", "radio://0/10/2M/E7E7E7E704");
    let actuator = LogActuator::new(&agent);

    actuator.takeoff(1.0, 2.0).await;
    actuator.goto_point(0.0, 0.0, 1.0, 1.0).await;
    actuator.land(2.0).await;
    assert!(actuator.supports(CommandKind::Goto));
    assert!(!actuator.supports(CommandKind::Ring));

    let ringed = LogActuator::new(&agent).with_ring();
    ringed
        .set_ring(RingColor { r: 0, g: 255, b: 0, intensity: 0.5 }, 1.0)
        .await;
    assert!(ringed.supports(CommandKind::Ring));
}
