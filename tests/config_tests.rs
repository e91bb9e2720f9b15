use std::io::Write;
use std::time::Duration;

use swarm_choreo::config::{ChoreographyMode, Config, ENV_PREFIX};
use swarm_choreo::domains::choreography::{DescendPolicy, LandingFraming, SelectionPolicy, TakeoffFraming};
use swarm_choreo::domains::fleet::{AgentConfig, AgentId};

fn toml_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_defaults() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.dispatch.tick_width().unwrap(), Duration::from_millis(100));
    assert_eq!(config.fleet.agents.len(), 9);
    assert_eq!(config.fleet.ids()[8], AgentId(8));
    assert_eq!(config.fleet.get(AgentId(0)).unwrap().name, "cf0");
    assert_eq!(config.choreography.mode, ChoreographyMode::Sections);
    assert_eq!(config.choreography.default_primitive, "kickline");
    assert_eq!(config.choreography.descend_policy, DescendPolicy::Append);
    assert!(config.choreography.takeoff.is_none());
}

#[tokio::test]
async fn test_from_file() {
    let file = toml_file(
        r#"
[dispatch]
tick_width_secs = 0.05

[[fleet.agents]]
id = 10
name = "left"
uri = "radio://0/80/2M/E7E7E7E70A"

[[fleet.agents]]
id = 11
name = "right"
uri = "radio://0/80/2M/E7E7E7E70B"

[choreography]
mode = "beats"
descend_policy = "drop"
takeoff = { height = 1.0, duration = 2.0 }

[choreography.selection]
policy = "random"
seed = 42
"#,
    );

    let config = Config::from_file(file.path()).await.unwrap();
    assert_eq!(config.dispatch.tick_width().unwrap(), Duration::from_millis(50));
    assert_eq!(config.fleet.ids(), vec![AgentId(10), AgentId(11)]);
    assert_eq!(config.choreography.mode, ChoreographyMode::Beats);
    assert_eq!(config.choreography.descend_policy, DescendPolicy::Drop);
    assert_eq!(config.choreography.takeoff.unwrap().duration, 2.0);
    assert_eq!(config.choreography.selection.policy, SelectionPolicy::Random);
    assert_eq!(config.choreography.selection.seed, 42);
    // untouched sections keep their defaults
    assert_eq!(config.choreography.default_primitive, "kickline");
    assert_eq!(config.logging.buffer_capacity, 256);
}

#[tokio::test]
async fn test_from_file_rejects_invalid_values() {
    let file = toml_file("[dispatch]\ntick_width_secs = 0.0\n");
    assert!(Config::from_file(file.path()).await.is_err());

    let file = toml_file("[fleet]\nagents = []\n");
    assert!(Config::from_file(file.path()).await.is_err());
}

// Environment variables are process-wide, so every layered check lives in one test.
#[test]
fn test_load_layers_file_and_environment() {
    let missing = std::env::temp_dir().join("swarm-choreo-does-not-exist.toml");
    let defaults = Config::load(&missing).unwrap();
    assert_eq!(defaults.dispatch.tick_width_secs, 0.1);

    let file = toml_file("[dispatch]\ntick_width_secs = 0.2\n\n[choreography]\ndefault_primitive = \"wave\"\n");
    let from_file = Config::load(file.path()).unwrap();
    assert_eq!(from_file.dispatch.tick_width_secs, 0.2);
    assert_eq!(from_file.choreography.default_primitive, "wave");

    let key = format!("{}__DISPATCH__TICK_WIDTH_SECS", ENV_PREFIX);
    std::env::set_var(&key, "0.5");
    let overridden = Config::load(file.path());
    std::env::remove_var(&key);

    let overridden = overridden.unwrap();
    assert_eq!(overridden.dispatch.tick_width_secs, 0.5);
    assert_eq!(overridden.choreography.default_primitive, "wave");
}

#[test]
fn test_validate_catches_fleet_mistakes() {
    let mut config = Config::default();
    config.fleet.agents.push(AgentConfig::new(3, "dup", "radio://0/10/2M/E7E7E7E7FF"));
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("duplicate id 3"));

    let mut config = Config::default();
    config.choreography.max_speed = Some(0.0);
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.choreography.max_speed = None;
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_rejects_bad_framing() {
    let mut config = Config::default();
    config.choreography.takeoff = Some(TakeoffFraming { height: -1.0, duration: -5.0 });
    assert!(config.validate().unwrap_err().to_string().contains("takeoff"));

    config.choreography.takeoff = Some(TakeoffFraming { height: 1.0, duration: 0.0 });
    assert!(config.validate().is_err());

    config.choreography.takeoff = Some(TakeoffFraming { height: 1.0, duration: f64::NAN });
    assert!(config.validate().is_err());

    config.choreography.takeoff = Some(TakeoffFraming { height: 1.0, duration: 2.0 });
    config.choreography.landing = Some(LandingFraming { duration: -0.5 });
    assert!(config.validate().unwrap_err().to_string().contains("landing"));

    config.choreography.landing = Some(LandingFraming { duration: 0.0 });
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_rejects_unusable_ticks_and_speeds() {
    let mut config = Config::default();
    config.dispatch.tick_width_secs = 1e30;
    assert!(config.dispatch.tick_width().is_err());
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.choreography.max_speed = Some(f64::NAN);
    assert!(config.validate().is_err());
}
