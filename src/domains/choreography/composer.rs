use super::library::PrimitiveLibrary;
use super::primitive::{AgentMap, Primitive};
use super::schedule::{Schedule, ScheduleBuilder, ScheduleEntry};
use crate::common::{DomainError, DomainResult};

/// Stretches `primitive` to `target_duration` and appends it to `builder` at `start_time`.
///
/// Offsets and embedded command durations are scaled by the same factor. Returns the
/// absolute time at which the last scaled motion completes. Nothing is appended when the
/// call fails.
pub fn apply_primitive(
    builder: &mut ScheduleBuilder,
    primitive: &Primitive,
    agent_map: &AgentMap,
    start_time: f64,
    target_duration: f64,
) -> DomainResult<f64> {
    let basic_duration = primitive.basic_duration();
    if basic_duration <= 0.0 {
        return Err(DomainError::invalid_primitive(
            primitive.name(),
            "basic duration is zero; every move has offset 0",
        ));
    }
    if !target_duration.is_finite() || target_duration <= 0.0 {
        return Err(DomainError::invalid_primitive(
            primitive.name(),
            format!("target duration must be > 0, got {}", target_duration),
        ));
    }
    if !start_time.is_finite() || start_time < 0.0 {
        return Err(DomainError::invalid_primitive(
            primitive.name(),
            format!("start time must be >= 0, got {}", start_time),
        ));
    }

    let scale = target_duration / basic_duration;
    let mut staged = Vec::with_capacity(primitive.moves().len());
    let mut end = 0.0_f64;

    for mv in primitive.moves() {
        let agent = agent_map.resolve(mv.agent).ok_or_else(|| {
            DomainError::invalid_primitive(
                primitive.name(),
                format!("local agent {} has no mapping ({} agents mapped)", mv.agent, agent_map.len()),
            )
        })?;
        let offset = mv.offset * scale;
        let command = mv.command.scaled(scale);
        end = end.max(offset + command.duration().unwrap_or(0.0));
        staged.push(ScheduleEntry::new(start_time + offset, agent, command));
    }

    builder.extend(staged);
    Ok(start_time + end)
}

/// Composes primitives back to back, each starting when the previous one's motion ends.
///
/// Returns the schedule and the time its last motion completes.
pub fn chain_primitives(
    library: &PrimitiveLibrary,
    steps: &[(&str, f64)],
    agent_map: &AgentMap,
    start_time: f64,
) -> DomainResult<(Schedule, f64)> {
    let mut builder = ScheduleBuilder::new();
    let mut cursor = start_time;
    for (name, duration) in steps {
        let primitive = library.get(name)?;
        cursor = apply_primitive(&mut builder, primitive, agent_map, cursor, *duration)?;
    }
    Ok((builder.build(), cursor))
}
