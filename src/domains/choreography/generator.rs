use super::analysis::Section;
use super::composer::apply_primitive;
use super::library::PrimitiveLibrary;
use super::primitive::AgentMap;
use super::schedule::{Schedule, ScheduleBuilder};
use super::selector::PrimitiveSelector;
use crate::common::DomainResult;

/// Builds one schedule with a primitive per section.
///
/// Each section anchors at its own `start`; primitives are not chained. The first failing
/// section aborts the whole build.
pub fn generate_schedule(
    library: &PrimitiveLibrary,
    sections: &[Section],
    selector: &mut dyn PrimitiveSelector,
    agent_map: &AgentMap,
) -> DomainResult<Schedule> {
    let mut builder = ScheduleBuilder::new();
    for (index, section) in sections.iter().enumerate() {
        let name = selector.select(index, section);
        let primitive = library.get(&name)?;
        let end = apply_primitive(&mut builder, primitive, agent_map, section.start, section.duration)?;
        tracing::debug!(
            section = index,
            primitive = %name,
            start = section.start,
            duration = section.duration,
            end,
            "composed section"
        );
    }
    Ok(builder.build())
}
