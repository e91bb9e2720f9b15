use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::common::{ApplicationError, ApplicationResult};
use crate::config::{ChoreographyMode, Config};
use crate::domains::choreography::{
    generate_bounce_schedule, generate_schedule, selector_for, AgentMap, AnalysisSource,
    AudioAnalysis, PrimitiveLibrary, PrimitiveSource, Schedule, BUILTIN_LIBRARY,
};
use crate::domains::fleet::{
    agent_queues, AbortHandle, Actuator, AgentId, AgentWorker, DispatchReport, Dispatcher,
    ReadinessCheck, RunOutcome, WorkerReport,
};
use crate::domains::logger::{DynLogger, ScopedLogger};

/// Actuator per fleet agent.
pub type ActuatorSet = BTreeMap<AgentId, Arc<dyn Actuator>>;

#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcome: RunOutcome,
    pub dispatch: DispatchReport,
    pub workers: Vec<WorkerReport>,
}

impl RunReport {
    pub fn worker(&self, agent: AgentId) -> Option<&WorkerReport> {
        self.workers.iter().find(|w| w.agent == agent)
    }

    pub fn summary(&self) -> String {
        let executed: usize = self.workers.iter().map(|w| w.executed).sum();
        let skipped: usize = self.workers.iter().map(|w| w.skipped).sum();
        format!(
            "run {} {:?} after step {}: {} delivered, {} executed, {} skipped across {} agents",
            self.run_id,
            self.outcome,
            self.dispatch.final_step,
            self.dispatch.delivered(),
            executed,
            skipped,
            self.workers.len()
        )
    }
}

/// A choreography run in progress.
pub struct RunHandle {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    abort: AbortHandle,
    dispatcher: JoinHandle<DispatchReport>,
    workers: Vec<JoinHandle<WorkerReport>>,
    logger: DynLogger,
}

impl RunHandle {
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Stops dispatch at the next opportunity; every agent still receives quit.
    pub fn abort(&self) {
        self.abort.abort();
    }

    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    pub async fn wait(self) -> ApplicationResult<RunReport> {
        let dispatch = self
            .dispatcher
            .await
            .map_err(|e| ApplicationError::Runtime(format!("dispatcher task failed: {}", e)))?;

        let mut workers = Vec::with_capacity(self.workers.len());
        for handle in self.workers {
            let report = handle
                .await
                .map_err(|e| ApplicationError::Runtime(format!("agent worker task failed: {}", e)))?;
            workers.push(report);
        }

        let report = RunReport {
            run_id: self.run_id,
            started_at: self.started_at,
            finished_at: Utc::now(),
            outcome: dispatch.outcome,
            dispatch,
            workers,
        };
        self.logger.info(&report.summary());
        Ok(report)
    }
}

/// Builds schedules from analyses and runs them against a fleet.
pub struct ChoreographyService {
    config: Config,
    library: PrimitiveLibrary,
    logger: DynLogger,
}

impl ChoreographyService {
    pub fn new(config: Config, logger: DynLogger) -> Self {
        Self {
            config,
            library: BUILTIN_LIBRARY.clone(),
            logger,
        }
    }

    pub fn with_library(mut self, library: PrimitiveLibrary) -> Self {
        self.library = library;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn library(&self) -> &PrimitiveLibrary {
        &self.library
    }

    /// Adds the primitives from every configured primitive file.
    pub fn load_primitive_files(&mut self, source: &dyn PrimitiveSource) -> ApplicationResult<usize> {
        let mut total = 0;
        for path in &self.config.choreography.primitive_files {
            let name = path.to_string_lossy();
            let json = source.load_primitives(&name)?;
            let added = self.library.extend_from_json(&json)?;
            self.logger.info(&format!("Loaded {} primitives from {}", added, name));
            total += added;
        }
        Ok(total)
    }

    pub fn load_analysis(&self, source: &dyn AnalysisSource) -> ApplicationResult<AudioAnalysis> {
        let name = self.config.choreography.analysis_path.to_string_lossy();
        let analysis = source
            .load_analysis(&name)
            .map_err(|e| ApplicationError::Analysis(format!("{}: {}", name, e)))?;
        self.logger.info(&format!(
            "Loaded analysis {} ({} sections, {} beats)",
            name,
            analysis.sections.len(),
            analysis.beats.len()
        ));
        Ok(analysis)
    }

    /// Builds, frames and validates the schedule for `analysis`.
    ///
    /// Nothing is dispatched here; any error leaves no schedule behind.
    pub fn build_schedule(&self, analysis: &AudioAnalysis) -> ApplicationResult<Schedule> {
        self.config.validate()?;
        let choreo = &self.config.choreography;
        let fleet = self.config.fleet.ids();
        let agent_map = AgentMap::from_fleet(&self.config.fleet);

        let schedule = match choreo.mode {
            ChoreographyMode::Sections => {
                let mut selector = selector_for(
                    choreo.selection.policy,
                    &choreo.default_primitive,
                    &choreo.selection.primitives,
                    choreo.selection.seed,
                )?;
                generate_schedule(&self.library, &analysis.sections, selector.as_mut(), &agent_map)?
            }
            ChoreographyMode::Beats => generate_bounce_schedule(
                &analysis.beats,
                &agent_map,
                &choreo.bounce,
                choreo.descend_policy,
            )?,
        };

        let schedule = schedule.framed(&fleet, choreo.takeoff, choreo.landing);
        schedule.ensure_agents(&fleet)?;

        if let Some(max_speed) = choreo.max_speed {
            for v in schedule.speed_violations(max_speed) {
                self.logger.warn(&format!(
                    "Agent {} needs {:.2} m/s at t={:.2}s to cover {:.2} m (limit {:.2} m/s)",
                    v.agent, v.speed, v.time, v.distance, max_speed
                ));
            }
        }

        self.logger.info(&format!(
            "Built schedule: {} entries for {} agents, ends at {:.2}s",
            schedule.len(),
            schedule.agents().len(),
            schedule.end_time()
        ));
        Ok(schedule)
    }

    /// Runs the readiness check for every fleet agent, in configuration order.
    pub async fn prepare(&self, readiness: &dyn ReadinessCheck) -> ApplicationResult<()> {
        for agent in &self.config.fleet.agents {
            readiness
                .wait_until_ready(agent)
                .await
                .map_err(|reason| ApplicationError::NotReady {
                    agent: agent.id.value(),
                    reason,
                })?;
        }
        self.logger.info(&format!("{} agents ready", self.config.fleet.agents.len()));
        Ok(())
    }

    /// Spawns one worker per fleet agent and the dispatcher. Requires a tokio runtime.
    pub fn start(&self, schedule: Schedule, mut actuators: ActuatorSet) -> ApplicationResult<RunHandle> {
        let fleet = self.config.fleet.ids();
        schedule.ensure_agents(&fleet)?;
        let tick_width = self.config.dispatch.tick_width()?;

        let mut bound = Vec::with_capacity(fleet.len());
        for agent in &fleet {
            let actuator = actuators.remove(agent).ok_or_else(|| ApplicationError::NotReady {
                agent: agent.value(),
                reason: "no actuator bound".to_string(),
            })?;
            bound.push((*agent, actuator));
        }

        let run_id = Uuid::new_v4();
        let logger = ScopedLogger::new(self.logger.clone(), format!("run {}", run_id)).into_dyn();
        let (queues, mut inboxes) = agent_queues(fleet.iter().copied());

        let mut workers = Vec::with_capacity(bound.len());
        for (agent, actuator) in bound {
            if let Some(inbox) = inboxes.remove(&agent) {
                let worker = AgentWorker::new(agent, inbox, actuator, logger.clone());
                workers.push(tokio::spawn(worker.run()));
            }
        }

        let (abort, abort_rx) = AbortHandle::new();
        logger.info(&format!(
            "Starting dispatch of {} entries to {} agents, tick {:?}",
            schedule.len(),
            workers.len(),
            tick_width
        ));
        let dispatcher = tokio::spawn(Dispatcher::new(schedule, queues, tick_width, abort_rx).run());

        Ok(RunHandle {
            run_id,
            started_at: Utc::now(),
            abort,
            dispatcher,
            workers,
            logger,
        })
    }

    pub async fn run(&self, schedule: Schedule, actuators: ActuatorSet) -> ApplicationResult<RunReport> {
        self.start(schedule, actuators)?.wait().await
    }
}
