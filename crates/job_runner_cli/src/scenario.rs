use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use hardware::resources::MachineResources;
use hardware::simulator::ScriptedVision;
use job_processor::config::JobProcessorConfig;
use math::pose::Pose;
use pnp::feeder::Feeder;
use pnp::head::{Head, HeadId};
use pnp::job::Job;
use pnp::library::PartLibrary;
use pnp::part::Part;
use serde::Deserialize;
use tracing::info;

/// Everything needed to run a job against the simulator.
#[derive(Debug, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: JobProcessorConfig,
    pub parts: Vec<Part>,
    pub heads: Vec<HeadDefinition>,
    pub feeders: Vec<Feeder>,
    pub job: Job,
    #[serde(default)]
    pub simulation: SimulationScript,
}

#[derive(Debug, Deserialize)]
pub struct HeadDefinition {
    pub id: HeadId,
    pub nozzles: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SimulationScript {
    /// Outcome of each pick in order, picks succeed once these are used up.
    #[serde(default)]
    pub pick_results: Vec<bool>,
    /// Result of each vision measurement in order, later measurements report no offset.
    #[serde(default)]
    pub vision: Vec<VisionScriptEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum VisionScriptEntry {
    Offset(Pose),
    Unavailable { unavailable: String },
}

impl Scenario {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path).with_context(|| format!("Unable to open scenario. path: {}", path.display()))?;
        let scenario: Scenario = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Unable to read scenario. path: {}", path.display()))?;

        info!(
            "Loaded scenario. path: {}, job: {}, parts: {}, feeders: {}",
            path.display(),
            scenario.job.name,
            scenario.parts.len(),
            scenario.feeders.len()
        );

        Ok(scenario)
    }

    pub fn part_library(&self) -> anyhow::Result<PartLibrary> {
        Ok(PartLibrary::try_from_parts(self.parts.clone())?)
    }

    pub fn machine_resources(&self) -> MachineResources {
        let heads = self
            .heads
            .iter()
            .map(|head| {
                let nozzle_ids: Vec<&str> = head
                    .nozzles
                    .iter()
                    .map(String::as_str)
                    .collect();
                Head::new(head.id.clone(), &nozzle_ids)
            })
            .collect();

        MachineResources::new(heads, self.feeders.clone())
    }

    pub fn vision(&self) -> ScriptedVision {
        self.simulation
            .vision
            .iter()
            .fold(ScriptedVision::new(), |vision, entry| match entry {
                VisionScriptEntry::Offset(offset) => vision.with_offset(*offset),
                VisionScriptEntry::Unavailable {
                    unavailable,
                } => vision.with_unavailable(unavailable),
            })
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    #[test]
    fn vision_script() {
        // given
        let content = indoc! {r#"
            {
                "pick_results": [false, true],
                "vision": [
                    { "x": 0.1, "y": -0.2, "z": 0.0, "rotation": 1.5 },
                    { "unavailable": "no part found" }
                ]
            }
        "#};

        // when
        let script: SimulationScript = serde_json::from_str(content).unwrap();

        // then
        assert_eq!(script.pick_results, vec![false, true]);
        assert!(matches!(
            script.vision[0],
            VisionScriptEntry::Offset(offset) if offset == Pose::new(0.1, -0.2, 0.0, 1.5)
        ));
        assert!(matches!(
            &script.vision[1],
            VisionScriptEntry::Unavailable { unavailable } if unavailable == "no part found"
        ));
    }
}
