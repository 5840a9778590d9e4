use hardware::resources::MachineResources;
use indexmap::IndexSet;
use pnp::job::Job;
use pnp::library::PartLibrary;

use crate::config::JobProcessorConfig;
use crate::error::ConfigurationIssue;

/// Checks a job against the parts and the machine setup, all issues are returned, in job order.
pub fn validate_job(
    job: &Job,
    parts: &PartLibrary,
    resources: &MachineResources,
    config: &JobProcessorConfig,
) -> Vec<ConfigurationIssue> {
    let mut issues = vec![];

    if resources.nozzles().next().is_none() {
        issues.push(ConfigurationIssue::NoNozzles);
    }
    for nozzle in resources.nozzles() {
        if let Some(part) = &nozzle.part {
            issues.push(ConfigurationIssue::NozzleOccupied {
                nozzle: nozzle.id.clone(),
                part: part.clone(),
            });
        }
    }

    let mut part_ids = IndexSet::new();
    for board_location in job.enabled_board_locations() {
        for placement in board_location
            .board
            .duplicate_placement_ids()
        {
            issues.push(ConfigurationIssue::DuplicatePlacement {
                board: board_location.board.name.clone(),
                placement: placement.clone(),
            });
        }

        for placement in board_location.placeable_placements() {
            if parts.get(&placement.part_id).is_none() {
                issues.push(ConfigurationIssue::UnknownPart {
                    placement: placement.id.clone(),
                    part: placement.part_id.clone(),
                });
                continue;
            }
            part_ids.insert(&placement.part_id);
        }
    }

    for part in part_ids
        .into_iter()
        .filter_map(|part_id| parts.get(part_id))
    {
        if part.height <= 0.0 {
            issues.push(ConfigurationIssue::InvalidPartHeight {
                part: part.id.clone(),
                height: part.height,
            });
        }

        if resources
            .feeders_for(&part.id)
            .next()
            .is_none()
        {
            issues.push(ConfigurationIssue::NoFeeder {
                part: part.id.clone(),
            });
        }

        if config.alignment.enabled
            && config
                .alignment
                .settings_for(part)
                .is_none()
        {
            issues.push(ConfigurationIssue::MissingVisionSettings {
                part: part.id.clone(),
            });
        }
    }

    issues
}
