use job_processor::event::JobEventRecord;

/// One line per event, printed to stdout.
pub fn format_event(event: &JobEventRecord) -> String {
    match event {
        JobEventRecord::JobLoaded {
            job,
        } => format!("Job loaded. job: {}", job),
        JobEventRecord::JobStateChanged(state) => format!("Job state changed. state: {}", state),
        JobEventRecord::JobEncounteredError(failure) => format!(
            "Job encountered error. error: {}, description: {}",
            failure.error, failure.description
        ),
        JobEventRecord::BoardProcessingStarted {
            board,
        } => format!("Board processing started. board: {}", board),
        JobEventRecord::PartProcessingStarted {
            board,
            placement,
        } => format!("Part processing started. board: {}, placement: {}", board, placement),
        JobEventRecord::PartPicked {
            board,
            placement,
        } => format!("Part picked. board: {}, placement: {}", board, placement),
        JobEventRecord::PartPlaced {
            board,
            placement,
            pose,
        } => format!("Part placed. board: {}, placement: {}, pose: {}", board, placement, pose),
        JobEventRecord::PartProcessingCompleted {
            board,
            placement,
        } => format!("Part processing completed. board: {}, placement: {}", board, placement),
        JobEventRecord::PartSkipped {
            board,
            placement,
        } => format!("Part skipped. board: {}, placement: {}", board, placement),
        JobEventRecord::DetailedStatusUpdated(status) => format!("Status. {}", status),
    }
}
