use shared::{EngineError, EngineResult};
use std::collections::BTreeSet;

use super::entities::RosterInput;

/// Pre-flight input validation, run before any solver work.
///
/// Shape errors in the domain data (duplicate names, demand or availability
/// referencing an unknown hospital) are `Validation`; dangling references
/// in operator-supplied tables (preferences, caps) are `Config`.
pub fn validate_input(input: &RosterInput) -> EngineResult<()> {
    let mut hospitals = BTreeSet::new();
    for hospital in &input.hospitals {
        if !hospitals.insert(hospital.name.as_str()) {
            return Err(EngineError::Validation(format!(
                "Duplicate hospital name: {}",
                hospital.name
            )));
        }
    }

    let mut workers = BTreeSet::new();
    for worker in &input.workers {
        if !workers.insert(worker.name.as_str()) {
            return Err(EngineError::Validation(format!(
                "Duplicate worker name: {}",
                worker.name
            )));
        }
    }

    for worker in &input.workers {
        for rule in &worker.rules {
            if !hospitals.contains(rule.hospital.as_str()) {
                return Err(EngineError::Validation(format!(
                    "Availability of worker {} references unknown hospital {}",
                    worker.name, rule.hospital
                )));
            }
        }
    }

    for specified in &input.specified_days {
        if !hospitals.contains(specified.hospital.as_str()) {
            return Err(EngineError::Validation(format!(
                "Specified day {} references unknown hospital {}",
                specified.date, specified.hospital
            )));
        }
    }

    if let Some(preferences) = &input.preferences {
        for entry in preferences.entries() {
            if !workers.contains(entry.worker.as_str()) {
                return Err(EngineError::Config(format!(
                    "Preference on {} references unknown worker {}",
                    entry.date, entry.worker
                )));
            }
        }
    }

    if let Some(caps) = &input.caps {
        let mut seen = BTreeSet::new();
        for entry in caps.entries() {
            if !workers.contains(entry.worker.as_str()) {
                return Err(EngineError::Config(format!(
                    "Cap references unknown worker {}",
                    entry.worker
                )));
            }
            if !hospitals.contains(entry.hospital.as_str()) {
                return Err(EngineError::Config(format!(
                    "Cap references unknown hospital {}",
                    entry.hospital
                )));
            }
            if !seen.insert((entry.worker.as_str(), entry.hospital.as_str())) {
                return Err(EngineError::Config(format!(
                    "Duplicate cap for worker {} at hospital {}",
                    entry.worker, entry.hospital
                )));
            }
        }
    }

    Ok(())
}
