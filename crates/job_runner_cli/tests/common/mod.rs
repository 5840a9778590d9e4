#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use serde_json::{json, Value};
use tempfile::TempDir;

pub fn pose(x: f64, y: f64, rotation: f64) -> Value {
    json!({ "x": x, "y": y, "z": 0.0, "rotation": rotation })
}

pub fn placement(id: &str, part_id: &str, x: f64, y: f64) -> Value {
    json!({ "id": id, "part_id": part_id, "pose": pose(x, y, 0.0), "side": "top" })
}

/// One head with one nozzle, one feeder for `P1`, and one board with the given placements.
pub fn scenario(placements: Vec<Value>, pick_results: Vec<bool>) -> Value {
    json!({
        "config": {
            "retry": { "max_pick_attempts": 3 },
            "discard_pose": pose(0.0, 300.0, 0.0)
        },
        "parts": [
            {
                "id": "P1",
                "package": { "name": "0603", "body_width": 0.8, "body_length": 1.6 },
                "height": 0.5
            }
        ],
        "heads": [
            { "id": "H1", "nozzles": ["N1"] }
        ],
        "feeders": [
            {
                "id": "F1",
                "part_id": "P1",
                "enabled": true,
                "pick_pose": { "x": 200.0, "y": 20.0, "z": -1.0, "rotation": 0.0 },
                "pitch": [4.0, 0.0],
                "capacity": 100
            }
        ],
        "job": {
            "name": "job_1",
            "board_locations": [
                {
                    "board": { "name": "board_1", "width": 50.0, "placements": placements },
                    "pose": pose(0.0, 0.0, 0.0),
                    "side": "top"
                }
            ]
        },
        "simulation": {
            "pick_results": pick_results
        }
    })
}

pub fn write_scenario(temp_dir: &TempDir, scenario: &Value) -> PathBuf {
    let mut path = PathBuf::from(temp_dir.path());
    path.push("scenario.json");

    fs::write(&path, serde_json::to_string_pretty(scenario).unwrap()).unwrap();
    println!("scenario: {}", path.display());

    path
}
