//! File templates written by the Spine tools

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

/// Minimal project seeded into a freshly created examples directory
pub fn example_project() -> Value {
    json!({
        "skeleton": {"hash": "example", "spine": "4.0", "width": 100, "height": 100},
        "bones": [{"name": "root"}],
        "slots": [],
        "skins": [{"name": "default", "attachments": {}}],
        "animations": {"example": {}}
    })
}

/// Placeholder texture atlas for the `atlas` export format
pub fn atlas(output_name: &str) -> String {
    format!(
        "{}.png\n\
         size: 512,512\n\
         format: RGBA8888\n\
         filter: Linear,Linear\n\
         repeat: none\n\
         bone1\n  rotate: false\n  xy: 0, 0\n  size: 64, 64\n  orig: 64, 64\n  offset: 0, 0\n  index: -1",
        output_name
    )
}

fn bone(name: &str, parent: &str, x: i32, y: i32) -> Value {
    json!({"name": name, "parent": parent, "x": x, "y": y, "scaleX": 1, "scaleY": 1})
}

fn region(x: i32, y: i32, width: u32, height: u32, color: &str) -> Value {
    json!({"x": x, "y": y, "width": width, "height": height, "color": color})
}

fn rotate(keys: &[(f64, f64)]) -> Value {
    let frames: Vec<Value> = keys
        .iter()
        .map(|(time, angle)| json!({"time": time, "angle": angle}))
        .collect();
    json!({ "rotate": frames })
}

/// Humanoid skeleton with `idle` and `walk` animations
///
/// Seven bones under `root`, one slot per visible bone and a `default`
/// skin of colored regions.
pub fn humanoid(name: &str, description: &str, now: DateTime<Utc>) -> Value {
    let parts = ["body", "head", "arm_left", "arm_right", "leg_left", "leg_right"];
    let slots: Vec<Value> = parts
        .iter()
        .map(|part| json!({"name": format!("{}_slot", part), "bone": part, "attachment": part}))
        .collect();

    let regions = [
        region(0, 0, 100, 150, "ff0000ff"),
        region(0, 0, 80, 80, "ffff00ff"),
        region(0, -20, 25, 80, "0000ffff"),
        region(0, -20, 25, 80, "0000ffff"),
        region(0, -40, 30, 100, "00ff00ff"),
        region(0, -40, 30, 100, "00ff00ff"),
    ];
    let mut attachments = serde_json::Map::new();
    for (part, region) in parts.iter().zip(regions) {
        attachments.insert(format!("{}_slot", part), json!({ *part: region }));
    }

    json!({
        "skeleton": {
            "hash": format!("{:x}", now.timestamp_millis()),
            "spine": "4.0",
            "width": 500,
            "height": 500,
            "images": "./images/",
            "audio": ""
        },
        "bones": [
            {"name": "root"},
            bone("body", "root", 0, 0),
            bone("head", "body", 0, 50),
            bone("arm_left", "body", -30, 30),
            bone("arm_right", "body", 30, 30),
            bone("leg_left", "body", -15, -40),
            bone("leg_right", "body", 15, -40)
        ],
        "slots": slots,
        "skins": [{"name": "default", "attachments": attachments}],
        "animations": {
            "idle": {
                "bones": {
                    "body": {
                        "translate": [
                            {"time": 0, "x": 0, "y": 0},
                            {"time": 1, "x": 0, "y": 10},
                            {"time": 2, "x": 0, "y": 0}
                        ],
                        "scale": [
                            {"time": 0, "x": 1, "y": 1},
                            {"time": 1, "x": 1.05, "y": 0.95},
                            {"time": 2, "x": 1, "y": 1}
                        ]
                    },
                    "head": rotate(&[(0.0, 0.0), (0.5, 5.0), (1.5, -5.0), (2.0, 0.0)]),
                    "arm_left": rotate(&[(0.0, 0.0), (1.0, 15.0), (2.0, 0.0)]),
                    "arm_right": rotate(&[(0.0, 0.0), (1.0, -15.0), (2.0, 0.0)])
                }
            },
            "walk": {
                "bones": {
                    "body": {
                        "translate": [
                            {"time": 0, "x": 0, "y": 0},
                            {"time": 0.25, "x": 0, "y": 5},
                            {"time": 0.5, "x": 0, "y": 0},
                            {"time": 0.75, "x": 0, "y": 5},
                            {"time": 1, "x": 0, "y": 0}
                        ]
                    },
                    "leg_left": rotate(&[(0.0, -15.0), (0.5, 15.0), (1.0, -15.0)]),
                    "leg_right": rotate(&[(0.0, 15.0), (0.5, -15.0), (1.0, 15.0)]),
                    "arm_left": rotate(&[(0.0, 15.0), (0.5, -15.0), (1.0, 15.0)]),
                    "arm_right": rotate(&[(0.0, -15.0), (0.5, 15.0), (1.0, -15.0)])
                }
            }
        },
        "metadata": {
            "name": name,
            "description": description,
            "created": now.to_rfc3339(),
            "version": "1.0.0"
        }
    })
}
