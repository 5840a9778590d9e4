use std::collections::HashMap;

use math::pose::Pose;

/// Parses comma separated 'key=value' pairs, e.g. 'x=1,y=2.5'.
///
/// All errors are collected, keys not in `required_keys` or `optional_keys` are rejected.
fn key_value_parser<'a>(
    s: &'a str,
    required_keys: &[&str],
    optional_keys: &[&str],
) -> Result<HashMap<&'a str, f64>, String> {
    let mut values = HashMap::new();
    let mut errors = Vec::new();

    for chunk in s.split(',') {
        let chunk_chunks: Vec<_> = chunk.split('=').collect();
        if chunk_chunks.len() != 2 {
            errors.push(format!(
                "Expected exactly 1 equal sign in '{}', found {}",
                chunk,
                chunk_chunks.len() - 1
            ));
            continue;
        }

        let key = chunk_chunks[0].trim();
        let value_str = chunk_chunks[1].trim();

        if !required_keys.contains(&key) && !optional_keys.contains(&key) {
            errors.push(format!("Invalid key: '{}'", key));
            continue;
        }

        match value_str.parse::<f64>() {
            Ok(value) => {
                values.insert(key, value);
            }
            Err(e) => {
                errors.push(format!("Failed to parse value for key '{}': {}", key, e));
            }
        }
    }

    let missing: Vec<_> = required_keys
        .iter()
        .filter(|key| !values.contains_key(**key))
        .copied()
        .collect();

    if !missing.is_empty() {
        errors.push(format!(
            "Missing/invalid keys: {}, expected keys: {}",
            missing.join(", "),
            required_keys.join(", ")
        ));
    }

    if !errors.is_empty() {
        return Err(errors.join("; "));
    }

    Ok(values)
}

/// e.g. 'x=10,y=20' or 'x=10,y=20,z=-5,rotation=90', `z` and `rotation` default to 0.
pub fn pose_parser(s: &str) -> Result<Pose, String> {
    let values = key_value_parser(s, &["x", "y"], &["z", "rotation"])?;
    let value_or_zero = |key: &str| {
        values
            .get(key)
            .copied()
            .unwrap_or_default()
    };

    Ok(Pose::new(values["x"], values["y"], value_or_zero("z"), value_or_zero("rotation")))
}
