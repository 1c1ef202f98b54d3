use jewelbots::game_logic::errors::{JewelbotsError, JewelbotsResult};

/// Generic parser for delimited strings that return tuples
pub fn parse_delimited<T, const N: usize>(
    input: &str,
    delimiter: char,
    type_name: &str,
    parser: impl Fn(&str) -> Option<T>,
) -> JewelbotsResult<[T; N]>
where
    T: Copy + Default,
{
    let parts: Vec<&str> = input.split(delimiter).collect();
    if parts.len() != N {
        return Err(JewelbotsError::InvalidMapData {
            reason: format!(
                "Invalid {type_name} format '{input}'. Expected {N} {delimiter}-separated values"
            ),
        });
    }

    let mut result = [T::default(); N];
    for (i, part) in parts.iter().enumerate() {
        result[i] = parser(part.trim()).ok_or_else(|| JewelbotsError::InvalidMapData {
            reason: format!("Invalid {type_name} value: '{part}'"),
        })?;
    }

    Ok(result)
}

/// Parse size string "WIDTHxHEIGHT" with validation
pub fn parse_size(size_str: &str) -> JewelbotsResult<(u32, u32)> {
    let [width, height] = parse_delimited::<u32, 2>(size_str, 'x', "size", |s| s.parse().ok())?;

    if width < 5 || height < 5 {
        return Err(JewelbotsError::InvalidMapData {
            reason: "Width and height must be at least 5 to leave room inside the walls"
                .to_string(),
        });
    }

    if width > 1024 || height > 1024 {
        return Err(JewelbotsError::InvalidMapData {
            reason: "Width and height must not exceed 1024".to_string(),
        });
    }

    Ok((width, height))
}

/// Parse origin string "X,Y,Z"
pub fn parse_origin(origin_str: &str) -> JewelbotsResult<[f32; 3]> {
    parse_delimited::<f32, 3>(origin_str, ',', "origin", |s| {
        s.parse::<f32>().ok().filter(|v| v.is_finite())
    })
}

/// Validate and clamp a shelf density to [0.0, 1.0]
pub fn validate_density(density: f32) -> f32 {
    if density.is_nan() {
        return 0.0;
    }
    density.clamp(0.0, 1.0)
}

/// Reject output paths that would escape the maps directory
pub fn validate_output_path(filename: &str) -> JewelbotsResult<()> {
    let path = std::path::Path::new(filename);
    if path.is_absolute() {
        return Err(JewelbotsError::InvalidMapData {
            reason: format!(
                "Output path must be relative to the maps/ directory, got absolute path: {filename}"
            ),
        });
    }

    if filename.contains("..") {
        return Err(JewelbotsError::InvalidMapData {
            reason: "Output path cannot contain '..'".to_string(),
        });
    }

    Ok(())
}
