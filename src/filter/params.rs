use super::error::FilterError;

/// Parse a boolean-like query parameter. Absent or empty means `false`.
pub fn parse_flag(param: &str, value: Option<&str>) -> Result<bool, FilterError> {
    let Some(raw) = value else {
        return Ok(false);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        _ => Err(FilterError::InvalidFlag {
            param: param.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// Parse a comma separated list of ids such as `1,2,3`.
/// Absent or blank yields `None` so the caller can skip the filter entirely.
pub fn parse_id_list(param: &str, value: Option<&str>) -> Result<Option<Vec<i64>>, FilterError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }

    let mut ids = Vec::new();
    for part in raw.split(',') {
        let id = part.trim().parse::<i64>().map_err(|_| FilterError::InvalidIdList {
            param: param.to_string(),
            value: raw.to_string(),
        })?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(Some(ids))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_defaults_to_false() {
        assert_eq!(parse_flag("assigned_only", None), Ok(false));
        assert_eq!(parse_flag("assigned_only", Some("")), Ok(false));
        assert_eq!(parse_flag("assigned_only", Some("0")), Ok(false));
        assert_eq!(parse_flag("assigned_only", Some("False")), Ok(false));
    }

    #[test]
    fn flag_truthy_values() {
        for raw in ["1", "true", "TRUE", "yes", "on", " 1 "] {
            assert_eq!(parse_flag("assigned_only", Some(raw)), Ok(true), "{raw}");
        }
    }

    #[test]
    fn flag_rejects_garbage() {
        let err = parse_flag("assigned_only", Some("maybe")).unwrap_err();
        assert_eq!(err.param(), "assigned_only");
    }

    #[test]
    fn id_list_parses_and_dedups() {
        assert_eq!(parse_id_list("tags", Some("3, 1,3")), Ok(Some(vec![3, 1])));
        assert_eq!(parse_id_list("tags", None), Ok(None));
        assert_eq!(parse_id_list("tags", Some("  ")), Ok(None));
    }

    #[test]
    fn id_list_rejects_non_numeric() {
        assert!(parse_id_list("ingredients", Some("1,two")).is_err());
        assert!(parse_id_list("ingredients", Some("1,")).is_err());
    }
}
