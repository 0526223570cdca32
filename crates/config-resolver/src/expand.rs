use toml::Value;

use crate::error::ConfigError;

/// Merge `override_doc` onto `base`, override winning key-by-key one level
/// deep into tables; arrays and scalars are replaced wholesale, never
/// concatenated.
pub fn merge(base: Value, override_doc: Option<Value>) -> Value {
    let Some(over) = override_doc else {
        return base;
    };
    match (base, over) {
        (Value::Table(mut base_tbl), Value::Table(over_tbl)) => {
            for (k, v) in over_tbl {
                match (base_tbl.get(&k), &v) {
                    (Some(Value::Table(_)), Value::Table(_)) => {
                        let existing = base_tbl.remove(&k).unwrap();
                        base_tbl.insert(k, merge(existing, Some(v)));
                    }
                    _ => {
                        base_tbl.insert(k, v);
                    }
                }
            }
            Value::Table(base_tbl)
        }
        (_, over) => over,
    }
}

/// Recursively expand `${PROJECT_ROOT}` and `${ENV:NAME}` tokens in every
/// string leaf. `required_env` lists dotted paths (not enforced here beyond
/// the token itself being present — missing-required-secret detection
/// happens wherever the typed model declares a field as required and finds
/// it absent after expansion) whose `${ENV:NAME}` reference must resolve or
/// expansion fails fast.
pub fn expand(value: Value, project_root: &str) -> Result<Value, ConfigError> {
    match value {
        Value::String(s) => Ok(Value::String(expand_string(&s, project_root)?)),
        Value::Array(items) => {
            let expanded = items
                .into_iter()
                .map(|v| expand(v, project_root))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(expanded))
        }
        Value::Table(tbl) => {
            let mut out = toml::map::Map::new();
            for (k, v) in tbl {
                out.insert(k, expand(v, project_root)?);
            }
            Ok(Value::Table(out))
        }
        other => Ok(other),
    }
}

fn expand_string(input: &str, project_root: &str) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("${") {
        let Some(end_rel) = rest[start..].find('}') else {
            out.push_str(rest);
            rest = "";
            break;
        };
        let end = start + end_rel;
        out.push_str(&rest[..start]);
        let token = &rest[start + 2..end];
        if token == "PROJECT_ROOT" {
            out.push_str(project_root);
        } else if let Some(name) = token.strip_prefix("ENV:") {
            let value = std::env::var(name).map_err(|_| ConfigError::MissingEnv(name.to_owned()))?;
            out.push_str(&value);
        } else {
            // Unknown token syntax: leave verbatim, it is not one of ours.
            out.push_str(&rest[start..=end]);
        }
        rest = &rest[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_project_root() {
        let s = expand_string("${PROJECT_ROOT}/data", "/srv/robot").unwrap();
        assert_eq!(s, "/srv/robot/data");
    }

    #[test]
    fn expands_env_var() {
        unsafe { std::env::set_var("CFG_TEST_TOKEN", "secret123") };
        let s = expand_string("bearer ${ENV:CFG_TEST_TOKEN}", "/x").unwrap();
        assert_eq!(s, "bearer secret123");
        unsafe { std::env::remove_var("CFG_TEST_TOKEN") };
    }

    #[test]
    fn missing_env_fails_fast() {
        unsafe { std::env::remove_var("CFG_TEST_MISSING_XYZ") };
        let err = expand_string("${ENV:CFG_TEST_MISSING_XYZ}", "/x").unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnv(name) if name == "CFG_TEST_MISSING_XYZ"));
    }

    #[test]
    fn merge_override_wins_scalar() {
        let base: Value = toml::from_str("a = 1\nb = 2").unwrap();
        let over: Value = toml::from_str("b = 3").unwrap();
        let merged = merge(base, Some(over));
        assert_eq!(merged.get("a").unwrap().as_integer(), Some(1));
        assert_eq!(merged.get("b").unwrap().as_integer(), Some(3));
    }

    #[test]
    fn merge_nested_table_one_level() {
        let base: Value = toml::from_str("[ipc]\nupstream = \"a\"\nhwm = 1000").unwrap();
        let over: Value = toml::from_str("[ipc]\nhwm = 50").unwrap();
        let merged = merge(base, Some(over));
        let ipc = merged.get("ipc").unwrap();
        assert_eq!(ipc.get("upstream").unwrap().as_str(), Some("a"));
        assert_eq!(ipc.get("hwm").unwrap().as_integer(), Some(50));
    }

    #[test]
    fn merge_array_replaces_not_concatenates() {
        let base: Value = toml::from_str("xs = [1, 2, 3]").unwrap();
        let over: Value = toml::from_str("xs = [9]").unwrap();
        let merged = merge(base, Some(over));
        assert_eq!(merged.get("xs").unwrap().as_array().unwrap().len(), 1);
    }
}
