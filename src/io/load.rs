//! Read results JSON into a [`Fits`] tree.
//!
//! Classification order for each JSON node:
//!
//! 1. an object with a string `"type"` member is a leaf, decoded by the
//!    registry (an unregistered type is an error, not a dictionary)
//! 2. any other object is a keyed collection, in member order
//! 3. an array is a sequence
//! 4. anything else is rejected

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::Value as Json;

use crate::domain::Fits;
use crate::error::{Result, TidyError};
use crate::registry::Registry;

/// Member naming the leaf type of a result object.
pub const TYPE_MEMBER: &str = "type";

/// Read and classify a results JSON file.
pub fn read_fits_json(path: &Path, registry: &Registry) -> Result<Fits> {
    let file = File::open(path).map_err(|source| TidyError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let json: Json = serde_json::from_reader(BufReader::new(file))?;
    let fits = fits_from_json(json, registry)?;
    tracing::debug!(path = %path.display(), depth = fits.depth(), "loaded results");
    Ok(fits)
}

/// Classify an already parsed JSON value.
pub fn fits_from_json(json: Json, registry: &Registry) -> Result<Fits> {
    match json {
        Json::Object(members) => {
            let tag = members.get(TYPE_MEMBER).and_then(Json::as_str).map(str::to_owned);
            if let Some(tag) = tag {
                return registry.decode(&tag, Json::Object(members)).map(Fits::Leaf);
            }
            let entries = members
                .into_iter()
                .map(|(key, value)| Ok((key, fits_from_json(value, registry)?)))
                .collect::<Result<Vec<_>>>()?;
            Ok(Fits::dict(entries))
        }
        Json::Array(items) => {
            let items = items
                .into_iter()
                .map(|item| fits_from_json(item, registry))
                .collect::<Result<Vec<_>>>()?;
            Ok(Fits::List(items))
        }
        other => Err(TidyError::UnsupportedJson {
            found: json_kind(&other).to_string(),
        }),
    }
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serde_json::json;

    use super::*;
    use crate::domain::{Key, LeafType};
    use crate::models::{builtin_collaborators, fixtures, MinimizerResult, OptimizeResult};

    fn builtin() -> Registry {
        Registry::with_collaborators(&builtin_collaborators())
    }

    fn optimize_json() -> Json {
        let mut value = serde_json::to_value(fixtures::optimize_result(2, 4)).unwrap();
        value[TYPE_MEMBER] = json!("OptimizeResult");
        value
    }

    #[test]
    fn registered_object_is_a_leaf() {
        let fits = fits_from_json(optimize_json(), &builtin()).unwrap();
        match fits {
            Fits::Leaf(result) => assert_eq!(result.type_tag(), OptimizeResult::TAG),
            other => panic!("expected a leaf, got {other:?}"),
        }
    }

    #[test]
    fn other_objects_are_dicts_in_member_order() {
        let json = json!({"zeta": optimize_json(), "alpha": [optimize_json(), optimize_json()]});
        let fits = fits_from_json(json, &builtin()).unwrap();

        let keys: Vec<Key> = fits.entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![Key::Name("zeta".into()), Key::Name("alpha".into())]);
        assert_eq!(fits.depth(), 2);
    }

    #[test]
    fn scalars_and_unknown_types_are_rejected() {
        let registry = builtin();
        let err = fits_from_json(json!([1, 2]), &registry).unwrap_err();
        assert!(matches!(err, TidyError::UnsupportedJson { ref found } if found == "number"), "got {err}");

        let err = fits_from_json(json!({"type": "Histogram", "bins": []}), &registry).unwrap_err();
        assert!(err.to_string().contains("Histogram"), "got {err}");
    }

    #[test]
    fn malformed_leaf_reports_decoding_error() {
        let err = fits_from_json(json!({"type": "MinimizerResult", "params": []}), &builtin()).unwrap_err();
        assert!(matches!(err, TidyError::Json(_)), "got {err}");
    }

    #[test]
    fn reads_files_and_names_missing_paths() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let mut leaf = serde_json::to_value(fixtures::minimizer_result(2)).unwrap();
        leaf[TYPE_MEMBER] = json!(MinimizerResult::TAG.name());
        write!(file, "{}", json!([leaf])).unwrap();

        let fits = read_fits_json(file.path(), &builtin()).unwrap();
        assert_eq!(fits.len(), 1);

        let missing = file.path().with_extension("missing");
        match read_fits_json(&missing, &builtin()) {
            Err(TidyError::Io { path, .. }) => assert_eq!(path, missing),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
