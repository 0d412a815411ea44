use indexmap::IndexMap;
use log::warn;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::report::MeasurementDocument;

pub const VALUES_KEY: &str = "Values";
pub const ANNOTATIONS_KEY: &str = "Annotations";
pub const ANNOTATED_VALUES_KEY: &str = "AnnotatedValues";

/// Values grouped by their annotation, keys in first-seen order.
pub type AnnotatedValues = IndexMap<String, Vec<Value>>;

/// One output object of `measurements.json`.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct MeasurementSet {
    #[serde(rename = "Measurements")]
    pub measurements: Vec<Map<String, Value>>,
}

impl MeasurementSet {
    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }
}

/// Groups `values[i]` under `annotations[i]`.
///
/// Values beyond the last annotation are not grouped.
pub fn group_by_annotation(annotations: &[&str], values: &[Value]) -> AnnotatedValues {
    let mut grouped = AnnotatedValues::new();
    for (annotation, value) in annotations.iter().zip(values) {
        grouped
            .entry((*annotation).to_string())
            .or_default()
            .push(value.clone());
    }
    grouped
}

fn array_field<'a>(
    fields: &'a Map<String, Value>,
    key: &str,
    document: usize,
    measurement: usize,
) -> Result<&'a [Value]> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(Error::InvalidMeasurement {
            document,
            measurement,
            reason: format!("`{key}` is not an array"),
        }),
    }
}

/// Returns a copy of `fields` with `AnnotatedValues` added.
///
/// `document` and `measurement` locate the measurement for error reporting.
pub fn annotate_measurement(
    fields: &Map<String, Value>,
    document: usize,
    measurement: usize,
) -> Result<Map<String, Value>> {
    let values = array_field(fields, VALUES_KEY, document, measurement)?;
    let annotations = array_field(fields, ANNOTATIONS_KEY, document, measurement)?
        .iter()
        .map(|a| {
            a.as_str().ok_or_else(|| Error::InvalidMeasurement {
                document,
                measurement,
                reason: format!("annotation {a} is not a string"),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if values.len() < annotations.len() {
        return Err(Error::LengthMismatch {
            document,
            measurement,
            values: values.len(),
            annotations: annotations.len(),
        });
    }
    if values.len() > annotations.len() {
        warn!(
            "document {document}, measurement {measurement}: {} trailing values have no annotation",
            values.len() - annotations.len()
        );
    }

    let grouped: Map<String, Value> = group_by_annotation(&annotations, values)
        .into_iter()
        .map(|(key, group)| (key, Value::Array(group)))
        .collect();

    let mut annotated = fields.clone();
    annotated.insert(ANNOTATED_VALUES_KEY.to_string(), Value::Object(grouped));
    Ok(annotated)
}

/// Builds one [`MeasurementSet`] per document, measurements in the same order.
pub fn annotate_documents(documents: &[MeasurementDocument]) -> Result<Vec<MeasurementSet>> {
    documents
        .iter()
        .enumerate()
        .map(|(document, doc)| {
            let measurements = doc
                .measurements
                .iter()
                .enumerate()
                .map(|(measurement, value)| match value {
                    Value::Object(fields) => annotate_measurement(fields, document, measurement),
                    _ => Err(Error::InvalidMeasurement {
                        document,
                        measurement,
                        reason: "measurement is not an object".to_string(),
                    }),
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(MeasurementSet { measurements })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    fn document(measurements: Value) -> MeasurementDocument {
        serde_json::from_value(json!({ "Measurements": measurements })).unwrap()
    }

    #[test]
    fn groups_in_first_seen_order() {
        let grouped = group_by_annotation(&["a", "b", "a"], &[json!(1), json!(2), json!(3)]);
        assert_eq!(grouped.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(grouped["a"], vec![json!(1), json!(3)]);
        assert_eq!(grouped["b"], vec![json!(2)]);
    }

    #[test]
    fn key_order_follows_annotations() {
        let grouped = group_by_annotation(&["z", "a", "m", "a"], &vec![json!(0); 4]);
        assert_eq!(grouped.keys().collect::<Vec<_>>(), ["z", "a", "m"]);
    }

    #[test]
    fn keeps_original_fields() {
        let annotated = annotate_measurement(
            &fields(json!({
                "Name": "latency",
                "Values": ["x", "y"],
                "Annotations": ["k1", "k2"]
            })),
            0,
            0,
        )
        .unwrap();
        assert_eq!(
            Value::Object(annotated),
            json!({
                "Name": "latency",
                "Values": ["x", "y"],
                "Annotations": ["k1", "k2"],
                "AnnotatedValues": {"k1": ["x"], "k2": ["y"]}
            })
        );
    }

    #[test]
    fn overwrites_existing_annotated_values() {
        let annotated = annotate_measurement(
            &fields(json!({
                "AnnotatedValues": "stale",
                "Values": [1],
                "Annotations": ["a"]
            })),
            0,
            0,
        )
        .unwrap();
        assert_eq!(annotated.keys().next().unwrap(), ANNOTATED_VALUES_KEY);
        assert_eq!(annotated[ANNOTATED_VALUES_KEY], json!({"a": [1]}));
    }

    #[test]
    fn missing_arrays_give_empty_mapping() {
        let annotated = annotate_measurement(&fields(json!({"Name": "m"})), 0, 0).unwrap();
        assert_eq!(annotated[ANNOTATED_VALUES_KEY], json!({}));
    }

    #[test]
    fn too_few_values_is_an_error() {
        let err = annotate_measurement(
            &fields(json!({"Values": [1], "Annotations": ["a", "b"]})),
            3,
            1,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::LengthMismatch {
                document: 3,
                measurement: 1,
                values: 1,
                annotations: 2
            }
        ));
    }

    #[test]
    fn extra_values_are_not_grouped() {
        let annotated = annotate_measurement(
            &fields(json!({"Values": [1, 2, 3], "Annotations": ["a"]})),
            0,
            0,
        )
        .unwrap();
        assert_eq!(annotated[ANNOTATED_VALUES_KEY], json!({"a": [1]}));
        assert_eq!(annotated[VALUES_KEY], json!([1, 2, 3]));
    }

    #[test]
    fn non_string_annotation_is_an_error() {
        let err = annotate_measurement(
            &fields(json!({"Values": [1], "Annotations": [7]})),
            0,
            0,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidMeasurement { .. }));
    }

    #[test]
    fn one_set_per_document() {
        let docs = vec![
            document(json!([
                {"Values": [1, 2, 3], "Annotations": ["a", "b", "a"]},
                {"Values": [], "Annotations": []}
            ])),
            MeasurementDocument::default(),
        ];
        let sets = annotate_documents(&docs).unwrap();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].len(), 2);
        assert!(sets[1].is_empty());
        assert_eq!(
            sets[0].measurements[0][ANNOTATED_VALUES_KEY],
            json!({"a": [1, 3], "b": [2]})
        );
    }

    #[test]
    fn non_object_measurement_is_an_error() {
        let err = annotate_documents(&[document(json!([1]))]).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidMeasurement {
                document: 0,
                measurement: 0,
                ..
            }
        ));
    }

    #[test]
    fn grouped_numbers_are_exact_copies() {
        let doc: MeasurementDocument = serde_json::from_str(
            r#"{"Measurements": [{
                "Values": [1.1362275116276523e-8, 1.079907802215119e-66, 123456789012345678901234],
                "Annotations": ["t", "t", "n"]
            }]}"#,
        )
        .unwrap();
        let sets = annotate_documents(&[doc]).unwrap();
        let grouped = &sets[0].measurements[0][ANNOTATED_VALUES_KEY];
        assert_eq!(
            grouped["t"][0].as_f64().unwrap().to_bits(),
            1.1362275116276523e-8_f64.to_bits()
        );
        assert_eq!(
            grouped["t"][1].as_f64().unwrap().to_bits(),
            1.079907802215119e-66_f64.to_bits()
        );
        assert_eq!(
            serde_json::to_string(&grouped["n"]).unwrap(),
            "[123456789012345678901234]"
        );
    }

    #[test]
    fn serializes_with_measurements_key() {
        let sets = annotate_documents(&[MeasurementDocument::default()]).unwrap();
        assert_eq!(serde_json::to_value(&sets).unwrap(), json!([{"Measurements": []}]));
    }
}
