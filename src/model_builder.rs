use std::collections::BTreeMap;
use serde_yaml::{Mapping, Value};
use tracing::debug;
use crate::{
    canonical::sorted_column_list,
    converter::{expect_mapping, expect_name, render, type_name, SchemaConversionError},
    records::{ColumnRecord, ModelRecord, TestEntry},
    test_kind::TestKind,
};

/// Collects the constraint declarations of one model and turns them into
/// per-column tests.
///
/// A builder lives for the conversion of a single model and owns every
/// column record it creates.
#[derive(Debug)]
pub struct ModelTestBuilder {
    model_name: String,
    columns: BTreeMap<String, ColumnRecord>,
    model_tests: Vec<TestEntry>,
}

impl ModelTestBuilder {
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            columns: BTreeMap::new(),
            model_tests: Vec::new(),
        }
    }

    /// Return the record for `column_name`, creating an empty one on first use
    pub fn get_column(&mut self, column_name: &str) -> &mut ColumnRecord {
        self.columns
            .entry(column_name.to_string())
            .or_insert_with(|| ColumnRecord::new(column_name))
    }

    pub fn add_test(&mut self, column_name: &str, test: TestEntry) {
        self.get_column(column_name).tests.push(test);
    }

    /// Each value is a column name; the kind itself becomes a bare test.
    pub fn handle_simple_column(&mut self, test_values: &[Value], test_kind: &str) -> Result<(), SchemaConversionError> {
        for value in test_values {
            let column_name = expect_name(value, || {
                format!("a column name under test {} inside model {}", test_kind, self.model_name)
            })?;
            self.add_test(column_name, TestEntry::bare(test_kind));
        }
        Ok(())
    }

    /// Each value is a mapping. `designator` picks the column; whatever is
    /// left over becomes the test's parameters, in source order.
    pub fn handle_complex_column(
        &mut self,
        test_values: &[Value],
        test_kind: &str,
        designator: &'static str,
    ) -> Result<(), SchemaConversionError> {
        for value in test_values {
            let entry = expect_mapping(value, || {
                format!("a {} test inside model {}", test_kind, self.model_name)
            })?;

            let column_value = entry.get(designator).ok_or_else(|| SchemaConversionError::MissingDesignator {
                test_kind: test_kind.to_string(),
                model: self.model_name.clone(),
                designator,
                raw: render(value),
            })?;
            let column_name = expect_name(column_value, || {
                format!("\"{}\" of a {} test inside model {}", designator, test_kind, self.model_name)
            })?;

            let params: Mapping = entry
                .iter()
                .filter(|(key, _)| key.as_str() != Some(designator))
                .map(|(key, val)| (key.clone(), val.clone()))
                .collect();

            self.add_test(column_name, TestEntry::parameterized(test_kind, params));
        }
        Ok(())
    }

    /// Route one constraint kind to the right handler
    pub fn populate_test(&mut self, test_kind: &str, test_values: &Value) -> Result<(), SchemaConversionError> {
        let values = test_values.as_sequence().ok_or_else(|| SchemaConversionError::ExpectedList {
            test_kind: test_kind.to_string(),
            model: self.model_name.clone(),
            found: type_name(test_values),
        })?;

        debug!(model = %self.model_name, test_kind, count = values.len(), "populating test");

        match TestKind::resolve(test_kind) {
            TestKind::Simple => self.handle_simple_column(values, test_kind),
            TestKind::Complex { designator } => self.handle_complex_column(values, test_kind, designator),
            TestKind::Unrecognized => Err(SchemaConversionError::UnrecognizedTestKind {
                test_kind: test_kind.to_string(),
                model: self.model_name.clone(),
            }),
        }
    }

    /// Apply every constraint kind in document order. A kind that shows up
    /// more than once accumulates.
    pub fn populate_from_constraints(&mut self, constraints: &[(Value, Value)]) -> Result<(), SchemaConversionError> {
        for (kind, values) in constraints {
            let test_kind = kind.as_str().ok_or_else(|| SchemaConversionError::UnrecognizedTestKind {
                test_kind: render(kind),
                model: self.model_name.clone(),
            })?;
            self.populate_test(test_kind, values)?;
        }
        Ok(())
    }

    /// Consume the builder and produce the canonical model record
    pub fn generate_model_record(self) -> ModelRecord {
        ModelRecord {
            name: self.model_name,
            tests: self.model_tests,
            columns: sorted_column_list(self.columns),
        }
    }
}
