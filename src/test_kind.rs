use serde::Serialize;

/// How a version 1 constraint kind maps onto column tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TestKind {
    /// Values are bare column names, the test takes no parameters
    Simple,
    /// Values are mappings; `designator` names the key holding the column,
    /// every other key is a test parameter
    Complex { designator: &'static str },
    /// Not a kind this tool knows how to convert
    Unrecognized,
}

/// Every constraint kind the converter understands.
pub const KNOWN_TEST_KINDS: &[(&str, TestKind)] = &[
    ("unique", TestKind::Simple),
    ("not_null", TestKind::Simple),
    ("relationships", TestKind::Complex { designator: "from" }),
    ("accepted_values", TestKind::Complex { designator: "field" }),
];

impl TestKind {
    /// Resolve a constraint kind name through the lookup table
    pub fn resolve(name: &str) -> TestKind {
        KNOWN_TEST_KINDS
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, kind)| *kind)
            .unwrap_or(TestKind::Unrecognized)
    }

    pub fn designator(&self) -> Option<&'static str> {
        match self {
            TestKind::Complex { designator } => Some(*designator),
            _ => None,
        }
    }
}
