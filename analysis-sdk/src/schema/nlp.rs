//! NLP test-generation module schemas

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Request body for the NLP analyze endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NlpRequest {
    pub code: String,
}

/// Discovered functions plus the tests generated for them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NlpResponse {
    pub status: String,

    #[serde(default, deserialize_with = "super::null_as_default", alias = "functionsFound")]
    pub functions_found: u32,

    #[serde(default, deserialize_with = "super::null_as_default", alias = "totalTests")]
    pub total_tests: u32,

    #[serde(default, deserialize_with = "super::null_as_default", alias = "functionsDetails")]
    pub functions_details: Vec<FunctionDetail>,

    /// Test groups keyed by function name, in the order the server sent them
    #[serde(default, deserialize_with = "super::null_as_default", alias = "testCases")]
    pub test_cases: TestCases,

    #[serde(default, deserialize_with = "super::null_as_default", alias = "unitTestCode")]
    pub unit_test_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDetail {
    pub name: String,

    #[serde(default, deserialize_with = "super::null_as_default", alias = "lineNumber")]
    pub line_number: u32,

    #[serde(default, deserialize_with = "super::null_as_default")]
    pub signature: String,

    #[serde(default, deserialize_with = "super::null_as_default", alias = "returnType")]
    pub return_type: String,

    #[serde(default, deserialize_with = "super::null_as_default")]
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "super::null_as_default", rename = "type")]
    pub param_type: String,
}

/// Generated tests for one function.
///
/// Test case bodies are opaque to the client; only their counts are shown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestGroup {
    #[serde(default, deserialize_with = "super::null_as_default", alias = "functionalTests")]
    pub functional_tests: Vec<Value>,

    #[serde(default, deserialize_with = "super::null_as_default", alias = "boundaryTests")]
    pub boundary_tests: Vec<Value>,

    #[serde(default, deserialize_with = "super::null_as_default", alias = "errorTests")]
    pub error_tests: Vec<Value>,

    #[serde(default, deserialize_with = "super::null_as_default", alias = "performanceTests")]
    pub performance_tests: Vec<Value>,
}

impl TestGroup {
    /// Number of test cases across every category
    pub fn total(&self) -> usize {
        self.functional_tests.len()
            + self.boundary_tests.len()
            + self.error_tests.len()
            + self.performance_tests.len()
    }
}

/// Test groups keyed by function name.
///
/// Keeps the server's key order so groups line up with the discovered
/// functions. A `null` group decodes as an empty one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestCases(Vec<(String, TestGroup)>);

impl TestCases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a group; a repeated name replaces the earlier group in place
    pub fn insert(&mut self, name: impl Into<String>, group: TestGroup) {
        let name = name.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = group,
            None => self.0.push((name, group)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&TestGroup> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, g)| g)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TestGroup)> {
        self.0.iter().map(|(n, g)| (n.as_str(), g))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for TestCases {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, group) in &self.0 {
            map.serialize_entry(name, group)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TestCases {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TestCasesVisitor;

        impl<'de> Visitor<'de> for TestCasesVisitor {
            type Value = TestCases;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of function names to test groups")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<TestCases, A::Error> {
                let mut cases = TestCases::new();
                while let Some((name, group)) = access.next_entry::<String, Option<TestGroup>>()? {
                    cases.insert(name, group.unwrap_or_default());
                }
                Ok(cases)
            }
        }

        deserializer.deserialize_map(TestCasesVisitor)
    }
}

/// Payload of the function listing endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionsResponse {
    pub functions: Vec<FunctionInfo>,

    #[serde(default, deserialize_with = "super::null_as_default")]
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,

    #[serde(default, deserialize_with = "super::null_as_default")]
    pub signature: String,

    #[serde(default, deserialize_with = "super::null_as_default")]
    pub file: String,
}
