// Math tool service: add, multiply, power
//
// Stateless; every tool takes two numbers and returns one. The same
// service backs both the stdio and the HTTP server binaries.

use rmcp::{
    model::{Implementation, InitializeResult, ProtocolVersion, ServerCapabilities},
    tool, ServerHandler,
};
use schemars::JsonSchema;
use serde::Deserialize;

/// Add two numbers
pub fn add(a: f64, b: f64) -> f64 {
    a + b
}

/// Multiply two numbers
pub fn multiply(a: f64, b: f64) -> f64 {
    a * b
}

/// Raise `base` to `exponent` (standard exponentiation; fractional and
/// negative exponents follow `f64::powf`)
pub fn power(base: f64, exponent: f64) -> f64 {
    base.powf(exponent)
}

#[derive(Debug, Clone, Default)]
pub struct MathService;

impl MathService {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct BinaryRequest {
    #[schemars(description = "left operand")]
    pub a: f64,
    #[schemars(description = "right operand")]
    pub b: f64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PowerRequest {
    #[schemars(description = "the base")]
    pub base: f64,
    #[schemars(description = "the exponent")]
    pub exponent: f64,
}

#[tool(tool_box)]
impl MathService {
    #[tool(description = "Add two numbers.")]
    fn add(&self, #[tool(aggr)] request: BinaryRequest) -> String {
        add(request.a, request.b).to_string()
    }

    #[tool(description = "Multiply two numbers.")]
    fn multiply(&self, #[tool(aggr)] request: BinaryRequest) -> String {
        multiply(request.a, request.b).to_string()
    }

    #[tool(description = "Raise base to the given exponent.")]
    fn power(&self, #[tool(aggr)] request: PowerRequest) -> String {
        power(request.base, request.exponent).to_string()
    }
}

#[tool(tool_box)]
impl ServerHandler for MathService {
    fn get_info(&self) -> InitializeResult {
        InitializeResult {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "math-server".into(),
                version: env!("CARGO_PKG_VERSION").into(),
            },
            instructions: Some(
                "Provides basic arithmetic tools: add, multiply, power.".into(),
            ),
        }
    }
}
