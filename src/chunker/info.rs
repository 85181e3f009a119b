use serde::Serialize;

/// Descriptive metadata for one strategy. Static; carries no behaviour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Vec<ParamSpec>,
    pub pros: Vec<&'static str>,
    pub cons: Vec<&'static str>,
    pub use_cases: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamSpec {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: ParamKind,
    pub description: &'static str,
    pub default: ParamValue,
    /// Inclusive `[min, max]` suggested for callers
    pub range: [ParamValue; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Int,
    Float,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(usize),
    Float(f32),
}

impl ParamSpec {
    pub(crate) fn int(name: &'static str, description: &'static str, default: usize, min: usize, max: usize) -> Self {
        Self {
            name,
            kind: ParamKind::Int,
            description,
            default: ParamValue::Int(default),
            range: [ParamValue::Int(min), ParamValue::Int(max)],
        }
    }

    pub(crate) fn float(name: &'static str, description: &'static str, default: f32, min: f32, max: f32) -> Self {
        Self {
            name,
            kind: ParamKind::Float,
            description,
            default: ParamValue::Float(default),
            range: [ParamValue::Float(min), ParamValue::Float(max)],
        }
    }
}
