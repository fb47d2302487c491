use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::NetError;

/// Output function applied to every neuron's weighted sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivationKind {
    Sigmoid,
    Relu,
    /// softplus, ln(1 + e^x)
    SmoothRamp,
}

impl ActivationKind {
    pub fn value_at(self, x: f64) -> f64 {
        match self {
            ActivationKind::Sigmoid => sigmoid(x),
            ActivationKind::Relu => x.max(0.0),
            ActivationKind::SmoothRamp => x.max(0.0) + (-x.abs()).exp().ln_1p(),
        }
    }

    pub fn derivative_at(self, x: f64) -> f64 {
        match self {
            ActivationKind::Sigmoid => {
                let s = sigmoid(x);
                s * (1.0 - s)
            }
            ActivationKind::Relu => {
                if x > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            ActivationKind::SmoothRamp => sigmoid(x),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActivationKind::Sigmoid => "sigmoid",
            ActivationKind::Relu => "relu",
            ActivationKind::SmoothRamp => "smooth-ramp",
        }
    }
}

// exp() only ever sees a non-positive argument
#[inline]
fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

impl fmt::Display for ActivationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivationKind {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sigmoid" | "logistic" => Ok(ActivationKind::Sigmoid),
            "relu" => Ok(ActivationKind::Relu),
            "smooth-ramp" | "smooth_ramp" | "softplus" => Ok(ActivationKind::SmoothRamp),
            other => Err(NetError::UnknownActivation(other.to_string())),
        }
    }
}
